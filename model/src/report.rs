use math::hcm::Point3;

/// Exposure in R per unit energy fluence absorbed in air, R per (MeV/g).
pub const FLUX_TO_EXPOSURE: f64 = 1.835e-8;

/// Result for one photon line of one source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineResult {
    /// Photon energy, MeV.
    pub energy: f64,
    /// Emission rate, photons per second.
    pub intensity: f64,
    /// Unscattered flux at the detector, photons/cm^2/s.
    pub uncollided_flux: f64,
    /// Flux including buildup, photons/cm^2/s.
    pub total_flux: f64,
    /// Energy absorption rate in the response medium, MeV/g/s.
    pub exposure: f64,
}

/// Per-line breakdown of the exposure at one detector.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureReport {
    pub detector: Point3,
    pub lines: Vec<LineResult>,
}

impl ExposureReport {
    pub fn new(detector: Point3) -> Self {
        Self {
            detector,
            lines: vec![],
        }
    }

    /// Energy absorption rate summed over lines, MeV/g/s.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|l| l.exposure).sum()
    }

    pub fn uncollided_total(&self) -> f64 {
        self.lines.iter().map(|l| l.uncollided_flux * l.energy).sum()
    }

    pub fn exposure_rate_mr_per_hr(&self) -> f64 {
        self.total() * FLUX_TO_EXPOSURE * 1000.0 * 3600.0
    }

    /// Human-readable table, one row per line.
    pub fn to_table(&self) -> String {
        let mut out = format!("Detector at {}\n", self.detector);
        out.push_str("  Energy (MeV)  Intensity (1/s)   Uncollided (1/cm2/s)  Total (1/cm2/s)   Exposure (MeV/g/s)\n");
        for l in self.lines.iter() {
            out.push_str(&format!(
                "  {:<12.6} {:<17.6e} {:<21.6e} {:<17.6e} {:.6e}\n",
                l.energy, l.intensity, l.uncollided_flux, l.total_flux, l.exposure
            ));
        }
        out.push_str(&format!(
            "  Total: {:.6e} MeV/g/s = {:.6e} mR/hr\n",
            self.total(),
            self.exposure_rate_mr_per_hr()
        ));
        out
    }
}
