mod buildup;
mod library;

use math::interp::LogLogTable;
use thiserror::Error;

pub use buildup::{GpCoefficients, GpTable, MAX_GP_MFP};
pub use library::MaterialLibrary;

#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("material '{0}' is not in the material library")]
    UnknownMaterial(String),
    #[error("photon energy must be positive and finite, got {0} MeV")]
    InvalidEnergy(f64),
    #[error("{quantity} must be non-negative and finite, got {value}")]
    InvalidQuantity { quantity: &'static str, value: f64 },
    #[error("material '{material}': {column} energies are not strictly ascending at entry {index}")]
    UnsortedTable {
        material: String,
        column: &'static str,
        index: usize,
    },
    #[error("material '{material}': {reason}")]
    MalformedTable { material: String, reason: String },
    #[error("material '{0}' has no buildup factor data")]
    MissingBuildupData(String),
    #[error("unable to parse material library: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unable to read material library: {0}")]
    Io(#[from] std::io::Error),
}

/// Photon interaction data of one material: density, mass attenuation and mass
/// energy-absorption coefficients over energy, and optionally GP buildup coefficients.
///
/// Energies are in MeV, coefficients in cm^2/g, densities in g/cm^3.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    density: f64,
    attenuation: LogLogTable,
    energy_absorption: LogLogTable,
    buildup: Option<GpTable>,
}

impl Material {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tabulated density.
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Mass attenuation coefficient μ/ρ at `energy`.
    pub fn mass_attenuation(&self, energy: f64) -> Result<f64, MaterialError> {
        Ok(self.attenuation.evaluate(checked_energy(energy)?))
    }

    /// Mass energy-absorption coefficient μen/ρ at `energy`.
    pub fn mass_energy_absorption(&self, energy: f64) -> Result<f64, MaterialError> {
        Ok(self.energy_absorption.evaluate(checked_energy(energy)?))
    }

    /// Linear attenuation coefficient (1/cm), using `density` in place of the tabulated one
    /// when given.
    pub fn linear_attenuation(&self, energy: f64, density: Option<f64>) -> Result<f64, MaterialError> {
        let density = match density {
            Some(d) => checked("density", d)?,
            None => self.density,
        };
        Ok(density * self.mass_attenuation(energy)?)
    }

    /// Mean free paths accumulated over `distance` centimeters at the tabulated density.
    pub fn mfp(&self, energy: f64, distance: f64) -> Result<f64, MaterialError> {
        Ok(checked("distance", distance)? * self.linear_attenuation(energy, None)?)
    }

    pub fn has_buildup(&self) -> bool {
        self.buildup.is_some()
    }

    /// GP exposure buildup factor after `mfp` mean free paths at `energy`.
    pub fn buildup(&self, energy: f64, mfp: f64) -> Result<f64, MaterialError> {
        let table = self
            .buildup
            .as_ref()
            .ok_or_else(|| MaterialError::MissingBuildupData(self.name.clone()))?;
        Ok(table.buildup(checked_energy(energy)?, checked("mean free path", mfp)?))
    }
}

/// A material named by a shield, source, or gap filler, with an optional density override.
/// Resolved against a `MaterialLibrary` only when a calculation runs.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialAssignment {
    pub name: String,
    pub density: Option<f64>,
}

impl MaterialAssignment {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            density: None,
        }
    }

    pub fn with_density(name: &str, density: f64) -> Self {
        Self {
            name: name.to_string(),
            density: Some(density),
        }
    }

    pub fn resolve<'a>(&self, library: &'a MaterialLibrary) -> Result<&'a Material, MaterialError> {
        library.get(&self.name)
    }

    /// Linear attenuation coefficient (1/cm) at `energy`, honoring the density override.
    pub fn linear_attenuation(&self, library: &MaterialLibrary, energy: f64) -> Result<f64, MaterialError> {
        self.resolve(library)?.linear_attenuation(energy, self.density)
    }
}

impl std::fmt::Display for MaterialAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.density {
            Some(d) => write!(f, "{} ({} g/cm3)", self.name, d),
            None => write!(f, "{}", self.name),
        }
    }
}

fn checked_energy(energy: f64) -> Result<f64, MaterialError> {
    if energy > 0.0 && energy.is_finite() {
        Ok(energy)
    } else {
        Err(MaterialError::InvalidEnergy(energy))
    }
}

fn checked(quantity: &'static str, value: f64) -> Result<f64, MaterialError> {
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(MaterialError::InvalidQuantity { quantity, value })
    }
}
