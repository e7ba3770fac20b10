mod engine;
mod report;

use std::sync::Arc;

use geometry::RayError;
use material::{MaterialAssignment, MaterialError, MaterialLibrary};
use math::hcm::Point3;
use shield::Shield;
use source::{IsotopeLibrary, Source, SourceError};
use thiserror::Error;

pub use engine::{BuildupPolicy, MIN_DISTANCE};
pub use report::{ExposureReport, LineResult, FLUX_TO_EXPOSURE};

#[derive(Debug, Error)]
pub enum CalcError {
    #[error("sample point {point} coincides with the detector at {detector}")]
    SingularGeometry { point: Point3, detector: Point3 },
    #[error("the model has no sources")]
    NoSources,
    #[error("no buildup data for '{material}' and no reference material with buildup data")]
    MissingBuildupReference { material: String },
    #[error(transparent)]
    Ray(#[from] RayError),
    #[error(transparent)]
    Material(#[from] MaterialError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A point where exposure is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detector {
    pub location: Point3,
}

impl Detector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            location: Point3::new(x, y, z),
        }
    }
}

impl From<Point3> for Detector {
    fn from(location: Point3) -> Self {
        Self { location }
    }
}

/// Sources, shields and detectors, plus the materials that fill the gaps and define buildup.
///
/// The model is built up by the caller and then queried any number of times; each calculation
/// resolves materials against the shared libraries and leaves the model untouched.
pub struct Model {
    materials: Arc<MaterialLibrary>,
    isotopes: Arc<IsotopeLibrary>,
    sources: Vec<Source>,
    shields: Vec<Shield>,
    detectors: Vec<Detector>,
    filler: Option<MaterialAssignment>,
    buildup_reference: Option<String>,
    response_material: String,
    pub buildup_policy: BuildupPolicy,
    pub use_multi_thread: bool,
}

impl Model {
    pub fn new(materials: Arc<MaterialLibrary>, isotopes: Arc<IsotopeLibrary>) -> Self {
        Self {
            materials,
            isotopes,
            sources: vec![],
            shields: vec![],
            detectors: vec![],
            filler: None,
            buildup_reference: None,
            response_material: "air".to_string(),
            buildup_policy: BuildupPolicy::default(),
            use_multi_thread: true,
        }
    }

    /// A model over the libraries bundled with the `material` and `source` crates.
    pub fn with_builtin_libraries() -> Result<Self, CalcError> {
        Ok(Self::new(
            Arc::new(MaterialLibrary::builtin()?),
            Arc::new(IsotopeLibrary::builtin()?),
        ))
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn isotopes(&self) -> &IsotopeLibrary {
        &self.isotopes
    }

    pub fn add_source(&mut self, source: Source) {
        self.sources.push(source);
    }

    pub fn add_shield(&mut self, shield: Shield) {
        self.shields.push(shield);
    }

    pub fn add_detector(&mut self, detector: Detector) {
        self.detectors.push(detector);
    }

    pub fn remove_source(&mut self, index: usize) -> Option<Source> {
        (index < self.sources.len()).then(|| self.sources.remove(index))
    }

    pub fn remove_shield(&mut self, index: usize) -> Option<Shield> {
        (index < self.shields.len()).then(|| self.shields.remove(index))
    }

    pub fn remove_detector(&mut self, index: usize) -> Option<Detector> {
        (index < self.detectors.len()).then(|| self.detectors.remove(index))
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn shields(&self) -> &[Shield] {
        &self.shields
    }

    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    /// Material occupying every part of a ray not inside the source or a shield; `None` is
    /// vacuum.
    pub fn set_filler(&mut self, filler: Option<MaterialAssignment>) {
        if let (Some(old), Some(new)) = (&self.filler, &filler) {
            log::warn!("Replacing filler material {} with {}", old, new);
        }
        self.filler = filler;
    }

    pub fn filler(&self) -> Option<&MaterialAssignment> {
        self.filler.as_ref()
    }

    /// Material whose buildup data is used when the dominant material has none, or always under
    /// `BuildupPolicy::Reference`.
    pub fn set_buildup_reference(&mut self, material: Option<&str>) {
        self.buildup_reference = material.map(str::to_string);
    }

    pub fn buildup_reference(&self) -> Option<&str> {
        self.buildup_reference.as_deref()
    }

    /// Medium whose mass energy-absorption coefficient turns flux into exposure (air by
    /// default).
    pub fn set_response_material(&mut self, material: &str) {
        self.response_material = material.to_string();
    }

    pub fn response_material(&self) -> &str {
        &self.response_material
    }

    /// Exposure at `detector`: energy absorption rate in the response medium, MeV/g/s.
    pub fn calculate_exposure(&self, detector: &Detector) -> Result<f64, CalcError> {
        Ok(self.calculate_report(detector)?.total())
    }

    pub fn calculate_report(&self, detector: &Detector) -> Result<ExposureReport, CalcError> {
        let lines = engine::Engine::new(self)?.run(detector.location)?;
        Ok(ExposureReport {
            detector: detector.location,
            lines,
        })
    }

    /// Reports for every registered detector, in the order they were added.
    pub fn calculate_all(&self) -> Result<Vec<ExposureReport>, CalcError> {
        let engine = engine::Engine::new(self)?;
        self.detectors
            .iter()
            .map(|d| {
                Ok(ExposureReport {
                    detector: d.location,
                    lines: engine.run(d.location)?,
                })
            })
            .collect()
    }
}
