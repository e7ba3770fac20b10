pub mod isotope;
pub mod sample_shape;
pub mod spectrum;

use geometry::ray::Ray;
use material::{MaterialAssignment, MaterialError, MaterialLibrary};
use math::hcm::{Axis, Point3, Vec3};
use shape::{Cuboid, Cylinder, ShapeError, Solid, Sphere};
use thiserror::Error;

pub use isotope::{HalfLifeUnit, Isotope, IsotopeLibrary};
pub use sample_shape::{SamplePoint, SourceGeometry};
pub use spectrum::{GroupingOption, Photon, DEFAULT_MAX_PHOTON_ENERGIES};

/// Becquerels per curie.
pub const BQ_PER_CURIE: f64 = 3.7e10;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("isotope '{0}' is not in the isotope library")]
    UnknownIsotope(String),
    #[error("activity must be positive and finite, got {0}")]
    InvalidActivity(f64),
    #[error("photon needs a positive energy and a non-negative intensity, got {energy} MeV at {intensity}")]
    InvalidPhoton { energy: f64, intensity: f64 },
    #[error("points per dimension must be at least 1, got {0}")]
    InvalidResolution(usize),
    #[error("half-life unit '{0}' is not recognized")]
    InvalidHalfLifeUnit(String),
    #[error("isotope library defines '{0}' more than once")]
    DuplicateIsotope(String),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Material(#[from] MaterialError),
    #[error("unable to parse isotope library: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unable to read isotope library: {0}")]
    Io(#[from] std::io::Error),
}

/// Activity of one isotope held by a source, in becquerels.
#[derive(Debug, Clone, PartialEq)]
pub struct IsotopeActivity {
    pub isotope: String,
    pub becquerels: f64,
}

/// A radioactive source: an emission region, the material filling it, and what it emits.
///
/// Isotopes are kept by name and resolved against an `IsotopeLibrary` when the spectrum is
/// assembled, so an unknown name surfaces as `SourceError::UnknownIsotope` at calculation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    geometry: SourceGeometry,
    material: Option<MaterialAssignment>,
    isotopes: Vec<IsotopeActivity>,
    photons: Vec<Photon>,
    points_per_dimension: [usize; 3],
    pub include_key_progeny: bool,
    pub grouping: GroupingOption,
    max_photon_energies: usize,
}

impl Source {
    fn with_geometry(geometry: SourceGeometry, material: Option<MaterialAssignment>) -> Self {
        let points_per_dimension = match geometry {
            SourceGeometry::Point(_) => [1, 1, 1],
            _ => [10, 10, 10],
        };
        Self {
            geometry,
            material,
            isotopes: vec![],
            photons: vec![],
            points_per_dimension,
            include_key_progeny: false,
            grouping: GroupingOption::default(),
            max_photon_energies: DEFAULT_MAX_PHOTON_ENERGIES,
        }
    }

    pub fn point(location: Point3) -> Result<Self, SourceError> {
        if !location.is_finite() {
            return Err(ShapeError::NotFinite {
                shape: "point source",
                location,
            }
            .into());
        }
        Ok(Self::with_geometry(SourceGeometry::Point(location), None))
    }

    pub fn line(start: Point3, end: Point3) -> Result<Self, SourceError> {
        // Reuses the ray checks: distinct, finite end points.
        let ray = Ray::between(start, end).map_err(|_| ShapeError::InvalidDimension {
            shape: "line source",
            quantity: "length",
            value: start.distance_to(end),
        })?;
        Ok(Self::with_geometry(
            SourceGeometry::Line {
                start: ray.origin,
                end: ray.end,
            },
            None,
        ))
    }

    /// Axis-aligned box source filled with `material`.
    pub fn cuboid(material: MaterialAssignment, center: Point3, dimensions: Vec3) -> Result<Self, SourceError> {
        let b = Cuboid::new(center, dimensions)?;
        Ok(Self::with_geometry(SourceGeometry::Box(b), Some(material)))
    }

    /// Finite cylinder source along any axis, filled with `material`.
    pub fn cylinder(material: MaterialAssignment, cylinder: Cylinder) -> Result<Self, SourceError> {
        if cylinder.length().is_none() {
            return Err(ShapeError::InvalidDimension {
                shape: "cylinder source",
                quantity: "length",
                value: f64::INFINITY,
            }
            .into());
        }
        Ok(Self::with_geometry(SourceGeometry::Cylinder(cylinder), Some(material)))
    }

    /// Cylinder source parallel to a coordinate axis, centered on `center`.
    pub fn aligned_cylinder(
        material: MaterialAssignment, axis: Axis, center: Point3, length: f64, radius: f64,
    ) -> Result<Self, SourceError> {
        Self::cylinder(material, Cylinder::aligned(axis, center, length, radius)?)
    }

    /// Spherical source filled with `material`.
    pub fn sphere(material: MaterialAssignment, center: Point3, radius: f64) -> Result<Self, SourceError> {
        let s = Sphere::new(center, radius)?;
        Ok(Self::with_geometry(SourceGeometry::Sphere(s), Some(material)))
    }

    pub fn geometry(&self) -> &SourceGeometry {
        &self.geometry
    }

    pub fn material(&self) -> Option<&MaterialAssignment> {
        self.material.as_ref()
    }

    pub fn summary(&self) -> String {
        match &self.material {
            Some(m) => format!("{} of {}", self.geometry.summary(), m),
            None => self.geometry.summary(),
        }
    }

    pub fn points_per_dimension(&self) -> [usize; 3] {
        self.points_per_dimension
    }

    /// Sets the grid resolution. Entries beyond the dimensionality of the source are ignored.
    pub fn set_points_per_dimension(&mut self, resolution: [usize; 3]) -> Result<(), SourceError> {
        if let Some(&n) = resolution[..self.geometry.dimensions()].iter().find(|&&n| n == 0) {
            return Err(SourceError::InvalidResolution(n));
        }
        self.points_per_dimension = resolution;
        Ok(())
    }

    pub fn max_photon_energies(&self) -> usize {
        self.max_photon_energies
    }

    pub fn set_max_photon_energies(&mut self, count: usize) -> Result<(), SourceError> {
        if count == 0 {
            return Err(SourceError::InvalidResolution(count));
        }
        self.max_photon_energies = count;
        Ok(())
    }

    pub fn add_isotope_bq(&mut self, isotope: &str, becquerels: f64) -> Result<(), SourceError> {
        if !(becquerels > 0.0 && becquerels.is_finite()) {
            return Err(SourceError::InvalidActivity(becquerels));
        }
        self.isotopes.push(IsotopeActivity {
            isotope: isotope.to_string(),
            becquerels,
        });
        Ok(())
    }

    pub fn add_isotope_curies(&mut self, isotope: &str, curies: f64) -> Result<(), SourceError> {
        self.add_isotope_bq(isotope, curies * BQ_PER_CURIE)
    }

    /// Adds a photon line emitted at `intensity` photons per second.
    pub fn add_photon(&mut self, energy: f64, intensity: f64) -> Result<(), SourceError> {
        self.photons.push(Photon::new(energy, intensity)?);
        Ok(())
    }

    pub fn list_isotopes(&self) -> &[IsotopeActivity] {
        &self.isotopes
    }

    /// Photons added one by one with `add_photon`, as given.
    pub fn list_added_photons(&self) -> &[Photon] {
        &self.photons
    }

    /// Every line the source emits, as `(energy, photons per second)`: isotope lines times
    /// activity (with key progeny when enabled) plus the added photons. Lines of equal energy
    /// are merged; the result is sorted by energy.
    pub fn list_discrete_photons(&self, library: &IsotopeLibrary) -> Result<Vec<Photon>, SourceError> {
        let mut activities = self.isotopes.clone();
        if self.include_key_progeny {
            for parent in self.isotopes.iter() {
                for (daughter, fraction) in library.get(&parent.isotope)?.key_progeny.iter() {
                    activities.push(IsotopeActivity {
                        isotope: daughter.clone(),
                        becquerels: parent.becquerels * fraction,
                    });
                }
            }
        }
        let mut lines = self.photons.clone();
        for entry in activities.iter() {
            for photon in library.lookup(&entry.isotope)? {
                lines.push(Photon {
                    energy: photon.energy,
                    intensity: photon.intensity * entry.becquerels,
                });
            }
        }
        Ok(spectrum::merge_lines(lines))
    }

    /// The spectrum used for exposure: `list_discrete_photons` reduced by the grouping option.
    pub fn photon_source_list(&self, library: &IsotopeLibrary) -> Result<Vec<Photon>, SourceError> {
        let lines = self.list_discrete_photons(library)?;
        Ok(spectrum::apply_grouping(lines, self.grouping, self.max_photon_energies))
    }

    /// Weighted sample points at the configured resolution.
    pub fn sample_points(&self) -> Result<Vec<SamplePoint>, SourceError> {
        self.geometry.sample_points(self.points_per_dimension)
    }

    /// Weighted sample points at an explicit resolution.
    pub fn generate_sample_points(&self, resolution: [usize; 3]) -> Result<Vec<SamplePoint>, SourceError> {
        self.geometry.sample_points(resolution)
    }

    /// Length of `ray` inside the source body: zero for points and lines. Rays start at a sample
    /// point, so this is the path from that point to where the ray leaves the source.
    pub fn crossing_length(&self, ray: &Ray) -> f64 {
        self.geometry.solid().map_or(0.0, |s| s.crossing_length(ray))
    }

    /// Self-shielding mean free paths along `ray` at `energy`.
    pub fn crossing_mfp(&self, ray: &Ray, energy: f64, library: &MaterialLibrary) -> Result<f64, SourceError> {
        match &self.material {
            None => Ok(0.0),
            Some(material) => {
                let length = self.crossing_length(ray);
                Ok(length * material.linear_attenuation(library, energy)?)
            }
        }
    }
}
