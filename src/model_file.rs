//! JSON description of a model, as read by the command-line driver.
//!
//! ```json
//! {
//!   "sources": [{ "geometry": { "type": "point", "position": [0, 0, 0] },
//!                 "isotopes": [{ "isotope": "Co-60", "curies": 1.0 }] }],
//!   "shields": [{ "material": "lead", "shape": { "type": "slab", "axis": "x", "start": 10, "end": 12 } }],
//!   "detectors": [[100, 0, 0]],
//!   "filler": "air"
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use material::{MaterialAssignment, MaterialError, MaterialLibrary};
use math::hcm::{Axis, Point3, Vec3};
use model::{BuildupPolicy, Detector, Model};
use serde::Deserialize;
use shape::{Annulus, Cuboid, Cylinder, SemiInfiniteSlab, Shape, ShapeError, Shell, Sphere};
use shield::Shield;
use source::{GroupingOption, IsotopeLibrary, Source, SourceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelFileError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed model description: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Material(#[from] MaterialError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDescription {
    /// Material library to use instead of the bundled one; relative to the model file.
    #[serde(default)]
    pub material_library: Option<PathBuf>,
    #[serde(default)]
    pub isotope_library: Option<PathBuf>,
    pub sources: Vec<SourceDescription>,
    #[serde(default)]
    pub shields: Vec<ShieldDescription>,
    pub detectors: Vec<[f64; 3]>,
    #[serde(default)]
    pub filler: Option<MaterialSpec>,
    #[serde(default)]
    pub buildup: Option<PolicyName>,
    #[serde(default)]
    pub buildup_reference: Option<String>,
    #[serde(default)]
    pub response_material: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDescription {
    pub geometry: SourceShape,
    #[serde(default)]
    pub isotopes: Vec<Activity>,
    /// Extra lines as `[energy MeV, photons/s]`.
    #[serde(default)]
    pub photons: Vec<[f64; 2]>,
    #[serde(default)]
    pub points: Option<[usize; 3]>,
    #[serde(default)]
    pub include_key_progeny: bool,
    #[serde(default)]
    pub grouping: Option<GroupingName>,
    #[serde(default)]
    pub max_photon_energies: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShieldDescription {
    pub material: MaterialSpec,
    pub shape: ShieldShape,
}

/// A material name, or a name with a density override.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaterialSpec {
    Name(String),
    Detailed { name: String, density: Option<f64> },
}

/// Activity of one isotope in either unit. `deny_unknown_fields` applies to each variant, so an
/// entry giving both units matches neither.
#[derive(Debug, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum Activity {
    Curies { isotope: String, curies: f64 },
    Becquerels { isotope: String, becquerels: f64 },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisName {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyName {
    Unity,
    Reference,
    DominantMaterial,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingName {
    Discrete,
    Group,
    Hybrid,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceShape {
    Point {
        position: [f64; 3],
    },
    Line {
        start: [f64; 3],
        end: [f64; 3],
    },
    #[serde(rename = "box")]
    Cuboid {
        material: MaterialSpec,
        center: [f64; 3],
        dimensions: [f64; 3],
    },
    Cylinder {
        material: MaterialSpec,
        axis: AxisName,
        center: [f64; 3],
        length: f64,
        radius: f64,
    },
    CappedCylinder {
        material: MaterialSpec,
        start: [f64; 3],
        end: [f64; 3],
        radius: f64,
    },
    Sphere {
        material: MaterialSpec,
        center: [f64; 3],
        radius: f64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShieldShape {
    Slab {
        axis: AxisName,
        start: f64,
        end: f64,
    },
    #[serde(rename = "box")]
    Cuboid {
        center: [f64; 3],
        dimensions: [f64; 3],
    },
    Sphere {
        center: [f64; 3],
        radius: f64,
    },
    Shell {
        center: [f64; 3],
        inner_radius: f64,
        outer_radius: f64,
    },
    Cylinder {
        axis: AxisName,
        center: [f64; 3],
        length: f64,
        radius: f64,
    },
    CappedCylinder {
        start: [f64; 3],
        end: [f64; 3],
        radius: f64,
    },
    InfiniteCylinder {
        axis: AxisName,
        center: [f64; 3],
        radius: f64,
    },
    Annulus {
        axis: AxisName,
        center: [f64; 3],
        length: f64,
        inner_radius: f64,
        outer_radius: f64,
    },
    InfiniteAnnulus {
        axis: AxisName,
        center: [f64; 3],
        inner_radius: f64,
        outer_radius: f64,
    },
}

impl From<AxisName> for Axis {
    fn from(name: AxisName) -> Self {
        match name {
            AxisName::X => Axis::X,
            AxisName::Y => Axis::Y,
            AxisName::Z => Axis::Z,
        }
    }
}

impl From<PolicyName> for BuildupPolicy {
    fn from(name: PolicyName) -> Self {
        match name {
            PolicyName::Unity => BuildupPolicy::Unity,
            PolicyName::Reference => BuildupPolicy::Reference,
            PolicyName::DominantMaterial => BuildupPolicy::DominantMaterial,
        }
    }
}

impl From<GroupingName> for GroupingOption {
    fn from(name: GroupingName) -> Self {
        match name {
            GroupingName::Discrete => GroupingOption::Discrete,
            GroupingName::Group => GroupingOption::Group,
            GroupingName::Hybrid => GroupingOption::Hybrid,
        }
    }
}

impl From<&MaterialSpec> for MaterialAssignment {
    fn from(spec: &MaterialSpec) -> Self {
        match spec {
            MaterialSpec::Name(name) => MaterialAssignment::new(name),
            MaterialSpec::Detailed { name, density: None } => MaterialAssignment::new(name),
            MaterialSpec::Detailed {
                name,
                density: Some(d),
            } => MaterialAssignment::with_density(name, *d),
        }
    }
}

fn point(p: [f64; 3]) -> Point3 {
    Point3::new(p[0], p[1], p[2])
}

fn vector(v: [f64; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

/// Reads and builds the model described by the JSON file at `path`.
pub fn load(path: &Path) -> Result<Model, ModelFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| ModelFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let description: ModelDescription = serde_json::from_str(&text)?;
    log::info!(
        "Model {}: {} sources, {} shields, {} detectors",
        path.display(),
        description.sources.len(),
        description.shields.len(),
        description.detectors.len()
    );
    description.build(path.parent().unwrap_or_else(|| Path::new(".")))
}

impl ModelDescription {
    /// Builds the model; library paths are taken relative to `base`.
    pub fn build(&self, base: &Path) -> Result<Model, ModelFileError> {
        let materials = match &self.material_library {
            Some(p) => MaterialLibrary::from_path(base.join(p))?,
            None => MaterialLibrary::builtin()?,
        };
        let isotopes = match &self.isotope_library {
            Some(p) => IsotopeLibrary::from_path(base.join(p))?,
            None => IsotopeLibrary::builtin()?,
        };
        let mut model = Model::new(Arc::new(materials), Arc::new(isotopes));

        for s in self.sources.iter() {
            model.add_source(s.build()?);
        }
        for s in self.shields.iter() {
            model.add_shield(Shield::new((&s.material).into(), s.shape.build()?));
        }
        for &d in self.detectors.iter() {
            model.add_detector(Detector::from(point(d)));
        }
        model.set_filler(self.filler.as_ref().map(MaterialAssignment::from));
        if let Some(policy) = self.buildup {
            model.buildup_policy = policy.into();
        }
        model.set_buildup_reference(self.buildup_reference.as_deref());
        if let Some(response) = &self.response_material {
            model.set_response_material(response);
        }
        Ok(model)
    }
}

impl SourceDescription {
    fn build(&self) -> Result<Source, ModelFileError> {
        let mut source = match &self.geometry {
            SourceShape::Point { position } => Source::point(point(*position))?,
            SourceShape::Line { start, end } => Source::line(point(*start), point(*end))?,
            SourceShape::Cuboid {
                material,
                center,
                dimensions,
            } => Source::cuboid(material.into(), point(*center), vector(*dimensions))?,
            SourceShape::Cylinder {
                material,
                axis,
                center,
                length,
                radius,
            } => Source::aligned_cylinder(material.into(), (*axis).into(), point(*center), *length, *radius)?,
            SourceShape::CappedCylinder {
                material,
                start,
                end,
                radius,
            } => Source::cylinder(material.into(), Cylinder::capped(point(*start), point(*end), *radius)?)?,
            SourceShape::Sphere {
                material,
                center,
                radius,
            } => Source::sphere(material.into(), point(*center), *radius)?,
        };
        for activity in self.isotopes.iter() {
            match activity {
                Activity::Curies { isotope, curies } => source.add_isotope_curies(isotope, *curies)?,
                Activity::Becquerels { isotope, becquerels } => source.add_isotope_bq(isotope, *becquerels)?,
            }
        }
        for &[energy, intensity] in self.photons.iter() {
            source.add_photon(energy, intensity)?;
        }
        if let Some(points) = self.points {
            source.set_points_per_dimension(points)?;
        }
        source.include_key_progeny = self.include_key_progeny;
        if let Some(grouping) = self.grouping {
            source.grouping = grouping.into();
        }
        if let Some(n) = self.max_photon_energies {
            source.set_max_photon_energies(n)?;
        }
        Ok(source)
    }
}

impl ShieldShape {
    fn build(&self) -> Result<Shape, ShapeError> {
        Ok(match *self {
            ShieldShape::Slab { axis, start, end } => SemiInfiniteSlab::new(axis.into(), start, end)?.into(),
            ShieldShape::Cuboid { center, dimensions } => Cuboid::new(point(center), vector(dimensions))?.into(),
            ShieldShape::Sphere { center, radius } => Sphere::new(point(center), radius)?.into(),
            ShieldShape::Shell {
                center,
                inner_radius,
                outer_radius,
            } => Shell::new(point(center), inner_radius, outer_radius)?.into(),
            ShieldShape::Cylinder {
                axis,
                center,
                length,
                radius,
            } => Cylinder::aligned(axis.into(), point(center), length, radius)?.into(),
            ShieldShape::CappedCylinder { start, end, radius } => {
                Cylinder::capped(point(start), point(end), radius)?.into()
            }
            ShieldShape::InfiniteCylinder { axis, center, radius } => {
                Cylinder::infinite_aligned(axis.into(), point(center), radius)?.into()
            }
            ShieldShape::Annulus {
                axis,
                center,
                length,
                inner_radius,
                outer_radius,
            } => Annulus::aligned(axis.into(), point(center), length, inner_radius, outer_radius)?.into(),
            ShieldShape::InfiniteAnnulus {
                axis,
                center,
                inner_radius,
                outer_radius,
            } => Annulus::infinite_aligned(axis.into(), point(center), inner_radius, outer_radius)?.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Model, ModelFileError> {
        let description: ModelDescription = serde_json::from_str(text)?;
        description.build(Path::new("."))
    }

    #[test]
    fn demo_model_builds() {
        let model = parse(include_str!("../demos/shielded_tank.json")).unwrap();
        assert_eq!(model.sources().len(), 2);
        assert_eq!(model.shields().len(), 3);
        assert_eq!(model.detectors().len(), 3);
        assert_eq!(model.filler().map(|f| f.name.as_str()), Some("air"));
        assert_eq!(model.buildup_reference(), Some("water"));
        let reports = model.calculate_all().unwrap();
        assert!(reports.iter().all(|r| r.total() > 0.0));
    }

    #[test]
    fn every_shield_shape() {
        let model = parse(
            r#"{
              "sources": [{ "geometry": { "type": "point", "position": [0, 0, 0] }, "photons": [[1.0, 1e6]] }],
              "shields": [
                { "material": "lead", "shape": { "type": "slab", "axis": "x", "start": 10, "end": 11 } },
                { "material": "iron", "shape": { "type": "box", "center": [20, 0, 0], "dimensions": [2, 2, 2] } },
                { "material": "water", "shape": { "type": "sphere", "center": [30, 0, 0], "radius": 1 } },
                { "material": "water", "shape": { "type": "cylinder", "axis": "z", "center": [40, 0, 0], "length": 4, "radius": 1 } },
                { "material": "water", "shape": { "type": "capped_cylinder", "start": [50, 0, -2], "end": [50, 0, 2], "radius": 1 } },
                { "material": "water", "shape": { "type": "infinite_cylinder", "axis": "y", "center": [60, 0, 0], "radius": 1 } },
                { "material": "concrete", "shape": { "type": "annulus", "axis": "x", "center": [0, 0, 0], "length": 200, "inner_radius": 5, "outer_radius": 6 } },
                { "material": { "name": "concrete", "density": 1.0 },
                  "shape": { "type": "infinite_annulus", "axis": "x", "center": [0, 0, 0], "inner_radius": 7, "outer_radius": 8 } },
                { "material": "lead", "shape": { "type": "shell", "center": [0, 0, 0], "inner_radius": 90, "outer_radius": 91 } }
              ],
              "detectors": [[100, 0, 0]],
              "buildup": "unity"
            }"#,
        )
        .unwrap();
        assert_eq!(model.shields().len(), 9);
        assert_eq!(model.shields()[7].material().density, Some(1.0));
        assert!(matches!(model.shields()[8].shape(), Shape::Shell(_)));
        assert_eq!(model.buildup_policy, BuildupPolicy::Unity);
        assert!(model.calculate_all().unwrap()[0].total() > 0.0);
    }

    #[test]
    fn spherical_source() {
        let model = parse(
            r#"{
              "sources": [{ "geometry": { "type": "sphere", "material": "water", "center": [0, 0, 0], "radius": 10 },
                            "isotopes": [{ "isotope": "Cs-137", "becquerels": 1e9 }],
                            "include_key_progeny": true, "points": [4, 4, 4] }],
              "detectors": [[50, 0, 0]]
            }"#,
        )
        .unwrap();
        let source = &model.sources()[0];
        assert!(source.summary().starts_with("SphereSource"));
        assert_eq!(source.sample_points().unwrap().len(), 64);
        assert!(model.calculate_all().unwrap()[0].total() > 0.0);
    }

    #[test]
    fn invalid_descriptions() {
        let unknown_field = r#"{ "sources": [], "detectors": [], "detector": [] }"#;
        assert!(matches!(parse(unknown_field), Err(ModelFileError::Parse(_))));

        let bad_axis = r#"{ "sources": [], "detectors": [],
            "shields": [{ "material": "lead", "shape": { "type": "slab", "axis": "w", "start": 0, "end": 1 } }] }"#;
        assert!(matches!(parse(bad_axis), Err(ModelFileError::Parse(_))));

        let thin_slab = r#"{ "sources": [], "detectors": [],
            "shields": [{ "material": "lead", "shape": { "type": "slab", "axis": "x", "start": 1, "end": 1 } }] }"#;
        assert!(matches!(parse(thin_slab), Err(ModelFileError::Shape(_))));

        let no_activity = r#"{ "detectors": [], "sources": [{ "geometry": { "type": "point", "position": [0, 0, 0] },
            "isotopes": [{ "isotope": "Co-60", "curies": -1 }] }] }"#;
        assert!(matches!(parse(no_activity), Err(ModelFileError::Source(_))));

        let two_units = r#"{ "detectors": [], "sources": [{ "geometry": { "type": "point", "position": [0, 0, 0] },
            "isotopes": [{ "isotope": "Co-60", "curies": 1, "becquerels": 5 }] }] }"#;
        assert!(matches!(parse(two_units), Err(ModelFileError::Parse(_))));

        let hollow_shell = r#"{ "sources": [], "detectors": [],
            "shields": [{ "material": "lead", "shape": { "type": "shell", "center": [0, 0, 0], "inner_radius": 3, "outer_radius": 2 } }] }"#;
        assert!(matches!(
            parse(hollow_shell),
            Err(ModelFileError::Shape(ShapeError::InvertedRadii { .. }))
        ));

        let missing_library = r#"{ "sources": [], "detectors": [], "material_library": "no/such/file.json" }"#;
        assert!(matches!(
            parse(missing_library),
            Err(ModelFileError::Material(MaterialError::Io(_)))
        ));
    }
}
