use geometry::ray::Ray;
use material::{MaterialAssignment, MaterialError, MaterialLibrary};
use math::hcm::{Axis, Point3, Vec3};
use shape::{Annulus, Cuboid, Cylinder, SemiInfiniteSlab, Shape, ShapeError, Shell, Solid, Sphere};

/// A body of attenuating material between sources and detectors.
///
/// Shields are energy-agnostic: they know their geometry and which material fills them, and
/// only turn crossing lengths into mean free paths when asked at a given photon energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Shield {
    shape: Shape,
    material: MaterialAssignment,
}

impl Shield {
    pub fn new<S: Into<Shape>>(material: MaterialAssignment, shape: S) -> Self {
        Self {
            shape: shape.into(),
            material,
        }
    }

    pub fn slab(material: MaterialAssignment, axis: Axis, start: f64, end: f64) -> Result<Self, ShapeError> {
        Ok(Self::new(material, SemiInfiniteSlab::new(axis, start, end)?))
    }

    pub fn cuboid(material: MaterialAssignment, center: Point3, dimensions: Vec3) -> Result<Self, ShapeError> {
        Ok(Self::new(material, Cuboid::new(center, dimensions)?))
    }

    pub fn sphere(material: MaterialAssignment, center: Point3, radius: f64) -> Result<Self, ShapeError> {
        Ok(Self::new(material, Sphere::new(center, radius)?))
    }

    /// Spherical shell between `inner_radius` and `outer_radius` around `center`.
    pub fn shell(
        material: MaterialAssignment, center: Point3, inner_radius: f64, outer_radius: f64,
    ) -> Result<Self, ShapeError> {
        Ok(Self::new(material, Shell::new(center, inner_radius, outer_radius)?))
    }

    /// Cylinder capped by flat ends centered on `start` and `end`.
    pub fn capped_cylinder(
        material: MaterialAssignment, start: Point3, end: Point3, radius: f64,
    ) -> Result<Self, ShapeError> {
        Ok(Self::new(material, Cylinder::capped(start, end, radius)?))
    }

    pub fn aligned_cylinder(
        material: MaterialAssignment, axis: Axis, center: Point3, length: f64, radius: f64,
    ) -> Result<Self, ShapeError> {
        Ok(Self::new(material, Cylinder::aligned(axis, center, length, radius)?))
    }

    pub fn infinite_annulus(
        material: MaterialAssignment, axis: Axis, center: Point3, inner_radius: f64, outer_radius: f64,
    ) -> Result<Self, ShapeError> {
        Ok(Self::new(
            material,
            Annulus::infinite_aligned(axis, center, inner_radius, outer_radius)?,
        ))
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &MaterialAssignment {
        &self.material
    }

    pub fn summary(&self) -> String {
        format!("{} of {}", self.shape.summary(), self.material)
    }

    pub fn contains(&self, p: Point3) -> bool {
        self.shape.contains(p)
    }

    /// Length (cm) of `ray` inside the shield.
    pub fn crossing_length(&self, ray: &Ray) -> f64 {
        self.shape.crossing_length(ray)
    }

    /// Mean free paths `ray` accumulates inside the shield at `energy`.
    pub fn crossing_mfp(&self, ray: &Ray, energy: f64, library: &MaterialLibrary) -> Result<f64, MaterialError> {
        let length = self.crossing_length(ray);
        Ok(length * self.material.linear_attenuation(library, energy)?)
    }
}
