use geometry::ray::Ray;
use math::float::{self, Interval};
use math::hcm::{Axis, Point3, Vec3};

use crate::{finite, length_within, positive, slab_span, ShapeError, Solid};

/// The region between two planes perpendicular to `axis`, unbounded in the other two directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemiInfiniteSlab {
    axis: Axis,
    start: f64,
    end: f64,
}

impl SemiInfiniteSlab {
    /// The two faces may be given in either order.
    pub fn new(axis: Axis, start: f64, end: f64) -> Result<Self, ShapeError> {
        let (start, end) = float::min_max(start, end);
        positive("slab", "thickness", end - start)?;
        Ok(Self { axis, start, end })
    }
    pub fn axis(&self) -> Axis {
        self.axis
    }
    pub fn thickness(&self) -> f64 {
        self.end - self.start
    }
}

/// Axis-aligned rectangular box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    min: Point3,
    max: Point3,
}

impl Cuboid {
    /// Builds a box from its center and its full extent along x, y and z.
    pub fn new(center: Point3, dimensions: Vec3) -> Result<Self, ShapeError> {
        finite("box", center)?;
        positive("box", "x dimension", dimensions.x)?;
        positive("box", "y dimension", dimensions.y)?;
        positive("box", "z dimension", dimensions.z)?;
        let half = dimensions * 0.5;
        Ok(Self {
            min: center - half,
            max: center + half,
        })
    }
    pub fn from_corners(p0: Point3, p1: Point3) -> Result<Self, ShapeError> {
        let (xmin, xmax) = float::min_max(p0.x, p1.x);
        let (ymin, ymax) = float::min_max(p0.y, p1.y);
        let (zmin, zmax) = float::min_max(p0.z, p1.z);
        let min = Point3::new(xmin, ymin, zmin);
        let max = Point3::new(xmax, ymax, zmax);
        Self::new(min + (max - min) * 0.5, max - min)
    }
    pub fn min(&self) -> Point3 {
        self.min
    }
    pub fn max(&self) -> Point3 {
        self.max
    }
    pub fn center(&self) -> Point3 {
        self.min + (self.max - self.min) * 0.5
    }
    pub fn dimensions(&self) -> Vec3 {
        self.max - self.min
    }
    pub fn volume(&self) -> f64 {
        let Vec3 { x, y, z } = self.dimensions();
        x * y * z
    }

    /// Parameter span where the ray line is inside the box: the intersection of the three
    /// per-axis slab spans.
    fn span(&self, r: &Ray) -> Option<Interval> {
        let mut span = Interval::everything();
        for axis in 0..3 {
            let axis_span = slab_span(r.origin[axis], r.dir[axis], self.min[axis], self.max[axis])?;
            // Shrinks the span by intersecting it with the slab of this axis.
            span = span.intersect(axis_span)?;
        }
        Some(span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    pub fn new(center: Point3, radius: f64) -> Result<Self, ShapeError> {
        finite("sphere", center)?;
        positive("sphere", "radius", radius)?;
        Ok(Sphere { center, radius })
    }
    pub fn center(&self) -> Point3 {
        self.center
    }
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn span(&self, r: &Ray) -> Option<Interval> {
        // r = o + td, |d| = 1
        // sphere: (p-c)(p-c) = radius^2
        // t^2 + 2t d * (o-c) + (o-c)^2 - radius^2 = 0
        let f = r.origin - self.center;
        let b_prime = -f.dot(r.dir);
        let delta = self.radius * self.radius - (f + b_prime * r.dir).norm_squared();
        if delta <= 0.0 {
            // Missed, or tangent.
            return None;
        }
        let c = f.norm_squared() - self.radius * self.radius;
        // delta > 0 keeps q away from zero; signum(0.0) is 1.
        let q = b_prime + b_prime.signum() * delta.sqrt();
        Some(Interval::new(c / q, q))
    }
}

/// Spherical shell: the region between two concentric spheres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shell {
    outer: Sphere,
    inner_radius: f64,
}

impl Shell {
    pub fn new(center: Point3, inner_radius: f64, outer_radius: f64) -> Result<Self, ShapeError> {
        finite("shell", center)?;
        positive("shell", "outer radius", outer_radius)?;
        Self::wrapping(Sphere { center, radius: outer_radius }, inner_radius)
    }

    /// A shell of wall `thickness` laid on the outside of `sphere`.
    pub fn around(sphere: &Sphere, thickness: f64) -> Result<Self, ShapeError> {
        positive("shell", "thickness", thickness)?;
        Self::new(sphere.center, sphere.radius, sphere.radius + thickness)
    }

    fn wrapping(outer: Sphere, inner_radius: f64) -> Result<Self, ShapeError> {
        positive("shell", "inner radius", inner_radius)?;
        if inner_radius >= outer.radius {
            return Err(ShapeError::InvertedRadii {
                shape: "shell",
                inner: inner_radius,
                outer: outer.radius,
            });
        }
        Ok(Self { outer, inner_radius })
    }

    pub fn outer(&self) -> Sphere {
        self.outer
    }
    pub fn inner(&self) -> Sphere {
        Sphere {
            center: self.outer.center,
            radius: self.inner_radius,
        }
    }
}

// Implementation of the `Solid` trait for the shape implementations.

impl Solid for SemiInfiniteSlab {
    fn summary(&self) -> String {
        format!(
            "SemiInfiniteSlab{{ {} in [{}, {}] }}",
            self.axis, self.start, self.end
        )
    }
    fn contains(&self, p: Point3) -> bool {
        Interval::new(self.start, self.end).contains(p[self.axis.index()])
    }
    fn crossing_length(&self, r: &Ray) -> f64 {
        let i = self.axis.index();
        length_within(r, slab_span(r.origin[i], r.dir[i], self.start, self.end))
    }
}

impl Solid for Cuboid {
    fn summary(&self) -> String {
        format!("Box{{ {} -> {} }}", self.min, self.max)
    }
    fn contains(&self, p: Point3) -> bool {
        (0..3).all(|axis| self.min[axis] <= p[axis] && p[axis] <= self.max[axis])
    }
    fn crossing_length(&self, r: &Ray) -> f64 {
        length_within(r, self.span(r))
    }
}

impl Solid for Sphere {
    fn summary(&self) -> String {
        format!("Sphere{{ {}, radius = {} }}", self.center, self.radius)
    }
    fn contains(&self, p: Point3) -> bool {
        p.squared_distance_to(self.center) <= self.radius * self.radius
    }
    fn crossing_length(&self, r: &Ray) -> f64 {
        length_within(r, self.span(r))
    }
}

impl Solid for Shell {
    fn summary(&self) -> String {
        format!(
            "Shell{{ {}, radii = [{}, {}] }}",
            self.outer.center, self.inner_radius, self.outer.radius
        )
    }
    fn contains(&self, p: Point3) -> bool {
        self.outer.contains(p) && p.squared_distance_to(self.outer.center) >= self.inner_radius * self.inner_radius
    }
    /// The inner sphere lies wholly inside the outer one.
    fn crossing_length(&self, r: &Ray) -> f64 {
        let outer = self.outer.crossing_length(r);
        let inner = self.inner().crossing_length(r);
        (outer - inner).max(0.0)
    }
}
