use geometry::ray::Ray;
use math::float::Interval;
use math::hcm::{Axis, Point3, Vec3};

use crate::{finite, length_within, positive, slab_span, ShapeError, Solid, PARALLEL_EPSILON};

/// A right circular cylinder around an arbitrary axis.
///
/// The axis passes through `origin` along the unit vector `axis`. A finite cylinder extends from
/// `origin` to `origin + length * axis` and is closed by flat caps; an infinite one has no caps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    origin: Point3,
    axis: Vec3,
    radius: f64,
    length: Option<f64>,
}

impl Cylinder {
    /// Finite cylinder between the centers of its two end caps.
    pub fn capped(start: Point3, end: Point3, radius: f64) -> Result<Self, ShapeError> {
        finite("cylinder", start)?;
        finite("cylinder", end)?;
        positive("cylinder", "radius", radius)?;
        let length = positive("cylinder", "length", start.distance_to(end))?;
        Ok(Self {
            origin: start,
            axis: (end - start) / length,
            radius,
            length: Some(length),
        })
    }

    /// Finite cylinder parallel to one of the coordinate axes, centered on `center`.
    pub fn aligned(axis: Axis, center: Point3, length: f64, radius: f64) -> Result<Self, ShapeError> {
        positive("cylinder", "length", length)?;
        let half = axis.unit() * (length * 0.5);
        Self::capped(center - half, center + half, radius)
    }

    /// Cylinder of infinite length through `origin` along `direction`.
    pub fn infinite(origin: Point3, direction: Vec3, radius: f64) -> Result<Self, ShapeError> {
        finite("infinite cylinder", origin)?;
        positive("infinite cylinder", "radius", radius)?;
        let norm = positive("infinite cylinder", "axis length", direction.norm())?;
        Ok(Self {
            origin,
            axis: direction / norm,
            radius,
            length: None,
        })
    }

    pub fn infinite_aligned(axis: Axis, center: Point3, radius: f64) -> Result<Self, ShapeError> {
        Self::infinite(center, axis.unit(), radius)
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }
    pub fn axis(&self) -> Vec3 {
        self.axis
    }
    pub fn radius(&self) -> f64 {
        self.radius
    }
    /// Axial length, or `None` for an infinite cylinder.
    pub fn length(&self) -> Option<f64> {
        self.length
    }
    /// Center of a finite cylinder, or the axis point it was built from if infinite.
    pub fn center(&self) -> Point3 {
        match self.length {
            Some(length) => self.origin + self.axis * (length * 0.5),
            None => self.origin,
        }
    }

    /// Same axis and axial extent, different radius.
    fn with_radius(&self, radius: f64) -> Self {
        Self { radius, ..*self }
    }

    /// Parameter span where the ray line is within `radius` of the axis.
    ///
    /// Solves |(o - c) + t d|_perp^2 = radius^2, where `_perp` drops the component along the
    /// axis. A non-positive discriminant is a miss or a tangent touch: no span.
    fn radial_span(&self, r: &Ray) -> Option<Interval> {
        let delta = r.origin - self.origin;
        let d_perp = r.dir.rejected_from(self.axis);
        let p_perp = delta.rejected_from(self.axis);
        let a = d_perp.norm_squared();
        let c = p_perp.norm_squared() - self.radius * self.radius;
        if a < PARALLEL_EPSILON {
            return (c <= 0.0).then(Interval::everything);
        }
        let b = 2.0 * d_perp.dot(p_perp);
        let discriminant = b * b - 4.0 * a * c;
        if discriminant <= 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        Some(Interval::new((-b - root) / (2.0 * a), (-b + root) / (2.0 * a)))
    }

    /// Parameter span where the ray line is between the two caps.
    fn axial_span(&self, r: &Ray) -> Option<Interval> {
        match self.length {
            None => Some(Interval::everything()),
            Some(length) => {
                let start = (r.origin - self.origin).dot(self.axis);
                slab_span(start, r.dir.dot(self.axis), 0.0, length)
            }
        }
    }

    fn span(&self, r: &Ray) -> Option<Interval> {
        self.radial_span(r)?.intersect(self.axial_span(r)?)
    }

    fn radial_distance_squared(&self, p: Point3) -> f64 {
        (p - self.origin).rejected_from(self.axis).norm_squared()
    }

    fn within_caps(&self, p: Point3) -> bool {
        match self.length {
            None => true,
            Some(length) => {
                let s = (p - self.origin).dot(self.axis);
                0.0 <= s && s <= length
            }
        }
    }
}

/// The region between two coaxial cylinders sharing the same axial extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annulus {
    outer: Cylinder,
    inner_radius: f64,
}

impl Annulus {
    pub fn capped(
        start: Point3, end: Point3, inner_radius: f64, outer_radius: f64,
    ) -> Result<Self, ShapeError> {
        Self::around(Cylinder::capped(start, end, outer_radius)?, inner_radius)
    }

    pub fn aligned(
        axis: Axis, center: Point3, length: f64, inner_radius: f64, outer_radius: f64,
    ) -> Result<Self, ShapeError> {
        Self::around(Cylinder::aligned(axis, center, length, outer_radius)?, inner_radius)
    }

    pub fn infinite(
        origin: Point3, direction: Vec3, inner_radius: f64, outer_radius: f64,
    ) -> Result<Self, ShapeError> {
        Self::around(Cylinder::infinite(origin, direction, outer_radius)?, inner_radius)
    }

    pub fn infinite_aligned(
        axis: Axis, center: Point3, inner_radius: f64, outer_radius: f64,
    ) -> Result<Self, ShapeError> {
        Self::infinite(center, axis.unit(), inner_radius, outer_radius)
    }

    fn around(outer: Cylinder, inner_radius: f64) -> Result<Self, ShapeError> {
        positive("annulus", "inner radius", inner_radius)?;
        if inner_radius >= outer.radius {
            return Err(ShapeError::InvertedRadii {
                shape: "annulus",
                inner: inner_radius,
                outer: outer.radius,
            });
        }
        Ok(Self {
            outer,
            inner_radius,
        })
    }

    pub fn outer(&self) -> Cylinder {
        self.outer
    }
    pub fn inner(&self) -> Cylinder {
        self.outer.with_radius(self.inner_radius)
    }
}

impl Solid for Cylinder {
    fn summary(&self) -> String {
        match self.length {
            Some(length) => format!(
                "Cylinder{{ from {} along {:.3} for {}, radius = {} }}",
                self.origin, self.axis, length, self.radius
            ),
            None => format!(
                "InfiniteCylinder{{ through {} along {:.3}, radius = {} }}",
                self.origin, self.axis, self.radius
            ),
        }
    }
    fn contains(&self, p: Point3) -> bool {
        self.within_caps(p) && self.radial_distance_squared(p) <= self.radius * self.radius
    }
    fn crossing_length(&self, r: &Ray) -> f64 {
        length_within(r, self.span(r))
    }
}

impl Solid for Annulus {
    fn summary(&self) -> String {
        format!(
            "Annulus{{ inner radius = {}, outer = {} }}",
            self.inner_radius,
            self.outer.summary()
        )
    }
    fn contains(&self, p: Point3) -> bool {
        self.outer.contains(p)
            && self.outer.radial_distance_squared(p) >= self.inner_radius * self.inner_radius
    }
    /// The inner cylinder is nested in the outer one along the same axial extent, so the length
    /// inside the annular region is the difference of the two crossings.
    fn crossing_length(&self, r: &Ray) -> f64 {
        let outer = self.outer.crossing_length(r);
        let inner = self.inner().crossing_length(r);
        (outer - inner).max(0.0)
    }
}
