mod cylindrical;
mod simple;

use enum_dispatch::enum_dispatch;
use geometry::ray::Ray;
use math::float::Interval;
use math::hcm::Point3;
use thiserror::Error;

pub use cylindrical::*;
pub use simple::*;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    #[error("{shape}: {quantity} must be positive and finite, got {value}")]
    InvalidDimension {
        shape: &'static str,
        quantity: &'static str,
        value: f64,
    },
    #[error("{shape}: inner radius {inner} must be smaller than outer radius {outer}")]
    InvertedRadii {
        shape: &'static str,
        inner: f64,
        outer: f64,
    },
    #[error("{shape}: location {location} is not finite")]
    NotFinite {
        shape: &'static str,
        location: Point3,
    },
}

/// Represents the characteristics of a solid body: it can tell whether it contains a point, and
/// how much of a finite ray segment lies inside it.
/// - See `simple.rs` for the planar and spherical solids: `SemiInfiniteSlab`, `Cuboid`, `Sphere`
///   and the spherical `Shell`.
/// - See `cylindrical.rs` for `Cylinder` and `Annulus`, finite or infinite, along any axis.
///
/// Boundaries are inclusive. A ray that only grazes a solid (touches a face edge-on, or is tangent
/// to a curved surface) accumulates zero length.
#[enum_dispatch]
pub trait Solid {
    fn summary(&self) -> String;
    fn contains(&self, p: Point3) -> bool;
    /// Length (centimeters) of the part of `r` that lies inside the solid.
    fn crossing_length(&self, r: &Ray) -> f64;
}

/// Closed set of solids used by shields and sources.
#[enum_dispatch(Solid)]
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    SemiInfiniteSlab,
    Cuboid,
    Sphere,
    Shell,
    Cylinder,
    Annulus,
}

/// Rays whose direction component (or squared perpendicular component) along some axis is below
/// this are treated as parallel to that axis.
pub(crate) const PARALLEL_EPSILON: f64 = 1e-12;

/// Length of the overlap between the parameter span `span` and the ray extent `[0, r.length]`.
pub(crate) fn length_within(r: &Ray, span: Option<Interval>) -> f64 {
    span.and_then(|s| s.intersect(Interval::new(0.0, r.length)))
        .map_or(0.0, |s| s.length())
}

/// Parameter span where `origin + t * dir` lies between two parallel planes, measured along a
/// coordinate that starts at `start` and changes by `rate` per unit `t`.
/// Returns `everything` for a ray parallel to the planes that runs between them.
pub(crate) fn slab_span(start: f64, rate: f64, low: f64, high: f64) -> Option<Interval> {
    if rate.abs() < PARALLEL_EPSILON {
        (low <= start && start <= high).then(Interval::everything)
    } else {
        Some(Interval::new((low - start) / rate, (high - start) / rate))
    }
}

pub(crate) fn positive(shape: &'static str, quantity: &'static str, value: f64) -> Result<f64, ShapeError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ShapeError::InvalidDimension {
            shape,
            quantity,
            value,
        })
    }
}

pub(crate) fn finite(shape: &'static str, location: Point3) -> Result<Point3, ShapeError> {
    if location.is_finite() {
        Ok(location)
    } else {
        Err(ShapeError::NotFinite { shape, location })
    }
}
