use std::fmt::{Display, Formatter};

use math::hcm::{Point3, Vec3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RayError {
    #[error("ray from {start} to {end} has zero length")]
    Degenerate { start: Point3, end: Point3 },
    #[error("ray endpoint {0} is not finite")]
    NotFinite(Point3),
}

/// Represents a finite ray segment:
///
///   origin + t * dir,  t in [0, length]
///
/// where `dir` has unit length. A `Ray` is built once from its two endpoints and never changes;
/// every solid intersection routine reads the same segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub end: Point3,
    pub dir: Vec3,
    pub length: f64,
}

impl Ray {
    /// Builds the segment from `start` to `end`. Fails when the two points coincide.
    pub fn between(start: Point3, end: Point3) -> Result<Self, RayError> {
        if !start.is_finite() {
            return Err(RayError::NotFinite(start));
        }
        if !end.is_finite() {
            return Err(RayError::NotFinite(end));
        }
        let v = end - start;
        let length = v.norm();
        if length == 0.0 {
            return Err(RayError::Degenerate { start, end });
        }
        Ok(Ray {
            origin: start,
            end,
            dir: v / length,
            length,
        })
    }

    /// Returns the same segment traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        Ray {
            origin: self.end,
            end: self.origin,
            dir: -self.dir,
            length: self.length,
        }
    }

    /// Position at distance `t` (centimeters) from the origin.
    pub fn position_at(&self, t: f64) -> Point3 {
        self.origin + t * self.dir
    }

    /// Position at fraction `f` of the segment: 0 is the origin, 1 is the end.
    pub fn point_at(&self, f: f64) -> Point3 {
        if f == 1.0 {
            self.end
        } else {
            self.position_at(f * self.length)
        }
    }
}

impl Display for Ray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(
            f,
            "{:.precision$} -> {:.precision$} (length {:.precision$})",
            self.origin,
            self.end,
            self.length,
            precision = precision
        )
    }
}
