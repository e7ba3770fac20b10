/// Defines useful functions for common math operations, tools and constants:
/// - 1D interval with intersection,
/// - Midpoint and inclusive `linspace`,
/// - Macros to check if two math quantities are less than / greater than (or equal to) each other.
pub mod float;

/// Homogeneous-coordinate maths module.
/// - Types: 3D points and vectors, and the cartesian `Axis`.
/// - Function `make_coord_system()` to build an orthogonal base from a `Vec3`.
pub mod hcm;

/// Log-log interpolation over tabulated data, with power-law extrapolation past the table ends.
pub mod interp;

pub use hcm::{point3, vec3, Axis, Point3, Vec3};
