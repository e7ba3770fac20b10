/// Defines the finite `Ray` segment shared by every shape and source intersection routine.
pub mod ray;

pub use ray::{Ray, RayError};
