use std::f64::consts::PI;

use math::float::linspace;
use math::hcm::{make_coord_system, vec3, Point3};
use shape::{Cuboid, Cylinder, Shape, Solid, Sphere};

use crate::SourceError;

/// A point emitter standing in for part of an extended source. `weight` is the length or volume
/// (cm or cm^3) of the element the point represents; a point source has weight 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub position: Point3,
    pub weight: f64,
}

/// Emission region of a source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceGeometry {
    Point(Point3),
    Line { start: Point3, end: Point3 },
    Box(Cuboid),
    /// A finite cylinder along any axis.
    Cylinder(Cylinder),
    Sphere(Sphere),
}

impl SourceGeometry {
    /// Number of grid dimensions used when discretizing the region.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::Point(_) => 0,
            Self::Line { .. } => 1,
            Self::Box(_) | Self::Cylinder(_) | Self::Sphere(_) => 3,
        }
    }

    /// The solid a ray from a sample point must leave; none for points and lines.
    pub fn solid(&self) -> Option<Shape> {
        match self {
            Self::Point(_) | Self::Line { .. } => None,
            Self::Box(b) => Some((*b).into()),
            Self::Cylinder(c) => Some((*c).into()),
            Self::Sphere(s) => Some((*s).into()),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Point(p) => format!("PointSource{{ {} }}", p),
            Self::Line { start, end } => format!("LineSource{{ {} -> {} }}", start, end),
            Self::Box(b) => format!("BoxSource{{ {} }}", b.summary()),
            Self::Cylinder(c) => format!("CylinderSource{{ {} }}", c.summary()),
            Self::Sphere(s) => format!("SphereSource{{ {} }}", s.summary()),
        }
    }

    /// Midpoint-rule discretization. `resolution` holds the points per dimension; a line uses
    /// the first entry, a box uses (x, y, z), a cylinder uses (radial, angular, axial) and a
    /// sphere uses (radial, polar, azimuthal).
    pub fn sample_points(&self, resolution: [usize; 3]) -> Result<Vec<SamplePoint>, SourceError> {
        let dims = self.dimensions();
        if let Some(&zero) = resolution[..dims].iter().find(|&&n| n == 0) {
            return Err(SourceError::InvalidResolution(zero));
        }
        let points = match self {
            Self::Point(p) => vec![SamplePoint {
                position: *p,
                weight: 1.0,
            }],
            Self::Line { start, end } => line_points(*start, *end, resolution[0]),
            Self::Box(b) => box_points(b, resolution),
            Self::Cylinder(c) => cylinder_points(c, resolution)?,
            Self::Sphere(s) => sphere_points(s, resolution),
        };
        Ok(points)
    }
}

fn line_points(start: Point3, end: Point3, count: usize) -> Vec<SamplePoint> {
    let (fractions, width) = linspace((0.0, 1.0), count);
    let length = start.distance_to(end);
    fractions
        .into_iter()
        .map(|f| SamplePoint {
            position: start + (end - start) * f,
            weight: length * width,
        })
        .collect()
}

fn box_points(b: &Cuboid, [nx, ny, nz]: [usize; 3]) -> Vec<SamplePoint> {
    let (min, max) = (b.min(), b.max());
    let (xs, dx) = linspace((min.x, max.x), nx);
    let (ys, dy) = linspace((min.y, max.y), ny);
    let (zs, dz) = linspace((min.z, max.z), nz);
    let weight = dx * dy * dz;
    let mut points = Vec::with_capacity(nx * ny * nz);
    for &x in xs.iter() {
        for &y in ys.iter() {
            for &z in zs.iter() {
                points.push(SamplePoint {
                    position: Point3::new(x, y, z),
                    weight,
                });
            }
        }
    }
    points
}

/// Cylinder points sit in equal-area annuli (one radius per annulus, midway between its
/// edges), at evenly spaced angles and axial midpoints, so every point carries the same volume.
fn cylinder_points(c: &Cylinder, [nr, na, nl]: [usize; 3]) -> Result<Vec<SamplePoint>, SourceError> {
    let length = c.length().ok_or(SourceError::Shape(shape::ShapeError::InvalidDimension {
        shape: "cylinder source",
        quantity: "length",
        value: f64::INFINITY,
    }))?;
    let radius = c.radius();
    let edges = (0..=nr)
        .map(|i| radius * (i as f64 / nr as f64).sqrt())
        .collect::<Vec<_>>();
    let radii = edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect::<Vec<_>>();
    let (angles, _) = linspace((0.0, 2.0 * PI), na);
    let (offsets, _) = linspace((0.0, length), nl);

    let (u, v) = make_coord_system(c.axis());
    let weight = PI * radius * radius * length / (nr * na * nl) as f64;
    let mut points = Vec::with_capacity(nr * na * nl);
    for &r in radii.iter() {
        for &theta in angles.iter() {
            let radial = u * (r * theta.cos()) + v * (r * theta.sin());
            for &s in offsets.iter() {
                points.push(SamplePoint {
                    position: c.origin() + c.axis() * s + radial,
                    weight,
                });
            }
        }
    }
    Ok(points)
}

/// Sphere points sit in equal-volume spherical shells, equal-volume polar bands (even steps in
/// the cosine of the polar angle) and even azimuthal steps, so every point carries the same volume.
fn sphere_points(s: &Sphere, [nr, np, na]: [usize; 3]) -> Vec<SamplePoint> {
    let radius = s.radius();
    let edges = (0..=nr)
        .map(|i| radius * (i as f64 / nr as f64).cbrt())
        .collect::<Vec<_>>();
    let radii = edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect::<Vec<_>>();
    let (cosines, _) = linspace((-1.0, 1.0), np);
    let (azimuths, _) = linspace((0.0, 2.0 * PI), na);

    let weight = 4.0 / 3.0 * PI * radius.powi(3) / (nr * np * na) as f64;
    let mut points = Vec::with_capacity(nr * np * na);
    for &r in radii.iter() {
        for &cos_theta in cosines.iter() {
            let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
            for &phi in azimuths.iter() {
                let direction = vec3(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
                points.push(SamplePoint {
                    position: s.center() + direction * r,
                    weight,
                });
            }
        }
    }
    points
}
