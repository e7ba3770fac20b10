use approx::{assert_abs_diff_eq, assert_relative_eq};
use geometry::Ray;
use math::hcm::{point3, vec3, Axis, Point3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use shape::{Annulus, Cuboid, Cylinder, SemiInfiniteSlab, Shape, ShapeError, Shell, Solid, Sphere};

fn ray(a: (f64, f64, f64), b: (f64, f64, f64)) -> Ray {
    Ray::between(Point3::from(a), Point3::from(b)).unwrap()
}

fn random_point(rng: &mut StdRng, half_width: f64) -> Point3 {
    point3(
        rng.gen_range(-half_width..half_width),
        rng.gen_range(-half_width..half_width),
        rng.gen_range(-half_width..half_width),
    )
}

fn every_shape() -> Vec<Shape> {
    vec![
        SemiInfiniteSlab::new(Axis::X, 10.0, 20.0).unwrap().into(),
        SemiInfiniteSlab::new(Axis::Z, -5.0, 5.0).unwrap().into(),
        Cuboid::new(point3(1.0, 2.0, 3.0), vec3(4.0, 6.0, 8.0)).unwrap().into(),
        Sphere::new(point3(0.0, 0.0, 5.0), 7.0).unwrap().into(),
        Shell::new(point3(0.0, -2.0, 1.0), 3.0, 8.0).unwrap().into(),
        Cylinder::aligned(Axis::Y, point3(1.0, 0.0, -1.0), 12.0, 3.0).unwrap().into(),
        Cylinder::capped(point3(-3.0, -3.0, -3.0), point3(4.0, 5.0, 6.0), 2.5).unwrap().into(),
        Cylinder::infinite_aligned(Axis::Z, point3(2.0, 2.0, 0.0), 4.0).unwrap().into(),
        Annulus::aligned(Axis::X, Point3::ORIGIN, 10.0, 2.0, 6.0).unwrap().into(),
        Annulus::infinite(point3(0.0, 1.0, 0.0), vec3(1.0, 1.0, 0.0), 1.0, 3.0).unwrap().into(),
    ]
}

// Semi-infinite slab
// ------------------------------------------------------------------------------------------------

#[test]
fn slab_diagonal_crossing() {
    let slab = SemiInfiniteSlab::new(Axis::X, 10.0, 20.0).unwrap();
    let r = ray((0.0, 0.0, 0.0), (30.0, 30.0, 30.0));
    assert_relative_eq!(slab.crossing_length(&r), 17.320508075688775, max_relative = 1e-12);
    assert_relative_eq!(slab.crossing_length(&r.reversed()), 17.320508075688775, max_relative = 1e-12);
}

#[test]
fn slab_partial_crossings() {
    let slab = SemiInfiniteSlab::new(Axis::X, 20.0, 10.0).unwrap();
    let full = 17.320508075688775;
    // Starts inside, leaves.
    assert_relative_eq!(slab.crossing_length(&ray((15.0, 15.0, 15.0), (30.0, 30.0, 30.0))), full / 2.0, max_relative = 1e-12);
    // Starts outside, ends inside.
    assert_relative_eq!(slab.crossing_length(&ray((0.0, 0.0, 0.0), (15.0, 15.0, 15.0))), full / 2.0, max_relative = 1e-12);
    // Entirely inside.
    assert_relative_eq!(slab.crossing_length(&ray((11.0, 11.0, 11.0), (16.0, 16.0, 16.0))), 75f64.sqrt(), max_relative = 1e-12);
    // Misses.
    assert_eq!(slab.crossing_length(&ray((30.0, 0.0, 0.0), (30.0, 0.0, 30.0))), 0.0);
}

#[test]
fn slab_parallel_rays() {
    let slab = SemiInfiniteSlab::new(Axis::Y, 0.0, 1.0).unwrap();
    let inside = ray((0.0, 0.5, 0.0), (100.0, 0.5, 50.0));
    assert_relative_eq!(slab.crossing_length(&inside), inside.length);
    // On the face: boundary is inclusive.
    let on_face = ray((0.0, 1.0, 0.0), (10.0, 1.0, 0.0));
    assert_relative_eq!(slab.crossing_length(&on_face), 10.0);
    assert_eq!(slab.crossing_length(&ray((0.0, 2.0, 0.0), (10.0, 2.0, 0.0))), 0.0);
}

#[test]
fn slab_rejects_zero_thickness() {
    assert!(matches!(
        SemiInfiniteSlab::new(Axis::Z, 3.0, 3.0),
        Err(ShapeError::InvalidDimension { .. })
    ));
}

// Box
// ------------------------------------------------------------------------------------------------

#[test]
fn box_perpendicular_thickness() {
    let b = Cuboid::new(point3(0.0, 0.0, 0.0), vec3(10.0, 20.0, 30.0)).unwrap();
    assert_relative_eq!(b.crossing_length(&ray((-50.0, 0.0, 0.0), (50.0, 0.0, 0.0))), 10.0);
    assert_relative_eq!(b.crossing_length(&ray((0.0, -50.0, 0.0), (0.0, 50.0, 0.0))), 20.0);
    assert_relative_eq!(b.crossing_length(&ray((0.0, 0.0, 50.0), (0.0, 0.0, -50.0))), 30.0);
}

#[test]
fn box_partial_and_missed() {
    let b = Cuboid::new(point3(4.0, 5.0, 6.0), vec3(10.0, 10.0, 10.0)).unwrap();
    // From the center out through the +x face.
    assert_relative_eq!(b.crossing_length(&ray((4.0, 5.0, 6.0), (40.0, 5.0, 6.0))), 5.0, max_relative = 1e-12);
    // Entirely inside.
    assert_relative_eq!(b.crossing_length(&ray((0.0, 1.0, 2.0), (1.0, 1.0, 2.0))), 1.0, max_relative = 1e-12);
    assert_eq!(b.crossing_length(&ray((20.0, 20.0, 20.0), (30.0, 20.0, 25.0))), 0.0);
    // Passes beside the box, parallel to a face.
    assert_eq!(b.crossing_length(&ray((-10.0, 11.0, 6.0), (20.0, 11.0, 6.0))), 0.0);
    // Stops short of the box.
    assert_eq!(b.crossing_length(&ray((-30.0, 5.0, 6.0), (-2.0, 5.0, 6.0))), 0.0);
}

#[test]
fn box_from_corners_matches_center_form() {
    let a = Cuboid::from_corners(point3(2.0, -1.0, 4.0), point3(-2.0, 3.0, 0.0)).unwrap();
    let b = Cuboid::new(point3(0.0, 1.0, 2.0), vec3(4.0, 4.0, 4.0)).unwrap();
    assert_eq!(a, b);
    assert_relative_eq!(a.volume(), 64.0);
}

// Sphere
// ------------------------------------------------------------------------------------------------

#[test]
fn sphere_through_center_and_from_inside() {
    let s = Sphere::new(point3(1.0, 1.0, 1.0), 2.0).unwrap();
    assert_relative_eq!(s.crossing_length(&ray((-10.0, 1.0, 1.0), (10.0, 1.0, 1.0))), 4.0, max_relative = 1e-12);
    assert_relative_eq!(s.crossing_length(&ray((1.0, 1.0, 1.0), (1.0, 1.0, 10.0))), 2.0, max_relative = 1e-12);
    // Chord at distance 1 from the center: 2 * sqrt(4 - 1).
    assert_relative_eq!(s.crossing_length(&ray((-10.0, 2.0, 1.0), (10.0, 2.0, 1.0))), 2.0 * 3f64.sqrt(), max_relative = 1e-12);
}

#[test]
fn sphere_tangent_is_zero() {
    let s = Sphere::new(Point3::ORIGIN, 1.0).unwrap();
    assert_eq!(s.crossing_length(&ray((-5.0, 1.0, 0.0), (5.0, 1.0, 0.0))), 0.0);
}

// Shell
// ------------------------------------------------------------------------------------------------

#[test]
fn shell_full_traverse() {
    let s = Shell::new(point3(1.0, 0.0, 0.0), 4.0, 5.5).unwrap();
    // Two walls of 1.5 cm each.
    assert_relative_eq!(s.crossing_length(&ray((-20.0, 0.0, 0.0), (20.0, 0.0, 0.0))), 3.0, max_relative = 1e-12);
    // From the cavity outwards: one wall.
    assert_relative_eq!(s.crossing_length(&ray((1.0, 0.0, 0.0), (1.0, 0.0, 30.0))), 1.5, max_relative = 1e-12);
    // Inside the cavity only.
    assert_eq!(s.crossing_length(&ray((0.0, -1.0, 0.0), (2.0, 1.0, 0.0))), 0.0);
    // Chord missing the cavity: 2 * sqrt(5.5^2 - 4.5^2).
    assert_relative_eq!(s.crossing_length(&ray((-20.0, 4.5, 0.0), (20.0, 4.5, 0.0))), 2.0 * 10f64.sqrt(), max_relative = 1e-12);
    assert!(s.contains(point3(1.0, 0.0, 5.0)));
    assert!(!s.contains(point3(1.0, 0.0, 3.0)));
}

#[test]
fn shell_is_outer_minus_inner() {
    let sphere = Sphere::new(point3(0.5, -1.0, 2.0), 3.0).unwrap();
    let shell = Shell::around(&sphere, 2.0).unwrap();
    assert_eq!(shell.inner(), sphere);
    assert_eq!(shell.outer().radius(), 5.0);
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..300 {
        let r = Ray::between(random_point(&mut rng, 10.0), random_point(&mut rng, 10.0)).unwrap();
        let expected = shell.outer().crossing_length(&r) - sphere.crossing_length(&r);
        assert_abs_diff_eq!(shell.crossing_length(&r), expected, epsilon = 1e-9);
    }
}

#[test]
fn shell_rejects_bad_radii() {
    assert!(matches!(
        Shell::new(Point3::ORIGIN, 5.0, 5.0),
        Err(ShapeError::InvertedRadii { .. })
    ));
    assert!(Shell::new(Point3::ORIGIN, 0.0, 5.0).is_err());
    assert!(Shell::around(&Sphere::new(Point3::ORIGIN, 1.0).unwrap(), 0.0).is_err());
}

// Cylinder
// ------------------------------------------------------------------------------------------------

#[test]
fn cylinder_crossings() {
    let c = Cylinder::aligned(Axis::Z, point3(0.0, 0.0, 0.0), 10.0, 2.0).unwrap();
    // Across the diameter.
    assert_relative_eq!(c.crossing_length(&ray((-5.0, 0.0, 1.0), (5.0, 0.0, 1.0))), 4.0, max_relative = 1e-12);
    // Along the axis, through both caps.
    assert_relative_eq!(c.crossing_length(&ray((0.0, 1.0, -20.0), (0.0, 1.0, 20.0))), 10.0, max_relative = 1e-12);
    // Beyond the caps.
    assert_eq!(c.crossing_length(&ray((-5.0, 0.0, 6.0), (5.0, 0.0, 6.0))), 0.0);
    // Enters through the side and leaves through a cap.
    let r = ray((-4.0, 0.0, 0.0), (4.0, 0.0, 8.0));
    // Side at x = -2 (z = 2), cap at z = 5 (x = 1).
    let expected = (point3(1.0, 0.0, 5.0) - point3(-2.0, 0.0, 2.0)).norm();
    assert_relative_eq!(c.crossing_length(&r), expected, max_relative = 1e-12);
}

#[test]
fn cylinder_tangent_is_zero() {
    let c = Cylinder::aligned(Axis::X, Point3::ORIGIN, 10.0, 1.0).unwrap();
    assert_eq!(c.crossing_length(&ray((0.0, -5.0, 1.0), (0.0, 5.0, 1.0))), 0.0);
}

#[test]
fn infinite_cylinder_has_no_caps() {
    let c = Cylinder::infinite_aligned(Axis::Y, Point3::ORIGIN, 3.0).unwrap();
    assert_relative_eq!(c.crossing_length(&ray((0.0, -1e4, 0.0), (0.0, 1e4, 0.0))), 2e4, max_relative = 1e-12);
    assert_relative_eq!(c.crossing_length(&ray((-10.0, 500.0, 0.0), (10.0, 500.0, 0.0))), 6.0, max_relative = 1e-12);
}

#[test]
fn arbitrary_axis_cylinder_matches_aligned_one() {
    let aligned = Cylinder::aligned(Axis::Z, point3(0.0, 0.0, 5.0), 10.0, 2.0).unwrap();
    let capped = Cylinder::capped(point3(0.0, 0.0, 0.0), point3(0.0, 0.0, 10.0), 2.0).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let r = Ray::between(random_point(&mut rng, 15.0), random_point(&mut rng, 15.0)).unwrap();
        assert_abs_diff_eq!(aligned.crossing_length(&r), capped.crossing_length(&r), epsilon = 1e-9);
    }
}

#[test]
fn cylinder_rejects_bad_dimensions() {
    assert!(Cylinder::aligned(Axis::Z, Point3::ORIGIN, 10.0, 0.0).is_err());
    assert!(Cylinder::aligned(Axis::Z, Point3::ORIGIN, -1.0, 1.0).is_err());
    assert!(Cylinder::capped(Point3::ORIGIN, Point3::ORIGIN, 1.0).is_err());
    assert!(Cylinder::infinite(Point3::ORIGIN, vec3(0.0, 0.0, 0.0), 1.0).is_err());
}

// Annulus
// ------------------------------------------------------------------------------------------------

#[test]
fn annulus_full_traverse() {
    let a = Annulus::infinite_aligned(Axis::Z, Point3::ORIGIN, 2.0, 5.0).unwrap();
    // Two walls of 3 cm each.
    assert_relative_eq!(a.crossing_length(&ray((-10.0, 0.0, 0.0), (10.0, 0.0, 0.0))), 6.0, max_relative = 1e-12);
    // From the bore outwards: one wall.
    assert_relative_eq!(a.crossing_length(&ray((0.0, 0.0, 0.0), (0.0, 10.0, 0.0))), 3.0, max_relative = 1e-12);
    // Inside the bore only.
    assert_eq!(a.crossing_length(&ray((-1.0, 0.0, 0.0), (1.0, 0.0, 0.0))), 0.0);
}

#[test]
fn annulus_is_outer_minus_inner() {
    let shapes = [
        Annulus::aligned(Axis::X, point3(1.0, -2.0, 0.5), 8.0, 1.5, 4.0).unwrap(),
        Annulus::aligned(Axis::Y, Point3::ORIGIN, 20.0, 3.0, 3.5).unwrap(),
        Annulus::infinite_aligned(Axis::Z, point3(0.0, 1.0, 0.0), 1.0, 6.0).unwrap(),
        Annulus::capped(point3(-2.0, 0.0, 1.0), point3(3.0, 4.0, 5.0), 0.5, 2.0).unwrap(),
    ];
    let mut rng = StdRng::seed_from_u64(11);
    for annulus in shapes.iter() {
        for _ in 0..300 {
            let r = Ray::between(random_point(&mut rng, 12.0), random_point(&mut rng, 12.0)).unwrap();
            let expected = annulus.outer().crossing_length(&r) - annulus.inner().crossing_length(&r);
            assert_abs_diff_eq!(annulus.crossing_length(&r), expected, epsilon = 1e-9);
        }
    }
}

#[test]
fn annulus_rejects_inverted_radii() {
    assert!(matches!(
        Annulus::aligned(Axis::Z, Point3::ORIGIN, 1.0, 3.0, 2.0),
        Err(ShapeError::InvertedRadii { .. })
    ));
}

// Properties shared by every shape
// ------------------------------------------------------------------------------------------------

#[test]
fn rays_outside_every_shape_cross_nothing() {
    // Every test shape is within |x|, |y|, |z| < 30 except the unbounded directions; this ray runs
    // far away along a direction none of them extends to.
    let r = ray((500.0, 500.0, 500.0), (600.0, 520.0, 480.0));
    for s in every_shape() {
        // Slabs and infinite shapes extend far; only check those the ray really misses.
        if s.contains(r.origin) || s.contains(r.end) {
            continue;
        }
        assert_eq!(s.crossing_length(&r), 0.0, "{}", s.summary());
    }
}

#[test]
fn crossing_length_is_symmetric_and_bounded() {
    let mut rng = StdRng::seed_from_u64(3);
    for s in every_shape() {
        for _ in 0..200 {
            let r = Ray::between(random_point(&mut rng, 25.0), random_point(&mut rng, 25.0)).unwrap();
            let forward = s.crossing_length(&r);
            let backward = s.crossing_length(&r.reversed());
            assert_abs_diff_eq!(forward, backward, epsilon = 1e-9);
            math::assert_ge!(forward, 0.0);
            math::assert_le!(forward, r.length + 1e-9);
        }
    }
}

#[test]
fn rays_inside_convex_shapes_are_fully_counted() {
    let mut rng = StdRng::seed_from_u64(5);
    // Annuli and shells are not convex: a chord between two points of the wall may cross the
    // hollow.
    for s in every_shape()
        .into_iter()
        .filter(|s| !matches!(s, Shape::Annulus(_) | Shape::Shell(_)))
    {
        for _ in 0..20 {
            let a = sample_inside(&s, &mut rng);
            let b = sample_inside(&s, &mut rng);
            let r = match Ray::between(a, b) {
                Ok(r) => r,
                Err(_) => continue,
            };
            assert_relative_eq!(s.crossing_length(&r), r.length, max_relative = 1e-9);
        }
    }
}

fn sample_inside(s: &Shape, rng: &mut StdRng) -> Point3 {
    loop {
        let p = random_point(rng, 25.0);
        if s.contains(p) {
            return p;
        }
    }
}
