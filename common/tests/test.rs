use common::shapes::*;
use common::Body;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_new_and_getters() {
    let bb = BoundaryBox::new(0.0, 4.0, 0.0, 6.0);
    assert_eq!(bb.width(), 4.0);
    assert_eq!(bb.height(), 6.0);
}

#[test]
fn test_contains_point_is_half_open() {
    let bb = BoundaryBox::new(0.0, 4.0, 0.0, 6.0);
    assert!(bb.contains_point(0.0, 0.0));
    assert!(bb.contains_point(3.99, 5.99));
    assert!(!bb.contains_point(4.0, 3.0));
    assert!(!bb.contains_point(2.0, 6.0));
    assert!(bb.contains_point_inclusive(4.0, 6.0));
}

#[test]
fn test_from_bodies() {
    let bodies = [Body::new(1.0, 5.0), Body::new(-2.0, 3.0), Body::new(4.0, 9.0)];
    let bb = BoundaryBox::from_bodies(bodies.iter());
    assert_eq!(bb, BoundaryBox::new(-2.0, 4.0, 3.0, 9.0));
}

#[test]
fn test_from_no_bodies_is_empty() {
    let bodies: Vec<Body> = Vec::new();
    assert_eq!(BoundaryBox::from_bodies(bodies.iter()), BoundaryBox::empty());
}

#[test]
fn test_update_rewrites_in_place() {
    let mut bb = BoundaryBox::new(1.0, 2.0, 3.0, 4.0);
    bb.update(-1.0, 1.0, -2.0, 2.0);
    assert_eq!(bb, BoundaryBox::new(-1.0, 1.0, -2.0, 2.0));
}

#[test]
fn test_is_degenerate() {
    assert!(BoundaryBox::empty().is_degenerate(1e-5));
    assert!(!BoundaryBox::new(0.0, 0.0, 0.0, 1.0).is_degenerate(1e-5));
}

#[test]
fn test_distance_to_point() {
    let bb = BoundaryBox::new(0.0, 4.0, 0.0, 6.0);
    assert_eq!(bb.distance_to_point(2.0, 3.0), 0.0);
    assert_eq!(bb.distance_to_point(6.0, 3.0), 4.0);
    assert_eq!(bb.distance_to_point(2.0, 8.0), 4.0);
}

#[test]
fn test_get_random_point_inside() {
    let bb = BoundaryBox::new(-1.0, 5.0, -1.0, 7.0);

    // Use a fixed seed for reproducibility.
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    for _ in 0..10 {
        let (x, y) = bb.get_random_point_inside(1.0, &mut rng);
        assert!(bb.contains_point(x, y));
    }
}

#[test]
fn test_get_random_point_inside_small_box() {
    let bb = BoundaryBox::new(1.0, 3.0, 2.0, 4.0);
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    // Margin larger than the box clamps to the left/top edge plus margin.
    let (x, y) = bb.get_random_point_inside(2.0, &mut rng);
    assert_eq!(x, 3.0);
    assert_eq!(y, 4.0);
}
