use super::*;
use approx::assert_relative_eq;

fn c(x: f64, y: f64) -> Coord<f64> {
    Coord { x, y }
}

#[test]
fn test_proper_crossing() {
    let mut li = LineIntersector::new();
    let res = li.compute(c(0.0, 0.0), c(10.0, 10.0), c(0.0, 10.0), c(10.0, 0.0));
    match res {
        SegmentIntersection::Proper { point } => {
            assert_relative_eq!(point.x, 5.0);
            assert_relative_eq!(point.y, 5.0);
        }
        other => panic!("expected proper intersection, got {:?}", other),
    }
    assert_eq!(li.stats.proper, 1);
    assert_eq!(li.stats.intersections, 1);
}

#[test]
fn test_disjoint() {
    let mut li = LineIntersector::new();
    let res = li.compute(c(0.0, 0.0), c(10.0, 0.0), c(0.0, 1.0), c(10.0, 2.0));
    assert_eq!(res, SegmentIntersection::None);
    // Overlapping envelopes, no contact.
    let res = li.compute(c(0.0, 0.0), c(10.0, 10.0), c(6.0, 4.0), c(10.0, 0.0));
    assert_eq!(res, SegmentIntersection::None);
    assert_eq!(li.stats.tests, 2);
    assert_eq!(li.stats.intersections, 0);
}

#[test]
fn test_shared_vertex() {
    let mut li = LineIntersector::new();
    let res = li.compute(c(0.0, 0.0), c(10.0, 0.0), c(10.0, 0.0), c(5.0, 5.0));
    assert_eq!(res, SegmentIntersection::Endpoint { point: c(10.0, 0.0) });
    assert!(!res.is_interior_to((c(0.0, 0.0), c(10.0, 0.0))));
    assert!(!res.is_interior_to((c(10.0, 0.0), c(5.0, 5.0))));
}

#[test]
fn test_t_junction_is_proper() {
    let mut li = LineIntersector::new();
    let a = (c(0.0, 0.0), c(10.0, 0.0));
    let b = (c(5.0, 0.0), c(5.0, 5.0));
    let res = li.compute(a.0, a.1, b.0, b.1);
    assert_eq!(res, SegmentIntersection::Proper { point: c(5.0, 0.0) });
    assert!(res.is_proper());
    assert!(res.is_interior_to(a));
    assert!(!res.is_interior_to(b));
    assert_eq!(li.stats.proper, 1);
}

#[test]
fn test_vertex_touching_segment_interior_is_proper() {
    let mut li = LineIntersector::new();
    let res = li.compute(c(5.0, 0.0), c(5.0, 5.0), c(0.0, 0.0), c(10.0, 0.0));
    assert_eq!(res, SegmentIntersection::Proper { point: c(5.0, 0.0) });
    assert!(res.is_interior_to((c(0.0, 0.0), c(10.0, 0.0))));
    assert_eq!(li.stats.proper, 1);
}

#[test]
fn test_collinear_overlap() {
    let mut li = LineIntersector::new();
    let res = li.compute(c(0.0, 0.0), c(10.0, 0.0), c(5.0, 0.0), c(15.0, 0.0));
    match res {
        SegmentIntersection::Collinear { start, end } => {
            let mut xs = [start.x, end.x];
            xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(xs, [5.0, 10.0]);
        }
        other => panic!("expected collinear overlap, got {:?}", other),
    }
    assert_eq!(li.stats.collinear, 1);
}

#[test]
fn test_collinear_touch_is_endpoint() {
    let mut li = LineIntersector::new();
    let res = li.compute(c(0.0, 0.0), c(5.0, 0.0), c(5.0, 0.0), c(15.0, 0.0));
    assert_eq!(res, SegmentIntersection::Endpoint { point: c(5.0, 0.0) });
}

#[test]
fn test_contained_collinear() {
    let mut li = LineIntersector::new();
    let res = li.compute(c(0.0, 0.0), c(10.0, 10.0), c(2.0, 2.0), c(3.0, 3.0));
    assert_eq!(
        res,
        SegmentIntersection::Collinear { start: c(2.0, 2.0), end: c(3.0, 3.0) }
    );
}

#[test]
fn test_nearly_parallel_point_stays_in_envelope() {
    let mut li = LineIntersector::new();
    let p1 = c(0.0, 0.0);
    let p2 = c(1.0e6, 1.0);
    let q1 = c(0.0, 1.0e-7);
    let q2 = c(1.0e6, 1.0 - 1.0e-7);
    if let SegmentIntersection::Proper { point } = li.compute(p1, p2, q1, q2) {
        assert!(point.x >= 0.0 && point.x <= 1.0e6);
        assert!(point.y >= 0.0 && point.y <= 1.0);
    }
}

#[test]
fn test_nan_is_counted_as_ambiguous() {
    let mut li = LineIntersector::new();
    let res = li.compute(c(0.0, 0.0), c(10.0, 10.0), c(f64::NAN, 0.0), c(10.0, 0.0));
    assert_eq!(res, SegmentIntersection::None);
    assert_eq!(li.stats.ambiguous, 1);
}

#[test]
fn test_stats_merge() {
    let mut a = IntersectionStats { tests: 2, intersections: 1, proper: 1, collinear: 0, ambiguous: 0 };
    let b = IntersectionStats { tests: 3, intersections: 2, proper: 0, collinear: 1, ambiguous: 1 };
    a.merge(&b);
    assert_eq!(a, IntersectionStats { tests: 5, intersections: 3, proper: 1, collinear: 1, ambiguous: 1 });
}
