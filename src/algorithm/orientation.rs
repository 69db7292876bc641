use geo::kernels::{Kernel, Orientation, RobustKernel};
use geo_types::Coord;

/// Relative error bound of the double-precision determinant below.
const DP_SAFE_EPSILON: f64 = 1e-15;

/// Orientation of `r` relative to the directed segment `p -> q`.
///
/// The determinant is first evaluated in plain double precision. If its
/// magnitude is within the forward error bound the sign cannot be trusted,
/// so the test is re-run with the exact adaptive predicate. Returns `None`
/// only when the input is not finite, in which case no predicate can give
/// a consistent answer.
pub fn orientation(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> Option<Orientation> {
    if !is_finite(p) || !is_finite(q) || !is_finite(r) {
        return None;
    }
    if let Some(o) = orientation_filter(p, q, r) {
        return Some(o);
    }
    Some(RobustKernel::orient2d(p, q, r))
}

/// Fast path. `None` means the double-precision sign is unreliable.
fn orientation_filter(pa: Coord<f64>, pb: Coord<f64>, pc: Coord<f64>) -> Option<Orientation> {
    let detleft = (pa.x - pc.x) * (pb.y - pc.y);
    let detright = (pa.y - pc.y) * (pb.x - pc.x);
    let det = detleft - detright;

    let detsum = if detleft > 0.0 {
        if detright <= 0.0 {
            return Some(sign(det));
        }
        detleft + detright
    } else if detleft < 0.0 {
        if detright >= 0.0 {
            return Some(sign(det));
        }
        -detleft - detright
    } else {
        return Some(sign(det));
    };

    let errbound = DP_SAFE_EPSILON * detsum;
    if det >= errbound || -det >= errbound {
        return Some(sign(det));
    }
    None
}

fn sign(det: f64) -> Orientation {
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

#[inline]
fn is_finite(c: Coord<f64>) -> bool {
    c.x.is_finite() && c.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_basic_orientation() {
        let p = c(0.0, 0.0);
        let q = c(10.0, 0.0);
        assert_eq!(orientation(p, q, c(5.0, 1.0)), Some(Orientation::CounterClockwise));
        assert_eq!(orientation(p, q, c(5.0, -1.0)), Some(Orientation::Clockwise));
        assert_eq!(orientation(p, q, c(20.0, 0.0)), Some(Orientation::Collinear));
    }

    #[test]
    fn test_near_collinear_is_consistent() {
        // Classic failure case for naive determinants: the three points lie on
        // y = x up to representation error.
        let p = c(0.1, 0.1);
        let q = c(0.3, 0.3);
        let r = c(0.2, 0.2);
        let a = orientation(p, q, r);
        let b = orientation(q, p, r);
        assert!(a.is_some());
        match (a, b) {
            (Some(Orientation::Collinear), Some(Orientation::Collinear)) => {}
            (Some(Orientation::CounterClockwise), Some(Orientation::Clockwise)) => {}
            (Some(Orientation::Clockwise), Some(Orientation::CounterClockwise)) => {}
            other => panic!("inconsistent orientation under reversal: {:?}", other),
        }
    }

    #[test]
    fn test_filter_defers_on_tiny_determinant() {
        let p = c(1e15, 1e15);
        let q = c(1e15 + 2.0, 1e15 + 2.0);
        let r = c(1e15 + 1.0, 1e15 + 1.0);
        assert_eq!(orientation(p, q, r), Some(Orientation::Collinear));
    }

    #[test]
    fn test_non_finite_is_unresolved() {
        assert_eq!(orientation(c(0.0, 0.0), c(f64::NAN, 1.0), c(1.0, 1.0)), None);
        assert_eq!(orientation(c(0.0, 0.0), c(1.0, 1.0), c(f64::INFINITY, 1.0)), None);
    }
}
