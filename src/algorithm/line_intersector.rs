use geo::kernels::Orientation;
use geo_types::Coord;
use smallvec::{smallvec, SmallVec};

use super::orientation::orientation;

/// Relationship between two segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentIntersection {
    None,
    /// Single point interior to at least one segment (crossings and T-junctions).
    Proper { point: Coord<f64> },
    /// Single point that is a vertex of both segments.
    Endpoint { point: Coord<f64> },
    /// Collinear segments sharing the interval `start..end`.
    Collinear { start: Coord<f64>, end: Coord<f64> },
}

impl SegmentIntersection {
    pub fn has_intersection(&self) -> bool {
        !matches!(self, SegmentIntersection::None)
    }

    pub fn is_proper(&self) -> bool {
        matches!(self, SegmentIntersection::Proper { .. })
    }

    pub fn points(&self) -> SmallVec<[Coord<f64>; 2]> {
        match *self {
            SegmentIntersection::None => SmallVec::new(),
            SegmentIntersection::Proper { point } | SegmentIntersection::Endpoint { point } => {
                smallvec![point]
            }
            SegmentIntersection::Collinear { start, end } => smallvec![start, end],
        }
    }

    /// True if some intersection point is not a vertex of `segment`.
    pub fn is_interior_to(&self, segment: (Coord<f64>, Coord<f64>)) -> bool {
        self.points()
            .iter()
            .any(|p| *p != segment.0 && *p != segment.1)
    }
}

/// Running totals kept by a [`LineIntersector`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntersectionStats {
    pub tests: usize,
    pub intersections: usize,
    pub proper: usize,
    pub collinear: usize,
    /// Pairs whose orientation could not be resolved and were treated as disjoint.
    pub ambiguous: usize,
}

impl IntersectionStats {
    pub fn merge(&mut self, other: &IntersectionStats) {
        self.tests += other.tests;
        self.intersections += other.intersections;
        self.proper += other.proper;
        self.collinear += other.collinear;
        self.ambiguous += other.ambiguous;
    }
}

/// Classifies segment pairs using the filtered orientation predicate.
#[derive(Clone, Debug, Default)]
pub struct LineIntersector {
    pub stats: IntersectionStats,
}

impl LineIntersector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute(
        &mut self,
        p1: Coord<f64>,
        p2: Coord<f64>,
        q1: Coord<f64>,
        q2: Coord<f64>,
    ) -> SegmentIntersection {
        self.stats.tests += 1;
        let result = match classify(p1, p2, q1, q2) {
            Some(r) => r,
            None => {
                self.stats.ambiguous += 1;
                log::trace!(
                    "unresolved orientation for {:?}-{:?} / {:?}-{:?}",
                    p1, p2, q1, q2
                );
                SegmentIntersection::None
            }
        };
        match result {
            SegmentIntersection::None => {}
            SegmentIntersection::Proper { .. } => {
                self.stats.intersections += 1;
                self.stats.proper += 1;
            }
            SegmentIntersection::Endpoint { .. } => self.stats.intersections += 1,
            SegmentIntersection::Collinear { .. } => {
                self.stats.intersections += 1;
                self.stats.collinear += 1;
            }
        }
        result
    }
}

/// `None` when some orientation could not be resolved.
fn classify(
    p1: Coord<f64>,
    p2: Coord<f64>,
    q1: Coord<f64>,
    q2: Coord<f64>,
) -> Option<SegmentIntersection> {
    if !envelopes_intersect(p1, p2, q1, q2) {
        return Some(SegmentIntersection::None);
    }

    let pq1 = orientation(p1, p2, q1)?;
    let pq2 = orientation(p1, p2, q2)?;
    if same_side(pq1, pq2) {
        return Some(SegmentIntersection::None);
    }

    let qp1 = orientation(q1, q2, p1)?;
    let qp2 = orientation(q1, q2, p2)?;
    if same_side(qp1, qp2) {
        return Some(SegmentIntersection::None);
    }

    use Orientation::Collinear as C;
    if pq1 == C && pq2 == C && qp1 == C && qp2 == C {
        return Some(collinear_intersection(p1, p2, q1, q2));
    }

    if pq1 == C || pq2 == C || qp1 == C || qp2 == C {
        // Exact vertex equality is checked first so a shared vertex is
        // reported verbatim rather than as the other segment's endpoint.
        let point = if p1 == q1 || p1 == q2 {
            p1
        } else if p2 == q1 || p2 == q2 {
            p2
        } else if pq1 == C {
            q1
        } else if pq2 == C {
            q2
        } else if qp1 == C {
            p1
        } else {
            p2
        };
        return Some(single_point(p1, p2, q1, q2, point));
    }

    Some(SegmentIntersection::Proper {
        point: proper_intersection_point(p1, p2, q1, q2),
    })
}

fn same_side(a: Orientation, b: Orientation) -> bool {
    matches!(
        (a, b),
        (Orientation::CounterClockwise, Orientation::CounterClockwise)
            | (Orientation::Clockwise, Orientation::Clockwise)
    )
}

fn collinear_intersection(
    p1: Coord<f64>,
    p2: Coord<f64>,
    q1: Coord<f64>,
    q2: Coord<f64>,
) -> SegmentIntersection {
    let p1q1p2 = in_envelope(p1, p2, q1);
    let p1q2p2 = in_envelope(p1, p2, q2);
    let q1p1q2 = in_envelope(q1, q2, p1);
    let q1p2q2 = in_envelope(q1, q2, p2);

    if p1q1p2 && p1q2p2 {
        return overlap(p1, p2, q1, q2, q1, q2);
    }
    if q1p1q2 && q1p2q2 {
        return overlap(p1, p2, q1, q2, p1, p2);
    }
    if p1q1p2 && q1p1q2 {
        return overlap(p1, p2, q1, q2, q1, p1);
    }
    if p1q1p2 && q1p2q2 {
        return overlap(p1, p2, q1, q2, q1, p2);
    }
    if p1q2p2 && q1p1q2 {
        return overlap(p1, p2, q1, q2, q2, p1);
    }
    if p1q2p2 && q1p2q2 {
        return overlap(p1, p2, q1, q2, q2, p2);
    }
    SegmentIntersection::None
}

/// Classifies a single contact point: `Endpoint` when it is a vertex of
/// both segments, `Proper` otherwise.
fn single_point(
    p1: Coord<f64>,
    p2: Coord<f64>,
    q1: Coord<f64>,
    q2: Coord<f64>,
    point: Coord<f64>,
) -> SegmentIntersection {
    let on_p = point == p1 || point == p2;
    let on_q = point == q1 || point == q2;
    if on_p && on_q {
        SegmentIntersection::Endpoint { point }
    } else {
        SegmentIntersection::Proper { point }
    }
}

fn overlap(
    p1: Coord<f64>,
    p2: Coord<f64>,
    q1: Coord<f64>,
    q2: Coord<f64>,
    start: Coord<f64>,
    end: Coord<f64>,
) -> SegmentIntersection {
    if start == end {
        single_point(p1, p2, q1, q2, start)
    } else {
        SegmentIntersection::Collinear { start, end }
    }
}

/// Intersection of two properly crossing segments.
///
/// The lines are intersected in homogeneous coordinates after translating
/// everything to the centre of the overlap of the two envelopes, which keeps
/// the magnitudes small. A result outside both envelopes (only possible for
/// nearly parallel input) is replaced by the endpoint nearest the other segment.
fn proper_intersection_point(
    p1: Coord<f64>,
    p2: Coord<f64>,
    q1: Coord<f64>,
    q2: Coord<f64>,
) -> Coord<f64> {
    let mid = Coord {
        x: (p1.x.min(p2.x).max(q1.x.min(q2.x)) + p1.x.max(p2.x).min(q1.x.max(q2.x))) / 2.0,
        y: (p1.y.min(p2.y).max(q1.y.min(q2.y)) + p1.y.max(p2.y).min(q1.y.max(q2.y))) / 2.0,
    };

    let candidate = homogeneous_intersection(p1 - mid, p2 - mid, q1 - mid, q2 - mid)
        .map(|c| c + mid);

    match candidate {
        Some(pt) if in_envelope(p1, p2, pt) && in_envelope(q1, q2, pt) => pt,
        _ => nearest_endpoint(p1, p2, q1, q2),
    }
}

fn homogeneous_intersection(
    p1: Coord<f64>,
    p2: Coord<f64>,
    q1: Coord<f64>,
    q2: Coord<f64>,
) -> Option<Coord<f64>> {
    let px = p1.y - p2.y;
    let py = p2.x - p1.x;
    let pw = p1.x * p2.y - p2.x * p1.y;

    let qx = q1.y - q2.y;
    let qy = q2.x - q1.x;
    let qw = q1.x * q2.y - q2.x * q1.y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let xi = x / w;
    let yi = y / w;
    if xi.is_finite() && yi.is_finite() {
        Some(Coord { x: xi, y: yi })
    } else {
        None
    }
}

fn nearest_endpoint(p1: Coord<f64>, p2: Coord<f64>, q1: Coord<f64>, q2: Coord<f64>) -> Coord<f64> {
    let candidates = [
        (p1, distance_to_segment(p1, q1, q2)),
        (p2, distance_to_segment(p2, q1, q2)),
        (q1, distance_to_segment(q1, p1, p2)),
        (q2, distance_to_segment(q2, p1, p2)),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.1 < best.1 {
            best = *c;
        }
    }
    best.0
}

pub(crate) fn distance_to_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let d = b - a;
    let len2 = d.x * d.x + d.y * d.y;
    if len2 == 0.0 {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    let t = (((p.x - a.x) * d.x + (p.y - a.y) * d.y) / len2).clamp(0.0, 1.0);
    let proj = Coord { x: a.x + t * d.x, y: a.y + t * d.y };
    (p.x - proj.x).hypot(p.y - proj.y)
}

#[inline]
fn envelopes_intersect(p1: Coord<f64>, p2: Coord<f64>, q1: Coord<f64>, q2: Coord<f64>) -> bool {
    p1.x.min(p2.x) <= q1.x.max(q2.x)
        && q1.x.min(q2.x) <= p1.x.max(p2.x)
        && p1.y.min(p2.y) <= q1.y.max(q2.y)
        && q1.y.min(q2.y) <= p1.y.max(p2.y)
}

#[inline]
fn in_envelope(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

#[cfg(test)]
#[path = "line_intersector_tests.rs"]
mod tests;
