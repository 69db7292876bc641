use super::*;
use crate::precision::PrecisionModel;
use geo_types::{Coord, LineString};

fn ss(pts: Vec<(f64, f64)>, data: usize) -> NodedSegmentString<usize> {
    NodedSegmentString::from_line_string(LineString::from(pts), data).unwrap()
}

fn bowtie() -> NodedSegmentString<usize> {
    ss(vec![(0.0, 0.0), (10.0, 0.0), (5.0, 5.0), (5.0, -5.0)], 0)
}

/// The bowtie with its self-crossing interleaved.
fn bowtie_noded() -> Vec<Coord<f64>> {
    [(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (5.0, 5.0), (5.0, 0.0), (5.0, -5.0)]
        .iter()
        .map(|&(x, y)| Coord { x, y })
        .collect()
}

fn coords_of(strings: &[NodedSegmentString<usize>]) -> Vec<Vec<Coord<f64>>> {
    strings.iter().map(|s| s.coords().to_vec()).collect()
}

/// Concatenates consecutive pieces, dropping each shared start point.
fn reconstruct(pieces: &[NodedSegmentString<usize>]) -> Vec<Coord<f64>> {
    let mut out: Vec<Coord<f64>> = Vec::new();
    for p in pieces {
        let skip = usize::from(out.last() == p.coords().first());
        out.extend(p.coords().iter().skip(skip));
    }
    out
}

#[test]
fn test_exact_noder_splits_only_at_crossing() {
    let mut noder = McIndexNoder::new();
    let out = noder.node(vec![bowtie()]).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out[1].coords().len(), 4);
    assert_eq!(reconstruct(&out), bowtie_noded());
    assert!(NodingValidator::new(&out).is_valid());
}

#[test]
fn test_snap_rounded_bowtie_reconstructs() {
    let mut noder = SnapRoundingNoder::new(PrecisionModel::fixed(1.0).unwrap());
    let out = noder.node(vec![bowtie()]).unwrap();
    assert_eq!(out.len(), 5);
    assert_eq!(reconstruct(&out), bowtie_noded());
    assert!(NodingValidator::new(&out).check_valid().is_ok());
}

#[test]
fn test_snap_rounding_is_idempotent() {
    let input = vec![
        bowtie(),
        ss(vec![(-3.0, 2.0), (12.0, 3.0)], 1),
        ss(vec![(1.0, -4.0), (9.0, 4.0), (2.0, 4.0)], 2),
    ];
    let mut noder = SnapRoundingNoder::new(PrecisionModel::fixed(1.0).unwrap());
    let first = noder.node(input).unwrap();
    assert!(NodingValidator::new(&first).is_valid());

    let second = noder.node(first.clone()).unwrap();
    assert_eq!(coords_of(&first), coords_of(&second));
    assert_eq!(noder.report().nodes_added_per_pass, vec![0]);
}

#[test]
fn test_context_flows_to_every_piece() {
    let mut noder = SnapRoundingNoder::new(PrecisionModel::fixed(1.0).unwrap());
    let out = noder
        .node(vec![
            ss(vec![(0.0, 0.0), (10.0, 10.0)], 4),
            ss(vec![(0.0, 10.0), (10.0, 0.0)], 8),
        ])
        .unwrap();
    let mut tags: Vec<usize> = out.iter().map(|s| *s.data()).collect();
    tags.sort_unstable();
    assert_eq!(tags, vec![4, 4, 8, 8]);
}

#[test]
fn test_boxed_noders_are_interchangeable() {
    let noders: Vec<Box<dyn Noder<usize>>> = vec![
        Box::new(McIndexNoder::<usize>::new()),
        Box::new(SnapRoundingNoder::<usize>::new(PrecisionModel::Floating)),
        Box::new(ScaledNoder::<SnapRoundingNoder<usize>>::snap_rounding(1.0).unwrap()),
    ];
    for mut noder in noders {
        let out = noder
            .node(vec![
                ss(vec![(0.0, 0.0), (4.0, 0.0)], 0),
                ss(vec![(2.0, -2.0), (2.0, 2.0)], 1),
            ])
            .unwrap();
        assert_eq!(out.len(), 4);
    }
}

#[test]
fn test_split_all_preserves_input_order() {
    let mut a = ss(vec![(0.0, 0.0), (4.0, 0.0)], 0);
    a.add_node(Coord { x: 2.0, y: 0.0 }, 0);
    let b = ss(vec![(9.0, 9.0), (8.0, 8.0)], 1);
    let out = split_all(vec![a, b]);
    let tags: Vec<usize> = out.iter().map(|s| *s.data()).collect();
    assert_eq!(tags, vec![0, 0, 1]);
}
