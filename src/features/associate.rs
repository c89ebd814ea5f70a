//! Greedy nearest-neighbour association of binary descriptors.
//!
//! Every source descriptor is paired with its closest destination descriptor
//! (lowest Hamming distance, earliest index on ties). Optional filters:
//! a maximum distance, a best/second-best ratio test, and backwards
//! validation which keeps a pair only when the destination's own best match
//! is the same source.

use super::brief::BinaryDescriptor;
use super::{AssociationOptions, Keypoint};
use rayon::prelude::*;

/// Index pair produced by association.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssociatedIndex {
    pub src: usize,
    pub dst: usize,
    pub distance: u32,
}

/// Point correspondence: `p1` in the first image, `p2` in the second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssociatedPair {
    pub p1: [f64; 2],
    pub p2: [f64; 2],
}

impl AssociatedPair {
    pub fn new(p1: [f64; 2], p2: [f64; 2]) -> Self {
        Self { p1, p2 }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GreedyAssociator {
    options: AssociationOptions,
}

struct Nearest {
    index: usize,
    distance: u32,
    second: Option<u32>,
}

impl GreedyAssociator {
    pub fn new(options: AssociationOptions) -> Self {
        Self { options }
    }

    pub fn associate(
        &self,
        src: &[BinaryDescriptor],
        dst: &[BinaryDescriptor],
    ) -> Vec<AssociatedIndex> {
        if src.is_empty() || dst.is_empty() {
            return Vec::new();
        }
        let forward: Vec<Option<Nearest>> = src.par_iter().map(|d| nearest(d, dst)).collect();
        let backward: Option<Vec<Option<usize>>> = self.options.backwards_validation.then(|| {
            dst.par_iter()
                .map(|d| nearest(d, src).map(|n| n.index))
                .collect()
        });

        let ratio = self.options.ratio_threshold;
        forward
            .into_iter()
            .enumerate()
            .filter_map(|(src_idx, best)| {
                let best = best?;
                if let Some(max) = self.options.max_distance {
                    if best.distance > max {
                        return None;
                    }
                }
                if ratio < 1.0 {
                    if let Some(second) = best.second {
                        if best.distance as f32 > ratio * second as f32 {
                            return None;
                        }
                    }
                }
                if let Some(backward) = &backward {
                    if backward[best.index] != Some(src_idx) {
                        return None;
                    }
                }
                Some(AssociatedIndex {
                    src: src_idx,
                    dst: best.index,
                    distance: best.distance,
                })
            })
            .collect()
    }
}

fn nearest(query: &BinaryDescriptor, candidates: &[BinaryDescriptor]) -> Option<Nearest> {
    let mut best: Option<Nearest> = None;
    for (index, cand) in candidates.iter().enumerate() {
        let distance = query.hamming(cand);
        match best.as_mut() {
            None => {
                best = Some(Nearest {
                    index,
                    distance,
                    second: None,
                })
            }
            Some(b) if distance < b.distance => {
                b.second = Some(b.distance);
                b.index = index;
                b.distance = distance;
            }
            Some(b) => {
                if b.second.map_or(true, |s| distance < s) {
                    b.second = Some(distance);
                }
            }
        }
    }
    best
}

/// Resolve index pairs into point correspondences.
pub fn associated_pairs(
    matches: &[AssociatedIndex],
    src: &[Keypoint],
    dst: &[Keypoint],
) -> Vec<AssociatedPair> {
    matches
        .iter()
        .map(|m| {
            let a = &src[m.src];
            let b = &dst[m.dst];
            AssociatedPair::new([a.x, a.y], [b.x, b.y])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(bits: u64) -> BinaryDescriptor {
        BinaryDescriptor([bits, 0, 0, 0])
    }

    #[test]
    fn mutual_nearest_neighbours_are_paired() {
        let src = [d(0b0000), d(0b1111_0000)];
        let dst = [d(0b1111_0001), d(0b0001)];
        let matches = GreedyAssociator::default().associate(&src, &dst);
        assert_eq!(
            matches,
            vec![
                AssociatedIndex { src: 0, dst: 1, distance: 1 },
                AssociatedIndex { src: 1, dst: 0, distance: 1 },
            ]
        );
    }

    #[test]
    fn backwards_validation_drops_one_sided_matches() {
        // Both sources prefer dst 0, but dst 0 only prefers src 0.
        let src = [d(0b0001), d(0b0011)];
        let dst = [d(0b0001)];
        let validated = GreedyAssociator::default().associate(&src, &dst);
        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].src, 0);

        let greedy = GreedyAssociator::new(AssociationOptions {
            backwards_validation: false,
            ..Default::default()
        })
        .associate(&src, &dst);
        assert_eq!(greedy.len(), 2);
    }

    #[test]
    fn distance_gate_and_empty_sets() {
        let opts = AssociationOptions {
            max_distance: Some(2),
            ..Default::default()
        };
        let matches = GreedyAssociator::new(opts).associate(&[d(0)], &[d(0b1111)]);
        assert!(matches.is_empty());
        assert!(GreedyAssociator::default().associate(&[], &[d(0)]).is_empty());
    }
}
