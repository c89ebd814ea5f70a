//! Upright BRIEF binary descriptor.
//!
//! Each bit compares two smoothed intensities at a fixed pair of offsets
//! inside a 31×31 patch centred on the keypoint. The sampling pattern is
//! drawn once from a seeded RNG, so descriptors are reproducible across runs
//! and comparable between images described by the same extractor.

use super::fast::Corner;
use super::Keypoint;
use crate::image::ImageF32;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Half-size of the sampling patch.
pub const PATCH_RADIUS: usize = 15;

const BITS: usize = 256;
const DEFAULT_SEED: u64 = 0x5EED_B41E;

/// 256-bit descriptor compared by Hamming distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BinaryDescriptor(pub [u64; 4]);

impl BinaryDescriptor {
    #[inline]
    pub fn hamming(&self, other: &Self) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

#[derive(Clone, Debug)]
pub struct BriefExtractor {
    pairs: Vec<[(i8, i8); 2]>,
}

impl Default for BriefExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl BriefExtractor {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let r = PATCH_RADIUS as i8;
        let pairs = (0..BITS)
            .map(|_| {
                [
                    (rng.gen_range(-r..=r), rng.gen_range(-r..=r)),
                    (rng.gen_range(-r..=r), rng.gen_range(-r..=r)),
                ]
            })
            .collect();
        Self { pairs }
    }

    /// Describe every corner on the smoothed image. Output order follows
    /// `corners`.
    pub fn describe(&self, smoothed: &ImageF32, corners: &[Corner]) -> Vec<Keypoint> {
        corners
            .par_iter()
            .map(|c| Keypoint {
                x: c.x as f64,
                y: c.y as f64,
                score: c.score,
                descriptor: self.describe_at(smoothed, c.x, c.y),
            })
            .collect()
    }

    fn describe_at(&self, smoothed: &ImageF32, x: usize, y: usize) -> BinaryDescriptor {
        let mut words = [0u64; 4];
        let (x, y) = (x as isize, y as isize);
        for (bit, [a, b]) in self.pairs.iter().enumerate() {
            let va = smoothed.get_clamped(x + a.0 as isize, y + a.1 as isize);
            let vb = smoothed.get_clamped(x + b.0 as isize, y + b.1 as isize);
            if va < vb {
                words[bit / 64] |= 1u64 << (bit % 64);
            }
        }
        BinaryDescriptor(words)
    }
}
