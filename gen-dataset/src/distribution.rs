//! Random selection of the depth at which a file is placed.

use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};

/// Largest tolerated difference between the sum of the weights and 1.0.
/// Above that, weights are renormalized.
const EPSILON: f64 = 1e-9;

/// Discrete probability distribution over directory depths `0..depth`
/// (just the root when there are no branches).
///
/// The probability of depth `i` is proportional to the number of directories at level `i`
/// of the tree, which is `branches^i`:
///
/// `p(i) = branches^i * (1 - branches) / (1 - branches^depth)`
///
/// so each directory has roughly the same chance of receiving a file.
/// With a single branch all depths are equally likely. Without branches only the root
/// exists, so everything goes to depth 0.
#[derive(Clone, Debug)]
pub struct DepthDistribution {
    weights: Vec<f64>,
    index: Option<WeightedIndex<f64>>,
}

impl DepthDistribution {
    pub fn new(depth: usize, branches: usize) -> DepthDistribution {
        let mut weights = Self::weights_of(depth, branches);
        let sum: f64 = weights.iter().sum();
        if !weights.is_empty() && (sum - 1.0).abs() > EPSILON {
            weights.iter_mut().for_each(|w| *w /= sum);
        }
        let index = WeightedIndex::new(&weights).ok();
        DepthDistribution { weights, index }
    }

    fn weights_of(depth: usize, branches: usize) -> Vec<f64> {
        match branches {
            _ if depth == 0 => vec![],
            // only the root exists, whatever the depth
            0 => vec![1.0],
            1 => vec![1.0 / depth as f64; depth],
            _ => {
                // Rewritten as (b - 1) * b^(i - depth) / (1 - b^(-depth)),
                // so large trees underflow to 0 instead of overflowing to infinity:
                let b = branches as f64;
                let depth = depth as i32;
                let norm = 1.0 - b.powi(-depth);
                (0..depth)
                    .map(|i| (b - 1.0) * b.powi(i - depth) / norm)
                    .collect()
            }
        }
    }

    /// Number of depths the distribution covers.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Probabilities of subsequent depths, starting from the root.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Draws a depth. An empty distribution always yields the root (depth 0).
impl Distribution<usize> for DepthDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match &self.index {
            Some(index) => index.sample(rng),
            None => 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_valid(d: &DepthDistribution) {
        let sum: f64 = d.weights().iter().sum();
        assert!((sum - 1.0).abs() < EPSILON, "sum = {sum}");
        assert!(d.weights().iter().all(|w| *w >= 0.0));
    }

    #[test]
    fn weights_sum_to_one() {
        for depth in 1..12 {
            for branches in 1..12 {
                let d = DepthDistribution::new(depth, branches);
                assert_eq!(d.len(), depth);
                assert_valid(&d);
            }
        }
    }

    #[test]
    fn huge_tree_does_not_overflow() {
        let d = DepthDistribution::new(400, 1000);
        assert_valid(&d);
        assert!(d.weights()[399] > 0.99);
    }

    #[test]
    fn single_branch_is_uniform() {
        let d = DepthDistribution::new(4, 1);
        assert_eq!(d.weights(), &[0.25, 0.25, 0.25, 0.25]);
    }

    #[test]
    fn weights_follow_level_sizes() {
        // levels have 1, 2 and 4 directories, 7 in total
        let d = DepthDistribution::new(3, 2);
        let expected = [1.0 / 7.0, 2.0 / 7.0, 4.0 / 7.0];
        for (w, e) in d.weights().iter().zip(expected) {
            assert!((w - e).abs() < EPSILON, "{w} != {e}");
        }
    }

    #[test]
    fn no_branches_puts_everything_at_root() {
        let d = DepthDistribution::new(3, 0);
        assert_eq!(d.weights(), &[1.0]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..100).all(|_| d.sample(&mut rng) == 0));
    }

    #[test]
    fn no_branches_with_huge_depth() {
        for depth in [1 << 40, usize::MAX] {
            let d = DepthDistribution::new(depth, 0);
            assert_eq!(d.len(), 1);
            assert_valid(&d);
            let mut rng = StdRng::seed_from_u64(1);
            assert_eq!(d.sample(&mut rng), 0);
        }
    }

    #[test]
    fn zero_depth_samples_root() {
        let d = DepthDistribution::new(0, 5);
        assert!(d.is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(d.sample(&mut rng), 0);
    }

    #[test]
    fn samples_stay_in_range() {
        let d = DepthDistribution::new(5, 3);
        let mut rng = StdRng::seed_from_u64(7);
        let mut histogram = [0; 5];
        for _ in 0..10000 {
            histogram[d.sample(&mut rng)] += 1;
        }
        // the deepest level holds 2/3 of all directories
        assert!(histogram[4] > histogram[3]);
        assert!(histogram[4] > 5000);
    }
}
