/*!
 * Cost Sampling
 */

use crate::config::IngestConfig;
use crate::core::limits::MAX_PRIORITY_HINT;
use crate::core::types::{Cost, Priority};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of job costs and hints
pub enum CostSampler {
    /// Uniform over `min..=max`, with optional I/O-bound marking
    Uniform {
        rng: StdRng,
        min: Cost,
        max: Cost,
        io_ratio: f64,
        io_burst: Cost,
    },
    /// Forced costs in order; falls back to `fallback` once exhausted
    Sequence {
        costs: VecDeque<Cost>,
        fallback: Cost,
    },
}

/// One sampled job shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub cost: Cost,
    pub priority_hint: Priority,
    pub io_burst: Option<Cost>,
}

impl CostSampler {
    /// Build a uniform sampler from validated ingestion config
    pub fn from_config(config: &IngestConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::Uniform {
            rng,
            min: config.cost_min,
            max: config.cost_max,
            io_ratio: config.io_ratio,
            io_burst: config.io_burst,
        }
    }

    /// Deterministic costs, e.g. for reproducing a specific schedule
    pub fn sequence(costs: impl IntoIterator<Item = Cost>) -> Self {
        let costs: VecDeque<Cost> = costs.into_iter().filter(|&c| c > 0).collect();
        Self::Sequence {
            fallback: costs.iter().copied().min().unwrap_or(1),
            costs,
        }
    }

    pub fn sample(&mut self) -> Sample {
        match self {
            Self::Uniform {
                rng,
                min,
                max,
                io_ratio,
                io_burst,
            } => {
                let cost = rng.gen_range(*min..=*max);
                let priority_hint = rng.gen_range(1..=MAX_PRIORITY_HINT);
                let io_bound = *io_ratio > 0.0 && rng.gen_bool(io_ratio.min(1.0));
                Sample {
                    cost,
                    priority_hint,
                    io_burst: io_bound.then_some(*io_burst),
                }
            }
            Self::Sequence { costs, fallback } => Sample {
                cost: costs.pop_front().unwrap_or(*fallback),
                priority_hint: 1,
                io_burst: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_within_range() {
        let config = IngestConfig {
            cost_min: 3,
            cost_max: 6,
            seed: Some(7),
            ..Default::default()
        };
        let mut sampler = CostSampler::from_config(&config);
        for _ in 0..500 {
            let s = sampler.sample();
            assert!((3..=6).contains(&s.cost));
            assert!((1..=MAX_PRIORITY_HINT).contains(&s.priority_hint));
            assert_eq!(s.io_burst, None);
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let config = IngestConfig {
            seed: Some(42),
            io_ratio: 0.5,
            ..Default::default()
        };
        let mut a = CostSampler::from_config(&config);
        let mut b = CostSampler::from_config(&config);
        for _ in 0..50 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_all_io_bound() {
        let config = IngestConfig {
            seed: Some(1),
            io_ratio: 1.0,
            io_burst: 2,
            ..Default::default()
        };
        let mut sampler = CostSampler::from_config(&config);
        assert!((0..20).all(|_| sampler.sample().io_burst == Some(2)));
    }

    #[test]
    fn test_sequence_then_fallback() {
        let mut sampler = CostSampler::sequence([3, 12, 3]);
        let costs: Vec<_> = (0..4).map(|_| sampler.sample().cost).collect();
        assert_eq!(costs, vec![3, 12, 3, 3]);
    }
}
