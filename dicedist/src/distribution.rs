use std::{ops::Deref, sync::Arc};

use serde::Serialize;
use tracing::debug;

use crate::{outcomes::outcome_terms, DieConfig, Error, Result};

/// Exact probability of every sum of a [`DieConfig`], indexed by bin.
///
/// Probabilities are shared, so cloning a distribution (or taking a snapshot that holds one) does
/// not copy them.
#[derive(Clone, Debug, Serialize)]
pub struct TheoreticalDistribution {
    config: DieConfig,
    probabilities: Arc<[f64]>,
}

/// Largest rounding error tolerated in any single probability.
const MAX_ROUNDING_ERROR: f64 = 1e-10;

impl TheoreticalDistribution {
    /// Computes every probability of `config`.
    ///
    /// Fails with [`Error::InvalidConfiguration`] when `f64` cannot hold the result to within
    /// 1e-10 per sum, either because `sides ^ dice` overflows or because the
    /// alternating terms cancel too much of each other. Six-sided dice stop at 41 of them.
    pub fn compute(config: DieConfig) -> Result<Self> {
        let unrepresentable = || Error::InvalidConfiguration {
            dice: config.dice(),
            sides: config.sides(),
        };

        let outcomes = config.outcomes();
        if !outcomes.is_finite() {
            return Err(unrepresentable());
        }

        let len = config.bin_count();
        let mut probabilities = vec![0.0; len];

        // Sums mirror around the mean. Only the lower half is evaluated, where the alternating
        // terms stay small relative to the result.
        for bin in 0..=(len - 1) / 2 {
            let sum = i64::from(config.min_sum()) + bin as i64;
            let (count, magnitude) = outcome_terms(sum, config.dice(), config.sides());
            let p = count / outcomes;
            let error = magnitude / outcomes * f64::EPSILON;
            if !(0.0..=1.0).contains(&p) || error > MAX_ROUNDING_ERROR {
                debug!(%config, sum, p, error, "exact distribution out of f64 range");
                return Err(unrepresentable());
            }
            probabilities[bin] = p;
            probabilities[len - 1 - bin] = p;
        }

        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > 1e-9 {
            debug!(%config, total, "exact distribution does not sum to one");
            return Err(unrepresentable());
        }

        Ok(Self {
            config,
            probabilities: probabilities.into(),
        })
    }

    pub fn config(&self) -> DieConfig {
        self.config
    }

    pub fn probabilities(&self) -> &Arc<[f64]> {
        &self.probabilities
    }

    /// True if both values share one allocation, i.e. neither was recomputed from the other.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.probabilities, &other.probabilities)
    }

    pub fn peak(&self) -> f64 {
        self.probabilities.iter().copied().fold(0.0, f64::max)
    }
}

impl Deref for TheoreticalDistribution {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.probabilities
    }
}
