use std::sync::Arc;

use serde::Serialize;

use crate::Roll;

/// Read-only view of the model handed to renderers.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    /// The sum each bin stands for.
    pub bins: Vec<u32>,
    pub theoretical: Arc<[f64]>,
    /// Simulated relative frequency per bin, all zero before the first sample.
    pub simulated: Vec<f64>,
    pub sample_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_roll: Option<Roll>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            bins: Vec::new(),
            theoretical: Vec::<f64>::new().into(),
            simulated: Vec::new(),
            sample_count: 0,
            last_roll: None,
        }
    }
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Total variation distance between the simulated and the exact distribution.
    ///
    /// Zero when nothing has been sampled yet.
    pub fn total_variation(&self) -> f64 {
        if self.sample_count == 0 {
            return 0.0;
        }

        self.deviations().sum::<f64>() / 2.0
    }

    /// Largest absolute per-bin gap between simulated and exact probability.
    pub fn max_deviation(&self) -> f64 {
        if self.sample_count == 0 {
            return 0.0;
        }

        self.deviations().fold(0.0, f64::max)
    }

    /// Upper bound for a chart's y axis: the simulated peak or 1.2 times the exact peak.
    pub fn y_limit(&self) -> f64 {
        let simulated = self.simulated.iter().copied().fold(0.0, f64::max);
        let theoretical = self.theoretical.iter().copied().fold(0.0, f64::max);
        simulated.max(1.2 * theoretical)
    }

    fn deviations(&self) -> impl Iterator<Item = f64> + '_ {
        self.simulated
            .iter()
            .zip(self.theoretical.iter())
            .map(|(q, p)| (q - p).abs())
    }
}
