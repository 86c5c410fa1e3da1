use tracing::{debug, trace};

use crate::{
    DieConfig, Error, Histogram, Result, Roll, Roller, Snapshot, TheoreticalDistribution,
};

/// Exact distribution of a dice configuration next to a running tally of simulated rolls.
#[derive(Clone, Debug, Default)]
pub struct DiceModel {
    theoretical: Option<TheoreticalDistribution>,
    histogram: Histogram,
    last_roll: Option<Roll>,
}

impl DiceModel {
    pub fn new() -> Self {
        Default::default()
    }

    /// Applies a configuration and starts a fresh tally.
    ///
    /// The exact distribution is only recomputed when `dice` or `sides` differ from the current
    /// configuration.
    pub fn configure(&mut self, dice: u32, sides: u32) -> Result<()> {
        let config = DieConfig::new(dice, sides)?;

        if self.config() == Some(config) {
            debug!(%config, "configuration unchanged; keeping distribution");
        } else {
            debug!(%config, bins = config.bin_count(), "computing exact distribution");
            self.theoretical = Some(TheoreticalDistribution::compute(config)?);
        }

        self.histogram = Histogram::new(config.bin_count());
        self.last_roll = None;
        Ok(())
    }

    /// Rolls every die once and tallies the sum.
    pub fn record_roll<R: Roller + ?Sized>(&mut self, roller: &mut R) -> Result<()> {
        let config = self.config().ok_or(Error::NotConfigured)?;
        let roll = roller.roll(config);
        let sum = roll.sum();
        let bin = config
            .bin_of(sum)
            .unwrap_or_else(|| panic!("roller produced sum {} outside {}", sum, config));

        self.histogram.record(bin);
        trace!(sum, samples = self.histogram.samples(), "recorded roll");
        self.last_roll = Some(roll);
        Ok(())
    }

    /// Zeroes the tally. Configuration and exact distribution are kept.
    pub fn reset(&mut self) {
        self.histogram.clear();
        self.last_roll = None;
    }

    pub fn snapshot(&self) -> Snapshot {
        match &self.theoretical {
            None => Snapshot::default(),
            Some(theoretical) => Snapshot {
                bins: theoretical.config().bin_labels().collect(),
                theoretical: theoretical.probabilities().clone(),
                simulated: self.histogram.normalized(),
                sample_count: self.histogram.samples(),
                last_roll: self.last_roll.clone(),
            },
        }
    }

    pub fn config(&self) -> Option<DieConfig> {
        self.theoretical.as_ref().map(|x| x.config())
    }

    pub fn theoretical(&self) -> Option<&TheoreticalDistribution> {
        self.theoretical.as_ref()
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    pub fn sample_count(&self) -> u64 {
        self.histogram.samples()
    }
}
