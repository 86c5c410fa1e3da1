use serde::Serialize;

/// Online tally of simulated sums, one counter per bin.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Histogram {
    counts: Vec<u64>,
    samples: u64,
}

impl Histogram {
    pub fn new(bins: usize) -> Self {
        Self {
            counts: vec![0; bins],
            samples: 0,
        }
    }

    /// Records one sample in `bin`.
    ///
    /// # Panics
    ///
    /// Panics if `bin` is out of range. Callers derive the bin from a roll of the same
    /// configuration the histogram was sized for.
    pub fn record(&mut self, bin: usize) {
        self.counts[bin] += 1;
        self.samples += 1;
    }

    pub fn clear(&mut self) {
        self.counts.iter_mut().for_each(|count| *count = 0);
        self.samples = 0;
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Relative frequency of each bin; all zero until something has been recorded.
    pub fn normalized(&self) -> Vec<f64> {
        if self.samples == 0 {
            return vec![0.0; self.counts.len()];
        }

        let samples = self.samples as f64;
        self.counts
            .iter()
            .map(|&count| count as f64 / samples)
            .collect()
    }
}
