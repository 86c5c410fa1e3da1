use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// Upper bound on the number of distinct sums of a configuration.
pub const MAX_BINS: usize = 1 << 16;

/// A number of identical fair dice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DieConfig {
    dice: u32,
    sides: u32,
}

impl DieConfig {
    /// Validates a configuration.
    ///
    /// Besides needing one die with two sides, the largest sum has to fit a `u32` and the number
    /// of sums may not exceed [`MAX_BINS`].
    pub fn new(dice: u32, sides: u32) -> Result<Self> {
        let invalid = Error::InvalidConfiguration { dice, sides };
        if dice < 1 || sides < 2 {
            return Err(invalid);
        }

        match dice.checked_mul(sides) {
            Some(max_sum) if ((max_sum - dice) as usize) < MAX_BINS => {
                Ok(DieConfig { dice, sides })
            }
            _ => Err(invalid),
        }
    }

    #[inline]
    pub fn dice(&self) -> u32 {
        self.dice
    }

    #[inline]
    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn min_sum(&self) -> u32 {
        self.dice
    }

    pub fn max_sum(&self) -> u32 {
        self.dice * self.sides
    }

    /// Number of distinct sums, i.e. the length of every per-bin vector.
    pub fn bin_count(&self) -> usize {
        ((self.sides - 1) * self.dice + 1) as usize
    }

    /// Maps a sum to its bin, or `None` if no roll can produce it.
    pub fn bin_of(&self, sum: u32) -> Option<usize> {
        if (self.min_sum()..=self.max_sum()).contains(&sum) {
            Some((sum - self.dice) as usize)
        } else {
            None
        }
    }

    /// The sum each bin stands for.
    pub fn bin_labels(&self) -> impl Iterator<Item = u32> {
        self.min_sum()..=self.max_sum()
    }

    /// Total number of ordered outcomes, `sides ^ dice`.
    pub fn outcomes(&self) -> f64 {
        f64::from(self.sides).powf(f64::from(self.dice))
    }

    pub fn mean(&self) -> f64 {
        f64::from(self.dice) * f64::from(self.sides + 1) / 2.0
    }

    pub fn variance(&self) -> f64 {
        let sides = f64::from(self.sides);
        f64::from(self.dice) * (sides * sides - 1.0) / 12.0
    }
}

impl fmt::Display for DieConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.dice, self.sides)
    }
}

#[cfg(test)]
mod tests {
    use super::{DieConfig, MAX_BINS};
    use crate::Error;

    #[test]
    fn rejects_zero_dice() {
        assert!(matches!(
            DieConfig::new(0, 6),
            Err(Error::InvalidConfiguration { dice: 0, sides: 6 })
        ));
    }

    #[test]
    fn rejects_one_sided_die() {
        assert!(matches!(
            DieConfig::new(3, 1),
            Err(Error::InvalidConfiguration { dice: 3, sides: 1 })
        ));
    }

    #[test]
    fn rejects_overflowing_max_sum() {
        assert!(matches!(
            DieConfig::new(2, 3_000_000_000),
            Err(Error::InvalidConfiguration {
                dice: 2,
                sides: 3_000_000_000
            })
        ));
        assert!(DieConfig::new(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn rejects_too_many_bins() {
        assert!(DieConfig::new(1, 4_000_000_000).is_err());

        // (sides - 1) * dice + 1 == MAX_BINS exactly, then one past it.
        let edge = DieConfig::new(1, MAX_BINS as u32).unwrap();
        assert_eq!(MAX_BINS, edge.bin_count());
        assert!(DieConfig::new(1, MAX_BINS as u32 + 1).is_err());
        assert!(DieConfig::new(3, 21_846).is_ok());
        assert!(DieConfig::new(3, 21_847).is_err());
    }

    #[test]
    fn bins_span_min_to_max() {
        let config = DieConfig::new(3, 6).unwrap();
        assert_eq!(16, config.bin_count());
        assert_eq!(Some(0), config.bin_of(3));
        assert_eq!(Some(15), config.bin_of(18));
        assert_eq!(None, config.bin_of(2));
        assert_eq!(None, config.bin_of(19));
        assert_eq!(
            vec![3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18],
            config.bin_labels().collect::<Vec<_>>()
        );
    }

    #[test]
    fn moments() {
        let config = DieConfig::new(2, 6).unwrap();
        assert_eq!(7.0, config.mean());
        assert!((config.variance() - 35.0 / 6.0).abs() < 1e-12);
        assert_eq!(36.0, config.outcomes());
    }

    #[test]
    fn displays_as_notation() {
        assert_eq!("4d8", DieConfig::new(4, 8).unwrap().to_string());
    }
}
