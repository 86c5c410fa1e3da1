//! Exact counting of dice sums.
//!
//! The number of ordered outcomes of `n` dice with `s` sides that add up to `t` is the number of
//! compositions of `t` into `n` parts bounded by `[1, s]`. Inclusion–exclusion over the parts
//! that overflow `s` gives the closed form
//!
//! ```text
//! Σ_{k=0}^{⌊(t-n)/s⌋} (-1)^k · C(n, k) · C(t - s·k - 1, n - 1)
//! ```
//!
//! which needs at most `n + 1` binomial evaluations per sum rather than `s^n` enumerated rolls.

/// Binomial coefficient as a float.
///
/// Returns zero whenever `n` is negative, `k` is negative or `k > n`.
pub fn binomial(n: i64, k: i64) -> f64 {
    if n < 0 || k < 0 || k > n {
        return 0.0;
    }

    // C(n, k) == C(n, n - k); walk the shorter side.
    let k = k.min(n - k);
    let mut result = 1.0;
    for i in 1..=k {
        result = result * (n - k + i) as f64 / i as f64;
        if result.is_infinite() {
            return result;
        }
    }
    result.round()
}

/// Counts the ordered outcomes of `n_dice` dice with `s_sides` sides summing to `dice_sum`.
///
/// Sums outside `[n_dice, n_dice * s_sides]` yield zero.
pub fn no_of_dice_outcomes(dice_sum: i64, n_dice: u32, s_sides: u32) -> f64 {
    outcome_terms(dice_sum, n_dice, s_sides).0
}

/// The count of [`no_of_dice_outcomes`] together with the sum of the magnitudes of its
/// alternating terms.
///
/// Every term carries a relative rounding error of about `f64::EPSILON`, so the magnitude bounds
/// how far the count can be from the exact value.
pub(crate) fn outcome_terms(dice_sum: i64, n_dice: u32, s_sides: u32) -> (f64, f64) {
    let n = i64::from(n_dice);
    let s = i64::from(s_sides);
    if n < 1 || s < 1 || dice_sum < n || dice_sum > n.saturating_mul(s) {
        return (0.0, 0.0);
    }

    // Each k counts dice forced above s; there are only n dice. s * k stays below dice_sum.
    let k_max = ((dice_sum - n) / s).min(n);
    let mut result = 0.0;
    let mut magnitude = 0.0;
    for k in 0..=k_max {
        let term = binomial(n, k) * binomial(dice_sum - s * k - 1, n - 1);
        if term.is_infinite() {
            return (f64::INFINITY, f64::INFINITY);
        }
        result += if k % 2 == 0 { term } else { -term };
        magnitude += term;
    }

    // Cancellation between large alternating terms can leave a hair below zero.
    (result.max(0.0), magnitude)
}

#[cfg(test)]
mod tests {
    use super::{binomial, no_of_dice_outcomes, outcome_terms};

    #[test]
    fn binomial_small_values() {
        assert_eq!(1.0, binomial(0, 0));
        assert_eq!(6.0, binomial(4, 2));
        assert_eq!(252.0, binomial(10, 5));
        assert_eq!(1.0, binomial(7, 7));
    }

    #[test]
    fn binomial_out_of_range_is_zero() {
        assert_eq!(0.0, binomial(-1, 0));
        assert_eq!(0.0, binomial(3, 4));
        assert_eq!(0.0, binomial(3, -1));
    }

    #[test]
    fn two_six_sided_dice() {
        let counts: Vec<_> = (2..=12).map(|sum| no_of_dice_outcomes(sum, 2, 6)).collect();
        let expected = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        assert_eq!(&expected[..], &counts[..]);
    }

    #[test]
    fn three_six_sided_dice_peak() {
        // 10 and 11 are the most common sums of 3d6: 27 ways each.
        assert_eq!(27.0, no_of_dice_outcomes(10, 3, 6));
        assert_eq!(27.0, no_of_dice_outcomes(11, 3, 6));
        assert_eq!(1.0, no_of_dice_outcomes(3, 3, 6));
        assert_eq!(1.0, no_of_dice_outcomes(18, 3, 6));
    }

    #[test]
    fn impossible_sums_are_zero() {
        assert_eq!(0.0, no_of_dice_outcomes(1, 2, 6));
        assert_eq!(0.0, no_of_dice_outcomes(13, 2, 6));
        assert_eq!(0.0, no_of_dice_outcomes(-4, 2, 6));
        assert_eq!(0.0, no_of_dice_outcomes(40, 3, 6));
    }

    #[test]
    fn extreme_sums_are_zero() {
        assert_eq!(0.0, no_of_dice_outcomes(i64::MIN, 2, 6));
        assert_eq!(0.0, no_of_dice_outcomes(i64::MAX, 2, 6));
        assert_eq!(0.0, no_of_dice_outcomes(10_i64.pow(12), 2, 6));
        assert_eq!(0.0, no_of_dice_outcomes(i64::MIN, u32::MAX, u32::MAX));
    }

    #[test]
    fn counts_beyond_f64_are_infinite() {
        assert!(binomial(5000, 2500).is_infinite());
        assert!(no_of_dice_outcomes(i64::MAX, u32::MAX, u32::MAX).is_infinite());
        assert_eq!(
            (f64::INFINITY, f64::INFINITY),
            outcome_terms(1_000_000, 1000, 2000)
        );
    }

    #[test]
    fn largest_sum_with_many_sides() {
        let n = u32::MAX;
        assert_eq!(1.0, no_of_dice_outcomes(i64::from(n), 1, n));
        assert_eq!(1.0, no_of_dice_outcomes(2 * i64::from(n), 2, n));
    }

    #[test]
    fn magnitude_covers_every_term() {
        // 3d6 at 10: C(9,2) - 3 * C(3,2), i.e. 36 - 9.
        assert_eq!((27.0, 45.0), outcome_terms(10, 3, 6));
        assert_eq!((1.0, 1.0), outcome_terms(3, 3, 6));
        assert_eq!((0.0, 0.0), outcome_terms(19, 3, 6));
    }

    #[test]
    fn single_die_is_flat() {
        for sum in 1..=20 {
            assert_eq!(1.0, no_of_dice_outcomes(sum, 1, 20));
        }
    }
}
