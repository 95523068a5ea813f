//! Property-based tests for tick/time conversion.
//!
//! Uses proptest to verify that rational round trips are exact and that
//! frame quantization is stable.

use proptest::prelude::*;

use prproj_core::{Rational, RationalTime};
use prproj_import::ticks::{
    frames_from_ticks, seconds_from_ticks, ticks_from_seconds, TICKS_PER_SECOND,
};

proptest! {
    /// ticks → rational seconds → ticks recovers the input exactly.
    #[test]
    fn roundtrip_ticks_exact(ticks in 0i64..=i64::MAX / 4) {
        prop_assert_eq!(ticks_from_seconds(seconds_from_ticks(ticks)), ticks);
    }

    /// Floating-point seconds stay within one tick of the input.
    #[test]
    fn float_seconds_within_one_tick(ticks in 0i64..=4_000_000_000_000i64) {
        let seconds = seconds_from_ticks(ticks).to_f64();
        let back = (seconds * TICKS_PER_SECOND as f64).round() as i64;
        prop_assert!((back - ticks).abs() <= 1);
    }

    /// Quantizing an already-quantized time at the same rate is a no-op.
    #[test]
    fn quantization_idempotent(
        ticks in 0i64..=10_000_000_000_000i64,
        num in 1i64..=120,
        den in 1i64..=1001,
    ) {
        let rate = Rational::new(num, den);
        let quantized = RationalTime::from_seconds(seconds_from_ticks(ticks), rate);
        prop_assert_eq!(
            RationalTime::from_seconds(quantized.to_seconds(), rate),
            quantized
        );
    }

    /// Rescaling to the same rate returns the identical time.
    #[test]
    fn rescale_same_rate_identity(frames in 0i64..=1_000_000i64) {
        let rate = Rational::new(24_000, 1_001);
        let time = RationalTime::new(frames, rate);
        prop_assert_eq!(time.rescaled_to(rate), time);
    }

    /// Quantizing the difference of two positions never exceeds one frame of
    /// drift against the quantized positions themselves.
    #[test]
    fn gap_duration_close_to_position_difference(
        first_end in 0i64..=5_000_000_000_000i64,
        hole in 0i64..=5_000_000_000_000i64,
    ) {
        let rate = Rational::new(25, 1);
        let second_start = first_end + hole;
        let direct = frames_from_ticks(hole, rate);
        let positional = frames_from_ticks(second_start, rate) - frames_from_ticks(first_end, rate);
        prop_assert!((direct - positional).abs() <= 1);
    }
}
