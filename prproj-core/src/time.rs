//! Frame-quantized time values and ranges.
//!
//! A [`RationalTime`] is a whole number of frames at a rational frame rate.
//! Conversions from seconds round to the nearest frame, ties toward positive
//! infinity (round-half-up), computed in integer arithmetic.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::rational::Rational;

/// A whole frame count tagged with its frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RationalTime {
    /// Frame count.
    pub value: i64,
    /// Frames per second.
    pub rate: Rational,
}

impl RationalTime {
    /// Create a time of `value` frames at `rate`.
    pub fn new(value: i64, rate: Rational) -> Self {
        Self { value, rate }
    }

    /// Zero frames at `rate`.
    pub fn zero(rate: Rational) -> Self {
        Self { value: 0, rate }
    }

    /// Quantize exact rational seconds to whole frames at `rate`.
    ///
    /// Rounds to the nearest frame; a half-frame boundary rounds up.
    pub fn from_seconds(seconds: Rational, rate: Rational) -> Self {
        let num = seconds.num as i128 * rate.num as i128;
        let den = seconds.den as i128 * rate.den as i128;
        Self {
            value: div_round_half_up(num, den),
            rate,
        }
    }

    /// Exact rational seconds this time denotes.
    pub fn to_seconds(&self) -> Rational {
        Rational::from_int(self.value) / self.rate
    }

    /// Seconds as f64, for display and comparisons across rates.
    pub fn to_seconds_f64(&self) -> f64 {
        self.to_seconds().to_f64()
    }

    /// Requantize to another frame rate, rounding to the nearest frame.
    ///
    /// Requantizing at the time's own rate is a no-op.
    pub fn rescaled_to(self, rate: Rational) -> Self {
        if rate == self.rate {
            return self;
        }
        Self::from_seconds(self.to_seconds(), rate)
    }
}

impl Add for RationalTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        assert_eq!(self.rate, rhs.rate, "Cannot add times at different rates");
        Self {
            value: self.value + rhs.value,
            rate: self.rate,
        }
    }
}

impl Sub for RationalTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert_eq!(self.rate, rhs.rate, "Cannot subtract times at different rates");
        Self {
            value: self.value - rhs.value,
            rate: self.rate,
        }
    }
}

/// A half-open time span `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// First frame of the range.
    pub start: RationalTime,
    /// Length of the range.
    pub duration: RationalTime,
}

impl TimeRange {
    /// Create a range from a start time and duration.
    pub fn new(start: RationalTime, duration: RationalTime) -> Self {
        Self { start, duration }
    }

    /// The first frame past the end of the range.
    pub fn end_time_exclusive(&self) -> RationalTime {
        self.start + self.duration
    }
}

/// Divide rounding to the nearest integer, ties toward positive infinity.
fn div_round_half_up(num: i128, den: i128) -> i64 {
    debug_assert!(den > 0);
    (2 * num + den).div_euclid(2 * den) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fps25() -> Rational {
        Rational::new(25, 1)
    }

    #[test]
    fn test_from_seconds_exact() {
        let t = RationalTime::from_seconds(Rational::from_int(10), fps25());
        assert_eq!(t.value, 250);
    }

    #[test]
    fn test_from_seconds_half_rounds_up() {
        // 0.02 s is half a frame at 25 fps.
        let t = RationalTime::from_seconds(Rational::new(1, 50), fps25());
        assert_eq!(t.value, 1);
        // 1.5 frames rounds up to 2.
        let t = RationalTime::from_seconds(Rational::new(3, 50), fps25());
        assert_eq!(t.value, 2);
    }

    #[test]
    fn test_from_seconds_below_half_rounds_down() {
        // 0.4 frames at 25 fps.
        let t = RationalTime::from_seconds(Rational::new(2, 125), fps25());
        assert_eq!(t.value, 0);
    }

    #[test]
    fn test_rescale_same_rate_is_identity() {
        let t = RationalTime::new(113, fps25());
        assert_eq!(t.rescaled_to(fps25()), t);
    }

    #[test]
    fn test_rescale_roundtrip_through_seconds() {
        let t = RationalTime::new(250, fps25());
        let at50 = t.rescaled_to(Rational::new(50, 1));
        assert_eq!(at50.value, 500);
        assert_eq!(at50.rescaled_to(fps25()), t);
    }

    #[test]
    fn test_quantization_idempotent() {
        let t = RationalTime::from_seconds(Rational::new(7, 3), Rational::new(24_000, 1_001));
        assert_eq!(RationalTime::from_seconds(t.to_seconds(), t.rate), t);
    }

    #[test]
    fn test_range_end() {
        let r = TimeRange::new(
            RationalTime::new(10, fps25()),
            RationalTime::new(250, fps25()),
        );
        assert_eq!(r.end_time_exclusive(), RationalTime::new(260, fps25()));
    }

    #[test]
    fn test_add_sub() {
        let a = RationalTime::new(100, fps25());
        let b = RationalTime::new(40, fps25());
        assert_eq!((a + b).value, 140);
        assert_eq!((a - b).value, 60);
    }
}
