//! Conversions between Premiere tick counts and rational time.
//!
//! Premiere stores every time value as an integer count of ticks at a fixed
//! 254 016 000 000 ticks per second. The constant is large enough that a
//! round trip through f64 corrupts integer results, so every conversion here
//! stays in integer/rational arithmetic; floating point appears only in the
//! caller-facing seconds helpers.

use prproj_core::{Rational, RationalTime};

use crate::error::{Error, Result};

/// Premiere ticks per second.
pub const TICKS_PER_SECOND: i64 = 254_016_000_000;

/// Exact seconds denoted by a tick count.
pub fn seconds_from_ticks(ticks: i64) -> Rational {
    Rational::new(ticks, TICKS_PER_SECOND)
}

/// Exact tick count denoted by rational seconds.
///
/// Inverse of [`seconds_from_ticks`]: any value produced there converts
/// back without loss. Seconds that do not fall on a tick truncate.
pub fn ticks_from_seconds(seconds: Rational) -> i64 {
    (seconds.num as i128 * TICKS_PER_SECOND as i128 / seconds.den as i128) as i64
}

/// Frame rate encoded as a per-frame tick interval.
///
/// Premiere stores a video track group's frame rate as the number of ticks
/// one frame lasts; the rate is `TICKS_PER_SECOND / interval`, kept rational
/// (10 594 584 000 ticks yields exactly 24000/1001).
pub fn frame_rate_from_interval(interval: i64) -> Result<Rational> {
    if interval <= 0 {
        return Err(Error::MalformedValue {
            tag: "FrameRate".into(),
            value: interval.to_string(),
        });
    }
    Ok(Rational::new(TICKS_PER_SECOND, interval))
}

/// Quantize a tick count to whole frames at `rate`.
pub fn frames_from_ticks(ticks: i64, rate: Rational) -> i64 {
    RationalTime::from_seconds(seconds_from_ticks(ticks), rate).value
}

/// Quantize a tick count to a frame-counted time at `rate`.
pub fn time_from_ticks(ticks: i64, rate: Rational) -> RationalTime {
    RationalTime::from_seconds(seconds_from_ticks(ticks), rate)
}
