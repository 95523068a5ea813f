//! Effects attached to clips and stacks.

use serde::{Deserialize, Serialize};

/// A constant-rate playback speed change.
///
/// `time_scalar` is the speed multiplier: 2.0 plays the source at double
/// speed, 0.5 at half speed. The placed duration of the owning item is the
/// track-position span and is not rescaled by this effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTimeWarp {
    /// Playback speed multiplier (1.0 = normal).
    pub time_scalar: f64,
}

impl LinearTimeWarp {
    /// Create a time warp with the given speed multiplier.
    pub fn new(time_scalar: f64) -> Self {
        Self { time_scalar }
    }
}

/// An effect applied to a track item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Constant-rate speed change.
    LinearTimeWarp(LinearTimeWarp),
}

impl Effect {
    /// Stable name of the effect kind.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::LinearTimeWarp(_) => "LinearTimeWarp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_name() {
        let fx = Effect::LinearTimeWarp(LinearTimeWarp::new(2.0));
        assert_eq!(fx.name(), "LinearTimeWarp");
    }
}
