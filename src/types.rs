// Copyright (c) 2024 Mike Tsao. All rights reserved.

use serde::{Deserialize, Serialize};

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::{Normal, Note, RangedF64, Velocity, DEFAULT_VELOCITY};
}

/// A MIDI note number, or for instruments without pitch (like a drum pad), the
/// index of the pad.
pub type Note = u8;

/// MIDI-style note velocity, 0..=127.
pub type Velocity = u8;

/// The velocity used when the host or the user doesn't supply one.
pub const DEFAULT_VELOCITY: Velocity = 90;

/// [RangedF64] enforces the given range limits while not becoming too expensive
/// to use compared to a plain f64. It enforces the value at creation.
///
/// [RangedF64] doesn't tell you when clamping happens. It just does it,
/// silently. NaN has no place in the range and becomes the lower bound.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RangedF64<const LOWER: i8, const UPPER: i8>(pub f64);
#[allow(missing_docs)]
impl<const LOWER: i8, const UPPER: i8> RangedF64<LOWER, UPPER> {
    /// The highest valid value.
    pub const MAX: f64 = UPPER as f64;
    /// The lowest valid value.
    pub const MIN: f64 = LOWER as f64;

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::minimum()
        } else {
            Self(value.clamp(Self::MIN, Self::MAX))
        }
    }
    pub const fn maximum() -> Self {
        Self(Self::MAX)
    }
    pub const fn minimum() -> Self {
        Self(Self::MIN)
    }
    pub fn get(&self) -> f64 {
        self.0
    }
}
/// A Normal is a [RangedF64] whose range is [0.0, 1.0].
pub type Normal = RangedF64<0, 1>;
impl Default for Normal {
    fn default() -> Self {
        Self(0.0)
    }
}
