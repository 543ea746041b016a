//! Backlight brightness
//!
//! `Brightness` wraps a percentage with the invariant `10 <= value <= 100`.
//! Construct with [`Brightness::new`] (clamping) or [`Brightness::try_new`]
//! (fallible, strict).

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[error("{value} is outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: i32,
    /// The inclusive minimum allowed value.
    pub min: i32,
    /// The inclusive maximum allowed value.
    pub max: i32,
}

/// Backlight level as a percentage, clamped to 10–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Brightness(u8);

impl Brightness {
    /// Dimmest accepted level.
    pub const MIN: Self = Self(10);
    /// Full brightness, also the power-on level.
    pub const MAX: Self = Self(100);

    /// Create a `Brightness`, clamping `value` into 10–100.
    #[must_use]
    // SAFETY: the clamped value lies in 10..=100, which fits u8.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(value: i32) -> Self {
        Self(value.clamp(i32::from(Self::MIN.0), i32::from(Self::MAX.0)) as u8)
    }

    /// Create a `Brightness`, returning an error outside 10–100.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value < 10` or `value > 100`.
    pub fn try_new(value: i32) -> Result<Self, OutOfRangeError> {
        let (min, max) = (i32::from(Self::MIN.0), i32::from(Self::MAX.0));
        if (min..=max).contains(&value) {
            Ok(Self::new(value))
        } else {
            Err(OutOfRangeError { value, min, max })
        }
    }

    /// The level as a percentage (10–100).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The level as a factor in `0.1..=1.0`.
    #[must_use]
    pub fn factor(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

impl From<Brightness> for u8 {
    fn from(b: Brightness) -> Self {
        b.0
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn new_clamps_both_ends() {
        assert_eq!(Brightness::new(0).get(), 10);
        assert_eq!(Brightness::new(-500).get(), 10);
        assert_eq!(Brightness::new(55).get(), 55);
        assert_eq!(Brightness::new(250).get(), 100);
        assert_eq!(Brightness::new(i32::MAX).get(), 100);
    }

    #[test]
    fn try_new_is_strict() {
        assert_eq!(Brightness::try_new(10).unwrap().get(), 10);
        assert_eq!(Brightness::try_new(100).unwrap().get(), 100);
        assert_eq!(
            Brightness::try_new(9),
            Err(OutOfRangeError { value: 9, min: 10, max: 100 })
        );
        assert!(Brightness::try_new(101).is_err());
    }

    #[test]
    fn default_is_full() {
        assert_eq!(Brightness::default().get(), 100);
        assert!((Brightness::default().factor() - 1.0).abs() < f32::EPSILON);
    }
}
