//! Emulator configuration

use screen::ScreenConfig;
use serde::{Deserialize, Serialize};

/// Largest accepted screenshot upscaling factor.
pub const MAX_SCALE: u32 = 8;

/// Errors raised by the emulator outside the presentation path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror_no_std::Error)]
pub enum EmulatorError {
    /// Configuration JSON could not be parsed or holds invalid values.
    #[error("invalid emulator config: {0}")]
    Config(String),

    /// Screenshot could not be encoded or written.
    #[error("screenshot failed: {0}")]
    Screenshot(String),
}

/// Panel geometry plus presentation options for the emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatorConfig {
    /// Panel geometry, shared with the compositor.
    pub screen: ScreenConfig,
    /// Screenshot upscaling factor (1 = one PNG pixel per panel pixel).
    #[serde(default = "default_scale")]
    pub scale: u32,
}

fn default_scale() -> u32 {
    EmulatorConfig::DEFAULT.scale
}

impl EmulatorConfig {
    /// Arcade panel, 2× screenshots for visibility.
    pub const DEFAULT: Self = Self {
        screen: ScreenConfig::ARCADE,
        scale: 2,
    };

    /// Arcade panel, 1:1 screenshots. Used for golden files.
    pub const NATIVE: Self = Self {
        screen: ScreenConfig::ARCADE,
        scale: 1,
    };

    /// Parse a configuration from JSON.
    ///
    /// ```
    /// use screen_emulator::EmulatorConfig;
    ///
    /// let cfg = EmulatorConfig::from_json(
    ///     r#"{ "screen": { "width": 160, "height": 128, "status_bar_height": 8 }, "scale": 3 }"#,
    /// )?;
    /// assert_eq!(cfg.scale, 3);
    /// assert_eq!(cfg.screen.main_size(), (160, 120));
    /// # Ok::<(), screen_emulator::EmulatorError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`EmulatorError::Config`] for malformed JSON, an empty panel, or a
    /// scale outside `1..=MAX_SCALE`.
    pub fn from_json(json: &str) -> Result<Self, EmulatorError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| EmulatorError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::Config`] if serialization fails.
    pub fn to_json(&self) -> Result<String, EmulatorError> {
        serde_json::to_string_pretty(self).map_err(|e| EmulatorError::Config(e.to_string()))
    }

    /// Check the geometry and scale.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), EmulatorError> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(EmulatorError::Config("panel has zero area".into()));
        }
        if self.screen.status_bar_height >= self.screen.height {
            return Err(EmulatorError::Config(format!(
                "status bar of {} rows leaves no room on a {}-row panel",
                self.screen.status_bar_height, self.screen.height
            )));
        }
        if !(1..=MAX_SCALE).contains(&self.scale) {
            return Err(EmulatorError::Config(format!(
                "scale {} outside 1..={MAX_SCALE}",
                self.scale
            )));
        }
        Ok(())
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn json_round_trip() {
        let cfg = EmulatorConfig {
            screen: ScreenConfig {
                invert_palette: true,
                ..ScreenConfig::ARCADE
            },
            scale: 4,
        };
        let json = cfg.to_json().unwrap();
        assert_eq!(EmulatorConfig::from_json(&json).unwrap(), cfg);
    }

    #[test]
    fn scale_defaults_when_missing() {
        let cfg = EmulatorConfig::from_json(r#"{ "screen": { "width": 128, "height": 64 } }"#).unwrap();
        assert_eq!(cfg.scale, 2);
        assert_eq!(cfg.screen.status_bar_height, 0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            EmulatorConfig::from_json("{ not json"),
            Err(EmulatorError::Config(_))
        ));
        assert!(EmulatorConfig::from_json(r#"{ "screen": { "width": 0, "height": 64 } }"#).is_err());
        assert!(EmulatorConfig::from_json(
            r#"{ "screen": { "width": 160, "height": 8, "status_bar_height": 8 } }"#
        )
        .is_err());
        assert!(EmulatorConfig::from_json(
            r#"{ "screen": { "width": 160, "height": 128 }, "scale": 0 }"#
        )
        .is_err());
    }
}
