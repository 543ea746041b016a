//! Virtual Game Screen Panel
//!
//! Headless stand-in for the panel driver behind a [`screen::Compositor`].
//! It checks every transfer the way the hardware path does, resolves
//! indexed frames to RGB through the last palette it received, and keeps
//! the result in an [`RgbFramebuffer`] that tests can inspect or save as a
//! PNG.
//!
//! ```text
//! ┌──────────────────────────┐ row 0
//! │ main region              │  frame (× frame_scale)
//! │                          │
//! ├──────────────────────────┤ row height - status_bar_height
//! │ status bar               │  status bar image
//! └──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use raster::Palette;
//! use screen::{Compositor, ScreenConfig};
//! use screen_emulator::{Emulator, EmulatorConfig};
//!
//! let emulator = Emulator::new(EmulatorConfig::NATIVE);
//! let mut screen = Compositor::new(ScreenConfig::ARCADE, Palette::ARCADE, emulator)?;
//! screen.frame_mut().fill_rect(0, 0, 10, 10, 2);
//! screen.present().ok();
//! assert_eq!(screen.presenter().framebuffer().pixel(5, 5), Some(0xFF2121));
//! # Ok::<(), raster::RasterError>(())
//! ```

pub mod config;
pub mod framebuffer;

use std::path::Path;

use image::{Rgb, RgbImage};
use raster::{Image, Palette};
use screen::{Brightness, PresentError, Presenter};

pub use config::{EmulatorConfig, EmulatorError, MAX_SCALE};
pub use framebuffer::RgbFramebuffer;

/// Transfer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayStats {
    /// Main frames accepted.
    pub frames: u32,
    /// Status bar transfers accepted.
    pub status_bar_updates: u32,
    /// Palettes received with a frame.
    pub palette_updates: u32,
    /// Transfers refused for size or depth.
    pub rejected: u32,
}

/// Headless panel implementing [`Presenter`].
#[derive(Debug, Clone)]
pub struct Emulator {
    config: EmulatorConfig,
    framebuffer: RgbFramebuffer,
    palette: Palette,
    status_bar_height: u16,
    brightness: Brightness,
    last_status_text: Option<String>,
    stats: DisplayStats,
}

impl Emulator {
    /// Create a panel for `config`. The screen starts black at full
    /// brightness, with no status bar until one is set up.
    pub fn new(config: EmulatorConfig) -> Self {
        tracing::debug!(
            width = config.screen.width,
            height = config.screen.height,
            scale = config.scale,
            "emulator created"
        );
        Self {
            config,
            framebuffer: RgbFramebuffer::new(config.screen.width, config.screen.height),
            palette: Palette::ARCADE,
            status_bar_height: 0,
            brightness: Brightness::default(),
            last_status_text: None,
            stats: DisplayStats::default(),
        }
    }

    /// Configuration the panel was created with.
    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// What the panel currently shows.
    pub fn framebuffer(&self) -> &RgbFramebuffer {
        &self.framebuffer
    }

    /// Palette in effect, as last received.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Backlight level.
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Rows currently reserved for the status bar.
    pub fn status_bar_height(&self) -> u16 {
        self.status_bar_height
    }

    /// Last status text reported.
    pub fn last_status_text(&self) -> Option<&str> {
        self.last_status_text.as_deref()
    }

    /// Transfer counters.
    pub fn stats(&self) -> DisplayStats {
        self.stats
    }

    /// Size the main frame must have: the panel minus the status bar,
    /// divided by the frame scale.
    pub fn expected_frame_size(&self) -> (u16, u16) {
        let scale = self.config.screen.frame_scale();
        let height = self.config.screen.height.saturating_sub(self.status_bar_height);
        (
            self.config.screen.width.checked_div(scale).unwrap_or(0),
            height.checked_div(scale).unwrap_or(0),
        )
    }

    fn reject(&mut self, err: PresentError) -> Result<(), PresentError> {
        self.stats.rejected = self.stats.rejected.wrapping_add(1);
        tracing::warn!(error = %err, "transfer rejected");
        Err(err)
    }

    /// Render the panel as an RGB image, upscaled by the configured scale
    /// and dimmed by the backlight level.
    // SAFETY: panel sides are u16 and scale is at most MAX_SCALE, so the
    // scaled sizes fit u32; channel products are at most 255.
    #[allow(
        clippy::arithmetic_side_effects,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn to_rgb_image(&self) -> RgbImage {
        let scale = self.config.scale.clamp(1, MAX_SCALE);
        let width = u32::from(self.framebuffer.width());
        let height = u32::from(self.framebuffer.height());
        let factor = self.brightness.factor();
        let dim = |channel: u32| ((channel & 0xFF) as f32 * factor).round() as u8;

        RgbImage::from_fn(width * scale, height * scale, |x, y| {
            let px = u16::try_from(x / scale).unwrap_or(u16::MAX);
            let py = u16::try_from(y / scale).unwrap_or(u16::MAX);
            let rgb = self.framebuffer.pixel(px, py).unwrap_or(0);
            Rgb([dim(rgb >> 16), dim(rgb >> 8), dim(rgb)])
        })
    }

    /// Save the panel as a PNG.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::Screenshot`] if encoding or writing fails.
    pub fn screenshot(&self, path: impl AsRef<Path>) -> Result<(), EmulatorError> {
        let path = path.as_ref();
        self.to_rgb_image()
            .save(path)
            .map_err(|e| EmulatorError::Screenshot(e.to_string()))?;
        tracing::debug!(path = %path.display(), "screenshot saved");
        Ok(())
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(EmulatorConfig::DEFAULT)
    }
}

impl Presenter for Emulator {
    fn present(&mut self, frame: &Image, palette: Option<&Palette>) -> Result<(), PresentError> {
        if frame.bpp() != 4 {
            return self.reject(PresentError::UnsupportedDepth(frame.bpp()));
        }
        let (expected_width, expected_height) = self.expected_frame_size();
        if (frame.width(), frame.height()) != (expected_width, expected_height) {
            return self.reject(PresentError::FrameSizeMismatch {
                expected_width,
                expected_height,
                found_width: frame.width(),
                found_height: frame.height(),
            });
        }

        if let Some(palette) = palette {
            self.palette = *palette;
            self.stats.palette_updates = self.stats.palette_updates.wrapping_add(1);
            tracing::debug!("palette loaded");
        }

        let scale = self.config.screen.frame_scale();
        self.framebuffer.blit_indexed(frame, &self.palette, 0, scale);
        self.stats.frames = self.stats.frames.wrapping_add(1);
        tracing::trace!(frame = self.stats.frames, "frame shown");
        Ok(())
    }

    fn present_status_bar(&mut self, bar: &Image) -> Result<(), PresentError> {
        if bar.bpp() != 4 {
            return self.reject(PresentError::UnsupportedDepth(bar.bpp()));
        }
        let expected_width = self.config.screen.width;
        let expected_height = self.status_bar_height;
        if expected_height == 0 || (bar.width(), bar.height()) != (expected_width, expected_height) {
            return self.reject(PresentError::StatusBarSizeMismatch {
                expected_width,
                expected_height,
                found_width: bar.width(),
                found_height: bar.height(),
            });
        }

        let top = self.config.screen.height.saturating_sub(expected_height);
        self.framebuffer.blit_indexed(bar, &self.palette, top, 1);
        self.stats.status_bar_updates = self.stats.status_bar_updates.wrapping_add(1);
        Ok(())
    }

    fn setup_status_bar(&mut self, height: u16) {
        if self.config.screen.double_size {
            tracing::debug!(height, "status bar ignored in double-size mode");
            return;
        }
        self.status_bar_height = height.min(self.config.screen.height);
        tracing::debug!(height = self.status_bar_height, "status bar reserved");
    }

    fn report_status_text(&mut self, message: &str) {
        tracing::debug!(text = message, "status");
        self.last_status_text = Some(message.to_owned());
    }

    fn set_brightness(&mut self, level: Brightness) {
        self.brightness = level;
        tracing::debug!(level = level.get(), "backlight");
    }
}
