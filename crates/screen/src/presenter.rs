//! Presentation HAL
//!
//! The compositor never talks to a panel directly. It calls a
//! [`Presenter`], which a hardware driver, the desktop emulator or a test
//! mock implements. The same compositor code runs against all of them.
//!
//! Calls are synchronous: a presenter copies or queues what it is handed
//! and returns. A driver whose previous transfer is still in flight
//! reports [`PresentError::Busy`] and the compositor skips that tick.

use raster::{Image, Palette};

use crate::brightness::Brightness;

/// Errors a presenter reports back to the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
pub enum PresentError {
    /// Main frame does not match the panel's main region at the current scale.
    #[error("frame is {found_width}x{found_height}, panel expects {expected_width}x{expected_height}")]
    FrameSizeMismatch {
        /// Width the panel expects.
        expected_width: u16,
        /// Height the panel expects.
        expected_height: u16,
        /// Width of the frame supplied.
        found_width: u16,
        /// Height of the frame supplied.
        found_height: u16,
    },

    /// Status bar image does not match the configured bar region.
    #[error("status bar is {found_width}x{found_height}, panel expects {expected_width}x{expected_height}")]
    StatusBarSizeMismatch {
        /// Width the panel expects.
        expected_width: u16,
        /// Height the panel expects (0 when no bar is configured).
        expected_height: u16,
        /// Width of the image supplied.
        found_width: u16,
        /// Height of the image supplied.
        found_height: u16,
    },

    /// Panel only accepts 4-bit indexed frames.
    #[error("panel requires 4bpp images, got {0}bpp")]
    UnsupportedDepth(u8),

    /// Previous transfer has not finished.
    #[error("display busy")]
    Busy,
}

/// Host side of frame presentation.
pub trait Presenter {
    /// Transfer the main frame. `palette` is `Some` only when it changed
    /// since the last successful call.
    ///
    /// # Errors
    ///
    /// Size or depth mismatches, or [`PresentError::Busy`].
    fn present(&mut self, frame: &Image, palette: Option<&Palette>) -> Result<(), PresentError>;

    /// Transfer the status bar overlay.
    ///
    /// # Errors
    ///
    /// Size or depth mismatches, or [`PresentError::Busy`].
    fn present_status_bar(&mut self, bar: &Image) -> Result<(), PresentError>;

    /// Reserve `height` rows at the bottom of the panel for the status bar.
    fn setup_status_bar(&mut self, height: u16);

    /// Free-form status text (frame statistics and the like).
    fn report_status_text(&mut self, message: &str);

    /// Set the backlight level.
    fn set_brightness(&mut self, level: Brightness);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn present(&mut self, frame: &Image, palette: Option<&Palette>) -> Result<(), PresentError> {
        (**self).present(frame, palette)
    }

    fn present_status_bar(&mut self, bar: &Image) -> Result<(), PresentError> {
        (**self).present_status_bar(bar)
    }

    fn setup_status_bar(&mut self, height: u16) {
        (**self).setup_status_bar(height);
    }

    fn report_status_text(&mut self, message: &str) {
        (**self).report_status_text(message);
    }

    fn set_brightness(&mut self, level: Brightness) {
        (**self).set_brightness(level);
    }
}
