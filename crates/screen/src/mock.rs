//! Mock presenter for testing
//!
//! [`RecordingPresenter`] accepts everything and records each call in
//! order, so tests can assert on exactly what the compositor sent.

use raster::{Image, Palette};

use crate::brightness::Brightness;
use crate::presenter::{PresentError, Presenter};

/// One recorded presenter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `present` with the palette it carried.
    Present {
        /// Palette sent alongside the frame.
        palette: Option<Palette>,
    },
    /// `present_status_bar`.
    PresentStatusBar,
    /// `setup_status_bar` with the reserved height.
    SetupStatusBar(u16),
    /// `report_status_text` with its message.
    ReportStatusText(String),
    /// `set_brightness` with the level as a percentage.
    SetBrightness(u8),
}

/// Presenter that records calls and keeps the last images it was sent.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    calls: Vec<Call>,
    last_frame: Option<Image>,
    last_status_bar: Option<Image>,
    busy: bool,
}

impl RecordingPresenter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Copy of the last frame presented.
    pub fn last_frame(&self) -> Option<&Image> {
        self.last_frame.as_ref()
    }

    /// Copy of the last status bar presented.
    pub fn last_status_bar(&self) -> Option<&Image> {
        self.last_status_bar.as_ref()
    }

    /// While busy, both present calls fail with [`PresentError::Busy`]
    /// and are not recorded.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, frame: &Image, palette: Option<&Palette>) -> Result<(), PresentError> {
        if self.busy {
            return Err(PresentError::Busy);
        }
        self.calls.push(Call::Present {
            palette: palette.copied(),
        });
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn present_status_bar(&mut self, bar: &Image) -> Result<(), PresentError> {
        if self.busy {
            return Err(PresentError::Busy);
        }
        self.calls.push(Call::PresentStatusBar);
        self.last_status_bar = Some(bar.clone());
        Ok(())
    }

    fn setup_status_bar(&mut self, height: u16) {
        self.calls.push(Call::SetupStatusBar(height));
    }

    fn report_status_text(&mut self, message: &str) {
        self.calls.push(Call::ReportStatusText(message.into()));
    }

    fn set_brightness(&mut self, level: Brightness) {
        self.calls.push(Call::SetBrightness(level.get()));
    }
}
