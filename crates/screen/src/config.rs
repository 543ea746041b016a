//! Screen geometry configuration

/// Physical panel geometry and wiring options.
///
/// The panel is split into a main region on top and an optional status
/// bar along the bottom edge. In double-size mode the main frame is drawn
/// at half resolution and scaled 2× over the whole panel, with no status
/// bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenConfig {
    /// Panel width in pixels.
    pub width: u16,
    /// Panel height in pixels, status bar included.
    pub height: u16,
    /// Rows reserved for the status bar; 0 disables it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status_bar_height: u16,
    /// Draw the main frame at half resolution, scaled 2×.
    #[cfg_attr(feature = "serde", serde(default))]
    pub double_size: bool,
    /// Panel colour lines are inverted; palettes are XORed with `0xFFFFFF`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub invert_palette: bool,
}

impl ScreenConfig {
    /// 160×128 panel with an 8-row status bar, leaving a 160×120 frame.
    pub const ARCADE: Self = Self {
        width: 160,
        height: 128,
        status_bar_height: 8,
        double_size: false,
        invert_palette: false,
    };

    /// 160×128 panel, all of it main frame.
    pub const NO_STATUS_BAR: Self = Self {
        width: 160,
        height: 128,
        status_bar_height: 0,
        double_size: false,
        invert_palette: false,
    };

    /// `true` when a status bar is shown.
    pub fn has_status_bar(&self) -> bool {
        self.status_bar_height > 0 && !self.double_size
    }

    /// Pixel scale the main frame is presented at (1 or 2).
    pub fn frame_scale(&self) -> u16 {
        if self.double_size {
            2
        } else {
            1
        }
    }

    /// Size of the main frame image.
    pub fn main_size(&self) -> (u16, u16) {
        if self.double_size {
            (self.width / 2, self.height / 2)
        } else if self.has_status_bar() {
            (self.width, self.height.saturating_sub(self.status_bar_height))
        } else {
            (self.width, self.height)
        }
    }

    /// Size of the status bar image, when there is one.
    pub fn status_bar_size(&self) -> Option<(u16, u16)> {
        self.has_status_bar()
            .then_some((self.width, self.status_bar_height))
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self::ARCADE
    }
}
