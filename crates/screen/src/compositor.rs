//! Frame compositor
//!
//! Owns the main frame, the optional status bar and the screen-wide
//! palette and brightness, and hands them to a [`Presenter`] once per
//! display refresh tick. It never draws into the frame itself; game code
//! does that through [`Compositor::frame_mut`] between ticks.
//!
//! ```text
//! game code ──draws──► frame ─┐
//!                             ├─► present() ──► Presenter::present(frame, palette?)
//! report_stats() ─► bar ──────┘                 Presenter::present_status_bar(bar)
//! ```

use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::{Drawable, Point};
use embedded_graphics::text::{Baseline, Text};
use raster::{Image, Palette, PaletteIndex, RasterError};

use crate::brightness::Brightness;
use crate::config::ScreenConfig;
use crate::presenter::{PresentError, Presenter};

/// Longest status message kept by [`Compositor::last_stats`].
pub const STATS_CAPACITY: usize = 64;

/// Top-left corner of status-bar text.
const STATS_ORIGIN: Point = Point::new(2, 2);

/// Palette index status-bar text is drawn in.
const STATS_COLOR: PaletteIndex = PaletteIndex(1);

/// What a [`Compositor::present`] tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presented {
    /// The frame was handed off.
    Frame,
    /// The presenter was busy; nothing was sent and pending state is kept.
    Skipped,
}

/// Main frame, status bar and screen state bound to one presenter.
pub struct Compositor<P: Presenter> {
    config: ScreenConfig,
    presenter: P,
    frame: Image,
    status_bar: Option<Image>,
    status_pending: bool,
    palette: Palette,
    palette_pending: bool,
    brightness: Brightness,
    last_stats: heapless::String<STATS_CAPACITY>,
    frames_presented: u32,
    frames_skipped: u32,
}

impl<P: Presenter> Compositor<P> {
    /// Create the screen for `config`.
    ///
    /// The main frame is sized to [`ScreenConfig::main_size`]. When the
    /// configuration has a status bar, the presenter is told to reserve
    /// it and a blank bar is queued for the first tick. The palette is
    /// sent with the first frame.
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidDimensions`] if the configured geometry gives
    /// an empty or oversized frame or status bar.
    pub fn new(config: ScreenConfig, palette: Palette, mut presenter: P) -> Result<Self, RasterError> {
        let (width, height) = config.main_size();
        let frame = Image::new(width, height)?;

        let status_bar = match config.status_bar_size() {
            Some((bar_width, bar_height)) => {
                let bar = Image::new(bar_width, bar_height)?;
                presenter.setup_status_bar(bar_height);
                Some(bar)
            }
            None => None,
        };

        tracing::debug!(
            width,
            height,
            status_bar = config.status_bar_height,
            double_size = config.double_size,
            "compositor created"
        );

        Ok(Self {
            config,
            presenter,
            frame,
            status_pending: status_bar.is_some(),
            status_bar,
            palette,
            palette_pending: true,
            brightness: Brightness::default(),
            last_stats: heapless::String::new(),
            frames_presented: 0,
            frames_skipped: 0,
        })
    }

    /// Hand the current frame, and the status bar if it changed, to the
    /// presenter. Call once per display refresh tick.
    ///
    /// A pending palette travels with the frame and is not resent until
    /// [`Compositor::set_palette`] is called again. If the presenter is
    /// busy the tick is skipped and everything pending stays pending.
    ///
    /// # Errors
    ///
    /// Any presenter error other than [`PresentError::Busy`]. Pending
    /// state is kept so the next tick retries. A frame that was accepted
    /// is counted even when the status bar transfer then fails.
    pub fn present(&mut self) -> Result<Presented, PresentError> {
        let palette = self.palette_pending.then(|| self.panel_palette());

        match self.presenter.present(&self.frame, palette.as_ref()) {
            Ok(()) => {
                if palette.is_some() {
                    self.palette_pending = false;
                    tracing::debug!("palette sent");
                }
            }
            Err(PresentError::Busy) => {
                self.frames_skipped = self.frames_skipped.wrapping_add(1);
                tracing::trace!(skipped = self.frames_skipped, "presenter busy, tick skipped");
                return Ok(Presented::Skipped);
            }
            Err(e) => {
                tracing::warn!(error = %e, "frame rejected by presenter");
                return Err(e);
            }
        }

        self.frames_presented = self.frames_presented.wrapping_add(1);
        tracing::trace!(frame = self.frames_presented, "frame presented");

        if self.status_pending {
            if let Some(bar) = &self.status_bar {
                match self.presenter.present_status_bar(bar) {
                    Ok(()) => self.status_pending = false,
                    Err(PresentError::Busy) => {
                        tracing::trace!("presenter busy, status bar deferred");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "status bar rejected by presenter");
                        return Err(e);
                    }
                }
            }
        }

        Ok(Presented::Frame)
    }

    /// Palette as the panel sees it, inverted when the panel is wired so.
    fn panel_palette(&self) -> Palette {
        if self.config.invert_palette {
            self.palette.inverted()
        } else {
            self.palette
        }
    }

    /// Replace the screen palette. It is sent with the next frame.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.palette_pending = true;
        tracing::debug!("palette changed");
    }

    /// Current palette, as set (before any panel inversion).
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Set the backlight, clamped to 10–100, and forward it to the
    /// presenter. Returns the clamped level.
    pub fn set_brightness(&mut self, level: i32) -> Brightness {
        let level = Brightness::new(level);
        self.brightness = level;
        self.presenter.set_brightness(level);
        tracing::debug!(level = level.get(), "brightness set");
        level
    }

    /// Last level set with [`Compositor::set_brightness`], 100 initially.
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Show `message` on the status bar and forward it as status text.
    ///
    /// The bar is cleared and the text drawn at (2, 2) in colour 1 with a
    /// 4×6 font. Without a status bar only the forwarding happens.
    pub fn report_stats(&mut self, message: &str) {
        if let Some(bar) = self.status_bar.as_mut() {
            bar.fill(0);
            let style = MonoTextStyle::new(&FONT_4X6, STATS_COLOR);
            let _ = Text::with_baseline(message, STATS_ORIGIN, style, Baseline::Top).draw(bar);
            self.status_pending = true;
        }

        self.last_stats.clear();
        for ch in message.chars() {
            if self.last_stats.push(ch).is_err() {
                break;
            }
        }
        self.presenter.report_status_text(message);
    }

    /// Queue the status bar for transfer on the next tick, after drawing
    /// into it through [`Compositor::status_bar_mut`].
    pub fn update_status_bar(&mut self) {
        if self.status_bar.is_some() {
            self.status_pending = true;
        }
    }

    /// `true` if the status bar will be sent on the next tick.
    pub fn status_bar_pending(&self) -> bool {
        self.status_pending
    }

    /// Last message passed to [`Compositor::report_stats`], truncated to
    /// [`STATS_CAPACITY`] bytes.
    pub fn last_stats(&self) -> &str {
        &self.last_stats
    }

    /// The main frame.
    pub fn frame(&self) -> &Image {
        &self.frame
    }

    /// The main frame, for drawing.
    pub fn frame_mut(&mut self) -> &mut Image {
        &mut self.frame
    }

    /// The status bar, if configured.
    pub fn status_bar(&self) -> Option<&Image> {
        self.status_bar.as_ref()
    }

    /// The status bar, for drawing. Call [`Compositor::update_status_bar`]
    /// afterwards to have it sent.
    pub fn status_bar_mut(&mut self) -> Option<&mut Image> {
        self.status_bar.as_mut()
    }

    /// Screen configuration.
    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Frames handed off so far (wrapping).
    pub fn frames_presented(&self) -> u32 {
        self.frames_presented
    }

    /// Ticks skipped because the presenter was busy (wrapping).
    pub fn frames_skipped(&self) -> u32 {
        self.frames_skipped
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The presenter, mutably.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Tear down the compositor and return the presenter.
    pub fn into_presenter(self) -> P {
        self.presenter
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]
    use super::*;
    use crate::mock::{Call, RecordingPresenter};

    fn arcade() -> Compositor<RecordingPresenter> {
        Compositor::new(ScreenConfig::ARCADE, Palette::ARCADE, RecordingPresenter::new()).unwrap()
    }

    #[test]
    fn creation_reserves_status_bar() {
        let screen = arcade();
        assert_eq!(screen.frame().width(), 160);
        assert_eq!(screen.frame().height(), 120);
        let bar = screen.status_bar().unwrap();
        assert_eq!((bar.width(), bar.height()), (160, 8));
        assert_eq!(screen.presenter().calls(), &[Call::SetupStatusBar(8)]);
        assert!(screen.status_bar_pending());
        assert_eq!(screen.brightness().get(), 100);
    }

    #[test]
    fn first_tick_sends_palette_and_blank_bar() {
        let mut screen = arcade();
        assert_eq!(screen.present().unwrap(), Presented::Frame);
        assert_eq!(
            screen.presenter().calls(),
            &[
                Call::SetupStatusBar(8),
                Call::Present { palette: Some(Palette::ARCADE) },
                Call::PresentStatusBar,
            ]
        );
        assert!(!screen.status_bar_pending());

        screen.presenter_mut().clear();
        screen.present().unwrap();
        assert_eq!(screen.presenter().calls(), &[Call::Present { palette: None }]);
    }

    #[test]
    fn palette_resent_only_after_change() {
        let mut screen = arcade();
        screen.present().unwrap();
        screen.presenter_mut().clear();

        let inv = Palette::ARCADE.inverted();
        screen.set_palette(inv);
        screen.present().unwrap();
        screen.present().unwrap();
        assert_eq!(
            screen.presenter().calls(),
            &[Call::Present { palette: Some(inv) }, Call::Present { palette: None }]
        );
    }

    #[test]
    fn inverted_panel_receives_inverted_palette() {
        let config = ScreenConfig {
            invert_palette: true,
            ..ScreenConfig::ARCADE
        };
        let mut screen = Compositor::new(config, Palette::ARCADE, RecordingPresenter::new()).unwrap();
        screen.present().unwrap();
        assert!(screen
            .presenter()
            .calls()
            .contains(&Call::Present { palette: Some(Palette::ARCADE.inverted()) }));
        assert_eq!(screen.palette(), &Palette::ARCADE);
    }

    #[test]
    fn brightness_is_clamped_and_forwarded() {
        let mut screen = arcade();
        assert_eq!(screen.set_brightness(3).get(), 10);
        assert_eq!(screen.set_brightness(250).get(), 100);
        assert_eq!(screen.set_brightness(42).get(), 42);
        assert_eq!(screen.brightness().get(), 42);
        assert_eq!(
            &screen.presenter().calls()[1..],
            &[
                Call::SetBrightness(10),
                Call::SetBrightness(100),
                Call::SetBrightness(42),
            ]
        );
    }

    #[test]
    fn report_stats_draws_and_forwards() {
        let mut screen = arcade();
        screen.present().unwrap();
        screen.report_stats("fps:30");

        let bar = screen.status_bar().unwrap();
        assert!(bar.pixels().iter().any(|&p| p == 1));
        assert!(bar.pixels().iter().all(|&p| p <= 1));
        // Nothing left of the text origin.
        assert!((0..8).all(|y| bar.pixel(0, y) == 0 && bar.pixel(1, y) == 0));
        assert!(screen.status_bar_pending());
        assert_eq!(screen.last_stats(), "fps:30");
        assert!(screen
            .presenter()
            .calls()
            .contains(&Call::ReportStatusText("fps:30".into())));
    }

    #[test]
    fn busy_presenter_skips_tick_and_keeps_pending_state() {
        let mut screen = arcade();
        screen.presenter_mut().set_busy(true);
        assert_eq!(screen.present().unwrap(), Presented::Skipped);
        assert_eq!(screen.frames_skipped(), 1);
        assert!(screen.status_bar_pending());

        screen.presenter_mut().set_busy(false);
        screen.presenter_mut().clear();
        assert_eq!(screen.present().unwrap(), Presented::Frame);
        assert_eq!(
            screen.presenter().calls(),
            &[Call::Present { palette: Some(Palette::ARCADE) }, Call::PresentStatusBar]
        );
        assert_eq!(screen.frames_presented(), 1);
    }

    #[test]
    fn double_size_has_no_status_bar() {
        let config = ScreenConfig {
            double_size: true,
            ..ScreenConfig::ARCADE
        };
        let mut screen = Compositor::new(config, Palette::ARCADE, RecordingPresenter::new()).unwrap();
        assert_eq!((screen.frame().width(), screen.frame().height()), (80, 64));
        assert!(screen.status_bar().is_none());
        assert!(screen.presenter().calls().is_empty());

        screen.report_stats("hi");
        screen.update_status_bar();
        assert!(!screen.status_bar_pending());
        screen.present().unwrap();
        assert!(!screen.presenter().calls().contains(&Call::PresentStatusBar));
    }

    #[test]
    fn long_stats_are_truncated() {
        let mut screen = arcade();
        let long = "x".repeat(STATS_CAPACITY + 10);
        screen.report_stats(&long);
        assert_eq!(screen.last_stats().len(), STATS_CAPACITY);
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        let config = ScreenConfig {
            width: 0,
            ..ScreenConfig::ARCADE
        };
        assert!(Compositor::new(config, Palette::ARCADE, RecordingPresenter::new()).is_err());
    }
}
