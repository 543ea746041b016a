//! Screen Testing Utilities
//!
//! Headless test harness for code that draws through a
//! [`screen::Compositor`]. A [`TestScreen`] owns a compositor bound to the
//! [`screen_emulator::Emulator`], so a test can draw, tick, then assert on
//! either side of the transfer: palette indices in the frame the game drew,
//! or RGB values on the emulated panel.
//!
//! # Quick start
//!
//! ```
//! use embedded_graphics::{prelude::*, primitives::{PrimitiveStyle, Rectangle}};
//! use raster::PaletteIndex;
//! use screen_testing::TestScreen;
//!
//! let mut t = TestScreen::arcade();
//!
//! Rectangle::new(Point::new(10, 10), Size::new(40, 20))
//!     .into_styled(PrimitiveStyle::with_fill(PaletteIndex(2)))
//!     .draw(t.frame_mut())
//!     .ok();
//! t.tick()?;
//!
//! t.assert_frame_pixel(20, 15, 2)?;
//! t.assert_panel_pixel(20, 15, 0xFF2121)?;
//! # Ok::<(), String>(())
//! ```
//!
//! # Golden screenshot testing
//!
//! ```no_run
//! # use screen_testing::TestScreen;
//! # let t = TestScreen::arcade();
//! // First run: set UPDATE_GOLDEN=1 to create/update the reference file.
//! t.assert_matches_golden("tests/golden/title.png", 0).unwrap();
//! ```

#![warn(clippy::print_stdout)]
#![allow(clippy::module_name_repetitions)]

use std::path::Path;

use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::{PointsIter, Rectangle};
use raster::{Color, Palette};
use screen::{Compositor, Presented, ScreenConfig};

pub use screen_emulator::{Emulator, EmulatorConfig};

/// Compositor plus headless panel, with assertions.
///
/// Derefs to the [`Compositor`], so drawing and presentation calls go
/// straight through:
///
/// ```
/// use screen_testing::TestScreen;
///
/// let mut t = TestScreen::arcade();
/// t.frame_mut().fill_circle(80, 60, 10, 5);
/// t.set_brightness(60);
/// t.tick().unwrap();
/// assert_eq!(t.emulator().brightness().get(), 60);
/// ```
pub struct TestScreen {
    inner: Compositor<Emulator>,
}

impl TestScreen {
    /// Screen for `config` with the arcade palette, on a panel of the
    /// same geometry with 1:1 screenshots.
    ///
    /// # Panics
    ///
    /// If `config` does not describe a valid screen.
    #[allow(clippy::panic)]
    pub fn new(config: ScreenConfig) -> Self {
        let emulator = Emulator::new(EmulatorConfig {
            screen: config,
            scale: 1,
        });
        match Compositor::new(config, Palette::ARCADE, emulator) {
            Ok(inner) => Self { inner },
            Err(e) => panic!(
                "invalid test screen {}x{}: {e}",
                config.width, config.height
            ),
        }
    }

    /// 160×128 arcade screen with an 8-row status bar.
    pub fn arcade() -> Self {
        Self::new(ScreenConfig::ARCADE)
    }

    /// Wrap an existing compositor.
    pub fn from_compositor(inner: Compositor<Emulator>) -> Self {
        Self { inner }
    }

    /// Present one tick. A busy panel is reported as an error since the
    /// emulator never is.
    pub fn tick(&mut self) -> Result<(), String> {
        match self.inner.present() {
            Ok(Presented::Frame) => Ok(()),
            Ok(Presented::Skipped) => Err("tick skipped: panel busy".into()),
            Err(e) => Err(format!("present failed: {e}")),
        }
    }

    /// The emulated panel.
    pub fn emulator(&self) -> &Emulator {
        self.inner.presenter()
    }

    // ── Frame side ──────────────────────────────────────────────────────────

    /// Palette index at `(x, y)` of the frame, or `None` outside it.
    pub fn frame_color_at(&self, x: i32, y: i32) -> Option<Color> {
        let frame = self.inner.frame();
        let inside = (0..i32::from(frame.width())).contains(&x)
            && (0..i32::from(frame.height())).contains(&y);
        inside.then(|| frame.pixel(x, y))
    }

    /// Assert the frame holds palette index `expected` at `(x, y)`.
    pub fn assert_frame_pixel(&self, x: i32, y: i32, expected: Color) -> Result<(), String> {
        let actual = self
            .frame_color_at(x, y)
            .ok_or_else(|| format!("Frame pixel ({x}, {y}) is out of bounds"))?;
        if actual == expected {
            Ok(())
        } else {
            Err(format!(
                "assert_frame_pixel({x}, {y}): expected colour {expected}, got {actual}"
            ))
        }
    }

    /// Assert every frame pixel inside `rect` is `color`.
    pub fn assert_region_uniform(&self, rect: Rectangle, color: Color) -> Result<(), String> {
        for p in rect.points() {
            self.assert_frame_pixel(p.x, p.y, color)
                .map_err(|e| format!("assert_region_uniform failed in {}: {e}", describe(rect)))?;
        }
        Ok(())
    }

    /// Assert `rect` contains at least one frame pixel of `color`.
    pub fn assert_region_contains(&self, rect: Rectangle, color: Color) -> Result<(), String> {
        if self.pixel_count_of_color(rect, color) > 0 {
            Ok(())
        } else {
            Err(format!(
                "assert_region_contains: no pixel of colour {color} found in {}",
                describe(rect)
            ))
        }
    }

    /// Count frame pixels inside `rect` equal to `color`.
    pub fn pixel_count_of_color(&self, rect: Rectangle, color: Color) -> usize {
        rect.points()
            .filter(|p| self.frame_color_at(p.x, p.y) == Some(color))
            .count()
    }

    // ── Panel side ──────────────────────────────────────────────────────────

    /// Packed RGB the panel shows at `(x, y)`, or `None` outside it.
    pub fn panel_rgb_at(&self, x: u16, y: u16) -> Option<u32> {
        self.emulator().framebuffer().pixel(x, y)
    }

    /// Assert the panel shows `expected` (packed `0xRRGGBB`) at `(x, y)`.
    pub fn assert_panel_pixel(&self, x: u16, y: u16, expected: u32) -> Result<(), String> {
        let actual = self
            .panel_rgb_at(x, y)
            .ok_or_else(|| format!("Panel pixel ({x}, {y}) is out of bounds"))?;
        if actual == expected {
            Ok(())
        } else {
            Err(format!(
                "assert_panel_pixel({x}, {y}): expected #{expected:06X}, got #{actual:06X}"
            ))
        }
    }

    /// Assert the last status text forwarded to the panel.
    pub fn assert_status_text(&self, expected: &str) -> Result<(), String> {
        match self.emulator().last_status_text() {
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => Err(format!(
                "assert_status_text: expected '{expected}', got '{actual}'"
            )),
            None => Err(format!(
                "assert_status_text: expected '{expected}', no status reported"
            )),
        }
    }

    // ── Screenshot utilities ────────────────────────────────────────────────

    /// Save the panel as a PNG.
    pub fn screenshot(&self, path: impl AsRef<Path>) -> Result<(), String> {
        self.emulator()
            .screenshot(path)
            .map_err(|e| e.to_string())
    }

    /// Save the panel as the golden reference PNG, creating parent
    /// directories.
    pub fn save_golden(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let p = path.as_ref();
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create '{}': {e}", parent.display()))?;
        }
        self.screenshot(p)
    }

    /// Assert the panel matches a golden reference PNG.
    ///
    /// `threshold` is the largest per-channel difference still counted as
    /// equal (0 = exact). With `UPDATE_GOLDEN=1` set the golden file is
    /// rewritten instead:
    ///
    /// ```bash
    /// UPDATE_GOLDEN=1 cargo test
    /// ```
    pub fn assert_matches_golden(
        &self,
        golden_path: impl AsRef<Path>,
        threshold: u8,
    ) -> Result<(), String> {
        let golden_path = golden_path.as_ref();

        if std::env::var_os("UPDATE_GOLDEN").is_some() {
            tracing::debug!(path = %golden_path.display(), "updating golden");
            return self.save_golden(golden_path);
        }

        let current = self.emulator().to_rgb_image();
        let golden = image::open(golden_path)
            .map_err(|e| {
                format!(
                    "Failed to open golden '{}': {e}\nRun with UPDATE_GOLDEN=1 to create it.",
                    golden_path.display()
                )
            })?
            .to_rgb8();

        if current.dimensions() != golden.dimensions() {
            let (cw, ch) = current.dimensions();
            let (gw, gh) = golden.dimensions();
            return Err(format!(
                "Dimension mismatch: screenshot is {cw}×{ch}, golden is {gw}×{gh}"
            ));
        }

        let diff_pixels = current
            .pixels()
            .zip(golden.pixels())
            .filter(|(cp, gp)| {
                cp.0.iter()
                    .zip(gp.0.iter())
                    .any(|(&a, &b)| a.abs_diff(b) > threshold)
            })
            .count();

        if diff_pixels > 0 {
            Err(format!(
                "{diff_pixels} pixels differ from golden '{}' (threshold={threshold})",
                golden_path.display()
            ))
        } else {
            Ok(())
        }
    }
}

fn describe(rect: Rectangle) -> String {
    let Point { x, y } = rect.top_left;
    format!("{}×{} at ({x}, {y})", rect.size.width, rect.size.height)
}

impl std::ops::Deref for TestScreen {
    type Target = Compositor<Emulator>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::ops::DerefMut for TestScreen {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
