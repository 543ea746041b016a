//! Game screen compositor
//!
//! Binds a [`raster::Image`] main frame and an optional status bar to a
//! [`Presenter`], the host-side display driver. The host's refresh loop
//! calls [`Compositor::present`] once per tick; game code draws into
//! [`Compositor::frame_mut`] in between.
//!
//! # Example
//!
//! ```
//! use raster::Palette;
//! use screen::mock::RecordingPresenter;
//! use screen::{Compositor, ScreenConfig};
//!
//! let mut screen = Compositor::new(ScreenConfig::ARCADE, Palette::ARCADE, RecordingPresenter::new())?;
//! screen.frame_mut().fill_circle(80, 60, 20, 7);
//! screen.set_brightness(60);
//! screen.present().ok();
//! # Ok::<(), raster::RasterError>(())
//! ```

pub mod brightness;
pub mod compositor;
pub mod config;
pub mod mock;
pub mod presenter;

pub use brightness::{Brightness, OutOfRangeError};
pub use compositor::{Compositor, Presented, STATS_CAPACITY};
pub use config::ScreenConfig;
pub use presenter::{PresentError, Presenter};
