//! Indexed-colour raster engine
//!
//! Small fixed-size images of palette indices, with the drawing, blitting
//! and rotation operations a handheld game screen needs.
//!
//! - [`Image`]: the pixel buffer. Reads outside it return 0, writes are
//!   clipped.
//! - Primitives: lines, rectangles, midpoint circles, icons.
//! - Blits: scaled rectangle copies with optional transparency and a
//!   collision check mode that never writes.
//! - Transforms: transpose, flips, 90° rotations, 2× upscales.
//! - [`Palette`]: the sixteen RGB entries indices resolve to at
//!   presentation time.
//! - The raw stored-image format ([`Image::from_raw_buffer`]).
//!
//! # Example
//!
//! ```
//! use raster::{BlitOptions, Image, Rect};
//!
//! let mut screen = Image::new(160, 120)?;
//! screen.fill_rect(10, 10, 20, 20, 2);
//! screen.draw_circle(80, 60, 15, 5);
//!
//! let mut sprite = Image::new(8, 8)?;
//! sprite.fill_circle(4, 4, 3, 7);
//! let hit = screen.collides(Rect::new(12, 12, 8, 8), &sprite, Rect::of(&sprite));
//! assert!(hit);
//!
//! screen.blit(Rect::new(12, 12, 16, 16), &sprite, Rect::of(&sprite), BlitOptions::TRANSPARENT);
//! # Ok::<(), raster::RasterError>(())
//! ```

mod blit;
pub mod codec;
pub mod color;
mod draw;
pub mod error;
pub mod graphics;
mod image;
pub mod pack;
mod transform;

pub use blit::{BlitOptions, Rect};
pub use codec::IMAGE_MAGIC;
pub use color::{Color, Palette, Rgb, PALETTE_BYTES, PALETTE_SIZE, TRANSPARENT};
pub use draw::ColorMap;
pub use error::{RasterError, Shape};
pub use graphics::PaletteIndex;
pub use image::{Depth, Image, MAX_DIMENSION};
pub use pack::{pack, unpack, Packed, COORD_MAX, COORD_MIN};
