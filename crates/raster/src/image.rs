//! Indexed-colour pixel buffer
//!
//! Every drawing operation in this crate bottoms out in [`Image::pixel`] and
//! [`Image::set_pixel`]. Reads outside the buffer return [`TRANSPARENT`];
//! writes outside the buffer are dropped. Only whole-image operations
//! ([`Image::copy_from`], row transfers) can fail.

use crate::color::{Color, TRANSPARENT};
use crate::error::{RasterError, Shape};
use crate::pack::clamp_coord;

/// Largest width or height accepted by the image constructors.
pub const MAX_DIMENSION: u16 = 4096;

/// Colour depth of an [`Image`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Depth {
    /// Two colours (0 and 1), one bit per pixel in the stored format.
    Mono,
    /// Sixteen palette indices, four bits per pixel in the stored format.
    Indexed4,
}

impl Depth {
    /// Bits per pixel in the stored format.
    pub const fn bpp(self) -> u8 {
        match self {
            Depth::Mono => 1,
            Depth::Indexed4 => 4,
        }
    }

    /// Depth for a stored bits-per-pixel value.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::UnsupportedDepth`] for anything but 1 or 4.
    pub fn from_bpp(bpp: u8) -> Result<Self, RasterError> {
        match bpp {
            1 => Ok(Depth::Mono),
            4 => Ok(Depth::Indexed4),
            other => Err(RasterError::UnsupportedDepth(other)),
        }
    }

    /// Largest colour index this depth can hold.
    pub const fn max_color(self) -> Color {
        match self {
            Depth::Mono => 1,
            Depth::Indexed4 => 15,
        }
    }

    /// Fold an arbitrary colour into this depth.
    ///
    /// Mono keeps "painted or not"; 4-bit keeps the low nibble.
    #[inline]
    pub const fn normalize(self, c: Color) -> Color {
        match self {
            Depth::Mono => (c != 0) as Color,
            Depth::Indexed4 => c & 0x0F,
        }
    }
}

/// A fixed-size grid of palette indices.
///
/// Pixels are stored one index per byte, row-major. `Clone` produces an
/// independent deep copy; `PartialEq` compares size, depth and every pixel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    width: u16,
    height: u16,
    depth: Depth,
    pixels: Vec<Color>,
}

impl Image {
    /// Create a transparent 4-bit image.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidDimensions`] if either side is zero or
    /// above [`MAX_DIMENSION`].
    pub fn new(width: u16, height: u16) -> Result<Self, RasterError> {
        Self::with_depth(width, height, Depth::Indexed4)
    }

    /// Create a transparent mono image.
    ///
    /// # Errors
    ///
    /// Same as [`Image::new`].
    pub fn new_mono(width: u16, height: u16) -> Result<Self, RasterError> {
        Self::with_depth(width, height, Depth::Mono)
    }

    /// Create a transparent image of the given depth.
    ///
    /// # Errors
    ///
    /// Same as [`Image::new`].
    pub fn with_depth(width: u16, height: u16, depth: Depth) -> Result<Self, RasterError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RasterError::InvalidDimensions {
                width: u32::from(width),
                height: u32::from(height),
            });
        }
        Ok(Self {
            width,
            height,
            depth,
            pixels: vec![TRANSPARENT; pixel_count(width, height)],
        })
    }

    /// Build an image from row-major pixel data, normalising every value
    /// to `depth`.
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidDimensions`] for bad sizes,
    /// [`RasterError::Truncated`] if `pixels` is not exactly `width * height`.
    pub fn from_pixels(
        width: u16,
        height: u16,
        depth: Depth,
        pixels: &[Color],
    ) -> Result<Self, RasterError> {
        let mut img = Self::with_depth(width, height, depth)?;
        if pixels.len() != img.pixels.len() {
            return Err(RasterError::Truncated {
                expected: img.pixels.len(),
                found: pixels.len(),
            });
        }
        for (dst, &src) in img.pixels.iter_mut().zip(pixels) {
            *dst = depth.normalize(src);
        }
        Ok(img)
    }

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Colour depth.
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Bits per pixel in the stored format (1 or 4).
    pub fn bpp(&self) -> u8 {
        self.depth.bpp()
    }

    /// `true` for two-colour images.
    pub fn is_mono(&self) -> bool {
        self.depth == Depth::Mono
    }

    /// Width, height and depth in one value.
    pub fn shape(&self) -> Shape {
        Shape {
            width: self.width,
            height: self.height,
            bpp: self.bpp(),
        }
    }

    /// Row-major pixel indices.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub(crate) fn width_i32(&self) -> i32 {
        i32::from(self.width)
    }

    pub(crate) fn height_i32(&self) -> i32 {
        i32::from(self.height)
    }

    /// Buffer offset of `(x, y)`, or `None` outside the image.
    // SAFETY: both coordinates are checked against u16 dimensions first, so
    // y * width + x < width * height, which fits usize.
    #[allow(clippy::arithmetic_side_effects)]
    #[inline]
    pub(crate) fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let w = usize::from(self.width);
        if x < w && y < usize::from(self.height) {
            Some(y * w + x)
        } else {
            None
        }
    }

    /// Colour at `(x, y)`, or [`TRANSPARENT`] outside the image.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        self.offset(x, y)
            .and_then(|i| self.pixels.get(i))
            .copied()
            .unwrap_or(TRANSPARENT)
    }

    /// Set `(x, y)` to `c`. Writes outside the image are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Color) {
        let c = self.depth.normalize(c);
        if let Some(p) = self.offset(x, y).and_then(|i| self.pixels.get_mut(i)) {
            *p = c;
        }
    }

    /// Set every pixel to `c`.
    pub fn fill(&mut self, c: Color) {
        let c = self.depth.normalize(c);
        self.pixels.fill(c);
    }

    /// Overwrite every pixel with the pixels of `other`.
    ///
    /// # Errors
    ///
    /// [`RasterError::DimensionMismatch`] unless both images share width,
    /// height and depth. Nothing is written in that case.
    pub fn copy_from(&mut self, other: &Image) -> Result<(), RasterError> {
        if self.shape() != other.shape() {
            tracing::warn!(
                expected = %self.shape(),
                found = %other.shape(),
                "copy_from rejected"
            );
            return Err(RasterError::DimensionMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        self.pixels.copy_from_slice(&other.pixels);
        Ok(())
    }

    /// Pixels of row `y`, or `None` outside the image.
    // SAFETY: offset() bounds y; a full row starting at column 0 ends at
    // most at width * height.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn row(&self, y: i32) -> Option<&[Color]> {
        let start = self.offset(0, y)?;
        self.pixels.get(start..start + usize::from(self.width))
    }

    #[allow(clippy::arithmetic_side_effects)]
    pub(crate) fn row_mut(&mut self, y: i32) -> Option<&mut [Color]> {
        let start = self.offset(0, y)?;
        let end = start + usize::from(self.width);
        self.pixels.get_mut(start..end)
    }

    // SAFETY: width is never zero once constructed.
    #[allow(clippy::arithmetic_side_effects)]
    fn check_row_buffer(&self, len: usize) -> Result<(), RasterError> {
        if len % usize::from(self.width) != 0 {
            tracing::warn!(len, width = self.width, "row buffer length rejected");
            return Err(RasterError::RowBufferLength {
                len,
                width: self.width,
            });
        }
        Ok(())
    }

    /// Copy whole rows, starting at row `y`, into `dst` at one byte per
    /// pixel. Rows that fall outside the image read as [`TRANSPARENT`].
    ///
    /// # Errors
    ///
    /// [`RasterError::RowBufferLength`] unless `dst.len()` is a multiple
    /// of the width.
    pub fn get_rows(&self, y: i32, dst: &mut [u8]) -> Result<(), RasterError> {
        self.check_row_buffer(dst.len())?;
        let mut row_y = y;
        for chunk in dst.chunks_exact_mut(usize::from(self.width)) {
            match self.row(row_y) {
                Some(row) => chunk.copy_from_slice(row),
                None => chunk.fill(TRANSPARENT),
            }
            row_y = row_y.saturating_add(1);
        }
        Ok(())
    }

    /// Overwrite whole rows, starting at row `y`, from `src` at one byte per
    /// pixel. Rows that fall outside the image are skipped.
    ///
    /// # Errors
    ///
    /// [`RasterError::RowBufferLength`] unless `src.len()` is a multiple
    /// of the width.
    pub fn set_rows(&mut self, y: i32, src: &[u8]) -> Result<(), RasterError> {
        self.check_row_buffer(src.len())?;
        let depth = self.depth;
        let mut row_y = y;
        for chunk in src.chunks_exact(usize::from(self.width)) {
            if let Some(row) = self.row_mut(row_y) {
                for (d, &s) in row.iter_mut().zip(chunk) {
                    *d = depth.normalize(s);
                }
            }
            row_y = row_y.saturating_add(1);
        }
        Ok(())
    }

    /// Replace every pixel of colour `from` with `to`.
    pub fn replace(&mut self, from: Color, to: Color) {
        let from = self.depth.normalize(from);
        let to = self.depth.normalize(to);
        for p in self.pixels.iter_mut().filter(|p| **p == from) {
            *p = to;
        }
    }

    /// Move every pixel by `(dx, dy)`. Pixels shifted in from outside the
    /// image are [`TRANSPARENT`].
    // SAFETY: dx/dy and the loop coordinates are clamped to ±30000 so the
    // subtractions cannot overflow i32.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn scroll(&mut self, dx: i32, dy: i32) {
        let (dx, dy) = (clamp_coord(dx), clamp_coord(dy));
        if dx == 0 && dy == 0 {
            return;
        }
        let src = self.pixels.clone();
        let (w, h) = (self.width_i32(), self.height_i32());
        let mut out = self.pixels.iter_mut();
        for y in 0..h {
            for x in 0..w {
                let value = offset_in(x - dx, y - dy, w, h)
                    .and_then(|i| src.get(i))
                    .copied()
                    .unwrap_or(TRANSPARENT);
                if let Some(p) = out.next() {
                    *p = value;
                }
            }
        }
    }
}

// Like `Image::offset`, for use while the pixel vector is mutably borrowed.
#[allow(clippy::arithmetic_side_effects)]
fn offset_in(x: i32, y: i32, w: i32, h: i32) -> Option<usize> {
    if (0..w).contains(&x) && (0..h).contains(&y) {
        usize::try_from(y * w + x).ok()
    } else {
        None
    }
}

// SAFETY: both factors are u16, so the product is below 2^32.
#[allow(clippy::arithmetic_side_effects)]
fn pixel_count(width: u16, height: u16) -> usize {
    usize::from(width) * usize::from(height)
}
