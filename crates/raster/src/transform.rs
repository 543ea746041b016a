//! Whole-image transforms
//!
//! Rotations are compositions of [`Image::transposed`] with the in-place
//! flips, so rotating by 90° and back reproduces the exact original
//! pixels. Transforms that build a new image keep the source depth.

// SAFETY (module-wide): loop bounds are u16 image dimensions and doubled
// sizes are checked against MAX_DIMENSION before allocation, so index
// arithmetic stays far below i32::MAX.
#![allow(clippy::arithmetic_side_effects)]

use crate::error::RasterError;
use crate::image::{Image, MAX_DIMENSION};

impl Image {
    /// New image with `(x, y)` moved to `(y, x)` and the sides swapped.
    pub fn transposed(&self) -> Image {
        let mut out = self.blank(self.height(), self.width());
        for y in 0..self.height_i32() {
            for x in 0..self.width_i32() {
                out.set_pixel(y, x, self.pixel(x, y));
            }
        }
        out
    }

    /// Mirror left-to-right in place.
    pub fn flip_x(&mut self) {
        for y in 0..self.height_i32() {
            if let Some(row) = self.row_mut(y) {
                row.reverse();
            }
        }
    }

    /// Mirror top-to-bottom in place.
    pub fn flip_y(&mut self) {
        let h = self.height_i32();
        for y in 0..h / 2 {
            for x in 0..self.width_i32() {
                let (top, bottom) = (self.pixel(x, y), self.pixel(x, h - 1 - y));
                self.set_pixel(x, y, bottom);
                self.set_pixel(x, h - 1 - y, top);
            }
        }
    }

    /// Copy rotated clockwise by `deg` degrees.
    ///
    /// Accepts 90, -90, 270, 180 and -180; any other angle returns `None`.
    /// 90° is transpose then [`Image::flip_x`], -90°/270° is transpose then
    /// [`Image::flip_y`], and ±180° flips a copy on both axes.
    pub fn rotated(&self, deg: i32) -> Option<Image> {
        match deg {
            90 => {
                let mut out = self.transposed();
                out.flip_x();
                Some(out)
            }
            -90 | 270 => {
                let mut out = self.transposed();
                out.flip_y();
                Some(out)
            }
            180 | -180 => {
                let mut out = self.clone();
                out.flip_x();
                out.flip_y();
                Some(out)
            }
            other => {
                tracing::debug!(deg = other, "unsupported rotation");
                None
            }
        }
    }

    /// Upscale 2× on both axes; each pixel becomes a 2×2 block.
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidDimensions`] if either doubled side would
    /// exceed [`MAX_DIMENSION`].
    pub fn doubled(&self) -> Result<Image, RasterError> {
        self.scaled(2, 2)
    }

    /// Upscale 2× horizontally; each pixel becomes a 2×1 block.
    ///
    /// # Errors
    ///
    /// Same as [`Image::doubled`].
    pub fn doubled_x(&self) -> Result<Image, RasterError> {
        self.scaled(2, 1)
    }

    /// Upscale 2× vertically; each pixel becomes a 1×2 block.
    ///
    /// # Errors
    ///
    /// Same as [`Image::doubled`].
    pub fn doubled_y(&self) -> Result<Image, RasterError> {
        self.scaled(1, 2)
    }

    fn scaled(&self, fx: u16, fy: u16) -> Result<Image, RasterError> {
        let w = u32::from(self.width()) * u32::from(fx);
        let h = u32::from(self.height()) * u32::from(fy);
        let (Ok(width), Ok(height)) = (u16::try_from(w), u16::try_from(h)) else {
            return Err(RasterError::InvalidDimensions {
                width: w,
                height: h,
            });
        };
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RasterError::InvalidDimensions {
                width: w,
                height: h,
            });
        }

        let mut out = self.blank(width, height);
        let (fx, fy) = (i32::from(fx), i32::from(fy));
        for y in 0..i32::from(height) {
            for x in 0..i32::from(width) {
                out.set_pixel(x, y, self.pixel(x / fx, y / fy));
            }
        }
        Ok(out)
    }

    /// Stack `images` top to bottom, each centred horizontally in the
    /// widest one. The result has the depth of the first image.
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidDimensions`] for an empty slice or a total
    /// height above [`MAX_DIMENSION`].
    pub fn concat_y(images: &[&Image]) -> Result<Image, RasterError> {
        let width = images.iter().map(|img| img.width()).max().unwrap_or(0);
        let height: u32 = images.iter().map(|img| u32::from(img.height())).sum();
        let Some(first) = images.first() else {
            return Err(RasterError::InvalidDimensions { width: 0, height: 0 });
        };
        let Ok(height16) = u16::try_from(height) else {
            return Err(RasterError::InvalidDimensions {
                width: u32::from(width),
                height,
            });
        };

        let mut out = Image::with_depth(width, height16, first.depth())?;
        let mut y = 0;
        for img in images {
            let x = (i32::from(width) - img.width_i32()) >> 1;
            out.draw_image(img, x, y);
            y += img.height_i32();
        }
        Ok(out)
    }

    /// `count` copies of this image stacked vertically. Counts below one
    /// are treated as one.
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidDimensions`] if the stacked height exceeds
    /// [`MAX_DIMENSION`].
    pub fn repeat_y(&self, count: usize) -> Result<Image, RasterError> {
        let copies = vec![self; count.max(1)];
        Image::concat_y(&copies)
    }

    /// Transparent image of the same depth. Only called with sizes already
    /// validated by an existing image.
    fn blank(&self, width: u16, height: u16) -> Image {
        Image::with_depth(width, height, self.depth()).unwrap_or_else(|_| self.clone())
    }
}
