//! Rectangle-to-rectangle copies
//!
//! A blit maps every destination pixel of `dst` back onto the source
//! rectangle with 16.16 fixed-point nearest-neighbour sampling, so source
//! and destination sizes are independent. Destination pixels are clipped
//! to the image; source samples outside the source image count as
//! [`TRANSPARENT`] and are never written.

// SAFETY (module-wide): rectangle fields are clamped to ±30000 and image
// dimensions are at most MAX_DIMENSION. Fixed-point products are computed
// in i64, where (30000 << 16) * 60000 < 2^48.
#![allow(clippy::arithmetic_side_effects)]

use crate::color::{Color, TRANSPARENT};
use crate::image::Image;
use crate::pack::{clamp_coord, Packed};

/// Axis-aligned rectangle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width; non-positive widths are empty.
    pub width: i32,
    /// Height; non-positive heights are empty.
    pub height: i32,
}

impl Rect {
    /// Build a rectangle.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering all of `img`.
    pub fn of(img: &Image) -> Self {
        Self::new(0, 0, i32::from(img.width()), i32::from(img.height()))
    }

    /// Rectangle from a packed position and a packed size.
    pub fn from_packed(xy: Packed, wh: Packed) -> Self {
        let ((x, y), (width, height)) = (xy.unpack(), wh.unpack());
        Self::new(x, y, width, height)
    }

    /// `true` when the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    fn clamped(self) -> Self {
        Self::new(
            clamp_coord(self.x),
            clamp_coord(self.y),
            clamp_coord(self.width),
            clamp_coord(self.height),
        )
    }
}

/// How [`Image::blit`] treats source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlitOptions {
    /// Skip source pixels equal to [`TRANSPARENT`].
    pub transparent: bool,
    /// Write nothing; report whether any opaque source pixel would land on
    /// an opaque destination pixel.
    pub check_only: bool,
}

impl BlitOptions {
    /// Plain copy, every sampled source pixel written.
    pub const OPAQUE: Self = Self {
        transparent: false,
        check_only: false,
    };

    /// Copy skipping transparent source pixels.
    pub const TRANSPARENT: Self = Self {
        transparent: true,
        check_only: false,
    };

    /// Collision check only.
    pub const CHECK: Self = Self {
        transparent: true,
        check_only: true,
    };
}

/// Visit every clipped destination pixel of a blit together with its
/// source sample. Stops early and returns `true` once `visit` does.
fn scan(
    dst_w: i32,
    dst_h: i32,
    dst: Rect,
    src: &Image,
    src_rect: Rect,
    mut visit: impl FnMut(i32, i32, Color) -> bool,
) -> bool {
    let (dst, src_rect) = (dst.clamped(), src_rect.clamped());
    if dst.is_empty() || src_rect.is_empty() {
        return false;
    }

    let step_x = (i64::from(src_rect.width) << 16) / i64::from(dst.width);
    let step_y = (i64::from(src_rect.height) << 16) / i64::from(dst.height);

    let (x_start, x_end) = (dst.x.max(0), (dst.x + dst.width).min(dst_w));
    let (y_start, y_end) = (dst.y.max(0), (dst.y + dst.height).min(dst_h));

    for yd in y_start..y_end {
        let sy = src_rect.y + sample(yd - dst.y, step_y);
        if sy < 0 || sy >= i32::from(src.height()) {
            continue;
        }
        for xd in x_start..x_end {
            let sx = src_rect.x + sample(xd - dst.x, step_x);
            if sx < 0 || sx >= i32::from(src.width()) {
                continue;
            }
            if visit(xd, yd, src.pixel(sx, sy)) {
                return true;
            }
        }
    }
    false
}

/// Source offset for destination offset `d` at a 16.16 `step`.
///
/// `d` is below the destination extent, so the result is below the source
/// extent and fits i32.
#[allow(clippy::cast_possible_truncation)]
fn sample(d: i32, step: i64) -> i32 {
    ((i64::from(d) * step) >> 16) as i32
}

impl Image {
    /// Copy `src_rect` of `src` into `dst` of this image, scaling with
    /// nearest-neighbour sampling when the sizes differ.
    ///
    /// With `opts.check_only` nothing is written and the result is
    /// [`Image::collides`]; otherwise pixels are copied (skipping
    /// [`TRANSPARENT`] ones when `opts.transparent`) and the result is
    /// `false`. Empty rectangles do nothing.
    pub fn blit(&mut self, dst: Rect, src: &Image, src_rect: Rect, opts: BlitOptions) -> bool {
        if opts.check_only {
            return self.collides(dst, src, src_rect);
        }

        let (w, h) = (self.width_i32(), self.height_i32());
        let transparent = opts.transparent;
        scan(w, h, dst, src, src_rect, |x, y, c| {
            if !transparent || c != TRANSPARENT {
                self.set_pixel(x, y, c);
            }
            false
        });
        false
    }

    /// `true` if any non-transparent pixel of `src_rect`, scaled onto
    /// `dst`, would land on a non-transparent pixel of this image.
    pub fn collides(&self, dst: Rect, src: &Image, src_rect: Rect) -> bool {
        scan(
            self.width_i32(),
            self.height_i32(),
            dst,
            src,
            src_rect,
            |x, y, c| c != TRANSPARENT && self.pixel(x, y) != TRANSPARENT,
        )
    }

    /// Stretch column `src_x` of `src` over `dst_h` rows of column `x`,
    /// starting at row `y`. Every sampled pixel is written, transparent or
    /// not.
    ///
    /// Does nothing when `x` or `src_x` is outside its image or `dst_h` is
    /// not positive.
    pub fn blit_row(&mut self, x: i32, y: i32, src: &Image, src_x: i32, dst_h: i32) {
        let (x, y, src_x, dst_h) = (
            clamp_coord(x),
            clamp_coord(y),
            clamp_coord(src_x),
            clamp_coord(dst_h),
        );
        if x < 0 || x >= self.width_i32() || src_x < 0 || src_x >= i32::from(src.width()) {
            return;
        }
        if dst_h <= 0 {
            return;
        }

        let step = (i64::from(src.height()) << 16) / i64::from(dst_h);
        let mut fy: i64 = 0;
        let mut row = y;
        if row < 0 {
            fy = i64::from(-row) * step;
            row = 0;
        }
        let end = (y + dst_h).min(self.height_i32());
        while row < end {
            let sy = fy >> 16;
            let Ok(sy) = i32::try_from(sy) else {
                break;
            };
            self.set_pixel(x, row, src.pixel(src_x, sy));
            fy += step;
            row += 1;
        }
    }

    /// [`Image::blit_row`] with `(x, y)` and `(src_x, dst_h)` packed.
    pub fn blit_row_packed(&mut self, xy: Packed, src: &Image, xh: Packed) {
        let ((x, y), (src_x, dst_h)) = (xy.unpack(), xh.unpack());
        self.blit_row(x, y, src, src_x, dst_h);
    }

    /// Copy all of `src` with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, src: &Image, x: i32, y: i32) {
        let dst = Rect::new(x, y, i32::from(src.width()), i32::from(src.height()));
        self.blit(dst, src, Rect::of(src), BlitOptions::OPAQUE);
    }

    /// Copy the non-transparent pixels of `src` with its top-left corner at
    /// `(x, y)`.
    pub fn draw_transparent_image(&mut self, src: &Image, x: i32, y: i32) {
        let dst = Rect::new(x, y, i32::from(src.width()), i32::from(src.height()));
        self.blit(dst, src, Rect::of(src), BlitOptions::TRANSPARENT);
    }

    /// `true` if `other`, placed at `(x, y)`, has an opaque pixel over an
    /// opaque pixel of this image.
    pub fn overlaps_with(&self, other: &Image, x: i32, y: i32) -> bool {
        let dst = Rect::new(x, y, i32::from(other.width()), i32::from(other.height()));
        self.collides(dst, other, Rect::of(other))
    }
}
