//! Raw stored-image format
//!
//! ```text
//! offset  size  field
//! 0       1     magic (0x87)
//! 1       1     bits per pixel (1 or 4)
//! 2       2     width, little-endian
//! 4       2     height, little-endian
//! 6       2     reserved, written as zero
//! 8       ..    pixel data, one padded column after another
//! ```
//!
//! Columns are padded to a multiple of 4 bytes. In a 4-bit column, even
//! rows sit in the low nibble and odd rows in the high nibble of byte
//! `y / 2`. In a mono column, row `y` is bit `y % 8` of byte `y / 8`.
//!
//! Mono bit order is LSB first. That is this crate's own convention: raw
//! buffers are not byte compatible with MSB-first 1-bit asset formats and
//! such data must be repacked before decoding.

// SAFETY (module-wide): all sizes derive from u16 dimensions, so column
// strides and buffer offsets stay below 2^32.
#![allow(clippy::arithmetic_side_effects)]

use crate::color::Color;
use crate::error::RasterError;
use crate::image::{Depth, Image};

/// First byte of every raw image buffer.
pub const IMAGE_MAGIC: u8 = 0x87;

/// Length of the raw header.
pub const HEADER_LEN: usize = 8;

/// Bytes per stored column for an image of `height` rows.
pub fn column_stride(depth: Depth, height: u16) -> usize {
    let bits = usize::from(height) * usize::from(depth.bpp());
    bits.div_ceil(32) * 4
}

/// Total raw buffer length, header included.
pub fn raw_len(depth: Depth, width: u16, height: u16) -> usize {
    HEADER_LEN + usize::from(width) * column_stride(depth, height)
}

impl Image {
    /// Decode a raw image buffer. Bytes past the pixel data are ignored.
    ///
    /// # Errors
    ///
    /// [`RasterError::Truncated`] if the header or pixel data is short,
    /// [`RasterError::BadMagic`] for a wrong first byte,
    /// [`RasterError::UnsupportedDepth`] for depths other than 1 and 4,
    /// [`RasterError::InvalidDimensions`] for zero or oversized sides.
    pub fn from_raw_buffer(bytes: &[u8]) -> Result<Image, RasterError> {
        let Some(&[magic, bpp, w0, w1, h0, h1, _, _]) = bytes.get(..HEADER_LEN) else {
            return Err(RasterError::Truncated {
                expected: HEADER_LEN,
                found: bytes.len(),
            });
        };
        if magic != IMAGE_MAGIC {
            tracing::warn!(magic, "raw image rejected");
            return Err(RasterError::BadMagic(magic));
        }
        let depth = Depth::from_bpp(bpp)?;
        let width = u16::from_le_bytes([w0, w1]);
        let height = u16::from_le_bytes([h0, h1]);
        let mut img = Image::with_depth(width, height, depth)?;

        let expected = raw_len(depth, width, height);
        let Some(data) = bytes.get(HEADER_LEN..expected) else {
            return Err(RasterError::Truncated {
                expected,
                found: bytes.len(),
            });
        };

        let stride = column_stride(depth, height);
        for (x, column) in (0..i32::from(width)).zip(data.chunks_exact(stride)) {
            for y in 0..i32::from(height) {
                img.set_pixel(x, y, read_sample(depth, column, y));
            }
        }
        tracing::trace!(width, height, bpp, "decoded raw image");
        Ok(img)
    }

    /// Encode into the raw stored format.
    pub fn to_raw_buffer(&self) -> Vec<u8> {
        let depth = self.depth();
        let stride = column_stride(depth, self.height());
        let mut out = Vec::with_capacity(raw_len(depth, self.width(), self.height()));
        out.push(IMAGE_MAGIC);
        out.push(depth.bpp());
        out.extend_from_slice(&self.width().to_le_bytes());
        out.extend_from_slice(&self.height().to_le_bytes());
        out.extend_from_slice(&[0, 0]);

        let mut column = vec![0u8; stride];
        for x in 0..self.width_i32() {
            column.fill(0);
            for y in 0..self.height_i32() {
                write_sample(depth, &mut column, y, self.pixel(x, y));
            }
            out.extend_from_slice(&column);
        }
        out
    }
}

// `y` is a row index below the image height, hence non-negative.
#[allow(clippy::cast_sign_loss)]
fn read_sample(depth: Depth, column: &[u8], y: i32) -> Color {
    let y = y as usize;
    match depth {
        Depth::Indexed4 => {
            let byte = column.get(y / 2).copied().unwrap_or(0);
            if y % 2 == 0 {
                byte & 0x0F
            } else {
                byte >> 4
            }
        }
        Depth::Mono => {
            let byte = column.get(y / 8).copied().unwrap_or(0);
            (byte >> (y % 8)) & 1
        }
    }
}

#[allow(clippy::cast_sign_loss)]
fn write_sample(depth: Depth, column: &mut [u8], y: i32, c: Color) {
    let y = y as usize;
    match depth {
        Depth::Indexed4 => {
            if let Some(byte) = column.get_mut(y / 2) {
                if y % 2 == 0 {
                    *byte |= c & 0x0F;
                } else {
                    *byte |= (c & 0x0F) << 4;
                }
            }
        }
        // LSB first: row 0 is bit 0.
        Depth::Mono => {
            if let Some(byte) = column.get_mut(y / 8) {
                *byte |= (c & 1) << (y % 8);
            }
        }
    }
}
