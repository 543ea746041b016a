//! Raster error types
//!
//! Only operations that compare or rebuild whole images can fail. Pixel
//! access and drawing primitives clip instead of erroring, and an
//! unsupported rotation angle is reported as `None` by
//! [`Image::rotated`](crate::Image::rotated).

/// Size and depth of an image, as reported in [`RasterError::DimensionMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
    /// Bits per pixel (1 or 4).
    pub bpp: u8,
}

impl core::fmt::Display for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}@{}bpp", self.width, self.height, self.bpp)
    }
}

/// Errors returned by fallible image operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
pub enum RasterError {
    /// Source and destination differ in width, height or colour depth.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Shape of the image being written.
        expected: Shape,
        /// Shape of the image supplied by the caller.
        found: Shape,
    },

    /// Width or height is zero or above [`MAX_DIMENSION`](crate::MAX_DIMENSION).
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Raw image buffer is shorter than its header says.
    #[error("raw image truncated: need {expected} bytes, got {found}")]
    Truncated {
        /// Bytes required by the header.
        expected: usize,
        /// Bytes supplied.
        found: usize,
    },

    /// Raw image buffer does not start with the image magic byte.
    #[error("bad raw image magic 0x{0:02x}")]
    BadMagic(u8),

    /// Colour depth other than 1 or 4 bits per pixel.
    #[error("unsupported colour depth {0}bpp")]
    UnsupportedDepth(u8),

    /// Palette buffer is not exactly 16 RGB triples.
    #[error("palette must be 48 bytes, got {0}")]
    PaletteLength(usize),

    /// Row buffer length is not a whole number of image rows.
    #[error("row buffer of {len} bytes is not a multiple of width {width}")]
    RowBufferLength {
        /// Buffer length in bytes.
        len: usize,
        /// Image width in pixels.
        width: u16,
    },
}
