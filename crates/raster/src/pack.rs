//! Coordinate packing
//!
//! Two signed coordinates travel through a single 32-bit word: `x` in the
//! low half, `y` in the high half, each clamped to
//! [`COORD_MIN`]..=[`COORD_MAX`] first so the 16-bit halves never wrap.
//! This is the calling convention of the stored image and callback formats;
//! native Rust callers pass `(x, y)` pairs directly and only meet packing
//! through the `*_packed` entry points on [`Image`](crate::Image).

/// Smallest coordinate representable after packing.
pub const COORD_MIN: i32 = -30_000;

/// Largest coordinate representable after packing.
pub const COORD_MAX: i32 = 30_000;

/// Clamp a coordinate into the packable range.
///
/// Every drawing primitive clamps its inputs through this first, which
/// keeps all intermediate `i32` arithmetic far from overflow.
#[inline]
pub fn clamp_coord(v: i32) -> i32 {
    v.clamp(COORD_MIN, COORD_MAX)
}

/// An `(x, y)` or `(w, h)` pair packed into one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Packed(u32);

impl Packed {
    /// Pack `x` and `y`, clamping each to the packable range.
    // SAFETY: after clamp_coord both values lie in ±30000, which fits i16;
    // the i16 → u16 step is a bit-pattern reinterpretation, not a value cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(x: i32, y: i32) -> Self {
        let lo = clamp_coord(x) as i16 as u16;
        let hi = clamp_coord(y) as i16 as u16;
        Self(u32::from(lo) | (u32::from(hi) << 16))
    }

    /// Pack floating-point coordinates, truncating toward zero first.
    ///
    /// NaN truncates to 0; infinities saturate and are then clamped.
    // SAFETY: float → int `as` casts saturate in Rust, they never wrap.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_f32(x: f32, y: f32) -> Self {
        Self::new(x as i32, y as i32)
    }

    /// Reinterpret a raw word produced by [`Packed::to_bits`].
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw packed word.
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Low half, sign-extended.
    // SAFETY: masking to 16 bits before the u16 cast; u16 → i16 is a
    // bit-pattern reinterpretation.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn x(self) -> i32 {
        (self.0 & 0xFFFF) as u16 as i16 as i32
    }

    /// High half, sign-extended.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn y(self) -> i32 {
        (self.0 >> 16) as u16 as i16 as i32
    }

    /// Both halves.
    pub const fn unpack(self) -> (i32, i32) {
        (self.x(), self.y())
    }
}

impl From<(i32, i32)> for Packed {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Packed> for (i32, i32) {
    fn from(p: Packed) -> Self {
        p.unpack()
    }
}

/// Pack `x` and `y` into one word. See [`Packed::new`].
pub fn pack(x: i32, y: i32) -> Packed {
    Packed::new(x, y)
}

/// Inverse of [`pack`].
pub fn unpack(p: Packed) -> (i32, i32) {
    p.unpack()
}
