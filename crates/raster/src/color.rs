//! Palette colours
//!
//! Pixels store small palette indices, never RGB values. The [`Palette`]
//! maps those indices to RGB triples and is owned by whoever presents the
//! frame, so every image drawn against it shares one colour table.

use crate::error::RasterError;

/// Palette index stored in every pixel.
///
/// 4-bit images hold 0–15, mono images hold 0–1.
pub type Color = u8;

/// Index treated as "no paint" by transparent blits and collision checks.
pub const TRANSPARENT: Color = 0;

/// Number of entries in a [`Palette`].
pub const PALETTE_SIZE: usize = 16;

/// Length in bytes of a serialized palette (16 RGB triples).
pub const PALETTE_BYTES: usize = PALETTE_SIZE * 3;

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Build an entry from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build an entry from a packed `0xRRGGBB` value. The top byte is ignored.
    #[allow(clippy::cast_possible_truncation)] // each channel is masked to 8 bits first
    pub const fn from_rgb888(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Packed `0xRRGGBB` value.
    pub const fn to_rgb888(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Channel-wise inversion (`value ^ 0xFFFFFF`).
    pub const fn inverted(self) -> Self {
        Self {
            r: !self.r,
            g: !self.g,
            b: !self.b,
        }
    }
}

/// Sixteen-entry colour table shared by every image on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Palette {
    entries: [Rgb; PALETTE_SIZE],
}

impl Palette {
    /// Default arcade palette.
    pub const ARCADE: Self = Self {
        entries: [
            Rgb::from_rgb888(0x000000),
            Rgb::from_rgb888(0xFFFFFF),
            Rgb::from_rgb888(0xFF2121),
            Rgb::from_rgb888(0xFF93C4),
            Rgb::from_rgb888(0xFF8135),
            Rgb::from_rgb888(0xFFF609),
            Rgb::from_rgb888(0x249CA3),
            Rgb::from_rgb888(0x78DC52),
            Rgb::from_rgb888(0x003FAD),
            Rgb::from_rgb888(0x87F2FF),
            Rgb::from_rgb888(0x8E2EC4),
            Rgb::from_rgb888(0xA4839F),
            Rgb::from_rgb888(0x5C406C),
            Rgb::from_rgb888(0xE5CDC4),
            Rgb::from_rgb888(0x91463D),
            Rgb::from_rgb888(0x000000),
        ],
    };

    /// Build a palette from its sixteen entries.
    pub const fn new(entries: [Rgb; PALETTE_SIZE]) -> Self {
        Self { entries }
    }

    /// Parse 16 consecutive `r, g, b` byte triples.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::PaletteLength`] unless `bytes` is exactly
    /// [`PALETTE_BYTES`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RasterError> {
        if bytes.len() != PALETTE_BYTES {
            tracing::warn!(len = bytes.len(), "rejecting palette buffer");
            return Err(RasterError::PaletteLength(bytes.len()));
        }
        let mut entries = [Rgb::default(); PALETTE_SIZE];
        for (entry, triple) in entries.iter_mut().zip(bytes.chunks_exact(3)) {
            if let [r, g, b] = *triple {
                *entry = Rgb::new(r, g, b);
            }
        }
        Ok(Self { entries })
    }

    /// Serialize back to 48 bytes.
    pub fn to_bytes(&self) -> [u8; PALETTE_BYTES] {
        let mut out = [0u8; PALETTE_BYTES];
        for (chunk, entry) in out.chunks_exact_mut(3).zip(self.entries.iter()) {
            chunk.copy_from_slice(&[entry.r, entry.g, entry.b]);
        }
        out
    }

    /// Entry for `index`. Indices past the table wrap onto the low nibble.
    pub fn rgb(&self, index: Color) -> Rgb {
        self.entries
            .get(usize::from(index & 0x0F))
            .copied()
            .unwrap_or_default()
    }

    /// Entry for `index` as packed `0xRRGGBB`.
    pub fn to_rgb888(&self, index: Color) -> u32 {
        self.rgb(index).to_rgb888()
    }

    /// Palette with every entry XORed with `0xFFFFFF`, for panels wired
    /// with inverted colour lines.
    pub fn inverted(&self) -> Self {
        let mut entries = self.entries;
        for entry in &mut entries {
            *entry = entry.inverted();
        }
        Self { entries }
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ARCADE
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]
    use super::*;

    #[test]
    fn arcade_palette_round_trips_through_bytes() {
        let bytes = Palette::ARCADE.to_bytes();
        assert_eq!(&bytes[..6], &[0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF]);
        assert_eq!(Palette::from_bytes(&bytes).unwrap(), Palette::ARCADE);
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        assert_eq!(
            Palette::from_bytes(&[0u8; 47]),
            Err(RasterError::PaletteLength(47))
        );
        assert_eq!(
            Palette::from_bytes(&[0u8; 51]),
            Err(RasterError::PaletteLength(51))
        );
    }

    #[test]
    fn rgb888_packing() {
        assert_eq!(Palette::ARCADE.to_rgb888(2), 0xFF2121);
        assert_eq!(Rgb::from_rgb888(0x12_34_56), Rgb::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn inverted_xors_every_channel() {
        let inv = Palette::ARCADE.inverted();
        assert_eq!(inv.to_rgb888(0), 0xFFFFFF);
        assert_eq!(inv.to_rgb888(1), 0x000000);
        assert_eq!(inv.to_rgb888(2), 0xFF2121 ^ 0xFFFFFF);
    }

    #[test]
    fn out_of_range_index_uses_low_nibble() {
        assert_eq!(Palette::ARCADE.rgb(0x12), Palette::ARCADE.rgb(0x02));
    }
}
