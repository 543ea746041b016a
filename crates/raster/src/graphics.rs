//! embedded-graphics integration
//!
//! [`Image`] is a [`DrawTarget`] over [`PaletteIndex`], so text, styled
//! primitives and anything else from the embedded-graphics ecosystem can
//! render straight into an image. Solid fills and clears go through the
//! image's own clipped fill paths.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::raw::{RawData, RawU8};
use embedded_graphics::pixelcolor::PixelColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use embedded_graphics::primitives::Rectangle;

use crate::color::Color;
use crate::image::Image;

/// Palette index as an embedded-graphics colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PaletteIndex(pub Color);

impl PixelColor for PaletteIndex {
    type Raw = RawU8;
}

impl From<RawU8> for PaletteIndex {
    fn from(raw: RawU8) -> Self {
        Self(raw.into_inner())
    }
}

impl From<Color> for PaletteIndex {
    fn from(c: Color) -> Self {
        Self(c)
    }
}

impl DrawTarget for Image {
    type Color = PaletteIndex;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.0);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let w = i32::try_from(area.size.width).unwrap_or(i32::MAX);
        let h = i32::try_from(area.size.height).unwrap_or(i32::MAX);
        self.fill_rect(area.top_left.x, area.top_left.y, w, h, color.0);
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.0);
        Ok(())
    }
}

impl OriginDimensions for Image {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}
