//! RGB panel memory
//!
//! Holds what the panel currently shows as packed `0xRRGGBB` values, one
//! per panel pixel. Indexed images are resolved through a palette when
//! they are written, the way a panel controller stores RGB after the
//! transfer.

use raster::{Image, Palette};

/// Panel-sized RGB888 pixel store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFramebuffer {
    width: u16,
    height: u16,
    pixels: Vec<u32>,
}

impl RgbFramebuffer {
    /// Black framebuffer of the given size.
    // SAFETY: both factors are u16, so the product fits usize.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; usize::from(width) * usize::from(height)],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Packed RGB at `(x, y)`, or `None` outside the panel.
    pub fn pixel(&self, x: u16, y: u16) -> Option<u32> {
        self.index(x, y).and_then(|i| self.pixels.get(i)).copied()
    }

    /// Row-major packed RGB values.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    // SAFETY: x < width and y < height are checked first; y * width + x is
    // bounded by width * height.
    #[allow(clippy::arithmetic_side_effects)]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Resolve `img` through `palette` and write it with its top-left
    /// corner at row `top`, each image pixel covering a `scale × scale`
    /// block. Anything past the panel edge is dropped.
    // SAFETY: image coordinates are below u16::MAX and scale is 1 or 2;
    // products are computed in u32 and range-checked by `index`.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn blit_indexed(&mut self, img: &Image, palette: &Palette, top: u16, scale: u16) {
        let scale = u32::from(scale.max(1));
        for y in 0..img.height() {
            let Some(row) = img.row(i32::from(y)) else {
                continue;
            };
            for (x, &c) in (0u32..).zip(row) {
                let rgb = palette.to_rgb888(c);
                for dy in 0..scale {
                    let py = u32::from(top) + u32::from(y) * scale + dy;
                    for dx in 0..scale {
                        let px = x * scale + dx;
                        let (Ok(px), Ok(py)) = (u16::try_from(px), u16::try_from(py)) else {
                            continue;
                        };
                        if let Some(slot) = self.index(px, py).and_then(|i| self.pixels.get_mut(i)) {
                            *slot = rgb;
                        }
                    }
                }
            }
        }
    }

    /// Count pixels equal to `rgb`.
    pub fn count(&self, rgb: u32) -> usize {
        self.pixels.iter().filter(|&&p| p == rgb).count()
    }
}
