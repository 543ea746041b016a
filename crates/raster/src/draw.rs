//! Primitive drawing: lines, rectangles, circles, icons
//!
//! All primitives are total. Coordinates are clamped to the packable range
//! (±30000) on entry and pixels outside the image are clipped, so nothing
//! here can fail or overflow.

// SAFETY (module-wide): every coordinate is clamped to ±30000 before use and
// image dimensions are at most MAX_DIMENSION, so all i32 sums, differences
// and doublings below stay within ±2^17.
#![allow(clippy::arithmetic_side_effects)]

use crate::color::Color;
use crate::image::Image;
use crate::pack::{clamp_coord, Packed};

/// Colour lookup table for [`Image::map_rect`], indexed by the old colour.
pub type ColorMap = [Color; 16];

impl Image {
    /// Draw a straight line from `(x0, y0)` to `(x1, y1)`, both ends
    /// included, with no gaps between consecutive pixels.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: Color) {
        let (x0, y0, x1, y1) = (
            clamp_coord(x0),
            clamp_coord(y0),
            clamp_coord(x1),
            clamp_coord(y1),
        );

        if x0 == x1 {
            let (top, bottom) = (y0.min(y1), y0.max(y1));
            self.fill_span(x0, x0 + 1, top, bottom + 1, c);
            return;
        }
        if y0 == y1 {
            let (left, right) = (x0.min(x1), x0.max(x1));
            self.fill_span(left, right + 1, y0, y0 + 1, c);
            return;
        }

        // Both ends on the same outside side: nothing can land in the image.
        let (w, h) = (self.width_i32(), self.height_i32());
        if (x0 < 0 && x1 < 0)
            || (y0 < 0 && y1 < 0)
            || (x0 >= w && x1 >= w)
            || (y0 >= h && y1 >= h)
        {
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y, c);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Fill `[x, x+w) × [y, y+h)`. No-op when `w <= 0` or `h <= 0`.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y, w, h) = (clamp_coord(x), clamp_coord(y), clamp_coord(w), clamp_coord(h));
        self.fill_span(x, x + w, y, y + h, c);
    }

    /// Draw the one-pixel border of the `w × h` box anchored at `(x, y)`.
    ///
    /// No-op when either side is zero. The border is four lines (top, left,
    /// right, bottom) on the box's inner edge, so a 1×1 box is one pixel and
    /// corner pixels are written by two lines each.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Color) {
        if w == 0 || h == 0 {
            return;
        }
        let (x, y) = (clamp_coord(x), clamp_coord(y));
        let w = clamp_coord(w) - 1;
        let h = clamp_coord(h) - 1;
        self.draw_line(x, y, x + w, y, c);
        self.draw_line(x, y, x, y + h, c);
        self.draw_line(x + w, y + h, x + w, y, c);
        self.draw_line(x + w, y + h, x, y + h, c);
    }

    /// Draw a circle outline of radius `r` around `(cx, cy)` with the
    /// integer midpoint (Bresenham) algorithm. Negative radii draw nothing.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, c: Color) {
        let (cx, cy) = (clamp_coord(cx), clamp_coord(cy));
        for (x, y) in circle_octant(r) {
            self.set_pixel(cx + x, cy + y, c);
            self.set_pixel(cx - x, cy + y, c);
            self.set_pixel(cx + x, cy - y, c);
            self.set_pixel(cx - x, cy - y, c);
            self.set_pixel(cx + y, cy + x, c);
            self.set_pixel(cx - y, cy + x, c);
            self.set_pixel(cx + y, cy - x, c);
            self.set_pixel(cx - y, cy - x, c);
        }
    }

    /// Fill the disc bounded by [`Image::draw_circle`]'s outline.
    ///
    /// Each octant step paints the horizontal spans between its mirrored
    /// outline points, so every outline pixel is covered and nothing
    /// outside it is.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, c: Color) {
        let (cx, cy) = (clamp_coord(cx), clamp_coord(cy));
        for (x, y) in circle_octant(r) {
            self.hline(cx - x, cx + x, cy + y, c);
            self.hline(cx - x, cx + x, cy - y, c);
            self.hline(cx - y, cx + y, cy + x, c);
            self.hline(cx - y, cx + y, cy - x, c);
        }
    }

    /// Paint every non-zero pixel of `icon` at `(x, y)` in colour `c`.
    ///
    /// Icons are normally mono images; any depth works.
    pub fn draw_icon(&mut self, icon: &Image, x: i32, y: i32, c: Color) {
        let (x, y) = (clamp_coord(x), clamp_coord(y));
        for iy in 0..icon.height_i32() {
            for ix in 0..icon.width_i32() {
                if icon.pixel(ix, iy) != 0 {
                    self.set_pixel(x + ix, y + iy, c);
                }
            }
        }
    }

    /// Recolour `[x, x+w) × [y, y+h)` through `map`: every pixel `p`
    /// becomes `map[p]`. No-op when `w <= 0` or `h <= 0`.
    pub fn map_rect(&mut self, x: i32, y: i32, w: i32, h: i32, map: &ColorMap) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y, w, h) = (clamp_coord(x), clamp_coord(y), clamp_coord(w), clamp_coord(h));
        let depth = self.depth();
        for py in y.max(0)..(y + h).min(self.height_i32()) {
            for px in x.max(0)..(x + w).min(self.width_i32()) {
                let old = self.pixel(px, py);
                let new = map.get(usize::from(old)).copied().unwrap_or(old);
                self.set_pixel(px, py, depth.normalize(new));
            }
        }
    }

    /// [`Image::draw_line`] with both endpoints packed.
    pub fn draw_line_packed(&mut self, from: Packed, to: Packed, c: Color) {
        let ((x0, y0), (x1, y1)) = (from.unpack(), to.unpack());
        self.draw_line(x0, y0, x1, y1, c);
    }

    /// [`Image::fill_rect`] with position and size packed.
    pub fn fill_rect_packed(&mut self, xy: Packed, wh: Packed, c: Color) {
        let ((x, y), (w, h)) = (xy.unpack(), wh.unpack());
        self.fill_rect(x, y, w, h, c);
    }

    /// [`Image::map_rect`] with position and size packed.
    pub fn map_rect_packed(&mut self, xy: Packed, wh: Packed, map: &ColorMap) {
        let ((x, y), (w, h)) = (xy.unpack(), wh.unpack());
        self.map_rect(x, y, w, h, map);
    }

    /// [`Image::fill_circle`] with the centre packed.
    pub fn fill_circle_packed(&mut self, center: Packed, r: i32, c: Color) {
        let (cx, cy) = center.unpack();
        self.fill_circle(cx, cy, r, c);
    }

    /// [`Image::draw_icon`] with the position packed.
    pub fn draw_icon_packed(&mut self, icon: &Image, xy: Packed, c: Color) {
        let (x, y) = xy.unpack();
        self.draw_icon(icon, x, y, c);
    }

    /// Inclusive horizontal span, clipped to the image.
    fn hline(&mut self, x0: i32, x1: i32, y: i32, c: Color) {
        self.fill_span(x0, x1 + 1, y, y + 1, c);
    }

    /// Fill `[x_start, x_end) × [y_start, y_end)` after clipping to the
    /// image. Bounds are not re-clamped, so spans up to twice the
    /// coordinate range are filled whole.
    fn fill_span(&mut self, x_start: i32, x_end: i32, y_start: i32, y_end: i32, c: Color) {
        let x_start = x_start.max(0);
        let x_end = x_end.min(self.width_i32());
        let y_start = y_start.max(0);
        let y_end = y_end.min(self.height_i32());
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        let c = self.depth().normalize(c);
        // Both bounds lie inside [0, width] after clipping.
        let (Ok(from), Ok(to)) = (usize::try_from(x_start), usize::try_from(x_end)) else {
            return;
        };
        for row_y in y_start..y_end {
            if let Some(span) = self.row_mut(row_y).and_then(|row| row.get_mut(from..to)) {
                span.fill(c);
            }
        }
    }
}

/// Octant offsets `(x, y)` visited by the midpoint circle algorithm.
///
/// Starts at `(0, r)` with `d = 3 - 2r`; `x` always advances, `y` steps
/// down only while `d > 0`, and the walk ends once `y < x`.
fn circle_octant(r: i32) -> impl Iterator<Item = (i32, i32)> {
    let r = clamp_coord(r);
    let mut x = 0;
    let mut y = r;
    let mut d = 3 - 2 * r;
    core::iter::from_fn(move || {
        if r < 0 || y < x {
            return None;
        }
        let step = (x, y);
        x += 1;
        if d > 0 {
            y -= 1;
            d += 4 * (x - y) + 10;
        } else {
            d += 4 * x + 6;
        }
        Some(step)
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]
    use super::*;
    use crate::pack::{pack, COORD_MAX, COORD_MIN};

    fn painted(img: &Image) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..img.height_i32() {
            for x in 0..img.width_i32() {
                if img.pixel(x, y) != 0 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn horizontal_and_vertical_lines() {
        let mut img = Image::new(8, 8).unwrap();
        img.draw_line(5, 2, 1, 2, 1);
        assert_eq!(painted(&img), vec![(1, 2), (2, 2), (3, 2), (4, 2), (5, 2)]);

        let mut img = Image::new(8, 8).unwrap();
        img.draw_line(3, 6, 3, 4, 1);
        assert_eq!(painted(&img), vec![(3, 4), (3, 5), (3, 6)]);
    }

    #[test]
    fn single_point_line() {
        let mut img = Image::new(4, 4).unwrap();
        img.draw_line(2, 2, 2, 2, 3);
        assert_eq!(painted(&img), vec![(2, 2)]);
    }

    #[test]
    fn diagonal_line_hits_both_ends_without_gaps() {
        let mut img = Image::new(20, 20).unwrap();
        img.draw_line(1, 17, 15, 3, 1);
        assert_eq!(img.pixel(1, 17), 1);
        assert_eq!(img.pixel(15, 3), 1);
        for y in 3..=17 {
            assert!(
                (0..20).any(|x| img.pixel(x, y) != 0),
                "row {y} has no pixel"
            );
        }
        assert_eq!(painted(&img).len(), 15);
    }

    #[test]
    fn steep_line_visits_every_row() {
        let mut img = Image::new(10, 30).unwrap();
        img.draw_line(2, 0, 5, 29, 1);
        for y in 0..30 {
            assert_eq!((0..10).filter(|&x| img.pixel(x, y) != 0).count(), 1);
        }
    }

    #[test]
    fn line_partly_outside_is_clipped() {
        let mut img = Image::new(5, 5).unwrap();
        img.draw_line(-3, -3, 7, 7, 1);
        for i in 0..5 {
            assert_eq!(img.pixel(i, i), 1);
        }
        assert_eq!(painted(&img).len(), 5);
    }

    #[test]
    fn lines_from_the_coordinate_limits_reach_the_image() {
        let mut img = Image::new(16, 16).unwrap();
        img.draw_line(3, COORD_MIN, 3, 100, 1);
        assert_eq!(painted(&img), (0..16).map(|y| (3, y)).collect::<Vec<_>>());

        let mut img = Image::new(16, 16).unwrap();
        img.draw_line(COORD_MIN, 4, COORD_MAX, 4, 1);
        assert_eq!(painted(&img), (0..16).map(|x| (x, 4)).collect::<Vec<_>>());

        let mut img = Image::new(16, 16).unwrap();
        img.draw_line(7, i32::MAX, 7, i32::MIN, 1);
        assert_eq!(painted(&img).len(), 16);
    }

    #[test]
    fn disc_at_the_radius_limit_covers_the_image() {
        let mut img = Image::new(16, 16).unwrap();
        img.fill_circle(0, 0, COORD_MAX, 1);
        assert_eq!(painted(&img).len(), 256);

        let mut img = Image::new(16, 16).unwrap();
        img.fill_circle(-20_000, 8, COORD_MAX, 1);
        assert_eq!(painted(&img).len(), 256);
    }

    #[test]
    fn fill_rect_clips_and_ignores_empty() {
        let mut img = Image::new(6, 6).unwrap();
        img.fill_rect(2, 2, 0, 5, 1);
        img.fill_rect(2, 2, 5, -1, 1);
        assert!(painted(&img).is_empty());

        img.fill_rect(-2, 4, 4, 10, 2);
        assert_eq!(painted(&img), vec![(0, 4), (1, 4), (0, 5), (1, 5)]);
    }

    #[test]
    fn draw_rect_1x1_is_one_pixel() {
        let mut img = Image::new(4, 4).unwrap();
        img.draw_rect(0, 0, 1, 1, 1);
        assert_eq!(painted(&img), vec![(0, 0)]);
    }

    #[test]
    fn draw_rect_border_stays_inside_box() {
        let mut img = Image::new(8, 8).unwrap();
        img.draw_rect(1, 1, 4, 3, 1);
        assert_eq!(
            painted(&img),
            vec![
                (1, 1), (2, 1), (3, 1), (4, 1),
                (1, 2), (4, 2),
                (1, 3), (2, 3), (3, 3), (4, 3),
            ]
        );
        img.fill(0);
        img.draw_rect(1, 1, 0, 3, 1);
        assert!(painted(&img).is_empty());
    }

    #[test]
    fn circle_hits_cardinal_extremes() {
        let mut img = Image::new(21, 21).unwrap();
        img.draw_circle(10, 10, 5, 2);
        for (x, y) in [(15, 10), (5, 10), (10, 15), (10, 5)] {
            assert_eq!(img.pixel(x, y), 2, "({x}, {y})");
        }
        for (x, y) in painted(&img) {
            let (dx, dy) = (x - 10, y - 10);
            assert!(dx.abs() <= 5 && dy.abs() <= 5, "({x}, {y}) outside the box");
            let d2 = dx * dx + dy * dy;
            assert!((16..=36).contains(&d2), "({x}, {y}) off the ring");
        }
        assert_eq!(img.pixel(10, 10), 0);
    }

    #[test]
    fn circle_radius_zero_and_negative() {
        let mut img = Image::new(5, 5).unwrap();
        img.draw_circle(2, 2, -1, 1);
        img.fill_circle(2, 2, -3, 1);
        assert!(painted(&img).is_empty());
        img.draw_circle(2, 2, 0, 1);
        assert_eq!(painted(&img), vec![(2, 2)]);
    }

    #[test]
    fn circle_radius_one_is_a_diamond() {
        let mut img = Image::new(5, 5).unwrap();
        img.draw_circle(2, 2, 1, 1);
        // Only the (0, 1) octant step runs before y drops below x.
        assert_eq!(painted(&img), vec![(2, 1), (1, 2), (3, 2), (2, 3)]);
    }

    #[test]
    fn fill_circle_covers_outline() {
        let mut outline = Image::new(32, 32).unwrap();
        let mut disc = Image::new(32, 32).unwrap();
        for r in 0..12 {
            outline.fill(0);
            disc.fill(0);
            outline.draw_circle(15, 15, r, 1);
            disc.fill_circle(15, 15, r, 1);
            for (x, y) in painted(&outline) {
                assert_eq!(disc.pixel(x, y), 1, "r={r} ({x}, {y}) not filled");
            }
            assert_eq!(disc.pixel(15, 15), 1);
        }
    }

    #[test]
    fn fill_circle_rows_are_contiguous() {
        let mut img = Image::new(40, 40).unwrap();
        img.fill_circle(20, 20, 9, 1);
        for y in 0..40 {
            let xs: Vec<i32> = (0..40).filter(|&x| img.pixel(x, y) != 0).collect();
            if let (Some(first), Some(last)) = (xs.first(), xs.last()) {
                assert_eq!(xs.len() as i32, last - first + 1, "gap in row {y}");
            }
        }
    }

    #[test]
    fn draw_icon_paints_set_bits_only() {
        let mut icon = Image::new_mono(2, 2).unwrap();
        icon.set_pixel(0, 0, 1);
        icon.set_pixel(1, 1, 1);
        let mut img = Image::new(4, 4).unwrap();
        img.fill(3);
        img.draw_icon(&icon, 1, 1, 9);
        assert_eq!(img.pixel(1, 1), 9);
        assert_eq!(img.pixel(2, 2), 9);
        assert_eq!(img.pixel(2, 1), 3);
    }

    #[test]
    fn map_rect_recolours_clipped_region() {
        let mut img = Image::new(3, 3).unwrap();
        img.fill(1);
        let mut map: ColorMap = core::array::from_fn(|i| i as Color);
        map[1] = 7;
        img.map_rect(1, 1, 5, 5, &map);
        assert_eq!(img.pixel(0, 0), 1);
        assert_eq!(img.pixel(1, 1), 7);
        assert_eq!(img.pixel(2, 2), 7);
    }

    #[test]
    fn packed_entry_points_match_direct_calls() {
        let mut a = Image::new(16, 16).unwrap();
        let mut b = Image::new(16, 16).unwrap();
        a.fill_rect(2, 3, 4, 5, 6);
        b.fill_rect_packed(pack(2, 3), pack(4, 5), 6);
        a.draw_line(0, 15, 15, 0, 2);
        b.draw_line_packed(pack(0, 15), pack(15, 0), 2);
        a.fill_circle(8, 8, 3, 4);
        b.fill_circle_packed(pack(8, 8), 3, 4);
        assert_eq!(a, b);
    }
}
