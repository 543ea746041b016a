#![allow(clippy::unwrap_used)]

use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use raster::PaletteIndex;
use screen::ScreenConfig;
use screen_testing::TestScreen;

fn draw_title(t: &mut TestScreen) {
    let frame = t.frame_mut();
    frame.fill(8);
    Circle::new(Point::new(60, 40), 40)
        .into_styled(PrimitiveStyle::with_fill(PaletteIndex(5)))
        .draw(frame)
        .ok();
    Text::with_baseline(
        "PRESS START",
        Point::new(58, 100),
        MonoTextStyle::new(&FONT_4X6, PaletteIndex(1)),
        Baseline::Top,
    )
    .draw(frame)
    .ok();
}

#[test]
fn test_screen_creation() {
    let t = TestScreen::arcade();
    assert_eq!(t.frame().width(), 160);
    assert_eq!(t.frame().height(), 120);
    assert_eq!(t.emulator().status_bar_height(), 8);
}

#[test]
fn test_no_status_bar_screen() {
    let mut t = TestScreen::new(ScreenConfig::NO_STATUS_BAR);
    t.frame_mut().fill_rect(0, 120, 160, 8, 3);
    t.tick().unwrap();
    t.assert_panel_pixel(0, 127, 0xFF93C4).unwrap();
}

#[test]
fn test_embedded_graphics_drawing() {
    let mut t = TestScreen::arcade();
    draw_title(&mut t);
    t.tick().unwrap();

    t.assert_frame_pixel(80, 60, 5).unwrap();
    t.assert_region_contains(Rectangle::new(Point::new(58, 100), Size::new(44, 6)), 1)
        .unwrap();
    t.assert_region_uniform(Rectangle::new(Point::new(0, 0), Size::new(20, 20)), 8)
        .unwrap();
    t.assert_panel_pixel(80, 60, 0xFFF609).unwrap();
}

#[test]
fn test_stats_on_panel() {
    let mut t = TestScreen::arcade();
    t.report_stats("fps:60");
    t.tick().unwrap();
    t.assert_status_text("fps:60").unwrap();

    let white_in_bar = (120..128)
        .flat_map(|y| (0..160).map(move |x| (x, y)))
        .filter(|&(x, y)| t.panel_rgb_at(x, y) == Some(0xFFFFFF))
        .count();
    assert!(white_in_bar > 0);
}

#[test]
fn test_golden_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let golden = dir.path().join("golden/title.png");

    let mut t = TestScreen::arcade();
    draw_title(&mut t);
    t.tick().unwrap();
    t.save_golden(&golden).unwrap();
    t.assert_matches_golden(&golden, 0).unwrap();

    t.frame_mut().fill_rect(0, 0, 4, 4, 2);
    t.tick().unwrap();
    let err = t.assert_matches_golden(&golden, 0).unwrap_err();
    assert!(err.starts_with("16 pixels differ"), "{err}");
}

#[test]
fn test_golden_dimension_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let golden = dir.path().join("small.png");
    TestScreen::new(ScreenConfig {
        double_size: true,
        width: 80,
        height: 64,
        ..ScreenConfig::ARCADE
    })
    .save_golden(&golden)
    .unwrap();

    let err = TestScreen::arcade()
        .assert_matches_golden(&golden, 0)
        .unwrap_err();
    assert!(err.starts_with("Dimension mismatch"), "{err}");
}

#[test]
fn test_missing_golden_explains_update() {
    let t = TestScreen::arcade();
    let err = t
        .assert_matches_golden("/nonexistent/golden.png", 0)
        .unwrap_err();
    assert!(err.contains("UPDATE_GOLDEN=1"));
}
