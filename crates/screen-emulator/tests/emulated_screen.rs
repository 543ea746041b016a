//! Compositor driving the headless panel end to end.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use raster::{Palette, Rgb};
use screen::{Compositor, PresentError, ScreenConfig};
use screen_emulator::{Emulator, EmulatorConfig};

fn arcade() -> Compositor<Emulator> {
    Compositor::new(ScreenConfig::ARCADE, Palette::ARCADE, Emulator::new(EmulatorConfig::NATIVE))
        .unwrap()
}

#[test]
fn frame_and_status_bar_land_in_their_regions() {
    let mut screen = arcade();
    screen.frame_mut().fill(2);
    screen.report_stats("ok");
    screen.present().unwrap();

    let fb = screen.presenter().framebuffer();
    assert_eq!(fb.pixel(0, 0), Some(0xFF2121));
    assert_eq!(fb.pixel(159, 119), Some(0xFF2121));
    // Status bar background is colour 0, text colour 1.
    assert_eq!(fb.pixel(0, 120), Some(0x000000));
    assert!((120..128).any(|y| (0..160).any(|x| fb.pixel(x, y) == Some(0xFFFFFF))));
    assert_eq!(screen.presenter().last_status_text(), Some("ok"));

    let stats = screen.presenter().stats();
    assert_eq!((stats.frames, stats.status_bar_updates, stats.palette_updates), (1, 1, 1));
}

#[test]
fn palette_change_recolours_next_frame() {
    let mut screen = arcade();
    screen.frame_mut().fill(3);
    screen.present().unwrap();
    assert_eq!(screen.presenter().framebuffer().pixel(10, 10), Some(0xFF93C4));

    let mut entries = *Palette::ARCADE.entries();
    entries[3] = Rgb::new(0x10, 0x20, 0x30);
    screen.set_palette(Palette::new(entries));
    screen.present().unwrap();
    assert_eq!(screen.presenter().framebuffer().pixel(10, 10), Some(0x102030));
    assert_eq!(screen.presenter().stats().palette_updates, 2);
}

#[test]
fn inverted_panel_shows_inverted_colours() {
    let config = ScreenConfig {
        invert_palette: true,
        ..ScreenConfig::NO_STATUS_BAR
    };
    let emulator = Emulator::new(EmulatorConfig { screen: config, scale: 1 });
    let mut screen = Compositor::new(config, Palette::ARCADE, emulator).unwrap();
    screen.frame_mut().fill(1);
    screen.present().unwrap();
    assert_eq!(screen.presenter().framebuffer().pixel(0, 0), Some(0x000000));
}

#[test]
fn double_size_fills_whole_panel() {
    let config = ScreenConfig {
        double_size: true,
        ..ScreenConfig::ARCADE
    };
    let emulator = Emulator::new(EmulatorConfig { screen: config, scale: 1 });
    let mut screen = Compositor::new(config, Palette::ARCADE, emulator).unwrap();
    screen.frame_mut().fill_rect(79, 63, 1, 1, 1);
    screen.present().unwrap();

    let fb = screen.presenter().framebuffer();
    assert_eq!(fb.count(0xFFFFFF), 4);
    assert_eq!(fb.pixel(159, 127), Some(0xFFFFFF));
    assert_eq!(fb.pixel(157, 127), Some(0x000000));
}

#[test]
fn mismatched_geometry_is_reported() {
    // Panel thinks it is bigger than the compositor's frame.
    let emulator = Emulator::new(EmulatorConfig {
        screen: ScreenConfig {
            width: 200,
            ..ScreenConfig::NO_STATUS_BAR
        },
        scale: 1,
    });
    let mut screen = Compositor::new(ScreenConfig::NO_STATUS_BAR, Palette::ARCADE, emulator).unwrap();
    let err = screen.present().unwrap_err();
    assert_eq!(
        err,
        PresentError::FrameSizeMismatch {
            expected_width: 200,
            expected_height: 128,
            found_width: 160,
            found_height: 128,
        }
    );
    assert_eq!(screen.frames_presented(), 0);
    assert_eq!(screen.presenter().stats().rejected, 1);
}

#[test]
fn brightness_dims_screenshot() -> anyhow::Result<()> {
    let mut screen = arcade();
    screen.frame_mut().fill(1);
    screen.present()?;
    screen.set_brightness(5);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dim.png");
    screen.presenter().screenshot(&path)?;

    let png = image::open(&path)?.to_rgb8();
    assert_eq!(png.dimensions(), (160, 128));
    // Clamped to 10 %.
    assert!(png.get_pixel(0, 0).0.iter().all(|c| (25..=26).contains(c)));
    Ok(())
}

#[test]
fn screenshot_to_missing_directory_fails() {
    let screen = arcade();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/shot.png");
    assert!(screen.presenter().screenshot(&path).is_err());
}
