//! Arcade Demo
//!
//! Drives a compositor over the headless panel for a few ticks: a bouncing
//! ball, a scrolling ground strip and a sprite, with frame stats on the
//! status bar. The last frame is saved as a PNG.
//!
//! Run with: RUST_LOG=debug cargo run -p screen-emulator --example arcade_demo [out.png]

#![allow(clippy::arithmetic_side_effects)]

use anyhow::Context;
use raster::{Image, Palette};
use screen::{Compositor, Presented};
use screen_emulator::{Emulator, EmulatorConfig};
use tracing_subscriber::EnvFilter;

const TICKS: i32 = 48;

fn sprite() -> anyhow::Result<Image> {
    let mut ship = Image::new(9, 7)?;
    ship.fill(raster::TRANSPARENT);
    ship.fill_rect(3, 0, 3, 7, 9);
    ship.fill_rect(0, 4, 9, 2, 6);
    ship.set_pixel(4, 1, 1);
    Ok(ship)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let out = std::env::args()
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("arcade_demo.png"));

    let config = EmulatorConfig::DEFAULT;
    let mut screen = Compositor::new(config.screen, Palette::ARCADE, Emulator::new(config))
        .context("creating compositor")?;
    screen.set_brightness(80);

    let ship = sprite()?;
    let mut ground = Image::new(168, 8)?;
    for x in (0..168).step_by(8) {
        ground.fill_rect(x, 0, 4, 8, 7);
        ground.fill_rect(x + 4, 4, 4, 4, 14);
    }

    let (mut bx, mut by, mut vx, mut vy) = (20, 20, 3, 2);
    for tick in 0..TICKS {
        let (w, h) = (i32::from(screen.frame().width()), i32::from(screen.frame().height()));
        if !(4..w - 4).contains(&(bx + vx)) {
            vx = -vx;
        }
        if !(4..h - 12).contains(&(by + vy)) {
            vy = -vy;
        }
        bx += vx;
        by += vy;

        let frame = screen.frame_mut();
        frame.fill(8);
        frame.draw_image(&ground, -(tick % 8), h - 8);
        frame.fill_circle(bx, by, 4, 5);
        frame.draw_circle(bx, by, 4, 4);
        frame.draw_transparent_image(&ship, 76, h - 20);

        if tick % 16 == 0 {
            screen.report_stats(&format!("tick {tick} ball {bx},{by}"));
        }
        if screen.present()? == Presented::Skipped {
            tracing::debug!(tick, "tick skipped");
        }
    }

    let emulator = screen.presenter();
    let stats = emulator.stats();
    println!(
        "{} frames, {} status bar updates, {} palette loads",
        stats.frames, stats.status_bar_updates, stats.palette_updates
    );
    emulator
        .screenshot(&out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("screenshot written to {}", out.display());
    Ok(())
}
