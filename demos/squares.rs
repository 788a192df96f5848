// squares.rs
//
// Copyright (c) 2026  Douglas Lau
//
use gifsmith::{Algorithm, Backpressure, Encoder};
use pix::rgb::SRgba8;
use pix::Raster;
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::thread;

const SIZE: u16 = 64;
const FRAMES: u16 = 16;

/// Draw one frame: two squares moving across a transparent background
fn draw(n: u16) -> Raster<SRgba8> {
    let mut raster = Raster::with_clear(SIZE.into(), SIZE.into());
    let step = SIZE / FRAMES;
    let pos = i32::from(n * step);
    let red = SRgba8::new(0xFF, 0x20, 0x20, 0xFF);
    let blue = SRgba8::new(0x20, 0x40, 0xFF, 0xFF);
    raster.copy_color((pos, 8, 16, 16), red);
    raster.copy_color((8, pos, 16, 16), blue);
    raster
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut enc = Encoder::new(SIZE, SIZE)
        .with_algorithm(Algorithm::Octree)
        .with_change_detection(true)
        .with_total_frames(FRAMES.into());
    enc.set_delay_ms(80);
    enc.set_palette_size(4);
    enc.set_transparent(Some(0x000000));
    enc.on_progress(|pct| println!("{pct}%"));
    let sub = enc.subscribe(4, Backpressure::Block);
    let mut file = File::create("squares.gif")?;
    let writer = thread::spawn(move || -> std::io::Result<()> {
        for chunk in sub.flatten() {
            file.write_all(&chunk)?;
        }
        Ok(())
    });
    enc.start()?;
    for n in 0..FRAMES {
        enc.add_raster(&draw(n))?;
    }
    enc.finish()?;
    writer.join().map_err(|_| "writer panicked")??;
    Ok(())
}
