// main.rs      gifsmith command
//
// Copyright (c) 2019-2026  Douglas Lau
//
#![forbid(unsafe_code)]

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use gifsmith::{Algorithm, Backpressure, Encoder, Subscription};
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::str::FromStr;
use std::thread::{self, JoinHandle};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &str = std::env!("CARGO_PKG_VERSION");

/// Subscriber queue capacity (chunks)
const QUEUE_CAPACITY: usize = 16;

/// Boxed error which can cross threads
type BoxError = Box<dyn Error + Send + Sync>;

/// Main entry point
fn main() -> Result<(), BoxError> {
    env_logger::builder().format_timestamp(None).init();
    let mut out = StandardStream::stdout(ColorChoice::Always);
    match create_app().get_matches().subcommand() {
        ("wrap", Some(matches)) => wrap(&mut out, matches)?,
        _ => {
            let mut red = ColorSpec::new();
            red.set_fg(Some(Color::Red)).set_intense(true);
            out.set_color(&red)?;
            writeln!(out, "unknown subcommand")?;
        }
    }
    out.reset()?;
    Ok(())
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("gifsmith")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("Animated GIF encoder")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("wrap")
                .about("Wrap raw RGBA frames into a GIF")
                .arg(Arg::with_name("width").required(true).help("frame width"))
                .arg(
                    Arg::with_name("height")
                        .required(true)
                        .help("frame height"),
                )
                .arg(
                    Arg::with_name("frames")
                        .required(true)
                        .min_values(1)
                        .help("raw RGBA frame file(s)"),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .required(true)
                        .help("output GIF file"),
                )
                .arg(opt("delay", "frame delay (ms)"))
                .arg(opt("fps", "frame rate (frames per second)"))
                .arg(opt("repeat", "loop count (0: forever, -1: no loop)"))
                .arg(opt("dispose", "disposal method code"))
                .arg(opt("transparent", "transparent color (RRGGBB)"))
                .arg(opt("palette-size", "octree palette size (4-7)"))
                .arg(opt("quality", "NeuQuant sample factor (1 is best)"))
                .arg(opt("threshold", "palette reuse threshold (0-100)"))
                .arg(
                    Arg::with_name("octree")
                        .long("octree")
                        .help("use octree quantizer"),
                )
                .arg(
                    Arg::with_name("optimize")
                        .long("optimize")
                        .help("reuse palette for similar frames"),
                ),
        )
}

/// Create an option argument
fn opt(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .allow_hyphen_values(true)
        .help(help)
}

/// Parse an optional argument value
fn parse<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>, BoxError>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    match matches.value_of(name) {
        Some(v) => Ok(Some(v.parse()?)),
        None => Ok(None),
    }
}

/// Parse a required argument value
fn required<T>(matches: &ArgMatches, name: &str) -> Result<T, BoxError>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    parse(matches, name)?.ok_or_else(|| format!("missing {name}").into())
}

/// Create encoder from arguments
fn create_encoder(
    matches: &ArgMatches,
    n_frames: usize,
) -> Result<Encoder, BoxError> {
    let width = required(matches, "width")?;
    let height = required(matches, "height")?;
    let algorithm = if matches.is_present("octree") {
        Algorithm::Octree
    } else {
        Algorithm::NeuQuant
    };
    let mut enc = Encoder::new(width, height)
        .with_algorithm(algorithm)
        .with_change_detection(matches.is_present("optimize"))
        .with_total_frames(n_frames);
    if let Some(ms) = parse(matches, "delay")? {
        enc.set_delay_ms(ms);
    }
    if let Some(fps) = parse(matches, "fps")? {
        enc.set_frame_rate(fps);
    }
    if let Some(repeat) = parse(matches, "repeat")? {
        enc.set_repeat(repeat);
    }
    if let Some(dispose) = parse(matches, "dispose")? {
        enc.set_dispose(dispose);
    }
    if let Some(rgb) = matches.value_of("transparent") {
        let rgb = rgb.trim_start_matches('#').trim_start_matches("0x");
        enc.set_transparent(Some(u32::from_str_radix(rgb, 16)?));
    }
    if let Some(size) = parse(matches, "palette-size")? {
        enc.set_palette_size(size);
    }
    if let Some(quality) = parse(matches, "quality")? {
        enc.set_quality(quality);
    }
    if let Some(threshold) = parse(matches, "threshold")? {
        enc.set_threshold(threshold);
    }
    Ok(enc)
}

/// Spawn a thread writing subscribed output to a file
fn spawn_writer(
    path: String,
    sub: Subscription,
) -> JoinHandle<Result<usize, BoxError>> {
    thread::spawn(move || {
        let mut writer = BufWriter::new(File::create(path)?);
        let mut len = 0;
        for chunk in sub {
            let chunk = chunk?;
            writer.write_all(&chunk)?;
            len += chunk.len();
        }
        writer.flush()?;
        Ok(len)
    })
}

/// Handle wrap subcommand
fn wrap(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), BoxError> {
    let mut magenta = ColorSpec::new();
    magenta.set_fg(Some(Color::Magenta));
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    let frames: Vec<&str> = matches
        .values_of("frames")
        .map(|v| v.collect())
        .unwrap_or_default();
    let output: String = required(matches, "output")?;
    let mut enc = create_encoder(matches, frames.len())?;
    enc.on_progress(|pct| {
        let mut err = StandardStream::stderr(ColorChoice::Auto);
        let mut yellow = ColorSpec::new();
        yellow.set_fg(Some(Color::Yellow)).set_intense(true);
        let _ = err.set_color(&yellow);
        let _ = write!(err, "\r{pct:>3}%");
        let _ = err.reset();
    });
    let sub = enc.subscribe(QUEUE_CAPACITY, Backpressure::Block);
    let writer = spawn_writer(output.clone(), sub);
    enc.start()?;
    for path in &frames {
        enc.add_frame(fs::read(path)?)?;
    }
    enc.finish()?;
    eprintln!();
    let len = writer.join().map_err(|_| "writer thread panicked")??;
    out.set_color(&magenta)?;
    write!(out, "{output}")?;
    out.set_color(&bold)?;
    writeln!(
        out,
        ": {}x{}, frames: {}, palettes: {}, bytes: {}",
        enc.width(),
        enc.height(),
        enc.frames_written(),
        enc.palette_generation(),
        len
    )?;
    Ok(())
}
