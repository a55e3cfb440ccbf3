// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate mandeltiles;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use log::info;
use mandeltiles::config::{parse_corners, parse_pair, DEFAULT_PREFIX};
use mandeltiles::{FileSink, RenderConfig, Resolution, SinkPolicy, Smoothing};
use std::str::FromStr;

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_positive<T: FromStr + PartialOrd + Default>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) if i > T::default() => Ok(()),
        _ => Err(err.to_string()),
    }
}

const PALETTE: &str = "palette";
const CORNERS: &str = "corners";
const DENSITY: &str = "density";
const GRID: &str = "grid";
const ITERATIONS: &str = "iterations";
const RESOLUTION: &str = "resolution";
const THREADS: &str = "threads";
const OUTPUT: &str = "output";
const PREFIX: &str = "prefix";
const SCALE: &str = "scale";
const BANDED: &str = "banded";
const KEEP_GOING: &str = "keep-going";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandeltiles")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Renders the Mandelbrot set as a grid of tiles, keeping only those on its border")
        .arg(
            Arg::with_name(PALETTE)
                .required(true)
                .long(PALETTE)
                .short("s")
                .takes_value(true)
                .help("Path to packed RGB color data"),
        )
        .arg(
            Arg::with_name(CORNERS)
                .long(CORNERS)
                .short("c")
                .takes_value(true)
                .default_value("(-0.75,-1.0),(1.0,1.0)")
                .validator(|s| match parse_corners(&s) {
                    Some(_) => Ok(()),
                    None => Err("Corners must look like (x0,y0),(x1,y1)".to_string()),
                })
                .help("Minimum and maximum points of the region of the complex plane"),
        )
        .arg(
            Arg::with_name(DENSITY)
                .long(DENSITY)
                .short("d")
                .takes_value(true)
                .default_value("20")
                .validator(|s| validate_positive::<f64>(&s, "Density must be a positive number"))
                .help("Palette entries per unit of escape time"),
        )
        .arg(
            Arg::with_name(GRID)
                .long(GRID)
                .short("g")
                .takes_value(true)
                .default_value("16x16")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse grid size"))
                .help("Number of horizontal and vertical tiles"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("4096")
                .validator(|s| {
                    validate_positive::<usize>(&s, "Iteration count must be a positive integer")
                })
                .help("Maximum iterations per pixel"),
        )
        .arg(
            Arg::with_name(RESOLUTION)
                .long(RESOLUTION)
                .short("r")
                .takes_value(true)
                .default_value("1024x576")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse tile resolution"))
                .help("Pixel size of each tile"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_positive::<usize>(&s, "Thread count must be a positive integer")
                })
                .help("Number of threads to use per tile [default: number of CPUs]"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value(".")
                .help("Directory to write tiles into"),
        )
        .arg(
            Arg::with_name(PREFIX)
                .long(PREFIX)
                .short("p")
                .takes_value(true)
                .default_value(DEFAULT_PREFIX)
                .help("Tile filename prefix"),
        )
        .arg(
            Arg::with_name(SCALE)
                .long(SCALE)
                .takes_value(true)
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse scaled size"))
                .help("Resize each tile to this size before writing it"),
        )
        .arg(
            Arg::with_name(BANDED)
                .long(BANDED)
                .help("Color by whole iteration counts instead of smoothed ones"),
        )
        .arg(
            Arg::with_name(KEEP_GOING)
                .long(KEEP_GOING)
                .help("Log tiles that fail to write and carry on"),
        )
        .get_matches()
}

/// Pull a validated pair back out of the matches.
fn pair_of<T: FromStr>(matches: &ArgMatches, name: &str, separator: char) -> Result<(T, T), Error> {
    matches
        .value_of(name)
        .and_then(|s| parse_pair(s, separator))
        .ok_or_else(|| failure::format_err!("Could not parse --{}", name))
}

fn number_of<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| failure::format_err!("Could not parse --{}", name))
}

fn config(matches: &ArgMatches) -> Result<RenderConfig, Error> {
    let palette = matches
        .value_of(PALETTE)
        .ok_or_else(|| failure::format_err!("You must pass the --{} option", PALETTE))?;
    let mut config = RenderConfig::new(palette);

    let (leftlower, rightupper) = matches
        .value_of(CORNERS)
        .and_then(parse_corners)
        .ok_or_else(|| failure::format_err!("Could not parse --{}", CORNERS))?;
    config.leftlower = leftlower;
    config.rightupper = rightupper;
    config.grid = pair_of(matches, GRID, 'x')?;
    config.resolution = pair_of(matches, RESOLUTION, 'x')?;
    config.iterations = number_of(matches, ITERATIONS)?;
    config.density = number_of(matches, DENSITY)?;
    if matches.is_present(THREADS) {
        config.threads = number_of(matches, THREADS)?;
    }
    if let Some(output) = matches.value_of(OUTPUT) {
        config.output = output.into();
    }
    if let Some(prefix) = matches.value_of(PREFIX) {
        config.prefix = prefix.to_string();
    }
    if matches.is_present(SCALE) {
        config.scale = Some(pair_of(matches, SCALE, 'x')?);
    }
    if matches.is_present(BANDED) {
        config.smoothing = Smoothing::Banded;
    }
    if matches.is_present(KEEP_GOING) {
        config.policy = SinkPolicy::Continue;
    }
    Ok(config)
}

fn run() -> Result<(), Error> {
    let matches = args();
    let config = config(&matches)?;
    config.validate()?;

    let scale = match config.scale {
        Some((w, h)) => Some(Resolution::new(w, h)?),
        None => None,
    };
    let mut sink = FileSink::new(config.output.clone()).scaled(scale);
    let summary = mandeltiles::render(&config, &mut sink)?;
    info!(
        "{} tiles written, {} inside the set, {} outside it, {} failed",
        summary.written, summary.interior, summary.exterior, summary.failed
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Render failure: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
