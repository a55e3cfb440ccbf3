// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a packed RGB palette of evenly spaced hues, for use with
//! `mandeltiles --palette`.

extern crate clap;
extern crate env_logger;
extern crate mandeltiles;

use clap::{App, Arg, ArgMatches};
use failure::{format_err, Error, ResultExt};
use log::info;
use mandeltiles::Palette;
use std::fs::File;
use std::io::Write;
use std::str::FromStr;

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const COLORS: &str = "colors";
const SATURATION: &str = "saturation";
const VALUE: &str = "value";

fn args<'a>() -> ArgMatches<'a> {
    App::new("palette")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Generates packed RGB colors of evenly spaced hue")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(COLORS)
                .long(COLORS)
                .short("n")
                .takes_value(true)
                .default_value("10000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value() / 3,
                        "Could not parse color count",
                        "Color count must be at least 1",
                    )
                })
                .help("Number of colors to generate"),
        )
        .arg(
            Arg::with_name(SATURATION)
                .long(SATURATION)
                .short("s")
                .takes_value(true)
                .default_value("0.9")
                .validator(|s| {
                    validate_range(
                        &s,
                        0.0,
                        1.0,
                        "Could not parse saturation",
                        "Saturation must be between 0 and 1",
                    )
                })
                .help("Saturation of every color"),
        )
        .arg(
            Arg::with_name(VALUE)
                .long(VALUE)
                .short("v")
                .takes_value(true)
                .default_value("1.0")
                .validator(|s| {
                    validate_range(
                        &s,
                        0.0,
                        1.0,
                        "Could not parse value",
                        "Value must be between 0 and 1",
                    )
                })
                .help("Brightness of every color"),
        )
        .get_matches()
}

fn number_of<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| format_err!("Could not parse --{}", name))
}

fn run() -> Result<(), Error> {
    let matches = args();
    let output = matches
        .value_of(OUTPUT)
        .ok_or_else(|| format_err!("You must pass the --{} option", OUTPUT))?;
    let count: usize = number_of(&matches, COLORS)?;
    let palette = Palette::hues(
        count,
        number_of(&matches, SATURATION)?,
        number_of(&matches, VALUE)?,
    )?;

    let mut file = File::create(output).with_context(|_| format!("creating {}", output))?;
    file.write_all(&palette.to_bytes())
        .with_context(|_| format!("writing {}", output))?;
    info!("{} colors written to {}", palette.len(), output);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Palette failure: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
