// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render parameters.  Built once, validated once, and then passed by
//! reference to everything that needs it.

use crate::errors::{MandelError, Result};
use crate::escape::Smoothing;
use crate::planes::{Region, Resolution};
use crate::tiles::SinkPolicy;
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

/// Default lower-left corner of the rendered region.
pub const DEFAULT_LEFTLOWER: (f64, f64) = (-0.75, -1.0);
/// Default upper-right corner of the rendered region.
pub const DEFAULT_RIGHTUPPER: (f64, f64) = (1.0, 1.0);
/// Default number of tiles across and up.
pub const DEFAULT_GRID: (usize, usize) = (16, 16);
/// Default pixel size of each tile.
pub const DEFAULT_RESOLUTION: (usize, usize) = (1024, 576);
/// Default iteration budget.
pub const DEFAULT_ITERATIONS: usize = 1 << 12;
/// Default palette entries per unit of escape measure.
pub const DEFAULT_DENSITY: f64 = 20.0;
/// Default filename prefix.
pub const DEFAULT_PREFIX: &str = "image";

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (
            T::from_str(s[..index].trim()),
            T::from_str(s[index + 1..].trim()),
        ) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and
/// expecting floating point numbers.  Surrounding parentheses are
/// optional.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    let s = s.trim();
    let s = s
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(s);
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

/// Parses the two corners of a region, written `(x0,y0),(x1,y1)`.
pub fn parse_corners(s: &str) -> Option<(Complex<f64>, Complex<f64>)> {
    let split = s.find("),")?;
    Some((
        parse_complex(&s[..=split])?,
        parse_complex(&s[split + 2..])?,
    ))
}

/// Everything a run needs to know.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Packed RGB palette file.
    pub palette: PathBuf,
    /// Lower-left corner of the whole region.
    pub leftlower: Complex<f64>,
    /// Upper-right corner of the whole region.
    pub rightupper: Complex<f64>,
    /// Tiles across, tiles up.
    pub grid: (usize, usize),
    /// Pixel size of every tile.
    pub resolution: (usize, usize),
    /// Iteration budget per pixel.
    pub iterations: usize,
    /// Palette entries per unit of escape measure.
    pub density: f64,
    /// Whole or fractional escape counts.
    pub smoothing: Smoothing,
    /// Worker threads per tile.
    pub threads: usize,
    /// Directory tiles are written into.
    pub output: PathBuf,
    /// Filename prefix.
    pub prefix: String,
    /// If set, tiles are resized to this before being written.
    pub scale: Option<(usize, usize)>,
    /// Reaction to write failures.
    pub policy: SinkPolicy,
}

impl RenderConfig {
    /// Defaults for everything but the palette, which has none.
    pub fn new<P: Into<PathBuf>>(palette: P) -> Self {
        RenderConfig {
            palette: palette.into(),
            leftlower: Complex::new(DEFAULT_LEFTLOWER.0, DEFAULT_LEFTLOWER.1),
            rightupper: Complex::new(DEFAULT_RIGHTUPPER.0, DEFAULT_RIGHTUPPER.1),
            grid: DEFAULT_GRID,
            resolution: DEFAULT_RESOLUTION,
            iterations: DEFAULT_ITERATIONS,
            density: DEFAULT_DENSITY,
            smoothing: Smoothing::default(),
            threads: num_cpus::get(),
            output: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
            scale: None,
            policy: SinkPolicy::default(),
        }
    }

    /// The whole region as a validated value.
    pub fn region(&self) -> Result<Region> {
        Region::new(self.leftlower, self.rightupper)
    }

    /// The per-tile resolution as a validated value.
    pub fn tile_resolution(&self) -> Result<Resolution> {
        Resolution::new(self.resolution.0, self.resolution.1)
    }

    /// Check every parameter.  Nothing downstream re-checks them.
    pub fn validate(&self) -> Result<()> {
        self.region()?;
        self.tile_resolution()?;
        if let Some((w, h)) = self.scale {
            Resolution::new(w, h)?;
        }
        if self.grid.0 == 0 || self.grid.1 == 0 {
            return Err(MandelError::InvalidConfig(format!(
                "grid {}x{} must be positive on both axes",
                self.grid.0, self.grid.1
            )));
        }
        if self.iterations == 0 {
            return Err(MandelError::InvalidConfig(
                "the iteration count must be positive".to_string(),
            ));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(MandelError::InvalidConfig(format!(
                "color density {} must be a positive number",
                self.density
            )));
        }
        if self.threads == 0 {
            return Err(MandelError::InvalidConfig(
                "the thread count must be positive".to_string(),
            ));
        }
        if self.prefix.is_empty() || self.prefix.contains(std::path::is_separator) {
            return Err(MandelError::InvalidConfig(format!(
                "filename prefix {:?} must be a plain, non-empty name",
                self.prefix
            )));
        }
        Ok(())
    }
}
