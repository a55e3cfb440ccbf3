// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Packed RGB palettes.
//!
//! A palette file is nothing but a run of bytes, three per color, in
//! the order red, green, blue.  There is no header.  Once loaded a
//! palette never changes, and a single palette is shared by every
//! tile of a run.

use crate::errors::{MandelError, Result};
use image::Rgb;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// An ordered, non-empty list of colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
}

impl Palette {
    /// Build a palette from a list of colors.  An empty list is a
    /// programming error and is reported as `InvalidPalette`.
    pub fn from_colors(colors: Vec<Rgb<u8>>) -> Result<Palette> {
        if colors.is_empty() {
            return Err(MandelError::InvalidPalette);
        }
        Ok(Palette { colors })
    }

    /// Decode packed RGB bytes.  The length must be a non-zero
    /// multiple of three.
    pub fn from_bytes(bytes: &[u8]) -> Result<Palette> {
        if bytes.is_empty() || bytes.len() % 3 != 0 {
            return Err(MandelError::MalformedPalette { len: bytes.len() });
        }
        Ok(Palette {
            colors: bytes
                .chunks(3)
                .map(|rgb| Rgb([rgb[0], rgb[1], rgb[2]]))
                .collect(),
        })
    }

    /// Read every byte of the source and decode it.  `name` is only
    /// used for error reporting.
    pub fn from_reader<R: Read>(name: &str, mut source: R) -> Result<Palette> {
        let mut bytes = vec![];
        source
            .read_to_end(&mut bytes)
            .map_err(|cause| MandelError::PaletteUnavailable {
                path: name.to_string(),
                cause,
            })?;
        Palette::from_bytes(&bytes)
    }

    /// Open and decode a palette file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Palette> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|cause| MandelError::PaletteUnavailable {
            path: name.clone(),
            cause,
        })?;
        Palette::from_reader(&name, file)
    }

    /// `count` colors of evenly spaced hue, all with the same
    /// saturation and value.  Components are truncated, not rounded.
    pub fn hues(count: usize, saturation: f64, value: f64) -> Result<Palette> {
        let colors = (0..count)
            .map(|i| hsv_to_rgb((i as f64) / (count as f64), saturation, value))
            .collect();
        Palette::from_colors(colors)
    }

    /// The packed byte form, suitable for writing straight to a file.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.0.iter().cloned()).collect()
    }

    /// Number of colors; always at least one.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Never true for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The color at `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<Rgb<u8>> {
        self.colors.get(index).cloned()
    }
}

/// Convert hue, saturation and value (all in 0..1) to a color.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb<u8> {
    let (r, g, b) = if s == 0.0 {
        (v, v, v)
    } else {
        let sector = (h * 6.0).floor();
        let f = h * 6.0 - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        match (sector as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        }
    };
    let channel = |c: f64| num::clamp(c * 255.0, 0.0, 255.0) as u8;
    Rgb([channel(r), channel(g), channel(b)])
}
