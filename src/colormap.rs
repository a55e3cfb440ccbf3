// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns escape measures into colors.
//!
//! Interior points are always black.  Everything else walks through
//! the palette at a rate set by the density: a measure of `v` lands on
//! entry `floor(density * v) mod len`, so the palette repeats as the
//! measure climbs.

use crate::errors::{MandelError, Result};
use crate::escape::Escape;
use crate::field::{try_alloc, Field};
use crate::palette::Palette;
use image::{Rgb, RgbImage};

/// The color of points inside the set.
pub const INTERIOR: Rgb<u8> = Rgb([0, 0, 0]);

/// How many pixels of a painted field fell on each side of the set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Pixels that never escaped.
    pub converged: usize,
    /// Pixels that escaped.
    pub diverged: usize,
}

/// Maps field values onto a shared palette.
#[derive(Copy, Clone, Debug)]
pub struct ColorMapper<'a> {
    palette: &'a Palette,
    density: f64,
}

impl<'a> ColorMapper<'a> {
    /// # Panics
    ///
    /// If the palette is empty.  `Palette` cannot be built empty, so
    /// reaching this is a broken invariant, not a runtime condition.
    pub fn new(palette: &'a Palette, density: f64) -> Self {
        assert!(!palette.is_empty(), "invalid palette: no colors");
        ColorMapper { palette, density }
    }

    /// The palette slot for a non-negative measure.  Always less than
    /// the palette length.
    pub fn index(&self, measure: f64) -> usize {
        let len = self.palette.len();
        let slot = (self.density * measure).floor().rem_euclid(len as f64);
        // NaN casts to zero; rounding can push rem_euclid up to len.
        (slot as usize).min(len - 1)
    }

    /// The color for a single field value.
    pub fn color(&self, value: Escape) -> Rgb<u8> {
        match value {
            Escape::Converged => INTERIOR,
            Escape::Escaped(v) => self.palette.get(self.index(v)).unwrap_or(INTERIOR),
        }
    }

    /// Paint an entire field, counting interior and exterior pixels
    /// as we go.
    pub fn paint(&self, field: &Field) -> Result<(RgbImage, Tally)> {
        let bytes = field
            .len()
            .checked_mul(3)
            .ok_or(MandelError::OutOfMemory {
                pixels: field.len(),
            })?;
        let mut raw = try_alloc(bytes, 0u8)?;
        let mut tally = Tally::default();
        for (value, pixel) in field.values().iter().zip(raw.chunks_mut(3)) {
            if value.is_converged() {
                tally.converged += 1;
            } else {
                tally.diverged += 1;
            }
            pixel.copy_from_slice(&self.color(*value).0);
        }
        let image = RgbImage::from_raw(field.width() as u32, field.height() as u32, raw)
            .ok_or_else(|| {
                MandelError::InvalidConfig(format!(
                    "a {}x{} field does not fit in an image",
                    field.width(),
                    field.height()
                ))
            })?;
        Ok((image, tally))
    }
}
