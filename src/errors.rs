// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ways a render can fail.  None of these are retried; every one
//! of them is surfaced to the caller as soon as it happens.

use failure::Fail;
use std::io;

/// Every failure the renderer knows how to report.
#[derive(Debug, Fail)]
pub enum MandelError {
    /// The palette file could not be opened or read.
    #[fail(display = "palette {} is unavailable: {}", path, cause)]
    PaletteUnavailable {
        /// Path we tried to read.
        path: String,
        /// What the operating system told us.
        #[cause]
        cause: io::Error,
    },

    /// The palette is empty, or its length is not a multiple of three.
    #[fail(
        display = "malformed palette: {} bytes is not a non-zero multiple of 3",
        len
    )]
    MalformedPalette {
        /// Length of the byte source.
        len: usize,
    },

    /// A palette with no colors was handed to something that must
    /// index into it.
    #[fail(display = "invalid palette: a palette needs at least one color")]
    InvalidPalette,

    /// A field or pixel buffer could not be allocated.
    #[fail(display = "out of memory allocating a buffer of {} pixels", pixels)]
    OutOfMemory {
        /// Number of pixels requested.
        pixels: usize,
    },

    /// The corners of a region are not properly ordered.
    #[fail(display = "invalid region: {}", _0)]
    InvalidRegion(String),

    /// A render parameter is out of range.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfig(String),

    /// The image sink refused a tile.
    #[fail(display = "could not write {}: {}", name, reason)]
    SinkFailure {
        /// The filename the tile was meant to land in.
        name: String,
        /// Why the sink gave up.
        reason: String,
    },

    /// A field worker thread panicked before finishing its rows.
    #[fail(display = "a field worker thread panicked")]
    WorkerPanicked,
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, MandelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_palette_mentions_length() {
        let e = MandelError::MalformedPalette { len: 7 };
        assert!(format!("{}", e).contains("7 bytes"));
    }

    #[test]
    fn unavailable_palette_carries_cause() {
        let e = MandelError::PaletteUnavailable {
            path: "colors.bin".to_string(),
            cause: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.cause().is_some());
        assert!(format!("{}", e).contains("colors.bin"));
    }
}
