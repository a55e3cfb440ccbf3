// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes accepted tiles to disk.  The encoding is chosen by the
//! `image` crate from the file extension.

use crate::errors::{MandelError, Result};
use crate::planes::Resolution;
use crate::tiles::ImageSink;
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::path::PathBuf;

/// An image sink backed by a directory.
#[derive(Clone, Debug)]
pub struct FileSink {
    directory: PathBuf,
    scale: Option<Resolution>,
}

impl FileSink {
    /// Files are written into `directory`, which must already exist.
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        FileSink {
            directory: directory.into(),
            scale: None,
        }
    }

    /// Resize every tile to `scale` before writing it.
    pub fn scaled(mut self, scale: Option<Resolution>) -> Self {
        self.scale = scale;
        self
    }
}

impl ImageSink for FileSink {
    fn write(&mut self, name: &str, image: &RgbImage) -> Result<()> {
        let path = self.directory.join(name);
        let result = match self.scale {
            Some(scale) => imageops::resize(
                image,
                scale.width() as u32,
                scale.height() as u32,
                FilterType::Triangle,
            )
            .save(&path),
            None => image.save(&path),
        };
        result.map_err(|e| MandelError::SinkFailure {
            name: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
