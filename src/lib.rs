#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tiled Mandelbrot renderer
//!
//! The Mandelbrot set takes a point on the complex plane and
//! repeatedly squares it, adding the point back in each time, and
//! measures how quickly the result goes to infinity.  This "velocity"
//! is the number used to color the image; points with no velocity at
//! all are the black heart of the set.
//!
//! This crate renders a large region of the plane as a grid of
//! separate tiles.  Each tile becomes a field of escape measures,
//! the field is colored through a packed RGB palette, and the tile is
//! kept only if the border of the set passes through it.  Tiles that
//! are entirely inside or entirely outside the set are uniform and
//! are thrown away.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod colormap;
pub mod config;
pub mod errors;
pub mod escape;
pub mod field;
pub mod palette;
pub mod planes;
pub mod sink;
pub mod tiles;

pub use colormap::{ColorMapper, Tally};
pub use config::RenderConfig;
pub use errors::{MandelError, Result};
pub use escape::{escape_time, Escape, Smoothing};
pub use field::{Field, FieldGenerator};
pub use palette::Palette;
pub use planes::{PlaneMapper, Region, Resolution};
pub use sink::FileSink;
pub use tiles::{Grid, ImageSink, Interest, SinkPolicy, Summary, TileController};

/// Load the palette, render every tile described by `config`, and
/// send the interesting ones to `sink`.
pub fn render<S: ImageSink>(config: &RenderConfig, sink: &mut S) -> Result<Summary> {
    config.validate()?;
    let palette = Palette::load(&config.palette)?;
    log::info!(
        "loaded {} colors from {}",
        palette.len(),
        config.palette.display()
    );

    let grid = Grid::new(config.region()?, config.grid.0, config.grid.1)?;
    let generator = FieldGenerator::new(config.iterations, config.smoothing, config.threads);
    let mapper = ColorMapper::new(&palette, config.density);
    TileController::new(grid, config.tile_resolution()?, generator, mapper)
        .with_prefix(&config.prefix)
        .with_policy(config.policy)
        .run(sink)
}
