// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cuts a region of the complex plane into a grid of tiles, renders
//! each one, and keeps only the "interesting" ones.
//!
//! For our purposes a tile is interesting when the border of the
//! Mandelbrot set passes through it: at least one of its pixels stayed
//! inside the set and at least one escaped.  Tiles that are all black
//! heart, or all exterior, are uniform and not worth the disk space.
//!
//! Tiles are visited in raster order, left to right and then upward,
//! and every grid cell consumes a sequence number whether it is kept
//! or not.  A file's number therefore always tells you where in the
//! grid it came from.

use crate::colormap::{ColorMapper, Tally};
use crate::errors::{MandelError, Result};
use crate::field::FieldGenerator;
use crate::planes::{PlaneMapper, Region, Resolution};
use image::RgbImage;
use itertools::iproduct;
use log::{debug, info, warn};
use num::Complex;

/// A region divided into `columns x rows` equal sub-regions.
#[derive(Copy, Clone, Debug)]
pub struct Grid {
    region: Region,
    columns: usize,
    rows: usize,
}

/// One cell of a grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cell {
    /// Row-major position among all cells of the grid.
    pub index: usize,
    /// Horizontal position, from the left.
    pub column: usize,
    /// Vertical position, from the bottom.
    pub row: usize,
    /// The part of the complex plane the cell covers.
    pub region: Region,
}

impl Grid {
    /// Both dimensions must be at least one, and the cell count must
    /// fit in a usize.
    pub fn new(region: Region, columns: usize, rows: usize) -> Result<Grid> {
        if columns == 0 || rows == 0 {
            return Err(MandelError::InvalidConfig(format!(
                "grid {}x{} must be positive on both axes",
                columns, rows
            )));
        }
        if columns.checked_mul(rows).is_none() {
            return Err(MandelError::InvalidConfig(format!(
                "grid {}x{} has too many cells to count",
                columns, rows
            )));
        }
        Ok(Grid {
            region,
            columns,
            rows,
        })
    }

    /// Total number of cells.  Checked at construction, so this cannot
    /// overflow.
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// Never true for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sub-region for a cell.  The last column and row take the
    /// parent's maximum corner directly so the tiles cover the parent
    /// exactly.  On a grid finer than f64 can resolve, neighbouring
    /// edges round together and a cell may have zero width or height.
    pub fn cell_region(&self, column: usize, row: usize) -> Region {
        let ll = self.region.leftlower();
        let ru = self.region.rightupper();
        let dre = self.region.width() / (self.columns as f64);
        let dim = self.region.height() / (self.rows as f64);

        let edge = |start: f64, step: f64, i: usize, last: usize, max: f64| {
            if i >= last {
                max
            } else {
                start + (i as f64) * step
            }
        };
        Region::spanning(
            Complex::new(
                edge(ll.re, dre, column, self.columns, ru.re),
                edge(ll.im, dim, row, self.rows, ru.im),
            ),
            Complex::new(
                edge(ll.re, dre, column + 1, self.columns, ru.re),
                edge(ll.im, dim, row + 1, self.rows, ru.im),
            ),
        )
    }

    /// Every cell, in row-major order with the column varying fastest.
    pub fn cells<'a>(&'a self) -> impl Iterator<Item = Cell> + 'a {
        iproduct!(0..self.rows, 0..self.columns)
            .enumerate()
            .map(move |(index, (row, column))| Cell {
                index,
                column,
                row,
                region: self.cell_region(column, row),
            })
    }
}

/// Where a tile sits relative to the set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interest {
    /// Every pixel stayed inside the set.
    Interior,
    /// Every pixel escaped.
    Exterior,
    /// The border of the set passes through the tile.
    Boundary,
}

impl Interest {
    /// Classify a painted tile by its pixel counts.
    pub fn classify(tally: &Tally) -> Interest {
        match (tally.converged > 0, tally.diverged > 0) {
            (true, true) => Interest::Boundary,
            (true, false) => Interest::Interior,
            // An empty tally is trivially exterior.
            (false, _) => Interest::Exterior,
        }
    }

    /// Only boundary tiles are worth writing out.
    pub fn is_interesting(self) -> bool {
        self == Interest::Boundary
    }
}

/// A rendered grid cell.
#[derive(Clone, Debug)]
pub struct Tile {
    /// Which cell this is.
    pub cell: Cell,
    /// Interior and exterior pixel counts.
    pub tally: Tally,
    /// The painted pixels.
    pub image: RgbImage,
}

impl Tile {
    /// Where this tile sits relative to the set.
    pub fn interest(&self) -> Interest {
        Interest::classify(&self.tally)
    }
}

/// Receives accepted tiles.  Implementations decide what a name means.
pub trait ImageSink {
    /// Persist `image` under `name`.  Failures are reported as
    /// `SinkFailure`.
    fn write(&mut self, name: &str, image: &RgbImage) -> Result<()>;
}

/// What to do when the sink rejects a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SinkPolicy {
    /// Stop the run at the first failed write.
    Abort,
    /// Log the failure and carry on with the next tile.
    Continue,
}

impl Default for SinkPolicy {
    fn default() -> Self {
        SinkPolicy::Abort
    }
}

/// What happened over a whole run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Tiles handed to the sink successfully.
    pub written: usize,
    /// Tiles dropped because they were entirely inside the set.
    pub interior: usize,
    /// Tiles dropped because they were entirely outside the set.
    pub exterior: usize,
    /// Tiles the sink refused, under `SinkPolicy::Continue`.
    pub failed: usize,
}

/// Drives the field generator and color mapper over every cell of a
/// grid, sending the interesting tiles to a sink.
pub struct TileController<'a> {
    grid: Grid,
    resolution: Resolution,
    generator: FieldGenerator,
    mapper: ColorMapper<'a>,
    prefix: String,
    policy: SinkPolicy,
}

impl<'a> TileController<'a> {
    /// Wire together the pieces of a run.
    pub fn new(
        grid: Grid,
        resolution: Resolution,
        generator: FieldGenerator,
        mapper: ColorMapper<'a>,
    ) -> Self {
        TileController {
            grid,
            resolution,
            generator,
            mapper,
            prefix: "image".to_string(),
            policy: SinkPolicy::default(),
        }
    }

    /// Filenames become `<prefix>-<index>.png`.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// How to react to sink failures.
    pub fn with_policy(mut self, policy: SinkPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The name a cell's tile is written under.
    pub fn filename(&self, cell: &Cell) -> String {
        format!("{}-{}.png", self.prefix, cell.index)
    }

    /// Compute and paint one cell.
    pub fn render(&self, cell: Cell) -> Result<Tile> {
        let plane = PlaneMapper::new(self.resolution, cell.region);
        let field = self.generator.generate(&plane)?;
        let (image, tally) = self.mapper.paint(&field)?;
        Ok(Tile { cell, tally, image })
    }

    /// Render every cell in order.  Allocation failures end the run
    /// immediately; sink failures end it unless the policy says
    /// otherwise.
    pub fn run<S: ImageSink>(&self, sink: &mut S) -> Result<Summary> {
        let mut summary = Summary::default();
        for cell in self.grid.cells() {
            let tile = self.render(cell)?;
            let start = tile.cell.region.leftlower();
            match tile.interest() {
                Interest::Interior => {
                    debug!("tile {} is entirely inside the set", tile.cell.index);
                    summary.interior += 1;
                }
                Interest::Exterior => {
                    debug!("tile {} is entirely outside the set", tile.cell.index);
                    summary.exterior += 1;
                }
                Interest::Boundary => {
                    let name = self.filename(&tile.cell);
                    match sink.write(&name, &tile.image) {
                        Ok(()) => {
                            info!(
                                "File {} written. Starts at coordinates ({}, {})",
                                name, start.re, start.im
                            );
                            summary.written += 1;
                        }
                        Err(e) => {
                            if self.policy == SinkPolicy::Abort {
                                return Err(e);
                            }
                            warn!("{}; skipping tile {}", e, tile.cell.index);
                            summary.failed += 1;
                        }
                    }
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::{Escape, Smoothing};
    use crate::field::Field;
    use crate::palette::Palette;

    fn region(ll: (f64, f64), ru: (f64, f64)) -> Region {
        Region::new(Complex::new(ll.0, ll.1), Complex::new(ru.0, ru.1)).unwrap()
    }

    /// Remembers what it was asked to write, optionally refusing some.
    #[derive(Default)]
    struct MemorySink {
        written: Vec<(String, RgbImage)>,
        refuse: Vec<String>,
    }

    impl ImageSink for MemorySink {
        fn write(&mut self, name: &str, image: &RgbImage) -> Result<()> {
            if self.refuse.iter().any(|r| r == name) {
                return Err(MandelError::SinkFailure {
                    name: name.to_string(),
                    reason: "refused".to_string(),
                });
            }
            self.written.push((name.to_string(), image.clone()));
            Ok(())
        }
    }

    fn classify_values(values: Vec<Escape>) -> Interest {
        let palette = Palette::from_bytes(&[255, 0, 0, 0, 0, 255]).unwrap();
        let mapper = ColorMapper::new(&palette, 1.0);
        let n = values.len();
        let field = Field::from_values(n, 1, values).unwrap();
        let (_, tally) = mapper.paint(&field).unwrap();
        Interest::classify(&tally)
    }

    #[test]
    fn uniform_tiles_are_rejected() {
        let inside = classify_values(vec![Escape::Converged; 16]);
        assert_eq!(inside, Interest::Interior);
        assert!(!inside.is_interesting());

        let outside = classify_values(vec![Escape::Escaped(3.0); 16]);
        assert_eq!(outside, Interest::Exterior);
        assert!(!outside.is_interesting());
    }

    #[test]
    fn mixed_tiles_are_accepted() {
        let mut values = vec![Escape::Escaped(2.0); 15];
        values.push(Escape::Converged);
        assert!(classify_values(values).is_interesting());
    }

    #[test]
    fn grid_rejects_zero_dimensions() {
        let r = region((-1.0, -1.0), (1.0, 1.0));
        assert!(Grid::new(r, 0, 3).is_err());
        assert!(Grid::new(r, 3, 0).is_err());
    }

    #[test]
    fn cells_are_row_major() {
        let grid = Grid::new(region((0.0, 0.0), (3.0, 2.0)), 3, 2).unwrap();
        let cells: Vec<Cell> = grid.cells().collect();
        let order: Vec<(usize, usize, usize)> =
            cells.iter().map(|c| (c.index, c.column, c.row)).collect();
        assert_eq!(
            order,
            vec![(0, 0, 0), (1, 1, 0), (2, 2, 0), (3, 0, 1), (4, 1, 1), (5, 2, 1)]
        );
        assert_eq!(cells[4].region, region((1.0, 1.0), (2.0, 2.0)));
    }

    #[test]
    fn grid_covers_the_region() {
        let whole = region((-0.75, -1.0), (1.0, 1.0));
        for &(w, h) in &[(1, 1), (3, 7), (16, 16), (13, 1)] {
            let grid = Grid::new(whole, w, h).unwrap();
            let cells: Vec<Cell> = grid.cells().collect();
            assert_eq!(cells.len(), w * h);
            assert_eq!(cells[0].region.leftlower(), whole.leftlower());
            assert_eq!(cells[cells.len() - 1].region.rightupper(), whole.rightupper());
            for pair in cells.windows(2) {
                if pair[0].row == pair[1].row {
                    assert_eq!(pair[0].region.rightupper().re, pair[1].region.leftlower().re);
                }
            }
        }
    }

    #[test]
    fn grid_rejects_uncountable_cells() {
        let r = region((-1.0, -1.0), (1.0, 1.0));
        assert!(Grid::new(r, usize::max_value(), 2).is_err());
        assert_eq!(Grid::new(r, 1 << 10, 1 << 10).unwrap().len(), 1 << 20);
    }

    #[test]
    fn fine_grids_over_narrow_regions_still_render() {
        let palette = Palette::from_bytes(&[255, 0, 0]).unwrap();
        let narrow = region((-0.75, 0.1), (-0.75 + 4.0e-16, 0.101));
        let grid = Grid::new(narrow, 8, 1).unwrap();

        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0].region.leftlower(), narrow.leftlower());
        assert_eq!(cells[7].region.rightupper(), narrow.rightupper());
        for cell in &cells {
            assert!(cell.region.width() >= 0.0);
        }

        let mut sink = MemorySink::default();
        let summary = controller(&palette, grid, 2).run(&mut sink).unwrap();
        assert_eq!(
            summary.written + summary.interior + summary.exterior + summary.failed,
            8
        );
    }

    fn controller(palette: &Palette, grid: Grid, res: usize) -> TileController {
        TileController::new(
            grid,
            Resolution::new(res, res).unwrap(),
            FieldGenerator::new(50, Smoothing::Smooth, 2),
            ColorMapper::new(palette, 1.0),
        )
    }

    #[test]
    fn single_boundary_tile_is_written() {
        let palette = Palette::from_bytes(&[255, 0, 0, 0, 0, 255]).unwrap();
        let grid = Grid::new(region((-2.0, -1.5), (1.0, 1.5)), 1, 1).unwrap();
        let mut sink = MemorySink::default();
        let summary = controller(&palette, grid, 4).run(&mut sink).unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(sink.written.len(), 1);
        let (name, image) = &sink.written[0];
        assert_eq!(name, "image-0.png");
        assert!(image.pixels().any(|p| p.0 == [0, 0, 0]));
        assert!(image
            .pixels()
            .any(|p| p.0 == [255, 0, 0] || p.0 == [0, 0, 255]));
    }

    #[test]
    fn sequence_numbers_count_rejected_tiles() {
        let palette = Palette::from_bytes(&[255, 0, 0, 0, 0, 255]).unwrap();
        // Left half is far outside the set; right half straddles it.
        let grid = Grid::new(region((-12.0, -1.5), (1.0, 1.5)), 2, 1).unwrap();
        let mut sink = MemorySink::default();
        let summary = controller(&palette, grid, 8)
            .with_prefix("tile")
            .run(&mut sink)
            .unwrap();
        assert_eq!(summary.exterior, 1);
        assert_eq!(summary.written, 1);
        assert_eq!(sink.written[0].0, "tile-1.png");
    }

    #[test]
    fn interior_tiles_are_counted() {
        let palette = Palette::from_bytes(&[255, 0, 0]).unwrap();
        let grid = Grid::new(region((-0.1, -0.1), (0.1, 0.1)), 2, 2).unwrap();
        let mut sink = MemorySink::default();
        let summary = controller(&palette, grid, 4).run(&mut sink).unwrap();
        assert_eq!(summary.interior, 4);
        assert!(sink.written.is_empty());
    }

    #[test]
    fn sink_failures_abort_by_default() {
        let palette = Palette::from_bytes(&[255, 0, 0]).unwrap();
        let grid = Grid::new(region((-2.0, -1.5), (1.0, 1.5)), 1, 1).unwrap();
        let mut sink = MemorySink {
            refuse: vec!["image-0.png".to_string()],
            ..MemorySink::default()
        };
        match controller(&palette, grid, 4).run(&mut sink) {
            Err(MandelError::SinkFailure { name, .. }) => assert_eq!(name, "image-0.png"),
            other => panic!("expected SinkFailure, got {:?}", other),
        }
    }

    #[test]
    fn sink_failures_can_be_skipped() {
        let palette = Palette::from_bytes(&[255, 0, 0]).unwrap();
        let grid = Grid::new(region((-2.0, -1.5), (1.0, 1.5)), 2, 1).unwrap();
        let mut sink = MemorySink {
            refuse: vec!["image-0.png".to_string()],
            ..MemorySink::default()
        };
        let summary = controller(&palette, grid, 8)
            .with_policy(SinkPolicy::Continue)
            .run(&mut sink)
            .unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.written, 1);
        assert_eq!(sink.written[0].0, "image-1.png");
    }
}
