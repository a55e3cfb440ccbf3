// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The field generator.  Runs the escape-time evaluator over every
//! pixel of a tile and collects the results into a dense, row-major
//! buffer.
//!
//! No pixel depends on any other, so the rows of a tile are split into
//! contiguous bands and each band is handed to its own scoped thread.
//! The scope's join is the only synchronization point.

use crate::errors::{MandelError, Result};
use crate::escape::{escape_time, Escape, Smoothing};
use crate::planes::PlaneMapper;
use log::debug;

/// A dense buffer of escape results, one per pixel, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    values: Vec<Escape>,
}

impl Field {
    /// Wrap an existing buffer.  Returns None if the buffer does not
    /// hold exactly `width * height` values.
    pub fn from_values(width: usize, height: usize, values: Vec<Escape>) -> Option<Field> {
        match width.checked_mul(height) {
            Some(len) if len == values.len() => Some(Field {
                width,
                height,
                values,
            }),
            _ => None,
        }
    }

    /// Pixels per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the field holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value at column x, row y.
    pub fn get(&self, x: usize, y: usize) -> Option<Escape> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get(y * self.width + x).cloned()
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[Escape] {
        &self.values
    }
}

/// Allocate a buffer of `len` copies of `fill`, reporting allocation
/// failure instead of aborting.
pub(crate) fn try_alloc<T: Clone>(len: usize, fill: T) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| MandelError::OutOfMemory { pixels: len })?;
    buffer.resize(len, fill);
    Ok(buffer)
}

/// Evaluates whole tiles.  Holds nothing but the iteration parameters
/// and the thread count, so a single generator is reused for every
/// tile of a run.
#[derive(Copy, Clone, Debug)]
pub struct FieldGenerator {
    limit: usize,
    smoothing: Smoothing,
    threads: usize,
}

impl FieldGenerator {
    /// `limit` is the iteration budget per pixel; `threads` is clamped
    /// to at least one.
    pub fn new(limit: usize, smoothing: Smoothing, threads: usize) -> Self {
        FieldGenerator {
            limit,
            smoothing,
            threads: threads.max(1),
        }
    }

    /// Fill a slice of the field that starts at linear offset `start`.
    fn render_band(&self, plane: &PlaneMapper, start: usize, band: &mut [Escape]) {
        for (i, value) in band.iter_mut().enumerate() {
            let c = plane.offset_to_point(start + i);
            *value = escape_time(c, self.limit, self.smoothing);
        }
    }

    /// The main function for single-threaded use.
    pub fn generate_single(&self, plane: &PlaneMapper) -> Result<Field> {
        let mut values = try_alloc(plane.len(), Escape::Converged)?;
        self.render_band(plane, 0, &mut values);
        Ok(Field {
            width: plane.resolution.width(),
            height: plane.resolution.height(),
            values,
        })
    }

    /// Evaluate every pixel of the plane, spreading whole rows across
    /// the configured number of threads.  The returned field is either
    /// complete or not returned at all.
    pub fn generate(&self, plane: &PlaneMapper) -> Result<Field> {
        let width = plane.resolution.width();
        let height = plane.resolution.height();
        let threads = self.threads.min(height);
        if threads <= 1 {
            return self.generate_single(plane);
        }

        let mut values = try_alloc(plane.len(), Escape::Converged)?;
        let rows_per_band = (height + threads - 1) / threads;
        let band_len = rows_per_band * width;
        debug!(
            "rendering {}x{} field in bands of {} rows on {} threads",
            width, height, rows_per_band, threads
        );

        crossbeam::scope(|spawner| {
            for (i, band) in values.chunks_mut(band_len).enumerate() {
                spawner.spawn(move |_| {
                    self.render_band(plane, i * band_len, band);
                });
            }
        })
        .map_err(|_| MandelError::WorkerPanicked)?;

        Ok(Field {
            width,
            height,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::{Region, Resolution};
    use num::Complex;

    fn plane(w: usize, h: usize, ll: (f64, f64), ru: (f64, f64)) -> PlaneMapper {
        PlaneMapper::new(
            Resolution::new(w, h).unwrap(),
            Region::new(Complex::new(ll.0, ll.1), Complex::new(ru.0, ru.1)).unwrap(),
        )
    }

    #[test]
    fn field_has_one_value_per_pixel() {
        let generator = FieldGenerator::new(50, Smoothing::Smooth, 1);
        for &(w, h) in &[(1, 1), (1, 7), (7, 1), (13, 5)] {
            let field = generator
                .generate(&plane(w, h, (-2.0, -1.5), (1.0, 1.5)))
                .unwrap();
            assert_eq!(field.len(), w * h);
            assert_eq!(field.width(), w);
            assert_eq!(field.height(), h);
            for v in field.values() {
                if let Escape::Escaped(m) = v {
                    assert!(*m >= 0.0);
                }
            }
        }
    }

    #[test]
    fn threaded_matches_single() {
        let p = plane(31, 17, (-2.0, -1.5), (1.0, 1.5));
        let single = FieldGenerator::new(100, Smoothing::Smooth, 1)
            .generate_single(&p)
            .unwrap();
        for threads in &[2, 3, 4, 8, 64] {
            let threaded = FieldGenerator::new(100, Smoothing::Smooth, *threads)
                .generate(&p)
                .unwrap();
            assert_eq!(single, threaded);
        }
    }

    #[test]
    fn pixel_order_is_row_major() {
        // Column 0 sits on -2.5 and escapes at once; column 1 sits on 0.
        let p = plane(2, 2, (-2.5, 0.0), (2.5, 1.0));
        let field = FieldGenerator::new(100, Smoothing::Banded, 2)
            .generate(&p)
            .unwrap();
        assert!(!field.get(0, 0).unwrap().is_converged());
        assert!(field.get(1, 0).unwrap().is_converged());
        assert_eq!(field.get(2, 0), None);
    }

    #[test]
    fn from_values_checks_length() {
        assert!(Field::from_values(2, 2, vec![Escape::Converged; 3]).is_none());
        assert!(Field::from_values(2, 2, vec![Escape::Converged; 4]).is_some());
    }

    #[test]
    fn enormous_allocations_fail_cleanly() {
        match try_alloc(usize::max_value() / 2, Escape::Converged) {
            Err(MandelError::OutOfMemory { .. }) => (),
            other => panic!("expected OutOfMemory, got {:?}", other.map(|v| v.len())),
        }
    }
}
