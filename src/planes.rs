// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a region of the complex plane with an arbitrary pair of
//! corners defining its leftlower and rightupper corners.
use crate::errors::{MandelError, Result};
use num::Complex;

/// Describes the lower-left corner and upper-right corner of a region
/// of the complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    leftlower: Complex<f64>,
    rightupper: Complex<f64>,
}

impl Region {
    /// Build a region from its two corners.  Every bound must be
    /// finite, and the left lower corner must be strictly to the left of
    /// and strictly below the right upper.
    pub fn new(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Result<Region> {
        if !(leftlower.re.is_finite()
            && leftlower.im.is_finite()
            && rightupper.re.is_finite()
            && rightupper.im.is_finite())
        {
            return Err(MandelError::InvalidRegion(format!(
                "the corners ({}) and ({}) must be finite",
                leftlower, rightupper
            )));
        }
        if !(leftlower.re < rightupper.re) {
            return Err(MandelError::InvalidRegion(format!(
                "the left lower corner ({}) is not to the left of the right upper corner ({})",
                leftlower, rightupper
            )));
        }
        if !(leftlower.im < rightupper.im) {
            return Err(MandelError::InvalidRegion(format!(
                "the left lower corner ({}) is not lower than the right upper corner ({})",
                leftlower, rightupper
            )));
        }
        let region = Region {
            leftlower,
            rightupper,
        };
        if !(region.width().is_finite() && region.height().is_finite()) {
            return Err(MandelError::InvalidRegion(format!(
                "the region from ({}) to ({}) is too large to measure",
                leftlower, rightupper
            )));
        }
        Ok(region)
    }

    /// A sub-region cut from an already validated one.  Rounding may
    /// leave it with zero width or height; it is still rendered.
    pub(crate) fn spanning(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Region {
        Region {
            leftlower,
            rightupper,
        }
    }

    /// The minimum corner.
    pub fn leftlower(&self) -> Complex<f64> {
        self.leftlower
    }

    /// The maximum corner.
    pub fn rightupper(&self) -> Complex<f64> {
        self.rightupper
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.rightupper.re - self.leftlower.re
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.rightupper.im - self.leftlower.im
    }
}

/// The pixel dimensions of a rendered tile.  Both sides are strictly
/// positive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    width: usize,
    height: usize,
}

impl Resolution {
    /// Fails if either side is zero, either side is wider than an image
    /// can be, or the pixel count does not fit in a usize.
    pub fn new(width: usize, height: usize) -> Result<Resolution> {
        if width == 0 || height == 0 {
            return Err(MandelError::InvalidConfig(format!(
                "resolution {}x{} must be positive on both axes",
                width, height
            )));
        }
        if width > u32::max_value() as usize || height > u32::max_value() as usize {
            return Err(MandelError::InvalidConfig(format!(
                "resolution {}x{} is larger than an image can hold",
                width, height
            )));
        }
        if width.checked_mul(height).is_none() {
            return Err(MandelError::InvalidConfig(format!(
                "resolution {}x{} overflows the addressable pixel count",
                width, height
            )));
        }
        Ok(Resolution { width, height })
    }

    /// Pixels per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The total number of pixels.  Checked at construction, so this
    /// cannot overflow.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Never true for a constructed resolution; here for clippy.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Describes the x, y of a pixel in a tile.  Column first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian
/// plane, and a region of the complex plane.  Maps pixels from one to
/// points on the other.  Row zero sits on the region's minimum
/// imaginary value and rows climb toward its maximum.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// Pixel dimensions of the integral plane.
    pub resolution: Resolution,
    /// The region of the complex plane being sampled.
    pub region: Region,
    // The width and height, respectively, of a single pixel on the
    // complex plane.
    steps: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Both arguments have already been validated, so
    /// this cannot fail.
    pub fn new(resolution: Resolution, region: Region) -> PlaneMapper {
        PlaneMapper {
            resolution,
            region,
            steps: (
                region.width() / (resolution.width as f64),
                region.height() / (resolution.height as f64),
            ),
        }
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.resolution.len()
    }

    /// Never true; a Resolution is always at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.resolution.is_empty()
    }

    /// Given a pixel on the integral cartesian plane, map that to the
    /// point on the complex plane at the pixel's lower left corner.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.region.leftlower.re + (pixel.0 as f64) * self.steps.0,
            self.region.leftlower.im + (pixel.1 as f64) * self.steps.1,
        )
    }

    /// The point for a linear, row-major offset into a field buffer.
    pub fn offset_to_point(&self, offset: usize) -> Complex<f64> {
        let w = self.resolution.width;
        self.pixel_to_point(&Pixel(offset % w, offset / w))
    }
}
