// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.
//!
//! Takes a point on the complex plane and repeatedly squares it and
//! adds the original point back in, starting from zero.  Points that
//! never get further than 2 from the origin within the iteration
//! budget are considered members of the Mandelbrot set; everything
//! else reports how quickly it left.

use num::Complex;

/// Squared escape radius.  Once |z| exceeds 2 the orbit is guaranteed
/// to go to infinity.
const BAILOUT_SQR: f64 = 4.0;

/// The result of iterating a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// The orbit stayed bounded for the whole iteration budget.
    Converged,
    /// The orbit left the escape radius; the measure is always
    /// non-negative and grows with the number of iterations it took.
    Escaped(f64),
}

impl Escape {
    /// True when the point never escaped.
    #[inline]
    pub fn is_converged(&self) -> bool {
        match self {
            Escape::Converged => true,
            Escape::Escaped(_) => false,
        }
    }

    /// The escape measure, if there is one.
    #[inline]
    pub fn measure(&self) -> Option<f64> {
        match *self {
            Escape::Converged => None,
            Escape::Escaped(v) => Some(v),
        }
    }
}

/// How an escaped point's iteration count is turned into a measure.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Smoothing {
    /// Whole iteration counts; produces visible color bands.
    Banded,
    /// Normalized iteration count: the count is reduced by how far past
    /// the escape radius the final iterate overshot, giving a
    /// continuous measure.
    Smooth,
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Smooth
    }
}

/// Iterate `z <- z^2 + c` from zero, at most `limit` times.
///
/// The iteration count is the number of steps taken when |z| first
/// exceeds 2, so a point that escapes on the very first step has a
/// count of one.  In smooth mode the measure is
/// `max(0, n - log2(log2 |z|))`.
pub fn escape_time(c: Complex<f64>, limit: usize, smoothing: Smoothing) -> Escape {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for i in 1..=limit {
        z = z * z + c;
        let norm_sqr = z.norm_sqr();
        if norm_sqr > BAILOUT_SQR {
            let n = i as f64;
            return Escape::Escaped(match smoothing {
                Smoothing::Banded => n,
                Smoothing::Smooth => {
                    // log2 |z| == log2(|z|^2) / 2
                    let overshoot = (norm_sqr.log2() / 2.0).log2();
                    (n - overshoot).max(0.0)
                }
            });
        }
    }
    Escape::Converged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        for limit in &[1, 2, 10, 1000] {
            assert_eq!(
                escape_time(Complex::new(0.0, 0.0), *limit, Smoothing::Smooth),
                Escape::Converged
            );
            assert_eq!(
                escape_time(Complex::new(0.0, 0.0), *limit, Smoothing::Banded),
                Escape::Converged
            );
        }
    }

    #[test]
    fn period_two_bulb_never_escapes() {
        assert!(escape_time(Complex::new(-1.0, 0.0), 500, Smoothing::Smooth).is_converged());
    }

    #[test]
    fn three_escapes_on_the_first_step() {
        assert_eq!(
            escape_time(Complex::new(3.0, 0.0), 50, Smoothing::Banded),
            Escape::Escaped(1.0)
        );
        let v = escape_time(Complex::new(3.0, 0.0), 50, Smoothing::Smooth)
            .measure()
            .unwrap();
        assert!(v >= 0.0 && v <= 1.0, "smoothed measure {} out of range", v);
    }

    #[test]
    fn far_points_clamp_to_zero() {
        let v = escape_time(Complex::new(1.0e6, 1.0e6), 50, Smoothing::Smooth)
            .measure()
            .unwrap();
        assert_eq!(v, 0.0);
    }

    #[test]
    fn slower_points_measure_higher() {
        let fast = escape_time(Complex::new(1.0, 0.0), 100, Smoothing::Banded);
        let slow = escape_time(Complex::new(0.3, 0.0), 100, Smoothing::Banded);
        assert!(fast.measure().unwrap() < slow.measure().unwrap());
    }

    #[test]
    fn budget_of_one_only_catches_immediate_escapes() {
        assert!(escape_time(Complex::new(1.0, 0.0), 1, Smoothing::Banded).is_converged());
        assert!(!escape_time(Complex::new(2.5, 0.0), 1, Smoothing::Banded).is_converged());
    }

    #[test]
    fn smooth_stays_below_banded() {
        let c = Complex::new(-0.75, 0.1);
        let banded = escape_time(c, 1000, Smoothing::Banded).measure().unwrap();
        let smooth = escape_time(c, 1000, Smoothing::Smooth).measure().unwrap();
        assert!(smooth <= banded);
        assert!(smooth > banded - 2.0);
    }
}
