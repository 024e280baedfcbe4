//! Slope entropy measures, from the parallel-coordinates axis ordering work
//! of Zimek et al.
//!
//! Both columns are scaled to `[0, 1]`. In parallel coordinates each point
//! becomes a line whose slope is given by `x - y`; slopes are bucketed into
//! [`PRECISION`] bins and the score is `1 - H / log(PRECISION)`, with `H` the
//! Shannon entropy of the buckets. Parallel lines (identical columns) score 1.
//!
//! Slope buckets mirror about the centre, so swapping the columns mirrors
//! the histogram and leaves the score unchanged. Points with `x == y` sit on
//! the boundary between the two central buckets and join the fuller one.

use crate::adapter::NumberArray;
use crate::error::Result;
use crate::measure::{min_max, pair_size, Dependence};

/// Number of slope buckets.
pub const PRECISION: usize = 40;

/// Slope entropy of `x - y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Slope;

/// Slope entropy of both `x - y` and `x + y`, keeping the higher score, so
/// inverse relationships are detected as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlopeInversion;

// Offset and scale mapping a column onto [0, 1].
fn unit_scale<A>(data: &A, len: usize) -> (f64, f64)
where
    A: NumberArray + ?Sized,
{
    let (min, max) = min_max(data, len);
    (min, if max > min { 1.0 / (max - min) } else { 1.0 })
}

fn bucket(delta: f64) -> usize {
    let ratio = (PRECISION - 1) as f64 * 0.5;
    let div = (delta * ratio).round();
    if div < 0.0 {
        0
    } else {
        (div as usize).min(PRECISION - 1)
    }
}

// Bucket of a nonzero scaled difference `x - y`. Ties on either side round
// away from the centre.
fn slope_bucket(diff: f64) -> usize {
    let upper = bucket(1.0 + diff.abs());
    if diff > 0.0 {
        upper
    } else {
        PRECISION - 1 - upper
    }
}

/// Histogram of the slope buckets of `x - y` over scaled columns.
struct SlopeHistogram {
    angles: [usize; PRECISION],
    zeros: usize,
}

impl SlopeHistogram {
    fn new() -> Self {
        Self {
            angles: [0; PRECISION],
            zeros: 0,
        }
    }

    fn add(&mut self, diff: f64) {
        if diff == 0.0 {
            self.zeros += 1;
        } else {
            self.angles[slope_bucket(diff)] += 1;
        }
    }

    fn finish(mut self) -> [usize; PRECISION] {
        let centre = PRECISION / 2;
        if self.angles[centre] >= self.angles[centre - 1] {
            self.angles[centre] += self.zeros;
        } else {
            self.angles[centre - 1] += self.zeros;
        }
        self.angles
    }
}

/// `1 - H / log(PRECISION)` of a bucket histogram over `len` points.
///
/// Counts are summed in sorted order, so mirrored histograms score
/// bit-identically.
fn entropy_score(mut angles: [usize; PRECISION], len: usize) -> f64 {
    angles.sort_unstable();
    let mut entropy = 0.0;
    for &a in &angles {
        if a > 0 {
            let p = a as f64 / len as f64;
            entropy += p * p.ln();
        }
    }
    1.0 + entropy / (PRECISION as f64).ln()
}

impl Dependence for Slope {
    fn dependence<A, B>(&self, data1: &A, data2: &B) -> Result<f64>
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized,
    {
        let len = pair_size(data1, data2)?;
        let (off1, scale1) = unit_scale(data1, len);
        let (off2, scale2) = unit_scale(data2, len);

        let mut angles = SlopeHistogram::new();
        for i in 0..len {
            let x = (data1.get_double(i) - off1) * scale1;
            let y = (data2.get_double(i) - off2) * scale2;
            angles.add(x - y);
        }
        Ok(entropy_score(angles.finish(), len))
    }
}

impl Dependence for SlopeInversion {
    fn dependence<A, B>(&self, data1: &A, data2: &B) -> Result<f64>
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized,
    {
        let len = pair_size(data1, data2)?;
        let (off1, scale1) = unit_scale(data1, len);
        let (off2, scale2) = unit_scale(data2, len);

        let mut angles = SlopeHistogram::new();
        let mut inverted = [0usize; PRECISION];
        for i in 0..len {
            let x = (data1.get_double(i) - off1) * scale1;
            let y = (data2.get_double(i) - off2) * scale2;
            angles.add(x - y);
            inverted[bucket(x + y)] += 1;
        }
        Ok(entropy_score(angles.finish(), len).max(entropy_score(inverted, len)))
    }
}
