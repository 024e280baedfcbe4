//! HiCS contrast as a bivariate dependence measure.
//!
//! Monte-Carlo slicing after Keller, Müller and Böhm, "HiCS: High Contrast
//! Subspaces for Density-Based Outlier Ranking" (ICDE 2012). Each iteration
//! takes a random contiguous window of one column's sort order and compares
//! the other column's values inside the window against that column's full
//! marginal with a goodness-of-fit test. The first half of the iterations
//! slices on the second column, the second half on the first, so the score
//! does not depend on argument order in expectation.
//!
//! The score is `1 - mean(deviation)`: independent columns score high,
//! strongly dependent columns score low. This is the reverse of the
//! correlation-type measures in this crate.

use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::adapter::NumberArray;
use crate::error::{Error, Result};
use crate::goodness::{GoodnessOfFit, GoodnessOfFitTest};
use crate::measure::{columns_size, pair_size, Dependence};
use crate::random::RandomFactory;
use crate::rank::sorted_index;
use crate::triangle::{lower_triangular_len, pair};

/// Total NaN test results tolerated per score before giving up.
pub const MAX_RETRIES: usize = 1000;

/// HiCS Monte-Carlo contrast measure.
#[derive(Debug, Clone)]
pub struct HiCS<T = GoodnessOfFit> {
    m: usize,
    alpha_sqrt: f64,
    test: T,
    rnd: RandomFactory,
}

impl<T: GoodnessOfFitTest> HiCS<T> {
    /// `m` Monte-Carlo iterations; windows cover `sqrt(alpha)` of the data.
    pub fn new(m: usize, alpha: f64, test: T, rnd: RandomFactory) -> Result<Self> {
        if m == 0 {
            return Err(Error::InvalidParameter {
                name: "m",
                message: "at least one Monte-Carlo iteration is required",
            });
        }
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                message: "must be in (0, 1)",
            });
        }
        Ok(Self {
            m,
            alpha_sqrt: alpha.sqrt(),
            test,
            rnd,
        })
    }

    pub fn m(&self) -> usize {
        self.m
    }

    fn window_size(&self, len: usize) -> usize {
        ((len as f64 * self.alpha_sqrt) as usize).clamp(1, len - 1)
    }

    // One half of the iterations: windows over `slice_order`, values from `values`.
    fn half(
        &self,
        iterations: usize,
        values: &[f64],
        slice_order: &[usize],
        rng: &mut StdRng,
        retries: &mut usize,
    ) -> Result<f64> {
        let len = values.len();
        let windowsize = self.window_size(len);
        let mut full = values.to_vec();
        let mut sample = vec![0.0; windowsize];
        let mut deviation_sum = 0.0;
        let mut i = 0;
        while i < iterations {
            let start = rng.gen_range(0..len - windowsize);
            for (k, s) in sample.iter_mut().enumerate() {
                *s = values[slice_order[start + k]];
            }
            let contrast = self.test.deviation(&mut full, &mut sample);
            if contrast.is_nan() {
                *retries += 1;
                if *retries > MAX_RETRIES {
                    warn!(retries = *retries, "statistical test keeps returning NaN");
                    return Err(Error::TooManyNaNs { retries: *retries });
                }
                debug!(retries = *retries, "statistical test returned NaN, resampling");
                continue;
            }
            deviation_sum += contrast;
            i += 1;
        }
        Ok(deviation_sum)
    }

    fn contrast(
        &self,
        values1: &[f64],
        order1: &[usize],
        values2: &[f64],
        order2: &[usize],
        rng: &mut StdRng,
    ) -> Result<f64> {
        if values1.len() < 2 {
            return Ok(f64::NAN);
        }
        let half = self.m >> 1;
        let mut retries = 0;
        // First column conditioned on slices of the second, then the reverse.
        let mut deviation_sum = self.half(half, values1, order2, rng, &mut retries)?;
        deviation_sum += self.half(self.m - half, values2, order1, rng, &mut retries)?;
        Ok(1.0 - deviation_sum / self.m as f64)
    }
}

fn materialize<A>(data: &A) -> Result<Vec<f64>>
where
    A: NumberArray + ?Sized,
{
    let values = data.to_vec();
    if values.iter().any(|v| v.is_nan()) {
        return Err(Error::NaNInput);
    }
    Ok(values)
}

impl<T: GoodnessOfFitTest> Dependence for HiCS<T> {
    fn dependence<A, B>(&self, data1: &A, data2: &B) -> Result<f64>
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized,
    {
        let len = pair_size(data1, data2)?;
        let values1 = materialize(data1)?;
        let values2 = materialize(data2)?;
        let order1 = sorted_index(&values1, len);
        let order2 = sorted_index(&values2, len);
        let mut rng = self.rnd.rng();
        self.contrast(&values1, &order1, &values2, &order2, &mut rng)
    }

    /// Every pair draws from its own generator, derived from the pair index,
    /// so results do not depend on scheduling.
    fn dependence_matrix<C>(&self, columns: &[C]) -> Result<Vec<f64>>
    where
        C: NumberArray + Sync,
    {
        let len = columns_size(columns)?;
        let values: Vec<Vec<f64>> = columns
            .par_iter()
            .map(|c| materialize(c))
            .collect::<Result<_>>()?;
        let orders: Vec<Vec<usize>> = values.par_iter().map(|v| sorted_index(v, len)).collect();

        (0..lower_triangular_len(columns.len()))
            .into_par_iter()
            .map(|o| {
                let (x, y) = pair(o);
                let mut rng = self.rnd.derive(o as u64).rng();
                self.contrast(&values[x], &orders[x], &values[y], &orders[y], &mut rng)
            })
            .collect()
    }
}
