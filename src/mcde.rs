//! Monte Carlo Dependency Estimation (MCDE).
//!
//! Fouché and Böhm, "Monte Carlo Dependency Estimation" (SSDBM 2019). Each
//! iteration picks a reference dimension, cuts a random slice through the
//! other dimensions' rank orders, and tests whether the reference values
//! inside the slice are distributed like those outside it. The default test
//! is Mann-Whitney U with tie correction, reporting `1 - p`.
//!
//! Scores lie in `[0, 1]`; higher means more dependent.

use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use statrs::distribution::Normal;
use tracing::debug;

use crate::adapter::NumberArray;
use crate::error::{Error, Result};
use crate::measure::{columns_size, pair_size, Dependence};
use crate::pvalues::{standard_normal, two_sided_pvalue_from_z};
use crate::random::RandomFactory;
use crate::rank::sorted_index;
use crate::triangle::{lower_triangular_len, pair};

/// Sort order of one column with tie-corrected ranks.
#[derive(Debug, Clone)]
pub struct RankStruct {
    /// Row indices in ascending value order.
    pub index: Vec<usize>,
    /// Zero-based, tie-averaged rank of each sorted position.
    pub adjusted: Vec<f64>,
    /// `correction[p]`: sum of `t^3 - t` over tie blocks ending before `p`.
    pub correction: Vec<f64>,
}

impl RankStruct {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Move a cut forward so it does not split a block of ties.
    pub fn safe_cut(&self, mut pos: usize) -> usize {
        let len = self.len();
        while pos > 0 && pos < len && self.adjusted[pos] == self.adjusted[pos - 1] {
            pos += 1;
        }
        pos.min(len)
    }
}

/// Statistical test plugged into MCDE.
pub trait McdeTest: Send + Sync {
    fn corrected_ranks(&self, values: &[f64]) -> RankStruct;

    /// Contrast of the reference dimension inside `slice` versus outside,
    /// restricted to sorted positions `[start, start + width)`.
    fn statistical_test(&self, start: usize, width: usize, slice: &[bool], ranks: &RankStruct)
        -> f64;
}

/// Mann-Whitney U test, two-sided, reporting `1 - p`.
#[derive(Debug, Clone, Copy)]
pub struct MannWhitneyP {
    normal: Normal,
}

impl MannWhitneyP {
    pub fn new() -> Self {
        Self {
            normal: standard_normal(),
        }
    }
}

impl Default for MannWhitneyP {
    fn default() -> Self {
        Self::new()
    }
}

impl McdeTest for MannWhitneyP {
    fn corrected_ranks(&self, values: &[f64]) -> RankStruct {
        let len = values.len();
        let index = sorted_index(values, len);
        let mut adjusted = vec![0.0; len];
        let mut correction = vec![0.0; len + 1];
        let mut j = 0;
        while j < len {
            let val = values[index[j]];
            let mut k = j + 1;
            while k < len && values[index[k]] == val {
                k += 1;
            }
            let rank = (j + k - 1) as f64 * 0.5;
            let t = (k - j) as f64;
            for p in j..k {
                adjusted[p] = rank;
                correction[p + 1] = correction[p];
            }
            correction[k] += t * t * t - t;
            j = k;
        }
        RankStruct {
            index,
            adjusted,
            correction,
        }
    }

    fn statistical_test(
        &self,
        start: usize,
        width: usize,
        slice: &[bool],
        ranks: &RankStruct,
    ) -> f64 {
        let safe_start = ranks.safe_cut(start);
        let safe_end = ranks.safe_cut(start + width);
        if safe_end <= safe_start {
            return 0.0;
        }
        let mut r = 0.0;
        let mut n1 = 0usize;
        for p in safe_start..safe_end {
            if slice[ranks.index[p]] {
                r += ranks.adjusted[p] - safe_start as f64;
                n1 += 1;
            }
        }
        let n = safe_end - safe_start;
        if n1 == 0 || n1 == n {
            return 0.0;
        }
        let (n, n1) = (n as f64, n1 as f64);
        let n2 = n - n1;
        // Zero-based rank sum, so U = R - n1 (n1 - 1) / 2.
        let u = r - n1 * (n1 - 1.0) * 0.5;
        let mean = n1 * n2 * 0.5;
        let ties = (ranks.correction[safe_end] - ranks.correction[safe_start]) / (n * (n - 1.0));
        let var = n1 * n2 / 12.0 * (n + 1.0 - ties);
        if !(var > 0.0) {
            return 0.0;
        }
        let z = (u - mean).abs() / var.sqrt();
        1.0 - two_sided_pvalue_from_z(z, &self.normal)
    }
}

/// MCDE dependence measure.
#[derive(Debug, Clone)]
pub struct Mcde<T = MannWhitneyP> {
    m: usize,
    alpha: f64,
    beta: f64,
    test: T,
    rnd: RandomFactory,
}

impl<T: McdeTest> Mcde<T> {
    /// `alpha` is the expected share of points in a slice, `beta` the share
    /// of the reference dimension the test is restricted to.
    pub fn new(m: usize, alpha: f64, beta: f64, test: T, rnd: RandomFactory) -> Result<Self> {
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
        if !(beta > 0.0 && beta < 1.0) {
            return Err(Error::InvalidParameter {
                name: "beta",
                message: "must be in (0, 1)",
            });
        }
        Ok(Self {
            m,
            alpha,
            beta,
            test,
            rnd,
        })
    }

    pub fn m(&self) -> usize {
        self.m
    }

    fn ranks_of<A>(&self, data: &A) -> Result<RankStruct>
    where
        A: NumberArray + ?Sized,
    {
        let values = data.to_vec();
        if values.iter().any(|v| v.is_nan()) {
            return Err(Error::NaNInput);
        }
        Ok(self.test.corrected_ranks(&values))
    }

    // Random restriction of the reference dimension: (start, width).
    fn restriction(&self, rng: &mut StdRng, len: usize) -> (usize, usize) {
        let width = ((len as f64 * self.beta).ceil() as usize).clamp(2.min(len), len);
        (rng.gen_range(0..=len - width), width)
    }

    // Slice of a single conditioning dimension holding about alpha * len points.
    fn random_slice(&self, rng: &mut StdRng, ranks: &RankStruct) -> Vec<bool> {
        let len = ranks.len();
        let size = ((self.alpha * len as f64).ceil() as usize).clamp(1, len - 1);
        let start = rng.gen_range(0..len - size);
        let mut slice = vec![false; len];
        for &i in &ranks.index[start..start + size] {
            slice[i] = true;
        }
        slice
    }

    // Intersection of one window per conditioning dimension.
    fn random_slice_multi(&self, rng: &mut StdRng, ranks: &[&RankStruct]) -> Vec<bool> {
        let len = ranks[0].len();
        let share = self.alpha.powf(1.0 / ranks.len() as f64);
        let size = ((share * len as f64).ceil() as usize).clamp(1, len - 1);
        let mut slice = vec![true; len];
        for r in ranks {
            let start = rng.gen_range(0..len - size);
            for &i in r.index[..start].iter().chain(&r.index[start + size..]) {
                slice[i] = false;
            }
        }
        slice
    }

    fn bivariate(&self, r1: &RankStruct, r2: &RankStruct, rng: &mut StdRng) -> f64 {
        let len = r1.len();
        if len < 2 {
            return f64::NAN;
        }
        let mut sum = 0.0;
        for _ in 0..self.m {
            // Coin flip for the reference dimension.
            let (reference, other) = if rng.gen_bool(0.5) { (r1, r2) } else { (r2, r1) };
            let slice = self.random_slice(rng, other);
            let (start, width) = self.restriction(rng, len);
            sum += self.test.statistical_test(start, width, &slice, reference);
        }
        sum / self.m as f64
    }

    /// Contrast of two or more columns jointly.
    ///
    /// The reference dimension is drawn uniformly per iteration; all other
    /// dimensions contribute one window each to the slice.
    pub fn contrast<C>(&self, columns: &[C]) -> Result<f64>
    where
        C: NumberArray + Sync,
    {
        let len = columns_size(columns)?;
        let ranks: Vec<RankStruct> = columns
            .par_iter()
            .map(|c| self.ranks_of(c))
            .collect::<Result<_>>()?;
        if len < 2 {
            return Ok(f64::NAN);
        }
        let dims = ranks.len();
        let mut rng = self.rnd.rng();
        let mut sum = 0.0;
        for _ in 0..self.m {
            let reference = rng.gen_range(0..dims);
            let others: Vec<&RankStruct> = ranks
                .iter()
                .enumerate()
                .filter(|&(d, _)| d != reference)
                .map(|(_, r)| r)
                .collect();
            let slice = self.random_slice_multi(&mut rng, &others);
            let (start, width) = self.restriction(&mut rng, len);
            sum += self
                .test
                .statistical_test(start, width, &slice, &ranks[reference]);
        }
        debug!(dims, m = self.m, "multivariate contrast done");
        Ok(sum / self.m as f64)
    }
}

impl<T: McdeTest> Dependence for Mcde<T> {
    fn dependence<A, B>(&self, data1: &A, data2: &B) -> Result<f64>
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized,
    {
        pair_size(data1, data2)?;
        let r1 = self.ranks_of(data1)?;
        let r2 = self.ranks_of(data2)?;
        let mut rng = self.rnd.rng();
        Ok(self.bivariate(&r1, &r2, &mut rng))
    }

    fn dependence_matrix<C>(&self, columns: &[C]) -> Result<Vec<f64>>
    where
        C: NumberArray + Sync,
    {
        columns_size(columns)?;
        let ranks: Vec<RankStruct> = columns
            .par_iter()
            .map(|c| self.ranks_of(c))
            .collect::<Result<_>>()?;
        Ok((0..lower_triangular_len(columns.len()))
            .into_par_iter()
            .map(|o| {
                let (x, y) = pair(o);
                let mut rng = self.rnd.derive(o as u64).rng();
                self.bivariate(&ranks[x], &ranks[y], &mut rng)
            })
            .collect())
    }
}
