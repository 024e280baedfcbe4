use rayon::prelude::*;

use crate::adapter::NumberArray;
use crate::error::Result;
use crate::measure::{columns_size, pair_size, Dependence};
use crate::pvalues::correlation_pvalue;
use crate::triangle::lower_triangular_len;

/// Pearson product-moment correlation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pearson;

/// Mean and sum of squared deviations of one column (two-pass).
pub(crate) fn mean_and_ss<A>(data: &A, len: usize) -> (f64, f64)
where
    A: NumberArray + ?Sized,
{
    let mut sum = 0.0;
    for i in 0..len {
        sum += data.get_double(i);
    }
    let mean = sum / len as f64;
    let mut ss = 0.0;
    for i in 0..len {
        let d = data.get_double(i) - mean;
        ss += d * d;
    }
    (mean, ss)
}

/// Correlation from centered cross products; zero variance scores 0.
pub(crate) fn correlation_from_sums(ssxy: f64, ssx: f64, ssy: f64) -> f64 {
    if ssx > 0.0 && ssy > 0.0 {
        ssxy / (ssx * ssy).sqrt()
    } else {
        0.0
    }
}

pub(crate) fn centered_cross<A, B>(data1: &A, m1: f64, data2: &B, m2: f64, len: usize) -> f64
where
    A: NumberArray + ?Sized,
    B: NumberArray + ?Sized,
{
    let mut ssxy = 0.0;
    for i in 0..len {
        ssxy += (data1.get_double(i) - m1) * (data2.get_double(i) - m2);
    }
    ssxy
}

impl Dependence for Pearson {
    fn dependence<A, B>(&self, data1: &A, data2: &B) -> Result<f64>
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized,
    {
        let len = pair_size(data1, data2)?;
        let (m1, ss1) = mean_and_ss(data1, len);
        let (m2, ss2) = mean_and_ss(data2, len);
        Ok(correlation_from_sums(centered_cross(data1, m1, data2, m2, len), ss1, ss2))
    }

    fn dependence_matrix<C>(&self, columns: &[C]) -> Result<Vec<f64>>
    where
        C: NumberArray + Sync,
    {
        let len = columns_size(columns)?;
        let dims = columns.len();

        let moments: Vec<(f64, f64)> = columns
            .par_iter()
            .map(|c| mean_and_ss(c, len))
            .collect();

        let row_results: Vec<Vec<f64>> = (1..dims)
            .into_par_iter()
            .map(|y| {
                let (my, ssy) = moments[y];
                (0..y)
                    .map(|x| {
                        let (mx, ssx) = moments[x];
                        let ssxy = centered_cross(&columns[x], mx, &columns[y], my, len);
                        correlation_from_sums(ssxy, ssx, ssy)
                    })
                    .collect()
            })
            .collect();

        let mut packed = Vec::with_capacity(lower_triangular_len(dims));
        for row in row_results {
            packed.extend_from_slice(&row);
        }
        Ok(packed)
    }
}

/// Two-sided p-value of a correlation coefficient over `n_samples` pairs,
/// from Student's t with `n - 2` degrees of freedom.
///
/// Also valid for Spearman coefficients as a large-sample approximation.
pub fn p_value(r: f64, n_samples: usize) -> f64 {
    correlation_pvalue(r, n_samples)
}
