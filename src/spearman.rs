use rayon::prelude::*;
use tracing::debug;

use crate::adapter::NumberArray;
use crate::error::Result;
use crate::measure::{columns_size, pair_size, Dependence};
use crate::pearson::{centered_cross, correlation_from_sums, mean_and_ss};
use crate::rank::normalized_ranks;
use crate::triangle::lower_triangular_len;

/// Spearman rank correlation: Pearson on tie-averaged normalized ranks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spearman;

impl Dependence for Spearman {
    fn dependence<A, B>(&self, data1: &A, data2: &B) -> Result<f64>
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized,
    {
        let len = pair_size(data1, data2)?;
        let ranks1 = normalized_ranks(data1, len);
        let ranks2 = normalized_ranks(data2, len);

        let (m1, ss1) = mean_and_ss(&ranks1, len);
        let (m2, ss2) = mean_and_ss(&ranks2, len);
        let ssxy = centered_cross(&ranks1, m1, &ranks2, m2, len);
        Ok(correlation_from_sums(ssxy, ss1, ss2))
    }

    fn dependence_matrix<C>(&self, columns: &[C]) -> Result<Vec<f64>>
    where
        C: NumberArray + Sync,
    {
        let len = columns_size(columns)?;
        let dims = columns.len();

        // Rank-transform each column once.
        let rank_cols: Vec<Vec<f64>> = columns
            .par_iter()
            .map(|c| normalized_ranks(c, len))
            .collect();
        debug!(dims, "ranked columns");
        let moments: Vec<(f64, f64)> = rank_cols.iter().map(|r| mean_and_ss(r, len)).collect();

        let row_results: Vec<Vec<f64>> = (1..dims)
            .into_par_iter()
            .map(|y| {
                let (my, ssy) = moments[y];
                (0..y)
                    .map(|x| {
                        let (mx, ssx) = moments[x];
                        let ssxy = centered_cross(&rank_cols[x], mx, &rank_cols[y], my, len);
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
