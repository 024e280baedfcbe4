use ndarray::{Array2, ArrayBase, ArrayView1, Data, Ix2};
use rayon::prelude::*;
use tracing::debug;

use crate::adapter::NumberArray;
use crate::error::{Error, Result};
use crate::triangle::{expand, lower_triangular_len, pair};

/// Common interface of all pairwise dependence measures.
pub trait Dependence: Sync {
    /// Dependence score of two equally long columns.
    fn dependence<A, B>(&self, data1: &A, data2: &B) -> Result<f64>
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized;

    /// Scores of all column pairs, packed as a lower triangle (see
    /// [`crate::triangle::index`]).
    ///
    /// The default scores every pair independently on the rayon pool.
    /// Measures with per-column preprocessing override this so that the
    /// preprocessing runs once per column instead of once per pair.
    fn dependence_matrix<C>(&self, columns: &[C]) -> Result<Vec<f64>>
    where
        C: NumberArray + Sync,
    {
        columns_size(columns)?;
        let pairs = lower_triangular_len(columns.len());
        debug!(dims = columns.len(), pairs, "scoring column pairs");
        (0..pairs)
            .into_par_iter()
            .map(|o| {
                let (x, y) = pair(o);
                self.dependence(&columns[x], &columns[y])
            })
            .collect()
    }
}

/// Scores of all row pairs of a (variables x samples) matrix.
pub fn row_dependence<M, S>(measure: &M, data: &ArrayBase<S, Ix2>) -> Result<Vec<f64>>
where
    M: Dependence,
    S: Data<Elem = f64>,
{
    let rows: Vec<ArrayView1<f64>> = data.rows().into_iter().collect();
    measure.dependence_matrix(&rows)
}

/// Symmetric (variables x variables) score matrix of a (variables x samples)
/// matrix, with `diagonal` on the diagonal.
pub fn matrix<M, S>(measure: &M, data: &ArrayBase<S, Ix2>, diagonal: f64) -> Result<Array2<f64>>
where
    M: Dependence,
    S: Data<Elem = f64>,
{
    let packed = row_dependence(measure, data)?;
    Ok(expand(&packed, data.nrows(), diagonal))
}

/// Validate a column pair and return the common length.
pub fn pair_size<A, B>(data1: &A, data2: &B) -> Result<usize>
where
    A: NumberArray + ?Sized,
    B: NumberArray + ?Sized,
{
    let len = data1.size();
    if len != data2.size() {
        return Err(Error::SizeMismatch {
            expected: len,
            found: data2.size(),
        });
    }
    if len == 0 {
        return Err(Error::EmptyInput);
    }
    Ok(len)
}

/// Validate a set of columns and return the common length.
pub fn columns_size<C>(columns: &[C]) -> Result<usize>
where
    C: NumberArray,
{
    if columns.len() < 2 {
        return Err(Error::TooFewColumns {
            found: columns.len(),
        });
    }
    let len = columns[0].size();
    if let Some(bad) = columns.iter().find(|c| c.size() != len) {
        return Err(Error::SizeMismatch {
            expected: len,
            found: bad.size(),
        });
    }
    if len == 0 {
        return Err(Error::EmptyInput);
    }
    Ok(len)
}

/// Smallest and largest value of a column.
pub(crate) fn min_max<A>(data: &A, len: usize) -> (f64, f64)
where
    A: NumberArray + ?Sized,
{
    let mut min = data.get_double(0);
    let mut max = min;
    for i in 1..len {
        let v = data.get_double(i);
        if v < min {
            min = v;
        } else if v > max {
            max = v;
        }
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_size_rejects_mismatch_and_empty() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0];
        let empty: Vec<f64> = Vec::new();
        assert!(matches!(
            pair_size(&a, &b),
            Err(Error::SizeMismatch { expected: 3, found: 2 })
        ));
        assert!(matches!(pair_size(&empty, &empty), Err(Error::EmptyInput)));
        assert_eq!(pair_size(&a, &a).unwrap(), 3);
    }

    #[test]
    fn columns_size_requires_two_columns() {
        let a = vec![1.0, 2.0];
        assert!(matches!(
            columns_size(&[a.clone()]),
            Err(Error::TooFewColumns { found: 1 })
        ));
        assert!(matches!(
            columns_size(&[a.clone(), vec![1.0]]),
            Err(Error::SizeMismatch { .. })
        ));
        assert_eq!(columns_size(&[a.clone(), a]).unwrap(), 2);
    }
}
