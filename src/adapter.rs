use ndarray::{ArrayBase, Data, Ix1};

use crate::error::{Error, Result};

/// Random-access view of one numeric column.
///
/// Every measure reads its input only through this trait, so plain slices,
/// ndarray rows and column projections of row-major data are all accepted
/// without copying. `get_double` must be O(1): several measures re-read
/// values at computed positions inside nested loops.
pub trait NumberArray {
    fn size(&self) -> usize;

    fn get_double(&self, index: usize) -> f64;

    fn to_vec(&self) -> Vec<f64> {
        (0..self.size()).map(|i| self.get_double(i)).collect()
    }
}

impl NumberArray for [f64] {
    fn size(&self) -> usize {
        self.len()
    }

    fn get_double(&self, index: usize) -> f64 {
        self[index]
    }
}

impl NumberArray for Vec<f64> {
    fn size(&self) -> usize {
        self.len()
    }

    fn get_double(&self, index: usize) -> f64 {
        self[index]
    }
}

impl NumberArray for [f32] {
    fn size(&self) -> usize {
        self.len()
    }

    fn get_double(&self, index: usize) -> f64 {
        f64::from(self[index])
    }
}

impl NumberArray for Vec<f32> {
    fn size(&self) -> usize {
        self.len()
    }

    fn get_double(&self, index: usize) -> f64 {
        f64::from(self[index])
    }
}

impl<S> NumberArray for ArrayBase<S, Ix1>
where
    S: Data<Elem = f64>,
{
    fn size(&self) -> usize {
        self.len()
    }

    fn get_double(&self, index: usize) -> f64 {
        self[index]
    }
}

impl<T: NumberArray + ?Sized> NumberArray for &T {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn get_double(&self, index: usize) -> f64 {
        (**self).get_double(index)
    }
}

/// One dimension of row-major (vector-of-vectors) data.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    rows: &'a [Vec<f64>],
    dim: usize,
}

impl<'a> Column<'a> {
    pub fn new(rows: &'a [Vec<f64>], dim: usize) -> Self {
        Self { rows, dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl NumberArray for Column<'_> {
    fn size(&self) -> usize {
        self.rows.len()
    }

    fn get_double(&self, index: usize) -> f64 {
        self.rows[index][self.dim]
    }
}

/// Project every dimension of row-major data into a [`Column`].
///
/// The dimensionality is taken from the first row. Every other row must have
/// the same width, otherwise `SizeMismatch` names the first offending row's
/// width. No rows yield no columns.
pub fn columns_of(rows: &[Vec<f64>]) -> Result<Vec<Column<'_>>> {
    let dims = rows.first().map_or(0, Vec::len);
    if let Some(row) = rows.iter().find(|r| r.len() != dims) {
        return Err(Error::SizeMismatch {
            expected: dims,
            found: row.len(),
        });
    }
    Ok((0..dims).map(|d| Column::new(rows, d)).collect())
}
