use ndarray::Array2;

/// Number of off-diagonal pairs among `dims` columns.
pub fn lower_triangular_len(dims: usize) -> usize {
    dims * dims.saturating_sub(1) / 2
}

/// Position of pair `(x, y)`, `x < y`, in the packed lower triangle.
///
/// Pairs are ordered `(0,1), (0,2), (1,2), (0,3), ...`: rows `y` ascending,
/// `x` ascending within a row.
pub fn index(x: usize, y: usize) -> usize {
    debug_assert!(x < y, "lower triangle index requires x < y");
    ((y * (y - 1)) >> 1) + x
}

/// Inverse of [`index`].
pub fn pair(index: usize) -> (usize, usize) {
    // Largest y with y*(y-1)/2 <= index.
    let mut y = ((1.0 + (1.0 + 8.0 * index as f64).sqrt()) * 0.5) as usize;
    while (y * (y - 1)) >> 1 > index {
        y -= 1;
    }
    while ((y + 1) * y) >> 1 <= index {
        y += 1;
    }
    (index - ((y * (y - 1)) >> 1), y)
}

/// Unpack a lower-triangular score vector into a full symmetric matrix.
pub fn expand(packed: &[f64], dims: usize, diagonal: f64) -> Array2<f64> {
    debug_assert_eq!(packed.len(), lower_triangular_len(dims));
    let mut out = Array2::<f64>::from_elem((dims, dims), diagonal);
    let mut o = 0;
    for y in 1..dims {
        for x in 0..y {
            out[[x, y]] = packed[o];
            out[[y, x]] = packed[o];
            o += 1;
        }
    }
    out
}
