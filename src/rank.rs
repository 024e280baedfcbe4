use crate::adapter::NumberArray;

/// Permutation of `0..len` ordering `data` ascending.
///
/// Ties keep their input order (stable sort), NaN sorts last.
pub fn sorted_index<A>(data: &A, len: usize) -> Vec<usize>
where
    A: NumberArray + ?Sized,
{
    let mut idx: Vec<usize> = (0..len).collect();
    idx.sort_by(|&a, &b| data.get_double(a).total_cmp(&data.get_double(b)));
    idx
}

/// 1-indexed ranks with ties averaged.
pub fn ranks<A>(data: &A, len: usize) -> Vec<f64>
where
    A: NumberArray + ?Sized,
{
    let idx = sorted_index(data, len);
    ranks_from_index(data, &idx)
}

/// Tie-averaged 1-indexed ranks, given a precomputed sort permutation.
pub fn ranks_from_index<A>(data: &A, idx: &[usize]) -> Vec<f64>
where
    A: NumberArray + ?Sized,
{
    assign_runs(data, idx, |start, end| (start + end - 1) as f64 * 0.5 + 1.0)
}

/// Tie-averaged ranks scaled to `[0, 1]`.
pub fn normalized_ranks<A>(data: &A, len: usize) -> Vec<f64>
where
    A: NumberArray + ?Sized,
{
    let idx = sorted_index(data, len);
    let norm = if len > 1 { 0.5 / (len - 1) as f64 } else { 0.0 };
    assign_runs(data, &idx, |start, end| (start + end - 1) as f64 * norm)
}

// Every maximal run [start, end) of equal values in sorted order gets score(start, end).
fn assign_runs<A, F>(data: &A, idx: &[usize], score: F) -> Vec<f64>
where
    A: NumberArray + ?Sized,
    F: Fn(usize, usize) -> f64,
{
    let len = idx.len();
    let mut ret = vec![0.0; len];
    let mut i = 0;
    while i < len {
        let start = i;
        let val = data.get_double(idx[start]);
        i += 1;
        while i < len && data.get_double(idx[i]) <= val {
            i += 1;
        }
        let s = score(start, i);
        for &j in &idx[start..i] {
            ret[j] = s;
        }
    }
    ret
}
