//! SURFING-style dependence: how unevenly k-nearest-neighbor distances are
//! spread in the two-dimensional projection.
//!
//! Baumgartner et al., "Subspace Selection for Clustering High-Dimensional
//! Data" (ICDM 2004). Uses `k = max(1, n / 10)`, the point itself counted
//! among its neighbors. Every point scans all others with a bounded max-heap,
//! so a score costs O(n² log k); this is by far the slowest measure here.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::adapter::NumberArray;
use crate::error::Result;
use crate::measure::{pair_size, Dependence};

/// SURFING dependence measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Surfing;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Dist(f64);

impl Eq for Dist {}

impl PartialOrd for Dist {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dist {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Distance of every point to its k-th nearest neighbor (self included).
pub fn knn_distances<A, B>(data1: &A, data2: &B, len: usize, k: usize) -> Vec<f64>
where
    A: NumberArray + ?Sized,
    B: NumberArray + ?Sized,
{
    let mut heap = BinaryHeap::with_capacity(k + 1);
    let mut knns = vec![0.0; len];
    for (i, knn) in knns.iter_mut().enumerate() {
        let ix = data1.get_double(i);
        let iy = data2.get_double(i);
        heap.clear();
        for j in 0..len {
            let dx = ix - data1.get_double(j);
            let dy = iy - data2.get_double(j);
            let d = Dist(dx * dx + dy * dy);
            if heap.len() < k {
                heap.push(d);
            } else if heap.peek().map_or(false, |top| d < *top) {
                heap.pop();
                heap.push(d);
            }
        }
        *knn = heap.peek().map_or(0.0, |top| top.0.sqrt());
    }
    knns
}

impl Dependence for Surfing {
    fn dependence<A, B>(&self, data1: &A, data2: &B) -> Result<f64>
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized,
    {
        let len = pair_size(data1, data2)?;
        let k = (len / 10).max(1);
        let knns = knn_distances(data1, data2, len, k);
        let kdistmean = knns.iter().sum::<f64>() / len as f64;

        let mut diff = 0.0;
        let mut below = 0usize;
        for &d in &knns {
            diff += (kdistmean - d).abs();
            if d < kdistmean {
                below += 1;
            }
        }
        if below > 0 && kdistmean > 0.0 {
            Ok(diff / (2.0 * kdistmean * below as f64))
        } else {
            Ok(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knn_includes_the_point_itself() {
        let x = [0.0, 1.0, 3.0];
        let y = [0.0, 0.0, 0.0];
        assert_eq!(knn_distances(&x[..], &y[..], 3, 1), vec![0.0, 0.0, 0.0]);
        assert_eq!(knn_distances(&x[..], &y[..], 3, 2), vec![1.0, 1.0, 2.0]);
    }

    #[test]
    fn uniform_spacing_scores_zero() {
        // Regular grid: every point has the same k-distance.
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let y = x.clone();
        let s = Surfing.dependence(&x, &y).unwrap();
        assert!(s.abs() < 1e-12, "{}", s);
    }
}
