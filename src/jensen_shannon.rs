use crate::adapter::NumberArray;
use crate::error::Result;
use crate::histogram::JointHistogram;
use crate::measure::{pair_size, Dependence};

/// Jensen-Shannon divergence between the joint equal-width histogram and
/// the product of its margins.
///
/// Normalized by the divergence of two identical uniform columns, so that
/// case scores 1. Fewer than two bins score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct JensenShannonEquiwidth;

/// Sum of both KL terms against the midpoint for identical uniform columns:
/// `b` diagonal cells of mass `1/b` against a product mass of `1/b²` each.
pub(crate) fn uniform_identical_divergence(bins: usize) -> f64 {
    let b = bins as f64;
    (2.0 * b / (b + 1.0)).ln() + (2.0 / (b + 1.0)).ln() / b + (b - 1.0) / b * 2f64.ln()
}

pub(crate) fn js_divergence(h: &JointHistogram) -> f64 {
    let len = h.len as f64;
    let mut e = 0.0;
    for bin1 in 0..h.bins {
        let sum1 = h.margin1[bin1];
        if sum1 == 0 {
            continue;
        }
        let px = sum1 as f64 / len;
        for bin2 in 0..h.bins {
            let sum2 = h.margin2[bin2];
            if sum2 == 0 {
                continue;
            }
            let pxy = h.cell(bin1, bin2) as f64 / len;
            let pxpy = px * sum2 as f64 / len;
            let iavg = 2.0 / (pxy + pxpy);
            if pxy > 0.0 {
                e += pxy * (pxy * iavg).ln();
            }
            e += pxpy * (pxpy * iavg).ln();
        }
    }
    e
}

impl Dependence for JensenShannonEquiwidth {
    fn dependence<A, B>(&self, data1: &A, data2: &B) -> Result<f64>
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized,
    {
        let len = pair_size(data1, data2)?;
        let h = JointHistogram::new(data1, data2, len);
        if h.bins < 2 {
            return Ok(0.0);
        }
        Ok(js_divergence(&h) / uniform_identical_divergence(h.bins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_identical_scores_one() {
        let x: Vec<f64> = (0..16).map(f64::from).collect();
        let score = JensenShannonEquiwidth.dependence(&x, &x).unwrap();
        assert!((score - 1.0).abs() < 1e-12, "score {}", score);
    }

    #[test]
    fn closed_form_matches_direct_sum() {
        let x: Vec<f64> = (0..25).map(f64::from).collect();
        let h = JointHistogram::new(&x, &x, 25);
        let direct = js_divergence(&h);
        assert!((direct - uniform_identical_divergence(5)).abs() < 1e-12);
    }
}
