use crate::adapter::NumberArray;
use crate::error::Result;
use crate::histogram::JointHistogram;
use crate::measure::{pair_size, Dependence};

/// Mutual information over equal-width histograms, normalized by
/// `log(bins)`, the value for two identical uniform columns.
///
/// Fewer than two bins (n <= 2) carry no information and score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutualInformationEquiwidth;

pub(crate) fn mutual_information(h: &JointHistogram) -> f64 {
    let len = h.len as f64;
    let mut e = 0.0;
    for bin1 in 0..h.bins {
        let sum1 = h.margin1[bin1];
        if sum1 == 0 {
            continue;
        }
        // Inverse of pX.
        let ipx = len / sum1 as f64;
        for bin2 in 0..h.bins {
            let sum2 = h.margin2[bin2];
            if sum2 == 0 {
                continue;
            }
            let cell = h.cell(bin1, bin2);
            if cell > 0 {
                let pxy = cell as f64 / len;
                e += pxy * (pxy * ipx * len / sum2 as f64).ln();
            }
        }
    }
    e
}

impl Dependence for MutualInformationEquiwidth {
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
        Ok(mutual_information(&h) / (h.bins as f64).ln())
    }
}
