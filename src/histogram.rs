use crate::adapter::NumberArray;
use crate::measure::min_max;

/// Joint and marginal counts of two columns over equal-width bins.
///
/// Both axes use the same number of bins, `round(sqrt(n))`.
#[derive(Debug, Clone)]
pub struct JointHistogram {
    pub bins: usize,
    pub len: usize,
    pub margin1: Vec<usize>,
    pub margin2: Vec<usize>,
    /// Row-major `bins x bins` cell counts.
    pub counts: Vec<usize>,
}

impl JointHistogram {
    pub fn new<A, B>(data1: &A, data2: &B, len: usize) -> Self
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized,
    {
        let bins = ((len as f64).sqrt().round() as usize).max(1);
        let bin1 = discretize(data1, len, bins);
        let bin2 = discretize(data2, len, bins);

        let mut margin1 = vec![0; bins];
        let mut margin2 = vec![0; bins];
        let mut counts = vec![0; bins * bins];
        for (&b1, &b2) in bin1.iter().zip(bin2.iter()) {
            margin1[b1] += 1;
            margin2[b2] += 1;
            counts[b1 * bins + b2] += 1;
        }
        Self {
            bins,
            len,
            margin1,
            margin2,
            counts,
        }
    }

    pub fn cell(&self, bin1: usize, bin2: usize) -> usize {
        self.counts[bin1 * self.bins + bin2]
    }
}

/// Equal-width bin of every value.
///
/// Values at the maximum, which floor onto `bins`, go into the last bin. A
/// constant column lands entirely in bin 0.
pub fn discretize<A>(data: &A, len: usize, bins: usize) -> Vec<usize>
where
    A: NumberArray + ?Sized,
{
    let (min, max) = min_max(data, len);
    let scale = if max > min {
        bins as f64 / (max - min)
    } else {
        1.0
    };
    let maxbin = bins - 1;
    (0..len)
        .map(|i| {
            let bin = ((data.get_double(i) - min) * scale).floor();
            if bin < 0.0 {
                0
            } else {
                (bin as usize).min(maxbin)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximum_falls_into_last_bin() {
        let data = [0.0, 0.5, 1.0, 1.5, 2.0];
        assert_eq!(discretize(&data[..], 5, 2), vec![0, 0, 1, 1, 1]);
    }

    #[test]
    fn constant_column_uses_first_bin() {
        let data = [3.0; 4];
        assert_eq!(discretize(&data[..], 4, 2), vec![0, 0, 0, 0]);
    }

    #[test]
    fn joint_counts_match_margins() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let y = [8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0];
        let h = JointHistogram::new(&x[..], &y[..], 9);
        assert_eq!(h.bins, 3);
        assert_eq!(h.margin1, vec![3, 3, 3]);
        assert_eq!(h.margin2, vec![3, 3, 3]);
        assert_eq!(h.cell(0, 2), 3);
        assert_eq!(h.cell(1, 1), 3);
        assert_eq!(h.cell(2, 0), 3);
    }
}
