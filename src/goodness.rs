use strum_macros::{Display, EnumString};

use crate::pvalues::two_sided_pvalue_from_t;

/// Two-sample test comparing a conditional sample against the full marginal.
///
/// Returns a deviation in `[0, 1]`: 0 when the samples look alike, values
/// towards 1 for diverging distributions. NaN signals an undefined result
/// (for example a degenerate sample) and is retried by callers.
pub trait GoodnessOfFitTest: Send + Sync {
    /// Both buffers may be reordered in place.
    fn deviation(&self, full_sample: &mut [f64], conditional_sample: &mut [f64]) -> f64;
}

/// Two-sample Kolmogorov-Smirnov statistic: the largest gap between the
/// empirical distribution functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct KolmogorovSmirnovTest;

impl KolmogorovSmirnovTest {
    /// KS statistic of two ascending-sorted samples.
    ///
    /// Tied values advance both sides before the gap is measured.
    pub fn statistic(sample1: &[f64], sample2: &[f64]) -> f64 {
        let (n1, n2) = (sample1.len(), sample2.len());
        if n1 == 0 || n2 == 0 {
            return f64::NAN;
        }
        let mut maximum: f64 = 0.0;
        let (mut i1, mut i2) = (0, 0);
        while i1 < n1 && i2 < n2 {
            let v = sample1[i1].min(sample2[i2]);
            while i1 < n1 && sample1[i1] <= v {
                i1 += 1;
            }
            while i2 < n2 && sample2[i2] <= v {
                i2 += 1;
            }
            let cdf1 = i1 as f64 / n1 as f64;
            let cdf2 = i2 as f64 / n2 as f64;
            maximum = maximum.max((cdf1 - cdf2).abs());
        }
        maximum
    }
}

impl GoodnessOfFitTest for KolmogorovSmirnovTest {
    fn deviation(&self, full_sample: &mut [f64], conditional_sample: &mut [f64]) -> f64 {
        full_sample.sort_by(f64::total_cmp);
        conditional_sample.sort_by(f64::total_cmp);
        Self::statistic(full_sample, conditional_sample)
    }
}

/// Welch's unequal-variance t-test; the deviation is `1 - p`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WelchTTest;

fn mean_and_variance(sample: &[f64]) -> (f64, f64) {
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;
    let ss: f64 = sample.iter().map(|v| (v - mean) * (v - mean)).sum();
    (mean, ss / (n - 1.0))
}

impl GoodnessOfFitTest for WelchTTest {
    fn deviation(&self, full_sample: &mut [f64], conditional_sample: &mut [f64]) -> f64 {
        if full_sample.len() < 2 || conditional_sample.len() < 2 {
            return f64::NAN;
        }
        let n1 = full_sample.len() as f64;
        let n2 = conditional_sample.len() as f64;
        let (m1, v1) = mean_and_variance(full_sample);
        let (m2, v2) = mean_and_variance(conditional_sample);
        let q1 = v1 / n1;
        let q2 = v2 / n2;
        if !(q1 + q2 > 0.0) {
            // Both samples constant: identical means do not deviate.
            return if m1 == m2 { 0.0 } else { f64::NAN };
        }
        let t = (m1 - m2) / (q1 + q2).sqrt();
        // Welch-Satterthwaite degrees of freedom.
        let df = (q1 + q2) * (q1 + q2) / (q1 * q1 / (n1 - 1.0) + q2 * q2 / (n2 - 1.0));
        1.0 - two_sided_pvalue_from_t(t, df)
    }
}

/// Available goodness-of-fit tests, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum GoodnessOfFit {
    #[default]
    #[strum(serialize = "ks", serialize = "KolmogorovSmirnov", to_string = "ks")]
    KolmogorovSmirnov,
    #[strum(serialize = "welch", serialize = "WelchTTest", to_string = "welch")]
    Welch,
}

impl GoodnessOfFitTest for GoodnessOfFit {
    fn deviation(&self, full_sample: &mut [f64], conditional_sample: &mut [f64]) -> f64 {
        match self {
            GoodnessOfFit::KolmogorovSmirnov => {
                KolmogorovSmirnovTest.deviation(full_sample, conditional_sample)
            }
            GoodnessOfFit::Welch => WelchTTest.deviation(full_sample, conditional_sample),
        }
    }
}
