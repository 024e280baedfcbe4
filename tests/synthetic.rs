use mindep::goodness::GoodnessOfFitTest;
use mindep::{
    make, matrix, DistanceCorrelation, Error, GoodnessOfFit, HiCS, HoeffdingsD, MannWhitneyP,
    Mcde, MeasureConfig, MeasureKind, MutualInformationEquiwidth, Pearson, RandomFactory,
    Dependence, Spearman,
};
use ndarray::Array2;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

const ALL_KINDS: [MeasureKind; 11] = [
    MeasureKind::Pearson,
    MeasureKind::Spearman,
    MeasureKind::DistanceCorrelation,
    MeasureKind::Hoeffding,
    MeasureKind::MutualInformation,
    MeasureKind::JensenShannon,
    MeasureKind::HiCS,
    MeasureKind::Mcde,
    MeasureKind::Surfing,
    MeasureKind::Slope,
    MeasureKind::SlopeInversion,
];

const DETERMINISTIC_KINDS: [MeasureKind; 9] = [
    MeasureKind::Pearson,
    MeasureKind::Spearman,
    MeasureKind::DistanceCorrelation,
    MeasureKind::Hoeffding,
    MeasureKind::MutualInformation,
    MeasureKind::JensenShannon,
    MeasureKind::Surfing,
    MeasureKind::Slope,
    MeasureKind::SlopeInversion,
];

fn seeded(kind: MeasureKind) -> MeasureConfig {
    let mut config = MeasureConfig::new(kind);
    config.seed = Some(17);
    config
}

/// Four columns of 30 samples with mixed relationships.
fn sample_columns() -> Vec<Vec<f64>> {
    let n = 30;
    let c0: Vec<f64> = (0..n).map(f64::from).collect();
    let c1: Vec<f64> = (0..n).map(|i| (f64::from(i) * 0.7).sin()).collect();
    let c2: Vec<f64> = (0..n).map(|i| f64::from((i * i) % 7)).collect();
    let c3: Vec<f64> = c0.iter().zip(&c1).map(|(a, b)| a + 3.0 * b).collect();
    vec![c0, c1, c2, c3]
}

/// A permutation of `0..n` with no local order, by stepping `step` mod `n`.
fn scrambled(n: usize, step: usize) -> Vec<f64> {
    (0..n).map(|i| ((i * step) % n) as f64).collect()
}

#[test]
fn synthetic_linear_checks() {
    let x: Vec<f64> = (1..=10).map(f64::from).collect();
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
    let neg: Vec<f64> = x.iter().map(|v| -v).collect();

    assert!(approx_eq(Pearson.dependence(&x, &y).unwrap(), 1.0, 1e-12));
    assert!(approx_eq(Pearson.dependence(&x, &neg).unwrap(), -1.0, 1e-12));
    assert!(approx_eq(Spearman.dependence(&x, &y).unwrap(), 1.0, 1e-12));
    assert!(approx_eq(Spearman.dependence(&x, &neg).unwrap(), -1.0, 1e-12));
    assert!(approx_eq(DistanceCorrelation.dependence(&x, &y).unwrap(), 1.0, 1e-9));
    assert!(approx_eq(DistanceCorrelation.dependence(&x, &neg).unwrap(), 1.0, 1e-9));

    let d = HoeffdingsD.dependence(&x, &y).unwrap();
    assert!(d > 0.99 && d <= 1.0, "hoeffding {}", d);
}

#[test]
fn synthetic_matrix_checks() {
    let data = Array2::from_shape_vec((2, 4), vec![1.0, 2.0, 3.0, 4.0, 4.0, 3.0, 2.0, 1.0])
        .expect("matrix shape");

    let pearson_corr = matrix(&Pearson, &data, 1.0).unwrap();
    assert_eq!(pearson_corr.dim(), (2, 2));
    assert!(approx_eq(pearson_corr[[0, 1]], -1.0, 1e-12));
    assert!(approx_eq(pearson_corr[[1, 0]], -1.0, 1e-12));
    assert_eq!(pearson_corr[[0, 0]], 1.0);

    let spearman_corr = matrix(&Spearman, &data, 1.0).unwrap();
    assert!(approx_eq(spearman_corr[[0, 1]], -1.0, 1e-12));
}

#[test]
fn spearman_handles_ties() {
    let x = vec![1.0, 2.0, 2.0, 3.0];
    assert!(approx_eq(Spearman.dependence(&x, &x).unwrap(), 1.0, 1e-12));
}

#[test]
fn distance_correlation_of_column_with_itself() {
    let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    assert!(approx_eq(DistanceCorrelation.dependence(&x, &x).unwrap(), 1.0, 1e-9));
}

#[test]
fn constant_columns_score_zero() {
    let x: Vec<f64> = (0..10).map(f64::from).collect();
    let c = vec![5.0; 10];
    assert_eq!(Pearson.dependence(&x, &c).unwrap(), 0.0);
    assert_eq!(Spearman.dependence(&x, &c).unwrap(), 0.0);
    assert_eq!(DistanceCorrelation.dependence(&x, &c).unwrap(), 0.0);
    assert_eq!(DistanceCorrelation.dependence(&c, &x).unwrap(), 0.0);
}

#[test]
fn hoeffding_needs_five_samples() {
    let x = vec![1.0, 2.0, 3.0, 4.0];
    assert!(HoeffdingsD.dependence(&x, &x).unwrap().is_nan());
    let packed = HoeffdingsD.dependence_matrix(&[x.clone(), x]).unwrap();
    assert_eq!(packed.len(), 1);
    assert!(packed[0].is_nan());
}

#[test]
fn mutual_information_of_uniform_column_with_itself() {
    let x: Vec<f64> = (0..16).map(f64::from).collect();
    let mi = MutualInformationEquiwidth.dependence(&x, &x).unwrap();
    assert!(approx_eq(mi, 1.0, 1e-12), "mi {}", mi);

    let tiny = vec![1.0, 2.0];
    assert_eq!(MutualInformationEquiwidth.dependence(&tiny, &tiny).unwrap(), 0.0);
}

#[test]
fn every_measure_rejects_bad_input() {
    let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let b = vec![1.0, 2.0, 3.0];
    let empty: Vec<f64> = Vec::new();
    for kind in ALL_KINDS {
        let measure = make(&seeded(kind)).unwrap();
        assert!(
            matches!(
                measure.dependence(&a, &b),
                Err(Error::SizeMismatch { expected: 6, found: 3 })
            ),
            "{} accepted a length mismatch",
            kind
        );
        assert!(
            matches!(measure.dependence(&empty, &empty), Err(Error::EmptyInput)),
            "{} accepted empty input",
            kind
        );
        assert!(
            matches!(
                measure.dependence_matrix(&[a.clone()]),
                Err(Error::TooFewColumns { found: 1 })
            ),
            "{} accepted a single column",
            kind
        );
        assert!(
            matches!(
                measure.dependence_matrix(&[a.clone(), b.clone()]),
                Err(Error::SizeMismatch { .. })
            ),
            "{} accepted ragged columns",
            kind
        );
    }
}

#[test]
fn batch_matches_pairwise() {
    let columns = sample_columns();
    for kind in DETERMINISTIC_KINDS {
        let measure = make(&seeded(kind)).unwrap();
        let packed = measure.dependence_matrix(&columns).unwrap();
        assert_eq!(packed.len(), 6);
        let mut o = 0;
        for y in 1..columns.len() {
            for x in 0..y {
                let pairwise = measure.dependence(&columns[x], &columns[y]).unwrap();
                assert!(
                    approx_eq(packed[o], pairwise, 1e-12),
                    "{} pair ({}, {}): batch {} vs pairwise {}",
                    kind,
                    x,
                    y,
                    packed[o],
                    pairwise
                );
                o += 1;
            }
        }
    }
}

#[test]
fn monte_carlo_measures_are_reproducible() {
    let columns = sample_columns();
    for kind in [MeasureKind::HiCS, MeasureKind::Mcde] {
        let first = make(&seeded(kind)).unwrap();
        let second = make(&seeded(kind)).unwrap();

        let a = first.dependence(&columns[0], &columns[3]).unwrap();
        let b = second.dependence(&columns[0], &columns[3]).unwrap();
        assert_eq!(a, b, "{} pairwise not reproducible", kind);
        assert!((0.0..=1.0).contains(&a), "{} out of range: {}", kind, a);

        let batch_a = first.dependence_matrix(&columns).unwrap();
        let batch_b = second.dependence_matrix(&columns).unwrap();
        assert_eq!(batch_a, batch_b, "{} batch not reproducible", kind);
        assert!(batch_a.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

#[test]
fn hics_scores_dependent_columns_lower() {
    let x: Vec<f64> = (0..200).map(|i| i as f64).collect();
    let noise = scrambled(200, 119);
    let hics = HiCS::new(50, 0.1, GoodnessOfFit::default(), RandomFactory::new(3)).unwrap();
    let dependent = hics.dependence(&x, &x).unwrap();
    let independent = hics.dependence(&x, &noise).unwrap();
    assert!(dependent < independent, "{} vs {}", dependent, independent);

    let welch = HiCS::new(50, 0.1, GoodnessOfFit::Welch, RandomFactory::new(3)).unwrap();
    let score = welch.dependence(&x, &noise).unwrap();
    assert!((0.0..=1.0).contains(&score));
}

#[test]
fn mcde_scores_dependent_columns_higher() {
    let x: Vec<f64> = (0..100).map(|i| i as f64).collect();
    let noise = scrambled(100, 19);
    let mcde = Mcde::new(100, 0.5, 0.5, MannWhitneyP::new(), RandomFactory::new(5)).unwrap();
    let dependent = mcde.dependence(&x, &x).unwrap();
    let independent = mcde.dependence(&x, &noise).unwrap();
    assert!(dependent > independent, "{} vs {}", dependent, independent);

    let joint = mcde.contrast(&[x.clone(), x.clone(), x]).unwrap();
    assert!((0.0..=1.0).contains(&joint));
}

#[test]
fn monte_carlo_measures_reject_nan() {
    let x = vec![1.0, 2.0, f64::NAN, 4.0, 5.0];
    let y = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    for kind in [MeasureKind::HiCS, MeasureKind::Mcde] {
        let measure = make(&seeded(kind)).unwrap();
        assert!(matches!(measure.dependence(&x, &y), Err(Error::NaNInput)));
        assert!(matches!(
            measure.dependence_matrix(&[y.clone(), x.clone()]),
            Err(Error::NaNInput)
        ));
    }
}

#[test]
fn monte_carlo_measures_on_single_sample() {
    let x = vec![1.0];
    for kind in [MeasureKind::HiCS, MeasureKind::Mcde] {
        let measure = make(&seeded(kind)).unwrap();
        assert!(measure.dependence(&x, &x).unwrap().is_nan());
    }
}

struct AlwaysNaN;

impl GoodnessOfFitTest for AlwaysNaN {
    fn deviation(&self, _: &mut [f64], _: &mut [f64]) -> f64 {
        f64::NAN
    }
}

#[test]
fn hics_gives_up_on_persistent_nan() {
    let x: Vec<f64> = (0..20).map(f64::from).collect();
    let hics = HiCS::new(10, 0.1, AlwaysNaN, RandomFactory::new(1)).unwrap();
    match hics.dependence(&x, &x) {
        Err(Error::TooManyNaNs { retries }) => assert_eq!(retries, mindep::hics::MAX_RETRIES + 1),
        other => panic!("expected TooManyNaNs, got {:?}", other),
    }
}
