use mindep::rank::{normalized_ranks, ranks};
use mindep::triangle::{index, lower_triangular_len, pair};
use mindep::{
    Dependence, DistanceCorrelation, HoeffdingsD, JensenShannonEquiwidth,
    MutualInformationEquiwidth, Pearson, Slope, SlopeInversion, Spearman, Surfing,
};
use proptest::prelude::*;

fn column_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (5usize..40).prop_flat_map(|n| {
        (
            prop::collection::vec(-100.0f64..100.0, n),
            prop::collection::vec(-100.0f64..100.0, n),
        )
    })
}

/// Integer columns over `0..=39`: once both span the full range, scaled
/// differences fall exactly on slope bucket edges.
fn integer_column_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (5usize..40).prop_flat_map(|n| {
        (
            prop::collection::vec(0u8..40, n),
            prop::collection::vec(0u8..40, n),
        )
            .prop_map(|(mut x, mut y)| {
                x[0] = 0;
                x[1] = 39;
                y[0] = 0;
                y[1] = 39;
                let widen = |v: Vec<u8>| v.into_iter().map(f64::from).collect::<Vec<f64>>();
                (widen(x), widen(y))
            })
    })
}

proptest! {
    #[test]
    fn prop_correlations_bounded_and_symmetric((x, y) in column_pair()) {
        for score in [
            (Pearson.dependence(&x, &y).unwrap(), Pearson.dependence(&y, &x).unwrap()),
            (Spearman.dependence(&x, &y).unwrap(), Spearman.dependence(&y, &x).unwrap()),
        ] {
            prop_assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(&score.0));
            prop_assert!((score.0 - score.1).abs() <= 1e-12);
        }
    }

    #[test]
    fn prop_distance_correlation_bounded((x, y) in column_pair()) {
        let a = DistanceCorrelation.dependence(&x, &y).unwrap();
        let b = DistanceCorrelation.dependence(&y, &x).unwrap();
        prop_assert!((0.0..=1.0 + 1e-9).contains(&a));
        prop_assert!((a - b).abs() <= 1e-9);
    }

    #[test]
    fn prop_neighborhood_and_rank_measures_symmetric((x, y) in column_pair()) {
        let d = HoeffdingsD.dependence(&x, &y).unwrap();
        prop_assert!(d <= 1.0);
        prop_assert!((d - HoeffdingsD.dependence(&y, &x).unwrap()).abs() <= 1e-12);

        let s = Surfing.dependence(&x, &y).unwrap();
        prop_assert!(s >= 0.0);
        prop_assert!((s - Surfing.dependence(&y, &x).unwrap()).abs() <= 1e-12);
    }

    #[test]
    fn prop_histogram_measures_nonnegative((x, y) in column_pair()) {
        let mi = MutualInformationEquiwidth.dependence(&x, &y).unwrap();
        let mi_rev = MutualInformationEquiwidth.dependence(&y, &x).unwrap();
        prop_assert!((-1e-12..=1.0 + 1e-9).contains(&mi));
        prop_assert!((mi - mi_rev).abs() <= 1e-9);

        let js = JensenShannonEquiwidth.dependence(&x, &y).unwrap();
        let js_rev = JensenShannonEquiwidth.dependence(&y, &x).unwrap();
        prop_assert!(js >= -1e-12);
        prop_assert!((js - js_rev).abs() <= 1e-9);
    }

    #[test]
    fn prop_slope_scores_in_unit_interval((x, y) in column_pair()) {
        let s = Slope.dependence(&x, &y).unwrap();
        let inv = SlopeInversion.dependence(&x, &y).unwrap();
        prop_assert!((-1e-12..=1.0 + 1e-12).contains(&s));
        prop_assert!(inv >= s - 1e-12);
        prop_assert!(inv <= 1.0 + 1e-12);
        prop_assert_eq!(s, Slope.dependence(&y, &x).unwrap());
        prop_assert_eq!(inv, SlopeInversion.dependence(&y, &x).unwrap());
    }

    #[test]
    fn prop_slope_symmetric_on_bucket_edges((x, y) in integer_column_pair()) {
        prop_assert_eq!(Slope.dependence(&x, &y).unwrap(), Slope.dependence(&y, &x).unwrap());
        prop_assert_eq!(
            SlopeInversion.dependence(&x, &y).unwrap(),
            SlopeInversion.dependence(&y, &x).unwrap()
        );
        let js = JensenShannonEquiwidth.dependence(&x, &y).unwrap();
        let js_rev = JensenShannonEquiwidth.dependence(&y, &x).unwrap();
        prop_assert!((js - js_rev).abs() <= 1e-9);
    }

    #[test]
    fn prop_ranks_preserve_total(data in prop::collection::vec(-5i32..5, 1..50)) {
        // Small integer range forces ties.
        let values: Vec<f64> = data.iter().map(|&v| f64::from(v)).collect();
        let n = values.len();
        let r = ranks(&values, n);
        let total: f64 = r.iter().sum();
        prop_assert!((total - (n * (n + 1)) as f64 / 2.0).abs() <= 1e-9);
        for i in 0..n {
            for j in 0..n {
                if values[i] < values[j] {
                    prop_assert!(r[i] < r[j]);
                } else if values[i] == values[j] {
                    prop_assert_eq!(r[i], r[j]);
                }
            }
        }

        let nr = normalized_ranks(&values, n);
        prop_assert!(nr.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn prop_triangle_index_roundtrip(dims in 2usize..60) {
        for o in 0..lower_triangular_len(dims) {
            let (x, y) = pair(o);
            prop_assert!(x < y && y < dims);
            prop_assert_eq!(index(x, y), o);
        }
    }
}
