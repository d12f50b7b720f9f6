use api_bench_stats::testing::descriptive::describe;
use api_bench_stats::testing::effect::{calculate_cohens_d, mean_difference_interval};
use api_bench_stats::testing::inference::parametric::t_test;
use api_bench_stats::testing::inference::{select_test, SampleStatTests};
use api_bench_stats::testing::inference::normality::normality_test;
use api_bench_stats::testing::{Alternative, TTestType, TestMethod, TestResult};
use approx::assert_relative_eq;
use proptest::prelude::*;

#[cfg(test)]
mod quick_test {
    use super::*;

    #[test]
    fn test_student_on_latency_slices() {
        // REST [210, 220, 230] -> mean=220, GraphQL [150, 160, 170] -> mean=160
        // Both variances are 100, so t = 60 / sqrt(100 * 2/3)
        let rest = [210.0, 220.0, 230.0];
        let graphql = [150.0, 160.0, 170.0];

        let result: TestResult<f64> =
            t_test(&rest, &graphql, TTestType::Student, Alternative::TwoSided).unwrap();

        assert_relative_eq!(result.statistic, 7.348469, epsilon = 1e-5);
        assert!(result.p_value < 0.01, "p = {}", result.p_value);
        assert_eq!(result.degrees_of_freedom, Some(4.0));
    }

    #[test]
    fn test_identical_latencies() {
        // [5, 5, 5] twice: no spread, no difference
        let a = [5.0, 5.0, 5.0];
        for test_type in [TTestType::Student, TTestType::Welch] {
            let result = t_test(&a, &a, test_type, Alternative::TwoSided).unwrap();
            assert_eq!(result.statistic, 0.0);
            assert_eq!(result.p_value, 1.0);
        }

        let h = a[..]
            .compare_greater(&a, TestMethod::TTest(TTestType::Welch), 0.05)
            .unwrap();
        assert_eq!(h.p_value, 0.5);
        assert!(!h.reject_null);
    }

    #[test]
    fn test_slow_vs_fast_endpoint() {
        // REST latencies [250, 240, 260, 250, 250] vs GraphQL [120, 110, 130, 120, 120]
        let rest = [250.0, 240.0, 260.0, 250.0, 250.0];
        let graphql = [120.0, 110.0, 130.0, 120.0, 120.0];

        let result = t_test(&rest, &graphql, TTestType::Welch, Alternative::Greater).unwrap();
        assert!(result.p_value < 0.001, "Expected highly significant p-value");
        assert!(result.statistic > 5.0, "Expected large t-statistic");
    }

    #[test]
    fn test_cached_vs_live_responses() {
        // A cached endpoint answering in constant time against live responses
        let live = [5.0, 4.0, 6.0, 5.0, 5.0];
        let cached = [0.0; 5];

        let result = t_test(&live, &cached, TTestType::Welch, Alternative::Greater).unwrap();
        // SE = sqrt(0.5 / 5), df = 4
        assert_relative_eq!(result.statistic, 5.0 / 0.1_f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(result.degrees_of_freedom.unwrap(), 4.0, epsilon = 1e-9);
        assert!(result.p_value < 0.001);
    }

    #[test]
    fn test_subtle_difference() {
        let a = [3.1, 3.2, 3.0, 3.1, 3.0];
        let b = [2.9, 2.8, 3.0, 2.9, 3.0];

        let result = t_test(&a, &b, TTestType::Student, Alternative::Greater).unwrap();
        // diff 0.16, pooled variance 0.007, t = 0.16 / sqrt(0.007 * 0.4)
        assert_relative_eq!(result.statistic, 3.0237, epsilon = 1e-3);
        assert!(result.p_value < 0.05);
        assert!(result.p_value > 0.001);
    }
}

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn constant_equal_groups_do_not_crash() {
        let a = [10.0; 5];
        let b = [10.0; 5];

        let na = normality_test(&a, 0.05).unwrap();
        let nb = normality_test(&b, 0.05).unwrap();
        let method = select_test(Some(&na), Some(&nb));
        assert_eq!(method, TestMethod::TTest(TTestType::Welch));

        let h = a[..].compare_greater(&b, method, 0.05).unwrap();
        assert!(!h.reject_null);
        assert!(calculate_cohens_d(&a, &b).unwrap().is_nan());
    }

    #[test]
    fn clearly_separated_normal_groups() {
        let a = [100.0, 102.0, 98.0, 101.0, 99.0];
        let b = [50.0, 52.0, 48.0, 51.0, 49.0];

        let na = normality_test(&a, 0.05).unwrap();
        let nb = normality_test(&b, 0.05).unwrap();
        assert!(na.is_normal && nb.is_normal);

        let method = select_test(Some(&na), Some(&nb));
        let h = a[..].compare_greater(&b, method, 0.05).unwrap();
        assert_eq!(h.test_name(), "Welch t-test");
        assert!(h.reject_null);
        assert!(calculate_cohens_d(&a, &b).unwrap() > 3.0);
    }

    #[test]
    fn tiny_group_goes_non_parametric() {
        let a = [300.0, 320.0];
        let b: Vec<f64> = (0..30).map(|i| 100.0 + (i * 7 % 30) as f64).collect();

        let na = normality_test(&a, 0.05).ok();
        let nb = normality_test(&b, 0.05).ok();
        assert!(na.is_none());

        let method = select_test(na.as_ref(), nb.as_ref());
        assert_eq!(method, TestMethod::MannWhitney);
        let h = a[..].compare_greater(&b, method, 0.05).unwrap();
        // Both REST values exceed all 30 GraphQL values: P(U = 60) = 1 / C(32, 2)
        assert_relative_eq!(h.p_value, 1.0 / 496.0, epsilon = 1e-12);
        assert!(h.reject_null);
    }

    #[test]
    fn interval_agrees_with_two_sided_test_for_equal_sizes() {
        let cases: [([f64; 6], [f64; 6]); 3] = [
            ([12.0, 14.0, 11.0, 13.0, 15.0, 12.5], [12.5, 13.0, 11.5, 14.0, 12.0, 13.5]),
            ([20.0, 22.0, 21.0, 23.0, 19.0, 21.5], [12.0, 14.0, 11.0, 13.0, 15.0, 12.5]),
            ([5.0, 9.0, 2.0, 8.0, 6.0, 4.0], [6.0, 3.0, 7.0, 5.0, 8.0, 2.0]),
        ];

        for (a, b) in cases.iter() {
            let ci = mean_difference_interval(a, b, 0.95).unwrap();
            let test = t_test(a, b, TTestType::Student, Alternative::TwoSided).unwrap();
            assert_eq!(ci.contains_zero(), !test.is_significant(0.05), "a = {:?}, b = {:?}", a, b);
        }
    }
}

proptest! {
    #[test]
    fn quartiles_are_ordered(data in prop::collection::vec(-1.0e6..1.0e6f64, 1..60)) {
        let s = describe(&data).unwrap();
        prop_assert!(s.q1 <= s.median);
        prop_assert!(s.median <= s.q3);
        prop_assert!(s.iqr >= 0.0);
        prop_assert!(s.min <= s.q1 && s.q3 <= s.max);
    }

    #[test]
    fn variance_is_squared_std(data in prop::collection::vec(-1.0e3..1.0e3f64, 2..60)) {
        let s = describe(&data).unwrap();
        prop_assert!((s.variance - s.std_dev * s.std_dev).abs() <= 1e-9 * s.variance.max(1.0));
    }

    #[test]
    fn cohens_d_sign_follows_means(
        a in prop::collection::vec(0.0..100.0f64, 2..20),
        shift in 1.0..50.0f64,
    ) {
        let b: Vec<f64> = a.iter().map(|v| v - shift).collect();
        let d = calculate_cohens_d(&a, &b).unwrap();
        prop_assert!(d > 0.0);
    }

    #[test]
    fn selection_is_pure(
        w1 in 0.5..1.0f64,
        p1 in 0.0..1.0f64,
        w2 in 0.5..1.0f64,
        p2 in 0.0..1.0f64,
    ) {
        use api_bench_stats::testing::inference::normality::NormalityVerdict;
        let a = NormalityVerdict::from_test(w1, p1, 0.05);
        let b = NormalityVerdict::from_test(w2, p2, 0.05);
        let first = select_test(Some(&a), Some(&b));
        prop_assert_eq!(first, select_test(Some(&a), Some(&b)));
        let expected = if p1 > 0.05 && p2 > 0.05 {
            TestMethod::TTest(TTestType::Welch)
        } else {
            TestMethod::MannWhitney
        };
        prop_assert_eq!(first, expected);
    }
}
