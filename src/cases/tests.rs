#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::compare::{compare, Comparator, Expectation};
    use crate::kind::FpKind;
    use crate::value::Value;

    const F32: FpKind = FpKind::F32;

    // =====================================================================
    // Scalar generators
    // =====================================================================

    #[test]
    fn scalar_pair_single_case() {
        // Scenario: addition over [1.0] x [2.0] with the finite filter
        // yields exactly one case whose expectation contains 3.0
        let cases = generate_scalar_pair_cases(
            F32,
            &[1.0],
            &[2.0],
            CaseFilter::Finite,
            &[|k, x, y| k.addition_interval(x, y)],
        )
        .unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].input[0], Value::scalar(F32, 1.0));
        assert_eq!(cases[0].input[1], Value::scalar(F32, 2.0));
        match &cases[0].expected {
            Comparator::Interval(Expectation::Scalar(i)) => assert!(i.contains_value(3.0)),
            other => panic!("expected a scalar interval comparator, got {other:?}"),
        }
    }

    #[test]
    fn cartesian_product_counts() {
        let cases = generate_scalar_pair_cases(
            F32,
            &[1.0, 2.0, 3.0],
            &[10.0, 20.0],
            CaseFilter::All,
            &[|k, x, y| k.multiplication_interval(x, y)],
        )
        .unwrap();
        assert_eq!(cases.len(), 6);
    }

    #[test]
    fn inputs_are_quantized() {
        let cases = generate_scalar_cases(
            F32,
            &[0.1],
            CaseFilter::All,
            &[|k, x| k.negation_interval(x)],
        )
        .unwrap();
        assert_eq!(cases[0].input[0].as_scalar().unwrap(), 0.1f32 as f64);
    }

    #[test]
    fn finite_filter_drops_overflow() {
        // exp overflows at 100, division by zero has undefined accuracy;
        // both are dropped by the finite filter but kept unfiltered
        let ops: &[ScalarOp] = &[|k, x| k.exp_interval(x)];
        let all = generate_scalar_cases(F32, &[1.0, 100.0], CaseFilter::All, ops).unwrap();
        let finite = generate_scalar_cases(F32, &[1.0, 100.0], CaseFilter::Finite, ops).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(finite.len(), 1);

        let div: &[ScalarPairOp] = &[|k, x, y| k.division_interval(x, y)];
        let finite =
            generate_scalar_pair_cases(F32, &[1.0], &[0.0, 2.0], CaseFilter::Finite, div).unwrap();
        assert_eq!(finite.len(), 1);
    }

    #[test]
    fn multi_strategy_ops_produce_any_of() {
        let cases = generate_scalar_triple_cases(
            F32,
            &[2.0],
            &[4.0],
            &[0.5],
            CaseFilter::Finite,
            &[
                |k, x, y, z| k.mix_precise_interval(x, y, z),
                |k, x, y, z| k.mix_imprecise_interval(x, y, z),
            ],
        )
        .unwrap();
        assert_eq!(cases.len(), 1);
        match &cases[0].expected {
            Comparator::AnyOf(alts) => assert_eq!(alts.len(), 2),
            other => panic!("expected an anyOf comparator, got {other:?}"),
        }
        // The produced value 3.0 satisfies the expectation
        let got = Value::scalar(F32, 3.0);
        assert!(compare(&got, &cases[0].expected).matched);
    }

    #[test]
    fn unimplemented_op_aborts_generation() {
        let err = generate_scalar_cases(
            FpKind::Abstract,
            &[1.0],
            CaseFilter::All,
            &[|k, x| k.sin_interval(x)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            crate::ops::OpError::Unimplemented {
                op: "sin",
                kind: FpKind::Abstract
            }
        );
    }

    // =====================================================================
    // Vector and matrix generators
    // =====================================================================

    #[test]
    fn vector_pair_dot_cases() {
        let cases = generate_vector_pair_cases(
            F32,
            &[vec![1.0, 2.0, 3.0]],
            &[vec![4.0, 5.0, 6.0]],
            CaseFilter::Finite,
            &[|k, x, y| k.dot_interval(x, y)],
        )
        .unwrap();
        assert_eq!(cases.len(), 1);
        let got = Value::scalar(F32, 32.0);
        assert!(compare(&got, &cases[0].expected).matched);
    }

    #[test]
    fn vector_to_vector_cases_judge_componentwise() {
        let cases = generate_vector_to_vector_cases(
            F32,
            &[vec![3.0, 4.0]],
            CaseFilter::Finite,
            &[|k, v| k.normalize_interval(v)],
        )
        .unwrap();
        assert_eq!(cases.len(), 1);
        let good = Value::vector(F32, &[0.6, 0.8]);
        assert!(compare(&good, &cases[0].expected).matched);
        let bad = Value::vector(F32, &[0.8, 0.6]);
        assert!(!compare(&bad, &cases[0].expected).matched);
    }

    #[test]
    fn scalar_vector_nested_loops() {
        let cases = generate_scalar_vector_cases(
            F32,
            &[2.0, 3.0],
            &[vec![1.0, 1.0], vec![1.0, 2.0], vec![2.0, 2.0]],
            CaseFilter::Finite,
            &[|k, s, v| k.scalar_vector_multiplication_interval(s, v)],
        )
        .unwrap();
        assert_eq!(cases.len(), 6);
        // First case: 2.0 * (1, 1) = (2, 2)
        let got = Value::vector(F32, &[2.0, 2.0]);
        assert!(compare(&got, &cases[0].expected).matched);
    }

    #[test]
    fn matrix_determinant_cases() {
        let cases = generate_matrix_cases(
            F32,
            &[vec![vec![1.0, 0.0], vec![0.0, 1.0]]],
            CaseFilter::Finite,
            &[|k, m| k.determinant_interval(m)],
        )
        .unwrap();
        assert_eq!(cases.len(), 1);
        let got = Value::scalar(F32, 1.0);
        assert!(compare(&got, &cases[0].expected).matched);
    }

    #[test]
    fn matrix_pair_product_cases() {
        let eye = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let a = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let cases = generate_matrix_pair_cases(
            F32,
            &[a.clone()],
            &[eye],
            CaseFilter::Finite,
            &[|k, x, y| k.matrix_multiplication_interval(x, y)],
        )
        .unwrap();
        assert_eq!(cases.len(), 1);
        let got = Value::matrix(F32, &a);
        assert!(compare(&got, &cases[0].expected).matched);
    }

    #[test]
    fn matrix_vector_and_vector_matrix_cases() {
        let eye = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let cases = generate_matrix_vector_cases(
            F32,
            &[eye.clone()],
            &[vec![5.0, 6.0]],
            CaseFilter::Finite,
            &[|k, m, v| k.matrix_vector_multiplication_interval(m, v)],
        )
        .unwrap();
        let got = Value::vector(F32, &[5.0, 6.0]);
        assert!(compare(&got, &cases[0].expected).matched);

        let cases = generate_vector_matrix_cases(
            F32,
            &[vec![5.0, 6.0]],
            &[eye],
            CaseFilter::Finite,
            &[|k, v, m| k.vector_matrix_multiplication_interval(v, m)],
        )
        .unwrap();
        assert!(compare(&got, &cases[0].expected).matched);
    }

    #[test]
    fn matrix_scalar_both_orders() {
        let m = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let doubled = Value::matrix(F32, &[vec![2.0, 4.0], vec![6.0, 8.0]]);
        let cases = generate_matrix_scalar_cases(
            F32,
            &[m.clone()],
            &[2.0],
            CaseFilter::Finite,
            &[|k, m, s| k.matrix_scalar_multiplication_interval(m, s)],
        )
        .unwrap();
        assert!(compare(&doubled, &cases[0].expected).matched);

        let cases = generate_scalar_matrix_cases(
            F32,
            &[2.0],
            &[m],
            CaseFilter::Finite,
            &[|k, s, m| k.scalar_matrix_multiplication_interval(s, m)],
        )
        .unwrap();
        assert!(compare(&doubled, &cases[0].expected).matched);
    }

    #[test]
    fn finite_filter_applies_to_matrix_expectations() {
        // A singular leading pivot makes the inverse expectation "any";
        // the finite filter drops that case
        let singular_pivot = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let regular = vec![vec![2.0, 0.0], vec![0.0, 2.0]];
        let ops: &[MatrixToMatrixOp] = &[|k, m| k.inverse_interval(m)];
        let all = generate_matrix_to_matrix_cases(
            F32,
            &[singular_pivot.clone(), regular.clone()],
            CaseFilter::All,
            ops,
        )
        .unwrap();
        let finite = generate_matrix_to_matrix_cases(
            F32,
            &[singular_pivot, regular],
            CaseFilter::Finite,
            ops,
        )
        .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(finite.len(), 1);
    }

    // =====================================================================
    // Serialization and cache
    // =====================================================================

    #[test]
    fn cases_round_trip_through_plain_data() {
        let cases = generate_scalar_pair_cases(
            F32,
            &[0.1, -0.0],
            &[0.2],
            CaseFilter::All,
            &[|k, x, y| k.addition_interval(x, y)],
        )
        .unwrap();
        for case in &cases {
            let s = case.to_serialized();
            let json = serde_json::to_string(&s).unwrap();
            let back: SerializedCase = serde_json::from_str(&json).unwrap();
            assert_eq!(back, s);
            assert_eq!(back.to_case(), *case);
        }
    }

    #[test]
    fn cache_builds_once_per_key() {
        let mut cache = CaseCache::new();
        let build = || {
            generate_scalar_cases(F32, &[1.0, 2.0], CaseFilter::All, &[|k: FpKind, x| {
                k.abs_interval(x)
            }])
        };
        let key = CaseKey::new("abs", F32, CaseFilter::All);
        assert_eq!(cache.get_or_build(key.clone(), build).unwrap().len(), 2);
        assert_eq!(cache.len(), 1);
        // Cached: the builder must not run again
        let n = cache
            .get_or_build(key, || panic!("case array should have been cached"))
            .unwrap()
            .len();
        assert_eq!(n, 2);

        // Distinct filter is a distinct key
        let other = CaseKey::new("abs", F32, CaseFilter::Finite);
        assert!(cache.get_or_build(other, build).is_ok());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cache_does_not_cache_errors() {
        let mut cache = CaseCache::new();
        let key = CaseKey::new("sin", FpKind::Abstract, CaseFilter::All);
        let err = cache.get_or_build(key.clone(), || {
            generate_scalar_cases(
                FpKind::Abstract,
                &[1.0],
                CaseFilter::All,
                &[|k, x| k.sin_interval(x)],
            )
        });
        assert!(err.is_err());
        assert!(cache.is_empty());
        // A later successful build under the same key goes through
        let ok = cache.get_or_build(key, || {
            generate_scalar_cases(FpKind::Abstract, &[1.0], CaseFilter::All, &[|k, x| {
                k.abs_interval(x)
            }])
        });
        assert_eq!(ok.unwrap().len(), 1);
    }
}
