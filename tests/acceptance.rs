//! End-to-end flow: select a precision, generate cases from raw input
//! ranges, judge produced runtime values against the expectations, and
//! round-trip the generated cases through their plain-data form.

use fpbounds::{
    cases, compare, CaseCache, CaseFilter, CaseKey, Comparator, FpKind, SerializedCase, Value,
};

#[test]
fn addition_sweep_end_to_end() {
    let kind = FpKind::F32;
    let xs = [-2.0, -0.5, 0.0, 0.1, 1.0, 1.0e3];
    let ys = [-1.0, 0.2, 2.0];

    let generated = cases::generate_scalar_pair_cases(
        kind,
        &xs,
        &ys,
        CaseFilter::Finite,
        &[|k, x, y| k.addition_interval(x, y)],
    )
    .unwrap();
    assert_eq!(generated.len(), xs.len() * ys.len());

    // A conforming "implementation": compute at f32 from the quantized
    // inputs, exactly what a GPU would be allowed to produce.
    for case in &generated {
        let a = case.input[0].as_scalar().unwrap();
        let b = case.input[1].as_scalar().unwrap();
        let produced = (a as f32 + b as f32) as f64;
        let verdict = compare(&Value::scalar(kind, produced), &case.expected);
        assert!(
            verdict.matched,
            "sum of {a} and {b}: got {}, expected {}",
            verdict.got, verdict.expected
        );
    }

    // A value off by far more than the acceptance interval must fail.
    let case = &generated[0];
    let a = case.input[0].as_scalar().unwrap();
    let b = case.input[1].as_scalar().unwrap();
    let wrong = Value::scalar(kind, a + b + 0.5);
    assert!(!compare(&wrong, &case.expected).matched);
}

#[test]
fn division_cases_accept_either_rounding_style() {
    let kind = FpKind::F32;
    let generated = cases::generate_scalar_pair_cases(
        kind,
        &[1.0, -7.5, 100.0],
        &[3.0, -0.125],
        CaseFilter::Finite,
        &[|k, x, y| k.division_interval(x, y)],
    )
    .unwrap();

    for case in &generated {
        let a = case.input[0].as_scalar().unwrap();
        let b = case.input[1].as_scalar().unwrap();
        // Both the narrow and the widened-then-rounded quotient are
        // within the 2.5 ULP envelope.
        for produced in [(a as f32 / b as f32) as f64, (a / b) as f32 as f64] {
            assert!(
                compare(&Value::scalar(kind, produced), &case.expected).matched,
                "{a} / {b} -> {produced}"
            );
        }
    }
}

#[test]
fn f16_sweep_quantizes_and_judges() {
    let kind = FpKind::F16;
    let generated = cases::generate_scalar_cases(
        kind,
        &[0.1, 1.0, -2.5],
        CaseFilter::Finite,
        &[|k, x| k.abs_interval(x)],
    )
    .unwrap();
    for case in &generated {
        let x = case.input[0].as_scalar().unwrap();
        // Inputs were quantized to f16 at generation time
        assert_eq!(kind.quantize(x), x);
        let produced = Value::scalar(kind, x.abs());
        assert!(compare(&produced, &case.expected).matched);
    }
}

#[test]
fn generated_cases_survive_disk_format() {
    let generated = cases::generate_scalar_triple_cases(
        FpKind::F32,
        &[2.0, 0.1],
        &[4.0],
        &[0.5, -0.0],
        CaseFilter::All,
        &[
            |k, x, y, z| k.mix_precise_interval(x, y, z),
            |k, x, y, z| k.mix_imprecise_interval(x, y, z),
        ],
    )
    .unwrap();

    let json = serde_json::to_string(
        &generated.iter().map(|c| c.to_serialized()).collect::<Vec<_>>(),
    )
    .unwrap();
    let reloaded: Vec<SerializedCase> = serde_json::from_str(&json).unwrap();

    assert_eq!(reloaded.len(), generated.len());
    for (loaded, original) in reloaded.iter().zip(&generated) {
        assert_eq!(loaded.to_case(), *original);
        // Serializing the reloaded case is byte-identical
        assert_eq!(
            serde_json::to_string(loaded).unwrap(),
            serde_json::to_string(&original.to_serialized()).unwrap()
        );
    }

    // Expectations still judge the same after the round trip
    let case = reloaded[0].to_case();
    let got = Value::scalar(FpKind::F32, 3.0);
    assert!(compare(&got, &case.expected).matched);
    match &case.expected {
        Comparator::AnyOf(alts) => assert_eq!(alts.len(), 2),
        other => panic!("expected anyOf after round trip, got {other:?}"),
    }
}

#[test]
fn cache_keyed_by_op_kind_and_filter() {
    let mut cache = CaseCache::new();

    for kind in [FpKind::F16, FpKind::F32] {
        let n = cache
            .get_or_build(CaseKey::new("multiplication", kind, CaseFilter::Finite), || {
                cases::generate_scalar_pair_cases(
                    kind,
                    &[0.5, 2.0],
                    &[4.0],
                    CaseFilter::Finite,
                    &[|k, x, y| k.multiplication_interval(x, y)],
                )
            })
            .unwrap()
            .len();
        assert_eq!(n, 2);
    }
    assert_eq!(cache.len(), 2);

    // Same key again: served without rebuilding
    let n = cache
        .get_or_build(
            CaseKey::new("multiplication", FpKind::F32, CaseFilter::Finite),
            || panic!("must come from the cache"),
        )
        .unwrap()
        .len();
    assert_eq!(n, 2);
}

#[test]
fn abstract_precision_rejects_transcendental_sweeps() {
    let err = cases::generate_scalar_cases(
        FpKind::Abstract,
        &[0.5],
        CaseFilter::All,
        &[|k, x| k.cos_interval(x)],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "operation `cos` is not implemented for abstract");

    // The correctly-rounded family still works at abstract precision
    let ok = cases::generate_scalar_cases(
        FpKind::Abstract,
        &[0.5],
        CaseFilter::All,
        &[|k, x| k.floor_interval(x)],
    )
    .unwrap();
    assert_eq!(ok.len(), 1);
}
