use criterion::{criterion_group, criterion_main, Criterion};

use fpbounds::{cases, CaseFilter, FpKind};

fn scalar_ops(c: &mut Criterion) {
    let mut g = c.benchmark_group("scalar_intervals");

    g.bench_function("addition_f32", |b| {
        b.iter(|| {
            std::hint::black_box(FpKind::F32.addition_interval(
                std::hint::black_box(0.1),
                std::hint::black_box(0.2),
            ))
        })
    });

    g.bench_function("division_f32", |b| {
        b.iter(|| {
            std::hint::black_box(FpKind::F32.division_interval(
                std::hint::black_box(1.0),
                std::hint::black_box(3.0),
            ))
        })
    });

    g.bench_function("tan_f32", |b| {
        b.iter(|| std::hint::black_box(FpKind::F32.tan_interval(std::hint::black_box(0.5))))
    });

    g.finish();
}

fn matrix_ops(c: &mut Criterion) {
    let mut g = c.benchmark_group("matrix_intervals");

    let m3 = vec![
        vec![2.0, 1.0, 0.0],
        vec![1.0, 3.0, 1.0],
        vec![0.0, 1.0, 4.0],
    ];
    let m4 = vec![
        vec![2.0, 1.0, 0.0, 0.0],
        vec![1.0, 3.0, 1.0, 0.0],
        vec![0.0, 1.0, 4.0, 1.0],
        vec![0.0, 0.0, 1.0, 5.0],
    ];

    g.bench_function("determinant_3x3", |b| {
        b.iter(|| std::hint::black_box(FpKind::F32.determinant_interval(std::hint::black_box(&m3))))
    });

    g.bench_function("determinant_4x4", |b| {
        b.iter(|| std::hint::black_box(FpKind::F32.determinant_interval(std::hint::black_box(&m4))))
    });

    g.bench_function("inverse_4x4", |b| {
        b.iter(|| std::hint::black_box(FpKind::F32.inverse_interval(std::hint::black_box(&m4))))
    });

    g.finish();
}

fn case_generation(c: &mut Criterion) {
    let mut g = c.benchmark_group("case_generation");

    let xs: Vec<f64> = (0..32).map(|i| i as f64 * 0.37 - 5.0).collect();
    let ys: Vec<f64> = (0..32).map(|i| i as f64 * 0.11 + 0.5).collect();

    g.bench_function("scalar_pair_1024_cases", |b| {
        b.iter(|| {
            cases::generate_scalar_pair_cases(
                FpKind::F32,
                std::hint::black_box(&xs),
                std::hint::black_box(&ys),
                CaseFilter::Finite,
                &[|k, x, y| k.multiplication_interval(x, y)],
            )
        })
    });

    g.finish();
}

criterion_group!(benches, scalar_ops, matrix_ops, case_generation);
criterion_main!(benches);
