use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use iir_conform::design::{ButterConfig, ButterKernel};
use iir_conform::generator::synthesize_input;
use iir_conform::kernel::KernelLifecycle;
use iir_conform::oracle::{OracleConfig, OracleKernel};
use iir_conform::traits::RecursiveFilter1D;
use iir_conform::Sample;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Oracle kernel for a Butterworth low-pass of `order`, rounded to `S`.
fn oracle_kernel<S: Sample>(order: usize) -> OracleKernel<S> {
    let design = ButterKernel::try_new(ButterConfig { order, cutoff: 0.3 })
        .expect("butterworth config should be valid")
        .run_alloc()
        .expect("butterworth design should produce benchmark coefficients");
    let round = |c: &[f64]| -> Vec<S> { c.iter().map(|&v| S::from_f64_rounded(v)).collect() };
    OracleKernel::try_new(OracleConfig {
        a: round(&design.a),
        b: round(&design.b),
    })
    .expect("oracle kernel config should be valid")
}

fn bench_precision<S: Sample>(c: &mut Criterion, name: &str) {
    let signal: Vec<S> = synthesize_input(&mut StdRng::seed_from_u64(0));
    let mut group = c.benchmark_group(name);
    for order in [2usize, 4, 8, 16] {
        let kernel = oracle_kernel::<S>(order);
        group.bench_with_input(BenchmarkId::from_parameter(order), &signal, |bench, sig| {
            bench.iter(|| kernel.run_alloc(black_box(sig.as_slice())))
        });
    }
    group.finish();
}

/// Cost grows with coefficient count times signal length.
fn oracle(c: &mut Criterion) {
    bench_precision::<f32>(c, "oracle_f32");
    bench_precision::<f64>(c, "oracle_f64");
}

criterion_group!(benches, oracle);
criterion_main!(benches);
