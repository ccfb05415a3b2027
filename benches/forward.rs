use adgraph::{Config, Mode};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

mod common;
use common::*;

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [2, 10, 100] {
        let x = variables(n);
        group.bench_with_input(BenchmarkId::new("rosenbrock", n), &x, |b, x| {
            b.iter(|| black_box(rosenbrock(black_box(x))))
        });
    }
    group.finish();
}

fn bench_forward_gradient(c: &mut Criterion) {
    let config = Config::default().with_mode(Mode::Forward);
    let mut group = c.benchmark_group("forward_gradient");
    for n in [2, 10, 100] {
        let f = rosenbrock(&variables(n));
        let p = point(n);
        group.bench_with_input(BenchmarkId::new("rosenbrock", n), &p, |b, p| {
            b.iter(|| {
                f.compute_with(black_box(p.iter().cloned()), &config).unwrap();
                black_box(f.derivative().unwrap())
            })
        });

        let g = nn_layer(&variables(n));
        group.bench_with_input(BenchmarkId::new("nn_layer", n), &p, |b, p| {
            b.iter(|| {
                g.compute_with(black_box(p.iter().cloned()), &config).unwrap();
                black_box(g.derivative().unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_forward_gradient);
criterion_main!(benches);
