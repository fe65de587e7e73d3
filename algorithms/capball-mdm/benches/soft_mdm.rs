use capball::traits::Fit;
use capball_datasets::generate;
use capball_mdm::SoftMdm;
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use ndarray::Array1;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn soft_mdm_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(40);
    let sizes = vec![(100, 2), (1000, 3), (5000, 10)];

    let mut benchmark = c.benchmark_group("soft_mdm");
    benchmark.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for (npoints, nfeatures) in sizes {
        let lower = Array1::from_elem(nfeatures, -30.);
        let upper = Array1::from_elem(nfeatures, 30.);
        let dataset = generate::uniform_box(npoints, &lower, &upper, &mut rng);

        for &outliers in &[1usize, 10] {
            // leave roughly `outliers` points outside of the ball
            let capacity = 1. / (npoints - outliers) as f64;
            benchmark.bench_function(
                BenchmarkId::new(format!("capped_{}", outliers), npoints),
                |bencher| {
                    bencher.iter(|| {
                        SoftMdm::params(black_box(capacity))
                            .tolerance(black_box(1e-6))
                            .record_weights(false)
                            .fit(&dataset)
                            .unwrap()
                    });
                },
            );
        }
    }

    benchmark.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = soft_mdm_bench
}
criterion_main!(benches);
