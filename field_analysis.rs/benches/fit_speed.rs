use std::{f64::consts::TAU, time::Duration};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use field_analysis::{analysis::HarmonicFitter, FitConfig, UniformGrid};

fn bench_harmonic_fit(c: &mut Criterion) {
	use rand::prelude::*;
	let mut rng = rand::thread_rng();
	let period = 18.;
	let positions = UniformGrid::new((-period, period), 501).points();
	let field: Vec<f64> = positions
		.iter()
		.map(|z| {
			-(TAU * z / period).sin() - 0.1 * (3. * TAU * z / period).sin()
				+ rng.gen_range(-0.01..=0.01)
		})
		.collect();

	let mut group = c.benchmark_group("Harmonic fit");

	for max_harmonics in [1, 3, 7] {
		let fitter = HarmonicFitter::new(FitConfig {
			max_harmonics,
			..FitConfig::default()
		});
		group.bench_function(BenchmarkId::new("Levenberg-Marquardt", max_harmonics), |b| {
			b.iter(|| {
				black_box(fitter.fit(&positions, &field, period).map(|f| f.beff()).ok());
			});
		});
	}

	group.finish();
}

criterion_group! {
  name = benches;
  config = Criterion::default().measurement_time(Duration::from_secs(8));
  targets = bench_harmonic_fit
}
criterion_main!(benches);
