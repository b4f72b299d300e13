mod harmonic;
pub use harmonic::*;

mod spatial_dft_ctx;
pub use spatial_dft_ctx::*;

mod spectral_estimator;
pub use spectral_estimator::*;

mod goertzel_analyzer;
pub use goertzel_analyzer::*;

mod least_squares;
pub use least_squares::*;

mod harmonic_fit;
pub use harmonic_fit::*;

mod field_integrals;
pub use field_integrals::*;

mod summary;
pub use summary::*;

#[cfg(test)]
mod tests {
	use std::f64::consts::TAU;

	use crate::{
		analysis::{estimate_beff_fit, estimate_beff_spectral},
		FieldVector,
	};

	#[test]
	#[allow(clippy::cast_precision_loss)]
	fn cross_check_spectral_and_fit() {
		const PERIOD: f64 = 16.;
		const SAMPLES_PER_PERIOD: usize = 64;
		const NPERIODS: usize = 2;

		let n = SAMPLES_PER_PERIOD * NPERIODS;
		let z: Vec<f64> = (0..n)
			.map(|i| i as f64 * PERIOD / SAMPLES_PER_PERIOD as f64)
			.collect();
		let b: Vec<FieldVector> = z
			.iter()
			.map(|z| {
				FieldVector::vertical(
					-0.7 * (TAU * z / PERIOD).sin() - 0.08 * (3. * TAU * z / PERIOD).sin(),
				)
			})
			.collect();
		let by: Vec<f64> = b.iter().map(|v| v.y).collect();

		let spectrum = estimate_beff_spectral(&z, &by, Some(NPERIODS), true).unwrap();
		let spectrum = spectrum.harmonics().unwrap();
		let (fit_beff, coefficients) = estimate_beff_fit(&z, &b, PERIOD, 2).unwrap();

		assert!((spectrum[0] - coefficients[0]).abs() < 1e-6);
		assert!((spectrum[1] - coefficients[1]).abs() < 1e-6);
		assert!(
			(spectrum.beff() - fit_beff).abs() < 1e-3,
			"spectral and fitted effective fields should agree"
		);
	}
}
