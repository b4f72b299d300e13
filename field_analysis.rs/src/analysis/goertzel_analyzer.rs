use std::f64::consts::TAU;

use rustfft::num_complex::Complex64;

use crate::{
	analysis::{HarmonicSpectrum, SpatialDftCtx},
	AnalysisError,
};

/// One evaluated DFT bin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BinPoint {
	pub bin_idx: usize,
	pub c: Complex64,
}

impl BinPoint {
	/// Single-sided amplitude of the bin.
	#[must_use]
	pub fn magnitude(&self) -> f64 {
		self.c.norm()
	}
}

/// Evaluates a handful of DFT bins with the Goertzel recurrence.
///
/// Cheaper than a full FFT when only the odd harmonics of the fundamental
/// are needed, and a useful cross-check of the spectral estimator.
#[derive(Debug, Clone)]
pub struct GoertzelAnalyzer {
	n_of_samples: usize,
	bins: Vec<usize>,
	coefficients: Vec<(f64, Complex64)>,
	cur_transform_bins: Vec<BinPoint>,
}

impl GoertzelAnalyzer {
	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn new(n_of_samples: usize, mut bins: Vec<usize>) -> Self {
		bins.sort_unstable();
		bins.dedup();
		Self {
			// Pre-computing coefficients
			coefficients: bins
				.iter()
				.map(|&bin| {
					let ω = TAU * bin as f64 / n_of_samples as f64;
					(2.0 * ω.cos(), Complex64::new(ω.cos(), ω.sin()))
				})
				.collect(),
			cur_transform_bins: vec![BinPoint::default(); bins.len()],
			bins,
			n_of_samples,
		}
	}

	/// An analyzer for the odd-harmonic bins of a trace holding `nperiods` periods.
	#[must_use]
	pub fn odd_harmonics(n_of_samples: usize, nperiods: usize) -> Self {
		let bins = SpatialDftCtx::new(0., n_of_samples)
			.odd_harmonic_bins(nperiods)
			.collect();
		Self::new(n_of_samples, bins)
	}

	#[must_use]
	pub fn bins(&self) -> &[usize] {
		&self.bins
	}

	#[must_use]
	pub const fn n_of_samples(&self) -> usize {
		self.n_of_samples
	}

	/// Evaluate the configured bins of `field`.
	///
	/// The returned slice is sorted by bin and normalized like a single-sided spectrum.
	///
	/// # Errors
	/// - [`AnalysisError::InputShape`] if `field` doesn't have the configured length.
	#[allow(clippy::cast_precision_loss)]
	pub fn analyze_bins(&mut self, field: &[f64]) -> Result<&[BinPoint], AnalysisError> {
		if field.len() != self.n_of_samples {
			return Err(AnalysisError::InputShape {
				positions: self.n_of_samples,
				field: field.len(),
			});
		}

		let normalization_factor = 2.0 / self.n_of_samples as f64;

		for ((&bin, coeff), bin_point) in self
			.bins
			.iter()
			.zip(self.coefficients.iter())
			.zip(self.cur_transform_bins.iter_mut())
		{
			let mut z1 = 0.0;
			let mut z2 = 0.0;

			for sample in field {
				let z0 = sample + coeff.0 * z1 - z2;
				z2 = z1;
				z1 = z0;
			}

			*bin_point = BinPoint {
				c: Complex64::new(z1 * coeff.1.re - z2, z1 * coeff.1.im) * normalization_factor,
				bin_idx: bin,
			};
		}

		Ok(&self.cur_transform_bins)
	}

	/// Magnitudes of the configured bins, as a harmonic spectrum.
	///
	/// Meaningful when the analyzer was built with [`GoertzelAnalyzer::odd_harmonics`].
	///
	/// # Errors
	/// See [`GoertzelAnalyzer::analyze_bins`].
	pub fn spectrum(&mut self, field: &[f64]) -> Result<HarmonicSpectrum, AnalysisError> {
		Ok(self
			.analyze_bins(field)?
			.iter()
			.map(BinPoint::magnitude)
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::TAU;

	use crate::analysis::SpectralBeffEstimator;

	use super::*;

	#[test]
	#[allow(clippy::cast_precision_loss)]
	fn cross_check_goertzel_and_fft() {
		const N: usize = 360;
		let period = 20.;
		let z: Vec<f64> = (0..N).map(|i| i as f64 * 3. * period / N as f64).collect();
		let by: Vec<f64> = z
			.iter()
			.map(|z| {
				-1.1 * (TAU * z / period).sin()
					- 0.2 * (3. * TAU * z / period).sin()
					+ 0.05 * (5. * TAU * z / period).cos()
			})
			.collect();

		let mut goertzel = GoertzelAnalyzer::odd_harmonics(N, 3);
		let goertzel_spectrum = goertzel.spectrum(&by).unwrap();
		let fft_spectrum = SpectralBeffEstimator::new()
			.analyze(&z, &by, Some(3))
			.unwrap()
			.into_spectrum();

		assert_eq!(goertzel_spectrum.len(), fft_spectrum.len());
		for (g, f) in goertzel_spectrum.iter().zip(fft_spectrum.iter()) {
			assert!((g - f).abs() < 1e-9, "goertzel {g} and fft {f} should match");
		}
		assert!((goertzel_spectrum[0] - 1.1).abs() < 1e-9);
		assert!((goertzel_spectrum[1] - 0.2).abs() < 1e-9);
		assert!((goertzel_spectrum[2] - 0.05).abs() < 1e-9);
	}

	#[test]
	fn test_bins_are_sorted() {
		let goertzel = GoertzelAnalyzer::new(64, vec![9, 3, 9, 1]);
		assert_eq!(goertzel.bins(), &[1, 3, 9]);
		assert_eq!(goertzel.n_of_samples(), 64);
	}

	#[test]
	fn test_length_mismatch() {
		let mut goertzel = GoertzelAnalyzer::odd_harmonics(16, 1);
		assert_eq!(
			goertzel.analyze_bins(&[0.; 15]).unwrap_err(),
			AnalysisError::InputShape {
				positions: 16,
				field: 15
			}
		);
	}
}
