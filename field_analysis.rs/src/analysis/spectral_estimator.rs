use math_utils::{grid::is_uniformly_spaced, stats::arg_max};
use rustfft::{
	num_complex::{Complex, Complex64},
	FftPlanner,
};
use tracing::{debug, warn};

use crate::{
	analysis::{HarmonicSpectrum, SpatialDftCtx},
	error::check_lengths,
	AnalysisError,
};

/// Relative spacing deviation above which positions are reported as non-uniform.
pub const UNIFORMITY_TOLERANCE: f64 = 1e-6;

/// What [`estimate_beff_spectral`] hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum SpectralEstimate {
	Beff(f64),
	Harmonics(HarmonicSpectrum),
}

impl SpectralEstimate {
	/// The effective field, aggregating the spectrum when harmonics were requested.
	#[must_use]
	pub fn beff(&self) -> f64 {
		match self {
			Self::Beff(beff) => *beff,
			Self::Harmonics(spectrum) => spectrum.beff(),
		}
	}

	#[must_use]
	pub fn harmonics(&self) -> Option<&HarmonicSpectrum> {
		match self {
			Self::Beff(_) => None,
			Self::Harmonics(spectrum) => Some(spectrum),
		}
	}
}

/// Outcome of the spectral analysis of one trace.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralAnalysis {
	nperiods: usize,
	period: f64,
	spectrum: HarmonicSpectrum,
}

impl SpectralAnalysis {
	/// Number of periods in the trace, either given or detected.
	#[must_use]
	pub const fn nperiods(&self) -> usize {
		self.nperiods
	}

	/// Span of the trace divided by the number of periods.
	#[must_use]
	pub const fn period(&self) -> f64 {
		self.period
	}

	#[must_use]
	pub fn spectrum(&self) -> &HarmonicSpectrum {
		&self.spectrum
	}

	#[must_use]
	pub fn into_spectrum(self) -> HarmonicSpectrum {
		self.spectrum
	}

	#[must_use]
	pub fn beff(&self) -> f64 {
		self.spectrum.beff()
	}
}

/// FFT-based effective field estimator.
///
/// Keeps the FFT planner and the working buffers around so that analyzing
/// many traces of the same length only plans the transform once.
pub struct SpectralBeffEstimator {
	planner: FftPlanner<f64>,
	complex_signal: Vec<Complex64>,
	magnitudes: Vec<f64>,
}

impl std::fmt::Debug for SpectralBeffEstimator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SpectralBeffEstimator")
			.field("planner", &"omitted")
			.field("complex_signal", &self.complex_signal.len())
			.field("magnitudes", &self.magnitudes.len())
			.finish()
	}
}

impl Default for SpectralBeffEstimator {
	fn default() -> Self {
		Self::new()
	}
}

impl SpectralBeffEstimator {
	#[must_use]
	pub fn new() -> Self {
		Self {
			planner: FftPlanner::new(),
			complex_signal: Vec::new(),
			magnitudes: Vec::new(),
		}
	}

	/// Single-sided amplitude spectrum of `field`: `2·|X_k| / n` for every DFT bin `k`.
	///
	/// Only bins up to `n / 2` are meaningful, the rest mirror them.
	#[allow(clippy::cast_precision_loss)]
	pub fn single_sided_magnitudes(&mut self, field: &[f64]) -> &[f64] {
		let samples = field.len();
		self.magnitudes.clear();
		if samples == 0 {
			return &self.magnitudes;
		}

		self.complex_signal.clear();
		self.complex_signal
			.extend(field.iter().map(|&sample| Complex::new(sample, 0.)));

		let fft_processor = self.planner.plan_fft_forward(samples);
		fft_processor.process(&mut self.complex_signal);

		// rustfft doesn't normalize, see https://docs.rs/rustfft/6.2.0/rustfft/index.html#normalization
		let normalization_factor = 2. / samples as f64;
		self.magnitudes.extend(
			self.complex_signal
				.iter()
				.map(|c| c.norm() * normalization_factor),
		);

		&self.magnitudes
	}

	/// Number of periods in `field`, i.e. the index of the strongest positive-frequency bin.
	///
	/// # Errors
	/// - [`AnalysisError::PeriodDetection`] if the trace is too short to have any positive-frequency bin.
	pub fn detect_nperiods(&mut self, field: &[f64]) -> Result<usize, AnalysisError> {
		let ctx = SpatialDftCtx::new(0., field.len());
		let magnitudes = self.single_sided_magnitudes(field);
		Self::dominant_bin(magnitudes, ctx)
	}

	fn dominant_bin(magnitudes: &[f64], ctx: SpatialDftCtx) -> Result<usize, AnalysisError> {
		let positive = magnitudes
			.get(ctx.positive_bins())
			.ok_or(AnalysisError::PeriodDetection)?;
		// positions in the positive half are 0-based, bins start at 1.
		// A flat trace has no dominant bin, argmax picks the first one.
		arg_max(positive)
			.map(|idx| (idx + 1).max(1))
			.ok_or(AnalysisError::PeriodDetection)
	}

	/// Collect the odd-harmonic magnitudes of `field` sampled at `positions`.
	///
	/// When `nperiods` is `None` it is detected from the dominant bin of the spectrum.
	///
	/// # Errors
	/// - [`AnalysisError::InputShape`] if `positions` and `field` have different lengths.
	/// - [`AnalysisError::InsufficientSamples`] with less than two samples.
	/// - [`AnalysisError::InvalidPeriod`] if the positions span no distance.
	/// - [`AnalysisError::PeriodDetection`] if `nperiods` is zero or cannot be detected.
	pub fn analyze(
		&mut self,
		positions: &[f64],
		field: &[f64],
		nperiods: Option<usize>,
	) -> Result<SpectralAnalysis, AnalysisError> {
		check_lengths(positions.len(), field.len())?;
		if field.len() < 2 {
			return Err(AnalysisError::InsufficientSamples {
				required: 2,
				provided: field.len(),
			});
		}
		let span = (positions[positions.len() - 1] - positions[0]).abs();
		if !(span.is_finite() && span > 0.) {
			return Err(AnalysisError::InvalidPeriod(span));
		}
		if !is_uniformly_spaced(positions, UNIFORMITY_TOLERANCE) {
			warn!(
				n_of_samples = positions.len(),
				"positions are not uniformly spaced, the spectral estimate may be inaccurate"
			);
		}

		let ctx = SpatialDftCtx::new(span, field.len());
		let magnitudes = self.single_sided_magnitudes(field);

		let nperiods = match nperiods {
			Some(0) => return Err(AnalysisError::PeriodDetection),
			Some(nperiods) => nperiods,
			None => {
				let detected = Self::dominant_bin(magnitudes, ctx)?;
				debug!(detected, "detected number of periods");
				detected
			}
		};

		let spectrum: HarmonicSpectrum = ctx
			.odd_harmonic_bins(nperiods)
			.map(|bin| magnitudes[bin])
			.collect();

		let period = ctx.bin_to_period(nperiods);
		debug!(
			nperiods,
			period,
			n_of_harmonics = spectrum.len(),
			"spectral analysis completed"
		);

		Ok(SpectralAnalysis {
			nperiods,
			period,
			spectrum,
		})
	}

	/// Effective field of the trace, or its odd-harmonic spectrum if `return_harmonics` is set.
	///
	/// # Errors
	/// See [`SpectralBeffEstimator::analyze`].
	pub fn estimate(
		&mut self,
		positions: &[f64],
		field: &[f64],
		nperiods: Option<usize>,
		return_harmonics: bool,
	) -> Result<SpectralEstimate, AnalysisError> {
		let analysis = self.analyze(positions, field, nperiods)?;
		Ok(if return_harmonics {
			SpectralEstimate::Harmonics(analysis.into_spectrum())
		} else {
			SpectralEstimate::Beff(analysis.beff())
		})
	}
}

/// One-shot spectral estimate, see [`SpectralBeffEstimator::estimate`].
///
/// # Errors
/// See [`SpectralBeffEstimator::analyze`].
pub fn estimate_beff_spectral(
	positions: &[f64],
	field: &[f64],
	nperiods: Option<usize>,
	return_harmonics: bool,
) -> Result<SpectralEstimate, AnalysisError> {
	SpectralBeffEstimator::new().estimate(positions, field, nperiods, return_harmonics)
}
