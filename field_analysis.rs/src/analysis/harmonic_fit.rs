use std::f64::consts::TAU;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
	analysis::{
		effective_field, odd_harmonic_order, HarmonicSpectrum, LeastSquaresProblem,
		LevenbergMarquardt,
	},
	error::check_lengths,
	AnalysisError, FieldComponent, FieldTrace, FieldVector, FitConfig,
};

/// Odd harmonics fitted by default: orders 1 to 13.
pub const DEFAULT_MAX_HARMONICS: usize = 7;

/// Ideal undulator field made of odd harmonics of a known period:
///
/// B(z) = -Σ pᵢ sin((2i+1) · 2π z / period)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicModel {
	period: f64,
	n_of_harmonics: usize,
}

impl HarmonicModel {
	/// # Errors
	/// - [`AnalysisError::InvalidPeriod`] if `period` isn't a positive finite length.
	/// - [`AnalysisError::InvalidHarmonicCount`] if `n_of_harmonics` is zero.
	pub fn new(period: f64, n_of_harmonics: usize) -> Result<Self, AnalysisError> {
		if !(period.is_finite() && period > 0.) {
			return Err(AnalysisError::InvalidPeriod(period));
		}
		if n_of_harmonics == 0 {
			return Err(AnalysisError::InvalidHarmonicCount);
		}
		Ok(Self {
			period,
			n_of_harmonics,
		})
	}

	#[must_use]
	pub const fn period(&self) -> f64 {
		self.period
	}

	#[must_use]
	pub const fn n_of_harmonics(&self) -> usize {
		self.n_of_harmonics
	}

	#[must_use]
	pub fn wavenumber(&self) -> f64 {
		TAU / self.period
	}

	/// Derivative of the model with respect to the `idx`-th coefficient.
	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn basis(&self, idx: usize, z: f64) -> f64 {
		-(odd_harmonic_order(idx) as f64 * self.wavenumber() * z).sin()
	}

	/// Field at `z` for the given harmonic amplitudes. Extra coefficients are ignored.
	#[must_use]
	pub fn field_at(&self, z: f64, coefficients: &[f64]) -> f64 {
		coefficients
			.iter()
			.take(self.n_of_harmonics)
			.enumerate()
			.map(|(i, p)| p * self.basis(i, z))
			.sum()
	}
}

struct TraceProblem<'a> {
	model: HarmonicModel,
	positions: &'a [f64],
	observed: &'a [f64],
}

impl LeastSquaresProblem for TraceProblem<'_> {
	fn n_of_params(&self) -> usize {
		self.model.n_of_harmonics()
	}

	fn residuals(&self, params: &DVector<f64>) -> DVector<f64> {
		DVector::from_iterator(
			self.positions.len(),
			self.positions
				.iter()
				.zip(self.observed)
				.map(|(&z, observed)| self.model.field_at(z, params.as_slice()) - observed),
		)
	}

	fn jacobian(&self, _params: &DVector<f64>) -> DMatrix<f64> {
		DMatrix::from_fn(self.positions.len(), self.n_of_params(), |row, col| {
			self.model.basis(col, self.positions[row])
		})
	}
}

/// Harmonic amplitudes fitted to a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicFit {
	coefficients: Vec<f64>,
	iterations: usize,
	residual: f64,
}

impl HarmonicFit {
	/// Amplitude of each odd harmonic, index `i` holding order `2i+1`.
	#[must_use]
	pub fn coefficients(&self) -> &[f64] {
		&self.coefficients
	}

	#[must_use]
	pub fn into_coefficients(self) -> Vec<f64> {
		self.coefficients
	}

	#[must_use]
	pub const fn iterations(&self) -> usize {
		self.iterations
	}

	/// Residual sum of squares of the fit.
	#[must_use]
	pub const fn residual(&self) -> f64 {
		self.residual
	}

	#[must_use]
	pub fn beff(&self) -> f64 {
		effective_field(self.coefficients.iter().copied())
	}

	/// Absolute amplitudes, comparable with the spectral estimate.
	#[must_use]
	pub fn spectrum(&self) -> HarmonicSpectrum {
		self.coefficients.iter().map(|p| p.abs()).collect()
	}
}

/// Fits [`HarmonicModel`] to sampled traces with Levenberg-Marquardt.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HarmonicFitter {
	config: FitConfig,
}

impl HarmonicFitter {
	#[must_use]
	pub const fn new(config: FitConfig) -> Self {
		Self { config }
	}

	#[must_use]
	pub const fn config(&self) -> &FitConfig {
		&self.config
	}

	/// Fit the odd-harmonic amplitudes of `field` sampled at `positions`,
	/// starting from unit amplitudes.
	///
	/// # Errors
	/// - [`AnalysisError::InputShape`] if `positions` and `field` have different lengths.
	/// - [`AnalysisError::InvalidHarmonicCount`] if the configuration asks for no harmonics.
	/// - [`AnalysisError::InvalidPeriod`] if `period` isn't a positive finite length.
	/// - [`AnalysisError::InsufficientSamples`] with less samples than harmonics.
	/// - [`AnalysisError::FitConvergence`] if the solver gives up.
	pub fn fit(
		&self,
		positions: &[f64],
		field: &[f64],
		period: f64,
	) -> Result<HarmonicFit, AnalysisError> {
		check_lengths(positions.len(), field.len())?;
		let model = HarmonicModel::new(period, self.config.max_harmonics)?;
		if field.len() < model.n_of_harmonics() {
			return Err(AnalysisError::InsufficientSamples {
				required: model.n_of_harmonics(),
				provided: field.len(),
			});
		}

		let problem = TraceProblem {
			model,
			positions,
			observed: field,
		};
		let minimum = LevenbergMarquardt::new(&self.config)
			.minimize(&problem, DVector::from_element(model.n_of_harmonics(), 1.))?;

		debug!(
			iterations = minimum.iterations,
			residual = minimum.residual,
			"harmonic fit converged"
		);

		Ok(HarmonicFit {
			coefficients: minimum.params.iter().copied().collect(),
			iterations: minimum.iterations,
			residual: minimum.residual,
		})
	}

	/// [`HarmonicFitter::fit`] on one component of a trace.
	///
	/// # Errors
	/// See [`HarmonicFitter::fit`].
	pub fn fit_trace(
		&self,
		trace: &FieldTrace,
		component: FieldComponent,
		period: f64,
	) -> Result<HarmonicFit, AnalysisError> {
		self.fit(&trace.positions(), &trace.component(component), period)
	}
}

/// Effective field and odd-harmonic amplitudes from a fit of the vertical
/// component of `field_vectors`.
///
/// # Errors
/// See [`HarmonicFitter::fit`].
pub fn estimate_beff_fit(
	positions: &[f64],
	field_vectors: &[FieldVector],
	period: f64,
	max_harmonics: usize,
) -> Result<(f64, Vec<f64>), AnalysisError> {
	check_lengths(positions.len(), field_vectors.len())?;
	let field: Vec<f64> = field_vectors
		.iter()
		.map(|v| v.component(FieldComponent::Y))
		.collect();
	let fit = HarmonicFitter::new(FitConfig {
		max_harmonics,
		..FitConfig::default()
	})
	.fit(positions, &field, period)?;
	Ok((fit.beff(), fit.into_coefficients()))
}
