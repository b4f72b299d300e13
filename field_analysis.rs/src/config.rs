use math_utils::grid::UniformGrid;
use serde::{Deserialize, Serialize};

use crate::{analysis::DEFAULT_MAX_HARMONICS, AnalysisError, FieldComponent};

/// Settings of the Levenberg-Marquardt harmonic fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
	/// Number of odd harmonics in the model, 7 fits orders 1 to 13.
	pub max_harmonics: usize,
	/// Hard cap on the outer iterations, reaching it is a convergence failure.
	pub max_iterations: usize,
	/// Relative reduction of the residual sum of squares below which the fit stops.
	pub function_tolerance: f64,
	/// Relative parameter step below which the fit stops.
	pub step_tolerance: f64,
	/// Largest gradient component below which the fit stops. 0 disables the check.
	pub gradient_tolerance: f64,
	/// Starting damping factor.
	pub initial_damping: f64,
}

impl Default for FitConfig {
	fn default() -> Self {
		Self {
			max_harmonics: DEFAULT_MAX_HARMONICS,
			max_iterations: 200,
			function_tolerance: 1.49012e-8,
			step_tolerance: 1.49012e-8,
			gradient_tolerance: 0.,
			initial_damping: 1e-3,
		}
	}
}

/// How a sampled trace is turned into a [`crate::analysis::FieldSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
	/// Undulator period in mm.
	pub period_mm: f64,
	/// Whole periods in the analyzed trace, detected from the spectrum when absent.
	pub nperiods: Option<usize>,
	/// Field component to analyze.
	pub component: FieldComponent,
	/// Run the harmonic fit next to the spectral estimate.
	pub fit: Option<FitConfig>,
}

impl Default for AnalysisConfig {
	fn default() -> Self {
		Self {
			period_mm: 18.,
			nperiods: None,
			component: FieldComponent::Y,
			fit: None,
		}
	}
}

impl AnalysisConfig {
	/// Parse a JSON document, missing fields take their default value.
	///
	/// # Errors
	/// - [`AnalysisError::Config`] on malformed JSON or unknown enum values.
	/// - [`AnalysisError::InvalidPeriod`] if the period isn't a positive finite length.
	pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// # Errors
	/// - [`AnalysisError::InvalidPeriod`] if the period isn't a positive finite length.
	/// - [`AnalysisError::PeriodDetection`] if `nperiods` is explicitly zero.
	/// - [`AnalysisError::InvalidHarmonicCount`] if the fit asks for no harmonics.
	pub fn validate(&self) -> Result<(), AnalysisError> {
		if !(self.period_mm.is_finite() && self.period_mm > 0.) {
			return Err(AnalysisError::InvalidPeriod(self.period_mm));
		}
		if self.nperiods == Some(0) {
			return Err(AnalysisError::PeriodDetection);
		}
		if self.fit.is_some_and(|fit| fit.max_harmonics == 0) {
			return Err(AnalysisError::InvalidHarmonicCount);
		}
		Ok(())
	}
}

/// The central region of an undulator where the effective field is evaluated:
/// two full periods around the device center, shifted by a quarter period for
/// every half period not multiple of four so that the window starts on a zero
/// crossing of the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingWindow {
	/// Undulator period in mm.
	pub period_mm: f64,
	/// Number of half periods of the device.
	pub nhalfperiods: usize,
	/// Whole periods covered by the window.
	pub nperiods: usize,
	/// Samples in the window, ends included.
	pub n_of_points: usize,
}

impl Default for SamplingWindow {
	fn default() -> Self {
		Self {
			period_mm: 18.,
			nhalfperiods: 8,
			nperiods: 2,
			n_of_points: 5001,
		}
	}
}

impl SamplingWindow {
	#[must_use]
	pub fn centered(period_mm: f64, nhalfperiods: usize) -> Self {
		Self {
			period_mm,
			nhalfperiods,
			..Self::default()
		}
	}

	/// One period before the centre, shifted by a quarter period per half
	/// period beyond a multiple of four.
	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn start(&self) -> f64 {
		-self.period_mm + self.period_mm * (self.nhalfperiods % 4) as f64 / 4.
	}

	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn stop(&self) -> f64 {
		self.start() + self.nperiods as f64 * self.period_mm
	}

	/// Phase (rad) of the fundamental at the window start.
	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn phase(&self) -> f64 {
		std::f64::consts::TAU * (self.nhalfperiods % 4) as f64 / 4.
	}

	#[must_use]
	pub fn grid(&self) -> UniformGrid {
		UniformGrid::new((self.start(), self.stop()), self.n_of_points)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_from_empty_json() {
		let config = AnalysisConfig::from_json_str("{}").unwrap();
		assert_eq!(config, AnalysisConfig::default());
	}

	#[test]
	fn test_partial_json() {
		let config = AnalysisConfig::from_json_str(
			r#"{ "period_mm": 20.0, "nperiods": 2, "component": "x", "fit": { "max_harmonics": 3 } }"#,
		)
		.unwrap();
		assert!((config.period_mm - 20.).abs() < f64::EPSILON);
		assert_eq!(config.nperiods, Some(2));
		assert_eq!(config.component, FieldComponent::X);
		let fit = config.fit.unwrap();
		assert_eq!(fit.max_harmonics, 3);
		assert_eq!(fit.max_iterations, FitConfig::default().max_iterations);
	}

	#[test]
	fn test_invalid_json() {
		assert!(matches!(
			AnalysisConfig::from_json_str(r#"{ "component": "w" }"#),
			Err(AnalysisError::Config(_))
		));
		assert_eq!(
			AnalysisConfig::from_json_str(r#"{ "period_mm": -1.0 }"#),
			Err(AnalysisError::InvalidPeriod(-1.))
		);
		assert_eq!(
			AnalysisConfig::from_json_str(r#"{ "fit": { "max_harmonics": 0 } }"#),
			Err(AnalysisError::InvalidHarmonicCount)
		);
	}

	#[test]
	fn test_sampling_window_odd_half_periods() {
		let window = SamplingWindow::centered(18., 11);
		assert!((window.start() + 4.5).abs() < f64::EPSILON);
		assert!((window.stop() - 31.5).abs() < f64::EPSILON);
		assert!((window.phase() - 3. * std::f64::consts::FRAC_PI_2).abs() < 1e-12);

		// Reducing the whole product modulo four lands elsewhere.
		let product_reduced = -18. + f64::from((18 * 11) % 4) / 4.;
		assert!((product_reduced + 17.5).abs() < f64::EPSILON);
		assert!((window.start() - product_reduced).abs() > 1.);
	}

	#[test]
	fn test_sampling_window() {
		let window = SamplingWindow::centered(18., 8);
		assert!((window.start() + 18.).abs() < f64::EPSILON);
		assert!((window.stop() - 18.).abs() < f64::EPSILON);
		assert!(window.phase().abs() < f64::EPSILON);
		assert_eq!(window.grid().n_of_points(), 5001);

		let shifted = SamplingWindow::centered(20., 10);
		assert!((shifted.start() + 10.).abs() < f64::EPSILON);
		assert!((shifted.stop() - 30.).abs() < f64::EPSILON);
		assert!((shifted.phase() - std::f64::consts::PI).abs() < f64::EPSILON);
	}
}
