use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
	analysis::{HarmonicFit, HarmonicFitter, HarmonicSpectrum, SpectralBeffEstimator},
	units::field_to_deflection_parameter,
	AnalysisConfig, AnalysisError, FieldComponent, FieldTrace,
};

/// Figures of merit of one solved undulator model, as compared across a
/// parameter sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
	pub component: FieldComponent,
	/// Periods found in (or given for) the trace.
	pub nperiods: usize,
	/// Trace span divided by `nperiods`, in mm.
	pub measured_period_mm: f64,
	/// Effective field from the spectrum, in T.
	pub beff: f64,
	/// Largest absolute field along the trace, in T.
	pub peak_field: f64,
	pub k_eff: f64,
	pub k_max: f64,
	pub harmonics: HarmonicSpectrum,
	pub fit: Option<HarmonicFit>,
}

/// Analyze `trace` as described by `config`.
///
/// # Errors
/// - any configuration error reported by [`AnalysisConfig::validate`]
/// - any error of the spectral estimator, and of the fit when enabled
pub fn summarize(
	trace: &FieldTrace,
	config: &AnalysisConfig,
) -> Result<FieldSummary, AnalysisError> {
	config.validate()?;

	let positions = trace.positions();
	let field = trace.component(config.component);

	let analysis = SpectralBeffEstimator::new().analyze(&positions, &field, config.nperiods)?;
	let peak_field = trace.peak(config.component)?;
	let fit = config
		.fit
		.map(|fit_config| HarmonicFitter::new(fit_config).fit(&positions, &field, config.period_mm))
		.transpose()?;

	let beff = analysis.beff();
	let summary = FieldSummary {
		component: config.component,
		nperiods: analysis.nperiods(),
		measured_period_mm: analysis.period(),
		beff,
		peak_field,
		k_eff: field_to_deflection_parameter(beff, config.period_mm),
		k_max: field_to_deflection_parameter(peak_field, config.period_mm),
		harmonics: analysis.into_spectrum(),
		fit,
	};

	debug!(
		component = %summary.component,
		beff = summary.beff,
		peak_field = summary.peak_field,
		k_eff = summary.k_eff,
		"field summary"
	);

	Ok(summary)
}

#[cfg(test)]
mod tests {
	use std::f64::consts::TAU;

	use super::*;
	use crate::{FieldVector, FitConfig, SamplingWindow};

	fn planar_undulator(period: f64, b1: f64, b3: f64) -> impl Fn([f64; 3]) -> FieldVector {
		move |[_, _, z]: [f64; 3]| {
			let k = TAU / period;
			FieldVector::vertical(-b1 * (k * z).sin() - b3 * (3. * k * z).sin())
		}
	}

	#[test]
	fn test_summary_of_central_window() {
		let window = SamplingWindow::centered(18., 8);
		let trace = FieldTrace::sample_axis(
			&planar_undulator(18., 1.0, -0.1),
			(0., 0.),
			&window.grid(),
		);
		let config = AnalysisConfig {
			period_mm: 18.,
			nperiods: Some(window.nperiods),
			fit: Some(FitConfig::default()),
			..AnalysisConfig::default()
		};

		let summary = summarize(&trace, &config).unwrap();
		let expected_beff = (1.0_f64 + (0.1_f64 / 3.).powi(2)).sqrt();
		assert_eq!(summary.nperiods, 2);
		assert!((summary.measured_period_mm - 18.).abs() < 1e-9);
		assert!((summary.beff - expected_beff).abs() < 0.01 * expected_beff);
		assert!((summary.k_eff - 0.09336 * summary.beff * 18.).abs() < 1e-12);
		assert!((summary.peak_field - 1.1).abs() < 1e-6);
		assert!(summary.k_max > summary.k_eff);
		assert!((summary.harmonics[1] - 0.1).abs() < 1e-3);

		let fit = summary.fit.unwrap();
		assert!((fit.coefficients()[0] - 1.0).abs() < 1e-6);
		assert!((fit.coefficients()[1] + 0.1).abs() < 1e-6);
		assert!((fit.beff() - summary.beff).abs() < 0.01);
	}

	#[test]
	fn test_detected_periods_without_fit() {
		let window = SamplingWindow {
			nperiods: 3,
			n_of_points: 601,
			..SamplingWindow::default()
		};
		let trace = FieldTrace::sample_axis(
			&planar_undulator(18., 0.8, 0.),
			(0., 0.),
			&window.grid(),
		);
		let summary = summarize(&trace, &AnalysisConfig::default()).unwrap();
		assert_eq!(summary.nperiods, 3);
		assert!(summary.fit.is_none());
		assert!((summary.beff - 0.8).abs() < 0.008);
	}

	#[test]
	fn test_invalid_config() {
		let trace = FieldTrace::default();
		let config = AnalysisConfig {
			period_mm: f64::NAN,
			..AnalysisConfig::default()
		};
		assert!(matches!(
			summarize(&trace, &config),
			Err(AnalysisError::InvalidPeriod(_))
		));
	}

	#[test]
	fn test_serializes_for_reporting() {
		let window = SamplingWindow::default();
		let trace = FieldTrace::sample_axis(
			&planar_undulator(18., 1.0, 0.),
			(0., 0.),
			&window.grid(),
		);
		let summary = summarize(&trace, &AnalysisConfig::default()).unwrap();
		let json = serde_json::to_string(&summary).unwrap();
		let parsed: FieldSummary = serde_json::from_str(&json).unwrap();
		assert_eq!(parsed.nperiods, summary.nperiods);
		assert_eq!(parsed.harmonics.len(), summary.harmonics.len());
		assert!(json.contains("\"component\":\"y\""));
	}
}
