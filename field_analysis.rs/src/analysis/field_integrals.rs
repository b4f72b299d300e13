use math_utils::integration::{cumulative_trapezoid, trapezoid};
use serde::{Deserialize, Serialize};

use crate::{
	units::{TESLA_MM2_TO_GAUSS_CM2, TESLA_MM_TO_GAUSS_CM},
	AnalysisError, FieldComponent, FieldTrace,
};

/// Total `∫B dz` of one component along the trace, in T·mm.
///
/// # Errors
/// - [`AnalysisError::InsufficientSamples`] with less than two samples.
pub fn first_field_integral(
	trace: &FieldTrace,
	component: FieldComponent,
) -> Result<f64, AnalysisError> {
	Ok(trapezoid(&trace.positions(), &trace.component(component))?)
}

/// First and second field integrals along a trace.
///
/// A straight trajectory through the device needs both to vanish: the first one
/// is the exit angle kick, the second one the exit offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIntegrals {
	component: FieldComponent,
	positions: Vec<f64>,
	first: Vec<f64>,
	second: Vec<f64>,
}

impl FieldIntegrals {
	/// # Errors
	/// - [`AnalysisError::InsufficientSamples`] with less than two samples.
	pub fn compute(trace: &FieldTrace, component: FieldComponent) -> Result<Self, AnalysisError> {
		let positions = trace.positions();
		let first = cumulative_trapezoid(&positions, &trace.component(component))?;
		let second = cumulative_trapezoid(&positions, &first)?;
		Ok(Self {
			component,
			positions,
			first,
			second,
		})
	}

	#[must_use]
	pub const fn component(&self) -> FieldComponent {
		self.component
	}

	#[must_use]
	pub fn positions(&self) -> &[f64] {
		&self.positions
	}

	/// Running first integral, in T·mm.
	#[must_use]
	pub fn running_first(&self) -> &[f64] {
		&self.first
	}

	/// Running second integral, in T·mm².
	#[must_use]
	pub fn running_second(&self) -> &[f64] {
		&self.second
	}

	/// In T·mm.
	#[must_use]
	pub fn first(&self) -> f64 {
		self.first.last().copied().unwrap_or_default()
	}

	/// In T·mm².
	#[must_use]
	pub fn second(&self) -> f64 {
		self.second.last().copied().unwrap_or_default()
	}

	#[must_use]
	pub fn first_gauss_cm(&self) -> f64 {
		self.first() * TESLA_MM_TO_GAUSS_CM
	}

	#[must_use]
	pub fn second_gauss_cm2(&self) -> f64 {
		self.second() * TESLA_MM2_TO_GAUSS_CM2
	}
}
