/// Relates the effective field (T) times the period (mm) to the undulator deflection parameter K.
pub const DEFLECTION_PER_TESLA_MM: f64 = 0.09336;

/// Field integrals come out of the analysis in T·mm, insertion-device tolerances are quoted in G·cm.
pub const TESLA_MM_TO_GAUSS_CM: f64 = 1e3;

/// Second field integrals: T·mm² to G·cm².
pub const TESLA_MM2_TO_GAUSS_CM2: f64 = 1e2;

/// Deflection parameter `K` of an undulator with effective field `beff` (T) and period `period_mm` (mm).
#[must_use]
pub fn field_to_deflection_parameter(beff: f64, period_mm: f64) -> f64 {
	DEFLECTION_PER_TESLA_MM * beff * period_mm
}

/// Inverse of [`field_to_deflection_parameter`]: the effective field needed to reach `k`.
///
/// A zero period yields an infinite field.
#[must_use]
pub fn deflection_parameter_to_field(k: f64, period_mm: f64) -> f64 {
	k / (DEFLECTION_PER_TESLA_MM * period_mm)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_k_of_one_tesla_at_20mm() {
		assert!((field_to_deflection_parameter(1.0, 20.0) - 1.8672).abs() < 1e-12);
	}

	#[test]
	fn test_k_roundtrip() {
		let k = field_to_deflection_parameter(1.23, 18.);
		assert!((deflection_parameter_to_field(k, 18.) - 1.23).abs() < 1e-12);
	}
}
