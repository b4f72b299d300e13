#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationError {
	#[error("abscissa and ordinate differ in length ({abscissa} vs {ordinate})")]
	LengthMismatch { abscissa: usize, ordinate: usize },
	#[error("at least two points are required, {0} given")]
	TooFewPoints(usize),
}

fn check_shape(x: &[f64], y: &[f64]) -> Result<(), IntegrationError> {
	if x.len() != y.len() {
		return Err(IntegrationError::LengthMismatch {
			abscissa: x.len(),
			ordinate: y.len(),
		});
	}
	if x.len() < 2 {
		return Err(IntegrationError::TooFewPoints(x.len()));
	}
	Ok(())
}

/// Integral of `y(x)` over the whole series using the trapezoidal rule.
///
/// The abscissa doesn't need to be uniformly spaced.
///
/// # Errors
/// - if `x` and `y` have different lengths
/// - if less than two points are given
pub fn trapezoid(x: &[f64], y: &[f64]) -> Result<f64, IntegrationError> {
	check_shape(x, y)?;
	Ok(x.windows(2)
		.zip(y.windows(2))
		.map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.)
		.sum())
}

/// Running trapezoidal integral of `y(x)`.
///
/// The result has the same length as the input and starts at 0.
///
/// # Errors
/// - if `x` and `y` have different lengths
/// - if less than two points are given
pub fn cumulative_trapezoid(x: &[f64], y: &[f64]) -> Result<Vec<f64>, IntegrationError> {
	check_shape(x, y)?;
	let mut acc = 0.;
	let mut result = Vec::with_capacity(x.len());
	result.push(acc);
	for (x, y) in x.windows(2).zip(y.windows(2)) {
		acc += (x[1] - x[0]) * (y[0] + y[1]) / 2.;
		result.push(acc);
	}
	Ok(result)
}

#[cfg(test)]
mod tests {
	use std::f64::consts::TAU;

	use crate::grid::UniformGrid;

	use super::*;

	#[test]
	fn test_constant() {
		let x = UniformGrid::new((-2., 3.), 11).points();
		let y = vec![4.; x.len()];
		assert!((trapezoid(&x, &y).unwrap() - 20.).abs() < 1e-12);
	}

	#[test]
	fn test_full_sine_periods_cancel_out() {
		let x = UniformGrid::new((0., 3.), 3001).points();
		let y: Vec<f64> = x.iter().map(|x| (TAU * x).sin()).collect();
		assert!(trapezoid(&x, &y).unwrap().abs() < 1e-9);
	}

	#[test]
	fn test_cumulative_matches_total() {
		let x = UniformGrid::new((0., 1.), 101).points();
		let y: Vec<f64> = x.iter().map(|x| x * x).collect();
		let running = cumulative_trapezoid(&x, &y).unwrap();
		assert_eq!(running.len(), x.len());
		assert!(running[0].abs() < f64::EPSILON);
		assert!((running[100] - trapezoid(&x, &y).unwrap()).abs() < 1e-12);
		assert!((running[100] - 1. / 3.).abs() < 1e-4);
	}

	#[test]
	fn test_errors() {
		assert_eq!(
			trapezoid(&[0., 1.], &[0.]),
			Err(IntegrationError::LengthMismatch {
				abscissa: 2,
				ordinate: 1
			})
		);
		assert_eq!(
			cumulative_trapezoid(&[0.], &[0.]),
			Err(IntegrationError::TooFewPoints(1))
		);
	}
}
