use nalgebra::{DMatrix, DVector};
use tracing::{trace, warn};

use crate::{AnalysisError, FitConfig};

const MIN_DAMPING: f64 = 1e-12;
const MAX_DAMPING: f64 = 1e16;
const MIN_DIAGONAL: f64 = 1e-300;

/// A nonlinear least-squares problem: find the parameters minimizing the sum
/// of squared residuals.
pub trait LeastSquaresProblem {
	fn n_of_params(&self) -> usize;

	/// `model(params) - observed`, one entry per observation.
	fn residuals(&self, params: &DVector<f64>) -> DVector<f64>;

	/// Derivative of the residuals with respect to the parameters,
	/// one row per observation and one column per parameter.
	fn jacobian(&self, params: &DVector<f64>) -> DMatrix<f64>;
}

/// Where the solver stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
	pub params: DVector<f64>,
	pub iterations: usize,
	/// Residual sum of squares at `params`.
	pub residual: f64,
}

/// Levenberg-Marquardt solver with Marquardt's diagonal scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevenbergMarquardt {
	max_iterations: usize,
	function_tolerance: f64,
	step_tolerance: f64,
	gradient_tolerance: f64,
	initial_damping: f64,
}

impl Default for LevenbergMarquardt {
	fn default() -> Self {
		Self::new(&FitConfig::default())
	}
}

impl LevenbergMarquardt {
	#[must_use]
	pub fn new(config: &FitConfig) -> Self {
		Self {
			max_iterations: config.max_iterations,
			function_tolerance: config.function_tolerance,
			step_tolerance: config.step_tolerance,
			gradient_tolerance: config.gradient_tolerance,
			initial_damping: config.initial_damping,
		}
	}

	/// Minimize `problem` starting from `initial`.
	///
	/// # Errors
	/// - [`AnalysisError::FitConvergence`] when the iteration cap is reached, when
	///   no damping makes the residuals decrease while the step is still large, or
	///   when the residuals cannot be decreased from `initial` at all.
	///
	/// A rejected step shorter than the step tolerance ends the search at the
	/// current parameters once a step has been accepted, or when `initial` is
	/// already a minimum (the first undamped step is that short).
	pub fn minimize(
		&self,
		problem: &impl LeastSquaresProblem,
		initial: DVector<f64>,
	) -> Result<Minimum, AnalysisError> {
		let n_of_params = problem.n_of_params();
		debug_assert_eq!(initial.len(), n_of_params);

		let mut params = initial;
		let mut residuals = problem.residuals(&params);
		let mut cost = residuals.norm_squared();
		let mut damping = self.initial_damping;
		let mut improved = false;

		for iteration in 1..=self.max_iterations {
			if cost == 0. {
				return Ok(Minimum {
					params,
					iterations: iteration - 1,
					residual: cost,
				});
			}

			let jacobian = problem.jacobian(&params);
			let gradient = jacobian.tr_mul(&residuals);
			if gradient.amax() <= self.gradient_tolerance {
				return Ok(Minimum {
					params,
					iterations: iteration,
					residual: cost,
				});
			}
			let normal = jacobian.tr_mul(&jacobian);

			loop {
				let mut damped = normal.clone();
				for i in 0..n_of_params {
					damped[(i, i)] += damping * normal[(i, i)].max(MIN_DIAGONAL);
				}

				let Some(step) = damped.cholesky().map(|c| -c.solve(&gradient)) else {
					damping *= 10.;
					if damping > MAX_DAMPING {
						return Err(AnalysisError::FitConvergence {
							iterations: iteration,
							residual: cost,
						});
					}
					continue;
				};

				let small_step =
					step.norm() <= self.step_tolerance * (params.norm() + self.step_tolerance);
				let candidate = &params + &step;
				let candidate_residuals = problem.residuals(&candidate);
				let candidate_cost = candidate_residuals.norm_squared();

				if candidate_cost.is_finite() && candidate_cost < cost {
					// Only meaningful for nearly undamped steps.
					let small_reduction = damping < 1.
						&& cost - candidate_cost <= self.function_tolerance * cost;
					params = candidate;
					residuals = candidate_residuals;
					cost = candidate_cost;
					improved = true;
					damping = (damping / 10.).max(MIN_DAMPING);
					trace!(iteration, cost, damping, "step accepted");

					if small_step || small_reduction {
						return Ok(Minimum {
							params,
							iterations: iteration,
							residual: cost,
						});
					}
					break;
				}

				if small_step {
					if !improved && damping > self.initial_damping {
						warn!(iteration, cost, "residuals do not decrease from the initial guess");
						return Err(AnalysisError::FitConvergence {
							iterations: iteration,
							residual: cost,
						});
					}
					// The minimum is within the step tolerance.
					return Ok(Minimum {
						params,
						iterations: iteration,
						residual: cost,
					});
				}

				damping *= 10.;
				if damping > MAX_DAMPING {
					return Err(AnalysisError::FitConvergence {
						iterations: iteration,
						residual: cost,
					});
				}
			}
		}

		Err(AnalysisError::FitConvergence {
			iterations: self.max_iterations,
			residual: cost,
		})
	}
}
