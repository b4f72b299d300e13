use math_utils::integration::IntegrationError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
	#[error("positions and field samples differ in length ({positions} vs {field})")]
	InputShape { positions: usize, field: usize },
	#[error("unable to determine a positive number of periods, an explicit value is required")]
	PeriodDetection,
	#[error("harmonic fit did not converge after {iterations} iterations (residual sum of squares {residual:e})")]
	FitConvergence { iterations: usize, residual: f64 },
	#[error("{provided} samples are not enough, at least {required} are required")]
	InsufficientSamples { required: usize, provided: usize },
	#[error("the period must be a positive finite length, got {0}")]
	InvalidPeriod(f64),
	#[error("at least one harmonic must be requested")]
	InvalidHarmonicCount,
	#[error("invalid configuration: {0}")]
	Config(String),
}

impl From<IntegrationError> for AnalysisError {
	fn from(value: IntegrationError) -> Self {
		match value {
			IntegrationError::LengthMismatch { abscissa, ordinate } => Self::InputShape {
				positions: abscissa,
				field: ordinate,
			},
			IntegrationError::TooFewPoints(provided) => Self::InsufficientSamples {
				required: 2,
				provided,
			},
		}
	}
}

impl From<serde_json::Error> for AnalysisError {
	fn from(value: serde_json::Error) -> Self {
		Self::Config(value.to_string())
	}
}

pub(crate) fn check_lengths(positions: usize, field: usize) -> Result<(), AnalysisError> {
	if positions == field {
		Ok(())
	} else {
		Err(AnalysisError::InputShape { positions, field })
	}
}
