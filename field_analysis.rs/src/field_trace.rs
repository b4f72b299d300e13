use math_utils::stats::SeriesStatistics;
use serde::{Deserialize, Serialize};

use crate::{error::check_lengths, AnalysisError, FieldComponent, FieldVector};

/// The field at one position along the sampling axis. Positions are in mm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldSample {
	pub position: f64,
	pub field: FieldVector,
}

/// Field samples ordered along one axis.
///
/// Spectral analysis additionally expects the positions to be uniformly spaced,
/// which is left to whoever produced the samples.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldTrace {
	samples: Vec<FieldSample>,
}

impl FieldTrace {
	#[must_use]
	pub fn new(samples: Vec<FieldSample>) -> Self {
		Self { samples }
	}

	/// Zip parallel position and field sequences into a trace.
	///
	/// # Errors
	/// - [`AnalysisError::InputShape`] if the two sequences have different lengths.
	pub fn from_parts(positions: &[f64], fields: &[FieldVector]) -> Result<Self, AnalysisError> {
		check_lengths(positions.len(), fields.len())?;
		Ok(Self {
			samples: positions
				.iter()
				.zip(fields)
				.map(|(&position, &field)| FieldSample { position, field })
				.collect(),
		})
	}

	#[must_use]
	pub fn samples(&self) -> &[FieldSample] {
		&self.samples
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.samples.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.samples.is_empty()
	}

	#[must_use]
	pub fn positions(&self) -> Vec<f64> {
		self.samples.iter().map(|s| s.position).collect()
	}

	#[must_use]
	pub fn fields(&self) -> Vec<FieldVector> {
		self.samples.iter().map(|s| s.field).collect()
	}

	/// One field component for every sample, in trace order.
	#[must_use]
	pub fn component(&self, component: FieldComponent) -> Vec<f64> {
		self.samples
			.iter()
			.map(|s| s.field.component(component))
			.collect()
	}

	/// Distance between the first and the last sample.
	#[must_use]
	pub fn span(&self) -> f64 {
		match (self.samples.first(), self.samples.last()) {
			(Some(first), Some(last)) => (last.position - first.position).abs(),
			_ => 0.,
		}
	}

	/// Largest absolute value of a field component along the trace.
	///
	/// # Errors
	/// - [`AnalysisError::InsufficientSamples`] on an empty trace.
	pub fn peak(&self, component: FieldComponent) -> Result<f64, AnalysisError> {
		SeriesStatistics::new(self.component(component))
			.map(|stats| stats.peak())
			.map_err(|_| AnalysisError::InsufficientSamples {
				required: 1,
				provided: 0,
			})
	}

	/// The samples lying within `start..=stop`.
	#[must_use]
	pub fn window(&self, start: f64, stop: f64) -> Self {
		let (low, high) = if start <= stop {
			(start, stop)
		} else {
			(stop, start)
		};
		Self {
			samples: self
				.samples
				.iter()
				.filter(|s| s.position >= low && s.position <= high)
				.copied()
				.collect(),
		}
	}
}

impl FromIterator<FieldSample> for FieldTrace {
	fn from_iter<T: IntoIterator<Item = FieldSample>>(iter: T) -> Self {
		Self {
			samples: iter.into_iter().collect(),
		}
	}
}
