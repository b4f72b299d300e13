use std::{borrow::Borrow, cell::Cell, cmp::Ordering};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsError {
	#[error("common stats are undefined on empty series")]
	EmptySeries,
}

/// Lazily computed statistics over a non-empty series of real values.
#[derive(Debug, Clone)]
pub struct SeriesStatistics<Series: Borrow<[f64]>> {
	series: Series,
	mean: Cell<Option<f64>>,
	rms: Cell<Option<f64>>,
	peak: Cell<Option<(usize, f64)>>,
}

impl<Series: Borrow<[f64]>> SeriesStatistics<Series> {
	/// # Errors
	/// - on empty series
	pub fn new(series: Series) -> Result<Self, StatisticsError> {
		if series.borrow().is_empty() {
			Err(StatisticsError::EmptySeries)
		} else {
			Ok(Self {
				series,
				mean: Cell::default(),
				rms: Cell::default(),
				peak: Cell::default(),
			})
		}
	}

	pub fn series(&self) -> &[f64] {
		self.series.borrow()
	}

	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn mean(&self) -> f64 {
		if let Some(mean) = self.mean.get() {
			return mean;
		}
		let series = self.series.borrow();
		let mean = series.iter().sum::<f64>() / series.len() as f64;
		self.mean.set(Some(mean));
		mean
	}

	/// Root mean square of the series.
	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn rms(&self) -> f64 {
		if let Some(rms) = self.rms.get() {
			return rms;
		}
		let series = self.series.borrow();
		let rms = (series.iter().map(|v| v * v).sum::<f64>() / series.len() as f64).sqrt();
		self.rms.set(Some(rms));
		rms
	}

	#[must_use]
	pub fn max(&self) -> f64 {
		self.series
			.borrow()
			.iter()
			.copied()
			.max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
			.unwrap_or(f64::NAN)
	}

	#[must_use]
	pub fn min(&self) -> f64 {
		self.series
			.borrow()
			.iter()
			.copied()
			.min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
			.unwrap_or(f64::NAN)
	}

	/// Largest absolute value in the series.
	#[must_use]
	pub fn peak(&self) -> f64 {
		self.peak_with_idx().1
	}

	/// Index of the largest absolute value in the series. The first one wins on ties.
	#[must_use]
	pub fn peak_idx(&self) -> usize {
		self.peak_with_idx().0
	}

	fn peak_with_idx(&self) -> (usize, f64) {
		if let Some(peak) = self.peak.get() {
			return peak;
		}
		let peak = self
			.series
			.borrow()
			.iter()
			.map(|v| v.abs())
			.enumerate()
			.fold((0, f64::NEG_INFINITY), |best, (i, v)| {
				if v > best.1 {
					(i, v)
				} else {
					best
				}
			});
		self.peak.set(Some(peak));
		peak
	}
}

/// Index of the largest value, first one on ties. `None` on empty input.
#[must_use]
pub fn arg_max(values: &[f64]) -> Option<usize> {
	values
		.iter()
		.enumerate()
		.fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
			Some((_, b)) if v <= b => best,
			_ => Some((i, v)),
		})
		.map(|(i, _)| i)
}
