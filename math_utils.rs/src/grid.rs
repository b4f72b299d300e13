/// `n_of_points` evenly spaced values covering a closed interval, both ends included.
///
/// This mirrors the usual `linspace` convention: the first point is `interval.0`,
/// the last one is exactly `interval.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformGrid {
	interval: (f64, f64),
	n_of_points: usize,
}

impl UniformGrid {
	#[must_use]
	pub const fn new(interval: (f64, f64), n_of_points: usize) -> Self {
		Self {
			interval,
			n_of_points,
		}
	}

	/// Distance between two consecutive points.
	///
	/// Grids with less than two points have no spacing, 0 is returned.
	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn spacing(&self) -> f64 {
		if self.n_of_points < 2 {
			0.
		} else {
			(self.interval.1 - self.interval.0) / (self.n_of_points - 1) as f64
		}
	}

	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn point(&self, idx: usize) -> f64 {
		debug_assert!(
			idx < self.n_of_points,
			"index {} is out of range. n_of_points is {}",
			idx,
			self.n_of_points
		);
		if idx + 1 == self.n_of_points && idx > 0 {
			self.interval.1
		} else {
			self.interval.0 + self.spacing() * idx as f64
		}
	}

	/// Index of the grid point closest to `value`, clamped to the grid boundaries.
	#[must_use]
	#[allow(clippy::cast_possible_truncation)]
	#[allow(clippy::cast_sign_loss)]
	pub fn nearest_point_idx(&self, value: f64) -> usize {
		let spacing = self.spacing();
		if self.n_of_points < 2 || spacing == 0. {
			return 0;
		}
		let relative = ((value - self.interval.0) / spacing).round();
		if relative <= 0. {
			0
		} else {
			(relative as usize).min(self.n_of_points - 1)
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
		(0..self.n_of_points).map(|i| self.point(i))
	}

	#[must_use]
	pub fn points(&self) -> Vec<f64> {
		self.iter().collect()
	}

	#[must_use]
	pub fn span(&self) -> f64 {
		(self.interval.1 - self.interval.0).abs()
	}

	#[must_use]
	pub const fn n_of_points(&self) -> usize {
		self.n_of_points
	}

	#[must_use]
	pub const fn interval(&self) -> (f64, f64) {
		self.interval
	}
}

/// Check whether consecutive `values` are evenly spaced, i.e. every gap is within
/// `relative_tolerance` of the mean gap.
///
/// Series with less than three values are trivially uniform.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn is_uniformly_spaced(values: &[f64], relative_tolerance: f64) -> bool {
	if values.len() < 3 {
		return true;
	}
	let mean_gap = (values[values.len() - 1] - values[0]) / (values.len() - 1) as f64;
	if mean_gap == 0. {
		return values.windows(2).all(|w| w[1] == w[0]);
	}
	values
		.windows(2)
		.all(|w| ((w[1] - w[0]) - mean_gap).abs() <= relative_tolerance * mean_gap.abs())
}
