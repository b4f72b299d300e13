use std::ops::RangeInclusive;

/// Maps DFT bins of a field trace to spatial quantities.
///
/// A trace of `n_of_samples` samples spanning `span` mm, with `k` full periods
/// in it, puts its fundamental in bin `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialDftCtx {
	span: f64,
	n_of_samples: usize,
}

impl SpatialDftCtx {
	#[must_use]
	pub const fn new(span: f64, n_of_samples: usize) -> Self {
		Self { span, n_of_samples }
	}

	#[must_use]
	pub const fn span(&self) -> f64 {
		self.span
	}

	#[must_use]
	pub const fn n_of_samples(&self) -> usize {
		self.n_of_samples
	}

	/// Bins carrying strictly positive frequencies.
	///
	/// The Nyquist bin of even-length transforms is folded and therefore excluded.
	#[must_use]
	pub const fn positive_bins(&self) -> RangeInclusive<usize> {
		1..=self.last_positive_bin()
	}

	#[must_use]
	pub const fn last_positive_bin(&self) -> usize {
		self.n_of_samples.saturating_sub(1) / 2
	}

	/// Length of one period of the spatial wave in `bin`.
	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn bin_to_period(&self, bin: usize) -> f64 {
		self.span / bin as f64
	}

	/// Spatial frequency (cycles per mm) of `bin`.
	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn bin_to_spatial_frequency(&self, bin: usize) -> f64 {
		bin as f64 / self.span
	}

	/// Bins of the odd harmonics of a fundamental sitting in bin `nperiods`,
	/// up to the last positive bin.
	pub fn odd_harmonic_bins(&self, nperiods: usize) -> impl Iterator<Item = usize> {
		let last = self.last_positive_bin();
		(0..)
			.map(move |i| nperiods * (2 * i + 1))
			.take_while(move |&bin| nperiods > 0 && bin <= last)
	}
}

/// DFT bins visited when collecting the odd harmonics of a trace with
/// `n_of_samples` samples and `nperiods` periods.
#[must_use]
pub fn odd_harmonic_bins(n_of_samples: usize, nperiods: usize) -> Vec<usize> {
	SpatialDftCtx::new(0., n_of_samples)
		.odd_harmonic_bins(nperiods)
		.collect()
}
