use derive_more::derive::{Deref, From};
use serde::{Deserialize, Serialize};

/// Order of the `idx`-th odd harmonic: 1, 3, 5, ...
#[must_use]
pub const fn odd_harmonic_order(idx: usize) -> usize {
	2 * idx + 1
}

/// Aggregate odd-harmonic magnitudes into the effective field.
///
/// The `i`-th magnitude belongs to harmonic order `2i+1`, and an electron
/// crossing the field integrates each harmonic weighted by the inverse of its order:
///
/// Beff = sqrt(Σ (Bᵢ / (2i+1))²)
///
/// An empty sequence yields 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn effective_field(magnitudes: impl IntoIterator<Item = f64>) -> f64 {
	magnitudes
		.into_iter()
		.enumerate()
		.map(|(i, magnitude)| {
			let weighted = magnitude / odd_harmonic_order(i) as f64;
			weighted * weighted
		})
		.sum::<f64>()
		.sqrt()
}

/// A single odd harmonic of the field along the undulator axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Harmonic {
	order: usize,
	magnitude: f64,
}

impl Harmonic {
	#[must_use]
	pub const fn new(order: usize, magnitude: f64) -> Self {
		Self { order, magnitude }
	}

	#[must_use]
	pub const fn order(&self) -> usize {
		self.order
	}

	#[must_use]
	pub const fn magnitude(&self) -> f64 {
		self.magnitude
	}

	/// Contribution of this harmonic to the effective field, before squaring.
	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn weighted_magnitude(&self) -> f64 {
		self.magnitude / self.order as f64
	}
}

/// Odd-harmonic magnitudes, index `i` holding harmonic order `2i+1`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Deref, From)]
pub struct HarmonicSpectrum(Vec<f64>);

impl HarmonicSpectrum {
	#[must_use]
	pub fn new(magnitudes: Vec<f64>) -> Self {
		Self(magnitudes)
	}

	#[must_use]
	pub fn magnitudes(&self) -> &[f64] {
		&self.0
	}

	#[must_use]
	pub fn into_magnitudes(self) -> Vec<f64> {
		self.0
	}

	pub fn harmonics(&self) -> impl Iterator<Item = Harmonic> + '_ {
		self.0
			.iter()
			.enumerate()
			.map(|(i, &magnitude)| Harmonic::new(odd_harmonic_order(i), magnitude))
	}

	/// Magnitude of the harmonic with the given (odd) order, if present.
	#[must_use]
	pub fn get_order(&self, order: usize) -> Option<f64> {
		if order % 2 == 0 {
			return None;
		}
		self.0.get(order / 2).copied()
	}

	/// The harmonic with the largest magnitude.
	#[must_use]
	pub fn dominant(&self) -> Option<Harmonic> {
		self.harmonics()
			.max_by(|a, b| a.magnitude().total_cmp(&b.magnitude()))
	}

	#[must_use]
	pub fn beff(&self) -> f64 {
		effective_field(self.0.iter().copied())
	}
}

impl FromIterator<f64> for HarmonicSpectrum {
	fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_single_harmonic() {
		let spectrum = HarmonicSpectrum::new(vec![1.3]);
		assert!((spectrum.beff() - 1.3).abs() < f64::EPSILON);
	}

	#[test]
	fn test_higher_orders_are_weighted_down() {
		let spectrum = HarmonicSpectrum::new(vec![1., 0.3, 0.5]);
		let expected = (1. + 0.01 + 0.01_f64).sqrt();
		assert!((spectrum.beff() - expected).abs() < 1e-12);
	}

	#[test]
	fn test_empty_spectrum() {
		assert!(HarmonicSpectrum::default().beff().abs() < f64::EPSILON);
		assert!(HarmonicSpectrum::default().dominant().is_none());
	}

	#[test]
	fn test_orders() {
		let spectrum: HarmonicSpectrum = [0.9, 0.1, 0.05].into_iter().collect();
		let orders: Vec<usize> = spectrum.harmonics().map(|h| h.order()).collect();
		assert_eq!(orders, vec![1, 3, 5]);
		assert_eq!(spectrum.get_order(3), Some(0.1));
		assert_eq!(spectrum.get_order(2), None);
		assert_eq!(spectrum.get_order(7), None);
		assert_eq!(spectrum.dominant().map(|h| h.order()), Some(1));
		assert!((spectrum.harmonics().nth(1).unwrap().weighted_magnitude() - 0.1 / 3.).abs() < 1e-15);
		assert_eq!(spectrum.len(), 3);
	}
}
