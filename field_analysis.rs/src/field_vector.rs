use std::fmt::Display;

use derive_more::derive::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// Cartesian component of a field vector, also used to name the axis a trace runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldComponent {
	X,
	/// Vertical field, the one deflecting the beam horizontally in a planar undulator.
	#[default]
	Y,
	Z,
}

impl FieldComponent {
	#[must_use]
	pub const fn index(self) -> usize {
		match self {
			Self::X => 0,
			Self::Y => 1,
			Self::Z => 2,
		}
	}
}

impl Display for FieldComponent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::X => "Bx",
			Self::Y => "By",
			Self::Z => "Bz",
		};
		Display::fmt(name, f)
	}
}

/// Magnetic flux density in Tesla.
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Default,
	Serialize,
	Deserialize,
	Add,
	AddAssign,
	Sub,
	SubAssign,
	Mul,
	MulAssign,
)]
pub struct FieldVector {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl FieldVector {
	#[must_use]
	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	/// A purely vertical field.
	#[must_use]
	pub const fn vertical(y: f64) -> Self {
		Self { x: 0., y, z: 0. }
	}

	#[must_use]
	pub const fn component(&self, component: FieldComponent) -> f64 {
		match component {
			FieldComponent::X => self.x,
			FieldComponent::Y => self.y,
			FieldComponent::Z => self.z,
		}
	}

	#[must_use]
	pub fn norm(&self) -> f64 {
		(self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
	}
}

impl From<[f64; 3]> for FieldVector {
	fn from([x, y, z]: [f64; 3]) -> Self {
		Self { x, y, z }
	}
}

impl From<FieldVector> for [f64; 3] {
	fn from(value: FieldVector) -> Self {
		[value.x, value.y, value.z]
	}
}

impl Display for FieldVector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({:+.3e}, {:+.3e}, {:+.3e}) T", self.x, self.y, self.z)
	}
}
