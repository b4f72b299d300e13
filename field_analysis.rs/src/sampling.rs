use math_utils::grid::UniformGrid;
use tracing::trace;

use crate::{FieldSample, FieldTrace, FieldVector};

/// Anything able to evaluate the magnetic field at a point, typically a solved
/// magnetostatic model. Coordinates are in mm.
pub trait FieldSource {
	fn field_at(&self, point: [f64; 3]) -> FieldVector;
}

impl<F: Fn([f64; 3]) -> FieldVector> FieldSource for F {
	fn field_at(&self, point: [f64; 3]) -> FieldVector {
		self(point)
	}
}

impl FieldTrace {
	/// Sample `source` along the longitudinal (z) axis at every point of `grid`,
	/// keeping the transverse coordinates fixed at `transverse = (x, y)`.
	#[must_use]
	pub fn sample_axis(
		source: &impl FieldSource,
		transverse: (f64, f64),
		grid: &UniformGrid,
	) -> Self {
		trace!(
			n_of_points = grid.n_of_points(),
			interval = ?grid.interval(),
			"sampling field along the axis"
		);
		grid.iter()
			.map(|z| FieldSample {
				position: z,
				field: source.field_at([transverse.0, transverse.1, z]),
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::TAU;

	use super::*;
	use crate::FieldComponent;

	struct Dipole {
		field: f64,
	}

	impl FieldSource for Dipole {
		fn field_at(&self, _point: [f64; 3]) -> FieldVector {
			FieldVector::vertical(self.field)
		}
	}

	#[test]
	fn test_sample_closure() {
		let period = 18.;
		let source = |[_, _, z]: [f64; 3]| FieldVector::vertical(-(TAU * z / period).sin());
		let trace = FieldTrace::sample_axis(&source, (0., 0.), &UniformGrid::new((0., 36.), 145));
		assert_eq!(trace.len(), 145);
		assert!((trace.span() - 36.).abs() < 1e-12);
		assert!((trace.samples()[18].position - 4.5).abs() < 1e-12);
		assert!((trace.samples()[18].field.y + 1.).abs() < 1e-12);
	}

	#[test]
	fn test_sample_struct_with_offset() {
		let offsets = |[x, y, _]: [f64; 3]| FieldVector::new(x, y, 0.);
		let trace = FieldTrace::sample_axis(&offsets, (2., -3.), &UniformGrid::new((0., 1.), 3));
		assert!(trace.component(FieldComponent::X).iter().all(|&x| x == 2.));
		assert!(trace.component(FieldComponent::Y).iter().all(|&y| y == -3.));

		let trace = FieldTrace::sample_axis(
			&Dipole { field: 1.1 },
			(0., 0.),
			&UniformGrid::new((0., 1.), 5),
		);
		assert!((trace.peak(FieldComponent::Y).unwrap() - 1.1).abs() < f64::EPSILON);
	}
}
