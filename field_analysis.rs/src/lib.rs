//! Effective field and harmonic content of sampled undulator fields.
//!
//! Traces come from an external magnetostatics solver, either as
//! parallel position/field sequences or through a [`FieldSource`].
//! Two independent estimators are provided:
//! - [`analysis::estimate_beff_spectral`], FFT based, with optional period detection;
//! - [`analysis::estimate_beff_fit`], a least-squares fit of an odd-harmonic model.

#![allow(clippy::cast_possible_truncation)]

pub mod analysis;
pub mod units;

mod config;
pub use config::*;

mod error;
pub use error::AnalysisError;

mod field_vector;
pub use field_vector::*;

mod field_trace;
pub use field_trace::*;

mod sampling;
pub use sampling::*;

pub use math_utils::grid::UniformGrid;
pub use nalgebra;
pub use rustfft::num_complex;
