pub mod grid;
pub mod integration;
pub mod stats;
