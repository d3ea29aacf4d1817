// Adapters layer: readers for the two input formats.

pub mod enrollment;
pub mod geometry;
