//! Struct `Sample` represents a batch sample.

pub mod feature;
pub mod sample_struct;


pub use sample_struct::Sample;
pub use feature::Feature;
