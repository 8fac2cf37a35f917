//! Synthetic measurement generation for demonstrations and round-trip checks.

pub mod sample;

pub use sample::*;
