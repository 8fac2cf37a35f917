//! Model functions for curve fitting.
//!
//! A model declares how many parameters it takes (and optionally their names)
//! so the fitter never has to discover the count at runtime.

pub mod builtin;
pub mod model;

pub use builtin::*;
pub use model::*;
