//! Configuration document: schema, loading and load-time validation.

pub mod load;
pub mod types;

pub use types::*;
