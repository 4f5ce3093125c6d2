//! Structural validation of import candidates

pub mod validation;

pub use validation::{unique_key, unique_path, Validate};
