//! Common types used across the application.

pub mod decimal;
pub mod id;

pub use decimal::{DecimalError, DecimalValue, DecimalValueChange};
pub use id::*;
