//! Application layer: services and use cases
//!
//! This layer orchestrates the domain pipeline for callers.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
