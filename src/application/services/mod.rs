//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod layout;

pub use layout::{Layout, LayoutService, Structure};
