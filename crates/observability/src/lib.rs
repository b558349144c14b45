//! Process-wide tracing/logging setup.

/// Tracing subscriber installation.
pub mod tracing;

pub use crate::tracing::{init, init_with_filter};
