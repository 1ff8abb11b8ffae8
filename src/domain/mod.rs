//! Domain models and types for Veil.
//!
//! The domain layer provides:
//! - The format-agnostic traversal tree ([`Node`], [`Scalar`], [`ScalarType`])
//! - The per-field context handed to matchers and generators ([`FieldContext`])
//! - Error types ([`VeilError`], [`MaskingError`]) and the [`Result`] alias

pub mod context;
pub mod errors;
pub mod node;
pub mod result;

// Re-export commonly used types for convenience
pub use context::FieldContext;
pub use errors::{MaskingError, VeilError};
pub use node::{Node, Scalar, ScalarType};
pub use result::Result;
