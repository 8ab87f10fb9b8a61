//! Error types for Leadline core

use thiserror::Error;

/// Errors produced by core parsing and validation.
///
/// Numeric parameters clamp instead of erroring, so the only failure mode
/// left in this crate is a text value that matches no enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A text value did not match any variant of a domain enum.
    #[error("invalid {kind} value: '{value}'")]
    InvalidEnumValue { kind: &'static str, value: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
