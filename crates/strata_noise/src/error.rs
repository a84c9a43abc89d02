//! # Noise Error Types
//!
//! All errors that can occur while validating or sampling noise fields.

use thiserror::Error;

use crate::config::FractalParameter;

/// Errors that can occur in the noise system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoiseError {
    /// A field name was looked up but is not in the library.
    #[error("unknown noise field: {0}")]
    UnknownField(String),

    /// A modifier slot references a field that is not in the library.
    #[error("field '{field}' has a {parameter} modifier referencing unknown field '{target}'")]
    UnknownModifierTarget {
        /// The field owning the slot.
        field: String,
        /// The parameter the slot modifies.
        parameter: FractalParameter,
        /// The missing target name.
        target: String,
    },

    /// The modifier reference graph contains a cycle.
    ///
    /// The path starts and ends with the same field name.
    #[error("cycle detected in modifier graph: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    /// A base parameter is outside its defined domain.
    #[error("field '{field}': invalid {parameter}: {reason}")]
    InvalidParameter {
        /// The offending field.
        field: String,
        /// The offending parameter.
        parameter: FractalParameter,
        /// What is wrong with it.
        reason: String,
    },

    /// An integer modifier truncated to a zero divisor.
    #[error("field '{field}': {parameter} modifier would divide by zero")]
    ZeroDivisor {
        /// The field whose parameter was being resolved.
        field: String,
        /// The parameter being resolved.
        parameter: FractalParameter,
    },

    /// Modifier nesting exceeded the evaluation depth limit.
    #[error("modifier nesting deeper than {limit} levels at field '{field}'")]
    DepthExceeded {
        /// The field at which the limit was hit.
        field: String,
        /// The configured limit.
        limit: usize,
    },
}

/// Result type for noise operations.
pub type NoiseResult<T> = Result<T, NoiseError>;
