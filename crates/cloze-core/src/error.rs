//! Authoring-time error types.
//!
//! A slot that fails to compile is kept in the solution table and never
//! matches. The error travels with the slot so that authoring tools can
//! surface it without affecting grading of the remaining blanks.

use thiserror::Error;

/// A problem with how a single blank was written by the prompt author.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A SHORTANSWER blank with no non-empty accepted variant.
    #[error("no accepted answer after splitting on '|'")]
    EmptyVariants,

    /// A NUMERICAL target or tolerance that is not a finite decimal number.
    #[error("invalid {field}: {text:?} is not a finite decimal number")]
    InvalidNumber { field: NumberField, text: String },

    /// A NUMERICAL tolerance below zero.
    #[error("tolerance must not be negative, got {0}")]
    NegativeTolerance(f64),
}

/// Which half of a NUMERICAL answer failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberField {
    Target,
    Tolerance,
}

impl std::fmt::Display for NumberField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberField::Target => write!(f, "target"),
            NumberField::Tolerance => write!(f, "tolerance"),
        }
    }
}
