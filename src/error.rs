//! Error types for record checking and formatting operations.
//!
//! This module provides the [`BibError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all library operations.
///
/// Represents the conditions that can occur while parsing field locators,
/// compiling rule patterns, or loading rule configuration and records.
#[derive(Error, Debug)]
pub enum BibError {
    /// A field locator was not a 6-character `TTTiic` address.
    #[error("Invalid field locator: {0}")]
    InvalidLocator(String),

    /// A rule pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A rule pattern compiled but has no `value` named group.
    #[error("Pattern has no named group 'value': {0}")]
    MissingValueGroup(String),

    /// A rule configuration entry could not be turned into a check.
    #[error("Invalid rule '{rule}': {reason}")]
    InvalidRule {
        /// Name of the offending rule
        rule: String,
        /// What was wrong with it
        reason: String,
    },

    /// Malformed JSON in a rule file or record batch.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`BibError`].
pub type Result<T> = std::result::Result<T, BibError>;
