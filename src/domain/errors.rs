//! Domain error types
//!
//! Catalogue validation failures are fatal: a timetable model is never built
//! from data that failed construction or cross-catalogue checks.

use thiserror::Error;

/// Errors raised while constructing or validating catalogues
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogueError {
    /// A column declared as required is absent from the input table,
    /// or a required cell is empty
    #[error("[{catalogue}] required columns not found: {columns}")]
    MissingRequiredColumn {
        catalogue: &'static str,
        columns: String,
    },

    /// A cell could not be coerced to the declared column type
    #[error("[{catalogue}] column '{column}': cannot coerce '{value}' to {expected}")]
    BadType {
        catalogue: &'static str,
        column: String,
        value: String,
        expected: &'static str,
    },

    /// Two rows share a key tuple and duplicate dropping was disabled
    #[error("[{catalogue}] duplicate key {key}")]
    DuplicateKey {
        catalogue: &'static str,
        key: String,
    },

    /// A cross-catalogue reference does not resolve, or a row violates a
    /// well-formedness invariant
    #[error("[{catalogue}] referential integrity: {detail}")]
    ReferentialIntegrity {
        catalogue: &'static str,
        detail: String,
    },
}
