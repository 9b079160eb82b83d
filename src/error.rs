//! Errors raised while parsing parameters. The calculations themselves are
//! total and never fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortisationError {
    /// A method, preference or rounding mode name was not recognised.
    #[error("Unknown value for {field}: {value:?}")]
    UnknownVariant { field: String, value: String },

    /// JSON could not be deserialised.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AmortisationError {
    pub(crate) fn unknown(field: &str, value: &str) -> Self {
        AmortisationError::UnknownVariant {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<serde_json::Error> for AmortisationError {
    fn from(e: serde_json::Error) -> Self {
        AmortisationError::Serialization(e.to_string())
    }
}

/// Result alias for parsing and configuration.
pub type AmortisationResult<T> = Result<T, AmortisationError>;
