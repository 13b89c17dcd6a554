//! Error types
//!
//! Errors raised while turning a form submission into a rendered result.
//! Every variant's `Display` text is what ends up in the error fragment shown
//! to the user.

use thiserror::Error;

/// Problems with the submitted form itself. Raised before any network call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// The element id is not one of the four prediction forms
    #[error("Unknown form type")]
    UnknownForm(String),

    /// A number input held text that does not parse as a float
    #[error("Field '{field}' must be a number")]
    InvalidNumber { field: String, value: String },

    /// Constraint validation failed (required, range, option)
    #[error("{message}")]
    InvalidField { field: String, message: String },
}

impl FormError {
    /// Name of the offending field, if the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            FormError::UnknownForm(_) => None,
            FormError::InvalidNumber { field, .. } | FormError::InvalidField { field, .. } => {
                Some(field)
            }
        }
    }
}

/// Errors from a single submit → request → decode cycle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Rejected before the request was built
    #[error(transparent)]
    Form(#[from] FormError),

    /// Another request for the same form has not finished yet
    #[error("A prediction for this form is already in progress")]
    InFlight,

    /// The request never produced a response (connection refused, CORS, ...)
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The response body was not the JSON shape we expected
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Decode(err.to_string())
    }
}

/// Result alias for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormError::UnknownForm("contactForm".to_string());
        assert_eq!(err.to_string(), "Unknown form type");

        let err = DispatchError::Http {
            status: 500,
            message: "Model not loaded".to_string(),
        };
        assert_eq!(err.to_string(), "Model not loaded");

        let err: DispatchError = FormError::InvalidNumber {
            field: "age".to_string(),
            value: "abc".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Field 'age' must be a number");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: DispatchError = json_err.into();
        assert!(matches!(err, DispatchError::Decode(_)));
    }

    #[test]
    fn test_field_accessor() {
        let err = FormError::InvalidField {
            field: "budget".to_string(),
            message: "Value must be at least 0".to_string(),
        };
        assert_eq!(err.field(), Some("budget"));
        assert_eq!(FormError::UnknownForm("x".into()).field(), None);
    }
}
