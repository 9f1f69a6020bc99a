//! Error types for the FitPulse application

use thiserror::Error;

/// Authentication and registration failures.
///
/// Messages are user-facing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Wrong password")]
    WrongPassword,

    #[error("Login failed. Check your details or make sure you are registered")]
    LoginFailed,

    #[error("This email address is already in use")]
    EmailInUse,

    #[error("Only administrators can register from this panel")]
    RegistrationNotAllowed,

    #[error("Invalid administrator verification code")]
    InvalidVerificationCode,

    #[error("Name cannot be empty")]
    MissingName,

    #[error("{0}")]
    InvalidEmail(String),
}

/// Session/view state machine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Cannot {action} from the {view} view")]
    InvalidTransition { action: &'static str, view: String },
}

/// Rejection reasons when parsing generated text into domain objects
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("response is empty")]
    Empty,

    #[error("response is not valid JSON: {0}")]
    Json(String),

    #[error("response failed validation: {0}")]
    Invalid(String),
}
