//! # App Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Invoicer                               │
//! │                                                                         │
//! │  Command handler: Result<T, AppError>                                  │
//! │         │                                                               │
//! │         ├── ValidationError / CoreError ──► VALIDATION_ERROR   exit 2   │
//! │         ├── DocumentError / StoreError ───► WRITE_ERROR        exit 3   │
//! │         ├── IntegrationError ─────────────► INTEGRATION_FAILURE exit 4  │
//! │         ├── ConfigError ──────────────────► CONFIG_ERROR       exit 5   │
//! │         └── SessionError ─────────────────► DRAFT_ERROR        exit 6   │
//! │                                                                         │
//! │  main(): prints "Error: <message>" to stderr (or the JSON form with    │
//! │          --format json) and exits with the code above.                 │
//! │                                                                         │
//! │  A failed record-log append is NOT an AppError: the document exists,  │
//! │  so it is reported as a warning and the command succeeds.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use invoicer_core::{CoreError, ValidationError};
use invoicer_document::DocumentError;
use invoicer_store::StoreError;

use crate::integrations::IntegrationError;
use crate::state::{ConfigError, SessionError};

/// Error returned from command handlers.
///
/// ## Serialization
/// With `--format json` a failure prints:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "quantity must be positive"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes, one per failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad user input; nothing changed
    ValidationError,

    /// Document or draft file could not be written
    WriteError,

    /// Preview or print collaborator failed
    IntegrationFailure,

    /// Configuration file or values are invalid
    ConfigError,

    /// Draft file missing or unreadable
    DraftError,

    /// Unexpected internal failure
    Internal,
}

impl ErrorCode {
    /// Process exit code for this category.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::WriteError => 3,
            ErrorCode::IntegrationFailure => 4,
            ErrorCode::ConfigError => 5,
            ErrorCode::DraftError => 6,
        }
    }
}

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a write error.
    pub fn write(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::WriteError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.code.exit_code()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => AppError::from(e),
            other => AppError::validation(other.to_string()),
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::PageOutOfRange { .. } => AppError::internal(err.to_string()),
            DocumentError::Render(e) => {
                tracing::error!("Document rendering failed: {}", e);
                AppError::write(format!("Failed to render document: {}", e))
            }
            DocumentError::Write { .. } => AppError::write(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::write(err.to_string())
    }
}

impl From<IntegrationError> for AppError {
    fn from(err: IntegrationError) -> Self {
        AppError::new(ErrorCode::IntegrationFailure, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Save { .. } => AppError::write(err.to_string()),
            SessionError::Exists { .. } => AppError::validation(err.to_string()),
            _ => AppError::new(ErrorCode::DraftError, err.to_string()),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AppError {}
