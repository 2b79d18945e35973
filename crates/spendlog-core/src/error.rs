//! Error types for spendlog-core
//!
//! Three kinds of failure reach callers of the record store: a record that
//! fails validation, a write to storage that did not go through, and a slot
//! whose contents cannot be read back. The last one is logged by the store
//! rather than returned from `load`.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A record field is missing or invalid
    ValidationError,
    /// Storage write failed
    PersistenceError,
    /// Stored content could not be parsed
    CorruptData,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::PersistenceError => write!(f, "PERSISTENCE_ERROR"),
            ErrorCode::CorruptData => write!(f, "CORRUPT_DATA"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Operation rejected, nothing changed
    Warning,
    /// Operation partially failed, data may be lost
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for spendlog-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Corrupt data in slot {key}: {message}")]
    CorruptData { key: String, message: String },
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Validation { .. } => ErrorCode::ValidationError,
            CoreError::Persistence { .. } => ErrorCode::PersistenceError,
            CoreError::CorruptData { .. } => ErrorCode::CorruptData,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Validation { .. } => ErrorSeverity::Warning,
            CoreError::Persistence { .. } => ErrorSeverity::Error,
            CoreError::CorruptData { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Validation { field, .. } => {
                details = details.with_detail(serde_json::json!({ "field": field }));
                details = details.with_suggestion(format!(
                    "Check the value given for '{}' and submit again.", field
                ));
            }
            CoreError::Persistence { .. } => {
                details = details.with_suggestion(
                    "The expense was accepted but may not survive a restart.".to_string()
                );
                details = details.with_suggestion(
                    "Check free disk space and permissions on the storage directory.".to_string()
                );
            }
            CoreError::CorruptData { key, .. } => {
                details = details.with_detail(serde_json::json!({ "key": key }));
                details = details.with_suggestion(
                    "Stored expenses could not be read and were ignored.".to_string()
                );
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================
