//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can surface: missing configuration, absent
//! entities, rejected inputs, state conflicts, and storage failures.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, and the HTTP layer
/// maps each variant to a status code.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::EntityNotFound {
///     entity: "employee".to_string(),
///     id: "emp_001".to_string(),
/// };
/// assert_eq!(error.to_string(), "employee not found: emp_001");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rule-set file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Rule-set file or setting could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path (or setting name) that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No effective configuration exists in the store.
    #[error("No effective payroll configuration is active")]
    ConfigurationMissing,

    /// An employee, ledger entry, or document does not exist.
    #[error("{entity} not found: {id}")]
    EntityNotFound {
        /// The kind of entity that was looked up.
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// An input failed validation.
    #[error("Invalid field '{field}': {message}")]
    ValidationError {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The operation conflicts with the current state of a record.
    #[error("Conflict: {message}")]
    ConflictError {
        /// A description of the conflict.
        message: String,
    },

    /// A storage, rendering, or serialization failure.
    #[error("Persistence error: {message}")]
    PersistenceError {
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Creates a `ValidationError` for the given field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an `EntityNotFound` error.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        EngineError::EntityNotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a `ConflictError`.
    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::ConflictError {
            message: message.into(),
        }
    }

    /// Creates a `PersistenceError`.
    pub fn persistence(message: impl Into<String>) -> Self {
        EngineError::PersistenceError {
            message: message.into(),
        }
    }
}

/// Maps sqlx errors into the engine taxonomy.
///
/// ```text
/// RowNotFound                      -> EntityNotFound
/// UNIQUE constraint failed: ...    -> ConflictError
/// anything else                    -> PersistenceError
/// ```
impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => EngineError::not_found("record", "unknown"),
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("UNIQUE constraint failed") {
                    EngineError::conflict(format!("concurrent write rejected ({})", msg))
                } else {
                    EngineError::persistence(msg.to_string())
                }
            }
            other => EngineError::persistence(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for EngineError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        EngineError::persistence(format!("migration failed: {}", err))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::persistence(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::persistence(format!("serialization failed: {}", err))
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
