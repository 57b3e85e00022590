//! # Command Errors
//!
//! Every command returns `Result<T, ApiError>`; Tauri serializes the error
//! into the rejected `invoke` promise.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Lounge POS                             │
//! │                                                                         │
//! │  Frontend                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  invoke('start_session')                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Rule violated? ─── CoreError::DeviceBusy(3) ──────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Save failed? ───── DbError::QueryFailed ──────── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  try {                                                                  │
//! │    await invoke('start_session', { request })                           │
//! │  } catch (e) {                                                          │
//! │    // e.code = "DEVICE_BUSY"                                            │
//! │    // e.message = "Device 3 is busy"                                    │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wrong passwords are not errors. `login` answers `false` and
//! `verify_admin_password` answers `null`.

use lounge_core::{CoreError, ValidationError};
use lounge_db::DbError;
use serde::Serialize;

/// What the frontend receives when a command fails.
///
/// ```json
/// {
///   "code": "DEVICE_NOT_AVAILABLE",
///   "message": "Device 4 is not available (status: maintenance)"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Stable code the UI switches on
    pub code: ErrorCode,

    /// Text shown to the operator
    pub message: String,
}

/// Failure categories. Serialized as `DEVICE_BUSY` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Device or session not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// The device has a running session
    DeviceBusy,

    /// The device is in maintenance (or otherwise not startable)
    DeviceNotAvailable,

    /// The operation needs a timed session, or a status change is not allowed
    BusinessLogic,

    /// Admin panel is locked or the unlock level is too low
    AdminRequired,

    /// Internal error (poisoned lock, encode failure)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn admin_required(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::AdminRequired, message)
    }
}

/// Storage details go to the log; the operator only sees the category.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("State serialization failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Could not save state")
            }
            DbError::Busy => {
                ApiError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Rule violations keep their message, which names the device.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::DeviceNotFound(id) => ApiError::not_found("Device", &id.to_string()),
            CoreError::SessionNotFound(id) => ApiError::not_found("Session", &id.to_string()),
            CoreError::DeviceBusy(_) => ApiError::new(ErrorCode::DeviceBusy, message),
            CoreError::DeviceNotAvailable { .. } => {
                ApiError::new(ErrorCode::DeviceNotAvailable, message)
            }
            CoreError::SessionNotTimed(_)
            | CoreError::InvalidStatusChange { .. }
            | CoreError::DeviceIdsExhausted => {
                ApiError::new(ErrorCode::BusinessLogic, message)
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("State encode failed: {}", err);
        ApiError::internal("Could not encode state")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
