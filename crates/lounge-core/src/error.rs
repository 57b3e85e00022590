//! # Lounge Errors
//!
//! Rule violations and bad input, raised by `AppState` operations.
//!
//! ## Where They Go
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lounge-core errors (this file)                                        │
//! │  ├── CoreError        - Device/session rule violations                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  lounge-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Tauri API errors (in app)                                             │
//! │  └── ApiError         - What frontend sees (serialized)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wrong credentials are not errors: `login` returns `false` and
//! `verify_admin` returns `None`, and the UI shows an inline message.

use thiserror::Error;

use crate::types::{DeviceId, DeviceStatus};

/// A device or session rule was broken. Nothing was changed.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceId),

    /// The device has a running session, so it cannot be deleted or take
    /// a second one.
    #[error("Device {0} is busy")]
    DeviceBusy(DeviceId),

    /// The device cannot accept a session in its current status.
    ///
    /// ```text
    /// start_session(PS-4) ──► status = maintenance
    ///                    ──► DeviceNotAvailable { id: 4, status: Maintenance }
    ///                    ──► "PS-4 is under maintenance"
    /// ```
    #[error("Device {id} is not available (status: {status})")]
    DeviceNotAvailable { id: DeviceId, status: DeviceStatus },

    #[error("No active session on device {0}")]
    SessionNotFound(DeviceId),

    /// Extending or switching to open time needs a timed session.
    #[error("Session on device {0} is open-ended")]
    SessionNotTimed(DeviceId),

    /// A stored device id is already `u32::MAX`, so no next id exists.
    #[error("No device id left to assign")]
    DeviceIdsExhausted,

    /// A manual status change would break the busy-iff-session rule.
    #[error("Cannot change device {id} from {from} to {to}")]
    InvalidStatusChange {
        id: DeviceId,
        from: DeviceStatus,
        to: DeviceStatus,
    },

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

/// Input rejected before any state changes. `field` is the camelCase name
/// the frontend uses.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Required { field: String },

    #[error("{field} is longer than {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be from {min} to {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Unparseable text, e.g. a report date that is not `YYYY-MM-DD`.
    #[error("{field} is not valid: {reason}")]
    InvalidFormat { field: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_errors_name_the_status() {
        let unavailable = CoreError::DeviceNotAvailable {
            id: 4,
            status: DeviceStatus::Maintenance,
        };
        assert_eq!(
            unavailable.to_string(),
            "Device 4 is not available (status: maintenance)"
        );

        let change = CoreError::InvalidStatusChange {
            id: 2,
            from: DeviceStatus::Available,
            to: DeviceStatus::Busy,
        };
        assert_eq!(change.to_string(), "Cannot change device 2 from available to busy");
    }

    #[test]
    fn test_validation_messages_use_field_name() {
        let missing = ValidationError::Required {
            field: "loginUser".to_string(),
        };
        assert_eq!(missing.to_string(), "loginUser cannot be empty");

        let range = ValidationError::OutOfRange {
            field: "minutes".to_string(),
            min: 1,
            max: 1440,
        };
        assert_eq!(range.to_string(), "minutes must be from 1 to 1440");
    }

    #[test]
    fn test_question_mark_lifts_validation_into_core() {
        fn check(minutes: u32) -> CoreResult<u32> {
            if minutes == 0 {
                Err(ValidationError::MustBePositive {
                    field: "minutes".to_string(),
                })?;
            }
            Ok(minutes)
        }

        assert!(matches!(check(0), Err(CoreError::Validation(_))));
        assert_eq!(check(30).unwrap(), 30);
    }
}
