//! # Application State
//!
//! The whole persisted record and its JSON codec.
//!
//! ## Persisted Shape
//! ```text
//! {
//!   "theme": "dark",
//!   "isAuthenticated": false,
//!   "devices":  [{ "id": 1, "name": "PS-1", "status": "available" }, …],
//!   "sessions": { "3": { "deviceId": 3, "startTime": "…", … } },
//!   "reports":  [{ "id": "1767290400000-3", … }],
//!   "prices":   { "single": 300, "double": 500, "quad": 800 },
//!   "labels":   { "dashboard": "Dashboard", … },
//!   "credentials": { "loginUser": "admin", "loginPass": "1234", "adminPass": "admin" }
//! }
//! ```
//!
//! ## Lenient Loading
//! Each top-level field is decoded on its own. A missing or malformed field
//! falls back to its default and is listed in [`LoadedState::fallbacks`];
//! the other fields still load. Only a blob that is not JSON at all fails.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::billing::PriceTable;
use crate::labels::Labels;
use crate::registry::DeviceRegistry;
use crate::reports::ReportLog;
use crate::sessions::SessionTable;
use crate::types::{Credentials, DeviceId, DeviceStatus, Report, SessionStatus, Theme};

// =============================================================================
// App State
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub theme: Theme,
    pub is_authenticated: bool,
    pub devices: DeviceRegistry,
    pub sessions: SessionTable,
    pub reports: ReportLog,
    pub prices: PriceTable,
    pub labels: Labels,
    pub credentials: Credentials,

    /// Report of the most recent end, for the receipt prompt. Not persisted.
    #[serde(skip)]
    #[ts(skip)]
    pub last_ended: Option<Report>,
}

/// Why a persisted field was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Missing,
    Malformed(String),
}

/// A persisted field that did not load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFallback {
    pub field: &'static str,
    pub reason: FallbackReason,
}

/// Result of [`AppState::from_json`].
#[derive(Debug, Clone)]
pub struct LoadedState {
    pub state: AppState,
    pub fallbacks: Vec<FieldFallback>,
}

impl LoadedState {
    /// Fields that were present but could not be decoded.
    pub fn malformed(&self) -> impl Iterator<Item = &FieldFallback> {
        self.fallbacks
            .iter()
            .filter(|f| matches!(f.reason, FallbackReason::Malformed(_)))
    }
}

/// Devices touched by [`AppState::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Sessions removed because their device is gone or they already ended.
    pub dropped_sessions: Vec<DeviceId>,
    /// Devices set to busy because they have a session.
    pub marked_busy: Vec<DeviceId>,
    /// Busy devices without a session, set back to available.
    pub freed: Vec<DeviceId>,
}

impl Reconciled {
    pub fn is_clean(&self) -> bool {
        self.dropped_sessions.is_empty() && self.marked_busy.is_empty() && self.freed.is_empty()
    }
}

// =============================================================================
// Codec
// =============================================================================

impl AppState {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a persisted blob field by field.
    ///
    /// The result is not reconciled; call [`AppState::reconcile`] next.
    pub fn from_json(json: &str) -> Result<LoadedState, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        let empty = Map::new();
        let object = value.as_object().unwrap_or(&empty);

        let mut fallbacks = Vec::new();
        let mut field = |name: &'static str| -> Option<Value> {
            match object.get(name) {
                Some(Value::Null) | None => {
                    fallbacks.push(FieldFallback {
                        field: name,
                        reason: FallbackReason::Missing,
                    });
                    None
                }
                Some(v) => Some(v.clone()),
            }
        };

        let theme = field("theme");
        let is_authenticated = field("isAuthenticated");
        let devices = field("devices");
        let sessions = field("sessions");
        let reports = field("reports");
        let prices = field("prices");
        let labels = field("labels");
        let credentials = field("credentials");

        let mut state = AppState {
            theme: decode("theme", theme, &mut fallbacks),
            is_authenticated: decode("isAuthenticated", is_authenticated, &mut fallbacks),
            devices: decode("devices", devices, &mut fallbacks),
            sessions: decode("sessions", sessions, &mut fallbacks),
            reports: decode("reports", reports, &mut fallbacks),
            prices: decode("prices", prices, &mut fallbacks),
            labels: decode("labels", labels, &mut fallbacks),
            credentials: decode("credentials", credentials, &mut fallbacks),
            last_ended: None,
        };

        // Rejected price tables would otherwise bill out of range
        if let Err(e) = state.prices.validate() {
            fallbacks.push(FieldFallback {
                field: "prices",
                reason: FallbackReason::Malformed(e.to_string()),
            });
            state.prices = PriceTable::default();
        }

        Ok(LoadedState { state, fallbacks })
    }

    /// Restores "busy exactly when a session exists" after a load.
    pub fn reconcile(&mut self) -> Reconciled {
        let mut outcome = Reconciled::default();

        let devices = &self.devices;
        self.sessions.retain(|session| {
            let keep =
                session.status != SessionStatus::Ended && devices.contains(session.device_id);
            if !keep {
                outcome.dropped_sessions.push(session.device_id);
            }
            keep
        });

        for device in self.devices.iter_mut() {
            let has_session = self.sessions.contains(device.id);
            if has_session && device.status != DeviceStatus::Busy {
                device.status = DeviceStatus::Busy;
                outcome.marked_busy.push(device.id);
            } else if !has_session && device.status == DeviceStatus::Busy {
                device.status = DeviceStatus::Available;
                outcome.freed.push(device.id);
            }
        }

        outcome
    }
}

fn decode<T: DeserializeOwned + Default>(
    name: &'static str,
    value: Option<Value>,
    fallbacks: &mut Vec<FieldFallback>,
) -> T {
    let Some(value) = value else {
        return T::default();
    };
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            fallbacks.push(FieldFallback {
                field: name,
                reason: FallbackReason::Malformed(e.to_string()),
            });
            T::default()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
