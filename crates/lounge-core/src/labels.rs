//! # Labels
//!
//! Editable display text keyed by label key. The admin label editor
//! replaces the whole table; lookups fall back to the key itself.
//!
//! ```rust
//! use lounge_core::labels::Labels;
//!
//! let labels = Labels::default();
//! assert_eq!(labels.translate("session_will_end_in", &["5"]), "Session will end in 5 seconds");
//! assert_eq!(labels.translate("not_a_key", &[]), "not_a_key");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::validate_label_key;

const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("dashboard", "Dashboard"),
    ("reports", "Reports"),
    ("admin", "Admin"),
    ("admin_panel", "Admin Panel"),
    ("login", "Login"),
    ("login_page_title", "Gaming Lounge Login"),
    ("username", "Username"),
    ("password", "Password"),
    ("submit", "Submit"),
    ("cancel", "Cancel"),
    ("confirm", "Confirm"),
    ("available", "Available"),
    ("busy", "Busy"),
    ("maintenance", "Maintenance"),
    ("device", "Device"),
    ("device_id", "Device"),
    ("device_management", "Device Management"),
    ("add_new_device", "Add New Device"),
    ("confirm_delete", "Delete this device?"),
    ("start", "Start"),
    ("start_session", "Start Session"),
    ("end_session", "End Session"),
    ("end_session_now", "End Session Now"),
    ("confirm_end_session", "End this session?"),
    ("session_details", "Session Details"),
    ("single", "Single"),
    ("double", "Double"),
    ("quad", "Quad"),
    ("game_type", "Game Type"),
    ("time_mode", "Time Mode"),
    ("open_time", "Open Time"),
    ("timed", "Timed"),
    ("time_remaining", "Time Remaining"),
    ("player_name", "Player Name"),
    ("start_time", "Start Time"),
    ("end_time", "End Time"),
    ("duration", "Duration"),
    ("duration_minutes", "Duration (minutes)"),
    ("minute_short", "min"),
    ("cost", "Cost"),
    ("total", "Total"),
    ("total_revenue_for", "Total revenue for"),
    ("report_details", "Report Details"),
    ("no_reports_for_selected_date", "No reports for the selected date"),
    ("delete_all_reports", "Delete All Reports"),
    ("confirm_delete_all_reports", "Delete all reports? This cannot be undone."),
    ("print_html", "Print"),
    ("print_pdf", "Export Document"),
    ("page_of", "Page {0} of {1}"),
    ("choose_action", "Choose an action"),
    ("session_time_ended_for", "Session time ended for {0}"),
    ("session_will_end_in", "Session will end in {0} seconds"),
    ("extend_time", "Extend Time"),
    ("extend_session_for", "Extend session for {0}"),
    ("additional_time", "Additional Time"),
    ("confirm_extension", "Confirm Extension"),
    ("switch_to_open_time", "Switch to Open Time"),
    ("price_management", "Price Management"),
    ("single_price_per_hour", "Single price per hour"),
    ("double_price_per_hour", "Double price per hour"),
    ("quad_price_per_hour", "Quad price per hour"),
    ("update_prices", "Update Prices"),
    ("label_management", "Label Management"),
    ("save_labels", "Save Labels"),
    ("password_management", "Password Management"),
    ("passwords_updated_success", "Passwords updated"),
    ("enter_admin_password", "Enter admin password"),
    ("admin_panel_password", "Admin panel password"),
    ("login_username", "Login username"),
    ("login_password", "Login password"),
    ("reports_management", "Reports Management"),
    ("theme_switcher", "Switch Theme"),
];

/// Label key → display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Labels(BTreeMap<String, String>);

impl Default for Labels {
    fn default() -> Self {
        Labels(
            DEFAULT_LABELS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl Labels {
    /// Builds a table after checking every key is non-blank.
    pub fn from_map(map: BTreeMap<String, String>) -> Result<Self, ValidationError> {
        for key in map.keys() {
            validate_label_key(key)?;
        }
        Ok(Labels(map))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up `key` and substitutes `{0}`, `{1}`, … with `args`.
    ///
    /// Missing or empty entries render as the key. Each placeholder is
    /// replaced once.
    pub fn translate(&self, key: &str, args: &[&str]) -> String {
        let mut text = match self.get(key) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => key.to_string(),
        };
        for (index, arg) in args.iter().enumerate() {
            text = text.replacen(&format!("{{{}}}", index), arg, 1);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_exported_headings() {
        let labels = Labels::default();
        for key in [
            "device_id",
            "player_name",
            "start_time",
            "end_time",
            "duration",
            "game_type",
            "cost",
            "total",
            "report_details",
            "no_reports_for_selected_date",
            "single",
            "double",
            "quad",
        ] {
            assert!(labels.get(key).is_some(), "missing default label {key}");
        }
    }

    #[test]
    fn test_translate_substitutes_args() {
        let labels = Labels::default();
        assert_eq!(labels.translate("page_of", &["2", "3"]), "Page 2 of 3");
        assert_eq!(
            labels.translate("session_time_ended_for", &["PS-4"]),
            "Session time ended for PS-4"
        );
    }

    #[test]
    fn test_translate_falls_back_to_key() {
        let mut map = BTreeMap::new();
        map.insert("dashboard".to_string(), String::new());
        let labels = Labels::from_map(map).unwrap();
        assert_eq!(labels.translate("dashboard", &[]), "dashboard");
        assert_eq!(labels.translate("reports", &[]), "reports");
    }

    #[test]
    fn test_blank_key_rejected() {
        let mut map = BTreeMap::new();
        map.insert("  ".to_string(), "x".to_string());
        assert!(Labels::from_map(map).is_err());
    }
}
