//! # Report Commands
//!
//! The daily report screen and its two exports.
//!
//! Dates arrive as `YYYY-MM-DD` and match the UTC start date of each
//! session. Export times are shown in the configured UTC offset.

use serde::Serialize;
use tauri::State;
use tracing::{debug, info, warn};

use lounge_core::reports::{paginate, render_html};
use lounge_core::validation::parse_report_date;
use lounge_core::{AdminAccess, AppState, ExportOptions, Money, Report};

use crate::error::ApiError;
use crate::state::{DbState, LoungeConfig, LoungeState};

/// Reports of one day with their total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: String,
    pub reports: Vec<Report>,
    pub total: Money,
}

/// The paginated export, one string per page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextExport {
    pub pages: Vec<String>,
    pub page_count: usize,
    /// Pages joined with form feeds.
    pub text: String,
}

fn daily_report(state: &AppState, date: &str) -> Result<DailyReport, ApiError> {
    let day = parse_report_date(date)?;
    Ok(DailyReport {
        date: day.to_string(),
        reports: state.reports.for_date(day).into_iter().cloned().collect(),
        total: state.reports.total_for(day),
    })
}

fn html_export(state: &AppState, date: &str, options: &ExportOptions) -> Result<String, ApiError> {
    let day = parse_report_date(date)?;
    let reports = state.reports.for_date(day);
    Ok(render_html(&reports, day, &state.labels, options))
}

fn text_export(
    state: &AppState,
    date: &str,
    options: &ExportOptions,
) -> Result<TextExport, ApiError> {
    let day = parse_report_date(date)?;
    let reports = state.reports.for_date(day);
    let paged = paginate(&reports, day, &state.labels, options);
    Ok(TextExport {
        page_count: paged.page_count(),
        text: paged.to_text(),
        pages: paged.pages,
    })
}

/// Gets the reports of one day.
#[tauri::command]
pub fn get_reports(
    lounge: State<'_, LoungeState>,
    date: String,
) -> Result<DailyReport, ApiError> {
    debug!(date = %date, "get_reports command");
    lounge.with_state(|s| daily_report(s, &date))?
}

/// Renders the day as a printable right-to-left HTML page.
#[tauri::command]
pub fn export_report_html(
    lounge: State<'_, LoungeState>,
    config: State<'_, LoungeConfig>,
    date: String,
) -> Result<String, ApiError> {
    debug!(date = %date, "export_report_html command");
    let options = config.export_options();
    lounge.with_state(|s| html_export(s, &date, &options))?
}

/// Renders the day as fixed-width text pages.
#[tauri::command]
pub fn export_report_text(
    lounge: State<'_, LoungeState>,
    config: State<'_, LoungeConfig>,
    date: String,
) -> Result<TextExport, ApiError> {
    debug!(date = %date, "export_report_text command");
    let options = config.export_options();
    lounge.with_state(|s| text_export(s, &date, &options))?
}

/// Deletes every report. Needs the admin panel unlocked.
#[tauri::command]
pub async fn delete_all_reports(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
) -> Result<usize, ApiError> {
    debug!("delete_all_reports command");
    lounge.require_admin(AdminAccess::Full)?;

    let (removed, json) = lounge.mutate(|s| Ok::<_, ApiError>(s.delete_reports()))?;
    db.save(&json).await?;

    warn!(removed, "All reports deleted");
    Ok(removed)
}
