//! # Report Log
//!
//! Append-only list of billed sessions, plus the two printable exports.
//!
//! ## Export Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ReportLog ──for_date(d)──► [&Report] ──┬──► render_html()   (print)    │
//! │                                          │                               │
//! │                                          └──► paginate() ──► to_text()   │
//! │                                                 25 rows/page  \x0c breaks│
//! │                                                                         │
//! │  Both read labels for headings and ExportOptions for clock + currency.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use ts_rs::TS;

use crate::labels::Labels;
use crate::money::Money;
use crate::types::Report;

// =============================================================================
// Report Log
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportLog(Vec<Report>);

impl ReportLog {
    pub fn new(reports: Vec<Report>) -> Self {
        ReportLog(reports)
    }

    pub fn push(&mut self, report: Report) {
        self.0.push(report);
    }

    pub fn as_slice(&self) -> &[Report] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reports dated `date`, in insertion order.
    pub fn for_date(&self, date: NaiveDate) -> Vec<&Report> {
        self.0.iter().filter(|r| r.date == date).collect()
    }

    pub fn total_for(&self, date: NaiveDate) -> Money {
        self.for_date(date).into_iter().map(|r| r.cost).sum()
    }

    /// Removes every report. Returns how many were removed.
    pub fn delete_all(&mut self) -> usize {
        let count = self.0.len();
        self.0.clear();
        count
    }
}

// =============================================================================
// Export Options
// =============================================================================

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Offset used to print start and end times.
    pub offset: FixedOffset,
    pub currency_symbol: String,
    pub rows_per_page: usize,
    /// Shown above the table, typically the lounge name.
    pub title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            offset: Utc.fix(),
            currency_symbol: "$".to_string(),
            rows_per_page: crate::DEFAULT_ROWS_PER_PAGE,
            title: "Game Lounge".to_string(),
        }
    }
}

impl ExportOptions {
    /// `utc_offset_minutes` outside ±24h falls back to UTC.
    pub fn with_offset_minutes(mut self, utc_offset_minutes: i32) -> Self {
        self.offset = FixedOffset::east_opt(utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
        self
    }

    fn clock(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset).format("%H:%M:%S").to_string()
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }
}

/// One formatted report line, shared by both exports.
struct Row {
    device: String,
    player: String,
    start: String,
    end: String,
    duration: String,
    game_type: String,
    cost: String,
}

impl Row {
    fn of(report: &Report, labels: &Labels, options: &ExportOptions) -> Self {
        Row {
            device: report.device_id.to_string(),
            player: report.player_name.clone().unwrap_or_else(|| "-".to_string()),
            start: options.clock(report.start_time),
            end: options.clock(report.end_time),
            duration: format!(
                "{} {}",
                report.duration_minutes,
                labels.translate("minute_short", &[])
            ),
            game_type: labels.translate(report.game_type.label_key(), &[]),
            cost: options.money(report.cost),
        }
    }

    fn cells(&self) -> [&str; 7] {
        [
            &self.device,
            &self.player,
            &self.start,
            &self.end,
            &self.duration,
            &self.game_type,
            &self.cost,
        ]
    }
}

fn headings(labels: &Labels) -> [String; 7] {
    [
        "device_id",
        "player_name",
        "start_time",
        "end_time",
        "duration",
        "game_type",
        "cost",
    ]
    .map(|key| labels.translate(key, &[]))
}

// =============================================================================
// HTML Export
// =============================================================================

/// Escapes text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders a standalone right-to-left page for the printer.
pub fn render_html(
    reports: &[&Report],
    date: NaiveDate,
    labels: &Labels,
    options: &ExportOptions,
) -> String {
    let title = escape_html(&labels.translate("report_details", &[]));
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html dir=\"rtl\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n\
         body {{ font-family: 'Cairo', sans-serif; direction: rtl; }}\n\
         table {{ width: 100%; border-collapse: collapse; }}\n\
         th, td {{ border: 1px solid #ddd; padding: 8px; text-align: right; }}\n\
         th {{ background-color: #f2f2f2; }}\n\
         h1, h2 {{ text-align: center; }}\n\
         </style>\n</head>\n<body>\n<h1>{}</h1>\n<h2>{title} {date}</h2>\n",
        escape_html(&options.title),
    );

    if reports.is_empty() {
        let _ = writeln!(
            html,
            "<p>{}</p>",
            escape_html(&labels.translate("no_reports_for_selected_date", &[]))
        );
    } else {
        html.push_str("<table>\n<thead>\n<tr>");
        for heading in headings(labels) {
            let _ = write!(html, "<th>{}</th>", escape_html(&heading));
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");

        for report in reports {
            let row = Row::of(report, labels, options);
            html.push_str("<tr>");
            for cell in row.cells() {
                let _ = write!(html, "<td>{}</td>", escape_html(cell));
            }
            html.push_str("</tr>\n");
        }

        let total: Money = reports.iter().map(|r| r.cost).sum();
        let _ = write!(
            html,
            "</tbody>\n<tfoot>\n<tr><td colspan=\"6\"><strong>{}</strong></td><td><strong>{}</strong></td></tr>\n</tfoot>\n</table>\n",
            escape_html(&labels.translate("total", &[])),
            escape_html(&options.money(total)),
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

// =============================================================================
// Paginated Export
// =============================================================================

/// A report export split into fixed-size pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedReport {
    pub pages: Vec<String>,
}

impl PagedReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages joined with form feeds, ready for a line printer or a file.
    pub fn to_text(&self) -> String {
        self.pages.join("\x0c")
    }
}

/// Splits `reports` into pages of `options.rows_per_page` rows.
///
/// Every page carries the title, the date and `n/N`. The grand total is
/// printed once, on the last page. No reports still gives one page with
/// the empty-state message.
pub fn paginate(
    reports: &[&Report],
    date: NaiveDate,
    labels: &Labels,
    options: &ExportOptions,
) -> PagedReport {
    let per_page = options.rows_per_page.max(1);
    let chunks: Vec<&[&Report]> = if reports.is_empty() {
        vec![reports]
    } else {
        reports.chunks(per_page).collect()
    };
    let page_total = chunks.len();
    let total: Money = reports.iter().map(|r| r.cost).sum();

    let headings = headings(labels);
    let pages = chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let mut page = String::new();
            let _ = writeln!(page, "{}", options.title);
            let _ = writeln!(
                page,
                "{} {}    {}/{}",
                labels.translate("report_details", &[]),
                date,
                index + 1,
                page_total
            );
            page.push('\n');

            if reports.is_empty() {
                let _ = writeln!(page, "{}", labels.translate("no_reports_for_selected_date", &[]));
                return page;
            }

            let _ = writeln!(page, "{}", text_line(&headings.each_ref().map(String::as_str)));
            let _ = writeln!(page, "{}", "-".repeat(LINE_WIDTH));
            for report in chunk.iter() {
                let row = Row::of(report, labels, options);
                let _ = writeln!(page, "{}", text_line(&row.cells()));
            }

            if index + 1 == page_total {
                let _ = writeln!(page, "{}", "-".repeat(LINE_WIDTH));
                let _ = writeln!(
                    page,
                    "{}: {}",
                    labels.translate("total", &[]),
                    options.money(total)
                );
            }
            page
        })
        .collect();

    PagedReport { pages }
}

const COLUMN_WIDTHS: [usize; 7] = [8, 20, 10, 10, 10, 10, 12];
const LINE_WIDTH: usize = 8 + 20 + 10 + 10 + 10 + 10 + 12 + 6;

fn text_line(cells: &[&str; 7]) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(COLUMN_WIDTHS).enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let cell: String = cell.chars().take(width).collect();
        let pad = width.saturating_sub(cell.chars().count());
        line.push_str(&cell);
        line.extend(std::iter::repeat(' ').take(pad));
    }
    line.trim_end().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
