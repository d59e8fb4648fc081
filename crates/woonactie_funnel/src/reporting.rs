#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use woonactie_contracts::MonotonicTimeMs;
use woonactie_storage::{SubmissionRecord, SubmissionStore};

use crate::audit::{AuditEventType, AuditSeverity, AuditSink};

/// Shown on the reporting screen when a fetch fails. Previously loaded rows
/// stay visible alongside it.
pub const FETCH_FAILED_MESSAGE: &str = "Fout bij het laden van gegevens";

/// Fixed export header. Columns mirror the table, rendered in capture order
/// with the creation date last.
pub const CSV_HEADER: &str = "Naam,Email,Telefoon,Postcode,Huisnummer,Toevoeging,Oplossing,Datum";

/// Aggregates over one fetched result set. Derived in memory on every load,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadStats {
    pub total: usize,
    pub today: usize,
    pub top_solution: Option<String>,
    pub distinct_postcodes: usize,
}

/// Compute stats over rows as fetched (newest first). `today` follows the
/// caller's wall clock and timezone, so a row stored late in the UTC evening
/// can still count as today for an operator ahead of UTC.
pub fn derive_stats<Tz: TimeZone>(rows: &[SubmissionRecord], now: &DateTime<Tz>) -> LeadStats {
    let today_local = now.date_naive();
    let today = rows
        .iter()
        .filter(|r| {
            r.created_at.with_timezone(&now.timezone()).date_naive() == today_local
        })
        .count();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.solution.as_str()).or_insert(0) += 1;
    }
    let max = counts.values().copied().max().unwrap_or(0);
    // Ties go to the solution seen first in fetch order.
    let top_solution = rows
        .iter()
        .find(|r| counts.get(r.solution.as_str()) == Some(&max))
        .map(|r| r.solution.clone());

    let distinct_postcodes = rows
        .iter()
        .map(|r| r.postcode.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    LeadStats {
        total: rows.len(),
        today,
        top_solution,
        distinct_postcodes,
    }
}

/// Render the export: header plus one line per row, newline separated with no
/// trailing newline. Field values are written literally. `None` when there is
/// nothing to export.
pub fn render_csv<Tz: TimeZone>(rows: &[SubmissionRecord], tz: &Tz) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for row in rows {
        let date = row.created_at.with_timezone(tz).date_naive();
        lines.push(format!(
            "{},{},{},{},{},{},{},{}-{}-{}",
            row.full_name,
            row.email,
            row.phone,
            row.postcode,
            row.house_number,
            row.house_number_suffix,
            row.solution,
            date.day(),
            date.month(),
            date.year(),
        ));
    }
    Some(lines.join("\n"))
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("form-submissions-{}.csv", date.format("%Y-%m-%d"))
}

/// Operator-facing report over everything the funnel has stored. Plain
/// read-model: fetch, aggregate, export.
#[derive(Debug, Default)]
pub struct ReportingScreen {
    rows: Vec<SubmissionRecord>,
    stats: Option<LeadStats>,
    last_error: Option<&'static str>,
}

impl ReportingScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[SubmissionRecord] {
        &self.rows
    }

    pub fn stats(&self) -> Option<&LeadStats> {
        self.stats.as_ref()
    }

    pub fn last_error(&self) -> Option<&'static str> {
        self.last_error
    }

    /// Fetch all rows and rebuild the stats. Serves both the first load and
    /// the refresh action. On failure the previous rows and stats stay up and
    /// only the error message changes.
    pub fn load<S: SubmissionStore, Tz: TimeZone>(
        &mut self,
        store: &S,
        now: &DateTime<Tz>,
        audit: &mut impl AuditSink,
        at: MonotonicTimeMs,
    ) -> bool {
        match store.list_all() {
            Ok(rows) => {
                self.stats = Some(derive_stats(&rows, now));
                self.rows = rows;
                self.last_error = None;
                true
            }
            Err(err) => {
                audit.emit(
                    at,
                    AuditEventType::ReportFetchFailed,
                    AuditSeverity::Error,
                    format!("report fetch failed: {err:?}"),
                );
                self.last_error = Some(FETCH_FAILED_MESSAGE);
                false
            }
        }
    }

    pub fn export_csv<Tz: TimeZone>(&self, tz: &Tz) -> Option<String> {
        render_csv(&self.rows, tz)
    }

    /// Write the export next to `dir` under the dated file name. The row
    /// dates follow `now`'s timezone; the file name always uses the UTC date.
    /// Exporting an empty set writes nothing and is not an error.
    pub fn write_csv_export<Tz: TimeZone>(
        &self,
        dir: &Path,
        now: &DateTime<Tz>,
        audit: &mut impl AuditSink,
        at: MonotonicTimeMs,
    ) -> std::io::Result<Option<PathBuf>> {
        let Some(csv) = self.export_csv(&now.timezone()) else {
            return Ok(None);
        };
        let file_name = export_file_name(now.with_timezone(&Utc).date_naive());
        let path = dir.join(&file_name);
        fs::write(&path, csv)?;
        audit.emit(
            at,
            AuditEventType::ReportExported,
            AuditSeverity::Info,
            format!("exported {} row(s) to {}", self.rows.len(), file_name),
        );
        Ok(Some(path))
    }
}
