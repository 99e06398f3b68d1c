//! Work-experience duration resolution.
//!
//! Date strings arrive from the LLM as free text and are resolved in two
//! stages: a multi-format calendar parse, then a year/month digit fallback.
//! Entries that fail both stages contribute nothing and are skipped — a
//! malformed entry must never abort the candidate.

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// End-date aliases that resolve to "today" at evaluation time. Matching is
/// case-insensitive. Evaluating against the current date makes results
/// drift over time for open-ended positions; that is accepted behavior.
const PRESENT_ALIASES: &[&str] = &["present", "current", "now"];

/// One position as reported by the extraction model. Dates are free-form
/// strings, not validated types — validation happens at resolution time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperienceEntry {
    pub position: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
}

/// The extraction model's full answer for one CV. An empty list is the
/// degraded form used when extraction fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperienceRecord {
    pub work_experience: Vec<WorkExperienceEntry>,
}

/// Total work experience across all resolvable entries.
///
/// Invariant: `total_months == years * 12 + months` and `months` is in
/// `[0, 11]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceSummary {
    pub total_months: u32,
    pub years: u32,
    pub months: u32,
    pub formatted: String,
}

impl ExperienceSummary {
    fn from_total_months(total_months: u32) -> Self {
        let years = total_months / 12;
        let months = total_months % 12;
        Self {
            total_months,
            years,
            months,
            formatted: format!("{years} years, {months} months"),
        }
    }
}

/// Computes total experience against the current UTC date.
pub fn total_experience(record: &WorkExperienceRecord) -> ExperienceSummary {
    total_experience_as_of(record, Utc::now().date_naive())
}

/// Computes total experience against an injected "today", summing the
/// whole-month span of every entry whose dates resolve. Unresolvable entries
/// are skipped silently; they are best-effort model output, not user input.
pub fn total_experience_as_of(record: &WorkExperienceRecord, today: NaiveDate) -> ExperienceSummary {
    let mut total_months: u32 = 0;

    for entry in &record.work_experience {
        let start_raw = entry.start_date.trim();
        if start_raw.is_empty() {
            continue;
        }
        let Some(start) = resolve_date(start_raw) else {
            debug!(start = %entry.start_date, "unresolvable start date, skipping entry");
            continue;
        };

        let end_raw = entry.end_date.trim();
        let end = if PRESENT_ALIASES.contains(&end_raw.to_lowercase().as_str()) {
            today
        } else {
            match resolve_date(end_raw) {
                Some(d) => d,
                None => {
                    debug!(end = %entry.end_date, "unresolvable end date, skipping entry");
                    continue;
                }
            }
        };

        total_months += whole_months_between(start, end).max(0) as u32;
    }

    ExperienceSummary::from_total_months(total_months)
}

/// Calendar delta in whole months. Day-of-month is ignored: Jan 31 → Feb 1
/// counts as one month. Negative when `end` precedes `start`.
fn whole_months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

/// Two-stage date resolution: calendar formats first, then a bare
/// year/month digit pattern anywhere in the string.
fn resolve_date(raw: &str) -> Option<NaiveDate> {
    parse_calendar(raw).or_else(|| parse_year_month_digits(raw))
}

const FULL_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

// Month-year inputs are completed with day 1 before parsing, matching the
// digit-fallback convention below.
const MONTH_YEAR_FORMATS: &[&str] = &["%B %Y", "%b %Y", "%B, %Y", "%Y-%m", "%Y/%m", "%m/%Y"];

fn parse_calendar(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for fmt in FULL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in MONTH_YEAR_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw} 1"), &format!("{fmt} %d")) {
            return Some(date);
        }
    }
    None
}

/// Fallback for non-standard strings: finds a 4-digit year followed by a
/// 1–2 digit month (`2021-6`, `2021/06`, or embedded in prose) and resolves
/// to the first of that month. Out-of-range months fail the resolution.
fn parse_year_month_digits(raw: &str) -> Option<NaiveDate> {
    static YEAR_MONTH: OnceLock<Regex> = OnceLock::new();
    let re = YEAR_MONTH.get_or_init(|| Regex::new(r"(\d{4})[-/]?(\d{1,2})").expect("valid regex"));

    let caps = re.captures(raw)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}
