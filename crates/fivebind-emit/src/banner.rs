//! Provenance banners for generated files.
//!
//! The banner records when and by whom a file was generated. It is
//! informational only and never influences what is generated, so two runs
//! over the same table differ only in the provenance line.

use serde::{Deserialize, Serialize};

/// Who generated a file, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// UTC timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub generated_at: String,
    /// Identity of the invoking user.
    pub user: String,
}

impl Provenance {
    /// Provenance stamped with the current time.
    pub fn now(user: &str) -> Self {
        Self {
            generated_at: utc_now(),
            user: user.to_string(),
        }
    }

    /// Provenance with an explicit timestamp (reproducible output, tests).
    pub fn fixed(generated_at: &str, user: &str) -> Self {
        Self {
            generated_at: generated_at.to_string(),
            user: user.to_string(),
        }
    }
}

/// Where a unit's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin<'a> {
    /// Derived from the named descriptor source.
    Table(&'a str),
    /// Hand-authored and copied verbatim.
    Template,
}

/// Marker present on the provenance line of every banner.
pub const PROVENANCE_MARKER: &str = "It was last generated on";

/// Render the comment banner that opens every output unit.
pub fn render_banner(module: &str, origin: Origin<'_>, provenance: &Provenance) -> String {
    let source_line = match origin {
        Origin::Table(source) => format!("This file is automatically generated from {source}."),
        Origin::Template => {
            "This file is copied verbatim from the fivebind text template.".to_string()
        }
    };
    format!(
        "//\n\
         // Rust API for the libfive standard library's '{module}' module.\n\
         //\n\
         // DO NOT EDIT BY HAND!\n\
         // {source_line}\n\
         //\n\
         // {PROVENANCE_MARKER} {} by user {}.\n\
         //\n",
        provenance.generated_at, provenance.user
    )
}

fn utc_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_utc(secs)
}

/// Format seconds since the Unix epoch as a civil UTC timestamp.
fn format_utc(secs: u64) -> String {
    let day_secs = secs % 86_400;
    let hour = day_secs / 3600;
    let minute = (day_secs % 3600) / 60;
    let second = day_secs % 60;

    // civil_from_days: <https://howardhinnant.github.io/date_algorithms.html#civil_from_days>
    let z = (secs / 86_400) as i64 + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };

    format!("{y:04}-{m:02}-{d:02} {hour:02}:{minute:02}:{second:02}")
}
