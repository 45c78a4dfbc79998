//! Timestamp normalization.
//!
//! Change logs and callers write timestamps at whatever precision they had
//! at hand. Every accepted spelling is an ISO-8601 style `date T time`
//! with an optional fraction and an optional offset; they are all reduced to
//! a single [`OffsetDateTime`]. Inputs without an offset are taken as UTC.

use thiserror::Error;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("timestamp is empty")]
    Empty,
    #[error("unrecognized timestamp {input:?} (expected YYYY-MM-DDTHH:MM[:SS[.fraction]][Z|+HH:MM])")]
    Unrecognized { input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Subsecond,
    Second,
    Minute,
}

/// One accepted timestamp spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub precision: Precision,
    pub zoned: bool,
}

/// Accepted layouts, most specific first. The first one that parses wins.
pub const LAYOUTS: [Layout; 6] = [
    Layout { precision: Precision::Subsecond, zoned: true },
    Layout { precision: Precision::Subsecond, zoned: false },
    Layout { precision: Precision::Second, zoned: true },
    Layout { precision: Precision::Second, zoned: false },
    Layout { precision: Precision::Minute, zoned: true },
    Layout { precision: Precision::Minute, zoned: false },
];

impl Layout {
    pub fn parse(self, input: &str) -> Option<OffsetDateTime> {
        if !self.zoned {
            return self.parse_local(input).map(PrimitiveDateTime::assume_utc);
        }
        if let Some(local) = input.strip_suffix('Z') {
            return self.parse_local(local).map(PrimitiveDateTime::assume_utc);
        }

        let parsed = match self.precision {
            Precision::Subsecond => OffsetDateTime::parse(
                input,
                format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
                ),
            ),
            Precision::Second => OffsetDateTime::parse(
                input,
                format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
                ),
            ),
            Precision::Minute => OffsetDateTime::parse(
                input,
                format_description!(
                    "[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory]:[offset_minute]"
                ),
            ),
        };
        parsed.ok()
    }

    fn parse_local(self, input: &str) -> Option<PrimitiveDateTime> {
        let parsed = match self.precision {
            Precision::Subsecond => PrimitiveDateTime::parse(
                input,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
            ),
            Precision::Second => PrimitiveDateTime::parse(
                input,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
            ),
            Precision::Minute => PrimitiveDateTime::parse(
                input,
                format_description!("[year]-[month]-[day]T[hour]:[minute]"),
            ),
        };
        parsed.ok()
    }
}

pub fn parse_instant(input: &str) -> Result<OffsetDateTime, TimeParseError> {
    parse_instant_with_layout(input).map(|(instant, _)| instant)
}

/// Like [`parse_instant`], also reporting which layout matched.
pub fn parse_instant_with_layout(
    input: &str,
) -> Result<(OffsetDateTime, Layout), TimeParseError> {
    if input.is_empty() {
        return Err(TimeParseError::Empty);
    }
    LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(input).map(|instant| (instant, *layout)))
        .ok_or_else(|| TimeParseError::Unrecognized {
            input: input.to_string(),
        })
}

/// `YYYY-MM-DDTHH:MM:SS` in the instant's own offset, fraction dropped.
pub fn format_seconds(instant: OffsetDateTime) -> String {
    let date = instant.date();
    let time = instant.time();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        date.year(),
        date.month() as u8,
        date.day(),
        time.hour(),
        time.minute(),
        time.second()
    )
}
