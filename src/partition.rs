use std::fmt;

use time::OffsetDateTime;

pub const PARTITION_SUFFIX: &str = ".jsonl.gz";

/// One day of change events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionKey {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl PartitionKey {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Day containing `instant`, taken in the instant's own offset.
    pub fn for_instant(instant: OffsetDateTime) -> Self {
        let date = instant.date();
        Self::new(date.year(), date.month() as u8, date.day())
    }

    /// `{prefix}/{YYYY}/{MM}/{DD}`, with any trailing `/` on the prefix dropped.
    pub fn identifier(&self, prefix: &str) -> String {
        format!("{}/{}", prefix.trim_end_matches('/'), self)
    }

    /// Identifier of the compressed partition object under `prefix`.
    pub fn object_path(&self, prefix: &str) -> String {
        format!("{}{PARTITION_SUFFIX}", self.identifier(prefix))
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}
