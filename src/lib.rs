//! Point-in-time state reconstruction from field change logs.
//!
//! Change events are stored one day per object as gzip-compressed
//! newline-delimited JSON under `{location}/{YYYY}/{MM}/{DD}.jsonl.gz`, either
//! in a local directory or an S3 bucket. A query names a set of fields and an
//! instant; the day's events are scanned once and each field gets the value
//! in effect at that instant.

pub mod clock;
pub mod error;
pub mod event;
pub mod partition;
pub mod query;
pub mod resolver;
pub mod source;
pub mod stream;

pub use clock::{parse_instant, TimeParseError};
pub use error::{DataError, Error, Result};
pub use event::{ChangeEvent, FieldValue};
pub use partition::PartitionKey;
pub use query::{run_query, Query};
pub use resolver::{resolve_state, resolve_stream, ResolvedState, StateOutput, StateResolver};
pub use source::{source_for, PartitionSource, SourceConfig};
pub use stream::EventStream;
