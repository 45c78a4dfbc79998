//! Point-in-time query: pick the day partition for the target instant, stream
//! its events through a [`StateResolver`] and report the result.

use log::{debug, info};

use crate::clock::parse_instant_with_layout;
use crate::error::{Error, Result};
use crate::partition::PartitionKey;
use crate::resolver::{resolve_stream, ResolvedState};
use crate::source::PartitionSource;
use crate::stream::EventStream;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub fields: Vec<String>,
    /// Directory or `s3://bucket/prefix` holding `YYYY/MM/DD.jsonl.gz` partitions.
    pub location: String,
    pub timestamp: String,
}

impl Query {
    pub fn new<I, S>(fields: I, location: impl Into<String>, timestamp: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            location: location.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::InvalidInput("at least one --field is required".to_string()));
        }
        if self.fields.iter().any(String::is_empty) {
            return Err(Error::InvalidInput("field names must not be empty".to_string()));
        }
        if self.location.is_empty() {
            return Err(Error::InvalidInput("data source is required".to_string()));
        }
        if self.timestamp.is_empty() {
            return Err(Error::InvalidInput("target timestamp is required".to_string()));
        }
        Ok(())
    }
}

/// Runs `query` against `source`.
pub fn run_query(query: &Query, source: &dyn PartitionSource) -> Result<ResolvedState> {
    query.validate()?;

    let (target, layout) = parse_instant_with_layout(&query.timestamp)
        .map_err(|err| Error::invalid_time("target timestamp", err))?;
    debug!("target {} parsed as {:?}", target, layout);

    let partition = PartitionKey::for_instant(target);
    let path = partition.object_path(&query.location);
    info!("reading {} partition {}", source.kind(), path);

    let Some(reader) = source.fetch(&path)? else {
        return Err(Error::NotFound { path });
    };

    let events = EventStream::gzip(reader, path);
    resolve_stream(events, query.fields.iter().cloned(), target)
}
