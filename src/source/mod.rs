//! Where partition bytes come from.
//!
//! A source hands back the raw (still compressed) bytes of one partition
//! object, or `None` when the object does not exist. Decompression and
//! decoding happen in [`crate::stream`].

mod cache;
mod local;
#[cfg(feature = "remote")]
mod s3;

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

pub use cache::CachedSource;
pub use local::LocalSource;
#[cfg(feature = "remote")]
pub use s3::S3Source;

pub const S3_SCHEME: &str = "s3://";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub trait PartitionSource {
    /// Opens the object at `path`. `Ok(None)` means it does not exist.
    fn fetch(&self, path: &str) -> Result<Option<Box<dyn Read>>>;

    fn kind(&self) -> &'static str;
}

impl<S: PartitionSource + ?Sized> PartitionSource for Box<S> {
    fn fetch(&self, path: &str) -> Result<Option<Box<dyn Read>>> {
        (**self).fetch(path)
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Region of the bucket when talking to AWS directly.
    pub region: String,
    /// Base URL of an S3-compatible endpoint; objects are fetched from
    /// `{endpoint}/{bucket}/{key}`.
    pub endpoint: Option<String>,
    pub timeout: Duration,
    /// Local copy of remote partitions, reused across queries.
    pub cache_dir: Option<PathBuf>,
}

impl SourceConfig {
    pub fn new() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            cache_dir: None,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Bucket and key of an `s3://bucket/key` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    pub fn parse(path: &str) -> Result<Self> {
        let rest = path
            .strip_prefix(S3_SCHEME)
            .ok_or_else(|| Error::InvalidInput(format!("not an s3 path: {path}")))?;
        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() || key.is_empty() {
            return Err(Error::InvalidInput(format!(
                "s3 path must look like s3://bucket/key: {path}"
            )));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

/// Picks the source for a data location: `s3://` prefixes go to the object
/// store, anything else is a local directory.
pub fn source_for(location: &str, config: &SourceConfig) -> Result<Box<dyn PartitionSource>> {
    if location.is_empty() {
        return Err(Error::InvalidInput("data source is required".to_string()));
    }
    let Some(rest) = location.strip_prefix(S3_SCHEME) else {
        return Ok(Box::new(LocalSource::new()));
    };

    let bucket = rest.split('/').next().unwrap_or("");
    if bucket.is_empty() {
        return Err(Error::InvalidInput(format!(
            "s3 data source has no bucket: {location}"
        )));
    }
    remote_source(config)
}

#[cfg(feature = "remote")]
fn remote_source(config: &SourceConfig) -> Result<Box<dyn PartitionSource>> {
    let remote = S3Source::new(config)?;
    match &config.cache_dir {
        Some(dir) => Ok(Box::new(CachedSource::new(remote, dir))),
        None => Ok(Box::new(remote)),
    }
}

#[cfg(not(feature = "remote"))]
fn remote_source(_config: &SourceConfig) -> Result<Box<dyn PartitionSource>> {
    Err(Error::InvalidInput(
        "s3 data sources need the `remote` feature".to_string(),
    ))
}
