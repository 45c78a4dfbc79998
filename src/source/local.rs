use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::PathBuf;

use log::debug;

use super::PartitionSource;
use crate::error::{Error, Result};

/// Partitions stored under a local directory.
#[derive(Debug, Clone, Default)]
pub struct LocalSource;

impl LocalSource {
    pub fn new() -> Self {
        Self
    }
}

impl PartitionSource for LocalSource {
    fn fetch(&self, path: &str) -> Result<Option<Box<dyn Read>>> {
        let path = local_path(path);
        debug!("opening {}", path.display());
        match File::open(&path) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::io(format!("open {}", path.display()), err)),
        }
    }

    fn kind(&self) -> &'static str {
        "local"
    }
}

fn local_path(path: &str) -> PathBuf {
    PathBuf::from(path.strip_prefix("file://").unwrap_or(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("2016/01/01.jsonl.gz");
        let fetched = LocalSource::new()
            .fetch(path.to_str().expect("utf8 path"))
            .expect("fetch");
        assert!(fetched.is_none());
    }

    #[test]
    fn reads_file_scheme() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("01.jsonl.gz");
        std::fs::write(&path, b"payload").expect("write");

        let uri = format!("file://{}", path.display());
        let mut reader = LocalSource::new().fetch(&uri).expect("fetch").expect("found");
        let mut data = Vec::new();
        reader.read_to_end(&mut data).expect("read");
        assert_eq!(data, b"payload");
    }

    #[test]
    fn directory_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = LocalSource::new()
            .fetch(dir.path().to_str().expect("utf8 path"))
            .and_then(|reader| {
                let mut reader = reader.expect("found");
                let mut data = Vec::new();
                reader
                    .read_to_end(&mut data)
                    .map_err(|err| Error::io("read", err))
            });
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
