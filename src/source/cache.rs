use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use log::debug;

use super::PartitionSource;
use crate::error::{Error, Result};

/// Keeps a local copy of every partition fetched from `inner`.
///
/// Copies land in `{root}/{path without scheme}` and are written through a
/// `.tmp` file plus rename, so an interrupted download never shows up as a
/// cached partition.
#[derive(Debug, Clone)]
pub struct CachedSource<S> {
    inner: S,
    root: PathBuf,
}

impl<S: PartitionSource> CachedSource<S> {
    pub fn new(inner: S, root: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            root: root.into(),
        }
    }

    pub fn cache_path(&self, path: &str) -> Result<PathBuf> {
        let relative = path.split_once("://").map_or(path, |(_, rest)| rest);
        let relative = Path::new(relative.trim_start_matches('/'));
        let mut cached = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => cached.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(Error::InvalidInput(format!(
                        "cannot cache path with relative components: {path}"
                    )))
                }
            }
        }
        if cached == self.root {
            return Err(Error::InvalidInput(format!("cannot cache empty path: {path}")));
        }
        Ok(cached)
    }

    fn store(&self, mut reader: Box<dyn Read>, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| Error::io(format!("create {}", parent.display()), err))?;
        }

        let tmp = tmp_path_for(dest);
        let _ = std::fs::remove_file(&tmp);
        let mut output = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .map_err(|err| Error::io(format!("create {}", tmp.display()), err))?;

        let copied = io::copy(&mut reader, &mut output)
            .and_then(|_| output.sync_all())
            .and_then(|_| std::fs::rename(&tmp, dest));
        if let Err(err) = copied {
            let _ = std::fs::remove_file(&tmp);
            return Err(Error::io(format!("cache {}", dest.display()), err));
        }
        Ok(())
    }
}

impl<S: PartitionSource> PartitionSource for CachedSource<S> {
    fn fetch(&self, path: &str) -> Result<Option<Box<dyn Read>>> {
        let cached = self.cache_path(path)?;
        if cached.is_file() {
            debug!("cache hit {}", cached.display());
            return open(&cached).map(Some);
        }

        let Some(reader) = self.inner.fetch(path)? else {
            return Ok(None);
        };
        debug!("caching {} at {}", path, cached.display());
        self.store(reader, &cached)?;
        open(&cached).map(Some)
    }

    fn kind(&self) -> &'static str {
        "cached"
    }
}

fn open(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|err| Error::io(format!("open {}", path.display()), err))?;
    Ok(Box::new(file))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.tmp"))
}
