//! CSV Data Loader Module
//! Reads the accident CSV with Polars and memoizes the raw table per file version.

use polars::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Identifies one on-disk version of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileVersion {
    len: u64,
    modified: Option<SystemTime>,
}

impl FileVersion {
    fn of(path: &Path) -> Result<Self, LoaderError> {
        let meta = fs::metadata(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

struct CachedTable {
    path: PathBuf,
    version: FileVersion,
    df: Arc<DataFrame>,
}

/// Loads the raw accident table, reading each file version at most once.
///
/// The cached frame is handed out behind an `Arc` and never mutated; every
/// pipeline stage builds a new frame from it.
#[derive(Default)]
pub struct DataLoader {
    cache: Option<CachedTable>,
    reads: usize,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the raw table for `path`, re-reading only if the file changed.
    pub fn load(&mut self, path: &Path) -> Result<Arc<DataFrame>, LoaderError> {
        let version = FileVersion::of(path)?;

        if let Some(cached) = &self.cache {
            if cached.path == path && cached.version == version {
                debug!(path = %path.display(), "raw table cache hit");
                return Ok(Arc::clone(&cached.df));
            }
        }

        let df = Arc::new(Self::read_csv(path)?);
        self.reads += 1;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded CSV"
        );

        self.cache = Some(CachedTable {
            path: path.to_path_buf(),
            version,
            df: Arc::clone(&df),
        });
        Ok(df)
    }

    /// Drop the cached table so the next `load` reads from disk.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Number of times a file was actually read.
    pub fn read_count(&self) -> usize {
        self.reads
    }

    /// Path of the currently cached file.
    pub fn cached_path(&self) -> Option<&Path> {
        self.cache.as_ref().map(|c| c.path.as_path())
    }

    fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        // Unparseable cells are left for the cleaner to coerce
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;
        Ok(df)
    }
}
