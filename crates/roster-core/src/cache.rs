// Ingestion cache keyed by a directory fingerprint.
//
// Every "generate" re-checks the roster directory, but only re-reads files
// when the listing, sizes, or modification times changed.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::ingest::{ingest_directory, list_files, IngestError, IngestReport, Pipeline};

/// Name, size, and mtime of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    pub name: String,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Snapshot of a roster directory's regular files, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFingerprint {
    pub files: Vec<FileStamp>,
}

impl DirectoryFingerprint {
    pub fn scan(dir: &Path) -> Result<Self, IngestError> {
        let files = list_files(dir)?
            .into_iter()
            .map(|(name, path)| {
                let meta = std::fs::metadata(&path).ok();
                FileStamp {
                    name,
                    len: meta.as_ref().map_or(0, |m| m.len()),
                    modified: meta.and_then(|m| m.modified().ok()),
                }
            })
            .collect();
        Ok(DirectoryFingerprint { files })
    }
}

#[derive(Debug)]
struct Cached {
    dir: PathBuf,
    fingerprint: DirectoryFingerprint,
    report: IngestReport,
}

/// Holds the last ingestion report and the fingerprint it was built from.
#[derive(Debug, Default)]
pub struct IndexCache {
    cached: Option<Cached>,
    last_hit: bool,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached report for `dir` if the directory is unchanged,
    /// otherwise ingest it again and cache the result.
    pub fn get_or_ingest(
        &mut self,
        dir: &Path,
        pipeline: &Pipeline,
    ) -> Result<&IngestReport, IngestError> {
        let fingerprint = DirectoryFingerprint::scan(dir)?;

        let cached = match self.cached.take() {
            Some(c) if c.dir == dir && c.fingerprint == fingerprint => {
                debug!("roster cache hit for {}", dir.display());
                self.last_hit = true;
                c
            }
            _ => {
                debug!("roster cache miss for {}", dir.display());
                self.last_hit = false;
                Cached {
                    dir: dir.to_path_buf(),
                    fingerprint,
                    report: ingest_directory(dir, pipeline)?,
                }
            }
        };

        Ok(&self.cached.insert(cached).report)
    }

    /// Force the next `get_or_ingest` to re-read the directory.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Whether the most recent `get_or_ingest` was served from the cache.
    pub fn last_was_hit(&self) -> bool {
        self.last_hit
    }

    pub fn report(&self) -> Option<&IngestReport> {
        self.cached.as_ref().map(|c| &c.report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
