// Ingestion pipeline: roster directory -> team/player index.
//
// One pass over a flat directory. Each `TEAM_PLAYER.ext` file is decoded,
// normalized, and appended to its team's entry list. A bad file is recorded
// in the report and never stops the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::decode::{DecodeError, DecoderChain};
use crate::identity::extract_identity;
use crate::normalize::{normalize_rows, NormalizeOptions, Normalized};
use crate::table::{read_table_file, SkipReason};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Run-level failure: the directory itself could not be listed.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to list roster directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// TeamPlayerIndex
// ---------------------------------------------------------------------------

/// Team name -> formatted player entries, in file then row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TeamPlayerIndex {
    teams: BTreeMap<String, Vec<String>>,
}

impl TeamPlayerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `team` has an entry, even if it ends up with no players.
    pub fn register_team(&mut self, team: &str) {
        if !self.teams.contains_key(team) {
            self.teams.insert(team.to_string(), Vec::new());
        }
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, team: &str, entries: I) {
        self.register_team(team);
        if let Some(list) = self.teams.get_mut(team) {
            list.extend(entries);
        }
    }

    pub fn players(&self, team: &str) -> Option<&[String]> {
        self.teams.get(team).map(Vec::as_slice)
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.teams.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn player_count(&self) -> usize {
        self.teams.values().map(Vec::len).sum()
    }

    /// No teams at all.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for TeamPlayerIndex {
    fn from(teams: BTreeMap<String, Vec<String>>) -> Self {
        TeamPlayerIndex { teams }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A roster file that contributed nothing, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: SkipReason,
}

/// Everything one ingestion pass produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub index: TeamPlayerIndex,
    pub skipped: Vec<SkippedFile>,
    /// Files whose rows made it into the index (possibly zero rows).
    pub files_read: usize,
    /// Files whose names do not match `TEAM_PLAYER.ext`.
    pub ignored: usize,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Decoding policy plus normalization policy for one ingestion run.
#[derive(Debug)]
pub struct Pipeline {
    pub chain: DecoderChain,
    pub options: NormalizeOptions,
}

impl Pipeline {
    pub fn new(chain: DecoderChain, options: NormalizeOptions) -> Self {
        Pipeline { chain, options }
    }

    pub fn from_config(config: &Config) -> Result<Self, DecodeError> {
        let chain = DecoderChain::from_labels(
            &config.encodings.candidates,
            config.encodings.sniff_bom,
        )?;
        Ok(Pipeline::new(chain, NormalizeOptions::from_config(config)))
    }

    /// Decode and normalize a single roster file.
    pub fn ingest_file(&self, path: &Path) -> Result<Normalized, SkipReason> {
        let table = read_table_file(path, &self.chain, self.options.required_columns())?;
        debug!(
            "{}: decoded as {}, {} row(s)",
            path.display(),
            table.label,
            table.rows.len()
        );
        Ok(normalize_rows(&table, &self.options))
    }
}

/// List `dir` and build the team index from every roster file in it.
///
/// Files are processed in name order. A team is registered as soon as one of
/// its filenames parses, so a team whose files were all skipped still appears
/// with no players.
pub fn ingest_directory(dir: &Path, pipeline: &Pipeline) -> Result<IngestReport, IngestError> {
    let mut report = IngestReport::default();

    for (file_name, path) in list_files(dir)? {
        let Some(identity) = extract_identity(&file_name) else {
            debug!("ignoring '{}': not TEAM_PLAYER.ext", file_name);
            report.ignored += 1;
            continue;
        };
        if !identity.is_complete() {
            debug!("ignoring '{}': empty team or player token", file_name);
            report.ignored += 1;
            continue;
        }

        report.index.register_team(&identity.team);

        match pipeline.ingest_file(&path) {
            Ok(normalized) => {
                debug!(
                    "{} / {}: {} entr(ies), {} missing, {} excluded",
                    identity.team,
                    identity.player,
                    normalized.entries.len(),
                    normalized.missing,
                    normalized.excluded
                );
                report.index.extend(&identity.team, normalized.entries);
                report.files_read += 1;
            }
            Err(reason) => {
                warn!("skipping roster file '{}': {}", file_name, reason);
                report.skipped.push(SkippedFile { file_name, reason });
            }
        }
    }

    info!(
        "ingested {} team(s), {} player(s) from {} file(s); {} skipped, {} ignored",
        report.index.team_count(),
        report.index.player_count(),
        report.files_read,
        report.skipped.len(),
        report.ignored
    );

    Ok(report)
}

/// Regular files in `dir` as `(file name, path)`, sorted by name.
pub(crate) fn list_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, IngestError> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        files.push((file_name, path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
