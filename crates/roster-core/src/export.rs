// Saving a draw to disk as JSON.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::sampler::{SelectionGrid, SelectionResult};

/// Upper bound on `-N` suffixes tried for draws saved within one second.
const MAX_SUFFIX: u32 = 100;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize selection: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct SavedDraw<'a> {
    drawn_at: String,
    selection: &'a SelectionResult,
    table: SelectionGrid,
}

/// File name for a draw taken at `at`, e.g. `draw-20260301-141500.json`.
pub fn export_file_name(at: NaiveDateTime) -> String {
    format!("draw-{}.json", at.format("%Y%m%d-%H%M%S"))
}

/// `draw-YYYYMMDD-HHMMSS.json` for the first attempt, then `-2`, `-3`, ...
fn numbered_file_name(at: NaiveDateTime, n: u32) -> String {
    if n <= 1 {
        export_file_name(at)
    } else {
        format!("draw-{}-{}.json", at.format("%Y%m%d-%H%M%S"), n)
    }
}

/// Write `selection` (both the raw map and the padded table) to a new JSON
/// file in `dir`, creating the directory if needed. Returns the file path.
///
/// Existing files are never overwritten: a second save within the same
/// second gets a numeric suffix.
pub fn export_selection(
    dir: &Path,
    selection: &SelectionResult,
    at: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let saved = SavedDraw {
        drawn_at: at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        selection,
        table: selection.grid(),
    };
    let json = serde_json::to_string_pretty(&saved)?;

    let mut n = 1;
    let (path, mut file) = loop {
        let path = dir.join(numbered_file_name(at, n));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => break (path, file),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && n < MAX_SUFFIX => n += 1,
            Err(e) => return Err(ExportError::Write { path, source: e }),
        }
    };
    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::Write {
            path: path.clone(),
            source: e,
        })?;

    info!("saved draw to {}", path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::TeamPlayerIndex;
    use crate::sampler::{sample, SampleBounds};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(14, 15, 0)
            .unwrap()
    }

    #[test]
    fn file_name_uses_timestamp() {
        assert_eq!(export_file_name(at()), "draw-20260301-141500.json");
    }

    #[test]
    fn writes_selection_and_table() {
        let dir = std::env::temp_dir().join("roster_export_writes");
        let _ = std::fs::remove_dir_all(&dir);

        let mut index = TeamPlayerIndex::new();
        index.extend("Rovers", vec!["Ana(DF)".to_string()]);
        let selection = sample(
            &index,
            SampleBounds::new(1, 1).unwrap(),
            &mut ChaCha8Rng::seed_from_u64(0),
        );

        let path = export_selection(&dir.join("nested"), &selection, at()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["drawn_at"], "2026-03-01T14:15:00");
        assert_eq!(value["selection"]["Rovers"][0], "Ana(DF)");
        assert_eq!(value["table"]["header"][1], "Player 1");
        assert_eq!(value["table"]["rows"][0][0], "Rovers");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn same_second_saves_get_distinct_files() {
        let dir = std::env::temp_dir().join("roster_export_same_second");
        let _ = std::fs::remove_dir_all(&dir);

        let mut index = TeamPlayerIndex::new();
        index.extend("Rovers", vec!["Ana(DF)".to_string()]);
        let first = sample(
            &index,
            SampleBounds::new(1, 1).unwrap(),
            &mut ChaCha8Rng::seed_from_u64(0),
        );
        let second = sample(
            &index,
            SampleBounds::new(0, 0).unwrap(),
            &mut ChaCha8Rng::seed_from_u64(1),
        );

        let a = export_selection(&dir, &first, at()).unwrap();
        let b = export_selection(&dir, &second, at()).unwrap();
        let c = export_selection(&dir, &second, at()).unwrap();

        assert_eq!(a.file_name().unwrap(), "draw-20260301-141500.json");
        assert_eq!(b.file_name().unwrap(), "draw-20260301-141500-2.json");
        assert_eq!(c.file_name().unwrap(), "draw-20260301-141500-3.json");

        let kept: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&a).unwrap()).unwrap();
        assert_eq!(kept["selection"]["Rovers"][0], "Ana(DF)");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
