// Application state and command handling.
//
// Owns the loaded config, the ingestion pipeline, and the index cache.
// Each `UserCommand` from the TUI is handled synchronously and answered with
// the `UiUpdate`s the TUI needs to redraw.

use chrono::Local;
use rand::Rng;
use tracing::{error, info, warn};

use roster_core::cache::IndexCache;
use roster_core::config::Config;
use roster_core::decode::DecodeError;
use roster_core::export::export_selection;
use roster_core::ingest::{IngestReport, Pipeline};
use roster_core::sampler::{draw, DrawOutcome, SampleBounds, SelectionResult};

use crate::protocol::{IngestSummary, StatusMessage, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pipeline: Pipeline,
    cache: IndexCache,
    /// Most recent successful draw; what `Save` writes.
    last_selection: Option<SelectionResult>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, DecodeError> {
        let pipeline = Pipeline::from_config(&config)?;
        Ok(AppState {
            config,
            pipeline,
            cache: IndexCache::new(),
            last_selection: None,
        })
    }

    pub fn last_selection(&self) -> Option<&SelectionResult> {
        self.last_selection.as_ref()
    }

    /// Read the roster directory once so the status bar has numbers before
    /// the first draw.
    pub fn load(&mut self) -> Vec<UiUpdate> {
        match self.refresh_index() {
            Ok(summary) => vec![UiUpdate::Ingested(summary)],
            Err(message) => vec![UiUpdate::Message(message)],
        }
    }

    /// Handle one command. `Quit` is a no-op here; the TUI loop owns exit.
    pub fn handle_command<R: Rng + ?Sized>(
        &mut self,
        cmd: UserCommand,
        rng: &mut R,
    ) -> Vec<UiUpdate> {
        match cmd {
            UserCommand::Generate { min, max } => self.generate(min, max, rng),
            UserCommand::Rescan => {
                info!("rescan requested");
                self.cache.invalidate();
                match self.refresh_index() {
                    Ok(summary) => vec![
                        UiUpdate::Ingested(summary),
                        UiUpdate::Message(StatusMessage::info("Roster directory rescanned")),
                    ],
                    Err(message) => vec![UiUpdate::Message(message)],
                }
            }
            UserCommand::Save => vec![UiUpdate::Message(self.save())],
            UserCommand::Quit => Vec::new(),
        }
    }

    fn generate<R: Rng + ?Sized>(&mut self, min: usize, max: usize, rng: &mut R) -> Vec<UiUpdate> {
        let bounds = match SampleBounds::new(min, max) {
            Ok(b) => b,
            Err(e) => {
                warn!("rejected draw: {}", e);
                return vec![UiUpdate::Message(StatusMessage::error(
                    "Minimum exceeds maximum",
                ))];
            }
        };

        let summary = match self.refresh_index() {
            Ok(s) => s,
            Err(message) => return vec![UiUpdate::Message(message)],
        };
        let dir = summary.directory.clone();
        let Some(report) = self.cache.report() else {
            return vec![UiUpdate::Ingested(summary)];
        };

        let mut updates = vec![UiUpdate::Ingested(summary)];
        match draw(&report.index, bounds, rng) {
            DrawOutcome::Selected(selection) => {
                info!(
                    "drew {} player(s) across {} team(s) with bounds {}..={}",
                    selection.iter().map(|(_, p)| p.len()).sum::<usize>(),
                    selection.team_count(),
                    bounds.min(),
                    bounds.max()
                );
                updates.push(UiUpdate::Drawn {
                    selection: selection.clone(),
                    at: Local::now().format("%H:%M:%S").to_string(),
                });
                self.last_selection = Some(selection);
            }
            DrawOutcome::NoPlayersFound => {
                info!("no players found in {}", dir);
                self.last_selection = None;
                updates.push(UiUpdate::SelectionCleared);
                updates.push(UiUpdate::Message(StatusMessage::info(format!(
                    "No players found in {}",
                    dir
                ))));
            }
        }
        updates
    }

    fn save(&self) -> StatusMessage {
        let Some(selection) = &self.last_selection else {
            return StatusMessage::warning("Nothing to save yet, draw first");
        };
        match export_selection(
            &self.config.export.directory,
            selection,
            Local::now().naive_local(),
        ) {
            Ok(path) => StatusMessage::info(format!("Saved to {}", path.display())),
            Err(e) => {
                error!("export failed: {}", e);
                StatusMessage::error(e.to_string())
            }
        }
    }

    fn refresh_index(&mut self) -> Result<IngestSummary, StatusMessage> {
        let dir = &self.config.roster.directory;
        let mut summary = match self.cache.get_or_ingest(dir, &self.pipeline) {
            Ok(report) => summarize(&dir.display().to_string(), report),
            Err(e) => {
                error!("ingestion failed: {}", e);
                return Err(StatusMessage::error(e.to_string()));
            }
        };
        summary.from_cache = self.cache.last_was_hit();
        Ok(summary)
    }
}

/// Flatten an ingestion report for the status bar and warnings panel.
/// `from_cache` starts out false; the caller knows whether it was a hit.
pub fn summarize(directory: &str, report: &IngestReport) -> IngestSummary {
    IngestSummary {
        directory: directory.to_string(),
        teams: report.index.team_count(),
        players: report.index.player_count(),
        files_read: report.files_read,
        skipped: report
            .skipped
            .iter()
            .map(|s| format!("{}: {}", s.file_name, s.reason))
            .collect(),
        from_cache: false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::MessageLevel;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        tmp
    }

    /// App over a scratch roster directory with two teams.
    fn app_with_rosters(name: &str) -> (AppState, PathBuf) {
        let dir = scratch_dir(name);
        let rosters = dir.join("rosters");
        fs::create_dir_all(&rosters).unwrap();
        fs::write(rosters.join("TeamA_John.csv"), "id,name,pos\nx,John,GK\nx,Mark,PT\n").unwrap();
        fs::write(rosters.join("TeamB_Ana.csv"), "id,name,pos\nx,Ana,DF\nx,Bo,MF\n").unwrap();

        let mut config = Config::default();
        config.roster.directory = rosters;
        config.export.directory = dir.join("draws");
        (AppState::new(config).unwrap(), dir)
    }

    fn messages(updates: &[UiUpdate]) -> Vec<&StatusMessage> {
        updates
            .iter()
            .filter_map(|u| match u {
                UiUpdate::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn load_reports_counts() {
        let (mut app, dir) = app_with_rosters("roster_app_load");
        let updates = app.load();
        match &updates[0] {
            UiUpdate::Ingested(summary) => {
                assert_eq!(summary.teams, 2);
                assert_eq!(summary.players, 3);
                assert_eq!(summary.files_read, 2);
                assert!(summary.skipped.is_empty());
                assert!(!summary.from_cache);
            }
            other => panic!("expected Ingested, got {:?}", other),
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn generate_draws_and_remembers_selection() {
        let (mut app, dir) = app_with_rosters("roster_app_generate");
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let updates = app.handle_command(UserCommand::Generate { min: 1, max: 1 }, &mut rng);
        let selection = updates
            .iter()
            .find_map(|u| match u {
                UiUpdate::Drawn { selection, .. } => Some(selection.clone()),
                _ => None,
            })
            .expect("a draw");

        assert_eq!(selection.selected("TeamA").unwrap(), ["John(GK)"]);
        assert_eq!(selection.selected("TeamB").unwrap().len(), 1);
        assert_eq!(app.last_selection(), Some(&selection));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn second_generate_uses_cache() {
        let (mut app, dir) = app_with_rosters("roster_app_cache");
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        app.handle_command(UserCommand::Generate { min: 0, max: 2 }, &mut rng);
        let updates = app.handle_command(UserCommand::Generate { min: 0, max: 2 }, &mut rng);
        assert!(matches!(
            &updates[0],
            UiUpdate::Ingested(IngestSummary { from_cache: true, .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rescan_bypasses_cache() {
        let (mut app, dir) = app_with_rosters("roster_app_rescan");
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        app.load();
        let updates = app.handle_command(UserCommand::Rescan, &mut rng);
        assert!(matches!(
            &updates[0],
            UiUpdate::Ingested(IngestSummary { from_cache: false, .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn min_above_max_is_rejected() {
        let (mut app, dir) = app_with_rosters("roster_app_bad_bounds");
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let updates = app.handle_command(UserCommand::Generate { min: 3, max: 1 }, &mut rng);
        let msgs = messages(&updates);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].level, MessageLevel::Error);
        assert_eq!(msgs[0].text, "Minimum exceeds maximum");
        assert!(app.last_selection().is_none());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_directory_reports_no_players() {
        let dir = scratch_dir("roster_app_empty");
        let mut config = Config::default();
        config.roster.directory = dir.clone();
        let mut app = AppState::new(config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let updates = app.handle_command(UserCommand::Generate { min: 0, max: 3 }, &mut rng);
        assert!(updates.contains(&UiUpdate::SelectionCleared));
        let msgs = messages(&updates);
        assert!(msgs[0].text.starts_with("No players found"));
        assert_eq!(msgs[0].level, MessageLevel::Info);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_is_an_error_message() {
        let dir = std::env::temp_dir().join("roster_app_missing_dir");
        let _ = fs::remove_dir_all(&dir);
        let mut config = Config::default();
        config.roster.directory = dir;
        let mut app = AppState::new(config).unwrap();

        let updates = app.load();
        let msgs = messages(&updates);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].level, MessageLevel::Error);
    }

    #[test]
    fn save_without_draw_warns() {
        let (mut app, dir) = app_with_rosters("roster_app_save_empty");
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        let updates = app.handle_command(UserCommand::Save, &mut rng);
        assert_eq!(messages(&updates)[0].level, MessageLevel::Warning);
        assert!(!dir.join("draws").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_writes_json_file() {
        let (mut app, dir) = app_with_rosters("roster_app_save");
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        app.handle_command(UserCommand::Generate { min: 1, max: 2 }, &mut rng);
        let updates = app.handle_command(UserCommand::Save, &mut rng);
        assert_eq!(messages(&updates)[0].level, MessageLevel::Info);

        let saved: Vec<_> = fs::read_dir(dir.join("draws"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(saved.len(), 1);
        let name = saved[0].file_name().to_string_lossy().to_string();
        assert!(name.starts_with("draw-") && name.ends_with(".json"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn quit_produces_no_updates() {
        let (mut app, dir) = app_with_rosters("roster_app_quit");
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        assert!(app.handle_command(UserCommand::Quit, &mut rng).is_empty());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn summarize_formats_skipped_files() {
        use roster_core::ingest::SkippedFile;
        use roster_core::table::SkipReason;

        let report = IngestReport {
            skipped: vec![SkippedFile {
                file_name: "Rovers_Bad.csv".to_string(),
                reason: SkipReason::EmptyFile,
            }],
            ..IngestReport::default()
        };
        let summary = summarize("rosters", &report);
        assert_eq!(summary.skipped, vec!["Rovers_Bad.csv: file is empty"]);
        assert_eq!(summary.directory, "rosters");
    }
}
