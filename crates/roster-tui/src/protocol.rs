// Messages exchanged between the TUI and the app layer.
//
// The TUI turns key presses into `UserCommand`s; the app answers each
// command with a batch of `UiUpdate`s that the TUI folds into its ViewState.

use roster_core::sampler::SelectionResult;

/// Which slider has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderId {
    Min,
    Max,
}

impl SliderId {
    pub fn toggle(self) -> Self {
        match self {
            SliderId::Min => SliderId::Max,
            SliderId::Max => SliderId::Min,
        }
    }
}

/// Commands sent from the TUI to the app layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Re-check the roster directory and draw a new selection.
    Generate { min: usize, max: usize },
    /// Drop the cached index and re-read every roster file.
    Rescan,
    /// Write the current selection to the export directory.
    Save,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// One-line message shown above the help bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            level: MessageLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        StatusMessage {
            level: MessageLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            level: MessageLevel::Error,
            text: text.into(),
        }
    }
}

/// What the last ingestion pass found, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub directory: String,
    pub teams: usize,
    pub players: usize,
    pub files_read: usize,
    /// `"<file>: <reason>"` for each skipped file.
    pub skipped: Vec<String>,
    pub from_cache: bool,
}

/// Updates sent from the app layer to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Ingested(IngestSummary),
    Drawn {
        selection: SelectionResult,
        /// Local wall-clock time of the draw, `HH:MM:SS`.
        at: String,
    },
    SelectionCleared,
    Message(StatusMessage),
}
