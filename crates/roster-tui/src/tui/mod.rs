// TUI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors what the app layer last reported.
// The loop is synchronous: poll for a key, turn it into a `UserCommand`,
// hand that to `AppState`, fold the returned `UiUpdate`s into the ViewState,
// and redraw.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{self, Event};
use ratatui::{DefaultTerminal, Frame};
use tracing::{debug, info};

use roster_core::config::SamplingConfig;
use roster_core::sampler::SelectionResult;

use crate::app::AppState;
use crate::protocol::{IngestSummary, SliderId, StatusMessage, UiUpdate, UserCommand};

use layout::build_layout;

/// How long to wait for a key before redrawing anyway.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state read by `render_frame`.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Lower bound slider value.
    pub min: usize,
    /// Upper bound slider value.
    pub max: usize,
    /// Upper end of both sliders.
    pub slider_max: usize,
    pub focus: SliderId,
    /// Last ingestion pass, if any succeeded.
    pub summary: Option<IngestSummary>,
    pub selection: Option<SelectionResult>,
    /// Wall-clock time of the current selection.
    pub drawn_at: Option<String>,
    pub message: Option<StatusMessage>,
    /// Rows scrolled off the top of the selection table.
    pub table_scroll: usize,
    pub confirm_quit: bool,
}

impl ViewState {
    pub fn new(sampling: &SamplingConfig) -> Self {
        ViewState {
            min: sampling.default_min,
            max: sampling.default_max,
            slider_max: sampling.slider_max,
            focus: SliderId::Min,
            summary: None,
            selection: None,
            drawn_at: None,
            message: None,
            table_scroll: 0,
            confirm_quit: false,
        }
    }

    pub fn slider_value(&self, id: SliderId) -> usize {
        match id {
            SliderId::Min => self.min,
            SliderId::Max => self.max,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(&SamplingConfig::default())
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Ingested(summary) => {
            state.summary = Some(summary);
        }
        UiUpdate::Drawn { selection, at } => {
            state.message = Some(StatusMessage::info(format!(
                "Drew {} team(s)",
                selection.team_count()
            )));
            state.selection = Some(selection);
            state.drawn_at = Some(at);
            state.table_scroll = 0;
        }
        UiUpdate::SelectionCleared => {
            state.selection = None;
            state.drawn_at = None;
            state.table_scroll = 0;
        }
        UiUpdate::Message(message) => {
            state.message = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete screen.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::sliders::render(frame, layout.sliders, state);
    widgets::selection::render(frame, layout.selection, state);
    widgets::warnings::render(frame, layout.warnings, state);
    widgets::help_bar::render(frame, layout.message, layout.help_bar, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits.
///
/// Initializes the terminal, installs a panic hook that restores it, loads
/// the roster directory once, then alternates between drawing and handling
/// key presses. The terminal is restored on every exit path.
pub fn run(mut app: AppState) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(&app.config.sampling);
    for update in app.load() {
        apply_ui_update(&mut view_state, update);
    }

    let result = event_loop(&mut terminal, &mut app, &mut view_state);

    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut AppState,
    view_state: &mut ViewState,
) -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    loop {
        terminal.draw(|frame| render_frame(frame, view_state))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key_event) = event::read()? else {
            // Resize and mouse events just trigger the next redraw
            continue;
        };
        let Some(cmd) = input::handle_key(key_event, view_state) else {
            continue;
        };
        if cmd == UserCommand::Quit {
            info!("quit requested");
            return Ok(());
        }

        debug!("command: {:?}", cmd);
        for update in app.handle_command(cmd, &mut rng) {
            apply_ui_update(view_state, update);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
