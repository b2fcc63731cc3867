// Status bar widget: roster directory, index counts, last draw time.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::IngestSummary;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [app name] [directory] [teams/players] [cache] [last draw]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        " roster-draw ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    match &state.summary {
        Some(summary) => spans.extend(summary_spans(summary)),
        None => spans.push(Span::styled(
            " no roster data loaded",
            Style::default().fg(Color::DarkGray),
        )),
    }

    if let Some(at) = &state.drawn_at {
        spans.push(separator());
        spans.push(Span::styled(
            format!("drawn {}", at),
            Style::default().fg(Color::Green),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

fn separator() -> Span<'static> {
    Span::styled(" | ", Style::default().fg(Color::Gray))
}

/// Directory, counts, and cache state for a loaded index.
pub fn summary_spans(summary: &IngestSummary) -> Vec<Span<'static>> {
    let mut spans = vec![
        Span::styled(
            format!(" {}", summary.directory),
            Style::default().fg(Color::White),
        ),
        separator(),
        Span::styled(
            format!("{} teams, {} players", summary.teams, summary.players),
            Style::default().fg(Color::White),
        ),
    ];

    if !summary.skipped.is_empty() {
        spans.push(separator());
        spans.push(Span::styled(
            format!("{} skipped", summary.skipped.len()),
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(separator());
    spans.push(Span::styled(
        cache_label(summary.from_cache),
        Style::default().fg(Color::DarkGray),
    ));
    spans
}

pub fn cache_label(from_cache: bool) -> &'static str {
    if from_cache {
        "cached"
    } else {
        "fresh read"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
