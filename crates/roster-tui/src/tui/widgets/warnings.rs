// Warnings widget: files skipped by the last ingestion pass.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let skipped = state
        .summary
        .as_ref()
        .map(|s| s.skipped.as_slice())
        .unwrap_or_default();

    let paragraph = Paragraph::new(warning_lines(skipped))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Skipped files ({})", skipped.len())),
        );
    frame.render_widget(paragraph, area);
}

pub fn warning_lines(skipped: &[String]) -> Vec<Line<'static>> {
    if skipped.is_empty() {
        return vec![Line::from(Span::styled(
            " No files skipped.",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    skipped
        .iter()
        .map(|s| {
            Line::from(vec![
                Span::styled(" ! ", Style::default().fg(Color::Yellow)),
                Span::raw(s.clone()),
            ])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_placeholder() {
        let lines = warning_lines(&[]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), " No files skipped.");
    }

    #[test]
    fn one_line_per_skipped_file() {
        let skipped = vec![
            "A_x.csv: file is empty".to_string(),
            "B_y.csv: has 1 column(s), needs at least 3".to_string(),
        ];
        let lines = warning_lines(&skipped);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].to_string(), " ! B_y.csv: has 1 column(s), needs at least 3");
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(60, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &ViewState::default()))
            .unwrap();
    }
}
