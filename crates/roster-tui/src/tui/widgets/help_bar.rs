// Message line and help bar.
//
// The message line shows the most recent status message, colored by level.
// The help bar lists the key bindings.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::MessageLevel;
use crate::tui::ViewState;

pub const HELP_TEXT: &str =
    " Tab:Focus | \u{2190}/\u{2192}:Adjust | g/Enter:Draw | r:Rescan | s:Save | \u{2191}/\u{2193}:Scroll | q:Quit";

pub fn render(frame: &mut Frame, message_area: Rect, help_area: Rect, state: &ViewState) {
    let message = match &state.message {
        Some(m) => Line::from(Span::styled(
            format!(" {}", m.text),
            Style::default().fg(level_color(m.level)),
        )),
        None => Line::default(),
    };
    frame.render_widget(Paragraph::new(message), message_area);

    let help = Paragraph::new(Line::from(Span::styled(
        HELP_TEXT,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(help, help_area);
}

pub fn level_color(level: MessageLevel) -> Color {
    match level {
        MessageLevel::Info => Color::Green,
        MessageLevel::Warning => Color::Yellow,
        MessageLevel::Error => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::StatusMessage;

    #[test]
    fn level_colors() {
        assert_eq!(level_color(MessageLevel::Info), Color::Green);
        assert_eq!(level_color(MessageLevel::Warning), Color::Yellow);
        assert_eq!(level_color(MessageLevel::Error), Color::Red);
    }

    #[test]
    fn message_and_help_are_rendered() {
        let backend = ratatui::backend::TestBackend::new(100, 2);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.message = Some(StatusMessage::error("Minimum exceeds maximum"));
        terminal
            .draw(|frame| {
                render(
                    frame,
                    Rect::new(0, 0, 100, 1),
                    Rect::new(0, 1, 100, 1),
                    &state,
                )
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Minimum exceeds maximum"));
        assert!(text.contains("g/Enter:Draw"));
        assert_eq!(buffer[(1, 0)].fg, Color::Red);
    }
}
