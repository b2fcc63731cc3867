// Slider widget: the min and max selection bounds as two gauges.
//
// The focused slider gets a highlighted border. The label shows
// "value/slider_max".

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Gauge};
use ratatui::Frame;

use crate::protocol::SliderId;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_slider(frame, halves[0], state, SliderId::Min);
    render_slider(frame, halves[1], state, SliderId::Max);
}

fn render_slider(frame: &mut Frame, area: Rect, state: &ViewState, id: SliderId) {
    let value = state.slider_value(id);
    let focused = state.focus == id;

    let border_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let gauge_color = if state.min > state.max {
        Color::Red
    } else {
        Color::Cyan
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(slider_title(id)),
        )
        .gauge_style(Style::default().fg(gauge_color).bg(Color::Black))
        .ratio(slider_ratio(value, state.slider_max))
        .label(format!("{}/{}", value, state.slider_max));
    frame.render_widget(gauge, area);
}

pub fn slider_title(id: SliderId) -> &'static str {
    match id {
        SliderId::Min => "Min players per team",
        SliderId::Max => "Max players per team",
    }
}

/// Fill ratio in `[0.0, 1.0]`; a zero ceiling renders as empty.
pub fn slider_ratio(value: usize, slider_max: usize) -> f64 {
    if slider_max == 0 {
        return 0.0;
    }
    (value as f64 / slider_max as f64).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_clamped() {
        assert_eq!(slider_ratio(0, 3), 0.0);
        assert_eq!(slider_ratio(3, 3), 1.0);
        assert_eq!(slider_ratio(5, 3), 1.0);
        assert_eq!(slider_ratio(2, 0), 0.0);
        assert!((slider_ratio(1, 4) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn titles_name_the_bound() {
        assert!(slider_title(SliderId::Min).starts_with("Min"));
        assert!(slider_title(SliderId::Max).starts_with("Max"));
    }

    #[test]
    fn render_does_not_panic_with_inverted_bounds() {
        let backend = ratatui::backend::TestBackend::new(80, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.min = 3;
        state.max = 1;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
