// Selection widget: the drawn players, one row per team.
//
// Columns are "Team, Player 1 .. Player N" where N is the largest team
// selection; shorter rows are padded with blanks. Scrollable with the
// arrow keys / j,k.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use roster_core::sampler::SelectionResult;

use crate::tui::ViewState;

/// Render the selection table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(selection) = &state.selection else {
        let paragraph = Paragraph::new("  Press g to draw players.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Selection"));
        frame.render_widget(paragraph, area);
        return;
    };

    let grid = selection.grid();

    let header = Row::new(grid.header.iter().map(|h| Cell::from(h.clone())).collect::<Vec<_>>())
        .style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    // Visible rows: subtract 2 for borders and 1 for the header
    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll = clamp_scroll(state.table_scroll, grid.rows.len(), visible_rows);

    let rows: Vec<Row> = grid
        .rows
        .iter()
        .skip(scroll)
        .take(visible_rows.max(1))
        .map(|row| {
            let mut cells = row.iter().map(|c| Cell::from(c.clone()));
            let team = cells
                .next()
                .map(|c| c.style(Style::default().fg(Color::Cyan)))
                .unwrap_or_default();
            Row::new(std::iter::once(team).chain(cells).collect::<Vec<_>>())
        })
        .collect();

    let table = Table::new(rows, column_widths(grid.header.len()))
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(selection_title(selection)),
        );
    frame.render_widget(table, area);
}

/// Keep the last page of rows on screen when scrolled past the end.
pub fn clamp_scroll(offset: usize, total: usize, visible: usize) -> usize {
    offset.min(total.saturating_sub(visible))
}

/// Team column first, the player columns share the rest evenly.
fn column_widths(columns: usize) -> Vec<Constraint> {
    let mut widths = vec![Constraint::Min(16)];
    widths.extend((1..columns).map(|_| Constraint::Fill(1)));
    widths
}

pub fn selection_title(selection: &SelectionResult) -> String {
    let drawn: usize = selection.iter().map(|(_, p)| p.len()).sum();
    format!("Selection ({} players, {} teams)", drawn, selection.team_count())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
