//! Services bound to listening ports, with keyboard scrolling.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::types::MetricsSnapshot;

const COLS: [Constraint; 3] = [
    Constraint::Length(8),      // PID
    Constraint::Percentage(45), // Name
    Constraint::Min(10),        // Port
];

pub fn draw_services(f: &mut ratatui::Frame<'_>, area: Rect, m: &MetricsSnapshot, offset: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Active Services ({})", m.active_services.len()));
    if m.active_services.is_empty() {
        let p = Paragraph::new("No active services")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let rows = m.active_services.iter().skip(offset).enumerate().map(|(i, s)| {
        // zebra striping
        let bg = if i % 2 == 0 { Color::Reset } else { Color::Rgb(30, 30, 38) };
        Row::new(vec![
            Cell::from(s.pid.to_string()).style(Style::default().fg(Color::DarkGray)),
            Cell::from(s.name.clone()),
            Cell::from(s.port.clone()),
        ])
        .style(Style::default().bg(bg))
    });
    let header = Row::new(vec!["PID", "Name", "Port"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let table = Table::new(rows, COLS.to_vec())
        .header(header)
        .column_spacing(1)
        .block(block);
    f.render_widget(table, area);
}

/// Up/Down/PageUp/PageDown/Home/End scrolling shared by the list panels.
pub fn scroll_handle_key(offset: &mut usize, key: KeyEvent, page_size: usize) {
    match key.code {
        KeyCode::Up => *offset = offset.saturating_sub(1),
        KeyCode::Down => *offset = offset.saturating_add(1),
        KeyCode::PageUp => *offset = offset.saturating_sub(page_size.max(1)),
        KeyCode::PageDown => *offset = offset.saturating_add(page_size.max(1)),
        KeyCode::Home => *offset = 0,
        KeyCode::End => *offset = usize::MAX,
        _ => {}
    }
}

pub fn scroll_clamp(offset: &mut usize, total_rows: usize, visible_rows: usize) {
    let max_off = total_rows.saturating_sub(visible_rows);
    if *offset > max_off {
        *offset = max_off;
    }
}
