//! Memory gauge and uptime card.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::types::MetricsSnapshot;
use crate::ui::util::gib;

pub fn draw_mem(f: &mut ratatui::Frame<'_>, area: Rect, m: &MetricsSnapshot) {
    let mem = &m.memory;
    f.render_widget(Block::default().borders(Borders::ALL).title("Memory Usage"), area);
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height == 0 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let pct = mem.percent.clamp(0.0, 100.0).round() as u16;
    let g = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(pct)
        .label(format!("{:.1}%", mem.percent));
    f.render_widget(g, rows[0]);

    let lines = vec![
        Line::from(format!("Total: {}", gib(mem.total_bytes))),
        Line::from(format!("Available: {}", gib(mem.available_bytes))),
        Line::from(format!("Used: {}", gib(mem.used_bytes))),
    ];
    f.render_widget(Paragraph::new(lines), rows[1]);
}

pub fn draw_uptime(f: &mut ratatui::Frame<'_>, area: Rect, m: &MetricsSnapshot) {
    let p = Paragraph::new(Line::styled(
        m.uptime.clone(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::ALL).title("System Uptime"));
    f.render_widget(p, area);
}
