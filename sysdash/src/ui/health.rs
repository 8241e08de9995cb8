//! Health check panel: status badge plus detail entries.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::types::HealthStatus;

// Rows the panel wants for the given status (borders included).
pub fn health_height(h: Option<&HealthStatus>) -> u16 {
    let body = match h {
        Some(h) if !h.details.is_empty() => 1 + h.details.len().min(8) as u16,
        _ => 2,
    };
    body + 2
}

pub fn draw_health(f: &mut ratatui::Frame<'_>, area: Rect, h: Option<&HealthStatus>) {
    let block = Block::default().borders(Borders::ALL).title("Health Check");
    let Some(h) = h else {
        let p = Paragraph::new("Loading health check data...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let color = if h.is_healthy() { Color::Green } else { Color::Red };
    let mut lines = vec![Line::styled(
        h.status.to_uppercase(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if h.details.is_empty() {
        lines.push(Line::styled(
            "No additional details available.",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        for (k, v) in &h.details {
            lines.push(Line::from(vec![
                Span::styled(format!("{k}: "), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(v.clone()),
            ]));
        }
    }
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block.border_style(Style::default().fg(color))),
        area,
    );
}
