//! Established connections and listening ports.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::types::MetricsSnapshot;
use crate::ui::util::truncate_middle;

pub fn draw_connections(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    m: &MetricsSnapshot,
    offset: usize,
) {
    let title = format!("Network Connections ({})", m.network_connections.len());
    let block = Block::default().borders(Borders::ALL).title(title);
    if m.network_connections.is_empty() {
        let p = Paragraph::new("No active network connections")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    }
    let width = area.width.saturating_sub(2) as usize / 2;
    let items: Vec<ListItem> = m
        .network_connections
        .iter()
        .skip(offset)
        .map(|c| {
            let remote = c.remote_address.as_deref().unwrap_or("N/A");
            ListItem::new(Line::from(vec![
                Span::raw(truncate_middle(&c.local_address, width.saturating_sub(2))),
                Span::styled(" → ", Style::default().fg(Color::DarkGray)),
                Span::raw(truncate_middle(remote, width.saturating_sub(2))),
                Span::styled(format!("  {}", c.status), Style::default().fg(Color::Green)),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

pub fn draw_ports(f: &mut ratatui::Frame<'_>, area: Rect, m: &MetricsSnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Active Ports ({})", m.active_ports.len()));
    if m.active_ports.is_empty() {
        let p = Paragraph::new("No active ports")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    }
    let items: Vec<ListItem> = m
        .active_ports
        .iter()
        .map(|p| ListItem::new(p.as_str()))
        .collect();
    f.render_widget(List::new(items).block(block), area);
}
