//! Top header: connection state, health badge, freshness, quit hint.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::session::SessionStats;
use crate::store::ViewModel;
use crate::types::ConnectionState;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, view: &ViewModel, stats: &SessionStats) {
    let state_color = match view.connection {
        ConnectionState::Open => Color::Green,
        ConnectionState::Connecting => Color::Yellow,
        ConnectionState::Error | ConnectionState::Closed => Color::Red,
    };
    let mut spans = vec![
        Span::raw("sysdash | "),
        Span::styled(view.connection.label(), Style::default().fg(state_color)),
    ];
    if let Some(h) = view.health.as_ref() {
        let color = if h.is_healthy() { Color::Green } else { Color::Red };
        spans.push(Span::raw(" | health: "));
        spans.push(Span::styled(h.status.to_uppercase(), Style::default().fg(color)));
    }
    if let Some(t) = view.updated_at {
        spans.push(Span::raw(format!(" | updated {}", t.format("%H:%M:%S"))));
    }
    if stats.rejected > 0 {
        spans.push(Span::styled(
            format!(" | {} bad frames", stats.rejected),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::raw("  (press 'q' to quit, 'r' to reconnect)"));
    f.render_widget(
        Block::default().title(Line::from(spans)).borders(Borders::BOTTOM),
        area,
    );
}
