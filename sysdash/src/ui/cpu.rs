//! CPU usage sparkline.

use std::collections::VecDeque;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Sparkline},
};

use crate::types::MetricsSnapshot;

pub fn draw_cpu(f: &mut ratatui::Frame<'_>, area: Rect, hist: &VecDeque<u64>, m: &MetricsSnapshot) {
    let title = format!("CPU Usage (now: {:>5.1}%)", m.cpu_usage_percent);
    let max_points = area.width.saturating_sub(2) as usize;
    let start = hist.len().saturating_sub(max_points);
    let data: Vec<u64> = hist.iter().skip(start).cloned().collect();
    let color = match m.cpu_usage_percent {
        x if x < 60.0 => Color::Cyan,
        x if x < 85.0 => Color::Yellow,
        _ => Color::Red,
    };
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .max(100)
        .style(Style::default().fg(color));
    f.render_widget(spark, area);
}
