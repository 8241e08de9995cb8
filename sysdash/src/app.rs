//! App state and main loop: input handling, reading the view model, updating history, and drawing.

use std::{collections::VecDeque, io, sync::Arc, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tokio::time::sleep;

use crate::dashboard::Dashboard;
use crate::history::push_capped;
use crate::session::SessionStats;
use crate::store::ViewModel;
use crate::types::MetricsSnapshot;
use crate::ui::{
    cpu::draw_cpu,
    header::draw_header,
    health::{draw_health, health_height},
    mem::{draw_mem, draw_uptime},
    net::{draw_connections, draw_ports},
    services::{draw_services, scroll_clamp, scroll_handle_key},
};

const HISTORY_CAP: usize = 600;
const TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Services,
    Connections,
}

pub struct App {
    // Last snapshot seen, to push history once per frame
    last_seen: Option<Arc<MetricsSnapshot>>,

    // CPU history (0..100)
    cpu_hist: VecDeque<u64>,

    should_quit: bool,

    pub focus: Focus,
    pub services_scroll: usize,
    pub connections_scroll: usize,
    last_list_rows: usize,
}

impl App {
    pub fn new() -> Self {
        Self {
            last_seen: None,
            cpu_hist: VecDeque::with_capacity(HISTORY_CAP),
            should_quit: false,
            focus: Focus::Services,
            services_scroll: 0,
            connections_scroll: 0,
            last_list_rows: 1,
        }
    }

    /// Mount the dashboard, run until quit, then unmount and restore the terminal.
    pub async fn run(&mut self, dashboard: &mut Dashboard) -> anyhow::Result<()> {
        dashboard.start();

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal, dashboard).await;

        // Teardown
        dashboard.stop();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        dashboard: &mut Dashboard,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    self.handle_key(k, dashboard);
                }
            }
            if self.should_quit {
                break;
            }

            let view = dashboard.current_view();
            let stats = dashboard.stats();
            self.observe(&view);

            terminal.draw(|f| self.draw(f, &view, &stats))?;

            sleep(TICK).await;
        }
        Ok(())
    }

    fn handle_key(&mut self, k: event::KeyEvent, dashboard: &mut Dashboard) {
        match k.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('r') | KeyCode::Char('R') => dashboard.reconnect(),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Services => Focus::Connections,
                    Focus::Connections => Focus::Services,
                }
            }
            _ => {
                let page = self.last_list_rows;
                match self.focus {
                    Focus::Services => scroll_handle_key(&mut self.services_scroll, k, page),
                    Focus::Connections => scroll_handle_key(&mut self.connections_scroll, k, page),
                }
            }
        }
    }

    // Record history once per committed snapshot, not once per tick
    fn observe(&mut self, view: &ViewModel) {
        let Some(m) = view.metrics.as_ref() else { return };
        if self.last_seen.as_ref().is_some_and(|prev| Arc::ptr_eq(prev, m)) {
            return;
        }
        let v = m.cpu_usage_percent.clamp(0.0, 100.0).round() as u64;
        push_capped(&mut self.cpu_hist, v, HISTORY_CAP);
        self.last_seen = Some(m.clone());
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>, view: &ViewModel, stats: &SessionStats) {
        let area = f.area();
        let health = view.health.as_deref();

        // Root rows: header, body, health
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),                     // header
                Constraint::Min(8),                        // metrics
                Constraint::Length(health_height(health)), // health check
            ])
            .split(area);

        draw_header(f, rows[0], view, stats);
        draw_health(f, rows[2], health);

        match view.metrics.as_deref() {
            Some(m) => self.draw_metrics(f, rows[1], m),
            None => draw_loading(f, rows[1]),
        }
    }

    fn draw_metrics(&mut self, f: &mut ratatui::Frame<'_>, area: Rect, m: &MetricsSnapshot) {
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(4)])
            .split(area);

        // Top: CPU | Memory | Uptime
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Percentage(35),
                Constraint::Percentage(20),
            ])
            .split(body[0]);
        draw_cpu(f, top[0], &self.cpu_hist, m);
        draw_mem(f, top[1], m);
        draw_uptime(f, top[2], m);

        // Bottom: connections | ports | services
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Percentage(40),
            ])
            .split(body[1]);

        // borders (2), services also has a header row
        let visible = bottom[0].height.saturating_sub(2) as usize;
        self.last_list_rows = visible.max(1);
        scroll_clamp(&mut self.connections_scroll, m.network_connections.len(), visible);
        scroll_clamp(
            &mut self.services_scroll,
            m.active_services.len(),
            visible.saturating_sub(1),
        );

        draw_connections(f, bottom[0], m, self.connections_scroll);
        draw_ports(f, bottom[1], m);
        draw_services(f, bottom[2], m, self.services_scroll);
    }
}

fn draw_loading(f: &mut ratatui::Frame<'_>, area: Rect) {
    let p = Paragraph::new("Loading metrics...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title("Real-Time System Metrics"));
    f.render_widget(p, area);
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HealthStatus, Memory};
    use ratatui::backend::TestBackend;

    fn snapshot(cpu: f64) -> Arc<MetricsSnapshot> {
        Arc::new(MetricsSnapshot {
            cpu_usage_percent: cpu,
            memory: Memory {
                total_bytes: 8 * 1024 * 1024 * 1024,
                available_bytes: 2 * 1024 * 1024 * 1024,
                used_bytes: 6 * 1024 * 1024 * 1024,
                percent: 75.0,
            },
            uptime: "4 days, 1:02:03".into(),
            network_connections: vec![],
            active_ports: vec!["0.0.0.0:22".into()],
            active_services: vec![],
        })
    }

    fn render(app: &mut App, view: &ViewModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|f| app.draw(f, view, &SessionStats::default()))
            .unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn history_pushed_once_per_snapshot() {
        let mut app = App::new();
        let m = snapshot(12.5);
        let view = ViewModel {
            metrics: Some(m.clone()),
            ..Default::default()
        };
        app.observe(&view);
        app.observe(&view);
        assert_eq!(app.cpu_hist.len(), 1);
        app.observe(&ViewModel {
            metrics: Some(snapshot(40.0)),
            ..Default::default()
        });
        assert_eq!(app.cpu_hist, VecDeque::from(vec![13, 40]));
    }

    #[test]
    fn loading_screen_until_first_snapshot() {
        let mut app = App::new();
        let text = render(&mut app, &ViewModel::default());
        assert!(text.contains("Loading metrics..."));
        assert!(text.contains("Loading health check data..."));
    }

    #[test]
    fn renders_metrics_and_health() {
        let mut app = App::new();
        let view = ViewModel {
            metrics: Some(snapshot(12.5)),
            health: Some(Arc::new(HealthStatus {
                status: "healthy".into(),
                details: Default::default(),
            })),
            ..Default::default()
        };
        let text = render(&mut app, &view);
        assert!(text.contains("12.5%"));
        assert!(text.contains("Total: 8.00 GB"));
        assert!(text.contains("4 days, 1:02:03"));
        assert!(text.contains("No active network connections"));
        assert!(text.contains("0.0.0.0:22"));
        assert!(text.contains("HEALTHY"));
        assert!(text.contains("No additional details available."));
    }
}
