//! sysdash: a live system dashboard fed by two independent sources.
//!
//! A pushed metrics stream (`/realmetrics`, Server-Sent Events or WebSocket)
//! and a one-shot health check (`/api/health`) are reconciled in a
//! [`StateStore`]; the TUI only ever reads the resulting [`ViewModel`].

pub mod app;
pub mod config;
pub mod dashboard;
pub mod decode;
pub mod error;
pub mod health;
pub mod history;
pub mod logging;
pub mod profiles;
pub mod session;
pub mod sse;
pub mod store;
pub mod types;
pub mod ui;
pub mod ws;

pub use config::{DashboardConfig, Endpoints};
pub use dashboard::Dashboard;
pub use error::{ConfigError, DecodeError, FetchError, TransportError};
pub use session::{FrameOutcome, StreamSession};
pub use store::{StateStore, ViewModel};
pub use types::{ConnectionState, HealthStatus, MetricsSnapshot};
