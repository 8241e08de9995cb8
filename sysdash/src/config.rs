//! Backend address resolution: base url -> stream and health endpoints.

use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// Environment setting holding the backend base url.
pub const BACKEND_URL_ENV: &str = "SYSDASH_BACKEND_URL";

pub const STREAM_PATH: &str = "realmetrics";
pub const HEALTH_PATH: &str = "api/health";

/// Concrete endpoints derived from one base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub stream: Url,
    pub health: Url,
}

impl Endpoints {
    pub fn resolve(base: &str, interval: Option<u32>) -> Result<Self, ConfigError> {
        let base = base.trim().trim_end_matches('/');
        let parsed = Url::parse(base).map_err(|e| ConfigError::BadUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
        let health_scheme = match parsed.scheme() {
            "http" | "ws" => "http",
            "https" | "wss" => "https",
            other => return Err(ConfigError::Scheme(other.to_string())),
        };
        if parsed.host_str().is_none() {
            return Err(ConfigError::BadUrl {
                url: base.to_string(),
                reason: "no host name".into(),
            });
        }

        let join = |path: &str| {
            Url::parse(&format!("{base}/{path}")).map_err(|e| ConfigError::BadUrl {
                url: base.to_string(),
                reason: e.to_string(),
            })
        };
        let mut stream = join(STREAM_PATH)?;
        if let Some(n) = interval {
            stream
                .query_pairs_mut()
                .append_pair("interval", &n.to_string());
        }
        let mut health = join(HEALTH_PATH)?;
        if health.scheme() != health_scheme && health.set_scheme(health_scheme).is_err() {
            return Err(ConfigError::Scheme(health.scheme().to_string()));
        }
        Ok(Self { stream, health })
    }

    /// WebSocket backends push over `ws(s)`; everything else is an event stream.
    pub fn is_websocket(&self) -> bool {
        matches!(self.stream.scheme(), "ws" | "wss")
    }
}

/// Sampling interval in seconds; the backend rejects zero and non-numbers.
pub fn parse_interval(s: &str) -> Result<u32, ConfigError> {
    match s.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Interval(s.to_string())),
    }
}

/// Knobs for the dashboard core.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub endpoints: Endpoints,
    pub connect_timeout: Duration,
    pub health_timeout: Duration,
}

impl DashboardConfig {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            connect_timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(10),
        }
    }
}
