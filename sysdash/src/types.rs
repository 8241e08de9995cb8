//! Types that mirror the backend's JSON schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    #[serde(rename = "total")]
    pub total_bytes: u64,
    #[serde(rename = "available")]
    pub available_bytes: u64,
    #[serde(rename = "used")]
    pub used_bytes: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConnection {
    pub local_address: String,
    // listening sockets and half-open connections have no peer
    #[serde(default)]
    pub remote_address: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveService {
    pub pid: u32,
    pub name: String,
    pub port: String,
}

/// One complete metrics frame. Replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(rename = "cpu_usage")]
    pub cpu_usage_percent: f64,
    pub memory: Memory,
    pub uptime: String,
    pub network_connections: Vec<NetworkConnection>,
    pub active_ports: Vec<String>,
    pub active_services: Vec<ActiveService>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    // the backend's plain `/health` route omits details entirely
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl HealthStatus {
    pub const HEALTHY: &'static str = "healthy";

    /// Anything other than the literal `"healthy"` renders as unhealthy.
    pub fn is_healthy(&self) -> bool {
        self.status == Self::HEALTHY
    }
}

/// Lifecycle of the push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Open,
    Error,
    Closed,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "live",
            ConnectionState::Error => "error",
            ConnectionState::Closed => "closed",
        }
    }
}
