//! Frame and health payload decoding. Pure functions: text in, value or error out.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DecodeError, DecodeErrorKind};
use crate::types::{HealthStatus, MetricsSnapshot};

/// Decode one stream frame into a complete snapshot.
pub fn decode_metrics(raw: &str) -> Result<MetricsSnapshot, DecodeError> {
    let value = parse(raw)?;
    if let Some(msg) = remote_error(&value, "cpu_usage") {
        return Err(DecodeError::new(DecodeErrorKind::Remote, msg, raw));
    }
    shape(value, raw)
}

/// Decode the body of the health endpoint.
pub fn decode_health(raw: &str) -> Result<HealthStatus, DecodeError> {
    let value = parse(raw)?;
    if let Some(msg) = remote_error(&value, "status") {
        return Err(DecodeError::new(DecodeErrorKind::Remote, msg, raw));
    }
    shape(value, raw)
}

fn parse(raw: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(raw.trim())
        .map_err(|e| DecodeError::new(DecodeErrorKind::Syntax, e.to_string(), raw))
}

fn shape<T: DeserializeOwned>(value: Value, raw: &str) -> Result<T, DecodeError> {
    serde_json::from_value(value)
        .map_err(|e| DecodeError::new(DecodeErrorKind::Shape, e.to_string(), raw))
}

// `{"error": "..."}` without the payload's primary key
fn remote_error(value: &Value, primary: &str) -> Option<String> {
    let obj = value.as_object()?;
    if obj.contains_key(primary) {
        return None;
    }
    obj.get("error").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = r#"{"cpu_usage":12.5,"memory":{"total":1000,"available":400,"used":600,"percent":60},"uptime":"2d","network_connections":[],"active_ports":[],"active_services":[]}"#;

    #[test]
    fn decodes_minimal_frame() {
        let m = decode_metrics(FRAME).expect("valid frame");
        assert_eq!(m.cpu_usage_percent, 12.5);
        assert_eq!(m.memory.total_bytes, 1000);
        assert_eq!(m.memory.available_bytes, 400);
        assert_eq!(m.memory.used_bytes, 600);
        assert_eq!(m.memory.percent, 60.0);
        assert_eq!(m.uptime, "2d");
        assert!(m.network_connections.is_empty());
    }

    #[test]
    fn decodes_connections_and_services() {
        let raw = r#"{
            "cpu_usage": 3,
            "memory": {"total": 8, "available": 4, "used": 4, "percent": 50.0},
            "uptime": "1 day, 2:03:04.123456",
            "network_connections": [
                {"local_address": "10.0.0.2:22", "remote_address": "10.0.0.9:51000", "status": "ESTABLISHED"},
                {"local_address": "10.0.0.2:443", "remote_address": null, "status": "ESTABLISHED"},
                {"local_address": "10.0.0.2:80", "status": "ESTABLISHED"}
            ],
            "active_ports": ["0.0.0.0:22", "127.0.0.1:6379"],
            "active_services": [{"pid": 812, "name": "sshd", "port": "0.0.0.0:22"}]
        }"#;
        let m = decode_metrics(raw).expect("valid frame");
        assert_eq!(m.cpu_usage_percent, 3.0);
        assert_eq!(m.network_connections.len(), 3);
        assert_eq!(
            m.network_connections[0].remote_address.as_deref(),
            Some("10.0.0.9:51000")
        );
        assert_eq!(m.network_connections[1].remote_address, None);
        assert_eq!(m.network_connections[2].remote_address, None);
        assert_eq!(m.active_ports, vec!["0.0.0.0:22", "127.0.0.1:6379"]);
        assert_eq!(m.active_services[0].pid, 812);
        assert_eq!(m.active_services[0].name, "sshd");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let raw = FRAME.replacen('{', r#"{"load_avg":[0.1,0.2,0.3],"#, 1);
        assert!(decode_metrics(&raw).is_ok());
    }

    #[test]
    fn not_json_is_a_syntax_error() {
        let err = decode_metrics("not-json").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Syntax);
        assert_eq!(err.raw, "not-json");
    }

    #[test]
    fn missing_field_is_a_shape_error() {
        let raw = FRAME.replace(r#""uptime":"2d","#, "");
        let err = decode_metrics(&raw).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Shape);
        assert!(err.reason.contains("uptime"), "{}", err.reason);
    }

    #[test]
    fn stringly_typed_percent_is_rejected() {
        let raw = FRAME.replace(r#""cpu_usage":12.5"#, r#""cpu_usage":"12.5""#);
        let err = decode_metrics(&raw).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Shape);
    }

    #[test]
    fn ports_must_be_an_array() {
        let raw = FRAME.replace(r#""active_ports":[]"#, r#""active_ports":"22""#);
        assert_eq!(decode_metrics(&raw).unwrap_err().kind, DecodeErrorKind::Shape);
    }

    #[test]
    fn backend_error_frame_is_remote() {
        let err = decode_metrics(r#"{"error": "Internal server error"}"#).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Remote);
        assert_eq!(err.reason, "Internal server error");
    }

    #[test]
    fn non_object_json_is_a_shape_error() {
        assert_eq!(decode_metrics("[1,2,3]").unwrap_err().kind, DecodeErrorKind::Shape);
        assert_eq!(decode_metrics("null").unwrap_err().kind, DecodeErrorKind::Shape);
    }

    #[test]
    fn health_error_body_is_remote() {
        let raw = r#"{"error": "database unavailable"}"#;
        let err = decode_health(raw).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Remote);
        assert_eq!(err.reason, "database unavailable");
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn health_with_details() {
        let h = decode_health(r#"{"status":"degraded","details":{"redis":"down"}}"#).unwrap();
        assert!(!h.is_healthy());
        assert_eq!(h.details.get("redis").map(String::as_str), Some("down"));
    }

    #[test]
    fn health_without_details_is_empty_map() {
        let h = decode_health(r#"{"status":"healthy"}"#).unwrap();
        assert!(h.is_healthy());
        assert!(h.details.is_empty());
    }

    #[test]
    fn health_details_must_be_string_map() {
        let err = decode_health(r#"{"status":"healthy","details":{"uptime":5}}"#).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Shape);
        let err = decode_health(r#"{"details":{}}"#).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Shape);
    }
}
