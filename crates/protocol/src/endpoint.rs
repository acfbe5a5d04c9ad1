//! Endpoint derivation for the controller's WebSocket

/// Path the ESP32 firmware serves its WebSocket on
pub const DEFAULT_WS_PATH: &str = "/ws";

/// Build the gateway URL for a page served from `hostname`.
///
/// The scheme is always plain `ws:`; the controller has no TLS listener.
pub fn gateway_url(hostname: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("ws://{hostname}{path}")
    } else {
        format!("ws://{hostname}/{path}")
    }
}
