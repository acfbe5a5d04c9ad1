//! Transport seam between the adapter and the browser WebSocket

use std::time::Duration;

use web_sys::WebSocket;

use crate::error::{js_detail, UiError};

/// Lifecycle of the adapter's connection.
///
/// `Closed -> Connecting -> Open -> Closed`, or `Connecting -> Closed` when
/// the socket fails before opening. There is no terminal state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ConnectionState {
    #[default]
    Closed,
    Connecting,
    Open,
}

/// Sequence number of an attached connection
pub type Generation = u64;

/// Events a connection surfaces to the adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Open,
    Close { code: u16, reason: String },
    Error(String),
    Message(String),
}

/// Ask the caller to reopen the connection after `delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectRequest {
    pub delay: Duration,
    /// 1-based count of consecutive attempts since the last open
    pub attempt: u32,
}

/// A text-frame transport owned by the adapter
pub trait Connection {
    fn send_text(&self, text: &str) -> Result<(), UiError>;

    /// Tear down a connection that is being replaced
    fn close(&self);
}

/// `Connection` over `web_sys::WebSocket`
pub struct WebSocketConnection {
    ws: WebSocket,
}

impl WebSocketConnection {
    pub const fn new(ws: WebSocket) -> Self {
        Self { ws }
    }
}

impl Connection for WebSocketConnection {
    fn send_text(&self, text: &str) -> Result<(), UiError> {
        self.ws
            .send_with_str(text)
            .map_err(|e| UiError::Send(js_detail(&e)))
    }

    fn close(&self) {
        if self.ws.ready_state() == WebSocket::OPEN
            || self.ws.ready_state() == WebSocket::CONNECTING
        {
            let _ = self.ws.close();
        }
    }
}
