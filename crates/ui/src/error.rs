use pwm_panel_protocol::ProtocolError;
use wasm_bindgen::JsValue;

/// Errors surfaced by the panel front-end
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("element '{0}' not found")]
    MissingElement(String),
    #[error("no connection attached")]
    NotConnected,
    #[error("send failed: {0}")]
    Send(String),
    #[error("DOM error: {0}")]
    Dom(String),
}

/// Best-effort text for a thrown JS value
pub fn js_detail(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl From<UiError> for JsValue {
    fn from(err: UiError) -> Self {
        Self::from_str(&err.to_string())
    }
}
