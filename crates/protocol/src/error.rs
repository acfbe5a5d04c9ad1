/// Errors raised while decoding or encoding panel frames
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("slider control id is empty")]
    EmptyControlId,
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
