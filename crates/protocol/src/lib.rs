//! Shared protocol types for pwm-panel
//!
//! Defines the text frames exchanged between the browser panel and the
//! ESP32 controller's `/ws` endpoint.

pub mod endpoint;
pub mod error;
pub mod messages;
pub mod readings;

pub use endpoint::*;
pub use error::*;
pub use messages::*;
pub use readings::*;
