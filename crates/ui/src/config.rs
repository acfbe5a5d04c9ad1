//! Runtime configuration for the panel
//!
//! Read from the optional `window.PANEL_CONFIG` object the page may define
//! before loading the module, e.g.
//!
//! ```js
//! window.PANEL_CONFIG = { wsPath: "/ws", reconnectDelayMs: 2000 };
//! ```

use std::str::FromStr;
use std::time::Duration;

use pwm_panel_protocol::DEFAULT_WS_PATH;
use tracing::{warn, Level};
use wasm_bindgen::JsValue;

/// Delay before reopening a dropped connection
pub const DEFAULT_RECONNECT_DELAY_MS: u32 = 2000;

/// How long to wait before each reconnect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Same delay every time, forever
    Fixed(Duration),
    /// `base * 2^attempt`, capped at `max`. Attempts reset once a
    /// connection opens.
    Backoff { base: Duration, max: Duration },
}

impl ReconnectPolicy {
    /// Delay for the given zero-based attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Backoff { base, max } => {
                let factor = 1u32.checked_shl(attempt.min(16)).unwrap_or(u32::MAX);
                base.saturating_mul(factor).min(max)
            }
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::Fixed(Duration::from_millis(u64::from(DEFAULT_RECONNECT_DELAY_MS)))
    }
}

/// Full panel configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub ws_path: String,
    pub reconnect: ReconnectPolicy,
    pub log_level: Level,
    /// Attach `input` listeners to `slider<N>` range controls on load.
    /// Off by default: the controller's page wires `updateSliderPWM(this)`
    /// inline, and a second listener would double every send.
    pub bind_sliders: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            ws_path: DEFAULT_WS_PATH.to_string(),
            reconnect: ReconnectPolicy::default(),
            log_level: Level::INFO,
            bind_sliders: false,
        }
    }
}

/// Raw values supplied by the page; anything unset keeps its default
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub ws_path: Option<String>,
    pub reconnect_delay_ms: Option<f64>,
    pub reconnect_max_delay_ms: Option<f64>,
    pub log_level: Option<String>,
    pub bind_sliders: Option<bool>,
}

impl ConfigOverrides {
    /// Read `window.PANEL_CONFIG`. A missing object yields no overrides.
    pub fn from_window(window: &web_sys::Window) -> Self {
        let config = js_sys::Reflect::get(window, &"PANEL_CONFIG".into()).unwrap_or(JsValue::UNDEFINED);
        if config.is_undefined() || config.is_null() {
            return Self::default();
        }

        let field = |name: &str| {
            js_sys::Reflect::get(&config, &name.into())
                .ok()
                .filter(|v| !v.is_undefined() && !v.is_null())
        };

        Self {
            ws_path: field("wsPath").and_then(|v| v.as_string()),
            reconnect_delay_ms: field("reconnectDelayMs").and_then(|v| v.as_f64()),
            reconnect_max_delay_ms: field("reconnectMaxDelayMs").and_then(|v| v.as_f64()),
            log_level: field("logLevel").and_then(|v| v.as_string()),
            bind_sliders: field("bindSliders").and_then(|v| v.as_bool()),
        }
    }

    /// Log level to start the subscriber with, before the rest is applied
    pub fn log_level(&self) -> Level {
        self.log_level
            .as_deref()
            .and_then(|l| Level::from_str(l).ok())
            .unwrap_or(Level::INFO)
    }
}

impl PanelConfig {
    /// Merge page overrides into this config, warning about unusable values
    #[must_use]
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.ws_path {
            if path.is_empty() {
                warn!("PANEL_CONFIG.wsPath is empty, keeping {}", self.ws_path);
            } else {
                self.ws_path = path;
            }
        }

        if let Some(level) = overrides.log_level {
            match Level::from_str(&level) {
                Ok(level) => self.log_level = level,
                Err(_) => warn!("PANEL_CONFIG.logLevel '{level}' not recognised"),
            }
        }

        if let Some(bind) = overrides.bind_sliders {
            self.bind_sliders = bind;
        }

        let base = match overrides.reconnect_delay_ms.map(millis) {
            Some(Some(delay)) => delay,
            Some(None) => {
                warn!("PANEL_CONFIG.reconnectDelayMs must be a non-negative number");
                self.reconnect.delay_for(0)
            }
            None => self.reconnect.delay_for(0),
        };

        self.reconnect = match overrides.reconnect_max_delay_ms.map(millis) {
            Some(Some(max)) if max >= base => ReconnectPolicy::Backoff { base, max },
            Some(_) => {
                warn!("PANEL_CONFIG.reconnectMaxDelayMs must be >= reconnectDelayMs, using fixed delay");
                ReconnectPolicy::Fixed(base)
            }
            None => ReconnectPolicy::Fixed(base),
        };

        self
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn millis(value: f64) -> Option<Duration> {
    (value.is_finite() && value >= 0.0).then(|| Duration::from_millis(value.round() as u64))
}
