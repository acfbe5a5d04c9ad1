//! Inbound readings pushed by the controller
//!
//! A reading is a flat JSON object, e.g. `{"sliderValue1":75,"pot2":512}`.
//! Keys name DOM elements; `sliderValue<N>` keys also drive the paired
//! slider control, chosen by the label's final character the same way
//! outbound commands pick their index.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ProtocolError, Result};
use crate::messages::{SliderIndex, SLIDER_LABEL_PREFIX};

/// Decoded reading frame, keys kept in payload order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct InboundReading {
    entries: Map<String, Value>,
}

/// Where a single reading key should be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingTarget<'a> {
    /// `sliderValue<N>`: label text plus the paired slider control's value
    SliderLabel { label_id: &'a str, slider_id: String },
    /// Any other key: text of the element with that id
    Display { id: &'a str },
}

impl InboundReading {
    /// Decode a text frame. Anything other than a top-level object is rejected.
    pub fn parse(payload: &str) -> Result<Self> {
        let value = serde_json::from_str::<Value>(payload)?;
        if !value.is_object() {
            return Err(ProtocolError::NotAnObject(json_kind(&value)));
        }
        Ok(Self::deserialize(value)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, target, display text)` in payload order
    pub fn updates(&self) -> impl Iterator<Item = (&str, ReadingTarget<'_>, String)> + '_ {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), classify_key(key), display_text(value)))
    }
}

/// Classify a reading key by the slider label prefix.
///
/// `sliderValue12` pairs with `slider2`: only the final character counts,
/// matching `SliderIndex::from_control_id` on the outbound side.
pub fn classify_key(key: &str) -> ReadingTarget<'_> {
    if !key.starts_with(SLIDER_LABEL_PREFIX) {
        return ReadingTarget::Display { id: key };
    }
    match SliderIndex::from_control_id(key) {
        Ok(index) => ReadingTarget::SliderLabel {
            label_id: key,
            slider_id: index.control_id(),
        },
        Err(_) => ReadingTarget::Display { id: key },
    }
}

/// Render a JSON value the way the page shows it in an element.
///
/// Strings are shown without quotes and whole numbers without a fractional
/// part, so `75` and `"75"` both render as `75`. `null` renders empty.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                n.as_f64().map_or_else(|| n.to_string(), format_float)
            }
        }
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[allow(clippy::float_cmp)]
fn format_float(f: f64) -> String {
    if f == 0.0 {
        "0".to_string()
    } else if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
