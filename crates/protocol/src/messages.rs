use std::fmt;

use crate::error::{ProtocolError, Result};

/// Literal request for a full state snapshot
pub const GET_READINGS: &str = "getReadings";

/// Tag character between slider index and value in a set command
pub const SLIDER_TAG: char = 's';

/// Id prefix of slider controls (`slider1`, `slider2`, ...)
pub const SLIDER_PREFIX: &str = "slider";

/// Id prefix of slider label elements (`sliderValue1`, ...)
pub const SLIDER_LABEL_PREFIX: &str = "sliderValue";

/// Index of a slider, taken from the last character of its control id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliderIndex(char);

impl SliderIndex {
    /// `slider3` -> `3`. Only the final character is used; the firmware
    /// parses a single index character before the tag.
    pub fn from_control_id(id: &str) -> Result<Self> {
        id.chars()
            .next_back()
            .map(Self)
            .ok_or(ProtocolError::EmptyControlId)
    }

    pub const fn as_char(self) -> char {
        self.0
    }

    /// Id of the label element showing this slider's value
    pub fn label_id(self) -> String {
        format!("{SLIDER_LABEL_PREFIX}{}", self.0)
    }

    /// Id of the slider control itself
    pub fn control_id(self) -> String {
        format!("{SLIDER_PREFIX}{}", self.0)
    }
}

impl fmt::Display for SliderIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text frames sent from the panel to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundCommand {
    /// `getReadings`
    GetReadings,
    /// `<index>s<value>`, e.g. `1s50`. The value is passed through unvalidated.
    SetSlider { index: SliderIndex, value: String },
}

impl OutboundCommand {
    pub fn set_slider(index: SliderIndex, value: impl Into<String>) -> Self {
        Self::SetSlider {
            index,
            value: value.into(),
        }
    }
}

impl fmt::Display for OutboundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetReadings => f.write_str(GET_READINGS),
            Self::SetSlider { index, value } => write!(f, "{index}{SLIDER_TAG}{value}"),
        }
    }
}
