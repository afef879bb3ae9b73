use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::time::ensure_range;

/// Effect-specific parameters. Only a downstream renderer interprets them.
pub type Params = serde_json::Map<String, Value>;

/// Closed set of effects a command can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Effect {
    Cut,
    Fade,
    Zoom,
    Speed,
    TextOverlay,
    Caption,
    Brightness,
    ColorGrade,
}

impl Effect {
    pub const ALL: [Self; 8] = [
        Self::Cut,
        Self::Fade,
        Self::Zoom,
        Self::Speed,
        Self::TextOverlay,
        Self::Caption,
        Self::Brightness,
        Self::ColorGrade,
    ];

    /// Wire name, also used as the clip kind tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cut => "cut",
            Self::Fade => "fade",
            Self::Zoom => "zoom",
            Self::Speed => "speed",
            Self::TextOverlay => "textOverlay",
            Self::Caption => "caption",
            Self::Brightness => "brightness",
            Self::ColorGrade => "colorGrade",
        }
    }
}

impl Display for Effect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unplaced instruction: a time range, an effect and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub start_sec: f64,
    pub end_sec: f64,
    pub effect: Effect,
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
}

impl Operation {
    /// Creates an operation without parameters.
    pub fn new(start_sec: f64, end_sec: f64, effect: Effect) -> Self {
        Self {
            start_sec,
            end_sec,
            effect,
            params: Params::new(),
        }
    }

    /// Adds one parameter.
    ///
    /// # Example
    /// ```
    /// use engine::operation::{Effect, Operation};
    ///
    /// let zoom = Operation::new(0.0, 10.0, Effect::Zoom).with_param("scale", 1.2);
    /// assert_eq!(zoom.params["scale"], 1.2);
    /// ```
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_range(self.start_sec, self.end_sec)
    }
}
