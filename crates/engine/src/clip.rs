use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::time::ensure_range;

/// Kind tag used for footage placed on the timeline from a media file.
pub const MEDIA_CLIP_KIND: &str = "video";

/// Opaque identifier for timeline clips. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(Uuid);

impl ClipId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ClipId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ClipId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self)
    }
}

/// A placed, editable unit on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub start: f64,
    pub end: f64,
    pub track: u32,
    /// Effect or kind tag, e.g. `cut`, `caption` or [`MEDIA_CLIP_KIND`].
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

impl Clip {
    /// Creates a clip with a fresh id after validating `start < end`.
    ///
    /// # Example
    /// ```
    /// use engine::clip::Clip;
    ///
    /// let clip = Clip::new(0.0, 4.0, 0, "video", "intro.mp4").expect("valid range");
    /// assert_eq!(clip.duration(), 4.0);
    /// assert!(Clip::new(4.0, 4.0, 0, "video", "empty").is_err());
    /// ```
    pub fn new(
        start: f64,
        end: f64,
        track: u32,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self> {
        ensure_range(start, end)?;
        Ok(Self {
            id: ClipId::new(),
            start,
            end,
            track,
            kind: kind.into(),
            name: name.into(),
        })
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Returns a copy with `patch` merged in. The id is never patched.
    pub fn merged(&self, patch: &ClipPatch) -> Self {
        Self {
            id: self.id,
            start: patch.start.unwrap_or(self.start),
            end: patch.end.unwrap_or(self.end),
            track: patch.track.unwrap_or(self.track),
            kind: patch.kind.clone().unwrap_or_else(|| self.kind.clone()),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
        }
    }
}

/// Partial set of clip fields merged by an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipPatch {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub track: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
}

impl ClipPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
