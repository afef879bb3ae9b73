use serde::{Deserialize, Serialize};

use crate::clip::{Clip, MEDIA_CLIP_KIND};
use crate::error::{EngineError, Result};

/// Media offered by the asset library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSource {
    pub id: String,
    pub name: String,
    /// Duration in seconds reported by the media provider.
    pub duration: f64,
    #[serde(default)]
    pub src: Option<String>,
}

impl MediaSource {
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(EngineError::InvalidRange {
                start: 0.0,
                end: self.duration,
            });
        }
        Ok(())
    }
}

/// A media file dropped on a track once its duration has been decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedMedia {
    pub track: u32,
    pub drop_time: f64,
    pub duration: f64,
    pub name: String,
}

impl DroppedMedia {
    /// Synthesizes the footage clip covering `[drop_time, drop_time + duration)`.
    pub fn into_clip(self, track_count: usize) -> Result<Clip> {
        if self.track as usize >= track_count {
            return Err(EngineError::TrackOutOfRange {
                track: self.track,
                track_count,
            });
        }
        Clip::new(
            self.drop_time,
            self.drop_time + self.duration,
            self.track,
            MEDIA_CLIP_KIND,
            self.name,
        )
    }
}
