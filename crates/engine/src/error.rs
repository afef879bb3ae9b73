use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::clip::ClipId;

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by timeline mutations, command interpretation and settings.
#[derive(Debug)]
pub enum EngineError {
    InvalidRange {
        start: f64,
        end: f64,
    },
    UnknownClip {
        id: ClipId,
    },
    DuplicateClip {
        id: ClipId,
    },
    TrackOutOfRange {
        track: u32,
        track_count: usize,
    },
    InterpreterFailure {
        reason: String,
    },
    EmptyTimeline,
    InvalidTimestamp {
        input: String,
    },
    SettingsIo {
        path: PathBuf,
        source: std::io::Error,
    },
    SettingsSerialization {
        path: PathBuf,
        source: serde_json::Error,
    },
    SettingsInvalid {
        path: PathBuf,
        reason: String,
    },
    BridgeDisconnected,
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange { start, end } => {
                write!(f, "invalid time range: start {start}s must be before end {end}s")
            }
            Self::UnknownClip { id } => write!(f, "clip not found: {id}"),
            Self::DuplicateClip { id } => write!(f, "clip id already present: {id}"),
            Self::TrackOutOfRange { track, track_count } => {
                write!(f, "track {track} is out of range (timeline has {track_count} tracks)")
            }
            Self::InterpreterFailure { reason } => {
                write!(f, "command could not be interpreted: {reason}")
            }
            Self::EmptyTimeline => {
                write!(f, "timeline is empty: add a video to the timeline first")
            }
            Self::InvalidTimestamp { input } => write!(f, "unrecognised timestamp: {input:?}"),
            Self::SettingsIo { path, source } => {
                write!(f, "failed to read settings: {} ({source})", path.display())
            }
            Self::SettingsSerialization { path, source } => {
                write!(f, "settings file is malformed: {} ({source})", path.display())
            }
            Self::SettingsInvalid { path, reason } => {
                write!(f, "invalid settings in {}: {reason}", path.display())
            }
            Self::BridgeDisconnected => write!(f, "engine worker is disconnected"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SettingsIo { source, .. } => Some(source),
            Self::SettingsSerialization { source, .. } => Some(source),
            _ => None,
        }
    }
}
