use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::apply::EFFECT_TRACK_COUNT;
use crate::error::{EngineError, Result};

/// Lane labels used when no settings file overrides them.
pub const DEFAULT_TRACK_LABELS: [&str; 6] = ["Video", "Text", "Audio", "Effects", "Format", "Other"];

/// Engine-wide settings, loadable from a JSON file.
///
/// Missing fields fall back to their defaults.
///
/// # Example
/// ```
/// use engine::EngineSettings;
///
/// let settings: EngineSettings =
///     serde_json::from_str(r#"{"history_limit": 50}"#).expect("valid settings");
/// assert_eq!(settings.history_limit, Some(50));
/// assert_eq!(settings.track_count(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum number of undo steps kept. `None` keeps all of them.
    pub history_limit: Option<usize>,
    pub track_labels: Vec<String>,
    /// Try precise quick-command phrasings before keyword classification.
    pub quick_commands: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            history_limit: None,
            track_labels: DEFAULT_TRACK_LABELS
                .iter()
                .map(|label| label.to_string())
                .collect(),
            quick_commands: true,
        }
    }
}

impl EngineSettings {
    /// Reads settings from a JSON file.
    ///
    /// Fewer track labels than effect lanes are rejected, so every applied
    /// effect clip lands on a lane a drop could also target.
    pub fn load(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path).map_err(|source| EngineError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&body).map_err(|source| EngineError::SettingsSerialization {
                path: path.to_path_buf(),
                source,
            })?;
        if settings.track_count() < EFFECT_TRACK_COUNT {
            return Err(EngineError::SettingsInvalid {
                path: path.to_path_buf(),
                reason: format!(
                    "{} track labels configured, effects need at least {EFFECT_TRACK_COUNT}",
                    settings.track_count()
                ),
            });
        }

        info!(
            path = %path.display(),
            history_limit = ?settings.history_limit,
            track_count = settings.track_count(),
            quick_commands = settings.quick_commands,
            "settings loaded"
        );
        Ok(settings)
    }

    pub fn track_count(&self) -> usize {
        self.track_labels.len()
    }

    /// Label of `track`, or `Track N` for lanes without one.
    pub fn track_label(&self, track: u32) -> String {
        self.track_labels
            .get(track as usize)
            .cloned()
            .unwrap_or_else(|| format!("Track {}", u64::from(track) + 1))
    }
}
