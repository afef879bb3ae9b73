use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clip::{Clip, ClipId, ClipPatch};
use crate::error::{EngineError, Result};
use crate::source::MediaSource;
use crate::time::{clamp_playhead, ensure_range};

/// Historied part of the timeline. The playhead lives outside of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineState {
    /// Insertion order, not time order.
    pub clips: Vec<Clip>,
    pub duration: f64,
    pub selected_clip_id: Option<ClipId>,
    pub source: Option<MediaSource>,
}

impl TimelineState {
    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id == id)
    }

    pub fn contains(&self, id: ClipId) -> bool {
        self.clip(id).is_some()
    }

    /// Latest clip end, or the adopted source duration when there are no clips.
    pub fn derived_duration(&self) -> f64 {
        if self.clips.is_empty() {
            return self.source.as_ref().map_or(0.0, |source| source.duration);
        }
        self.clips.iter().map(|clip| clip.end).fold(0.0, f64::max)
    }
}

/// Authoritative clip collection plus derived scalar state.
///
/// Mutators are crate-private: every historied change goes through
/// [`crate::history::HistoryManager`].
#[derive(Debug, Default)]
pub struct ClipStore {
    state: TimelineState,
    current_time: f64,
}

impl ClipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn clips(&self) -> &[Clip] {
        &self.state.clips
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.state.clip(id)
    }

    pub fn duration(&self) -> f64 {
        self.state.duration
    }

    pub fn selected_clip_id(&self) -> Option<ClipId> {
        self.state.selected_clip_id
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.state.source.as_ref()
    }

    /// Deep copy of the historied state.
    pub fn snapshot(&self) -> TimelineState {
        self.state.clone()
    }

    pub(crate) fn set_all(&mut self, clips: Vec<Clip>) -> Result<()> {
        validate_clips(&clips)?;
        self.state.clips = clips;
        if let Some(selected) = self.state.selected_clip_id {
            if !self.state.contains(selected) {
                debug!(%selected, "selection cleared: clip no longer present");
                self.state.selected_clip_id = None;
            }
        }
        self.recalculate_duration();
        debug!(clip_count = self.state.clips.len(), "clips replaced");
        Ok(())
    }

    pub(crate) fn insert(&mut self, clip: Clip) -> Result<()> {
        self.check_insert(&clip)?;
        debug!(id = %clip.id, start = clip.start, end = clip.end, track = clip.track, "clip inserted");
        self.state.clips.push(clip);
        self.recalculate_duration();
        Ok(())
    }

    /// Validates `clip` against the current collection without mutating it.
    pub(crate) fn check_insert(&self, clip: &Clip) -> Result<()> {
        ensure_range(clip.start, clip.end)?;
        if self.state.contains(clip.id) {
            return Err(EngineError::DuplicateClip { id: clip.id });
        }
        Ok(())
    }

    /// Merges `patch` into the clip with `id`.
    ///
    /// Returns `Ok(false)` when no clip matches. A merge that would leave
    /// `start >= end` is rejected and the clip is left untouched.
    pub(crate) fn update(&mut self, id: ClipId, patch: &ClipPatch) -> Result<bool> {
        let Some(index) = self.state.clips.iter().position(|clip| clip.id == id) else {
            warn!(%id, "update ignored: clip not found");
            return Ok(false);
        };

        let merged = self.state.clips[index].merged(patch);
        ensure_range(merged.start, merged.end)?;
        self.state.clips[index] = merged;
        self.recalculate_duration();
        debug!(%id, "clip updated");
        Ok(true)
    }

    pub(crate) fn remove(&mut self, id: ClipId) -> Option<Clip> {
        let index = self.state.clips.iter().position(|clip| clip.id == id)?;
        let removed = self.state.clips.remove(index);
        if self.state.selected_clip_id == Some(id) {
            self.state.selected_clip_id = None;
        }
        self.recalculate_duration();
        debug!(%id, clip_count = self.state.clips.len(), "clip removed");
        Some(removed)
    }

    pub(crate) fn set_selection(&mut self, id: Option<ClipId>) -> Result<()> {
        if let Some(id) = id {
            if !self.state.contains(id) {
                warn!(%id, "selection rejected: clip not found");
                return Err(EngineError::UnknownClip { id });
            }
        }
        self.state.selected_clip_id = id;
        Ok(())
    }

    /// Moves the playhead, clamped into `[0, duration]`.
    pub(crate) fn set_current_time(&mut self, seconds: f64) -> f64 {
        self.current_time = clamp_playhead(seconds, self.state.duration);
        self.current_time
    }

    pub(crate) fn set_source(&mut self, source: Option<MediaSource>) {
        self.state.source = source;
        self.recalculate_duration();
    }

    /// Replaces the historied state. The playhead is kept unless the
    /// restored duration no longer covers it.
    pub(crate) fn restore(&mut self, state: TimelineState) {
        self.state = state;
        self.clamp_current_time();
    }

    pub(crate) fn clamp_current_time(&mut self) {
        self.current_time = clamp_playhead(self.current_time, self.state.duration);
    }

    fn recalculate_duration(&mut self) {
        self.state.duration = self.state.derived_duration();
    }
}

fn validate_clips(clips: &[Clip]) -> Result<()> {
    let mut seen = HashSet::with_capacity(clips.len());
    for clip in clips {
        ensure_range(clip.start, clip.end)?;
        if !seen.insert(clip.id) {
            return Err(EngineError::DuplicateClip { id: clip.id });
        }
    }
    Ok(())
}
