use serde::Serialize;
use tracing::{debug, info, warn};

use crate::apply::operations_to_clips;
use crate::clip::{Clip, ClipId, ClipPatch};
use crate::error::{EngineError, Result};
use crate::history::HistoryManager;
use crate::interpret::{
    CommandInterpreter, InterpretContext, KeywordInterpreter, QuickCommandInterpreter,
};
use crate::keymap::{KeyPress, command_for_key};
use crate::operation::Operation;
use crate::settings::EngineSettings;
use crate::source::{DroppedMedia, MediaSource};

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Switches to another source: clears every clip and adopts the
    /// source duration.
    SelectSource(MediaSource),
    /// Places a dropped media file on a track and selects it.
    DropMedia(DroppedMedia),
    /// Interprets free text and applies the resulting operations.
    ///
    /// # Example
    /// ```
    /// use engine::{Command, DroppedMedia, Engine, KeywordInterpreter};
    ///
    /// let mut engine = Engine::new(KeywordInterpreter);
    /// engine
    ///     .handle_command(Command::DropMedia(DroppedMedia {
    ///         track: 0,
    ///         drop_time: 0.0,
    ///         duration: 90.0,
    ///         name: "interview.mp4".to_string(),
    ///     }))
    ///     .expect("drop should succeed");
    /// engine
    ///     .handle_command(Command::Execute {
    ///         text: "please cut the boring part".to_string(),
    ///     })
    ///     .expect("command should apply");
    /// assert_eq!(engine.history().store().clips().len(), 3);
    /// ```
    Execute {
        text: String,
    },
    /// Applies operations obtained from an external classifier.
    ApplyOperations {
        operations: Vec<Operation>,
    },
    SetClips {
        clips: Vec<Clip>,
    },
    InsertClip(Clip),
    UpdateClip {
        id: ClipId,
        patch: ClipPatch,
    },
    RemoveClip {
        id: ClipId,
    },
    Select {
        id: Option<ClipId>,
    },
    SetPlayhead {
        seconds: f64,
    },
    Undo,
    Redo,
    DeleteSelected,
    Key(KeyPress),
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TimelineChanged(TimelineSnapshot),
    PlayheadChanged { seconds: f64 },
    OperationsApplied { clip_ids: Vec<ClipId> },
    Error(EngineErrorEvent),
}

/// User-facing error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    InvalidRange,
    UnknownClip,
    InterpreterFailure,
    EmptyTimeline,
    Other,
}

impl From<&EngineError> for EngineErrorKind {
    fn from(value: &EngineError) -> Self {
        match value {
            EngineError::InvalidRange { .. } => Self::InvalidRange,
            EngineError::UnknownClip { .. } => Self::UnknownClip,
            EngineError::InterpreterFailure { .. } => Self::InterpreterFailure,
            EngineError::EmptyTimeline => Self::EmptyTimeline,
            _ => Self::Other,
        }
    }
}

/// User-facing error payload emitted as an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineErrorEvent {
    pub kind: EngineErrorKind,
    pub message: String,
}

impl EngineErrorEvent {
    pub fn from_error(error: &EngineError) -> Self {
        Self {
            kind: EngineErrorKind::from(error),
            message: error.to_string(),
        }
    }
}

/// Read-only view consumed by rendering surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSnapshot {
    pub clips: Vec<Clip>,
    pub duration: f64,
    pub selected_clip_id: Option<ClipId>,
    pub current_time: f64,
    pub source: Option<MediaSource>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_label: Option<String>,
    pub redo_label: Option<String>,
}

/// Interpreter chosen from [`EngineSettings::quick_commands`].
pub type DynInterpreter = Box<dyn CommandInterpreter + Send>;

/// Timeline editing engine: history-wrapped clip store plus a command interpreter.
#[derive(Debug)]
pub struct Engine<I> {
    history: HistoryManager,
    interpreter: I,
    settings: EngineSettings,
}

impl Engine<DynInterpreter> {
    /// Builds an engine whose interpreter and history depth follow `settings`.
    pub fn from_settings(settings: EngineSettings) -> Self {
        let interpreter: DynInterpreter = if settings.quick_commands {
            Box::new(QuickCommandInterpreter::new(KeywordInterpreter))
        } else {
            Box::new(KeywordInterpreter)
        };
        Self::with_settings(interpreter, settings)
    }
}

impl<I> Engine<I>
where
    I: CommandInterpreter,
{
    /// Creates an engine with default settings.
    pub fn new(interpreter: I) -> Self {
        Self::with_settings(interpreter, EngineSettings::default())
    }

    pub fn with_settings(interpreter: I, settings: EngineSettings) -> Self {
        Self {
            history: HistoryManager::with_limit(settings.history_limit),
            interpreter,
            settings,
        }
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Captures the current view of the timeline.
    pub fn snapshot(&self) -> TimelineSnapshot {
        let store = self.history.store();
        TimelineSnapshot {
            clips: store.clips().to_vec(),
            duration: store.duration(),
            selected_clip_id: store.selected_clip_id(),
            current_time: store.current_time(),
            source: store.source().cloned(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            undo_label: self.history.undo_label().map(str::to_string),
            redo_label: self.history.redo_label().map(str::to_string),
        }
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::SelectSource(source) => self.select_source(source),
            Command::DropMedia(dropped) => self.drop_media(dropped),
            Command::Execute { text } => self.execute(&text),
            Command::ApplyOperations { operations } => self.apply_operations(operations),
            Command::SetClips { clips } => self.set_clips(clips),
            Command::InsertClip(clip) => self.insert_clip(clip),
            Command::UpdateClip { id, patch } => self.update_clip(id, patch),
            Command::RemoveClip { id } => self.remove_clip(id),
            Command::Select { id } => self.select(id),
            Command::SetPlayhead { seconds } => self.set_playhead(seconds),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::DeleteSelected => self.delete_selected(),
            Command::Key(press) => self.key(press),
        }
    }

    fn select_source(&mut self, source: MediaSource) -> Result<Vec<Event>> {
        source.validate()?;
        let name = source.name.clone();
        self.history.batch("Select source", |store| {
            store.set_all(Vec::new())?;
            store.set_source(Some(source));
            Ok(())
        })?;
        self.history.set_current_time(0.0);

        info!(
            source = %name,
            duration = self.history.store().duration(),
            "source selected"
        );
        Ok(vec![
            Event::TimelineChanged(self.snapshot()),
            Event::PlayheadChanged { seconds: 0.0 },
        ])
    }

    fn drop_media(&mut self, dropped: DroppedMedia) -> Result<Vec<Event>> {
        let playhead = self.history.store().current_time();
        let clip = dropped.into_clip(self.settings.track_count())?;
        let id = clip.id;
        let track = clip.track;
        self.history.batch("Drop media", |store| {
            store.insert(clip)?;
            store.set_selection(Some(id))
        })?;

        info!(%id, track, "media dropped on timeline");
        Ok(self.changed_events(playhead))
    }

    fn execute(&mut self, text: &str) -> Result<Vec<Event>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let store = self.history.store();
        if store.clips().is_empty() && store.selected_clip_id().is_none() {
            warn!(command = text, "command rejected: timeline is empty");
            return Err(EngineError::EmptyTimeline);
        }

        let context = InterpretContext {
            duration: store.duration(),
        };
        let operations = self
            .interpreter
            .interpret(text, &context)
            .inspect_err(|error| warn!(command = text, %error, "command interpretation failed"))?;
        debug!(
            command = text,
            operation_count = operations.len(),
            "command interpreted"
        );
        self.apply_operations(operations)
    }

    fn apply_operations(&mut self, operations: Vec<Operation>) -> Result<Vec<Event>> {
        let new_clips = operations_to_clips(&operations)?;
        let Some(first) = new_clips.first().map(|clip| clip.id) else {
            debug!("no operations to apply");
            return Ok(Vec::new());
        };
        let clip_ids: Vec<ClipId> = new_clips.iter().map(|clip| clip.id).collect();
        let playhead = self.history.store().current_time();

        self.history.batch("Apply operations", |store| {
            let mut clips = store.clips().to_vec();
            clips.extend(new_clips);
            store.set_all(clips)?;
            store.set_selection(Some(first))
        })?;

        info!(
            added = clip_ids.len(),
            clip_count = self.history.store().clips().len(),
            "operations applied"
        );
        let mut events = self.changed_events(playhead);
        events.push(Event::OperationsApplied { clip_ids });
        Ok(events)
    }

    fn set_clips(&mut self, clips: Vec<Clip>) -> Result<Vec<Event>> {
        let playhead = self.history.store().current_time();
        self.history.set_all(clips)?;
        Ok(self.changed_events(playhead))
    }

    fn insert_clip(&mut self, clip: Clip) -> Result<Vec<Event>> {
        let playhead = self.history.store().current_time();
        self.history.insert(clip)?;
        Ok(self.changed_events(playhead))
    }

    fn update_clip(&mut self, id: ClipId, patch: ClipPatch) -> Result<Vec<Event>> {
        let playhead = self.history.store().current_time();
        if !self.history.update(id, &patch)? {
            debug!(%id, "update recorded without a matching clip");
        }
        Ok(self.changed_events(playhead))
    }

    fn remove_clip(&mut self, id: ClipId) -> Result<Vec<Event>> {
        let playhead = self.history.store().current_time();
        if self.history.remove(id).is_none() {
            debug!(%id, "remove recorded without a matching clip");
        }
        Ok(self.changed_events(playhead))
    }

    fn select(&mut self, id: Option<ClipId>) -> Result<Vec<Event>> {
        self.history.set_selection(id)?;
        Ok(vec![Event::TimelineChanged(self.snapshot())])
    }

    fn set_playhead(&mut self, seconds: f64) -> Result<Vec<Event>> {
        let clamped = self.history.set_current_time(seconds);
        Ok(vec![Event::PlayheadChanged { seconds: clamped }])
    }

    fn undo(&mut self) -> Result<Vec<Event>> {
        let playhead = self.history.store().current_time();
        if !self.history.undo() {
            debug!("nothing to undo");
            return Ok(Vec::new());
        }
        Ok(self.changed_events(playhead))
    }

    fn redo(&mut self) -> Result<Vec<Event>> {
        let playhead = self.history.store().current_time();
        if !self.history.redo() {
            debug!("nothing to redo");
            return Ok(Vec::new());
        }
        Ok(self.changed_events(playhead))
    }

    fn delete_selected(&mut self) -> Result<Vec<Event>> {
        let Some(id) = self.history.store().selected_clip_id() else {
            return Ok(Vec::new());
        };
        self.remove_clip(id)
    }

    fn key(&mut self, press: KeyPress) -> Result<Vec<Event>> {
        let has_selection = self.history.store().selected_clip_id().is_some();
        match command_for_key(&press, has_selection) {
            Some(command) => self.handle_command(command),
            None => Ok(Vec::new()),
        }
    }

    fn changed_events(&self, playhead_before: f64) -> Vec<Event> {
        let mut events = vec![Event::TimelineChanged(self.snapshot())];
        let playhead = self.history.store().current_time();
        if playhead != playhead_before {
            events.push(Event::PlayheadChanged { seconds: playhead });
        }
        events
    }
}
