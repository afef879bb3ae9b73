//! UI-agnostic timeline engine for command-driven video edit planning.
//!
//! Free-text editing commands are interpreted into timed [`Operation`]s,
//! turned into clips on fixed lanes, and applied to a clip store whose
//! every mutation can be undone.

pub mod api;
pub mod apply;
pub mod bridge;
pub mod clip;
pub mod error;
pub mod history;
pub mod interpret;
pub mod keymap;
pub mod operation;
pub mod settings;
pub mod source;
pub mod store;
pub mod time;

pub use api::{
    Command, DynInterpreter, Engine, EngineErrorEvent, EngineErrorKind, Event, TimelineSnapshot,
};
pub use bridge::{EngineCommandSender, EngineEventReceiver, dispatch, spawn_engine_bridge};
pub use clip::{Clip, ClipId, ClipPatch, MEDIA_CLIP_KIND};
pub use error::{EngineError, Result};
pub use history::{HistoryEntry, HistoryManager};
pub use interpret::{
    CommandInterpreter, CommandResult, InterpretContext, KeywordInterpreter,
    QuickCommandInterpreter, parse_command_result,
};
pub use keymap::{Key, KeyPress};
pub use operation::{Effect, Operation};
pub use settings::EngineSettings;
pub use source::{DroppedMedia, MediaSource};
pub use store::{ClipStore, TimelineState};
pub use time::{format_timestamp, parse_timestamp};
