//! Worker-thread bridge that serializes commands onto one engine.
//!
//! Commands are handled strictly in submission order, so a slow interpreter
//! never lets a later command observe a half-applied batch.
//!
//! The ordering holds only for callers that go through this bridge. A caller
//! driving [`Engine::handle_command`] directly, as the `cutplan` REPL does,
//! gets ordering from its own single thread instead.

use std::sync::mpsc;
use std::thread;

use tracing::{debug, warn};

use crate::api::{Command, Engine, EngineErrorEvent, Event};
use crate::error::{EngineError, Result};
use crate::interpret::CommandInterpreter;

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Sender used by a surface to dispatch commands to the engine thread.
pub type EngineCommandSender = mpsc::SyncSender<Command>;

/// Receiver used by a surface to read events emitted by the engine thread.
pub type EngineEventReceiver = mpsc::Receiver<Event>;

/// Spawns a worker thread owning `engine`.
///
/// Failed commands are reported as [`Event::Error`]; the worker stops once
/// either side of the bridge is dropped.
pub fn spawn_engine_bridge<I>(mut engine: Engine<I>) -> (EngineCommandSender, EngineEventReceiver)
where
    I: CommandInterpreter + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::sync_channel::<Command>(COMMAND_CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::sync_channel::<Event>(EVENT_CHANNEL_CAPACITY);

    thread::spawn(move || {
        while let Ok(command) = command_rx.recv() {
            let events = match engine.handle_command(command) {
                Ok(events) => events,
                Err(error) => {
                    warn!(%error, "command failed");
                    vec![Event::Error(EngineErrorEvent::from_error(&error))]
                }
            };
            for event in events {
                if event_tx.send(event).is_err() {
                    debug!("event receiver dropped, stopping engine worker");
                    return;
                }
            }
        }
        debug!("command sender dropped, stopping engine worker");
    });

    (command_tx, event_rx)
}

/// Sends `command`, mapping a stopped worker to [`EngineError::BridgeDisconnected`].
pub fn dispatch(sender: &EngineCommandSender, command: Command) -> Result<()> {
    sender
        .send(command)
        .map_err(|_| EngineError::BridgeDisconnected)
}
