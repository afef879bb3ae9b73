use engine::{
    ClipId, ClipPatch, Command, DroppedMedia, EngineSettings, Event, KeyPress, MediaSource,
    TimelineSnapshot, format_timestamp, parse_command_result, parse_timestamp,
};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Engine(Command),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  source <name> <duration>            switch to a new source video
  drop <track> <at> <duration> <name> drop a media file on a track
  cmd <text>                          run an editing command
  apply <json>                        apply a backend result {\"operations\": [...]}
  update <clip-id> <json>             patch a clip, e.g. {\"end\": 12.5}
  remove <clip-id>                    remove a clip
  select <clip-id>|none               change the selection
  delete                              remove the selected clip
  seek <time>                         move the playhead (SS, MM:SS or HH:MM:SS)
  key <chord>                         press a shortcut, e.g. ctrl+z or delete
  undo | redo | show | help | quit";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let input = match verb.to_ascii_lowercase().as_str() {
        "quit" | "exit" => Input::Quit,
        "help" => Input::Help,
        "show" => Input::Show,
        "undo" => Input::Engine(Command::Undo),
        "redo" => Input::Engine(Command::Redo),
        "delete" => Input::Engine(Command::DeleteSelected),
        "cmd" => Input::Engine(Command::Execute {
            text: rest.to_string(),
        }),
        "source" => {
            let (name, duration) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or("usage: source <name> <duration>")?;
            let name = name.trim();
            Input::Engine(Command::SelectSource(MediaSource {
                id: name.to_string(),
                name: name.to_string(),
                duration: parse_seconds(duration)?,
                src: None,
            }))
        }
        "drop" => {
            let mut parts = rest.splitn(4, char::is_whitespace);
            let (Some(track), Some(at), Some(duration), Some(name)) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err("usage: drop <track> <at> <duration> <name>".to_string());
            };
            Input::Engine(Command::DropMedia(DroppedMedia {
                track: track
                    .parse()
                    .map_err(|_| format!("invalid track: {track}"))?,
                drop_time: parse_seconds(at)?,
                duration: parse_seconds(duration)?,
                name: name.trim().to_string(),
            }))
        }
        "apply" => {
            let operations = parse_command_result(rest).map_err(|error| error.to_string())?;
            Input::Engine(Command::ApplyOperations { operations })
        }
        "update" => {
            let (id, body) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: update <clip-id> <json>")?;
            let patch: ClipPatch =
                serde_json::from_str(body).map_err(|error| format!("invalid patch: {error}"))?;
            if patch.is_empty() {
                return Err("patch changes no clip field".to_string());
            }
            Input::Engine(Command::UpdateClip {
                id: parse_clip_id(id)?,
                patch,
            })
        }
        "remove" => Input::Engine(Command::RemoveClip {
            id: parse_clip_id(rest)?,
        }),
        "select" => {
            let id = match rest {
                "" | "none" => None,
                id => Some(parse_clip_id(id)?),
            };
            Input::Engine(Command::Select { id })
        }
        "seek" => Input::Engine(Command::SetPlayhead {
            seconds: parse_seconds(rest)?,
        }),
        "key" => {
            let press: KeyPress = rest.parse()?;
            Input::Engine(Command::Key(press))
        }
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(input))
}

fn parse_seconds(value: &str) -> Result<f64, String> {
    parse_timestamp(value.trim()).map_err(|error| error.to_string())
}

fn parse_clip_id(value: &str) -> Result<ClipId, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("invalid clip id: {value}"))
}

/// Renders an event as one or more output lines.
pub fn render_event(event: &Event, settings: &EngineSettings) -> String {
    match event {
        Event::TimelineChanged(snapshot) => render_snapshot(snapshot, settings),
        Event::PlayheadChanged { seconds } => format!("playhead {}", format_timestamp(*seconds)),
        Event::OperationsApplied { clip_ids } => format!("applied {} operation(s)", clip_ids.len()),
        Event::Error(error) => format!("error: {}", error.message),
    }
}

/// Human-readable timeline listing.
pub fn render_snapshot(snapshot: &TimelineSnapshot, settings: &EngineSettings) -> String {
    let mut lines = vec![format!(
        "timeline {} | playhead {} | {} clip(s)",
        format_timestamp(snapshot.duration),
        format_timestamp(snapshot.current_time),
        snapshot.clips.len()
    )];
    for clip in &snapshot.clips {
        let marker = if snapshot.selected_clip_id == Some(clip.id) {
            '*'
        } else {
            ' '
        };
        lines.push(format!(
            "{marker} [{:<7}] {}-{} {} ({})",
            settings.track_label(clip.track),
            format_timestamp(clip.start),
            format_timestamp(clip.end),
            clip.name,
            clip.id
        ));
    }
    if let Some(label) = &snapshot.undo_label {
        lines.push(format!("  undo: {label}"));
    }
    if let Some(label) = &snapshot.redo_label {
        lines.push(format!("  redo: {label}"));
    }
    lines.join("\n")
}
