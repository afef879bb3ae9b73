use engine::{
    Clip, ClipPatch, Command, DroppedMedia, Effect, Engine, EngineError, EngineSettings, Event,
    KeywordInterpreter, MediaSource, parse_command_result,
};

fn drop_footage<I: engine::CommandInterpreter>(engine: &mut Engine<I>, duration: f64) {
    engine
        .handle_command(Command::DropMedia(DroppedMedia {
            track: 0,
            drop_time: 0.0,
            duration,
            name: "footage.mp4".to_string(),
        }))
        .expect("drop should succeed");
}

fn execute<I: engine::CommandInterpreter>(engine: &mut Engine<I>, text: &str) -> Vec<Event> {
    engine
        .handle_command(Command::Execute {
            text: text.to_string(),
        })
        .expect("execute should succeed")
}

#[test]
fn keyword_commands_place_effects_on_their_lanes() {
    let mut engine = Engine::new(KeywordInterpreter);
    drop_footage(&mut engine, 30.0);

    execute(&mut engine, "Remove the silences");
    execute(&mut engine, "fade it out");
    execute(&mut engine, "add subtitles");
    execute(&mut engine, "make the colors warmer");
    execute(&mut engine, "something unexpected");

    let snapshot = engine.snapshot();
    let placed: Vec<(&str, u32, f64, f64)> = snapshot.clips[1..]
        .iter()
        .map(|clip| (clip.kind.as_str(), clip.track, clip.start, clip.end))
        .collect();
    assert_eq!(
        placed,
        vec![
            ("cut", 0, 5.0, 15.0),
            ("cut", 0, 30.0, 45.0),
            ("fade", 3, 10.0, 15.0),
            ("fade", 3, 25.0, 30.0),
            ("caption", 1, 0.0, 60.0),
            ("colorGrade", 4, 0.0, 120.0),
            ("zoom", 2, 0.0, 10.0),
        ]
    );
    assert_eq!(snapshot.duration, 120.0);
    assert_eq!(engine.history().undo_depth(), 6);
}

#[test]
fn every_execute_is_one_undo_step() {
    let mut engine = Engine::new(KeywordInterpreter);
    drop_footage(&mut engine, 30.0);
    let after_drop = engine.snapshot();

    execute(&mut engine, "cut the intro");
    execute(&mut engine, "fade in and out");
    engine.handle_command(Command::Undo).expect("undo fade");
    engine.handle_command(Command::Undo).expect("undo cut");

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.clips, after_drop.clips);
    assert_eq!(snapshot.selected_clip_id, after_drop.selected_clip_id);
    assert!(snapshot.can_redo);

    engine.handle_command(Command::Redo).expect("redo cut");
    assert_eq!(engine.snapshot().clips.len(), 3);
}

#[test]
fn quick_commands_use_timeline_duration() {
    let mut engine = Engine::from_settings(EngineSettings::default());
    drop_footage(&mut engine, 80.0);

    let events = execute(&mut engine, "cut the first 5 seconds");
    let Some(Event::OperationsApplied { clip_ids }) = events.last() else {
        panic!("expected OperationsApplied");
    };
    let first = engine
        .history()
        .store()
        .clip(clip_ids[0])
        .expect("applied clip exists")
        .clone();
    assert_eq!((first.start, first.end, first.track), (0.0, 5.0, 0));

    execute(&mut engine, "add text 'Hello' at 0:10");
    let overlay = engine.snapshot().clips.last().cloned().expect("overlay clip");
    assert_eq!(overlay.kind, Effect::TextOverlay.as_str());
    assert_eq!((overlay.start, overlay.end, overlay.track), (10.0, 15.0, 1));
}

#[test]
fn keyword_only_settings_skip_quick_commands() {
    let settings = EngineSettings {
        quick_commands: false,
        ..EngineSettings::default()
    };
    let mut engine = Engine::from_settings(settings);
    drop_footage(&mut engine, 80.0);

    execute(&mut engine, "cut the first 5 seconds");
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.clips.len(), 3);
    assert_eq!((snapshot.clips[1].start, snapshot.clips[1].end), (5.0, 15.0));
}

#[test]
fn backend_result_is_applied_as_one_batch() {
    let mut engine = Engine::new(KeywordInterpreter);
    drop_footage(&mut engine, 30.0);

    let operations = parse_command_result(
        r#"{"operations": [
            {"start_sec": 2, "end_sec": 4, "effect": "speed", "params": {"rate": 2.0}},
            {"start_sec": 6, "end_sec": 9, "effect": "brightness"}
        ]}"#,
    )
    .expect("valid backend result");
    engine
        .handle_command(Command::ApplyOperations { operations })
        .expect("apply backend result");

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.clips.len(), 3);
    assert_eq!(snapshot.clips[1].name, "Speed Effect");
    assert_eq!(snapshot.clips[2].track, 4);
    assert_eq!(snapshot.selected_clip_id, Some(snapshot.clips[1].id));
    assert_eq!(snapshot.undo_label.as_deref(), Some("Apply operations"));
}

#[test]
fn manual_clip_edits_are_validated_and_undoable() {
    let mut engine = Engine::new(KeywordInterpreter);
    let clip = Clip::new(0.0, 10.0, 2, "audio", "music.mp3").expect("valid clip");
    let id = clip.id;
    engine
        .handle_command(Command::InsertClip(clip))
        .expect("insert clip");

    let result = engine.handle_command(Command::UpdateClip {
        id,
        patch: ClipPatch {
            start: Some(12.0),
            ..ClipPatch::default()
        },
    });
    assert!(matches!(result, Err(EngineError::InvalidRange { .. })));
    assert_eq!(engine.history().undo_depth(), 1);

    engine
        .handle_command(Command::UpdateClip {
            id,
            patch: ClipPatch {
                end: Some(25.0),
                ..ClipPatch::default()
            },
        })
        .expect("extend clip");
    assert_eq!(engine.snapshot().duration, 25.0);

    engine.handle_command(Command::Undo).expect("undo extend");
    assert_eq!(engine.snapshot().duration, 10.0);
}

#[test]
fn source_duration_applies_until_first_clip() {
    let mut engine = Engine::new(KeywordInterpreter);
    engine
        .handle_command(Command::SelectSource(MediaSource {
            id: "2".to_string(),
            name: "podcast.mp4".to_string(),
            duration: 300.0,
            src: None,
        }))
        .expect("select source");
    assert_eq!(engine.snapshot().duration, 300.0);

    drop_footage(&mut engine, 20.0);
    assert_eq!(engine.snapshot().duration, 20.0);
}
