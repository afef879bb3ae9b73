use crate::clip::{Clip, ClipId};
use crate::error::Result;
use crate::operation::Operation;

/// Number of lanes effect clips can land on.
pub const EFFECT_TRACK_COUNT: usize = 5;

/// Lane an effect kind is placed on.
///
/// cut/speed go to the video lane, textOverlay/caption to the text lane,
/// fade to effects, colorGrade/brightness to format; anything else lands on
/// track 2.
pub fn track_for_kind(kind: &str) -> u32 {
    match kind {
        "cut" | "speed" => 0,
        "textOverlay" | "caption" => 1,
        "fade" => 3,
        "colorGrade" | "brightness" => 4,
        _ => 2,
    }
}

/// Display label for a clip produced from `kind`, e.g. `"Caption Effect"`.
pub fn effect_label(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => format!("{}{} Effect", first.to_uppercase(), chars.as_str()),
        None => "Effect".to_string(),
    }
}

/// Converts operations into clips ready to be appended to the timeline.
///
/// Every clip gets a fresh id. Fails on the first operation whose range is
/// invalid, producing nothing.
///
/// # Example
/// ```
/// use engine::apply::operations_to_clips;
/// use engine::operation::{Effect, Operation};
///
/// let clips = operations_to_clips(&[Operation::new(0.0, 60.0, Effect::Caption)])
///     .expect("valid operation");
/// assert_eq!(clips[0].track, 1);
/// assert_eq!(clips[0].name, "Caption Effect");
/// ```
pub fn operations_to_clips(operations: &[Operation]) -> Result<Vec<Clip>> {
    operations
        .iter()
        .map(|operation| {
            operation.validate()?;
            let kind = operation.effect.as_str();
            Ok(Clip {
                id: ClipId::new(),
                start: operation.start_sec,
                end: operation.end_sec,
                track: track_for_kind(kind),
                kind: kind.to_string(),
                name: effect_label(kind),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{EFFECT_TRACK_COUNT, effect_label, operations_to_clips, track_for_kind};
    use crate::error::EngineError;
    use crate::operation::{Effect, Operation};

    #[test]
    fn every_effect_maps_to_its_lane() {
        let expected = [
            (Effect::Cut, 0),
            (Effect::Speed, 0),
            (Effect::TextOverlay, 1),
            (Effect::Caption, 1),
            (Effect::Zoom, 2),
            (Effect::Fade, 3),
            (Effect::ColorGrade, 4),
            (Effect::Brightness, 4),
        ];
        for (effect, track) in expected {
            assert_eq!(track_for_kind(effect.as_str()), track, "{effect}");
            assert!((track as usize) < EFFECT_TRACK_COUNT, "{effect}");
        }
    }

    #[test]
    fn unrecognized_kind_lands_on_track_two() {
        assert_eq!(track_for_kind("sparkle"), 2);
        assert_eq!(track_for_kind(""), 2);
    }

    #[test]
    fn labels_capitalize_the_effect_name() {
        assert_eq!(effect_label("colorGrade"), "ColorGrade Effect");
        assert_eq!(effect_label("cut"), "Cut Effect");
    }

    #[test]
    fn clips_copy_ranges_and_get_unique_ids() {
        let clips = operations_to_clips(&[
            Operation::new(5.0, 15.0, Effect::Cut),
            Operation::new(30.0, 45.0, Effect::Cut),
            Operation::new(0.0, 120.0, Effect::ColorGrade),
        ])
        .expect("valid operations");

        assert_eq!(clips.len(), 3);
        assert_eq!((clips[0].start, clips[0].end), (5.0, 15.0));
        assert_eq!(clips[2].track, 4);
        assert_eq!(clips[2].kind, "colorGrade");
        let ids: HashSet<_> = clips.iter().map(|clip| clip.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn invalid_operation_produces_no_clips() {
        let result = operations_to_clips(&[
            Operation::new(0.0, 5.0, Effect::Zoom),
            Operation::new(8.0, 8.0, Effect::Zoom),
        ]);
        assert!(matches!(result, Err(EngineError::InvalidRange { .. })));
    }
}
