//! Translation of free-text editing commands into [`Operation`]s.
//!
//! [`CommandInterpreter`] is the single capability shared by every
//! classifier: rule based ones defined here, or a model-backed service whose
//! JSON answer is decoded with [`parse_command_result`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::operation::{Effect, Operation};
use crate::time::parse_timestamp;

/// Seconds covered by a text overlay placed with `add text '...' at T`.
pub const TEXT_OVERLAY_SECONDS: f64 = 5.0;

/// Timeline facts available to an interpreter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InterpretContext {
    /// Current timeline duration in seconds, `0.0` when unknown.
    pub duration: f64,
}

/// Converts command text into zero or more operations.
pub trait CommandInterpreter {
    fn interpret(&self, command: &str, context: &InterpretContext) -> Result<Vec<Operation>>;
}

impl<T> CommandInterpreter for Box<T>
where
    T: CommandInterpreter + ?Sized,
{
    fn interpret(&self, command: &str, context: &InterpretContext) -> Result<Vec<Operation>> {
        (**self).interpret(command, context)
    }
}

/// Deterministic keyword classifier. Always yields at least one operation.
///
/// Rules are checked in order and the first match wins: `cut`/`remove`,
/// `fade`, `caption`/`subtitle`, `color`/`grade`, then a default zoom.
///
/// # Example
/// ```
/// use engine::interpret::{CommandInterpreter, InterpretContext, KeywordInterpreter};
/// use engine::operation::Effect;
///
/// let operations = KeywordInterpreter
///     .interpret("add captions", &InterpretContext::default())
///     .expect("keyword rules never fail");
/// assert_eq!(operations.len(), 1);
/// assert_eq!(operations[0].effect, Effect::Caption);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordInterpreter;

impl CommandInterpreter for KeywordInterpreter {
    fn interpret(&self, command: &str, _context: &InterpretContext) -> Result<Vec<Operation>> {
        let lower = command.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|word| lower.contains(word));

        let operations = if mentions(&["cut", "remove"]) {
            vec![
                Operation::new(5.0, 15.0, Effect::Cut),
                Operation::new(30.0, 45.0, Effect::Cut),
            ]
        } else if mentions(&["fade"]) {
            vec![
                Operation::new(10.0, 15.0, Effect::Fade).with_param("type", "in"),
                Operation::new(25.0, 30.0, Effect::Fade).with_param("type", "out"),
            ]
        } else if mentions(&["caption", "subtitle"]) {
            vec![Operation::new(0.0, 60.0, Effect::Caption).with_param("style", "centered")]
        } else if mentions(&["color", "grade"]) {
            vec![Operation::new(0.0, 120.0, Effect::ColorGrade).with_param("style", "cinematic")]
        } else {
            vec![Operation::new(0.0, 10.0, Effect::Zoom).with_param("scale", 1.2)]
        };

        debug!(
            command,
            operation_count = operations.len(),
            effect = %operations[0].effect,
            "keyword classification"
        );
        Ok(operations)
    }
}

/// Recognises precise phrasings before delegating to `fallback`.
///
/// Supported forms:
/// - `cut|trim [out] the first N seconds`
/// - `cut|trim [out] the last N seconds` (needs a known duration)
/// - `cut|trim [between|from] A to|and|- B`
/// - `add text 'X' at|@ T`
#[derive(Debug, Default, Clone)]
pub struct QuickCommandInterpreter<F> {
    fallback: F,
}

impl<F> QuickCommandInterpreter<F> {
    pub fn new(fallback: F) -> Self {
        Self { fallback }
    }
}

impl<F> CommandInterpreter for QuickCommandInterpreter<F>
where
    F: CommandInterpreter,
{
    fn interpret(&self, command: &str, context: &InterpretContext) -> Result<Vec<Operation>> {
        match match_quick(command, context.duration) {
            Some(operation) => {
                operation.validate()?;
                debug!(command, effect = %operation.effect, "quick command matched");
                Ok(vec![operation])
            }
            None => self.fallback.interpret(command, context),
        }
    }
}

/// Response body of a command classification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub operations: Vec<Operation>,
}

/// Decodes a classification service response into validated operations.
pub fn parse_command_result(body: &str) -> Result<Vec<Operation>> {
    let result: CommandResult =
        serde_json::from_str(body).map_err(|error| EngineError::InterpreterFailure {
            reason: format!("malformed command result: {error}"),
        })?;
    for operation in &result.operations {
        operation.validate()?;
    }
    Ok(result.operations)
}

/// Matches one quick-command phrase anywhere in `command`.
pub fn match_quick(command: &str, duration: f64) -> Option<Operation> {
    let lower = command.to_ascii_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    match_cut_edge(&words, duration)
        .or_else(|| match_cut_range(&words))
        .or_else(|| match_add_text(command, &lower))
}

fn match_cut_edge(words: &[&str], duration: f64) -> Option<Operation> {
    for start in verb_positions(words) {
        let mut index = start + 1;
        if words.get(index) == Some(&"out") {
            index += 1;
        }
        if words.get(index) != Some(&"the") {
            continue;
        }
        let Some(edge) = words.get(index + 1).copied() else {
            continue;
        };
        let Some(seconds) = seconds_phrase(&words[index + 2..]) else {
            continue;
        };

        match edge {
            "first" => return Some(Operation::new(0.0, seconds, Effect::Cut)),
            "last" if duration > 0.0 => {
                let from = (duration - seconds).max(0.0);
                return Some(Operation::new(from, duration, Effect::Cut));
            }
            _ => {}
        }
    }
    None
}

fn match_cut_range(words: &[&str]) -> Option<Operation> {
    for start in verb_positions(words) {
        let mut index = start + 1;
        if matches!(words.get(index), Some(&"between") | Some(&"from")) {
            index += 1;
        }
        let Some(first) = words.get(index) else {
            continue;
        };

        let bounds = match first.split_once('-') {
            Some((from, to)) if !from.is_empty() && !to.is_empty() => Some((from, to)),
            _ => match (words.get(index + 1), words.get(index + 2)) {
                (Some(&"-" | &"to" | &"and"), Some(to)) => Some((*first, *to)),
                _ => None,
            },
        };
        let Some((from, to)) = bounds else {
            continue;
        };

        if let (Some(from), Some(to)) = (timestamp_word(from), timestamp_word(to)) {
            return Some(Operation::new(from, to, Effect::Cut));
        }
    }
    None
}

fn match_add_text(command: &str, lower: &str) -> Option<Operation> {
    const PREFIX: &str = "add text ";

    let mut offset = 0;
    while let Some(found) = lower[offset..].find(PREFIX) {
        let open = offset + found + PREFIX.len();
        offset = open;

        let rest = &command[open..];
        let Some(quote) = rest.chars().next().filter(|c| *c == '\'' || *c == '"') else {
            continue;
        };
        let body = &rest[quote.len_utf8()..];
        // Apostrophes inside the text are skipped: the closing quote is the
        // first one followed by `at`/`@` and a timestamp.
        let closes = body
            .char_indices()
            .skip(1)
            .filter(|(_, c)| *c == '\'' || *c == '"')
            .map(|(position, _)| position);
        for close in closes {
            let mut tail = body[close + 1..].split_whitespace();
            if !tail
                .next()
                .is_some_and(|word| word == "@" || word.eq_ignore_ascii_case("at"))
            {
                continue;
            }
            let Some(at) = tail.next().and_then(timestamp_word) else {
                continue;
            };

            return Some(
                Operation::new(at, at + TEXT_OVERLAY_SECONDS, Effect::TextOverlay)
                    .with_param("text", &body[..close]),
            );
        }
    }
    None
}

fn verb_positions<'a>(words: &'a [&str]) -> impl Iterator<Item = usize> + 'a {
    words
        .iter()
        .enumerate()
        .filter(|(_, word)| matches!(**word, "cut" | "trim"))
        .map(|(index, _)| index)
}

/// Parses a timestamp word, ignoring trailing sentence punctuation.
fn timestamp_word(word: &str) -> Option<f64> {
    parse_timestamp(word.trim_end_matches(['.', ',', ';', '!', '?'])).ok()
}

/// Parses `N seconds`, `N second`, `Nseconds` or `Ns` at the start of `words`.
fn seconds_phrase(words: &[&str]) -> Option<f64> {
    let first = *words.first()?;
    let split = first
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(first.len());
    let (number, unit) = first.split_at(split);
    let seconds = parse_decimal(number)?;

    let unit = if unit.is_empty() {
        *words.get(1)?
    } else {
        unit
    };
    let unit = unit.trim_end_matches(|c: char| c.is_ascii_punctuation());
    matches!(unit, "s" | "sec" | "secs" | "second" | "seconds").then_some(seconds)
}

fn parse_decimal(number: &str) -> Option<f64> {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit());
    if !digits(whole) || fraction.is_some_and(|fraction| !digits(fraction)) {
        return None;
    }
    number.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{
        CommandInterpreter, InterpretContext, KeywordInterpreter, QuickCommandInterpreter,
        TEXT_OVERLAY_SECONDS, match_quick, parse_command_result,
    };
    use crate::error::EngineError;
    use crate::operation::{Effect, Operation};

    fn keyword(command: &str) -> Vec<Operation> {
        KeywordInterpreter
            .interpret(command, &InterpretContext::default())
            .expect("keyword rules never fail")
    }

    fn ranges(operations: &[Operation]) -> Vec<(f64, f64)> {
        operations
            .iter()
            .map(|operation| (operation.start_sec, operation.end_sec))
            .collect()
    }

    #[test]
    fn cut_keyword_yields_two_fixed_cuts() {
        let operations = keyword("please cut the boring part");
        assert_eq!(operations.len(), 2);
        assert!(operations.iter().all(|op| op.effect == Effect::Cut));
        assert_eq!(ranges(&operations), vec![(5.0, 15.0), (30.0, 45.0)]);
    }

    #[test]
    fn remove_keyword_is_a_cut() {
        let operations = keyword("Remove the silence");
        assert!(operations.iter().all(|op| op.effect == Effect::Cut));
    }

    #[test]
    fn fade_keyword_yields_fade_in_and_out() {
        let operations = keyword("fade it nicely");
        assert_eq!(ranges(&operations), vec![(10.0, 15.0), (25.0, 30.0)]);
        assert_eq!(operations[0].params["type"], "in");
        assert_eq!(operations[1].params["type"], "out");
    }

    #[test]
    fn caption_keyword_spans_first_minute() {
        let operations = keyword("add captions");
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].effect, Effect::Caption);
        assert_eq!(ranges(&operations), vec![(0.0, 60.0)]);

        assert_eq!(keyword("SUBTITLE this")[0].effect, Effect::Caption);
    }

    #[test]
    fn color_keyword_yields_color_grade() {
        let operations = keyword("make the colour grade warmer");
        assert_eq!(operations[0].effect, Effect::ColorGrade);
        assert_eq!(ranges(&operations), vec![(0.0, 120.0)]);
        assert_eq!(operations[0].params["style"], "cinematic");
    }

    #[test]
    fn precedence_prefers_cut_over_fade() {
        let operations = keyword("cut and fade");
        assert!(operations.iter().all(|op| op.effect == Effect::Cut));
    }

    #[test]
    fn unmatched_text_falls_back_to_zoom() {
        let operations = keyword("make it pop");
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].effect, Effect::Zoom);
        assert_eq!(ranges(&operations), vec![(0.0, 10.0)]);
        assert_eq!(operations[0].params["scale"], 1.2);
    }

    #[test]
    fn quick_cut_first_and_last_seconds() {
        let first = match_quick("cut the first 5 seconds", 0.0).expect("first matches");
        assert_eq!((first.start_sec, first.end_sec), (0.0, 5.0));

        let trimmed = match_quick("Trim out the first 10 seconds", 0.0).expect("trim matches");
        assert_eq!((trimmed.start_sec, trimmed.end_sec), (0.0, 10.0));

        let last = match_quick("cut the last 3 seconds", 10.0).expect("last matches");
        assert_eq!((last.start_sec, last.end_sec), (7.0, 10.0));
        assert_eq!(last.effect, Effect::Cut);
    }

    #[test]
    fn quick_cut_last_needs_known_duration() {
        assert!(match_quick("cut the last 3 seconds", 0.0).is_none());
    }

    #[test]
    fn quick_cut_range_accepts_several_separators() {
        for command in [
            "cut between 1:30 and 2:00",
            "cut from 1:30 to 2:00",
            "trim 1:30-2:00",
            "cut 1:30 - 2:00",
        ] {
            let operation = match_quick(command, 0.0).expect("range matches");
            assert_eq!(
                (operation.start_sec, operation.end_sec),
                (90.0, 120.0),
                "{command}"
            );
        }
    }

    #[test]
    fn quick_add_text_places_overlay_with_original_case() {
        let operation = match_quick("add text 'Hello' at 0:30", 0.0).expect("text matches");
        assert_eq!(operation.effect, Effect::TextOverlay);
        assert_eq!(operation.start_sec, 30.0);
        assert_eq!(operation.end_sec, 30.0 + TEXT_OVERLAY_SECONDS);
        assert_eq!(operation.params["text"], "Hello");

        let at_sign = match_quick("Add Text \"World Tour\" @ 1:45", 0.0).expect("@ matches");
        assert_eq!(at_sign.start_sec, 105.0);
        assert_eq!(at_sign.params["text"], "World Tour");
    }

    #[test]
    fn quick_add_text_keeps_apostrophes_inside_the_text() {
        let single = match_quick("add text 'Don't stop' at 0:05", 0.0).expect("text matches");
        assert_eq!(single.params["text"], "Don't stop");
        assert_eq!(single.start_sec, 5.0);

        let double = match_quick("add text \"it's here\" at 5", 0.0).expect("text matches");
        assert_eq!(double.params["text"], "it's here");
        assert_eq!(double.start_sec, 5.0);
    }

    #[test]
    fn quick_cut_range_ignores_sentence_punctuation() {
        for command in ["cut from 1:30 to 2:00.", "trim 1:30-2:00!", "cut between 1:30, and 2:00"] {
            let operation = match_quick(command, 0.0).expect("range matches");
            assert_eq!(
                (operation.start_sec, operation.end_sec),
                (90.0, 120.0),
                "{command}"
            );
        }
    }

    #[test]
    fn quick_patterns_ignore_vague_text() {
        assert!(match_quick("random text", 0.0).is_none());
        assert!(match_quick("cut the video", 0.0).is_none());
        assert!(match_quick("add text without timestamp", 0.0).is_none());
    }

    #[test]
    fn quick_interpreter_delegates_unmatched_text() {
        let interpreter = QuickCommandInterpreter::new(KeywordInterpreter);
        let context = InterpretContext { duration: 60.0 };

        let quick = interpreter
            .interpret("cut the first 2 seconds", &context)
            .expect("quick command");
        assert_eq!(ranges(&quick), vec![(0.0, 2.0)]);

        let fallback = interpreter
            .interpret("please cut the boring part", &context)
            .expect("keyword fallback");
        assert_eq!(ranges(&fallback), vec![(5.0, 15.0), (30.0, 45.0)]);
    }

    #[test]
    fn quick_interpreter_rejects_reversed_range() {
        let interpreter = QuickCommandInterpreter::new(KeywordInterpreter);
        let result = interpreter.interpret("cut from 2:00 to 1:30", &InterpretContext::default());
        assert!(matches!(result, Err(EngineError::InvalidRange { .. })));
    }

    #[test]
    fn command_result_decodes_operations() {
        let operations = parse_command_result(
            r#"{"operations": [
                {"start_sec": 10, "end_sec": 15, "effect": "fade", "params": {"type": "in"}},
                {"start_sec": 0, "end_sec": 3, "effect": "textOverlay"}
            ]}"#,
        )
        .expect("valid body");
        assert_eq!(operations.len(), 2);
        assert_eq!(operations[0].params["type"], "in");
        assert_eq!(operations[1].effect, Effect::TextOverlay);
    }

    #[test]
    fn malformed_command_result_is_interpreter_failure() {
        let result = parse_command_result("{\"operations\": 3}");
        assert!(matches!(result, Err(EngineError::InterpreterFailure { .. })));

        let reversed =
            parse_command_result(r#"{"operations": [{"start_sec": 9, "end_sec": 1, "effect": "cut"}]}"#);
        assert!(matches!(reversed, Err(EngineError::InvalidRange { .. })));
    }
}
