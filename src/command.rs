// Command loop
//
// One player line can hold several commands joined by conjunctions. Each is
// parsed, resolved and dispatched before the next is looked at; an error
// ends the whole line.

use crate::dictionary::WordClasses;
use crate::dispatch::{action, Dispatch};
use crate::error::CommandError;
use crate::exits::go;
use crate::memory::Memory;
use crate::multiple::{parameter_vector, resolve_multiple};
use crate::parameter::ParameterPosition;
use crate::resolve::resolve_positions;
use crate::restriction::restrict_parameters;
use crate::runtime::Runtime;
use crate::scan::scan;
use crate::story::InstanceId;
use crate::syntax::match_syntax;
use crate::words::{PlayerWord, Words};
use log::{debug, info};

/// State carried from one command to the next
#[derive(Debug, Default)]
pub struct Session {
    pub memory: Memory,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }
}

/// A command after parsing and resolution, ready to dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub verb: u32,
    /// One instance per parameter, 0 in the multiple position
    pub parameters: Vec<InstanceId>,
    /// Index of the multiple position and its targets
    pub multiple: Option<(usize, Vec<InstanceId>)>,
}

/// Parse and resolve the verb command starting at `cursor`. On return the
/// cursor is past the command and its trailing conjunction, if any.
pub fn parse_command(
    rt: &mut Runtime,
    memory: &Memory,
    words: Words,
    cursor: &mut usize,
) -> Result<ParsedCommand, CommandError> {
    let verb_word = words.code(*cursor).ok_or(CommandError::NotUnderstood)?;
    *cursor += 1;

    let story = rt.story;
    let matched = match_syntax(story, words, cursor, verb_word, memory)?;
    let mut positions = matched.positions;
    trace_parse(rt, "matched", &positions);

    resolve_positions(rt, &words, memory, &mut positions)?;
    trace_parse(rt, "resolved", &positions);

    let multiple = resolve_multiple(rt, &words, matched.verb, &mut positions)?;
    restrict_parameters(rt, matched.verb, matched.restrictions, &mut positions)?;
    trace_parse(rt, "restricted", &positions);

    let multiple = match multiple {
        Some(index) => {
            let targets = positions[index].instances();
            if targets.is_empty() {
                return Err(CommandError::NothingLeft);
            }
            Some((index, targets))
        }
        None => None,
    };

    if !words.is_end(*cursor) {
        if words.is(*cursor, WordClasses::CONJUNCTION) {
            *cursor += 1;
        } else {
            return Err(CommandError::NotUnderstood);
        }
    }

    Ok(ParsedCommand {
        verb: matched.verb,
        parameters: parameter_vector(&positions),
        multiple,
    })
}

fn trace_parse(rt: &Runtime, stage: &str, positions: &[ParameterPosition]) {
    if rt.trace.parsing {
        for (i, position) in positions.iter().enumerate() {
            info!(target: "alanrun::trace", "<PARSE {} #{}: {}>", stage, i + 1, position);
        }
    }
}

/// Run the command starting at `cursor`
pub fn run_command(
    rt: &mut Runtime,
    session: &mut Session,
    words: Words,
    cursor: &mut usize,
) -> Result<Option<Dispatch>, CommandError> {
    if words.is(*cursor, WordClasses::VERB) {
        let command = parse_command(rt, &session.memory, words, cursor)?;
        let multiple = command.multiple.as_ref().map(|(_, t)| t.as_slice()).unwrap_or(&[]);
        session
            .memory
            .remember(words.dictionary(), &command.parameters, multiple);
        debug!("Dispatching {:?}", command);
        let dispatched = action(
            rt,
            command.verb,
            &command.parameters,
            command.multiple.as_ref().map(|(i, t)| (*i, t.as_slice())),
        )?;
        return Ok(Some(dispatched));
    }

    session.memory.clear();
    if words.is(*cursor, WordClasses::DIRECTION) {
        let direction = words.code(*cursor).unwrap_or(0);
        *cursor += 1;
        if !words.is_end_of_command(*cursor) {
            return Err(CommandError::NotUnderstood);
        }
        go(rt, direction)?;
        if !words.is_end(*cursor) {
            *cursor += 1;
        }
        return Ok(None);
    }
    Err(CommandError::NotUnderstood)
}

/// Run every command in a scanned line
pub fn run_words(rt: &mut Runtime, session: &mut Session, words: &[PlayerWord]) {
    let story = rt.story;
    let words = Words::new(words, &story.dictionary);
    let mut cursor = 0;
    while !words.is_end(cursor) {
        if cursor > 0 {
            rt.output.paragraph();
        }
        if let Err(error) = run_command(rt, session, words, &mut cursor) {
            debug!("Command aborted: {} ({:?})", error, error.kind());
            error.report(&mut *rt.output);
            return;
        }
    }
}

/// Scan and run one line of player input
pub fn interpret_line(rt: &mut Runtime, session: &mut Session, line: &str) {
    rt.world.clear_literals();
    let story = rt.story;
    match scan(line, &story.dictionary, &mut *rt.world) {
        Ok(words) => run_words(rt, session, &words),
        Err(error) => error.report(&mut *rt.output),
    }
}
