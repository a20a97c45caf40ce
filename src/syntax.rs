// Grammar matcher
//
// Walks the verb's syntax tree along the player words. Parameter slots only
// collect word spans here; instances are resolved once the whole command has
// matched, so later stages know the parameter order and the restrictions.

use crate::dictionary::WordClasses;
use crate::error::CommandError;
use crate::memory::Memory;
use crate::parameter::ParameterPosition;
use crate::reference::ReferenceParser;
use crate::story::{Element, ParameterFlags, Restriction, Story, WordCode};
use crate::words::Words;
use log::{debug, warn};

/// A matched syntax with its positions already in verb parameter order
#[derive(Debug, Clone)]
pub struct SyntaxMatch<'s> {
    pub syntax: u32,
    /// Verb code to dispatch
    pub verb: WordCode,
    pub restrictions: &'s [Restriction],
    pub positions: Vec<ParameterPosition>,
}

fn element_for_parameter(elements: &[Element]) -> Option<(ParameterFlags, usize)> {
    elements.iter().find_map(|e| match e {
        Element::Parameter { flags, next } => Some((*flags, *next)),
        _ => None,
    })
}

fn element_for_word(elements: &[Element], code: WordCode) -> Option<usize> {
    elements.iter().find_map(|e| match e {
        Element::Word { code: c, next } if *c == code => Some(*next),
        _ => None,
    })
}

fn element_for_end_of_syntax(elements: &[Element]) -> Option<(u32, &[Restriction])> {
    elements.iter().find_map(|e| match e {
        Element::EndOfSyntax {
            syntax,
            restrictions,
        } => Some((*syntax, restrictions.as_slice())),
        _ => None,
    })
}

/// Match the words after the verb word at `cursor`. On success `cursor` is
/// left at the end of input or at the conjunction that ended the command.
pub fn match_syntax<'s>(
    story: &'s Story,
    words: Words,
    cursor: &mut usize,
    verb_word: WordCode,
    memory: &Memory,
) -> Result<SyntaxMatch<'s>, CommandError> {
    let syntax = story
        .syntax_for_verb(verb_word)
        .ok_or(CommandError::NotUnderstood)?;

    let mut table = syntax.elements;
    let mut positions = Vec::new();
    loop {
        let elements = story.element_table(table);

        if words.is_end_of_command(*cursor) {
            let (syntax, restrictions) =
                element_for_end_of_syntax(elements).ok_or(CommandError::NotUnderstood)?;
            let verb = remap(story, syntax, verb_word, &mut positions);
            debug!(
                "Matched syntax {} for verb {} with {} parameter(s)",
                syntax,
                verb,
                positions.len()
            );
            return Ok(SyntaxMatch {
                syntax,
                verb,
                restrictions,
                positions,
            });
        }

        if words.is_instance_reference(*cursor) {
            if let Some((flags, next)) = element_for_parameter(elements) {
                let mut parser = ReferenceParser::new(words, memory, *cursor);
                positions.push(parser.parse_position(flags)?);
                *cursor = parser.cursor;
                table = next;
                continue;
            }
        }

        if words.is(*cursor, WordClasses::PREPOSITION) {
            if let Some(next) = words.code(*cursor).and_then(|code| element_for_word(elements, code)) {
                *cursor += 1;
                table = next;
                continue;
            }
        }

        if words.is(*cursor, WordClasses::EXCEPT) {
            let all = words.dictionary().all_word().unwrap_or("all").to_string();
            return Err(CommandError::ButAfterAll {
                except: words.text(*cursor),
                all,
            });
        }
        return Err(CommandError::NotUnderstood);
    }
}

/// Reorder the positions into verb parameter order and find the verb to dispatch
fn remap(story: &Story, syntax: u32, verb_word: WordCode, positions: &mut Vec<ParameterPosition>) -> WordCode {
    let Some(map) = story.parameter_map(syntax) else {
        warn!("No parameter map for syntax {}, keeping parameter order", syntax);
        return verb_word;
    };

    let saved = positions.clone();
    for (i, position) in positions.iter_mut().enumerate() {
        match map.mapping.get(i).and_then(|source| source.checked_sub(1)).and_then(|s| saved.get(s)) {
            Some(source) => *position = source.clone(),
            None => warn!("Parameter map for syntax {} has no entry for parameter {}", syntax, i + 1),
        }
    }
    map.verb
}
