// Candidate resolution
// Turns the word spans collected by the matcher into candidate instances and
// settles every single reference through the disambiguator.

use crate::disambiguate::{disambiguate, Resolution};
use crate::error::CommandError;
use crate::memory::Memory;
use crate::output::MessageParameter;
use crate::parameter::{Parameter, ParameterKind, ParameterPosition};
use crate::runtime::Runtime;
use crate::story::InstanceId;
use crate::words::{PlayerWord, Words};
use log::trace;

/// Instances named by an adjective/noun phrase. The first word seeds the
/// set, every following word can only narrow it.
pub fn noun_phrase_candidates(words: &Words, first: usize, last: usize) -> Vec<InstanceId> {
    let dictionary = words.dictionary();
    let mut result: Option<Vec<InstanceId>> = None;

    for index in first..=last {
        let Some(entry) = words.entry(index).and_then(|e| dictionary.entry(e)) else {
            continue;
        };
        let references = if index == last {
            &entry.noun_refs
        } else {
            &entry.adjective_refs
        };
        result = Some(match result {
            None => references.clone(),
            Some(mut running) => {
                running.retain(|i| references.contains(i));
                running
            }
        });
    }
    result.unwrap_or_default()
}

fn pronoun_candidates(words: &Words, memory: &Memory, parameter: &Parameter) -> Result<Vec<InstanceId>, CommandError> {
    let code = words.code(parameter.first_word).unwrap_or(0);
    let instances = memory.pronoun_instances(code);
    match instances.len() {
        0 => Err(CommandError::WhatWord(words.text(parameter.first_word))),
        1 => Ok(instances),
        _ => Err(CommandError::WhichPronoun {
            pronoun: words.text(parameter.first_word),
            candidates: instances,
        }),
    }
}

/// Fill in the candidates of every reference in `parameters`
pub fn find_candidates(words: &Words, memory: &Memory, parameters: &mut [Parameter]) -> Result<(), CommandError> {
    for parameter in parameters.iter_mut() {
        parameter.candidates = match &parameter.kind {
            ParameterKind::Literal(_) => match words.get(parameter.first_word) {
                Some(PlayerWord::Literal { instance, .. }) => vec![*instance],
                _ => Vec::new(),
            },
            ParameterKind::Pronoun => pronoun_candidates(words, memory, parameter)?,
            ParameterKind::Plain => noun_phrase_candidates(words, parameter.first_word, parameter.last_word),
            // THEM positions are expanded from memory before this
            ParameterKind::Them => Vec::new(),
        };
        trace!(
            "Candidates for '{}': {:?}",
            parameter.words(words),
            parameter.candidates
        );
    }
    Ok(())
}

/// Everything located here, the raw material of ALL
fn all_here(rt: &Runtime, word: usize) -> Vec<Parameter> {
    (1..=rt.world.instance_max())
        .filter(|i| rt.world.is_here(*i))
        .map(|i| Parameter::resolved(i, word))
        .collect()
}

/// The previous command's multiple targets that can still be reached
fn previous_multiple(rt: &Runtime, memory: &Memory, word: usize) -> Vec<Parameter> {
    memory
        .previous_multiple()
        .iter()
        .filter(|i| rt.world.reachable(**i))
        .map(|i| Parameter::resolved(*i, word))
        .collect()
}

/// Expand THEM and ALL and find candidates for the explicit references of a position
pub fn find_position_candidates(
    rt: &Runtime,
    words: &Words,
    memory: &Memory,
    position: &mut ParameterPosition,
) -> Result<(), CommandError> {
    let Some(first) = position.parameters.first() else {
        return Ok(());
    };
    let word = first.first_word;

    if first.kind == ParameterKind::Them {
        position.them = true;
        position.parameters = previous_multiple(rt, memory, word);
        if position.parameters.is_empty() {
            return Err(CommandError::WhatWord(words.text(word)));
        }
        if position.parameters.len() > 1 {
            position.explicit_multiple = true;
            if !position.flags.multiple {
                return Err(CommandError::MultipleNotAllowed);
            }
        }
    } else if position.all {
        position.parameters = all_here(rt, word);
        if position.parameters.is_empty() {
            return Err(CommandError::NoSuch(words.text(word)));
        }
        find_candidates(words, memory, &mut position.exceptions)?;
    } else {
        find_candidates(words, memory, &mut position.parameters)?;
    }
    Ok(())
}

/// Settle one reference, or abort the command with the reason it can't be settled
pub fn settle(rt: &Runtime, words: &Words, parameter: &mut Parameter, omnipotent: bool) -> Result<(), CommandError> {
    match disambiguate(&*rt.world, &parameter.candidates, omnipotent) {
        Resolution::Resolved(instance) => {
            parameter.instance = instance;
            Ok(())
        }
        Resolution::NoSuch => Err(CommandError::NoSuch(parameter.words(words))),
        Resolution::WhichOne(candidates) => Err(CommandError::WhichOne(
            candidates
                .into_iter()
                .map(|i| rt.message_parameter(i))
                .collect::<Vec<MessageParameter>>(),
        )),
    }
}

/// Resolve every explicit reference of the matched positions. ALL and THEM
/// expansions are already instances; only ALL's exceptions need settling.
pub fn resolve_positions(
    rt: &Runtime,
    words: &Words,
    memory: &Memory,
    positions: &mut [ParameterPosition],
) -> Result<(), CommandError> {
    for position in positions.iter_mut() {
        find_position_candidates(rt, words, memory, position)?;
    }

    for position in positions.iter_mut() {
        let omnipotent = position.flags.omnipotent;
        if !position.all && !position.them {
            for parameter in position.parameters.iter_mut() {
                settle(rt, words, parameter, omnipotent)?;
            }
        }
        if position.all {
            for exception in position.exceptions.iter_mut() {
                settle(rt, words, exception, omnipotent)?;
            }
        }
    }
    Ok(())
}
