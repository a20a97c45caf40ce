// Multiple-object resolution
//
// ALL is cut down to what the verb could actually be applied to, by asking
// the dispatcher whether each instance would pass. Exceptions are removed
// afterwards. Explicit lists ("the lamp and the key") only lose slots that
// were emptied earlier.

use crate::dispatch::possible;
use crate::error::CommandError;
use crate::parameter::ParameterPosition;
use crate::runtime::Runtime;
use crate::story::{InstanceId, WordCode};
use crate::words::Words;
use log::{debug, trace};

/// Parameter vector with the first instance of every position and 0 in
/// explicit multiple positions
pub fn parameter_vector(positions: &[ParameterPosition]) -> Vec<InstanceId> {
    positions
        .iter()
        .map(|p| {
            if p.explicit_multiple {
                0
            } else {
                p.parameters.first().map(|p| p.instance).unwrap_or(0)
            }
        })
        .collect()
}

/// The single position carrying multiple instances, if any
pub fn multiple_position(positions: &[ParameterPosition]) -> Result<Option<usize>, CommandError> {
    let mut multiple = positions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.explicit_multiple)
        .map(|(i, _)| i);
    let first = multiple.next();
    if multiple.next().is_some() {
        return Err(CommandError::MultipleNotAllowed);
    }
    Ok(first)
}

/// Keep the ALL members the verb could be applied to
fn feasible(rt: &mut Runtime, verb: WordCode, positions: &[ParameterPosition], index: usize) -> Vec<InstanceId> {
    let mut parameters = parameter_vector(positions);
    let mut kept = Vec::new();
    for instance in positions[index].instances() {
        parameters[index] = instance;
        if rt.world.reachable(instance) && possible(rt, verb, &parameters) {
            kept.push(instance);
        } else {
            trace!("ALL: dropping {} for verb {}", rt.story.instance_name(instance), verb);
        }
    }
    kept
}

/// Settle the multiple position. Returns its index, if there is one.
pub fn resolve_multiple(
    rt: &mut Runtime,
    words: &Words,
    verb: WordCode,
    positions: &mut [ParameterPosition],
) -> Result<Option<usize>, CommandError> {
    let Some(index) = multiple_position(positions)? else {
        return Ok(None);
    };

    if positions[index].all {
        let all_word = positions[index]
            .parameters
            .first()
            .map(|p| p.first_word)
            .unwrap_or(0);
        let kept = feasible(rt, verb, positions, index);
        let position = &mut positions[index];
        position.parameters.retain(|p| kept.contains(&p.instance));
        if position.parameters.is_empty() {
            return Err(CommandError::NoSuch(words.text(all_word)));
        }

        let exceptions: Vec<InstanceId> = position.exceptions.iter().map(|e| e.instance).collect();
        position.parameters.retain(|p| !exceptions.contains(&p.instance));
        if position.parameters.is_empty() {
            return Err(CommandError::NotMuch);
        }
    } else {
        let position = &mut positions[index];
        position.compress();
        if position.parameters.is_empty() {
            return Err(CommandError::NothingLeft);
        }
    }

    debug!("Multiple position {}: {}", index + 1, positions[index]);
    Ok(Some(index))
}
