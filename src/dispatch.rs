// Verb dispatch
//
// Alternatives for a verb are collected from every scope in this order:
//
//   global verbs
//   the current location's classes, root class first, then the location
//   for each parameter: its classes, root class first, then the instance
//
// Each scope contributes at most one alternative. They run in three passes:
// BEFORE and ONLY from the innermost scope out (ONLY ends the command), then
// everything except AFTER from the outermost scope in, then what is left
// (AFTER) from the innermost scope out.

use crate::error::{CommandError, RuntimeFailure};
use crate::interpret::Context;
use crate::output::Output;
use crate::runtime::Runtime;
use crate::story::{AltEntry, CheckEntry, ClassId, InstanceId, Qualifier, Story, VerbEntry, WordCode};
use crate::world::World;
use log::{debug, info, warn};
use std::fmt;

/// Where an alternative was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Location,
    /// 1-based parameter number
    Parameter(usize),
}

#[derive(Debug, Clone)]
pub struct Alternative<'s> {
    pub entry: &'s AltEntry,
    pub scope: Scope,
    /// Instance the alternative runs on behalf of
    pub instance: InstanceId,
    /// Class the alternative was inherited from, 0 if declared on the instance
    pub class: ClassId,
    pub done: bool,
}

impl<'s> fmt::Display for Alternative<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.scope {
            Scope::Global => write!(f, "GLOBAL")?,
            Scope::Location => write!(f, "in LOCATION")?,
            Scope::Parameter(n) => write!(f, "in parameter #{}", n)?,
        }
        if self.class != 0 {
            write!(f, ", inherited from class {}", self.class)?;
        }
        Ok(())
    }
}

/// How a dispatched command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// All passes ran, or an ONLY alternative ended them
    Completed,
    /// A CHECK failed before anything executed
    CheckFailed,
    /// A body signalled failure and the remaining passes were skipped
    Failed,
}

/// The first alternative in `verbs` for `verb` that applies to `parameter`.
/// Alternatives declared for parameter 0 apply anywhere.
fn alternative_in<'s>(verbs: &'s [VerbEntry], verb: WordCode, parameter: Option<usize>) -> Option<&'s AltEntry> {
    verbs
        .iter()
        .find(|v| v.code == verb)?
        .alternatives
        .iter()
        .find(|a| a.parameter == 0 || Some(a.parameter) == parameter)
}

fn parent_class(story: &Story, world: &dyn World, instance: InstanceId) -> ClassId {
    if world.literal(instance).is_some() {
        if world.is_a(instance, story.predefined.integer) {
            return story.predefined.integer;
        }
        return story.predefined.string;
    }
    story.instance(instance).map(|i| i.parent).unwrap_or(0)
}

fn alternatives_in_scope<'s>(
    story: &'s Story,
    world: &dyn World,
    verb: WordCode,
    instance: InstanceId,
    scope: Scope,
    found: &mut Vec<Alternative<'s>>,
) {
    let parameter = match scope {
        Scope::Parameter(n) => Some(n),
        _ => None,
    };
    for class in story.class_chain(parent_class(story, world, instance)) {
        if let Some(entry) = story.class(class).and_then(|c| alternative_in(&c.verbs, verb, parameter)) {
            found.push(Alternative {
                entry,
                scope,
                instance,
                class,
                done: false,
            });
        }
    }
    if world.literal(instance).is_none() {
        if let Some(entry) = story.instance(instance).and_then(|i| alternative_in(&i.verbs, verb, parameter)) {
            found.push(Alternative {
                entry,
                scope,
                instance,
                class: 0,
                done: false,
            });
        }
    }
}

/// Every alternative for `verb`, outermost scope first
pub fn find_alternatives<'s>(
    story: &'s Story,
    world: &dyn World,
    verb: WordCode,
    parameters: &[InstanceId],
) -> Vec<Alternative<'s>> {
    let mut found = Vec::new();
    if let Some(entry) = alternative_in(&story.global_verbs, verb, None) {
        found.push(Alternative {
            entry,
            scope: Scope::Global,
            instance: 0,
            class: 0,
            done: false,
        });
    }
    alternatives_in_scope(story, world, verb, world.current_location(), Scope::Location, &mut found);
    for (i, instance) in parameters.iter().enumerate() {
        alternatives_in_scope(story, world, verb, *instance, Scope::Parameter(i + 1), &mut found);
    }
    found
}

/// Evaluate a list of CHECKs. When `execute` is set the failing check's
/// statements are run.
pub fn checks_pass(
    rt: &mut Runtime,
    checks: &[CheckEntry],
    context: &Context,
    execute: bool,
) -> Result<bool, RuntimeFailure> {
    for check in checks {
        let passed = match check.expression {
            Some(expression) => rt.evaluate(expression, context)?,
            None => false,
        };
        if !passed {
            if execute {
                if let Some(statements) = check.statements {
                    rt.execute(statements, context)?;
                }
            }
            return Ok(false);
        }
    }
    Ok(true)
}

fn checks_ok(rt: &mut Runtime, alternatives: &[Alternative], context: &mut Context, execute: bool) -> bool {
    for alternative in alternatives {
        if alternative.entry.checks.is_empty() {
            continue;
        }
        context.instance = alternative.instance;
        if execute && rt.trace.sections {
            info!(target: "alanrun::trace", "<VERB {}, {}, CHECK:>", context.verb, alternative);
        }
        match checks_pass(rt, &alternative.entry.checks, context, execute) {
            Ok(true) => {}
            Ok(false) => return false,
            Err(failure) => {
                if execute {
                    warn!("CHECK {}: {}", alternative, failure);
                }
                return false;
            }
        }
    }
    true
}

fn anything_to_execute(alternatives: &[Alternative]) -> bool {
    alternatives.iter().any(|a| a.entry.action.is_some())
}

/// Would some alternative execute for this verb and these parameters?
/// Nothing is executed and nothing is reported.
pub fn possible(rt: &mut Runtime, verb: WordCode, parameters: &[InstanceId]) -> bool {
    let story = rt.story;
    let alternatives = find_alternatives(story, &*rt.world, verb, parameters);
    let mut context = Context {
        verb,
        parameters: parameters.to_vec(),
        instance: 0,
    };
    checks_ok(rt, &alternatives, &mut context, false) && anything_to_execute(&alternatives)
}

/// Run one alternative unless it already ran. False if its body failed.
fn execute_ok(rt: &mut Runtime, alternative: &mut Alternative, context: &mut Context) -> bool {
    let mut ok = true;
    if !alternative.done {
        if let Some(action) = alternative.entry.action {
            if rt.trace.sections {
                let qualifier = match alternative.entry.qualifier {
                    Qualifier::Default => String::new(),
                    other => format!(" ({})", other),
                };
                info!(target: "alanrun::trace", "<VERB {}, {}, DOES{}:>", context.verb, alternative, qualifier);
            }
            context.instance = alternative.instance;
            if let Err(failure) = rt.execute(action, context) {
                debug!("VERB {} {}: {}", context.verb, alternative, failure);
                ok = false;
            }
        }
    }
    alternative.done = true;
    ok
}

/// Find and run the alternatives of a command with single parameters
pub fn execute_command(rt: &mut Runtime, verb: WordCode, parameters: &[InstanceId]) -> Result<Dispatch, CommandError> {
    let story = rt.story;
    let mut alternatives = find_alternatives(story, &*rt.world, verb, parameters);
    debug!(
        "Verb {} with parameters {:?}: {} alternative(s)",
        verb,
        parameters,
        alternatives.len()
    );
    let mut context = Context {
        verb,
        parameters: parameters.to_vec(),
        instance: 0,
    };

    if !checks_ok(rt, &alternatives, &mut context, true) {
        return Ok(Dispatch::CheckFailed);
    }
    if !anything_to_execute(&alternatives) {
        return Err(CommandError::Infeasible);
    }

    for alternative in alternatives.iter_mut().rev() {
        let qualifier = alternative.entry.qualifier;
        if qualifier == Qualifier::Before || qualifier == Qualifier::Only {
            if !execute_ok(rt, alternative, &mut context) {
                return Ok(Dispatch::Failed);
            }
            if qualifier == Qualifier::Only {
                return Ok(Dispatch::Completed);
            }
        }
    }

    for alternative in alternatives.iter_mut() {
        if alternative.entry.qualifier != Qualifier::After && !execute_ok(rt, alternative, &mut context) {
            return Ok(Dispatch::Failed);
        }
    }

    for alternative in alternatives.iter_mut().rev() {
        if !execute_ok(rt, alternative, &mut context) {
            return Ok(Dispatch::Failed);
        }
    }
    Ok(Dispatch::Completed)
}

/// Dispatch a command, once per target when its multiple position holds
/// more than one. A failing target is reported and the next one is tried.
pub fn action(
    rt: &mut Runtime,
    verb: WordCode,
    parameters: &[InstanceId],
    multiple: Option<(usize, &[InstanceId])>,
) -> Result<Dispatch, CommandError> {
    let mut parameters = parameters.to_vec();
    match multiple {
        Some((position, targets)) if targets.len() > 1 && position < parameters.len() => {
            let mut result = Dispatch::Completed;
            for (i, target) in targets.iter().enumerate() {
                parameters[position] = *target;
                let marker = rt.message_parameter(*target);
                rt.output.marker(&marker);
                match execute_command(rt, verb, &parameters) {
                    Ok(Dispatch::Completed) => {}
                    Ok(other) => result = other,
                    Err(error) => report(&mut *rt.output, &error),
                }
                if i + 1 < targets.len() {
                    rt.output.paragraph();
                }
            }
            Ok(result)
        }
        Some((position, targets)) => {
            if let (Some(slot), Some(target)) = (parameters.get_mut(position), targets.first()) {
                *slot = *target;
            }
            execute_command(rt, verb, &parameters)
        }
        None => execute_command(rt, verb, &parameters),
    }
}

fn report(output: &mut dyn Output, error: &CommandError) {
    debug!("Target aborted: {}", error);
    error.report(output);
}
