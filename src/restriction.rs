// Syntax restrictions
//
// Every terminal of a syntax tree lists class restrictions for its
// parameters. A single parameter failing one aborts the command; members of a
// multiple position are dropped one by one. Parameters without a restriction
// must still be objects.

use crate::error::CommandError;
use crate::interpret::Context;
use crate::multiple::parameter_vector;
use crate::output::MessageKind;
use crate::parameter::ParameterPosition;
use crate::runtime::Runtime;
use crate::story::{InstanceId, Restriction, RestrictionClass, WordCode};
use log::{info, warn};

pub fn satisfies(rt: &Runtime, restriction: &Restriction, instance: InstanceId) -> bool {
    let predefined = &rt.story.predefined;
    match restriction.class {
        RestrictionClass::Class(class) => rt.world.is_a(instance, class),
        RestrictionClass::Container => rt.world.is_container(instance),
        RestrictionClass::Integer => rt.world.is_a(instance, predefined.integer),
        RestrictionClass::String => rt.world.is_a(instance, predefined.string),
    }
}

fn trace_restriction(rt: &Runtime, restriction: &Restriction) {
    if rt.trace.sections {
        let class = match restriction.class {
            RestrictionClass::Class(class) => rt.story.class_name(class).to_string(),
            other => format!("{:?}", other),
        };
        info!(
            target: "alanrun::trace",
            "<SYNTAX parameter #{} Is Not of class {}:>",
            restriction.parameter,
            class
        );
    }
}

/// Run the restriction's own statements. Without any, say the generic "can't".
fn run_restriction(rt: &mut Runtime, restriction: &Restriction, context: &Context) {
    trace_restriction(rt, restriction);
    match restriction.statements {
        Some(statements) => {
            if let Err(failure) = rt.execute(statements, context) {
                warn!("Restriction for parameter #{}: {}", restriction.parameter, failure);
            }
        }
        None => rt.output.message(MessageKind::Cant0, &[]),
    }
}

fn check_restricted(
    rt: &mut Runtime,
    verb: WordCode,
    restrictions: &[Restriction],
    positions: &mut [ParameterPosition],
) -> Result<(), CommandError> {
    let mut context = Context {
        verb,
        parameters: parameter_vector(positions),
        instance: 0,
    };

    for restriction in restrictions {
        let Some(index) = restriction.parameter.checked_sub(1).filter(|i| *i < positions.len()) else {
            warn!("Restriction for missing parameter #{}", restriction.parameter);
            continue;
        };

        if positions[index].explicit_multiple {
            let all = positions[index].all;
            for p in 0..positions[index].parameters.len() {
                let instance = positions[index].parameters[p].instance;
                if instance == 0 || satisfies(rt, restriction, instance) {
                    continue;
                }
                // ALL is expected to sweep up things that don't fit
                if !all {
                    context.parameters[index] = instance;
                    let marker = rt.message_parameter(instance);
                    rt.output.marker(&marker);
                    run_restriction(rt, restriction, &context);
                    rt.output.paragraph();
                }
                positions[index].parameters[p].instance = 0;
            }
            context.parameters[index] = 0;
        } else {
            let instance = positions[index].parameters.first().map(|p| p.instance).unwrap_or(0);
            if !satisfies(rt, restriction, instance) {
                return match restriction.statements {
                    Some(_) => {
                        run_restriction(rt, restriction, &context);
                        Err(CommandError::Restricted {
                            parameter: restriction.parameter,
                            handled: true,
                        })
                    }
                    None => {
                        trace_restriction(rt, restriction);
                        Err(CommandError::Restricted {
                            parameter: restriction.parameter,
                            handled: false,
                        })
                    }
                };
            }
        }
        positions[index].checked = true;
    }
    Ok(())
}

fn is_object(rt: &Runtime, instance: InstanceId) -> bool {
    rt.world.is_instance(instance) && rt.world.is_a(instance, rt.story.predefined.object)
}

fn check_unrestricted(rt: &Runtime, positions: &mut [ParameterPosition]) -> Result<(), CommandError> {
    for (index, position) in positions.iter_mut().enumerate() {
        if position.checked {
            continue;
        }
        if position.explicit_multiple {
            for parameter in position.parameters.iter_mut() {
                if parameter.instance != 0 && !is_object(rt, parameter.instance) {
                    parameter.instance = 0;
                }
            }
        } else {
            let instance = position.parameters.first().map(|p| p.instance).unwrap_or(0);
            if !is_object(rt, instance) {
                return Err(CommandError::NotAnObject(index + 1));
            }
        }
    }
    Ok(())
}

/// Apply the restrictions of the matched syntax and drop emptied slots
pub fn restrict_parameters(
    rt: &mut Runtime,
    verb: WordCode,
    restrictions: &[Restriction],
    positions: &mut [ParameterPosition],
) -> Result<(), CommandError> {
    for position in positions.iter_mut() {
        position.checked = false;
    }
    check_restricted(rt, verb, restrictions, positions)?;
    check_unrestricted(rt, positions)?;
    for position in positions.iter_mut() {
        position.compress();
    }
    Ok(())
}
