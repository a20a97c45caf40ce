// Movement
// A command starting with a direction word moves the hero through an exit of
// the current location.

use crate::dispatch::checks_pass;
use crate::error::CommandError;
use crate::interpret::Context;
use crate::runtime::Runtime;
use crate::story::{InstanceId, WordCode};
use log::{debug, info, warn};

fn trace_exit(rt: &Runtime, direction: WordCode, location: InstanceId, what: &str) {
    if rt.trace.sections {
        info!(
            target: "alanrun::trace",
            "<EXIT {} from {}({}), {}:>",
            direction,
            rt.story.instance_name(location),
            location,
            what
        );
    }
}

pub fn go(rt: &mut Runtime, direction: WordCode) -> Result<(), CommandError> {
    let story = rt.story;
    let location = rt.world.current_location();
    let exit = story
        .instance(location)
        .and_then(|i| i.exits.iter().find(|e| e.direction == direction))
        .ok_or(CommandError::NoWay)?;

    let context = Context {
        verb: 0,
        parameters: Vec::new(),
        instance: location,
    };
    if !exit.checks.is_empty() {
        trace_exit(rt, direction, location, "Checking");
        match checks_pass(rt, &exit.checks, &context, true) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(failure) => {
                warn!("Exit check from {}: {}", story.instance_name(location), failure);
                return Ok(());
            }
        }
    }

    if let Some(action) = exit.action {
        trace_exit(rt, direction, location, "Executing");
        if let Err(failure) = rt.execute(action, &context) {
            debug!("Exit action from {}: {}", story.instance_name(location), failure);
        }
    }

    let hero = rt.world.hero();
    if rt.world.location_of(hero) == location {
        trace_exit(rt, direction, location, "Moving");
        rt.world.locate(hero, exit.target);
    }
    Ok(())
}
