// World model
// The queries the command pipeline makes about instances, and a state
// implementation initialised from the story's instance table.

use crate::story::{ClassId, InstanceId, Story};
use crate::words::Literal;
use indexmap::IndexMap;
use log::{debug, warn};

/// Interface the pipeline needs into the world state. Separated out so it can
/// be replaced by the embedding runtime or mocked in tests.
pub trait World {
    /// Highest ordinary instance code; literals are numbered after it
    fn instance_max(&self) -> InstanceId;

    /// A concrete instance of the story or a live literal
    fn is_instance(&self, instance: InstanceId) -> bool;

    fn hero(&self) -> InstanceId;

    /// Where the hero is
    fn current_location(&self) -> InstanceId;

    fn location_of(&self, instance: InstanceId) -> InstanceId;

    fn locate(&mut self, instance: InstanceId, destination: InstanceId);

    /// Does `instance` inherit from `class` (or is a literal of it)?
    fn is_a(&self, instance: InstanceId, class: ClassId) -> bool;

    fn is_container(&self, instance: InstanceId) -> bool;

    fn attribute(&self, instance: InstanceId, attribute: u32) -> i64;

    /// Located, directly or through containers, in the current location
    fn is_here(&self, instance: InstanceId) -> bool;

    /// Perceivable by the hero: here and not shut away in an opaque container
    fn reachable(&self, instance: InstanceId) -> bool;

    fn literal(&self, instance: InstanceId) -> Option<&Literal>;

    fn create_literal(&mut self, literal: Literal) -> InstanceId;

    fn clear_literals(&mut self);
}

/// World state for a story: locations and attribute values of every instance
pub struct GameState<'s> {
    story: &'s Story,
    locations: Vec<InstanceId>,
    attributes: Vec<IndexMap<u32, i64>>,
    literals: Vec<Literal>,
}

impl<'s> GameState<'s> {
    pub fn new(story: &'s Story) -> Self {
        GameState {
            story,
            locations: story.instances.iter().map(|i| i.location).collect(),
            attributes: story.instances.iter().map(|i| i.attributes.clone()).collect(),
            literals: Vec::new(),
        }
    }

    pub fn story(&self) -> &'s Story {
        self.story
    }

    pub fn set_attribute(&mut self, instance: InstanceId, attribute: u32, value: i64) {
        match instance.checked_sub(1).and_then(|i| self.attributes.get_mut(i)) {
            Some(attributes) => {
                attributes.insert(attribute, value);
            }
            None => warn!("Setting attribute {} of unknown instance {}", attribute, instance),
        }
    }

    fn literal_class(&self, instance: InstanceId) -> Option<ClassId> {
        self.literal(instance).map(|literal| match literal {
            Literal::Integer(_) => self.story.predefined.integer,
            Literal::String(_) => self.story.predefined.string,
        })
    }

    fn parent_class(&self, instance: InstanceId) -> ClassId {
        self.literal_class(instance)
            .or_else(|| self.story.instance(instance).map(|i| i.parent))
            .unwrap_or(0)
    }

    /// Is some container around `instance` opaque?
    fn in_opaque_container(&self, instance: InstanceId) -> bool {
        let mut container = self.location_of(instance);
        let mut steps = 0;
        while self.is_container(container) && steps <= self.locations.len() {
            if self.attribute(container, self.story.opaque_attribute) != 0 {
                return true;
            }
            container = self.location_of(container);
            steps += 1;
        }
        false
    }
}

impl<'s> World for GameState<'s> {
    fn instance_max(&self) -> InstanceId {
        self.locations.len()
    }

    fn is_instance(&self, instance: InstanceId) -> bool {
        instance != 0 && instance <= self.locations.len() + self.literals.len()
    }

    fn hero(&self) -> InstanceId {
        self.story.hero
    }

    fn current_location(&self) -> InstanceId {
        self.location_of(self.story.hero)
    }

    fn location_of(&self, instance: InstanceId) -> InstanceId {
        instance
            .checked_sub(1)
            .and_then(|i| self.locations.get(i))
            .copied()
            .unwrap_or(0)
    }

    fn locate(&mut self, instance: InstanceId, destination: InstanceId) {
        debug!(
            "Locating {} at {}",
            self.story.instance_name(instance),
            self.story.instance_name(destination)
        );
        match instance.checked_sub(1).and_then(|i| self.locations.get_mut(i)) {
            Some(location) => *location = destination,
            None => warn!("Cannot locate unknown instance {}", instance),
        }
    }

    fn is_a(&self, instance: InstanceId, class: ClassId) -> bool {
        if class == 0 {
            return false;
        }
        self.story.class_chain(self.parent_class(instance)).contains(&class)
    }

    fn is_container(&self, instance: InstanceId) -> bool {
        self.story
            .instance(instance)
            .map(|i| i.container != 0)
            .unwrap_or(false)
    }

    fn attribute(&self, instance: InstanceId, attribute: u32) -> i64 {
        instance
            .checked_sub(1)
            .and_then(|i| self.attributes.get(i))
            .and_then(|a| a.get(&attribute))
            .copied()
            .unwrap_or(0)
    }

    fn is_here(&self, instance: InstanceId) -> bool {
        let here = self.current_location();
        let mut location = self.location_of(instance);
        let mut steps = 0;
        while location != 0 && steps <= self.locations.len() {
            if location == here {
                return true;
            }
            location = self.location_of(location);
            steps += 1;
        }
        false
    }

    fn reachable(&self, instance: InstanceId) -> bool {
        let predefined = &self.story.predefined;
        if self.is_a(instance, predefined.thing) || self.is_a(instance, predefined.location) {
            self.is_here(instance) && !self.in_opaque_container(instance)
        } else {
            true
        }
    }

    fn literal(&self, instance: InstanceId) -> Option<&Literal> {
        instance
            .checked_sub(self.locations.len() + 1)
            .and_then(|i| self.literals.get(i))
    }

    fn create_literal(&mut self, literal: Literal) -> InstanceId {
        self.literals.push(literal);
        self.locations.len() + self.literals.len()
    }

    fn clear_literals(&mut self) {
        self.literals.clear();
    }
}
