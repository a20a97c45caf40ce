// Cross-command memory
// Pronoun bindings and the previous command's multiple targets.

use crate::dictionary::Dictionary;
use crate::story::{InstanceId, WordCode};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PronounBinding {
    pub pronoun: WordCode,
    pub instance: InstanceId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Memory {
    pronouns: Vec<PronounBinding>,
    previous_multiple: Vec<InstanceId>,
}

impl Memory {
    pub fn pronouns(&self) -> &[PronounBinding] {
        &self.pronouns
    }

    /// Instances bound to this pronoun code by the previous command
    pub fn pronoun_instances(&self, pronoun: WordCode) -> Vec<InstanceId> {
        self.pronouns
            .iter()
            .filter(|b| b.instance != 0 && b.pronoun == pronoun)
            .map(|b| b.instance)
            .collect()
    }

    pub fn previous_multiple(&self) -> &[InstanceId] {
        &self.previous_multiple
    }

    pub fn has_previous_multiple(&self) -> bool {
        !self.previous_multiple.is_empty()
    }

    /// Replace both memories after a command was parsed and resolved.
    /// `parameters` holds 0 in a multiple slot, so multiple targets get no pronouns.
    pub fn remember(&mut self, dictionary: &Dictionary, parameters: &[InstanceId], multiple: &[InstanceId]) {
        if parameters.is_empty() {
            self.clear();
            return;
        }

        self.pronouns.clear();
        for instance in parameters.iter().copied().filter(|i| *i != 0) {
            if let Some(pronoun) = dictionary.pronoun_for_instance(instance) {
                let binding = PronounBinding { pronoun, instance };
                if !self.pronouns.contains(&binding) {
                    self.pronouns.push(binding);
                }
            }
        }
        self.previous_multiple = multiple.to_vec();
        debug!(
            "Remembering pronouns {:?}, multiple {:?}",
            self.pronouns, self.previous_multiple
        );
    }

    pub fn clear(&mut self) {
        self.pronouns.clear();
        self.previous_multiple.clear();
    }
}
