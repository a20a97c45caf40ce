// Parameters and parameter positions of one player command

use crate::story::{InstanceId, ParameterFlags};
use crate::words::{Literal, Words};
use std::fmt;

/// How the player referred to a parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    /// Adjectives and a noun, or a member of an ALL/THEM expansion
    Plain,
    Literal(Literal),
    /// A pronoun word, bound through the pronoun memory
    Pronoun,
    /// THEM, standing for the previous command's multiple targets
    Them,
}

/// One reference, resolving or resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub kind: ParameterKind,
    /// First and last player word of the reference
    pub first_word: usize,
    pub last_word: usize,
    /// Resolved instance, 0 while unresolved
    pub instance: InstanceId,
    pub candidates: Vec<InstanceId>,
}

impl Parameter {
    pub fn new(kind: ParameterKind, first_word: usize, last_word: usize) -> Self {
        Parameter {
            kind,
            first_word,
            last_word,
            instance: 0,
            candidates: Vec::new(),
        }
    }

    /// An already resolved parameter, e.g. from an ALL expansion
    pub fn resolved(instance: InstanceId, word: usize) -> Self {
        Parameter {
            kind: ParameterKind::Plain,
            first_word: word,
            last_word: word,
            instance,
            candidates: vec![instance],
        }
    }

    pub fn words(&self, words: &Words) -> String {
        words.span_text(self.first_word, self.last_word)
    }
}

/// One syntactic parameter slot of the matched grammar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterPosition {
    pub parameters: Vec<Parameter>,
    /// References after ALL EXCEPT
    pub exceptions: Vec<Parameter>,
    pub all: bool,
    pub them: bool,
    pub explicit_multiple: bool,
    pub checked: bool,
    pub flags: ParameterFlags,
}

impl ParameterPosition {
    pub fn new(flags: ParameterFlags) -> Self {
        ParameterPosition {
            flags,
            ..Default::default()
        }
    }

    /// The resolved instances, skipping removed slots
    pub fn instances(&self) -> Vec<InstanceId> {
        self.parameters
            .iter()
            .map(|p| p.instance)
            .filter(|i| *i != 0)
            .collect()
    }

    /// Drop slots whose instance was cleared
    pub fn compress(&mut self) {
        self.parameters.retain(|p| p.instance != 0);
    }
}

impl fmt::Display for ParameterPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let instances: Vec<String> = self
            .parameters
            .iter()
            .map(|p| match p.instance {
                0 => format!("?{:?}", p.candidates),
                i => i.to_string(),
            })
            .collect();
        write!(f, "[{}]", instances.join(", "))?;
        if self.all {
            write!(f, " all")?;
        }
        if self.them {
            write!(f, " them")?;
        }
        if self.explicit_multiple {
            write!(f, " multiple")?;
        }
        if !self.exceptions.is_empty() {
            let exceptions: Vec<String> = self.exceptions.iter().map(|p| p.instance.to_string()).collect();
            write!(f, " except [{}]", exceptions.join(", "))?;
        }
        Ok(())
    }
}
