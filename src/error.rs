// Error Handling
// Image loading, configuration, command aborts and statement failures

use crate::output::{MessageKind, MessageParameter, Output};
use crate::story::InstanceId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("not a story image, tag was '{0}'")]
    BadTag(String),
    #[error("image truncated: need {needed} bytes, have {size}")]
    Truncated { needed: usize, size: usize },
    #[error("address {address:#06x} outside image of {size:#06x} words")]
    AddressOutOfRange { address: usize, size: usize },
    #[error("{table} table at {address:#06x} has no end marker")]
    MissingTerminator { table: &'static str, address: usize },
    #[error("unknown verb qualifier {0}")]
    UnknownQualifier(u32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure signalled by the statement executor while running a body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeFailure {
    /// The body executed a failing statement
    #[error("statement body failed")]
    Failed,
    #[error("runtime error: {0}")]
    Error(String),
}

/// Taxonomy of the conditions that abort a player command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SyntaxMismatch,
    Ambiguity,
    ReferenceFailure,
    RestrictionFailure,
    Infeasibility,
    MultiplicityViolation,
}

/// Conditions that abort the current player command.
///
/// Messages carry everything needed to render them, so reporting doesn't need
/// the command's words any more.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("input not understood")]
    NotUnderstood,
    #[error("unknown word '{0}'")]
    UnknownWord(String),
    #[error("expected a noun")]
    NounExpected,
    #[error("'{except}' used without a preceding '{all}'")]
    ButAfterAll { except: String, all: String },
    #[error("nothing after '{0}'")]
    NothingAfterExcept(String),
    #[error("multiple objects not allowed")]
    MultipleNotAllowed,
    #[error("no such thing: '{0}'")]
    NoSuch(String),
    #[error("nothing known as '{0}'")]
    WhatWord(String),
    #[error("ambiguous reference")]
    WhichOne(Vec<MessageParameter>),
    #[error("ambiguous pronoun '{pronoun}'")]
    WhichPronoun {
        pronoun: String,
        candidates: Vec<InstanceId>,
    },
    #[error("nothing left after exceptions")]
    NotMuch,
    /// An explicit multiple reference lost all its members; enough has been said already
    #[error("no objects left")]
    NothingLeft,
    #[error("parameter {parameter} fails its restriction")]
    Restricted { parameter: usize, handled: bool },
    #[error("parameter {0} is not an object")]
    NotAnObject(usize),
    #[error("no executable alternative")]
    Infeasible,
    #[error("no exit that way")]
    NoWay,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::NotUnderstood
            | CommandError::UnknownWord(_)
            | CommandError::NounExpected
            | CommandError::ButAfterAll { .. } => ErrorKind::SyntaxMismatch,
            CommandError::WhichOne(_) | CommandError::WhichPronoun { .. } => ErrorKind::Ambiguity,
            CommandError::NoSuch(_) | CommandError::WhatWord(_) => ErrorKind::ReferenceFailure,
            CommandError::Restricted { .. } | CommandError::NotAnObject(_) => {
                ErrorKind::RestrictionFailure
            }
            CommandError::Infeasible | CommandError::NoWay => ErrorKind::Infeasibility,
            CommandError::NothingAfterExcept(_)
            | CommandError::MultipleNotAllowed
            | CommandError::NotMuch
            | CommandError::NothingLeft => ErrorKind::MultiplicityViolation,
        }
    }

    /// Tell the player what went wrong
    pub fn report(&self, output: &mut dyn Output) {
        let words = |w: &str| MessageParameter::Words(w.to_string());
        match self {
            CommandError::NotUnderstood => output.message(MessageKind::What, &[]),
            CommandError::UnknownWord(word) => {
                output.message(MessageKind::UnknownWord, &[words(word)])
            }
            CommandError::NounExpected => output.message(MessageKind::Noun, &[]),
            CommandError::ButAfterAll { except, all } => {
                output.message(MessageKind::ButAll, &[words(except), words(all)])
            }
            CommandError::NothingAfterExcept(word) => {
                output.message(MessageKind::AfterBut, &[words(word)])
            }
            CommandError::MultipleNotAllowed => output.message(MessageKind::Multiple, &[]),
            CommandError::NoSuch(phrase) => output.message(MessageKind::NoSuch, &[words(phrase)]),
            CommandError::WhatWord(word) => output.message(MessageKind::WhatWord, &[words(word)]),
            CommandError::WhichOne(candidates) => {
                report_alternatives(output, MessageKind::WhichOneStart, candidates)
            }
            CommandError::WhichPronoun {
                pronoun,
                candidates,
            } => {
                output.message(MessageKind::WhichPronounStart, &[words(pronoun)]);
                let candidates: Vec<MessageParameter> = candidates
                    .iter()
                    .map(|i| MessageParameter::Instance(*i))
                    .collect();
                report_alternatives(output, MessageKind::WhichPronounFirst, &candidates)
            }
            CommandError::NotMuch => output.message(MessageKind::NotMuch, &[]),
            CommandError::Restricted { handled: false, .. }
            | CommandError::NotAnObject(_)
            | CommandError::Infeasible => output.message(MessageKind::Cant0, &[]),
            CommandError::NoWay => output.message(MessageKind::NoWay, &[]),
            CommandError::Restricted { handled: true, .. } | CommandError::NothingLeft => {}
        }
    }
}

/// "first", ", middle"..., " or last"
fn report_alternatives(output: &mut dyn Output, first: MessageKind, candidates: &[MessageParameter]) {
    let Some((head, tail)) = candidates.split_first() else {
        return;
    };
    output.message(first, std::slice::from_ref(head));
    if let Some((last, middle)) = tail.split_last() {
        for candidate in middle {
            output.message(MessageKind::WhichOneComma, std::slice::from_ref(candidate));
        }
        output.message(MessageKind::WhichOneOr, std::slice::from_ref(last));
    }
}
