// Player-facing output
// Message kinds, templates and a transcript that renders them.

use crate::story::{InstanceId, Story};
use crate::words::Literal;
use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    What,
    WhatWord,
    UnknownWord,
    Multiple,
    Noun,
    AfterBut,
    ButAll,
    NotMuch,
    WhichOneStart,
    WhichOneComma,
    WhichOneOr,
    WhichPronounStart,
    WhichPronounFirst,
    NoSuch,
    NoWay,
    Cant0,
}

/// Something a message refers to with `$1`, `$2`...
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageParameter {
    Instance(InstanceId),
    Literal(Literal),
    /// The player's own words
    Words(String),
}

lazy_static! {
    static ref DEFAULT_MESSAGES: IndexMap<MessageKind, &'static str> = {
        let mut m = IndexMap::new();
        m.insert(MessageKind::What, "I don't understand.");
        m.insert(MessageKind::WhatWord, "I don't know what you mean by '$1'.");
        m.insert(MessageKind::UnknownWord, "I don't know the word '$1'.");
        m.insert(
            MessageKind::Multiple,
            "You can't refer to multiple objects with that verb.",
        );
        m.insert(MessageKind::Noun, "You must supply a noun.");
        m.insert(MessageKind::AfterBut, "You must give at least one object after '$1'.");
        m.insert(MessageKind::ButAll, "You can only use '$1' AFTER '$2'.");
        m.insert(MessageKind::NotMuch, "That doesn't leave much to choose from!");
        m.insert(MessageKind::WhichOneStart, "I don't know if you mean the $1");
        m.insert(MessageKind::WhichOneComma, ", the $1");
        m.insert(MessageKind::WhichOneOr, " or the $1.");
        m.insert(
            MessageKind::WhichPronounStart,
            "I'm not sure what you mean by '$1',",
        );
        m.insert(MessageKind::WhichPronounFirst, " it could be the $1");
        m.insert(MessageKind::NoSuch, "I can't see any $1 here.");
        m.insert(MessageKind::NoWay, "You can't go that way.");
        m.insert(MessageKind::Cant0, "You can't do that.");
        m
    };
}

/// Message templates, defaults overridden by configuration
#[derive(Debug, Clone)]
pub struct MessageTable {
    templates: IndexMap<MessageKind, String>,
}

impl Default for MessageTable {
    fn default() -> Self {
        MessageTable {
            templates: DEFAULT_MESSAGES
                .iter()
                .map(|(kind, text)| (*kind, text.to_string()))
                .collect(),
        }
    }
}

impl MessageTable {
    pub fn with_overrides(overrides: &IndexMap<MessageKind, String>) -> Self {
        let mut table = MessageTable::default();
        for (kind, text) in overrides {
            table.templates.insert(*kind, text.clone());
        }
        table
    }

    pub fn template(&self, kind: MessageKind) -> &str {
        self.templates.get(&kind).map(|t| t.as_str()).unwrap_or("")
    }
}

/// Where the pipeline sends text meant for the player
pub trait Output {
    fn message(&mut self, kind: MessageKind, parameters: &[MessageParameter]);

    fn print(&mut self, text: &str);

    /// Positional marker shown before each target of a multiple command
    fn marker(&mut self, parameter: &MessageParameter);

    fn paragraph(&mut self);
}

/// Renders output into a string
pub struct Transcript {
    text: String,
    messages: MessageTable,
    names: Vec<String>,
}

impl Transcript {
    pub fn new(story: &Story, messages: MessageTable) -> Self {
        Transcript {
            text: String::new(),
            messages,
            names: story.instances.iter().map(|i| i.name.clone()).collect(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Everything rendered since the last call
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    fn say(&self, parameter: &MessageParameter) -> String {
        match parameter {
            MessageParameter::Instance(instance) => instance
                .checked_sub(1)
                .and_then(|i| self.names.get(i))
                .cloned()
                .unwrap_or_else(|| format!("#{}", instance)),
            MessageParameter::Literal(Literal::Integer(value)) => value.to_string(),
            MessageParameter::Literal(Literal::String(value)) => value.clone(),
            MessageParameter::Words(words) => words.clone(),
        }
    }

    fn append(&mut self, text: &str) {
        if !self.text.is_empty() && !self.text.ends_with('\n') && !text.starts_with([',', '.', ' ']) {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }
}

impl Output for Transcript {
    fn message(&mut self, kind: MessageKind, parameters: &[MessageParameter]) {
        let mut rendered = self.messages.template(kind).to_string();
        // Highest numbers first so "$1" doesn't eat the front of "$10"
        for (i, parameter) in parameters.iter().enumerate().rev() {
            rendered = rendered.replace(&format!("${}", i + 1), &self.say(parameter));
        }
        self.append(&rendered);
    }

    fn print(&mut self, text: &str) {
        self.append(text);
    }

    fn marker(&mut self, parameter: &MessageParameter) {
        let marker = format!("({})", self.say(parameter));
        self.append(&marker);
    }

    fn paragraph(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with("\n\n") {
            if !self.text.ends_with('\n') {
                self.text.push('\n');
            }
            self.text.push('\n');
        }
    }
}
