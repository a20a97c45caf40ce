// Player words
// The scanned command line and the classification queries the parser makes on it.

use crate::dictionary::{Dictionary, WordClasses};
use crate::story::{InstanceId, WordCode};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Integer(i64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{}", value),
            Literal::String(value) => write!(f, "\"{}\"", value),
        }
    }
}

/// One word of player input
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerWord {
    /// A word found in the dictionary
    Word { entry: usize, text: String },
    /// A number or quoted string, already materialized as an instance
    Literal { literal: Literal, instance: InstanceId },
}

/// Read-only view over the words of the current command line
#[derive(Clone, Copy)]
pub struct Words<'a> {
    words: &'a [PlayerWord],
    dictionary: &'a Dictionary,
}

impl<'a> Words<'a> {
    pub fn new(words: &'a [PlayerWord], dictionary: &'a Dictionary) -> Self {
        Words { words, dictionary }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a PlayerWord> {
        self.words.get(index)
    }

    pub fn is_end(&self, index: usize) -> bool {
        index >= self.words.len()
    }

    pub fn classes(&self, index: usize) -> WordClasses {
        match self.words.get(index) {
            Some(PlayerWord::Word { entry, .. }) => self
                .dictionary
                .entry(*entry)
                .map(|e| e.classes)
                .unwrap_or_default(),
            Some(PlayerWord::Literal { .. }) => WordClasses::LITERAL,
            None => WordClasses::NONE,
        }
    }

    pub fn is(&self, index: usize, class: WordClasses) -> bool {
        self.classes(index).contains(class)
    }

    /// Dictionary code of the word, `None` for literals
    pub fn code(&self, index: usize) -> Option<WordCode> {
        match self.words.get(index) {
            Some(PlayerWord::Word { entry, .. }) => self.dictionary.entry(*entry).map(|e| e.code),
            _ => None,
        }
    }

    pub fn entry(&self, index: usize) -> Option<usize> {
        match self.words.get(index) {
            Some(PlayerWord::Word { entry, .. }) => Some(*entry),
            _ => None,
        }
    }

    pub fn text(&self, index: usize) -> String {
        match self.words.get(index) {
            Some(PlayerWord::Word { text, .. }) => text.clone(),
            Some(PlayerWord::Literal { literal, .. }) => literal.to_string(),
            None => String::new(),
        }
    }

    /// The player's words from `first` to `last` inclusive
    pub fn span_text(&self, first: usize, last: usize) -> String {
        (first..=last)
            .filter(|i| !self.is_end(*i))
            .map(|i| self.text(i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_end_of_command(&self, index: usize) -> bool {
        self.is_end(index) || self.is(index, WordClasses::CONJUNCTION)
    }

    /// Words that start a reference to an instance
    pub fn is_instance_reference(&self, index: usize) -> bool {
        self.classes(index).intersects(
            WordClasses::NOUN
                | WordClasses::ADJECTIVE
                | WordClasses::ALL
                | WordClasses::LITERAL
                | WordClasses::IT
                | WordClasses::THEM
                | WordClasses::PRONOUN,
        )
    }

    pub fn dictionary(&self) -> &'a Dictionary {
        self.dictionary
    }
}
