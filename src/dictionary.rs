use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use crate::story::{InstanceId, WordCode};

/// Word classification bitset, as stored in the dictionary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordClasses(u32);

impl WordClasses {
    pub const NONE: WordClasses = WordClasses(0);
    pub const SYNONYM: WordClasses = WordClasses(1 << 0);
    pub const ADJECTIVE: WordClasses = WordClasses(1 << 1);
    pub const ALL: WordClasses = WordClasses(1 << 2);
    pub const EXCEPT: WordClasses = WordClasses(1 << 3);
    pub const CONJUNCTION: WordClasses = WordClasses(1 << 4);
    pub const PREPOSITION: WordClasses = WordClasses(1 << 5);
    pub const DIRECTION: WordClasses = WordClasses(1 << 6);
    pub const IT: WordClasses = WordClasses(1 << 7);
    pub const NOISE: WordClasses = WordClasses(1 << 8);
    pub const NOUN: WordClasses = WordClasses(1 << 9);
    pub const ACTOR: WordClasses = WordClasses(1 << 10);
    pub const THEM: WordClasses = WordClasses(1 << 11);
    pub const VERB: WordClasses = WordClasses(1 << 12);
    pub const PRONOUN: WordClasses = WordClasses(1 << 13);
    /// Never stored in the dictionary, only given to literal player words
    pub const LITERAL: WordClasses = WordClasses(1 << 14);

    const NAMES: [(WordClasses, &'static str); 15] = [
        (WordClasses::SYNONYM, "synonym"),
        (WordClasses::ADJECTIVE, "adjective"),
        (WordClasses::ALL, "all"),
        (WordClasses::EXCEPT, "except"),
        (WordClasses::CONJUNCTION, "conjunction"),
        (WordClasses::PREPOSITION, "preposition"),
        (WordClasses::DIRECTION, "direction"),
        (WordClasses::IT, "it"),
        (WordClasses::NOISE, "noise"),
        (WordClasses::NOUN, "noun"),
        (WordClasses::ACTOR, "actor"),
        (WordClasses::THEM, "them"),
        (WordClasses::VERB, "verb"),
        (WordClasses::PRONOUN, "pronoun"),
        (WordClasses::LITERAL, "literal"),
    ];

    pub fn from_bits(bits: u32) -> Self {
        WordClasses(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: WordClasses) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn intersects(&self, other: WordClasses) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for WordClasses {
    type Output = WordClasses;

    fn bitor(self, rhs: WordClasses) -> WordClasses {
        WordClasses(self.0 | rhs.0)
    }
}

impl Display for WordClasses {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let names: Vec<&str> = WordClasses::NAMES
            .iter()
            .filter(|(class, _)| self.contains(*class))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join("|"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryEntry {
    pub word: String,
    pub code: WordCode,
    pub classes: WordClasses,
    /// Instances this word can modify as an adjective
    pub adjective_refs: Vec<InstanceId>,
    /// Instances this word can name as a noun
    pub noun_refs: Vec<InstanceId>,
    /// Instances this word can stand for as a pronoun
    pub pronoun_refs: Vec<InstanceId>,
}

impl DictionaryEntry {
    pub fn new(word: &str, code: WordCode, classes: WordClasses) -> Self {
        DictionaryEntry {
            word: word.to_string(),
            code,
            classes,
            adjective_refs: Vec::new(),
            noun_refs: Vec::new(),
            pronoun_refs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
}

impl Dictionary {
    pub fn new(entries: Vec<DictionaryEntry>) -> Dictionary {
        Dictionary { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&DictionaryEntry> {
        self.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut DictionaryEntry> {
        self.entries.get_mut(index)
    }

    pub fn push(&mut self, entry: DictionaryEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Index of the entry spelled `word`
    pub fn lookup(&self, word: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.word == word)
    }

    /// Spelling of the first word with `code` among words of `classes`
    pub fn word_for_code(&self, code: WordCode, classes: WordClasses) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code && e.classes.intersects(classes))
            .map(|e| e.word.as_str())
    }

    /// The first ALL word, used when a message needs to quote one
    pub fn all_word(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.classes.contains(WordClasses::ALL))
            .map(|e| e.word.as_str())
    }

    /// Code of the first pronoun registered for `instance`
    pub fn pronoun_for_instance(&self, instance: InstanceId) -> Option<WordCode> {
        self.entries
            .iter()
            .filter(|e| e.classes.contains(WordClasses::PRONOUN))
            .find(|e| e.pronoun_refs.contains(&instance))
            .map(|e| e.code)
    }
}

impl Display for Dictionary {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        writeln!(f, "Dictionary: {} words", self.entries.len())?;
        for (i, entry) in self.entries.iter().enumerate() {
            write!(
                f,
                "  [{:3}] {:<16} code {:4}  {}",
                i, entry.word, entry.code, entry.classes
            )?;
            if !entry.noun_refs.is_empty() {
                write!(f, "  noun of {:?}", entry.noun_refs)?;
            }
            if !entry.adjective_refs.is_empty() {
                write!(f, "  adjective of {:?}", entry.adjective_refs)?;
            }
            if !entry.pronoun_refs.is_empty() {
                write!(f, "  pronoun for {:?}", entry.pronoun_refs)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
