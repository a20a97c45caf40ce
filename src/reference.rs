// Complex reference parser
//
// Collects the word spans of the references in one parameter position
// without resolving them to instances:
//
// 1) all
// 2) all except <simple references>
// 3) simple references: "adjective* noun", a literal or a pronoun, possibly
//    chained with conjunctions ("the lamp and the key")
//
// THEM is also a common pronoun for some instances (scissors, trousers) but
// can stand for the previous command's multiple targets. When there is such
// a previous set it takes precedence over the pronoun reading.

use crate::dictionary::WordClasses;
use crate::error::CommandError;
use crate::memory::Memory;
use crate::parameter::{Parameter, ParameterKind, ParameterPosition};
use crate::story::ParameterFlags;
use crate::words::{PlayerWord, Words};
use log::trace;

pub struct ReferenceParser<'a> {
    words: Words<'a>,
    memory: &'a Memory,
    pub cursor: usize,
}

impl<'a> ReferenceParser<'a> {
    pub fn new(words: Words<'a>, memory: &'a Memory, cursor: usize) -> Self {
        ReferenceParser {
            words,
            memory,
            cursor,
        }
    }

    /// Parse the references of one grammar parameter slot
    pub fn parse_position(&mut self, flags: ParameterFlags) -> Result<ParameterPosition, CommandError> {
        let mut position = ParameterPosition::new(flags);
        self.complex(&mut position)?;

        if position.parameters.is_empty() {
            return Err(CommandError::NotUnderstood);
        }
        if position.explicit_multiple && !flags.multiple {
            return Err(CommandError::MultipleNotAllowed);
        }
        trace!("Parsed parameter position {}", position);
        Ok(position)
    }

    fn complex(&mut self, position: &mut ParameterPosition) -> Result<(), CommandError> {
        if self.words.is(self.cursor, WordClasses::ALL) {
            position.all = true;
            position.explicit_multiple = true;
            position
                .parameters
                .push(Parameter::new(ParameterKind::Plain, self.cursor, self.cursor));
            self.cursor += 1;
            if !self.words.is_end(self.cursor) && self.words.is(self.cursor, WordClasses::EXCEPT) {
                self.exceptions(position)?;
            }
        } else {
            self.simple(&mut position.parameters)?;
            if position.parameters.len() > 1 {
                position.explicit_multiple = true;
            }
        }
        Ok(())
    }

    fn exceptions(&mut self, position: &mut ParameterPosition) -> Result<(), CommandError> {
        let except_word = self.cursor;
        self.cursor += 1;
        self.simple(&mut position.exceptions)?;
        if position.exceptions.is_empty() {
            return Err(CommandError::NothingAfterExcept(self.words.text(except_word)));
        }
        Ok(())
    }

    /// One or more references joined by conjunctions
    fn simple(&mut self, parameters: &mut Vec<Parameter>) -> Result<(), CommandError> {
        loop {
            match self.one_reference()? {
                Some(parameter) => parameters.push(parameter),
                None => return Ok(()),
            }

            let continues = !self.words.is_end(self.cursor)
                && self.words.is(self.cursor, WordClasses::CONJUNCTION)
                && (self.words.is(self.cursor + 1, WordClasses::ADJECTIVE)
                    || self.words.is(self.cursor + 1, WordClasses::NOUN));
            if !continues {
                return Ok(());
            }
            // Eat the conjunction, another reference follows
            self.cursor += 1;
        }
    }

    fn one_reference(&mut self) -> Result<Option<Parameter>, CommandError> {
        let is_them = self.words.is(self.cursor, WordClasses::THEM);
        let is_pronoun = self.words.is(self.cursor, WordClasses::PRONOUN);
        if is_them && (!is_pronoun || self.memory.has_previous_multiple()) {
            let parameter = Parameter::new(ParameterKind::Them, self.cursor, self.cursor);
            self.cursor += 1;
            return Ok(Some(parameter));
        }

        if let Some(PlayerWord::Literal { literal, .. }) = self.words.get(self.cursor) {
            let parameter = Parameter::new(ParameterKind::Literal(literal.clone()), self.cursor, self.cursor);
            self.cursor += 1;
            return Ok(Some(parameter));
        }

        if is_pronoun {
            let parameter = Parameter::new(ParameterKind::Pronoun, self.cursor, self.cursor);
            self.cursor += 1;
            return Ok(Some(parameter));
        }

        self.adjectives_and_noun()
    }

    fn another_adjective(&self, index: usize) -> bool {
        !self.words.is_end(index) && self.words.is(index, WordClasses::ADJECTIVE)
    }

    /// A noun that isn't followed by another noun must be the head of the phrase
    fn last_possible_noun(&self, index: usize) -> bool {
        self.words.is(index, WordClasses::NOUN)
            && (self.words.is_end(index + 1) || !self.words.is(index + 1, WordClasses::NOUN))
    }

    fn adjectives_and_noun(&mut self) -> Result<Option<Parameter>, CommandError> {
        let first_word = self.cursor;
        let mut found = false;

        while self.another_adjective(self.cursor) {
            if self.last_possible_noun(self.cursor) {
                break;
            }
            found = true;
            self.cursor += 1;
        }

        if !self.words.is_end(self.cursor) {
            if self.words.is(self.cursor, WordClasses::NOUN) {
                found = true;
                self.cursor += 1;
            } else {
                return Err(CommandError::NounExpected);
            }
        } else if found {
            return Err(CommandError::NounExpected);
        }

        if found {
            Ok(Some(Parameter::new(ParameterKind::Plain, first_word, self.cursor - 1)))
        } else {
            Ok(None)
        }
    }
}
