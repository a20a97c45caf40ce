// Word scanner
// Splits a player line into dictionary words and literals.

use crate::dictionary::{Dictionary, WordClasses};
use crate::error::CommandError;
use crate::words::{Literal, PlayerWord};
use crate::world::World;
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Integer(i64),
    Quoted(String),
    Punctuation(char),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '\'' || c == '_'
}

fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut text = String::new();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                text.push(c);
            }
            tokens.push(Token::Quoted(text));
        } else if is_word_char(c) {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if !is_word_char(c) {
                    break;
                }
                word.push(c);
                chars.next();
            }
            match word.parse::<i64>() {
                Ok(value) => tokens.push(Token::Integer(value)),
                Err(_) => tokens.push(Token::Word(word.to_lowercase())),
            }
        } else {
            tokens.push(Token::Punctuation(c));
            chars.next();
        }
    }
    tokens
}

/// Scan a player line. Literals become instances in `world`.
pub fn scan(line: &str, dictionary: &Dictionary, world: &mut dyn World) -> Result<Vec<PlayerWord>, CommandError> {
    let mut words = Vec::new();
    for token in tokenize(line) {
        match token {
            Token::Word(text) => {
                let entry = dictionary
                    .lookup(&text)
                    .ok_or_else(|| CommandError::UnknownWord(text.clone()))?;
                let noise = dictionary
                    .entry(entry)
                    .map(|e| e.classes == WordClasses::NOISE)
                    .unwrap_or(false);
                if !noise {
                    words.push(PlayerWord::Word { entry, text });
                }
            }
            Token::Punctuation(c) => {
                let text = c.to_string();
                if let Some(entry) = dictionary.lookup(&text) {
                    words.push(PlayerWord::Word { entry, text });
                }
            }
            Token::Integer(value) => {
                let literal = Literal::Integer(value);
                let instance = world.create_literal(literal.clone());
                words.push(PlayerWord::Literal { literal, instance });
            }
            Token::Quoted(text) => {
                let literal = Literal::String(text);
                let instance = world.create_literal(literal.clone());
                words.push(PlayerWord::Literal { literal, instance });
            }
        }
    }
    debug!("Scanned {} word(s) from '{}'", words.len(), line);
    Ok(words)
}
