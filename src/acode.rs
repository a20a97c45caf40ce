// ACODE image access
// A story image is a sequence of big-endian 32-bit words; addresses are word indices.

use crate::error::LoadError;

/// End-of-table marker
pub const EOF: u32 = 0xFFFF_FFFF;

/// Element code for the end of a syntax
pub const EOS: u32 = 0xFFFF_FFFE;

/// Syntax element flag bits
pub const MULTIPLE_BIT: u32 = 0x1;
pub const OMNI_BIT: u32 = 0x2;

/// Pseudo-classes in restriction tables
pub const RESTRICTION_CONTAINER: i32 = -2;
pub const RESTRICTION_INTEGER: i32 = -3;
pub const RESTRICTION_STRING: i32 = -4;

pub const TAG: &[u8; 4] = b"ALAN";

/// Header word offsets
pub mod offsets {
    pub const TAG: usize = 0;
    pub const VERSION: usize = 1;
    pub const SIZE: usize = 2;
    pub const CLASS_TABLE: usize = 3;
    pub const CLASS_MAX: usize = 4;
    pub const ENTITY_CLASS: usize = 5;
    pub const THING_CLASS: usize = 6;
    pub const OBJECT_CLASS: usize = 7;
    pub const LOCATION_CLASS: usize = 8;
    pub const ACTOR_CLASS: usize = 9;
    pub const LITERAL_CLASS: usize = 10;
    pub const INTEGER_CLASS: usize = 11;
    pub const STRING_CLASS: usize = 12;
    pub const INSTANCE_TABLE: usize = 13;
    pub const INSTANCE_MAX: usize = 14;
    pub const THE_HERO: usize = 15;
    pub const DICTIONARY: usize = 16;
    pub const SYNTAX_TABLE: usize = 17;
    pub const PARAMETER_MAP_TABLE: usize = 18;
    pub const VERB_TABLE: usize = 19;
    pub const OPAQUE_ATTRIBUTE: usize = 20;
}

pub const HEADER_SIZE: usize = 21;
pub const CLASS_ENTRY_SIZE: usize = 4;
pub const INSTANCE_ENTRY_SIZE: usize = 8;

/// Address slot value, 0 meaning absent
pub fn optional(word: u32) -> Option<u32> {
    if word == 0 {
        None
    } else {
        Some(word)
    }
}

#[derive(Debug, Clone)]
pub struct Image {
    words: Vec<u32>,
}

impl Image {
    pub fn from_bytes(bytes: &[u8]) -> Result<Image, LoadError> {
        if bytes.len() < HEADER_SIZE * 4 {
            return Err(LoadError::Truncated {
                needed: HEADER_SIZE * 4,
                size: bytes.len(),
            });
        }
        if &bytes[0..4] != TAG {
            return Err(LoadError::BadTag(String::from_utf8_lossy(&bytes[0..4]).into_owned()));
        }
        let words = bytes
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Image { words })
    }

    pub fn from_words(words: Vec<u32>) -> Image {
        Image { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn into_words(self) -> Vec<u32> {
        self.words
    }

    pub fn word(&self, address: usize) -> Result<u32, LoadError> {
        self.words
            .get(address)
            .copied()
            .ok_or(LoadError::AddressOutOfRange {
                address,
                size: self.words.len(),
            })
    }

    /// A fixed-size record starting at `address`
    pub fn record(&self, address: usize, length: usize) -> Result<&[u32], LoadError> {
        self.words
            .get(address..address + length)
            .ok_or(LoadError::AddressOutOfRange {
                address: address + length,
                size: self.words.len(),
            })
    }

    /// Records of `record_length` words up to the EOF marker. Address 0 is an empty table.
    pub fn table(
        &self,
        address: usize,
        record_length: usize,
        table: &'static str,
    ) -> Result<Vec<&[u32]>, LoadError> {
        let mut records = Vec::new();
        if address == 0 {
            return Ok(records);
        }
        let mut current = address;
        loop {
            match self.words.get(current) {
                Some(&EOF) => return Ok(records),
                Some(_) => {
                    records.push(self.record(current, record_length)?);
                    current += record_length;
                }
                None => return Err(LoadError::MissingTerminator { table, address }),
            }
        }
    }

    /// A length-prefixed byte string packed four bytes to a word
    pub fn string(&self, address: usize) -> Result<String, LoadError> {
        if address == 0 {
            return Ok(String::new());
        }
        let length = self.word(address)? as usize;
        let packed = self.record(address + 1, length.div_ceil(4))?;
        let bytes: Vec<u8> = packed
            .iter()
            .flat_map(|w| w.to_be_bytes())
            .take(length)
            .collect();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
