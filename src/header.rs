use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use crate::acode::{offsets, Image};
use crate::error::LoadError;
use crate::story::{ClassId, InstanceId, PredefinedClasses};

pub struct Header {
    pub version: [u8; 4],
    pub size: usize,
    pub class_table: usize,
    pub class_max: usize,
    pub predefined: PredefinedClasses,
    pub instance_table: usize,
    pub instance_max: usize,
    pub hero: InstanceId,
    pub dictionary: usize,
    pub syntax_table: usize,
    pub parameter_map_table: usize,
    pub verb_table: usize,
    pub opaque_attribute: u32,
}

impl Header {
    pub fn new(image: &Image) -> Result<Header, LoadError> {
        let address = |offset: usize| -> Result<usize, LoadError> { Ok(image.word(offset)? as usize) };
        let class = |offset: usize| -> Result<ClassId, LoadError> { Ok(image.word(offset)? as ClassId) };

        let size = address(offsets::SIZE)?;
        if size > image.len() {
            return Err(LoadError::Truncated {
                needed: size * 4,
                size: image.len() * 4,
            });
        }

        Ok(Header {
            version: image.word(offsets::VERSION)?.to_be_bytes(),
            size,
            class_table: address(offsets::CLASS_TABLE)?,
            class_max: address(offsets::CLASS_MAX)?,
            predefined: PredefinedClasses {
                entity: class(offsets::ENTITY_CLASS)?,
                thing: class(offsets::THING_CLASS)?,
                object: class(offsets::OBJECT_CLASS)?,
                location: class(offsets::LOCATION_CLASS)?,
                actor: class(offsets::ACTOR_CLASS)?,
                literal: class(offsets::LITERAL_CLASS)?,
                integer: class(offsets::INTEGER_CLASS)?,
                string: class(offsets::STRING_CLASS)?,
            },
            instance_table: address(offsets::INSTANCE_TABLE)?,
            instance_max: address(offsets::INSTANCE_MAX)?,
            hero: address(offsets::THE_HERO)?,
            dictionary: address(offsets::DICTIONARY)?,
            syntax_table: address(offsets::SYNTAX_TABLE)?,
            parameter_map_table: address(offsets::PARAMETER_MAP_TABLE)?,
            verb_table: address(offsets::VERB_TABLE)?,
            opaque_attribute: image.word(offsets::OPAQUE_ATTRIBUTE)?,
        })
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "
ACODE version:            {}.{}.{}{}
Image size (words):       {:#06x}
Class table address:      {:#06x} ({} classes)
Instance table address:   {:#06x} ({} instances)
Hero:                     {}
Dictionary address:       {:#06x}
Syntax table address:     {:#06x}
Parameter map address:    {:#06x}
Verb table address:       {:#06x}
Opaque attribute:         {}
",
            self.version[0],
            self.version[1],
            self.version[2],
            self.version[3] as char,
            self.size,
            self.class_table,
            self.class_max,
            self.instance_table,
            self.instance_max,
            self.hero,
            self.dictionary,
            self.syntax_table,
            self.parameter_map_table,
            self.verb_table,
            self.opaque_attribute,
        )
    }
}
