// Story tables
// Typed, owned view of a compiled story image: classes, instances, verbs,
// syntax trees and the dictionary.

use crate::acode::{self, Image};
use crate::dictionary::{Dictionary, DictionaryEntry, WordClasses};
use crate::error::LoadError;
use crate::header::Header;
use indexmap::IndexMap;
use log::debug;
use std::fmt;

/// Instance code, 1-based. 0 means "no instance".
pub type InstanceId = usize;

/// Class code, 1-based. 0 means "no class".
pub type ClassId = usize;

/// Dictionary code of a word (verb codes, preposition codes, pronoun codes).
pub type WordCode = u32;

/// Address of a code block the statement executor understands.
pub type CodeAddr = u32;

/// Verb qualifiers, controlling in which execution pass an alternative runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Default,
    After,
    Before,
    Only,
}

impl Qualifier {
    pub fn from_word(word: u32) -> Result<Self, LoadError> {
        match word {
            0 => Ok(Qualifier::Default),
            1 => Ok(Qualifier::After),
            2 => Ok(Qualifier::Before),
            3 => Ok(Qualifier::Only),
            other => Err(LoadError::UnknownQualifier(other)),
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Qualifier::Default => write!(f, "DEFAULT"),
            Qualifier::After => write!(f, "AFTER"),
            Qualifier::Before => write!(f, "BEFORE"),
            Qualifier::Only => write!(f, "ONLY"),
        }
    }
}

/// One CHECK: a guard expression and the statements to run when it fails
#[derive(Debug, Clone, PartialEq)]
pub struct CheckEntry {
    /// Guard expression, `None` is an unconditional failure
    pub expression: Option<CodeAddr>,
    /// Statements run when the guard is false
    pub statements: Option<CodeAddr>,
}

/// A verb body declared at one scope
#[derive(Debug, Clone, PartialEq)]
pub struct AltEntry {
    /// Parameter number this body is attached to, 0 for any
    pub parameter: usize,
    pub qualifier: Qualifier,
    pub checks: Vec<CheckEntry>,
    pub action: Option<CodeAddr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerbEntry {
    pub code: WordCode,
    pub alternatives: Vec<AltEntry>,
}

#[derive(Debug, Clone)]
pub struct ClassEntry {
    pub code: ClassId,
    pub name: String,
    pub parent: ClassId,
    pub verbs: Vec<VerbEntry>,
}

#[derive(Debug, Clone)]
pub struct ExitEntry {
    /// Direction word code
    pub direction: WordCode,
    pub checks: Vec<CheckEntry>,
    pub action: Option<CodeAddr>,
    pub target: InstanceId,
}

#[derive(Debug, Clone)]
pub struct InstanceEntry {
    pub code: InstanceId,
    pub name: String,
    pub parent: ClassId,
    /// Initial location, 0 for nowhere
    pub location: InstanceId,
    /// Container properties index, 0 if this is not a container
    pub container: u32,
    pub attributes: IndexMap<u32, i64>,
    pub verbs: Vec<VerbEntry>,
    pub exits: Vec<ExitEntry>,
}

/// Class a restricted syntax parameter must belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionClass {
    Class(ClassId),
    Container,
    Integer,
    String,
}

impl RestrictionClass {
    fn from_word(word: u32) -> Self {
        match word as i32 {
            acode::RESTRICTION_CONTAINER => RestrictionClass::Container,
            acode::RESTRICTION_INTEGER => RestrictionClass::Integer,
            acode::RESTRICTION_STRING => RestrictionClass::String,
            _ => RestrictionClass::Class(word as ClassId),
        }
    }
}

/// Per-parameter class restriction attached to a syntax terminal
#[derive(Debug, Clone, PartialEq)]
pub struct Restriction {
    /// 1-based parameter number
    pub parameter: usize,
    pub class: RestrictionClass,
    /// Statements run instead of the generic "can't do that"
    pub statements: Option<CodeAddr>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterFlags {
    pub multiple: bool,
    pub omnipotent: bool,
}

impl ParameterFlags {
    pub fn from_bits(bits: u32) -> Self {
        ParameterFlags {
            multiple: bits & acode::MULTIPLE_BIT != 0,
            omnipotent: bits & acode::OMNI_BIT != 0,
        }
    }

    pub fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.multiple {
            bits |= acode::MULTIPLE_BIT;
        }
        if self.omnipotent {
            bits |= acode::OMNI_BIT;
        }
        bits
    }
}

/// One edge out of a syntax tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A literal word (preposition) leading to the next node
    Word { code: WordCode, next: usize },
    /// A parameter slot leading to the next node
    Parameter { flags: ParameterFlags, next: usize },
    /// Terminal: the syntax number and its restriction table
    EndOfSyntax {
        syntax: u32,
        restrictions: Vec<Restriction>,
    },
}

#[derive(Debug, Clone)]
pub struct SyntaxEntry {
    /// Verb word code
    pub verb: WordCode,
    /// Root element table
    pub elements: usize,
}

/// Maps a syntax to the verb it invokes and the order of its parameters
#[derive(Debug, Clone)]
pub struct ParameterMap {
    pub syntax: u32,
    pub verb: WordCode,
    /// For each verb parameter (1-based), the syntactic position it comes from
    pub mapping: Vec<usize>,
}

/// The classes every story defines
#[derive(Debug, Clone, Copy, Default)]
pub struct PredefinedClasses {
    pub entity: ClassId,
    pub thing: ClassId,
    pub object: ClassId,
    pub location: ClassId,
    pub actor: ClassId,
    pub literal: ClassId,
    pub integer: ClassId,
    pub string: ClassId,
}

/// A loaded story
#[derive(Debug, Clone, Default)]
pub struct Story {
    pub predefined: PredefinedClasses,
    pub hero: InstanceId,
    pub opaque_attribute: u32,
    pub classes: Vec<ClassEntry>,
    pub instances: Vec<InstanceEntry>,
    pub dictionary: Dictionary,
    pub syntaxes: Vec<SyntaxEntry>,
    pub element_tables: Vec<Vec<Element>>,
    pub parameter_maps: Vec<ParameterMap>,
    pub global_verbs: Vec<VerbEntry>,
    /// Raw words, kept for the statement executor
    pub code: Vec<u32>,
}

impl Story {
    /// Decode a story from the bytes of an image file
    pub fn from_image(bytes: &[u8]) -> Result<Story, LoadError> {
        let image = Image::from_bytes(bytes)?;
        let header = Header::new(&image)?;
        let mut loader = Loader {
            image: &image,
            element_tables: IndexMap::new(),
            decoded: Vec::new(),
        };

        let classes = loader.classes(&header)?;
        let instances = loader.instances(&header)?;
        let dictionary = loader.dictionary(header.dictionary)?;
        let syntaxes = loader.syntaxes(header.syntax_table)?;
        let parameter_maps = loader.parameter_maps(header.parameter_map_table)?;
        let global_verbs = loader.verbs(header.verb_table)?;

        let element_tables = loader.decoded;
        debug!(
            "Loaded story: {} classes, {} instances, {} words, {} syntaxes, {} element tables",
            classes.len(),
            instances.len(),
            dictionary.len(),
            syntaxes.len(),
            element_tables.len()
        );

        Ok(Story {
            predefined: header.predefined,
            hero: header.hero,
            opaque_attribute: header.opaque_attribute,
            classes,
            instances,
            dictionary,
            syntaxes,
            element_tables,
            parameter_maps,
            global_verbs,
            code: image.into_words(),
        })
    }

    pub fn instance_max(&self) -> InstanceId {
        self.instances.len()
    }

    pub fn class(&self, class: ClassId) -> Option<&ClassEntry> {
        class.checked_sub(1).and_then(|i| self.classes.get(i))
    }

    pub fn instance(&self, instance: InstanceId) -> Option<&InstanceEntry> {
        instance.checked_sub(1).and_then(|i| self.instances.get(i))
    }

    pub fn instance_name(&self, instance: InstanceId) -> &str {
        self.instance(instance)
            .map(|i| i.name.as_str())
            .unwrap_or("<nothing>")
    }

    pub fn class_name(&self, class: ClassId) -> &str {
        self.class(class).map(|c| c.name.as_str()).unwrap_or("<none>")
    }

    /// Parent chain of a class ordered from the root ancestor down to `class`
    pub fn class_chain(&self, class: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut current = class;
        while current != 0 && chain.len() <= self.classes.len() {
            chain.push(current);
            current = self.class(current).map(|c| c.parent).unwrap_or(0);
        }
        chain.reverse();
        chain
    }

    pub fn syntax_for_verb(&self, verb: WordCode) -> Option<&SyntaxEntry> {
        self.syntaxes.iter().find(|s| s.verb == verb)
    }

    pub fn element_table(&self, table: usize) -> &[Element] {
        self.element_tables
            .get(table)
            .map(|t| t.as_slice())
            .unwrap_or(&[])
    }

    pub fn parameter_map(&self, syntax: u32) -> Option<&ParameterMap> {
        self.parameter_maps.iter().find(|m| m.syntax == syntax)
    }
}

/// Decodes tables out of a word image, sharing element tables by address
struct Loader<'a> {
    image: &'a Image,
    element_tables: IndexMap<usize, usize>,
    decoded: Vec<Vec<Element>>,
}

impl<'a> Loader<'a> {
    fn classes(&self, header: &Header) -> Result<Vec<ClassEntry>, LoadError> {
        let mut classes = Vec::with_capacity(header.class_max);
        for i in 0..header.class_max {
            let record = self
                .image
                .record(header.class_table + i * acode::CLASS_ENTRY_SIZE, acode::CLASS_ENTRY_SIZE)?;
            classes.push(ClassEntry {
                code: record[0] as ClassId,
                name: self.image.string(record[1] as usize)?,
                parent: record[2] as ClassId,
                verbs: self.verbs(record[3] as usize)?,
            });
        }
        Ok(classes)
    }

    fn instances(&self, header: &Header) -> Result<Vec<InstanceEntry>, LoadError> {
        let mut instances = Vec::with_capacity(header.instance_max);
        for i in 0..header.instance_max {
            let record = self.image.record(
                header.instance_table + i * acode::INSTANCE_ENTRY_SIZE,
                acode::INSTANCE_ENTRY_SIZE,
            )?;
            let mut attributes = IndexMap::new();
            for attribute in self.image.table(record[5] as usize, 2, "attributes")? {
                attributes.insert(attribute[0], attribute[1] as i32 as i64);
            }
            instances.push(InstanceEntry {
                code: record[0] as InstanceId,
                name: self.image.string(record[1] as usize)?,
                parent: record[2] as ClassId,
                location: record[3] as InstanceId,
                container: record[4],
                attributes,
                verbs: self.verbs(record[6] as usize)?,
                exits: self.exits(record[7] as usize)?,
            });
        }
        Ok(instances)
    }

    fn verbs(&self, address: usize) -> Result<Vec<VerbEntry>, LoadError> {
        let mut verbs = Vec::new();
        for verb in self.image.table(address, 2, "verbs")? {
            let mut alternatives = Vec::new();
            for alt in self.image.table(verb[1] as usize, 4, "alternatives")? {
                alternatives.push(AltEntry {
                    parameter: alt[0] as usize,
                    qualifier: Qualifier::from_word(alt[1])?,
                    checks: self.checks(alt[2] as usize)?,
                    action: acode::optional(alt[3]),
                });
            }
            verbs.push(VerbEntry {
                code: verb[0],
                alternatives,
            });
        }
        Ok(verbs)
    }

    fn checks(&self, address: usize) -> Result<Vec<CheckEntry>, LoadError> {
        Ok(self
            .image
            .table(address, 2, "checks")?
            .into_iter()
            .map(|check| CheckEntry {
                expression: acode::optional(check[0]),
                statements: acode::optional(check[1]),
            })
            .collect())
    }

    fn exits(&self, address: usize) -> Result<Vec<ExitEntry>, LoadError> {
        let mut exits = Vec::new();
        for exit in self.image.table(address, 4, "exits")? {
            exits.push(ExitEntry {
                direction: exit[0],
                checks: self.checks(exit[1] as usize)?,
                action: acode::optional(exit[2]),
                target: exit[3] as InstanceId,
            });
        }
        Ok(exits)
    }

    fn references(&self, address: usize) -> Result<Vec<InstanceId>, LoadError> {
        Ok(self
            .image
            .table(address, 1, "references")?
            .into_iter()
            .map(|r| r[0] as InstanceId)
            .collect())
    }

    fn dictionary(&self, address: usize) -> Result<Dictionary, LoadError> {
        let mut entries = Vec::new();
        for entry in self.image.table(address, 6, "dictionary")? {
            entries.push(DictionaryEntry {
                word: self.image.string(entry[0] as usize)?,
                code: entry[1],
                classes: WordClasses::from_bits(entry[2]),
                adjective_refs: self.references(entry[3] as usize)?,
                noun_refs: self.references(entry[4] as usize)?,
                pronoun_refs: self.references(entry[5] as usize)?,
            });
        }
        Ok(Dictionary::new(entries))
    }

    fn syntaxes(&mut self, address: usize) -> Result<Vec<SyntaxEntry>, LoadError> {
        let image = self.image;
        let mut syntaxes = Vec::new();
        for syntax in image.table(address, 2, "syntaxes")? {
            let elements = self.element_table(syntax[1] as usize)?;
            syntaxes.push(SyntaxEntry {
                verb: syntax[0],
                elements,
            });
        }
        Ok(syntaxes)
    }

    /// Decode the element table at `address` and every table reachable from it.
    /// Tables are visited with an explicit work list so deep grammars don't recurse.
    fn element_table(&mut self, address: usize) -> Result<usize, LoadError> {
        if let Some(index) = self.element_tables.get(&address) {
            return Ok(*index);
        }
        let image = self.image;
        let root = self.reserve(address);
        let mut pending = vec![address];

        while let Some(current) = pending.pop() {
            let mut elements = Vec::new();
            for element in image.table(current, 3, "elements")? {
                let decoded = match element[0] {
                    0 => Element::Parameter {
                        flags: ParameterFlags::from_bits(element[1]),
                        next: self.table_index(element[2] as usize, &mut pending),
                    },
                    acode::EOS => Element::EndOfSyntax {
                        syntax: element[1],
                        restrictions: self.restrictions(element[2] as usize)?,
                    },
                    code => Element::Word {
                        code,
                        next: self.table_index(element[2] as usize, &mut pending),
                    },
                };
                elements.push(decoded);
            }
            let index = self.element_tables[&current];
            self.decoded[index] = elements;
        }
        Ok(root)
    }

    fn table_index(&mut self, address: usize, pending: &mut Vec<usize>) -> usize {
        match self.element_tables.get(&address) {
            Some(index) => *index,
            None => {
                pending.push(address);
                self.reserve(address)
            }
        }
    }

    fn reserve(&mut self, address: usize) -> usize {
        let index = self.decoded.len();
        self.decoded.push(Vec::new());
        self.element_tables.insert(address, index);
        index
    }

    fn restrictions(&self, address: usize) -> Result<Vec<Restriction>, LoadError> {
        Ok(self
            .image
            .table(address, 3, "restrictions")?
            .into_iter()
            .map(|r| Restriction {
                parameter: r[0] as usize,
                class: RestrictionClass::from_word(r[1]),
                statements: acode::optional(r[2]),
            })
            .collect())
    }

    fn parameter_maps(&self, address: usize) -> Result<Vec<ParameterMap>, LoadError> {
        let mut maps = Vec::new();
        for map in self.image.table(address, 3, "parameter maps")? {
            let mapping = self
                .image
                .table(map[1] as usize, 1, "parameter mapping")?
                .into_iter()
                .map(|m| m[0] as usize)
                .collect();
            maps.push(ParameterMap {
                syntax: map[0],
                mapping,
                verb: map[2],
            });
        }
        Ok(maps)
    }
}

impl fmt::Display for Story {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} classes, {} instances, hero: {}",
            self.classes.len(),
            self.instances.len(),
            self.instance_name(self.hero)
        )?;
        writeln!(f, "Syntax trees:")?;
        for syntax in &self.syntaxes {
            let verb = self
                .dictionary
                .word_for_code(syntax.verb, WordClasses::VERB)
                .unwrap_or("?");
            writeln!(f, "  {} ({}):", verb, syntax.verb)?;
            self.fmt_elements(f, syntax.elements, 2, &mut Vec::new())?;
        }
        Ok(())
    }
}

impl Story {
    fn fmt_elements(
        &self,
        f: &mut fmt::Formatter,
        table: usize,
        depth: usize,
        visiting: &mut Vec<usize>,
    ) -> fmt::Result {
        if visiting.contains(&table) {
            return writeln!(f, "{:indent$}...", "", indent = depth * 2);
        }
        visiting.push(table);
        for element in self.element_table(table) {
            match element {
                Element::Word { code, next } => {
                    let word = self
                        .dictionary
                        .word_for_code(*code, WordClasses::PREPOSITION)
                        .unwrap_or("?");
                    writeln!(f, "{:indent$}'{}'", "", word, indent = depth * 2)?;
                    self.fmt_elements(f, *next, depth + 1, visiting)?;
                }
                Element::Parameter { flags, next } => {
                    writeln!(
                        f,
                        "{:indent$}(parameter{}{})",
                        "",
                        if flags.multiple { " *" } else { "" },
                        if flags.omnipotent { " !" } else { "" },
                        indent = depth * 2
                    )?;
                    self.fmt_elements(f, *next, depth + 1, visiting)?;
                }
                Element::EndOfSyntax {
                    syntax,
                    restrictions,
                } => {
                    write!(f, "{:indent$}<syntax {}>", "", syntax, indent = depth * 2)?;
                    for r in restrictions {
                        match r.class {
                            RestrictionClass::Class(c) => {
                                write!(f, " #{} isa {}", r.parameter, self.class_name(c))?
                            }
                            other => write!(f, " #{} isa {:?}", r.parameter, other)?,
                        }
                    }
                    writeln!(f)?;
                }
            }
        }
        visiting.pop();
        Ok(())
    }
}
