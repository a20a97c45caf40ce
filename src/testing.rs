// Test support
//
// StoryBuilder assembles a Story in memory, without going through an image.
// RecordingInterpreter stands in for the statement executor: checks answer
// from a table, executed bodies are recorded and may be scripted to print,
// move things or fail. Harness ties them together with a GameState.

use crate::command::{interpret_line, Session};
use crate::config::TraceConfig;
use crate::dictionary::{DictionaryEntry, WordClasses};
use crate::error::RuntimeFailure;
use crate::interpret::{Environment, Interpreter};
use crate::output::{MessageTable, Transcript};
use crate::runtime::Runtime;
use crate::story::{
    AltEntry, CheckEntry, ClassEntry, ClassId, CodeAddr, Element, ExitEntry, InstanceEntry, InstanceId,
    ParameterFlags, ParameterMap, PredefinedClasses, Qualifier, Restriction, RestrictionClass, Story,
    SyntaxEntry, VerbEntry, WordCode,
};
use crate::world::GameState;
use indexmap::IndexMap;

/// One step of a syntax being declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Parameter,
    Multiple,
    Omnipotent,
    MultipleOmnipotent,
    Word(&'static str),
}

impl Pattern {
    fn flags(&self) -> ParameterFlags {
        ParameterFlags {
            multiple: matches!(self, Pattern::Multiple | Pattern::MultipleOmnipotent),
            omnipotent: matches!(self, Pattern::Omnipotent | Pattern::MultipleOmnipotent),
        }
    }
}

pub const OPAQUE: u32 = 1;

pub struct StoryBuilder {
    story: Story,
    next_syntax: u32,
}

impl Default for StoryBuilder {
    fn default() -> Self {
        StoryBuilder::new()
    }
}

impl StoryBuilder {
    /// A story with the predefined class hierarchy and nothing else
    pub fn new() -> Self {
        let mut builder = StoryBuilder {
            story: Story::default(),
            next_syntax: 1,
        };
        let entity = builder.class("entity", 0);
        let thing = builder.class("thing", entity);
        let object = builder.class("object", thing);
        let location = builder.class("location", entity);
        let actor = builder.class("actor", thing);
        let literal = builder.class("literal", entity);
        let integer = builder.class("integer", literal);
        let string = builder.class("string", literal);
        builder.story.predefined = PredefinedClasses {
            entity,
            thing,
            object,
            location,
            actor,
            literal,
            integer,
            string,
        };
        builder.story.opaque_attribute = OPAQUE;
        builder
    }

    pub fn predefined(&self) -> PredefinedClasses {
        self.story.predefined
    }

    pub fn class(&mut self, name: &str, parent: ClassId) -> ClassId {
        let code = self.story.classes.len() + 1;
        self.story.classes.push(ClassEntry {
            code,
            name: name.to_string(),
            parent,
            verbs: Vec::new(),
        });
        code
    }

    pub fn instance(&mut self, name: &str, class: ClassId, location: InstanceId) -> InstanceId {
        let code = self.story.instances.len() + 1;
        self.story.instances.push(InstanceEntry {
            code,
            name: name.to_string(),
            parent: class,
            location,
            container: 0,
            attributes: IndexMap::new(),
            verbs: Vec::new(),
            exits: Vec::new(),
        });
        code
    }

    pub fn location(&mut self, name: &str) -> InstanceId {
        let class = self.story.predefined.location;
        self.instance(name, class, 0)
    }

    pub fn object(&mut self, name: &str, location: InstanceId) -> InstanceId {
        let class = self.story.predefined.object;
        self.instance(name, class, location)
    }

    /// Create the hero in `location`
    pub fn hero(&mut self, location: InstanceId) -> InstanceId {
        let class = self.story.predefined.actor;
        let hero = self.instance("hero", class, location);
        self.story.hero = hero;
        hero
    }

    pub fn container(&mut self, instance: InstanceId) -> &mut Self {
        if let Some(entry) = self.instance_mut(instance) {
            entry.container = 1;
        }
        self
    }

    pub fn opaque(&mut self, instance: InstanceId) -> &mut Self {
        self.attribute(instance, OPAQUE, 1)
    }

    pub fn attribute(&mut self, instance: InstanceId, attribute: u32, value: i64) -> &mut Self {
        if let Some(entry) = self.instance_mut(instance) {
            entry.attributes.insert(attribute, value);
        }
        self
    }

    fn instance_mut(&mut self, instance: InstanceId) -> Option<&mut InstanceEntry> {
        instance
            .checked_sub(1)
            .and_then(|i| self.story.instances.get_mut(i))
    }

    /// Add `classes` to `word`, creating it with the next code if needed
    pub fn word(&mut self, word: &str, classes: WordClasses) -> WordCode {
        let dictionary = &mut self.story.dictionary;
        match dictionary.lookup(word).and_then(|i| dictionary.entry_mut(i)) {
            Some(entry) => {
                entry.classes = entry.classes | classes;
                entry.code
            }
            None => {
                let code = dictionary.len() as WordCode + 1;
                dictionary.push(DictionaryEntry::new(word, code, classes));
                code
            }
        }
    }

    fn refer(&mut self, word: &str, classes: WordClasses, instances: &[InstanceId]) -> WordCode {
        let code = self.word(word, classes);
        let dictionary = &mut self.story.dictionary;
        if let Some(entry) = dictionary.lookup(word).and_then(|i| dictionary.entry_mut(i)) {
            let references = if classes == WordClasses::NOUN {
                &mut entry.noun_refs
            } else if classes == WordClasses::ADJECTIVE {
                &mut entry.adjective_refs
            } else {
                &mut entry.pronoun_refs
            };
            references.extend_from_slice(instances);
        }
        code
    }

    pub fn noun(&mut self, word: &str, instances: &[InstanceId]) -> WordCode {
        self.refer(word, WordClasses::NOUN, instances)
    }

    pub fn adjective(&mut self, word: &str, instances: &[InstanceId]) -> WordCode {
        self.refer(word, WordClasses::ADJECTIVE, instances)
    }

    pub fn pronoun(&mut self, word: &str, instances: &[InstanceId]) -> WordCode {
        self.refer(word, WordClasses::PRONOUN, instances)
    }

    /// The usual function words: all, except, and, them
    pub fn function_words(&mut self) -> &mut Self {
        self.word("all", WordClasses::ALL);
        self.word("everything", WordClasses::ALL);
        self.word("except", WordClasses::EXCEPT);
        self.word("but", WordClasses::EXCEPT);
        self.word("and", WordClasses::CONJUNCTION);
        self.word(",", WordClasses::CONJUNCTION);
        self.word("them", WordClasses::THEM);
        self.word("the", WordClasses::NOISE);
        self
    }

    /// Declare a syntax for `verb`, sharing the tree with earlier syntaxes of
    /// the same verb. Gets an identity parameter map dispatching `verb`.
    pub fn syntax(&mut self, verb: &str, pattern: &[Pattern]) -> u32 {
        let verb_code = self.word(verb, WordClasses::VERB);
        let mut table = match self.story.syntax_for_verb(verb_code) {
            Some(syntax) => syntax.elements,
            None => {
                let root = self.new_table();
                self.story.syntaxes.push(SyntaxEntry {
                    verb: verb_code,
                    elements: root,
                });
                root
            }
        };

        let mut parameters = 0;
        for step in pattern {
            table = match *step {
                Pattern::Word(word) => {
                    let code = self.word(word, WordClasses::PREPOSITION);
                    self.word_edge(table, code)
                }
                parameter => {
                    parameters += 1;
                    self.parameter_edge(table, parameter.flags())
                }
            };
        }

        let syntax = self.next_syntax;
        self.next_syntax += 1;
        self.story.element_tables[table].push(Element::EndOfSyntax {
            syntax,
            restrictions: Vec::new(),
        });
        self.story.parameter_maps.push(ParameterMap {
            syntax,
            verb: verb_code,
            mapping: (1..=parameters).collect(),
        });
        syntax
    }

    /// Dispatch `syntax` to `verb` with its parameters reordered by `mapping`
    pub fn parameter_map(&mut self, syntax: u32, verb: &str, mapping: &[usize]) -> &mut Self {
        let verb = self.word(verb, WordClasses::VERB);
        if let Some(map) = self.story.parameter_maps.iter_mut().find(|m| m.syntax == syntax) {
            map.verb = verb;
            map.mapping = mapping.to_vec();
        }
        self
    }

    pub fn restrict(
        &mut self,
        syntax: u32,
        parameter: usize,
        class: RestrictionClass,
        statements: Option<CodeAddr>,
    ) -> &mut Self {
        for table in self.story.element_tables.iter_mut() {
            for element in table.iter_mut() {
                if let Element::EndOfSyntax {
                    syntax: s,
                    restrictions,
                } = element
                {
                    if *s == syntax {
                        restrictions.push(Restriction {
                            parameter,
                            class,
                            statements,
                        });
                    }
                }
            }
        }
        self
    }

    fn new_table(&mut self) -> usize {
        self.story.element_tables.push(Vec::new());
        self.story.element_tables.len() - 1
    }

    fn parameter_edge(&mut self, table: usize, flags: ParameterFlags) -> usize {
        let existing = self.story.element_tables[table].iter().find_map(|e| match e {
            Element::Parameter { flags: f, next } if *f == flags => Some(*next),
            _ => None,
        });
        existing.unwrap_or_else(|| {
            let next = self.new_table();
            self.story.element_tables[table].push(Element::Parameter { flags, next });
            next
        })
    }

    fn word_edge(&mut self, table: usize, code: WordCode) -> usize {
        let existing = self.story.element_tables[table].iter().find_map(|e| match e {
            Element::Word { code: c, next } if *c == code => Some(*next),
            _ => None,
        });
        existing.unwrap_or_else(|| {
            let next = self.new_table();
            self.story.element_tables[table].push(Element::Word { code, next });
            next
        })
    }

    fn verb_code(&mut self, verb: &str) -> WordCode {
        self.word(verb, WordClasses::VERB)
    }

    pub fn global_verb(&mut self, verb: &str, alternative: AltEntry) -> &mut Self {
        let code = self.verb_code(verb);
        add_alternative(&mut self.story.global_verbs, code, alternative);
        self
    }

    pub fn class_verb(&mut self, class: ClassId, verb: &str, alternative: AltEntry) -> &mut Self {
        let code = self.verb_code(verb);
        if let Some(entry) = class.checked_sub(1).and_then(|i| self.story.classes.get_mut(i)) {
            add_alternative(&mut entry.verbs, code, alternative);
        }
        self
    }

    pub fn instance_verb(&mut self, instance: InstanceId, verb: &str, alternative: AltEntry) -> &mut Self {
        let code = self.verb_code(verb);
        if let Some(entry) = self.instance_mut(instance) {
            add_alternative(&mut entry.verbs, code, alternative);
        }
        self
    }

    pub fn exit(&mut self, from: InstanceId, direction: &str, target: InstanceId) -> &mut Self {
        self.exit_with(from, direction, target, Vec::new(), None)
    }

    pub fn exit_with(
        &mut self,
        from: InstanceId,
        direction: &str,
        target: InstanceId,
        checks: Vec<CheckEntry>,
        action: Option<CodeAddr>,
    ) -> &mut Self {
        let direction = self.word(direction, WordClasses::DIRECTION);
        if let Some(entry) = self.instance_mut(from) {
            entry.exits.push(ExitEntry {
                direction,
                checks,
                action,
                target,
            });
        }
        self
    }

    pub fn build(&self) -> Story {
        self.story.clone()
    }
}

fn add_alternative(verbs: &mut Vec<VerbEntry>, code: WordCode, alternative: AltEntry) {
    match verbs.iter_mut().find(|v| v.code == code) {
        Some(verb) => verb.alternatives.push(alternative),
        None => verbs.push(VerbEntry {
            code,
            alternatives: vec![alternative],
        }),
    }
}

/// An alternative for any parameter running `action`
pub fn does(qualifier: Qualifier, action: CodeAddr) -> AltEntry {
    AltEntry {
        parameter: 0,
        qualifier,
        checks: Vec::new(),
        action: Some(action),
    }
}

/// An alternative with only checks and no action
pub fn checks_only(checks: Vec<CheckEntry>) -> AltEntry {
    AltEntry {
        parameter: 0,
        qualifier: Qualifier::Default,
        checks,
        action: None,
    }
}

pub fn for_parameter(mut alternative: AltEntry, parameter: usize) -> AltEntry {
    alternative.parameter = parameter;
    alternative
}

pub fn with_check(mut alternative: AltEntry, expression: CodeAddr, statements: Option<CodeAddr>) -> AltEntry {
    alternative.checks.push(check(expression, statements));
    alternative
}

pub fn check(expression: CodeAddr, statements: Option<CodeAddr>) -> CheckEntry {
    CheckEntry {
        expression: Some(expression),
        statements,
    }
}

/// One executed body and what it could see
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub statements: CodeAddr,
    pub parameters: Vec<InstanceId>,
    pub instance: InstanceId,
}

/// Scripted statement executor
#[derive(Debug, Default)]
pub struct RecordingInterpreter {
    /// Results of CHECK expressions, true when not listed
    pub checks: IndexMap<CodeAddr, bool>,
    /// Bodies that signal failure when executed
    pub failing: Vec<CodeAddr>,
    /// Text printed by bodies
    pub prints: IndexMap<CodeAddr, String>,
    /// Bodies that move an instance somewhere
    pub moves: IndexMap<CodeAddr, (InstanceId, InstanceId)>,
    pub evaluated: Vec<CodeAddr>,
    pub executed: Vec<Execution>,
}

impl RecordingInterpreter {
    pub fn check_result(&mut self, expression: CodeAddr, result: bool) -> &mut Self {
        self.checks.insert(expression, result);
        self
    }

    pub fn prints(&mut self, statements: CodeAddr, text: &str) -> &mut Self {
        self.prints.insert(statements, text.to_string());
        self
    }

    pub fn fails(&mut self, statements: CodeAddr) -> &mut Self {
        self.failing.push(statements);
        self
    }

    pub fn moves(&mut self, statements: CodeAddr, instance: InstanceId, destination: InstanceId) -> &mut Self {
        self.moves.insert(statements, (instance, destination));
        self
    }

    /// Addresses of the executed bodies in order
    pub fn bodies(&self) -> Vec<CodeAddr> {
        self.executed.iter().map(|e| e.statements).collect()
    }

    pub fn clear(&mut self) {
        self.evaluated.clear();
        self.executed.clear();
    }
}

impl Interpreter for RecordingInterpreter {
    fn evaluate(&mut self, expression: CodeAddr, _env: &mut Environment<'_>) -> Result<bool, RuntimeFailure> {
        self.evaluated.push(expression);
        Ok(self.checks.get(&expression).copied().unwrap_or(true))
    }

    fn execute(&mut self, statements: CodeAddr, env: &mut Environment<'_>) -> Result<(), RuntimeFailure> {
        self.executed.push(Execution {
            statements,
            parameters: env.context.parameters.clone(),
            instance: env.context.instance,
        });
        if let Some(text) = self.prints.get(&statements) {
            env.output.print(text);
        }
        if let Some((instance, destination)) = self.moves.get(&statements) {
            env.world.locate(*instance, *destination);
        }
        if self.failing.contains(&statements) {
            return Err(RuntimeFailure::Failed);
        }
        Ok(())
    }
}

/// A story being played with a recording interpreter
pub struct Harness<'s> {
    pub story: &'s Story,
    pub world: GameState<'s>,
    pub interpreter: RecordingInterpreter,
    pub output: Transcript,
    pub session: Session,
    pub trace: TraceConfig,
}

impl<'s> Harness<'s> {
    pub fn new(story: &'s Story) -> Self {
        Harness {
            story,
            world: GameState::new(story),
            interpreter: RecordingInterpreter::default(),
            output: Transcript::new(story, MessageTable::default()),
            session: Session::new(),
            trace: TraceConfig::default(),
        }
    }

    pub fn runtime(&mut self) -> Runtime<'_> {
        Runtime::new(self.story, &mut self.world, &mut self.interpreter, &mut self.output).with_trace(self.trace)
    }

    /// Run a line and return what the player was told
    pub fn play(&mut self, line: &str) -> String {
        let mut rt = Runtime::new(self.story, &mut self.world, &mut self.interpreter, &mut self.output)
            .with_trace(self.trace);
        interpret_line(&mut rt, &mut self.session, line);
        self.output.take()
    }
}
