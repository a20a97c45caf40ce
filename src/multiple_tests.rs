#[cfg(test)]
mod tests {
    use crate::command::{parse_command, ParsedCommand};
    use crate::error::CommandError;
    use crate::multiple::{multiple_position, parameter_vector};
    use crate::parameter::{Parameter, ParameterPosition};
    use crate::scan::scan;
    use crate::story::{InstanceId, Qualifier, Story};
    use crate::testing::{check, checks_only, does, Harness, Pattern, StoryBuilder};
    use crate::words::Words;
    use pretty_assertions::assert_eq;
    use test_log::test;

    struct Fixture {
        story: Story,
        sword: InstanceId,
        shield: InstanceId,
        lamp: InstanceId,
        key: InstanceId,
    }

    fn fixture() -> Fixture {
        build(false)
    }

    /// With `guarded_lamp` the lamp can only be taken when check 500 holds
    fn build(guarded_lamp: bool) -> Fixture {
        let mut b = StoryBuilder::new();
        b.function_words();
        let object = b.predefined().object;
        let actor = b.predefined().actor;
        let hall = b.location("hall");
        let cellar = b.location("cellar");
        b.hero(hall);
        let sword = b.object("sword", hall);
        let shield = b.object("shield", hall);
        let lamp = b.object("lamp", hall);
        let key = b.object("key", hall);
        let troll = b.instance("troll", actor, hall);
        let barrel = b.object("barrel", cellar);
        for (word, instance) in [
            ("sword", sword),
            ("shield", shield),
            ("lamp", lamp),
            ("key", key),
            ("troll", troll),
            ("barrel", barrel),
        ] {
            b.noun(word, &[instance]);
        }

        b.syntax("take", &[Pattern::Multiple]);
        b.syntax("drop", &[Pattern::Multiple]);
        b.syntax("put", &[Pattern::Multiple, Pattern::Word("in"), Pattern::Multiple]);
        b.class_verb(object, "take", does(Qualifier::Default, 100));
        b.class_verb(object, "put", does(Qualifier::Default, 200));
        if guarded_lamp {
            b.instance_verb(lamp, "take", checks_only(vec![check(500, Some(501))]));
        }
        Fixture {
            story: b.build(),
            sword,
            shield,
            lamp,
            key,
        }
    }

    fn parse(h: &mut Harness, line: &str) -> Result<ParsedCommand, CommandError> {
        let memory = h.session.memory.clone();
        let story = h.story;
        let mut rt = h.runtime();
        let scanned = scan(line, &story.dictionary, &mut *rt.world).unwrap();
        let words = Words::new(&scanned, &story.dictionary);
        let mut cursor = 0;
        parse_command(&mut rt, &memory, words, &mut cursor)
    }

    fn targets(command: &ParsedCommand) -> Vec<InstanceId> {
        command
            .multiple
            .as_ref()
            .map(|(_, targets)| targets.clone())
            .unwrap_or_default()
    }

    #[test]
    fn vector_has_zero_in_multiple_slot() {
        let mut single = ParameterPosition::default();
        single.parameters.push(Parameter::resolved(7, 1));
        let mut multiple = ParameterPosition::default();
        multiple.parameters.push(Parameter::resolved(3, 3));
        multiple.parameters.push(Parameter::resolved(4, 5));
        multiple.explicit_multiple = true;

        let positions = vec![single.clone(), multiple.clone()];
        assert_eq!(parameter_vector(&positions), vec![7, 0]);
        assert_eq!(multiple_position(&positions), Ok(Some(1)));
        assert_eq!(multiple_position(&[single.clone()]), Ok(None));
        assert_eq!(
            multiple_position(&[multiple.clone(), single, multiple]),
            Err(CommandError::MultipleNotAllowed)
        );
    }

    #[test]
    fn all_keeps_what_the_verb_applies_to() {
        let f = fixture();
        let mut h = Harness::new(&f.story);
        let command = parse(&mut h, "take all").unwrap();
        assert_eq!(command.parameters, vec![0]);
        // Neither the hero nor the troll can be taken, the barrel is elsewhere
        assert_eq!(targets(&command), vec![f.sword, f.shield, f.lamp, f.key]);
        assert!(h.interpreter.executed.is_empty());
    }

    #[test]
    fn all_except() {
        let f = fixture();
        let mut h = Harness::new(&f.story);
        let command = parse(&mut h, "take everything except the sword and shield").unwrap();
        assert_eq!(targets(&command), vec![f.lamp, f.key]);
    }

    #[test]
    fn exceptions_leave_nothing() {
        let f = fixture();
        let mut h = Harness::new(&f.story);
        assert_eq!(
            parse(&mut h, "take all but sword, shield, lamp and key"),
            Err(CommandError::NotMuch)
        );
    }

    #[test]
    fn all_with_nothing_feasible() {
        let f = fixture();
        let mut h = Harness::new(&f.story);
        assert_eq!(parse(&mut h, "drop all"), Err(CommandError::NoSuch("all".to_string())));
        assert_eq!(h.play("drop all"), "I can't see any all here.");
        assert!(h.interpreter.executed.is_empty());
    }

    #[test]
    fn failing_check_excludes_from_all_silently() {
        let f = build(true);
        let mut h = Harness::new(&f.story);
        h.interpreter.check_result(500, false);
        let command = parse(&mut h, "take all").unwrap();
        assert_eq!(targets(&command), vec![f.sword, f.shield, f.key]);
        assert!(h.interpreter.evaluated.contains(&500));
        assert!(h.interpreter.executed.is_empty());
        assert_eq!(h.output.text(), "");
    }

    #[test]
    fn explicit_list() {
        let f = fixture();
        let mut h = Harness::new(&f.story);
        let command = parse(&mut h, "take sword and shield").unwrap();
        assert_eq!(command.parameters, vec![0]);
        assert_eq!(command.multiple, Some((0, vec![f.sword, f.shield])));
    }

    #[test]
    fn two_multiple_positions() {
        let f = fixture();
        let mut h = Harness::new(&f.story);
        assert_eq!(
            parse(&mut h, "put sword and shield in lamp and key"),
            Err(CommandError::MultipleNotAllowed)
        );
    }
}
