#[cfg(test)]
mod tests {
    use crate::dictionary::WordClasses;
    use crate::dispatch::{action, execute_command, find_alternatives, possible, Dispatch, Scope};
    use crate::error::CommandError;
    use crate::story::{CheckEntry, ClassId, InstanceId, Qualifier, Story, WordCode};
    use crate::testing::{checks_only, does, for_parameter, with_check, Harness, StoryBuilder};
    use crate::words::Literal;
    use crate::world::World;
    use pretty_assertions::assert_eq;
    use test_log::test;

    struct Fixture {
        story: Story,
        hall: InstanceId,
        sword: InstanceId,
        lamp: InstanceId,
        weapon: ClassId,
        take: WordCode,
    }

    /// A sword (a weapon) and a lamp in the hall, and a "take" alternative at
    /// every scope the sword can be taken from. `weapon_take` picks the
    /// weapon class's alternative.
    fn fixture(weapon_take: Qualifier) -> Fixture {
        let mut b = StoryBuilder::new();
        let predefined = b.predefined();
        let weapon = b.class("weapon", predefined.object);
        let hall = b.location("hall");
        b.hero(hall);
        let sword = b.instance("sword", weapon, hall);
        let lamp = b.object("lamp", hall);
        b.global_verb("take", does(Qualifier::Default, 10));
        b.class_verb(predefined.location, "take", does(Qualifier::After, 21));
        b.instance_verb(hall, "take", does(Qualifier::Default, 22));
        b.class_verb(predefined.object, "take", does(Qualifier::Default, 30));
        b.class_verb(weapon, "take", does(weapon_take, 31));
        b.instance_verb(sword, "take", does(Qualifier::Default, 32));
        let take = b.word("take", WordClasses::VERB);
        Fixture {
            story: b.build(),
            hall,
            sword,
            lamp,
            weapon,
            take,
        }
    }

    #[test]
    fn alternatives_outermost_first() {
        let f = fixture(Qualifier::Before);
        let h = Harness::new(&f.story);
        let alternatives = find_alternatives(&f.story, &h.world, f.take, &[f.sword]);
        let found: Vec<(Scope, InstanceId, ClassId)> = alternatives
            .iter()
            .map(|a| (a.scope, a.instance, a.class))
            .collect();
        let predefined = f.story.predefined;
        assert_eq!(
            found,
            vec![
                (Scope::Global, 0, 0),
                (Scope::Location, f.hall, predefined.location),
                (Scope::Location, f.hall, 0),
                (Scope::Parameter(1), f.sword, predefined.object),
                (Scope::Parameter(1), f.sword, f.weapon),
                (Scope::Parameter(1), f.sword, 0),
            ]
        );
        assert_eq!(
            alternatives[4].to_string(),
            format!("in parameter #1, inherited from class {}", f.weapon)
        );
        assert_eq!(alternatives[0].to_string(), "GLOBAL");
    }

    #[test]
    fn three_passes() {
        let f = fixture(Qualifier::Before);
        let mut h = Harness::new(&f.story);
        let result = execute_command(&mut h.runtime(), f.take, &[f.sword]);
        assert_eq!(result, Ok(Dispatch::Completed));
        // BEFORE inside out, then the rest outside in, AFTER last
        assert_eq!(h.interpreter.bodies(), vec![31, 10, 22, 30, 32, 21]);
        let instances: Vec<InstanceId> = h.interpreter.executed.iter().map(|e| e.instance).collect();
        assert_eq!(instances, vec![f.sword, 0, f.hall, f.sword, f.sword, f.hall]);
    }

    #[test]
    fn only_ends_the_command() {
        let f = fixture(Qualifier::Only);
        let mut h = Harness::new(&f.story);
        let result = execute_command(&mut h.runtime(), f.take, &[f.sword]);
        assert_eq!(result, Ok(Dispatch::Completed));
        assert_eq!(h.interpreter.bodies(), vec![31]);
    }

    #[test]
    fn failing_body_skips_the_rest() {
        let f = fixture(Qualifier::Before);
        let mut h = Harness::new(&f.story);
        h.interpreter.fails(10);
        let result = execute_command(&mut h.runtime(), f.take, &[f.sword]);
        assert_eq!(result, Ok(Dispatch::Failed));
        assert_eq!(h.interpreter.bodies(), vec![31, 10]);
    }

    #[test]
    fn failing_check_runs_its_statements_only() {
        let mut b = StoryBuilder::new();
        let object = b.predefined().object;
        let hall = b.location("hall");
        b.hero(hall);
        let lamp = b.object("lamp", hall);
        b.global_verb("light", does(Qualifier::Default, 10));
        b.class_verb(object, "light", with_check(does(Qualifier::Default, 30), 900, Some(901)));
        let light = b.word("light", WordClasses::VERB);
        let story = b.build();

        let mut h = Harness::new(&story);
        h.interpreter.check_result(900, false);
        let result = execute_command(&mut h.runtime(), light, &[lamp]);
        assert_eq!(result, Ok(Dispatch::CheckFailed));
        assert_eq!(h.interpreter.evaluated, vec![900]);
        assert_eq!(h.interpreter.bodies(), vec![901]);
    }

    #[test]
    fn check_without_expression_fails() {
        let mut b = StoryBuilder::new();
        let hall = b.location("hall");
        b.hero(hall);
        let lamp = b.object("lamp", hall);
        let mut alternative = does(Qualifier::Default, 10);
        alternative.checks.push(CheckEntry {
            expression: None,
            statements: Some(902),
        });
        b.instance_verb(lamp, "rub", alternative);
        let rub = b.word("rub", WordClasses::VERB);
        let story = b.build();

        let mut h = Harness::new(&story);
        let result = execute_command(&mut h.runtime(), rub, &[lamp]);
        assert_eq!(result, Ok(Dispatch::CheckFailed));
        assert_eq!(h.interpreter.bodies(), vec![902]);
    }

    #[test]
    fn nothing_to_execute() {
        let mut b = StoryBuilder::new();
        let hall = b.location("hall");
        b.hero(hall);
        let lamp = b.object("lamp", hall);
        b.global_verb("examine", checks_only(Vec::new()));
        let examine = b.word("examine", WordClasses::VERB);
        let sing = b.word("sing", WordClasses::VERB);
        let story = b.build();

        let mut h = Harness::new(&story);
        assert_eq!(
            execute_command(&mut h.runtime(), examine, &[lamp]),
            Err(CommandError::Infeasible)
        );
        assert_eq!(execute_command(&mut h.runtime(), sing, &[]), Err(CommandError::Infeasible));
    }

    #[test]
    fn alternative_for_one_parameter() {
        let mut b = StoryBuilder::new();
        let object = b.predefined().object;
        let hall = b.location("hall");
        b.hero(hall);
        let coin = b.object("coin", hall);
        let slot = b.object("slot", hall);
        b.class_verb(object, "insert", for_parameter(does(Qualifier::Default, 40), 2));
        let insert = b.word("insert", WordClasses::VERB);
        let story = b.build();

        let mut h = Harness::new(&story);
        let result = execute_command(&mut h.runtime(), insert, &[coin, slot]);
        assert_eq!(result, Ok(Dispatch::Completed));
        assert_eq!(h.interpreter.bodies(), vec![40]);
        assert_eq!(h.interpreter.executed[0].instance, slot);
    }

    #[test]
    fn literal_parameters_use_their_class() {
        let mut b = StoryBuilder::new();
        let integer = b.predefined().integer;
        let hall = b.location("hall");
        b.hero(hall);
        b.class_verb(integer, "count", does(Qualifier::Default, 60));
        let count = b.word("count", WordClasses::VERB);
        let story = b.build();

        let mut h = Harness::new(&story);
        let three = h.world.create_literal(Literal::Integer(3));
        let result = execute_command(&mut h.runtime(), count, &[three]);
        assert_eq!(result, Ok(Dispatch::Completed));
        assert_eq!(h.interpreter.executed[0].parameters, vec![three]);
        assert_eq!(h.interpreter.executed[0].instance, three);
    }

    #[test]
    fn possible_executes_nothing() {
        let mut b = StoryBuilder::new();
        let object = b.predefined().object;
        let hall = b.location("hall");
        b.hero(hall);
        let lamp = b.object("lamp", hall);
        b.class_verb(object, "light", with_check(does(Qualifier::Default, 30), 900, Some(901)));
        let light = b.word("light", WordClasses::VERB);
        let story = b.build();

        let mut h = Harness::new(&story);
        assert!(possible(&mut h.runtime(), light, &[lamp]));
        h.interpreter.check_result(900, false);
        assert!(!possible(&mut h.runtime(), light, &[lamp]));
        assert_eq!(h.interpreter.evaluated, vec![900, 900]);
        assert!(h.interpreter.executed.is_empty());
        assert_eq!(h.output.text(), "");
    }

    #[test]
    fn each_target_is_dispatched() {
        let f = fixture(Qualifier::Before);
        let mut h = Harness::new(&f.story);
        h.interpreter.prints(10, "Taken.");
        let targets = [f.sword, f.lamp];
        let result = action(&mut h.runtime(), f.take, &[0], Some((0, &targets[..])));
        assert_eq!(result, Ok(Dispatch::Completed));
        assert_eq!(h.output.take(), "(sword) Taken.\n\n(lamp) Taken.");
        let swords = h.interpreter.executed.iter().filter(|e| e.parameters == vec![f.sword]).count();
        let lamps = h.interpreter.executed.iter().filter(|e| e.parameters == vec![f.lamp]).count();
        assert_eq!((swords, lamps), (6, 4));
    }

    #[test]
    fn single_target_has_no_marker() {
        let f = fixture(Qualifier::Before);
        let mut h = Harness::new(&f.story);
        h.interpreter.prints(10, "Taken.");
        let targets = [f.lamp];
        action(&mut h.runtime(), f.take, &[0], Some((0, &targets[..]))).unwrap();
        assert_eq!(h.output.take(), "Taken.");
        assert_eq!(h.interpreter.executed[0].parameters, vec![f.lamp]);
    }

    #[test]
    fn failing_target_does_not_stop_the_others() {
        let mut b = StoryBuilder::new();
        let hall = b.location("hall");
        b.hero(hall);
        let rock = b.object("rock", hall);
        let wand = b.object("wand", hall);
        b.instance_verb(wand, "wave", does(Qualifier::Default, 70));
        let wave = b.word("wave", WordClasses::VERB);
        let story = b.build();

        let mut h = Harness::new(&story);
        h.interpreter.prints(70, "Sparkles fly.");
        let targets = [rock, wand];
        action(&mut h.runtime(), wave, &[0], Some((0, &targets[..]))).unwrap();
        assert_eq!(h.output.take(), "(rock) You can't do that.\n\n(wand) Sparkles fly.");
    }
}
