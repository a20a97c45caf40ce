//! Direction commands moving the hero through exits

use alanrun::dictionary::WordClasses;
use alanrun::story::{InstanceId, Qualifier, Story};
use alanrun::testing::{check, does, Harness, Pattern, StoryBuilder};
use alanrun::world::World;
use pretty_assertions::assert_eq;
use test_log::test;

struct Map {
    story: Story,
    hall: InstanceId,
    garden: InstanceId,
    cellar: InstanceId,
    hero: InstanceId,
}

/// hall --north--> garden --south--> hall
/// hall --east--> garden, behind a door checked by expression 10
/// hall --west--> garden, but the action 20 drops the hero into the cellar
/// hall --down--> cellar, with action 30 describing the stairs
fn map() -> Map {
    let mut b = StoryBuilder::new();
    b.function_words();
    let hall = b.location("hall");
    let garden = b.location("garden");
    let cellar = b.location("cellar");
    let hero = b.hero(hall);
    let lamp = b.object("lamp", hall);
    b.noun("lamp", &[lamp]);
    b.pronoun("it", &[lamp]);
    b.syntax("examine", &[Pattern::Parameter]);
    b.global_verb("examine", does(Qualifier::Default, 50));

    b.exit(hall, "north", garden);
    b.exit(garden, "south", hall);
    b.exit_with(hall, "east", garden, vec![check(10, Some(11))], None);
    b.exit_with(hall, "west", garden, Vec::new(), Some(20));
    b.exit_with(hall, "down", cellar, Vec::new(), Some(30));
    b.word("up", WordClasses::DIRECTION);
    Map {
        story: b.build(),
        hall,
        garden,
        cellar,
        hero,
    }
}

#[test]
fn walking_through_exits() {
    let m = map();
    let mut h = Harness::new(&m.story);
    assert_eq!(h.play("north"), "");
    assert_eq!(h.world.current_location(), m.garden);
    assert_eq!(h.play("south"), "");
    assert_eq!(h.world.current_location(), m.hall);
}

#[test]
fn no_exit_that_way() {
    let m = map();
    let mut h = Harness::new(&m.story);
    assert_eq!(h.play("up"), "You can't go that way.");
    assert_eq!(h.world.current_location(), m.hall);
}

#[test]
fn checks_guard_the_exit() {
    let m = map();
    let mut h = Harness::new(&m.story);
    h.interpreter.check_result(10, false).prints(11, "The door is locked.");
    assert_eq!(h.play("east"), "The door is locked.");
    assert_eq!(h.world.current_location(), m.hall);

    h.interpreter.check_result(10, true);
    assert_eq!(h.play("east"), "");
    assert_eq!(h.world.current_location(), m.garden);
}

#[test]
fn exit_action_may_move_the_hero_itself() {
    let m = map();
    let mut h = Harness::new(&m.story);
    h.interpreter.moves(20, m.hero, m.cellar).prints(20, "The floor gives way!");
    assert_eq!(h.play("west"), "The floor gives way!");
    assert_eq!(h.world.current_location(), m.cellar);
}

#[test]
fn exit_action_then_move() {
    let m = map();
    let mut h = Harness::new(&m.story);
    h.interpreter.prints(30, "The stairs creak.");
    assert_eq!(h.play("down"), "The stairs creak.");
    assert_eq!(h.world.current_location(), m.cellar);
    assert_eq!(h.interpreter.executed[0].instance, m.hall);
}

#[test]
fn direction_must_end_the_command() {
    let m = map();
    let mut h = Harness::new(&m.story);
    assert_eq!(h.play("north lamp"), "I don't understand.");
    assert_eq!(h.world.current_location(), m.hall);

    assert_eq!(h.play("north and south"), "");
    assert_eq!(h.world.current_location(), m.hall);
}

#[test]
fn movement_forgets_pronouns() {
    let m = map();
    let mut h = Harness::new(&m.story);
    h.play("examine lamp");
    assert!(!h.session.memory.pronouns().is_empty());
    h.play("north, south");
    assert!(h.session.memory.pronouns().is_empty());
    assert_eq!(h.play("examine it"), "I don't know what you mean by 'it'.");
}
