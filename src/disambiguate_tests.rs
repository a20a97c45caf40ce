#[cfg(test)]
mod tests {
    use crate::disambiguate::{decide, disambiguate, Count, Decision, Resolution};
    use crate::testing::{StoryBuilder, OPAQUE};
    use crate::world::{GameState, World};
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn counts_saturate() {
        assert_eq!(Count::of(0), Count::Zero);
        assert_eq!(Count::of(1), Count::One);
        assert_eq!(Count::of(2), Count::Many);
        assert_eq!(Count::of(17), Count::Many);
    }

    #[test]
    fn decision_table() {
        use Count::*;
        use Decision::*;
        let table = [
            (Zero, Zero, NoSuch, NoSuch),
            (Zero, One, NoSuch, Distant),
            (Zero, Many, NoSuch, WhichDistant),
            (One, Zero, Present, Present),
            (One, One, Present, Present),
            (One, Many, Present, Present),
            (Many, Zero, WhichPresent, WhichPresent),
            (Many, One, WhichPresent, WhichPresent),
            (Many, Many, WhichPresent, WhichPresent),
        ];
        for (present, distant, ordinary, omnipotent) in table {
            assert_eq!(decide(present, distant, false), ordinary, "{:?}/{:?}", present, distant);
            assert_eq!(decide(present, distant, true), omnipotent, "{:?}/{:?} omnipotent", present, distant);
        }
    }

    #[test]
    fn partitions_by_reachability() {
        let mut b = StoryBuilder::new();
        let hall = b.location("hall");
        let cellar = b.location("cellar");
        b.hero(hall);
        let brass = b.object("brass lamp", hall);
        let rusty = b.object("rusty lamp", cellar);
        let old = b.object("old lamp", cellar);
        let chest = b.object("chest", hall);
        b.container(chest).opaque(chest);
        let hidden = b.object("hidden lamp", chest);
        let story = b.build();
        let world = GameState::new(&story);

        assert_eq!(disambiguate(&world, &[rusty, brass, old], false), Resolution::Resolved(brass));
        assert_eq!(disambiguate(&world, &[rusty, hidden], false), Resolution::NoSuch);
        assert_eq!(disambiguate(&world, &[rusty, hidden], true), Resolution::WhichOne(vec![rusty, hidden]));
        assert_eq!(disambiguate(&world, &[hidden], true), Resolution::Resolved(hidden));
        assert_eq!(disambiguate(&world, &[], true), Resolution::NoSuch);
    }

    #[test]
    fn opening_a_container_reveals_its_contents() {
        let mut b = StoryBuilder::new();
        let hall = b.location("hall");
        b.hero(hall);
        let chest = b.object("chest", hall);
        b.container(chest).opaque(chest);
        let coin = b.object("coin", chest);
        let story = b.build();
        let mut world = GameState::new(&story);

        assert!(!world.reachable(coin));
        assert_eq!(disambiguate(&world, &[coin], false), Resolution::NoSuch);
        world.set_attribute(chest, OPAQUE, 0);
        assert!(world.reachable(coin));
        assert_eq!(disambiguate(&world, &[coin], false), Resolution::Resolved(coin));
    }

    #[test]
    fn only_present_candidates_are_listed() {
        let mut b = StoryBuilder::new();
        let hall = b.location("hall");
        let cellar = b.location("cellar");
        b.hero(hall);
        let red = b.object("red ball", hall);
        let blue = b.object("blue ball", hall);
        let green = b.object("green ball", cellar);
        let story = b.build();
        let world = GameState::new(&story);

        assert_eq!(
            disambiguate(&world, &[red, green, blue], true),
            Resolution::WhichOne(vec![red, blue])
        );
    }
}
