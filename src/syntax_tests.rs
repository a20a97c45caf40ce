#[cfg(test)]
mod tests {
    use crate::dictionary::WordClasses;
    use crate::error::CommandError;
    use crate::memory::Memory;
    use crate::scan::scan;
    use crate::story::{Story, WordCode};
    use crate::syntax::{match_syntax, SyntaxMatch};
    use crate::testing::{Pattern, StoryBuilder};
    use crate::words::Words;
    use crate::world::GameState;
    use pretty_assertions::assert_eq;
    use test_log::test;

    struct Fixture {
        story: Story,
        take: WordCode,
        put: WordCode,
        insert: WordCode,
        look: WordCode,
    }

    fn fixture() -> Fixture {
        let mut b = StoryBuilder::new();
        b.function_words();
        let hall = b.location("hall");
        b.hero(hall);
        let ball = b.object("ball", hall);
        let chest = b.object("chest", hall);
        b.container(chest);
        b.noun("ball", &[ball]);
        b.noun("chest", &[chest]);
        b.word("on", WordClasses::PREPOSITION);

        b.syntax("take", &[Pattern::Multiple]);
        let put_in = b.syntax("put", &[Pattern::Parameter, Pattern::Word("in"), Pattern::Parameter]);
        b.parameter_map(put_in, "insert", &[2, 1]);
        b.syntax("look", &[]);
        let take = b.word("take", WordClasses::VERB);
        let put = b.word("put", WordClasses::VERB);
        let insert = b.word("insert", WordClasses::VERB);
        let look = b.word("look", WordClasses::VERB);
        Fixture {
            story: b.build(),
            take,
            put,
            insert,
            look,
        }
    }

    /// Match `line`, whose first word is the verb
    fn matching<'s>(story: &'s Story, line: &str, verb: WordCode) -> (Result<SyntaxMatch<'s>, CommandError>, usize) {
        let mut world = GameState::new(story);
        let scanned = scan(line, &story.dictionary, &mut world).unwrap();
        let words = Words::new(&scanned, &story.dictionary);
        let mut cursor = 1;
        let result = match_syntax(story, words, &mut cursor, verb, &Memory::default());
        (result, cursor)
    }

    fn first_words(matched: &SyntaxMatch) -> Vec<usize> {
        matched
            .positions
            .iter()
            .map(|p| p.parameters[0].first_word)
            .collect()
    }

    #[test]
    fn single_parameter() {
        let f = fixture();
        let (matched, cursor) = matching(&f.story, "take the ball", f.take);
        let matched = matched.unwrap();
        assert_eq!(matched.verb, f.take);
        assert_eq!(first_words(&matched), vec![1]);
        assert!(matched.positions[0].flags.multiple);
        assert_eq!(cursor, 2);
    }

    #[test]
    fn parameters_are_remapped() {
        let f = fixture();
        let (matched, cursor) = matching(&f.story, "put ball in chest", f.put);
        let matched = matched.unwrap();
        assert_eq!(matched.verb, f.insert);
        // "chest" (word 3) becomes the first parameter of insert
        assert_eq!(first_words(&matched), vec![3, 1]);
        assert_eq!(cursor, 4);
    }

    #[test]
    fn missing_map_keeps_order() {
        let mut f = fixture();
        f.story.parameter_maps.clear();
        let (matched, _) = matching(&f.story, "put ball in chest", f.put);
        let matched = matched.unwrap();
        assert_eq!(matched.verb, f.put);
        assert_eq!(first_words(&matched), vec![1, 3]);
    }

    #[test]
    fn wrong_preposition() {
        let f = fixture();
        let (matched, _) = matching(&f.story, "put ball on chest", f.put);
        assert_eq!(matched.unwrap_err(), CommandError::NotUnderstood);
    }

    #[test]
    fn command_ends_too_early() {
        let f = fixture();
        let (matched, _) = matching(&f.story, "take", f.take);
        assert_eq!(matched.unwrap_err(), CommandError::NotUnderstood);
        let (matched, _) = matching(&f.story, "put ball", f.put);
        assert_eq!(matched.unwrap_err(), CommandError::NotUnderstood);
    }

    #[test]
    fn verb_without_syntax() {
        let mut b = StoryBuilder::new();
        let jump = b.word("jump", WordClasses::VERB);
        let story = b.build();
        let (matched, _) = matching(&story, "jump", jump);
        assert_eq!(matched.unwrap_err(), CommandError::NotUnderstood);
    }

    #[test]
    fn except_without_all() {
        let f = fixture();
        let (matched, _) = matching(&f.story, "take ball except chest", f.take);
        assert_eq!(
            matched.unwrap_err(),
            CommandError::ButAfterAll {
                except: "except".to_string(),
                all: "all".to_string()
            }
        );
    }

    #[test]
    fn stops_at_conjunction() {
        let f = fixture();
        let (matched, cursor) = matching(&f.story, "take ball and look", f.take);
        assert_eq!(first_words(&matched.unwrap()), vec![1]);
        assert_eq!(cursor, 2);

        let (matched, cursor) = matching(&f.story, "look, take ball", f.look);
        assert!(matched.unwrap().positions.is_empty());
        assert_eq!(cursor, 1);
    }
}
