mod emoji;
mod generator;

use crate::dictionary::{Dictionary, DictionarySet, Word};

pub(crate) const TEST_SEED: &str = "foobar";

pub(crate) fn word(text: &str, tags: &[&str]) -> Word {
    Word::new(text, tags.iter().copied())
}

pub(crate) fn nouns() -> Vec<Word> {
    vec![
        word("noun1", &[]),
        word("noun2", &[]),
        word("noun3", &["tag1"]),
        word("noun4", &["tag2", "nsfw"]),
        word("noun5", &["tag1", "tag2"]),
    ]
}

pub(crate) fn adjectives() -> Vec<Word> {
    vec![
        word("adjective1", &[]),
        word("adjective2", &[]),
        word("adjective3", &["tag1"]),
        word("adjective4", &["tag2", "nsfw"]),
        word("adjective5", &["tag1", "tag2"]),
        word("adjective6", &["tag1", "tag2", "nsfw"]),
        word("adjective7", &["tag1", "tag2", "nsfw"]),
    ]
}

pub(crate) fn verbs() -> Vec<Word> {
    vec![
        word("verb1", &[]),
        word("verb2", &[]),
        word("verb3", &["tag1"]),
        word("verb4", &["tag2", "nsfw"]),
        word("verb5", &["tag1", "tag2"]),
        word("verb6", &["tag1", "tag2", "nsfw"]),
        word("verb7", &["tag1", "tag2", "nsfw"]),
        word("verb8", &["tag1", "tag2", "nsfw"]),
        word("verb9", &["tag1", "tag2", "nsfw"]),
        word("verb10", &["tag1", "tag2", "nsfw"]),
    ]
}

pub(crate) fn adverbs() -> Vec<Word> {
    vec![
        word("adverb1", &[]),
        word("adverb2", &[]),
        word("adverb3", &["tag1"]),
        word("adverb4", &["tag2", "nsfw"]),
        word("adverb5", &["tag1", "tag2"]),
        word("adverb6", &["tag1", "tag2", "nsfw"]),
        word("adverb7", &["tag1", "tag2", "nsfw"]),
        word("adverb8", &["tag1", "tag2", "nsfw"]),
        word("adverb9", &["tag1", "tag2", "nsfw"]),
    ]
}

pub(crate) fn test_dictionaries() -> DictionarySet {
    DictionarySet::new(vec![
        Dictionary::new("noun", "en", nouns(), true),
        Dictionary::new("adjective", "en", adjectives(), true),
        Dictionary::new("verb", "en", verbs(), true),
        Dictionary::new("adverb", "en", adverbs(), true),
        Dictionary::new("noun", "", nouns(), true),
    ])
}
