use std::collections::HashSet;

use num_bigint::BigUint;

use crate::dictionary::emoji_dictionary;
use crate::errors::SlugforgeError;
use crate::generator::substitution::{EmojiSubstitution, SubstitutionGenerator};
use crate::generator::{Generator, PatternGenerator};
use crate::pattern::parser::parse_emoji_literal;
use crate::tests::{test_dictionaries, TEST_SEED};

fn face_count() -> u64 {
    let tags = vec!["face".to_owned()];
    emoji_dictionary().filter_tags(&tags, &[]).len() as u64
}

fn substitution(source: &str) -> EmojiSubstitution {
    EmojiSubstitution::new(&parse_emoji_literal(source).unwrap()).unwrap()
}

#[test]
fn single_emoji_comes_from_the_dictionary() {
    let generator = substitution("emoji");
    let seed = PatternGenerator::seed_hash("test");
    let dictionary = emoji_dictionary();
    let words: HashSet<&str> = (0..dictionary.len())
        .map(|i| dictionary.word(i).text())
        .collect();

    assert_eq!(generator.capacity(), BigUint::from(dictionary.len()));
    assert_eq!(generator.max_length(), 1);
    for sequence in 0..50 {
        let emoji = generator.generate(seed, sequence);
        assert!(words.contains(emoji.as_str()), "{emoji}");
        assert_eq!(emoji, generator.generate(seed, sequence));
    }
}

#[test]
fn face_set_capacity_non_unique() {
    let n = face_count();
    assert!(n > 6);

    let generator = substitution("emoji:+face count=2");
    assert_eq!(generator.max_length(), 2);
    assert_eq!(generator.capacity(), BigUint::from(n * n));

    let generator = substitution("emoji:+face count=0-2");
    assert_eq!(generator.max_length(), 2);
    assert_eq!(generator.capacity(), BigUint::from(1 + n + n * n));
}

#[test]
fn face_set_capacity_unique() {
    let n = face_count();
    let generator = substitution("emoji:+face count=2 unique=true");
    assert_eq!(generator.capacity(), BigUint::from(n * (n - 1)));

    let generator = substitution("emoji:+face count=0-2 unique=true");
    assert_eq!(generator.capacity(), BigUint::from(1 + n + n * (n - 1)));
}

#[test]
fn face_counts_stay_within_bounds() {
    // Every face emoji in the embedded dictionary is a single scalar, so
    // the emoji count of a substitution is its char count.
    let generator = substitution("emoji:+face count=2-4");
    let seed = PatternGenerator::seed_hash("test");
    for sequence in 0..200 {
        let emojis = generator.generate(seed, sequence);
        let count = emojis.chars().count();
        assert!((2..=4).contains(&count), "{emojis}");
    }
}

#[test]
fn unique_faces_do_not_repeat() {
    let generator = substitution("emoji:+face count=4 unique=true");
    let seed = PatternGenerator::seed_hash("test");
    for sequence in 0..200 {
        let emojis: Vec<char> = generator.generate(seed, sequence).chars().collect();
        assert_eq!(emojis.len(), 4);
        let distinct: HashSet<char> = emojis.iter().copied().collect();
        assert_eq!(distinct.len(), emojis.len());
    }
}

#[test]
fn unmatched_tags_are_a_dictionary_error() {
    let emoji = parse_emoji_literal("emoji:+no_such_tag").unwrap();
    assert!(matches!(
        EmojiSubstitution::new(&emoji),
        Err(SlugforgeError::Dictionary(_))
    ));
}

#[test]
fn emoji_pattern_generation() {
    let generator = Generator::new(test_dictionaries());
    let pattern = "-{emoji:+face}-{adjective}-{noun}-";
    let first = generator.generate(pattern, TEST_SEED, 3).unwrap();
    let second = generator.generate(pattern, TEST_SEED, 3).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with('-'));
    assert!(first.contains("-adjective"));

    let settings = generator.capacity(pattern).unwrap();
    let face_capacity = BigUint::from(face_count());
    // 35 slots from the word dictionaries, folded with the face count.
    assert_eq!(
        settings.capacity,
        crate::num::lcm(&BigUint::from(35u32), &face_capacity)
    );
}
