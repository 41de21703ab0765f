use std::collections::HashSet;

use num_bigint::BigUint;

use crate::dictionary::{Dictionary, DictionarySet};
use crate::errors::SlugforgeError;
use crate::generator::pattern_generator::SelectorSettings;
use crate::generator::substitution::{
    NumberSubstitution, RomanSubstitution, SelectorSubstitution, SpecialSubstitution,
    SubstitutionGenerator,
};
use crate::generator::{Generator, PatternGenerator};
use crate::pattern::parser::{
    parse_number_literal, parse_selector_literal, parse_special_literal,
};
use crate::pattern::Pattern;
use crate::tests::{nouns, test_dictionaries, TEST_SEED};

fn noun_substitution(kind: &str) -> SelectorSubstitution {
    let dictionary = Dictionary::new("noun", "en", nouns(), true);
    let selector = parse_selector_literal(kind).unwrap();
    let filtered = dictionary.filter(&selector).unwrap();
    SelectorSubstitution::new(
        filtered,
        &SelectorSettings {
            original_size: 5,
            selected_size: 5,
        },
    )
}

fn check_sequence(generator: &dyn SubstitutionGenerator, seed: u32, expected: &[&str]) {
    for (sequence, expected) in expected.iter().enumerate() {
        assert_eq!(
            generator.generate(seed, sequence as u64),
            *expected,
            "sequence {sequence}"
        );
    }
}

#[test]
fn lower_case_words() {
    let generator = noun_substitution("noun");
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    check_sequence(
        &generator,
        seed,
        &["noun2", "noun3", "noun4", "noun5", "noun1", "noun2", "noun3"],
    );
}

#[test]
fn upper_case_words() {
    let generator = noun_substitution("NOUN");
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    check_sequence(
        &generator,
        seed,
        &["NOUN2", "NOUN3", "NOUN4", "NOUN5", "NOUN1", "NOUN2", "NOUN3"],
    );
}

#[test]
fn title_case_words() {
    let generator = noun_substitution("Noun");
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    check_sequence(
        &generator,
        seed,
        &["Noun2", "Noun3", "Noun4", "Noun5", "Noun1", "Noun2", "Noun3"],
    );
}

#[test]
fn mixed_case_words() {
    let generator = noun_substitution("nOun");
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    check_sequence(
        &generator,
        seed,
        &["NOUn2", "Noun3", "NOUN4", "NOun5", "nouN1", "NoUN2", "nOUn3"],
    );
}

#[test]
fn decimal_numbers() {
    let generator = NumberSubstitution::new(&parse_number_literal("number:2d").unwrap()).unwrap();
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    check_sequence(&generator, seed, &["21", "42", "63", "84", "05"]);
    // The rotation period is 100.
    assert_eq!(generator.generate(seed, 100), "21");
    assert_eq!(generator.capacity(), BigUint::from(100u32));
}

#[test]
fn hex_numbers() {
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    {
        let generator =
            NumberSubstitution::new(&parse_number_literal("number:2x").unwrap()).unwrap();
        check_sequence(&generator, seed, &["9d", "01", "b1", "03", "06"]);
        assert_eq!(generator.capacity(), BigUint::from(256u32));
    }
    {
        let generator =
            NumberSubstitution::new(&parse_number_literal("number:16x").unwrap()).unwrap();
        check_sequence(
            &generator,
            seed,
            &[
                "c969bc6ba7ad9a97",
                "46be3ac990fc2c98",
                "4ab47b0f83890218",
                "ec422f95ad0e9d00",
                "d98a675c7b068bbf",
            ],
        );
        assert_eq!(generator.capacity(), BigUint::from(1u32) << 64);
    }
}

#[test]
fn number_generator_rejects_roman_bases() {
    assert!(NumberSubstitution::new(&parse_number_literal("number:2R").unwrap()).is_err());
    assert!(NumberSubstitution::new(&parse_number_literal("number:2r").unwrap()).is_err());
}

#[test]
fn roman_numbers() {
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    {
        let generator = RomanSubstitution::new(&parse_number_literal("number:2R").unwrap());
        check_sequence(&generator, seed, &["CI", "ML", "LV", "M", "XX"]);

        let capacity = u64::try_from(generator.capacity()).unwrap();
        for sequence in 0..capacity {
            assert!(generator.generate(seed, sequence).len() <= 2);
        }
    }
    {
        let upper = RomanSubstitution::new(&parse_number_literal("number:15R").unwrap());
        let lower = RomanSubstitution::new(&parse_number_literal("number:15r").unwrap());
        assert_eq!(upper.capacity(), BigUint::from(3999u32));

        let mut values = HashSet::new();
        for sequence in 0..3999 {
            let upper_value = upper.generate(seed, sequence);
            let lower_value = lower.generate(seed, sequence);
            assert_eq!(upper_value.to_lowercase(), lower_value);
            values.insert(upper_value);
            values.insert(lower_value);
        }
        assert_eq!(values.len(), 3999 * 2);
    }
}

#[test]
fn special_symbols() {
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    let generator = SpecialSubstitution::new(&parse_special_literal("special:3").unwrap()).unwrap();
    check_sequence(&generator, seed, &[")'#", "@|_", "[|*", "\"'$", "<|-"]);

    let capacity = u64::try_from(generator.capacity()).unwrap();
    for sequence in 0..capacity {
        assert_eq!(generator.generate(seed, sequence).len(), 3);
    }
}

#[test]
fn special_capacity() {
    let capacity = |source: &str| {
        SpecialSubstitution::new(&parse_special_literal(source).unwrap())
            .unwrap()
            .capacity()
    };
    assert_eq!(capacity("special:1"), BigUint::from(32u32));
    assert_eq!(capacity("special:0-1"), BigUint::from(33u32));
    assert_eq!(capacity("special:2"), BigUint::from(1024u32));
    assert_eq!(capacity("special:0-2"), BigUint::from(1u32 + 32 + 1024));
}

#[test]
fn special_variable_length() {
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    {
        let generator =
            SpecialSubstitution::new(&parse_special_literal("special:0-3").unwrap()).unwrap();
        check_sequence(&generator, seed, &[")'#", "@|_", "[|*", "\"'$"]);
        for sequence in 0..1000 {
            assert!(generator.generate(seed, sequence).len() <= 3);
        }
    }
    {
        let generator =
            SpecialSubstitution::new(&parse_special_literal("special:3-5").unwrap()).unwrap();
        check_sequence(&generator, seed, &["*_{\\_", "~^)?#"]);
        for sequence in 0..1000 {
            let value = generator.generate(seed, sequence);
            assert!(value.len() >= 3);
            assert!(value.len() <= 5);
        }
    }
}

fn pattern_capacity(set: &DictionarySet, source: &str) -> BigUint {
    PatternGenerator::new(set, Pattern::parse_arc(source).unwrap())
        .unwrap()
        .capacity()
        .clone()
}

#[test]
fn pattern_generator_capacity() {
    let set = test_dictionaries();

    let generator = PatternGenerator::new(&set, Pattern::parse_arc("{noun}").unwrap()).unwrap();
    assert_eq!(generator.capacity(), &BigUint::from(5u32));
    assert_eq!(generator.max_pattern_length(), 5);

    // Every dictionary advances with the sequence number, so the capacity
    // of a pattern is the LCM of the per-placeholder capacities. Repeating
    // a dictionary downshifts the repeated selector to a prime when that
    // raises the LCM.
    assert_eq!(pattern_capacity(&set, "{noun}-{noun}"), BigUint::from(15u32));
    assert_eq!(
        pattern_capacity(&set, "{noun}-{noun}-{noun}"),
        BigUint::from(15u32)
    );
    assert_eq!(
        pattern_capacity(&set, "{adjective}-{noun}"),
        BigUint::from(35u32)
    );
    assert_eq!(
        pattern_capacity(&set, "{adjective}-{noun}-{noun}"),
        BigUint::from(105u32)
    );
    assert_eq!(
        pattern_capacity(&set, "{adjective}-{adverb}-{noun}"),
        BigUint::from(315u32)
    );
    assert_eq!(
        pattern_capacity(&set, "{adjective}-{adverb}-{noun}-{verb}"),
        BigUint::from(630u32)
    );
    assert_eq!(
        pattern_capacity(&set, "{adjective}-{adverb}-{noun}-{number:2d}"),
        BigUint::from(6300u32)
    );
    assert_eq!(
        pattern_capacity(&set, "{adjective}-{adverb}-{noun}-{number:2x}"),
        BigUint::from(80640u32)
    );
}

#[test]
fn pattern_generator_settings_record_sizes() {
    let set = test_dictionaries();
    let generator =
        PatternGenerator::new(&set, Pattern::parse_arc("{noun}-{noun}").unwrap()).unwrap();
    assert_eq!(
        generator.settings().selectors,
        vec![
            SelectorSettings {
                original_size: 5,
                selected_size: 5
            },
            SelectorSettings {
                original_size: 5,
                selected_size: 3
            },
        ]
    );
}

#[test]
fn pattern_generator_generate() {
    let set = test_dictionaries();
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    for source in [
        "{adjective}-{adverb}-{noun}-{number:2X}",
        "{adjective}-{adverb}-{noun@en}-{number:2X}",
    ] {
        let generator = PatternGenerator::new(&set, Pattern::parse_arc(source).unwrap()).unwrap();
        let expected = [
            "adjective6-adverb8-noun1-ED",
            "adjective3-adverb6-noun5-49",
            "adjective7-adverb4-noun4-4B",
            "adjective4-adverb2-noun3-63",
            "adjective1-adverb9-noun2-73",
        ];
        for (sequence, expected) in expected.iter().enumerate() {
            assert_eq!(
                generator.generate(seed, sequence as u64).unwrap(),
                *expected,
                "{source} at {sequence}"
            );
        }
    }
}

#[test]
fn literal_text_does_not_affect_substitutions() {
    let set = test_dictionaries();
    let seed = PatternGenerator::seed_hash(TEST_SEED);
    let pattern = Pattern::parse_arc("-{adjective}-{adverb}-{noun}-{number:2X}-").unwrap();
    let generator = PatternGenerator::new(&set, pattern).unwrap();
    assert_eq!(generator.generate(seed, 0).unwrap(), "-adjective6-adverb8-noun1-ED-");
    assert_eq!(generator.generate(seed, 1).unwrap(), "-adjective3-adverb6-noun5-49-");
    assert_eq!(generator.generate(seed, 4).unwrap(), "-adjective1-adverb9-noun2-73-");
}

#[test]
fn generator_capacity() {
    let generator = Generator::new(test_dictionaries());
    let capacity = |source: &str| generator.capacity(source).unwrap().capacity;
    assert_eq!(capacity("{noun}"), BigUint::from(5u32));
    assert_eq!(capacity("{adjective}-{noun}"), BigUint::from(35u32));
    assert_eq!(
        capacity("{adjective}-{adverb}-{noun}"),
        BigUint::from(315u32)
    );
    assert_eq!(
        capacity("{adjective}-{adverb}-{noun}-{verb}"),
        BigUint::from(630u32)
    );
    assert_eq!(
        capacity("{adjective}-{adverb}-{noun}-{number:2d}"),
        BigUint::from(6300u32)
    );
    assert_eq!(
        capacity("{adjective}-{adverb}-{noun}-{number:2x}"),
        BigUint::from(80640u32)
    );
}

#[test]
fn generator_generate_with_settings() {
    let generator = Generator::new(test_dictionaries());
    let pattern = Pattern::parse_arc("-{adjective}-{adverb}-{noun}-{number:2d}-").unwrap();
    let settings = generator.capacity_of(&pattern).unwrap();

    let expected = [
        "-adjective6-adverb8-noun1-53-",
        "-adjective3-adverb6-noun5-06-",
        "-adjective7-adverb4-noun4-59-",
        "-adjective4-adverb2-noun3-12-",
        "-adjective1-adverb9-noun2-65-",
        "-adjective5-adverb7-noun1-18-",
    ];
    for (sequence, expected) in expected.iter().enumerate() {
        assert_eq!(
            generator
                .generate_with_settings(&settings, &pattern, TEST_SEED, sequence as u64)
                .unwrap(),
            *expected
        );
    }
}

#[test]
fn generator_generate_roman() {
    let generator = Generator::new(test_dictionaries());
    let pattern = Pattern::parse_arc("-{adjective}-{adverb}-{noun}-{number:2R}-").unwrap();
    let settings = generator.capacity_of(&pattern).unwrap();

    let expected = [
        "-adjective6-adverb8-noun1-DL-",
        "-adjective3-adverb6-noun5-C-",
        "-adjective7-adverb4-noun4-IX-",
        "-adjective4-adverb2-noun3-MV-",
        "-adjective1-adverb9-noun2-CC-",
        "-adjective5-adverb7-noun1-XL-",
    ];
    for (sequence, expected) in expected.iter().enumerate() {
        assert_eq!(
            generator
                .generate_with_settings(&settings, &pattern, TEST_SEED, sequence as u64)
                .unwrap(),
            *expected
        );
    }
}

#[test]
fn generator_batch_matches_single_shots() {
    let generator = Generator::new(test_dictionaries());
    let pattern = Pattern::parse_arc("{adjective}-{noun}-{number:4x}").unwrap();

    let mut batch = vec![];
    generator
        .generate_batch(&pattern, TEST_SEED, 7, 5, |slug| batch.push(slug))
        .unwrap();
    assert_eq!(batch.len(), 5);
    for (i, slug) in batch.iter().enumerate() {
        assert_eq!(
            slug,
            &generator
                .generate_pattern(&pattern, TEST_SEED, 7 + i as u64)
                .unwrap()
        );
    }
}

#[test]
fn generation_is_deterministic() {
    let generator = Generator::new(test_dictionaries());
    let first = generator
        .generate("{Adjective} {noun} {special:2} {number:6X}", TEST_SEED, 42)
        .unwrap();
    let second = generator
        .generate("{Adjective} {noun} {special:2} {number:6X}", TEST_SEED, 42)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn distinct_sequences_yield_distinct_slugs_within_capacity() {
    let generator = Generator::new(test_dictionaries());
    let pattern = Pattern::parse_arc("{adjective}-{adverb}-{noun}").unwrap();
    let settings = generator.capacity_of(&pattern).unwrap();
    let capacity = u64::try_from(settings.capacity).unwrap();
    assert_eq!(capacity, 315);

    let mut slugs = HashSet::new();
    generator
        .generate_batch(&pattern, TEST_SEED, 0, capacity, |slug| {
            slugs.insert(slug);
        })
        .unwrap();
    assert_eq!(slugs.len() as u64, capacity);
}

#[test]
fn empty_dictionary_is_a_pattern_error() {
    let set = DictionarySet::new(vec![Dictionary::new("noun", "en", vec![], true)]);
    let generator = Generator::new(set);
    match generator.generate("{noun}", TEST_SEED, 0) {
        Err(SlugforgeError::PatternSyntax(error)) => {
            assert_eq!(error.message(), "No matching words found for: noun");
        }
        other => panic!("expected a pattern error, got {other:?}"),
    }
}

#[test]
fn unknown_kind_is_a_pattern_error() {
    let generator = Generator::new(test_dictionaries());
    assert!(matches!(
        generator.generate("{pronoun}", TEST_SEED, 0),
        Err(SlugforgeError::PatternSyntax(_))
    ));
}

#[test]
fn generation_is_shareable_across_threads() {
    use std::sync::Arc;

    let generator = Arc::new(Generator::new(test_dictionaries()));
    let pattern = Pattern::parse_arc("{adjective}-{adverb}-{noun}-{number:2X}").unwrap();

    let mut expected = vec![];
    generator
        .generate_batch(&pattern, TEST_SEED, 0, 64, |slug| expected.push(slug))
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let generator = Arc::clone(&generator);
            let pattern = Arc::clone(&pattern);
            std::thread::spawn(move || {
                let mut slugs = vec![];
                generator
                    .generate_batch(&pattern, TEST_SEED, 0, 64, |slug| slugs.push(slug))
                    .unwrap();
                slugs
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn random_seed_shape() {
    let generator = Generator::new(test_dictionaries());
    let seed = generator.random_seed();
    assert_eq!(seed.len(), 8);
    assert!(seed.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn mixed_case_patterns_stay_within_dictionary_words() {
    let generator = Generator::new(test_dictionaries());
    let words: HashSet<String> = nouns().iter().map(|w| w.text().to_lowercase()).collect();
    for sequence in 0..20 {
        let slug = generator.generate("{nOuN}", TEST_SEED, sequence).unwrap();
        assert!(words.contains(&slug.to_lowercase()), "{slug}");
    }
}
