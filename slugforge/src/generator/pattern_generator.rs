//! Composition of substitution generators for a pattern.

use hashbrown::HashMap;
use num_bigint::BigUint;

use crate::dictionary::DictionarySet;
use crate::errors::{Result, SlugforgeError};
use crate::generator::substitution::{
    EmojiSubstitution, NumberSubstitution, RomanSubstitution, SelectorSubstitution,
    SpecialSubstitution, SubstitutionGenerator,
};
use crate::num::{lcm, prev_prime};
use crate::pattern::{PatternRef, Placeholder};
use crate::permute::fnv1a_hash;

// A fixed prime stride that decorrelates the per-placeholder permutations
// derived from one seed.
const SEED_STRIDE: u32 = 2083;

/// Sizes chosen for one selector placeholder: the filtered view size and the
/// size actually permuted over, possibly downshifted to a prime to raise the
/// pattern capacity.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct SelectorSettings {
    /// Number of words in the filtered view.
    pub original_size: u64,
    /// Number of words the generator permutes over; at most `original_size`.
    pub selected_size: u64,
}

/// The capacity plan of a pattern. To keep generation stable over time, the
/// settings can be stored alongside the pattern and passed back to
/// [`PatternGenerator::with_settings`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PatternSettings {
    /// Per-selector sizes, in placeholder order. Non-selector placeholders
    /// are not represented.
    pub selectors: Vec<SelectorSettings>,
    /// The period of the `sequence -> slug` map.
    pub capacity: BigUint,
    /// Upper bound on the slug length: literal text plus per-placeholder
    /// maximums.
    pub max_pattern_length: usize,
}

/// Generates slugs for one pattern. Builds a substitution generator per
/// placeholder once and is then reusable across sequence numbers and seeds.
pub struct PatternGenerator {
    pattern: PatternRef,
    generators: Vec<Box<dyn SubstitutionGenerator>>,
    settings: PatternSettings,
}

impl PatternGenerator {
    /// Builds generators for the pattern and computes its capacity plan,
    /// applying the prime downshift to each selector when it raises the
    /// running LCM.
    ///
    /// # Errors
    ///
    /// [`SlugforgeError::PatternSyntax`] when a selector matches no words;
    /// [`SlugforgeError::Dictionary`] when an emoji placeholder cannot be
    /// satisfied.
    pub fn new(dictionaries: &DictionarySet, pattern: PatternRef) -> Result<Self> {
        let mut capacity = BigUint::from(1u32);
        let mut max_pattern_length = pattern.arbitrary_text_length();
        let mut selectors = vec![];
        let mut generators: Vec<Box<dyn SubstitutionGenerator>> = vec![];
        let mut filtered_views: HashMap<u64, std::sync::Arc<crate::dictionary::FilteredDictionary>> =
            HashMap::new();

        for placeholder in pattern.placeholders() {
            let generator: Box<dyn SubstitutionGenerator> = match placeholder {
                Placeholder::Selector(selector) => {
                    let filtered = match filtered_views.entry(selector.hash64()) {
                        hashbrown::hash_map::Entry::Occupied(entry) => entry.get().clone(),
                        hashbrown::hash_map::Entry::Vacant(entry) => {
                            let filtered = dictionaries.filter(selector);
                            match filtered {
                                Some(filtered) => entry.insert(filtered).clone(),
                                None => {
                                    return Err(no_matching_words(selector));
                                }
                            }
                        }
                    };
                    if filtered.is_empty() {
                        return Err(no_matching_words(selector));
                    }

                    let original_size = filtered.len() as u64;
                    let mut settings = SelectorSettings {
                        original_size,
                        selected_size: original_size,
                    };
                    // Downshift to the largest prime below the view size
                    // when that raises the pattern-wide LCM.
                    let original_capacity = lcm(&capacity, &BigUint::from(original_size));
                    if original_size > 2 {
                        if let Some(prime) = prev_prime(original_size) {
                            let prime_capacity = lcm(&capacity, &BigUint::from(prime));
                            if prime_capacity > original_capacity {
                                settings.selected_size = prime;
                            }
                        }
                    }
                    selectors.push(settings);
                    Box::new(SelectorSubstitution::new(filtered, &settings))
                }
                Placeholder::Number(number_gen) => {
                    if number_gen.base.is_roman() {
                        Box::new(RomanSubstitution::new(number_gen))
                    } else {
                        Box::new(NumberSubstitution::new(number_gen)?)
                    }
                }
                Placeholder::Special(special_gen) => {
                    Box::new(SpecialSubstitution::new(special_gen)?)
                }
                Placeholder::Emoji(emoji_gen) => Box::new(EmojiSubstitution::new(emoji_gen)?),
            };
            capacity = lcm(&capacity, &generator.capacity());
            max_pattern_length += generator.max_length();
            generators.push(generator);
        }

        Ok(Self {
            pattern,
            generators,
            settings: PatternSettings {
                selectors,
                capacity,
                max_pattern_length,
            },
        })
    }

    /// Builds generators for the pattern trusting the provided selector
    /// sizes; capacity and maximum length are recomputed from them.
    ///
    /// # Errors
    ///
    /// As for [`PatternGenerator::new`], plus
    /// [`SlugforgeError::InvalidArgument`] when the settings do not match
    /// the pattern's selector count.
    pub fn with_settings(
        dictionaries: &DictionarySet,
        pattern: PatternRef,
        settings: PatternSettings,
    ) -> Result<Self> {
        let mut capacity = BigUint::from(1u32);
        let mut max_pattern_length = pattern.arbitrary_text_length();
        let mut generators: Vec<Box<dyn SubstitutionGenerator>> = vec![];
        let mut selector_settings = settings.selectors.iter();

        for placeholder in pattern.placeholders() {
            let generator: Box<dyn SubstitutionGenerator> = match placeholder {
                Placeholder::Selector(selector) => {
                    let settings = selector_settings.next().ok_or_else(|| {
                        SlugforgeError::invalid_argument("settings", "incorrect pattern settings")
                    })?;
                    let filtered = dictionaries
                        .filter(selector)
                        .filter(|filtered| !filtered.is_empty())
                        .ok_or_else(|| no_matching_words(selector))?;
                    Box::new(SelectorSubstitution::new(filtered, settings))
                }
                Placeholder::Number(number_gen) => {
                    if number_gen.base.is_roman() {
                        Box::new(RomanSubstitution::new(number_gen))
                    } else {
                        Box::new(NumberSubstitution::new(number_gen)?)
                    }
                }
                Placeholder::Special(special_gen) => {
                    Box::new(SpecialSubstitution::new(special_gen)?)
                }
                Placeholder::Emoji(emoji_gen) => Box::new(EmojiSubstitution::new(emoji_gen)?),
            };
            capacity = lcm(&capacity, &generator.capacity());
            max_pattern_length += generator.max_length();
            generators.push(generator);
        }

        Ok(Self {
            pattern,
            generators,
            settings: PatternSettings {
                selectors: settings.selectors,
                capacity,
                max_pattern_length,
            },
        })
    }

    /// Hashes a seed string into the 32-bit permutation key.
    pub fn seed_hash(seed: &str) -> u32 {
        fnv1a_hash(seed)
    }

    /// Generates the slug for a sequence number under a hashed seed.
    pub fn generate(&self, seed: u32, sequence: u64) -> Result<String> {
        let mut seed = seed;
        let mut substitutions = Vec::with_capacity(self.generators.len());
        for generator in &self.generators {
            seed = seed.wrapping_add(SEED_STRIDE);
            substitutions.push(generator.generate(seed, sequence));
        }
        self.pattern.format(&substitutions)
    }

    /// Generates the slug for a sequence number under a seed string.
    pub fn generate_seeded(&self, seed: &str, sequence: u64) -> Result<String> {
        self.generate(Self::seed_hash(seed), sequence)
    }

    /// The period of the `sequence -> slug` map.
    pub fn capacity(&self) -> &BigUint {
        &self.settings.capacity
    }

    /// Upper bound on the slug length.
    pub fn max_pattern_length(&self) -> usize {
        self.settings.max_pattern_length
    }

    /// The capacity plan computed or recomputed for the pattern.
    pub fn settings(&self) -> &PatternSettings {
        &self.settings
    }
}

fn no_matching_words(selector: &crate::pattern::placeholder::Selector) -> SlugforgeError {
    SlugforgeError::pattern_syntax(format!("No matching words found for: {selector}"), 0)
}
