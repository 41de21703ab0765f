//! Substitution generators, one per placeholder variant.
//!
//! Each generator is a stateless function `(seed, sequence) -> String` with
//! a known capacity; the pattern generator folds the capacities into the
//! pattern-wide LCM and drives the per-placeholder seeds.

use std::sync::Arc;

use num_bigint::BigUint;
use once_cell::sync::Lazy;

use crate::dictionary::{emoji_dictionary, FilteredDictionary};
use crate::errors::{Result, SlugforgeError};
use crate::generator::pattern_generator::SelectorSettings;
use crate::pattern::placeholder::{
    CaseType, EmojiGen, NumberGen, SpecialCharGen, MAX_DECIMAL_LENGTH, MAX_EMOJI_COUNT,
    MAX_HEX_LENGTH, MAX_SPECIAL_LENGTH,
};
use crate::permute::{
    non_unique_permutation_seeded, permutation_count, permute, permute_pow2,
    unique_permutation_count, unique_permutation_seeded,
};
use crate::roman::encode_roman;
use crate::text;

// 32 special symbols, so 5-bit slices of a permuted value index the table
// directly. The duplicated `?` is part of the canonical table.
const SPECIAL_SYMBOLS: &[u8; 32] = b"!@#$%^&*()_+-=[]{}|;:,.<>?'\"~/\\?";

// A rough upper bound on the encoded size of one emoji, used to reserve the
// result string.
const EMOJI_MAX_CHAR_LENGTH: usize = 16;

/// All Roman encodings of `1..=3999`, ordered by value.
static ROMAN_TABLE: Lazy<Vec<String>> = Lazy::new(|| (1u32..=3999).map(encode_roman).collect());

/// The operation set shared by all substitution generators.
pub trait SubstitutionGenerator: Send + Sync {
    /// Produces the substitution for a sequence number under a seed.
    fn generate(&self, seed: u32, sequence: u64) -> String;

    /// The period of the `sequence -> substitution` map.
    fn capacity(&self) -> BigUint;

    /// An upper bound on the substitution length.
    fn max_length(&self) -> usize;
}

/// Substitutes words from a filtered dictionary.
pub struct SelectorSubstitution {
    dictionary: Arc<FilteredDictionary>,
    selected_size: u64,
}

impl SelectorSubstitution {
    /// Creates a generator over a filtered view. `settings.selected_size`
    /// may be a prime below the view size, chosen to maximize the pattern
    /// capacity; only the first `selected_size` positions are ever emitted
    /// for a given settings value.
    pub fn new(dictionary: Arc<FilteredDictionary>, settings: &SelectorSettings) -> Self {
        Self {
            dictionary,
            selected_size: settings.selected_size,
        }
    }
}

impl SubstitutionGenerator for SelectorSubstitution {
    fn generate(&self, seed: u32, sequence: u64) -> String {
        let index = permute(self.selected_size, seed, sequence) as usize;
        let word = self.dictionary.word(index);
        if self.dictionary.case() == CaseType::Mixed {
            // The mask domain is the filtered maximum length, not the
            // particular word's length, so a word's case pattern does not
            // depend on its neighbours in the view.
            let max_length = self.dictionary.max_length();
            let max_mask = if max_length >= 64 {
                0
            } else {
                // A floor of two keeps the domain non-degenerate for
                // single-character words.
                (1u64 << max_length).max(2)
            };
            let mask = permute_pow2(max_mask, seed, sequence);
            return text::mixed_case(&word, mask);
        }
        word
    }

    fn capacity(&self) -> BigUint {
        BigUint::from(self.selected_size)
    }

    fn max_length(&self) -> usize {
        self.dictionary.max_length()
    }
}

/// Substitutes zero-padded decimal or hexadecimal numbers.
pub struct NumberSubstitution {
    gen: NumberGen,
}

impl NumberSubstitution {
    /// Creates a number generator for a decimal or hexadecimal base.
    ///
    /// # Errors
    ///
    /// [`SlugforgeError::InvalidArgument`] for Roman bases (they are handled
    /// by [`RomanSubstitution`]) and for out-of-range widths.
    pub fn new(gen: &NumberGen) -> Result<Self> {
        if gen.base.is_roman() {
            return Err(SlugforgeError::invalid_argument(
                "gen",
                "Roman numbers are substituted by a dedicated generator",
            ));
        }
        let max_length = u64::from(gen.max_length);
        match gen.base {
            crate::pattern::placeholder::NumberBase::Dec => {
                if max_length > MAX_DECIMAL_LENGTH {
                    return Err(SlugforgeError::invalid_argument(
                        "gen",
                        "decimal number length is too long",
                    ));
                }
            }
            _ => {
                if max_length > MAX_HEX_LENGTH {
                    return Err(SlugforgeError::invalid_argument(
                        "gen",
                        "hex number length is too long",
                    ));
                }
            }
        }
        Ok(Self { gen: *gen })
    }

    fn domain(&self) -> u64 {
        use crate::pattern::placeholder::NumberBase::*;
        let length = u32::from(self.gen.max_length);
        match self.gen.base {
            Dec => 10u64.pow(length),
            // A zero domain stands for the full 64 bits.
            Hex | HexUpper if u64::from(self.gen.max_length) < MAX_HEX_LENGTH => 1u64 << (length * 4),
            Hex | HexUpper => 0,
            Roman | RomanLower => unreachable!("rejected in the constructor"),
        }
    }
}

impl SubstitutionGenerator for NumberSubstitution {
    fn generate(&self, seed: u32, sequence: u64) -> String {
        use crate::pattern::placeholder::NumberBase::*;
        let value = permute(self.domain(), seed, sequence);
        let width = usize::from(self.gen.max_length);
        match self.gen.base {
            Dec => format!("{value:0width$}"),
            Hex => format!("{value:0width$x}"),
            HexUpper => format!("{value:0width$X}"),
            Roman | RomanLower => unreachable!("rejected in the constructor"),
        }
    }

    fn capacity(&self) -> BigUint {
        use crate::pattern::placeholder::NumberBase::*;
        match self.gen.base {
            Dec => BigUint::from(10u32).pow(u32::from(self.gen.max_length)),
            Hex | HexUpper => BigUint::from(1u32) << (4 * u32::from(self.gen.max_length)),
            Roman | RomanLower => unreachable!("rejected in the constructor"),
        }
    }

    fn max_length(&self) -> usize {
        usize::from(self.gen.max_length)
    }
}

/// Substitutes Roman numerals no longer than the requested width.
pub struct RomanSubstitution {
    /// Indices into the Roman table whose encodings fit the width.
    filtered: Vec<u32>,
    lower: bool,
    max_length: usize,
}

impl RomanSubstitution {
    /// Creates a Roman generator over the table of encodings of `1..=3999`
    /// whose length does not exceed `gen.max_length`.
    pub fn new(gen: &NumberGen) -> Self {
        let max_length = usize::from(gen.max_length);
        let filtered = ROMAN_TABLE
            .iter()
            .enumerate()
            .filter(|(_, numeral)| numeral.len() <= max_length)
            .map(|(i, _)| i as u32)
            .collect();
        Self {
            filtered,
            lower: gen.base == crate::pattern::placeholder::NumberBase::RomanLower,
            max_length,
        }
    }
}

impl SubstitutionGenerator for RomanSubstitution {
    fn generate(&self, seed: u32, sequence: u64) -> String {
        let index = permute(self.filtered.len() as u64, seed, sequence) as usize;
        let numeral = &ROMAN_TABLE[self.filtered[index] as usize];
        if self.lower {
            text::to_lower(numeral)
        } else {
            numeral.clone()
        }
    }

    fn capacity(&self) -> BigUint {
        BigUint::from(self.filtered.len())
    }

    fn max_length(&self) -> usize {
        self.max_length
    }
}

/// Substitutes strings of special symbols.
pub struct SpecialSubstitution {
    min_length: usize,
    max_length: usize,
    cumulative_caps: Vec<u64>,
}

impl SpecialSubstitution {
    /// Creates a special-symbol generator for lengths in
    /// `[gen.min_length, gen.max_length]`.
    ///
    /// # Errors
    ///
    /// [`SlugforgeError::InvalidArgument`] for out-of-range or inverted
    /// length bounds.
    pub fn new(gen: &SpecialCharGen) -> Result<Self> {
        let min_length = u64::from(gen.min_length);
        let max_length = u64::from(gen.max_length);
        if min_length > MAX_SPECIAL_LENGTH || max_length > MAX_SPECIAL_LENGTH {
            return Err(SlugforgeError::invalid_argument(
                "gen",
                format!("special symbols length is limited to {MAX_SPECIAL_LENGTH}"),
            ));
        }
        if min_length > max_length {
            return Err(SlugforgeError::invalid_argument(
                "gen",
                "min special symbols length is greater than max special symbols length",
            ));
        }
        let cumulative_caps = (min_length..=max_length)
            .map(|length| 1u64 << (length * 5))
            .collect();
        Ok(Self {
            min_length: min_length as usize,
            max_length: max_length as usize,
            cumulative_caps,
        })
    }

    /// Picks a length in `[min, max]` with probability proportional to the
    /// number of strings of that length.
    fn select_length(&self, seed: u32, sequence: u64) -> usize {
        // The caps are cumulative by construction: each length's count
        // dwarfs the sum of all shorter ones.
        let p = permute(*self.cumulative_caps.last().unwrap(), seed, sequence);
        let index = self.cumulative_caps.partition_point(|&cap| cap <= p);
        self.min_length + index
    }
}

impl SubstitutionGenerator for SpecialSubstitution {
    fn generate(&self, seed: u32, sequence: u64) -> String {
        let length = if self.min_length == self.max_length {
            self.min_length
        } else {
            self.select_length(seed, sequence)
        };
        if length == 0 {
            return String::new();
        }

        let mut value = permute(1u64 << (length * 5), seed, sequence);
        let mut result = String::with_capacity(length);
        for _ in 0..length {
            result.push(SPECIAL_SYMBOLS[(value % SPECIAL_SYMBOLS.len() as u64) as usize] as char);
            value /= SPECIAL_SYMBOLS.len() as u64;
        }
        result
    }

    fn capacity(&self) -> BigUint {
        self.cumulative_caps
            .iter()
            .fold(BigUint::from(0u32), |sum, &cap| sum + cap)
    }

    fn max_length(&self) -> usize {
        self.max_length
    }
}

/// Substitutes sequences of emojis from the embedded emoji dictionary.
pub struct EmojiSubstitution {
    dictionary: Arc<FilteredDictionary>,
    min_count: u64,
    max_count: u64,
    unique: bool,
    cumulative_caps: Vec<u64>,
}

impl EmojiSubstitution {
    /// Creates an emoji generator over the embedded dictionary filtered by
    /// the placeholder's tags.
    ///
    /// # Errors
    ///
    /// [`SlugforgeError::Dictionary`] when no emoji matches the tags or the
    /// match is too small for the requested unique count.
    pub fn new(gen: &EmojiGen) -> Result<Self> {
        let dictionary = emoji_dictionary().filter_tags(&gen.include_tags, &gen.exclude_tags);
        if dictionary.is_empty() {
            return Err(SlugforgeError::dictionary(
                "no emoji matches the requested tags",
            ));
        }
        let size = dictionary.len() as u64;
        let min_count = u64::from(gen.min_count);
        let mut max_count = u64::from(gen.max_count);
        if max_count > MAX_EMOJI_COUNT {
            return Err(SlugforgeError::dictionary(format!(
                "max count for emoji generator cannot be greater than {MAX_EMOJI_COUNT}"
            )));
        }
        let cumulative_caps = if gen.unique {
            if size < min_count {
                return Err(SlugforgeError::dictionary(
                    "not enough emoji to generate a unique sequence",
                ));
            }
            max_count = max_count.min(size);
            (min_count..=max_count)
                .map(|count| unique_permutation_count(size, count))
                .collect()
        } else {
            (min_count..=max_count)
                .map(|count| permutation_count(size, count))
                .collect()
        };
        Ok(Self {
            dictionary,
            min_count,
            max_count,
            unique: gen.unique,
            cumulative_caps,
        })
    }

    /// Picks a sequence count in `[min, max]` with probability proportional
    /// to the number of sequences of that count.
    fn select_count(&self, seed: u32, sequence: u64) -> u64 {
        if self.min_count == self.max_count {
            return self.min_count;
        }
        let p = permute(*self.cumulative_caps.last().unwrap(), seed, sequence);
        let index = self.cumulative_caps.partition_point(|&cap| cap <= p) as u64;
        self.min_count + index
    }
}

impl SubstitutionGenerator for EmojiSubstitution {
    fn generate(&self, seed: u32, sequence: u64) -> String {
        let count = self.select_count(seed, sequence);
        let size = self.dictionary.len() as u64;
        let permutation = if self.unique {
            unique_permutation_seeded(seed, size, count, sequence)
        } else {
            non_unique_permutation_seeded(seed, size, count, sequence)
        };
        let mut result = String::with_capacity(EMOJI_MAX_CHAR_LENGTH * count as usize);
        for index in permutation {
            result.push_str(self.dictionary.raw_word(index as usize).text());
        }
        result
    }

    fn capacity(&self) -> BigUint {
        self.cumulative_caps
            .iter()
            .fold(BigUint::from(0u32), |sum, &cap| sum + cap)
    }

    /// The bound is a count of emojis, not of encoded bytes.
    fn max_length(&self) -> usize {
        self.max_count as usize
    }
}
