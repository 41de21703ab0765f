//! The slug generation facade.
pub mod pattern_generator;
pub mod substitution;

use rand::Rng;

use crate::dictionary::DictionarySet;
use crate::errors::Result;
use crate::pattern::{Pattern, PatternRef};

pub use pattern_generator::{PatternGenerator, PatternSettings, SelectorSettings};

/// Generates human-readable identifiers from patterns against a set of
/// dictionaries.
///
/// A single `Generator` may be shared across threads: generation is a pure
/// function of `(dictionaries, pattern, settings, seed, sequence)`.
pub struct Generator {
    dictionaries: DictionarySet,
}

impl Generator {
    /// Creates a generator over a dictionary set.
    pub fn new(dictionaries: DictionarySet) -> Self {
        Self { dictionaries }
    }

    /// Returns the dictionary set the generator works against.
    pub fn dictionaries(&self) -> &DictionarySet {
        &self.dictionaries
    }

    /// Produces a fresh random seed: 8 lowercase hex characters.
    pub fn random_seed(&self) -> String {
        format!("{:08x}", rand::thread_rng().gen::<u32>())
    }

    /// Parses a pattern and computes its capacity plan.
    pub fn capacity(&self, pattern: &str) -> Result<PatternSettings> {
        self.capacity_of(&Pattern::parse_arc(pattern)?)
    }

    /// Computes the capacity plan of a parsed pattern.
    pub fn capacity_of(&self, pattern: &PatternRef) -> Result<PatternSettings> {
        Ok(PatternGenerator::new(&self.dictionaries, pattern.clone())?
            .settings()
            .clone())
    }

    /// Parses a pattern and generates the slug for a sequence number.
    pub fn generate(&self, pattern: &str, seed: &str, sequence: u64) -> Result<String> {
        self.generate_pattern(&Pattern::parse_arc(pattern)?, seed, sequence)
    }

    /// Generates the slug of a parsed pattern for a sequence number.
    pub fn generate_pattern(
        &self,
        pattern: &PatternRef,
        seed: &str,
        sequence: u64,
    ) -> Result<String> {
        PatternGenerator::new(&self.dictionaries, pattern.clone())?.generate_seeded(seed, sequence)
    }

    /// Generates the slug of a parsed pattern under a previously computed
    /// capacity plan, keeping the output stable even if the dictionaries
    /// have since grown.
    pub fn generate_with_settings(
        &self,
        settings: &PatternSettings,
        pattern: &PatternRef,
        seed: &str,
        sequence: u64,
    ) -> Result<String> {
        PatternGenerator::with_settings(&self.dictionaries, pattern.clone(), settings.clone())?
            .generate_seeded(seed, sequence)
    }

    /// Generates `count` sequential slugs starting at `sequence`, invoking
    /// the callback once per slug. The seed is hashed once and reused.
    pub fn generate_batch<F>(
        &self,
        pattern: &PatternRef,
        seed: &str,
        sequence: u64,
        count: u64,
        mut callback: F,
    ) -> Result<()>
    where
        F: FnMut(String),
    {
        let generator = PatternGenerator::new(&self.dictionaries, pattern.clone())?;
        let seed_hash = PatternGenerator::seed_hash(seed);
        for i in 0..count {
            callback(generator.generate(seed_hash, sequence + i)?);
        }
        Ok(())
    }

    /// Batch generation under a previously computed capacity plan.
    pub fn generate_batch_with_settings<F>(
        &self,
        settings: &PatternSettings,
        pattern: &PatternRef,
        seed: &str,
        sequence: u64,
        count: u64,
        mut callback: F,
    ) -> Result<()>
    where
        F: FnMut(String),
    {
        let generator =
            PatternGenerator::with_settings(&self.dictionaries, pattern.clone(), settings.clone())?;
        let seed_hash = PatternGenerator::seed_hash(seed);
        for i in 0..count {
            callback(generator.generate(seed_hash, sequence + i)?);
        }
        Ok(())
    }
}
