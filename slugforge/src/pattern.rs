//! Pattern values of the slug generation language.
//!
//! A pattern is a string interleaving literal text with placeholders, e.g.
//! `{adjective}-{noun}-{number:4x}`. Parsing produces an immutable
//! [`Pattern`] holding the placeholder sequence and the literal text chunks
//! around them, with the invariant `text_chunks.len() == placeholders.len() + 1`.

pub mod placeholder;
pub(crate) mod parser;

use std::fmt;
use std::sync::Arc;

use crate::errors::{Result, SlugforgeError};
use crate::permute::fnv1a_hash;
use placeholder::{hash_combine, EmojiGen, NumberGen, Selector, SpecialCharGen};

/// A typed element of a pattern that expands to a substitution at generation
/// time.
#[derive(Clone, PartialEq, Debug)]
pub enum Placeholder {
    /// A dictionary selector.
    Selector(Selector),
    /// A number generator.
    Number(NumberGen),
    /// A special-character generator.
    Special(SpecialCharGen),
    /// An emoji generator.
    Emoji(EmojiGen),
}

impl Placeholder {
    pub(crate) fn hash64(&self) -> u64 {
        match self {
            Self::Selector(s) => s.hash64(),
            Self::Number(n) => n.hash64(),
            Self::Special(s) => s.hash64(),
            Self::Emoji(e) => e.hash64(),
        }
    }

    /// The integer cost of the placeholder for rate limiting.
    pub fn complexity(&self) -> i32 {
        match self {
            Self::Selector(s) => s.complexity(),
            Self::Number(n) => n.complexity(),
            Self::Special(s) => s.complexity(),
            Self::Emoji(e) => e.complexity(),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Selector(s) => s.fmt(f),
            Self::Number(n) => n.fmt(f),
            Self::Special(s) => s.fmt(f),
            Self::Emoji(e) => e.fmt(f),
        }
    }
}

/// A parsed, immutable pattern.
#[derive(Debug)]
pub struct Pattern {
    source: String,
    text_chunks: Vec<String>,
    placeholders: Vec<Placeholder>,
}

/// Shared handle to a parsed pattern.
pub type PatternRef = Arc<Pattern>;

impl Pattern {
    /// Parses a pattern from its source text.
    ///
    /// # Errors
    ///
    /// [`SlugforgeError::PatternSyntax`] when the source does not conform to
    /// the pattern language.
    pub fn parse<S>(source: S) -> Result<Self>
    where
        S: Into<String>,
    {
        let source = source.into();
        let (text_chunks, placeholders) = parser::PatternParser::new(&source).parse()?;
        Ok(Self {
            source,
            text_chunks,
            placeholders,
        })
    }

    /// Parses a pattern and wraps it into a shared handle.
    pub fn parse_arc<S>(source: S) -> Result<PatternRef>
    where
        S: Into<String>,
    {
        Ok(Arc::new(Self::parse(source)?))
    }

    /// Returns the pattern source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the placeholder sequence.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Returns the literal text chunks. Chunk `i` precedes placeholder `i`;
    /// the last chunk is the trailing text.
    pub fn text_chunks(&self) -> &[String] {
        &self.text_chunks
    }

    /// Checks whether the pattern contains no placeholders.
    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Total length in bytes of the literal text chunks.
    pub fn arbitrary_text_length(&self) -> usize {
        self.text_chunks.iter().map(String::len).sum()
    }

    /// Interleaves the literal text chunks with the given substitutions.
    ///
    /// # Errors
    ///
    /// [`SlugforgeError::SlugFormat`] when the substitution count does not
    /// match the placeholder count.
    pub fn format(&self, substitutions: &[String]) -> Result<String> {
        if substitutions.len() != self.placeholders.len() {
            return Err(SlugforgeError::slug_format(
                self.placeholders.len(),
                substitutions.len(),
            ));
        }
        let total_len =
            self.arbitrary_text_length() + substitutions.iter().map(String::len).sum::<usize>();
        let mut result = String::with_capacity(total_len);
        for (chunk, substitution) in self.text_chunks.iter().zip(substitutions) {
            result.push_str(chunk);
            result.push_str(substitution);
        }
        // The invariant text_chunks.len() == placeholders.len() + 1 holds for
        // every parsed pattern.
        result.push_str(self.text_chunks.last().map(String::as_str).unwrap_or(""));
        Ok(result)
    }

    /// A 64-bit hash of the pattern, combining the source text with the
    /// placeholder structure.
    pub fn hash64(&self) -> u64 {
        let mut seed = u64::from(fnv1a_hash(&self.source));
        for placeholder in &self.placeholders {
            seed = hash_combine(seed, placeholder.hash64());
        }
        seed
    }

    /// The integer cost of the pattern for rate limiting: the sum of the
    /// per-placeholder costs.
    pub fn complexity(&self) -> i32 {
        self.placeholders.iter().map(Placeholder::complexity).sum()
    }

    /// Checks whether any selector of the pattern explicitly requests NSFW
    /// words. The dictionaries themselves may still contain unmarked words.
    pub fn is_nsfw(&self) -> bool {
        self.placeholders.iter().any(|p| match p {
            Placeholder::Selector(s) => s.is_nsfw(),
            _ => false,
        })
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    /// Renders the canonical form of the pattern: tags in sorted order and
    /// number bases as suffix characters.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (chunk, placeholder) in self.text_chunks.iter().zip(&self.placeholders) {
            write!(f, "{chunk}{{{placeholder}}}")?;
        }
        write!(f, "{}", self.text_chunks.last().map(String::as_str).unwrap_or(""))
    }
}

/// Parses only the placeholder sequence of a pattern, discarding the literal
/// text chunks.
pub fn parse_placeholders(source: &str) -> Result<Vec<Placeholder>> {
    let (_, placeholders) = parser::PatternParser::new(source).parse()?;
    Ok(placeholders)
}
