//! Placeholder variants of the pattern language.

use std::collections::BTreeMap;
use std::fmt;

use crate::dictionary::Word;
use crate::text;

/// Maximum width of a decimal number placeholder (fits a 64-bit integer).
pub const MAX_DECIMAL_LENGTH: u64 = 18;
/// Maximum width of a hexadecimal number placeholder (8 bytes).
pub const MAX_HEX_LENGTH: u64 = 16;
/// Maximum length of a special-character placeholder (5 bits per symbol,
/// 60 bits total).
pub const MAX_SPECIAL_LENGTH: u64 = 12;
/// Maximum length of a Roman numeral (the encoding of 3888).
pub const MAX_ROMAN_LENGTH: u64 = 15;
/// Maximum number of emojis a single placeholder may produce.
pub const MAX_EMOJI_COUNT: u64 = 6;

const DICTIONARY_BASE_COST: i32 = 5;
const DICTIONARY_TAG_COST: i32 = 2;
const DICTIONARY_LENGTH_COST: i32 = 2;
const DICTIONARY_TAG_AND_LENGTH_COST: i32 = 1;
const DICTIONARY_UPPER_CASE_COST: i32 = 2;
const DICTIONARY_TITLE_CASE_COST: i32 = 3;
const DICTIONARY_MIXED_CASE_COST: i32 = 6;
const NUMBER_BASE_COST: i32 = 3;
const SPECIAL_CHAR_BASE_COST: i32 = 4;
const SPECIAL_CHAR_LENGTH_COST: i32 = 1;
const SPECIAL_CHAR_VARIABLE_LENGTH_COST: i32 = 2;
const EMOJI_BASE_COST: i32 = 5;

const NSFW_TAG: &str = "nsfw";

const FNV1A64_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV1A64_PRIME: u64 = 0x0000_0100_0000_01b3;

pub(crate) fn str_hash(s: &str) -> u64 {
    let mut hash = FNV1A64_OFFSET_BASIS;
    for b in s.bytes() {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV1A64_PRIME);
    }
    hash
}

pub(crate) fn hash_combine(seed: u64, value: u64) -> u64 {
    seed ^ value
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

/// Case applied to a dictionary word, inferred from the capitalization of the
/// selector's kind.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CaseType {
    /// No transformation.
    None,
    /// All lower case (the storage case of dictionaries).
    Lower,
    /// All upper case.
    Upper,
    /// First character upper case, the rest lower case.
    Title,
    /// Per-character case driven by a seeded 64-bit mask.
    Mixed,
}

/// Comparison operator of a word-length predicate.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CompareOperator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
}

/// A word-length predicate attached to a selector.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct SizeLimit {
    /// The comparison operator.
    pub op: CompareOperator,
    /// The length the word length is compared against.
    pub value: u8,
}

impl SizeLimit {
    /// Checks whether a word length satisfies the predicate.
    pub fn matches(&self, length: usize) -> bool {
        let value = usize::from(self.value);
        match self.op {
            CompareOperator::Eq => length == value,
            CompareOperator::Ne => length != value,
            CompareOperator::Lt => length < value,
            CompareOperator::Le => length <= value,
            CompareOperator::Gt => length > value,
            CompareOperator::Ge => length >= value,
        }
    }

    pub(crate) fn hash64(&self) -> u64 {
        hash_combine(self.op as u64, u64::from(self.value))
    }
}

impl fmt::Display for SizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = match self.op {
            CompareOperator::Eq => "==",
            CompareOperator::Ne => "!=",
            CompareOperator::Lt => "<",
            CompareOperator::Le => "<=",
            CompareOperator::Gt => ">",
            CompareOperator::Ge => ">=",
        };
        write!(f, "{}{}", op, self.value)
    }
}

/// The dictionary-selecting placeholder variant.
///
/// Tags are kept sorted and deduplicated, so equality and the canonical
/// rendering do not depend on the order they were written in.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Selector {
    /// Dictionary kind as written in the pattern; its capitalization selects
    /// the output case.
    pub kind: String,
    /// Tags every selected word must carry.
    pub include_tags: Vec<String>,
    /// Tags no selected word may carry.
    pub exclude_tags: Vec<String>,
    /// Dictionary language; `None` falls back to the set default.
    pub language: Option<String>,
    /// Optional word-length predicate.
    pub size_limit: Option<SizeLimit>,
    /// Key-value options. Currently rejected for dictionary selectors, kept
    /// for forward compatibility of the grammar.
    pub options: BTreeMap<String, String>,
}

impl Selector {
    /// Infers the output case from the capitalization of the kind.
    pub fn case(&self) -> CaseType {
        if self.kind == text::to_lower(&self.kind) {
            CaseType::Lower
        } else if self.kind == text::to_upper(&self.kind) {
            CaseType::Upper
        } else if self.kind == text::capitalize(&self.kind) {
            CaseType::Title
        } else {
            CaseType::Mixed
        }
    }

    /// Checks whether the selector has a word-length predicate.
    pub fn has_size_limit(&self) -> bool {
        self.size_limit.is_some()
    }

    /// Checks whether the selector has any include or exclude tags.
    pub fn has_tags(&self) -> bool {
        !self.include_tags.is_empty() || !self.exclude_tags.is_empty()
    }

    /// Checks whether the selector selects the whole dictionary.
    pub fn no_filter(&self) -> bool {
        !self.has_tags() && !self.has_size_limit()
    }

    /// Returns the tags present in both the include and the exclude list.
    /// A non-empty result makes the selector unsatisfiable.
    pub fn mutually_exclusive_tags(&self) -> Vec<&str> {
        self.exclude_tags
            .iter()
            .filter(|tag| contains_tag(&self.include_tags, tag))
            .map(String::as_str)
            .collect()
    }

    /// Checks whether a word satisfies the selector's tag and length
    /// constraints. Kind and language are matched by the owning dictionary.
    pub fn matches(&self, word: &Word) -> bool {
        if !self
            .include_tags
            .iter()
            .all(|tag| word.tags().binary_search(tag).is_ok())
        {
            return false;
        }
        if self
            .exclude_tags
            .iter()
            .any(|tag| word.tags().binary_search(tag).is_ok())
        {
            return false;
        }
        match &self.size_limit {
            Some(limit) => limit.matches(word.text().len()),
            None => true,
        }
    }

    /// Checks whether the selector explicitly requests NSFW words.
    pub fn is_nsfw(&self) -> bool {
        self.include_tags.iter().any(|tag| tag == NSFW_TAG)
    }

    /// A 64-bit hash identifying the filtered view this selector produces,
    /// used as the filtered-view cache key.
    pub fn hash64(&self) -> u64 {
        let mut seed = str_hash(&self.kind);
        if let Some(language) = &self.language {
            seed = hash_combine(seed, str_hash(language));
        }
        for tag in &self.include_tags {
            seed = hash_combine(seed, str_hash(tag));
        }
        for tag in &self.exclude_tags {
            seed = hash_combine(seed, str_hash(tag));
        }
        if let Some(limit) = &self.size_limit {
            seed = hash_combine(seed, limit.hash64());
        }
        for (key, value) in &self.options {
            seed = hash_combine(seed, str_hash(key));
            seed = hash_combine(seed, str_hash(value));
        }
        seed
    }

    /// The integer cost of the selector for rate limiting.
    pub fn complexity(&self) -> i32 {
        let mut cost = DICTIONARY_BASE_COST;
        cost += DICTIONARY_TAG_COST
            * i32::try_from(self.include_tags.len() + self.exclude_tags.len()).unwrap_or(i32::MAX);
        if self.size_limit.is_some() {
            cost += DICTIONARY_LENGTH_COST;
            if self.has_tags() {
                cost += DICTIONARY_TAG_AND_LENGTH_COST;
            }
        }
        cost += match self.case() {
            CaseType::Upper => DICTIONARY_UPPER_CASE_COST,
            CaseType::Title => DICTIONARY_TITLE_CASE_COST,
            CaseType::Mixed => DICTIONARY_MIXED_CASE_COST,
            CaseType::None | CaseType::Lower => 0,
        };
        cost
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")?;
        }
        if self.has_tags() || self.has_size_limit() || !self.options.is_empty() {
            write!(f, ":")?;
        }
        for tag in &self.include_tags {
            write!(f, "+{tag}")?;
        }
        for tag in &self.exclude_tags {
            write!(f, "-{tag}")?;
        }
        if let Some(limit) = &self.size_limit {
            write!(f, "{limit}")?;
        }
        if !self.options.is_empty() {
            let mut first = !self.has_tags() && !self.has_size_limit();
            for (key, value) in &self.options {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{key}={value}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Radix of a number placeholder.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum NumberBase {
    /// Decimal digits.
    Dec,
    /// Lower-case hexadecimal digits.
    Hex,
    /// Upper-case hexadecimal digits.
    HexUpper,
    /// Upper-case Roman numerals.
    Roman,
    /// Lower-case Roman numerals.
    RomanLower,
}

impl NumberBase {
    /// The single-character base suffix used in the canonical rendering.
    pub const fn suffix(self) -> char {
        match self {
            Self::Dec => 'd',
            Self::Hex => 'x',
            Self::HexUpper => 'X',
            Self::Roman => 'R',
            Self::RomanLower => 'r',
        }
    }

    /// Checks whether the base produces Roman numerals.
    pub const fn is_roman(self) -> bool {
        matches!(self, Self::Roman | Self::RomanLower)
    }
}

/// The number placeholder variant: `{number:Nb}`.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct NumberGen {
    /// Width of the generated number (digit count, or the length cap for
    /// Roman numerals).
    pub max_length: u8,
    /// Radix of the generated number.
    pub base: NumberBase,
}

impl NumberGen {
    pub(crate) fn hash64(&self) -> u64 {
        hash_combine(self.base as u64, u64::from(self.max_length))
    }

    /// The integer cost of the placeholder for rate limiting.
    pub const fn complexity(&self) -> i32 {
        NUMBER_BASE_COST
    }
}

impl fmt::Display for NumberGen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "number:{}{}", self.max_length, self.base.suffix())
    }
}

/// The special-character placeholder variant: `{special:min-max}`.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct SpecialCharGen {
    /// Minimum number of symbols, inclusive.
    pub min_length: u8,
    /// Maximum number of symbols, inclusive.
    pub max_length: u8,
}

impl SpecialCharGen {
    pub(crate) fn hash64(&self) -> u64 {
        hash_combine(u64::from(self.min_length), u64::from(self.max_length))
    }

    /// The integer cost of the placeholder for rate limiting.
    pub fn complexity(&self) -> i32 {
        let mut cost =
            SPECIAL_CHAR_BASE_COST + 0.max(i32::from(self.min_length) - 2) * SPECIAL_CHAR_LENGTH_COST;
        if self.min_length != self.max_length {
            cost += i32::from(self.max_length - self.min_length) * SPECIAL_CHAR_VARIABLE_LENGTH_COST;
        }
        cost
    }
}

impl fmt::Display for SpecialCharGen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.min_length == self.max_length {
            write!(f, "special:{}", self.min_length)
        } else {
            write!(f, "special:{}-{}", self.min_length, self.max_length)
        }
    }
}

/// The emoji placeholder variant: `{emoji:tags options}`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EmojiGen {
    /// Tags every selected emoji must carry.
    pub include_tags: Vec<String>,
    /// Tags no selected emoji may carry.
    pub exclude_tags: Vec<String>,
    /// Minimum number of emojis, inclusive.
    pub min_count: u8,
    /// Maximum number of emojis, inclusive.
    pub max_count: u8,
    /// Whether the emojis within one substitution must be pairwise distinct.
    pub unique: bool,
    /// Skin tone option, empty when unset.
    pub tone: String,
    /// Gender option, empty when unset.
    pub gender: String,
}

impl Default for EmojiGen {
    fn default() -> Self {
        Self {
            include_tags: vec![],
            exclude_tags: vec![],
            min_count: 1,
            max_count: 1,
            unique: false,
            tone: String::new(),
            gender: String::new(),
        }
    }
}

impl EmojiGen {
    pub(crate) fn hash64(&self) -> u64 {
        let mut seed = str_hash("emoji");
        for tag in &self.include_tags {
            seed = hash_combine(seed, str_hash(tag));
        }
        for tag in &self.exclude_tags {
            seed = hash_combine(seed, str_hash(tag));
        }
        seed = hash_combine(seed, u64::from(self.min_count));
        seed = hash_combine(seed, u64::from(self.max_count));
        seed = hash_combine(seed, u64::from(self.unique));
        seed = hash_combine(seed, str_hash(&self.tone));
        seed = hash_combine(seed, str_hash(&self.gender));
        seed
    }

    /// The integer cost of the placeholder for rate limiting.
    pub const fn complexity(&self) -> i32 {
        EMOJI_BASE_COST
    }

    fn has_rendered_options(&self) -> bool {
        self.min_count != 1
            || self.max_count != 1
            || self.unique
            || !self.tone.is_empty()
            || !self.gender.is_empty()
    }
}

impl fmt::Display for EmojiGen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "emoji")?;
        let has_tags = !self.include_tags.is_empty() || !self.exclude_tags.is_empty();
        if has_tags || self.has_rendered_options() {
            write!(f, ":")?;
        }
        for tag in &self.include_tags {
            write!(f, "+{tag}")?;
        }
        for tag in &self.exclude_tags {
            write!(f, "-{tag}")?;
        }
        let mut separate = has_tags;
        if self.min_count != 1 || self.max_count != 1 {
            if separate {
                write!(f, " ")?;
            }
            write!(f, "count={}", self.min_count)?;
            if self.min_count != self.max_count {
                write!(f, "-{}", self.max_count)?;
            }
            separate = true;
        }
        if self.unique {
            if separate {
                write!(f, " ")?;
            }
            write!(f, "unique=true")?;
            separate = true;
        }
        if !self.tone.is_empty() {
            if separate {
                write!(f, " ")?;
            }
            write!(f, "tone={}", self.tone)?;
            separate = true;
        }
        if !self.gender.is_empty() {
            if separate {
                write!(f, " ")?;
            }
            write!(f, "gender={}", self.gender)?;
        }
        Ok(())
    }
}

/// Inserts a tag into a sorted tag list, keeping it sorted and deduplicated.
pub(crate) fn insert_tag(tags: &mut Vec<String>, tag: &str) {
    if let Err(pos) = tags.binary_search_by(|probe| probe.as_str().cmp(tag)) {
        tags.insert(pos, tag.to_owned());
    }
}

/// Checks whether a sorted tag list contains a tag.
pub(crate) fn contains_tag(tags: &[String], tag: &str) -> bool {
    tags.binary_search_by(|probe| probe.as_str().cmp(tag)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit_matches() {
        let limit = SizeLimit {
            op: CompareOperator::Le,
            value: 5,
        };
        assert!(limit.matches(4));
        assert!(limit.matches(5));
        assert!(!limit.matches(6));
    }

    #[test]
    fn case_inference() {
        let mut selector = Selector::default();
        selector.kind = "noun".into();
        assert_eq!(selector.case(), CaseType::Lower);
        selector.kind = "NOUN".into();
        assert_eq!(selector.case(), CaseType::Upper);
        selector.kind = "Noun".into();
        assert_eq!(selector.case(), CaseType::Title);
        selector.kind = "nOun".into();
        assert_eq!(selector.case(), CaseType::Mixed);
    }

    #[test]
    fn nsfw_requires_include_tag() {
        let mut selector = Selector::default();
        selector.kind = "noun".into();
        assert!(!selector.is_nsfw());
        insert_tag(&mut selector.exclude_tags, "nsfw");
        assert!(!selector.is_nsfw());
        selector.exclude_tags.clear();
        insert_tag(&mut selector.include_tags, "nsfw");
        assert!(selector.is_nsfw());
    }

    #[test]
    fn tag_list_stays_sorted() {
        let mut tags = vec![];
        insert_tag(&mut tags, "zeta");
        insert_tag(&mut tags, "alpha");
        insert_tag(&mut tags, "zeta");
        assert_eq!(tags, vec!["alpha".to_owned(), "zeta".to_owned()]);
        assert!(contains_tag(&tags, "alpha"));
        assert!(!contains_tag(&tags, "beta"));
    }

    #[test]
    fn selector_complexity() {
        let mut selector = Selector::default();
        selector.kind = "noun".into();
        assert_eq!(selector.complexity(), 5);
        insert_tag(&mut selector.include_tags, "tag1");
        insert_tag(&mut selector.exclude_tags, "tag2");
        assert_eq!(selector.complexity(), 9);
        selector.size_limit = Some(SizeLimit {
            op: CompareOperator::Le,
            value: 8,
        });
        assert_eq!(selector.complexity(), 12);
        selector.kind = "nOun".into();
        assert_eq!(selector.complexity(), 18);
    }
}
