//! Word dictionaries, filtered views, and dictionary sets.
pub(crate) mod cache;
pub(crate) mod emoji;
pub(crate) mod index;
pub(crate) mod loader;

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::sync::Arc;

use bincode::{Decode, Encode};

use crate::common;
use crate::errors::Result;
use crate::pattern::placeholder::{CaseType, Selector};
use crate::text;
use cache::FilteredViewCache;
use index::CombinedIndex;

pub use emoji::emoji_dictionary;

/// Language a selector falls back to when neither it nor the global section
/// names one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A dictionary word with its tags.
///
/// Tags are kept sorted and deduplicated; the word text is expected to be
/// lower case, the storage case of dictionaries.
#[derive(Clone, Eq, PartialEq, Debug, Decode, Encode)]
pub struct Word {
    text: String,
    tags: Vec<String>,
}

impl Word {
    /// Creates a word, sorting and deduplicating its tags.
    pub fn new<S, I, T>(text: S, tags: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        tags.sort_unstable();
        tags.dedup();
        Self {
            text: text.into(),
            tags,
        }
    }

    /// Returns the word text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the sorted tag list.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// An immutable projection of a dictionary: the words a selector keeps, the
/// effective case, and the maximum word length among them.
///
/// The view shares the parent's word storage, so positions stay valid for
/// the lifetime of the view regardless of what happens to the parent
/// dictionary value.
pub struct FilteredDictionary {
    words: Arc<Vec<Word>>,
    case: CaseType,
    positions: Vec<u32>,
    max_length: usize,
}

impl FilteredDictionary {
    pub(crate) fn new(
        words: Arc<Vec<Word>>,
        case: CaseType,
        positions: Vec<u32>,
        max_length: usize,
    ) -> Self {
        Self {
            words,
            case,
            positions,
            max_length,
        }
    }

    /// Returns the `index`-th selected word with the view's case applied.
    /// Mixed case is driven by the generator's seeded mask and is applied
    /// there, not here.
    pub fn word(&self, index: usize) -> String {
        let word = self.raw_word(index).text();
        match self.case {
            CaseType::None | CaseType::Lower | CaseType::Mixed => word.to_owned(),
            CaseType::Upper => text::to_upper(word),
            CaseType::Title => text::capitalize(word),
        }
    }

    /// Returns the `index`-th selected word without case transformation.
    pub fn raw_word(&self, index: usize) -> &Word {
        &self.words[self.positions[index] as usize]
    }

    /// Returns the effective case of the view.
    pub fn case(&self) -> CaseType {
        self.case
    }

    /// Number of selected words.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Checks whether the view selects no words.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Maximum length in bytes among the selected words.
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

/// Statistics of a dictionary.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DictionaryStats {
    /// Dictionary kind.
    pub kind: String,
    /// Dictionary language, empty for language-agnostic dictionaries.
    pub language: String,
    /// Number of words.
    pub count: usize,
}

/// Definition of a tag within a dictionary.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TagDefinition {
    /// Dictionary kind the tag belongs to.
    pub kind: String,
    /// Tag name.
    pub tag: String,
    /// Human-readable description, if any.
    pub description: Option<String>,
    /// Whether words carrying the tag are excluded unless requested.
    pub opt_in: bool,
    /// Number of words carrying the tag.
    pub word_count: usize,
}

/// An immutable collection of words of a single `(kind, language)` pair with
/// prebuilt length and tag indexes and an optional cache of filtered views.
pub struct Dictionary {
    kind: String,
    language: String,
    words: Arc<Vec<Word>>,
    index: CombinedIndex,
    cache: Option<FilteredViewCache>,
}

impl Dictionary {
    /// Builds a dictionary and its indexes. With `use_cache`, filtered views
    /// are memoized in a 16-way LRU keyed by the selector hash.
    pub fn new<S, L>(kind: S, language: L, words: Vec<Word>, use_cache: bool) -> Self
    where
        S: Into<String>,
        L: Into<String>,
    {
        let index = CombinedIndex::new(&words);
        Self {
            kind: kind.into(),
            language: language.into(),
            words: Arc::new(words),
            index,
            cache: use_cache.then(FilteredViewCache::new),
        }
    }

    /// Returns the dictionary kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the dictionary language; empty for language-agnostic
    /// dictionaries.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the `index`-th word.
    pub fn word(&self, index: usize) -> &Word {
        &self.words[index]
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Checks whether the dictionary has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Filters the dictionary by a selector. Returns `None` when the
    /// selector's kind or language does not match this dictionary; the
    /// returned view may still be empty when no word satisfies the selector.
    pub fn filter(&self, selector: &Selector) -> Option<Arc<FilteredDictionary>> {
        if text::to_lower(&selector.kind) != self.kind {
            return None;
        }
        if let Some(language) = &selector.language {
            if language != &self.language {
                return None;
            }
        }
        Some(match &self.cache {
            Some(cache) => {
                cache.get_or_insert(selector.hash64(), || self.compute_filter(selector))
            }
            None => self.compute_filter(selector),
        })
    }

    fn compute_filter(&self, selector: &Selector) -> Arc<FilteredDictionary> {
        let (positions, max_length) = self.index.query(selector, &self.words);
        Arc::new(FilteredDictionary::new(
            Arc::clone(&self.words),
            selector.case(),
            positions,
            max_length,
        ))
    }

    /// Filters the dictionary by tags only, bypassing kind and language
    /// matching and the cache. Used by the emoji generator.
    pub fn filter_tags(
        &self,
        include_tags: &[String],
        exclude_tags: &[String],
    ) -> Arc<FilteredDictionary> {
        let (positions, max_length) =
            self.index
                .query_tags(include_tags, exclude_tags, &self.words);
        Arc::new(FilteredDictionary::new(
            Arc::clone(&self.words),
            CaseType::None,
            positions,
            max_length,
        ))
    }

    /// Returns the dictionary statistics.
    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            kind: self.kind.clone(),
            language: self.language.clone(),
            count: self.words.len(),
        }
    }

    /// Returns the definitions of all tags present in the dictionary, sorted
    /// by tag name.
    pub fn tag_definitions(&self) -> Vec<TagDefinition> {
        self.index.tag_definitions(&self.kind)
    }
}

#[derive(Decode, Encode)]
struct DictionaryData {
    kind: String,
    language: String,
    words: Vec<Word>,
}

/// A set of dictionaries keyed by `kind` or `kind-language`, resolving
/// selectors to the dictionary they address.
pub struct DictionarySet {
    dictionaries: BTreeMap<String, Dictionary>,
    language_agnostic_kinds: BTreeSet<String>,
}

impl DictionarySet {
    /// Builds a set from dictionaries. A dictionary with an empty language
    /// is registered language-agnostic and keyed by kind alone.
    pub fn new(dictionaries: Vec<Dictionary>) -> Self {
        let mut map = BTreeMap::new();
        let mut language_agnostic_kinds = BTreeSet::new();
        for dictionary in dictionaries {
            let mut key = dictionary.kind().to_owned();
            if dictionary.language().is_empty() {
                language_agnostic_kinds.insert(key.clone());
            } else {
                key.push('-');
                key.push_str(dictionary.language());
            }
            map.insert(key, dictionary);
        }
        Self {
            dictionaries: map,
            language_agnostic_kinds,
        }
    }

    /// Number of dictionaries in the set.
    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    /// Checks whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }

    /// Resolves the dictionary a selector addresses and filters it.
    ///
    /// A selector without a language defaults to `en` for kinds that have
    /// language-specific dictionaries; for a language-agnostic kind, a
    /// language-specific dictionary is preferred when one exists for the
    /// requested language.
    pub fn filter(&self, selector: &Selector) -> Option<Arc<FilteredDictionary>> {
        let mut key = text::to_lower(&selector.kind);
        if self.language_agnostic_kinds.contains(&key) {
            if let Some(language) = &selector.language {
                let lang_key = format!("{key}-{}", text::to_lower(language));
                if let Some(dictionary) = self.dictionaries.get(&lang_key) {
                    return dictionary.filter(selector);
                }
            }
        } else {
            key.push('-');
            match &selector.language {
                Some(language) => key.push_str(&text::to_lower(language)),
                None => key.push_str(DEFAULT_LANGUAGE),
            }
        }
        self.dictionaries.get(&key)?.filter(selector)
    }

    /// Returns the statistics of every dictionary in the set, in key order.
    pub fn stats(&self) -> Vec<DictionaryStats> {
        self.dictionaries.values().map(Dictionary::stats).collect()
    }

    /// Parses a dictionary set from a YAML document mapping kinds to word
    /// tables.
    pub fn from_yaml_str(data: &str) -> Result<Self> {
        loader::from_yaml_str(data)
    }

    /// Parses a dictionary set from a JSON document mapping kinds to word
    /// tables.
    pub fn from_json_str(data: &str) -> Result<Self> {
        loader::from_json_str(data)
    }

    /// Exports the set in the binary dictionary format.
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<usize>
    where
        W: Write,
    {
        let data: Vec<DictionaryData> = self
            .dictionaries
            .values()
            .map(|dictionary| DictionaryData {
                kind: dictionary.kind().to_owned(),
                language: dictionary.language().to_owned(),
                words: dictionary.words.as_ref().clone(),
            })
            .collect();
        let num_bytes = bincode::encode_into_std_write(&data, &mut wtr, common::bincode_config())?;
        Ok(num_bytes)
    }

    /// Reads a set from the binary dictionary format produced by
    /// [`DictionarySet::write()`].
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let data: Vec<DictionaryData> =
            bincode::decode_from_std_read(&mut rdr, common::bincode_config())?;
        Ok(Self::new(
            data.into_iter()
                .map(|d| Dictionary::new(d.kind, d.language, d.words, true))
                .collect(),
        ))
    }
}
