//! Length and tag indexes over a dictionary's word list.
//!
//! Words are referenced by their position in the backing word list. Posting
//! lists are kept sorted by position, so intersections and differences run as
//! linear merges.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::dictionary::{TagDefinition, Word};
use crate::pattern::placeholder::{Selector, SizeLimit};

fn intersect_sorted(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    result
}

fn difference_sorted(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut result = Vec::with_capacity(a.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() {
        if j < b.len() && a[i] == b[j] {
            i += 1;
            j += 1;
        } else if j < b.len() && b[j] < a[i] {
            j += 1;
        } else {
            result.push(a[i]);
            i += 1;
        }
    }
    result
}

/// Ordered multimap `word length -> positions`.
pub(crate) struct LengthIndex {
    lengths: BTreeMap<usize, Vec<u32>>,
}

impl LengthIndex {
    pub(crate) fn new(words: &[Word]) -> Self {
        let mut lengths: BTreeMap<usize, Vec<u32>> = BTreeMap::new();
        for (i, word) in words.iter().enumerate() {
            lengths
                .entry(word.text().len())
                .or_default()
                .push(i as u32);
        }
        Self { lengths }
    }

    pub(crate) fn max_length(&self) -> usize {
        self.lengths.keys().next_back().copied().unwrap_or(0)
    }

    /// Returns the positions of all words satisfying the predicate, sorted
    /// ascending, along with the maximum length among them.
    pub(crate) fn query(&self, limit: &SizeLimit) -> (Vec<u32>, usize) {
        use crate::pattern::placeholder::CompareOperator::*;
        let value = usize::from(limit.value);
        let mut positions = vec![];
        let mut max_length = 0;
        {
            let mut collect = |bucket_len: &usize, bucket: &Vec<u32>| {
                positions.extend_from_slice(bucket);
                max_length = max_length.max(*bucket_len);
            };
            match limit.op {
                Eq => {
                    if let Some(bucket) = self.lengths.get(&value) {
                        collect(&value, bucket);
                    }
                }
                Ne => {
                    for (len, bucket) in self.lengths.iter().filter(|(len, _)| **len != value) {
                        collect(len, bucket);
                    }
                }
                Lt => {
                    for (len, bucket) in self.lengths.range(..value) {
                        collect(len, bucket);
                    }
                }
                Le => {
                    for (len, bucket) in self.lengths.range(..=value) {
                        collect(len, bucket);
                    }
                }
                Gt => {
                    for (len, bucket) in self.lengths.range(value + 1..) {
                        collect(len, bucket);
                    }
                }
                Ge => {
                    for (len, bucket) in self.lengths.range(value..) {
                        collect(len, bucket);
                    }
                }
            }
        }
        positions.sort_unstable();
        (positions, max_length)
    }
}

/// Map `tag -> positions` plus the full position list.
pub(crate) struct TagIndex {
    tags: HashMap<String, Vec<u32>>,
    all_words: Vec<u32>,
}

impl TagIndex {
    pub(crate) fn new(words: &[Word]) -> Self {
        let mut tags: HashMap<String, Vec<u32>> = HashMap::new();
        let mut all_words = Vec::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            for tag in word.tags() {
                tags.entry(tag.clone()).or_default().push(i as u32);
            }
            all_words.push(i as u32);
        }
        Self { tags, all_words }
    }

    /// Returns the positions of all words carrying every include tag and
    /// none of the exclude tags, sorted ascending.
    pub(crate) fn query(&self, include_tags: &[String], exclude_tags: &[String]) -> Vec<u32> {
        if include_tags.is_empty() && exclude_tags.is_empty() {
            return self.all_words.clone();
        }

        // Exclude tags will usually keep a bigger share of the dictionary,
        // so include tags are applied first.
        let mut result = if include_tags.is_empty() {
            self.all_words.clone()
        } else {
            let mut postings = Vec::with_capacity(include_tags.len());
            for tag in include_tags {
                match self.tags.get(tag) {
                    Some(posting) => postings.push(posting),
                    // A tag carried by no word empties the result.
                    None => return vec![],
                }
            }
            postings.sort_by_key(|posting| posting.len());
            let mut result = postings[0].clone();
            for posting in &postings[1..] {
                result = intersect_sorted(&result, posting);
                if result.is_empty() {
                    return result;
                }
            }
            result
        };

        for tag in exclude_tags {
            if let Some(posting) = self.tags.get(tag) {
                result = difference_sorted(&result, posting);
                if result.is_empty() {
                    return result;
                }
            }
        }
        result
    }

    pub(crate) fn tag_definitions(&self, kind: &str) -> Vec<TagDefinition> {
        let mut result: Vec<TagDefinition> = self
            .tags
            .iter()
            .map(|(tag, posting)| TagDefinition {
                kind: kind.to_owned(),
                tag: tag.clone(),
                description: None,
                opt_in: false,
                word_count: posting.len(),
            })
            .collect();
        result.sort_by(|a, b| a.tag.cmp(&b.tag));
        result
    }
}

/// The tag and length indexes combined into one selector query.
pub(crate) struct CombinedIndex {
    tag_index: TagIndex,
    length_index: LengthIndex,
}

impl CombinedIndex {
    pub(crate) fn new(words: &[Word]) -> Self {
        Self {
            tag_index: TagIndex::new(words),
            length_index: LengthIndex::new(words),
        }
    }

    pub(crate) fn max_length(&self) -> usize {
        self.length_index.max_length()
    }

    /// Returns the positions of the words a selector keeps, sorted
    /// ascending, and the maximum word length among them.
    pub(crate) fn query(&self, selector: &Selector, words: &[Word]) -> (Vec<u32>, usize) {
        let Some(limit) = &selector.size_limit else {
            let positions = self
                .tag_index
                .query(&selector.include_tags, &selector.exclude_tags);
            let max_length = positions
                .iter()
                .map(|&i| words[i as usize].text().len())
                .max()
                .unwrap_or(0);
            return (positions, max_length);
        };
        if !selector.has_tags() {
            return self.length_index.query(limit);
        }
        let mut positions = self
            .tag_index
            .query(&selector.include_tags, &selector.exclude_tags);
        let mut max_length = 0;
        positions.retain(|&i| {
            let len = words[i as usize].text().len();
            let keep = limit.matches(len);
            if keep {
                max_length = max_length.max(len);
            }
            keep
        });
        (positions, max_length)
    }

    /// Tag-only query used by the emoji dictionary.
    pub(crate) fn query_tags(
        &self,
        include_tags: &[String],
        exclude_tags: &[String],
        words: &[Word],
    ) -> (Vec<u32>, usize) {
        let positions = self.tag_index.query(include_tags, exclude_tags);
        let max_length = positions
            .iter()
            .map(|&i| words[i as usize].text().len())
            .max()
            .unwrap_or(0);
        (positions, max_length)
    }

    pub(crate) fn tag_definitions(&self, kind: &str) -> Vec<TagDefinition> {
        self.tag_index.tag_definitions(kind)
    }
}
