//! Structured loading of dictionary sets from YAML and JSON documents.
//!
//! The input is a top-level object mapping each dictionary kind to its word
//! table:
//!
//! ```yaml
//! noun:
//!   language: en
//!   words:
//!     apple: [fruit]
//!     banana: [fruit]
//! ```
//!
//! Document order of the word tables is preserved, so loading the same
//! document always produces the same word positions.

use crate::dictionary::{Dictionary, DictionarySet, Word};
use crate::errors::{Result, SlugforgeError};

pub(crate) fn from_yaml_str(data: &str) -> Result<DictionarySet> {
    let value: serde_yaml::Value = serde_yaml::from_str(data)?;
    let mapping = value
        .as_mapping()
        .ok_or_else(|| SlugforgeError::dictionary("expected an object of dictionaries"))?;
    let mut dictionaries = vec![];
    for (kind, body) in mapping {
        let kind = kind
            .as_str()
            .ok_or_else(|| SlugforgeError::dictionary("dictionary kind must be a string"))?;
        let (language, words) = parse_yaml_dictionary(kind, body)?;
        dictionaries.push(Dictionary::new(kind, language, words, true));
    }
    Ok(DictionarySet::new(dictionaries))
}

pub(crate) fn parse_yaml_dictionary(
    kind: &str,
    body: &serde_yaml::Value,
) -> Result<(String, Vec<Word>)> {
    let language = body
        .get("language")
        .and_then(serde_yaml::Value::as_str)
        .unwrap_or("")
        .to_owned();
    let table = body
        .get("words")
        .ok_or_else(|| SlugforgeError::dictionary(format!("dictionary `{kind}` has no words")))?
        .as_mapping()
        .ok_or_else(|| {
            SlugforgeError::dictionary(format!("words of dictionary `{kind}` must be an object"))
        })?;
    let mut words = Vec::with_capacity(table.len());
    for (text, tags) in table {
        let text = text.as_str().ok_or_else(|| {
            SlugforgeError::dictionary(format!("word of dictionary `{kind}` must be a string"))
        })?;
        let tags = tags.as_sequence().ok_or_else(|| {
            SlugforgeError::dictionary(format!("tags of word `{text}` must be an array"))
        })?;
        let tags = tags
            .iter()
            .map(|tag| {
                tag.as_str().map(str::to_owned).ok_or_else(|| {
                    SlugforgeError::dictionary(format!("tag of word `{text}` must be a string"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        words.push(Word::new(text, tags));
    }
    Ok((language, words))
}

pub(crate) fn from_json_str(data: &str) -> Result<DictionarySet> {
    let value: serde_json::Value = serde_json::from_str(data)?;
    let object = value
        .as_object()
        .ok_or_else(|| SlugforgeError::dictionary("expected an object of dictionaries"))?;
    let mut dictionaries = vec![];
    for (kind, body) in object {
        let language = body
            .get("language")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("")
            .to_owned();
        let table = body
            .get("words")
            .ok_or_else(|| {
                SlugforgeError::dictionary(format!("dictionary `{kind}` has no words"))
            })?
            .as_object()
            .ok_or_else(|| {
                SlugforgeError::dictionary(format!(
                    "words of dictionary `{kind}` must be an object"
                ))
            })?;
        let mut words = Vec::with_capacity(table.len());
        for (text, tags) in table {
            let tags = tags.as_array().ok_or_else(|| {
                SlugforgeError::dictionary(format!("tags of word `{text}` must be an array"))
            })?;
            let tags = tags
                .iter()
                .map(|tag| {
                    tag.as_str().map(str::to_owned).ok_or_else(|| {
                        SlugforgeError::dictionary(format!("tag of word `{text}` must be a string"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            words.push(Word::new(text.as_str(), tags));
        }
        dictionaries.push(Dictionary::new(kind.as_str(), language, words, true));
    }
    Ok(DictionarySet::new(dictionaries))
}
