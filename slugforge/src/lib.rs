//! # Slugforge
//!
//! Slugforge is a deterministic generator of human-readable identifiers
//! ("slugs"). A textual pattern such as `{adjective}-{noun}-{number:4x}` is
//! expanded against a set of word dictionaries; for a fixed `(pattern, seed)`
//! pair the sequence numbers `0, 1, 2, …` map bijectively onto distinct slugs
//! until the pattern capacity is exhausted.
//!
//! ## Examples
//!
//! ```
//! let yaml = r#"
//! adjective:
//!   language: en
//!   words:
//!     brave: []
//!     calm: []
//!     eager: []
//! noun:
//!   language: en
//!   words:
//!     falcon: []
//!     otter: []
//!     lynx: []
//! "#;
//! let dictionaries = slugforge::DictionarySet::from_yaml_str(yaml).unwrap();
//! let generator = slugforge::Generator::new(dictionaries);
//!
//! let slug = generator.generate("{adjective}-{noun}-{number:4x}", "0badc0de", 0).unwrap();
//! assert!(!slug.is_empty());
//!
//! // The same (pattern, seed, sequence) triple always yields the same slug.
//! assert_eq!(
//!     slug,
//!     generator.generate("{adjective}-{noun}-{number:4x}", "0badc0de", 0).unwrap(),
//! );
//! ```

#[cfg(target_pointer_width = "16")]
compile_error!("`target_pointer_width` must be larger than or equal to 32");

pub mod common;
pub mod dictionary;
pub mod errors;
pub mod generator;
mod num;
pub mod pattern;
pub mod permute;
pub mod roman;
mod text;

#[cfg(test)]
mod tests;

pub use dictionary::{Dictionary, DictionarySet, FilteredDictionary, Word};
pub use generator::{Generator, PatternGenerator};
pub use pattern::{Pattern, PatternRef};
