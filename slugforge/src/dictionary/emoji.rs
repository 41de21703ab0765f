//! The embedded emoji dictionary.
//!
//! The payload is a YAML document compiled into the binary and parsed once
//! on first use. It follows the same word-table shape as user-supplied
//! dictionaries, with tags grouping emojis by theme (`face`, `animal`,
//! `food`, `hand`, `heart`, …).

use once_cell::sync::Lazy;

use crate::dictionary::loader;
use crate::dictionary::Dictionary;

/// The embedded YAML payload.
pub(crate) const EMOJI_DICTIONARY_TEXT: &str = include_str!("emoji.yaml");

static EMOJI_DICTIONARY: Lazy<Dictionary> = Lazy::new(|| {
    let value: serde_yaml::Value =
        serde_yaml::from_str(EMOJI_DICTIONARY_TEXT).expect("embedded emoji payload is valid YAML");
    let body = value
        .get("emoji")
        .expect("embedded emoji payload has an `emoji` entry");
    let (language, words) = loader::parse_yaml_dictionary("emoji", body)
        .expect("embedded emoji payload is a well-formed word table");
    Dictionary::new("emoji", language, words, true)
});

/// Returns the process-wide emoji dictionary, built on first use.
pub fn emoji_dictionary() -> &'static Dictionary {
    &EMOJI_DICTIONARY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_payload_is_present() {
        assert!(!EMOJI_DICTIONARY_TEXT.is_empty());
    }

    #[test]
    fn embedded_payload_parses() {
        let dictionary = emoji_dictionary();
        assert!(!dictionary.is_empty());
        assert_eq!(dictionary.kind(), "emoji");
        assert!(dictionary.language().is_empty());
        assert!(dictionary
            .tag_definitions()
            .iter()
            .any(|definition| definition.tag == "face"));
    }

    #[test]
    fn thumbs_up_is_present() {
        let dictionary = emoji_dictionary();
        let found = (0..dictionary.len()).any(|i| dictionary.word(i).text() == "👍");
        assert!(found);
    }
}
