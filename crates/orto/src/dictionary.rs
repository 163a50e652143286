// The public face of the engine: owns the loaded tables and exposes the
// two operations, a boolean membership check and a suggestion generator.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::aff_data::AffData;
use crate::parser::{parse_dictionary, ParseError};

/// Words longer than this (in characters) are rejected outright, before
/// the engine is consulted.
const MAX_WORD_LEN: usize = 180;

/// Errors constructing a [`Dictionary`].
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A loaded dictionary: affix data plus word list, immutable after
/// construction and shareable across threads for reading.
///
/// Checking and suggesting never fail; words the engine cannot process
/// (oversized input) simply check as incorrect with no suggestions.
#[derive(Debug)]
pub struct Dictionary {
    data: AffData,
}

impl Dictionary {
    /// Build a dictionary from the contents of an affix file and a word
    /// list.
    pub fn from_slices(aff: &str, dic: &str) -> Result<Self, DictionaryError> {
        let data = parse_dictionary(aff, dic)?;
        debug!(words = data.words.len(), "dictionary loaded");
        Ok(Self { data })
    }

    /// Load `<base>.aff` and `<base>.dic`.
    pub fn from_path(base: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let base = base.as_ref();
        let aff_path = base.with_extension("aff");
        let dic_path = base.with_extension("dic");
        let aff = std::fs::read_to_string(&aff_path).map_err(|source| {
            DictionaryError::Io {
                path: aff_path.display().to_string(),
                source,
            }
        })?;
        let dic = std::fs::read_to_string(&dic_path).map_err(|source| {
            DictionaryError::Io {
                path: dic_path.display().to_string(),
                source,
            }
        })?;
        Self::from_slices(&aff, &dic)
    }

    /// Is the word spelled correctly?
    pub fn spell(&self, word: &str) -> bool {
        let mut wide: Vec<char> = word.chars().collect();
        if wide.len() > MAX_WORD_LEN {
            return false;
        }
        self.data.spell_priv(&mut wide)
    }

    /// Correction candidates for a word, best candidates first. Returns
    /// an empty list for words the engine accepts or cannot help with.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        let mut wide: Vec<char> = word.chars().collect();
        if wide.len() > MAX_WORD_LEN {
            return Vec::new();
        }
        let mut out: Vec<Vec<char>> = Vec::new();
        self.data.suggest_priv(&mut wide, &mut out);
        out.into_iter()
            .map(|mut sug| {
                self.data.output_substr_replacer.replace(&mut sug);
                sug.into_iter().collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(aff: &str, dic: &str) -> Dictionary {
        Dictionary::from_slices(aff, dic).expect("test dictionary must load")
    }

    #[test]
    fn plain_words() {
        let d = dict("", "2\nhello\nworld\n");
        assert!(d.spell("hello"));
        assert!(d.spell("world"));
        assert!(!d.spell("helo"));
    }

    #[test]
    fn empty_and_numeric_inputs_are_accepted() {
        let d = dict("", "1\nword\n");
        assert!(d.spell(""));
        assert!(d.spell("42"));
        assert!(d.spell("-1,250.00"));
        assert!(d.spell("..."));
    }

    #[test]
    fn oversized_input_is_rejected_without_checking() {
        let d = dict("", "1\nword\n");
        let long = "a".repeat(MAX_WORD_LEN + 1);
        assert!(!d.spell(&long));
        assert!(d.suggest(&long).is_empty());
    }

    #[test]
    fn suggest_returns_empty_for_hopeless_input() {
        let d = dict("", "1\nword\n");
        assert!(d.suggest("qqqqzzzz").is_empty());
    }

    #[test]
    fn oconv_applies_to_suggestions() {
        let aff = "\
REP 1
REP teh the
OCONV 1
OCONV t T
";
        let d = dict(aff, "1\nthe\n");
        let sugs = d.suggest("teh");
        assert_eq!(sugs[0], "The");
    }

    #[test]
    fn from_path_loads_dictionary_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("mini");
        std::fs::write(base.with_extension("aff"), "TRY ab\n").unwrap();
        std::fs::write(base.with_extension("dic"), "1\nhi\n").unwrap();
        let d = Dictionary::from_path(&base).unwrap();
        assert!(d.spell("hi"));
        assert!(!d.spell("yo"));
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let err = Dictionary::from_path("/nonexistent/dict").unwrap_err();
        assert!(matches!(err, DictionaryError::Io { .. }));
    }
}
