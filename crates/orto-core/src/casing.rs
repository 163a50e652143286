// Whole-word casing classification and conversion.

use crate::character::{is_lower, is_upper, simple_lower, simple_upper};

/// Casing pattern of a word, ignoring caseless characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Casing {
    /// All lower case or caseless, e.g. "lowercase" or "123".
    Small,
    /// First letter upper case, rest lower case, e.g. "Initcap".
    InitCapital,
    /// All letters upper case, e.g. "UPPERCASE" or "ALL4ONE".
    AllCapital,
    /// Starts lower case with capitals inside, e.g. "camelCase".
    Camel,
    /// Starts upper case with more capitals and lowers inside, e.g. "PascalCase".
    Pascal,
}

/// Classify the casing pattern of a word.
pub fn classify_casing(word: &[char]) -> Casing {
    let mut upper = 0usize;
    let mut lower = 0usize;
    for &c in word {
        if is_upper(c) {
            upper += 1;
        } else if is_lower(c) {
            lower += 1;
        }
    }
    if upper == 0 {
        return Casing::Small;
    }
    let first_capital = word.first().copied().map(is_upper).unwrap_or(false);
    if first_capital && upper == 1 {
        return Casing::InitCapital;
    }
    if lower == 0 {
        return Casing::AllCapital;
    }
    if first_capital {
        Casing::Pascal
    } else {
        Casing::Camel
    }
}

/// Lowercase every character of the word (one-to-one mapping).
pub fn to_lower_word(word: &[char]) -> Vec<char> {
    word.iter().map(|&c| simple_lower(c)).collect()
}

/// Uppercase every character of the word (one-to-one mapping).
pub fn to_upper_word(word: &[char]) -> Vec<char> {
    word.iter().map(|&c| simple_upper(c)).collect()
}

/// Title-case the word: first character upper, the rest lower.
pub fn to_title_word(word: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(word.len());
    let mut it = word.iter();
    if let Some(&first) = it.next() {
        out.push(simple_upper(first));
    }
    out.extend(it.map(|&c| simple_lower(c)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn to_string(cs: &[char]) -> String {
        cs.iter().collect()
    }

    #[test]
    fn classify_small() {
        assert_eq!(classify_casing(&chars("lowercase")), Casing::Small);
        assert_eq!(classify_casing(&chars("123")), Casing::Small);
        assert_eq!(classify_casing(&chars("")), Casing::Small);
    }

    #[test]
    fn classify_init_capital() {
        assert_eq!(classify_casing(&chars("Initcap")), Casing::InitCapital);
        assert_eq!(classify_casing(&chars("A")), Casing::InitCapital);
    }

    #[test]
    fn classify_all_capital() {
        assert_eq!(classify_casing(&chars("UPPERCASE")), Casing::AllCapital);
        assert_eq!(classify_casing(&chars("ALL4ONE")), Casing::AllCapital);
        assert_eq!(classify_casing(&chars("AB")), Casing::AllCapital);
    }

    #[test]
    fn classify_camel_and_pascal() {
        assert_eq!(classify_casing(&chars("camelCase")), Casing::Camel);
        assert_eq!(classify_casing(&chars("PascalCase")), Casing::Pascal);
        assert_eq!(classify_casing(&chars("McDonalds")), Casing::Pascal);
    }

    #[test]
    fn sharp_s_counts_as_lower() {
        // STRAßE has one lowercase letter, so it is Pascal rather than
        // all-capital.
        assert_eq!(classify_casing(&chars("STRA\u{00DF}E")), Casing::Pascal);
    }

    #[test]
    fn word_conversions() {
        assert_eq!(to_string(&to_lower_word(&chars("WoRd"))), "word");
        assert_eq!(to_string(&to_upper_word(&chars("WoRd"))), "WORD");
        assert_eq!(to_string(&to_title_word(&chars("wORD"))), "Word");
        assert_eq!(to_string(&to_title_word(&chars(""))), "");
    }
}
