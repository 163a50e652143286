// Per-character case mapping and classification helpers.
//
// The engine works on words as `char` slices (one slot per code point), so
// all case conversion here is one-to-one: characters whose full Unicode
// mapping expands to several characters keep only the first one. Length-
// changing conversions are never needed by the check paths; the suggestion
// engine that wants them builds new buffers instead.

/// Convert a character to its simple lowercase equivalent.
///
/// For characters with multi-character lowercase expansions, returns only
/// the first character of the expansion.
pub fn simple_lower(c: char) -> char {
    let mut iter = c.to_lowercase();
    iter.next().unwrap_or(c)
}

/// Convert a character to its simple uppercase equivalent.
///
/// For characters with multi-character uppercase expansions, returns only
/// the first character. Sharp s is kept as-is so that a round trip through
/// upper case does not corrupt German words; the checker handles the
/// `ss`/sharp-s equivalence explicitly.
pub fn simple_upper(c: char) -> char {
    if c == SHARP_S {
        return c;
    }
    let mut iter = c.to_uppercase();
    iter.next().unwrap_or(c)
}

/// Check whether a character is an uppercase letter.
pub fn is_upper(c: char) -> bool {
    c != simple_lower(c)
}

/// Check whether a character is a lowercase letter.
pub fn is_lower(c: char) -> bool {
    if c == SHARP_S {
        return true;
    }
    c != simple_upper(c)
}

/// LATIN SMALL LETTER SHARP S (U+00DF).
pub const SHARP_S: char = '\u{00DF}';

/// Check whether a word parses as a number: an optional leading minus sign,
/// then groups of ASCII digits separated by single `.`, `,` or `-`
/// separators. Such tokens are accepted without a dictionary lookup.
pub fn is_number(word: &[char]) -> bool {
    let mut rest = word;
    if let Some((&'-', tail)) = rest.split_first() {
        rest = tail;
    }
    if rest.is_empty() {
        return false;
    }
    loop {
        let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return false;
        }
        rest = &rest[digits..];
        match rest.split_first() {
            None => return true,
            Some((&sep, tail)) if matches!(sep, '.' | ',' | '-') => rest = tail,
            Some(_) => return false,
        }
    }
}

/// Remove every occurrence of the given characters from the word.
pub fn erase_chars(word: &mut Vec<char>, ignored: &[char]) {
    if ignored.is_empty() {
        return;
    }
    word.retain(|c| !ignored.contains(c));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_case_roundtrip() {
        assert_eq!(simple_lower('A'), 'a');
        assert_eq!(simple_upper('a'), 'A');
        assert_eq!(simple_lower('\u{00C4}'), '\u{00E4}'); // Ä -> ä
        assert_eq!(simple_upper('\u{00E4}'), '\u{00C4}');
    }

    #[test]
    fn sharp_s_is_stable_under_simple_upper() {
        assert_eq!(simple_upper(SHARP_S), SHARP_S);
        assert!(is_lower(SHARP_S));
        assert!(!is_upper(SHARP_S));
    }

    #[test]
    fn classification() {
        assert!(is_upper('K'));
        assert!(!is_upper('k'));
        assert!(is_lower('k'));
        assert!(!is_lower('K'));
        assert!(!is_upper('1'));
        assert!(!is_lower('-'));
    }

    fn num(s: &str) -> bool {
        let w: Vec<char> = s.chars().collect();
        is_number(&w)
    }

    #[test]
    fn number_recognition() {
        assert!(num("0"));
        assert!(num("1234"));
        assert!(num("-5"));
        assert!(num("1,234.5"));
        assert!(num("10-12"));
        assert!(!num(""));
        assert!(!num("-"));
        assert!(!num("12a"));
        assert!(!num("1..2"));
        assert!(!num("12,"));
        assert!(!num("a12"));
    }

    #[test]
    fn erase_chars_removes_ignored() {
        let mut w: Vec<char> = "fa-bu-la".chars().collect();
        erase_chars(&mut w, &['-']);
        assert_eq!(w.iter().collect::<String>(), "fabula");
        let mut w2: Vec<char> = "abc".chars().collect();
        erase_chars(&mut w2, &[]);
        assert_eq!(w2.len(), 3);
    }
}
