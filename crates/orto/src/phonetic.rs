// Phonetic replacement rules (PHONE) used by the phonetic suggestion
// heuristic.
//
// Pattern language, after a literal prefix: an optional `(abc)` class
// consuming one character, optional `<` (move the cursor back over the
// replacement), a run of `-` (leave that many matched trailing characters
// unreplaced), an optional single digit priority (default 5), `^` (only at
// a virtual word begin), a second `^` (treat the next position as a word
// begin), and `$` (only at the word end). Replacement text `_` means
// "delete".

/// Result of matching one rule at one position.
#[derive(Debug, Clone, Copy)]
struct PhonetMatch {
    count_matched: usize,
    go_back_before_replace: usize,
    priority: u32,
    go_back_after_replace: bool,
    treat_next_as_begin: bool,
}

/// Ordered list of (pattern, replacement) pairs, bucketed by the first
/// pattern character.
#[derive(Debug, Default)]
pub struct PhoneticTable {
    table: Vec<(Vec<char>, Vec<char>)>,
}

impl PhoneticTable {
    pub fn new(pairs: Vec<(Vec<char>, Vec<char>)>) -> Self {
        let mut table: Vec<(Vec<char>, Vec<char>)> = pairs
            .into_iter()
            .filter(|(p, _)| !p.is_empty())
            .collect();
        table.sort_by_key(|(p, _)| p[0]);
        for (_, rep) in &mut table {
            if rep.len() == 1 && rep[0] == '_' {
                rep.clear();
            }
        }
        Self { table }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// All rules whose pattern starts with `c` (contiguous because the
    /// table is sorted by first character).
    fn rules_for(&self, c: char) -> &[(Vec<char>, Vec<char>)] {
        let lo = self.table.partition_point(|(p, _)| p[0] < c);
        let hi = lo + self.table[lo..].partition_point(|(p, _)| p[0] == c);
        &self.table[lo..hi]
    }

    /// Match one rule at position `i`. Returns `None` on mismatch and on
    /// malformed rules.
    fn match_rule(
        word: &[char],
        i: usize,
        pattern: &[char],
        at_begin: bool,
    ) -> Option<PhonetMatch> {
        let special = |c: char| matches!(c, '(' | '<' | '-' | '0'..='9' | '^' | '$');
        let mut j = pattern
            .iter()
            .position(|&c| special(c))
            .unwrap_or(pattern.len());

        if i + j > word.len() || word[i..i + j] != pattern[..j] {
            return None;
        }
        let mut m = PhonetMatch {
            count_matched: j,
            go_back_before_replace: 0,
            priority: 5,
            go_back_after_replace: false,
            treat_next_as_begin: false,
        };
        if j == pattern.len() {
            return Some(m);
        }
        if pattern[j] == '(' {
            let close = pattern[j + 1..].iter().position(|&c| c == ')')?;
            let set = &pattern[j + 1..j + 1 + close];
            let next = word.get(i + j)?;
            if !set.contains(next) {
                return None;
            }
            j += close + 2;
            m.count_matched += 1;
        }
        if j == pattern.len() {
            return Some(m);
        }
        if pattern[j] == '<' {
            m.go_back_after_replace = true;
            j += 1;
        }
        let dashes = pattern[j..].iter().take_while(|&&c| c == '-').count();
        m.go_back_before_replace = dashes;
        if m.go_back_before_replace >= m.count_matched {
            return None; // bad rule
        }
        j += dashes;
        if j == pattern.len() {
            return Some(m);
        }
        if pattern[j].is_ascii_digit() {
            m.priority = pattern[j] as u32 - '0' as u32;
            j += 1;
        }
        if j == pattern.len() {
            return Some(m);
        }
        if pattern[j] == '^' {
            if !at_begin {
                return None;
            }
            j += 1;
        }
        if j == pattern.len() {
            return Some(m);
        }
        if pattern[j] == '^' {
            m.treat_next_as_begin = true;
            j += 1;
        }
        if j == pattern.len() {
            return Some(m);
        }
        if pattern[j] != '$' {
            return None; // bad rule, nothing else may follow
        }
        if i + m.count_matched == word.len() {
            return Some(m);
        }
        None
    }

    /// Run the replacement engine over the word in place. Returns whether
    /// any rule fired. Cursor back-jumps are capped at 100 to keep
    /// pathological rule sets from looping forever.
    pub fn replace(&self, word: &mut Vec<char>) -> bool {
        if self.table.is_empty() {
            return false;
        }
        let mut changed = false;
        let mut treat_next_as_begin = true;
        let mut go_backs_after_replace = 0usize;
        let mut i = 0usize;
        while i < word.len() {
            let mut advanced = 1usize;
            for r in self.rules_for(word[i]) {
                let Some(mut m) = Self::match_rule(word, i, &r.0, treat_next_as_begin)
                else {
                    continue;
                };
                let mut rule = r;
                if m.go_back_before_replace == 0 {
                    // Prefer a better-priority rule starting at the last
                    // matched character.
                    let j = i + m.count_matched - 1;
                    for r2 in self.rules_for(word[j]) {
                        if let Some(m2) = Self::match_rule(word, j, &r2.0, false) {
                            if m2.priority >= m.priority {
                                i = j;
                                rule = r2;
                                m = m2;
                                break;
                            }
                        }
                    }
                }
                let replaced = m.count_matched - m.go_back_before_replace;
                word.splice(i..i + replaced, rule.1.iter().copied());
                treat_next_as_begin = m.treat_next_as_begin;
                if m.go_back_after_replace && go_backs_after_replace < 100 {
                    go_backs_after_replace += 1;
                    advanced = 0;
                } else {
                    advanced = rule.1.len();
                }
                changed = true;
                break;
            }
            i += advanced;
        }
        changed
    }
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

    fn table(rules: &[(&str, &str)]) -> PhoneticTable {
        PhoneticTable::new(
            rules
                .iter()
                .map(|(p, r)| (chars(p), chars(r)))
                .collect(),
        )
    }

    fn run(t: &PhoneticTable, input: &str) -> (String, bool) {
        let mut w = chars(input);
        let changed = t.replace(&mut w);
        (to_string(&w), changed)
    }

    #[test]
    fn literal_replacement() {
        let t = table(&[("PH", "F")]);
        assert_eq!(run(&t, "PHONE"), ("FONE".into(), true));
        assert_eq!(run(&t, "TONE"), ("TONE".into(), false));
    }

    #[test]
    fn empty_table_never_fires() {
        let t = table(&[]);
        assert_eq!(run(&t, "WORD"), ("WORD".into(), false));
    }

    #[test]
    fn underscore_replacement_deletes() {
        let t = table(&[("H", "_")]);
        assert_eq!(run(&t, "AHOY"), ("AOY".into(), true));
    }

    #[test]
    fn character_class_consumes_one() {
        let t = table(&[("C(AO)", "K")]);
        assert_eq!(run(&t, "CAT"), ("KT".into(), true));
        assert_eq!(run(&t, "COT"), ("KT".into(), true));
        assert_eq!(run(&t, "CET"), ("CET".into(), false));
    }

    #[test]
    fn begin_anchor_tracks_virtual_begin() {
        let t = table(&[("X^", "Z")]);
        assert_eq!(run(&t, "XA"), ("ZA".into(), true));
        // The begin state is virtual: it stays set until some replacement
        // clears it, so the anchored rule still fires past position zero.
        assert_eq!(run(&t, "AX"), ("AZ".into(), true));
        // A preceding replacement without `^^` clears the begin state.
        let t = table(&[("A", "B"), ("X^", "Z")]);
        assert_eq!(run(&t, "AX"), ("BX".into(), true));
    }

    #[test]
    fn end_anchor() {
        let t = table(&[("X$", "Z")]);
        assert_eq!(run(&t, "AX"), ("AZ".into(), true));
        assert_eq!(run(&t, "XA"), ("XA".into(), false));
    }

    #[test]
    fn dashes_keep_trailing_context() {
        // "ST-" matches ST but only replaces the S.
        let t = table(&[("ST-", "Z")]);
        assert_eq!(run(&t, "STONE"), ("ZTONE".into(), true));
    }

    #[test]
    fn dash_count_must_stay_below_match_length() {
        // A single-char pattern with one dash is a bad rule and never fires.
        let t = table(&[("S-", "Z")]);
        assert_eq!(run(&t, "SO"), ("SO".into(), false));
    }

    #[test]
    fn replacement_is_not_rescanned_without_go_back() {
        let t = table(&[("A", "B")]);
        assert_eq!(run(&t, "AA"), ("BB".into(), true));
    }

    #[test]
    fn go_back_rescans_replacement() {
        let t = table(&[("AB<", "X"), ("XC", "Y")]);
        // AB -> X with the cursor held in place, then XC -> Y.
        assert_eq!(run(&t, "ABC"), ("Y".into(), true));
    }

    #[test]
    fn lookahead_prefers_better_rule_at_last_matched_char() {
        // TX matches at 0, but X also starts a rule with equal priority at
        // the last matched character, so that rule wins.
        let t = table(&[("TX", "A"), ("XO", "B")]);
        assert_eq!(run(&t, "TXO"), ("TB".into(), true));
    }

    #[test]
    fn go_back_is_bounded() {
        // A rule that rewrites A to A with go-back would loop forever
        // without the cap.
        let t = table(&[("A<", "A")]);
        let (out, changed) = run(&t, "A");
        assert_eq!(out, "A");
        assert!(changed);
    }
}
