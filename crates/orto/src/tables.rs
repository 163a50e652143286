// Transformation tables consumed by the check and suggest engines:
// input/output substring conversion, break patterns, suggestion
// replacements, similarity groups, compound boundary patterns and the
// compound flag-rule table.

use orto_core::flags::{Flag, FlagSet};

// ---------------------------------------------------------------------------
// Substring replacer (ICONV / OCONV)
// ---------------------------------------------------------------------------

/// Longest-match substring replacer over a sorted table of pairs.
#[derive(Debug, Default)]
pub struct SubstrReplacer {
    // sorted by key; keys are non-empty and unique
    table: Vec<(Vec<char>, Vec<char>)>,
}

impl SubstrReplacer {
    pub fn new(mut pairs: Vec<(Vec<char>, Vec<char>)>) -> Self {
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs.dedup_by(|a, b| a.0 == b.0);
        pairs.retain(|p| !p.0.is_empty());
        Self { table: pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Index of the longest key that is a prefix of `rest`, if any.
    fn find_match(&self, rest: &[char]) -> Option<usize> {
        let t = &self.table;
        let mut best = None;
        let mut lo = 0usize;
        let mut hi = t.len();
        for pos in 0..rest.len() {
            if lo >= hi {
                break;
            }
            let c = rest[pos];
            lo += t[lo..hi].partition_point(|p| p.0[pos] < c);
            hi = lo + t[lo..hi].partition_point(|p| p.0[pos] == c);
            while lo < hi && t[lo].0.len() == pos + 1 {
                best = Some(lo);
                lo += 1;
            }
        }
        best
    }

    /// Replace every occurrence in place, scanning left to right and
    /// preferring the longest key at each position. Replaced text is not
    /// rescanned.
    pub fn replace(&self, word: &mut Vec<char>) {
        if self.table.is_empty() {
            return;
        }
        let mut i = 0usize;
        while i < word.len() {
            match self.find_match(&word[i..]) {
                Some(idx) => {
                    let (from, to) = &self.table[idx];
                    word.splice(i..i + from.len(), to.iter().copied());
                    i += to.len();
                }
                None => i += 1,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Break table
// ---------------------------------------------------------------------------

/// Break patterns partitioned into start-anchored, end-anchored and middle
/// patterns. Anchor markers are stripped at construction.
#[derive(Debug, Default)]
pub struct BreakTable {
    table: Vec<Vec<char>>,
    start_last: usize,
    end_last: usize,
}

impl BreakTable {
    pub fn new(patterns: Vec<Vec<char>>) -> Self {
        let mut kept: Vec<Vec<char>> = patterns
            .into_iter()
            .filter(|p| !p.is_empty() && !(p.len() == 1 && (p[0] == '^' || p[0] == '$')))
            .collect();

        let mut table = Vec::with_capacity(kept.len());
        let mut rest = Vec::new();
        for mut p in kept.drain(..) {
            if p[0] == '^' {
                p.remove(0);
                table.push(p);
            } else {
                rest.push(p);
            }
        }
        let start_last = table.len();
        let mut middle = Vec::new();
        for mut p in rest.drain(..) {
            if *p.last().unwrap() == '$' {
                p.pop();
                table.push(p);
            } else {
                middle.push(p);
            }
        }
        let end_last = table.len();
        table.extend(middle);
        Self {
            table,
            start_last,
            end_last,
        }
    }

    pub fn start_word_breaks(&self) -> &[Vec<char>] {
        &self.table[..self.start_last]
    }

    pub fn end_word_breaks(&self) -> &[Vec<char>] {
        &self.table[self.start_last..self.end_last]
    }

    pub fn middle_word_breaks(&self) -> &[Vec<char>] {
        &self.table[self.end_last..]
    }
}

// ---------------------------------------------------------------------------
// Replacement table (REP)
// ---------------------------------------------------------------------------

/// Common-typo replacements partitioned by anchor into whole-word,
/// start-anchored, end-anchored and any-place groups.
#[derive(Debug, Default)]
pub struct ReplacementTable {
    table: Vec<(Vec<char>, Vec<char>)>,
    whole_last: usize,
    start_last: usize,
    end_last: usize,
}

impl ReplacementTable {
    pub fn new(pairs: Vec<(Vec<char>, Vec<char>)>) -> Self {
        let kept: Vec<(Vec<char>, Vec<char>)> = pairs
            .into_iter()
            .filter(|(f, _)| {
                !f.is_empty() && !(f.len() == 1 && (f[0] == '^' || f[0] == '$'))
            })
            .collect();

        let mut whole = Vec::new();
        let mut start = Vec::new();
        let mut end = Vec::new();
        let mut any = Vec::new();
        for (mut from, to) in kept {
            if from[0] == '^' {
                from.remove(0);
                if *from.last().unwrap() == '$' {
                    from.pop();
                    whole.push((from, to));
                } else {
                    start.push((from, to));
                }
            } else if *from.last().unwrap() == '$' {
                from.pop();
                end.push((from, to));
            } else {
                any.push((from, to));
            }
        }
        let whole_last = whole.len();
        let start_last = whole_last + start.len();
        let end_last = start_last + end.len();
        let mut table = whole;
        table.extend(start);
        table.extend(end);
        table.extend(any);
        Self {
            table,
            whole_last,
            start_last,
            end_last,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn whole_word_replacements(&self) -> &[(Vec<char>, Vec<char>)] {
        &self.table[..self.whole_last]
    }

    pub fn start_word_replacements(&self) -> &[(Vec<char>, Vec<char>)] {
        &self.table[self.whole_last..self.start_last]
    }

    pub fn end_word_replacements(&self) -> &[(Vec<char>, Vec<char>)] {
        &self.table[self.start_last..self.end_last]
    }

    pub fn any_place_replacements(&self) -> &[(Vec<char>, Vec<char>)] {
        &self.table[self.end_last..]
    }
}

// ---------------------------------------------------------------------------
// Similarity groups (MAP)
// ---------------------------------------------------------------------------

/// A set of characters plus a set of short strings, all mutually
/// interchangeable for suggestion purposes.
#[derive(Debug, Default, Clone)]
pub struct SimilarityGroup {
    pub chars: Vec<char>,
    pub strings: Vec<Vec<char>>,
}

impl SimilarityGroup {
    /// Parse the `a(bb)c` syntax: bare characters join `chars`,
    /// parenthesized runs of length one join `chars`, longer runs join
    /// `strings`.
    pub fn parse(s: &str) -> Self {
        let chars_in: Vec<char> = s.chars().collect();
        let mut group = Self::default();
        let mut i = 0usize;
        while i < chars_in.len() {
            if chars_in[i] == '(' {
                let close = chars_in[i + 1..].iter().position(|&c| c == ')');
                match close {
                    Some(rel) => {
                        let inner = &chars_in[i + 1..i + 1 + rel];
                        match inner.len() {
                            0 => {}
                            1 => group.chars.push(inner[0]),
                            _ => group.strings.push(inner.to_vec()),
                        }
                        i += rel + 2;
                    }
                    None => break,
                }
            } else {
                group.chars.push(chars_in[i]);
                i += 1;
            }
        }
        group
    }
}

// ---------------------------------------------------------------------------
// Compound boundary patterns (CHECKCOMPOUNDPATTERN)
// ---------------------------------------------------------------------------

/// A boundary shape that forbids (or, with a replacement, enables) a
/// compound split: the first part must end in `end_chars`, the second must
/// begin with `begin_chars`, optionally restricted by per-part flags.
#[derive(Debug, Default, Clone)]
pub struct CompoundPattern {
    pub end_chars: Vec<char>,
    pub begin_chars: Vec<char>,
    pub replacement: Vec<char>,
    pub first_word_flag: Flag,
    pub second_word_flag: Flag,
    pub match_first_only_unaffixed_or_zero_affixed: bool,
}

// ---------------------------------------------------------------------------
// Compound rules (COMPOUNDRULE)
// ---------------------------------------------------------------------------

/// Quantifier attached to one flag of a compound rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleQuantifier {
    One,
    ZeroOrOne,
    ZeroOrMore,
}

/// One compound rule: a sequence of flags with quantifiers, matched as a
/// simple regex against the flag sets of a candidate decomposition.
pub type CompoundRule = Vec<(Flag, RuleQuantifier)>;

/// The compound rule table plus the rollup of every flag any rule uses.
#[derive(Debug, Default)]
pub struct CompoundRuleTable {
    rules: Vec<CompoundRule>,
    all_flags: FlagSet,
}

impl CompoundRuleTable {
    pub fn new(rules: Vec<CompoundRule>) -> Self {
        let mut all_flags = FlagSet::new();
        for rule in &rules {
            for &(flag, _) in rule {
                all_flags.insert(flag);
            }
        }
        Self { rules, all_flags }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn has_any_of_flags(&self, flags: &FlagSet) -> bool {
        self.all_flags.intersects(flags)
    }

    /// True when any rule matches the decomposition's flag sets.
    pub fn match_any_rule(&self, words_data: &[&FlagSet]) -> bool {
        self.rules
            .iter()
            .any(|rule| match_rule(words_data, rule))
    }
}

/// Backtracking match of one rule against the decomposition, with an
/// explicit work stack instead of recursion.
fn match_rule(data: &[&FlagSet], rule: &CompoundRule) -> bool {
    let mut stack = vec![(0usize, 0usize)];
    while let Some((di, pi)) = stack.pop() {
        if pi == rule.len() {
            if di == data.len() {
                return true;
            }
            continue;
        }
        let (flag, quant) = rule[pi];
        let here = di != data.len() && data[di].contains(flag);
        match quant {
            RuleQuantifier::One => {
                if here {
                    stack.push((di + 1, pi + 1));
                }
            }
            RuleQuantifier::ZeroOrOne => {
                stack.push((di, pi + 1));
                if here {
                    stack.push((di + 1, pi + 1));
                }
            }
            RuleQuantifier::ZeroOrMore => {
                stack.push((di, pi + 1));
                if here {
                    stack.push((di + 1, pi));
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn pair(from: &str, to: &str) -> (Vec<char>, Vec<char>) {
        (chars(from), chars(to))
    }

    fn to_string(cs: &[char]) -> String {
        cs.iter().collect()
    }

    // -- SubstrReplacer --

    #[test]
    fn replacer_simple() {
        let r = SubstrReplacer::new(vec![pair("ph", "f")]);
        let mut w = chars("phase");
        r.replace(&mut w);
        assert_eq!(to_string(&w), "fase");
    }

    #[test]
    fn replacer_prefers_longest_match() {
        let r = SubstrReplacer::new(vec![pair("a", "1"), pair("ab", "2")]);
        let mut w = chars("aba");
        r.replace(&mut w);
        assert_eq!(to_string(&w), "21");
    }

    #[test]
    fn replacer_does_not_rescan_replacement() {
        let r = SubstrReplacer::new(vec![pair("a", "aa")]);
        let mut w = chars("aa");
        r.replace(&mut w);
        assert_eq!(to_string(&w), "aaaa");
    }

    #[test]
    fn replacer_empty_table_is_noop() {
        let r = SubstrReplacer::new(vec![]);
        let mut w = chars("abc");
        r.replace(&mut w);
        assert_eq!(to_string(&w), "abc");
    }

    // -- BreakTable --

    #[test]
    fn break_table_partitions() {
        let t = BreakTable::new(vec![
            chars("-"),
            chars("^-"),
            chars("-$"),
            chars("^"),
            chars(""),
        ]);
        assert_eq!(t.start_word_breaks(), &[chars("-")]);
        assert_eq!(t.end_word_breaks(), &[chars("-")]);
        assert_eq!(t.middle_word_breaks(), &[chars("-")]);
    }

    // -- ReplacementTable --

    #[test]
    fn replacement_table_partitions() {
        let t = ReplacementTable::new(vec![
            pair("any", "x"),
            pair("^start", "y"),
            pair("end$", "z"),
            pair("^whole$", "w"),
            pair("^", "drop"),
        ]);
        assert_eq!(t.whole_word_replacements(), &[pair("whole", "w")]);
        assert_eq!(t.start_word_replacements(), &[pair("start", "y")]);
        assert_eq!(t.end_word_replacements(), &[pair("end", "z")]);
        assert_eq!(t.any_place_replacements(), &[pair("any", "x")]);
    }

    // -- SimilarityGroup --

    #[test]
    fn similarity_group_parse() {
        let g = SimilarityGroup::parse("u\u{00FC}(ue)(u)");
        assert_eq!(g.chars, vec!['u', '\u{00FC}', 'u']);
        assert_eq!(g.strings, vec![chars("ue")]);
    }

    #[test]
    fn similarity_group_plain_chars() {
        let g = SimilarityGroup::parse("sz");
        assert_eq!(g.chars, vec!['s', 'z']);
        assert!(g.strings.is_empty());
    }

    // -- CompoundRuleTable --

    fn fs(flags: &[u16]) -> FlagSet {
        FlagSet::from_flags(flags.to_vec())
    }

    #[test]
    fn compound_rule_exact_sequence() {
        let rule: CompoundRule = vec![
            (b'A' as Flag, RuleQuantifier::One),
            (b'B' as Flag, RuleQuantifier::One),
        ];
        let t = CompoundRuleTable::new(vec![rule]);
        let a = fs(&[b'A' as u16]);
        let b = fs(&[b'B' as u16]);
        assert!(t.match_any_rule(&[&a, &b]));
        assert!(!t.match_any_rule(&[&b, &a]));
        assert!(!t.match_any_rule(&[&a]));
    }

    #[test]
    fn compound_rule_quantifiers() {
        // A* B? C
        let rule: CompoundRule = vec![
            (b'A' as Flag, RuleQuantifier::ZeroOrMore),
            (b'B' as Flag, RuleQuantifier::ZeroOrOne),
            (b'C' as Flag, RuleQuantifier::One),
        ];
        let t = CompoundRuleTable::new(vec![rule]);
        let a = fs(&[b'A' as u16]);
        let b = fs(&[b'B' as u16]);
        let c = fs(&[b'C' as u16]);
        assert!(t.match_any_rule(&[&c]));
        assert!(t.match_any_rule(&[&b, &c]));
        assert!(t.match_any_rule(&[&a, &a, &a, &c]));
        assert!(t.match_any_rule(&[&a, &b, &c]));
        assert!(!t.match_any_rule(&[&b, &b, &c]));
        assert!(!t.match_any_rule(&[&a, &b]));
    }

    #[test]
    fn compound_rule_flag_rollup() {
        let rule: CompoundRule = vec![(b'X' as Flag, RuleQuantifier::One)];
        let t = CompoundRuleTable::new(vec![rule]);
        assert!(t.has_any_of_flags(&fs(&[b'X' as u16, b'Q' as u16])));
        assert!(!t.has_any_of_flags(&fs(&[b'Q' as u16])));
        assert!(!CompoundRuleTable::default().has_any_of_flags(&fs(&[b'X' as u16])));
    }
}
