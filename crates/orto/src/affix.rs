// Affix entries and the tables that index them by appending text.
//
// A prefix entry derives a surface word from a stem by replacing the
// stem's leading stripping characters with its appending characters; a
// suffix entry does the same at the tail. "To root" is the inverse
// replacement. The tables answer one query: given a surface word, iterate
// every entry whose appending is a prefix (resp. suffix) of that word,
// shorter appendings first.

use orto_core::condition::Condition;
use orto_core::flags::{Flag, FlagSet};
use smallvec::SmallVec;

/// Where in a (possible) compound the word currently being affix-stripped
/// sits. Affix validity rules differ per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffixingMode {
    FullWord,
    AtCompoundBegin,
    AtCompoundEnd,
    AtCompoundMiddle,
}

/// A prefix entry.
#[derive(Debug, Clone, Default)]
pub struct Prefix {
    pub flag: Flag,
    pub cross_product: bool,
    pub stripping: Vec<char>,
    pub appending: Vec<char>,
    pub cont_flags: FlagSet,
    pub condition: Condition,
}

/// A suffix entry.
#[derive(Debug, Clone, Default)]
pub struct Suffix {
    pub flag: Flag,
    pub cross_product: bool,
    pub stripping: Vec<char>,
    pub appending: Vec<char>,
    pub cont_flags: FlagSet,
    pub condition: Condition,
}

/// The seam shared by prefixes and suffixes: the stripping primitives only
/// ever touch affixes through this surface.
pub trait AffixEntry {
    fn flag(&self) -> Flag;
    fn cross_product(&self) -> bool;
    fn stripping(&self) -> &[char];
    fn appending(&self) -> &[char];
    fn cont_flags(&self) -> &FlagSet;

    /// Undo the affix on a derived word, in place.
    fn to_root(&self, word: &mut Vec<char>);
    /// Re-apply the affix on a root word, in place.
    fn to_derived(&self, word: &mut Vec<char>);
    /// Match the entry's condition against a root word.
    fn check_condition(&self, word: &[char]) -> bool;

    /// True when applying this entry changes the text at all.
    fn is_modifying(&self) -> bool {
        !self.stripping().is_empty() || !self.appending().is_empty()
    }
}

impl AffixEntry for Prefix {
    fn flag(&self) -> Flag {
        self.flag
    }
    fn cross_product(&self) -> bool {
        self.cross_product
    }
    fn stripping(&self) -> &[char] {
        &self.stripping
    }
    fn appending(&self) -> &[char] {
        &self.appending
    }
    fn cont_flags(&self) -> &FlagSet {
        &self.cont_flags
    }

    fn to_root(&self, word: &mut Vec<char>) {
        word.splice(..self.appending.len(), self.stripping.iter().copied());
    }

    fn to_derived(&self, word: &mut Vec<char>) {
        word.splice(..self.stripping.len(), self.appending.iter().copied());
    }

    fn check_condition(&self, word: &[char]) -> bool {
        self.condition.match_prefix(word)
    }
}

impl AffixEntry for Suffix {
    fn flag(&self) -> Flag {
        self.flag
    }
    fn cross_product(&self) -> bool {
        self.cross_product
    }
    fn stripping(&self) -> &[char] {
        &self.stripping
    }
    fn appending(&self) -> &[char] {
        &self.appending
    }
    fn cont_flags(&self) -> &FlagSet {
        &self.cont_flags
    }

    fn to_root(&self, word: &mut Vec<char>) {
        let at = word.len() - self.appending.len();
        word.splice(at.., self.stripping.iter().copied());
    }

    fn to_derived(&self, word: &mut Vec<char>) {
        let at = word.len() - self.stripping.len();
        word.splice(at.., self.appending.iter().copied());
    }

    fn check_condition(&self, word: &[char]) -> bool {
        self.condition.match_suffix(word)
    }
}

/// Candidate list returned by the table queries. The match set for one
/// word is almost always tiny, so it lives on the stack.
pub type AffixCandidates<'a, T> = SmallVec<[&'a T; 8]>;

/// Prefix entries sorted by appending, with a rollup of every continuation
/// flag for the cheap pre-checks in the double-affix primitives.
#[derive(Debug, Default)]
pub struct PrefixTable {
    entries: Vec<Prefix>,
    all_cont_flags: FlagSet,
}

impl PrefixTable {
    pub fn new(mut entries: Vec<Prefix>) -> Self {
        entries.sort_by(|a, b| a.appending.cmp(&b.appending));
        let mut all_cont_flags = FlagSet::new();
        for e in &entries {
            all_cont_flags.extend_from(&e.cont_flags);
        }
        Self {
            entries,
            all_cont_flags,
        }
    }

    pub fn has_continuation_flags(&self) -> bool {
        !self.all_cont_flags.is_empty()
    }

    pub fn has_continuation_flag(&self, flag: Flag) -> bool {
        self.all_cont_flags.contains(flag)
    }

    /// All entries whose appending is a prefix of `word`, shortest first.
    pub fn matching<'a>(&'a self, word: &[char]) -> AffixCandidates<'a, Prefix> {
        let e = &self.entries;
        let mut out = AffixCandidates::new();
        let mut lo = 0usize;
        let mut hi = e.len();
        while lo < hi && e[lo].appending.is_empty() {
            out.push(&e[lo]);
            lo += 1;
        }
        for pos in 0..word.len() {
            if lo >= hi {
                break;
            }
            // every entry left in [lo, hi) has appending longer than `pos`
            let c = word[pos];
            lo += e[lo..hi].partition_point(|p| p.appending[pos] < c);
            hi = lo + e[lo..hi].partition_point(|p| p.appending[pos] == c);
            while lo < hi && e[lo].appending.len() == pos + 1 {
                out.push(&e[lo]);
                lo += 1;
            }
        }
        out
    }
}

/// Suffix entries sorted by reversed appending.
#[derive(Debug, Default)]
pub struct SuffixTable {
    entries: Vec<Suffix>,
    all_cont_flags: FlagSet,
}

fn rev_char(s: &[char], pos: usize) -> char {
    s[s.len() - 1 - pos]
}

fn cmp_reversed(a: &[char], b: &[char]) -> std::cmp::Ordering {
    a.iter().rev().cmp(b.iter().rev())
}

impl SuffixTable {
    pub fn new(mut entries: Vec<Suffix>) -> Self {
        entries.sort_by(|a, b| cmp_reversed(&a.appending, &b.appending));
        let mut all_cont_flags = FlagSet::new();
        for e in &entries {
            all_cont_flags.extend_from(&e.cont_flags);
        }
        Self {
            entries,
            all_cont_flags,
        }
    }

    pub fn has_continuation_flags(&self) -> bool {
        !self.all_cont_flags.is_empty()
    }

    pub fn has_continuation_flag(&self, flag: Flag) -> bool {
        self.all_cont_flags.contains(flag)
    }

    /// All entries whose appending is a suffix of `word`, shortest first.
    pub fn matching<'a>(&'a self, word: &[char]) -> AffixCandidates<'a, Suffix> {
        let e = &self.entries;
        let mut out = AffixCandidates::new();
        let mut lo = 0usize;
        let mut hi = e.len();
        while lo < hi && e[lo].appending.is_empty() {
            out.push(&e[lo]);
            lo += 1;
        }
        for pos in 0..word.len() {
            if lo >= hi {
                break;
            }
            let c = rev_char(word, pos);
            lo += e[lo..hi].partition_point(|s| rev_char(&s.appending, pos) < c);
            hi = lo + e[lo..hi].partition_point(|s| rev_char(&s.appending, pos) == c);
            while lo < hi && e[lo].appending.len() == pos + 1 {
                out.push(&e[lo]);
                lo += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn prefix(strip: &str, append: &str) -> Prefix {
        Prefix {
            flag: b'P' as Flag,
            cross_product: true,
            stripping: chars(strip),
            appending: chars(append),
            cont_flags: FlagSet::new(),
            condition: Condition::new(".").unwrap(),
        }
    }

    fn suffix(strip: &str, append: &str) -> Suffix {
        Suffix {
            flag: b'S' as Flag,
            cross_product: true,
            stripping: chars(strip),
            appending: chars(append),
            cont_flags: FlagSet::new(),
            condition: Condition::new(".").unwrap(),
        }
    }

    #[test]
    fn prefix_root_derived_roundtrip() {
        let p = prefix("y", "un");
        let mut w = chars("unhappy");
        p.to_root(&mut w);
        assert_eq!(w, chars("yhappy"));
        p.to_derived(&mut w);
        assert_eq!(w, chars("unhappy"));
    }

    #[test]
    fn suffix_root_derived_roundtrip() {
        let s = suffix("y", "ies");
        let mut w = chars("bodies");
        s.to_root(&mut w);
        assert_eq!(w, chars("body"));
        s.to_derived(&mut w);
        assert_eq!(w, chars("bodies"));
    }

    #[test]
    fn zero_strip_affixes() {
        let p = prefix("", "re");
        let mut w = chars("rework");
        p.to_root(&mut w);
        assert_eq!(w, chars("work"));
        p.to_derived(&mut w);
        assert_eq!(w, chars("rework"));
    }

    #[test]
    fn prefix_table_matches_shortest_first() {
        let table = PrefixTable::new(vec![
            prefix("", "under"),
            prefix("", "un"),
            prefix("", ""),
            prefix("", "in"),
            prefix("", "u"),
        ]);
        let hits = table.matching(&chars("understand"));
        let appendings: Vec<String> =
            hits.iter().map(|p| p.appending.iter().collect()).collect();
        assert_eq!(appendings, ["", "u", "un", "under"]);
    }

    #[test]
    fn prefix_table_miss() {
        let table = PrefixTable::new(vec![prefix("", "un"), prefix("", "re")]);
        assert!(table.matching(&chars("overdo")).is_empty());
        assert!(table.matching(&chars("")).is_empty());
    }

    #[test]
    fn suffix_table_matches_shortest_first() {
        let table = SuffixTable::new(vec![
            suffix("", "ings"),
            suffix("", "s"),
            suffix("", "ngs"),
            suffix("", "ed"),
        ]);
        let hits = table.matching(&chars("workings"));
        let appendings: Vec<String> =
            hits.iter().map(|s| s.appending.iter().collect()).collect();
        assert_eq!(appendings, ["s", "ngs", "ings"]);
    }

    #[test]
    fn continuation_flag_rollup() {
        let mut s1 = suffix("", "s");
        s1.cont_flags = FlagSet::from_flags(vec![b'X' as Flag]);
        let s2 = suffix("", "ed");
        let table = SuffixTable::new(vec![s1, s2]);
        assert!(table.has_continuation_flags());
        assert!(table.has_continuation_flag(b'X' as Flag));
        assert!(!table.has_continuation_flag(b'Y' as Flag));
    }

    #[test]
    fn same_appending_entries_are_all_visited() {
        let mut a = suffix("", "s");
        a.flag = 1;
        let mut b = suffix("y", "s");
        b.flag = 2;
        let table = SuffixTable::new(vec![a, b]);
        let hits = table.matching(&chars("cats"));
        assert_eq!(hits.len(), 2);
    }
}
