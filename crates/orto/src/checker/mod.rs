// The check engine: membership decisions for a single word.
//
// Layers, outermost first: `spell_priv` normalizes the input (input
// conversion, abbreviation dots, numbers, ignored characters), the break
// recursion splits on break patterns, the casing dispatch routes by the
// word's capitalization, and `check_word` runs the dictionary lookup,
// the affix-stripping primitives and the compound recognizer.

pub(crate) mod affixing;
pub(crate) mod compound;

use orto_core::casing::{
    classify_casing, to_lower_word, to_title_word, Casing,
};
use orto_core::character::{erase_chars, is_number, SHARP_S};
use orto_core::flags::{FlagSet, HIDDEN_HOMONYM_FLAG};

use crate::aff_data::AffData;
use crate::affix::AffixingMode;

/// Maximum recursion depth of the sharp-s substitution search.
const MAX_SHARPS: usize = 5;

impl AffData {
    /// Top-level membership check on a normalized wide-character buffer.
    pub(crate) fn spell_priv(&self, word: &mut Vec<char>) -> bool {
        // input conversion
        self.input_substr_replacer.replace(word);

        if word.is_empty() {
            return true;
        }

        // trailing periods mark an abbreviation
        let abbreviation = word.last() == Some(&'.');
        if abbreviation {
            while word.last() == Some(&'.') {
                word.pop();
            }
            if word.is_empty() {
                return true;
            }
        }

        if is_number(word) {
            return true;
        }

        erase_chars(word, &self.ignored_chars);

        let ret = self.spell_break(word, 0);
        if !ret && abbreviation {
            word.push('.');
            return self.spell_break(word, 0);
        }
        ret
    }

    /// Recursive spelling check over the break patterns.
    pub(crate) fn spell_break(&self, word: &mut Vec<char>, depth: usize) -> bool {
        if let Some(flags) = self.spell_casing(word) {
            if flags.contains(self.forbiddenword_flag) {
                return false;
            }
            if self.forbid_warn && flags.contains(self.warn_flag) {
                return false;
            }
            return true;
        }
        if depth == 9 {
            return false;
        }

        for pat in self.break_table.start_word_breaks() {
            if word.len() >= pat.len() && word[..pat.len()] == pat[..] {
                let mut rest = word[pat.len()..].to_vec();
                if self.spell_break(&mut rest, 0) {
                    return true;
                }
            }
        }

        for pat in self.break_table.end_word_breaks() {
            if word.len() >= pat.len() && word[word.len() - pat.len()..] == pat[..] {
                let mut rest = word[..word.len() - pat.len()].to_vec();
                if self.spell_break(&mut rest, 0) {
                    return true;
                }
            }
        }

        for pat in self.break_table.middle_word_breaks() {
            // every occurrence strictly inside the word is a candidate split
            let mut from = 1usize;
            while from + pat.len() < word.len() {
                let Some(rel) = find_subslice(&word[from..], pat) else {
                    break;
                };
                let i = from + rel;
                if i + pat.len() >= word.len() {
                    break;
                }
                let mut part1 = word[..i].to_vec();
                if self.spell_break(&mut part1, depth + 1) {
                    let mut part2 = word[i + pat.len()..].to_vec();
                    if self.spell_break(&mut part2, depth + 1) {
                        return true;
                    }
                }
                from = i + 1;
            }
        }

        false
    }

    /// Route the check by the word's casing pattern.
    fn spell_casing<'a>(&'a self, word: &mut Vec<char>) -> Option<&'a FlagSet> {
        let casing = classify_casing(word);
        match casing {
            Casing::Small | Casing::Camel | Casing::Pascal => {
                self.check_word(word, casing, false)
            }
            Casing::AllCapital => self.spell_casing_upper(word),
            Casing::InitCapital => self.spell_casing_title(word),
        }
    }

    /// Check a word written in all capitals: as-is, then the apostrophe
    /// re-casings used by Romance elisions, then the sharp-s search, then
    /// title and lower forms unless the entry keeps its case.
    fn spell_casing_upper<'a>(&'a self, word: &mut Vec<char>) -> Option<&'a FlagSet> {
        if let Some(res) = self.check_word(word, Casing::AllCapital, false) {
            return Some(res);
        }

        // apostrophe-separated prefixes, e.g. SANT'ELIA -> Sant'Elia
        if let Some(apos) = word.iter().position(|&c| c == '\'') {
            if apos != word.len() - 1 {
                let part1 = to_lower_word(&word[..=apos]);
                let part2 = to_title_word(&word[apos + 1..]);
                let mut t: Vec<char> = part1.iter().chain(&part2).copied().collect();
                if let Some(res) = self.check_word(&mut t, Casing::AllCapital, false) {
                    return Some(res);
                }
                let part1 = to_title_word(&part1);
                t = part1.iter().chain(&part2).copied().collect();
                if let Some(res) = self.check_word(&mut t, Casing::AllCapital, false) {
                    return Some(res);
                }
            }
        }

        // sharp s for German
        if self.checksharps && has_double_s(word) {
            let mut t = to_lower_word(word);
            let mut res = self.spell_sharps(&mut t, 0, 0, 0);
            if res.is_none() {
                let mut t = to_title_word(word);
                res = self.spell_sharps(&mut t, 0, 0, 0);
            }
            if res.is_some() {
                return res;
            }
        }

        let mut t = to_title_word(word);
        if let Some(res) = self.check_word(&mut t, Casing::AllCapital, false) {
            if !res.contains(self.keepcase_flag) {
                return Some(res);
            }
        }

        let mut t = to_lower_word(word);
        if let Some(res) = self.check_word(&mut t, Casing::AllCapital, false) {
            if !res.contains(self.keepcase_flag) {
                return Some(res);
            }
        }
        None
    }

    /// Check a title-cased word: as-is skipping hidden homonyms, then the
    /// lower-cased form, which keep-case entries veto unless the sharp-s
    /// option applies and the lowered word contains a sharp s.
    fn spell_casing_title<'a>(&'a self, word: &mut Vec<char>) -> Option<&'a FlagSet> {
        if let Some(res) = self.check_word(word, Casing::InitCapital, true) {
            return Some(res);
        }

        let mut t = to_lower_word(word);
        let res = self.check_word(&mut t, Casing::InitCapital, false);
        if let Some(flags) = res {
            if flags.contains(self.keepcase_flag)
                && !(self.checksharps && t.contains(&SHARP_S))
            {
                return None;
            }
        }
        res
    }

    /// Try every combination of replacing `ss` pairs by sharp s, at most
    /// `MAX_SHARPS` deep, requiring at least one replacement.
    fn spell_sharps<'a>(
        &'a self,
        base: &mut Vec<char>,
        pos: usize,
        depth: usize,
        replacements: usize,
    ) -> Option<&'a FlagSet> {
        let next = (pos..base.len().saturating_sub(1))
            .find(|&i| base[i] == 's' && base[i + 1] == 's');
        match next {
            Some(i) if depth < MAX_SHARPS => {
                base[i] = SHARP_S;
                base.remove(i + 1);
                let res = self.spell_sharps(base, i + 1, depth + 1, replacements + 1);
                base[i] = 's';
                base.insert(i + 1, 's');
                if res.is_some() {
                    return res;
                }
                self.spell_sharps(base, i + 2, depth + 1, replacements)
            }
            _ if replacements > 0 => self.check_word(base, Casing::AllCapital, false),
            _ => None,
        }
    }

    /// Membership for one casing variant: simple (possibly affixed) word
    /// first, then compounds.
    pub(crate) fn check_word<'a>(
        &'a self,
        word: &mut Vec<char>,
        input_casing: Casing,
        skip_hidden_homonym: bool,
    ) -> Option<&'a FlagSet> {
        if let Some(flags) = self.check_simple_word(word, skip_hidden_homonym) {
            return Some(flags);
        }
        if let Some(res) = self.check_compound(word, input_casing) {
            return Some(res.entry.flags);
        }
        None
    }

    /// Dictionary lookup plus the affix-stripping primitives of the
    /// non-compound path.
    pub(crate) fn check_simple_word<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
    ) -> Option<&'a FlagSet> {
        for we in self.words.homonyms(word) {
            if we.flags.contains(self.need_affix_flag) {
                continue;
            }
            if we.flags.contains(self.compound_onlyin_flag) {
                continue;
            }
            if skip_hidden_homonym && we.flags.contains(HIDDEN_HOMONYM_FLAG) {
                continue;
            }
            return Some(we.flags);
        }

        use AffixingMode::FullWord;
        if let Some((we, _)) = self.strip_suffix_only(word, skip_hidden_homonym, FullWord) {
            return Some(we.flags);
        }
        if let Some((we, _)) = self.strip_prefix_only(word, skip_hidden_homonym, FullWord) {
            return Some(we.flags);
        }
        if let Some((we, _, _)) =
            self.strip_prefix_then_suffix(word, skip_hidden_homonym, FullWord)
        {
            return Some(we.flags);
        }
        if let Some((we, _, _)) =
            self.strip_prefix_then_suffix_commutative(word, skip_hidden_homonym, FullWord)
        {
            return Some(we.flags);
        }
        if !self.complex_prefixes {
            if let Some((we, _, _)) =
                self.strip_suffix_then_suffix(word, skip_hidden_homonym, FullWord)
            {
                return Some(we.flags);
            }
            if let Some(we) =
                self.strip_prefix_then_2_suffixes(word, skip_hidden_homonym, FullWord)
            {
                return Some(we.flags);
            }
            if let Some(we) =
                self.strip_suffix_prefix_suffix(word, skip_hidden_homonym, FullWord)
            {
                return Some(we.flags);
            }
        } else {
            if let Some((we, _, _)) =
                self.strip_prefix_then_prefix(word, skip_hidden_homonym, FullWord)
            {
                return Some(we.flags);
            }
            if let Some(we) =
                self.strip_suffix_then_2_prefixes(word, skip_hidden_homonym, FullWord)
            {
                return Some(we.flags);
            }
            if let Some(we) =
                self.strip_prefix_suffix_prefix(word, skip_hidden_homonym, FullWord)
            {
                return Some(we.flags);
            }
        }
        None
    }
}

/// First occurrence of `needle` inside `haystack`.
pub(crate) fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Does the word contain a lowercase double-s pair anywhere (after
/// lowering an all-capitals word, `SS` shows up as `ss`)?
fn has_double_s(word: &[char]) -> bool {
    word.windows(2)
        .any(|w| (w[0] == 'S' || w[0] == 's') && w[0] == w[1])
}
