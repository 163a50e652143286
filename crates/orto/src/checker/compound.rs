// Compound-word recognition.
//
// Two independent mechanisms, tried in this order:
//
// 1. The flag-driven splitter: when any of the compound flags is
//    configured, split points are scanned left to right; the left part
//    must check as a compound begin/middle piece and the rest either
//    checks as a compound end or recurses. A variant re-applies compound
//    boundary patterns with replacements before splitting.
// 2. The rule-driven splitter: when compound rules exist, stems are
//    collected at every split point and the accumulated flag sets are
//    matched against the rule regexes.
//
// Each sub-attempt of the classic splitter reports success, "try the next
// attempt" or a fatal stop for this split; the chain replaces the
// original's unstructured jumps.

use orto_core::casing::Casing;
use orto_core::character::is_upper;
use orto_core::flags::{Flag, FlagSet, HIDDEN_HOMONYM_FLAG};

use crate::aff_data::AffData;
use crate::affix::{AffixEntry, AffixingMode, Prefix, Suffix};
use crate::tables::CompoundPattern;
use crate::wordlist::WordEntry;

use AffixingMode::*;

/// A piece of a compound decomposition together with the Hungarian
/// counters its affixes contribute.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompoundingResult<'a> {
    pub entry: WordEntry<'a>,
    pub num_words_modifier: u16,
    pub num_syllable_modifier: i16,
    pub affixed_and_modified: bool,
}

impl<'a> CompoundingResult<'a> {
    fn plain(entry: WordEntry<'a>) -> Self {
        Self {
            entry,
            num_words_modifier: 0,
            num_syllable_modifier: 0,
            affixed_and_modified: false,
        }
    }
}

/// Outcome of one sub-attempt at a fixed split point.
enum Attempt<'a> {
    Success(CompoundingResult<'a>),
    TryNext,
    /// Stop searching this split entirely (word-count limit reached).
    Stop,
}

impl AffData {
    /// Entry point called from `check_word` after the simple checks fail.
    pub(crate) fn check_compound<'a>(
        &'a self,
        word: &mut Vec<char>,
        input_casing: Casing,
    ) -> Option<CompoundingResult<'a>> {
        if self.compound_flag != 0
            || self.compound_begin_flag != 0
            || self.compound_middle_flag != 0
            || self.compound_last_flag != 0
        {
            if let Some(ret) =
                self.check_compound_split(word, 0, 0, AtCompoundBegin, input_casing)
            {
                return Some(ret);
            }
        }
        if !self.compound_rules.is_empty() {
            let mut words_data = Vec::new();
            return self
                .check_compound_with_rules(word, &mut words_data, 0, input_casing)
                .map(CompoundingResult::plain);
        }
        None
    }

    /// Scan split points of `word[start_pos..]` for the flag-driven
    /// splitter. Each recursion advances `start_pos` by at least the
    /// minimum part length, which bounds the recursion.
    fn check_compound_split<'a>(
        &'a self,
        word: &mut Vec<char>,
        start_pos: usize,
        num_part: usize,
        mode: AffixingMode,
        input_casing: Casing,
    ) -> Option<CompoundingResult<'a>> {
        let min_length = self.compound_min();
        if word.len() < min_length * 2 {
            return None;
        }
        let max_length = word.len() - min_length;
        for i in start_pos + min_length..=max_length {
            if let Some(ret) =
                self.check_compound_classic(word, start_pos, i, num_part, mode, input_casing)
            {
                return Some(ret);
            }
            if let Some(ret) = self.check_compound_with_pattern_replacements(
                word,
                start_pos,
                i,
                num_part,
                mode,
                input_casing,
            ) {
                return Some(ret);
            }
        }
        None
    }

    /// The classic splitter at one split point.
    fn check_compound_classic<'a>(
        &'a self,
        word: &mut Vec<char>,
        start_pos: usize,
        i: usize,
        num_part: usize,
        mode: AffixingMode,
        input_casing: Casing,
    ) -> Option<CompoundingResult<'a>> {
        let part1 = {
            let mut part: Vec<char> = word[start_pos..i].to_vec();
            self.check_word_in_compound(&mut part, mode)?
        };
        if part1.entry.flags.contains(self.forbiddenword_flag) {
            return None;
        }
        if self.compound_check_triple && is_triple_at(word, i) {
            return None;
        }
        if self.compound_check_case && has_uppercase_at_boundary(word, i) {
            return None;
        }
        let mut num_part = num_part + part1.num_words_modifier as usize;
        if self.compound_root_flag != 0
            && part1.entry.flags.contains(self.compound_root_flag)
        {
            num_part += 1;
        }

        match self.classic_terminal(word, start_pos, i, num_part, input_casing, &part1) {
            Attempt::Success(_) => return Some(part1),
            Attempt::Stop => return None,
            Attempt::TryNext => {}
        }

        match self.classic_recursive(word, start_pos, i, num_part, input_casing, &part1) {
            Attempt::Success(_) => return Some(part1),
            Attempt::Stop => return None,
            Attempt::TryNext => {}
        }

        self.classic_simplified_triple(word, start_pos, i, num_part, input_casing, &part1)
    }

    /// Terminal attempt: the rest of the word is a single compound-end
    /// piece.
    fn classic_terminal<'a>(
        &'a self,
        word: &mut Vec<char>,
        start_pos: usize,
        i: usize,
        num_part: usize,
        input_casing: Casing,
        part1: &CompoundingResult<'a>,
    ) -> Attempt<'a> {
        let part2 = {
            let mut part: Vec<char> = word[i..].to_vec();
            match self.check_word_in_compound(&mut part, AtCompoundEnd) {
                Some(p) => p,
                None => return Attempt::TryNext,
            }
        };
        if part2.entry.flags.contains(self.forbiddenword_flag) {
            return Attempt::TryNext;
        }
        if self.is_compound_forbidden_by_patterns(word, i, part1, &part2) {
            return Attempt::TryNext;
        }
        if self.compound_check_duplicate && part1.entry.same_entry(&part2.entry) {
            return Attempt::TryNext;
        }
        if self.compound_check_rep {
            let mut part: Vec<char> = word[start_pos..].to_vec();
            if self.is_rep_similar(&mut part) {
                return Attempt::TryNext;
            }
        }
        if self.forbidden_by_force_uppercase(input_casing, part2.entry.flags) {
            return Attempt::TryNext;
        }
        let mut total = num_part + part2.num_words_modifier as usize;
        if self.compound_root_flag != 0
            && part2.entry.flags.contains(self.compound_root_flag)
        {
            total += 1;
        }
        if self.compound_max_word_count != 0
            && total + 1 >= self.compound_max_word_count as usize
        {
            if self.compound_syllable_vowels.is_empty() {
                // the part count only grows from here, end this split
                return Attempt::Stop;
            }
            let num_syllable =
                self.count_syllables(word) as i32 + part2.num_syllable_modifier as i32;
            if num_syllable > self.compound_syllable_max as i32 {
                return Attempt::TryNext;
            }
        }
        Attempt::Success(*part1)
    }

    /// Recursive attempt: the rest of the word is itself a compound tail.
    fn classic_recursive<'a>(
        &'a self,
        word: &mut Vec<char>,
        start_pos: usize,
        i: usize,
        num_part: usize,
        input_casing: Casing,
        part1: &CompoundingResult<'a>,
    ) -> Attempt<'a> {
        let part2 = match self.check_compound_split(
            word,
            i,
            num_part + 1,
            AtCompoundMiddle,
            input_casing,
        ) {
            Some(p) => p,
            None => return Attempt::TryNext,
        };
        if self.is_compound_forbidden_by_patterns(word, i, part1, &part2) {
            return Attempt::TryNext;
        }
        if self.compound_check_rep {
            let mut part: Vec<char> = word[start_pos..].to_vec();
            if self.is_rep_similar(&mut part) {
                return Attempt::TryNext;
            }
            let p2word = part2.entry.stem;
            if word[i..].len() >= p2word.len() && word[i..i + p2word.len()] == p2word[..] {
                let mut part: Vec<char> = word[start_pos..i + p2word.len()].to_vec();
                if self.is_rep_similar(&mut part) {
                    return Attempt::TryNext;
                }
            }
        }
        Attempt::Success(*part1)
    }

    /// Simplified-triple fallback: dictionaries may write a doubled letter
    /// where the surface compound carries a tripled one; re-insert the
    /// letter at the boundary and retry.
    fn classic_simplified_triple<'a>(
        &'a self,
        word: &mut Vec<char>,
        start_pos: usize,
        i: usize,
        num_part: usize,
        input_casing: Casing,
        part1: &CompoundingResult<'a>,
    ) -> Option<CompoundingResult<'a>> {
        if !self.compound_simplified_triple {
            return None;
        }
        if !(i >= 2 && word[i - 1] == word[i - 2]) {
            return None;
        }
        word.insert(i, word[i - 1]);
        let ret = self.simplified_triple_attempts(word, start_pos, i, num_part, input_casing, part1);
        word.remove(i);
        ret
    }

    fn simplified_triple_attempts<'a>(
        &'a self,
        word: &mut Vec<char>,
        start_pos: usize,
        i: usize,
        num_part: usize,
        input_casing: Casing,
        part1: &CompoundingResult<'a>,
    ) -> Option<CompoundingResult<'a>> {
        // terminal attempt on the extended word
        'terminal: {
            let part2 = {
                let mut part: Vec<char> = word[i..].to_vec();
                match self.check_word_in_compound(&mut part, AtCompoundEnd) {
                    Some(p) => p,
                    None => break 'terminal,
                }
            };
            if part2.entry.flags.contains(self.forbiddenword_flag) {
                break 'terminal;
            }
            if self.is_compound_forbidden_by_patterns(word, i, part1, &part2) {
                break 'terminal;
            }
            if self.compound_check_duplicate && part1.entry.same_entry(&part2.entry) {
                break 'terminal;
            }
            if self.compound_check_rep {
                // the inserted letter is not part of the real surface word
                let mut part: Vec<char> = word[start_pos..].to_vec();
                part.remove(i - start_pos);
                if self.is_rep_similar(&mut part) {
                    break 'terminal;
                }
            }
            if self.forbidden_by_force_uppercase(input_casing, part2.entry.flags) {
                break 'terminal;
            }
            if self.compound_max_word_count != 0
                && num_part + 1 >= self.compound_max_word_count as usize
            {
                return None;
            }
            return Some(*part1);
        }

        // recursive attempt on the extended word
        let part2 = self.check_compound_split(
            word,
            i,
            num_part + 1,
            AtCompoundMiddle,
            input_casing,
        )?;
        if self.is_compound_forbidden_by_patterns(word, i, part1, &part2) {
            return None;
        }
        if self.compound_check_rep {
            let mut part: Vec<char> = word[start_pos..].to_vec();
            part.remove(i - start_pos);
            if self.is_rep_similar(&mut part) {
                return None;
            }
            let p2word = part2.entry.stem;
            if word[i..].len() >= p2word.len() && word[i..i + p2word.len()] == p2word[..] {
                let mut part: Vec<char> = word[start_pos..i + p2word.len()].to_vec();
                part.remove(i - start_pos);
                if self.is_rep_similar(&mut part) {
                    return None;
                }
            }
        }
        Some(*part1)
    }

    /// The pattern-replacement splitter: a compound pattern with a
    /// replacement lets the surface carry `replacement` where the joined
    /// words would meet as `end_chars` + `begin_chars`; substitute the
    /// boundary shape back in and run the classic logic with the
    /// pattern's extra flag filters.
    fn check_compound_with_pattern_replacements<'a>(
        &'a self,
        word: &mut Vec<char>,
        start_pos: usize,
        i: usize,
        num_part: usize,
        mode: AffixingMode,
        input_casing: Casing,
    ) -> Option<CompoundingResult<'a>> {
        for p in &self.compound_patterns {
            if p.replacement.is_empty() {
                continue;
            }
            if word[i..].len() < p.replacement.len()
                || word[i..i + p.replacement.len()] != p.replacement[..]
            {
                continue;
            }

            // substitute the boundary characters for the replacement
            let boundary: Vec<char> = p
                .end_chars
                .iter()
                .chain(&p.begin_chars)
                .copied()
                .collect();
            word.splice(i..i + p.replacement.len(), boundary.iter().copied());
            let i2 = i + p.end_chars.len();

            let ret = self.pattern_replacement_attempts(
                word,
                start_pos,
                i2,
                num_part,
                mode,
                input_casing,
                p,
            );

            // put the replacement back
            let at = i2 - p.end_chars.len();
            word.splice(at..at + boundary.len(), p.replacement.iter().copied());

            match ret {
                Attempt::Success(r) => return Some(r),
                Attempt::Stop => return None,
                Attempt::TryNext => {}
            }
        }
        None
    }

    fn pattern_replacement_attempts<'a>(
        &'a self,
        word: &mut Vec<char>,
        start_pos: usize,
        i: usize,
        num_part: usize,
        mode: AffixingMode,
        input_casing: Casing,
        p: &CompoundPattern,
    ) -> Attempt<'a> {
        let part1 = {
            let mut part: Vec<char> = word[start_pos..i].to_vec();
            match self.check_word_in_compound(&mut part, mode) {
                Some(r) => r,
                None => return Attempt::TryNext,
            }
        };
        if part1.entry.flags.contains(self.forbiddenword_flag) {
            return Attempt::TryNext;
        }
        if p.first_word_flag != 0 && !part1.entry.flags.contains(p.first_word_flag) {
            return Attempt::TryNext;
        }
        if self.compound_check_triple && is_triple_at(word, i) {
            return Attempt::TryNext;
        }

        // terminal
        'terminal: {
            let part2 = {
                let mut part: Vec<char> = word[i..].to_vec();
                match self.check_word_in_compound(&mut part, AtCompoundEnd) {
                    Some(r) => r,
                    None => break 'terminal,
                }
            };
            if part2.entry.flags.contains(self.forbiddenword_flag) {
                break 'terminal;
            }
            if p.second_word_flag != 0 && !part2.entry.flags.contains(p.second_word_flag) {
                break 'terminal;
            }
            if self.compound_check_duplicate && part1.entry.same_entry(&part2.entry) {
                break 'terminal;
            }
            if self.compound_check_rep {
                let mut part: Vec<char> = word[start_pos..].to_vec();
                let at = i - start_pos - p.end_chars.len();
                let boundary_len = p.end_chars.len() + p.begin_chars.len();
                part.splice(at..at + boundary_len, p.replacement.iter().copied());
                if self.is_rep_similar(&mut part) {
                    break 'terminal;
                }
            }
            if self.forbidden_by_force_uppercase(input_casing, part2.entry.flags) {
                break 'terminal;
            }
            if self.compound_max_word_count != 0
                && num_part + 1 >= self.compound_max_word_count as usize
            {
                return Attempt::Stop;
            }
            return Attempt::Success(part1);
        }

        // recursive
        'recursive: {
            let part2 = match self.check_compound_split(
                word,
                i,
                num_part + 1,
                AtCompoundMiddle,
                input_casing,
            ) {
                Some(r) => r,
                None => break 'recursive,
            };
            if p.second_word_flag != 0 && !part2.entry.flags.contains(p.second_word_flag) {
                break 'recursive;
            }
            if self.compound_check_rep {
                let mut part: Vec<char> = word[start_pos..].to_vec();
                let at = i - start_pos - p.end_chars.len();
                let boundary_len = p.end_chars.len() + p.begin_chars.len();
                part.splice(at..at + boundary_len, p.replacement.iter().copied());
                if self.is_rep_similar(&mut part) {
                    break 'recursive;
                }
                let p2word = part2.entry.stem;
                if word[i..].len() >= p2word.len() && word[i..i + p2word.len()] == p2word[..]
                {
                    let mut part: Vec<char> = word[start_pos..i + p2word.len()].to_vec();
                    if self.is_rep_similar(&mut part) {
                        break 'recursive;
                    }
                }
            }
            return Attempt::Success(part1);
        }

        // simplified triple on the substituted word
        if !self.compound_simplified_triple {
            return Attempt::TryNext;
        }
        if !(i >= 2 && word[i - 1] == word[i - 2]) {
            return Attempt::TryNext;
        }
        word.insert(i, word[i - 1]);
        let ret = self.pattern_simplified_triple(
            word,
            start_pos,
            i,
            num_part,
            input_casing,
            p,
            &part1,
        );
        word.remove(i);
        ret
    }

    fn pattern_simplified_triple<'a>(
        &'a self,
        word: &mut Vec<char>,
        start_pos: usize,
        i: usize,
        num_part: usize,
        input_casing: Casing,
        p: &CompoundPattern,
        part1: &CompoundingResult<'a>,
    ) -> Attempt<'a> {
        // terminal attempt on the extended word
        'terminal: {
            let part2 = {
                let mut part: Vec<char> = word[i..].to_vec();
                match self.check_word_in_compound(&mut part, AtCompoundEnd) {
                    Some(r) => r,
                    None => break 'terminal,
                }
            };
            if part2.entry.flags.contains(self.forbiddenword_flag) {
                break 'terminal;
            }
            if p.second_word_flag != 0 && !part2.entry.flags.contains(p.second_word_flag) {
                break 'terminal;
            }
            if self.compound_check_duplicate && part1.entry.same_entry(&part2.entry) {
                break 'terminal;
            }
            if self.compound_check_rep {
                let mut part: Vec<char> = word[start_pos..].to_vec();
                part.remove(i - start_pos);
                let at = i - start_pos - p.end_chars.len();
                let boundary_len = p.end_chars.len() + p.begin_chars.len();
                part.splice(at..at + boundary_len, p.replacement.iter().copied());
                if self.is_rep_similar(&mut part) {
                    break 'terminal;
                }
            }
            if self.forbidden_by_force_uppercase(input_casing, part2.entry.flags) {
                break 'terminal;
            }
            if self.compound_max_word_count != 0
                && num_part + 1 >= self.compound_max_word_count as usize
            {
                return Attempt::Stop;
            }
            return Attempt::Success(*part1);
        }

        // recursive attempt on the extended word
        let part2 = match self.check_compound_split(
            word,
            i,
            num_part + 1,
            AtCompoundMiddle,
            input_casing,
        ) {
            Some(r) => r,
            None => return Attempt::TryNext,
        };
        if p.second_word_flag != 0 && !part2.entry.flags.contains(p.second_word_flag) {
            return Attempt::TryNext;
        }
        if self.compound_check_rep {
            let mut part: Vec<char> = word[start_pos..].to_vec();
            part.remove(i - start_pos);
            let at = i - start_pos - p.end_chars.len();
            let boundary_len = p.end_chars.len() + p.begin_chars.len();
            part.splice(at..at + boundary_len, p.replacement.iter().copied());
            if self.is_rep_similar(&mut part) {
                return Attempt::TryNext;
            }
            let p2word = part2.entry.stem;
            if word[i..].len() >= p2word.len() && word[i..i + p2word.len()] == p2word[..] {
                let mut part: Vec<char> = word[start_pos..i + p2word.len()].to_vec();
                part.remove(i - start_pos);
                if self.is_rep_similar(&mut part) {
                    return Attempt::TryNext;
                }
            }
        }
        Attempt::Success(*part1)
    }

    /// A single compound piece: plain dictionary entries carrying the
    /// position's compound flag, then affixed forms via the suffix,
    /// prefix and commutative strips (plus double suffixes when the
    /// option allows).
    pub(crate) fn check_word_in_compound<'a>(
        &'a self,
        word: &mut Vec<char>,
        mode: AffixingMode,
    ) -> Option<CompoundingResult<'a>> {
        let position_flag = match mode {
            AtCompoundBegin => self.compound_begin_flag,
            AtCompoundMiddle => self.compound_middle_flag,
            AtCompoundEnd => self.compound_last_flag,
            FullWord => 0,
        };

        for we in self.words.homonyms(word) {
            if we.flags.contains(self.need_affix_flag) {
                continue;
            }
            if !we.flags.contains(self.compound_flag) && !we.flags.contains(position_flag)
            {
                continue;
            }
            if we.flags.contains(HIDDEN_HOMONYM_FLAG) {
                continue;
            }
            return Some(CompoundingResult {
                entry: we,
                num_words_modifier: 0,
                num_syllable_modifier: self.syllable_modifier_of_entry(&we, mode),
                affixed_and_modified: false,
            });
        }

        if let Some((we, se)) = self.strip_suffix_only(word, true, mode) {
            return Some(CompoundingResult {
                entry: we,
                num_words_modifier: 0,
                num_syllable_modifier: self.syllable_modifier_of_suffix(&we, se, mode),
                affixed_and_modified: se.is_modifying(),
            });
        }

        if self.compound_more_suffixes {
            if let Some((we, se2, se1)) = self.strip_suffix_then_suffix(word, true, mode) {
                return Some(CompoundingResult {
                    entry: we,
                    num_words_modifier: 0,
                    num_syllable_modifier: self.syllable_modifier_of_suffix(&we, se1, mode),
                    affixed_and_modified: se1.is_modifying() || se2.is_modifying(),
                });
            }
        }

        if let Some((we, pe)) = self.strip_prefix_only(word, true, mode) {
            return Some(CompoundingResult {
                entry: we,
                num_words_modifier: self.words_modifier_of_prefix(pe),
                num_syllable_modifier: 0,
                affixed_and_modified: pe.is_modifying(),
            });
        }

        if let Some((we, se, pe)) =
            self.strip_prefix_then_suffix_commutative(word, true, mode)
        {
            return Some(CompoundingResult {
                entry: we,
                num_words_modifier: self.words_modifier_of_prefix(pe),
                num_syllable_modifier: self.syllable_modifier_of_suffix(&we, se, mode),
                affixed_and_modified: se.is_modifying() || pe.is_modifying(),
            });
        }
        None
    }

    /// Hungarian bookkeeping: a prefix with more than one syllable counts
    /// as an extra word.
    fn words_modifier_of_prefix(&self, pfx: &Prefix) -> u16 {
        if self.compound_syllable_vowels.is_empty() {
            return 0;
        }
        (self.count_syllables(&pfx.appending) > 1) as u16
    }

    /// Hungarian bookkeeping for an unaffixed compound-end entry.
    fn syllable_modifier_of_entry(&self, we: &WordEntry<'_>, mode: AffixingMode) -> i16 {
        let subtract = mode == AtCompoundEnd
            && !self.compound_syllable_vowels.is_empty()
            && we.flags.contains('I' as Flag)
            && !we.flags.contains('J' as Flag);
        0 - subtract as i16
    }

    /// Hungarian bookkeeping for a suffixed compound-end piece, keyed on
    /// the specific flags `c`, `J` and `I`.
    fn syllable_modifier_of_suffix(
        &self,
        we: &WordEntry<'_>,
        sfx: &Suffix,
        mode: AffixingMode,
    ) -> i16 {
        if mode != AtCompoundEnd {
            return 0;
        }
        if self.compound_syllable_vowels.is_empty() {
            return 0;
        }
        let appnd = &sfx.appending;
        let mut modifier = 0i16 - self.count_syllables(appnd) as i16;
        let mut sfx_extra = appnd.last() == Some(&'i');
        if sfx_extra && appnd.len() > 1 {
            let c = appnd[appnd.len() - 2];
            sfx_extra = c != 'y' && c != 't';
        }
        modifier -= sfx_extra as i16;

        if self.compound_syllable_num {
            match sfx.flag {
                f if f == 'c' as Flag => modifier += 2,
                f if f == 'J' as Flag => modifier += 1,
                f if f == 'I' as Flag => modifier += we.flags.contains('J' as Flag) as i16,
                _ => {}
            }
        }
        modifier
    }

    fn forbidden_by_force_uppercase(&self, input_casing: Casing, flags: &FlagSet) -> bool {
        self.compound_force_uppercase_flag != 0
            && matches!(input_casing, Casing::Small | Casing::Camel)
            && flags.contains(self.compound_force_uppercase_flag)
    }

    /// Does any compound pattern forbid this split?
    fn is_compound_forbidden_by_patterns(
        &self,
        word: &[char],
        i: usize,
        first: &CompoundingResult<'_>,
        second: &CompoundingResult<'_>,
    ) -> bool {
        self.compound_patterns.iter().any(|p| {
            if i < p.end_chars.len() {
                return false;
            }
            let begin_end_len = p.end_chars.len() + p.begin_chars.len();
            let at = i - p.end_chars.len();
            if at + begin_end_len > word.len() {
                return false;
            }
            if word[at..i] != p.end_chars[..]
                || word[i..at + begin_end_len] != p.begin_chars[..]
            {
                return false;
            }
            if p.first_word_flag != 0 && !first.entry.flags.contains(p.first_word_flag) {
                return false;
            }
            if p.second_word_flag != 0 && !second.entry.flags.contains(p.second_word_flag)
            {
                return false;
            }
            if p.match_first_only_unaffixed_or_zero_affixed && first.affixed_and_modified {
                return false;
            }
            true
        })
    }

    /// The rule-driven splitter: pick stems whose flags intersect the
    /// compound-rule flags, push their flag sets, and match the rules once
    /// two or more stems are on the stack.
    fn check_compound_with_rules<'a>(
        &'a self,
        word: &[char],
        words_data: &mut Vec<&'a FlagSet>,
        start_pos: usize,
        input_casing: Casing,
    ) -> Option<WordEntry<'a>> {
        let min_length = self.compound_min();
        if word.len() < min_length * 2 {
            return None;
        }
        let max_length = word.len() - min_length;
        for i in start_pos + min_length..=max_length {
            let part1 = self.rule_compound_stem(&word[start_pos..i]);
            let Some(part1) = part1 else {
                continue;
            };
            words_data.push(part1.flags);

            let part2 = self.rule_compound_stem(&word[i..]);
            if let Some(part2) = part2 {
                words_data.push(part2.flags);
                let matched = self.compound_rules.match_any_rule(words_data);
                words_data.pop();
                if matched
                    && !self.forbidden_by_force_uppercase(input_casing, part2.flags)
                {
                    words_data.pop();
                    return Some(part1);
                }
            }

            let recursive =
                self.check_compound_with_rules(word, words_data, i, input_casing);
            words_data.pop();
            if recursive.is_some() {
                return recursive;
            }
        }
        None
    }

    /// First stem at this text whose flags participate in any compound
    /// rule.
    fn rule_compound_stem<'a>(&'a self, stem: &[char]) -> Option<WordEntry<'a>> {
        self.words.homonyms(stem).find(|we| {
            !we.flags.contains(self.need_affix_flag)
                && self.compound_rules.has_any_of_flags(we.flags)
        })
    }
}

/// True when the characters around split point `i` form a triple letter:
/// the pair at the boundary repeats just before or just after it.
fn is_triple_at(word: &[char], i: usize) -> bool {
    if word[i - 1] != word[i] {
        return false;
    }
    if i + 1 < word.len() && word[i] == word[i + 1] {
        return true;
    }
    if i >= 2 && word[i - 2] == word[i] {
        return true;
    }
    false
}

/// An uppercase letter touching the boundary on either side, with a
/// letter on the other side, blocks the split when the case check is on.
fn has_uppercase_at_boundary(word: &[char], i: usize) -> bool {
    if is_upper(word[i]) {
        word[i - 1].is_alphabetic()
    } else {
        is_upper(word[i - 1]) && word[i].is_alphabetic()
    }
}

#[cfg(test)]
mod tests {
    use crate::aff_data::AffData;
    use crate::parser::parse_dictionary;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn spell(data: &AffData, word: &str) -> bool {
        let mut w = chars(word);
        data.spell_priv(&mut w)
    }

    #[test]
    fn two_part_compound_with_compound_flag() {
        let aff = "COMPOUNDFLAG C\n";
        let data = parse_dictionary(aff, "2\nfoot/C\nball/C\n").unwrap();
        assert!(spell(&data, "football"));
        assert!(spell(&data, "ballfoot"));
        assert!(!spell(&data, "footbal"));
        assert!(!spell(&data, "foot"));
        assert!(spell(&data, "Football"));
    }

    #[test]
    fn three_part_compound_recurses() {
        let aff = "COMPOUNDFLAG C\n";
        let data = parse_dictionary(aff, "2\nfoot/C\nball/C\n").unwrap();
        assert!(spell(&data, "footballfoot"));
        assert!(spell(&data, "ballballball"));
    }

    #[test]
    fn min_length_bounds_split_points() {
        let aff = "COMPOUNDFLAG C\n";
        // both parts shorter than the default minimum of 3
        let data = parse_dictionary(aff, "2\nha/C\nxe/C\n").unwrap();
        assert!(!spell(&data, "haxe"));

        let aff = "COMPOUNDFLAG C\nCOMPOUNDMIN 2\n";
        let data = parse_dictionary(aff, "2\nha/C\nxe/C\n").unwrap();
        assert!(spell(&data, "haxe"));
    }

    #[test]
    fn positional_compound_flags() {
        let aff = "\
COMPOUNDBEGIN B
COMPOUNDEND E
";
        let data = parse_dictionary(aff, "2\nfoot/B\nball/E\n").unwrap();
        assert!(spell(&data, "football"));
        // the reverse order violates the positions
        assert!(!spell(&data, "ballfoot"));
    }

    #[test]
    fn duplicate_check_rejects_repeated_part() {
        let aff = "COMPOUNDFLAG C\nCOMPOUNDMIN 2\nCHECKCOMPOUNDDUP\n";
        let data = parse_dictionary(aff, "1\nha/C\n").unwrap();
        assert!(!spell(&data, "haha"));

        let aff = "COMPOUNDFLAG C\nCOMPOUNDMIN 2\n";
        let data = parse_dictionary(aff, "1\nha/C\n").unwrap();
        assert!(spell(&data, "haha"));
    }

    #[test]
    fn triple_letter_check() {
        let aff = "COMPOUNDFLAG C\nCHECKCOMPOUNDTRIPLE\n";
        let data = parse_dictionary(aff, "2\ngrass/C\nseed/C\n").unwrap();
        assert!(!spell(&data, "grassseed"));

        let aff = "COMPOUNDFLAG C\n";
        let data = parse_dictionary(aff, "2\ngrass/C\nseed/C\n").unwrap();
        assert!(spell(&data, "grassseed"));
    }

    #[test]
    fn simplified_triple_inserts_the_shared_letter() {
        let aff = "COMPOUNDFLAG C\nCHECKCOMPOUNDTRIPLE\nSIMPLIFIEDTRIPLE\n";
        let data = parse_dictionary(aff, "2\nball/C\nlike/C\n").unwrap();
        assert!(spell(&data, "ballike"));

        let aff = "COMPOUNDFLAG C\nCHECKCOMPOUNDTRIPLE\n";
        let data = parse_dictionary(aff, "2\nball/C\nlike/C\n").unwrap();
        assert!(!spell(&data, "ballike"));
    }

    #[test]
    fn boundary_case_check() {
        let aff = "COMPOUNDFLAG C\nCHECKCOMPOUNDCASE\n";
        let data = parse_dictionary(aff, "2\nfoo/C\nBar/C\n").unwrap();
        assert!(!spell(&data, "fooBar"));

        let aff = "COMPOUNDFLAG C\n";
        let data = parse_dictionary(aff, "2\nfoo/C\nBar/C\n").unwrap();
        assert!(spell(&data, "fooBar"));
    }

    #[test]
    fn compound_pattern_forbids_boundary_shape() {
        let aff = "\
COMPOUNDFLAG C
CHECKCOMPOUNDPATTERN 1
CHECKCOMPOUNDPATTERN t b
";
        let data = parse_dictionary(aff, "2\nfoot/C\nball/C\n").unwrap();
        assert!(!spell(&data, "football"));
        assert!(spell(&data, "ballfoot"));
    }

    #[test]
    fn rep_similarity_check_vetoes_compounds() {
        let aff = "\
COMPOUNDFLAG C
CHECKCOMPOUNDREP
REP 1
REP oo o
";
        // "footbal" exists as a simple word after replacement: foobar-like
        // compounds whose surface is one REP away from a real word are
        // rejected.
        let data = parse_dictionary(aff, "3\nfoo/C\nter/C\nfoter\n").unwrap();
        assert!(!spell(&data, "footer"));

        let aff = "\
COMPOUNDFLAG C
REP 1
REP oo o
";
        let data = parse_dictionary(aff, "3\nfoo/C\nter/C\nfoter\n").unwrap();
        assert!(spell(&data, "footer"));
    }

    #[test]
    fn only_in_compound_stems() {
        let aff = "COMPOUNDFLAG C\nONLYINCOMPOUND o\n";
        let data = parse_dictionary(aff, "2\nfoot/Co\nball/C\n").unwrap();
        assert!(!spell(&data, "foot"));
        assert!(spell(&data, "football"));
    }

    #[test]
    fn forbidden_word_blocks_compound_parts() {
        let aff = "COMPOUNDFLAG C\nFORBIDDENWORD !\n";
        let data = parse_dictionary(aff, "3\nfoot/C!\nball/C\nlike/C\n").unwrap();
        assert!(!spell(&data, "football"));
        assert!(spell(&data, "balllike"));
    }

    #[test]
    fn force_uppercase_requires_capitalized_input() {
        let aff = "COMPOUNDFLAG C\nFORCEUCASE F\n";
        let data = parse_dictionary(aff, "2\nfoot/C\nball/CF\n").unwrap();
        assert!(!spell(&data, "football"));
        assert!(spell(&data, "Football"));
    }

    #[test]
    fn word_count_limit() {
        let aff = "COMPOUNDFLAG C\nCOMPOUNDMIN 2\nCOMPOUNDWORDMAX 2\n";
        let data = parse_dictionary(aff, "3\naa/C\nbb/C\ncc/C\n").unwrap();
        assert!(spell(&data, "aabb"));
        assert!(!spell(&data, "aabbcc"));

        let aff = "COMPOUNDFLAG C\nCOMPOUNDMIN 2\n";
        let data = parse_dictionary(aff, "3\naa/C\nbb/C\ncc/C\n").unwrap();
        assert!(spell(&data, "aabbcc"));
    }

    #[test]
    fn affixed_parts_inside_compounds_require_permit() {
        let aff = "\
COMPOUNDFLAG C
COMPOUNDPERMITFLAG P
SFX S Y 1
SFX S 0 s/P .
";
        let data = parse_dictionary(aff, "2\nwork/CS\nday/C\n").unwrap();
        // suffix at the compound begin position needs the permit flag
        assert!(spell(&data, "worksday"));

        let aff = "\
COMPOUNDFLAG C
SFX S Y 1
SFX S 0 s .
";
        let data = parse_dictionary(aff, "2\nwork/CS\nday/C\n").unwrap();
        assert!(!spell(&data, "worksday"));
        // at the compound end no permit is needed for a suffix
        assert!(spell(&data, "dayworks"));
    }

    #[test]
    fn compound_rules_match_flag_sequences() {
        let aff = "\
COMPOUNDRULE 1
COMPOUNDRULE AB
";
        let data = parse_dictionary(aff, "2\nfoo/A\nbar/B\n").unwrap();
        assert!(spell(&data, "foobar"));
        assert!(!spell(&data, "barfoo"));
        assert!(!spell(&data, "foofoo"));
    }

    #[test]
    fn compound_rule_quantifiers_allow_repetition() {
        let aff = "\
COMPOUNDRULE 1
COMPOUNDRULE A*B
";
        let data = parse_dictionary(aff, "2\nfoo/A\nbar/B\n").unwrap();
        assert!(spell(&data, "bar"));
        assert!(spell(&data, "foobar"));
        assert!(spell(&data, "foofoobar"));
        assert!(!spell(&data, "foofoo"));
    }

    #[test]
    fn pattern_replacement_rejoins_boundary() {
        // the pattern says: where the decomposition would read "oo"+"bb",
        // the surface spells "y" instead
        let aff = "\
COMPOUNDFLAG C
COMPOUNDMIN 1
CHECKCOMPOUNDPATTERN 1
CHECKCOMPOUNDPATTERN oo bb y
";
        let data = parse_dictionary(aff, "2\nfoo/C\nbba/C\n").unwrap();
        // surface: "f" + replacement "y" + "a" for the parts foo+bba
        assert!(spell(&data, "fya"));
        // the unreplaced boundary is forbidden by the same pattern
        assert!(!spell(&data, "foobba"));
    }
}
