// The affix-stripping primitives: every way a surface word may be reduced
// to a dictionary stem by undoing up to three affixes.
//
// All primitives share one shape: iterate candidate outer affixes whose
// appending matches the word edge, undo the affix on the shared buffer,
// test the entry's condition against the root, recurse into inner
// candidates or probe the word list, and put the buffer back before
// moving on. The buffer is restored on every exit path; callers (notably
// the compound splitter) rely on that.
//
// First match wins. Candidate order is shortest appending first, as the
// tables yield them.

use orto_core::flags::{FlagSet, HIDDEN_HOMONYM_FLAG};

use crate::affix::{AffixEntry, AffixingMode, Prefix, Suffix};
use crate::aff_data::AffData;
use crate::wordlist::WordEntry;

use AffixingMode::*;

/// Cross validation between an inner affix (closer to the stem) and an
/// outer one: the inner carrier must list the outer's flag among its
/// continuation flags.
fn cross_valid_affix(inner: &impl AffixEntry, outer: &impl AffixEntry) -> bool {
    inner.cont_flags().contains(outer.flag())
}

/// Cross validation between a word entry and an affix applied to it.
fn cross_valid_word(word_flags: &FlagSet, afx: &impl AffixEntry) -> bool {
    word_flags.contains(afx.flag())
}

impl AffData {
    /// Base validity of a prefix entry in the given affixing mode.
    fn prefix_not_valid(&self, e: &Prefix, mode: AffixingMode) -> bool {
        if mode == FullWord && e.cont_flags.contains(self.compound_onlyin_flag) {
            return true;
        }
        if mode == AtCompoundEnd && !e.cont_flags.contains(self.compound_permit_flag) {
            return true;
        }
        if mode != FullWord && e.cont_flags.contains(self.compound_forbid_flag) {
            return true;
        }
        false
    }

    /// Base validity of a suffix entry in the given affixing mode.
    fn suffix_not_valid(&self, e: &Suffix, mode: AffixingMode) -> bool {
        if mode == FullWord && e.cont_flags.contains(self.compound_onlyin_flag) {
            return true;
        }
        if mode == AtCompoundBegin && !e.cont_flags.contains(self.compound_permit_flag) {
            return true;
        }
        if mode != FullWord && e.cont_flags.contains(self.compound_forbid_flag) {
            return true;
        }
        false
    }

    /// Outer affixes must additionally not require a further affix.
    fn outer_prefix_not_valid(&self, e: &Prefix, mode: AffixingMode) -> bool {
        self.prefix_not_valid(e, mode) || e.cont_flags.contains(self.need_affix_flag)
    }

    fn outer_suffix_not_valid(&self, e: &Suffix, mode: AffixingMode) -> bool {
        self.suffix_not_valid(e, mode) || e.cont_flags.contains(self.need_affix_flag)
    }

    fn is_circumfix(&self, a: &impl AffixEntry) -> bool {
        a.cont_flags().contains(self.circumfix_flag)
    }

    /// Whether a flag set allows the carrying piece to occupy the given
    /// compound position. In full-word mode everything is allowed.
    pub(crate) fn is_valid_inside_compound(
        &self,
        flags: &FlagSet,
        mode: AffixingMode,
    ) -> bool {
        let position_flag = match mode {
            FullWord => return true,
            AtCompoundBegin => self.compound_begin_flag,
            AtCompoundMiddle => self.compound_middle_flag,
            AtCompoundEnd => self.compound_last_flag,
        };
        flags.contains(self.compound_flag) || flags.contains(position_flag)
    }

    /// Without the full-strip option, an affix may not consume the entire
    /// word.
    fn strips_whole_word(&self, appending: &[char], word_len: usize) -> bool {
        !self.fullstrip && appending.len() == word_len
    }

    /// Shared stem probe for the single-affix primitives.
    fn stem_for_single_affix<'a>(
        &'a self,
        root: &[char],
        e: &impl AffixEntry,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        for we in self.words.homonyms(root) {
            if !cross_valid_word(we.flags, e) {
                continue;
            }
            if mode == FullWord && we.flags.contains(self.compound_onlyin_flag) {
                continue;
            }
            if skip_hidden_homonym && we.flags.contains(HIDDEN_HOMONYM_FLAG) {
                continue;
            }
            if !self.is_valid_inside_compound(we.flags, mode)
                && !self.is_valid_inside_compound(e.cont_flags(), mode)
            {
                continue;
            }
            return Some(we);
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 1: prefix only
    // -----------------------------------------------------------------------

    pub(crate) fn strip_prefix_only<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Prefix)> {
        for pe in self.prefixes.matching(word) {
            if self.outer_prefix_not_valid(pe, mode) {
                continue;
            }
            if self.is_circumfix(pe) {
                continue;
            }
            if self.strips_whole_word(&pe.appending, word.len()) {
                continue;
            }
            pe.to_root(word);
            let res = if pe.check_condition(word) {
                self.stem_for_single_affix(word, pe, skip_hidden_homonym, mode)
            } else {
                None
            };
            pe.to_derived(word);
            if let Some(entry) = res {
                return Some((entry, pe));
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 2: suffix only
    // -----------------------------------------------------------------------

    pub(crate) fn strip_suffix_only<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Suffix)> {
        for se in self.suffixes.matching(word) {
            if self.outer_suffix_not_valid(se, mode) {
                continue;
            }
            if !se.appending.is_empty()
                && mode == AtCompoundEnd
                && se.cont_flags.contains(self.compound_onlyin_flag)
            {
                continue;
            }
            if self.is_circumfix(se) {
                continue;
            }
            if self.strips_whole_word(&se.appending, word.len()) {
                continue;
            }
            se.to_root(word);
            let res = if se.check_condition(word) {
                self.stem_for_single_affix(word, se, skip_hidden_homonym, mode)
            } else {
                None
            };
            se.to_derived(word);
            if let Some(entry) = res {
                return Some((entry, se));
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 3: prefix then suffix (prefix is outer)
    // -----------------------------------------------------------------------

    /// Accepts a derived word formed by adding a suffix first and then a
    /// prefix to the root; stripping runs in reverse order.
    pub(crate) fn strip_prefix_then_suffix<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Suffix, &'a Prefix)> {
        for pe in self.prefixes.matching(word) {
            if !pe.cross_product {
                continue;
            }
            if self.outer_prefix_not_valid(pe, mode) {
                continue;
            }
            if self.strips_whole_word(&pe.appending, word.len()) {
                continue;
            }
            pe.to_root(word);
            let res = if pe.check_condition(word) {
                self.strip_pfx_then_sfx_2(pe, word, skip_hidden_homonym, mode)
            } else {
                None
            };
            pe.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_pfx_then_sfx_2<'a>(
        &'a self,
        pe: &'a Prefix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Suffix, &'a Prefix)> {
        for se in self.suffixes.matching(word) {
            if !se.cross_product {
                continue;
            }
            if self.suffix_not_valid(se, mode) {
                continue;
            }
            if self.is_circumfix(pe) != self.is_circumfix(se) {
                continue;
            }
            if self.strips_whole_word(&se.appending, word.len()) {
                continue;
            }
            se.to_root(word);
            let mut found = None;
            if se.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;
                    if !cross_valid_affix(se, pe) && !cross_valid_word(wf, pe) {
                        continue;
                    }
                    if !cross_valid_word(wf, se) {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    if !self.is_valid_inside_compound(wf, mode)
                        && !self.is_valid_inside_compound(&se.cont_flags, mode)
                        && !self.is_valid_inside_compound(&pe.cont_flags, mode)
                    {
                        continue;
                    }
                    found = Some((we, se, pe));
                    break;
                }
            }
            se.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 4: suffix then prefix (suffix is outer)
    // -----------------------------------------------------------------------

    /// Accepts a derived word formed by adding a prefix first and then a
    /// suffix to the root; stripping runs in reverse order.
    pub(crate) fn strip_suffix_then_prefix<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Prefix, &'a Suffix)> {
        for se in self.suffixes.matching(word) {
            if !se.cross_product {
                continue;
            }
            if self.outer_suffix_not_valid(se, mode) {
                continue;
            }
            if self.strips_whole_word(&se.appending, word.len()) {
                continue;
            }
            se.to_root(word);
            let res = if se.check_condition(word) {
                self.strip_sfx_then_pfx_2(se, word, skip_hidden_homonym, mode)
            } else {
                None
            };
            se.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_sfx_then_pfx_2<'a>(
        &'a self,
        se: &'a Suffix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Prefix, &'a Suffix)> {
        for pe in self.prefixes.matching(word) {
            if !pe.cross_product {
                continue;
            }
            if self.prefix_not_valid(pe, mode) {
                continue;
            }
            if self.is_circumfix(pe) != self.is_circumfix(se) {
                continue;
            }
            if self.strips_whole_word(&pe.appending, word.len()) {
                continue;
            }
            pe.to_root(word);
            let mut found = None;
            if pe.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;
                    if !cross_valid_affix(pe, se) && !cross_valid_word(wf, se) {
                        continue;
                    }
                    if !cross_valid_word(wf, pe) {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    if !self.is_valid_inside_compound(wf, mode)
                        && !self.is_valid_inside_compound(&se.cont_flags, mode)
                        && !self.is_valid_inside_compound(&pe.cont_flags, mode)
                    {
                        continue;
                    }
                    found = Some((we, pe, se));
                    break;
                }
            }
            pe.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 5: prefix + suffix, commutative
    // -----------------------------------------------------------------------

    /// Accepts a prefix+suffix derivation where either affix may act as
    /// the outer one. The two halves may not both require a further affix,
    /// and whichever direction validates must have an outer half without
    /// the need-affix flag.
    pub(crate) fn strip_prefix_then_suffix_commutative<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Suffix, &'a Prefix)> {
        for pe in self.prefixes.matching(word) {
            if !pe.cross_product {
                continue;
            }
            if self.prefix_not_valid(pe, mode) {
                continue;
            }
            if self.strips_whole_word(&pe.appending, word.len()) {
                continue;
            }
            pe.to_root(word);
            let res = if pe.check_condition(word) {
                self.strip_pfx_then_sfx_comm_2(pe, word, skip_hidden_homonym, mode)
            } else {
                None
            };
            pe.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_pfx_then_sfx_comm_2<'a>(
        &'a self,
        pe: &'a Prefix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Suffix, &'a Prefix)> {
        let has_needaffix_pe = pe.cont_flags.contains(self.need_affix_flag);
        let is_circumfix_pe = self.is_circumfix(pe);

        for se in self.suffixes.matching(word) {
            if !se.cross_product {
                continue;
            }
            if self.suffix_not_valid(se, mode) {
                continue;
            }
            let has_needaffix_se = se.cont_flags.contains(self.need_affix_flag);
            if has_needaffix_pe && has_needaffix_se {
                continue;
            }
            if is_circumfix_pe != self.is_circumfix(se) {
                continue;
            }
            if self.strips_whole_word(&se.appending, word.len()) {
                continue;
            }
            se.to_root(word);
            let mut found = None;
            if se.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;

                    let valid_cross_pe_outer = !has_needaffix_pe
                        && cross_valid_word(wf, se)
                        && (cross_valid_affix(se, pe) || cross_valid_word(wf, pe));

                    let valid_cross_se_outer = !has_needaffix_se
                        && cross_valid_word(wf, pe)
                        && (cross_valid_affix(pe, se) || cross_valid_word(wf, se));

                    if !valid_cross_pe_outer && !valid_cross_se_outer {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    if !self.is_valid_inside_compound(wf, mode)
                        && !self.is_valid_inside_compound(&se.cont_flags, mode)
                        && !self.is_valid_inside_compound(&pe.cont_flags, mode)
                    {
                        continue;
                    }
                    found = Some((we, se, pe));
                    break;
                }
            }
            se.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 6: two suffixes
    // -----------------------------------------------------------------------

    pub(crate) fn strip_suffix_then_suffix<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Suffix, &'a Suffix)> {
        // Cheap pre-check; does not affect correctness.
        if !self.suffixes.has_continuation_flags() {
            return None;
        }
        for se1 in self.suffixes.matching(word) {
            if !self.suffixes.has_continuation_flag(se1.flag) {
                continue;
            }
            if self.outer_suffix_not_valid(se1, mode) {
                continue;
            }
            if self.is_circumfix(se1) {
                continue;
            }
            if self.strips_whole_word(&se1.appending, word.len()) {
                continue;
            }
            se1.to_root(word);
            let res = if se1.check_condition(word) {
                self.strip_sfx_then_sfx_2(se1, word, skip_hidden_homonym, FullWord)
            } else {
                None
            };
            se1.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_sfx_then_sfx_2<'a>(
        &'a self,
        se1: &'a Suffix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Suffix, &'a Suffix)> {
        for se2 in self.suffixes.matching(word) {
            if !cross_valid_affix(se2, se1) {
                continue;
            }
            if self.suffix_not_valid(se2, mode) {
                continue;
            }
            if self.is_circumfix(se2) {
                continue;
            }
            if self.strips_whole_word(&se2.appending, word.len()) {
                continue;
            }
            se2.to_root(word);
            let mut found = None;
            if se2.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;
                    if !cross_valid_word(wf, se2) {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    found = Some((we, se2, se1));
                    break;
                }
            }
            se2.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 7: two prefixes
    // -----------------------------------------------------------------------

    pub(crate) fn strip_prefix_then_prefix<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Prefix, &'a Prefix)> {
        if !self.prefixes.has_continuation_flags() {
            return None;
        }
        for pe1 in self.prefixes.matching(word) {
            if !self.prefixes.has_continuation_flag(pe1.flag) {
                continue;
            }
            if self.outer_prefix_not_valid(pe1, mode) {
                continue;
            }
            if self.is_circumfix(pe1) {
                continue;
            }
            if self.strips_whole_word(&pe1.appending, word.len()) {
                continue;
            }
            pe1.to_root(word);
            let res = if pe1.check_condition(word) {
                self.strip_pfx_then_pfx_2(pe1, word, skip_hidden_homonym, FullWord)
            } else {
                None
            };
            pe1.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_pfx_then_pfx_2<'a>(
        &'a self,
        pe1: &'a Prefix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<(WordEntry<'a>, &'a Prefix, &'a Prefix)> {
        for pe2 in self.prefixes.matching(word) {
            if !cross_valid_affix(pe2, pe1) {
                continue;
            }
            if self.prefix_not_valid(pe2, mode) {
                continue;
            }
            if self.is_circumfix(pe2) {
                continue;
            }
            if self.strips_whole_word(&pe2.appending, word.len()) {
                continue;
            }
            pe2.to_root(word);
            let mut found = None;
            if pe2.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;
                    if !cross_valid_word(wf, pe2) {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    found = Some((we, pe2, pe1));
                    break;
                }
            }
            pe2.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 8: prefix then two suffixes
    // -----------------------------------------------------------------------

    pub(crate) fn strip_prefix_then_2_suffixes<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        if !self.suffixes.has_continuation_flags() {
            return None;
        }
        for pe1 in self.prefixes.matching(word) {
            if !pe1.cross_product {
                continue;
            }
            if self.outer_prefix_not_valid(pe1, mode) {
                continue;
            }
            if self.strips_whole_word(&pe1.appending, word.len()) {
                continue;
            }
            pe1.to_root(word);
            let mut res = None;
            if pe1.check_condition(word) {
                for se1 in self.suffixes.matching(word) {
                    if !self.suffixes.has_continuation_flag(se1.flag) {
                        continue;
                    }
                    if !se1.cross_product {
                        continue;
                    }
                    if self.suffix_not_valid(se1, mode) {
                        continue;
                    }
                    if self.is_circumfix(pe1) != self.is_circumfix(se1) {
                        continue;
                    }
                    if self.strips_whole_word(&se1.appending, word.len()) {
                        continue;
                    }
                    se1.to_root(word);
                    let inner = if se1.check_condition(word) {
                        self.strip_pfx_2_sfx_3(pe1, se1, word, skip_hidden_homonym, FullWord)
                    } else {
                        None
                    };
                    se1.to_derived(word);
                    if inner.is_some() {
                        res = inner;
                        break;
                    }
                }
            }
            pe1.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_pfx_2_sfx_3<'a>(
        &'a self,
        pe1: &'a Prefix,
        se1: &'a Suffix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        for se2 in self.suffixes.matching(word) {
            if !cross_valid_affix(se2, se1) {
                continue;
            }
            if self.suffix_not_valid(se2, mode) {
                continue;
            }
            if self.is_circumfix(se2) {
                continue;
            }
            if self.strips_whole_word(&se2.appending, word.len()) {
                continue;
            }
            se2.to_root(word);
            let mut found = None;
            if se2.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;
                    if !cross_valid_affix(se1, pe1) && !cross_valid_word(wf, pe1) {
                        continue;
                    }
                    if !cross_valid_word(wf, se2) {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    found = Some(we);
                    break;
                }
            }
            se2.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 9: suffix + prefix + suffix (circumfix-style interleave)
    // -----------------------------------------------------------------------

    pub(crate) fn strip_suffix_prefix_suffix<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        if !self.suffixes.has_continuation_flags()
            && !self.prefixes.has_continuation_flags()
        {
            return None;
        }
        for se1 in self.suffixes.matching(word) {
            if !self.suffixes.has_continuation_flag(se1.flag)
                && !self.prefixes.has_continuation_flag(se1.flag)
            {
                continue;
            }
            if !se1.cross_product {
                continue;
            }
            if self.outer_suffix_not_valid(se1, mode) {
                continue;
            }
            if self.strips_whole_word(&se1.appending, word.len()) {
                continue;
            }
            se1.to_root(word);
            let mut res = None;
            if se1.check_condition(word) {
                for pe1 in self.prefixes.matching(word) {
                    if !pe1.cross_product {
                        continue;
                    }
                    if self.prefix_not_valid(pe1, mode) {
                        continue;
                    }
                    if self.strips_whole_word(&pe1.appending, word.len()) {
                        continue;
                    }
                    pe1.to_root(word);
                    let inner = if pe1.check_condition(word) {
                        self.strip_s_p_s_3(se1, pe1, word, skip_hidden_homonym, FullWord)
                    } else {
                        None
                    };
                    pe1.to_derived(word);
                    if inner.is_some() {
                        res = inner;
                        break;
                    }
                }
            }
            se1.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_s_p_s_3<'a>(
        &'a self,
        se1: &'a Suffix,
        pe1: &'a Prefix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        for se2 in self.suffixes.matching(word) {
            if !se2.cross_product {
                continue;
            }
            if !cross_valid_affix(se2, se1) && !cross_valid_affix(pe1, se1) {
                continue;
            }
            if self.suffix_not_valid(se2, mode) {
                continue;
            }
            let circ1ok = (self.is_circumfix(pe1) == self.is_circumfix(se1))
                && !self.is_circumfix(se2);
            let circ2ok = (self.is_circumfix(pe1) == self.is_circumfix(se2))
                && !self.is_circumfix(se1);
            if !circ1ok && !circ2ok {
                continue;
            }
            if self.strips_whole_word(&se2.appending, word.len()) {
                continue;
            }
            se2.to_root(word);
            let mut found = None;
            if se2.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;
                    if !cross_valid_affix(se2, pe1) && !cross_valid_word(wf, pe1) {
                        continue;
                    }
                    if !cross_valid_word(wf, se2) {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    found = Some(we);
                    break;
                }
            }
            se2.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 10: two suffixes then prefix (opt-in, not on the check path)
    // -----------------------------------------------------------------------

    pub(crate) fn strip_2_suffixes_then_prefix<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        if !self.suffixes.has_continuation_flags()
            && !self.prefixes.has_continuation_flags()
        {
            return None;
        }
        for se1 in self.suffixes.matching(word) {
            if !self.suffixes.has_continuation_flag(se1.flag)
                && !self.prefixes.has_continuation_flag(se1.flag)
            {
                continue;
            }
            if self.outer_suffix_not_valid(se1, mode) {
                continue;
            }
            if self.is_circumfix(se1) {
                continue;
            }
            if self.strips_whole_word(&se1.appending, word.len()) {
                continue;
            }
            se1.to_root(word);
            let mut res = None;
            if se1.check_condition(word) {
                for se2 in self.suffixes.matching(word) {
                    if !se2.cross_product {
                        continue;
                    }
                    if self.suffix_not_valid(se2, mode) {
                        continue;
                    }
                    if self.strips_whole_word(&se2.appending, word.len()) {
                        continue;
                    }
                    se2.to_root(word);
                    let inner = if se2.check_condition(word) {
                        self.strip_2_sfx_pfx_3(se1, se2, word, skip_hidden_homonym, FullWord)
                    } else {
                        None
                    };
                    se2.to_derived(word);
                    if inner.is_some() {
                        res = inner;
                        break;
                    }
                }
            }
            se1.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_2_sfx_pfx_3<'a>(
        &'a self,
        se1: &'a Suffix,
        se2: &'a Suffix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        for pe1 in self.prefixes.matching(word) {
            if !pe1.cross_product {
                continue;
            }
            if !cross_valid_affix(se2, se1) && !cross_valid_affix(pe1, se1) {
                continue;
            }
            if self.prefix_not_valid(pe1, mode) {
                continue;
            }
            if self.is_circumfix(se2) != self.is_circumfix(pe1) {
                continue;
            }
            if self.strips_whole_word(&pe1.appending, word.len()) {
                continue;
            }
            pe1.to_root(word);
            let mut found = None;
            if pe1.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;
                    if !cross_valid_affix(pe1, se2) && !cross_valid_word(wf, se2) {
                        continue;
                    }
                    if !cross_valid_word(wf, pe1) {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    found = Some(we);
                    break;
                }
            }
            pe1.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 11: suffix then two prefixes
    // -----------------------------------------------------------------------

    pub(crate) fn strip_suffix_then_2_prefixes<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        if !self.prefixes.has_continuation_flags() {
            return None;
        }
        for se1 in self.suffixes.matching(word) {
            if !se1.cross_product {
                continue;
            }
            if self.outer_suffix_not_valid(se1, mode) {
                continue;
            }
            if self.strips_whole_word(&se1.appending, word.len()) {
                continue;
            }
            se1.to_root(word);
            let mut res = None;
            if se1.check_condition(word) {
                for pe1 in self.prefixes.matching(word) {
                    if !self.prefixes.has_continuation_flag(pe1.flag) {
                        continue;
                    }
                    if !pe1.cross_product {
                        continue;
                    }
                    if self.prefix_not_valid(pe1, mode) {
                        continue;
                    }
                    if self.is_circumfix(se1) != self.is_circumfix(pe1) {
                        continue;
                    }
                    if self.strips_whole_word(&pe1.appending, word.len()) {
                        continue;
                    }
                    pe1.to_root(word);
                    let inner = if pe1.check_condition(word) {
                        self.strip_sfx_2_pfx_3(se1, pe1, word, skip_hidden_homonym, FullWord)
                    } else {
                        None
                    };
                    pe1.to_derived(word);
                    if inner.is_some() {
                        res = inner;
                        break;
                    }
                }
            }
            se1.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_sfx_2_pfx_3<'a>(
        &'a self,
        se1: &'a Suffix,
        pe1: &'a Prefix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        for pe2 in self.prefixes.matching(word) {
            if !cross_valid_affix(pe2, pe1) {
                continue;
            }
            if self.prefix_not_valid(pe2, mode) {
                continue;
            }
            if self.is_circumfix(pe2) {
                continue;
            }
            if self.strips_whole_word(&pe2.appending, word.len()) {
                continue;
            }
            pe2.to_root(word);
            let mut found = None;
            if pe2.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;
                    if !cross_valid_affix(pe1, se1) && !cross_valid_word(wf, se1) {
                        continue;
                    }
                    if !cross_valid_word(wf, pe2) {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    found = Some(we);
                    break;
                }
            }
            pe2.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 12: prefix + suffix + prefix
    // -----------------------------------------------------------------------

    pub(crate) fn strip_prefix_suffix_prefix<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        if !self.prefixes.has_continuation_flags()
            && !self.suffixes.has_continuation_flags()
        {
            return None;
        }
        for pe1 in self.prefixes.matching(word) {
            if !self.prefixes.has_continuation_flag(pe1.flag)
                && !self.suffixes.has_continuation_flag(pe1.flag)
            {
                continue;
            }
            if !pe1.cross_product {
                continue;
            }
            if self.outer_prefix_not_valid(pe1, mode) {
                continue;
            }
            if self.strips_whole_word(&pe1.appending, word.len()) {
                continue;
            }
            pe1.to_root(word);
            let mut res = None;
            if pe1.check_condition(word) {
                for se1 in self.suffixes.matching(word) {
                    if !se1.cross_product {
                        continue;
                    }
                    if self.suffix_not_valid(se1, mode) {
                        continue;
                    }
                    if self.strips_whole_word(&se1.appending, word.len()) {
                        continue;
                    }
                    se1.to_root(word);
                    let inner = if se1.check_condition(word) {
                        self.strip_p_s_p_3(pe1, se1, word, skip_hidden_homonym, FullWord)
                    } else {
                        None
                    };
                    se1.to_derived(word);
                    if inner.is_some() {
                        res = inner;
                        break;
                    }
                }
            }
            pe1.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_p_s_p_3<'a>(
        &'a self,
        pe1: &'a Prefix,
        se1: &'a Suffix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        for pe2 in self.prefixes.matching(word) {
            if !pe2.cross_product {
                continue;
            }
            if !cross_valid_affix(pe2, pe1) && !cross_valid_affix(se1, pe1) {
                continue;
            }
            if self.prefix_not_valid(pe2, mode) {
                continue;
            }
            let circ1ok = (self.is_circumfix(se1) == self.is_circumfix(pe1))
                && !self.is_circumfix(pe2);
            let circ2ok = (self.is_circumfix(se1) == self.is_circumfix(pe2))
                && !self.is_circumfix(pe1);
            if !circ1ok && !circ2ok {
                continue;
            }
            if self.strips_whole_word(&pe2.appending, word.len()) {
                continue;
            }
            pe2.to_root(word);
            let mut found = None;
            if pe2.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;
                    if !cross_valid_affix(pe2, se1) && !cross_valid_word(wf, se1) {
                        continue;
                    }
                    if !cross_valid_word(wf, pe2) {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    found = Some(we);
                    break;
                }
            }
            pe2.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Primitive 13: two prefixes then suffix (opt-in, not on the check path)
    // -----------------------------------------------------------------------

    pub(crate) fn strip_2_prefixes_then_suffix<'a>(
        &'a self,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        if !self.prefixes.has_continuation_flags()
            && !self.suffixes.has_continuation_flags()
        {
            return None;
        }
        for pe1 in self.prefixes.matching(word) {
            if !self.prefixes.has_continuation_flag(pe1.flag)
                && !self.suffixes.has_continuation_flag(pe1.flag)
            {
                continue;
            }
            if self.outer_prefix_not_valid(pe1, mode) {
                continue;
            }
            if self.is_circumfix(pe1) {
                continue;
            }
            if self.strips_whole_word(&pe1.appending, word.len()) {
                continue;
            }
            pe1.to_root(word);
            let mut res = None;
            if pe1.check_condition(word) {
                for pe2 in self.prefixes.matching(word) {
                    if !pe2.cross_product {
                        continue;
                    }
                    if self.prefix_not_valid(pe2, mode) {
                        continue;
                    }
                    if self.strips_whole_word(&pe2.appending, word.len()) {
                        continue;
                    }
                    pe2.to_root(word);
                    let inner = if pe2.check_condition(word) {
                        self.strip_2_pfx_sfx_3(pe1, pe2, word, skip_hidden_homonym, FullWord)
                    } else {
                        None
                    };
                    pe2.to_derived(word);
                    if inner.is_some() {
                        res = inner;
                        break;
                    }
                }
            }
            pe1.to_derived(word);
            if res.is_some() {
                return res;
            }
        }
        None
    }

    fn strip_2_pfx_sfx_3<'a>(
        &'a self,
        pe1: &'a Prefix,
        pe2: &'a Prefix,
        word: &mut Vec<char>,
        skip_hidden_homonym: bool,
        mode: AffixingMode,
    ) -> Option<WordEntry<'a>> {
        for se1 in self.suffixes.matching(word) {
            if !se1.cross_product {
                continue;
            }
            if !cross_valid_affix(pe2, pe1) && !cross_valid_affix(se1, pe1) {
                continue;
            }
            if self.suffix_not_valid(se1, mode) {
                continue;
            }
            if self.is_circumfix(pe2) != self.is_circumfix(se1) {
                continue;
            }
            if self.strips_whole_word(&se1.appending, word.len()) {
                continue;
            }
            se1.to_root(word);
            let mut found = None;
            if se1.check_condition(word) {
                for we in self.words.homonyms(word) {
                    let wf = we.flags;
                    if !cross_valid_affix(se1, pe2) && !cross_valid_word(wf, pe2) {
                        continue;
                    }
                    if !cross_valid_word(wf, se1) {
                        continue;
                    }
                    if mode == FullWord && wf.contains(self.compound_onlyin_flag) {
                        continue;
                    }
                    if skip_hidden_homonym && wf.contains(HIDDEN_HOMONYM_FLAG) {
                        continue;
                    }
                    found = Some(we);
                    break;
                }
            }
            se1.to_derived(word);
            if found.is_some() {
                return found;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::affix::AffixingMode;
    use crate::parser::parse_dictionary;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn prefix_only_strip() {
        let aff = "\
PFX A Y 1
PFX A 0 un .
";
        let data = parse_dictionary(aff, "1\ntie/A\n").unwrap();
        let mut w = chars("untie");
        let copy = w.clone();
        let res = data.strip_prefix_only(&mut w, false, AffixingMode::FullWord);
        assert!(res.is_some());
        let (entry, pe) = res.unwrap();
        assert_eq!(entry.stem, &chars("tie")[..]);
        assert_eq!(pe.appending, chars("un"));
        assert_eq!(w, copy, "buffer must be restored");
    }

    #[test]
    fn suffix_only_strip_with_condition() {
        let aff = "\
SFX B Y 2
SFX B y ies [^aeiou]y
SFX B 0 s [aeiou]y
";
        let data = parse_dictionary(aff, "2\nbody/B\nday/B\n").unwrap();

        let mut w = chars("bodies");
        let res = data.strip_suffix_only(&mut w, false, AffixingMode::FullWord);
        assert!(res.is_some());
        assert_eq!(w, chars("bodies"));

        let mut w = chars("days");
        assert!(data
            .strip_suffix_only(&mut w, false, AffixingMode::FullWord)
            .is_some());

        // condition blocks the wrong pairing
        let mut w = chars("dayies");
        assert!(data
            .strip_suffix_only(&mut w, false, AffixingMode::FullWord)
            .is_none());
        assert_eq!(w, chars("dayies"));
    }

    #[test]
    fn unknown_affix_flag_is_rejected() {
        let aff = "\
SFX B Y 1
SFX B 0 s .
";
        // stem does not carry flag B
        let data = parse_dictionary(aff, "1\nwork\n").unwrap();
        let mut w = chars("works");
        assert!(data
            .strip_suffix_only(&mut w, false, AffixingMode::FullWord)
            .is_none());
    }

    #[test]
    fn need_affix_blocks_outer_affix() {
        let aff = "\
NEEDAFFIX n
SFX B Y 1
SFX B 0 s/n .
";
        let data = parse_dictionary(aff, "1\nwork/B\n").unwrap();
        let mut w = chars("works");
        assert!(data
            .strip_suffix_only(&mut w, false, AffixingMode::FullWord)
            .is_none());
    }

    #[test]
    fn commutative_prefix_suffix() {
        let aff = "\
PFX A Y 1
PFX A 0 un .
SFX B Y 1
SFX B 0 d .
";
        let data = parse_dictionary(aff, "1\nhouse/AB\n").unwrap();
        let mut w = chars("unhoused");
        let copy = w.clone();
        let res =
            data.strip_prefix_then_suffix_commutative(&mut w, false, AffixingMode::FullWord);
        assert!(res.is_some());
        assert_eq!(w, copy);
    }

    #[test]
    fn commutative_rejects_double_need_affix() {
        let aff = "\
NEEDAFFIX n
PFX A Y 1
PFX A 0 un/n .
SFX B Y 1
SFX B 0 d/n .
";
        let data = parse_dictionary(aff, "1\nhouse/AB\n").unwrap();
        let mut w = chars("unhoused");
        assert!(data
            .strip_prefix_then_suffix_commutative(&mut w, false, AffixingMode::FullWord)
            .is_none());
    }

    #[test]
    fn cross_product_is_required_for_pairing() {
        let aff = "\
PFX A N 1
PFX A 0 un .
SFX B Y 1
SFX B 0 d .
";
        let data = parse_dictionary(aff, "1\nhouse/AB\n").unwrap();
        let mut w = chars("unhoused");
        assert!(data
            .strip_prefix_then_suffix_commutative(&mut w, false, AffixingMode::FullWord)
            .is_none());
    }

    #[test]
    fn circumfix_flags_must_pair() {
        // prefix is marked circumfix, suffix is not: the pair must fail
        let aff = "\
CIRCUMFIX X
PFX A Y 1
PFX A 0 un/X .
SFX B Y 1
SFX B 0 d .
";
        let data = parse_dictionary(aff, "1\nhouse/AB\n").unwrap();
        let mut w = chars("unhoused");
        assert!(data
            .strip_prefix_then_suffix_commutative(&mut w, false, AffixingMode::FullWord)
            .is_none());

        // both marked circumfix: the pair is valid
        let aff = "\
CIRCUMFIX X
PFX A Y 1
PFX A 0 un/X .
SFX B Y 1
SFX B 0 d/X .
";
        let data = parse_dictionary(aff, "1\nhouse/AB\n").unwrap();
        let mut w = chars("unhoused");
        assert!(data
            .strip_prefix_then_suffix_commutative(&mut w, false, AffixingMode::FullWord)
            .is_some());
    }

    #[test]
    fn suffix_then_prefix_strip() {
        let aff = "\
PFX A Y 1
PFX A 0 un .
SFX B Y 1
SFX B 0 ed .
";
        let data = parse_dictionary(aff, "1\nlock/AB\n").unwrap();
        let mut w = chars("unlocked");
        let copy = w.clone();
        let res = data.strip_suffix_then_prefix(&mut w, false, AffixingMode::FullWord);
        assert!(res.is_some());
        let (entry, _, _) = res.unwrap();
        assert_eq!(entry.stem, &chars("lock")[..]);
        assert_eq!(w, copy);
    }

    #[test]
    fn double_suffix_strip_needs_continuation() {
        let aff = "\
SFX X Y 1
SFX X 0 al/Y .
SFX Y Y 1
SFX Y 0 ly .
";
        let data = parse_dictionary(aff, "1\nform/X\n").unwrap();
        let mut w = chars("formally");
        let copy = w.clone();
        assert!(data
            .strip_suffix_then_suffix(&mut w, false, AffixingMode::FullWord)
            .is_some());
        assert_eq!(w, copy);

        // without the continuation flag the chain is invalid
        let aff = "\
SFX X Y 1
SFX X 0 al .
SFX Y Y 1
SFX Y 0 ly .
";
        let data = parse_dictionary(aff, "1\nform/X\n").unwrap();
        let mut w = chars("formally");
        assert!(data
            .strip_suffix_then_suffix(&mut w, false, AffixingMode::FullWord)
            .is_none());
    }

    #[test]
    fn two_suffixes_then_prefix_strip() {
        let aff = "\
PFX P Y 1
PFX P 0 re .
SFX X Y 1
SFX X 0 al/Y .
SFX Y Y 1
SFX Y 0 ly .
";
        let data = parse_dictionary(aff, "1\nform/PX\n").unwrap();
        let mut w = chars("reformally");
        let copy = w.clone();
        let res = data.strip_2_suffixes_then_prefix(&mut w, false, AffixingMode::FullWord);
        assert!(res.is_some());
        assert_eq!(res.unwrap().stem, &chars("form")[..]);
        assert_eq!(w, copy);
    }

    #[test]
    fn two_prefixes_then_suffix_strip() {
        let aff = "\
PFX O Y 1
PFX O 0 over .
PFX I Y 1
PFX I 0 re/O .
SFX S Y 1
SFX S 0 s .
";
        let data = parse_dictionary(aff, "1\nwork/IS\n").unwrap();
        let mut w = chars("overreworks");
        let copy = w.clone();
        let res = data.strip_2_prefixes_then_suffix(&mut w, false, AffixingMode::FullWord);
        assert!(res.is_some());
        assert_eq!(res.unwrap().stem, &chars("work")[..]);
        assert_eq!(w, copy);
    }

    #[test]
    fn full_strip_option_gates_whole_word_stripping() {
        // the suffix appending covers the entire word
        let aff_no = "\
SFX Q Y 1
SFX Q abc xyz .
";
        let data = parse_dictionary(aff_no, "1\nabc/Q\n").unwrap();
        let mut w = chars("xyz");
        assert!(data
            .strip_suffix_only(&mut w, false, AffixingMode::FullWord)
            .is_none());

        let aff_yes = "\
FULLSTRIP
SFX Q Y 1
SFX Q abc xyz .
";
        let data = parse_dictionary(aff_yes, "1\nabc/Q\n").unwrap();
        let mut w = chars("xyz");
        assert!(data
            .strip_suffix_only(&mut w, false, AffixingMode::FullWord)
            .is_some());
        assert_eq!(w, chars("xyz"));
    }

    #[test]
    fn compound_only_in_flag_blocks_full_word_mode() {
        let aff = "\
ONLYINCOMPOUND o
SFX B Y 1
SFX B 0 s/o .
";
        let data = parse_dictionary(aff, "1\nwork/B\n").unwrap();
        let mut w = chars("works");
        assert!(data
            .strip_suffix_only(&mut w, false, AffixingMode::FullWord)
            .is_none());
    }
}
