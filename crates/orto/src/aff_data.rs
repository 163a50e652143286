// The aggregate of everything the affix file and word list define: option
// flags, numeric limits, transformation tables, affix tables and the word
// dictionary. Built once by the parser, then immutable; the check and
// suggest engines are implemented as methods on this type in the
// `checker` and `suggest` modules and never mutate it.

use orto_core::flags::Flag;

use crate::affix::{PrefixTable, SuffixTable};
use crate::phonetic::PhoneticTable;
use crate::tables::{
    BreakTable, CompoundPattern, CompoundRuleTable, ReplacementTable, SimilarityGroup,
    SubstrReplacer,
};
use crate::wordlist::WordList;

/// Parsed dictionary data and options.
///
/// Flag fields are zero when the corresponding directive is absent; a zero
/// flag never matches any flag set, so "unset" needs no separate state.
#[derive(Debug, Default)]
pub struct AffData {
    pub words: WordList,
    pub prefixes: PrefixTable,
    pub suffixes: SuffixTable,

    // general checking options
    pub complex_prefixes: bool,
    pub fullstrip: bool,
    pub checksharps: bool,
    pub forbid_warn: bool,
    pub compound_onlyin_flag: Flag,
    pub circumfix_flag: Flag,
    pub forbiddenword_flag: Flag,
    pub keepcase_flag: Flag,
    pub need_affix_flag: Flag,
    pub warn_flag: Flag,

    // compounding flags and rules
    pub compound_flag: Flag,
    pub compound_begin_flag: Flag,
    pub compound_last_flag: Flag,
    pub compound_middle_flag: Flag,
    pub compound_rules: CompoundRuleTable,

    // word breaking and character-level conversion
    pub break_table: BreakTable,
    pub input_substr_replacer: SubstrReplacer,
    pub output_substr_replacer: SubstrReplacer,
    pub ignored_chars: Vec<char>,

    // suggestion tables
    pub replacements: ReplacementTable,
    pub similarities: Vec<SimilarityGroup>,
    pub keyboard_closeness: Vec<char>,
    pub try_chars: Vec<char>,
    pub phonetic_table: PhoneticTable,

    // suggestion options
    pub nosuggest_flag: Flag,
    pub substandard_flag: Flag,
    pub max_compound_suggestions: u16,
    pub max_ngram_suggestions: u16,
    pub max_diff_factor: u16,
    pub only_max_diff: bool,
    pub no_split_suggestions: bool,
    pub suggest_with_dots: bool,

    // compounding numerics and toggles
    pub compound_min_length: u16,
    pub compound_max_word_count: u16,
    pub compound_permit_flag: Flag,
    pub compound_forbid_flag: Flag,
    pub compound_root_flag: Flag,
    pub compound_force_uppercase_flag: Flag,
    pub compound_more_suffixes: bool,
    pub compound_check_duplicate: bool,
    pub compound_check_rep: bool,
    pub compound_check_case: bool,
    pub compound_check_triple: bool,
    pub compound_simplified_triple: bool,
    pub compound_syllable_num: bool,
    pub compound_syllable_max: u16,
    pub compound_syllable_vowels: Vec<char>,
    pub compound_patterns: Vec<CompoundPattern>,
}

impl AffData {
    /// The split-point minimum used by the compound splitters: the
    /// configured minimum, or 3 when none was configured.
    pub(crate) fn compound_min(&self) -> usize {
        if self.compound_min_length == 0 {
            3
        } else {
            self.compound_min_length as usize
        }
    }

    /// Number of syllable vowels in the word (Hungarian compound
    /// accounting).
    pub(crate) fn count_syllables(&self, word: &[char]) -> usize {
        word.iter()
            .filter(|c| self.compound_syllable_vowels.contains(c))
            .count()
    }
}
