// Line-oriented parser for the affix (.aff) and word-list (.dic) file
// formats, filling an `AffData`.
//
// The affix file is a sequence of whitespace-separated directives, `#`
// starting a comment line. Table directives (REP, MAP, BREAK, ICONV,
// OCONV, PHONE, AF, COMPOUNDRULE, CHECKCOMPOUNDPATTERN) announce an entry
// count and are followed by that many entry lines; affix groups (PFX/SFX)
// carry their own header with flag, cross-product marker and count.
//
// Input is UTF-8. Structural problems abort the load with a `ParseError`;
// recoverable oddities (extra table entries, repeated settings) are
// logged and skipped.

use orto_core::casing::{classify_casing, to_title_word, Casing};
use orto_core::condition::{Condition, ConditionError};
use orto_core::flags::{Flag, FlagSet, HIDDEN_HOMONYM_FLAG};
use thiserror::Error;
use tracing::{debug, warn};

use crate::affix::{Prefix, PrefixTable, Suffix, SuffixTable};
use crate::aff_data::AffData;
use crate::phonetic::PhoneticTable;
use crate::tables::{
    BreakTable, CompoundPattern, CompoundRule, CompoundRuleTable, ReplacementTable,
    RuleQuantifier, SimilarityGroup, SubstrReplacer,
};

/// Fatal problems while loading the dictionary pair.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: unsupported encoding {name:?} (only UTF-8 input is supported)")]
    UnsupportedEncoding { line: usize, name: String },
    #[error("line {line}: unknown flag type {name:?}")]
    UnknownFlagType { line: usize, name: String },
    #[error("line {line}: invalid flags {value:?}")]
    InvalidFlags { line: usize, value: String },
    #[error("line {line}: invalid compound rule {value:?}")]
    InvalidCompoundRule { line: usize, value: String },
    #[error("line {line}: invalid affix condition: {source}")]
    InvalidCondition {
        line: usize,
        source: ConditionError,
    },
    #[error("line {line}: malformed {directive} line")]
    MalformedDirective { line: usize, directive: String },
    #[error("word list is missing its entry-count header")]
    MissingWordCount,
}

/// How flag fields are encoded in this dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FlagType {
    /// One character per flag.
    #[default]
    Single,
    /// Two characters per flag ("long" flags).
    Double,
    /// Decimal numbers separated by commas.
    Number,
    /// One (possibly non-ASCII) character per flag.
    Utf8,
}

/// Parse an affix file and a word list into engine data.
pub(crate) fn parse_dictionary(aff: &str, dic: &str) -> Result<AffData, ParseError> {
    let mut parser = Parser::default();
    parser.parse_aff(aff)?;
    parser.parse_dic(dic)?;
    Ok(parser.finish())
}

#[derive(Default)]
struct Parser {
    data: AffData,
    flag_type: FlagType,
    flag_aliases: Vec<FlagSet>,

    prefixes: Vec<Prefix>,
    suffixes: Vec<Suffix>,
    break_patterns: Vec<Vec<char>>,
    break_seen: bool,
    input_conversion: Vec<(Vec<char>, Vec<char>)>,
    output_conversion: Vec<(Vec<char>, Vec<char>)>,
    replacements: Vec<(Vec<char>, Vec<char>)>,
    phonetic_rules: Vec<(Vec<char>, Vec<char>)>,
    similarities: Vec<SimilarityGroup>,
    compound_rules: Vec<CompoundRule>,
    compound_patterns: Vec<CompoundPattern>,

    // remaining entry counts for the counted table directives
    table_counts: hashbrown::HashMap<String, usize>,
    // per-affix-group cross product and remaining entry count
    affix_groups: hashbrown::HashMap<(char, Flag), (bool, usize)>,
}

impl Parser {
    // -------------------------------------------------------------------
    // .aff
    // -------------------------------------------------------------------

    fn parse_aff(&mut self, text: &str) -> Result<(), ParseError> {
        for (idx, raw_line) in text.lines().enumerate() {
            let line_num = idx + 1;
            let line = raw_line.strip_prefix('\u{FEFF}').unwrap_or(raw_line);
            let mut tokens = line.split_whitespace();
            let Some(first) = tokens.next() else {
                continue;
            };
            if first.starts_with('#') {
                continue;
            }
            let command = first.to_ascii_uppercase();
            let rest: Vec<&str> = tokens.collect();
            self.parse_aff_directive(&command, &rest, line_num)?;
        }
        Ok(())
    }

    fn parse_aff_directive(
        &mut self,
        command: &str,
        args: &[&str],
        line: usize,
    ) -> Result<(), ParseError> {
        match command {
            "PFX" | "SFX" => self.parse_affix_line(command, args, line),
            "TRY" => {
                set_chars_once(&mut self.data.try_chars, args, command, line);
                Ok(())
            }
            "KEY" => {
                set_chars_once(&mut self.data.keyboard_closeness, args, command, line);
                Ok(())
            }
            "IGNORE" => {
                set_chars_once(&mut self.data.ignored_chars, args, command, line);
                Ok(())
            }
            "WORDCHARS" => {
                // accepted for compatibility; tokenization is out of scope
                debug!(line, "ignoring WORDCHARS");
                Ok(())
            }
            "LANG" => {
                debug!(line, lang = args.first().copied().unwrap_or(""), "ignoring LANG");
                Ok(())
            }
            "COMPLEXPREFIXES" => set_bool(&mut self.data.complex_prefixes),
            "FULLSTRIP" => set_bool(&mut self.data.fullstrip),
            "CHECKSHARPS" => set_bool(&mut self.data.checksharps),
            "FORBIDWARN" => set_bool(&mut self.data.forbid_warn),
            "ONLYMAXDIFF" => set_bool(&mut self.data.only_max_diff),
            "NOSPLITSUGS" => set_bool(&mut self.data.no_split_suggestions),
            "SUGSWITHDOTS" => set_bool(&mut self.data.suggest_with_dots),
            "COMPOUNDMORESUFFIXES" => set_bool(&mut self.data.compound_more_suffixes),
            "CHECKCOMPOUNDDUP" => set_bool(&mut self.data.compound_check_duplicate),
            "CHECKCOMPOUNDREP" => set_bool(&mut self.data.compound_check_rep),
            "CHECKCOMPOUNDCASE" => set_bool(&mut self.data.compound_check_case),
            "CHECKCOMPOUNDTRIPLE" => set_bool(&mut self.data.compound_check_triple),
            "SIMPLIFIEDTRIPLE" => set_bool(&mut self.data.compound_simplified_triple),
            "SYLLABLENUM" => set_bool(&mut self.data.compound_syllable_num),
            "COMPOUNDMIN" => {
                self.data.compound_min_length = parse_number(args, command, line)?;
                if self.data.compound_min_length == 0 {
                    self.data.compound_min_length = 1;
                }
                Ok(())
            }
            "COMPOUNDWORDMAX" => {
                self.data.compound_max_word_count = parse_number(args, command, line)?;
                Ok(())
            }
            "MAXCPDSUGS" => {
                self.data.max_compound_suggestions = parse_number(args, command, line)?;
                Ok(())
            }
            "MAXNGRAMSUGS" => {
                self.data.max_ngram_suggestions = parse_number(args, command, line)?;
                Ok(())
            }
            "MAXDIFF" => {
                self.data.max_diff_factor = parse_number(args, command, line)?;
                Ok(())
            }
            "NOSUGGEST" => self.parse_flag_directive(args, line, |d, f| d.nosuggest_flag = f),
            "WARN" => self.parse_flag_directive(args, line, |d, f| d.warn_flag = f),
            "SUBSTANDARD" => {
                self.parse_flag_directive(args, line, |d, f| d.substandard_flag = f)
            }
            "COMPOUNDFLAG" => {
                self.parse_flag_directive(args, line, |d, f| d.compound_flag = f)
            }
            "COMPOUNDBEGIN" => {
                self.parse_flag_directive(args, line, |d, f| d.compound_begin_flag = f)
            }
            "COMPOUNDEND" => {
                self.parse_flag_directive(args, line, |d, f| d.compound_last_flag = f)
            }
            "COMPOUNDMIDDLE" => {
                self.parse_flag_directive(args, line, |d, f| d.compound_middle_flag = f)
            }
            "ONLYINCOMPOUND" => {
                self.parse_flag_directive(args, line, |d, f| d.compound_onlyin_flag = f)
            }
            "COMPOUNDPERMITFLAG" => {
                self.parse_flag_directive(args, line, |d, f| d.compound_permit_flag = f)
            }
            "COMPOUNDFORBIDFLAG" => {
                self.parse_flag_directive(args, line, |d, f| d.compound_forbid_flag = f)
            }
            "COMPOUNDROOT" => {
                self.parse_flag_directive(args, line, |d, f| d.compound_root_flag = f)
            }
            "FORCEUCASE" => self
                .parse_flag_directive(args, line, |d, f| d.compound_force_uppercase_flag = f),
            "CIRCUMFIX" => self.parse_flag_directive(args, line, |d, f| d.circumfix_flag = f),
            "FORBIDDENWORD" => {
                self.parse_flag_directive(args, line, |d, f| d.forbiddenword_flag = f)
            }
            "KEEPCASE" => self.parse_flag_directive(args, line, |d, f| d.keepcase_flag = f),
            "NEEDAFFIX" => self.parse_flag_directive(args, line, |d, f| d.need_affix_flag = f),
            "SET" => {
                let name = args.first().copied().unwrap_or("");
                let normalized = name.to_ascii_uppercase().replace('-', "");
                if normalized == "UTF8" || name.is_empty() {
                    Ok(())
                } else {
                    Err(ParseError::UnsupportedEncoding {
                        line,
                        name: name.to_string(),
                    })
                }
            }
            "FLAG" => {
                let name = args.first().copied().unwrap_or("");
                self.flag_type = match name.to_ascii_uppercase().as_str() {
                    "LONG" => FlagType::Double,
                    "NUM" => FlagType::Number,
                    "UTF-8" => FlagType::Utf8,
                    _ => {
                        return Err(ParseError::UnknownFlagType {
                            line,
                            name: name.to_string(),
                        })
                    }
                };
                Ok(())
            }
            "AF" => self.parse_counted(command, args, line, |p, args, line| {
                let value = args.first().copied().unwrap_or("");
                let flags = p.decode_flags(value, line)?;
                p.flag_aliases.push(FlagSet::from_flags(flags));
                Ok(())
            }),
            "AM" => {
                // morphological aliases carry data we do not keep
                Ok(())
            }
            "MAP" => self.parse_counted(command, args, line, |p, args, line| {
                let value =
                    args.first()
                        .copied()
                        .ok_or_else(|| ParseError::MalformedDirective {
                            line,
                            directive: "MAP".into(),
                        })?;
                p.similarities.push(SimilarityGroup::parse(value));
                Ok(())
            }),
            "REP" => self.parse_counted(command, args, line, |p, args, line| {
                let (from, to) = parse_pair(args, "REP", line)?;
                // underscores encode spaces in replacement text
                let to = to.iter().map(|&c| if c == '_' { ' ' } else { c }).collect();
                p.replacements.push((from, to));
                Ok(())
            }),
            "PHONE" => self.parse_counted(command, args, line, |p, args, line| {
                let (from, to) = parse_pair(args, "PHONE", line)?;
                p.phonetic_rules.push((from, to));
                Ok(())
            }),
            "ICONV" => self.parse_counted(command, args, line, |p, args, line| {
                let pair = parse_pair(args, "ICONV", line)?;
                p.input_conversion.push(pair);
                Ok(())
            }),
            "OCONV" => self.parse_counted(command, args, line, |p, args, line| {
                let pair = parse_pair(args, "OCONV", line)?;
                p.output_conversion.push(pair);
                Ok(())
            }),
            "BREAK" => {
                self.break_seen = true;
                self.parse_counted(command, args, line, |p, args, line| {
                    let value =
                        args.first()
                            .copied()
                            .ok_or_else(|| ParseError::MalformedDirective {
                                line,
                                directive: "BREAK".into(),
                            })?;
                    p.break_patterns.push(value.chars().collect());
                    Ok(())
                })
            }
            "COMPOUNDRULE" => self.parse_counted(command, args, line, |p, args, line| {
                let value = args.first().copied().unwrap_or("");
                let rule = p.decode_compound_rule(value, line)?;
                p.compound_rules.push(rule);
                Ok(())
            }),
            "CHECKCOMPOUNDPATTERN" => self.parse_counted(command, args, line, |p, args, line| {
                let pattern = p.parse_compound_pattern(args, line)?;
                p.compound_patterns.push(pattern);
                Ok(())
            }),
            "COMPOUNDSYLLABLE" => {
                if args.len() < 2 {
                    return Err(ParseError::MalformedDirective {
                        line,
                        directive: "COMPOUNDSYLLABLE".into(),
                    });
                }
                self.data.compound_syllable_max =
                    args[0]
                        .parse()
                        .map_err(|_| ParseError::MalformedDirective {
                            line,
                            directive: "COMPOUNDSYLLABLE".into(),
                        })?;
                self.data.compound_syllable_vowels = args[1].chars().collect();
                Ok(())
            }
            _ => {
                // unknown directives are comments in practice
                Ok(())
            }
        }
    }

    /// Counted table directives: the first line announces the entry
    /// count, later lines each add one entry via `each`.
    fn parse_counted(
        &mut self,
        command: &str,
        args: &[&str],
        line: usize,
        each: impl FnOnce(&mut Self, &[&str], usize) -> Result<(), ParseError>,
    ) -> Result<(), ParseError> {
        if !self.table_counts.contains_key(command) {
            let count: usize = args
                .first()
                .and_then(|a| a.parse().ok())
                .ok_or_else(|| ParseError::MalformedDirective {
                    line,
                    directive: command.to_string(),
                })?;
            self.table_counts.insert(command.to_string(), count);
            return Ok(());
        }
        let remaining = self.table_counts.get_mut(command).unwrap();
        if *remaining == 0 {
            warn!(line, command, "extra table entry, ignoring");
            return Ok(());
        }
        *remaining -= 1;
        each(self, args, line)
    }

    /// PFX/SFX header and entry lines.
    fn parse_affix_line(
        &mut self,
        command: &str,
        args: &[&str],
        line: usize,
    ) -> Result<(), ParseError> {
        let kind = if command == "PFX" { 'P' } else { 'S' };
        let flag_str = args
            .first()
            .copied()
            .ok_or_else(|| ParseError::MalformedDirective {
                line,
                directive: command.to_string(),
            })?;
        let flag = self.decode_single_flag(flag_str, line)?;

        if !self.affix_groups.contains_key(&(kind, flag)) {
            // header: PFX flag Y/N count
            let cross = match args.get(1).copied() {
                Some("Y") => true,
                Some("N") => false,
                _ => {
                    return Err(ParseError::MalformedDirective {
                        line,
                        directive: command.to_string(),
                    })
                }
            };
            let count: usize = args
                .get(2)
                .and_then(|a| a.parse().ok())
                .ok_or_else(|| ParseError::MalformedDirective {
                    line,
                    directive: command.to_string(),
                })?;
            self.affix_groups.insert((kind, flag), (cross, count));
            return Ok(());
        }

        let group = self.affix_groups.get_mut(&(kind, flag)).unwrap();
        let cross = group.0;
        if group.1 == 0 {
            warn!(line, command, "extra affix entry, ignoring");
            return Ok(());
        }
        group.1 -= 1;

        let malformed = || ParseError::MalformedDirective {
            line,
            directive: command.to_string(),
        };
        let stripping = args.get(1).copied().ok_or_else(malformed)?;
        let appending_field = args.get(2).copied().ok_or_else(malformed)?;

        let stripping: Vec<char> = if stripping == "0" {
            Vec::new()
        } else {
            stripping.chars().collect()
        };

        let (appending_str, cont_str) = match appending_field.split_once('/') {
            Some((a, f)) => (a, Some(f)),
            None => (appending_field, None),
        };
        let appending: Vec<char> = if appending_str == "0" {
            Vec::new()
        } else {
            appending_str.chars().collect()
        };
        let cont_flags = match cont_str {
            Some(f) => FlagSet::from_flags(self.decode_flags_possible_alias(f, line)?),
            None => FlagSet::new(),
        };

        let condition_str = args.get(3).copied().unwrap_or(".");
        let condition = Condition::new(condition_str)
            .map_err(|source| ParseError::InvalidCondition { line, source })?;

        if kind == 'P' {
            self.prefixes.push(Prefix {
                flag,
                cross_product: cross,
                stripping,
                appending,
                cont_flags,
                condition,
            });
        } else {
            self.suffixes.push(Suffix {
                flag,
                cross_product: cross,
                stripping,
                appending,
                cont_flags,
                condition,
            });
        }
        Ok(())
    }

    fn parse_compound_pattern(
        &mut self,
        args: &[&str],
        line: usize,
    ) -> Result<CompoundPattern, ParseError> {
        let malformed = || ParseError::MalformedDirective {
            line,
            directive: "CHECKCOMPOUNDPATTERN".into(),
        };
        let first = args.first().copied().ok_or_else(malformed)?;
        let second = args.get(1).copied().ok_or_else(malformed)?;

        let (end_str, first_flag_str) = match first.split_once('/') {
            Some((a, f)) => (a, Some(f)),
            None => (first, None),
        };
        let (begin_str, second_flag_str) = match second.split_once('/') {
            Some((a, f)) => (a, Some(f)),
            None => (second, None),
        };

        let mut pattern = CompoundPattern {
            first_word_flag: match first_flag_str {
                Some(f) => self.decode_single_flag(f, line)?,
                None => 0,
            },
            second_word_flag: match second_flag_str {
                Some(f) => self.decode_single_flag(f, line)?,
                None => 0,
            },
            ..CompoundPattern::default()
        };
        if end_str == "0" {
            pattern.match_first_only_unaffixed_or_zero_affixed = true;
        } else {
            pattern.end_chars = end_str.chars().collect();
        }
        pattern.begin_chars = begin_str.chars().collect();
        pattern.replacement = args.get(2).map(|r| r.chars().collect()).unwrap_or_default();
        Ok(pattern)
    }

    // -------------------------------------------------------------------
    // flag decoding
    // -------------------------------------------------------------------

    /// Directives of the shape `NAME <flag>`.
    fn parse_flag_directive(
        &mut self,
        args: &[&str],
        line: usize,
        set: impl FnOnce(&mut AffData, Flag),
    ) -> Result<(), ParseError> {
        let value = args.first().copied().ok_or_else(|| ParseError::InvalidFlags {
            line,
            value: String::new(),
        })?;
        let flag = self.decode_single_flag(value, line)?;
        set(&mut self.data, flag);
        Ok(())
    }

    fn decode_flags(&self, s: &str, line: usize) -> Result<Vec<Flag>, ParseError> {
        let invalid = || ParseError::InvalidFlags {
            line,
            value: s.to_string(),
        };
        match self.flag_type {
            FlagType::Single | FlagType::Utf8 => s
                .chars()
                .map(|c| {
                    let v = c as u32;
                    if v == 0 || v > 0xFFFF {
                        Err(invalid())
                    } else {
                        Ok(v as Flag)
                    }
                })
                .collect(),
            FlagType::Double => {
                let chars: Vec<char> = s.chars().collect();
                if chars.is_empty() || chars.len() % 2 != 0 {
                    return Err(invalid());
                }
                chars
                    .chunks(2)
                    .map(|pair| {
                        let (a, b) = (pair[0] as u32, pair[1] as u32);
                        if a > 0xFF || b > 0xFF {
                            return Err(invalid());
                        }
                        Ok(((a << 8) | b) as Flag)
                    })
                    .collect()
            }
            FlagType::Number => s
                .split(',')
                .map(|n| {
                    let v: u32 = n.trim().parse().map_err(|_| invalid())?;
                    if v == 0 || v > 0xFFFF {
                        Err(invalid())
                    } else {
                        Ok(v as Flag)
                    }
                })
                .collect(),
        }
    }

    /// Flags in a word-list entry may be an alias index when aliases are
    /// defined.
    fn decode_flags_possible_alias(
        &self,
        s: &str,
        line: usize,
    ) -> Result<Vec<Flag>, ParseError> {
        if !self.flag_aliases.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let idx: usize = s.parse().map_err(|_| ParseError::InvalidFlags {
                line,
                value: s.to_string(),
            })?;
            // alias references are one-based
            return match idx.checked_sub(1).and_then(|i| self.flag_aliases.get(i)) {
                Some(set) => Ok(set.iter().collect()),
                None => Err(ParseError::InvalidFlags {
                    line,
                    value: s.to_string(),
                }),
            };
        }
        self.decode_flags(s, line)
    }

    fn decode_single_flag(&self, s: &str, line: usize) -> Result<Flag, ParseError> {
        self.decode_flags(s, line)?
            .first()
            .copied()
            .ok_or_else(|| ParseError::InvalidFlags {
                line,
                value: s.to_string(),
            })
    }

    /// Compound rules use parenthesized groups for long and numeric
    /// flags; `?` and `*` quantify the preceding flag.
    fn decode_compound_rule(&self, s: &str, line: usize) -> Result<CompoundRule, ParseError> {
        let invalid = || ParseError::InvalidCompoundRule {
            line,
            value: s.to_string(),
        };
        if s.is_empty() {
            return Err(invalid());
        }
        let mut rule = CompoundRule::new();
        let chars: Vec<char> = s.chars().collect();
        let mut i = 0usize;
        while i < chars.len() {
            let flag = match self.flag_type {
                FlagType::Single | FlagType::Utf8 => {
                    let c = chars[i];
                    i += 1;
                    if matches!(c, '?' | '*') || c as u32 > 0xFFFF {
                        return Err(invalid());
                    }
                    c as Flag
                }
                FlagType::Double | FlagType::Number => {
                    if chars[i] != '(' {
                        return Err(invalid());
                    }
                    let close = chars[i..].iter().position(|&c| c == ')').ok_or_else(invalid)?;
                    let inner: String = chars[i + 1..i + close].iter().collect();
                    i += close + 1;
                    *self.decode_flags(&inner, line)?.first().ok_or_else(invalid)?
                }
            };
            let quantifier = match chars.get(i) {
                Some('?') => {
                    i += 1;
                    RuleQuantifier::ZeroOrOne
                }
                Some('*') => {
                    i += 1;
                    RuleQuantifier::ZeroOrMore
                }
                _ => RuleQuantifier::One,
            };
            rule.push((flag, quantifier));
        }
        Ok(rule)
    }

    // -------------------------------------------------------------------
    // .dic
    // -------------------------------------------------------------------

    fn parse_dic(&mut self, text: &str) -> Result<(), ParseError> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        let mut lines = text.lines();

        let count: usize = lines
            .next()
            .and_then(|l| l.split_whitespace().next())
            .and_then(|t| t.parse().ok())
            .ok_or(ParseError::MissingWordCount)?;
        self.data.words = crate::wordlist::WordList::with_capacity(count);

        for (idx, line) in lines.enumerate() {
            let line_num = idx + 2;
            if line.trim().is_empty() {
                continue;
            }
            self.parse_dic_line(line, line_num)?;
        }
        debug!(entries = self.data.words.len(), "word list loaded");
        Ok(())
    }

    fn parse_dic_line(&mut self, line: &str, line_num: usize) -> Result<(), ParseError> {
        // unescape \/ and find the flags separator
        let mut text = line.trim_end().to_string();
        let mut slash_pos: Option<usize> = None;
        let mut search_from = 0usize;
        while let Some(rel) = text[search_from..].find('/') {
            let pos = search_from + rel;
            if pos == 0 {
                break;
            }
            if text.as_bytes()[pos - 1] == b'\\' {
                text.remove(pos - 1);
                search_from = pos;
                continue;
            }
            slash_pos = Some(pos);
            break;
        }

        let (word_str, flags) = if let Some(pos) = slash_pos {
            let after = &text[pos + 1..];
            let end = after
                .find(|c: char| c.is_whitespace())
                .unwrap_or(after.len());
            let flags_str = &after[..end];
            let flags = self.decode_flags_possible_alias(flags_str, line_num)?;
            (text[..pos].to_string(), FlagSet::from_flags(flags))
        } else if let Some(tab) = text.find('\t') {
            (text[..tab].to_string(), FlagSet::new())
        } else {
            let end = find_morph_fields(&text).unwrap_or(text.len());
            (text[..end].to_string(), FlagSet::new())
        };

        if word_str.is_empty() {
            return Ok(());
        }

        let mut word: Vec<char> = word_str.chars().collect();
        orto_core::character::erase_chars(&mut word, &self.data.ignored_chars);
        if word.is_empty() {
            return Ok(());
        }

        let casing = classify_casing(&word);
        let forbidden = flags.contains(self.data.forbiddenword_flag);
        let insert_hidden = match casing {
            Casing::AllCapital => !flags.is_empty() && !forbidden,
            Casing::Pascal | Casing::Camel => !forbidden,
            _ => false,
        };

        if insert_hidden {
            let title = to_title_word(&word);
            let mut hidden_flags = flags.clone();
            hidden_flags.insert(HIDDEN_HOMONYM_FLAG);
            self.data.words.insert(word, flags);
            self.data.words.insert(title, hidden_flags);
        } else {
            self.data.words.insert(word, flags);
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // final table construction
    // -------------------------------------------------------------------

    fn finish(mut self) -> AffData {
        if !self.break_seen {
            self.break_patterns = vec![
                vec!['-'],
                vec!['^', '-'],
                vec!['-', '$'],
            ];
        }
        for p in &mut self.prefixes {
            orto_core::character::erase_chars(&mut p.appending, &self.data.ignored_chars);
        }
        for s in &mut self.suffixes {
            orto_core::character::erase_chars(&mut s.appending, &self.data.ignored_chars);
        }

        let mut data = self.data;
        data.prefixes = PrefixTable::new(self.prefixes);
        data.suffixes = SuffixTable::new(self.suffixes);
        data.break_table = BreakTable::new(self.break_patterns);
        data.input_substr_replacer = SubstrReplacer::new(self.input_conversion);
        data.output_substr_replacer = SubstrReplacer::new(self.output_conversion);
        data.replacements = ReplacementTable::new(self.replacements);
        data.phonetic_table = PhoneticTable::new(self.phonetic_rules);
        data.similarities = self.similarities;
        data.compound_rules = CompoundRuleTable::new(self.compound_rules);
        data.compound_patterns = self.compound_patterns;
        data
    }
}

fn set_bool(target: &mut bool) -> Result<(), ParseError> {
    *target = true;
    Ok(())
}

fn set_chars_once(target: &mut Vec<char>, args: &[&str], command: &str, line: usize) {
    if !target.is_empty() {
        warn!(line, command, "setting repeated, ignoring");
        return;
    }
    if let Some(value) = args.first() {
        *target = value.chars().collect();
    }
}

fn parse_number(args: &[&str], command: &str, line: usize) -> Result<u16, ParseError> {
    args.first()
        .and_then(|a| a.parse().ok())
        .ok_or_else(|| ParseError::MalformedDirective {
            line,
            directive: command.to_string(),
        })
}

fn parse_pair(
    args: &[&str],
    command: &str,
    line: usize,
) -> Result<(Vec<char>, Vec<char>), ParseError> {
    let malformed = || ParseError::MalformedDirective {
        line,
        directive: command.to_string(),
    };
    let a = args.first().ok_or_else(malformed)?;
    let b = args.get(1).ok_or_else(malformed)?;
    Ok((a.chars().collect(), b.chars().collect()))
}

/// Find the start of trailing morphological fields: a space followed by
/// a two-letter lowercase tag and a colon.
fn find_morph_fields(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    if bytes.len() < 4 {
        return None;
    }
    let mut i = 0usize;
    while let Some(rel) = line[i..].find(' ') {
        let sp = i + rel;
        let rest = &bytes[sp..];
        let field_start = rest.iter().position(|&b| b != b' ')?;
        let f = &rest[field_start..];
        if f.len() < 3 {
            return None;
        }
        if f[0].is_ascii_lowercase() && f[1].is_ascii_lowercase() && f[2] == b':' {
            return Some(sp);
        }
        i = sp + field_start;
    }
    None
}
