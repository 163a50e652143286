// The suggestion engine: a fixed sequence of heuristics that mutate the
// rejected word, re-run the membership check on each candidate and
// restore the buffer afterwards. Results keep the order in which the
// heuristics produced them; deduplication is a linear scan because the
// lists stay short.

use orto_core::casing::Casing;
use orto_core::character::{simple_lower, simple_upper};

use crate::aff_data::AffData;
use crate::checker::find_subslice;

impl AffData {
    /// Run every heuristic in order, appending accepted candidates to
    /// `out`.
    pub(crate) fn suggest_priv(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        self.uppercase_suggest(word, out);
        self.rep_suggest(word, out);
        self.map_suggest(word, out, 0);
        self.adjacent_swap_suggest(word, out);
        self.distant_swap_suggest(word, out);
        self.keyboard_suggest(word, out);
        self.extra_char_suggest(word, out);
        self.forgotten_char_suggest(word, out);
        self.move_char_suggest(word, out);
        self.bad_char_suggest(word, out);
        self.doubled_two_chars_suggest(word, out);
        if !self.no_split_suggestions {
            self.two_words_suggest(word, out);
        }
        self.phonetic_suggest(word, out);
    }

    /// Validate one candidate and append it unless it is already present,
    /// is forbidden, is marked warn while warnings are forbidden, or is
    /// marked no-suggest.
    fn add_sug_if_correct(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) -> bool {
        if out.iter().any(|o| o == word) {
            return true;
        }
        let Some(res) = self.check_word(word, Casing::Small, false) else {
            return false;
        };
        if res.contains(self.forbiddenword_flag) {
            return false;
        }
        if self.forbid_warn && res.contains(self.warn_flag) {
            return false;
        }
        if res.contains(self.nosuggest_flag) {
            return false;
        }
        out.push(word.clone());
        true
    }

    /// Try the fully upper-cased word.
    fn uppercase_suggest(&self, word: &[char], out: &mut Vec<Vec<char>>) {
        let mut upper: Vec<char> = word.iter().map(|&c| simple_upper(c)).collect();
        self.add_sug_if_correct(&mut upper, out);
    }

    /// Apply each replacement-table entry in its anchored position.
    fn rep_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        for (from, to) in self.replacements.whole_word_replacements() {
            if word == from {
                let mut cand = to.clone();
                self.try_rep_suggestion(&mut cand, out);
            }
        }
        for (from, to) in self.replacements.start_word_replacements() {
            if word.len() >= from.len() && word[..from.len()] == from[..] {
                word.splice(..from.len(), to.iter().copied());
                self.try_rep_suggestion(word, out);
                word.splice(..to.len(), from.iter().copied());
            }
        }
        for (from, to) in self.replacements.end_word_replacements() {
            if word.len() >= from.len() && word[word.len() - from.len()..] == from[..] {
                let pos = word.len() - from.len();
                word.splice(pos.., to.iter().copied());
                self.try_rep_suggestion(word, out);
                let pos2 = word.len() - to.len();
                word.splice(pos2.., from.iter().copied());
            }
        }
        for (from, to) in self.replacements.any_place_replacements() {
            let mut start = 0usize;
            while let Some(rel) = find_subslice(&word[start..], from) {
                let i = start + rel;
                word.splice(i..i + from.len(), to.iter().copied());
                self.try_rep_suggestion(word, out);
                word.splice(i..i + to.len(), from.iter().copied());
                start = i + 1;
            }
        }
    }

    /// Accept the replaced form directly, or as several words when the
    /// replacement introduced spaces and every part checks on its own.
    fn try_rep_suggestion(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        if self.add_sug_if_correct(word, out) {
            return;
        }
        if !word.contains(&' ') {
            return;
        }
        for part in word.split(|&c| c == ' ') {
            let mut part = part.to_vec();
            if self.check_word(&mut part, Casing::Small, false).is_none() {
                return;
            }
        }
        out.push(word.clone());
    }

    /// Is the word one replacement away from something the simple check
    /// accepts? Used by the compound checker to veto near-typo compounds.
    pub(crate) fn is_rep_similar(&self, word: &mut Vec<char>) -> bool {
        for (from, to) in self.replacements.whole_word_replacements() {
            if word == from {
                let mut cand = to.clone();
                if self.check_simple_word(&mut cand, false).is_some() {
                    return true;
                }
            }
        }
        for (from, to) in self.replacements.start_word_replacements() {
            if word.len() >= from.len() && word[..from.len()] == from[..] {
                word.splice(..from.len(), to.iter().copied());
                let ret = self.check_simple_word(word, false).is_some();
                word.splice(..to.len(), from.iter().copied());
                if ret {
                    return true;
                }
            }
        }
        for (from, to) in self.replacements.end_word_replacements() {
            if word.len() >= from.len() && word[word.len() - from.len()..] == from[..] {
                let pos = word.len() - from.len();
                word.splice(pos.., to.iter().copied());
                let ret = self.check_simple_word(word, false).is_some();
                let pos2 = word.len() - to.len();
                word.splice(pos2.., from.iter().copied());
                if ret {
                    return true;
                }
            }
        }
        for (from, to) in self.replacements.any_place_replacements() {
            let mut start = 0usize;
            while let Some(rel) = find_subslice(&word[start..], from) {
                let i = start + rel;
                word.splice(i..i + from.len(), to.iter().copied());
                let ret = self.check_simple_word(word, false).is_some();
                word.splice(i..i + to.len(), from.iter().copied());
                if ret {
                    return true;
                }
                start = i + 1;
            }
        }
        false
    }

    /// Substitute similarity-group members for each other, recursing over
    /// the remaining positions so several substitutions can combine.
    fn map_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>, from: usize) {
        let mut i = from;
        while i < word.len() {
            for e in &self.similarities {
                if let Some(j) = e.chars.iter().position(|&c| c == word[i]) {
                    let orig = e.chars[j];
                    for &c in &e.chars {
                        if c == orig {
                            continue;
                        }
                        word[i] = c;
                        self.add_sug_if_correct(word, out);
                        self.map_suggest(word, out, i + 1);
                        word[i] = orig;
                    }
                    for r in &e.strings {
                        word.splice(i..i + 1, r.iter().copied());
                        self.add_sug_if_correct(word, out);
                        self.map_suggest(word, out, i + r.len());
                        word.splice(i..i + r.len(), [orig]);
                    }
                }
                for fi in 0..e.strings.len() {
                    let f_len = e.strings[fi].len();
                    if word.len() - i < f_len || word[i..i + f_len] != e.strings[fi][..] {
                        continue;
                    }
                    for ci in 0..e.chars.len() {
                        let c = e.chars[ci];
                        word.splice(i..i + f_len, [c]);
                        self.add_sug_if_correct(word, out);
                        self.map_suggest(word, out, i + 1);
                        let f = e.strings[fi].clone();
                        word.splice(i..i + 1, f);
                    }
                    for ri in 0..e.strings.len() {
                        if ri == fi {
                            continue;
                        }
                        let r = e.strings[ri].clone();
                        let r_len = r.len();
                        word.splice(i..i + f_len, r);
                        self.add_sug_if_correct(word, out);
                        self.map_suggest(word, out, i + r_len);
                        let f = e.strings[fi].clone();
                        word.splice(i..i + r_len, f);
                    }
                }
            }
            i += 1;
        }
    }

    /// Swap each adjacent pair, plus the double swaps for short words.
    fn adjacent_swap_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        if word.is_empty() {
            return;
        }
        for i in 0..word.len() - 1 {
            word.swap(i, i + 1);
            self.add_sug_if_correct(word, out);
            word.swap(i, i + 1);
        }
        if word.len() == 4 {
            word.swap(0, 1);
            word.swap(2, 3);
            self.add_sug_if_correct(word, out);
            word.swap(0, 1);
            word.swap(2, 3);
        } else if word.len() == 5 {
            word.swap(0, 1);
            word.swap(3, 4);
            self.add_sug_if_correct(word, out);
            word.swap(0, 1);
            word.swap(1, 2);
            self.add_sug_if_correct(word, out);
            word.swap(1, 2);
            word.swap(3, 4);
        }
    }

    /// Swap every pair at distance two or more.
    fn distant_swap_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        if word.len() < 3 {
            return;
        }
        for i in 0..word.len() - 2 {
            for j in i + 2..word.len() {
                word.swap(i, j);
                self.add_sug_if_correct(word, out);
                word.swap(i, j);
            }
        }
    }

    /// Replace each character by its upper-case form and by its neighbors
    /// on the keyboard layout (rows separated by `|`).
    fn keyboard_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        let kb = &self.keyboard_closeness;
        for j in 0..word.len() {
            let c = word[j];
            let upp = simple_upper(c);
            if upp != c {
                word[j] = upp;
                self.add_sug_if_correct(word, out);
                word[j] = c;
            }
            for (i, &kc) in kb.iter().enumerate() {
                if kc != c {
                    continue;
                }
                if i > 0 && kb[i - 1] != '|' {
                    word[j] = kb[i - 1];
                    self.add_sug_if_correct(word, out);
                    word[j] = c;
                }
                if i + 1 < kb.len() && kb[i + 1] != '|' {
                    word[j] = kb[i + 1];
                    self.add_sug_if_correct(word, out);
                    word[j] = c;
                }
            }
        }
    }

    /// Delete each character, last position first.
    fn extra_char_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        for i in (0..word.len()).rev() {
            let c = word.remove(i);
            self.add_sug_if_correct(word, out);
            word.insert(i, c);
        }
    }

    /// Insert each character of the try set at every position.
    fn forgotten_char_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        for ci in 0..self.try_chars.len() {
            let new_c = self.try_chars[ci];
            for i in (0..=word.len()).rev() {
                word.insert(i, new_c);
                self.add_sug_if_correct(word, out);
                word.remove(i);
            }
        }
    }

    /// Move one character across every span, to the right and to the
    /// left.
    fn move_char_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        if word.len() < 3 {
            return;
        }
        let backup = word.clone();
        for i in 0..word.len() - 2 {
            word.swap(i, i + 1);
            for j in i + 1..word.len() - 1 {
                word.swap(j, j + 1);
                self.add_sug_if_correct(word, out);
            }
            word.copy_from_slice(&backup);
        }
        for i in (2..word.len()).rev() {
            word.swap(i, i - 1);
            for j in (1..i).rev() {
                word.swap(j, j - 1);
                self.add_sug_if_correct(word, out);
            }
            word.copy_from_slice(&backup);
        }
    }

    /// Replace each character by each character of the try set.
    fn bad_char_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        for ci in 0..self.try_chars.len() {
            let new_c = self.try_chars[ci];
            for i in 0..word.len() {
                let c = word[i];
                if c == new_c {
                    continue;
                }
                word[i] = new_c;
                self.add_sug_if_correct(word, out);
                word[i] = c;
            }
        }
    }

    /// Collapse the five-character pattern ABABA to ABA.
    fn doubled_two_chars_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        if word.len() < 5 {
            return;
        }
        for i in 0..=word.len() - 5 {
            let (a, b) = (word[i], word[i + 1]);
            if a == word[i + 2] && b == word[i + 3] && a == word[i + 4] {
                word.drain(i + 3..i + 5);
                self.add_sug_if_correct(word, out);
                word.insert(i + 3, b);
                word.insert(i + 4, a);
            }
        }
    }

    /// Split into two words; both halves must be simple words. Also
    /// propose a hyphenated join when both halves are long enough and the
    /// try set suggests the language uses hyphens.
    fn two_words_suggest(&self, word: &[char], out: &mut Vec<Vec<char>>) {
        if word.len() < 2 {
            return;
        }
        let hyphenate = !self.try_chars.is_empty()
            && (self.try_chars.contains(&'a') || self.try_chars.contains(&'-'));
        for i in 0..word.len() - 1 {
            let mut w1 = word[..=i].to_vec();
            if self.check_simple_word(&mut w1, false).is_none() {
                continue;
            }
            let mut w2 = word[i + 1..].to_vec();
            if self.check_simple_word(&mut w2, false).is_none() {
                continue;
            }
            let mut joined = Vec::with_capacity(word.len() + 1);
            joined.extend_from_slice(&word[..=i]);
            joined.push(' ');
            joined.extend_from_slice(&word[i + 1..]);
            if !out.iter().any(|o| o == &joined) {
                out.push(joined.clone());
            }
            let sz1 = i + 1;
            let sz2 = word.len() - sz1;
            if sz1 > 1 && sz2 > 1 && hyphenate {
                joined[sz1] = '-';
                if !out.iter().any(|o| o == &joined) {
                    out.push(joined);
                }
            }
        }
    }

    /// Uppercase the word, run the phonetic rules, lowercase and retest.
    fn phonetic_suggest(&self, word: &mut Vec<char>, out: &mut Vec<Vec<char>>) {
        let backup = word.clone();
        for c in word.iter_mut() {
            *c = simple_upper(*c);
        }
        let changed = self.phonetic_table.replace(word);
        if changed {
            for c in word.iter_mut() {
                *c = simple_lower(*c);
            }
            self.add_sug_if_correct(word, out);
        }
        word.clear();
        word.extend_from_slice(&backup);
    }
}
