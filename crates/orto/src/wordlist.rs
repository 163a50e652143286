// The word dictionary: a multiset of (stem, flag set) entries keyed by
// stem text. Homonyms (same stem, different flags) keep their insertion
// order, which is observable because the first accepted entry wins.

use hashbrown::HashMap;
use orto_core::flags::FlagSet;
use smallvec::SmallVec;

/// One dictionary entry as seen by the check engine.
///
/// The flag set reference doubles as the entry's identity: two results
/// refer to the same entry iff their flag references point at the same
/// allocation (used by the compound duplicate check).
#[derive(Debug, Clone, Copy)]
pub struct WordEntry<'a> {
    pub stem: &'a [char],
    pub flags: &'a FlagSet,
}

impl<'a> WordEntry<'a> {
    /// Identity comparison (same stored entry, not just equal contents).
    pub fn same_entry(&self, other: &WordEntry<'_>) -> bool {
        std::ptr::eq(self.flags, other.flags)
    }
}

/// Multiset of word entries keyed by stem.
#[derive(Debug, Default)]
pub struct WordList {
    // Homonyms are rare, so each stem's flag sets live in a small vector.
    words: HashMap<Box<[char]>, SmallVec<[FlagSet; 1]>>,
}

impl WordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.words.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Append an entry. Entries with an identical stem stay in insertion
    /// order behind the ones already present.
    pub fn insert(&mut self, stem: Vec<char>, flags: FlagSet) {
        self.words
            .entry(stem.into_boxed_slice())
            .or_default()
            .push(flags);
    }

    /// All entries whose stem equals `stem`, in insertion order.
    pub fn homonyms<'a>(&'a self, stem: &[char]) -> impl Iterator<Item = WordEntry<'a>> {
        self.words
            .get_key_value(stem)
            .into_iter()
            .flat_map(|(key, sets)| {
                let stem: &'a [char] = key;
                sets.iter().map(move |flags| WordEntry { stem, flags })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orto_core::flags::Flag;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn fs(flags: &[Flag]) -> FlagSet {
        FlagSet::from_flags(flags.to_vec())
    }

    #[test]
    fn lookup_miss_is_empty() {
        let wl = WordList::new();
        assert_eq!(wl.homonyms(&chars("none")).count(), 0);
    }

    #[test]
    fn homonyms_keep_insertion_order() {
        let mut wl = WordList::new();
        wl.insert(chars("bank"), fs(&[1]));
        wl.insert(chars("bank"), fs(&[2]));
        wl.insert(chars("bank"), fs(&[3]));
        let flags: Vec<u16> = wl
            .homonyms(&chars("bank"))
            .map(|e| e.flags.as_slice()[0])
            .collect();
        assert_eq!(flags, [1, 2, 3]);
        assert_eq!(wl.len(), 3);
    }

    #[test]
    fn entry_identity_distinguishes_homonyms() {
        let mut wl = WordList::new();
        wl.insert(chars("ha"), fs(&[1]));
        wl.insert(chars("ha"), fs(&[1]));
        let entries: Vec<WordEntry<'_>> = wl.homonyms(&chars("ha")).collect();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].same_entry(&entries[0]));
        assert!(!entries[0].same_entry(&entries[1]));
        // Contents are equal even though identities differ.
        assert_eq!(entries[0].flags, entries[1].flags);
    }

    #[test]
    fn distinct_stems_do_not_mix() {
        let mut wl = WordList::new();
        wl.insert(chars("work"), fs(&[]));
        wl.insert(chars("word"), fs(&[]));
        assert_eq!(wl.homonyms(&chars("work")).count(), 1);
        assert_eq!(wl.homonyms(&chars("word")).count(), 1);
        assert_eq!(wl.homonyms(&chars("wor")).count(), 0);
    }
}
