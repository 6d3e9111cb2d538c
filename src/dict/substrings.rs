//! Candidate substring bookkeeping
//!
//! Candidates never own their bytes: a [`Substring`] locates itself through
//! its suffix-array row, so all byte-level operations take the flattened
//! corpus and its suffix array as parameters.

use memchr::memmem;

/// A candidate dictionary substring.
///
/// `index` is a row in the suffix array; `suffix_array[index]` is the
/// offset of the substring's first byte in the flattened corpus. `score`
/// is the number of distinct training documents the substring occurs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substring {
    pub index: u32,
    pub length: u32,
    pub score: u32,
}

/// An ordered collection of candidate substrings.
///
/// Used both as the miner's result set and as the pruner's working set.
#[derive(Debug, Default)]
pub struct SubstringSet {
    entries: Vec<Substring>,
}

impl SubstringSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, i: usize) -> Substring {
        self.entries[i]
    }

    pub fn push(&mut self, entry: Substring) {
        self.entries.push(entry);
    }

    pub fn remove(&mut self, i: usize) -> Substring {
        self.entries.remove(i)
    }

    /// Sort ascending by score. The sort is stable so ties keep insertion
    /// order, which keeps optimization deterministic.
    pub fn sort_by_score(&mut self) {
        self.entries.sort_by_key(|s| s.score);
    }

    /// Resolve the `i`-th candidate to its bytes in the flattened corpus
    pub fn bytes_of<'a>(&self, i: usize, bytes: &'a [u8], suffix_array: &[u32]) -> &'a [u8] {
        let entry = self.entries[i];
        let start = suffix_array[entry.index as usize] as usize;
        &bytes[start..start + entry.length as usize]
    }

    /// Position of `other`'s `j`-th candidate within this set's `i`-th
    /// candidate, or `None` if it does not occur. Used by the pruner to
    /// detect candidates subsumed by ones already selected.
    pub fn index_of(
        &self,
        i: usize,
        other: &SubstringSet,
        j: usize,
        bytes: &[u8],
        suffix_array: &[u32],
    ) -> Option<usize> {
        let haystack = self.bytes_of(i, bytes, suffix_array);
        let needle = other.bytes_of(j, bytes, suffix_array);
        memmem::find(haystack, needle)
    }
}
