//! Dictionary optimization
//!
//! Ties the pipeline together: flatten the corpus, build the suffix/LCP
//! arrays, mine scored candidates, then prune and pack the winners into a
//! fixed-size dictionary buffer.
//!
//! Selection is a deliberate greedy heuristic - highest score first with
//! subsumption pruning - not a globally optimal cover.

use super::miner;
use super::substrings::SubstringSet;
use super::suffix::{compute_lcp, compute_suffix_array};
use crate::corpus::{Corpus, FlattenedCorpus};

/// One-shot dictionary builder for a corpus snapshot.
///
/// Holds the flattened corpus plus the arrays derived from it; everything
/// is safe to discard once [`optimize`](Self::optimize) returns.
#[derive(Debug, Default)]
pub struct DictionaryOptimizer {
    corpus: FlattenedCorpus,
    suffix_array: Vec<u32>,
    lcp: Vec<u32>,
    substrings: SubstringSet,
}

impl DictionaryOptimizer {
    pub fn new(corpus: &Corpus) -> Self {
        Self::from_documents(corpus.iter())
    }

    pub fn from_documents<I, D>(docs: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[u8]>,
    {
        Self {
            corpus: FlattenedCorpus::flatten(docs),
            ..Self::default()
        }
    }

    /// Build a dictionary of at most `desired_length` bytes.
    ///
    /// An empty corpus or a zero length yields an empty dictionary; both
    /// are defined, benign edge cases rather than errors.
    pub fn optimize(&mut self, desired_length: usize) -> Vec<u8> {
        if self.corpus.bytes().is_empty() || desired_length == 0 {
            return Vec::new();
        }

        self.suffix_array = compute_suffix_array(self.corpus.bytes());
        self.lcp = compute_lcp(self.corpus.bytes(), &self.suffix_array);
        self.substrings = miner::compute_substrings(&self.corpus, &self.suffix_array, &self.lcp);

        self.pack(desired_length)
    }

    /// Number of mined candidates (after [`optimize`](Self::optimize))
    pub fn substring_count(&self) -> usize {
        self.substrings.len()
    }

    /// Bytes and score of the `i`-th mined candidate
    pub fn substring(&self, i: usize) -> (&[u8], u32) {
        let bytes = self
            .substrings
            .bytes_of(i, self.corpus.bytes(), &self.suffix_array);
        (bytes, self.substrings.get(i).score)
    }

    /// The substrings that would be packed into a dictionary of
    /// `desired_length` bytes, with their scores, in packing order.
    ///
    /// Walks the same layout loop as [`optimize`](Self::optimize) (which
    /// must have run first), so this reflects exactly what ends up in the
    /// dictionary, truncation included.
    pub fn substring_scores(&self, desired_length: usize) -> Vec<(Vec<u8>, u32)> {
        let pruned = self.pruned_substrings(desired_length);
        let bytes = self.corpus.bytes();
        let mut scores = Vec::with_capacity(pruned.len());

        let mut packed = vec![0u8; desired_length];
        let mut cursor = desired_length;
        for i in 0..pruned.len() {
            if cursor == 0 {
                break;
            }
            let entry = pruned.get(i);
            let length = (entry.length as usize).min(cursor);
            let from = self.suffix_array[entry.index as usize] as usize;
            cursor -= prepend(bytes, from, &mut packed, cursor, length);
            scores.push((bytes[from..from + length].to_vec(), entry.score));
        }

        scores
    }

    /// Select candidates worth packing, highest score first.
    ///
    /// A candidate already covered by a selected substring is skipped;
    /// selecting a candidate evicts any earlier picks it subsumes (e.g.
    /// "ttp://" once "http://" is in). Selection stops at twice the
    /// desired length because packing will merge common prefixes and
    /// suffixes, roughly halving the total.
    fn pruned_substrings(&self, desired_length: usize) -> SubstringSet {
        let bytes = self.corpus.bytes();
        let sa = &self.suffix_array;
        let mut pruned = SubstringSet::with_capacity(1024);
        let mut size = 0usize;

        for i in (0..self.substrings.len()).rev() {
            let covered = (0..pruned.len())
                .any(|j| pruned.index_of(j, &self.substrings, i, bytes, sa).is_some());
            if covered {
                continue;
            }

            for j in (0..pruned.len()).rev() {
                if self.substrings.index_of(i, &pruned, j, bytes, sa).is_some() {
                    size -= pruned.get(j).length as usize;
                    pruned.remove(j);
                }
            }

            let entry = self.substrings.get(i);
            size += entry.length as usize;
            pruned.push(entry);

            if size >= 2 * desired_length {
                break;
            }
        }

        pruned
    }

    /// Lay the pruned substrings out back-to-front into a buffer of exactly
    /// `desired_length` bytes, merging each one's suffix with the prefix of
    /// what was already written, then trim any unused leading bytes.
    fn pack(&self, desired_length: usize) -> Vec<u8> {
        let pruned = self.pruned_substrings(desired_length);
        let bytes = self.corpus.bytes();

        let mut packed = vec![0u8; desired_length];
        let mut cursor = desired_length;
        for i in 0..pruned.len() {
            if cursor == 0 {
                break;
            }
            let entry = pruned.get(i);
            let length = (entry.length as usize).min(cursor);
            let from = self.suffix_array[entry.index as usize] as usize;
            cursor -= prepend(bytes, from, &mut packed, cursor, length);
        }

        if cursor > 0 {
            packed.drain(..cursor);
        }
        packed
    }
}

/// Write `from[from_index..from_index + length]` so that it ends at
/// `to_index`, reusing the longest overlap between its suffix and the bytes
/// already written there. Packing " and " in front of " the " yields
/// " and the ", not " and  the ". Returns the number of bytes written.
fn prepend(from: &[u8], from_index: usize, to: &mut [u8], to_index: usize, length: usize) -> usize {
    let mut overlap = (length - 1).min(to.len() - to_index);
    while overlap > 0 {
        if from[from_index + length - overlap..from_index + length]
            == to[to_index..to_index + overlap]
        {
            break;
        }
        overlap -= 1;
    }

    let copy_len = length - overlap;
    to[to_index - copy_len..to_index].copy_from_slice(&from[from_index..from_index + copy_len]);
    copy_len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimize(docs: &[&str], desired_length: usize) -> Vec<u8> {
        DictionaryOptimizer::from_documents(docs).optimize(desired_length)
    }

    #[test]
    fn test_prepend_no_overlap() {
        let mut to = vec![0u8; 16];
        let n = prepend(b"toubassi", 0, &mut to, 16, 8);
        assert_eq!(n, 8);
        assert_eq!(&to[8..], b"toubassi");

        let n = prepend(b"silence", 0, &mut to, 8, 7);
        assert_eq!(n, 7);
        assert_eq!(&to[1..], b"silencetoubassi");
    }

    #[test]
    fn test_prepend_merges_suffix_with_prefix() {
        let mut to = vec![0u8; 10];
        prepend(b" the ", 0, &mut to, 10, 5);
        // " and " ends with the space " the " starts with, so only " and"
        // is written.
        let n = prepend(b" and ", 0, &mut to, 5, 5);
        assert_eq!(n, 4);
        assert_eq!(&to[1..], b" and the ");
    }

    #[test]
    fn test_prepend_full_containment_overlap() {
        let mut to = vec![0u8; 8];
        prepend(b"aaaa", 0, &mut to, 8, 4);
        let n = prepend(b"aaaaa", 0, &mut to, 4, 5);
        // Four of the five bytes overlap what's already there.
        assert_eq!(n, 1);
        assert_eq!(&to[3..], b"aaaaa");
    }

    #[test]
    fn test_empty_corpus_gives_empty_dictionary() {
        assert!(optimize(&[], 1024).is_empty());
    }

    #[test]
    fn test_zero_desired_length_gives_empty_dictionary() {
        assert!(optimize(&["some content here", "some content there"], 0).is_empty());
    }

    #[test]
    fn test_dictionary_contains_shared_strings() {
        let dict = optimize(
            &[
                "http://espn.com",
                "http://google.com",
                "http://yahoo.com",
                "http://facebook.com",
            ],
            64,
        );
        let dict = String::from_utf8_lossy(&dict);
        assert!(dict.contains("http://"), "dictionary was {dict:?}");
    }

    #[test]
    fn test_dictionary_never_exceeds_desired_length() {
        let docs: Vec<String> = (0..50)
            .map(|i| format!("GET /api/v2/users/{i}/profile HTTP/1.1"))
            .collect();
        let dict = DictionaryOptimizer::from_documents(&docs).optimize(16);
        assert!(dict.len() <= 16, "dictionary was {} bytes", dict.len());
    }

    #[test]
    fn test_optimization_is_deterministic() {
        let docs = [
            "POST /login user=alice",
            "POST /login user=bob",
            "POST /logout user=alice",
            "GET /status",
        ];
        let first = optimize(&docs, 128);
        let second = optimize(&docs, 128);
        assert_eq!(first, second);
    }

    #[test]
    fn test_higher_scored_substring_evicts_subsumed() {
        // "ttp://x" style fragments must not survive alongside "http://".
        let dict = optimize(
            &["http://a.de", "http://b.de", "http://c.de", "http://d.de"],
            24,
        );
        let dict = String::from_utf8_lossy(&dict);
        assert_eq!(dict.matches("ttp://").count(), dict.matches("http://").count());
    }

    #[test]
    fn test_substring_scores_reports_packed_strings() {
        let shared = "arash";
        let mut opt = DictionaryOptimizer::from_documents([
            "http://espn.de".to_string(),
            "http://popsugar.de".to_string(),
            "http://google.de".to_string(),
            "http://yahoo.de".to_string(),
            format!("{shared}!"),
            format!("{shared}>"),
            format!("{shared}_"),
            format!("{shared})"),
        ]);
        opt.optimize(1024);

        let scores = opt.substring_scores(1024);
        assert!(!scores.is_empty());
        let arash = scores
            .iter()
            .find(|(bytes, _)| bytes == shared.as_bytes())
            .expect("shared string missing from dictionary scores");
        assert_eq!(arash.1, 4);
    }
}
