//! Substring mining over the suffix array / LCP array
//!
//! A run of adjacent suffix-array rows sharing an LCP of at least `L`
//! means one substring of length `L` occurs once per row in the run. The
//! miner walks the LCP array once, keeping a stack of currently open runs
//! (one per length), and "cashes in" each run when the LCP drops below its
//! length. Every row enters and leaves the stack O(1) amortized times, so
//! the scan is linear in the corpus size; the per-row document lookup adds
//! an O(log d) binary search.
//!
//! A run's value is the number of *distinct* documents it occurs in, not
//! its raw occurrence count: a string repeated a thousand times inside one
//! document is nearly worthless in a shared dictionary, because after its
//! first occurrence the document can back-reference itself.

use super::substrings::{Substring, SubstringSet};
use crate::corpus::{DocSpan, FlattenedCorpus};

/// Substrings shorter than this never pay for their back-reference token.
/// Empirically 4; gzip draws the line at 3, so some skepticism is fair.
const MIN_SUBSTRING_LENGTH: usize = 4;

/// An LCP run that is still open: a substring of `length` bytes shared by
/// every suffix from row `index - 1` up to wherever the run closes.
#[derive(Debug, Clone, Copy)]
struct ActiveRun {
    index: usize,
    length: usize,
}

/// Tracks which documents an occurrence run touches.
///
/// A reusable fixed-capacity bitset keyed by document index: `clear` only
/// zeroes the words actually dirtied, so closing the many zero- or
/// low-score runs stays O(occurrences) rather than O(documents).
#[derive(Debug)]
struct DocSet {
    words: Vec<u64>,
    dirty: Vec<u32>,
    len: usize,
}

impl DocSet {
    fn new(doc_count: usize) -> Self {
        Self {
            words: vec![0u64; doc_count.div_ceil(64)],
            dirty: Vec::new(),
            len: 0,
        }
    }

    fn insert(&mut self, doc: u32) {
        let word = (doc / 64) as usize;
        let bit = 1u64 << (doc % 64);
        if self.words[word] == 0 {
            self.dirty.push(word as u32);
        }
        if self.words[word] & bit == 0 {
            self.words[word] |= bit;
            self.len += 1;
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for word in self.dirty.drain(..) {
            self.words[word as usize] = 0;
        }
        self.len = 0;
    }
}

/// Enumerate candidate substrings with cross-document uniqueness scores.
///
/// Returns the candidates sorted ascending by score, ready for the pruner
/// to consume greedily from the end.
pub fn compute_substrings(
    corpus: &FlattenedCorpus,
    suffix_array: &[u32],
    lcp: &[u32],
) -> SubstringSet {
    let n = lcp.len();
    let mut substrings = SubstringSet::with_capacity(1024);
    if n == 0 {
        return substrings;
    }

    let bytes_len = corpus.bytes().len();
    let mut active: Vec<ActiveRun> = Vec::with_capacity(128);
    let mut unique_docs = DocSet::new(corpus.doc_count());

    // Cache of each scanned row's containing document, compacted whenever
    // no runs are open so it never grows with the whole corpus.
    let mut spans: Vec<DocSpan> = vec![corpus.doc_span(suffix_array[0] as usize)];
    let mut spans_base = 0usize;

    let mut last_lcp = lcp[0] as usize;
    for i in 1..=n {
        // Treat the end of the array as an LCP of 0 so runs still open
        // after the last row get cashed in like any other.
        let current_lcp = if i == n {
            0
        } else {
            spans.push(corpus.doc_span(suffix_array[i] as usize));
            lcp[i] as usize
        };

        if current_lcp > last_lcp {
            // Open one run per new length, shortest first, so the stack
            // stays ordered by length and closes longest-first below.
            for length in last_lcp + 1..=current_lcp {
                active.push(ActiveRun { index: i, length });
            }
        } else if current_lcp < last_lcp {
            let mut last_closed: Option<(usize, usize, usize)> = None;
            while let Some(&run) = active.last() {
                if run.length <= current_lcp {
                    break;
                }
                active.pop();

                // This run spans suffix-array rows [run.index - 1, i): one
                // occurrence per row. Count the distinct documents, but only
                // for occurrences that fit inside a single document; for
                // documents "http://espn.com" and "http://google.com" the
                // seam string ".comhttp://" is not a legal candidate.
                let count = i - run.index + 1;
                for row in run.index - 1..i {
                    let byte_index = suffix_array[row] as usize;
                    let span = spans[row - spans_base];
                    if run.length <= span.end as usize - byte_index {
                        unique_docs.insert(span.doc);
                    }
                }
                let score = unique_docs.len();
                unique_docs.clear();

                if score == 0 {
                    continue;
                }

                // If we just closed ABC, don't also keep AB with the same
                // anchor and occurrence count; the longer run dominates it.
                let redundant = matches!(
                    last_closed,
                    Some((index, length, c)) if index == run.index && c == count && length > run.length
                );
                if !redundant && run.length >= MIN_SUBSTRING_LENGTH {
                    substrings.push(Substring {
                        index: run.index as u32,
                        length: run.length as u32,
                        score: score as u32,
                    });
                }
                last_closed = Some((run.index, run.length, count));
            }
        }
        last_lcp = current_lcp;

        if active.is_empty() && spans.len() > 1 {
            let last = spans[spans.len() - 1];
            spans_base += spans.len() - 1;
            spans.clear();
            spans.push(last);
        }
    }

    debug_assert!(spans_base + spans.len() <= bytes_len + 1);
    substrings.sort_by_score();
    substrings
}
