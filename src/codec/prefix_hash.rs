//! Chained-hash match finder over 4-byte prefixes
//!
//! Every indexed position is bucketed by a hash of the 4 bytes starting
//! there; positions in a bucket are chained newest-first, so a lookup
//! visits candidates nearest the search position first. That ordering is
//! what implements the "prefer nearer matches" tie-break: a strictly
//! longer length is required to displace an earlier (nearer) candidate.
//!
//! The hash never stores buffer references; callers pass the backing
//! buffer back in, which keeps the structure free of self-borrow knots
//! when the packer indexes the document it is currently scanning.

use ahash::RandomState;

/// Bytes hashed per position; also the minimum useful match length
pub const PREFIX_LENGTH: usize = 4;

/// Matches farther back than this are never taken
const MAX_DISTANCE: usize = (1 << 16) - 1;

/// Longest match a single token may cover
const MAX_MATCH_LENGTH: usize = 255;

const EMPTY: u32 = u32::MAX;

/// A candidate match located by [`PrefixHash::best_match`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Position of the match within the hashed buffer
    pub index: usize,
    /// Match length in bytes; 0 means no match
    pub length: usize,
}

/// Hash table of positions keyed by their 4-byte prefix
#[derive(Debug)]
pub struct PrefixHash {
    buckets: Vec<u32>,
    chain: Vec<u32>,
    mask: usize,
    state: RandomState,
}

impl PrefixHash {
    /// Create a hash sized for `buf`. With `index_all` every position of
    /// `buf` is inserted up front (how the dictionary is indexed, once);
    /// otherwise the caller inserts positions as its scan advances.
    pub fn new(buf: &[u8], index_all: bool) -> Self {
        let buckets = (buf.len() * 2).next_power_of_two().max(64);
        let mut hash = Self {
            buckets: vec![EMPTY; buckets],
            chain: vec![EMPTY; buf.len()],
            mask: buckets - 1,
            // Fixed seeds: the same dictionary must always index the same
            // way so optimization and encoding stay deterministic.
            state: RandomState::with_seeds(0x9E37, 0x79B9, 0x7F4A, 0x7C15),
        };
        if index_all {
            for i in 0..buf.len().saturating_sub(PREFIX_LENGTH) {
                hash.insert(buf, i);
            }
        }
        hash
    }

    fn bucket(&self, buf: &[u8], index: usize) -> usize {
        let prefix = u32::from_le_bytes(buf[index..index + PREFIX_LENGTH].try_into().unwrap());
        self.state.hash_one(prefix) as usize & self.mask
    }

    /// Index the position `index` of `buf` (the buffer this hash was sized
    /// for). Newest insertions go to the front of the chain.
    pub fn insert(&mut self, buf: &[u8], index: usize) {
        let bucket = self.bucket(buf, index);
        self.chain[index] = self.buckets[bucket];
        self.buckets[bucket] = index as u32;
    }

    /// Longest match for `target[index..]` among the indexed positions of
    /// `buf`. For the local-window hash `buf` and `target` are the same
    /// buffer; for the dictionary hash they differ, and distances are
    /// measured as if `buf` sat immediately before `target`.
    pub fn best_match(&self, buf: &[u8], target: &[u8], index: usize) -> MatchCandidate {
        let mut best = MatchCandidate::default();
        if buf.is_empty() || index + PREFIX_LENGTH > target.len() {
            return best;
        }
        let same_buffer = std::ptr::eq(buf, target);
        let max_length = MAX_MATCH_LENGTH.min(target.len() - index);

        let mut candidate = self.buckets[self.bucket(target, index)];
        while candidate != EMPTY {
            let at = candidate as usize;
            let distance = if same_buffer {
                index - at
            } else {
                index + buf.len() - at
            };
            if distance > MAX_DISTANCE {
                // Chains are nearest-first, so everything further down is
                // out of range too.
                break;
            }

            let end_j = buf.len().min(at + max_length);
            let end_k = target.len().min(index + max_length);
            let mut j = at;
            let mut k = index;
            while j < end_j && k < end_k && buf[j] == target[k] {
                j += 1;
                k += 1;
            }

            let length = j - at;
            if length > best.length {
                best = MatchCandidate { index: at, length };
            }
            candidate = self.chain[at];
        }

        best
    }
}
