//! Suffix array and LCP array construction
//!
//! The dictionary optimizer treats these as supplied primitives with the
//! standard contracts: `compute_suffix_array` returns the permutation of
//! `[0, n)` that sorts all suffixes lexicographically, and `compute_lcp`
//! returns the longest-common-prefix length between each pair of
//! lexicographically adjacent suffixes (`lcp[0]` is 0).
//!
//! Construction uses prefix doubling (Manber-Myers): O(log n) rounds of
//! rank-pair sorting, parallelized with rayon for large corpora, followed
//! by Kasai's O(n) LCP pass.

use rayon::prelude::*;

/// Inputs above this size use parallel sorting for each doubling round
const PARALLEL_SORT_THRESHOLD: usize = 100_000;

/// Compute the suffix array of `bytes` by prefix doubling.
///
/// Each round sorts suffixes by their first `2k` bytes, represented as a
/// pair of ranks from the previous round.
pub fn compute_suffix_array(bytes: &[u8]) -> Vec<u32> {
    let n = bytes.len();
    if n == 0 {
        return Vec::new();
    }

    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<u32> = bytes.iter().map(|&b| b as u32).collect();
    let mut next_rank = vec![0u32; n];

    let mut k = 1usize;
    loop {
        // Sort by (rank of first half, rank of second half). A suffix
        // shorter than k bytes has no second half and sorts first, hence
        // the 0 sentinel with real ranks shifted up by one.
        let key = |&i: &u32| -> (u32, u32) {
            let i = i as usize;
            let tail = if i + k < n { rank[i + k] + 1 } else { 0 };
            (rank[i], tail)
        };

        if n > PARALLEL_SORT_THRESHOLD {
            sa.par_sort_unstable_by_key(key);
        } else {
            sa.sort_unstable_by_key(key);
        }

        // Re-rank in sorted order, bumping the rank whenever the key changes
        next_rank[sa[0] as usize] = 0;
        for i in 1..n {
            let bump = if key(&sa[i]) != key(&sa[i - 1]) { 1 } else { 0 };
            next_rank[sa[i] as usize] = next_rank[sa[i - 1] as usize] + bump;
        }
        std::mem::swap(&mut rank, &mut next_rank);

        // All ranks distinct means the order is fully determined
        if rank[sa[n - 1] as usize] as usize == n - 1 {
            break;
        }
        k <<= 1;
    }

    sa
}

/// Compute the LCP array with Kasai's algorithm.
///
/// `lcp[i]` is the longest common prefix between the suffixes at
/// `suffix_array[i - 1]` and `suffix_array[i]`; `lcp[0]` is 0.
pub fn compute_lcp(bytes: &[u8], suffix_array: &[u32]) -> Vec<u32> {
    let n = bytes.len();
    let mut lcp = vec![0u32; n];
    if n == 0 {
        return lcp;
    }

    // rank[i] = position of suffix i in the suffix array
    let mut rank = vec![0u32; n];
    for (pos, &suffix) in suffix_array.iter().enumerate() {
        rank[suffix as usize] = pos as u32;
    }

    let mut h = 0usize;
    for i in 0..n {
        let pos = rank[i] as usize;
        if pos == 0 {
            h = 0;
            continue;
        }
        let j = suffix_array[pos - 1] as usize;
        while i + h < n && j + h < n && bytes[i + h] == bytes[j + h] {
            h += 1;
        }
        lcp[pos] = h as u32;
        // The next suffix drops one leading byte, so its LCP shrinks by at
        // most one. This is what makes the whole pass linear.
        h = h.saturating_sub(1);
    }

    lcp
}
