//! Greedy longest-match encoder
//!
//! Scans the document left to right, at each position asking two match
//! finders - one pre-built over the shared dictionary, one filled in over
//! the document as the scan advances - for the longest match. Matches
//! shorter than [`PREFIX_LENGTH`] bytes cost more to encode than the
//! literals they replace and are never taken.
//!
//! Plain greedy parsing is myopic by exactly one step: in
//! "arrickgargarrick" the first match found is "gar", but waiting one byte
//! yields "arrick". So a found match is held pending for one position; if
//! the next position offers a strictly longer match, the pending start
//! byte is demoted to a literal and the longer match becomes pending
//! instead.

use super::prefix_hash::{PREFIX_LENGTH, PrefixHash};
use super::token::TokenSink;
use anyhow::Result;

/// Per-dictionary encoder state.
///
/// Holds only the read-only dictionary and its prefix hash, so one packer
/// can be shared across threads, each encoding its own document.
#[derive(Debug)]
pub struct SubstringPacker {
    dictionary: Vec<u8>,
    dict_hash: PrefixHash,
}

impl SubstringPacker {
    /// Create a packer for the given shared dictionary (possibly empty).
    /// The dictionary is indexed once, here.
    pub fn new(dictionary: impl Into<Vec<u8>>) -> Self {
        let dictionary = dictionary.into();
        let dict_hash = PrefixHash::new(&dictionary, true);
        Self {
            dictionary,
            dict_hash,
        }
    }

    pub fn dictionary(&self) -> &[u8] {
        &self.dictionary
    }

    /// Encode one document into `sink`.
    ///
    /// Replaying the emitted tokens against the same dictionary
    /// reconstructs `doc` exactly.
    pub fn pack<S: TokenSink>(&self, doc: &[u8], sink: &mut S) -> Result<()> {
        let mut local_hash = PrefixHash::new(doc, false);
        let dict = self.dictionary.as_slice();
        let dict_len = dict.len();
        let count = doc.len();

        // The pending match from the previous position. Its index is in
        // the logical window {dictionary ++ doc}, so local matches are
        // shifted up by dict_len.
        let mut pending_index = 0usize;
        let mut pending_length = 0usize;

        let mut curr = 0usize;
        while curr < count {
            let mut best_index = 0usize;
            let mut best_length = 0usize;

            if curr + PREFIX_LENGTH - 1 < count {
                let dict_match = self.dict_hash.best_match(dict, doc, curr);
                best_index = dict_match.index;
                best_length = dict_match.length;

                let local_match = local_hash.best_match(doc, doc, curr);
                // >= : at equal length the local window wins, since it is
                // always nearer than the dictionary.
                if local_match.length >= best_length {
                    best_index = local_match.index + dict_len;
                    best_length = local_match.length;
                }

                local_hash.insert(doc, curr);
            }

            if best_length < PREFIX_LENGTH {
                best_index = 0;
                best_length = 0;
            }

            if pending_length > 0 && best_length <= pending_length {
                // Nothing longer ahead; emit the pending match. The match
                // started one position back, at curr - 1.
                let distance = curr - 1 + dict_len - pending_index;
                sink.substring(-(distance as i32), pending_length as u32)?;

                // Index the positions the match skips over so later
                // repetitions can still find them.
                let match_end = curr - 1 + pending_length;
                curr += 1;
                while curr < match_end && curr + PREFIX_LENGTH < count {
                    local_hash.insert(doc, curr);
                    curr += 1;
                }
                curr = match_end;
                pending_index = 0;
                pending_length = 0;
            } else if best_length > 0 {
                if pending_length > 0 {
                    // The new match is strictly longer; the pending one
                    // loses its first byte to a literal.
                    sink.literal(doc[curr - 1])?;
                }
                pending_index = best_index;
                pending_length = best_length;
                curr += 1;
            } else {
                sink.literal(doc[curr])?;
                curr += 1;
            }
        }

        sink.end_document()
    }
}
