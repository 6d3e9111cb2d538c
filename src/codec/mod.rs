//! The substring codec
//!
//! An LZ-style token protocol over the logical window
//! {shared dictionary ++ document output}:
//!
//! - `packer`: greedy longest-match encoder with one-token lookahead
//! - `unpacker`: token replayer handling dictionary-wrapping offsets and
//!   self-overlapping copies
//! - `prefix_hash`: chained-hash match finder shared by both match sources
//! - `token`: the token types and the [`TokenSink`] consumer boundary
//!
//! Entropy coding of the resulting token stream is deliberately out of
//! scope; see [`crate::encoding`] for the flat byte serialization the CLI
//! uses in its place.

pub mod packer;
pub mod prefix_hash;
pub mod token;
pub mod unpacker;

// Re-exports for convenience
pub use packer::SubstringPacker;
pub use prefix_hash::{MatchCandidate, PrefixHash};
pub use token::{Token, TokenBuffer, TokenSink};
pub use unpacker::SubstringUnpacker;
