//! Dictionary optimization module
//!
//! Produces a fixed-length byte buffer that maximizes expected compression
//! value for a training corpus:
//!
//! 1. Flatten the corpus into one buffer ([`crate::corpus::FlattenedCorpus`])
//! 2. Build its suffix array and LCP array (`suffix`)
//! 3. Enumerate repeated substrings with cross-document uniqueness scores
//!    (`miner`)
//! 4. Prune subsumed candidates and pack the survivors back-to-front,
//!    merging shared prefixes/suffixes (`optimizer`)

pub mod miner;
pub mod optimizer;
pub mod substrings;
pub mod suffix;

// Re-exports for convenience
pub use optimizer::DictionaryOptimizer;
pub use substrings::{Substring, SubstringSet};
pub use suffix::{compute_lcp, compute_suffix_array};
