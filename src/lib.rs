//! # SDC - Shared-Dictionary Compression
//!
//! SDC compresses corpora of many small, structurally similar documents
//! (URLs, JSON records, log lines) where per-document overhead from a
//! general-purpose compressor dominates. It mines recurring substrings
//! across a training corpus into a fixed-size shared dictionary, then
//! encodes each document as literals and back-references that may reach
//! into the shared dictionary as well as the document's own output.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`corpus`] - Training document collections and the corpus flattener
//! - [`dict`] - Dictionary optimization (suffix array mining, pruning, packing)
//! - [`codec`] - The substring codec (LZ-style packer and unpacker)
//! - [`model`] - Compression model variants and persistence
//! - [`encoding`] - Wire formats (varints, token stream, dictionary blob)
//!
//! ## Quick Start
//!
//! ```
//! use sdc::corpus::Corpus;
//! use sdc::model::{CompressionModel, ModelVariant};
//!
//! let corpus = Corpus::from_docs(vec![
//!     "http://espn.com",
//!     "http://google.com",
//!     "http://yahoo.com",
//! ]);
//!
//! let model = CompressionModel::build(ModelVariant::Substring, &corpus, 1024).unwrap();
//! let compressed = model.compress(b"http://facebook.com").unwrap();
//! let restored = model.decompress(&compressed).unwrap();
//! assert_eq!(restored, b"http://facebook.com");
//! ```
//!
//! ## How it works
//!
//! Training walks the suffix array and LCP array of the flattened corpus to
//! enumerate repeated substrings, scores each by the number of *distinct*
//! documents it occurs in, prunes candidates subsumed by higher-scored ones,
//! and packs the survivors back-to-front into the dictionary buffer while
//! merging shared prefixes and suffixes. Compression is a greedy
//! longest-match parse against {dictionary ++ output-so-far} with a
//! one-token lookahead.

pub mod codec;
pub mod corpus;
pub mod dict;
pub mod encoding;
pub mod model;
