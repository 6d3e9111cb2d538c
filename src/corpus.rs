//! Training corpus handling
//!
//! A [`Corpus`] is an ordered collection of documents. The dictionary
//! optimizer only ever needs the document count and per-document byte
//! access, so loaders exist for the common shapes of training data:
//!
//! - in-memory documents ([`Corpus::from_docs`])
//! - a directory where every file is one document ([`Corpus::from_dir`])
//! - a text file with one document per line ([`Corpus::from_lines`])
//!
//! [`FlattenedCorpus`] concatenates all documents into a single buffer and
//! records where each document starts, which is the shape the suffix array
//! construction and the substring miner operate on.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// An ordered, indexable collection of training documents.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    docs: Vec<Vec<u8>>,
}

impl Corpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from in-memory documents
    pub fn from_docs<I, D>(docs: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[u8]>,
    {
        Self {
            docs: docs.into_iter().map(|d| d.as_ref().to_vec()).collect(),
        }
    }

    /// Build a corpus from a directory, one document per file.
    ///
    /// Files are walked with gitignore-style filtering and visited in path
    /// order so that training is deterministic. Empty files are skipped.
    pub fn from_dir(path: &Path) -> Result<Self> {
        let mut docs = Vec::new();
        let walker = WalkBuilder::new(path)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let bytes = std::fs::read(entry.path())
                .with_context(|| format!("failed to read {}", entry.path().display()))?;
            if !bytes.is_empty() {
                docs.push(bytes);
            }
        }

        Ok(Self { docs })
    }

    /// Build a corpus from a text file, one document per line.
    ///
    /// The file is memory-mapped and split on `\n`; a trailing newline does
    /// not produce an empty final document.
    pub fn from_lines(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        if file.metadata()?.len() == 0 {
            return Ok(Self::new());
        }

        // Safety: the mapping is read before this function returns and the
        // bytes are copied out, so concurrent truncation is the only hazard,
        // as with any mmap-based reader.
        let map = unsafe { Mmap::map(&file) }
            .with_context(|| format!("failed to map {}", path.display()))?;

        let docs = map
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| line.to_vec())
            .collect();

        Ok(Self { docs })
    }

    /// Add a document to the corpus
    pub fn push(&mut self, doc: impl Into<Vec<u8>>) {
        self.docs.push(doc.into());
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Bytes of the `i`-th document
    pub fn get(&self, i: usize) -> &[u8] {
        &self.docs[i]
    }

    /// Iterate over document byte slices
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.docs.iter().map(|d| d.as_slice())
    }
}

/// The containing document of a byte offset in a [`FlattenedCorpus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocSpan {
    /// Index of the containing document
    pub doc: u32,
    /// Offset one past the document's last byte in the flattened buffer
    pub end: u32,
}

/// All training documents concatenated into one buffer.
///
/// `starts` holds one entry per document, strictly increasing, with
/// `starts[0] == 0`; document `i` occupies `[starts[i], starts[i+1])` (the
/// last document ends at `bytes.len()`). No separator bytes are inserted:
/// the substring miner rejects occurrences that cross a document seam
/// instead.
///
/// Built once per optimization run and read-only afterward.
#[derive(Debug, Default)]
pub struct FlattenedCorpus {
    bytes: Vec<u8>,
    starts: Vec<u32>,
}

impl FlattenedCorpus {
    /// Concatenate documents, recording each document's start offset
    pub fn flatten<I, D>(docs: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[u8]>,
    {
        let mut bytes = Vec::new();
        let mut starts = Vec::new();
        for doc in docs {
            starts.push(bytes.len() as u32);
            bytes.extend_from_slice(doc.as_ref());
        }
        Self { bytes, starts }
    }

    /// The concatenated corpus bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of documents flattened in
    pub fn doc_count(&self) -> usize {
        self.starts.len()
    }

    /// Map a byte offset back to its containing document.
    ///
    /// Binary search over `starts`: the containing document is the last one
    /// starting at or before `byte_index`.
    pub fn doc_span(&self, byte_index: usize) -> DocSpan {
        debug_assert!(byte_index < self.bytes.len());
        let doc = self
            .starts
            .partition_point(|&s| s as usize <= byte_index)
            - 1;
        let end = match self.starts.get(doc + 1) {
            Some(&next) => next,
            None => self.bytes.len() as u32,
        };
        DocSpan {
            doc: doc as u32,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flatten_records_starts() {
        let flat = FlattenedCorpus::flatten(["hello", "", "world!"]);
        assert_eq!(flat.bytes(), b"helloworld!");
        assert_eq!(flat.starts, vec![0, 5, 5]);
        assert_eq!(flat.doc_count(), 3);
    }

    #[test]
    fn test_doc_span() {
        let flat = FlattenedCorpus::flatten(["0123456789", "abcde"]);
        assert_eq!(flat.doc_span(0), DocSpan { doc: 0, end: 10 });
        assert_eq!(flat.doc_span(9), DocSpan { doc: 0, end: 10 });
        assert_eq!(flat.doc_span(10), DocSpan { doc: 1, end: 15 });
        assert_eq!(flat.doc_span(14), DocSpan { doc: 1, end: 15 });
    }

    #[test]
    fn test_doc_span_skips_empty_docs() {
        // An empty document in the middle owns no bytes; offsets after it
        // must map to the following document.
        let flat = FlattenedCorpus::flatten(["ab", "", "cd"]);
        assert_eq!(flat.doc_span(1).doc, 0);
        assert_eq!(flat.doc_span(2).doc, 2);
    }

    #[test]
    fn test_from_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "http://espn.com\nhttp://google.com\n").unwrap();

        let corpus = Corpus::from_lines(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0), b"http://espn.com");
        assert_eq!(corpus.get(1), b"http://google.com");
    }

    #[test]
    fn test_from_lines_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let corpus = Corpus::from_lines(file.path()).unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_from_dir_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a.txt"), "first").unwrap();
        std::fs::write(dir.path().join("empty.txt"), "").unwrap();

        let corpus = Corpus::from_dir(dir.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0), b"first");
        assert_eq!(corpus.get(1), b"second");
    }
}
