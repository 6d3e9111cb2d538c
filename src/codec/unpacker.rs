//! Token stream replayer
//!
//! Rebuilds a document by applying literals and back-references against
//! the logical window {dictionary ++ output-so-far}. A malformed token -
//! zero length, non-negative offset, or a reach before the start of the
//! dictionary - is a corruption error, never silently clamped: clamping
//! would mask encoder/decoder protocol drift with wrong output bytes.

use super::token::TokenSink;
use anyhow::{Result, bail};

/// Per-document decoder state.
///
/// Implements [`TokenSink`] so the packer (or a deserialized token
/// stream) can drive it directly. One unpacker decodes one document at a
/// time; [`take_document`](Self::take_document) yields the finished bytes
/// and resets for the next document.
#[derive(Debug)]
pub struct SubstringUnpacker<'a> {
    dictionary: &'a [u8],
    out: Vec<u8>,
}

impl<'a> SubstringUnpacker<'a> {
    pub fn new(dictionary: &'a [u8]) -> Self {
        Self {
            dictionary,
            out: Vec::with_capacity(1024),
        }
    }

    /// The document accumulated since the last call; resets the buffer
    pub fn take_document(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out)
    }
}

impl TokenSink for SubstringUnpacker<'_> {
    fn literal(&mut self, byte: u8) -> Result<()> {
        self.out.push(byte);
        Ok(())
    }

    fn substring(&mut self, offset: i32, length: u32) -> Result<()> {
        if length == 0 {
            bail!("corrupt token stream: zero-length match");
        }
        if offset >= 0 {
            bail!("corrupt token stream: non-negative match offset {offset}");
        }

        let dict_len = self.dictionary.len();
        let current = self.out.len();
        let length = length as usize;
        let source = current as i64 + offset as i64;

        if source < 0 {
            // The match starts in the dictionary, which logically precedes
            // the document's own output.
            let Some(dict_start) = (source + dict_len as i64).try_into().ok().filter(|&s: &usize| s < dict_len)
            else {
                bail!(
                    "corrupt token stream: offset {offset} reaches before the dictionary \
                     (output length {current}, dictionary length {dict_len})"
                );
            };

            // A long enough match runs off the end of the dictionary and
            // continues from the start of the document's own output.
            let dict_end = dict_len.min(dict_start + length);
            self.out.extend_from_slice(&self.dictionary[dict_start..dict_end]);

            let spill = length - (dict_end - dict_start);
            for i in 0..spill {
                if i >= self.out.len() {
                    bail!("corrupt token stream: match of length {length} overruns the output");
                }
                let byte = self.out[i];
                self.out.push(byte);
            }
        } else {
            // Entirely within already-emitted output. Copy byte by byte:
            // when length exceeds the offset magnitude the source overlaps
            // the bytes being appended (run-length patterns).
            let source = source as usize;
            for i in source..source + length {
                let byte = self.out[i];
                self.out.push(byte);
            }
        }

        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        Ok(())
    }
}
