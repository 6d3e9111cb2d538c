//! Token stream types
//!
//! The packer emits and the unpacker consumes a stream of literals and
//! back-references through the [`TokenSink`] trait. Offsets are negative
//! and relative to the current write position in the logical window
//! {dictionary ++ output-so-far}; a magnitude larger than the bytes
//! already emitted for the document reaches into the dictionary.

use anyhow::Result;

/// One element of the substring codec's token protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A single raw byte
    Literal(u8),
    /// Copy `length` bytes starting `offset` positions back (offset < 0)
    Match { offset: i32, length: u32 },
}

/// Consumer boundary for the token stream.
///
/// The unpacker implements this to replay tokens; an entropy coder would
/// implement it to serialize them. Any per-stream bookkeeping (usage
/// counters, output buffers) lives in the sink itself. Sinks may fail,
/// which aborts the stream.
pub trait TokenSink {
    fn literal(&mut self, byte: u8) -> Result<()>;
    fn substring(&mut self, offset: i32, length: u32) -> Result<()>;
    /// Marks the end of one document's stream
    fn end_document(&mut self) -> Result<()>;
}

/// A sink that records the raw token stream
#[derive(Debug, Default)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl TokenSink for TokenBuffer {
    fn literal(&mut self, byte: u8) -> Result<()> {
        self.tokens.push(Token::Literal(byte));
        Ok(())
    }

    fn substring(&mut self, offset: i32, length: u32) -> Result<()> {
        self.tokens.push(Token::Match { offset, length });
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        Ok(())
    }
}
