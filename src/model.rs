//! Compression model variants and persistence
//!
//! A closed set of strategies behind one enum: `Noop` passes bytes through
//! untouched (the baseline any dictionary model has to beat), `Substring`
//! runs the substring codec against a shared dictionary. Models own no
//! mutable state; `compress` and `decompress` take `&self`, so one model
//! can serve many documents concurrently.

use crate::codec::{SubstringPacker, SubstringUnpacker, TokenBuffer};
use crate::corpus::Corpus;
use crate::dict::DictionaryOptimizer;
use crate::encoding;
use anyhow::Result;
use std::io::{Read, Write};

/// Which compression strategy to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVariant {
    /// Store documents unmodified
    Noop,
    /// Shared-dictionary substring codec
    Substring,
}

/// A ready-to-use compression strategy
#[derive(Debug)]
pub enum CompressionModel {
    Noop,
    Substring(SubstringModel),
}

impl CompressionModel {
    /// Build a model for `variant`, training a dictionary of at most
    /// `dictionary_length` bytes from `corpus` when the variant needs one.
    pub fn build(variant: ModelVariant, corpus: &Corpus, dictionary_length: usize) -> Result<Self> {
        Ok(match variant {
            ModelVariant::Noop => Self::Noop,
            ModelVariant::Substring => {
                let dictionary = DictionaryOptimizer::new(corpus).optimize(dictionary_length);
                Self::Substring(SubstringModel::new(dictionary))
            }
        })
    }

    /// Wrap an already-built dictionary. `None` (a `-1` length on disk)
    /// means a substring model with an empty dictionary: documents can
    /// still back-reference their own output.
    pub fn with_dictionary(dictionary: Option<Vec<u8>>) -> Self {
        Self::Substring(SubstringModel::new(dictionary.unwrap_or_default()))
    }

    pub fn compress(&self, doc: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Noop => Ok(doc.to_vec()),
            Self::Substring(model) => model.compress(doc),
        }
    }

    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Noop => Ok(data.to_vec()),
            Self::Substring(model) => model.decompress(data),
        }
    }

    /// Persist the model. `Noop` has nothing to save.
    pub fn save<W: Write>(&self, out: &mut W) -> Result<()> {
        match self {
            Self::Noop => Ok(()),
            Self::Substring(model) => encoding::write_dictionary(out, Some(model.dictionary())),
        }
    }

    /// Load a substring model from a persisted dictionary blob
    pub fn load<R: Read>(input: &mut R) -> Result<Self> {
        let dictionary = encoding::read_dictionary(input)?;
        Ok(Self::with_dictionary(dictionary))
    }
}

/// The substring-codec model: a trained dictionary plus its prefix hash
#[derive(Debug)]
pub struct SubstringModel {
    packer: SubstringPacker,
}

impl SubstringModel {
    pub fn new(dictionary: Vec<u8>) -> Self {
        Self {
            packer: SubstringPacker::new(dictionary),
        }
    }

    pub fn dictionary(&self) -> &[u8] {
        self.packer.dictionary()
    }

    /// Encode one document to the flat token wire format
    pub fn compress(&self, doc: &[u8]) -> Result<Vec<u8>> {
        let mut tokens = TokenBuffer::new();
        self.packer.pack(doc, &mut tokens)?;

        let mut out = Vec::with_capacity(doc.len() / 2 + 16);
        encoding::write_tokens(tokens.tokens(), &mut out);
        Ok(out)
    }

    /// Decode one document from the flat token wire format
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut unpacker = SubstringUnpacker::new(self.packer.dictionary());
        encoding::replay_tokens(data, &mut unpacker)?;
        Ok(unpacker.take_document())
    }
}
