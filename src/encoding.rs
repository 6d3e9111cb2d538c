//! Wire formats
//!
//! Three small formats live here:
//!
//! - LEB128-style varints, used by the token serialization
//! - the flat token stream: tag byte `0` + literal byte, or tag byte `1` +
//!   varint(offset magnitude) + varint(length). This is the stand-in for a
//!   real entropy coder at the token boundary - the codec only requires
//!   that literals and matches round-trip as distinguishable symbols.
//! - the dictionary blob: a 4-byte little-endian signed length (`-1`
//!   meaning "no dictionary", otherwise a non-negative byte count)
//!   followed by that many raw bytes.

use crate::codec::{Token, TokenSink};
use anyhow::{Context, Result, bail};
use std::io::{Read, Write};

const TAG_LITERAL: u8 = 0;
const TAG_MATCH: u8 = 1;

/// Append `value` as a varint, 7 bits per byte, low bits first
pub fn encode_varint(mut value: u32, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push(value as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Decode a varint from the front of `buf`, returning the value and the
/// number of bytes consumed
pub fn decode_varint(buf: &[u8]) -> Result<(u32, usize)> {
    let mut value = 0u32;
    for (i, &byte) in buf.iter().enumerate() {
        if i == 5 {
            bail!("varint longer than 5 bytes");
        }
        value |= ((byte & 0x7f) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    bail!("truncated varint");
}

/// Serialize a token stream into `out`
pub fn write_tokens(tokens: &[Token], out: &mut Vec<u8>) {
    for token in tokens {
        match *token {
            Token::Literal(byte) => {
                out.push(TAG_LITERAL);
                out.push(byte);
            }
            Token::Match { offset, length } => {
                out.push(TAG_MATCH);
                // Offsets are always negative; store the magnitude.
                encode_varint(offset.unsigned_abs(), out);
                encode_varint(length, out);
            }
        }
    }
}

/// Deserialize a token stream, driving each token into `sink` and
/// finishing with `end_document`
pub fn replay_tokens<S: TokenSink>(buf: &[u8], sink: &mut S) -> Result<()> {
    let mut pos = 0usize;
    while pos < buf.len() {
        match buf[pos] {
            TAG_LITERAL => {
                let Some(&byte) = buf.get(pos + 1) else {
                    bail!("truncated token stream: literal tag without byte");
                };
                sink.literal(byte)?;
                pos += 2;
            }
            TAG_MATCH => {
                pos += 1;
                let (magnitude, used) = decode_varint(&buf[pos..])
                    .context("truncated token stream: match offset")?;
                pos += used;
                let (length, used) = decode_varint(&buf[pos..])
                    .context("truncated token stream: match length")?;
                pos += used;
                if magnitude > i32::MAX as u32 {
                    bail!("corrupt token stream: offset magnitude {magnitude} out of range");
                }
                sink.substring(-(magnitude as i32), length)?;
            }
            tag => bail!("corrupt token stream: unknown tag {tag}"),
        }
    }
    sink.end_document()
}

/// Write a dictionary blob: signed length then raw bytes
pub fn write_dictionary<W: Write>(out: &mut W, dictionary: Option<&[u8]>) -> Result<()> {
    match dictionary {
        None => out.write_all(&(-1i32).to_le_bytes())?,
        Some(dict) => {
            let length =
                i32::try_from(dict.len()).context("dictionary exceeds 2 GiB length field")?;
            out.write_all(&length.to_le_bytes())?;
            out.write_all(dict)?;
        }
    }
    Ok(())
}

/// Read a dictionary blob. A declared length that cannot be fully read is
/// a fatal format error.
pub fn read_dictionary<R: Read>(input: &mut R) -> Result<Option<Vec<u8>>> {
    let mut length_bytes = [0u8; 4];
    input
        .read_exact(&mut length_bytes)
        .context("bad dictionary blob: missing length field")?;
    let length = i32::from_le_bytes(length_bytes);

    if length == -1 {
        return Ok(None);
    }
    if length < 0 {
        bail!("bad dictionary blob: invalid length {length}");
    }

    let mut dictionary = vec![0u8; length as usize];
    input.read_exact(&mut dictionary).with_context(|| {
        format!("bad dictionary blob: could not read dictionary of length {length}")
    })?;
    Ok(Some(dictionary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TokenBuffer;
    use std::io::Cursor;

    #[test]
    fn test_varint_round_trip() {
        let mut buf = Vec::new();
        for value in [0u32, 1, 0x7f, 0x80, 0x3fff, 0x4000, 65535, u32::MAX] {
            buf.clear();
            encode_varint(value, &mut buf);
            assert_eq!(decode_varint(&buf).unwrap(), (value, buf.len()));
        }
    }

    #[test]
    fn test_varint_sizes() {
        let mut buf = Vec::new();
        encode_varint(0x7f, &mut buf);
        assert_eq!(buf.len(), 1);
        buf.clear();
        encode_varint(0x80, &mut buf);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_varint_truncated() {
        assert!(decode_varint(&[0x80]).is_err());
        assert!(decode_varint(&[]).is_err());
    }

    #[test]
    fn test_token_round_trip() {
        let tokens = vec![
            Token::Literal(b'a'),
            Token::Match { offset: -2, length: 8 },
            Token::Literal(0xff),
            Token::Match { offset: -65535, length: 255 },
        ];
        let mut wire = Vec::new();
        write_tokens(&tokens, &mut wire);

        let mut replayed = TokenBuffer::new();
        replay_tokens(&wire, &mut replayed).unwrap();
        assert_eq!(replayed.tokens(), tokens.as_slice());
    }

    #[test]
    fn test_replay_rejects_unknown_tag() {
        let mut sink = TokenBuffer::new();
        assert!(replay_tokens(&[7], &mut sink).is_err());
    }

    #[test]
    fn test_replay_rejects_truncation() {
        let mut wire = Vec::new();
        write_tokens(&[Token::Match { offset: -300, length: 20 }], &mut wire);
        wire.pop();
        let mut sink = TokenBuffer::new();
        assert!(replay_tokens(&wire, &mut sink).is_err());
    }

    #[test]
    fn test_dictionary_blob_round_trip() {
        let mut blob = Vec::new();
        write_dictionary(&mut blob, Some(b"toubassi")).unwrap();
        let read = read_dictionary(&mut Cursor::new(&blob)).unwrap();
        assert_eq!(read.as_deref(), Some(b"toubassi".as_slice()));
    }

    #[test]
    fn test_dictionary_blob_none() {
        let mut blob = Vec::new();
        write_dictionary(&mut blob, None).unwrap();
        assert_eq!(blob, (-1i32).to_le_bytes());
        assert_eq!(read_dictionary(&mut Cursor::new(&blob)).unwrap(), None);
    }

    #[test]
    fn test_dictionary_blob_short_body_is_fatal() {
        let mut blob = Vec::new();
        write_dictionary(&mut blob, Some(b"toubassi")).unwrap();
        blob.truncate(blob.len() - 3);
        let err = read_dictionary(&mut Cursor::new(&blob)).unwrap_err();
        assert!(err.to_string().contains("bad dictionary blob"));
    }

    #[test]
    fn test_dictionary_blob_negative_length_is_fatal() {
        let blob = (-2i32).to_le_bytes();
        assert!(read_dictionary(&mut Cursor::new(&blob)).is_err());
    }
}
