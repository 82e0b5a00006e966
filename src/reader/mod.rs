#![doc = r#"
Byte-level decoding of the Standard MIDI File container.

The [`Reader`] walks an immutable byte slice front to back. Every read is bounds
checked, and failures carry the absolute offset into the original buffer so a
bad track can be located in a hex dump.
"#]

mod error;
pub use error::*;

use crate::{
    ChunkError,
    file::{ChunkKind, RawChunk},
};

/// A cursor over a MIDI byte buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
    /// offset of `data[0]` in the original buffer
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Read from the start of a byte slice.
    pub const fn from_byte_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            offset: 0,
        }
    }

    /// Read a sub-slice whose first byte sits at `offset` in a larger buffer.
    ///
    /// Only affects the positions reported in errors.
    pub const fn with_offset(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            position: 0,
            offset,
        }
    }

    /// Absolute position of the next byte to read.
    pub const fn buffer_position(&self) -> usize {
        self.offset + self.position
    }

    /// Number of unread bytes.
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True once every byte has been consumed.
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = *self
            .data
            .get(self.position)
            .ok_or_else(|| ReaderError::oob(self.buffer_position()))?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads `len` bytes, borrowing from the underlying buffer.
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| ReaderError::oob(self.buffer_position()))?;
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Reads exactly `N` bytes into an array.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.read_slice(N)?;
        let mut bytes = [0; N];
        bytes.copy_from_slice(slice);
        Ok(bytes)
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Reads a variable-length quantity.
    ///
    /// Each byte contributes its low seven bits, most significant group first.
    /// A set top bit means another byte follows. The sequence length is only
    /// bounded by the buffer; bits beyond 32 are shifted out.
    pub fn read_varlen(&mut self) -> ReadResult<u32> {
        let mut value: u32 = 0;
        loop {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
    }

    /// Reads the next chunk, or `None` once the buffer is exhausted.
    ///
    /// A chunk is a four byte ASCII tag, a big-endian `u32` length and that
    /// many payload bytes.
    pub fn read_chunk(&mut self) -> ReadResult<Option<RawChunk<'a>>> {
        if self.is_at_end() {
            return Ok(None);
        }
        let start = self.buffer_position();
        let tag: [u8; 4] = self.read_exact_size()?;
        let declared = self.read_u32_be()?;
        let payload_offset = self.buffer_position();

        let available = self.remaining();
        if declared as usize > available {
            return Err(ReaderError::new(
                start,
                ReaderErrorKind::chunk(ChunkError::LengthOverrun {
                    declared,
                    available,
                }),
            ));
        }
        let data = self.read_slice(declared as usize)?;

        Ok(Some(RawChunk::new(
            ChunkKind::from_tag(tag),
            data,
            payload_offset,
        )))
    }
}

#[test]
fn varlen_examples() {
    use pretty_assertions::assert_eq;
    let cases: [(&[u8], u32); 6] = [
        (&[0x00], 0),
        (&[0x7F], 0x7F),
        (&[0x81, 0x00], 0x80),
        (&[0x81, 0x80, 0x00], 0x4000),
        (&[0xBC, 0x00], 7680),
        (&[0xFF, 0xFF, 0xFF, 0x7F], 0x0FFF_FFFF),
    ];
    for (bytes, expected) in cases {
        let mut reader = Reader::from_byte_slice(bytes);
        assert_eq!(reader.read_varlen().unwrap(), expected);
        assert!(reader.is_at_end());
    }
}

#[test]
fn varlen_truncated() {
    let mut reader = Reader::from_byte_slice(&[0x81, 0x80]);
    let err = reader.read_varlen().unwrap_err();
    assert!(err.is_out_of_bounds());
    assert_eq!(err.position(), 2);
}

#[test]
fn offset_is_reported_in_errors() {
    let mut reader = Reader::with_offset(&[0x01], 40);
    reader.read_u8().unwrap();
    assert_eq!(reader.read_u8().unwrap_err().position(), 41);
}

#[test]
fn chunk_overrun() {
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 9, 0x00, 0xFF];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = reader.read_chunk().unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::chunk(ChunkError::LengthOverrun {
            declared: 9,
            available: 2
        })
    );
}

#[test]
fn chunk_header_truncated() {
    let bytes = [b'M', b'T', b'h'];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert!(reader.read_chunk().unwrap_err().is_out_of_bounds());
}
