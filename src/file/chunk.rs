#![doc = r#"
Contains types for MIDI file chunks

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then the chunk data.

- `MThd` - the header chunk, holding the format, track count and timing division.
  See [`MidiFileHeader`](crate::file::MidiFileHeader).
- `MTrk` - a track chunk, holding delta-timed events. See [`Track`](crate::file::Track).

Any other identifier is an unknown chunk. Unknown chunks are skipped by their declared
length so that files carrying proprietary or future chunk types still decode.

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
...
[Track Chunk N: "MTrk"]
[Optional Unknown Chunks]
```
"#]

/// The type of a chunk, identified by its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// `MThd`
    Header,
    /// `MTrk`
    Track,
    /// Anything else, with the original tag
    Unknown([u8; 4]),
}

impl ChunkKind {
    /// Identify a chunk from its four byte tag.
    pub fn from_tag(tag: [u8; 4]) -> Self {
        match &tag {
            b"MThd" => Self::Header,
            b"MTrk" => Self::Track,
            _ => Self::Unknown(tag),
        }
    }
}

/// A chunk whose payload has not been interpreted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    kind: ChunkKind,
    data: &'a [u8],
    offset: usize,
}

impl<'a> RawChunk<'a> {
    pub(crate) const fn new(kind: ChunkKind, data: &'a [u8], offset: usize) -> Self {
        Self { kind, data, offset }
    }
    /// The chunk's type
    pub const fn kind(&self) -> ChunkKind {
        self.kind
    }
    /// The chunk's payload, excluding the 8 byte chunk header
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }
    /// Declared payload length
    pub const fn len(&self) -> usize {
        self.data.len()
    }
    /// True for a zero-length payload
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Position of the first payload byte in the file
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

/// Splits a buffer into its chunks, in file order.
///
/// Unknown chunks are included; [`MidiFile::parse`](crate::file::MidiFile::parse)
/// is where they get skipped.
pub fn read_chunks(bytes: &[u8]) -> crate::reader::ReadResult<Vec<RawChunk<'_>>> {
    let mut reader = crate::reader::Reader::from_byte_slice(bytes);
    let mut chunks = Vec::new();
    while let Some(chunk) = reader.read_chunk()? {
        chunks.push(chunk);
    }
    Ok(chunks)
}

#[test]
fn read_chunks_in_order() {
    use pretty_assertions::assert_eq;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd\0\0\0\x06\0\0\0\x01\0\x60");
    bytes.extend_from_slice(b"XFIH\0\0\0\x02\xAA\xBB");
    bytes.extend_from_slice(b"MTrk\0\0\0\x04\0\xFF\x2F\0");

    let chunks = read_chunks(&bytes).unwrap();
    let kinds: Vec<_> = chunks.iter().map(RawChunk::kind).collect();
    assert_eq!(
        kinds,
        [
            ChunkKind::Header,
            ChunkKind::Unknown(*b"XFIH"),
            ChunkKind::Track
        ]
    );
    assert_eq!(chunks[1].data(), &[0xAA, 0xBB]);
    assert_eq!(chunks[2].offset(), 32);
}
