#![doc = r#"
Rusty representation of a [`MidiFile`]
"#]

mod chunk;
pub use chunk::*;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod tempo;
pub use tempo::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use log::debug;

use crate::{
    ChunkError,
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
};

#[doc = r#"
A decoded Standard MIDI File: one header and its tracks, in file order.

Unknown chunks are skipped. The declared track count is informational only;
the tracks are whatever `MTrk` chunks the file contains.

# Example
```rust
# use musicbox_svg::prelude::*;
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00,
];
let file = MidiFile::parse(&bytes).unwrap();
assert_eq!(file.header().format(), FormatType::SingleMultiChannel);
assert_eq!(file.tracks().len(), 1);
```
"#]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MidiFile {
    header: MidiFileHeader,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Parse a set of bytes into a file struct
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut header = None;
        let mut track_chunks = Vec::new();

        while let Some(chunk) = reader.read_chunk()? {
            match chunk.kind() {
                ChunkKind::Header => {
                    if header.is_some() {
                        return Err(ReaderError::new(
                            chunk.offset(),
                            ReaderErrorKind::chunk(ChunkError::DuplicateHeader),
                        ));
                    }
                    header = Some(MidiFileHeader::parse(chunk.data(), chunk.offset())?);
                }
                ChunkKind::Track => track_chunks.push(chunk),
                ChunkKind::Unknown(tag) => debug!(
                    "skipping unknown chunk {:?} ({} bytes)",
                    String::from_utf8_lossy(&tag),
                    chunk.len()
                ),
            }
        }

        let header = header.ok_or(ReaderError::new(
            0,
            ReaderErrorKind::chunk(ChunkError::MissingHeader),
        ))?;
        let timing = header.timing();

        let mut tracks = Vec::with_capacity(track_chunks.len());
        let mut tempo_map = None;
        for chunk in &track_chunks {
            let track = Track::decode(chunk.data(), chunk.offset(), timing, tempo_map.as_ref())?;
            if tracks.is_empty() && header.format() == FormatType::Simultaneous {
                tempo_map = Some(TempoMap::from_track(&track));
            }
            tracks.push(track);
        }
        debug!(
            "decoded {} tracks ({} declared)",
            tracks.len(),
            header.num_tracks()
        );

        Ok(Self { header, tracks })
    }

    /// Returns header info
    pub fn header(&self) -> &MidiFileHeader {
        &self.header
    }

    /// Returns header timing
    pub fn timing(&self) -> &Timing {
        self.header.timing()
    }

    /// Returns the track list
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the track holding the music, see [`FormatType::music_track_index`].
    pub fn music_track_index(&self) -> usize {
        self.header.format().music_track_index()
    }

    /// The track holding the music, if the file has it.
    pub fn music_track(&self) -> Option<&Track> {
        self.tracks.get(self.music_track_index())
    }

    /// Time of the latest event in any track
    pub fn duration_seconds(&self) -> f64 {
        self.tracks
            .iter()
            .map(Track::duration_seconds)
            .fold(0., f64::max)
    }
}
