use thiserror::Error;

use crate::{layout::LayoutError, reader::ReaderError};

/// Malformed data found while decoding a MIDI file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Chunk framing errors
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// Header chunk errors
    #[error("Header: {0}")]
    Header(#[from] HeaderError),
    /// Timecode errors
    #[error("SMPTE: {0}")]
    Smpte(#[from] SmpteError),
    /// A data byte had its leading bit set
    #[error("Invalid data byte {0:#04X}, expected a value below 0x80")]
    InvalidDataByte(u8),
    /// A data byte appeared where a status byte was required and no
    /// channel status was available for reuse.
    #[error("Data byte found without a running status")]
    MissingRunningStatus,
    /// A system status byte that cannot appear in a track
    #[error("Invalid status byte {0:#04X}")]
    InvalidStatus(u8),
    /// A channel status whose message type is not known
    #[error("Unknown channel message type {0:#03X}")]
    UnknownChannelMessage(u8),
}

/// Errors related to chunk framing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The file has no header chunk
    #[error("No header chunk found")]
    MissingHeader,
    /// The file contained two header chunks
    #[error("Found more than one header chunk")]
    DuplicateHeader,
    /// A chunk declared more bytes than the buffer holds
    #[error("Chunk declares {declared} bytes but only {available} remain")]
    LengthOverrun {
        /// declared payload length
        declared: u32,
        /// bytes left in the buffer
        available: usize,
    },
}

/// Errors in the header payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The header payload was shorter than six bytes
    #[error("Header payload is {0} bytes, expected at least 6")]
    Length(u32),
    /// The format field was not 0, 1 or 2
    #[error("Unknown file format {0}")]
    InvalidFormat(u16),
    /// Metrical timing with zero pulses per quarter note
    #[error("Pulses per quarter note must be non-zero")]
    ZeroDivision,
}

/// Errors in SMPTE timecode values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SmpteError {
    /// Frame rate other than -24, -25, -29 or -30
    #[error("Invalid frame rate {0} in header")]
    HeaderFrameTime(i8),
    /// Zero sub-frame resolution
    #[error("Sub-frame resolution must be non-zero")]
    ZeroResolution,
}

/// Every error the pipeline can produce.
///
/// All of these are recoverable: callers are expected to report them and
/// carry on with different input.
#[derive(Debug, Error)]
pub enum Error {
    /// The byte buffer could not be decoded
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// The decoded notes could not be laid out
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Result alias over [`enum@Error`]
pub type Result<T> = core::result::Result<T, Error>;
