use crate::{ChunkError, ParseError};
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while decoding bytes into a [`MidiFile`](crate::file::MidiFile)
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Reading at position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderErrorKind {
    /// Parsing errors
    #[error("parsing {0}")]
    ParseError(#[from] ParseError),
    /// Reading out of bounds.
    #[error("read out of bounds")]
    OutOfBounds,
    /// Valid MIDI that this decoder refuses to handle.
    #[error("not implemented: {0}")]
    NotImplemented(Unsupported),
}

/// Constructs the decoder rejects rather than skipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unsupported {
    /// `0xF0` or `0xF7` events
    #[error("system exclusive event (status {0:#04X})")]
    SysEx(u8),
}

impl ReaderErrorKind {
    pub(crate) const fn chunk(chunk_err: ChunkError) -> Self {
        Self::ParseError(ParseError::Chunk(chunk_err))
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if out of bounds or unexpected end of file
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::OutOfBounds)
    }
    /// True for truncated or invalid data.
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self.kind,
            ReaderErrorKind::OutOfBounds | ReaderErrorKind::ParseError(_)
        )
    }
    /// True when the file used a construct the decoder does not support.
    pub const fn is_not_implemented(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::NotImplemented(_))
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new invalid data error
    pub const fn parse_error(position: usize, error: ParseError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::ParseError(error),
        }
    }

    /// Create a new out of bounds error
    pub const fn oob(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::OutOfBounds,
        }
    }

    /// Create a new unsupported construct error
    pub const fn not_implemented(position: usize, what: Unsupported) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::NotImplemented(what),
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
