use crate::{
    HeaderError, ParseError,
    file::{FormatType, Timing},
    reader::{ReadResult, Reader, ReaderError},
};

#[doc = r#"
The decoded `MThd` payload.

Three big-endian 16 bit fields: format, declared track count and timing division.
Payloads longer than six bytes are accepted and the extra bytes ignored.
The declared track count is not checked against the number of track chunks.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MidiFileHeader {
    format: FormatType,
    num_tracks: u16,
    timing: Timing,
    #[cfg_attr(feature = "serde", serde(skip))]
    raw_division: u16,
}

impl MidiFileHeader {
    /// Create a new header
    pub const fn new(format: FormatType, num_tracks: u16, timing: Timing) -> Self {
        let raw_division = match timing {
            Timing::TicksPerQuarterNote(t) => t.ticks_per_quarter_note(),
            Timing::Smpte(s) => {
                u16::from_be_bytes([(-(s.fps().frames_per_second() as i8)) as u8, s.ticks_per_frame()])
            }
        };
        Self {
            format,
            num_tracks,
            timing,
            raw_division,
        }
    }

    /// Decode a header chunk payload. `offset` is the payload's position in the file.
    pub fn parse(data: &[u8], offset: usize) -> ReadResult<Self> {
        if data.len() < 6 {
            return Err(ReaderError::parse_error(
                offset,
                HeaderError::Length(data.len() as u32).into(),
            ));
        }
        let mut reader = Reader::with_offset(data, offset);
        let format = reader.read_u16_be()?;
        let num_tracks = reader.read_u16_be()?;
        let raw_division = reader.read_u16_be()?;

        let format = FormatType::try_from(format).map_err(|e| {
            ReaderError::parse_error(offset, HeaderError::InvalidFormat(e.number).into())
        })?;
        let timing = Timing::from_division(raw_division)
            .map_err(|e: ParseError| ReaderError::parse_error(offset + 4, e))?;

        Ok(Self {
            format,
            num_tracks,
            timing,
            raw_division,
        })
    }

    /// The file format
    pub const fn format(&self) -> FormatType {
        self.format
    }
    /// Track count as declared by the header
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }
    /// Get the timing props
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }
    /// The undecoded division field
    pub const fn raw_division(&self) -> u16 {
        self.raw_division
    }
}

#[test]
fn parse_metrical_header() {
    use pretty_assertions::assert_eq;
    let header = MidiFileHeader::parse(&[0x00, 0x01, 0x00, 0x02, 0x00, 0xC0], 8).unwrap();
    assert_eq!(
        header,
        MidiFileHeader::new(
            FormatType::Simultaneous,
            2,
            Timing::new_ticks_per_quarter_note(192)
        )
    );
    assert_eq!(header.raw_division(), 0x00C0);
}

#[test]
fn parse_timecode_header() {
    use crate::file::SmpteFps;
    let header = MidiFileHeader::parse(&[0x00, 0x00, 0x00, 0x01, 0xE7, 0x28], 8).unwrap();
    assert_eq!(header.format(), FormatType::SingleMultiChannel);
    assert_eq!(header.timing(), &Timing::new_smpte(SmpteFps::TwentyFive, 40));
    assert_eq!(header.raw_division(), 0xE728);
}

#[test]
fn short_or_invalid_header() {
    let err = MidiFileHeader::parse(&[0x00, 0x01, 0x00], 8).unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.position(), 8);

    let err = MidiFileHeader::parse(&[0x00, 0x03, 0x00, 0x01, 0x00, 0x60], 8).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &crate::reader::ReaderErrorKind::ParseError(HeaderError::InvalidFormat(3).into())
    );
}
