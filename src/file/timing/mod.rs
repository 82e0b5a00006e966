mod smpte;
pub use smpte::*;

use crate::{HeaderError, ParseError, SmpteError, message::Tempo};

/// The header timing type.
///
/// Bit 15 of the division field selects between a tick rate per quarter note
/// (metrical) and frames per second with sub-frame resolution (timecode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Timing {
    /// The midi file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(TicksPerQuarterNote),

    /// The midi file's delta times are defined using an SMPTE frame rate
    Smpte(SmpteHeader),
}

impl Timing {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// The leading bit of the u16 is disregarded, so 1-32767
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self::TicksPerQuarterNote(TicksPerQuarterNote(tpqn & 0x7FFF))
    }

    /// Define the timing in terms of fps and sub-frame resolution
    pub const fn new_smpte(fps: SmpteFps, ticks_per_frame: u8) -> Self {
        Self::Smpte(SmpteHeader {
            fps,
            ticks_per_frame,
        })
    }

    /// Decode the raw 16 bit division field of a header.
    pub fn from_division(raw: u16) -> Result<Self, ParseError> {
        let [msb, lsb] = raw.to_be_bytes();
        match msb >> 7 {
            0 => {
                let timing = Self::new_ticks_per_quarter_note(raw);
                if timing.ticks_per_quarter_note() == Some(0) {
                    return Err(HeaderError::ZeroDivision.into());
                }
                Ok(timing)
            }
            _ => Ok(Self::Smpte(SmpteHeader::new([msb, lsb])?)),
        }
    }

    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(t.ticks_per_quarter_note()),
            _ => None,
        }
    }

    /// Wall-clock length of one tick.
    ///
    /// Metrical timing scales with `tempo`; timecode timing ignores it.
    pub fn seconds_per_tick(&self, tempo: Tempo) -> f64 {
        match self {
            // seconds/quarter note * quarter notes/tick
            Self::TicksPerQuarterNote(tpqn) => {
                tempo.seconds_per_quarter_note() / tpqn.ticks_per_quarter_note() as f64
            }
            Self::Smpte(smpte) => {
                let ticks_per_second =
                    smpte.fps().as_division() as u32 * smpte.ticks_per_frame() as u32;
                1. / ticks_per_second as f64
            }
        }
    }
}

/// A representation of the `tpqn` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TicksPerQuarterNote(u16);

impl TicksPerQuarterNote {
    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.0
    }
}

/// A representation of the `smpte` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SmpteHeader {
    pub(crate) fps: SmpteFps,
    pub(crate) ticks_per_frame: u8,
}

impl SmpteHeader {
    fn new(bytes: [u8; 2]) -> Result<Self, SmpteError> {
        //first bit is known to be 1 when calling this
        //Bits 14 thru 8 contain one of the four values -24, -25, -29, or -30
        let byte = bytes[0] as i8;

        let fps = match byte {
            -24 => SmpteFps::TwentyFour,
            -25 => SmpteFps::TwentyFive,
            -29 => SmpteFps::TwentyNine,
            -30 => SmpteFps::Thirty,
            _ => return Err(SmpteError::HeaderFrameTime(byte)),
        };
        if bytes[1] == 0 {
            return Err(SmpteError::ZeroResolution);
        }
        Ok(Self {
            fps,
            ticks_per_frame: bytes[1],
        })
    }

    /// Returns the frames per second
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Returns the sub-frame resolution
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }
}

#[test]
fn metrical_division() {
    let timing = Timing::from_division(0x00C0).unwrap();
    assert_eq!(timing.ticks_per_quarter_note(), Some(192));
    // 120 bpm, 192 ppqn
    let spt = timing.seconds_per_tick(Tempo::default());
    assert!((spt * 192. - 0.5).abs() < 1e-12);
}

#[test]
fn timecode_division() {
    use pretty_assertions::assert_eq;
    // 25 fps, 40 sub-frames: one millisecond per tick
    let timing = Timing::from_division(0xE728).unwrap();
    assert_eq!(timing, Timing::new_smpte(SmpteFps::TwentyFive, 40));
    assert_eq!(timing.ticks_per_quarter_note(), None);
    let spt = timing.seconds_per_tick(Tempo::new(1_000_000));
    assert!((spt - 0.001).abs() < 1e-12);

    assert_eq!(
        Timing::from_division(0xE804).unwrap(),
        Timing::new_smpte(SmpteFps::TwentyFour, 4)
    );
    assert_eq!(
        Timing::from_division(0xE350).unwrap(),
        Timing::new_smpte(SmpteFps::TwentyNine, 80)
    );
    assert_eq!(
        Timing::from_division(0xE264).unwrap(),
        Timing::new_smpte(SmpteFps::Thirty, 100)
    );
}

#[test]
fn invalid_divisions() {
    assert_eq!(
        Timing::from_division(0x0000),
        Err(ParseError::Header(HeaderError::ZeroDivision))
    );
    assert_eq!(
        Timing::from_division(0xE628),
        Err(ParseError::Smpte(SmpteError::HeaderFrameTime(-26)))
    );
    assert_eq!(
        Timing::from_division(0xE700),
        Err(ParseError::Smpte(SmpteError::ZeroResolution))
    );
}
