use num_enum::{FromPrimitive, IntoPrimitive};

/// The type byte following `0xFF` in a meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MetaType {
    SequenceNumber = 0x00,
    Text = 0x01,
    Copyright = 0x02,
    TrackName = 0x03,
    InstrumentName = 0x04,
    Lyric = 0x05,
    Marker = 0x06,
    CuePoint = 0x07,
    ChannelPrefix = 0x20,
    MidiPort = 0x21,
    EndOfTrack = 0x2F,
    SetTempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
    /// Any type byte without a dedicated variant
    #[num_enum(catch_all)]
    Other(u8),
}

#[doc = r#"
A meta event: a type byte and an opaque payload.

Only [`MetaType::SetTempo`] and [`MetaType::EndOfTrack`] change how a track decodes;
the rest are kept verbatim.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MetaEvent {
    kind: MetaType,
    data: Vec<u8>,
}

impl MetaEvent {
    /// Create a meta event
    pub fn new(kind: MetaType, data: Vec<u8>) -> Self {
        Self { kind, data }
    }
    /// The meta type
    pub const fn kind(&self) -> MetaType {
        self.kind
    }
    /// The raw payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    /// The tempo carried by a well formed `SetTempo` event
    pub fn tempo(&self) -> Option<Tempo> {
        match (self.kind, self.data.as_slice()) {
            (MetaType::SetTempo, &[a, b, c]) => {
                Some(Tempo::new(u32::from_be_bytes([0, a, b, c])))
            }
            _ => None,
        }
    }
    /// True for a zero-length `EndOfTrack`
    pub fn is_end_of_track(&self) -> bool {
        self.kind == MetaType::EndOfTrack && self.data.is_empty()
    }
    /// The payload as text, for the text-like meta types
    pub fn text(&self) -> Option<String> {
        use MetaType::*;
        match self.kind {
            Text | Copyright | TrackName | InstrumentName | Lyric | Marker | CuePoint => Some(
                String::from_utf8_lossy(&self.data)
                    .trim_end_matches('\0')
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// Microseconds per quarter note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tempo(u32);

impl Tempo {
    /// 120 beats per minute
    pub const DEFAULT: Self = Self(500_000);

    /// Create a tempo from microseconds per quarter note
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note)
    }
    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }
    /// Seconds per quarter note
    pub fn seconds_per_quarter_note(&self) -> f64 {
        self.0 as f64 / 1_000_000.
    }
    /// Quarter notes per minute
    pub fn bpm(&self) -> f64 {
        60_000_000. / self.0 as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[test]
fn set_tempo_payload() {
    let meta = MetaEvent::new(MetaType::from(0x51u8), vec![0x07, 0xA1, 0x20]);
    assert_eq!(meta.kind(), MetaType::SetTempo);
    assert_eq!(meta.tempo(), Some(Tempo::DEFAULT));
    assert_eq!(meta.tempo().map(|t| t.bpm()), Some(120.));

    let short = MetaEvent::new(MetaType::SetTempo, vec![0x07, 0xA1]);
    assert_eq!(short.tempo(), None);
}

#[test]
fn meta_kinds() {
    assert!(MetaEvent::new(MetaType::from(0x2Fu8), Vec::new()).is_end_of_track());
    assert_eq!(MetaType::from(0x60u8), MetaType::Other(0x60));
    assert_eq!(u8::from(MetaType::Other(0x60)), 0x60);
    assert_eq!(
        MetaEvent::new(MetaType::TrackName, b"Melody\0".to_vec())
            .text()
            .as_deref(),
        Some("Melody")
    );
}
