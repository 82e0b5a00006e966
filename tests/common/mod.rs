//! Hand-assembled Standard MIDI Files.
#![allow(dead_code)]

/// Encode a variable-length quantity.
pub fn vlq(mut value: u32) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    bytes.reverse();
    bytes
}

/// A tag, a big-endian length and the payload.
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut bytes = tag.to_vec();
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

/// A complete file from a format, a raw division field and track payloads.
pub fn smf(format: u16, division: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut header = Vec::new();
    header.extend_from_slice(&format.to_be_bytes());
    header.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    header.extend_from_slice(&division.to_be_bytes());

    let mut bytes = chunk(b"MThd", &header);
    for track in tracks {
        bytes.extend(chunk(b"MTrk", track));
    }
    bytes
}

/// Builds the payload of a track chunk.
#[derive(Default)]
pub struct TrackBytes(Vec<u8>);

impl TrackBytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(mut self, delta: u32, bytes: &[u8]) -> Self {
        self.0.extend(vlq(delta));
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn note_on(self, delta: u32, note: u8, velocity: u8) -> Self {
        self.raw(delta, &[0x90, note, velocity])
    }

    pub fn note_off(self, delta: u32, note: u8) -> Self {
        self.raw(delta, &[0x80, note, 0x40])
    }

    pub fn tempo(self, delta: u32, micros_per_quarter_note: u32) -> Self {
        let [_, a, b, c] = micros_per_quarter_note.to_be_bytes();
        self.raw(delta, &[0xFF, 0x51, 0x03, a, b, c])
    }

    pub fn end(self, delta: u32) -> Vec<u8> {
        self.raw(delta, &[0xFF, 0x2F, 0x00]).0
    }
}

/// C4 D4 E4 F4 G4 A4 B4 C5
pub const SCALE: [u8; 8] = [60, 62, 64, 65, 67, 69, 71, 72];

/// A type 1 file at 192 PPQN and 120 BPM.
///
/// Track 0 sets the tempo and ends at tick 7680 (20 seconds). Track 1 plays
/// [`SCALE`] as quarter notes, back to back.
pub fn scale_fixture() -> Vec<u8> {
    let tempo = TrackBytes::new().tempo(0, 500_000).end(7680);
    let music = SCALE
        .iter()
        .fold(TrackBytes::new(), |track, &note| {
            track.note_on(0, note, 100).note_off(192, note)
        })
        .end(0);
    smf(1, 192, &[tempo, music])
}

/// A type 0 file at 96 PPQN and the default tempo, one note per `(tick delta, note)`.
pub fn single_track(notes: &[(u32, u8)]) -> Vec<u8> {
    let track = notes
        .iter()
        .fold(TrackBytes::new(), |track, &(delta, note)| {
            track.note_on(delta, note, 100)
        })
        .end(96);
    smf(0, 96, &[track])
}
