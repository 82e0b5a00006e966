#![doc = r#"
Summary figures for a decoded [`MidiFile`].
"#]

use std::collections::BTreeMap;

use crate::{MidiFile, message::Tempo, note::Note};

/// A tempo in effect from a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TempoMark {
    /// When the tempo takes effect
    pub time_seconds: f64,
    /// The tempo
    pub tempo: Tempo,
}

impl TempoMark {
    /// Quarter notes per minute
    pub fn bpm(&self) -> f64 {
        self.tempo.bpm()
    }
}

/// Tempo list, pitch range, length and per-pitch note counts.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MidiStats {
    /// Every `SetTempo` event across all tracks, by time
    pub tempos: Vec<TempoMark>,
    /// Lowest struck note of the music track
    pub lowest_note: Option<Note>,
    /// Highest struck note of the music track
    pub highest_note: Option<Note>,
    /// Time of the latest event across all tracks
    pub duration_seconds: f64,
    /// How often each pitch is struck in the music track
    pub histogram: BTreeMap<Note, usize>,
}

impl MidiStats {
    /// Gather statistics for `file`.
    pub fn from_file(file: &MidiFile) -> Self {
        let mut tempos: Vec<TempoMark> = file
            .tracks()
            .iter()
            .flat_map(|track| track.events())
            .filter_map(|event| {
                let tempo = event.meta_event()?.tempo()?;
                Some(TempoMark {
                    time_seconds: event.absolute_time_seconds(),
                    tempo,
                })
            })
            .collect();
        tempos.sort_by(|a, b| a.time_seconds.total_cmp(&b.time_seconds));

        let mut histogram = BTreeMap::new();
        let struck = file
            .music_track()
            .into_iter()
            .flat_map(|track| track.events())
            .filter_map(|event| event.channel_event()?.struck_note());
        for note in struck {
            *histogram.entry(note).or_insert(0) += 1;
        }

        Self {
            tempos,
            lowest_note: histogram.keys().next().copied(),
            highest_note: histogram.keys().next_back().copied(),
            duration_seconds: file.duration_seconds(),
            histogram,
        }
    }

    /// Number of struck notes in the music track
    pub fn note_count(&self) -> usize {
        self.histogram.values().sum()
    }

    /// Names of the struck pitches, lowest first, e.g. `["C4", "D#4"]`
    pub fn note_names(&self) -> Vec<String> {
        self.histogram.keys().map(Note::to_string).collect()
    }
}

#[cfg(test)]
use crate::note;
#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn single_track_stats() {
    #[rustfmt::skip]
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
        b'M', b'T', b'r', b'k', 0, 0, 0, 24,
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20,
        0x00, 0x90, 0x40, 0x64,
        0x60, 0x3C, 0x64,
        0x60, 0x40, 0x50,
        0x00, 0x40, 0x00,
        0x60, 0xFF, 0x2F, 0x00,
    ];
    let file = MidiFile::parse(&bytes).unwrap();
    let stats = MidiStats::from_file(&file);

    assert_eq!(stats.tempos.len(), 1);
    assert_eq!(stats.tempos[0].bpm(), 120.);
    assert_eq!(stats.lowest_note, Some(note!(C, 4)));
    assert_eq!(stats.highest_note, Some(note!(E, 4)));
    assert_eq!(stats.note_count(), 3);
    assert_eq!(stats.histogram.get(&note!(E, 4)), Some(&2));
    assert_eq!(stats.note_names(), ["C4", "E4"]);
    assert_eq!(stats.duration_seconds, 1.5);
}
