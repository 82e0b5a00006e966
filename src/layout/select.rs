use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::{
    MusicBoxProfile, SvgFormatOptions,
    file::Track,
    message::ChannelEvent,
    note::Note,
};

/// A note to punch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NoteEvent {
    /// The pitch to punch, after transposition
    pub note: Note,
    /// The pitch found in the file
    pub original: Note,
    /// Seconds since the start of the track
    pub time_seconds: f64,
}

impl NoteEvent {
    /// True if the note was moved into range
    pub fn is_transposed(&self) -> bool {
        self.note != self.original
    }
}

/// The outcome of filtering a track against a profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteSelection {
    /// Notes to punch, in time order
    pub notes: Vec<NoteEvent>,
    /// Notes the profile cannot play, in time order
    pub unsupported: Vec<NoteEvent>,
    /// How many kept or skipped notes were transposed
    pub transposed_count: usize,
    /// Notes dropped because the previous hole of that pitch was too close
    pub skipped_count: usize,
    /// Out of range pitch -> pitch used for it
    pub transpositions: BTreeMap<Note, Note>,
}

/// Picks the notes of `track` that the music box can play.
///
/// Only struck notes (NoteOn with a non-zero velocity) are considered. Notes the
/// profile does not support are moved by whole octaves when
/// [`SvgFormatOptions::transpose_out_of_range_notes`] is set, and reported as
/// unsupported otherwise. A note closer than [`MusicBoxProfile::min_note_gap_mm`]
/// to the last kept note of the same pitch is dropped.
pub fn select_notes(
    track: &Track,
    profile: &MusicBoxProfile,
    options: &SvgFormatOptions,
) -> NoteSelection {
    let mut selection = NoteSelection::default();
    let min_gap_seconds = profile.mm_to_seconds(profile.min_note_gap_mm);

    let mut octave_shift: HashMap<Note, Option<Note>> = HashMap::new();
    let mut last_kept: HashMap<Note, f64> = HashMap::new();

    let struck = track.events().iter().filter_map(|event| {
        let note = event
            .channel_event()
            .and_then(ChannelEvent::struck_note)?;
        Some((note, event.absolute_time_seconds()))
    });

    for (original, time_seconds) in struck {
        let target = if profile.supports(original) {
            Some(original)
        } else if options.transpose_out_of_range_notes {
            *octave_shift.entry(original).or_insert_with(|| {
                profile
                    .supported_notes
                    .iter()
                    .copied()
                    .find(|candidate| original.same_pitch_class(*candidate))
            })
        } else {
            None
        };

        let Some(note) = target else {
            selection.unsupported.push(NoteEvent {
                note: original,
                original,
                time_seconds,
            });
            continue;
        };

        if note != original {
            selection.transposed_count += 1;
            selection.transpositions.insert(original, note);
        }

        if let Some(previous) = last_kept.get(&note)
            && time_seconds - previous <= min_gap_seconds
        {
            debug!("skipping {note} at {time_seconds:.3}s, previous hole at {previous:.3}s");
            selection.skipped_count += 1;
            continue;
        }

        last_kept.insert(note, time_seconds);
        selection.notes.push(NoteEvent {
            note,
            original,
            time_seconds,
        });
    }

    selection
}

#[cfg(test)]
use crate::{
    DataByte,
    message::{Channel, ChannelMessage, EventKind, MidiEvent},
    note,
};
#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn note_on(time: f64, note: Note, velocity: u8) -> MidiEvent {
    MidiEvent::new(
        0,
        time,
        EventKind::Channel(ChannelEvent::new(
            Channel::from_status(0x90),
            ChannelMessage::NoteOn {
                note,
                velocity: DataByte::new_unchecked(velocity),
            },
        )),
    )
}

#[cfg(test)]
fn profile() -> MusicBoxProfile {
    MusicBoxProfile {
        name: "test".to_string(),
        paper_width_mm: 40.,
        content_width_mm: 30.,
        hole_diameter_mm: 2.,
        min_note_gap_mm: 4.,
        millimeters_per_second: 20.,
        supported_notes: vec![note!(C, 4), note!(E, 4), note!(G, 4), note!(C, 5)],
    }
}

#[test]
fn transposes_by_octaves() {
    let track = Track::new(vec![
        note_on(0., note!(C, 2), 100),
        note_on(1., note!(E, 6), 100),
        note_on(2., note!(C, 2), 100),
        note_on(3., note!(D, 4), 100),
    ]);
    let options = SvgFormatOptions {
        transpose_out_of_range_notes: true,
        ..Default::default()
    };
    let selection = select_notes(&track, &profile(), &options);

    let kept: Vec<Note> = selection.notes.iter().map(|n| n.note).collect();
    assert_eq!(kept, [note!(C, 4), note!(E, 4), note!(C, 4)]);
    assert_eq!(selection.transposed_count, 3);
    assert_eq!(selection.transpositions.get(&note!(C, 2)), Some(&note!(C, 4)));
    // D has no octave in range
    assert_eq!(selection.unsupported.len(), 1);
    assert_eq!(selection.unsupported[0].note, note!(D, 4));
}

#[test]
fn out_of_range_without_transposition() {
    let track = Track::new(vec![
        note_on(0., note!(C, 4), 100),
        note_on(1., note!(C, 6), 100),
    ]);
    let selection = select_notes(&track, &profile(), &SvgFormatOptions::default());
    assert_eq!(selection.notes.len(), 1);
    assert_eq!(selection.transposed_count, 0);
    assert_eq!(selection.unsupported.len(), 1);
}

#[test]
fn coalesces_close_notes_of_the_same_pitch() {
    // minimum gap is 4mm / 20mm/s = 0.2s
    let track = Track::new(vec![
        note_on(0., note!(C, 4), 100),
        note_on(0.1, note!(C, 4), 100),
        note_on(0.15, note!(E, 4), 100),
        note_on(0.5, note!(C, 4), 100),
    ]);
    let selection = select_notes(&track, &profile(), &SvgFormatOptions::default());
    let times: Vec<f64> = selection.notes.iter().map(|n| n.time_seconds).collect();
    assert_eq!(times, [0., 0.15, 0.5]);
    assert_eq!(selection.skipped_count, 1);
}

#[test]
fn silent_note_on_is_a_release() {
    let track = Track::new(vec![
        note_on(0., note!(C, 4), 100),
        note_on(0.5, note!(C, 4), 0),
    ]);
    let selection = select_notes(&track, &profile(), &SvgFormatOptions::default());
    assert_eq!(selection.notes.len(), 1);
    assert_eq!(selection.skipped_count, 0);
}
