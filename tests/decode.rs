mod common;

use common::{SCALE, TrackBytes, chunk, scale_fixture, smf};
use musicbox_svg::{prelude::*, reader::Unsupported};
use pretty_assertions::assert_eq;

fn times<'a>(events: impl Iterator<Item = &'a MidiEvent>) -> Vec<f64> {
    events.map(MidiEvent::absolute_time_seconds).collect()
}

#[test]
fn scale_fixture_times() {
    let file = MidiFile::parse(&scale_fixture()).unwrap();
    assert_eq!(file.header().format(), FormatType::Simultaneous);
    assert_eq!(file.timing(), &Timing::new_ticks_per_quarter_note(192));
    assert_eq!(file.tracks().len(), 2);

    let music = file.music_track().unwrap();
    let channel = |kind: fn(&ChannelMessage) -> bool| {
        times(
            music
                .events()
                .iter()
                .filter(move |e| e.channel_event().is_some_and(|c| kind(c.message()))),
        )
    };
    let note_ons = channel(|m| matches!(m, ChannelMessage::NoteOn { .. }));
    let note_offs = channel(|m| matches!(m, ChannelMessage::NoteOff { .. }));
    assert_eq!(note_ons, [0., 0.5, 1., 1.5, 2., 2.5, 3., 3.5]);
    assert_eq!(note_offs, [0.5, 1., 1.5, 2., 2.5, 3., 3.5, 4.]);

    let pitches: Vec<u8> = music
        .events()
        .iter()
        .filter_map(|e| e.channel_event()?.struck_note())
        .map(|n| n.byte())
        .collect();
    assert_eq!(pitches, SCALE);

    let end = file.tracks()[0].events().last().unwrap();
    assert!(end.meta_event().unwrap().is_end_of_track());
    assert_eq!(end.delta_time(), 7680);
    assert_eq!(end.absolute_time_seconds(), 20.);
    assert_eq!(file.duration_seconds(), 20.);
}

#[test]
fn times_never_decrease() {
    let file = MidiFile::parse(&scale_fixture()).unwrap();
    for track in file.tracks() {
        let times = times(track.events().iter());
        assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}

#[test]
fn running_status() {
    let track = TrackBytes::new()
        .note_on(0, 60, 100)
        // status byte omitted
        .raw(96, &[62, 100])
        .raw(96, &[60, 0])
        .end(0);
    let file = MidiFile::parse(&smf(0, 96, &[track])).unwrap();
    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 4);

    let notes: Vec<(f64, u8, u8)> = events
        .iter()
        .filter_map(|e| {
            let channel = e.channel_event()?;
            let ChannelMessage::NoteOn { note, velocity } = channel.message() else {
                return None;
            };
            Some((e.absolute_time_seconds(), note.byte(), velocity.value()))
        })
        .collect();
    assert_eq!(notes, [(0., 60, 100), (0.5, 62, 100), (1., 60, 0)]);
}

#[test]
fn sysex_is_refused() {
    let track = TrackBytes::new()
        .note_on(0, 60, 100)
        .raw(0, &[0xF0, 0x03, 0x7E, 0x7F, 0xF7])
        .end(0);
    let err = MidiFile::parse(&smf(0, 96, &[track])).unwrap_err();
    assert!(err.is_not_implemented());
    assert!(!err.is_malformed());
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::NotImplemented(Unsupported::SysEx(0xF0))
    );
}

#[test]
fn truncated_files_are_malformed() {
    let bytes = scale_fixture();
    for len in [3, 10, 20, bytes.len() - 1] {
        let err = MidiFile::parse(&bytes[..len]).unwrap_err();
        assert!(err.is_malformed(), "length {len}: {err}");
    }
}

#[test]
fn unknown_chunks_are_skipped() {
    let bytes = smf(0, 96, &[TrackBytes::new().note_on(0, 60, 100).end(96)]);
    let vendor = chunk(b"XFIH", &[1, 2, 3, 4, 5]);
    let (header, tracks) = bytes.split_at(14);
    let bytes = [header, vendor.as_slice(), tracks].concat();
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks().len(), 1);
    assert_eq!(file.tracks()[0].events().len(), 2);
}

#[test]
fn declared_track_count_is_informational() {
    let mut bytes = smf(0, 96, &[TrackBytes::new().note_on(0, 60, 100).end(96)]);
    bytes[10..12].copy_from_slice(&5u16.to_be_bytes());
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.header().num_tracks(), 5);
    assert_eq!(file.tracks().len(), 1);

    let profile = BuiltInProfile::FifteenNote.profile();
    let (_, layout) = musicbox_svg::generate(&bytes, &profile, &SvgFormatOptions::default()).unwrap();
    assert_eq!(layout.page_geometry()[0].holes.len(), 1);
}

#[test]
fn bytes_after_end_of_track_are_ignored() {
    let mut track = TrackBytes::new().note_on(0, 60, 100).end(0);
    track.extend_from_slice(&[0x00, 0x90, 0x40, 0x40]);
    let file = MidiFile::parse(&smf(0, 96, &[track])).unwrap();
    assert_eq!(file.tracks()[0].events().len(), 2);
}

#[test]
fn timecode_division() {
    // -25 fps, 40 subframes: a tick is a millisecond
    let track = TrackBytes::new()
        .tempo(0, 250_000)
        .note_on(500, 60, 100)
        .end(500);
    let file = MidiFile::parse(&smf(0, 0xE728, &[track])).unwrap();
    assert_eq!(file.timing(), &Timing::new_smpte(SmpteFps::TwentyFive, 40));
    assert_eq!(times(file.tracks()[0].events().iter()), [0., 0.5, 1.]);
}

#[test]
fn type_one_tracks_share_the_tempo_map() {
    // 120 BPM until tick 192, then 60 BPM
    let tempo = TrackBytes::new()
        .tempo(0, 500_000)
        .tempo(192, 1_000_000)
        .end(0);
    let music = TrackBytes::new()
        .note_on(0, 60, 100)
        .note_on(192, 62, 100)
        .note_on(192, 64, 100)
        .end(0);
    let file = MidiFile::parse(&smf(1, 192, &[tempo, music])).unwrap();
    assert_eq!(times(file.tracks()[1].events().iter()), [0., 0.5, 1.5, 1.5]);

    // format 2 tracks keep their own tempo
    let single = MidiFile::parse(&smf(
        2,
        192,
        &[
            TrackBytes::new().tempo(0, 1_000_000).end(0),
            TrackBytes::new().note_on(192, 60, 100).end(0),
        ],
    ))
    .unwrap();
    assert_eq!(times(single.tracks()[1].events().iter()), [0.5, 0.5]);
}

#[test]
fn header_errors() {
    let err = MidiFile::parse(&chunk(b"MTrk", &[0x00, 0xFF, 0x2F, 0x00])).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::ParseError(musicbox_svg::ParseError::Chunk(
            musicbox_svg::ChunkError::MissingHeader
        ))
    );

    let err = MidiFile::parse(&smf(3, 96, &[])).unwrap_err();
    assert!(err.is_malformed());
}
