use log::{debug, warn};

use crate::{
    ParseError,
    file::{TempoChange, TempoMap, Timing},
    message::{
        ChannelEvent, ChannelMessageType, EventKind, MetaEvent, MetaType, MidiEvent, Tempo,
    },
    reader::{ReadResult, Reader, ReaderError, Unsupported},
};

#[doc = r#"
The decoded events of one `MTrk` chunk.

Events are kept in file order. Their absolute times never decrease.
"#]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Track {
    events: Vec<MidiEvent>,
}

impl Track {
    /// Create a track from already decoded events
    pub fn new(events: Vec<MidiEvent>) -> Self {
        Self { events }
    }

    /// Decode the payload of a track chunk.
    ///
    /// `offset` is the position of `data` in the file and only shows up in errors.
    /// `inherited` carries tempo changes declared by another track, merged with the
    /// track's own `SetTempo` events.
    pub fn decode(
        data: &[u8],
        offset: usize,
        timing: &Timing,
        inherited: Option<&TempoMap>,
    ) -> ReadResult<Self> {
        TrackDecoder::new(data, offset, *timing, inherited).run()
    }

    /// The events of this track.
    pub fn events(&self) -> &[MidiEvent] {
        &self.events
    }

    /// The first track name meta event, if any
    pub fn name(&self) -> Option<String> {
        self.events
            .iter()
            .filter_map(MidiEvent::meta_event)
            .find(|meta| meta.kind() == MetaType::TrackName)
            .and_then(MetaEvent::text)
    }

    /// Time of the last event in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.events
            .last()
            .map(MidiEvent::absolute_time_seconds)
            .unwrap_or(0.)
    }
}

struct TrackDecoder<'a, 't> {
    reader: Reader<'a>,
    timing: Timing,
    inherited: &'t [TempoChange],
    next_inherited: usize,
    running_status: Option<u8>,
    seconds_per_tick: f64,
    ticks: u64,
    /// tick and time of the most recent tempo change
    anchor: (u64, f64),
}

impl<'a, 't> TrackDecoder<'a, 't> {
    fn new(data: &'a [u8], offset: usize, timing: Timing, inherited: Option<&'t TempoMap>) -> Self {
        Self {
            reader: Reader::with_offset(data, offset),
            timing,
            inherited: inherited.map(TempoMap::changes).unwrap_or_default(),
            next_inherited: 0,
            running_status: None,
            seconds_per_tick: timing.seconds_per_tick(Tempo::DEFAULT),
            ticks: 0,
            anchor: (0, 0.),
        }
    }

    fn run(mut self) -> ReadResult<Track> {
        let mut events = Vec::new();
        while !self.reader.is_at_end() {
            let delta_time = self.reader.read_varlen()?;
            self.advance(delta_time);
            let kind = self.read_event()?;

            let event = MidiEvent::new(delta_time, self.seconds(), kind);
            let end_of_track = event.meta_event().is_some_and(MetaEvent::is_end_of_track);
            events.push(event);
            if end_of_track {
                if !self.reader.is_at_end() {
                    debug!(
                        "ignoring {} bytes after end of track at {}",
                        self.reader.remaining(),
                        self.reader.buffer_position()
                    );
                }
                return Ok(Track { events });
            }
        }
        warn!(
            "track ending at {} has no end of track event",
            self.reader.buffer_position()
        );
        Ok(Track { events })
    }

    fn seconds(&self) -> f64 {
        let (tick, seconds) = self.anchor;
        seconds + (self.ticks - tick) as f64 * self.seconds_per_tick
    }

    fn set_tempo(&mut self, tempo: Tempo) {
        self.anchor = (self.ticks, self.seconds());
        self.seconds_per_tick = self.timing.seconds_per_tick(tempo);
        debug!("tempo {:.2} bpm at tick {}", tempo.bpm(), self.ticks);
    }

    /// Moves `delta` ticks forward, applying inherited tempo changes on the way.
    fn advance(&mut self, delta: u32) {
        let target = self.ticks + delta as u64;
        let inherited = self.inherited;
        while let Some(change) = inherited
            .get(self.next_inherited)
            .filter(|change| change.tick <= target)
        {
            self.ticks = change.tick.max(self.ticks);
            self.set_tempo(change.tempo);
            self.next_inherited += 1;
        }
        self.ticks = target;
    }

    fn read_event(&mut self) -> ReadResult<EventKind> {
        let position = self.reader.buffer_position();
        let first = self.reader.read_u8()?;
        match first {
            0xFF => {
                self.running_status = None;
                self.read_meta().map(EventKind::Meta)
            }
            0xF0 | 0xF7 => Err(ReaderError::not_implemented(
                position,
                Unsupported::SysEx(first),
            )),
            0x80..=0xEF => {
                self.running_status = Some(first);
                let kind = ChannelMessageType::from_status(first)
                    .map_err(|e| ReaderError::parse_error(position, e))?;
                let data = self.reader.read_slice(kind.data_len())?;
                channel_event(position, first, data)
            }
            0xF1..=0xFE => Err(ReaderError::parse_error(
                position,
                ParseError::InvalidStatus(first),
            )),
            // running status: `first` is the first data byte
            _ => {
                let status = self.running_status.ok_or(ReaderError::parse_error(
                    position,
                    ParseError::MissingRunningStatus,
                ))?;
                let kind = ChannelMessageType::from_status(status)
                    .map_err(|e| ReaderError::parse_error(position, e))?;
                let mut data = [first, 0];
                if kind.data_len() == 2 {
                    data[1] = self.reader.read_u8()?;
                }
                channel_event(position, status, &data[..kind.data_len()])
            }
        }
    }

    fn read_meta(&mut self) -> ReadResult<MetaEvent> {
        let kind = MetaType::from(self.reader.read_u8()?);
        let len = self.reader.read_varlen()?;
        let data = self.reader.read_slice(len as usize)?;
        let meta = MetaEvent::new(kind, data.to_vec());
        if let Some(tempo) = meta.tempo() {
            self.set_tempo(tempo);
        }
        Ok(meta)
    }
}

fn channel_event(position: usize, status: u8, data: &[u8]) -> ReadResult<EventKind> {
    ChannelEvent::from_status(status, data)
        .map(EventKind::Channel)
        .map_err(|e| ReaderError::parse_error(position, e))
}

#[cfg(test)]
fn decode_ppqn(data: &[u8], ppqn: u16) -> ReadResult<Track> {
    Track::decode(data, 0, &Timing::new_ticks_per_quarter_note(ppqn), None)
}

#[test]
fn running_status_reuses_channel_status() {
    use crate::message::ChannelMessage;
    use pretty_assertions::assert_eq;
    #[rustfmt::skip]
    let data = [
        0x00, 0x91, 60, 100,
        0x60, 62, 100,        // running status: note on, channel 1
        0x60, 60, 0x00,
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let track = decode_ppqn(&data, 96).unwrap();
    assert_eq!(track.events().len(), 4);

    let second = track.events()[1].channel_event().unwrap();
    assert_eq!(second.channel().index(), 1);
    assert_eq!(
        second.message(),
        &ChannelMessage::NoteOn {
            note: crate::note!(D, 4),
            velocity: crate::DataByte::new_unchecked(100)
        }
    );
    assert_eq!(track.events()[1].absolute_time_seconds(), 0.5);
    assert_eq!(track.events()[2].absolute_time_seconds(), 1.0);
}

#[test]
fn meta_event_clears_running_status() {
    #[rustfmt::skip]
    let data = [
        0x00, 0x90, 60, 100,
        0x00, 0xFF, 0x01, 0x01, b'x',
        0x00, 62, 100,
    ];
    let err = decode_ppqn(&data, 96).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &crate::reader::ReaderErrorKind::ParseError(ParseError::MissingRunningStatus)
    );
    assert_eq!(err.position(), 10);
}

#[test]
fn sysex_is_not_implemented() {
    let data = [0x00, 0xF0, 0x03, 0x7E, 0x7F, 0xF7, 0x00, 0xFF, 0x2F, 0x00];
    let err = decode_ppqn(&data, 96).unwrap_err();
    assert!(err.is_not_implemented());
    assert_eq!(err.position(), 1);

    let err = decode_ppqn(&[0x00, 0xF7, 0x00], 96).unwrap_err();
    assert!(err.is_not_implemented());
}

#[test]
fn end_of_track_stops_decoding() {
    // the trailing bytes would be an invalid status
    let data = [0x00, 0xFF, 0x2F, 0x00, 0x00, 0xF4, 0x00];
    let track = decode_ppqn(&data, 96).unwrap();
    assert_eq!(track.events().len(), 1);
}

#[test]
fn truncated_events_are_malformed() {
    let err = decode_ppqn(&[0x00, 0x90, 60], 96).unwrap_err();
    assert!(err.is_out_of_bounds());
    let err = decode_ppqn(&[0x00, 0xFF, 0x03, 0x05, b'a'], 96).unwrap_err();
    assert!(err.is_out_of_bounds());
    let err = decode_ppqn(&[0x00, 0xF3, 0x01], 96).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn tempo_changes_apply_to_later_deltas() {
    #[rustfmt::skip]
    let data = [
        0x00, 0x90, 60, 100,
        0x60, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40, // 60 bpm after half a second
        0x60, 0x80, 60, 0,
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let track = decode_ppqn(&data, 96).unwrap();
    let times: Vec<f64> = track
        .events()
        .iter()
        .map(MidiEvent::absolute_time_seconds)
        .collect();
    assert_eq!(times, [0.0, 0.5, 1.5, 1.5]);
}

#[test]
fn inherited_tempo_map_splits_deltas() {
    let tempo_track = Track::new(vec![
        MidiEvent::new(
            0x60,
            0.5,
            EventKind::Meta(MetaEvent::new(MetaType::SetTempo, vec![0x0F, 0x42, 0x40])),
        ),
    ]);
    let map = TempoMap::from_track(&tempo_track);
    assert_eq!(map.changes().len(), 1);

    // one delta spanning the change at tick 96
    let data = [0x81, 0x40, 0x90, 60, 100, 0x00, 0xFF, 0x2F, 0x00];
    let timing = Timing::new_ticks_per_quarter_note(96);
    let track = Track::decode(&data, 0, &timing, Some(&map)).unwrap();
    // 96 ticks at 120 bpm, then 96 at 60 bpm
    assert_eq!(track.events()[0].delta_time(), 192);
    assert_eq!(track.events()[0].absolute_time_seconds(), 1.5);
}
