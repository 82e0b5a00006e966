#![doc = r#"
Events decoded from a track chunk.

Each [`MidiEvent`] keeps the delta time it was written with and the absolute time in
seconds derived while decoding. System exclusive events have no representation here:
the decoder refuses them with [`Unsupported::SysEx`](crate::reader::Unsupported::SysEx).
"#]

mod channel;
pub use channel::*;

mod data_byte;
pub use data_byte::*;

mod meta;
pub use meta::*;

/// The payload of a [`MidiEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EventKind {
    /// A channel voice message
    Channel(ChannelEvent),
    /// A meta event (`0xFF`)
    Meta(MetaEvent),
}

/// A time-stamped event within a track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MidiEvent {
    delta_time: u32,
    absolute_time_seconds: f64,
    kind: EventKind,
}

impl MidiEvent {
    /// Create a new event
    pub const fn new(delta_time: u32, absolute_time_seconds: f64, kind: EventKind) -> Self {
        Self {
            delta_time,
            absolute_time_seconds,
            kind,
        }
    }
    /// Ticks since the previous event in the same track
    pub const fn delta_time(&self) -> u32 {
        self.delta_time
    }
    /// Seconds since the start of the track
    pub const fn absolute_time_seconds(&self) -> f64 {
        self.absolute_time_seconds
    }
    /// The event payload
    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }
    /// Returns the channel event, if this is one
    pub const fn channel_event(&self) -> Option<&ChannelEvent> {
        match &self.kind {
            EventKind::Channel(c) => Some(c),
            EventKind::Meta(_) => None,
        }
    }
    /// Returns the meta event, if this is one
    pub const fn meta_event(&self) -> Option<&MetaEvent> {
        match &self.kind {
            EventKind::Meta(m) => Some(m),
            EventKind::Channel(_) => None,
        }
    }
}
