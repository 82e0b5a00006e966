use crate::{file::Track, message::Tempo};

/// A tempo change at an absolute tick position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TempoChange {
    /// Ticks since the start of the track
    pub tick: u64,
    /// The tempo from this tick on
    pub tempo: Tempo,
}

#[doc = r#"
The `SetTempo` events of a track, in tick order.

Multi-track files keep their tempo changes in track 0. The map built from that
track is handed to every other track's decoder, so those tracks follow the
same tempo without carrying `SetTempo` events themselves.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempoMap {
    changes: Vec<TempoChange>,
}

impl TempoMap {
    /// Collect the tempo changes of a decoded track.
    pub fn from_track(track: &Track) -> Self {
        let mut tick = 0u64;
        let changes = track
            .events()
            .iter()
            .filter_map(|event| {
                tick += event.delta_time() as u64;
                let tempo = event.meta_event()?.tempo()?;
                Some(TempoChange { tick, tempo })
            })
            .collect();
        Self { changes }
    }

    /// The changes in tick order
    pub fn changes(&self) -> &[TempoChange] {
        &self.changes
    }

    /// True if the track declared no tempo
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
