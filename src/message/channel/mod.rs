#![doc = r#"
Contains all Channel Message types

A channel message status byte has the form `tttt nnnn`, where `tttt` selects the
message type and `nnnn` the channel.

```text
 type  message               data bytes
 0x8   Note Off              key, velocity
 0x9   Note On               key, velocity
 0xA   Polyphonic Pressure   key, pressure
 0xB   Control Change        controller, value
 0xC   Program Change        program
 0xD   Channel Pressure      pressure
 0xE   Pitch Bend            lsb, msb
```
"#]

use num_enum::TryFromPrimitive;

use crate::{DataByte, ParseError, note::Note};

/// The high nibble of a channel status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ChannelMessageType {
    /// `0x8n`
    NoteOff = 0x8,
    /// `0x9n`
    NoteOn = 0x9,
    /// `0xAn`
    PolyphonicPressure = 0xA,
    /// `0xBn`
    ControlChange = 0xB,
    /// `0xCn`
    ProgramChange = 0xC,
    /// `0xDn`
    ChannelPressure = 0xD,
    /// `0xEn`
    PitchBend = 0xE,
}

impl ChannelMessageType {
    /// Identify the message type of a status byte.
    pub fn from_status(status: u8) -> Result<Self, ParseError> {
        Self::try_from(status >> 4).map_err(|_| ParseError::UnknownChannelMessage(status >> 4))
    }

    /// How many data bytes follow the status byte.
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }
}

/// A MIDI channel, `0..=15`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Channel(u8);

impl Channel {
    /// The low nibble of a status byte
    pub const fn from_status(status: u8) -> Self {
        Self(status & 0x0F)
    }
    /// Zero based channel number
    pub const fn index(&self) -> u8 {
        self.0
    }
}

/// The payload of a channel message, keyed by message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[allow(missing_docs)]
pub enum ChannelMessage {
    NoteOff { note: Note, velocity: DataByte },
    NoteOn { note: Note, velocity: DataByte },
    PolyphonicPressure { note: Note, pressure: DataByte },
    ControlChange { controller: DataByte, value: DataByte },
    ProgramChange { program: DataByte },
    ChannelPressure { pressure: DataByte },
    /// 14 bit value, `0x2000` is centered
    PitchBend { value: u16 },
}

impl ChannelMessage {
    /// Build a message from its type and data bytes.
    ///
    /// `data` must hold at least [`ChannelMessageType::data_len`] bytes.
    pub fn from_data(kind: ChannelMessageType, data: &[u8]) -> Result<Self, ParseError> {
        use ChannelMessageType as T;
        let byte = |i: usize| DataByte::new(data[i]);
        Ok(match kind {
            T::NoteOff => Self::NoteOff {
                note: Note::from_byte(byte(0)?),
                velocity: byte(1)?,
            },
            T::NoteOn => Self::NoteOn {
                note: Note::from_byte(byte(0)?),
                velocity: byte(1)?,
            },
            T::PolyphonicPressure => Self::PolyphonicPressure {
                note: Note::from_byte(byte(0)?),
                pressure: byte(1)?,
            },
            T::ControlChange => Self::ControlChange {
                controller: byte(0)?,
                value: byte(1)?,
            },
            T::ProgramChange => Self::ProgramChange { program: byte(0)? },
            T::ChannelPressure => Self::ChannelPressure { pressure: byte(0)? },
            T::PitchBend => Self::PitchBend {
                value: byte(0)?.value() as u16 | (byte(1)?.value() as u16) << 7,
            },
        })
    }

    /// The message type
    pub const fn kind(&self) -> ChannelMessageType {
        match self {
            Self::NoteOff { .. } => ChannelMessageType::NoteOff,
            Self::NoteOn { .. } => ChannelMessageType::NoteOn,
            Self::PolyphonicPressure { .. } => ChannelMessageType::PolyphonicPressure,
            Self::ControlChange { .. } => ChannelMessageType::ControlChange,
            Self::ProgramChange { .. } => ChannelMessageType::ProgramChange,
            Self::ChannelPressure { .. } => ChannelMessageType::ChannelPressure,
            Self::PitchBend { .. } => ChannelMessageType::PitchBend,
        }
    }
}

/// A channel message together with its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelEvent {
    channel: Channel,
    message: ChannelMessage,
}

impl ChannelEvent {
    /// Create a channel event
    pub const fn new(channel: Channel, message: ChannelMessage) -> Self {
        Self { channel, message }
    }
    /// Decode a status byte and its data bytes.
    pub fn from_status(status: u8, data: &[u8]) -> Result<Self, ParseError> {
        let kind = ChannelMessageType::from_status(status)?;
        Ok(Self {
            channel: Channel::from_status(status),
            message: ChannelMessage::from_data(kind, data)?,
        })
    }
    /// The channel
    pub const fn channel(&self) -> Channel {
        self.channel
    }
    /// The message
    pub const fn message(&self) -> &ChannelMessage {
        &self.message
    }
    /// The struck note, for a NoteOn with non-zero velocity
    pub const fn struck_note(&self) -> Option<Note> {
        match self.message {
            ChannelMessage::NoteOn { note, velocity } if velocity.value() > 0 => Some(note),
            _ => None,
        }
    }
}

#[test]
fn decode_channel_events() {
    use pretty_assertions::assert_eq;
    let on = ChannelEvent::from_status(0x93, &[60, 100]).unwrap();
    assert_eq!(on.channel().index(), 3);
    assert_eq!(on.struck_note(), Some(Note::from_databyte_unchecked(60)));

    let silent = ChannelEvent::from_status(0x90, &[60, 0]).unwrap();
    assert_eq!(silent.message().kind(), ChannelMessageType::NoteOn);
    assert_eq!(silent.struck_note(), None);

    let bend = ChannelEvent::from_status(0xE0, &[0x00, 0x40]).unwrap();
    assert_eq!(bend.message(), &ChannelMessage::PitchBend { value: 0x2000 });

    let program = ChannelEvent::from_status(0xCF, &[5]).unwrap();
    assert_eq!(program.channel().index(), 15);
    assert_eq!(ChannelMessageType::ProgramChange.data_len(), 1);
}

#[test]
fn reject_bad_channel_data() {
    assert_eq!(
        ChannelEvent::from_status(0x90, &[0x80, 0x10]),
        Err(ParseError::InvalidDataByte(0x80))
    );
    assert_eq!(
        ChannelMessageType::from_status(0xF0),
        Err(ParseError::UnknownChannelMessage(0xF))
    );
}
