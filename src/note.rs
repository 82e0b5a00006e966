//! Pitches: [`Note`], its [`Key`] and its [`Octave`].

use core::fmt;

use crate::{DataByte, ParseError};

#[doc = r#"
A MIDI pitch, interpreted as a 7-bit number.

Each value corresponds to some [`Key`] and [`Octave`].

[`Note`] `0` is `C(-1)`, [`Note`] `60` is middle C (`C4`) and [`Note`] `127` is `G9`.

# Example
```rust
# use musicbox_svg::prelude::*;
let note = Note::from_databyte(63u8).unwrap(); // 63 is between 0-127

assert_eq!(note.key(), Key::DSharp);
assert_eq!(note.octave(), Octave::new(4));
assert_eq!(note.to_string(), "D#4");
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note(DataByte);

impl Note {
    /// Create a new note.
    ///
    /// Checks for correctness (leading 0 bit).
    pub fn from_databyte<B>(rep: B) -> Result<Self, ParseError>
    where
        B: TryInto<DataByte, Error = ParseError>,
    {
        rep.try_into().map(Self)
    }

    /// Create a note from an already validated byte
    pub const fn from_byte(byte: DataByte) -> Self {
        Self(byte)
    }

    /// Creates a new note without checking for the validity of the byte
    pub const fn from_databyte_unchecked(byte: u8) -> Self {
        Self(DataByte::new_unchecked(byte))
    }

    /// Create a note from a given key and octave
    ///
    /// # Panics
    /// if you pass in, on `Octave::new(9)` a Key greater than `Key::G`.
    ///
    /// this is because `Key::GSharp-Key::B` for octave 9 is not representable
    /// in midi.
    pub const fn new(key: Key, octave: Octave) -> Self {
        let octave_mult = (octave.value() + 1) as u8 * 12;
        let note_byte = key.get_mod_12();

        if octave_mult + note_byte > 127 {
            panic!("Can't make Note. See documentation for details.");
        }

        Self(DataByte(octave_mult + note_byte))
    }

    /// Identifies the key of the note
    #[inline]
    pub const fn key(&self) -> Key {
        Key::from_data_byte(&self.0)
    }

    /// Identifies the octave of the note
    #[inline]
    pub const fn octave(&self) -> Octave {
        Octave::from_data_byte(&self.0)
    }

    /// Returns the underlying byte of the note
    pub const fn byte(&self) -> u8 {
        self.0.0
    }

    /// Semitones from `self` up to `other`; negative when `other` is lower.
    pub const fn interval_to(&self, other: Note) -> i16 {
        other.byte() as i16 - self.byte() as i16
    }

    /// True if both notes share a pitch class, i.e. differ by whole octaves.
    pub const fn same_pitch_class(&self, other: Note) -> bool {
        self.interval_to(other) % 12 == 0
    }
}

/// Efficiently make a note.
///
/// ## Example
/// ```rust
/// # use musicbox_svg::prelude::*;
/// let my_note = musicbox_svg::note!(C, 2);
/// assert_eq!(my_note, Note::new(Key::C, Octave::new(2)));
/// ```
#[macro_export]
macro_rules! note {
    ($key:ident, $oct:literal) => {
        $crate::note::Note::new($crate::note::Key::$key, $crate::note::Octave::new($oct))
    };
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key(), self.octave())
    }
}

#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[doc = r#"
The pitch class of a [`Note`]
"#]
pub enum Key {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    /// Identify the key from a note byte.
    #[inline]
    pub const fn from_data_byte(key: &DataByte) -> Self {
        use Key::*;
        match key.value() % 12 {
            0 => C,
            1 => CSharp,
            2 => D,
            3 => DSharp,
            4 => E,
            5 => F,
            6 => FSharp,
            7 => G,
            8 => GSharp,
            9 => A,
            10 => ASharp,
            _ => B,
        }
    }

    const fn get_mod_12(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Key::*;
        let name = match self {
            C => "C",
            CSharp => "C#",
            D => "D",
            DSharp => "D#",
            E => "E",
            F => "F",
            FSharp => "F#",
            G => "G",
            GSharp => "G#",
            A => "A",
            ASharp => "A#",
            B => "B",
        };
        f.write_str(name)
    }
}

#[doc = r#"
Identifies the octave for a [`Note`]. Values range from -1 to 9.

```rust
# use musicbox_svg::prelude::*;
let octave = Octave::new(12); // clamps to 9
assert_eq!(octave.value(), 9);
```
"#]
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Octave(i8);

impl Octave {
    /// Identify an octave from a note byte.
    pub const fn from_data_byte(key: &DataByte) -> Self {
        Self((key.value() / 12) as i8 - 1)
    }
    /// Should be a value between [-1, 9]. Clamps between these two values.
    pub const fn new(octave: i8) -> Self {
        if octave < -1 {
            Self(-1)
        } else if octave > 9 {
            Self(9)
        } else {
            Self(octave)
        }
    }

    /// The octave, from `[-1,9]`
    pub const fn value(&self) -> i8 {
        self.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[test]
fn note_from_key_octave_pairs() {
    for key_byte in 0..128u8 {
        let note = Note::from_databyte(key_byte).unwrap();
        let made = Note::new(note.key(), note.octave());
        assert_eq!(note, made);
    }
}

#[test]
fn middle_c() {
    let c = Note::from_databyte(60u8).unwrap();
    assert_eq!(c, note!(C, 4));
    assert_eq!(c.to_string(), "C4");
    assert_eq!(Note::from_databyte(94u8).unwrap().to_string(), "A#6");
}

#[test]
fn pitch_classes() {
    let c4 = note!(C, 4);
    assert_eq!(c4.interval_to(note!(C, 6)), 24);
    assert_eq!(note!(C, 6).interval_to(c4), -24);
    assert!(c4.same_pitch_class(note!(C, 2)));
    assert!(!c4.same_pitch_class(note!(D, 4)));
}
