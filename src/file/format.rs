use num_enum::TryFromPrimitive;

#[doc = r#"
The format field of the header chunk.

```text
0  single track holding every channel
1  simultaneous tracks; track 0 carries the tempo map by convention
2  sequentially independent patterns (decoded, but rarely useful)
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// Index of the track holding the notes to punch.
    ///
    /// Multi-track files keep tempo in track 0, so the music is in track 1.
    pub const fn music_track_index(&self) -> usize {
        match self {
            Self::Simultaneous => 1,
            Self::SingleMultiChannel | Self::SequentiallyIndependent => 0,
        }
    }
}
