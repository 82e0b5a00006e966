#![warn(missing_docs)]
#![doc = r#"
Turn Standard MIDI Files into punch-hole tapes for paper-strip music boxes.

The pipeline has four stages:

1. [`MidiFile::parse`] decodes the byte buffer. Every event carries the absolute
   time in seconds at which it sounds.
2. [`layout::select_notes`] keeps the notes the box can play, moving out of range
   notes by octaves when asked to, and drops holes punched too close together.
3. [`layout::paginate`] cuts the tape into pages no wider than the page width.
4. [`layout::PageGeometry::build`] places holes, borders and jigsaw joiners, and
   [`layout::PageGeometry::to_svg`] writes each page as a standalone SVG.

[`generate`] runs all of them.

# Example
```rust
# use musicbox_svg::prelude::*;
#[rustfmt::skip]
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 12,
    0x00, 0x90, 60, 100,
    0x60, 0x80, 60, 0,
    0x00, 0xFF, 0x2F, 0x00,
];
let (file, layout) = musicbox_svg::generate(
    &bytes,
    &BuiltInProfile::FifteenNote.profile(),
    &SvgFormatOptions::default(),
)
.unwrap();
assert_eq!(file.tracks().len(), 1);
assert_eq!(layout.num_pages(), 1);
assert!(layout.page_geometry()[0].to_svg().starts_with("<svg"));
```
"#]

mod error;
pub use error::*;

pub mod file;
pub mod layout;
pub mod message;
pub mod note;
pub mod options;
pub mod profile;
pub mod reader;
pub mod stats;
pub mod svg;

pub use file::MidiFile;
pub use layout::TapeLayout;
pub use message::DataByte;
pub use options::SvgFormatOptions;
pub use profile::MusicBoxProfile;

/// Decode `bytes` and lay out its music track for `profile`.
pub fn generate(
    bytes: &[u8],
    profile: &MusicBoxProfile,
    options: &SvgFormatOptions,
) -> Result<(MidiFile, TapeLayout)> {
    let file = MidiFile::parse(bytes)?;
    let layout = TapeLayout::compute(&file, profile, options)?;
    Ok((file, layout))
}

#[doc = r#"
Common re-exports
"#]
pub mod prelude {
    pub use crate::{
        Error, MidiFile, MusicBoxProfile, SvgFormatOptions, TapeLayout,
        file::{FormatType, MidiFileHeader, SmpteFps, Timing, Track},
        layout::{Diagnostics, LayoutError, NoteEvent, Page, PageGeometry},
        message::{
            Channel, ChannelEvent, ChannelMessage, DataByte, EventKind, MetaEvent, MetaType,
            MidiEvent, Tempo,
        },
        note::{Key, Note, Octave},
        profile::{BuiltInProfile, ProfileError},
        reader::{ReaderError, ReaderErrorKind},
        stats::MidiStats,
    };
}
