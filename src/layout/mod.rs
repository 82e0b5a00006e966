#![doc = r#"
Turns a decoded track into page-bounded punch-hole geometry.

The stages run strictly in order, each reading the previous stage's output:

```text
Track --select_notes--> NoteSelection --paginate--> [Page] --PageGeometry::build--> [PageGeometry]
```

[`TapeLayout::compute`] runs all of them. The result depends only on its inputs,
so recomputing after a profile or option change starts from scratch.
"#]

mod geometry;
pub use geometry::*;

mod paginate;
pub use paginate::*;

mod select;
pub use select::*;

use log::warn;
use thiserror::Error;

use crate::{MidiFile, MusicBoxProfile, SvgFormatOptions, file::Track, profile::ProfileError};

/// Reasons a layout cannot be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The profile has unusable dimensions
    #[error("Invalid music box profile: {0}")]
    InvalidProfile(#[from] ProfileError),
    /// The file has fewer tracks than its format requires
    #[error("No music track: the file has no track {index}")]
    NoMusicTrack {
        /// the track that was expected to hold the notes
        index: usize,
    },
    /// No note survived filtering
    #[error("No playable notes ({unsupported} unsupported)")]
    NoPlayableNotes {
        /// notes the profile could not play
        unsupported: usize,
    },
    /// A gap between notes does not fit on one page
    #[error(
        "Page size too small to handle gaps between notes: note at {time_seconds:.3}s, pages hold {page_length_seconds:.3}s"
    )]
    PageTooSmall {
        /// time of the note that could not be placed
        time_seconds: f64,
        /// page capacity
        page_length_seconds: f64,
    },
}

/// Non-fatal findings accumulated while laying out a tape.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostics {
    /// notes moved by whole octaves into range
    pub transposed_count: usize,
    /// notes dropped for being too close to the previous hole of the same pitch
    pub skipped_count: usize,
    /// notes the profile cannot play, even transposed
    pub unsupported_count: usize,
    /// sum of all page lengths
    pub total_paper_length_mm: f64,
    /// human readable warnings
    pub warnings: Vec<String>,
}

/// Pages and their geometry for one tape.
#[derive(Debug, Clone, PartialEq)]
pub struct TapeLayout {
    pages: Vec<Page>,
    geometry: Vec<PageGeometry>,
    diagnostics: Diagnostics,
}

impl TapeLayout {
    /// Lay out the music track of `file`.
    pub fn compute(
        file: &MidiFile,
        profile: &MusicBoxProfile,
        options: &SvgFormatOptions,
    ) -> Result<Self, LayoutError> {
        let index = file.music_track_index();
        let track = file
            .music_track()
            .ok_or(LayoutError::NoMusicTrack { index })?;
        Self::from_track(track, profile, options)
    }

    /// Lay out the notes of a single track.
    pub fn from_track(
        track: &Track,
        profile: &MusicBoxProfile,
        options: &SvgFormatOptions,
    ) -> Result<Self, LayoutError> {
        profile.validate()?;
        let selection = select_notes(track, profile, options);
        let mut diagnostics = Diagnostics {
            transposed_count: selection.transposed_count,
            skipped_count: selection.skipped_count,
            unsupported_count: selection.unsupported.len(),
            ..Default::default()
        };

        if selection.notes.is_empty() {
            return Err(LayoutError::NoPlayableNotes {
                unsupported: diagnostics.unsupported_count,
            });
        }
        if diagnostics.unsupported_count > 0 {
            diagnostics.warnings.push(format!(
                "Unsupported notes found: {} total. Inspect MIDI file or music box profile",
                diagnostics.unsupported_count
            ));
        }
        if let Some(height) = options.page_height()
            && profile.paper_width_mm > height
        {
            diagnostics.warnings.push(format!(
                "Paper width {} mm exceeds the maximum page height of {} mm",
                profile.paper_width_mm, height
            ));
        }
        for warning in &diagnostics.warnings {
            warn!("{warning}");
        }

        let pages = paginate(&selection.notes, profile, options)?;
        diagnostics.total_paper_length_mm =
            pages.iter().map(|page| page.length_mm(profile)).sum();
        let geometry = pages
            .iter()
            .map(|page| PageGeometry::build(page, pages.len(), profile, options))
            .collect();

        Ok(Self {
            pages,
            geometry,
            diagnostics,
        })
    }

    /// The pages, in order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages
    pub fn num_pages(&self) -> usize {
        self.pages.len()
    }

    /// Geometry of each page, in page order
    pub fn page_geometry(&self) -> &[PageGeometry] {
        &self.geometry
    }

    /// Counts and warnings gathered on the way
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
