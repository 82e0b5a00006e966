#![doc = r#"
Music box hardware profiles.

A profile describes the paper tape a music box takes and the pitches its comb can
play. The two built-in presets match common 15 and 30 note paper-strip boxes.
"#]

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{note, note::Note};

/// A profile field that cannot describe a real music box.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// A length or speed that must be positive and finite
    #[error("{field} must be a positive number, got {value}")]
    NotPositive {
        /// the offending field, as spelled in JSON profiles
        field: &'static str,
        /// the value found
        value: f64,
    },
    /// A negative or non-finite minimum note gap
    #[error("minNoteGapMm must be zero or more, got {0}")]
    NegativeGap(f64),
    /// The profile lists no notes
    #[error("supportedNotes is empty")]
    NoNotes,
}

/// Properties pertaining to the paper tape's width and supported notes for a music box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MusicBoxProfile {
    /// Friendly name for display
    pub name: String,
    /// Total width of the paper tape, in millimeters.
    pub paper_width_mm: f64,
    /// Distance between the first and the last note line, in millimeters.
    pub content_width_mm: f64,
    /// Diameter of punched holes, in millimeters.
    pub hole_diameter_mm: f64,
    /// Closest two holes of the same pitch may be punched, in millimeters.
    pub min_note_gap_mm: f64,
    /// Length of paper that passes the comb in one second of music.
    pub millimeters_per_second: f64,
    /// The notes the music box can play.
    pub supported_notes: Vec<Note>,
}

impl MusicBoxProfile {
    /// Checks the dimensions are usable for layout.
    ///
    /// Deserialization does not call this.
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (field, value) in [
            ("paperWidthMm", self.paper_width_mm),
            ("contentWidthMm", self.content_width_mm),
            ("holeDiameterMm", self.hole_diameter_mm),
            ("millimetersPerSecond", self.millimeters_per_second),
        ] {
            if !(value.is_finite() && value > 0.) {
                return Err(ProfileError::NotPositive { field, value });
            }
        }
        if !(self.min_note_gap_mm.is_finite() && self.min_note_gap_mm >= 0.) {
            return Err(ProfileError::NegativeGap(self.min_note_gap_mm));
        }
        if self.supported_notes.is_empty() {
            return Err(ProfileError::NoNotes);
        }
        Ok(())
    }

    /// Supported notes, ascending and without duplicates.
    pub fn sorted_notes(&self) -> Vec<Note> {
        self.supported_notes
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// True if the box can play `note`.
    pub fn supports(&self, note: Note) -> bool {
        self.supported_notes.contains(&note)
    }

    /// Converts a paper length to seconds of music.
    pub fn mm_to_seconds(&self, mm: f64) -> f64 {
        mm / self.millimeters_per_second
    }

    /// Converts seconds of music to a paper length.
    pub fn seconds_to_mm(&self, seconds: f64) -> f64 {
        seconds * self.millimeters_per_second
    }
}

impl Default for MusicBoxProfile {
    fn default() -> Self {
        BuiltInProfile::FifteenNote.profile()
    }
}

/// The built-in profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltInProfile {
    /// 15 note box, C4 to C6 diatonic
    FifteenNote,
    /// 30 note box, C3 to E6
    ThirtyNote,
}

impl BuiltInProfile {
    /// Every preset
    pub const ALL: [Self; 2] = [Self::FifteenNote, Self::ThirtyNote];

    /// The lookup key of this preset
    pub const fn key(&self) -> &'static str {
        match self {
            Self::FifteenNote => "fifteen-note",
            Self::ThirtyNote => "thirty-note",
        }
    }

    /// Look a preset up by key.
    ///
    /// Accepts kebab-case and camelCase spellings, e.g. `thirty-note` or `thirtyNote`.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized: String = key
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|preset| preset.key().replace('-', "") == normalized)
    }

    /// Builds the profile record for this preset.
    pub fn profile(&self) -> MusicBoxProfile {
        match self {
            Self::FifteenNote => MusicBoxProfile {
                name: "15 Note".to_string(),
                paper_width_mm: 41.,
                content_width_mm: 29.,
                hole_diameter_mm: 1.8,
                min_note_gap_mm: 4.,
                millimeters_per_second: 20.,
                supported_notes: vec![
                    note!(C, 4),
                    note!(D, 4),
                    note!(E, 4),
                    note!(F, 4),
                    note!(G, 4),
                    note!(A, 4),
                    note!(B, 4),
                    note!(C, 5),
                    note!(D, 5),
                    note!(E, 5),
                    note!(F, 5),
                    note!(G, 5),
                    note!(A, 5),
                    note!(B, 5),
                    note!(C, 6),
                ],
            },
            Self::ThirtyNote => MusicBoxProfile {
                name: "30 Note".to_string(),
                paper_width_mm: 70.1,
                content_width_mm: 58.25,
                hole_diameter_mm: 2.,
                min_note_gap_mm: 4.,
                millimeters_per_second: 20.,
                supported_notes: vec![
                    note!(C, 3),
                    note!(D, 3),
                    note!(G, 3),
                    note!(A, 3),
                    note!(B, 3),
                    note!(C, 4),
                    note!(D, 4),
                    note!(E, 4),
                    note!(F, 4),
                    note!(FSharp, 4),
                    note!(G, 4),
                    note!(GSharp, 4),
                    note!(A, 4),
                    note!(ASharp, 4),
                    note!(B, 4),
                    note!(C, 5),
                    note!(CSharp, 5),
                    note!(D, 5),
                    note!(DSharp, 5),
                    note!(E, 5),
                    note!(F, 5),
                    note!(FSharp, 5),
                    note!(G, 5),
                    note!(GSharp, 5),
                    note!(A, 5),
                    note!(ASharp, 5),
                    note!(B, 5),
                    note!(C, 6),
                    note!(D, 6),
                    note!(E, 6),
                ],
            },
        }
    }
}

#[test]
fn lookup_presets() {
    assert_eq!(
        BuiltInProfile::from_key("fifteenNote"),
        Some(BuiltInProfile::FifteenNote)
    );
    assert_eq!(
        BuiltInProfile::from_key("thirty-note"),
        Some(BuiltInProfile::ThirtyNote)
    );
    assert_eq!(BuiltInProfile::from_key("forty-note"), None);
}

#[test]
fn preset_note_counts() {
    let fifteen = BuiltInProfile::FifteenNote.profile();
    assert_eq!(fifteen.supported_notes.len(), 15);
    assert_eq!(fifteen.sorted_notes().first(), Some(&note!(C, 4)));
    let thirty = BuiltInProfile::ThirtyNote.profile();
    assert_eq!(thirty.sorted_notes().len(), 30);
    assert!(thirty.supports(note!(FSharp, 4)));
    assert!(!thirty.supports(note!(E, 3)));
}

#[test]
fn rejects_unusable_dimensions() {
    assert_eq!(BuiltInProfile::ThirtyNote.profile().validate(), Ok(()));

    let stopped = MusicBoxProfile {
        millimeters_per_second: 0.,
        ..MusicBoxProfile::default()
    };
    assert_eq!(
        stopped.validate(),
        Err(ProfileError::NotPositive {
            field: "millimetersPerSecond",
            value: 0.
        })
    );

    let pinhole = MusicBoxProfile {
        hole_diameter_mm: -1.,
        ..MusicBoxProfile::default()
    };
    assert!(matches!(
        pinhole.validate(),
        Err(ProfileError::NotPositive {
            field: "holeDiameterMm",
            ..
        })
    ));

    let gapless = MusicBoxProfile {
        min_note_gap_mm: 0.,
        ..MusicBoxProfile::default()
    };
    assert_eq!(gapless.validate(), Ok(()));

    let silent = MusicBoxProfile {
        supported_notes: Vec::new(),
        ..MusicBoxProfile::default()
    };
    assert_eq!(silent.validate(), Err(ProfileError::NoNotes));
}
