use log::debug;

use crate::{MusicBoxProfile, SvgFormatOptions, layout::LayoutError};

use super::NoteEvent;

/// Seconds of blank paper added after the last note.
pub const TRAILING_PADDING_SECONDS: f64 = 0.5;

/// A stretch of tape that fits on one printed page.
///
/// Times are seconds since the start of the track. The first page starts before
/// zero to leave room for the lead-in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Page {
    /// Index of the page, from 0
    pub number: usize,
    /// Time at the leading edge
    pub start_seconds: f64,
    /// Time at the trailing edge
    pub end_seconds: f64,
    /// Notes punched on this page, in time order
    pub notes: Vec<NoteEvent>,
}

impl Page {
    fn starting_at(number: usize, start_seconds: f64) -> Self {
        Self {
            number,
            start_seconds,
            end_seconds: start_seconds,
            notes: Vec::new(),
        }
    }

    /// Time between the leading and trailing edges
    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    /// Length of paper this page covers
    pub fn length_mm(&self, profile: &MusicBoxProfile) -> f64 {
        profile.seconds_to_mm(self.duration_seconds())
    }
}

/// Splits time-ordered notes into pages no longer than the page width.
///
/// A page is closed when the next hole would cross its capacity bound. The seam
/// is placed halfway between the last note on the page and the next one, but
/// never past the bound. The last page gets [`TRAILING_PADDING_SECONDS`] of
/// run-out, or whatever is left of its capacity.
///
/// Fails with [`LayoutError::PageTooSmall`] when a note cannot be placed on a
/// fresh page, or when a seam would leave a page shorter than one hole.
pub fn paginate(
    notes: &[NoteEvent],
    profile: &MusicBoxProfile,
    options: &SvgFormatOptions,
) -> Result<Vec<Page>, LayoutError> {
    let Some(last_note) = notes.last() else {
        return Err(LayoutError::NoPlayableNotes { unsupported: 0 });
    };

    let page_length = options
        .page_width()
        .map_or(f64::INFINITY, |width| profile.mm_to_seconds(width));
    let hole_radius = profile.mm_to_seconds(profile.hole_diameter_mm * 0.5);
    let min_page_length = profile.mm_to_seconds(profile.hole_diameter_mm);
    let too_small = |time_seconds| LayoutError::PageTooSmall {
        time_seconds,
        page_length_seconds: page_length,
    };

    let lead_in = profile.mm_to_seconds(options.start_padding_mm + profile.hole_diameter_mm * 0.5);
    let mut pages = Vec::new();
    let mut current = Page::starting_at(0, -lead_in);
    let mut previous: Option<f64> = None;

    for note in notes {
        let overflows =
            |page: &Page| note.time_seconds + 0.5 * hole_radius > page.start_seconds + page_length;

        if overflows(&current) {
            let Some(previous) = previous else {
                return Err(too_small(note.time_seconds));
            };
            let bound = current.start_seconds + page_length;
            let seam = (0.5 * (previous + note.time_seconds)).min(bound);
            if seam - current.start_seconds < min_page_length {
                return Err(too_small(note.time_seconds));
            }
            debug!(
                "page {} ends at {seam:.3}s, before {} at {:.3}s",
                current.number, note.note, note.time_seconds
            );

            current.end_seconds = seam;
            let next = Page::starting_at(current.number + 1, seam);
            pages.push(std::mem::replace(&mut current, next));

            if overflows(&current) {
                return Err(too_small(note.time_seconds));
            }
        }

        current.notes.push(*note);
        previous = Some(note.time_seconds);
    }

    current.end_seconds = last_note.time_seconds;
    let remaining = page_length - current.duration_seconds();
    if remaining > TRAILING_PADDING_SECONDS {
        current.end_seconds += TRAILING_PADDING_SECONDS;
    } else if remaining > 0. {
        current.end_seconds += remaining;
    }
    pages.push(current);

    Ok(pages)
}

#[cfg(test)]
use crate::note;
#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn profile() -> MusicBoxProfile {
    MusicBoxProfile {
        millimeters_per_second: 10.,
        hole_diameter_mm: 2.,
        ..MusicBoxProfile::default()
    }
}

#[cfg(test)]
fn notes(times: &[f64]) -> Vec<NoteEvent> {
    times
        .iter()
        .map(|&time_seconds| NoteEvent {
            note: note!(C, 4),
            original: note!(C, 4),
            time_seconds,
        })
        .collect()
}

#[cfg(test)]
fn options(page_width_mm: f64) -> SvgFormatOptions {
    SvgFormatOptions {
        page_width_mm,
        start_padding_mm: 9.,
        ..Default::default()
    }
}

#[test]
fn single_unbounded_page() {
    let pages = paginate(&notes(&[0., 1., 2.]), &profile(), &options(0.)).unwrap();
    assert_eq!(pages.len(), 1);
    // lead-in is (9 + 1)mm at 10mm/s
    assert_eq!(pages[0].start_seconds, -1.);
    assert_eq!(pages[0].end_seconds, 2.5);
    assert_eq!(pages[0].notes.len(), 3);
    assert_eq!(pages[0].length_mm(&profile()), 35.);
}

#[test]
fn seams_fall_between_notes() {
    // pages hold 4s
    let pages = paginate(&notes(&[0., 1., 2., 4., 5., 9.]), &profile(), &options(40.)).unwrap();
    let bounds: Vec<(f64, f64)> = pages
        .iter()
        .map(|page| (page.start_seconds, page.end_seconds))
        .collect();
    // 4s overflows page 0 (ends at 3s), 9s overflows page 1 (ends at 7s)
    assert_eq!(bounds, [(-1., 3.), (3., 7.), (7., 9.5)]);
    let counts: Vec<usize> = pages.iter().map(|page| page.notes.len()).collect();
    assert_eq!(counts, [3, 2, 1]);
}

#[test]
fn pages_are_contiguous_and_bounded() {
    let times: Vec<f64> = (0..40).map(|i| i as f64 * 0.7).collect();
    let pages = paginate(&notes(&times), &profile(), &options(50.)).unwrap();
    assert!(pages.len() > 1);
    for (i, pair) in pages.windows(2).enumerate() {
        assert_eq!(pair[0].end_seconds, pair[1].start_seconds);
        assert_eq!(pair[0].number, i);
    }
    for page in &pages {
        assert!(page.duration_seconds() <= 5.);
        assert!(page.duration_seconds() > 0.);
    }
    let placed: usize = pages.iter().map(|page| page.notes.len()).sum();
    assert_eq!(placed, times.len());
}

#[test]
fn final_page_uses_remaining_capacity() {
    // page 0 holds up to 3s; the last note leaves 0.2s of room
    let pages = paginate(&notes(&[0., 2.8]), &profile(), &options(40.)).unwrap();
    assert_eq!(pages.len(), 1);
    assert!((pages[0].end_seconds - 3.).abs() < 1e-9);
}

#[test]
fn page_too_small() {
    // the first note alone does not fit
    let err = paginate(&notes(&[0.]), &profile(), &options(5.)).unwrap_err();
    assert!(matches!(err, LayoutError::PageTooSmall { .. }));

    // a rest longer than a page
    let err = paginate(&notes(&[0., 20.]), &profile(), &options(40.)).unwrap_err();
    assert_eq!(
        err,
        LayoutError::PageTooSmall {
            time_seconds: 20.,
            page_length_seconds: 4.
        }
    );
}

#[test]
fn seam_shorter_than_a_hole() {
    // pages hold 0.3s from -0.1s; a seam at 0.08s leaves 0.18s, under one 0.2s hole
    let options = SvgFormatOptions {
        page_width_mm: 3.,
        start_padding_mm: 0.,
        ..Default::default()
    };
    let err = paginate(&notes(&[0., 0.16]), &profile(), &options).unwrap_err();
    assert_eq!(
        err,
        LayoutError::PageTooSmall {
            time_seconds: 0.16,
            page_length_seconds: 0.3
        }
    );
}

#[test]
fn empty_input() {
    let err = paginate(&[], &profile(), &options(40.)).unwrap_err();
    assert_eq!(err, LayoutError::NoPlayableNotes { unsupported: 0 });
}
