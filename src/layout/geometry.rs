use crate::{MusicBoxProfile, SvgFormatOptions, note::Note};

use super::Page;

/// How far a jigsaw tooth sticks out past the page edge, in millimeters.
pub const JIGSAW_WIDTH_MM: f64 = 2.;
/// Share of the half gap the tooth neck takes at the page edge.
pub const JIGSAW_OPEN_FACTOR: f64 = 0.3;
/// Share of the half gap the tooth head takes at its tip.
pub const JIGSAW_CLOSE_FACTOR: f64 = 0.5;
/// Upper bound on the skew of the start marker, in millimeters.
pub const MAX_START_SKEW_MM: f64 = 10.;

/// A position on the page, in millimeters from the top left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Point {
    #[allow(missing_docs)]
    pub x: f64,
    #[allow(missing_docs)]
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A straight cut or guide line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Line {
    #[allow(missing_docs)]
    pub from: Point,
    #[allow(missing_docs)]
    pub to: Point,
}

impl Line {
    /// Create a line between two points
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// A hole to punch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Circle {
    /// center of the hole
    pub center: Point,
    /// radius in millimeters
    pub radius: f64,
    /// the pitch this hole plays
    pub note: Note,
}

/// Vertical placement of note lanes across the paper.
#[derive(Debug, Clone)]
pub struct NoteLanes {
    notes: Vec<Note>,
    offset_mm: f64,
    spacing_mm: f64,
}

impl NoteLanes {
    /// Lanes for every note of `profile`, the lowest pitch at the bottom edge.
    pub fn new(profile: &MusicBoxProfile) -> Self {
        let notes = profile.sorted_notes();
        let spacing_mm = if notes.len() > 1 {
            profile.content_width_mm / (notes.len() - 1) as f64
        } else {
            0.
        };
        Self {
            notes,
            offset_mm: 0.5 * (profile.paper_width_mm - profile.content_width_mm),
            spacing_mm,
        }
    }

    /// Lane number of `note` counted from the top, if the profile plays it.
    pub fn index(&self, note: Note) -> Option<usize> {
        let position = self.notes.binary_search(&note).ok()?;
        Some(self.notes.len() - 1 - position)
    }

    /// Distance from the top edge to the lane of `note`.
    pub fn y_mm(&self, note: Note) -> Option<f64> {
        self.index(note)
            .map(|index| self.offset_mm + index as f64 * self.spacing_mm)
    }
}

/// Everything drawn on one page, in millimeters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageGeometry {
    /// Index of the page, from 0
    pub number: usize,
    /// Document width, including room for a trailing joiner or hole
    pub width_mm: f64,
    /// Document height, the width of the paper tape
    pub height_mm: f64,
    /// Punched holes
    pub holes: Vec<Circle>,
    /// Border and joiner lines
    pub lines: Vec<Line>,
}

impl PageGeometry {
    /// Compute the drawing for `page`, one of `total_pages`.
    pub fn build(
        page: &Page,
        total_pages: usize,
        profile: &MusicBoxProfile,
        options: &SvgFormatOptions,
    ) -> Self {
        let x_len = page.length_mm(profile);
        let height_mm = profile.paper_width_mm;
        let lanes = NoteLanes::new(profile);

        let holes = page
            .notes
            .iter()
            .filter_map(|event| {
                let y = lanes.y_mm(event.note)?;
                let x = profile.seconds_to_mm(event.time_seconds - page.start_seconds);
                Some(Circle {
                    center: Point::new(x, y),
                    radius: 0.5 * profile.hole_diameter_mm,
                    note: event.note,
                })
            })
            .collect();

        let mut lines = Vec::new();
        if options.render_border {
            let first = page.number == 0;
            let last = page.number + 1 == total_pages;
            let skew = options.start_padding_mm.min(MAX_START_SKEW_MM);
            let top_start = if first && !options.loop_mode { skew } else { 0. };

            lines.push(Line::new(Point::new(top_start, 0.), Point::new(x_len, 0.)));
            lines.push(Line::new(
                Point::new(0., height_mm),
                Point::new(x_len, height_mm),
            ));

            if !options.omit_page_boundaries || first {
                if first && !options.loop_mode {
                    lines.push(Line::new(Point::new(skew, 0.), Point::new(0., height_mm)));
                } else {
                    lines.extend(joiner(0., height_mm, profile, options));
                }
            }
            if !options.omit_page_boundaries || last {
                if last && !options.loop_mode {
                    lines.push(Line::new(Point::new(x_len, 0.), Point::new(x_len, height_mm)));
                } else {
                    lines.extend(joiner(x_len, height_mm, profile, options));
                }
            }
        }

        Self {
            number: page.number,
            width_mm: x_len + profile.hole_diameter_mm.max(JIGSAW_WIDTH_MM),
            height_mm,
            holes,
            lines,
        }
    }
}

fn joiner(x: f64, height: f64, profile: &MusicBoxProfile, options: &SvgFormatOptions) -> Vec<Line> {
    if !options.jigsaw_joiners {
        return vec![Line::new(Point::new(x, 0.), Point::new(x, height))];
    }
    jigsaw_joiner(x, height, profile)
        .windows(2)
        .map(|pair| Line::new(pair[0], pair[1]))
        .collect()
}

/// The outline of a joiner edge at `x`: a tooth near the top and one near the bottom.
///
/// Each tooth is centered in the margin between the content area and the paper
/// edge and sticks [`JIGSAW_WIDTH_MM`] to the right of `x`, so that a page's
/// trailing teeth slot into the next page's leading ones.
pub fn jigsaw_joiner(x: f64, height: f64, profile: &MusicBoxProfile) -> [Point; 10] {
    let gap = 0.5 * (profile.paper_width_mm - profile.content_width_mm - profile.hole_diameter_mm);
    let h = 0.5 * gap;
    let open = JIGSAW_OPEN_FACTOR * h;
    let close = JIGSAW_CLOSE_FACTOR * h;
    let tip = x + JIGSAW_WIDTH_MM;

    [
        Point::new(x, 0.),
        Point::new(x, h - open),
        Point::new(tip, h - close),
        Point::new(tip, h + close),
        Point::new(x, h + open),
        Point::new(x, height - h - open),
        Point::new(tip, height - h - close),
        Point::new(tip, height - h + close),
        Point::new(x, height - h + open),
        Point::new(x, height),
    ]
}

#[cfg(test)]
use crate::{layout::NoteEvent, note};
#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn profile() -> MusicBoxProfile {
    MusicBoxProfile {
        name: "test".to_string(),
        paper_width_mm: 40.,
        content_width_mm: 30.,
        hole_diameter_mm: 2.,
        min_note_gap_mm: 4.,
        millimeters_per_second: 10.,
        supported_notes: vec![note!(G, 4), note!(C, 4), note!(E, 4), note!(C, 5)],
    }
}

#[cfg(test)]
fn page(number: usize, notes: &[(f64, Note)]) -> Page {
    Page {
        number,
        start_seconds: 1.,
        end_seconds: 5.,
        notes: notes
            .iter()
            .map(|&(time_seconds, note)| NoteEvent {
                note,
                original: note,
                time_seconds,
            })
            .collect(),
    }
}

#[test]
fn lanes_put_low_notes_at_the_bottom() {
    let lanes = NoteLanes::new(&profile());
    assert_eq!(lanes.index(note!(C, 5)), Some(0));
    assert_eq!(lanes.index(note!(C, 4)), Some(3));
    assert_eq!(lanes.y_mm(note!(C, 5)), Some(5.));
    assert_eq!(lanes.y_mm(note!(E, 4)), Some(25.));
    assert_eq!(lanes.y_mm(note!(C, 4)), Some(35.));
    assert_eq!(lanes.y_mm(note!(D, 4)), None);
}

#[test]
fn holes_are_placed_relative_to_the_page() {
    let page = page(1, &[(2., note!(C, 4)), (4.5, note!(G, 4))]);
    let geometry = PageGeometry::build(&page, 3, &profile(), &SvgFormatOptions::default());
    assert_eq!(geometry.width_mm, 42.);
    assert_eq!(geometry.height_mm, 40.);
    let centers: Vec<Point> = geometry.holes.iter().map(|hole| hole.center).collect();
    assert_eq!(centers, [Point::new(10., 35.), Point::new(35., 15.)]);
    assert!(geometry.holes.iter().all(|hole| hole.radius == 1.));
}

#[test]
fn jigsaw_shape() {
    // margin is (40 - 30 - 2) / 2 = 4, half of it 2
    let points = jigsaw_joiner(10., 40., &profile());
    assert_eq!(points[0], Point::new(10., 0.));
    assert_eq!(points[2], Point::new(12., 1.));
    assert_eq!(points[3], Point::new(12., 3.));
    assert!((points[1].y - 1.4).abs() < 1e-9);
    assert!((points[4].y - 2.6).abs() < 1e-9);
    assert_eq!(points[5].x, 10.);
    assert_eq!(points[7], Point::new(12., 39.));
    assert_eq!(points[9], Point::new(10., 40.));
}

#[test]
fn first_page_gets_a_skewed_start() {
    let geometry = PageGeometry::build(&page(0, &[]), 2, &profile(), &SvgFormatOptions::default());
    // top, bottom, skewed start, trailing jigsaw
    assert_eq!(geometry.lines.len(), 3 + 9);
    assert_eq!(geometry.lines[0].from, Point::new(10., 0.));
    assert_eq!(
        geometry.lines[2],
        Line::new(Point::new(10., 0.), Point::new(0., 40.))
    );
}

#[test]
fn loop_mode_joins_both_ends() {
    let options = SvgFormatOptions {
        loop_mode: true,
        ..Default::default()
    };
    let geometry = PageGeometry::build(&page(0, &[]), 1, &profile(), &options);
    assert_eq!(geometry.lines.len(), 2 + 9 + 9);
    assert_eq!(geometry.lines[0].from, Point::new(0., 0.));
}

#[test]
fn omitted_boundaries_and_plain_edges() {
    let options = SvgFormatOptions {
        omit_page_boundaries: true,
        jigsaw_joiners: false,
        ..Default::default()
    };
    let middle = PageGeometry::build(&page(1, &[]), 3, &profile(), &options);
    assert_eq!(middle.lines.len(), 2);
    let last = PageGeometry::build(&page(2, &[]), 3, &profile(), &options);
    assert_eq!(
        last.lines[2],
        Line::new(Point::new(40., 0.), Point::new(40., 40.))
    );

    let bare = SvgFormatOptions {
        render_border: false,
        ..Default::default()
    };
    assert!(PageGeometry::build(&page(1, &[]), 3, &profile(), &bare).lines.is_empty());
}
