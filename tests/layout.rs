mod common;

use common::{TrackBytes, scale_fixture, single_track, smf};
use musicbox_svg::{generate, note, prelude::*, svg::export_file_name};
use pretty_assertions::assert_eq;

fn fifteen() -> MusicBoxProfile {
    BuiltInProfile::FifteenNote.profile()
}

fn page_width(page_width_mm: f64) -> SvgFormatOptions {
    SvgFormatOptions {
        page_width_mm,
        ..Default::default()
    }
}

fn layout(bytes: &[u8], options: &SvgFormatOptions) -> Result<TapeLayout, Error> {
    generate(bytes, &fifteen(), options).map(|(_, layout)| layout)
}

#[test]
fn scale_pages() {
    // 40mm at 20mm/s is two seconds a page
    let layout = layout(&scale_fixture(), &page_width(40.)).unwrap();
    let pages = layout.pages();

    let counts: Vec<usize> = pages.iter().map(|page| page.notes.len()).collect();
    assert_eq!(counts, [3, 4, 1]);
    assert_eq!(pages[0].start_seconds, -(10. + 0.9) / 20.);
    assert_eq!(pages[0].end_seconds, 1.25);
    assert_eq!(pages[1].end_seconds, 3.25);
    assert_eq!(pages[2].end_seconds, 4.);

    for pair in pages.windows(2) {
        assert_eq!(pair[0].end_seconds, pair[1].start_seconds);
        assert!(pair[0].start_seconds < pair[1].start_seconds);
    }
    for page in pages {
        assert!(page.duration_seconds() <= 2.);
    }

    let diagnostics = layout.diagnostics();
    assert_eq!(diagnostics.transposed_count, 0);
    assert_eq!(diagnostics.skipped_count, 0);
    assert_eq!(diagnostics.unsupported_count, 0);
    assert!(diagnostics.warnings.is_empty());
    let expected_mm = (4. + (10. + 0.9) / 20.) * 20.;
    assert!((diagnostics.total_paper_length_mm - expected_mm).abs() < 1e-9);
}

#[test]
fn scale_geometry() {
    let layout = layout(&scale_fixture(), &page_width(0.)).unwrap();
    assert_eq!(layout.num_pages(), 1);

    let page = &layout.page_geometry()[0];
    let profile = fifteen();
    assert_eq!(page.height_mm, 41.);
    assert_eq!(page.holes.len(), 8);

    // C4 is the lowest lane, C6 the highest: 29mm over 14 gaps
    let gap = 29. / 14.;
    let first = page.holes[0];
    assert_eq!(first.note, note!(C, 4));
    assert!((first.center.x - (10. + 0.9)).abs() < 1e-9);
    assert!((first.center.y - (6. + 14. * gap)).abs() < 1e-9);
    let last = page.holes[7];
    assert_eq!(last.note, note!(C, 5));
    assert!((last.center.y - (6. + 7. * gap)).abs() < 1e-9);
    assert!(page.holes.iter().all(|hole| hole.radius == 0.9));
    assert!(
        page.holes
            .windows(2)
            .all(|pair| pair[0].center.y > pair[1].center.y)
    );

    let expected_width = profile.seconds_to_mm(4. + 0.545) + 2.;
    assert!((page.width_mm - expected_width).abs() < 1e-9);
}

#[test]
fn transposition() {
    // C8 is two octaves above the top of the box
    let bytes = single_track(&[(0, 60), (96, 108)]);

    let transposed = SvgFormatOptions {
        transpose_out_of_range_notes: true,
        ..Default::default()
    };
    let layout = self::layout(&bytes, &transposed).unwrap();
    let holes = &layout.page_geometry()[0].holes;
    assert_eq!(holes.len(), 2);
    assert!(holes.iter().all(|hole| hole.note.key() == Key::C));
    assert_eq!(holes[1].note, note!(C, 4));
    assert_eq!(layout.diagnostics().transposed_count, 1);
    assert_eq!(layout.diagnostics().unsupported_count, 0);

    let layout = self::layout(&bytes, &SvgFormatOptions::default()).unwrap();
    assert_eq!(layout.page_geometry()[0].holes.len(), 1);
    assert_eq!(layout.diagnostics().transposed_count, 0);
    assert_eq!(layout.diagnostics().unsupported_count, 1);
    assert_eq!(layout.diagnostics().warnings.len(), 1);
}

#[test]
fn coalescing() {
    // 12 ticks is 0.0625s, under the 0.2s minimum gap
    let close = layout(&single_track(&[(0, 60), (12, 60)]), &page_width(0.)).unwrap();
    assert_eq!(close.pages()[0].notes.len(), 1);
    assert_eq!(close.diagnostics().skipped_count, 1);

    // 48 ticks is 0.25s
    let apart = layout(&single_track(&[(0, 60), (48, 60)]), &page_width(0.)).unwrap();
    assert_eq!(apart.pages()[0].notes.len(), 2);
    assert_eq!(apart.diagnostics().skipped_count, 0);
}

#[test]
fn layout_errors() {
    let tempo_only = smf(1, 96, &[TrackBytes::new().tempo(0, 500_000).end(0)]);
    assert!(matches!(
        layout(&tempo_only, &page_width(0.)),
        Err(Error::Layout(LayoutError::NoMusicTrack { index: 1 }))
    ));

    // C#4 has no octave on a diatonic box
    let sharp = single_track(&[(0, 61)]);
    let options = SvgFormatOptions {
        transpose_out_of_range_notes: true,
        ..Default::default()
    };
    assert!(matches!(
        layout(&sharp, &options),
        Err(Error::Layout(LayoutError::NoPlayableNotes { unsupported: 1 }))
    ));

    // five seconds of rest on two second pages
    let rest = single_track(&[(0, 60), (960, 62)]);
    assert!(matches!(
        layout(&rest, &page_width(40.)),
        Err(Error::Layout(LayoutError::PageTooSmall { .. }))
    ));

    let stopped = MusicBoxProfile {
        millimeters_per_second: 0.,
        ..fifteen()
    };
    assert!(matches!(
        generate(&scale_fixture(), &stopped, &page_width(40.)),
        Err(Error::Layout(LayoutError::InvalidProfile(
            ProfileError::NotPositive { .. }
        )))
    ));

    assert!(matches!(
        layout(&[0x4D, 0x54], &page_width(40.)),
        Err(Error::Read(e)) if e.is_malformed()
    ));
}

#[test]
fn page_height_warning() {
    let options = SvgFormatOptions {
        page_height_mm: 30.,
        ..Default::default()
    };
    let layout = layout(&scale_fixture(), &options).unwrap();
    assert_eq!(layout.diagnostics().warnings.len(), 1);
}

#[test]
fn same_input_same_layout() {
    let options = SvgFormatOptions {
        page_width_mm: 30.,
        loop_mode: true,
        ..Default::default()
    };
    let first = layout(&scale_fixture(), &options).unwrap();
    let second = layout(&scale_fixture(), &options).unwrap();
    assert_eq!(first, second);

    let documents = |layout: &TapeLayout| -> Vec<(String, String)> {
        layout
            .page_geometry()
            .iter()
            .map(|page| (export_file_name("scale", page.number, "svg"), page.to_svg()))
            .collect()
    };
    let pages = documents(&first);
    assert_eq!(pages, documents(&second));
    assert_eq!(pages.len(), first.num_pages());
    assert_eq!(pages[0].0, "scale_page_0.svg");
    assert!(pages.iter().all(|(_, svg)| svg.contains(r#"height="41mm""#)));
}
