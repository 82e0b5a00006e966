//! Page and export options for a tape layout.

/// Formatting and pagination applied when generating page geometry.
///
/// A width or height of `0` means unbounded.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SvgFormatOptions {
    /// Max page width in millimeters; longer tapes are split into pages.
    pub page_width_mm: f64,
    /// Max page height in millimeters; only checked against the paper width.
    pub page_height_mm: f64,
    /// Padding before the first note, in millimeters.
    pub start_padding_mm: f64,
    /// Whether to draw the rectangular border
    pub render_border: bool,
    /// Omit the edges between consecutive pages
    pub omit_page_boundaries: bool,
    /// Move out of range notes by whole octaves into range, where possible
    pub transpose_out_of_range_notes: bool,
    /// Draw jigsaw teeth on joined edges instead of straight lines
    pub jigsaw_joiners: bool,
    /// Give the first and last page joiners so the tape can be closed into a loop
    pub loop_mode: bool,
}

impl Default for SvgFormatOptions {
    fn default() -> Self {
        Self {
            page_width_mm: 200.,
            page_height_mm: 0.,
            start_padding_mm: 10.,
            render_border: true,
            omit_page_boundaries: false,
            transpose_out_of_range_notes: false,
            jigsaw_joiners: true,
            loop_mode: false,
        }
    }
}

impl SvgFormatOptions {
    /// Page width, or `None` when pages are unbounded
    pub fn page_width(&self) -> Option<f64> {
        (self.page_width_mm > 0.).then_some(self.page_width_mm)
    }

    /// Page height, or `None` when pages are unbounded
    pub fn page_height(&self) -> Option<f64> {
        (self.page_height_mm > 0.).then_some(self.page_height_mm)
    }
}
