#![doc = r#"
Standalone SVG documents for [`PageGeometry`].

The documents are sized in millimeters and declare the SVG namespace, so they
open as images when saved to disk and print at true scale.
"#]

use crate::layout::{Circle, Line, PageGeometry};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const STROKE: &str = "black";

/// File name for page `page` of a tape made from `base`: `<base>_page_<page>.<extension>`.
///
/// ```rust
/// assert_eq!(musicbox_svg::svg::export_file_name("waltz", 2, "svg"), "waltz_page_2.svg");
/// ```
pub fn export_file_name(base: &str, page: usize, extension: &str) -> String {
    format!("{base}_page_{page}.{extension}")
}

impl PageGeometry {
    /// Render this page as an SVG document.
    ///
    /// One user unit of the view box is one millimeter.
    pub fn to_svg(&self) -> String {
        let mut svg = SvgBuilder::new(self.width_mm, self.height_mm);
        for line in &self.lines {
            svg.line(line);
        }
        for hole in &self.holes {
            svg.circle(hole);
        }
        svg.build()
    }
}

struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
        }
    }

    fn build(self) -> String {
        let (width, height) = (mm(self.width), mm(self.height));
        let mut svg = format!(
            r#"<svg xmlns="{SVG_NAMESPACE}" width="{width}mm" height="{height}mm" viewBox="0 0 {width} {height}">"#
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn line(&mut self, line: &Line) {
        self.elements.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{STROKE}" stroke-width="0.1"/>"#,
            mm(line.from.x),
            mm(line.from.y),
            mm(line.to.x),
            mm(line.to.y),
        ));
    }

    fn circle(&mut self, hole: &Circle) {
        self.elements.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{STROKE}" stroke-width="0.1"/>"#,
            mm(hole.center.x),
            mm(hole.center.y),
            mm(hole.radius),
        ));
    }
}

/// Rounds to a micrometer so float noise stays out of the document.
fn mm(value: f64) -> f64 {
    let rounded = (value * 1000.).round() / 1000.;
    // avoid "-0"
    if rounded == 0. { 0. } else { rounded }
}

#[cfg(test)]
use crate::{layout::Point, note};
#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn file_names() {
    assert_eq!(export_file_name("scale", 0, "svg"), "scale_page_0.svg");
    assert_eq!(export_file_name("my song", 12, "png"), "my song_page_12.png");
}

#[test]
fn document_shape() {
    let geometry = PageGeometry {
        number: 0,
        width_mm: 42.,
        height_mm: 41.,
        holes: vec![Circle {
            center: Point::new(10.5, 6.),
            radius: 0.9,
            note: note!(C, 6),
        }],
        lines: vec![Line::new(Point::new(0., 0.), Point::new(40.000000001, 0.))],
    };
    let svg = geometry.to_svg();
    assert_eq!(
        svg,
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="42mm" height="41mm" viewBox="0 0 42 41">"#,
            "\n",
            r#"  <line x1="0" y1="0" x2="40" y2="0" stroke="black" stroke-width="0.1"/>"#,
            "\n",
            r#"  <circle cx="10.5" cy="6" r="0.9" fill="none" stroke="black" stroke-width="0.1"/>"#,
            "\n</svg>\n"
        )
    );
}
