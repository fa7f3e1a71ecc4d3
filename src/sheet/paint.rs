use crate::deck::Page;
use crate::qr::{CodeError, CodeGenerator};
use crate::track::Track;

use super::geometry::{Line, SheetLayout, Side};
use super::text::{escape, fit_lines, num};

const LINE_HEIGHT_MM: f64 = 6.0;
const YEAR_OFFSET_MM: f64 = 6.5;
const ARTIST_OFFSET_MM: f64 = -19.0;
const TITLE_OFFSET_MM: f64 = 18.0;

/// Render one side of a page as a standalone SVG document in millimeters.
///
/// Only the code side consults `codes`; the title side cannot fail.
pub fn render_page(
    page: &Page,
    layout: &SheetLayout,
    side: Side,
    footer: &str,
    codes: &dyn CodeGenerator,
) -> Result<String, CodeError> {
    let (w, h) = (num(layout.page_width_mm), num(layout.page_height_mm));
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(
        r#"<svg version="1.1" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#
    ));
    parts.push(format!(
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="white"/>"#
    ));
    parts.push(style_block(&layout.font));

    if let Some(outline) = layout.grid_outline() {
        parts.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke-linejoin="miter"/>"#,
            num(outline.x),
            num(outline.y),
            num(outline.width),
            num(outline.height),
        ));
    }
    parts.extend(layout.grid_lines().iter().map(line));
    parts.extend(layout.crop_marks().iter().map(line));

    for (index, track) in page.tracks().iter().enumerate() {
        let (col, row) = layout.slot(index, side);
        match side {
            Side::Title => {
                let (x, y) = layout.cell_center(col, row);
                title_card(&mut parts, track, x, y);
            }
            Side::Code => {
                let symbol = codes.generate(&track.url)?;
                let (x, y) = layout.centered_in_cell(col, row, symbol.side_mm);
                parts.push(format!(r#"<g transform="translate({}, {})">"#, num(x), num(y)));
                parts.push(symbol.path);
                parts.push("</g>".to_string());
            }
        }
    }

    let (fx, fy) = layout.footer_anchor();
    parts.push(format!(
        r#"<text x="{}" y="{}" text-anchor="end" class="footer">{}</text>"#,
        num(fx),
        num(fy),
        escape(footer),
    ));
    parts.push("</svg>".to_string());
    Ok(parts.join("\n"))
}

fn style_block(font: &str) -> String {
    format!(
        "<style>\n\
         text {{ font-family: '{}'; }}\n\
         .year {{ font-size: 18px; font-weight: 900; }}\n\
         .title, .artist, .footer {{ font-size: 5.2px; font-weight: 400; }}\n\
         .title {{ font-style: italic; }}\n\
         rect, line {{ stroke: black; stroke-width: 0.2; }}\n\
         </style>",
        escape(font)
    )
}

fn line(l: &Line) -> String {
    format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
        num(l.x1),
        num(l.y1),
        num(l.x2),
        num(l.y2),
    )
}

fn title_card(parts: &mut Vec<String>, track: &Track, x: f64, y: f64) {
    parts.push(format!(
        r#"<text x="{}" y="{}" text-anchor="middle" class="year">{}</text>"#,
        num(x),
        num(y + YEAR_OFFSET_MM),
        track.year,
    ));
    text_block(parts, x, y + ARTIST_OFFSET_MM, &track.artist, "artist");
    text_block(parts, x, y + TITLE_OFFSET_MM, &track.title, "title");
}

/// Stack the fitted lines of `s` so the block is vertically centered on `y`.
fn text_block(parts: &mut Vec<String>, x: f64, y: f64, s: &str, class: &str) {
    let lines = fit_lines(s);
    let height = LINE_HEIGHT_MM * lines.len() as f64;
    for (i, text) in lines.iter().enumerate() {
        let dy = LINE_HEIGHT_MM * (i + 1) as f64 - height / 2.0;
        parts.push(format!(
            r#"<text x="{}" y="{}" text-anchor="middle" class="{class}">{}</text>"#,
            num(x),
            num(y + dy),
            escape(text),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::paginate;
    use crate::qr::CodeSymbol;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    struct FixedCode;

    impl CodeGenerator for FixedCode {
        fn generate(&self, payload: &str) -> Result<CodeSymbol, CodeError> {
            Ok(CodeSymbol {
                path: format!(r#"<path data-payload="{payload}"/>"#),
                side_mm: 30.0,
            })
        }
    }

    struct FailingCode;

    impl CodeGenerator for FailingCode {
        fn generate(&self, payload: &str) -> Result<CodeSymbol, CodeError> {
            Err(CodeError::Encode {
                payload: payload.to_string(),
                reason: "too long".to_string(),
            })
        }
    }

    fn page_of(tracks: Vec<Track>) -> Page {
        paginate(tracks, 12).remove(0)
    }

    fn track(title: &str, artist: &str, year: i32) -> Track {
        Track {
            year,
            source: PathBuf::from("a.flac"),
            title: title.to_string(),
            artist: artist.to_string(),
            md5sum: "abc".to_string(),
            url: format!("u/{title}"),
        }
    }

    #[test]
    fn title_side_places_year_artist_and_title() {
        let page = page_of(vec![track("Heroes", "David Bowie", 1977)]);
        let svg = render_page(&page, &SheetLayout::default(), Side::Title, "1a", &FailingCode)
            .unwrap();
        assert!(svg.starts_with(r#"<svg version="1.1" width="210mm" height="297mm" viewBox="0 0 210 297""#));
        assert!(svg.contains(r#"<text x="43" y="49.5" text-anchor="middle" class="year">1977</text>"#));
        assert!(svg.contains(r#"<text x="43" y="27" text-anchor="middle" class="artist">David Bowie</text>"#));
        assert!(svg.contains(r#"<text x="43" y="64" text-anchor="middle" class="title">Heroes</text>"#));
        assert!(svg.contains(r#"<text x="198" y="285" text-anchor="end" class="footer">1a</text>"#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn long_titles_are_stacked_around_the_anchor() {
        let page = page_of(vec![track("Everybody Wants to Rule the World", "Tears for Fears", 1985)]);
        let svg = render_page(&page, &SheetLayout::default(), Side::Title, "1a", &FailingCode)
            .unwrap();
        assert!(svg.contains(r#"y="61" text-anchor="middle" class="title">Everybody Wants</text>"#));
        assert!(svg.contains(r#"y="67" text-anchor="middle" class="title">to Rule the World</text>"#));
    }

    #[test]
    fn text_is_escaped() {
        let page = page_of(vec![track("Rock & Roll <Live>", "AC/DC \"Live\"", 1986)]);
        let svg = render_page(&page, &SheetLayout::default(), Side::Title, "x&y", &FailingCode)
            .unwrap();
        assert!(svg.contains(">Rock &amp; Roll &lt;Live&gt;</text>"));
        assert!(svg.contains(">AC/DC &quot;Live&quot;</text>"));
        assert!(svg.contains(">x&amp;y</text>"));
    }

    #[test]
    fn code_side_is_mirrored_and_centered() {
        let page = page_of(vec![
            track("one", "a", 2000),
            track("two", "a", 2000),
            track("three", "a", 2000),
            track("four", "a", 2000),
        ]);
        let svg = render_page(&page, &SheetLayout::default(), Side::Code, "1b", &FixedCode)
            .unwrap();
        // Cells start at x = 12, 74, 136; a 30mm code is inset by 16mm.
        let expected = [
            (r#"translate(152, 28)"#, "u/one"),
            (r#"translate(90, 28)"#, "u/two"),
            (r#"translate(28, 28)"#, "u/three"),
            (r#"translate(152, 90)"#, "u/four"),
        ];
        for (translate, payload) in expected {
            let group = format!(
                "<g transform=\"{translate}\">\n<path data-payload=\"{payload}\"/>\n</g>"
            );
            assert!(svg.contains(&group), "missing {group}");
        }
        assert!(!svg.contains("class=\"year\""));
    }

    #[test]
    fn grid_and_marks_follow_layout_toggles() {
        let page = page_of(vec![track("t", "a", 1990)]);
        let layout = SheetLayout {
            grid: false,
            crop_marks: false,
            ..SheetLayout::default()
        };
        let svg = render_page(&page, &layout, Side::Title, "1a", &FailingCode).unwrap();
        assert!(!svg.contains("<line"));
        assert!(!svg.contains("stroke-linejoin"));

        let svg = render_page(&page, &SheetLayout::default(), Side::Title, "1a", &FailingCode)
            .unwrap();
        assert_eq!(svg.matches("<line").count(), 7 + 18);
        assert!(svg.contains(
            r#"<rect x="12" y="12" width="186" height="248" fill="none" stroke-linejoin="miter"/>"#
        ));
    }

    #[test]
    fn code_failures_propagate() {
        let page = page_of(vec![track("t", "a", 1990)]);
        let err = render_page(&page, &SheetLayout::default(), Side::Code, "1b", &FailingCode)
            .unwrap_err();
        assert!(err.to_string().contains("u/t"));
    }

    #[test]
    fn uses_configured_font() {
        let page = page_of(vec![track("t", "a", 1990)]);
        let layout = SheetLayout {
            font: "Cantarell".to_string(),
            ..SheetLayout::default()
        };
        let svg = render_page(&page, &layout, Side::Title, "1a", &FailingCode).unwrap();
        assert!(svg.contains("text { font-family: 'Cantarell'; }"));
    }
}
