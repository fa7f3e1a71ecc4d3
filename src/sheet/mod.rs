//! Two-sided card sheets rendered as SVG.

mod geometry;
mod paint;
mod text;

pub use geometry::{
    CARD_SIDE_MM, Line, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, Rect, SheetLayout, Side,
};
pub use paint::render_page;
pub use text::{MAX_LINE_CHARS, escape, fit_lines, num};
