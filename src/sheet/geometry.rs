//! Page and card geometry in millimeters.

/// A4 portrait.
pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// Real cards are 65mm, but at that size the crop marks on A4 end up in the
/// non-printable border, so print them slightly smaller.
pub const CARD_SIDE_MM: f64 = 62.0;

const CROP_MARK_GAP_MM: f64 = 1.0;
const CROP_MARK_END_MM: f64 = 5.0;

/// Which face of the sheet is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Year, artist and title.
    Title,
    /// Scannable code, printed on the back of the title side.
    Code,
}

impl Side {
    /// Suffix used in footers and scratch file names: `1a`, `1b`, ...
    pub fn suffix(self) -> char {
        match self {
            Side::Title => 'a',
            Side::Code => 'b',
        }
    }
}

/// Layout of one sheet, constant for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub card_side_mm: f64,
    pub columns: usize,
    pub rows: usize,
    pub font: String,
    pub grid: bool,
    pub crop_marks: bool,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            page_width_mm: PAGE_WIDTH_MM,
            page_height_mm: PAGE_HEIGHT_MM,
            card_side_mm: CARD_SIDE_MM,
            columns: 3,
            rows: 4,
            font: "sans-serif".to_string(),
            grid: true,
            crop_marks: true,
        }
    }
}

/// Straight line segment from `(x1, y1)` to `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SheetLayout {
    /// Cards per page.
    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    pub fn table_width(&self) -> f64 {
        self.card_side_mm * self.columns as f64
    }

    pub fn table_height(&self) -> f64 {
        self.card_side_mm * self.rows as f64
    }

    /// Distance from the left and right page edge to the table.
    pub fn horizontal_margin(&self) -> f64 {
        (self.page_width_mm - self.table_width()) / 2.0
    }

    /// Same as the horizontal margin: the table is pinned top-left and the
    /// extra space at the bottom holds the page footer.
    pub fn vertical_margin(&self) -> f64 {
        self.horizontal_margin()
    }

    /// Outline of the whole table, only drawn with the grid enabled.
    pub fn grid_outline(&self) -> Option<Rect> {
        self.grid.then(|| Rect {
            x: self.horizontal_margin(),
            y: self.vertical_margin(),
            width: self.table_width(),
            height: self.table_height(),
        })
    }

    /// Cell separators, including the right and bottom edge.
    pub fn grid_lines(&self) -> Vec<Line> {
        if !self.grid {
            return Vec::new();
        }
        let (mx, my) = (self.horizontal_margin(), self.vertical_margin());
        let (tw, th) = (self.table_width(), self.table_height());
        let side = self.card_side_mm;

        let columns = (1..=self.columns).map(|ix| {
            let x = mx + ix as f64 * side;
            Line { x1: x, y1: my, x2: x, y2: my + th }
        });
        let rows = (1..=self.rows).map(|iy| {
            let y = my + iy as f64 * side;
            Line { x1: mx, y1: y, x2: mx + tw, y2: y }
        });
        columns.chain(rows).collect()
    }

    /// Short ticks outside the table at every column and row boundary.
    pub fn crop_marks(&self) -> Vec<Line> {
        if !self.crop_marks {
            return Vec::new();
        }
        let (mx, my) = (self.horizontal_margin(), self.vertical_margin());
        let (tw, th) = (self.table_width(), self.table_height());
        let side = self.card_side_mm;
        let mut marks = Vec::with_capacity(2 * (self.columns + self.rows + 2));

        for ix in 0..=self.columns {
            let x = mx + ix as f64 * side;
            marks.push(Line {
                x1: x,
                y1: my - CROP_MARK_END_MM,
                x2: x,
                y2: my - CROP_MARK_GAP_MM,
            });
            marks.push(Line {
                x1: x,
                y1: my + th + CROP_MARK_GAP_MM,
                x2: x,
                y2: my + th + CROP_MARK_END_MM,
            });
        }
        for iy in 0..=self.rows {
            let y = my + iy as f64 * side;
            marks.push(Line {
                x1: mx - CROP_MARK_END_MM,
                y1: y,
                x2: mx - CROP_MARK_GAP_MM,
                y2: y,
            });
            marks.push(Line {
                x1: mx + tw + CROP_MARK_GAP_MM,
                y1: y,
                x2: mx + tw + CROP_MARK_END_MM,
                y2: y,
            });
        }
        marks
    }

    /// Grid cell `(column, row)` of the card at `index` on the given side.
    ///
    /// The code side is printed on the back of the sheet, so its columns are
    /// flipped horizontally; rows are the same on both sides.
    ///
    /// # Panics
    ///
    /// Panics if the layout has no columns.
    pub fn slot(&self, index: usize, side: Side) -> (usize, usize) {
        let col = index % self.columns;
        let row = index / self.columns;
        match side {
            Side::Title => (col, row),
            Side::Code => (self.columns - 1 - col, row),
        }
    }

    /// Top-left corner of a cell.
    pub fn cell_origin(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.horizontal_margin() + col as f64 * self.card_side_mm,
            self.vertical_margin() + row as f64 * self.card_side_mm,
        )
    }

    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.horizontal_margin() + (col as f64 + 0.5) * self.card_side_mm,
            self.vertical_margin() + (row as f64 + 0.5) * self.card_side_mm,
        )
    }

    /// Position at which to place a square of `size` so it is centered in a cell.
    pub fn centered_in_cell(&self, col: usize, row: usize, size: f64) -> (f64, f64) {
        let (x, y) = self.cell_origin(col, row);
        let inset = (self.card_side_mm - size) / 2.0;
        (x + inset, y + inset)
    }

    /// Anchor for the page footer, right-aligned at the bottom-right margin.
    pub fn footer_anchor(&self) -> (f64, f64) {
        let margin = self.horizontal_margin();
        (self.page_width_mm - margin, self.page_height_mm - margin)
    }
}
