//! Character-grid drawing surface for terminal output

use flurry_core::Rect;
use flurry_particles::{ImageHandle, Renderer, Shape};
use std::fmt;

const BLANK: char = ' ';

/// Maps a `width` x `height` surface onto a `cols` x `rows` grid of cells.
/// Each draw marks the cell under the center of its bounds.
pub struct TextSurface {
    width: f64,
    height: f64,
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    draws: usize,
}

impl TextSurface {
    pub fn new(width: f64, height: f64, cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            width,
            height,
            cols,
            rows,
            cells: vec![BLANK; cols * rows],
            draws: 0,
        }
    }

    /// Draw calls since the last full clear
    pub fn draws(&self) -> usize {
        self.draws
    }

    fn cell_of(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if x < 0.0 || y < 0.0 || x >= self.width || y >= self.height {
            return None;
        }
        let col = (x / self.width * self.cols as f64) as usize;
        let row = (y / self.height * self.rows as f64) as usize;
        Some((col.min(self.cols - 1), row.min(self.rows - 1)))
    }

    fn mark(&mut self, bounds: Rect, glyph: char) {
        self.draws += 1;
        let center = bounds.center();
        if let Some((col, row)) = self.cell_of(center.x, center.y) {
            self.cells[row * self.cols + col] = glyph;
        }
    }

    /// Glyph at a cell, for inspection
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }
}

impl Renderer for TextSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self, area: Rect) {
        if area.x <= 0.0
            && area.y <= 0.0
            && area.width >= self.width
            && area.height >= self.height
        {
            self.cells.fill(BLANK);
            self.draws = 0;
            return;
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                let x = (col as f64 + 0.5) / self.cols as f64 * self.width;
                let y = (row as f64 + 0.5) / self.rows as f64 * self.height;
                if area.contains(flurry_core::Vec2::new(x, y)) {
                    self.cells[row * self.cols + col] = BLANK;
                }
            }
        }
    }

    fn fill_shape(&mut self, shape: Shape, bounds: Rect) {
        let glyph = match shape {
            Shape::Circle => 'o',
            Shape::Square => '#',
        };
        self.mark(bounds, glyph);
    }

    fn draw_image(&mut self, _image: &ImageHandle, bounds: Rect) {
        self.mark(bounds, '*');
    }
}

impl fmt::Display for TextSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = "-".repeat(self.cols);
        writeln!(f, "+{border}+")?;
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().collect();
            writeln!(f, "|{line}|")?;
        }
        write!(f, "+{border}+")
    }
}
