//! Glyph grid geometry (made by FontLab https://www.fontlab.com/)
//!
//! All values are in device pixels. Nothing here touches fonts; callers
//! supply measured text widths and line heights.

use log::debug;

/// Vertical padding inside cells and around the chrome.
pub const VPADDING: i32 = 5;
/// Horizontal padding inside cells and around the chrome.
pub const HPADDING: i32 = 5;
/// Share of a cell's height given to the family name.
pub const NAME_SPACE: f64 = 0.2;
/// Border width of grid rectangles.
pub const BORDER_WIDTH: f32 = 2.0;
/// Label size the title scale is computed from.
pub const INITIAL_LABEL_SIZE: f32 = 12.0;
/// Size of the quit button and title text.
pub const CHROME_FONT_SIZE: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges are inclusive, matching how the border is drawn.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        let dx = px - self.x;
        let dy = py - self.y;
        (0..=self.width).contains(&dx) && (0..=self.height).contains(&dy)
    }
}

/// Rows and columns for `count` cells over a `width` x `height` area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub count: usize,
    pub columns: i32,
    pub rows: i32,
    pub cell_width: i32,
    pub cell_height: i32,
    /// Height of the family name strip at the top of each cell.
    pub name_strip: i32,
    /// Height available for rendering the name.
    pub name_height: i32,
    /// Height available for rendering the glyph; also its pixel size.
    pub glyph_height: i32,
    /// Width available for both name and glyph.
    pub content_width: i32,
    pub y_offset: i32,
}

/// Where one cell's pieces go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    pub frame: Rect,
    /// Left edge of the content area (frame plus padding).
    pub content_x: i32,
    pub name_baseline: i32,
    /// Glyph baseline before the font's descent is subtracted.
    pub glyph_bottom: i32,
}

impl GridLayout {
    /// `None` when there is nothing to draw or the area is too small.
    pub fn compute(count: usize, width: u32, height: u32, y_offset: i32) -> Option<Self> {
        if count == 0 || width == 0 || height == 0 {
            return None;
        }

        let c = count as f64;
        let (w, h) = (f64::from(width), f64::from(height));
        let columns = ((c * w / h).sqrt().round() as i32).max(1);
        let rows = (count as i32 + columns - 1) / columns;
        let cell_width = (w / f64::from(columns)).floor() as i32;
        let cell_height = (h / f64::from(rows)).floor() as i32;
        let name_strip = (f64::from(cell_height) * NAME_SPACE) as i32;
        let glyph_strip = cell_height - name_strip;
        let name_height = name_strip - 2 * VPADDING;
        let glyph_height = glyph_strip - 2 * VPADDING;
        let content_width = cell_width - 2 * HPADDING;

        debug!("grid {columns}x{rows}, cells {cell_width}x{cell_height}");

        if name_height <= 0 || glyph_height <= 0 || content_width <= 0 {
            debug!("window too small for {count} cells");
            return None;
        }

        Some(Self {
            count,
            columns,
            rows,
            cell_width,
            cell_height,
            name_strip,
            name_height,
            glyph_height,
            content_width,
            y_offset,
        })
    }

    pub fn cell(&self, index: usize) -> CellGeometry {
        let col = index as i32 % self.columns;
        let row = index as i32 / self.columns;
        let x = col * self.cell_width;
        let top = row * self.cell_height + self.y_offset;

        CellGeometry {
            frame: Rect::new(x, top, self.cell_width, self.cell_height),
            content_x: x + HPADDING,
            name_baseline: top + self.name_height + VPADDING,
            glyph_bottom: top + self.name_strip + self.glyph_height + VPADDING,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = CellGeometry> + '_ {
        (0..self.count).map(|i| self.cell(i))
    }

    /// Offset that centers `ink_width` inside the content area, never negative.
    pub fn center_offset(&self, ink_width: f32) -> f32 {
        center_offset(self.content_width as f32, ink_width)
    }
}

pub fn center_offset(available: f32, ink_width: f32) -> f32 {
    ((available - ink_width) / 2.0).max(0.0)
}

/// Scale factor that lets every label fit a `width` x `height` box.
///
/// `widths` are label widths measured at [`INITIAL_LABEL_SIZE`]; `line_height`
/// is the font's line height at that size. Zero-width labels only constrain
/// the height.
pub fn fit_label_scale<I>(widths: I, line_height: f32, width: i32, height: i32) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
{
    if line_height <= 0.0 || width <= 0 || height <= 0 {
        return None;
    }

    let yscale = height as f32 / line_height;
    widths
        .into_iter()
        .map(|w| {
            if w > 0.0 {
                (width as f32 / w).min(yscale)
            } else {
                yscale
            }
        })
        .reduce(f32::min)
}

/// Quit button frame and the y coordinate where the grid starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chrome {
    pub quit_button: Rect,
    pub text_baseline: i32,
    pub title_x: i32,
    pub grid_top: i32,
}

impl Chrome {
    pub fn compute(quit_text_width: f32, line_height: f32, descent: f32) -> Self {
        let width = 2 * HPADDING + quit_text_width.ceil() as i32;
        let height = 2 * VPADDING + line_height.ceil() as i32;
        Self {
            quit_button: Rect::new(HPADDING, VPADDING, width, height),
            text_baseline: 2 * VPADDING + (line_height - descent).round() as i32,
            title_x: 2 * HPADDING + width,
            grid_top: height + 2 * VPADDING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_font_fills_the_area() {
        let grid = GridLayout::compute(1, 800, 570, 30).expect("grid");
        assert_eq!((grid.columns, grid.rows), (1, 1));
        assert_eq!((grid.cell_width, grid.cell_height), (800, 570));
        assert_eq!(grid.name_strip, 114);
        assert_eq!(grid.name_height, 104);
        assert_eq!(grid.glyph_height, 446);
        assert_eq!(grid.content_width, 790);
    }

    #[test]
    fn every_font_gets_a_cell() {
        // round(7 / 3) would only give two rows here.
        let grid = GridLayout::compute(7, 800, 570, 0).expect("grid");
        assert_eq!(grid.columns, 3);
        assert_eq!(grid.rows, 3);
        assert!((grid.columns * grid.rows) as usize >= 7);
    }

    #[test]
    fn cells_walk_rows_left_to_right() {
        let grid = GridLayout::compute(4, 400, 400, 20).expect("grid");
        assert_eq!((grid.columns, grid.rows), (2, 2));

        let third = grid.cell(2);
        assert_eq!(third.frame, Rect::new(0, 220, 200, 200));
        assert_eq!(third.content_x, HPADDING);
        assert_eq!(third.name_baseline, 220 + grid.name_height + VPADDING);
        assert_eq!(
            third.glyph_bottom,
            220 + grid.name_strip + grid.glyph_height + VPADDING
        );
    }

    #[test]
    fn wide_area_keeps_the_aspect_ratio_column_count() {
        // Columns follow the aspect ratio even when that leaves some empty.
        let grid = GridLayout::compute(2, 2000, 100, 0).expect("grid");
        assert_eq!((grid.columns, grid.rows), (6, 1));
        assert_eq!(grid.cell_width, 333);
        assert_eq!(grid.cell(1).frame, Rect::new(333, 0, 333, 100));
    }

    #[test]
    fn tall_narrow_area_keeps_one_column() {
        let grid = GridLayout::compute(2, 100, 2000, 0).expect("grid");
        assert_eq!(grid.columns, 1);
        assert_eq!(grid.rows, 2);
    }

    #[test]
    fn tiny_windows_draw_no_grid() {
        assert!(GridLayout::compute(100, 60, 40, 0).is_none());
        assert!(GridLayout::compute(0, 800, 600, 0).is_none());
        assert!(GridLayout::compute(3, 800, 0, 0).is_none());
    }

    #[test]
    fn label_scale_is_limited_by_widest_name_and_height() {
        let scale = fit_label_scale([50.0, 100.0], 15.0, 200, 30).expect("scale");
        assert_eq!(scale, 2.0);

        let tall_limit = fit_label_scale([10.0], 15.0, 200, 30).expect("scale");
        assert_eq!(tall_limit, 2.0);

        assert!(fit_label_scale(Vec::<f32>::new(), 15.0, 200, 30).is_none());
    }

    #[test]
    fn centering_never_pushes_left() {
        assert_eq!(center_offset(100.0, 40.0), 30.0);
        assert_eq!(center_offset(100.0, 140.0), 0.0);
    }

    #[test]
    fn quit_button_hit_test_is_inclusive() {
        let chrome = Chrome::compute(30.0, 17.0, 4.0);
        let button = chrome.quit_button;
        assert_eq!(button, Rect::new(5, 5, 40, 27));
        assert!(button.contains(5, 5));
        assert!(button.contains(45, 32));
        assert!(!button.contains(46, 10));
        assert!(!button.contains(4, 10));
        assert_eq!(chrome.grid_top, 37);
        assert_eq!(chrome.title_x, 50);
    }
}
