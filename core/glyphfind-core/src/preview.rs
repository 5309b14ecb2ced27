//! Glyph grid preview: chrome, title and one cell per font (made by FontLab https://www.fontlab.com/)

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use tiny_skia::{Pixmap, PixmapMut};

use crate::codepoint::TargetChar;
use crate::fontset::FontPattern;
use crate::layout::{
    fit_label_scale, Chrome, GridLayout, BORDER_WIDTH, CHROME_FONT_SIZE, HPADDING,
    INITIAL_LABEL_SIZE,
};
use crate::render::{Canvas, FontData, FontLibrary, BACKGROUND};

/// Families tried, in order, for the quit button, title and font names.
pub const LABEL_FAMILIES: [&str; 6] = [
    "Charter",
    "Bitstream Charter",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
];

const QUIT_TEXT: &str = "Quit";

/// Everything a repaint needs to know, independent of any window.
#[derive(Debug, Clone)]
pub struct PreviewModel {
    pub target: TargetChar,
    pub name: Option<String>,
    pub fonts: Vec<FontPattern>,
    pub label_font: Option<FontPattern>,
}

impl PreviewModel {
    /// `U+0041 LATIN CAPITAL LETTER A`, or just the label when unnamed.
    pub fn title(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {name}", self.target.label()),
            None => self.target.label(),
        }
    }

    pub fn window_title(&self) -> String {
        format!("glyphfind {}", self.title())
    }
}

/// Paints a [`PreviewModel`], keeping font files loaded between paints.
#[derive(Debug)]
pub struct PreviewPainter {
    model: PreviewModel,
    library: FontLibrary,
}

impl PreviewPainter {
    pub fn new(model: PreviewModel) -> Self {
        Self {
            model,
            library: FontLibrary::new(),
        }
    }

    pub fn model(&self) -> &PreviewModel {
        &self.model
    }

    /// Repaint the whole canvas and return the chrome geometry for hit-testing.
    pub fn paint(&mut self, pixmap: PixmapMut<'_>) -> Result<Chrome> {
        let mut canvas = Canvas::new(pixmap);
        canvas.clear(BACKGROUND);

        let label = match &self.model.label_font {
            Some(pattern) => Some(self.library.load(&pattern.file, pattern.index)?),
            None => None,
        };

        let chrome = self.paint_chrome(&mut canvas, label.as_ref())?;
        let (width, height) = (canvas.width(), canvas.height());
        let grid_height = height.saturating_sub(chrome.grid_top.max(0) as u32);

        match GridLayout::compute(self.model.fonts.len(), width, grid_height, chrome.grid_top) {
            Some(grid) => self.paint_grid(&mut canvas, &grid, label.as_ref())?,
            None => debug!("no grid drawn at {width}x{height}"),
        }

        Ok(chrome)
    }

    fn paint_chrome(&self, canvas: &mut Canvas<'_>, label: Option<&FontData>) -> Result<Chrome> {
        let Some(label) = label else {
            // Without a label font only the button frame is drawn.
            let size = CHROME_FONT_SIZE;
            let chrome = Chrome::compute(
                size * 0.6 * QUIT_TEXT.len() as f32,
                size * 1.2,
                size * 0.2,
            );
            canvas.stroke_rect(chrome.quit_button, BORDER_WIDTH);
            return Ok(chrome);
        };

        let face = label.face()?;
        let metrics = face.line_metrics(CHROME_FONT_SIZE);
        let chrome = Chrome::compute(
            face.advance(QUIT_TEXT, CHROME_FONT_SIZE),
            metrics.height,
            metrics.descent,
        );

        canvas.stroke_rect(chrome.quit_button, BORDER_WIDTH);
        let baseline = chrome.text_baseline as f32;
        canvas.draw_text(
            &face,
            CHROME_FONT_SIZE,
            (2 * HPADDING) as f32,
            baseline,
            QUIT_TEXT,
        )?;
        canvas.draw_text(
            &face,
            CHROME_FONT_SIZE,
            chrome.title_x as f32,
            baseline,
            &self.model.title(),
        )?;

        Ok(chrome)
    }

    fn paint_grid(
        &mut self,
        canvas: &mut Canvas<'_>,
        grid: &GridLayout,
        label: Option<&FontData>,
    ) -> Result<()> {
        let label_face = match label {
            Some(data) => Some(data.face()?),
            None => None,
        };
        let label_size = label_face.as_ref().and_then(|face| {
            let line_height = face.line_metrics(INITIAL_LABEL_SIZE).height;
            let widths = self
                .model
                .fonts
                .iter()
                .map(|font| face.advance(&font.family, INITIAL_LABEL_SIZE));
            fit_label_scale(widths, line_height, grid.content_width, grid.name_height)
                .map(|scale| INITIAL_LABEL_SIZE * scale)
        });

        let target = self.model.target.char();
        let glyph_size = grid.glyph_height as f32;

        for (font, cell) in self.model.fonts.iter().zip(grid.cells()) {
            canvas.stroke_rect(cell.frame, BORDER_WIDTH);
            debug!("cell {:?} for {}", cell.frame, font.family);

            if let (Some(face), Some(size)) = (label_face.as_ref(), label_size) {
                let name_width = face.advance(&font.family, size);
                let x = cell.content_x as f32 + grid.center_offset(name_width);
                canvas.draw_text(face, size, x, cell.name_baseline as f32, &font.family)?;
            }

            let data = match self.library.load(&font.file, font.index) {
                Ok(data) => data,
                Err(err) => {
                    warn!("{err:#}");
                    continue;
                }
            };
            let face = data.face()?;
            let Some(ink) = face.ink_bounds(target, glyph_size) else {
                debug!("{} has no outline for {}", font.family, self.model.target);
                continue;
            };

            let x = cell.content_x as f32 + grid.center_offset(ink.width()) - ink.x_min;
            let baseline = cell.glyph_bottom as f32 - face.line_metrics(glyph_size).descent;
            debug!("rendering {} at ({x}, {baseline})", self.model.target);
            canvas.draw_char(&face, target, glyph_size, x, baseline)?;
        }

        Ok(())
    }
}

/// First face whose family is in [`LABEL_FAMILIES`], preferring regular styles.
pub fn choose_label_font(candidates: &[FontPattern]) -> Option<FontPattern> {
    let is_regular = |p: &FontPattern| matches!(p.style.as_str(), "Regular" | "Book" | "Roman");

    for family in LABEL_FAMILIES {
        let in_family: Vec<&FontPattern> = candidates
            .iter()
            .filter(|p| p.family.eq_ignore_ascii_case(family))
            .collect();
        let chosen = in_family
            .iter()
            .find(|p| is_regular(**p))
            .or_else(|| in_family.first());
        if let Some(chosen) = chosen {
            return Some((*chosen).clone());
        }
    }

    candidates
        .iter()
        .find(|p| is_regular(*p))
        .or_else(|| candidates.first())
        .cloned()
}

/// Render the preview off-screen and save it as PNG.
pub fn render_png(model: PreviewModel, width: u32, height: u32, path: &Path) -> Result<()> {
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("invalid canvas size {width}x{height}"))?;
    let mut painter = PreviewPainter::new(model);
    painter.paint(pixmap.as_mut())?;
    pixmap
        .save_png(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
