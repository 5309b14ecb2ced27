//! Outline rasterization onto tiny-skia pixmaps (made by FontLab https://www.fontlab.com/)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};
use tiny_skia::{
    Color, FillRule, Paint, PathBuilder, PixmapMut, Rect as SkiaRect, Stroke, Transform,
};

use crate::layout::Rect;

pub const BACKGROUND: Color = Color::WHITE;
pub const FOREGROUND: Color = Color::BLACK;

/// Raw bytes of a font file plus the face to use within it.
#[derive(Debug, Clone)]
pub struct FontData {
    data: Arc<Vec<u8>>,
    index: u32,
}

impl FontData {
    pub fn face(&self) -> Result<TextFace<'_>> {
        let font = FontRef::from_index(self.data.as_slice(), self.index)
            .map_err(|err| anyhow!("opening face {}: {err}", self.index))?;
        Ok(TextFace { font })
    }
}

/// Font files read so far; repaints reuse them.
#[derive(Debug, Default)]
pub struct FontLibrary {
    files: HashMap<PathBuf, Arc<Vec<u8>>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path, index: Option<u32>) -> Result<FontData> {
        let data = match self.files.get(path) {
            Some(data) => Arc::clone(data),
            None => {
                let bytes =
                    fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
                let data = Arc::new(bytes);
                self.files.insert(path.to_path_buf(), Arc::clone(&data));
                data
            }
        };

        Ok(FontData {
            data,
            index: index.unwrap_or(0),
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Vertical metrics at a given pixel size; `descent` is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub height: f32,
}

/// Horizontal ink extent of a glyph relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkBounds {
    pub x_min: f32,
    pub x_max: f32,
}

impl InkBounds {
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }
}

pub struct TextFace<'a> {
    font: FontRef<'a>,
}

impl TextFace<'_> {
    pub fn line_metrics(&self, size: f32) -> LineMetrics {
        let metrics = self.font.metrics(Size::new(size), LocationRef::default());
        let descent = -metrics.descent;
        LineMetrics {
            ascent: metrics.ascent,
            descent,
            height: metrics.ascent + descent + metrics.leading,
        }
    }

    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.font
            .charmap()
            .map(ch)
            .filter(|gid| gid.to_u32() != 0)
    }

    /// Sum of advances; unmapped characters contribute nothing.
    pub fn advance(&self, text: &str, size: f32) -> f32 {
        let metrics = self.font.glyph_metrics(Size::new(size), LocationRef::default());
        text.chars()
            .filter_map(|ch| self.glyph_id(ch))
            .filter_map(|gid| metrics.advance_width(gid))
            .sum()
    }

    /// `None` when the face has no outline for `ch` (bitmap-only faces, blanks).
    pub fn ink_bounds(&self, ch: char, size: f32) -> Option<InkBounds> {
        let gid = self.glyph_id(ch)?;
        let glyph = self.font.outline_glyphs().get(gid)?;
        let mut pen = BoundsPen::default();
        glyph
            .draw(
                DrawSettings::unhinted(Size::new(size), LocationRef::default()),
                &mut pen,
            )
            .ok()?;
        pen.bounds()
    }
}

/// Thin wrapper that paints shapes and text in a single color.
pub struct Canvas<'a> {
    pixmap: PixmapMut<'a>,
    paint: Paint<'static>,
}

impl<'a> Canvas<'a> {
    pub fn new(pixmap: PixmapMut<'a>) -> Self {
        let mut paint = Paint::default();
        paint.set_color(FOREGROUND);
        paint.anti_alias = true;
        Self { pixmap, paint }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    pub fn stroke_rect(&mut self, rect: Rect, width: f32) {
        let Some(skia_rect) = SkiaRect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) else {
            return;
        };
        let path = PathBuilder::from_rect(skia_rect);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &self.paint, &stroke, Transform::identity(), None);
    }

    /// Draw `text` left to right starting at `(x, baseline)`; returns the advance.
    pub fn draw_text(
        &mut self,
        face: &TextFace<'_>,
        size: f32,
        x: f32,
        baseline: f32,
        text: &str,
    ) -> Result<f32> {
        let metrics = face.font.glyph_metrics(Size::new(size), LocationRef::default());
        let mut pen_x = x;
        for ch in text.chars() {
            let Some(gid) = face.glyph_id(ch) else {
                continue;
            };
            self.draw_glyph_id(face, gid, size, pen_x, baseline)?;
            pen_x += metrics.advance_width(gid).unwrap_or(0.0);
        }
        Ok(pen_x - x)
    }

    /// Draw a single character; `false` when the face has no outline for it.
    pub fn draw_char(
        &mut self,
        face: &TextFace<'_>,
        ch: char,
        size: f32,
        x: f32,
        baseline: f32,
    ) -> Result<bool> {
        match face.glyph_id(ch) {
            Some(gid) => self.draw_glyph_id(face, gid, size, x, baseline),
            None => Ok(false),
        }
    }

    fn draw_glyph_id(
        &mut self,
        face: &TextFace<'_>,
        gid: GlyphId,
        size: f32,
        x: f32,
        baseline: f32,
    ) -> Result<bool> {
        let Some(glyph) = face.font.outline_glyphs().get(gid) else {
            return Ok(false);
        };

        let mut pen = PathPen::new(x, baseline);
        glyph
            .draw(
                DrawSettings::unhinted(Size::new(size), LocationRef::default()),
                &mut pen,
            )
            .map_err(|err| anyhow!("drawing glyph {}: {err}", gid.to_u32()))?;

        if let Some(path) = pen.finish() {
            self.pixmap.fill_path(
                &path,
                &self.paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        Ok(true)
    }
}

/// Collects outline commands into a tiny-skia path, flipping y around the baseline.
struct PathPen {
    x: f32,
    y: f32,
    open_path: PathBuilder,
}

impl PathPen {
    fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            open_path: PathBuilder::new(),
        }
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.open_path.finish()
    }
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.open_path.move_to(self.x + x, self.y - y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.open_path.line_to(self.x + x, self.y - y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.open_path
            .quad_to(self.x + cx0, self.y - cy0, self.x + x, self.y - y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.open_path.cubic_to(
            self.x + cx0,
            self.y - cy0,
            self.x + cx1,
            self.y - cy1,
            self.x + x,
            self.y - y,
        );
    }

    fn close(&mut self) {
        self.open_path.close();
    }
}

/// Tracks the horizontal extent of control points.
#[derive(Default)]
struct BoundsPen {
    x_min: Option<f32>,
    x_max: Option<f32>,
}

impl BoundsPen {
    fn add(&mut self, x: f32) {
        self.x_min = Some(self.x_min.map_or(x, |m| m.min(x)));
        self.x_max = Some(self.x_max.map_or(x, |m| m.max(x)));
    }

    fn bounds(&self) -> Option<InkBounds> {
        Some(InkBounds {
            x_min: self.x_min?,
            x_max: self.x_max?,
        })
    }
}

impl OutlinePen for BoundsPen {
    fn move_to(&mut self, x: f32, _y: f32) {
        self.add(x);
    }

    fn line_to(&mut self, x: f32, _y: f32) {
        self.add(x);
    }

    fn quad_to(&mut self, cx0: f32, _cy0: f32, x: f32, _y: f32) {
        self.add(cx0);
        self.add(x);
    }

    fn curve_to(&mut self, cx0: f32, _cy0: f32, cx1: f32, _cy1: f32, x: f32, _y: f32) {
        self.add(cx0);
        self.add(cx1);
        self.add(x);
    }

    fn close(&mut self) {}
}
