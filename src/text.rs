use std::collections::BTreeMap;

use ab_glyph::{Font as _, FontArc, GlyphId, ScaleFont as _, point};
use anyhow::Context as _;

use crate::{
    error::{StripError, StripResult},
    layout::LayoutResult,
    surface::{self, Rgba8, Surface},
};

/// Registered typefaces, keyed by the ids the booth configuration exposes.
#[derive(Default)]
pub struct FontLibrary {
    fonts: BTreeMap<String, FontArc>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_bytes(&mut self, id: impl Into<String>, bytes: Vec<u8>) -> StripResult<()> {
        let id = id.into();
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| StripError::validation(format!("font '{id}' failed to parse: {e}")))?;
        self.fonts.insert(id, font);
        Ok(())
    }

    pub fn register_file(&mut self, id: impl Into<String>, path: &std::path::Path) -> StripResult<()> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font file '{}'", path.display()))?;
        self.register_bytes(id, bytes)
    }

    /// Requests naming a font that was never registered fail loudly; a
    /// silently missing caption would be an error swallowed.
    pub fn get(&self, id: &str) -> StripResult<&FontArc> {
        self.fonts
            .get(id)
            .ok_or_else(|| StripError::validation(format!("font '{id}' is not registered")))
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// A horizontal band of the canvas that one line of decor text may occupy.
///
/// `clip_top..clip_bottom` never intersects the photo region; glyph pixels
/// outside the band are dropped at draw time, so decor cannot overlap photos
/// no matter what offsets the configuration carries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBand {
    pub baseline_y: f32,
    pub clip_top: u32,
    pub clip_bottom: u32,
}

/// Place a baseline inside the top margin, `offset_px` below the canvas top.
pub fn band_in_top_margin(layout: &LayoutResult, offset_px: u32, size_px: u32) -> TextBand {
    let size = size_px as f32;
    let hi = layout.top_px as f32 - 0.25 * size;
    let baseline_y = (offset_px as f32).max(0.8 * size).min(hi.max(0.0));
    TextBand {
        baseline_y,
        clip_top: 0,
        clip_bottom: layout.top_px,
    }
}

/// Place a baseline inside the bottom margin, `offset_px` above the canvas
/// bottom edge.
pub fn band_in_bottom_margin(layout: &LayoutResult, offset_px: u32, size_px: u32) -> TextBand {
    let size = size_px as f32;
    let band_top = layout.photo_bottom_px() as f32;
    let candidate = layout.canvas_height_px as f32 - offset_px as f32;
    let baseline_y = candidate
        .max(band_top + 0.8 * size)
        .min(layout.canvas_height_px as f32 - 0.25 * size);
    TextBand {
        baseline_y,
        clip_top: layout.photo_bottom_px(),
        clip_bottom: layout.canvas_height_px,
    }
}

/// Kerned advance-width layout of a single line, positioned at x = 0.
struct LineLayout {
    glyphs: Vec<(GlyphId, f32)>,
    width: f32,
}

fn layout_line(font: &FontArc, text: &str, size_px: f32) -> LineLayout {
    let scaled = font.as_scaled(size_px);

    let mut glyphs = Vec::new();
    let mut cursor_x = 0.0f32;
    let mut last: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            cursor_x += scaled.kern(prev, id);
        }
        glyphs.push((id, cursor_x));
        cursor_x += scaled.h_advance(id);
        last = Some(id);
    }

    LineLayout {
        glyphs,
        width: cursor_x,
    }
}

/// Rasterize one line centered on `center_x`, blended over the surface with
/// glyph coverage, clipped to the band.
pub fn draw_line_centered(
    surface: &mut Surface,
    font: &FontArc,
    text: &str,
    size_px: f32,
    center_x: f32,
    color: Rgba8,
    band: &TextBand,
) {
    if text.is_empty() {
        return;
    }

    let line = layout_line(font, text, size_px);
    let origin_x = center_x - line.width / 2.0;
    let premul = surface::premultiply(color);

    for (id, dx) in line.glyphs {
        let glyph = id.with_scale_and_position(size_px, point(origin_x + dx, band.baseline_y));
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i64 + i64::from(gx);
            let py = bounds.min.y as i64 + i64::from(gy);
            if py < i64::from(band.clip_top) || py >= i64::from(band.clip_bottom) {
                return;
            }
            surface.blend_pixel(px, py, premul, coverage);
        });
    }
}
