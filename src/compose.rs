use kurbo::{Point, RoundedRect, Shape as _};

use crate::{
    config::BoothConfig,
    error::{StripError, StripResult},
    filter::FilterEngine,
    layout::{self, LayoutResult},
    loader,
    model::RenderRequest,
    surface::{self, Surface},
    text::{self, FontLibrary},
};

/// Rounded-corner radius as a fraction of the DPI, truncated to whole pixels.
pub const CORNER_RADIUS_PER_DPI: f64 = 0.05;

/// Compose one photo strip.
///
/// Staged: validate, compute layout, load photos, composite each slot in
/// input order, then decor (branding, timestamp, caption). Any stage failure
/// aborts the render; the caller never sees a partially drawn canvas. The
/// returned surface is owned by the caller; nothing is retained, so renders
/// are independent and repeatable.
///
/// Slots composite sequentially: all slots draw into one canvas, and the
/// filter engine's shared context is a serialized resource.
#[tracing::instrument(
    skip_all,
    fields(photo_count = req.photo_count, dpi = req.dpi, filter = %req.filter)
)]
pub fn render_strip(
    req: &RenderRequest,
    cfg: &BoothConfig,
    fonts: &FontLibrary,
    filters: &FilterEngine,
) -> StripResult<Surface> {
    req.validate()?;
    let layout = layout::compute_layout(
        req.photo_count,
        req.dpi,
        req.top_margin_in,
        req.bottom_margin_in,
    )?;

    let photos = loader::load_all(&req.images, req.photo_count as usize)?;

    let background = surface::parse_hex_color(&req.background_color)?;
    let mut canvas = Surface::filled(layout.canvas_width_px, layout.canvas_height_px, background)?;

    let mut y = layout.top_px;
    for (slot, photo) in photos.iter().enumerate() {
        tracing::debug!(slot, "compositing photo slot");
        let square = center_crop_square(photo)?;
        let sized = resize_to(&square, layout.content_width_px, layout.photo_height_px)?;

        // The engine is never touched for "none": the common case must not
        // pay the one-time filter context initialization.
        let finished = if req.filter == "none" {
            sized
        } else {
            filters.apply(&sized, &req.filter)?
        };

        if req.rounded_corners {
            let radius = (f64::from(req.dpi) * CORNER_RADIUS_PER_DPI).floor();
            let rect = RoundedRect::new(
                0.0,
                0.0,
                f64::from(finished.width),
                f64::from(finished.height),
                radius,
            );
            canvas.blit_over_masked(&finished, layout.content_x_px, y, |px, py| {
                rect.contains(Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5))
            });
        } else {
            canvas.blit_over(&finished, layout.content_x_px, y);
        }

        y += layout.photo_height_px + layout.gap_px;
    }

    draw_decor(&mut canvas, req, cfg, fonts, &layout)?;

    Ok(canvas)
}

/// Center-crop to a `min(width, height)` square. Odd leftovers split with the
/// offsets truncated toward the top-left (integer halving).
fn center_crop_square(src: &Surface) -> StripResult<Surface> {
    let side = src.width.min(src.height);
    if side == 0 {
        return Err(StripError::validation("photo has no pixels"));
    }
    let sx = (src.width - side) / 2;
    let sy = (src.height - side) / 2;

    if sx == 0 && sy == 0 && src.width == src.height {
        return Ok(src.clone());
    }

    let mut data = Vec::with_capacity(side as usize * side as usize * 4);
    for row in sy..sy + side {
        let start = (row as usize * src.width as usize + sx as usize) * 4;
        data.extend_from_slice(&src.data[start..start + side as usize * 4]);
    }
    Surface::from_premul(side, side, data)
}

fn resize_to(src: &Surface, width: u32, height: u32) -> StripResult<Surface> {
    if src.width == width && src.height == height {
        return Ok(src.clone());
    }
    let img = image::RgbaImage::from_raw(src.width, src.height, src.data.clone())
        .ok_or_else(|| StripError::validation("photo buffer does not match its dimensions"))?;
    let resized = image::imageops::resize(&img, width, height, image::imageops::FilterType::Triangle);
    Surface::from_premul(width, height, resized.into_raw())
}

fn draw_decor(
    canvas: &mut Surface,
    req: &RenderRequest,
    cfg: &BoothConfig,
    fonts: &FontLibrary,
    layout: &LayoutResult,
) -> StripResult<()> {
    let caption = req.caption.as_deref().unwrap_or(&cfg.default_caption);
    let timestamp = req.timestamp.as_deref().unwrap_or("");
    let branding = cfg.branding_text.as_str();
    if caption.is_empty() && timestamp.is_empty() && branding.is_empty() {
        return Ok(());
    }

    let color = surface::parse_hex_color(&cfg.text_color)?;
    let center_x = layout.canvas_width_px as f32 / 2.0;

    if !branding.is_empty() {
        let font = fonts.get(&cfg.default_font)?;
        let band = text::band_in_top_margin(layout, cfg.branding_offset_px, cfg.branding_size_px);
        text::draw_line_centered(
            canvas,
            font,
            branding,
            cfg.branding_size_px as f32,
            center_x,
            color,
            &band,
        );
    }

    if !caption.is_empty() {
        let font_id = req.font.as_deref().unwrap_or(&cfg.default_font);
        let font = fonts.get(font_id)?;
        let size = req.caption_size_px.unwrap_or(cfg.default_caption_size_px);
        let band = text::band_in_bottom_margin(layout, cfg.caption_offset_px, size);
        text::draw_line_centered(canvas, font, caption, size as f32, center_x, color, &band);
    }

    if !timestamp.is_empty() {
        let font = fonts.get(&cfg.default_font)?;
        let band =
            text::band_in_bottom_margin(layout, cfg.timestamp_offset_px, cfg.timestamp_size_px);
        text::draw_line_centered(
            canvas,
            font,
            timestamp,
            cfg.timestamp_size_px as f32,
            center_x,
            color,
            &band,
        );
    }

    Ok(())
}
