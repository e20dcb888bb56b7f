use crate::error::{StripError, StripResult};

/// Physical strip width. The printed product is a 2-inch booth strip.
pub const STRIP_WIDTH_IN: f64 = 2.0;
pub const GAP_IN: f64 = 0.1;
pub const SIDE_MARGIN_IN: f64 = 0.1;
pub const CONTENT_WIDTH_IN: f64 = STRIP_WIDTH_IN - 2.0 * SIDE_MARGIN_IN;

pub const DEFAULT_TOP_MARGIN_IN: f64 = 0.6;
pub const DEFAULT_BOTTOM_MARGIN_IN: f64 = 0.8;

/// Pixel geometry for one strip, derived from a photo count and a DPI.
///
/// Every field is rounded independently from inches; the canvas height is the
/// sum of the rounded parts, so
/// `canvas_height_px == top_px + n*photo_height_px + (n-1)*gap_px + bottom_px`
/// holds exactly for any DPI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayoutResult {
    pub photo_count: u32,
    pub canvas_width_px: u32,
    pub canvas_height_px: u32,
    pub content_x_px: u32,
    pub content_width_px: u32,
    pub photo_height_px: u32,
    pub top_px: u32,
    pub bottom_px: u32,
    pub gap_px: u32,
}

impl LayoutResult {
    /// Vertical offset of slot `i`'s top edge.
    pub fn slot_y_px(&self, i: u32) -> u32 {
        self.top_px + i * (self.photo_height_px + self.gap_px)
    }

    /// First row below the last photo (exclusive end of the photo region).
    pub fn photo_bottom_px(&self) -> u32 {
        self.slot_y_px(self.photo_count - 1) + self.photo_height_px
    }
}

/// Convert inches to pixels, rounding half away from zero. All layout inputs
/// are non-negative, so this matches the original round-half-up behavior.
pub fn in_to_px(inches: f64, dpi: u32) -> u32 {
    (inches * f64::from(dpi)).round() as u32
}

/// Compute the strip geometry for `photo_count` square photos at `dpi`.
///
/// Pure and deterministic. Each photo is square with side = content width
/// (strip width minus both side margins).
pub fn compute_layout(
    photo_count: u32,
    dpi: u32,
    top_margin_in: f64,
    bottom_margin_in: f64,
) -> StripResult<LayoutResult> {
    if !(2..=4).contains(&photo_count) {
        return Err(StripError::layout(format!(
            "photo count must be 2, 3, or 4 (got {photo_count})"
        )));
    }
    if dpi == 0 {
        return Err(StripError::layout("dpi must be > 0"));
    }
    if !top_margin_in.is_finite() || top_margin_in < 0.0 {
        return Err(StripError::layout("top margin must be finite and >= 0"));
    }
    if !bottom_margin_in.is_finite() || bottom_margin_in < 0.0 {
        return Err(StripError::layout("bottom margin must be finite and >= 0"));
    }

    let content_width_px = in_to_px(CONTENT_WIDTH_IN, dpi);
    let photo_height_px = content_width_px;
    let top_px = in_to_px(top_margin_in, dpi);
    let bottom_px = in_to_px(bottom_margin_in, dpi);
    let gap_px = in_to_px(GAP_IN, dpi);

    let canvas_height = u64::from(top_px)
        + u64::from(photo_count) * u64::from(photo_height_px)
        + u64::from(photo_count - 1) * u64::from(gap_px)
        + u64::from(bottom_px);
    let canvas_height_px = u32::try_from(canvas_height)
        .map_err(|_| StripError::layout("strip height exceeds the pixel range"))?;

    Ok(LayoutResult {
        photo_count,
        canvas_width_px: in_to_px(STRIP_WIDTH_IN, dpi),
        canvas_height_px,
        content_x_px: in_to_px(SIDE_MARGIN_IN, dpi),
        content_width_px,
        photo_height_px,
        top_px,
        bottom_px,
        gap_px,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_four_photos_at_300_dpi() {
        let l = compute_layout(4, 300, 0.6, 0.8).unwrap();
        assert_eq!(l.canvas_width_px, 600);
        assert_eq!(l.content_x_px, 30);
        assert_eq!(l.content_width_px, 540);
        assert_eq!(l.photo_height_px, 540);
        assert_eq!(l.top_px, 180);
        assert_eq!(l.bottom_px, 240);
        assert_eq!(l.gap_px, 30);
        assert_eq!(l.canvas_height_px, 180 + 4 * 540 + 3 * 30 + 240);
        assert_eq!(l.canvas_height_px, 2670);
    }

    #[test]
    fn height_identity_holds_for_awkward_dpis() {
        for count in [2u32, 3, 4] {
            for dpi in [72u32, 96, 97, 150, 213, 300, 600] {
                let l = compute_layout(count, dpi, 0.6, 0.8).unwrap();
                let expected = l.top_px
                    + count * l.photo_height_px
                    + (count - 1) * l.gap_px
                    + l.bottom_px;
                assert_eq!(l.canvas_height_px, expected, "count={count} dpi={dpi}");
            }
        }
    }

    #[test]
    fn photos_are_square() {
        let l = compute_layout(3, 96, 0.6, 0.8).unwrap();
        assert_eq!(l.photo_height_px, l.content_width_px);
        // round(1.8 * 96) = round(172.8)
        assert_eq!(l.content_width_px, 173);
    }

    #[test]
    fn slot_offsets_tile_the_photo_region() {
        let l = compute_layout(4, 300, 0.6, 0.8).unwrap();
        assert_eq!(l.slot_y_px(0), 180);
        assert_eq!(l.slot_y_px(1), 180 + 540 + 30);
        assert_eq!(l.photo_bottom_px(), l.canvas_height_px - l.bottom_px);
    }

    #[test]
    fn rejects_out_of_range_counts() {
        assert!(compute_layout(1, 300, 0.6, 0.8).is_err());
        assert!(compute_layout(5, 300, 0.6, 0.8).is_err());
        assert!(compute_layout(0, 300, 0.6, 0.8).is_err());
    }

    #[test]
    fn rejects_bad_dpi_and_margins() {
        assert!(compute_layout(4, 0, 0.6, 0.8).is_err());
        assert!(compute_layout(4, 300, -0.1, 0.8).is_err());
        assert!(compute_layout(4, 300, 0.6, f64::NAN).is_err());
    }
}
