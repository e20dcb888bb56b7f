use crate::{
    config,
    error::{StripError, StripResult},
    surface,
};

/// One strip render, as supplied by the host application.
///
/// `images` holds the photo sources in slot order: `data:` URIs or filesystem
/// paths. Only the first `photo_count` entries are used; extras are ignored.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    pub images: Vec<String>,
    pub photo_count: u32,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub rounded_corners: bool,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub caption_size_px: Option<u32>,
    #[serde(default)]
    pub font: Option<String>,
    /// Pre-formatted timestamp text. The engine never reads a clock; renders
    /// stay reproducible.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default = "default_top_margin")]
    pub top_margin_in: f64,
    #[serde(default = "default_bottom_margin")]
    pub bottom_margin_in: f64,
}

fn default_dpi() -> u32 {
    config::DEFAULT_DPI
}

fn default_filter() -> String {
    config::DEFAULT_FILTER.to_string()
}

fn default_background() -> String {
    config::DEFAULT_BACKGROUND.to_string()
}

fn default_top_margin() -> f64 {
    crate::layout::DEFAULT_TOP_MARGIN_IN
}

fn default_bottom_margin() -> f64 {
    crate::layout::DEFAULT_BOTTOM_MARGIN_IN
}

impl RenderRequest {
    /// Minimal request with library defaults for everything optional.
    pub fn new(images: Vec<String>, photo_count: u32) -> Self {
        Self {
            images,
            photo_count,
            dpi: default_dpi(),
            filter: default_filter(),
            background_color: default_background(),
            rounded_corners: false,
            caption: None,
            caption_size_px: None,
            font: None,
            timestamp: None,
            top_margin_in: default_top_margin(),
            bottom_margin_in: default_bottom_margin(),
        }
    }

    pub fn validate(&self) -> StripResult<()> {
        if !(2..=4).contains(&self.photo_count) {
            return Err(StripError::validation(format!(
                "photo count must be 2, 3, or 4 (got {})",
                self.photo_count
            )));
        }
        if self.images.len() < self.photo_count as usize {
            return Err(StripError::validation(format!(
                "{} images supplied but {} photo slots requested",
                self.images.len(),
                self.photo_count
            )));
        }
        if self.dpi == 0 {
            return Err(StripError::validation("dpi must be > 0"));
        }
        surface::parse_hex_color(&self.background_color)?;
        if let Some(size) = self.caption_size_px
            && size == 0
        {
            return Err(StripError::validation("caption size must be > 0"));
        }
        Ok(())
    }
}
