//! Literal configuration surface consumed by the composition engine.
//!
//! Nothing here reads the environment; hosts construct or deserialize a
//! [`BoothConfig`] and pass it to [`render_strip`](crate::render_strip).

pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_FILTER: &str = "none";
pub const DEFAULT_CAPTION_SIZE_PX: u32 = 60;
pub const DEFAULT_FONT: &str = "Lobster";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

pub const AVAILABLE_FILTERS: [&str; 5] = ["none", "cinematic", "film", "warm", "bw"];

/// A selectable typeface: stable id plus a short UI label.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontChoice {
    pub id: String,
    pub label: String,
}

impl FontChoice {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// Booth-wide defaults and decor placement constants.
///
/// The branding/timestamp/caption offsets are pixel distances from the canvas
/// top (branding) or bottom (timestamp, caption) to the text baseline. They
/// are advisory: the composer clamps all decor into the margin bands so text
/// can never overlap the photo region. Branding is off until `branding_text`
/// is set; drawing any decor requires the named font to be registered.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoothConfig {
    pub default_filter: String,
    pub default_caption: String,
    pub default_caption_size_px: u32,
    pub default_font: String,
    pub default_dpi: u32,
    pub available_filters: Vec<String>,
    pub fonts: Vec<FontChoice>,
    pub strip_colors: Vec<String>,
    pub text_color: String,
    pub branding_text: String,
    pub branding_size_px: u32,
    pub branding_offset_px: u32,
    pub timestamp_size_px: u32,
    pub timestamp_offset_px: u32,
    pub caption_offset_px: u32,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_FILTER.to_string(),
            default_caption: String::new(),
            default_caption_size_px: DEFAULT_CAPTION_SIZE_PX,
            default_font: DEFAULT_FONT.to_string(),
            default_dpi: DEFAULT_DPI,
            available_filters: AVAILABLE_FILTERS.iter().map(|s| s.to_string()).collect(),
            fonts: vec![
                FontChoice::new("Lobster", "Lobster"),
                FontChoice::new("Pacifico", "Pacifico"),
                FontChoice::new("Caveat", "Caveat"),
                FontChoice::new("Dancing Script", "Dancing"),
                FontChoice::new("Bebas Neue", "Bebas"),
                FontChoice::new("Righteous", "Righteous"),
                FontChoice::new("Abril Fatface", "Abril"),
                FontChoice::new("Cormorant Garamond", "Classic"),
                FontChoice::new("Permanent Marker", "Marker"),
                FontChoice::new("Special Elite", "Typewriter"),
                FontChoice::new("Monoton", "Retro"),
                FontChoice::new("Montserrat", "Clean"),
            ],
            strip_colors: vec![
                "#ffffff".to_string(),
                "#f3e9dc".to_string(),
                "#fadadd".to_string(),
                "#dbe9f4".to_string(),
                "#1b1b1b".to_string(),
            ],
            text_color: "#1b1b1b".to_string(),
            branding_text: String::new(),
            branding_size_px: 48,
            branding_offset_px: 110,
            timestamp_size_px: 28,
            timestamp_offset_px: 50,
            caption_offset_px: 150,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_booth_constants() {
        let cfg = BoothConfig::default();
        assert_eq!(cfg.default_filter, "none");
        assert_eq!(cfg.default_caption, "");
        assert_eq!(cfg.default_caption_size_px, 60);
        assert_eq!(cfg.default_dpi, 300);
        assert_eq!(
            cfg.available_filters,
            vec!["none", "cinematic", "film", "warm", "bw"]
        );
        assert_eq!(cfg.fonts.len(), 12);
        assert!(cfg.fonts.iter().any(|f| f.id == cfg.default_font));
        assert!(cfg.strip_colors.contains(&"#ffffff".to_string()));
        assert!(cfg.branding_text.is_empty());
    }

    #[test]
    fn json_roundtrip() {
        let cfg = BoothConfig::default();
        let s = serde_json::to_string_pretty(&cfg).unwrap();
        let de: BoothConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(de, cfg);
    }
}
