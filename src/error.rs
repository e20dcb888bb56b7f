pub type StripResult<T> = Result<T, StripError>;

/// How much of a failing image source is echoed back in errors. Sources are
/// frequently multi-megabyte data URIs, so everything past the scheme and the
/// first few payload bytes is noise.
pub const SOURCE_PREFIX_LEN: usize = 20;

#[derive(thiserror::Error, Debug)]
pub enum StripError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("image load error at index {index}: '{source_prefix}...' ({reason})")]
    ImageLoad {
        index: usize,
        source_prefix: String,
        reason: String,
    },

    #[error("filter error: {0}")]
    Filter(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StripError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn filter(msg: impl Into<String>) -> Self {
        Self::Filter(msg.into())
    }

    pub fn image_load(index: usize, source: &str, reason: impl Into<String>) -> Self {
        Self::ImageLoad {
            index,
            source_prefix: truncate_source(source),
            reason: reason.into(),
        }
    }
}

fn truncate_source(source: &str) -> String {
    source.chars().take(SOURCE_PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            StripError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(StripError::layout("x").to_string().contains("layout error:"));
        assert!(StripError::filter("x").to_string().contains("filter error:"));
    }

    #[test]
    fn image_load_carries_index_and_prefix() {
        let err = StripError::image_load(3, "data:image/png;base64,AAAA", "bad payload");
        let msg = err.to_string();
        assert!(msg.contains("index 3"));
        assert!(msg.contains("data:image/png;base6"));
        assert!(!msg.contains("AAAA"));
        assert!(msg.contains("bad payload"));
    }

    #[test]
    fn source_truncation_respects_char_boundaries() {
        let source = "é".repeat(40);
        let err = StripError::image_load(0, &source, "nope");
        match err {
            StripError::ImageLoad { source_prefix, .. } => {
                assert_eq!(source_prefix.chars().count(), SOURCE_PREFIX_LEN);
            }
            _ => panic!("expected ImageLoad"),
        }
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = StripError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
