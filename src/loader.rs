use anyhow::Context as _;
use base64::Engine as _;
use rayon::prelude::*;

use crate::{
    error::{StripError, StripResult},
    surface::{self, Surface},
};

/// Resolve a source string to raw encoded bytes.
///
/// `data:` URIs carry the payload inline (base64 or verbatim); anything else
/// is treated as a filesystem path.
pub fn source_bytes(source: &str) -> StripResult<Vec<u8>> {
    if let Some(rest) = source.strip_prefix("data:") {
        let (header, payload) = rest.split_once(',').ok_or_else(|| {
            StripError::validation("data URI is missing the ',' payload separator")
        })?;
        if header.contains("base64") {
            return Ok(base64::engine::general_purpose::STANDARD
                .decode(payload)
                .context("decode base64 data URI payload")?);
        }
        return Ok(payload.as_bytes().to_vec());
    }

    Ok(std::fs::read(source).with_context(|| format!("read image file '{source}'"))?)
}

/// Decode one source into a premultiplied RGBA8 surface.
pub fn decode_source(source: &str) -> StripResult<Surface> {
    let bytes = source_bytes(source)?;
    let dyn_img = image::load_from_memory(&bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data = rgba.into_raw();
    surface::premultiply_rgba8_in_place(&mut data);
    Surface::from_premul(width, height, data)
}

/// Decode the first `limit` sources, all issued concurrently.
///
/// Fail-fast: if any source fails, the whole call fails with the lowest
/// failing index (deterministic even though the underlying loads race).
/// Sibling loads run to completion and are discarded; there is no
/// cancellation.
pub fn load_all(sources: &[String], limit: usize) -> StripResult<Vec<Surface>> {
    let wanted = &sources[..limit.min(sources.len())];
    tracing::debug!(requested = sources.len(), loading = wanted.len(), "loading photo sources");

    let results: Vec<StripResult<Surface>> =
        wanted.par_iter().map(|src| decode_source(src)).collect();

    let mut out = Vec::with_capacity(results.len());
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(img) => out.push(img),
            Err(err) => {
                return Err(StripError::image_load(index, &wanted[index], err.to_string()));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn png_data_uri(width: u32, height: u32, rgba: [u8; 4]) -> String {
        let b64 =
            base64::engine::general_purpose::STANDARD.encode(png_bytes(width, height, rgba));
        format!("data:image/png;base64,{b64}")
    }

    #[test]
    fn decodes_base64_data_uri_and_premultiplies() {
        let src = png_data_uri(1, 1, [100, 50, 200, 128]);
        let img = decode_source(&src).unwrap();
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(
            img.pixel(0, 0).unwrap(),
            surface::premultiply([100, 50, 200, 128])
        );
    }

    #[test]
    fn decodes_from_file_path() {
        let path = std::env::temp_dir().join("photostrip_loader_test.png");
        std::fs::write(&path, png_bytes(2, 3, [10, 20, 30, 255])).unwrap();

        let img = decode_source(path.to_str().unwrap()).unwrap();
        assert_eq!((img.width, img.height), (2, 3));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_malformed_data_uri() {
        assert!(decode_source("data:image/png;base64").is_err());
        assert!(decode_source("data:image/png;base64,!!!not-base64!!!").is_err());
    }

    #[test]
    fn load_all_reports_lowest_failing_index() {
        let sources = vec![
            png_data_uri(1, 1, [255, 0, 0, 255]),
            "data:image/png;base64,AAAA".to_string(),
            "also-not-an-image".to_string(),
        ];
        let err = load_all(&sources, 3).unwrap_err();
        match err {
            StripError::ImageLoad { index, .. } => assert_eq!(index, 1),
            other => panic!("expected ImageLoad, got {other:?}"),
        }
    }

    #[test]
    fn load_all_ignores_sources_past_the_limit() {
        let sources = vec![
            png_data_uri(1, 1, [255, 0, 0, 255]),
            png_data_uri(1, 1, [0, 255, 0, 255]),
            "definitely-broken".to_string(),
        ];
        let loaded = load_all(&sources, 2).unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
