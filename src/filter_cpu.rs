use crate::{
    error::StripResult,
    filter::{FilterBackend, FilterOp, FilterRecipe},
    surface::Surface,
};

/// CPU realization of the filter recipes.
///
/// Each op replicates the corresponding fragment-shader formula from the GPU
/// filter library, evaluated at pixel centers on a straight-alpha f32 copy of
/// the photo. The scratch buffer is the reusable per-context "texture": it is
/// grown on demand, reused across calls, and released before every return.
pub struct CpuFilterBackend {
    scratch: Vec<f32>,
}

impl CpuFilterBackend {
    pub fn new() -> Self {
        Self {
            scratch: Vec::new(),
        }
    }
}

impl Default for CpuFilterBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBackend for CpuFilterBackend {
    fn apply(&mut self, photo: &Surface, recipe: &FilterRecipe) -> StripResult<Surface> {
        if recipe.is_noop() {
            return Ok(photo.clone());
        }

        upload(photo, &mut self.scratch);
        for op in &recipe.ops {
            run_op(&mut self.scratch, photo.width, photo.height, *op);
        }
        let out = download(photo.width, photo.height, &self.scratch);
        self.scratch.clear();
        out
    }
}

/// Premultiplied u8 -> straight f32 in [0, 1].
fn upload(photo: &Surface, scratch: &mut Vec<f32>) {
    scratch.clear();
    scratch.reserve(photo.data.len());
    for px in photo.data.chunks_exact(4) {
        let a = f32::from(px[3]) / 255.0;
        if a == 0.0 {
            scratch.extend_from_slice(&[0.0, 0.0, 0.0, 0.0]);
            continue;
        }
        scratch.push(f32::from(px[0]) / 255.0 / a);
        scratch.push(f32::from(px[1]) / 255.0 / a);
        scratch.push(f32::from(px[2]) / 255.0 / a);
        scratch.push(a);
    }
}

/// Straight f32 -> clamped, re-premultiplied u8.
fn download(width: u32, height: u32, scratch: &[f32]) -> StripResult<Surface> {
    let mut data = Vec::with_capacity(scratch.len());
    for px in scratch.chunks_exact(4) {
        let a = px[3].clamp(0.0, 1.0);
        for c in 0..3 {
            let v = px[c].clamp(0.0, 1.0) * a;
            data.push((v * 255.0).round() as u8);
        }
        data.push((a * 255.0).round() as u8);
    }
    Surface::from_premul(width, height, data)
}

fn run_op(scratch: &mut [f32], width: u32, height: u32, op: FilterOp) {
    match op {
        FilterOp::BrightnessContrast {
            brightness,
            contrast,
        } => brightness_contrast_pass(scratch, brightness, contrast),
        FilterOp::HueSaturation { hue, saturation } => {
            hue_saturation_pass(scratch, hue, saturation)
        }
        FilterOp::Sepia { amount } => sepia_pass(scratch, amount),
        FilterOp::Vignette { size, amount } => vignette_pass(scratch, width, height, size, amount),
        FilterOp::Noise { amount } => noise_pass(scratch, width, height, amount),
    }
}

fn brightness_contrast_pass(scratch: &mut [f32], brightness: f32, contrast: f32) {
    for px in scratch.chunks_exact_mut(4) {
        for c in 0..3 {
            let mut v = px[c] + brightness;
            if contrast > 0.0 {
                v = (v - 0.5) / (1.0 - contrast) + 0.5;
            } else {
                v = (v - 0.5) * (1.0 + contrast) + 0.5;
            }
            px[c] = v;
        }
    }
}

fn hue_saturation_pass(scratch: &mut [f32], hue: f32, saturation: f32) {
    // Hue rotation about the gray axis, expressed as the shader's weight
    // vector; w maps onto (r,g,b) with the component order rotated per
    // output channel.
    let angle = hue * std::f32::consts::PI;
    let (s, c) = angle.sin_cos();
    let sqrt3 = 3.0f32.sqrt();
    let w = [
        (2.0 * c + 1.0) / 3.0,
        (-sqrt3 * s - c + 1.0) / 3.0,
        (sqrt3 * s - c + 1.0) / 3.0,
    ];

    for px in scratch.chunks_exact_mut(4) {
        let (r, g, b) = (px[0], px[1], px[2]);
        px[0] = r * w[0] + g * w[1] + b * w[2];
        px[1] = r * w[2] + g * w[0] + b * w[1];
        px[2] = r * w[1] + g * w[2] + b * w[0];

        let average = (px[0] + px[1] + px[2]) / 3.0;
        let t = if saturation > 0.0 {
            1.0 - 1.0 / (1.001 - saturation)
        } else {
            -saturation
        };
        for ch in 0..3 {
            px[ch] += (average - px[ch]) * t;
        }
    }
}

fn sepia_pass(scratch: &mut [f32], amount: f32) {
    for px in scratch.chunks_exact_mut(4) {
        let (r, g, b) = (px[0], px[1], px[2]);
        px[0] = (r * (1.0 - 0.607 * amount) + g * (0.769 * amount) + b * (0.189 * amount)).min(1.0);
        px[1] = (r * (0.349 * amount) + g * (1.0 - 0.314 * amount) + b * (0.168 * amount)).min(1.0);
        px[2] = (r * (0.272 * amount) + g * (0.534 * amount) + b * (1.0 - 0.869 * amount)).min(1.0);
    }
}

fn vignette_pass(scratch: &mut [f32], width: u32, height: u32, size: f32, amount: f32) {
    let w = width as f32;
    let h = height as f32;
    for y in 0..height {
        for x in 0..width {
            let u = (x as f32 + 0.5) / w - 0.5;
            let v = (y as f32 + 0.5) / h - 0.5;
            let dist = (u * u + v * v).sqrt();
            let t = smoothstep(0.8, size * 0.799, dist * (amount + size));
            let i = (y as usize * width as usize + x as usize) * 4;
            for c in 0..3 {
                scratch[i + c] *= t;
            }
        }
    }
}

fn noise_pass(scratch: &mut [f32], width: u32, height: u32, amount: f32) {
    let w = width as f32;
    let h = height as f32;
    for y in 0..height {
        for x in 0..width {
            let u = (x as f32 + 0.5) / w;
            let v = (y as f32 + 0.5) / h;
            let diff = (coord_rand(u, v) - 0.5) * amount;
            let i = (y as usize * width as usize + x as usize) * 4;
            for c in 0..3 {
                scratch[i + c] += diff;
            }
        }
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// The shader library's coordinate hash: a pure function of the pixel's
/// normalized position, so grain is stable across renders.
fn coord_rand(u: f32, v: f32) -> f32 {
    let x = (u * 12.9898 + v * 78.233).sin() * 43758.5453;
    x - x.floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_photo(width: u32, height: u32) -> Surface {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[
                    (x * 17 % 256) as u8,
                    (y * 29 % 256) as u8,
                    ((x + y) * 11 % 256) as u8,
                    255,
                ]);
            }
        }
        Surface::from_premul(width, height, data).unwrap()
    }

    fn apply_named(photo: &Surface, name: &str) -> Surface {
        let mut backend = CpuFilterBackend::new();
        backend
            .apply(photo, &FilterRecipe::for_name(name))
            .unwrap()
    }

    #[test]
    fn empty_recipe_returns_identical_pixels() {
        let photo = gradient_photo(8, 8);
        let out = apply_named(&photo, "none");
        assert_eq!(out, photo);
    }

    #[test]
    fn recipes_are_deterministic() {
        let photo = gradient_photo(16, 16);
        for name in ["cinematic", "film", "warm", "bw"] {
            let a = apply_named(&photo, name);
            let b = apply_named(&photo, name);
            assert_eq!(a, b, "filter '{name}' must be deterministic");
        }
    }

    #[test]
    fn bw_fully_desaturates() {
        let photo = gradient_photo(8, 8);
        let out = apply_named(&photo, "bw");
        for px in out.data.chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn filters_preserve_opaque_alpha() {
        let photo = gradient_photo(8, 8);
        for name in ["cinematic", "film", "warm", "bw"] {
            let out = apply_named(&photo, name);
            assert!(out.data.chunks_exact(4).all(|px| px[3] == 255), "{name}");
        }
    }

    #[test]
    fn vignette_darkens_corners_more_than_center() {
        let photo = Surface::filled(31, 31, [200, 200, 200, 255]).unwrap();
        let out = apply_named(&photo, "cinematic");

        let center = out.pixel(15, 15).unwrap();
        let corner = out.pixel(0, 0).unwrap();
        let luma = |p: [u8; 4]| u32::from(p[0]) + u32::from(p[1]) + u32::from(p[2]);
        assert!(luma(corner) < luma(center));
    }

    #[test]
    fn positive_brightness_raises_midtones() {
        let photo = Surface::filled(4, 4, [100, 100, 100, 255]).unwrap();
        let out = apply_named(&photo, "warm");
        let px = out.pixel(1, 1).unwrap();
        assert!(px[0] > 100);
    }
}
