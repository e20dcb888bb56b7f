#![forbid(unsafe_code)]

pub mod compose;
pub mod config;
pub mod error;
pub mod filter;
pub mod filter_cpu;
pub mod guide;
pub mod layout;
pub mod loader;
pub mod model;
pub mod surface;
pub mod text;

pub use compose::render_strip;
pub use config::{BoothConfig, FontChoice};
pub use error::{StripError, StripResult};
pub use filter::{
    FilterBackend, FilterBackendKind, FilterEngine, FilterOp, FilterRecipe, create_filter_backend,
};
pub use layout::{LayoutResult, compute_layout};
pub use loader::{decode_source, load_all};
pub use model::RenderRequest;
pub use surface::{Rgba8, Surface, parse_hex_color};
pub use text::FontLibrary;
