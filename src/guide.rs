//! # Photostrip guide (v0.1.0)
//!
//! This module is a standalone walkthrough of the strip composition engine.
//! If you are looking for copy/paste commands, start with the repository
//! `README.md`. If you are implementing new features, start here.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`RenderRequest`](crate::RenderRequest): one strip render — photo
//!   sources, count, DPI, filter name, colors, decor text
//! - [`LayoutResult`](crate::LayoutResult): the derived pixel geometry for a
//!   2-inch strip at a given DPI
//! - [`FilterEngine`](crate::FilterEngine): the shared, serialized filter
//!   context and its named recipes
//! - [`FontLibrary`](crate::FontLibrary): registered typefaces for decor text
//! - [`Surface`](crate::Surface): the pixel buffer type (RGBA8, premultiplied
//!   alpha) used for photos and for the finished strip
//!
//! The render pipeline is explicitly staged:
//!
//! 1. Validate the request ([`RenderRequest::validate`](crate::RenderRequest::validate))
//! 2. Compute geometry ([`compute_layout`](crate::compute_layout))
//! 3. Load and decode photos ([`load_all`](crate::load_all), concurrent,
//!    fail-fast)
//! 4. Per slot, in order: center-crop, resize, filter, blit
//! 5. Decor: branding, timestamp, caption in the margin bands
//!
//! The one-shot wrapper for all of it is
//! [`render_strip`](crate::render_strip).
//!
//! ---
//!
//! ## Geometry (inches in, pixels out)
//!
//! The strip is 2 inches wide with 0.1-inch side margins and gaps; photos are
//! square at the content width. Every dimension converts to pixels
//! independently via `round(inches * dpi)`, and the canvas height is the sum
//! of the rounded parts — so the height identity
//! `height == top + n*photo + (n-1)*gap + bottom` holds exactly at any DPI,
//! which keeps visual regression baselines stable.
//!
//! ---
//!
//! ## Premultiplied alpha (the pixel contract)
//!
//! Decoded images are premultiplied at ingest, compositing assumes
//! premultiplied alpha throughout, and the finished strip is opaque. Treat
//! [`Surface::data`](crate::Surface) as premultiplied unless an API says
//! otherwise.
//!
//! ---
//!
//! ## Filters: one shared context, serialized
//!
//! Named filters are fixed recipes ([`FilterRecipe::for_name`](crate::FilterRecipe::for_name));
//! unknown names are a defined pass-through, never an error. The engine
//! initializes its backend once, lazily, on the first real apply, and
//! serializes every call through one context — the context is non-reentrant
//! by contract. A request with filter `"none"` never touches the engine at
//! all, so unfiltered renders pay no initialization cost.
//!
//! Backends implement [`FilterBackend`](crate::FilterBackend). The in-tree
//! backend is CPU ([`CpuFilterBackend`](crate::filter_cpu::CpuFilterBackend));
//! its per-pixel math mirrors the GPU filter library's shader formulas,
//! including a coordinate-hashed grain so renders stay byte-reproducible.
//!
//! ---
//!
//! ## Failure semantics
//!
//! Every failure aborts the whole render — there is no partial canvas:
//!
//! - [`StripError::Validation`](crate::StripError): bad photo count, too few
//!   images, bad colors, unregistered fonts
//! - [`StripError::Layout`](crate::StripError): counts outside {2, 3, 4},
//!   bad DPI or margins at the layout layer
//! - [`StripError::ImageLoad`](crate::StripError): one failed decode, with
//!   the failing index and a truncated source prefix
//! - [`StripError::Filter`](crate::StripError): backend initialization or
//!   apply failure; there is no silent unfiltered fallback
//!
//! Loads within one render fan out concurrently and fail fast on the lowest
//! failing index; siblings run to completion and are discarded (best-effort
//! cancellation is not guaranteed).
