use std::sync::Mutex;

use crate::{
    error::{StripError, StripResult},
    surface::Surface,
};

/// One step of a filter recipe. Parameters are in the filter library's
/// normalized ranges (brightness/contrast in [-1, 1], hue as a fraction of a
/// half-turn, and so on).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    BrightnessContrast { brightness: f32, contrast: f32 },
    HueSaturation { hue: f32, saturation: f32 },
    Sepia { amount: f32 },
    Vignette { size: f32, amount: f32 },
    Noise { amount: f32 },
}

/// An ordered chain of filter ops applied to one photo.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterRecipe {
    pub ops: Vec<FilterOp>,
}

impl FilterRecipe {
    /// Resolve a filter name to its fixed recipe.
    ///
    /// `none` and unrecognized names resolve to the empty recipe: a defined
    /// pass-through, never an error.
    pub fn for_name(name: &str) -> Self {
        use FilterOp::*;

        let ops = match name.trim().to_ascii_lowercase().as_str() {
            "cinematic" => vec![
                BrightnessContrast {
                    brightness: 0.0,
                    contrast: 0.15,
                },
                Vignette {
                    size: 0.4,
                    amount: 0.6,
                },
                HueSaturation {
                    hue: 0.0,
                    saturation: -0.15,
                },
            ],
            "film" => vec![
                Sepia { amount: 0.3 },
                Noise { amount: 0.08 },
                BrightnessContrast {
                    brightness: -0.05,
                    contrast: 0.12,
                },
            ],
            "warm" => vec![
                HueSaturation {
                    hue: 0.05,
                    saturation: 0.1,
                },
                BrightnessContrast {
                    brightness: 0.05,
                    contrast: 0.1,
                },
            ],
            "bw" => vec![
                HueSaturation {
                    hue: 0.0,
                    saturation: -1.0,
                },
                BrightnessContrast {
                    brightness: 0.0,
                    contrast: 0.2,
                },
            ],
            _ => Vec::new(),
        };
        Self { ops }
    }

    pub fn is_noop(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Executes filter recipes against a reusable internal context.
///
/// Implementations may keep scratch state between calls; callers must not
/// invoke `apply` concurrently on the same backend. [`FilterEngine`] wraps a
/// backend with that serialization.
pub trait FilterBackend: Send {
    fn apply(&mut self, photo: &Surface, recipe: &FilterRecipe) -> StripResult<Surface>;
}

#[derive(Clone, Copy, Debug)]
pub enum FilterBackendKind {
    Cpu,
}

pub fn create_filter_backend(kind: FilterBackendKind) -> StripResult<Box<dyn FilterBackend>> {
    match kind {
        FilterBackendKind::Cpu => Ok(Box::new(crate::filter_cpu::CpuFilterBackend::new())),
    }
}

struct LazyBackend {
    kind: FilterBackendKind,
    backend: Option<Box<dyn FilterBackend>>,
}

/// Process-wide filter handle: one shared, serialized, lazily initialized
/// backend context reused across renders.
///
/// Initialization happens at most once, on the first `apply`; a failure to
/// initialize is surfaced to the caller (no silent unfiltered fallback).
pub struct FilterEngine {
    inner: Mutex<LazyBackend>,
}

impl FilterEngine {
    pub fn new(kind: FilterBackendKind) -> Self {
        Self {
            inner: Mutex::new(LazyBackend {
                kind,
                backend: None,
            }),
        }
    }

    /// Wrap an already constructed backend. Tests use this to inject
    /// instrumented backends.
    pub fn with_backend(backend: Box<dyn FilterBackend>) -> Self {
        Self {
            inner: Mutex::new(LazyBackend {
                kind: FilterBackendKind::Cpu,
                backend: Some(backend),
            }),
        }
    }

    /// Apply the named filter to one photo, returning a new surface.
    pub fn apply(&self, photo: &Surface, filter_name: &str) -> StripResult<Surface> {
        let recipe = FilterRecipe::for_name(filter_name);

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StripError::filter("filter context lock poisoned"))?;
        if inner.backend.is_none() {
            tracing::debug!("initializing filter backend");
            inner.backend = Some(create_filter_backend(inner.kind)?);
        }
        let backend = inner
            .backend
            .as_mut()
            .ok_or_else(|| StripError::filter("filter backend missing after initialization"))?;
        backend.apply(photo, &recipe)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use FilterOp::*;

    #[test]
    fn named_recipes_carry_the_fixed_parameters() {
        assert_eq!(
            FilterRecipe::for_name("cinematic").ops,
            vec![
                BrightnessContrast {
                    brightness: 0.0,
                    contrast: 0.15
                },
                Vignette {
                    size: 0.4,
                    amount: 0.6
                },
                HueSaturation {
                    hue: 0.0,
                    saturation: -0.15
                },
            ]
        );
        assert_eq!(
            FilterRecipe::for_name("film").ops,
            vec![
                Sepia { amount: 0.3 },
                Noise { amount: 0.08 },
                BrightnessContrast {
                    brightness: -0.05,
                    contrast: 0.12
                },
            ]
        );
        assert_eq!(FilterRecipe::for_name("warm").ops.len(), 2);
        assert_eq!(FilterRecipe::for_name("bw").ops.len(), 2);
    }

    #[test]
    fn none_and_unknown_names_are_pass_through() {
        assert!(FilterRecipe::for_name("none").is_noop());
        assert!(FilterRecipe::for_name("").is_noop());
        assert!(FilterRecipe::for_name("glitter-bomb").is_noop());
        assert!(FilterRecipe::for_name("  BW  ").ops.len() == 2);
    }

    struct CountingBackend {
        calls: Arc<AtomicUsize>,
    }

    impl FilterBackend for CountingBackend {
        fn apply(&mut self, photo: &Surface, _recipe: &FilterRecipe) -> StripResult<Surface> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(photo.clone())
        }
    }

    #[test]
    fn engine_serializes_calls_through_one_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = FilterEngine::with_backend(Box::new(CountingBackend {
            calls: Arc::clone(&calls),
        }));

        let photo = Surface::filled(2, 2, [10, 20, 30, 255]).unwrap();
        engine.apply(&photo, "cinematic").unwrap();
        engine.apply(&photo, "bw").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn engine_lazily_builds_the_cpu_backend() {
        let engine = FilterEngine::new(FilterBackendKind::Cpu);
        let photo = Surface::filled(2, 2, [10, 20, 30, 255]).unwrap();
        let out = engine.apply(&photo, "none").unwrap();
        assert_eq!(out, photo);
    }
}
