//! Memoized resolution of CSS value expressions.
//!
//! Colors (every CSS Color 4 and 5 syntax, `color-mix()` and relative colors), `calc()`
//! and friends, `var()` references and gradients are resolved from raw text into
//! serialized strings or numeric tuples. Every entry point consults a bounded LRU
//! [`ResolveCache`] keyed by the operation, the input and every option.
//!
//! The free functions use a process-wide [`ColorEngine`]; construct one with
//! [`ColorEngine::with_cache`] to use a private cache.

#![forbid(unsafe_code)]

pub mod cache;
pub mod convert;
mod engine;
pub mod options;

pub use cache::{CacheLookup, CachedValue, DEFAULT_CAPACITY, ResolveCache, cache_key, global_cache};
pub use css_color::{ColorSpace, ColorValue};
pub use css_values_units::{DimensionCallback, Dimensions, round_to_precision};
pub use css_variables::{CustomProperties, PropertyCallback};
pub use engine::{ColorEngine, ColorResult, INVALID_COMPUTED};
pub use options::{ColorFormat, ResolveOptions};

use once_cell::sync::Lazy;

static ENGINE: Lazy<ColorEngine> = Lazy::new(ColorEngine::new);

/// The process-wide engine.
pub fn global_engine() -> &'static ColorEngine {
    &ENGINE
}

/// [`ColorEngine::resolve_color`] on the process-wide engine.
pub fn resolve_color(value: &str, options: &ResolveOptions) -> ColorResult<String> {
    ENGINE.resolve_color(value, options)
}

/// [`ColorEngine::resolve_mix_value`] on the process-wide engine.
pub fn resolve_mix_value(value: &str, options: &ResolveOptions) -> ColorResult<ColorValue> {
    ENGINE.resolve_mix_value(value, options)
}

/// [`ColorEngine::is_color`] on the process-wide engine.
pub fn is_color(value: &str, options: &ResolveOptions) -> bool {
    ENGINE.is_color(value, options)
}

/// [`ColorEngine::is_gradient`] on the process-wide engine.
pub fn is_gradient(value: &str, options: &ResolveOptions) -> bool {
    ENGINE.is_gradient(value, options)
}

/// [`ColorEngine::css_calc`] on the process-wide engine.
pub fn css_calc(value: &str, options: &ResolveOptions) -> String {
    ENGINE.css_calc(value, options)
}

/// [`ColorEngine::css_var`] on the process-wide engine.
pub fn css_var(value: &str, options: &ResolveOptions) -> String {
    ENGINE.css_var(value, options)
}
