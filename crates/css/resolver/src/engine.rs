//! The memoizing resolver behind the public API.

use crate::cache::{CacheLookup, CachedValue, ResolveCache, cache_key, global_cache};
use crate::options::{ColorFormat, ResolveOptions};
use css_color::{
    ColorError, ColorSpace, ColorValue, convert, parse_color, serialize_computed, specified_value,
    to_hex,
};
use css_variables::{has_var, resolve_vars};
use std::sync::Arc;

/// Computed value used for unresolvable colors when `nullable` is off.
pub const INVALID_COMPUTED: &str = "rgba(0, 0, 0, 0)";

/// A resolved value, or the marker for input that does not resolve.
///
/// `Invalid` is distinct from any real value: a transparent color is
/// `Value("rgba(0, 0, 0, 0)")` when it was written as one.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorResult<T> {
    /// The resolved value.
    Value(T),
    /// The input did not resolve and the caller asked for a nullable result.
    Invalid,
}

impl<T> ColorResult<T> {
    /// The value, if resolved.
    #[inline]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Invalid => None,
        }
    }

    /// Whether resolution failed.
    #[inline]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Apply `transform` to a resolved value.
    #[inline]
    pub fn map<U>(self, transform: impl FnOnce(T) -> U) -> ColorResult<U> {
        match self {
            Self::Value(value) => ColorResult::Value(transform(value)),
            Self::Invalid => ColorResult::Invalid,
        }
    }
}

impl<T> From<Option<T>> for ColorResult<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Invalid, Self::Value)
    }
}

/// Resolves CSS values through a shared [`ResolveCache`].
///
/// Engines built with [`ColorEngine::new`] share the process-wide cache; tests and
/// embedders that need isolation inject their own with [`ColorEngine::with_cache`].
#[derive(Clone, Debug)]
pub struct ColorEngine {
    cache: Arc<ResolveCache>,
}

impl Default for ColorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorEngine {
    /// An engine backed by the process-wide cache.
    #[inline]
    pub fn new() -> Self {
        Self::with_cache(global_cache())
    }

    /// An engine backed by `cache`.
    #[inline]
    pub const fn with_cache(cache: Arc<ResolveCache>) -> Self {
        Self { cache }
    }

    /// The cache this engine reads and fills.
    #[inline]
    pub fn cache(&self) -> &ResolveCache {
        &self.cache
    }

    /// Look `(namespace, value, options)` up, computing and storing it on a miss.
    /// `None` from `compute` is stored as an invalid marker.
    pub(crate) fn memoize(
        &self,
        namespace: &str,
        value: &str,
        options: &ResolveOptions,
        compute: impl FnOnce() -> Option<CachedValue>,
    ) -> Option<CachedValue> {
        let Some(key) = cache_key(namespace, value, options) else {
            return compute();
        };
        match self.cache.get(&key) {
            CacheLookup::Hit(cached) => return Some(cached),
            CacheLookup::NegativeHit => return None,
            CacheLookup::Miss => {}
        }
        let computed = compute();
        self.cache.set(key, computed.clone());
        computed
    }

    /// Resolve `value` to a color string in `options.format`.
    ///
    /// Unresolvable input yields [`ColorResult::Invalid`] when `nullable` is set.
    /// Otherwise `computedValue` falls back to [`INVALID_COMPUTED`], `specifiedValue` to
    /// `""` and the remaining formats to `Invalid`.
    pub fn resolve_color(&self, value: &str, options: &ResolveOptions) -> ColorResult<String> {
        let resolved = self
            .memoize("resolveColor", value, options, || {
                format_color(value, options).map(CachedValue::Text)
            })
            .and_then(CachedValue::into_text);
        match resolved {
            Some(text) => ColorResult::Value(text),
            None if options.nullable => ColorResult::Invalid,
            None => match options.format {
                ColorFormat::ComputedValue => ColorResult::Value(INVALID_COMPUTED.to_owned()),
                ColorFormat::SpecifiedValue => ColorResult::Value(String::new()),
                ColorFormat::MixValue | ColorFormat::Hex | ColorFormat::HexAlpha => {
                    ColorResult::Invalid
                }
            },
        }
    }

    /// The numeric color `value` resolves to, in `options.color_space` when one is set.
    pub fn resolve_mix_value(
        &self,
        value: &str,
        options: &ResolveOptions,
    ) -> ColorResult<ColorValue> {
        self.memoize("resolveMixValue", value, options, || {
            let prepared = prepare(value, options)?;
            logged(value, resolve_in_target(&prepared, options)).map(CachedValue::Color)
        })
        .and_then(|cached| cached.as_color())
        .into()
    }

    /// Whether `value` is a color once custom properties are substituted.
    pub fn is_color(&self, value: &str, options: &ResolveOptions) -> bool {
        self.memoize("isColor", value, options, || {
            let flag = prepare(value, options)
                .is_some_and(|prepared| css_color::is_color(&prepared, &options.parse_context()));
            Some(CachedValue::Flag(flag))
        })
        .and_then(|cached| cached.as_flag())
        .unwrap_or(false)
    }

    /// Whether `value` is a gradient once custom properties are substituted.
    pub fn is_gradient(&self, value: &str, options: &ResolveOptions) -> bool {
        self.memoize("isGradient", value, options, || {
            let flag = prepare(value, options).is_some_and(|prepared| {
                css_images::is_gradient(&prepared, &options.parse_context())
            });
            Some(CachedValue::Flag(flag))
        })
        .and_then(|cached| cached.as_flag())
        .unwrap_or(false)
    }

    /// Fold the math functions in `value` after substituting custom properties.
    /// Returns `""` when a reference or an expression does not resolve.
    pub fn css_calc(&self, value: &str, options: &ResolveOptions) -> String {
        self.fold("cssCalc", value, options)
    }

    /// Substitute the custom properties in `value`, folding any math they produce.
    /// Returns `""` when a reference does not resolve.
    pub fn css_var(&self, value: &str, options: &ResolveOptions) -> String {
        self.fold("cssVar", value, options)
    }

    fn fold(&self, namespace: &str, value: &str, options: &ResolveOptions) -> String {
        self.memoize(namespace, value, options, || {
            let substituted = substitute(value, options)?;
            let folded = css_values_units::css_calc(&substituted, &options.dimension);
            (!folded.is_empty()).then_some(CachedValue::Text(folded))
        })
        .and_then(CachedValue::into_text)
        .unwrap_or_default()
    }
}

/// `value` with every `var()` replaced, trimmed. `None` when a reference is unresolved.
pub(crate) fn substitute(value: &str, options: &ResolveOptions) -> Option<String> {
    if !has_var(value) {
        return Some(value.trim().to_owned());
    }
    resolve_vars(value, &options.custom_property)
        .map(|resolved| resolved.trim().to_owned())
        .map_err(|error| log::debug!("var() substitution failed for {value:?}: {error}"))
        .ok()
}

/// [`substitute`], lower-cased for the color parsers.
pub(crate) fn prepare(value: &str, options: &ResolveOptions) -> Option<String> {
    substitute(value, options).map(|substituted| substituted.to_ascii_lowercase())
}

/// Log a failed resolution and discard its error.
pub(crate) fn logged<T>(value: &str, result: Result<T, ColorError>) -> Option<T> {
    result
        .map_err(|error| log::debug!("{value:?} did not resolve: {error}"))
        .ok()
}

/// The space requested by `options.color_space`. Bare `xyz` follows the `d50` flag.
///
/// # Errors
/// Returns [`ColorError::Syntax`] for an unknown space name.
pub(crate) fn target_space(options: &ResolveOptions) -> Result<Option<ColorSpace>, ColorError> {
    let Some(name) = options.color_space.as_deref() else {
        return Ok(None);
    };
    let space = ColorSpace::from_name(name).ok_or_else(|| ColorError::Syntax(name.to_owned()))?;
    if name == "xyz" && options.d50 {
        return Ok(Some(ColorSpace::XyzD50));
    }
    Ok(Some(space))
}

fn resolve_in_target(value: &str, options: &ResolveOptions) -> Result<ColorValue, ColorError> {
    let color = parse_color(value, &options.parse_context())?;
    Ok(match target_space(options)? {
        Some(space) => convert(&color, space),
        None => color,
    })
}

fn format_color(value: &str, options: &ResolveOptions) -> Option<String> {
    let prepared = prepare(value, options)?;
    let context = options.parse_context();
    let formatted = match options.format {
        ColorFormat::ComputedValue if prepared == "currentcolor" && options.current_color.is_none() => {
            Ok(prepared.clone())
        }
        ColorFormat::ComputedValue | ColorFormat::MixValue => {
            resolve_in_target(&prepared, options).map(|color| serialize_computed(&color))
        }
        ColorFormat::SpecifiedValue => specified_value(&prepared, &context),
        ColorFormat::Hex => parse_color(&prepared, &context).map(|color| to_hex(&color, false)),
        ColorFormat::HexAlpha => {
            parse_color(&prepared, &context).map(|color| to_hex(&color, true))
        }
    };
    logged(value, formatted)
}
