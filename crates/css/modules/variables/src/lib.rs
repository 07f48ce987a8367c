//! CSS Custom Properties for Cascading Variables Module Level 1 — CSS variables.
//! Spec: <https://www.w3.org/TR/css-variables-1/>

#![forbid(unsafe_code)]

use core::error::Error;
use core::fmt::{Debug, Display, Formatter, Result as FmtResult};
use core::sync::atomic::{AtomicU64, Ordering};
use css_syntax::{check_balanced, find_matching_paren, split_value};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Deepest chain of `var()` references and nested fallbacks followed before giving up.
pub const MAX_DEPTH: usize = 32;

/// Source of process-unique callback ids.
static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

type LookupFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// A fallback resolver for custom properties missing from the table.
///
/// The id is what cache keys record, so two handles are equal only when they were
/// cloned from the same [`PropertyCallback::new`] call.
#[derive(Clone)]
pub struct PropertyCallback {
    id: u64,
    lookup: Arc<LookupFn>,
}

impl PropertyCallback {
    /// Wrap `lookup`, which receives the property name including its leading `--`.
    pub fn new<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            id: NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed),
            lookup: Arc::new(lookup),
        }
    }

    /// Process-unique identity of this callback.
    #[inline]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Invoke the callback.
    #[inline]
    pub fn call(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
    }
}

impl PartialEq for PropertyCallback {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Debug for PropertyCallback {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter
            .debug_struct("PropertyCallback")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Serialize for PropertyCallback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.id)
    }
}

/// The custom property environment for `var()` resolution.
///
/// Keys are property names including the leading `--`; values are raw token strings.
/// Names are case-sensitive.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CustomProperties {
    /// Declared properties, sorted for deterministic cache keys.
    pub table: BTreeMap<String, String>,
    /// Consulted for names missing from the table.
    pub callback: Option<PropertyCallback>,
}

impl CustomProperties {
    /// Empty environment.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` (which must include `--`).
    #[must_use]
    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.table.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Install a fallback callback.
    #[must_use]
    pub fn with_callback(mut self, callback: PropertyCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Look `name` up in the table, then through the callback.
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.table
            .get(name)
            .cloned()
            .or_else(|| self.callback.as_ref().and_then(|callback| callback.call(name)))
    }
}

/// Failure to substitute a `var()` reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarError {
    /// The property is not declared and no fallback was given.
    Unresolved(String),
    /// The property refers back to itself.
    Cycle(String),
    /// The first argument is not a custom property name.
    InvalidName(String),
    /// A `var(` without its `)`.
    UnbalancedParentheses,
    /// More than [`MAX_DEPTH`] nested references.
    NestingTooDeep,
}

impl Display for VarError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Unresolved(name) => write!(formatter, "custom property {name} is not set"),
            Self::Cycle(name) => write!(formatter, "custom property {name} references itself"),
            Self::InvalidName(name) => write!(formatter, "{name:?} is not a custom property name"),
            Self::UnbalancedParentheses => write!(formatter, "unbalanced parentheses in var()"),
            Self::NestingTooDeep => write!(formatter, "var() references nested deeper than {MAX_DEPTH}"),
        }
    }
}

impl Error for VarError {}

/// Whether `value` contains a `var(` call.
pub fn has_var(value: &str) -> bool {
    find_var(value, 0).is_some()
}

/// Byte offset of the next `var(` at or after `from`, not preceded by an identifier character.
fn find_var(value: &str, from: usize) -> Option<usize> {
    let lower = value.to_ascii_lowercase();
    let mut cursor = from;
    while let Some(offset) = lower.get(cursor..).and_then(|tail| tail.find("var(")) {
        let start = cursor + offset;
        let preceded_by_ident = lower
            .get(..start)
            .and_then(|head| head.chars().next_back())
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !preceded_by_ident {
            return Some(start);
        }
        cursor = start + 1;
    }
    None
}

/// Substitute every `var()` in `value`.
///
/// - `var(--name)` takes the declared value (table first, then callback), itself expanded.
/// - `var(--name, fallback)` uses everything after the first top-level comma when the
///   property is missing or cyclic.
/// - Fallbacks may contain nested parentheses and further `var()` calls.
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#using-variables>
///
/// # Errors
/// Returns a [`VarError`] when a reference cannot be resolved and has no fallback.
pub fn resolve_vars(value: &str, properties: &CustomProperties) -> Result<String, VarError> {
    check_balanced(value).map_err(|_| VarError::UnbalancedParentheses)?;
    resolve_internal(value, properties, &mut Vec::new(), 0)
}

/// `depth` counts both property expansions and fallbacks entered; `stack` holds only the
/// properties being expanded, for cycle detection.
fn resolve_internal(
    value: &str,
    properties: &CustomProperties,
    stack: &mut Vec<String>,
    depth: usize,
) -> Result<String, VarError> {
    if depth > MAX_DEPTH {
        return Err(VarError::NestingTooDeep);
    }
    let mut out = String::with_capacity(value.len());
    let mut cursor = 0;
    while let Some(start) = find_var(value, cursor) {
        let open = start + "var".len();
        let close = find_matching_paren(value, open).ok_or(VarError::UnbalancedParentheses)?;
        out.push_str(value.get(cursor..start).unwrap_or_default());
        let arguments = value.get(open + 1..close).unwrap_or_default();
        out.push_str(&resolve_reference(arguments, properties, stack, depth)?);
        cursor = close + 1;
    }
    out.push_str(value.get(cursor..).unwrap_or_default());
    Ok(out)
}

/// Resolve the argument text of one `var()` (`--name` or `--name, fallback`).
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#cycles>
fn resolve_reference(
    arguments: &str,
    properties: &CustomProperties,
    stack: &mut Vec<String>,
    depth: usize,
) -> Result<String, VarError> {
    let (name, fallback) = match arguments.split_once(',') {
        Some((first, rest)) if split_value(arguments, ',').len() > 1 => {
            (first.trim(), Some(rest.trim()))
        }
        _ => (arguments.trim(), None),
    };
    if !name.starts_with("--") || name.len() <= 2 {
        return Err(VarError::InvalidName(name.to_owned()));
    }
    let use_fallback = |stack: &mut Vec<String>, error: VarError| match fallback {
        Some(text) => resolve_internal(text, properties, stack, depth + 1),
        None => Err(error),
    };
    if stack.iter().any(|entry| entry == name) {
        log::debug!("cycle through {name}");
        return use_fallback(stack, VarError::Cycle(name.to_owned()));
    }
    let Some(declared) = properties.lookup(name) else {
        return use_fallback(stack, VarError::Unresolved(name.to_owned()));
    };
    stack.push(name.to_owned());
    let expanded = resolve_internal(declared.trim(), properties, stack, depth + 1);
    stack.pop();
    match expanded {
        Ok(text) => Ok(text),
        Err(VarError::Cycle(cycle)) => use_fallback(stack, VarError::Cycle(cycle)),
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_only_real_var_calls() {
        assert!(has_var("rgb(VAR(--r) 0 0)"));
        assert!(!has_var("--my-var(1)"));
        assert!(!has_var("red"));
    }

    #[test]
    fn fallback_is_everything_after_first_comma() {
        let props = CustomProperties::new();
        assert_eq!(
            resolve_vars("var(--missing, rgb(1, 2, 3))", &props),
            Ok("rgb(1, 2, 3)".to_owned())
        );
    }

    #[test]
    fn rejects_non_custom_names() {
        let props = CustomProperties::new();
        assert_eq!(
            resolve_vars("var(color)", &props),
            Err(VarError::InvalidName("color".to_owned()))
        );
    }
}
