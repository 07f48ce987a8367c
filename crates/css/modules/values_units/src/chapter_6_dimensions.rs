//! CSS Values & Units Level 4 — §6 Distance Units
//! Spec: <https://www.w3.org/TR/css-values-4/#lengths>
//!
//! Absolute lengths convert to `px` with fixed ratios. Relative units (`em`, `vw`, ...)
//! have no intrinsic ratio here; callers supply one through a [`Dimensions`] table or
//! a [`DimensionCallback`].

use core::fmt::{Debug, Formatter, Result as FmtResult};
use core::sync::atomic::{AtomicU64, Ordering};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Pixels per inch.
const PX_PER_IN: f64 = 96.0;
/// Centimetres per inch.
const CM_PER_IN: f64 = 2.54;

/// Source of process-unique callback ids.
static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

/// Ratio of one `unit` to one `px` for the absolute length units.
pub fn absolute_px_ratio(unit: &str) -> Option<f64> {
    match unit {
        "px" => Some(1.0),
        "in" => Some(PX_PER_IN),
        "cm" => Some(PX_PER_IN / CM_PER_IN),
        "mm" => Some(PX_PER_IN / CM_PER_IN / 10.0),
        "q" => Some(PX_PER_IN / CM_PER_IN / 40.0),
        "pt" => Some(PX_PER_IN / 72.0),
        "pc" => Some(PX_PER_IN / 6.0),
        _ => None,
    }
}

type RatioFn = dyn Fn(&str) -> Option<f64> + Send + Sync;

/// A unit-to-pixel resolver with a stable identity.
///
/// Two handles compare equal only when cloned from the same [`DimensionCallback::new`]
/// call; the id is what cache keys record.
#[derive(Clone)]
pub struct DimensionCallback {
    id: u64,
    resolve: Arc<RatioFn>,
}

impl DimensionCallback {
    /// Wrap `resolve`, which maps a lowercased unit to its size in `px`.
    pub fn new<F>(resolve: F) -> Self
    where
        F: Fn(&str) -> Option<f64> + Send + Sync + 'static,
    {
        Self {
            id: NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed),
            resolve: Arc::new(resolve),
        }
    }

    /// Process-unique identity of this callback.
    #[inline]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Invoke the callback.
    #[inline]
    pub fn call(&self, unit: &str) -> Option<f64> {
        (self.resolve)(unit)
    }
}

impl PartialEq for DimensionCallback {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Debug for DimensionCallback {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter
            .debug_struct("DimensionCallback")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Serialize for DimensionCallback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.id)
    }
}

/// Unit ratios used to turn dimensions into `px` inside math functions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Dimensions {
    /// Explicit unit → px ratios; consulted before anything else.
    pub table: BTreeMap<String, f64>,
    /// Fallback for units missing from the table and not absolute.
    pub callback: Option<DimensionCallback>,
}

impl Dimensions {
    /// Empty table, no callback.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ratio for `unit` (lowercased).
    #[must_use]
    pub fn with_unit(mut self, unit: &str, px: f64) -> Self {
        self.table.insert(unit.to_ascii_lowercase(), px);
        self
    }

    /// Install a fallback callback.
    #[must_use]
    pub fn with_callback(mut self, callback: DimensionCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Size of one `unit` in px, if known.
    pub fn px_ratio(&self, unit: &str) -> Option<f64> {
        if let Some(ratio) = self.table.get(unit) {
            return Some(*ratio);
        }
        if let Some(ratio) = absolute_px_ratio(unit) {
            return Some(ratio);
        }
        let ratio = self.callback.as_ref().and_then(|callback| callback.call(unit));
        ratio.filter(|value| value.is_finite())
    }

    /// Convert `value` in `unit` to px, if the unit resolves.
    #[inline]
    pub fn to_px(&self, value: f64, unit: &str) -> Option<f64> {
        self.px_ratio(unit).map(|ratio| value * ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_units() {
        let dims = Dimensions::new();
        assert_eq!(dims.to_px(1.0, "in"), Some(96.0));
        assert_eq!(dims.to_px(6.0, "pc"), Some(96.0));
        assert_eq!(dims.to_px(1.0, "em"), None);
    }

    #[test]
    fn table_then_callback() {
        let dims = Dimensions::new()
            .with_unit("EM", 16.0)
            .with_callback(DimensionCallback::new(|unit| (unit == "rem").then_some(10.0)));
        assert_eq!(dims.to_px(2.0, "em"), Some(32.0));
        assert_eq!(dims.to_px(2.0, "rem"), Some(20.0));
        assert_eq!(dims.to_px(2.0, "vw"), None);
    }

    #[test]
    fn callbacks_have_distinct_ids() {
        let first = DimensionCallback::new(|_| None);
        let second = DimensionCallback::new(|_| None);
        assert_ne!(first.id(), second.id());
        assert_eq!(first.clone(), first);
    }
}
