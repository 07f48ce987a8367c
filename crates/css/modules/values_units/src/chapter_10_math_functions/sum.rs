//! Folded representation of a math expression: a sum of coefficient × symbol terms.
//!
//! A symbol is a product of unit atoms (`px`, `%`, `em`, ...) and opaque atoms
//! (`var(--x)`, a parenthesised group that could not be distributed, an unevaluated
//! function). Bare numbers use the empty symbol. Keeping terms in a `BTreeMap` keyed by
//! symbol makes like terms fold on insertion and gives a deterministic order.

use crate::chapter_4_numbers::{Precision, round_with};
use core::cmp::Ordering;
use css_syntax::serialize_number;
use std::collections::BTreeMap;

/// Unit string used for percentages.
pub(crate) const PERCENT: &str = "%";

/// One factor of a symbol.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Atom {
    /// A unit such as `px` or `%`.
    Unit(String),
    /// Text kept verbatim.
    Opaque(String),
}

impl Atom {
    fn to_css(&self) -> String {
        match self {
            Self::Unit(unit) => format!("1{unit}"),
            Self::Opaque(text) => text.clone(),
        }
    }
}

/// A product of atoms, kept sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Symbol {
    numerator: Vec<Atom>,
    denominator: Vec<Atom>,
}

impl Symbol {
    fn unit(unit: &str) -> Self {
        Self {
            numerator: vec![Atom::Unit(unit.to_owned())],
            denominator: Vec::new(),
        }
    }

    pub(crate) fn opaque(text: String) -> Self {
        Self {
            numerator: vec![Atom::Opaque(text)],
            denominator: Vec::new(),
        }
    }

    fn is_number(&self) -> bool {
        self.numerator.is_empty() && self.denominator.is_empty()
    }

    /// The unit of a plain dimension or percentage symbol.
    pub(crate) fn simple_unit(&self) -> Option<&str> {
        match (self.numerator.as_slice(), self.denominator.is_empty()) {
            ([Atom::Unit(unit)], true) => Some(unit),
            _ => None,
        }
    }

    /// Whether this is a number, percentage or dimension.
    fn is_simple(&self) -> bool {
        self.is_number() || self.simple_unit().is_some()
    }

    /// The verbatim text of a lone opaque atom.
    pub(crate) fn opaque_text(&self) -> Option<&str> {
        match (self.numerator.as_slice(), self.denominator.is_empty()) {
            ([Atom::Opaque(text)], true) => Some(text),
            _ => None,
        }
    }

    fn inverse(&self) -> Self {
        Self {
            numerator: self.denominator.clone(),
            denominator: self.numerator.clone(),
        }
    }

    fn product(&self, other: &Self) -> Self {
        let mut numerator: Vec<Atom> = self
            .numerator
            .iter()
            .chain(other.numerator.iter())
            .cloned()
            .collect();
        let mut denominator = Vec::new();
        for atom in self.denominator.iter().chain(other.denominator.iter()) {
            if let Some(index) = numerator.iter().position(|candidate| candidate == atom) {
                numerator.remove(index);
            } else {
                denominator.push(atom.clone());
            }
        }
        numerator.sort();
        denominator.sort();
        Self {
            numerator,
            denominator,
        }
    }

    /// Serialize `coefficient × self`.
    fn term_css(&self, coefficient: f64) -> String {
        let number = serialize_number(round_with(coefficient, Precision::Serialization));
        let mut out = match self.numerator.split_first() {
            None => number,
            Some((Atom::Unit(unit), rest)) => {
                let mut text = format!("{number}{unit}");
                for atom in rest {
                    text.push_str(" * ");
                    text.push_str(&atom.to_css());
                }
                text
            }
            Some((Atom::Opaque(_), _)) => {
                let atoms: Vec<String> = self.numerator.iter().map(Atom::to_css).collect();
                if (coefficient - 1.0).abs() < f64::EPSILON {
                    atoms.join(" * ")
                } else {
                    format!("{number} * {}", atoms.join(" * "))
                }
            }
        };
        for atom in &self.denominator {
            out.push_str(" / ");
            out.push_str(&atom.to_css());
        }
        out
    }
}

/// A folded math expression.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalcSum {
    terms: BTreeMap<Symbol, f64>,
}

/// A math expression that folded to a single plain value.
#[derive(Clone, Debug, PartialEq)]
pub enum CalcValue {
    /// A bare number.
    Number(f64),
    /// A percentage on the 0..=100 scale.
    Percentage(f64),
    /// A dimension in its canonical unit where one is known.
    Dimension { value: f64, unit: String },
}

impl CalcSum {
    fn single(symbol: Symbol, coefficient: f64) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(symbol, coefficient);
        Self { terms }
    }

    /// A bare number.
    pub(crate) fn number(value: f64) -> Self {
        Self::single(Symbol::default(), value)
    }

    /// A dimension (or percentage, with unit `%`).
    pub(crate) fn unit(value: f64, unit: &str) -> Self {
        Self::single(Symbol::unit(unit), value)
    }

    /// Text that takes part in arithmetic symbolically.
    pub(crate) fn opaque(text: String) -> Self {
        Self::single(Symbol::opaque(text), 1.0)
    }

    /// The value when this is a bare number.
    pub fn as_number(&self) -> Option<f64> {
        match self.single_term() {
            Some((symbol, coefficient)) if symbol.is_number() => Some(coefficient),
            _ => None,
        }
    }

    /// The only term, if there is exactly one.
    pub(crate) fn single_term(&self) -> Option<(&Symbol, f64)> {
        let mut iter = self.terms.iter();
        let first = iter.next()?;
        iter.next().is_none().then_some((first.0, *first.1))
    }

    /// The folded value when it is a single number, percentage or dimension.
    pub fn single_value(&self) -> Option<CalcValue> {
        let (symbol, coefficient) = self.single_term()?;
        if symbol.is_number() {
            return Some(CalcValue::Number(coefficient));
        }
        match symbol.simple_unit()? {
            PERCENT => Some(CalcValue::Percentage(coefficient)),
            unit => Some(CalcValue::Dimension {
                value: coefficient,
                unit: unit.to_owned(),
            }),
        }
    }

    /// Add `other` into this sum.
    pub(crate) fn add(&mut self, other: Self) {
        for (symbol, coefficient) in other.terms {
            *self.terms.entry(symbol).or_insert(0.0) += coefficient;
        }
    }

    /// Multiply every term by `factor`. Multi-term sums are only distributed over when
    /// `finalize` is set; otherwise they become an opaque parenthesised factor.
    pub(crate) fn scale(self, factor: f64, finalize: bool) -> Self {
        if self.terms.len() <= 1 || finalize {
            let terms = self
                .terms
                .into_iter()
                .map(|(symbol, coefficient)| (symbol, coefficient * factor))
                .collect();
            return Self { terms };
        }
        let (symbol, coefficient) = self.as_factor();
        Self::single(symbol, coefficient * factor)
    }

    /// This sum as one coefficient × symbol factor.
    fn as_factor(&self) -> (Symbol, f64) {
        match self.single_term() {
            Some((symbol, coefficient)) => (symbol.clone(), coefficient),
            None => (Symbol::opaque(format!("({})", self.to_plain_css())), 1.0),
        }
    }

    /// Product of two sums.
    pub(crate) fn multiply(self, other: Self, finalize: bool) -> Self {
        if let Some(factor) = other.as_number() {
            return self.scale(factor, finalize);
        }
        if let Some(factor) = self.as_number() {
            return other.scale(factor, finalize);
        }
        if finalize {
            let mut out = Self::default();
            for (left, left_coefficient) in &self.terms {
                for (right, right_coefficient) in &other.terms {
                    out.add(Self::single(
                        left.product(right),
                        left_coefficient * right_coefficient,
                    ));
                }
            }
            return out;
        }
        let (left, left_coefficient) = self.as_factor();
        let (right, right_coefficient) = other.as_factor();
        Self::single(left.product(&right), left_coefficient * right_coefficient)
    }

    /// Quotient of two sums. Division by zero stays symbolic.
    pub(crate) fn divide(self, other: Self, finalize: bool) -> Self {
        let (symbol, coefficient) = other.as_factor();
        if coefficient == 0.0 || !coefficient.is_finite() {
            let zero = Symbol::opaque(other.to_plain_css()).inverse();
            return self.multiply(Self::single(zero, 1.0), finalize);
        }
        self.multiply(Self::single(symbol.inverse(), coefficient.recip()), finalize)
    }

    /// Terms in serialization order: plain terms by (value, unit), then symbolic terms by
    /// their text. Zero terms are dropped unless nothing else remains.
    fn ordered_terms(&self) -> Vec<(&Symbol, f64)> {
        let mut terms: Vec<(&Symbol, f64)> = self
            .terms
            .iter()
            .map(|(symbol, coefficient)| (symbol, round_with(*coefficient, Precision::Serialization)))
            .collect();
        terms.sort_by(|left, right| compare_terms(*left, *right));
        let non_zero: Vec<(&Symbol, f64)> = terms
            .iter()
            .copied()
            .filter(|(_, coefficient)| *coefficient != 0.0)
            .collect();
        if non_zero.is_empty() {
            terms.truncate(1);
            terms
        } else {
            non_zero
        }
    }

    /// Serialize without a `calc()` wrapper (`1px + 2em`).
    pub fn to_plain_css(&self) -> String {
        let mut out = String::new();
        for (index, (symbol, coefficient)) in self.ordered_terms().into_iter().enumerate() {
            if index == 0 {
                out.push_str(&symbol.term_css(coefficient));
            } else if coefficient < 0.0 {
                out.push_str(" - ");
                out.push_str(&symbol.term_css(-coefficient));
            } else {
                out.push_str(" + ");
                out.push_str(&symbol.term_css(coefficient));
            }
        }
        out
    }

    /// Serialize as a CSS value: a single plain term (or a lone function) bare,
    /// everything else wrapped in `calc()`.
    pub fn to_css(&self) -> String {
        let terms = self.ordered_terms();
        if let [(symbol, coefficient)] = terms.as_slice() {
            if symbol.is_simple() {
                return symbol.term_css(*coefficient);
            }
            if (coefficient - 1.0).abs() < f64::EPSILON
                && let Some(text) = symbol.opaque_text()
                && !text.starts_with('(')
                && text.ends_with(')')
            {
                return text.to_owned();
            }
        }
        format!("calc({})", self.to_plain_css())
    }
}

fn compare_terms(left: (&Symbol, f64), right: (&Symbol, f64)) -> Ordering {
    let class = |symbol: &Symbol| u8::from(!symbol.is_simple());
    let unit = |symbol: &Symbol| symbol.simple_unit().unwrap_or("").to_owned();
    class(left.0)
        .cmp(&class(right.0))
        .then_with(|| {
            if left.0.is_simple() {
                left.1
                    .total_cmp(&right.1)
                    .then_with(|| unit(left.0).cmp(&unit(right.0)))
            } else {
                left.0
                    .term_css(1.0)
                    .cmp(&right.0.term_css(1.0))
                    .then_with(|| left.1.total_cmp(&right.1))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_terms_fold() {
        let mut sum = CalcSum::unit(1.0, "px");
        sum.add(CalcSum::unit(2.0, "px"));
        assert_eq!(sum.to_css(), "3px");
    }

    #[test]
    fn unlike_terms_sort_by_value_then_unit() {
        let mut sum = CalcSum::unit(2.0, "em");
        sum.add(CalcSum::unit(1.0, "px"));
        sum.add(CalcSum::unit(-3.0, PERCENT));
        assert_eq!(sum.to_css(), "calc(-3% + 1px + 2em)");
    }

    #[test]
    fn group_scaling_depends_on_finalize() {
        let mut group = CalcSum::unit(1.0, "px");
        group.add(CalcSum::unit(1.0, "em"));
        assert_eq!(group.clone().scale(2.0, false).to_css(), "calc(2 * (1em + 1px))");
        assert_eq!(group.scale(2.0, true).to_css(), "calc(2em + 2px)");
    }

    #[test]
    fn products_fold_coefficient_into_first_unit() {
        let product = CalcSum::unit(3.0, "px").multiply(CalcSum::unit(2.0, "em"), false);
        assert_eq!(product.to_css(), "calc(6em * 1px)");
    }

    #[test]
    fn same_unit_division_cancels() {
        let quotient = CalcSum::unit(10.0, "px").divide(CalcSum::unit(4.0, "px"), true);
        assert_eq!(quotient.single_value(), Some(CalcValue::Number(2.5)));
    }

    #[test]
    fn opaque_terms_subtract() {
        let mut sum = CalcSum::unit(1.0, "px");
        sum.add(CalcSum::opaque("var(--x)".to_owned()).scale(-1.0, true));
        assert_eq!(sum.to_css(), "calc(1px - var(--x))");
    }
}
