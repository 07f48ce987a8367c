//! Math functions other than `calc()`.
//! Spec: <https://www.w3.org/TR/css-values-4/#comparison-functions>
//! Spec: <https://www.w3.org/TR/css-values-4/#stepped-value-functions>
//! Spec: <https://www.w3.org/TR/css-values-4/#trig-funcs>
//! Spec: <https://www.w3.org/TR/css-values-4/#exponent-funcs>
//! Spec: <https://www.w3.org/TR/css-values-4/#sign-funcs>
//!
//! A function evaluates when its arguments fold to plain values of a compatible kind;
//! otherwise it is re-serialized with canonical arguments and kept as an opaque term.

use super::CalcError;
use super::sum::{CalcSum, Symbol};

/// Names of the math functions understood inside math expressions.
const MATH_FUNCTIONS: [&str; 21] = [
    "calc", "min", "max", "clamp", "abs", "sign", "round", "mod", "rem", "sin", "cos", "tan",
    "asin", "acos", "atan", "atan2", "pow", "sqrt", "hypot", "log", "exp",
];

/// Rounding strategies for `round()`.
const ROUNDING_STRATEGIES: [&str; 4] = ["nearest", "up", "down", "to-zero"];

/// Whether `name` is a math function.
#[inline]
pub(crate) fn is_math_function(name: &str) -> bool {
    MATH_FUNCTIONS.contains(&name)
}

/// A plain (number, percentage or dimension) argument.
fn plain(argument: &CalcSum) -> Option<(Symbol, f64)> {
    let (symbol, coefficient) = argument.single_term()?;
    let is_plain = symbol.simple_unit().is_some() || argument.as_number().is_some();
    is_plain.then(|| (symbol.clone(), coefficient))
}

/// Plain arguments that all share one unit.
fn same_kind(arguments: &[CalcSum]) -> Option<(Symbol, Vec<f64>)> {
    let mut kind: Option<Symbol> = None;
    let mut values = Vec::with_capacity(arguments.len());
    for argument in arguments {
        let (symbol, coefficient) = plain(argument)?;
        match &kind {
            Some(existing) if *existing != symbol => return None,
            Some(_) => {}
            None => kind = Some(symbol),
        }
        values.push(coefficient);
    }
    kind.map(|symbol| (symbol, values))
}

fn numbers(arguments: &[CalcSum]) -> Option<Vec<f64>> {
    arguments.iter().map(CalcSum::as_number).collect()
}

fn with_kind(symbol: Symbol, value: f64) -> CalcSum {
    let mut out = CalcSum::number(value);
    if let Some(unit) = symbol.simple_unit() {
        out = CalcSum::unit(value, unit);
    }
    out
}

/// Radians from a number (radians) or a canonical `deg` angle.
fn radians(argument: &CalcSum) -> Option<f64> {
    if let Some(value) = argument.as_number() {
        return Some(value);
    }
    let (symbol, coefficient) = argument.single_term()?;
    (symbol.simple_unit() == Some("deg")).then(|| coefficient.to_radians())
}

fn degrees(value: f64) -> CalcSum {
    CalcSum::unit(value.to_degrees(), "deg")
}

fn opaque(name: &str, arguments: &[CalcSum]) -> CalcSum {
    let text: Vec<String> = arguments.iter().map(CalcSum::to_plain_css).collect();
    CalcSum::opaque(format!("{name}({})", text.join(", ")))
}

fn round_stepped(strategy: &str, value: f64, step: f64) -> f64 {
    let ratio = value / step;
    let steps = match strategy {
        "up" => ratio.ceil(),
        "down" => ratio.floor(),
        "to-zero" => ratio.trunc(),
        _ => (ratio + 0.5).floor(),
    };
    steps * step
}

fn evaluate_round(arguments: &[CalcSum]) -> Option<CalcSum> {
    let (strategy, rest) = match arguments.split_first() {
        Some((first, rest))
            if first
                .single_term()
                .and_then(|(symbol, _)| symbol.opaque_text())
                .is_some_and(|text| ROUNDING_STRATEGIES.contains(&text)) =>
        {
            let (symbol, _) = first.single_term()?;
            (symbol.opaque_text()?.to_owned(), rest)
        }
        _ => ("nearest".to_owned(), arguments),
    };
    let (symbol, values) = match rest {
        [value] => {
            let number = value.as_number()?;
            (Symbol::default(), vec![number, 1.0])
        }
        [_, _] => same_kind(rest)?,
        _ => return None,
    };
    let [value, step] = values.as_slice() else {
        return None;
    };
    if *step == 0.0 {
        return None;
    }
    Some(with_kind(symbol, round_stepped(&strategy, *value, *step)))
}

fn evaluate(name: &str, arguments: &[CalcSum]) -> Option<CalcSum> {
    match name {
        "min" | "max" => {
            let (symbol, values) = same_kind(arguments)?;
            let picked = values.iter().copied().reduce(|left, right| {
                if name == "min" { left.min(right) } else { left.max(right) }
            })?;
            Some(with_kind(symbol, picked))
        }
        "clamp" => {
            let (symbol, values) = same_kind(arguments)?;
            let [lower, value, upper] = values.as_slice() else {
                return None;
            };
            Some(with_kind(symbol, value.min(*upper).max(*lower)))
        }
        "abs" => {
            let (symbol, values) = same_kind(arguments)?;
            let [value] = values.as_slice() else { return None };
            Some(with_kind(symbol, value.abs()))
        }
        "sign" => {
            let (_, values) = same_kind(arguments)?;
            let [value] = values.as_slice() else { return None };
            let sign = if *value == 0.0 { 0.0 } else { value.signum() };
            Some(CalcSum::number(sign))
        }
        "round" => evaluate_round(arguments),
        "mod" | "rem" => {
            let (symbol, values) = same_kind(arguments)?;
            let [dividend, divisor] = values.as_slice() else {
                return None;
            };
            if *divisor == 0.0 {
                return None;
            }
            let quotient = dividend / divisor;
            let whole = if name == "mod" { quotient.floor() } else { quotient.trunc() };
            Some(with_kind(symbol, dividend - divisor * whole))
        }
        "sin" | "cos" | "tan" => {
            let [argument] = arguments else { return None };
            let angle = radians(argument)?;
            let result = match name {
                "sin" => angle.sin(),
                "cos" => angle.cos(),
                _ => angle.tan(),
            };
            Some(CalcSum::number(result))
        }
        "asin" | "acos" | "atan" => {
            let values = numbers(arguments)?;
            let [value] = values.as_slice() else {
                return None;
            };
            let result = match name {
                "asin" => value.asin(),
                "acos" => value.acos(),
                _ => value.atan(),
            };
            Some(degrees(result))
        }
        "atan2" => {
            let (_, values) = same_kind(arguments)?;
            let [first, second] = values.as_slice() else {
                return None;
            };
            Some(degrees(first.atan2(*second)))
        }
        "pow" => {
            let values = numbers(arguments)?;
            let [base, exponent] = values.as_slice() else {
                return None;
            };
            Some(CalcSum::number(base.powf(*exponent)))
        }
        "sqrt" => {
            let values = numbers(arguments)?;
            let [value] = values.as_slice() else {
                return None;
            };
            Some(CalcSum::number(value.sqrt()))
        }
        "exp" => {
            let values = numbers(arguments)?;
            let [value] = values.as_slice() else {
                return None;
            };
            Some(CalcSum::number(value.exp()))
        }
        "log" => match numbers(arguments)?.as_slice() {
            [value] => Some(CalcSum::number(value.ln())),
            [value, base] => Some(CalcSum::number(value.log(*base))),
            _ => None,
        },
        "hypot" => {
            let (symbol, values) = same_kind(arguments)?;
            let total = values.iter().map(|value| value * value).sum::<f64>().sqrt();
            Some(with_kind(symbol, total))
        }
        _ => None,
    }
}

/// Evaluate a math function over already-folded arguments.
///
/// # Errors
/// Returns [`CalcError::MissingOperand`] when called without arguments.
pub(crate) fn apply_function(name: &str, arguments: Vec<CalcSum>) -> Result<CalcSum, CalcError> {
    if arguments.is_empty() {
        return Err(CalcError::MissingOperand);
    }
    Ok(evaluate(name, &arguments).unwrap_or_else(|| {
        log::trace!("keeping {name}() symbolic");
        opaque(name, &arguments)
    }))
}
