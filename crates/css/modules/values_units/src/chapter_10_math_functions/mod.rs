//! CSS Values & Units Level 4 — §10 Mathematical Expressions
//! Spec: <https://www.w3.org/TR/css-values-4/#math>
//!
//! Expressions are tokenized once into a flat stream and folded bottom-up: `*` and `/`
//! combine operands into products, `+` and `-` collect products into a [`CalcSum`] whose
//! like terms merge. Terms that cannot merge (unlike units, `var()`, unknown functions)
//! survive symbolically and are serialized in a deterministic order so folding a second
//! time reproduces the same text.

mod functions;
mod parser;
mod sum;

use crate::chapter_6_dimensions::Dimensions;
use core::error::Error;
use core::fmt::{Display, Formatter, Result as FmtResult};
use css_syntax::{
    ParseError, Pattern, check_nesting, function_arguments, grammar, split_components, tokenize,
};
use parser::MathParser;

pub use sum::{CalcSum, CalcValue};

/// Deepest accepted nesting of functions and parenthesised groups.
pub const MAX_NESTING: usize = 32;

/// Failure to fold a math expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalcError {
    /// A `(` without its `)` or the reverse.
    UnbalancedParentheses,
    /// A token that cannot appear where it was found.
    UnexpectedToken(String),
    /// An operator without a right-hand operand.
    MissingOperand,
    /// `calc()` with nothing inside.
    EmptyExpression,
    /// Nesting deeper than [`MAX_NESTING`].
    NestingTooDeep,
}

impl Display for CalcError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::UnbalancedParentheses => write!(formatter, "unbalanced parentheses"),
            Self::UnexpectedToken(token) => write!(formatter, "unexpected token {token:?}"),
            Self::MissingOperand => write!(formatter, "operator without operand"),
            Self::EmptyExpression => write!(formatter, "empty math expression"),
            Self::NestingTooDeep => {
                write!(formatter, "math expression nested deeper than {MAX_NESTING}")
            }
        }
    }
}

impl Error for CalcError {}

impl From<ParseError> for CalcError {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::NestingTooDeep => Self::NestingTooDeep,
            _ => Self::UnbalancedParentheses,
        }
    }
}

/// Settings for one folding run.
#[derive(Clone, Copy, Debug)]
pub struct CalcContext<'dims> {
    /// Unit ratios for converting dimensions to `px`.
    pub dimensions: &'dims Dimensions,
    /// Distribute scalars over multi-term groups (`2 * (1px + 1em)` → `2px + 2em`).
    pub finalize: bool,
}

impl<'dims> CalcContext<'dims> {
    /// A finalizing context over `dimensions`.
    #[inline]
    pub const fn new(dimensions: &'dims Dimensions) -> Self {
        Self {
            dimensions,
            finalize: true,
        }
    }

    /// Toggle the finalize pass.
    #[inline]
    #[must_use]
    pub const fn with_finalize(mut self, finalize: bool) -> Self {
        self.finalize = finalize;
        self
    }
}

/// Fold a single math function call such as `calc(1px + 2px)`.
///
/// # Errors
/// Returns a [`CalcError`] when the expression is malformed or nested deeper than
/// [`MAX_NESTING`].
pub fn evaluate_math(expression: &str, context: &CalcContext<'_>) -> Result<CalcSum, CalcError> {
    check_nesting(expression, MAX_NESTING)?;
    let tokens = tokenize(expression);
    MathParser::new(&tokens, context).parse_root()
}

/// Fold every math function in a (possibly multi-component) value.
///
/// Values without a math function are returned unchanged.
///
/// # Errors
/// Returns a [`CalcError`] when any math expression is malformed.
pub fn evaluate_calc(value: &str, context: &CalcContext<'_>) -> Result<String, CalcError> {
    let lower = value.to_ascii_lowercase();
    if !grammar().is_match(Pattern::MathFunction, &lower) {
        return Ok(value.to_owned());
    }
    check_nesting(value, MAX_NESTING)?;
    rewrite(value, context, 0)
}

fn rewrite(value: &str, context: &CalcContext<'_>, depth: usize) -> Result<String, CalcError> {
    if depth > MAX_NESTING {
        return Err(CalcError::NestingTooDeep);
    }
    let mut parts = Vec::new();
    for component in split_components(value) {
        parts.push(rewrite_component(&component, context, depth)?);
    }
    Ok(join_components(&parts))
}

fn rewrite_component(
    component: &str,
    context: &CalcContext<'_>,
    depth: usize,
) -> Result<String, CalcError> {
    let lower = component.to_ascii_lowercase();
    let table = grammar();
    if !table.is_match(Pattern::MathFunction, &lower) {
        return Ok(component.to_owned());
    }
    let Some((name, arguments)) = function_arguments(component) else {
        return Ok(component.to_owned());
    };
    if table.is_match(Pattern::MathFunctionStart, &lower) {
        return Ok(evaluate_math(component, context)?.to_css());
    }
    Ok(format!("{name}({})", rewrite(arguments, context, depth + 1)?))
}

/// Join split components back together: commas hug the preceding component,
/// everything else is space separated.
fn join_components(parts: &[String]) -> String {
    let mut out = String::new();
    for part in parts {
        if part == "," {
            out.push(',');
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

/// Fold every math function in `value`, returning `""` when an expression is malformed.
pub fn css_calc(value: &str, dimensions: &Dimensions) -> String {
    evaluate_calc(value, &CalcContext::new(dimensions)).unwrap_or_else(|error| {
        log::debug!("calc folding failed for {value:?}: {error}");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(value: &str) -> String {
        css_calc(value, &Dimensions::new())
    }

    #[test]
    fn folds_like_terms() {
        assert_eq!(fold("calc(1px + 2px)"), "3px");
        assert_eq!(fold("calc(2 * 3)"), "6");
        assert_eq!(fold("calc(1in - 6px)"), "90px");
        assert_eq!(fold("calc(0.1 + 0.2)"), "0.3");
    }

    #[test]
    fn keeps_unlike_terms() {
        assert_eq!(fold("calc(2em + 1px)"), "calc(1px + 2em)");
        assert_eq!(fold("calc(1px + var(--gap))"), "calc(1px + var(--gap))");
    }

    #[test]
    fn non_math_values_pass_through() {
        assert_eq!(fold("1px solid red"), "1px solid red");
    }

    #[test]
    fn malformed_is_empty() {
        assert_eq!(fold("calc(1px + )"), "");
        assert_eq!(fold("calc()"), "");
        assert_eq!(fold("calc(1px + 2px"), "");
        assert_eq!(fold("calc(1px ! 2px)"), "");
    }

    #[test]
    fn nesting_limit() {
        let deep = format!("{}1{}", "calc(".repeat(40), ")".repeat(40));
        assert_eq!(
            evaluate_calc(&deep, &CalcContext::new(&Dimensions::new())),
            Err(CalcError::NestingTooDeep)
        );
    }
}
