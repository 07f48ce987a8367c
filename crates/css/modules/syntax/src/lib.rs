//! CSS Syntax Module Level 3 — Tokenization of component values.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! This crate holds the pieces every value resolver builds on:
//! - [`grammar`]: the regular-expression fragments for numbers, percentages, angles,
//!   lengths and every supported function form, compiled once into a static table.
//! - [`tokens`]: a `cssparser`-backed tokenizer flattening nested blocks into a single
//!   stream with explicit open/close markers.
//! - [`split`]: top-level splitting of component values that respects nested parentheses.

#![forbid(unsafe_code)]

pub mod grammar;
pub mod split;
pub mod tokens;

use core::error::Error;
use core::fmt::{Display, Formatter, Result as FmtResult};

pub use grammar::{Grammar, Pattern, grammar};
pub use split::{
    check_balanced, check_nesting, find_matching_paren, function_arguments, function_name, split_components,
    split_value,
};
pub use tokens::{MAX_BLOCK_DEPTH, ValueToken, serialize_number, tokenize};

/// Parse error for the syntax utilities in this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The next token did not match the expected grammar.
    UnexpectedToken,
    /// A `(` was never closed, or a `)` appeared without an opener.
    UnbalancedParentheses,
    /// Parentheses nested deeper than the caller's limit.
    NestingTooDeep,
}

impl Display for ParseError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::UnexpectedToken => write!(formatter, "unexpected token"),
            Self::UnbalancedParentheses => write!(formatter, "unbalanced parentheses"),
            Self::NestingTooDeep => write!(formatter, "parentheses nested too deeply"),
        }
    }
}

impl Error for ParseError {}
