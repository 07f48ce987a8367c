//! Flattened component-value tokenizer.
//! Spec: <https://www.w3.org/TR/css-syntax-3/#tokenization>
//!
//! `cssparser` nests function and parenthesis blocks; value resolvers prefer one flat
//! stream with explicit open/close markers so they can run a state machine with a
//! nesting counter over it. Numeric tokens are re-read from their source slice so the
//! stream carries full `f64` precision instead of the tokenizer's `f32`.

use cssparser::{ParseError as CssParseError, Parser, ParserInput, Token};

/// Deepest block the tokenizer descends into. Deeper blocks are skipped and stand in the
/// stream as a single [`ValueToken::Other`] holding their opener.
pub const MAX_BLOCK_DEPTH: usize = 64;

/// A single flattened token.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueToken {
    /// A `<number>`.
    Number(f64),
    /// A `<percentage>`, stored on the 0..=100 scale.
    Percentage(f64),
    /// A `<dimension>` with its lowercased unit.
    Dimension { value: f64, unit: String },
    /// An identifier. Lowercased unless it is a custom property name (`--*`).
    Ident(String),
    /// A hash token without the leading `#`, lowercased.
    Hash(String),
    /// A function opener; the name is lowercased and excludes the `(`.
    Function(String),
    /// An opening `(` of a simple block.
    OpenParen,
    /// The `)` closing a function or simple block.
    CloseParen,
    /// A `,`.
    Comma,
    /// A delimiter such as `+`, `-`, `*` or `/`.
    Delim(char),
    /// A run of whitespace, collapsed to one token.
    Whitespace,
    /// Any other token, kept as its source text.
    Other(String),
}

impl ValueToken {
    /// Serialize this token back to CSS text.
    pub fn to_css(&self) -> String {
        match self {
            Self::Number(value) => serialize_number(*value),
            Self::Percentage(value) => format!("{}%", serialize_number(*value)),
            Self::Dimension { value, unit } => format!("{}{unit}", serialize_number(*value)),
            Self::Ident(text) | Self::Other(text) => text.clone(),
            Self::Hash(text) => format!("#{text}"),
            Self::Function(name) => format!("{name}("),
            Self::OpenParen => "(".to_owned(),
            Self::CloseParen => ")".to_owned(),
            Self::Comma => ",".to_owned(),
            Self::Delim(delim) => delim.to_string(),
            Self::Whitespace => " ".to_owned(),
        }
    }

    /// Whether this token is a whitespace run.
    #[inline]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

/// Serialize a number in its shortest form (`3`, `0.5`, never `-0`).
pub fn serialize_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "infinity".to_owned()
        } else {
            "-infinity".to_owned()
        };
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    format!("{value}")
}

/// Widen an `f32` through its shortest decimal representation.
fn widen(value: f32) -> f64 {
    value
        .to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| f64::from(value))
}

/// Re-read a numeric token from source, dropping a trailing unit of `unit_len` bytes.
fn exact_number(source: &str, unit_len: usize, fallback: f32) -> f64 {
    source
        .get(..source.len().saturating_sub(unit_len))
        .and_then(|digits| digits.parse::<f64>().ok())
        .unwrap_or_else(|| widen(fallback))
}

/// Lowercase an identifier unless it names a custom property.
fn normalize_ident(name: &str) -> String {
    if name.starts_with("--") {
        name.to_owned()
    } else {
        name.to_ascii_lowercase()
    }
}

/// Tokenize `value` into a flat stream.
///
/// Blocks left open at the end of input are closed implicitly (as `cssparser` does);
/// use [`crate::check_balanced`] first where unbalanced input must be rejected, and
/// [`crate::check_nesting`] where blocks deeper than [`MAX_BLOCK_DEPTH`] must be reported.
pub fn tokenize(value: &str) -> Vec<ValueToken> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let mut out = Vec::new();
    collect_tokens(&mut parser, &mut out, 0);
    while out.last().is_some_and(ValueToken::is_whitespace) {
        out.pop();
    }
    out
}

/// Flatten the block just opened, bracketed by `open` and `close`.
///
/// Past [`MAX_BLOCK_DEPTH`] the block is not entered; `cssparser` skips its contents
/// without recursing when the next token is read.
fn collect_nested(
    input: &mut Parser<'_, '_>,
    out: &mut Vec<ValueToken>,
    depth: usize,
    open: ValueToken,
    close: ValueToken,
) {
    if depth >= MAX_BLOCK_DEPTH {
        log::trace!("skipping block nested deeper than {MAX_BLOCK_DEPTH}");
        out.push(ValueToken::Other(open.to_css()));
        return;
    }
    out.push(open);
    let nested: Result<(), CssParseError<'_, ()>> = input.parse_nested_block(|block| {
        collect_tokens(block, out, depth + 1);
        Ok(())
    });
    if let Err(error) = nested {
        log::trace!("nested block ended early: {error:?}");
    }
    out.push(close);
}

fn collect_tokens(input: &mut Parser<'_, '_>, out: &mut Vec<ValueToken>, depth: usize) {
    loop {
        let start = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        let source = input.slice_from(start);
        match token {
            Token::Number { value, .. } => out.push(ValueToken::Number(exact_number(source, 0, value))),
            Token::Percentage { unit_value, .. } => {
                out.push(ValueToken::Percentage(exact_number(source, 1, unit_value * 100.0)));
            }
            Token::Dimension { value, unit, .. } => out.push(ValueToken::Dimension {
                value: exact_number(source, unit.len(), value),
                unit: unit.to_ascii_lowercase(),
            }),
            Token::Ident(name) => out.push(ValueToken::Ident(normalize_ident(&name))),
            Token::Hash(text) | Token::IDHash(text) => {
                out.push(ValueToken::Hash(text.to_ascii_lowercase()));
            }
            Token::Function(name) => collect_nested(
                input,
                out,
                depth,
                ValueToken::Function(name.to_ascii_lowercase()),
                ValueToken::CloseParen,
            ),
            Token::ParenthesisBlock => {
                collect_nested(input, out, depth, ValueToken::OpenParen, ValueToken::CloseParen);
            }
            Token::SquareBracketBlock => collect_nested(
                input,
                out,
                depth,
                ValueToken::Other("[".to_owned()),
                ValueToken::Other("]".to_owned()),
            ),
            Token::CurlyBracketBlock => collect_nested(
                input,
                out,
                depth,
                ValueToken::Other("{".to_owned()),
                ValueToken::Other("}".to_owned()),
            ),
            Token::CloseParenthesis => out.push(ValueToken::CloseParen),
            Token::Comma => out.push(ValueToken::Comma),
            Token::Delim(delim) => out.push(ValueToken::Delim(delim)),
            Token::WhiteSpace(_) => {
                if !out.last().is_none_or(ValueToken::is_whitespace) {
                    out.push(ValueToken::Whitespace);
                }
            }
            Token::Comment(_) => {}
            Token::AtKeyword(_)
            | Token::QuotedString(_)
            | Token::UnquotedUrl(_)
            | Token::Colon
            | Token::Semicolon
            | Token::IncludeMatch
            | Token::DashMatch
            | Token::PrefixMatch
            | Token::SuffixMatch
            | Token::SubstringMatch
            | Token::CDO
            | Token::CDC
            | Token::BadUrl(_)
            | Token::BadString(_)
            | Token::CloseSquareBracket
            | Token::CloseCurlyBracket => out.push(ValueToken::Other(source.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_full_precision() {
        let tokens = tokenize("0.1 33.3% 1.1px");
        assert_eq!(
            tokens,
            vec![
                ValueToken::Number(0.1),
                ValueToken::Whitespace,
                ValueToken::Percentage(33.3),
                ValueToken::Whitespace,
                ValueToken::Dimension {
                    value: 1.1,
                    unit: "px".to_owned()
                },
            ]
        );
    }

    #[test]
    fn flattens_nested_blocks() {
        let tokens = tokenize("calc((1px + 2px) * 3)");
        assert_eq!(tokens.first(), Some(&ValueToken::Function("calc".to_owned())));
        assert_eq!(tokens.get(1), Some(&ValueToken::OpenParen));
        let closes = tokens
            .iter()
            .filter(|token| matches!(token, ValueToken::CloseParen))
            .count();
        assert_eq!(closes, 2);
    }

    #[test]
    fn deep_blocks_are_skipped() {
        let deep = format!("calc({}1px{})", "(".repeat(100_000), ")".repeat(100_000));
        let tokens = tokenize(&deep);
        let opens = tokens
            .iter()
            .filter(|token| matches!(token, ValueToken::OpenParen))
            .count();
        assert_eq!(opens, MAX_BLOCK_DEPTH - 1);
        assert!(tokens.contains(&ValueToken::Other("(".to_owned())));
        assert!(!tokens.iter().any(|token| matches!(token, ValueToken::Dimension { .. })));
    }

    #[test]
    fn custom_property_names_keep_case() {
        let tokens = tokenize("VAR(--Main-Color)");
        assert_eq!(
            tokens,
            vec![
                ValueToken::Function("var".to_owned()),
                ValueToken::Ident("--Main-Color".to_owned()),
                ValueToken::CloseParen,
            ]
        );
    }

    #[test]
    fn serializes_numbers_shortest() {
        assert_eq!(serialize_number(3.0), "3");
        assert_eq!(serialize_number(-0.0), "0");
        assert_eq!(serialize_number(0.5), "0.5");
        assert_eq!(ValueToken::Percentage(12.5).to_css(), "12.5%");
    }
}
