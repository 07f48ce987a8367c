//! Textual splitting helpers that respect parentheses and quoted strings.

use crate::ParseError;
use core::mem;

/// Scanner state shared by the splitting helpers.
#[derive(Default)]
struct Scanner {
    depth: usize,
    quote: Option<char>,
    escaped: bool,
}

impl Scanner {
    /// Feed one character; returns `true` when it sits at top level outside quotes.
    fn step(&mut self, ch: char) -> Result<bool, ParseError> {
        if self.escaped {
            self.escaped = false;
            return Ok(false);
        }
        if ch == '\\' {
            self.escaped = true;
            return Ok(false);
        }
        if let Some(open) = self.quote {
            if ch == open {
                self.quote = None;
            }
            return Ok(false);
        }
        match ch {
            '"' | '\'' => {
                self.quote = Some(ch);
                Ok(false)
            }
            '(' => {
                self.depth += 1;
                Ok(false)
            }
            ')' => {
                self.depth = self
                    .depth
                    .checked_sub(1)
                    .ok_or(ParseError::UnbalancedParentheses)?;
                Ok(false)
            }
            _ => Ok(self.depth == 0),
        }
    }
}

/// Check that every `(` in `value` is closed, ignoring quoted text.
///
/// # Errors
/// Returns [`ParseError::UnbalancedParentheses`] on a stray `)` or an unclosed `(`.
pub fn check_balanced(value: &str) -> Result<(), ParseError> {
    check_nesting(value, usize::MAX)
}

/// [`check_balanced`], additionally rejecting parentheses nested deeper than `limit`.
///
/// Runs in one pass without recursion, so it is safe to call before any recursive
/// descent over `value`.
///
/// # Errors
/// Returns [`ParseError::NestingTooDeep`] as soon as the depth passes `limit`, and
/// [`ParseError::UnbalancedParentheses`] for unbalanced input.
pub fn check_nesting(value: &str, limit: usize) -> Result<(), ParseError> {
    let mut scanner = Scanner::default();
    for ch in value.chars() {
        scanner.step(ch)?;
        if scanner.depth > limit {
            return Err(ParseError::NestingTooDeep);
        }
    }
    if scanner.depth == 0 && scanner.quote.is_none() {
        Ok(())
    } else {
        Err(ParseError::UnbalancedParentheses)
    }
}

/// Byte index of the `)` matching the `(` at `open_index`.
pub fn find_matching_paren(value: &str, open_index: usize) -> Option<usize> {
    let tail = value.get(open_index..)?;
    if !tail.starts_with('(') {
        return None;
    }
    let mut scanner = Scanner::default();
    for (offset, ch) in tail.char_indices() {
        scanner.step(ch).ok()?;
        if ch == ')' && scanner.depth == 0 && scanner.quote.is_none() {
            return Some(open_index + offset);
        }
    }
    None
}

/// Split `value` on top-level `delimiter` characters.
///
/// Parts are trimmed. Empty parts are kept (so `a,,b` yields three parts) except when
/// the delimiter is whitespace, where runs collapse.
pub fn split_value(value: &str, delimiter: char) -> Vec<String> {
    let mut scanner = Scanner::default();
    let mut parts = Vec::new();
    let mut current = String::new();
    let whitespace = delimiter.is_ascii_whitespace();
    for ch in value.chars() {
        let top = scanner.step(ch).unwrap_or(false);
        let splits = if whitespace {
            ch.is_ascii_whitespace()
        } else {
            ch == delimiter
        };
        if top && splits {
            parts.push(current.trim().to_owned());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    parts.push(current.trim().to_owned());
    if whitespace {
        parts.retain(|part| !part.is_empty());
    }
    parts
}

/// Split `value` into whitespace-separated components, keeping top-level `,` and `/`
/// as standalone components.
///
/// `rgb` arguments `10 20 30/50%` become `["10", "20", "30", "/", "50%"]`.
pub fn split_components(value: &str) -> Vec<String> {
    let mut scanner = Scanner::default();
    let mut parts = Vec::new();
    let mut current = String::new();
    for ch in value.chars() {
        let top = scanner.step(ch).unwrap_or(false);
        if top && ch.is_ascii_whitespace() {
            if !current.is_empty() {
                parts.push(mem::take(&mut current));
            }
        } else if top && (ch == ',' || ch == '/') {
            if !current.is_empty() {
                parts.push(mem::take(&mut current));
            }
            parts.push(ch.to_string());
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Name of the function `value` opens with (`"rgb"` for `rgb(1 2 3)`), as written.
pub fn function_name(value: &str) -> Option<&str> {
    let open = value.find('(')?;
    let name = value.get(..open)?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    valid.then_some(name)
}

/// Split a whole-value function call into its name and trimmed argument text.
///
/// Returns `None` unless the `)` matching the first `(` is the last character.
pub fn function_arguments(value: &str) -> Option<(&str, &str)> {
    let trimmed = value.trim();
    let name = function_name(trimmed)?;
    let open = name.len();
    let close = find_matching_paren(trimmed, open)?;
    if close + 1 != trimmed.len() {
        return None;
    }
    let args = trimmed.get(open + 1..close)?;
    Some((name, args.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance() {
        assert!(check_balanced("calc(1px + (2px * 3))").is_ok());
        assert!(check_balanced("calc(1px + 2px").is_err());
        assert!(check_balanced("1px)").is_err());
        assert!(check_balanced("url(\")\")").is_ok());
    }

    #[test]
    fn nesting_limit() {
        assert_eq!(check_nesting("calc((1px))", 2), Ok(()));
        assert_eq!(check_nesting("calc(((1px)))", 2), Err(ParseError::NestingTooDeep));
        let deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(check_nesting(&deep, 32), Err(ParseError::NestingTooDeep));
        assert_eq!(check_nesting("((1)", 8), Err(ParseError::UnbalancedParentheses));
    }

    #[test]
    fn splits_top_level_only() {
        assert_eq!(
            split_value("in srgb, rgb(1, 2, 3) 20%, blue", ','),
            vec!["in srgb", "rgb(1, 2, 3) 20%", "blue"]
        );
        assert_eq!(split_value("a,,b", ','), vec!["a", "", "b"]);
        assert_eq!(split_value("  a   b(c d) ", ' '), vec!["a", "b(c d)"]);
    }

    #[test]
    fn components_keep_slash() {
        assert_eq!(
            split_components("10 calc(1 / 2) 30/50%"),
            vec!["10", "calc(1 / 2)", "30", "/", "50%"]
        );
        assert_eq!(split_components("1,2"), vec!["1", ",", "2"]);
    }

    #[test]
    fn function_parts() {
        assert_eq!(function_arguments(" rgb( 1 2 3 ) "), Some(("rgb", "1 2 3")));
        assert_eq!(function_arguments("rgb(1) x"), None);
        assert_eq!(function_name("--x(1)"), Some("--x"));
        assert_eq!(function_name("(1)"), None);
        assert_eq!(find_matching_paren("a(b(c))d", 1), Some(6));
    }
}
