//! Recursive-descent folding over the flattened token stream.

use super::functions::{apply_function, is_math_function};
use super::sum::{CalcSum, PERCENT};
use super::{CalcContext, CalcError, MAX_NESTING};
use crate::chapter_7_angles::angle_to_degrees;
use core::f64::consts::{E, PI};
use css_syntax::ValueToken;

/// Parser state: a cursor into the token stream plus the current nesting depth.
pub(crate) struct MathParser<'tokens, 'ctx> {
    tokens: &'tokens [ValueToken],
    position: usize,
    depth: usize,
    context: &'ctx CalcContext<'ctx>,
}

impl<'tokens, 'ctx> MathParser<'tokens, 'ctx> {
    pub(crate) const fn new(tokens: &'tokens [ValueToken], context: &'ctx CalcContext<'ctx>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            context,
        }
    }

    fn peek(&self) -> Option<&'tokens ValueToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'tokens ValueToken> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(ValueToken::is_whitespace) {
            self.position += 1;
        }
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(CalcError::NestingTooDeep);
        }
        Ok(())
    }

    const fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Parse one whole math function call and require the stream to end after it.
    pub(crate) fn parse_root(&mut self) -> Result<CalcSum, CalcError> {
        self.skip_whitespace();
        let value = match self.peek() {
            Some(ValueToken::Function(name)) if is_math_function(name) => self.parse_value()?,
            Some(token) => return Err(CalcError::UnexpectedToken(token.to_css())),
            None => return Err(CalcError::EmptyExpression),
        };
        self.skip_whitespace();
        match self.peek() {
            None => Ok(value),
            Some(token) => Err(CalcError::UnexpectedToken(token.to_css())),
        }
    }

    /// `<sum> = <product> [ [ '+' | '-' ] <product> ]*`
    fn parse_sum(&mut self) -> Result<CalcSum, CalcError> {
        let mut total = self.parse_product()?;
        loop {
            self.skip_whitespace();
            let negate = match self.peek() {
                Some(ValueToken::Delim('+')) => false,
                Some(ValueToken::Delim('-')) => true,
                _ => break,
            };
            self.position += 1;
            let operand = self.parse_product()?;
            if negate {
                total.add(operand.scale(-1.0, true));
            } else {
                total.add(operand);
            }
        }
        Ok(total)
    }

    /// `<product> = <value> [ [ '*' | '/' ] <value> ]*`
    fn parse_product(&mut self) -> Result<CalcSum, CalcError> {
        let mut product = self.parse_value()?;
        loop {
            self.skip_whitespace();
            let divide = match self.peek() {
                Some(ValueToken::Delim('*')) => false,
                Some(ValueToken::Delim('/')) => true,
                _ => break,
            };
            self.position += 1;
            let operand = self.parse_value()?;
            product = if divide {
                product.divide(operand, self.context.finalize)
            } else {
                product.multiply(operand, self.context.finalize)
            };
        }
        Ok(product)
    }

    fn parse_value(&mut self) -> Result<CalcSum, CalcError> {
        self.skip_whitespace();
        let Some(token) = self.advance() else {
            return Err(CalcError::MissingOperand);
        };
        match token {
            ValueToken::Number(value) => Ok(CalcSum::number(*value)),
            ValueToken::Percentage(value) => Ok(CalcSum::unit(*value, PERCENT)),
            ValueToken::Dimension { value, unit } => Ok(self.dimension(*value, unit)),
            ValueToken::Ident(name) => Ok(constant(name)),
            ValueToken::OpenParen => {
                self.enter()?;
                let inner = self.parse_sum()?;
                self.expect_close()?;
                self.leave();
                Ok(inner)
            }
            ValueToken::Function(name) => {
                self.enter()?;
                let value = self.parse_function(name)?;
                self.leave();
                Ok(value)
            }
            ValueToken::CloseParen | ValueToken::Comma => Err(CalcError::MissingOperand),
            ValueToken::Hash(_)
            | ValueToken::Delim(_)
            | ValueToken::Whitespace
            | ValueToken::Other(_) => Err(CalcError::UnexpectedToken(token.to_css())),
        }
    }

    /// Canonicalize a dimension: angles to `deg`, resolvable lengths to `px`.
    fn dimension(&self, value: f64, unit: &str) -> CalcSum {
        if let Some(degrees) = angle_to_degrees(value, unit) {
            return CalcSum::unit(degrees, "deg");
        }
        match self.context.dimensions.to_px(value, unit) {
            Some(px) => CalcSum::unit(px, "px"),
            None => CalcSum::unit(value, unit),
        }
    }

    fn expect_close(&mut self) -> Result<(), CalcError> {
        self.skip_whitespace();
        match self.advance() {
            Some(ValueToken::CloseParen) => Ok(()),
            Some(token) => Err(CalcError::UnexpectedToken(token.to_css())),
            None => Err(CalcError::UnbalancedParentheses),
        }
    }

    fn parse_function(&mut self, name: &str) -> Result<CalcSum, CalcError> {
        if name == "calc" {
            self.skip_whitespace();
            if matches!(self.peek(), Some(ValueToken::CloseParen) | None) {
                return Err(CalcError::EmptyExpression);
            }
            let inner = self.parse_sum()?;
            self.expect_close()?;
            return Ok(inner);
        }
        if is_math_function(name) {
            let arguments = self.parse_arguments()?;
            return apply_function(name, arguments);
        }
        Ok(CalcSum::opaque(self.capture_opaque(name)?))
    }

    /// Comma-separated sums up to the closing parenthesis.
    fn parse_arguments(&mut self) -> Result<Vec<CalcSum>, CalcError> {
        let mut arguments = Vec::new();
        loop {
            self.skip_whitespace();
            if arguments.is_empty() && matches!(self.peek(), Some(ValueToken::CloseParen)) {
                return Err(CalcError::EmptyExpression);
            }
            arguments.push(self.parse_sum()?);
            self.skip_whitespace();
            match self.advance() {
                Some(ValueToken::Comma) => {}
                Some(ValueToken::CloseParen) => return Ok(arguments),
                Some(token) => return Err(CalcError::UnexpectedToken(token.to_css())),
                None => return Err(CalcError::UnbalancedParentheses),
            }
        }
    }

    /// Re-serialize an unknown function verbatim (whitespace normalized).
    fn capture_opaque(&mut self, name: &str) -> Result<String, CalcError> {
        let mut out = format!("{name}(");
        let mut nesting = 1_usize;
        let mut pending_space = false;
        while let Some(token) = self.advance() {
            match token {
                ValueToken::Whitespace => pending_space = true,
                ValueToken::Comma => {
                    out.push_str(", ");
                    pending_space = false;
                }
                ValueToken::CloseParen => {
                    out.push(')');
                    pending_space = false;
                    nesting -= 1;
                    if nesting == 0 {
                        return Ok(out);
                    }
                }
                ValueToken::Number(_)
                | ValueToken::Percentage(_)
                | ValueToken::Dimension { .. }
                | ValueToken::Ident(_)
                | ValueToken::Hash(_)
                | ValueToken::Function(_)
                | ValueToken::OpenParen
                | ValueToken::Delim(_)
                | ValueToken::Other(_) => {
                    if pending_space && !out.ends_with('(') && !out.ends_with(' ') {
                        out.push(' ');
                    }
                    pending_space = false;
                    out.push_str(&token.to_css());
                    if matches!(token, ValueToken::Function(_) | ValueToken::OpenParen) {
                        nesting += 1;
                        if nesting > MAX_NESTING {
                            return Err(CalcError::NestingTooDeep);
                        }
                    }
                }
            }
        }
        Err(CalcError::UnbalancedParentheses)
    }
}

/// Numeric constants, or an identifier kept symbolically.
fn constant(name: &str) -> CalcSum {
    match name {
        "e" => CalcSum::number(E),
        "pi" => CalcSum::number(PI),
        "infinity" => CalcSum::number(f64::INFINITY),
        "-infinity" => CalcSum::number(f64::NEG_INFINITY),
        "nan" => CalcSum::number(f64::NAN),
        _ => CalcSum::opaque(name.to_owned()),
    }
}
