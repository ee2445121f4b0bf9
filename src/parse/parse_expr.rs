use super::{ParseError, Parser};
use crate::ast::{BinOp, Expr};

fn is_var_marker(c: char) -> bool {
    matches!(c, '_' | '#' | '$')
}

impl Parser<'_> {
    /// expr ::= term (("+"|"-") term)*
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_term()?;
        loop {
            let binop = match self.peek_token() {
                Some('+') => BinOp::Add,
                Some('-') => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.skip_token();

            let rhs = self.parse_term()?;
            lhs = Expr::binary(binop, lhs, rhs);
        }
    }

    /// term ::= factor (("*"|"/") factor)*
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_factor()?;
        loop {
            let binop = match self.peek_token() {
                Some('*') => BinOp::Mul,
                Some('/') => BinOp::Div,
                _ => return Ok(lhs),
            };
            self.skip_token();

            let rhs = self.parse_factor()?;
            lhs = Expr::binary(binop, lhs, rhs);
        }
    }

    /// factor ::= "(" expr ")" | var_marker uint | "-" uint | uint
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        match self.peek_token() {
            Some('(') => {
                self.skip_token();
                let expr = self.parse_expr()?;
                match self.peek_token() {
                    Some(')') => {
                        self.skip_token();
                        Ok(expr)
                    }
                    found => Err(ParseError::MissingCloseParen {
                        found,
                        pos: self.pos(),
                    }),
                }
            }
            Some(c) if is_var_marker(c) => {
                self.skip_token();
                let (n, start) = self.parse_uint()?;
                let index = usize::try_from(n)
                    .map_err(|_| ParseError::LiteralOverflow { pos: start })?;
                Ok(Expr::var(index))
            }
            Some('-') => {
                self.skip_token();
                let (n, start) = self.parse_uint()?;
                // magnitude of i64::MIN is one past i64::MAX
                let v = 0i64
                    .checked_sub_unsigned(n)
                    .ok_or(ParseError::LiteralOverflow { pos: start })?;
                Ok(Expr::val(v))
            }
            Some(c) if c.is_ascii_digit() => {
                let (n, start) = self.parse_uint()?;
                let v =
                    i64::try_from(n).map_err(|_| ParseError::LiteralOverflow { pos: start })?;
                Ok(Expr::val(v))
            }
            found => Err(ParseError::UnexpectedToken {
                found,
                pos: self.pos(),
            }),
        }
    }

    /// uint ::= digit+
    ///
    /// Returns the value and the position of its first digit. Spaces are
    /// skipped before every digit, so `1 2` reads as `12`.
    fn parse_uint(&mut self) -> Result<(u64, usize), ParseError> {
        let start = match self.peek_token() {
            Some(c) if c.is_ascii_digit() => self.pos(),
            found => {
                return Err(ParseError::UnexpectedToken {
                    found,
                    pos: self.pos(),
                })
            }
        };

        let mut n: u64 = 0;
        while let Some(d) = self.peek_token().and_then(|c| c.to_digit(10)) {
            self.skip_token();
            n = n
                .checked_mul(10)
                .and_then(|n| n.checked_add(u64::from(d)))
                .ok_or(ParseError::LiteralOverflow { pos: start })?;
        }
        Ok((n, start))
    }
}
