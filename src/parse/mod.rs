mod cursor;
mod parse_expr;

pub use cursor::Cursor;

use crate::ast::Expr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected token {} at position {pos}", describe(.found))]
    UnexpectedToken { found: Option<char>, pos: usize },

    #[error("expected ')', but found {} at position {pos}", describe(.found))]
    MissingCloseParen { found: Option<char>, pos: usize },

    #[error("integer literal at position {pos} is too large")]
    LiteralOverflow { pos: usize },

    #[error("unexpected trailing input '{found}' at position {pos}")]
    TrailingInput { found: char, pos: usize },
}

fn describe(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("'{c}'"),
        None => "end of input".to_string(),
    }
}

pub struct Parser<'a> {
    cursor: &'a mut Cursor,
}

impl<'a> Parser<'a> {
    pub fn new(cursor: &'a mut Cursor) -> Self {
        Parser { cursor }
    }

    fn peek_token(&mut self) -> Option<char> {
        self.cursor.peek_token()
    }

    fn skip_token(&mut self) -> Option<char> {
        self.cursor.skip_whitespaces();
        self.cursor.skip()
    }

    fn pos(&self) -> usize {
        self.cursor.pos()
    }
}

/// Parse one expression starting at the cursor.
///
/// On success the cursor is left just past the last consumed token and any
/// remaining input is not looked at beyond the first character.
pub fn parse_expression(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    Parser::new(cursor).parse_expr()
}

/// Parse a whole source string. Anything after the expression other than
/// whitespace is rejected.
#[tracing::instrument(level = "debug", err)]
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let mut cursor = Cursor::new(source);
    let expr = parse_expression(&mut cursor)?;
    if let Some(found) = cursor.peek_token() {
        return Err(ParseError::TrailingInput {
            found,
            pos: cursor.pos(),
        });
    }
    debug!("parsed `{expr}`");
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, ExprKind};
    use insta::assert_snapshot;
    use rstest::rstest;

    fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(op, lhs, rhs)
    }

    #[test]
    fn test_left_associative() {
        let e = parse("1-2-3").unwrap();
        assert_eq!(
            e,
            bin(
                BinOp::Sub,
                bin(BinOp::Sub, Expr::val(1), Expr::val(2)),
                Expr::val(3)
            )
        );
    }

    #[test]
    fn test_precedence() {
        let e = parse("2+3*4").unwrap();
        assert_eq!(
            e,
            bin(
                BinOp::Add,
                Expr::val(2),
                bin(BinOp::Mul, Expr::val(3), Expr::val(4))
            )
        );
    }

    #[test]
    fn test_grouping() {
        let e = parse("(2+3)*4").unwrap();
        assert_eq!(
            e,
            bin(
                BinOp::Mul,
                bin(BinOp::Add, Expr::val(2), Expr::val(3)),
                Expr::val(4)
            )
        );
    }

    #[test]
    fn test_var_markers_are_equivalent() {
        let e = parse("_0+#0+$0").unwrap();
        assert_eq!(
            e,
            bin(
                BinOp::Add,
                bin(BinOp::Add, Expr::var(0), Expr::var(0)),
                Expr::var(0)
            )
        );
    }

    #[test]
    fn test_negative_literal() {
        assert_eq!(parse("-5").unwrap().kind, ExprKind::Val(-5));
        assert_eq!(
            parse("1--5").unwrap(),
            bin(BinOp::Sub, Expr::val(1), Expr::val(-5))
        );
    }

    #[rstest]
    #[case("  ( _1 *  -3 ) ", "(_1 * -3)")]
    #[case("8/4/2", "((8 / 4) / 2)")]
    #[case("1 - 2 * _3 + $2 / #10", "((1 - (2 * _3)) + (_2 / _10))")]
    #[case("((((7))))", "7")]
    #[case("- 5 * _ 2", "(-5 * _2)")]
    #[case("007", "7")]
    #[case("1 2", "12")]
    #[case("1+2 3*4", "(1 + (23 * 4))")]
    #[case("_1 0 - - 4 2", "(_10 - -42)")]
    fn test_shapes(#[case] src: &str, #[case] expected: &str) {
        assert_eq!(parse(src).unwrap().to_string(), expected);
    }

    #[test]
    fn test_snapshot_mixed() {
        let e = parse("(_0 + 3) * (_1 - -2) / 4").unwrap();
        assert_snapshot!(e.to_string(), @"(((_0 + 3) * (_1 - -2)) / 4)");
    }

    #[test]
    fn test_literal_bounds() {
        assert_eq!(
            parse("9223372036854775807").unwrap().kind,
            ExprKind::Val(i64::MAX)
        );
        assert_eq!(
            parse("-9223372036854775808").unwrap().kind,
            ExprKind::Val(i64::MIN)
        );
    }

    #[rstest]
    #[case("(1+2", ParseError::MissingCloseParen { found: None, pos: 4 })]
    #[case("(1+2]", ParseError::MissingCloseParen { found: Some(']'), pos: 4 })]
    #[case("@", ParseError::UnexpectedToken { found: Some('@'), pos: 0 })]
    #[case("", ParseError::UnexpectedToken { found: None, pos: 0 })]
    #[case("1+", ParseError::UnexpectedToken { found: None, pos: 2 })]
    #[case("1 *  x", ParseError::UnexpectedToken { found: Some('x'), pos: 5 })]
    #[case("-(1)", ParseError::UnexpectedToken { found: Some('('), pos: 1 })]
    #[case("_x", ParseError::UnexpectedToken { found: Some('x'), pos: 1 })]
    #[case("9223372036854775808", ParseError::LiteralOverflow { pos: 0 })]
    #[case("-9223372036854775809", ParseError::LiteralOverflow { pos: 1 })]
    #[case("_99999999999999999999", ParseError::LiteralOverflow { pos: 1 })]
    #[case("12 )", ParseError::TrailingInput { found: ')', pos: 3 })]
    #[case("(1))", ParseError::TrailingInput { found: ')', pos: 3 })]
    fn test_errors(#[case] src: &str, #[case] expected: ParseError) {
        assert_eq!(parse(src), Err(expected));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            parse("@").unwrap_err().to_string(),
            "unexpected token '@' at position 0"
        );
        assert_eq!(
            parse("(1+2").unwrap_err().to_string(),
            "expected ')', but found end of input at position 4"
        );
        assert_eq!(
            parse("12 )").unwrap_err().to_string(),
            "unexpected trailing input ')' at position 3"
        );
    }

    #[test]
    fn test_cursor_stops_after_last_token() {
        let mut cursor = Cursor::new("1 + 2 ) 3");
        let e = parse_expression(&mut cursor).unwrap();
        assert_eq!(e.to_string(), "(1 + 2)");
        assert_eq!(cursor.pos(), 6);
        assert_eq!(cursor.peek_input(), Some(')'));
    }

    #[test]
    fn test_reparse_remainder() {
        let mut cursor = Cursor::new("(1+2) (3*4)");
        let first = parse_expression(&mut cursor).unwrap();
        assert_eq!(cursor.pos(), 6);
        let second = parse_expression(&mut cursor).unwrap();
        assert_eq!(first.to_string(), "(1 + 2)");
        assert_eq!(second.to_string(), "(3 * 4)");
        assert_eq!(cursor.peek_input(), None);
    }
}
