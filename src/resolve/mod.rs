use crate::ast::{self, Expr, ExprKind};
use tracing::trace;

/// Minimum number of call arguments `expr` needs: one past the highest
/// variable index it references, or 0 when it references none.
pub fn count_params(expr: &Expr) -> usize {
    let mut counter = ParamCounter { count: 0 };
    ast::visitor::go(&mut counter, expr);
    counter.count
}

struct ParamCounter {
    count: usize,
}

impl<'ctx> ast::visitor::Visitor<'ctx> for ParamCounter {
    fn visit_expr(&mut self, expr: &'ctx Expr) {
        if let ExprKind::Var(index) = expr.kind {
            trace!("variable _{index}");
            self.count = self.count.max(index.saturating_add(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use rstest::rstest;

    #[rstest]
    #[case("1+2*3", 0)]
    #[case("-5", 0)]
    #[case("_0", 1)]
    #[case("_0+#0+$0", 1)]
    #[case("_4", 5)]
    #[case("(_2 - 1) * ($0 / #7) + _3", 8)]
    #[case("_10 * _1", 11)]
    fn test_count_params(#[case] src: &str, #[case] expected: usize) {
        assert_eq!(count_params(&parse(src).unwrap()), expected);
    }

    // Same result as the recursive definition: Val -> 0, Var(i) -> i + 1,
    // Binary -> max of both sides.
    fn count_recursive(expr: &Expr) -> usize {
        match &expr.kind {
            ExprKind::Val(_) => 0,
            ExprKind::Var(i) => i + 1,
            ExprKind::Binary(_, lhs, rhs) => count_recursive(lhs).max(count_recursive(rhs)),
        }
    }

    #[test]
    fn test_matches_recursive_definition() {
        for src in ["_3 + (_1 * (2 - _9)) / _0", "((_5))", "4 - 4", "$2 - #2 * _1"] {
            let e = parse(src).unwrap();
            assert_eq!(count_params(&e), count_recursive(&e), "{src}");
        }
    }
}
