use super::*;

/// Read-only traversal over an expression tree.
///
/// `visit_expr` is called before the children of a node are walked and
/// `visit_expr_post` after them. Left children are always walked first.
pub trait Visitor<'ctx> {
    fn visit_expr(&mut self, _expr: &'ctx Expr) {}
    fn visit_expr_post(&mut self, _expr: &'ctx Expr) {}
}

pub fn go<'ctx, V: Visitor<'ctx>>(v: &mut V, expr: &'ctx Expr) {
    walk_expr(v, expr);
}

fn walk_expr<'ctx, V: Visitor<'ctx>>(v: &mut V, expr: &'ctx Expr) {
    v.visit_expr(expr);
    match &expr.kind {
        ExprKind::Val(_) | ExprKind::Var(_) => (),
        ExprKind::Binary(_op, lhs, rhs) => {
            walk_expr(v, lhs);
            walk_expr(v, rhs);
        }
    }
    v.visit_expr_post(expr);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Order(Vec<String>);

    impl<'ctx> Visitor<'ctx> for Order {
        fn visit_expr_post(&mut self, expr: &'ctx Expr) {
            self.0.push(expr.to_string());
        }
    }

    #[test]
    fn test_post_order_left_first() {
        let e = Expr::binary(BinOp::Sub, Expr::val(1), Expr::var(0));
        let mut order = Order(vec![]);
        go(&mut order, &e);
        assert_eq!(order.0, vec!["1", "_0", "(1 - _0)"]);
    }
}
