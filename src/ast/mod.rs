use std::fmt;

pub mod visitor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// Integer literal, possibly negative
    Val(i64),
    /// Zero-based index into the call arguments
    Var(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// Signed division
    Div,
}

impl Expr {
    pub fn val(n: i64) -> Self {
        Expr {
            kind: ExprKind::Val(n),
        }
    }

    pub fn var(index: usize) -> Self {
        Expr {
            kind: ExprKind::Var(index),
        }
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr {
            kind: ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)),
        }
    }
}

impl BinOp {
    pub fn symbol(&self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }

    /// Mnemonic used in textual IR dumps.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "sdiv",
        }
    }
}

// Fully parenthesized so that the tree shape is visible.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            ExprKind::Val(n) => write!(f, "{n}"),
            ExprKind::Var(i) => write!(f, "_{i}"),
        }
    }
}
