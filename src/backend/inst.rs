use crate::ast::BinOp;
use std::fmt;

/// Virtual register, numbered per function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg(u32);

impl Reg {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Reg(Reg),
    /// Constants are immediates and never occupy a register
    Imm(i64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Reg(reg) => write!(f, "{reg}"),
            Value::Imm(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    /// Load call argument `index`
    Param { dst: Reg, index: usize },
    Binary {
        op: BinOp,
        dst: Reg,
        lhs: Value,
        rhs: Value,
    },
    Ret(Value),
}

#[derive(Debug)]
pub struct Function {
    pub name: String,
    pub param_count: usize,
    pub insts: Vec<Inst>,
    next_reg: u32,
}

impl Function {
    pub fn new(name: &str, param_count: usize) -> Self {
        Function {
            name: name.to_string(),
            param_count,
            insts: vec![],
            next_reg: 0,
        }
    }

    pub fn get_fresh_reg(&mut self) -> Reg {
        let reg = Reg(self.next_reg);
        self.next_reg += 1;
        reg
    }

    pub fn num_regs(&self) -> usize {
        self.next_reg as usize
    }

    /// A function is sealed once it has returned; nothing may follow `ret`.
    pub fn is_sealed(&self) -> bool {
        matches!(self.insts.last(), Some(Inst::Ret(_)))
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Param { dst, index } => write!(f, "{dst} = load i64, %args[{index}]"),
            Inst::Binary { op, dst, lhs, rhs } => {
                write!(f, "{dst} = {} i64 {lhs}, {rhs}", op.mnemonic())
            }
            Inst::Ret(v) => write!(f, "ret i64 {v}"),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "define i64 @{}(i64* %args) {{", self.name)?;
        writeln!(f, "entry:")?;
        for inst in &self.insts {
            writeln!(f, "  {inst}")?;
        }
        writeln!(f, "}}")
    }
}
