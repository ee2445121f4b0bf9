//! Execution backends.
//!
//! The code generator only talks to a backend through [`Backend`]: it
//! declares a function, asks for constants and binary operations, seals the
//! function with a return, and finally runs it on concrete arguments.

mod inst;
mod machine;

pub use inst::{Function, Inst, Value};
pub use machine::Machine;

use crate::ast::BinOp;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in `{0}`")]
    Overflow(&'static str),

    #[error("no function has been declared")]
    NoFunction,

    #[error("argument {0} was not supplied")]
    MissingArgument(usize),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("function `{0}` has already returned")]
    FunctionSealed(String),

    #[error("function `{0}` has no return")]
    MissingReturn(String),

    #[error("value `{0}` does not belong to function `{1}`")]
    ForeignValue(String, String),

    #[cfg(feature = "llvm")]
    #[error("llvm: {0}")]
    Llvm(String),
}

pub trait Backend {
    /// Handle to a computed 64-bit integer.
    type Value: Clone;
    /// Handle to a declared function.
    type Func;

    /// Declare a function taking `param_count` integer arguments and return
    /// one value per argument, in order. Following emissions go into it.
    fn declare_function(
        &mut self,
        name: &str,
        param_count: usize,
    ) -> Result<(Self::Func, Vec<Self::Value>), BackendError>;

    fn emit_constant(&mut self, n: i64) -> Result<Self::Value, BackendError>;

    fn emit_binary_op(
        &mut self,
        op: BinOp,
        lhs: Self::Value,
        rhs: Self::Value,
    ) -> Result<Self::Value, BackendError>;

    fn emit_return(&mut self, func: &Self::Func, value: Self::Value) -> Result<(), BackendError>;

    /// Run a returned function. `args` holds at least as many values as the
    /// function declared parameters.
    fn run(&mut self, func: &Self::Func, args: &[i64]) -> Result<i64, BackendError>;

    /// Textual IR of everything emitted so far.
    fn dump_ir(&self) -> String;
}
