use crate::ast::{Expr, ExprKind};
use crate::backend::{Backend, BackendError};
use crate::resolve::count_params;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("expression needs at least {expected} argument(s), but {found} were supplied")]
    InsufficientArguments { expected: usize, found: usize },

    #[error("variable _{index} is not bound (function declares {declared} parameters)")]
    UnboundParam { index: usize, declared: usize },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Emit `expr` into `emit` and return the value holding its result.
///
/// Children are compiled before their operator, left before right. `params`
/// must have at least `count_params(expr)` entries.
pub fn compile<B: Backend>(
    expr: &Expr,
    params: &[B::Value],
    emit: &mut B,
) -> Result<B::Value, CodegenError> {
    let ret = match &expr.kind {
        ExprKind::Val(n) => emit.emit_constant(*n)?,
        ExprKind::Var(index) => params
            .get(*index)
            .cloned()
            .ok_or(CodegenError::UnboundParam {
                index: *index,
                declared: params.len(),
            })?,
        ExprKind::Binary(binop, lhs, rhs) => {
            let l = compile(lhs, params, emit)?;
            let r = compile(rhs, params, emit)?;
            trace!("emit {binop:?}");
            emit.emit_binary_op(*binop, l, r)?
        }
    };
    Ok(ret)
}

/// A function compiled into a backend, together with its arity.
#[derive(Debug)]
pub struct Compiled<F> {
    pub func: F,
    pub arity: usize,
}

/// Count the parameters of `expr`, declare a function with that many on the
/// backend, compile the body and return it.
pub fn compile_function<B: Backend>(
    name: &str,
    expr: &Expr,
    emit: &mut B,
) -> Result<Compiled<B::Func>, CodegenError> {
    let arity = count_params(expr);
    debug!("`{expr}` needs {arity} arguments");

    let (func, params) = emit.declare_function(name, arity)?;
    let body = compile(expr, params.as_slice(), emit)?;
    emit.emit_return(&func, body)?;
    Ok(Compiled { func, arity })
}

impl<F> Compiled<F> {
    /// Run on the backend the function was compiled into. Fewer arguments
    /// than the arity is an error; extra arguments are ignored.
    pub fn run<B: Backend<Func = F>>(
        &self,
        backend: &mut B,
        args: &[i64],
    ) -> Result<i64, CodegenError> {
        if args.len() < self.arity {
            return Err(CodegenError::InsufficientArguments {
                expected: self.arity,
                found: args.len(),
            });
        }
        Ok(backend.run(&self.func, args)?)
    }
}
