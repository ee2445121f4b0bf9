use crate::ast::Expr;
use crate::backend::{Backend, Machine};
use crate::codegen::{compile_function, CodegenError};
use crate::middle::{BackendKind, Ctxt};
use crate::parse::{parse, ParseError};
use thiserror::Error;
use tracing::info;

/// Name of the function every expression is compiled into.
pub const ENTRY_NAME: &str = "calc";

#[derive(Debug, Error)]
pub enum Error {
    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("backend `{0}` is not available in this build")]
    BackendUnavailable(&'static str),
}

/// Parse `source`, compile it on the backend selected in `ctx` and run it
/// with `args`.
pub fn eval(ctx: &Ctxt, source: &str, args: &[i64]) -> Result<i64, Error> {
    let expr = parse(source)?;
    if ctx.dump_enabled {
        eprintln!("{expr}");
    }

    match ctx.backend {
        BackendKind::Machine => run_on(ctx, &expr, args, &mut Machine::new()),
        BackendKind::Llvm => eval_llvm(ctx, &expr, args),
    }
}

fn run_on<B: Backend>(
    ctx: &Ctxt,
    expr: &Expr,
    args: &[i64],
    backend: &mut B,
) -> Result<i64, Error> {
    let compiled = compile_function(ENTRY_NAME, expr, backend)?;
    if ctx.emit_ir {
        eprint!("{}", backend.dump_ir());
    }
    let result = compiled.run(backend, args)?;
    info!(result, "finished `{ENTRY_NAME}`");
    Ok(result)
}

#[cfg(feature = "llvm")]
fn eval_llvm(ctx: &Ctxt, expr: &Expr, args: &[i64]) -> Result<i64, Error> {
    let context = inkwell::context::Context::create();
    let mut backend = crate::backend_llvm::LlvmBackend::new(&context, "calc")
        .map_err(CodegenError::from)?;
    run_on(ctx, expr, args, &mut backend)
}

#[cfg(not(feature = "llvm"))]
fn eval_llvm(_ctx: &Ctxt, _expr: &Expr, _args: &[i64]) -> Result<i64, Error> {
    Err(Error::BackendUnavailable("llvm"))
}
