#![warn(clippy::all, rust_2018_idioms)]

mod ast;
mod backend;
#[cfg(feature = "llvm")]
mod backend_llvm;
mod codegen;
mod driver;
mod middle;
mod parse;
mod resolve;

use clap::Parser;
use middle::{BackendKind, Ctxt};
use tracing_subscriber::EnvFilter;

/// Compile an integer expression and run it.
///
/// Variables are written `_N`, `#N` or `$N` and refer to the N-th argument.
#[derive(Debug, Parser)]
#[command(name = "calc", version, allow_negative_numbers = true)]
struct Args {
    /// Expression to evaluate, e.g. `_0 * _1 + 3`
    #[arg(allow_hyphen_values = true)]
    expr: String,

    /// Call arguments, bound to `_0`, `_1`, ... in order
    args: Vec<i64>,

    /// Execution backend
    #[arg(long, value_enum, default_value_t = BackendKind::Machine)]
    backend: BackendKind,

    /// Print the parsed expression tree to stderr
    #[arg(long)]
    dump_ast: bool,

    /// Print the generated IR to stderr before running
    #[arg(long)]
    emit_ir: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr (e.g. `RUST_LOG=debug`); stdout only carries the result.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let ctx = Ctxt::new(args.dump_ast, args.emit_ir, args.backend);

    let result = driver::eval(&ctx, &args.expr, &args.args)?;
    println!("{result}");
    Ok(())
}
