/// Which execution backend runs the compiled expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackendKind {
    /// Built-in register machine
    #[default]
    Machine,
    /// LLVM JIT, needs the `llvm` feature
    Llvm,
}

/// Options for a single parse/compile/run.
#[derive(Debug, Default)]
pub struct Ctxt {
    /// Print the parsed tree to stderr
    pub dump_enabled: bool,
    /// Print the backend IR to stderr before running
    pub emit_ir: bool,
    pub backend: BackendKind,
}

impl Ctxt {
    pub fn new(dump_enabled: bool, emit_ir: bool, backend: BackendKind) -> Self {
        Ctxt {
            dump_enabled,
            emit_ir,
            backend,
        }
    }
}
