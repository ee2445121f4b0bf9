//! LLVM JIT backend.
//!
//! The compiled function has the signature `i64 calc(i64* args)`. Every
//! declared parameter is loaded from `args` in the entry block, so the body
//! only ever sees plain `i64` values.

use crate::ast::BinOp;
use crate::backend::{Backend, BackendError};
use inkwell::builder::{Builder, BuilderError};
use inkwell::context::Context;
use inkwell::execution_engine::{ExecutionEngine, JitFunction};
use inkwell::module::Module;
use inkwell::targets::{InitializationConfig, Target};
use inkwell::values::{FunctionValue, IntValue};
use inkwell::{AddressSpace, OptimizationLevel};
use tracing::debug;

type CalcFunc = unsafe extern "C" fn(*const i64) -> i64;

fn llvm_err(e: BuilderError) -> BackendError {
    BackendError::Llvm(e.to_string())
}

pub struct LlvmBackend<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    // created on the first run, once the module is complete
    engine: Option<ExecutionEngine<'ctx>>,
}

impl<'ctx> LlvmBackend<'ctx> {
    /// Initialize the native target and create an empty module.
    pub fn new(context: &'ctx Context, module_name: &str) -> Result<Self, BackendError> {
        Target::initialize_native(&InitializationConfig::default()).map_err(BackendError::Llvm)?;
        Ok(LlvmBackend {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            engine: None,
        })
    }
}

impl<'ctx> Backend for LlvmBackend<'ctx> {
    type Value = IntValue<'ctx>;
    type Func = FunctionValue<'ctx>;

    fn declare_function(
        &mut self,
        name: &str,
        param_count: usize,
    ) -> Result<(Self::Func, Vec<Self::Value>), BackendError> {
        let i64_type = self.context.i64_type();
        let args_type = i64_type.ptr_type(AddressSpace::default());
        let fn_type = i64_type.fn_type(&[args_type.into()], false);
        let function = self.module.add_function(name, fn_type, None);
        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        let args = function
            .get_first_param()
            .ok_or_else(|| BackendError::Llvm(format!("`{name}` has no argument pointer")))?
            .into_pointer_value();

        let mut params = Vec::with_capacity(param_count);
        for i in 0..param_count {
            let index = i64_type.const_int(i as u64, false);
            let ptr = unsafe {
                self.builder
                    .build_in_bounds_gep(i64_type, args, &[index], "aptr")
                    .map_err(llvm_err)?
            };
            let value = self
                .builder
                .build_load(i64_type, ptr, "a")
                .map_err(llvm_err)?
                .into_int_value();
            params.push(value);
        }
        debug!("declared `{name}` with {param_count} parameters");
        Ok((function, params))
    }

    fn emit_constant(&mut self, n: i64) -> Result<Self::Value, BackendError> {
        Ok(self.context.i64_type().const_int(n as u64, true))
    }

    fn emit_binary_op(
        &mut self,
        op: BinOp,
        lhs: Self::Value,
        rhs: Self::Value,
    ) -> Result<Self::Value, BackendError> {
        let b = &self.builder;
        let v = match op {
            BinOp::Add => b.build_int_add(lhs, rhs, "add"),
            BinOp::Sub => b.build_int_sub(lhs, rhs, "sub"),
            BinOp::Mul => b.build_int_mul(lhs, rhs, "mul"),
            BinOp::Div => b.build_int_signed_div(lhs, rhs, "div"),
        };
        v.map_err(llvm_err)
    }

    fn emit_return(&mut self, func: &Self::Func, value: Self::Value) -> Result<(), BackendError> {
        self.builder
            .build_return(Some(&value))
            .map_err(llvm_err)?;
        debug!("verifying...");
        if !func.verify(true) {
            return Err(BackendError::Llvm("Error constructing function".to_string()));
        }
        Ok(())
    }

    fn run(&mut self, func: &Self::Func, args: &[i64]) -> Result<i64, BackendError> {
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => self
                .module
                .create_jit_execution_engine(OptimizationLevel::None)
                .map_err(|e| BackendError::Llvm(e.to_string()))?,
        };
        let engine = self.engine.insert(engine);

        let name = func.get_name().to_string_lossy();
        let calc: JitFunction<'ctx, CalcFunc> = unsafe { engine.get_function(&name) }
            .map_err(|e| BackendError::Llvm(e.to_string()))?;
        debug!("starting `{name}` with JIT");
        Ok(unsafe { calc.call(args.as_ptr()) })
    }

    fn dump_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::compile_function;
    use crate::parse::parse;

    #[test]
    fn test_jit_end_to_end() {
        let context = Context::create();
        let mut backend = LlvmBackend::new(&context, "test").unwrap();
        let compiled = compile_function("calc", &parse("_0*_1+3").unwrap(), &mut backend).unwrap();
        assert_eq!(compiled.run(&mut backend, &[4, 5]), Ok(23));
        assert!(backend.dump_ir().contains("define i64 @calc"));
    }

    #[test]
    fn test_jit_signed_division() {
        let context = Context::create();
        let mut backend = LlvmBackend::new(&context, "test").unwrap();
        let compiled = compile_function("calc", &parse("(1-2-3)/-2").unwrap(), &mut backend).unwrap();
        assert_eq!(compiled.run(&mut backend, &[]), Ok(2));
    }
}
