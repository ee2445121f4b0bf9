use super::{Backend, BackendError, Function, Inst, Value};
use crate::ast::BinOp;
use tracing::{debug, trace};

/// Handle to a function declared on a [`Machine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuncId(usize);

/// Register machine: records instructions per function and interprets them.
#[derive(Debug, Default)]
pub struct Machine {
    functions: Vec<Function>,
    current: Option<usize>,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_function(&self, id: FuncId) -> Result<&Function, BackendError> {
        self.functions
            .get(id.0)
            .ok_or_else(|| BackendError::UnknownFunction(format!("#{}", id.0)))
    }

    fn current_function_mut(&mut self) -> Result<&mut Function, BackendError> {
        let id = self.current.ok_or(BackendError::NoFunction)?;
        let func = &mut self.functions[id];
        if func.is_sealed() {
            return Err(BackendError::FunctionSealed(func.name.clone()));
        }
        Ok(func)
    }
}

/// Registers are numbered per function, so a register from another function
/// would index outside this one's register file.
fn check_value(func: &Function, v: &Value) -> Result<(), BackendError> {
    match v {
        Value::Reg(reg) if reg.index() >= func.num_regs() => Err(BackendError::ForeignValue(
            v.to_string(),
            func.name.clone(),
        )),
        _ => Ok(()),
    }
}

fn apply(op: BinOp, l: i64, r: i64) -> Result<i64, BackendError> {
    match op {
        BinOp::Add => Ok(l.wrapping_add(r)),
        BinOp::Sub => Ok(l.wrapping_sub(r)),
        BinOp::Mul => Ok(l.wrapping_mul(r)),
        BinOp::Div => {
            if r == 0 {
                return Err(BackendError::DivisionByZero);
            }
            // i64::MIN / -1
            l.checked_div(r).ok_or(BackendError::Overflow(op.mnemonic()))
        }
    }
}

fn exec(func: &Function, args: &[i64]) -> Result<i64, BackendError> {
    let mut regs = vec![0i64; func.num_regs()];
    let eval = |regs: &[i64], v: &Value| match v {
        Value::Reg(reg) => regs[reg.index()],
        Value::Imm(n) => *n,
    };

    for inst in &func.insts {
        trace!("exec `{inst}`");
        match inst {
            Inst::Param { dst, index } => {
                regs[dst.index()] = *args
                    .get(*index)
                    .ok_or(BackendError::MissingArgument(*index))?;
            }
            Inst::Binary { op, dst, lhs, rhs } => {
                let l = eval(&regs, lhs);
                let r = eval(&regs, rhs);
                regs[dst.index()] = apply(*op, l, r)?;
            }
            Inst::Ret(v) => return Ok(eval(&regs, v)),
        }
    }
    Err(BackendError::MissingReturn(func.name.clone()))
}

impl Backend for Machine {
    type Value = Value;
    type Func = FuncId;

    fn declare_function(
        &mut self,
        name: &str,
        param_count: usize,
    ) -> Result<(FuncId, Vec<Value>), BackendError> {
        let mut func = Function::new(name, param_count);
        let params = (0..param_count)
            .map(|index| {
                let dst = func.get_fresh_reg();
                func.insts.push(Inst::Param { dst, index });
                Value::Reg(dst)
            })
            .collect();

        let id = self.functions.len();
        self.functions.push(func);
        self.current = Some(id);
        debug!("declared `{name}` with {param_count} parameters");
        Ok((FuncId(id), params))
    }

    fn emit_constant(&mut self, n: i64) -> Result<Value, BackendError> {
        Ok(Value::Imm(n))
    }

    fn emit_binary_op(
        &mut self,
        op: BinOp,
        lhs: Value,
        rhs: Value,
    ) -> Result<Value, BackendError> {
        let func = self.current_function_mut()?;
        check_value(func, &lhs)?;
        check_value(func, &rhs)?;
        let dst = func.get_fresh_reg();
        func.insts.push(Inst::Binary { op, dst, lhs, rhs });
        Ok(Value::Reg(dst))
    }

    fn emit_return(&mut self, func: &FuncId, value: Value) -> Result<(), BackendError> {
        let f = self
            .functions
            .get_mut(func.0)
            .ok_or_else(|| BackendError::UnknownFunction(format!("#{}", func.0)))?;
        if f.is_sealed() {
            return Err(BackendError::FunctionSealed(f.name.clone()));
        }
        check_value(f, &value)?;
        f.insts.push(Inst::Ret(value));
        Ok(())
    }

    fn run(&mut self, func: &FuncId, args: &[i64]) -> Result<i64, BackendError> {
        let f = self.get_function(*func)?;
        if !f.is_sealed() {
            return Err(BackendError::MissingReturn(f.name.clone()));
        }
        debug!("running `{}` with {:?}", f.name, &args[..f.param_count.min(args.len())]);
        exec(f, args)
    }

    fn dump_ir(&self) -> String {
        self.functions.iter().map(|f| f.to_string()).collect()
    }
}
