use crate::procedure::{Procedure, ProcedureContext, Result};
use crate::state::SymbolicState;
use crate::value::Expression;

/// Returns a fresh unconstrained value. Used for functions whose result cannot be modeled.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReturnUnconstrained;

impl<S> Procedure<S> for ReturnUnconstrained
where
    S: SymbolicState,
    S::Value: Expression,
{
    fn run(&mut self, context: &mut ProcedureContext<'_, S>) -> Result<()> {
        let register = context.return_register()?;
        let name = context.ids().fresh_name("unconstrained_ret");
        context.set_return(S::Value::symbol(name, register.bits()))?;
        context.do_return()?;
        Ok(())
    }
}

/// Returns a fixed value
#[derive(Copy, Clone, Debug)]
pub struct ReturnConstant {
    pub value: u64,
}

impl ReturnConstant {
    pub fn new(value: u64) -> Self {
        Self { value }
    }
}

impl<S> Procedure<S> for ReturnConstant
where
    S: SymbolicState,
    S::Value: Expression,
{
    fn run(&mut self, context: &mut ProcedureContext<'_, S>) -> Result<()> {
        let register = context.return_register()?;
        context.set_return(S::Value::constant(self.value, register.bits()))?;
        context.do_return()?;
        Ok(())
    }
}

/// Returns without a return value
#[derive(Copy, Clone, Debug, Default)]
pub struct ReturnVoid;

impl<S: SymbolicState> Procedure<S> for ReturnVoid {
    fn run(&mut self, context: &mut ProcedureContext<'_, S>) -> Result<()> {
        context.do_return()?;
        Ok(())
    }
}

/// Returns one of its arguments. Models functions such as `memcpy` that return their
/// destination.
#[derive(Copy, Clone, Debug)]
pub struct ReturnArgument {
    pub index: usize,
}

impl ReturnArgument {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl<S: SymbolicState> Procedure<S> for ReturnArgument {
    fn run(&mut self, context: &mut ProcedureContext<'_, S>) -> Result<()> {
        let argument = context.argument(self.index)?;
        context.set_return(argument)?;
        context.do_return()?;
        Ok(())
    }
}

/// Terminates execution with the status passed as the first argument
#[derive(Clone, Debug)]
pub struct Exit<V> {
    status: Option<V>,
}

impl<V> Default for Exit<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Exit<V> {
    pub fn new() -> Self {
        Self { status: None }
    }

    /// The exit status, available once the procedure has run
    pub fn status(&self) -> Option<&V> {
        self.status.as_ref()
    }
}

impl<S, V> Procedure<S> for Exit<V>
where
    S: SymbolicState<Value = V>,
{
    fn run(&mut self, context: &mut ProcedureContext<'_, S>) -> Result<()> {
        self.status = Some(context.argument(0)?);
        context.halt();
        Ok(())
    }
}
