use std::any::type_name;

use log::{debug, trace};

use crate::arch::{Architecture, Register};
use crate::convention::{
    ArgumentLocation, ArgumentPlacement, CallingConvention, ConventionRegistry, ReturnSequence,
};
use crate::ids::IdSource;
use crate::run::{ControlFlow, ExecutionUnit, Successor, Successors};
use crate::state::SymbolicState;

pub use crate::run::{Error, Result};

/// Construction parameters of a hooked procedure, fixed once the procedure is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProcedureInfo {
    /// Address control was transferred from, if known
    pub addr_from: Option<u64>,
    pub architecture: Architecture,

    /// Resolved calling convention. `None` if no convention was requested and the architecture
    /// does not declare a default.
    pub convention: Option<CallingConvention>,
}

impl ProcedureInfo {
    fn convention_name(&self) -> String {
        self.convention
            .map(|convention| convention.to_string())
            .unwrap_or_else(|| "<unresolved>".to_owned())
    }
}

/// Summary of a function substituted for its machine code.
pub trait Procedure<S: SymbolicState> {
    /// Name of the concrete procedure
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Procedure specific setup. Called once the base procedure state has been constructed.
    fn setup(&mut self, _info: &ProcedureInfo) -> Result<()> {
        Ok(())
    }

    /// The modeled behavior of the function. Procedures that do not override this fail with
    /// [Error::Unimplemented].
    fn run(&mut self, _context: &mut ProcedureContext<'_, S>) -> Result<()> {
        Err(Error::Unimplemented { unit: self.name() })
    }
}

impl<S: SymbolicState, P: Procedure<S> + ?Sized> Procedure<S> for Box<P> {
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    fn setup(&mut self, info: &ProcedureInfo) -> Result<()> {
        self.as_mut().setup(info)
    }

    fn run(&mut self, context: &mut ProcedureContext<'_, S>) -> Result<()> {
        self.as_mut().run(context)
    }
}

/// Access to the arguments, return value and control flow of a procedure invocation.
pub struct ProcedureContext<'a, S: SymbolicState> {
    state: &'a mut S,
    registry: &'a ConventionRegistry,
    ids: &'a mut IdSource,
    info: ProcedureInfo,
    flow: ControlFlow<S::Value>,
    forks: Vec<Successor<S>>,
}

impl<'a, S: SymbolicState> ProcedureContext<'a, S> {
    fn new(
        state: &'a mut S,
        registry: &'a ConventionRegistry,
        ids: &'a mut IdSource,
        info: ProcedureInfo,
    ) -> Self {
        Self {
            state,
            registry,
            ids,
            info,
            flow: ControlFlow::NextInstruction,
            forks: Vec::new(),
        }
    }

    pub fn state(&self) -> &S {
        &*self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut *self.state
    }

    pub fn info(&self) -> &ProcedureInfo {
        &self.info
    }

    pub fn addr_from(&self) -> Option<u64> {
        self.info.addr_from
    }

    pub fn architecture(&self) -> Architecture {
        self.info.architecture
    }

    pub fn convention(&self) -> Option<CallingConvention> {
        self.info.convention
    }

    pub fn ids(&mut self) -> &mut IdSource {
        &mut *self.ids
    }

    /// Control flow recorded so far for the bound state
    pub fn flow(&self) -> &ControlFlow<S::Value> {
        &self.flow
    }

    /// Argument placement of the resolved convention on the current architecture
    pub fn placement(&self) -> Result<&'a ArgumentPlacement> {
        let registry = self.registry;
        self.info
            .convention
            .and_then(|convention| registry.placement(self.info.architecture, convention))
            .ok_or_else(|| Error::UnsupportedArgumentConvention {
                convention: self.info.convention_name(),
                architecture: self.info.architecture,
            })
    }

    /// Read the argument at the given index. Does not modify the state.
    pub fn argument(&self, index: usize) -> Result<S::Value> {
        let location = self.placement()?.location(index).ok_or_else(|| {
            Error::InvalidArgument(format!("stack offset of argument {index} overflows"))
        })?;

        match location {
            ArgumentLocation::Register(register) => {
                trace!("argument {index} read from register {register}");
                Ok(self.state.read_register(&register)?)
            }
            ArgumentLocation::Stack(offset) => {
                trace!("argument {index} read from stack offset {offset}");
                Ok(self.state.read_stack(offset)?)
            }
        }
    }

    /// Read the first `count` arguments
    pub fn arguments(&self, count: usize) -> Result<Vec<S::Value>> {
        (0..count).map(|index| self.argument(index)).collect()
    }

    /// The register receiving return values on the current architecture
    pub fn return_register(&self) -> Result<Register> {
        self.registry
            .return_value(self.info.architecture)
            .map(|return_value| return_value.register)
            .ok_or_else(|| Error::UnsupportedReturnConvention {
                convention: self.info.convention_name(),
                architecture: self.info.architecture,
            })
    }

    /// Bind the return value of the procedure
    pub fn set_return(&mut self, expr: S::Value) -> Result<()> {
        let register = self.return_register()?;
        trace!("return value {expr:?} written to {register}");
        self.state.write_register(&register, expr)?;
        Ok(())
    }

    /// Return to the caller. The return target is recorded as the control flow of the bound
    /// state and returned.
    pub fn do_return(&mut self) -> Result<S::Value> {
        let architecture = self.info.architecture;
        let sequence = self
            .registry
            .return_sequence(architecture)
            .ok_or(Error::UnsupportedReturnPlatform { architecture })?;

        let target = match sequence {
            ReturnSequence::PopStack => self.state.pop_stack()?,
            ReturnSequence::LinkRegister(register) => self.state.read_register(register)?,
        };

        trace!("returning to {target:?}");
        self.flow = ControlFlow::Return {
            target: target.clone(),
        };
        Ok(target)
    }

    /// End execution of the bound state
    pub fn halt(&mut self) {
        self.flow = ControlFlow::Halt;
    }

    /// Fork the bound state. The closure runs against a copy of the state, using the same
    /// convention. The copy is exposed as an additional successor.
    pub fn fork<F>(&mut self, f: F) -> Result<()>
    where
        S: Clone,
        F: FnOnce(&mut ProcedureContext<'_, S>) -> Result<()>,
    {
        let mut state = self.state.clone();
        let mut context =
            ProcedureContext::new(&mut state, self.registry, &mut *self.ids, self.info);
        f(&mut context)?;

        let (flow, forks) = (context.flow, context.forks);
        self.forks.push(Successor { state, flow });
        self.forks.extend(forks);
        Ok(())
    }

    fn finish(self) -> Successors<S> {
        Successors {
            flow: self.flow,
            forks: self.forks,
        }
    }
}

/// Factory for [HookedProcedure]. The base procedure state is constructed and the convention
/// resolved before the procedure's own [Procedure::setup] runs.
#[derive(Clone, Debug)]
pub struct ProcedureBuilder<P> {
    procedure: P,
    addr_from: Option<u64>,
    convention: Option<CallingConvention>,
}

impl<P> ProcedureBuilder<P> {
    pub fn new(procedure: P) -> Self {
        Self {
            procedure,
            addr_from: None,
            convention: None,
        }
    }

    pub fn addr_from(mut self, address: u64) -> Self {
        self.addr_from = Some(address);
        self
    }

    /// Use the convention instead of the architecture default
    pub fn convention(mut self, convention: CallingConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    pub(crate) fn with_options(
        mut self,
        addr_from: Option<u64>,
        convention: Option<CallingConvention>,
    ) -> Self {
        self.addr_from = addr_from;
        self.convention = convention;
        self
    }

    pub fn build<'a, S>(
        self,
        state: &'a mut S,
        registry: &'a ConventionRegistry,
        ids: &'a mut IdSource,
    ) -> Result<HookedProcedure<'a, S, P>>
    where
        S: SymbolicState,
        P: Procedure<S>,
    {
        let architecture = state.architecture();
        let info = ProcedureInfo {
            addr_from: self.addr_from,
            architecture,
            convention: registry.resolve(architecture, self.convention),
        };

        let mut procedure = self.procedure;
        debug!(
            "constructing {name} on {architecture} with convention {convention}",
            name = procedure.name(),
            convention = info.convention_name()
        );
        procedure.setup(&info)?;

        Ok(HookedProcedure {
            state,
            registry,
            ids,
            info,
            procedure,
        })
    }
}

/// An execution unit running a [Procedure] against a borrowed state instead of interpreting
/// the machine code at an address.
pub struct HookedProcedure<'a, S: SymbolicState, P> {
    state: &'a mut S,
    registry: &'a ConventionRegistry,
    ids: &'a mut IdSource,
    info: ProcedureInfo,
    procedure: P,
}

impl<'a, S: SymbolicState, P: Procedure<S>> HookedProcedure<'a, S, P> {
    pub fn info(&self) -> &ProcedureInfo {
        &self.info
    }

    pub fn addr_from(&self) -> Option<u64> {
        self.info.addr_from
    }

    pub fn architecture(&self) -> Architecture {
        self.info.architecture
    }

    pub fn convention(&self) -> Option<CallingConvention> {
        self.info.convention
    }

    pub fn procedure(&self) -> &P {
        &self.procedure
    }

    pub fn state(&self) -> &S {
        &*self.state
    }
}

impl<S: SymbolicState, P: Procedure<S>> ExecutionUnit for HookedProcedure<'_, S, P> {
    type State = S;

    fn name(&self) -> &'static str {
        self.procedure.name()
    }

    fn execute(&mut self) -> Result<Successors<S>> {
        let mut context =
            ProcedureContext::new(&mut *self.state, self.registry, &mut *self.ids, self.info);
        self.procedure.run(&mut context)?;

        let successors = context.finish();
        debug!(
            "{name} finished with {flow:?} and {forks} fork(s)",
            name = self.procedure.name(),
            flow = successors.flow,
            forks = successors.forks.len()
        );
        Ok(successors)
    }
}
