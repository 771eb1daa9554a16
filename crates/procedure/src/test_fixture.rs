use crate::arch::Architecture;
use crate::convention::{CallingConvention, ConventionRegistry, ReturnSequence};
use crate::ids::IdSource;
use crate::mem::MemoryState;
use crate::procedure::{Procedure, ProcedureBuilder, ProcedureContext, Result};
use crate::run::{ExecutionUnit, Successors};
use crate::state::SymbolicState;
use crate::value::{Expression, SymbolicValue};

pub type State = MemoryState<SymbolicValue>;

pub const STACK_POINTER: u64 = 0x7fff0000;
pub const RETURN_ADDRESS: u64 = 0x40102030;

/// Number of initialized stack slots at and above the stack pointer
const STACK_SLOTS: i64 = 16;

/// Name of the symbol stored in the stack slot at the offset
pub fn stack_name(offset: i64) -> String {
    format!("stack[{offset}]")
}

/// State where every register but the stack pointer holds a symbol named after the register.
/// The slots at and above the stack pointer hold symbols named by [stack_name].
pub fn state(arch: Architecture) -> State {
    let mut state = MemoryState::with_stack_pointer(arch, STACK_POINTER);
    for register in arch.registers() {
        if *register != arch.stack_pointer() {
            state
                .write_register(register, SymbolicValue::symbol(register.name, register.bits()))
                .expect("failed to write register");
        }
    }

    let slot_size = i64::try_from(arch.pointer_size()).unwrap();
    for slot in 0..STACK_SLOTS {
        let offset = -slot * slot_size;
        state
            .write_stack(offset, SymbolicValue::symbol(stack_name(offset), arch.bits()))
            .expect("failed to write stack");
    }

    state
}

/// Same as [state] but the return address is stored where the architecture expects it
pub fn call_state(arch: Architecture) -> State {
    let mut state = state(arch);
    let return_address = SymbolicValue::constant(RETURN_ADDRESS, arch.bits());
    match ConventionRegistry::default().return_sequence(arch) {
        Some(ReturnSequence::LinkRegister(register)) => {
            state.write_register(register, return_address)
        }
        _ => state.write_stack(0, return_address),
    }
    .expect("failed to write return address");

    state
}

pub fn symbol(name: impl Into<String>, bits: u32) -> SymbolicValue {
    SymbolicValue::symbol(name, bits)
}

/// Procedure running the given closure
pub struct FnProcedure<F>(pub F);

impl<S, F> Procedure<S> for FnProcedure<F>
where
    S: SymbolicState,
    F: FnMut(&mut ProcedureContext<'_, S>) -> Result<()>,
{
    fn run(&mut self, context: &mut ProcedureContext<'_, S>) -> Result<()> {
        (self.0)(context)
    }
}

pub fn from_fn<F>(f: F) -> FnProcedure<F>
where
    F: FnMut(&mut ProcedureContext<'_, State>) -> Result<()>,
{
    FnProcedure(f)
}

/// Build and execute the procedure against the state using the builtin registry
pub fn execute<P: Procedure<State>>(
    state: &mut State,
    convention: Option<CallingConvention>,
    procedure: P,
) -> Result<Successors<State>> {
    execute_with_registry(state, &ConventionRegistry::default(), convention, procedure)
}

pub fn execute_with_registry<P: Procedure<State>>(
    state: &mut State,
    registry: &ConventionRegistry,
    convention: Option<CallingConvention>,
    procedure: P,
) -> Result<Successors<State>> {
    let mut ids = IdSource::new();
    let mut builder = ProcedureBuilder::new(procedure);
    if let Some(convention) = convention {
        builder = builder.convention(convention);
    }

    let mut procedure = builder.build(state, registry, &mut ids)?;
    procedure.initialize()?;
    procedure.execute()
}
