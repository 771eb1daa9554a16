use std::collections::BTreeMap;

use symbolic_procedure::arch::{Architecture, Register};
use symbolic_procedure::convention::{ConventionRegistry, ReturnSequence};
use symbolic_procedure::hook::HookTable;
use symbolic_procedure::ids::IdSource;
use symbolic_procedure::mem::MemoryState;
use symbolic_procedure::run::{ControlFlow, Error, ExecutionUnit, Result, Successors};
use symbolic_procedure::state::SymbolicState;
use symbolic_procedure::value::{Expression, SymbolicValue};

pub type State = MemoryState<SymbolicValue>;

pub const STACK_POINTER: u64 = 0x7fff0000;

/// Operations of a lifted basic block
#[derive(Clone, Debug)]
pub enum Op {
    /// Write a constant to a register
    Write(Register, u64),

    /// Push a constant onto the stack
    Push(u64),

    /// Call the target, returning to the address
    Call { target: u64, return_address: u64 },

    Jump(u64),
    Halt,
}

/// Stand-in for a lifted basic block. Execution continues at the instruction pointer unless
/// the block halts.
pub struct Block<'a> {
    state: &'a mut State,
    ops: &'a [Op],
    registry: &'a ConventionRegistry,
}

impl<'a> Block<'a> {
    pub fn new(state: &'a mut State, ops: &'a [Op], registry: &'a ConventionRegistry) -> Self {
        Self {
            state,
            ops,
            registry,
        }
    }

    fn jump(&mut self, target: u64) -> Result<()> {
        let ip = self.state.architecture().instruction_pointer();
        self.state
            .write_register(&ip, SymbolicValue::constant(target, ip.bits()))?;
        Ok(())
    }
}

impl ExecutionUnit for Block<'_> {
    type State = State;

    fn execute(&mut self) -> Result<Successors<State>> {
        let arch = self.state.architecture();
        for op in self.ops {
            match *op {
                Op::Write(register, value) => self
                    .state
                    .write_register(&register, SymbolicValue::constant(value, register.bits()))?,
                Op::Push(value) => self
                    .state
                    .push_stack(SymbolicValue::constant(value, arch.bits()))?,
                Op::Call {
                    target,
                    return_address,
                } => {
                    let return_address = SymbolicValue::constant(return_address, arch.bits());
                    match self.registry.return_sequence(arch) {
                        Some(ReturnSequence::LinkRegister(register)) => {
                            self.state.write_register(register, return_address)?
                        }
                        _ => self.state.push_stack(return_address)?,
                    }
                    self.jump(target)?;
                }
                Op::Jump(target) => self.jump(target)?,
                Op::Halt => return Ok(Successors::new(ControlFlow::Halt)),
            }
        }

        Ok(Successors::new(ControlFlow::NextInstruction))
    }
}

/// Runs blocks and hooked procedures against a single state until it halts
pub struct Explorer {
    pub program: BTreeMap<u64, Vec<Op>>,
    pub hooks: HookTable<State>,
    pub registry: ConventionRegistry,
    pub ids: IdSource,
}

impl Explorer {
    pub fn new() -> Self {
        Self {
            program: Default::default(),
            hooks: HookTable::new(),
            registry: ConventionRegistry::default(),
            ids: IdSource::new(),
        }
    }

    pub fn add_block(&mut self, address: u64, ops: impl Into<Vec<Op>>) {
        self.program.insert(address, ops.into());
    }

    /// Explore from the entry address. Returns the addresses executed in order.
    pub fn run(&mut self, state: &mut State, entry: u64, max_steps: usize) -> Result<Vec<u64>> {
        let mut trace = Vec::new();
        let mut addr_from = None;
        let mut address = entry;

        for _ in 0..max_steps {
            trace.push(address);
            let successors = if self.hooks.is_hooked(address) {
                let mut procedure = self
                    .hooks
                    .instantiate(address, addr_from, state, &self.registry, &mut self.ids)?
                    .ok_or_else(|| Error::InternalError(format!("lost hook at {address:#x}")))?;
                step(&mut procedure)?
            } else {
                let ops = self
                    .program
                    .get(&address)
                    .ok_or_else(|| Error::InvalidArgument(format!("no code at {address:#x}")))?;
                step(&mut Block::new(state, ops, &self.registry))?
            };

            let target = match successors.flow {
                ControlFlow::Halt => return Ok(trace),
                ControlFlow::Return { target } => target,
                ControlFlow::NextInstruction => state
                    .read_register(&state.architecture().instruction_pointer())?,
            };

            addr_from = Some(address);
            address = target
                .as_u64()
                .ok_or_else(|| Error::InternalError(format!("symbolic target {target}")))?;

            // Keep the instruction pointer in sync with returns
            let ip = state.architecture().instruction_pointer();
            state.write_register(&ip, SymbolicValue::constant(address, ip.bits()))?;
        }

        Err(Error::InternalError(format!(
            "state did not halt within {max_steps} steps"
        )))
    }
}

/// Run a unit through its lifecycle
pub fn step(unit: &mut dyn ExecutionUnit<State = State>) -> Result<Successors<State>> {
    unit.initialize()?;
    unit.execute()
}

/// State with a concrete stack pointer and the instruction pointer at the entry address
pub fn state(arch: Architecture, entry: u64) -> State {
    let mut state = State::with_stack_pointer(arch, STACK_POINTER);
    let ip = arch.instruction_pointer();
    state
        .write_register(&ip, SymbolicValue::constant(entry, ip.bits()))
        .expect("failed to write instruction pointer");
    state
}
