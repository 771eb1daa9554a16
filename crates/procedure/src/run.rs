use std::any::type_name;

use crate::arch::Architecture;
use crate::state::SymbolicState;

/// Errors raised while running an execution unit. These indicate missing registry entries or
/// incomplete hooks and abort exploration of the offending state.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error occurred while accessing the symbolic state
    #[error(transparent)]
    State(#[from] crate::state::Error),

    #[error("unsupported calling convention {convention} for arguments on {architecture}")]
    UnsupportedArgumentConvention {
        convention: String,
        architecture: Architecture,
    },

    #[error("unsupported calling convention {convention} for returns on {architecture}")]
    UnsupportedReturnConvention {
        convention: String,
        architecture: Architecture,
    },

    #[error("unsupported platform {architecture} for return emulation")]
    UnsupportedReturnPlatform { architecture: Architecture },

    /// The behavior of the unit was never defined
    #[error("{unit} does not implement its behavior")]
    Unimplemented { unit: &'static str },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Control flow of a state after a unit has executed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlFlow<V> {
    /// No control transfer was performed. Execution continues after the unit.
    NextInstruction,

    /// Control returns to the target
    Return { target: V },

    /// Execution of the state has ended
    Halt,
}

/// A state forked off the bound state by a unit
#[derive(Debug)]
pub struct Successor<S: SymbolicState> {
    pub state: S,
    pub flow: ControlFlow<S::Value>,
}

/// Result of executing a unit. The bound state is updated in place. Any states forked from it
/// are owned by the successors.
#[derive(Debug)]
pub struct Successors<S: SymbolicState> {
    pub flow: ControlFlow<S::Value>,
    pub forks: Vec<Successor<S>>,
}

impl<S: SymbolicState> Successors<S> {
    pub fn new(flow: ControlFlow<S::Value>) -> Self {
        Self {
            flow,
            forks: Vec::new(),
        }
    }

    /// Number of successor states, including the bound state
    pub fn len(&self) -> usize {
        1 + self.forks.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_branching(&self) -> bool {
        !self.forks.is_empty()
    }
}

/// Anything the exploration engine can run against a symbolic state, whether lifted code or a
/// hooked procedure.
pub trait ExecutionUnit {
    type State: SymbolicState;

    /// Name of the concrete unit
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Prepare bookkeeping prior to execution
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Apply the effect of the unit to the bound state.
    fn execute(&mut self) -> Result<Successors<Self::State>> {
        Err(Error::Unimplemented { unit: self.name() })
    }
}
