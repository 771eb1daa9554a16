use crate::arch::{Architecture, Register};

/// State access result type
pub type Result<T> = std::result::Result<T, Error>;

/// Possible state access errors
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No value is bound to the register
    #[error("register {register} is not defined")]
    UndefinedRegister { register: Register },

    /// No value is stored in the stack slot
    #[error("stack slot at {address:#x} is not defined")]
    UndefinedStack { address: u64 },

    /// The stack pointer must be concrete to address the stack
    #[error("stack pointer is symbolic: {0}")]
    SymbolicStackPointer(String),

    /// The arguments provided for a given request are invalid
    #[error("arguments provided are not valid: {0}")]
    InvalidArguments(String),

    /// An internal error that cannot be handled
    #[error("an internal error occurred: {0}")]
    InternalError(String),
}

/// Access to the register file and stack of a symbolic state. Implemented by the symbolic
/// engine.
pub trait SymbolicState {
    type Value: Clone + std::fmt::Debug;

    /// The architecture of the program being executed
    fn architecture(&self) -> Architecture;

    fn read_register(&self, register: &Register) -> Result<Self::Value>;
    fn write_register(&mut self, register: &Register, value: Self::Value) -> Result<()>;

    /// Read the pointer-sized stack slot at `stack_pointer - offset`. Slots pushed before the
    /// current stack pointer are therefore at negative offsets on stacks growing down.
    fn read_stack(&self, offset: i64) -> Result<Self::Value>;

    /// Pop a pointer-sized value off the stack, updating the stack pointer.
    fn pop_stack(&mut self) -> Result<Self::Value>;
}
