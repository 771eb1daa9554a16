//! This crate enables substituting synthetic summaries for functions during symbolic execution.
//! A summary reads the arguments of the function and writes its return value independent of
//! the architecture and calling convention used to pass them.
//!
//! ### Execution units
//!
//! The [run::ExecutionUnit] trait is the lifecycle shared by everything the exploration engine
//! runs against a state. A [procedure::HookedProcedure] is an execution unit that runs a
//! [procedure::Procedure] instead of interpreting the machine code at an address.
//!
//! ### Calling conventions
//!
//! Arguments and return values are located using the [convention::ConventionRegistry], keyed on
//! the [arch::Architecture] of the state and the [convention::CallingConvention] of the
//! procedure. Each architecture declares its conventions as data in its own module, so adding a
//! convention does not require changes to the argument accessors.

/// Architecture descriptors and register layouts.
pub mod arch;

/// Calling convention identifiers and the registry of argument and return placements.
pub mod convention;

/// Address to procedure dispatch.
pub mod hook;

/// Identifier source for naming synthetic values.
pub mod ids;

/// Reference implementation of [state::SymbolicState] backed by maps.
pub mod mem;

/// Hooked procedures and the context used to access their arguments.
pub mod procedure;

/// Summaries of common library functions.
pub mod procedures;

/// The execution unit lifecycle.
pub mod run;

/// Interface to the symbolic state consumed by procedures.
pub mod state;

/// Bitvector values exchanged with the symbolic state.
pub mod value;

#[cfg(test)]
mod test_fixture;
