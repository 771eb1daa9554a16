use std::collections::BTreeMap;

use crate::arch::{Architecture, Register};
use crate::state::{Error, Result, SymbolicState};
use crate::value::Expression;

/// Reference symbolic state holding whole registers keyed by guest state offset and
/// pointer-sized stack slots keyed by address. The stack grows down.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryState<V> {
    architecture: Architecture,
    registers: BTreeMap<usize, V>,
    stack: BTreeMap<u64, V>,
}

impl<V: Expression> MemoryState<V> {
    pub fn new(architecture: Architecture) -> Self {
        Self {
            architecture,
            registers: Default::default(),
            stack: Default::default(),
        }
    }

    /// Create a state with a concrete stack pointer
    pub fn with_stack_pointer(architecture: Architecture, stack_pointer: u64) -> Self {
        let mut state = Self::new(architecture);
        let sp = architecture.stack_pointer();
        state
            .registers
            .insert(sp.offset, V::constant(stack_pointer, sp.bits()));
        state
    }

    pub fn stack_pointer(&self) -> Result<u64> {
        let value = self.read_register(&self.architecture.stack_pointer())?;
        value
            .as_u64()
            .ok_or_else(|| Error::SymbolicStackPointer(format!("{value:?}")))
    }

    fn set_stack_pointer(&mut self, stack_pointer: u64) {
        let sp = self.architecture.stack_pointer();
        self.registers
            .insert(sp.offset, V::constant(stack_pointer, sp.bits()));
    }

    fn stack_address(&self, offset: i64) -> Result<u64> {
        let stack_pointer = self.stack_pointer()?;
        offset
            .checked_neg()
            .and_then(|offset| stack_pointer.checked_add_signed(offset))
            .ok_or_else(|| {
                Error::InvalidArguments(format!(
                    "stack offset {offset} from {stack_pointer:#x} overflows"
                ))
            })
    }

    fn check_slot(&self, value: &V) -> Result<()> {
        if value.bits() == self.architecture.bits() {
            Ok(())
        } else {
            Err(Error::InvalidArguments(format!(
                "expected stack slot of {expected} bits, got {actual} bits",
                expected = self.architecture.bits(),
                actual = value.bits()
            )))
        }
    }

    /// Write the stack slot at `stack_pointer - offset`
    pub fn write_stack(&mut self, offset: i64, value: V) -> Result<()> {
        self.check_slot(&value)?;
        let address = self.stack_address(offset)?;
        self.stack.insert(address, value);
        Ok(())
    }

    pub fn push_stack(&mut self, value: V) -> Result<()> {
        self.check_slot(&value)?;
        let stack_pointer = self.stack_pointer()?;
        let stack_pointer = stack_pointer
            .checked_sub(self.architecture.pointer_size() as u64)
            .ok_or_else(|| {
                Error::InvalidArguments(format!("push overflows stack at {stack_pointer:#x}"))
            })?;

        self.stack.insert(stack_pointer, value);
        self.set_stack_pointer(stack_pointer);
        Ok(())
    }

    /// Registers with a bound value, ordered by offset
    pub fn registers(&self) -> impl Iterator<Item = (usize, &V)> {
        self.registers.iter().map(|(offset, value)| (*offset, value))
    }

    /// Stack slots with a stored value, ordered by address
    pub fn stack(&self) -> impl Iterator<Item = (u64, &V)> {
        self.stack.iter().map(|(address, value)| (*address, value))
    }
}

impl<V: Expression> SymbolicState for MemoryState<V> {
    type Value = V;

    fn architecture(&self) -> Architecture {
        self.architecture
    }

    fn read_register(&self, register: &Register) -> Result<V> {
        let value = self
            .registers
            .get(&register.offset)
            .ok_or(Error::UndefinedRegister {
                register: *register,
            })?;

        if value.bits() != register.bits() {
            return Err(Error::InvalidArguments(format!(
                "register {register} holds {actual} bits",
                actual = value.bits()
            )));
        }

        Ok(value.clone())
    }

    fn write_register(&mut self, register: &Register, value: V) -> Result<()> {
        if value.bits() != register.bits() {
            return Err(Error::InvalidArguments(format!(
                "expected to write {expected} bits to {register}, got {actual} bits",
                expected = register.bits(),
                actual = value.bits()
            )));
        }

        self.registers.insert(register.offset, value);
        Ok(())
    }

    fn read_stack(&self, offset: i64) -> Result<V> {
        let address = self.stack_address(offset)?;
        self.stack
            .get(&address)
            .cloned()
            .ok_or(Error::UndefinedStack { address })
    }

    fn pop_stack(&mut self) -> Result<V> {
        let stack_pointer = self.stack_pointer()?;
        let value = self
            .stack
            .get(&stack_pointer)
            .cloned()
            .ok_or(Error::UndefinedStack {
                address: stack_pointer,
            })?;

        let stack_pointer = stack_pointer
            .checked_add(self.architecture.pointer_size() as u64)
            .ok_or_else(|| {
                Error::InvalidArguments(format!("pop overflows stack at {stack_pointer:#x}"))
            })?;
        self.set_stack_pointer(stack_pointer);

        Ok(value)
    }
}
