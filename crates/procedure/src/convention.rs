use std::collections::BTreeMap;
use std::str::FromStr;

use crate::arch::{Architecture, Register};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown calling convention: {0}")]
pub struct ParseConventionError(String);

/// Identifies a rule set placing function arguments and return values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CallingConvention {
    /// System V AMD64 ABI
    SystemV,

    /// Microsoft x64 calling convention
    MicrosoftX64,

    /// Linux system call convention of the architecture
    Syscall,

    /// 32-bit x86 cdecl, all arguments passed on the stack
    Cdecl,

    /// 32-bit ARM procedure call standard
    Arm,

    /// 64-bit ARM procedure call standard
    Aapcs64,

    /// MIPS O32 ABI
    MipsO32,
}

impl CallingConvention {
    pub const ALL: [CallingConvention; 7] = [
        CallingConvention::SystemV,
        CallingConvention::MicrosoftX64,
        CallingConvention::Syscall,
        CallingConvention::Cdecl,
        CallingConvention::Arm,
        CallingConvention::Aapcs64,
        CallingConvention::MipsO32,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            CallingConvention::SystemV => "systemv_x64",
            CallingConvention::MicrosoftX64 => "microsoft_x64",
            CallingConvention::Syscall => "syscall",
            CallingConvention::Cdecl => "cdecl",
            CallingConvention::Arm => "arm",
            CallingConvention::Aapcs64 => "aapcs64",
            CallingConvention::MipsO32 => "mips-o32",
        }
    }
}

impl std::fmt::Display for CallingConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for CallingConvention {
    type Err = ParseConventionError;

    fn from_str(identifier: &str) -> Result<Self, Self::Err> {
        CallingConvention::ALL
            .into_iter()
            .find(|convention| convention.identifier() == identifier)
            .ok_or_else(|| ParseConventionError(identifier.to_owned()))
    }
}

/// Where a single argument lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArgumentLocation {
    Register(Register),

    /// Offset of the stack slot relative to the stack pointer. See
    /// [crate::state::SymbolicState::read_stack].
    Stack(i64),
}

/// Placement rule for arguments. The first arguments are held in registers and the remaining
/// arguments overflow onto the stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArgumentPlacement {
    pub registers: &'static [Register],

    /// Number of stack slots to skip before the first overflow argument
    pub stack_skip: i64,

    /// Distance between consecutive stack arguments. Negative for stacks growing down.
    pub stack_stride: i64,
}

impl ArgumentPlacement {
    pub const fn new(registers: &'static [Register], stack_skip: i64, stack_stride: i64) -> Self {
        Self {
            registers,
            stack_skip,
            stack_stride,
        }
    }

    /// Location of the argument at the given index. Returns `None` if the stack offset of the
    /// argument cannot be represented.
    pub fn location(&self, index: usize) -> Option<ArgumentLocation> {
        if let Some(register) = self.registers.get(index) {
            return Some(ArgumentLocation::Register(*register));
        }

        let overflow_index = i64::try_from(index - self.registers.len()).ok()?;
        let offset = overflow_index
            .checked_add(self.stack_skip)?
            .checked_mul(self.stack_stride)?;
        Some(ArgumentLocation::Stack(offset))
    }
}

/// The register receiving the return value of a function.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReturnValue {
    pub register: Register,
}

impl ReturnValue {
    pub const fn new(register: Register) -> Self {
        Self { register }
    }
}

/// How control is transferred back to the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReturnSequence {
    /// Pop the return address off the stack
    PopStack,

    /// The return address is held in a link register
    LinkRegister(Register),
}

/// Calling convention data declared by a single architecture.
#[derive(Clone, Debug, Default)]
pub struct ArchConventions {
    pub default: Option<CallingConvention>,
    pub placements: Vec<(CallingConvention, ArgumentPlacement)>,
    pub return_value: Option<ReturnValue>,
    pub return_sequence: Option<ReturnSequence>,
}

/// Registry of calling convention data keyed by architecture and convention. The default
/// registry holds every convention declared by [Architecture::conventions].
#[derive(Clone, Debug)]
pub struct ConventionRegistry {
    placements: BTreeMap<(Architecture, CallingConvention), ArgumentPlacement>,
    defaults: BTreeMap<Architecture, CallingConvention>,
    return_values: BTreeMap<Architecture, ReturnValue>,
    return_sequences: BTreeMap<Architecture, ReturnSequence>,
}

impl Default for ConventionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ConventionRegistry {
    /// A registry without any entries
    pub fn empty() -> Self {
        Self {
            placements: Default::default(),
            defaults: Default::default(),
            return_values: Default::default(),
            return_sequences: Default::default(),
        }
    }

    pub fn builtin() -> Self {
        Architecture::ALL
            .into_iter()
            .fold(Self::empty(), |registry, arch| {
                registry.with_architecture(arch, arch.conventions())
            })
    }

    pub fn with_architecture(mut self, arch: Architecture, conventions: ArchConventions) -> Self {
        for (convention, placement) in conventions.placements {
            self.placements.insert((arch, convention), placement);
        }

        if let Some(convention) = conventions.default {
            self.defaults.insert(arch, convention);
        }

        if let Some(return_value) = conventions.return_value {
            self.return_values.insert(arch, return_value);
        }

        if let Some(return_sequence) = conventions.return_sequence {
            self.return_sequences.insert(arch, return_sequence);
        }

        self
    }

    pub fn with_placement(
        mut self,
        arch: Architecture,
        convention: CallingConvention,
        placement: ArgumentPlacement,
    ) -> Self {
        self.placements.insert((arch, convention), placement);
        self
    }

    pub fn with_default(mut self, arch: Architecture, convention: CallingConvention) -> Self {
        self.defaults.insert(arch, convention);
        self
    }

    pub fn with_return_value(mut self, arch: Architecture, return_value: ReturnValue) -> Self {
        self.return_values.insert(arch, return_value);
        self
    }

    pub fn with_return_sequence(mut self, arch: Architecture, sequence: ReturnSequence) -> Self {
        self.return_sequences.insert(arch, sequence);
        self
    }

    /// Resolve the convention used by a procedure. An explicitly requested convention is used
    /// as is, even if it is not declared for the architecture. Otherwise the default of the
    /// architecture is used, if any.
    pub fn resolve(
        &self,
        arch: Architecture,
        requested: Option<CallingConvention>,
    ) -> Option<CallingConvention> {
        requested.or_else(|| self.default_convention(arch))
    }

    pub fn default_convention(&self, arch: Architecture) -> Option<CallingConvention> {
        self.defaults.get(&arch).copied()
    }

    pub fn placement(
        &self,
        arch: Architecture,
        convention: CallingConvention,
    ) -> Option<&ArgumentPlacement> {
        self.placements.get(&(arch, convention))
    }

    pub fn return_value(&self, arch: Architecture) -> Option<&ReturnValue> {
        self.return_values.get(&arch)
    }

    pub fn return_sequence(&self, arch: Architecture) -> Option<&ReturnSequence> {
        self.return_sequences.get(&arch)
    }

    /// Conventions with an argument placement declared for the architecture
    pub fn conventions(&self, arch: Architecture) -> impl Iterator<Item = CallingConvention> + '_ {
        self.placements
            .keys()
            .filter(move |(placement_arch, _)| *placement_arch == arch)
            .map(|(_, convention)| *convention)
    }
}
