use std::str::FromStr;

use crate::convention::ArchConventions;

pub mod aarch64;
pub mod amd64;
pub mod arm;
pub mod mips;
pub mod x86;

/// A register in the guest state of an architecture. The offset is the byte offset of the
/// register in the lifter's guest state layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register {
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
}

impl Register {
    pub const fn new(name: &'static str, offset: usize, size: usize) -> Self {
        Self { name, offset, size }
    }

    /// Size of the register in bits
    pub fn bits(&self) -> u32 {
        // Register sizes are at most a few bytes
        (self.size * 8) as u32
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}#{}", self.name, self.offset, self.size)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown architecture: {0}")]
pub struct ParseArchitectureError(String);

/// The instruction set targeted by a symbolic state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Architecture {
    Amd64,
    X86,
    Arm,
    Aarch64,
    Mips32,
}

impl Architecture {
    pub const ALL: [Architecture; 5] = [
        Architecture::Amd64,
        Architecture::X86,
        Architecture::Arm,
        Architecture::Aarch64,
        Architecture::Mips32,
    ];

    /// The engine-facing name of the architecture.
    pub fn name(self) -> &'static str {
        match self {
            Architecture::Amd64 => "AMD64",
            Architecture::X86 => "x86",
            Architecture::Arm => "arm",
            Architecture::Aarch64 => "aarch64",
            Architecture::Mips32 => "mips",
        }
    }

    /// Size of a pointer in bytes
    pub fn pointer_size(self) -> usize {
        match self {
            Architecture::Amd64 | Architecture::Aarch64 => 8,
            Architecture::X86 | Architecture::Arm | Architecture::Mips32 => 4,
        }
    }

    /// Size of a pointer in bits
    pub fn bits(self) -> u32 {
        (self.pointer_size() * 8) as u32
    }

    /// The register layout of this architecture
    pub fn registers(self) -> &'static [Register] {
        match self {
            Architecture::Amd64 => amd64::REGISTERS,
            Architecture::X86 => x86::REGISTERS,
            Architecture::Arm => arm::REGISTERS,
            Architecture::Aarch64 => aarch64::REGISTERS,
            Architecture::Mips32 => mips::REGISTERS,
        }
    }

    /// Look up a register by its name. Names are matched ignoring ASCII case.
    pub fn register(self, name: impl AsRef<str>) -> Option<Register> {
        let name = name.as_ref();
        self.registers()
            .iter()
            .find(|register| register.name.eq_ignore_ascii_case(name))
            .copied()
    }

    /// Look up the register located at the given guest state offset.
    pub fn register_at(self, offset: usize) -> Option<Register> {
        self.registers()
            .iter()
            .find(|register| register.offset == offset)
            .copied()
    }

    pub fn stack_pointer(self) -> Register {
        match self {
            Architecture::Amd64 => amd64::RSP,
            Architecture::X86 => x86::ESP,
            Architecture::Arm => arm::SP,
            Architecture::Aarch64 => aarch64::SP,
            Architecture::Mips32 => mips::SP,
        }
    }

    pub fn instruction_pointer(self) -> Register {
        match self {
            Architecture::Amd64 => amd64::RIP,
            Architecture::X86 => x86::EIP,
            Architecture::Arm => arm::PC,
            Architecture::Aarch64 => aarch64::PC,
            Architecture::Mips32 => mips::PC,
        }
    }

    /// The calling conventions declared for this architecture. Adding a convention to an
    /// architecture only requires extending the table in the architecture module.
    pub fn conventions(self) -> ArchConventions {
        match self {
            Architecture::Amd64 => amd64::conventions(),
            Architecture::X86 => x86::conventions(),
            Architecture::Arm => arm::conventions(),
            Architecture::Aarch64 => aarch64::conventions(),
            Architecture::Mips32 => mips::conventions(),
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Architecture {
    type Err = ParseArchitectureError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let architecture = Architecture::ALL
            .into_iter()
            .find(|arch| arch.name().eq_ignore_ascii_case(name));

        match architecture {
            Some(architecture) => Ok(architecture),
            None if name.eq_ignore_ascii_case("x86_64") => Ok(Architecture::Amd64),
            None if name.eq_ignore_ascii_case("mips32") => Ok(Architecture::Mips32),
            None => Err(ParseArchitectureError(name.to_owned())),
        }
    }
}
