use super::Register;
use crate::convention::{
    ArchConventions, ArgumentPlacement, CallingConvention, ReturnSequence, ReturnValue,
};

pub const RAX: Register = Register::new("rax", 16, 8);
pub const RCX: Register = Register::new("rcx", 24, 8);
pub const RDX: Register = Register::new("rdx", 32, 8);
pub const RBX: Register = Register::new("rbx", 40, 8);
pub const RSP: Register = Register::new("rsp", 48, 8);
pub const RBP: Register = Register::new("rbp", 56, 8);
pub const RSI: Register = Register::new("rsi", 64, 8);
pub const RDI: Register = Register::new("rdi", 72, 8);
pub const R8: Register = Register::new("r8", 80, 8);
pub const R9: Register = Register::new("r9", 88, 8);
pub const R10: Register = Register::new("r10", 96, 8);
pub const R11: Register = Register::new("r11", 104, 8);
pub const R12: Register = Register::new("r12", 112, 8);
pub const R13: Register = Register::new("r13", 120, 8);
pub const R14: Register = Register::new("r14", 128, 8);
pub const R15: Register = Register::new("r15", 136, 8);
pub const RIP: Register = Register::new("rip", 184, 8);

pub const REGISTERS: &[Register] = &[
    RAX, RCX, RDX, RBX, RSP, RBP, RSI, RDI, R8, R9, R10, R11, R12, R13, R14, R15, RIP,
];

const SYSTEMV_ARGS: &[Register] = &[RDI, RSI, RDX, RCX, R8, R9];

// https://github.com/torvalds/linux/blob/master/arch/x86/entry/entry_64.S
// The kernel clobbers rcx on syscall so the fourth argument moves to r10
const SYSCALL_ARGS: &[Register] = &[RDI, RSI, RDX, R10, R8, R9];

const MICROSOFT_ARGS: &[Register] = &[RCX, RDX, R8, R9];

pub fn conventions() -> ArchConventions {
    ArchConventions {
        default: Some(CallingConvention::SystemV),
        placements: vec![
            (
                CallingConvention::SystemV,
                // Overflow arguments start above the return address
                ArgumentPlacement::new(SYSTEMV_ARGS, 1, -8),
            ),
            (
                CallingConvention::Syscall,
                ArgumentPlacement::new(SYSCALL_ARGS, 1, -8),
            ),
            (
                CallingConvention::MicrosoftX64,
                // Return address followed by 32 bytes of shadow space
                ArgumentPlacement::new(MICROSOFT_ARGS, 5, -8),
            ),
        ],
        return_value: Some(ReturnValue::new(RAX)),
        return_sequence: Some(ReturnSequence::PopStack),
    }
}
