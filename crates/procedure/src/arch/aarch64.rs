use super::Register;
use crate::convention::{
    ArchConventions, ArgumentPlacement, CallingConvention, ReturnSequence, ReturnValue,
};

pub const X0: Register = Register::new("x0", 16, 8);
pub const X1: Register = Register::new("x1", 24, 8);
pub const X2: Register = Register::new("x2", 32, 8);
pub const X3: Register = Register::new("x3", 40, 8);
pub const X4: Register = Register::new("x4", 48, 8);
pub const X5: Register = Register::new("x5", 56, 8);
pub const X6: Register = Register::new("x6", 64, 8);
pub const X7: Register = Register::new("x7", 72, 8);
pub const X8: Register = Register::new("x8", 80, 8);
pub const X29: Register = Register::new("x29", 248, 8);
pub const X30: Register = Register::new("x30", 256, 8);
pub const SP: Register = Register::new("sp", 264, 8);
pub const PC: Register = Register::new("pc", 272, 8);

pub const REGISTERS: &[Register] = &[X0, X1, X2, X3, X4, X5, X6, X7, X8, X29, X30, SP, PC];

const AAPCS64_ARGS: &[Register] = &[X0, X1, X2, X3, X4, X5, X6, X7];

// https://github.com/torvalds/linux/blob/v6.16/arch/arm64/kernel/syscall.c
const SYSCALL_ARGS: &[Register] = &[X0, X1, X2, X3, X4, X5];

pub fn conventions() -> ArchConventions {
    ArchConventions {
        default: Some(CallingConvention::Aapcs64),
        placements: vec![
            (
                CallingConvention::Aapcs64,
                ArgumentPlacement::new(AAPCS64_ARGS, 0, -8),
            ),
            (
                CallingConvention::Syscall,
                ArgumentPlacement::new(SYSCALL_ARGS, 0, -8),
            ),
        ],
        return_value: Some(ReturnValue::new(X0)),
        return_sequence: Some(ReturnSequence::LinkRegister(X30)),
    }
}
