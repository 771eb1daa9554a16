use super::Register;
use crate::convention::{
    ArchConventions, ArgumentPlacement, CallingConvention, ReturnSequence, ReturnValue,
};

pub const R0: Register = Register::new("r0", 8, 4);
pub const R1: Register = Register::new("r1", 12, 4);
pub const R2: Register = Register::new("r2", 16, 4);
pub const R3: Register = Register::new("r3", 20, 4);
pub const R4: Register = Register::new("r4", 24, 4);
pub const R5: Register = Register::new("r5", 28, 4);
pub const R6: Register = Register::new("r6", 32, 4);
pub const R7: Register = Register::new("r7", 36, 4);
pub const R8: Register = Register::new("r8", 40, 4);
pub const R9: Register = Register::new("r9", 44, 4);
pub const R10: Register = Register::new("r10", 48, 4);
pub const R11: Register = Register::new("r11", 52, 4);
pub const R12: Register = Register::new("r12", 56, 4);
pub const SP: Register = Register::new("sp", 60, 4);
pub const LR: Register = Register::new("lr", 64, 4);
pub const PC: Register = Register::new("pc", 68, 4);

pub const REGISTERS: &[Register] = &[
    R0, R1, R2, R3, R4, R5, R6, R7, R8, R9, R10, R11, R12, SP, LR, PC,
];

const ARM_ARGS: &[Register] = &[R0, R1, R2, R3];

pub fn conventions() -> ArchConventions {
    ArchConventions {
        default: Some(CallingConvention::Arm),
        placements: vec![(
            CallingConvention::Arm,
            // No return address on the stack, overflow starts at the stack pointer
            ArgumentPlacement::new(ARM_ARGS, 0, -4),
        )],
        return_value: Some(ReturnValue::new(R0)),
        return_sequence: Some(ReturnSequence::LinkRegister(LR)),
    }
}
