use super::Register;
use crate::convention::{
    ArchConventions, ArgumentPlacement, CallingConvention, ReturnSequence, ReturnValue,
};

pub const ZERO: Register = Register::new("zero", 8, 4);
pub const AT: Register = Register::new("at", 12, 4);
pub const V0: Register = Register::new("v0", 16, 4);
pub const V1: Register = Register::new("v1", 20, 4);
pub const A0: Register = Register::new("a0", 24, 4);
pub const A1: Register = Register::new("a1", 28, 4);
pub const A2: Register = Register::new("a2", 32, 4);
pub const A3: Register = Register::new("a3", 36, 4);
pub const GP: Register = Register::new("gp", 120, 4);
pub const SP: Register = Register::new("sp", 124, 4);
pub const FP: Register = Register::new("fp", 128, 4);
pub const RA: Register = Register::new("ra", 132, 4);
pub const PC: Register = Register::new("pc", 136, 4);

pub const REGISTERS: &[Register] = &[ZERO, AT, V0, V1, A0, A1, A2, A3, GP, SP, FP, RA, PC];

const O32_ARGS: &[Register] = &[A0, A1, A2, A3];

pub fn conventions() -> ArchConventions {
    ArchConventions {
        default: Some(CallingConvention::MipsO32),
        placements: vec![(
            CallingConvention::MipsO32,
            // The caller reserves 16 bytes of home space for the register arguments
            ArgumentPlacement::new(O32_ARGS, 4, -4),
        )],
        return_value: Some(ReturnValue::new(V0)),
        return_sequence: Some(ReturnSequence::LinkRegister(RA)),
    }
}
