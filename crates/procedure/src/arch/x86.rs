use super::Register;
use crate::convention::{
    ArchConventions, ArgumentPlacement, CallingConvention, ReturnSequence, ReturnValue,
};

pub const EAX: Register = Register::new("eax", 8, 4);
pub const ECX: Register = Register::new("ecx", 12, 4);
pub const EDX: Register = Register::new("edx", 16, 4);
pub const EBX: Register = Register::new("ebx", 20, 4);
pub const ESP: Register = Register::new("esp", 24, 4);
pub const EBP: Register = Register::new("ebp", 28, 4);
pub const ESI: Register = Register::new("esi", 32, 4);
pub const EDI: Register = Register::new("edi", 36, 4);
pub const EIP: Register = Register::new("eip", 68, 4);

pub const REGISTERS: &[Register] = &[EAX, ECX, EDX, EBX, ESP, EBP, ESI, EDI, EIP];

// https://github.com/torvalds/linux/blob/master/arch/x86/entry/entry_32.S
const SYSCALL_ARGS: &[Register] = &[EBX, ECX, EDX, ESI, EDI, EBP];

pub fn conventions() -> ArchConventions {
    ArchConventions {
        default: Some(CallingConvention::Cdecl),
        placements: vec![
            // All arguments are passed on the stack above the return address
            (CallingConvention::Cdecl, ArgumentPlacement::new(&[], 1, -4)),
            (
                CallingConvention::Syscall,
                ArgumentPlacement::new(SYSCALL_ARGS, 1, -4),
            ),
        ],
        return_value: Some(ReturnValue::new(EAX)),
        return_sequence: Some(ReturnSequence::PopStack),
    }
}
