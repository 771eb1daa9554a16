use crate::arch::*;

#[test]
fn parse_architecture_names() {
    for arch in Architecture::ALL {
        assert_eq!(arch.name().parse::<Architecture>(), Ok(arch));
    }

    assert_eq!("amd64".parse::<Architecture>(), Ok(Architecture::Amd64));
    assert_eq!("x86_64".parse::<Architecture>(), Ok(Architecture::Amd64));
    assert_eq!("ARM".parse::<Architecture>(), Ok(Architecture::Arm));
    assert!("sparc".parse::<Architecture>().is_err());
}

#[test]
fn amd64_register_layout() {
    let arch = Architecture::Amd64;
    let offsets = [
        ("rax", 16),
        ("rcx", 24),
        ("rdx", 32),
        ("rsp", 48),
        ("rsi", 64),
        ("rdi", 72),
        ("r8", 80),
        ("r9", 88),
        ("r10", 96),
    ];

    for (name, offset) in offsets {
        let register = arch.register(name).expect("register should exist");
        assert_eq!(register.offset, offset, "offset of {name}");
        assert_eq!(register.size, 8);
        assert_eq!(arch.register_at(offset), Some(register));
    }

    assert_eq!(arch.register("RDI"), arch.register("rdi"));
    assert_eq!(arch.stack_pointer(), amd64::RSP);
    assert_eq!(arch.instruction_pointer(), amd64::RIP);
}

#[test]
fn registers_match_pointer_size() {
    for arch in Architecture::ALL {
        assert_eq!(arch.bits(), 8 * arch.pointer_size() as u32);
        for register in arch.registers() {
            assert_eq!(register.size, arch.pointer_size(), "{arch} {register}");
        }
    }
}

#[test]
fn register_offsets_are_unique() {
    for arch in Architecture::ALL {
        let registers = arch.registers();
        for (i, register) in registers.iter().enumerate() {
            assert!(
                registers[i + 1..]
                    .iter()
                    .all(|other| other.offset != register.offset),
                "{arch} register {register} overlaps another register"
            );
        }
    }
}

#[test]
fn unknown_register() {
    assert_eq!(Architecture::X86.register("rax"), None);
    assert_eq!(Architecture::Mips32.register_at(0), None);
}
