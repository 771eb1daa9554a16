/// Operations procedures need to synthesize bitvector values. The algebra on these values is
/// owned by the symbolic engine, procedures only create and inspect them.
pub trait Expression: Clone + std::fmt::Debug {
    /// Width of the value in bits
    fn bits(&self) -> u32;

    /// Create a concrete value. Bits of `value` beyond `bits` are discarded.
    fn constant(value: u64, bits: u32) -> Self;

    /// Create a fresh unconstrained value with the given name.
    fn symbol(name: impl Into<String>, bits: u32) -> Self;

    /// The concrete value, if the value is concrete
    fn as_u64(&self) -> Option<u64>;
}

/// Reference bitvector value. A value is either concrete or an opaque named symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolicValue {
    Concrete { value: u64, bits: u32 },
    Symbol { name: String, bits: u32 },
}

impl SymbolicValue {
    fn bitmask(bits: u32) -> u64 {
        if bits >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SymbolicValue::Symbol { name, .. } => Some(name),
            SymbolicValue::Concrete { .. } => None,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, SymbolicValue::Symbol { .. })
    }
}

impl Expression for SymbolicValue {
    fn bits(&self) -> u32 {
        match self {
            SymbolicValue::Concrete { bits, .. } | SymbolicValue::Symbol { bits, .. } => *bits,
        }
    }

    fn constant(value: u64, bits: u32) -> Self {
        SymbolicValue::Concrete {
            value: value & Self::bitmask(bits),
            bits,
        }
    }

    fn symbol(name: impl Into<String>, bits: u32) -> Self {
        SymbolicValue::Symbol {
            name: name.into(),
            bits,
        }
    }

    fn as_u64(&self) -> Option<u64> {
        match self {
            SymbolicValue::Concrete { value, .. } => Some(*value),
            SymbolicValue::Symbol { .. } => None,
        }
    }
}

impl std::fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolicValue::Concrete { value, bits } => {
                // Each byte is represented by 2 hex characters
                let width = (*bits as usize).div_ceil(8) * 2;
                write!(f, "{value:#0width$x}:{bits}", width = width + 2)
            }
            SymbolicValue::Symbol { name, bits } => write!(f, "{name}:{bits}"),
        }
    }
}

macro_rules! impl_from_value {
    ($type:ty) => {
        impl From<$type> for SymbolicValue {
            fn from(value: $type) -> Self {
                SymbolicValue::constant(value.into(), <$type>::BITS)
            }
        }
    };
}

impl_from_value!(u64);
impl_from_value!(u32);
impl_from_value!(u16);
impl_from_value!(u8);
