use std::collections::BTreeMap;

use log::{debug, warn};

use crate::convention::{CallingConvention, ConventionRegistry};
use crate::ids::IdSource;
use crate::procedure::{HookedProcedure, Procedure, ProcedureBuilder, Result};
use crate::state::SymbolicState;

/// Creates a fresh procedure for every invocation of a hook
pub type ProcedureFactory<S> = Box<dyn Fn() -> Box<dyn Procedure<S>>>;

/// A procedure registered at an address
pub struct Hook<S: SymbolicState> {
    factory: ProcedureFactory<S>,
    convention: Option<CallingConvention>,
}

impl<S: SymbolicState + 'static> Hook<S> {
    pub fn new<P>(factory: impl Fn() -> P + 'static) -> Self
    where
        P: Procedure<S> + 'static,
    {
        Self {
            factory: Box::new(move || -> Box<dyn Procedure<S>> { Box::new(factory()) }),
            convention: None,
        }
    }

    /// Run the procedure with the given convention instead of the architecture default
    pub fn with_convention(mut self, convention: CallingConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    pub fn convention(&self) -> Option<CallingConvention> {
        self.convention
    }

    /// Create a new instance of the hooked procedure
    pub fn procedure(&self) -> Box<dyn Procedure<S>> {
        (self.factory)()
    }
}

impl<S: SymbolicState> std::fmt::Debug for Hook<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook")
            .field("convention", &self.convention)
            .finish_non_exhaustive()
    }
}

/// Maps addresses to the procedures replacing the code at those addresses. Addresses without
/// a hook are executed as lifted code.
#[derive(Debug)]
pub struct HookTable<S: SymbolicState> {
    hooks: BTreeMap<u64, Hook<S>>,
}

impl<S: SymbolicState> Default for HookTable<S> {
    fn default() -> Self {
        Self {
            hooks: Default::default(),
        }
    }
}

impl<S: SymbolicState + 'static> HookTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook the address with procedures created by the factory. Returns the hook previously
    /// registered at the address.
    pub fn hook<P>(&mut self, address: u64, factory: impl Fn() -> P + 'static) -> Option<Hook<S>>
    where
        P: Procedure<S> + 'static,
    {
        self.insert(address, Hook::new(factory))
    }

    pub fn hook_with_convention<P>(
        &mut self,
        address: u64,
        convention: CallingConvention,
        factory: impl Fn() -> P + 'static,
    ) -> Option<Hook<S>>
    where
        P: Procedure<S> + 'static,
    {
        self.insert(address, Hook::new(factory).with_convention(convention))
    }

    pub fn insert(&mut self, address: u64, hook: Hook<S>) -> Option<Hook<S>> {
        let previous = self.hooks.insert(address, hook);
        if previous.is_some() {
            warn!("replaced hook at {address:#x}");
        }

        previous
    }

    pub fn unhook(&mut self, address: u64) -> Option<Hook<S>> {
        self.hooks.remove(&address)
    }

    pub fn is_hooked(&self, address: u64) -> bool {
        self.hooks.contains_key(&address)
    }

    pub fn lookup(&self, address: u64) -> Option<&Hook<S>> {
        self.hooks.get(&address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = u64> + '_ {
        self.hooks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Construct the procedure hooked at the address, bound to the state. Returns `None` if the
    /// address is not hooked.
    pub fn instantiate<'a>(
        &self,
        address: u64,
        addr_from: Option<u64>,
        state: &'a mut S,
        registry: &'a ConventionRegistry,
        ids: &'a mut IdSource,
    ) -> Result<Option<HookedProcedure<'a, S, Box<dyn Procedure<S>>>>> {
        let Some(hook) = self.hooks.get(&address) else {
            return Ok(None);
        };

        debug!("dispatching {address:#x} to hook");
        let procedure = ProcedureBuilder::new(hook.procedure())
            .with_options(addr_from, hook.convention)
            .build(state, registry, ids)?;

        Ok(Some(procedure))
    }
}
