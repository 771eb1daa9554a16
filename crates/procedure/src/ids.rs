/// Source of identifiers for naming synthetic values. Injected into procedures so that names
/// are deterministic for a given exploration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdSource {
    next: u64,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The identifier that will be returned by the next call to [Self::next_id]
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn fresh_name(&mut self, prefix: &str) -> String {
        format!("{prefix}_{id}", id = self.next_id())
    }
}
