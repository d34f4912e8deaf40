use crate::arena::Arena;

/// Options controlling a diff call.
#[derive(Clone, Copy)]
pub struct DiffOptions<'a> {
    /// When true, numbers compare with IEEE `==`; when false, numbers within
    /// an absolute difference of 1e-9 are considered equal. The flag applies
    /// everywhere values are compared during the diff, including array
    /// prefix/suffix trimming and edit-script extension.
    pub strict_equality: bool,

    /// Optional arena backing the transient allocations of the call. The
    /// arena's cursor is reset when the call starts; the caller must not
    /// reuse the arena concurrently from another thread.
    pub arena: Option<&'a Arena>,
}

impl Default for DiffOptions<'_> {
    fn default() -> Self {
        Self {
            strict_equality: true,
            arena: None,
        }
    }
}

impl<'a> DiffOptions<'a> {
    /// Options with tolerant number comparison.
    pub fn tolerant() -> Self {
        Self {
            strict_equality: false,
            arena: None,
        }
    }

    /// Binds an arena to the call.
    pub fn with_arena(mut self, arena: &'a Arena) -> Self {
        self.arena = Some(arena);
        self
    }
}
