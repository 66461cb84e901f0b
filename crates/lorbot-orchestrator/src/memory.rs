//! Per-match orchestrator memory.

/// Flags carried between ticks of one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnMemory {
    /// Mulligan already answered this match
    pub mulligan_handled: bool,
    /// A spell-only stack was seen once and is being debounced
    pub stack_debounce_armed: bool,
}

impl TurnMemory {
    /// Forget everything at match end.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
