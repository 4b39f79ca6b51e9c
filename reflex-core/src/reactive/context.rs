//! Active Effect Slot
//!
//! The active slot records which effect is currently running. This enables
//! automatic dependency tracking: when a tracked property is read, the
//! runtime attributes the read to the effect in the slot.
//!
//! # Implementation
//!
//! Each runtime owns exactly one slot, so independent runtimes never see each
//! other's effects. Entering an effect swaps it into the slot and hands back a
//! guard holding the previous occupant. Dropping the guard puts the previous
//! occupant back.
//!
//! Nested runs (an effect whose write triggers another effect) therefore leave
//! the outer effect current again once the inner run finishes, and the slot is
//! restored even if the effect body panics.

use parking_lot::Mutex;

use super::EffectId;

/// Single-slot holder for the currently running effect.
#[derive(Debug, Default)]
pub struct ActiveSlot {
    current: Mutex<Option<EffectId>>,
}

impl ActiveSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the effect currently occupying the slot, if any.
    pub fn current(&self) -> Option<EffectId> {
        *self.current.lock()
    }

    /// Check if an effect is currently running.
    pub fn is_active(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Put `occupant` in the slot until the returned guard is dropped.
    ///
    /// Passing `None` clears the slot, which is how untracked sections run.
    pub fn enter(&self, occupant: Option<EffectId>) -> ActiveGuard<'_> {
        let previous = std::mem::replace(&mut *self.current.lock(), occupant);
        ActiveGuard {
            slot: self,
            occupant,
            previous,
        }
    }
}

/// Guard that restores the previous slot occupant when dropped.
#[must_use = "the slot is restored as soon as the guard is dropped"]
pub struct ActiveGuard<'a> {
    slot: &'a ActiveSlot,
    occupant: Option<EffectId>,
    previous: Option<EffectId>,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let mut current = self.slot.current.lock();

        // Guards are strictly nested, so the slot still holds our occupant.
        debug_assert_eq!(
            *current, self.occupant,
            "ActiveSlot mismatch: expected {:?}, got {:?}",
            self.occupant, *current
        );

        *current = self.previous;
    }
}
