//! Lazily computed structural flags
//!
//! Whether a matrix has sorted indices (and whether it is canonical) is
//! expensive to determine, so each matrix caches the answer in a small
//! three-state machine: unknown, known-true, known-false. Structural
//! mutation resets a flag to unknown; value-only updates never touch it.
//! The cell is atomic so read-only parallel passes may probe and fill it
//! through a shared reference.

use std::sync::atomic::{AtomicU8, Ordering};

const FALSE: u8 = 0;
const TRUE: u8 = 1;
const UNKNOWN: u8 = 2;

/// A cached boolean with an explicit "not yet computed" state
#[derive(Debug)]
pub(crate) struct CachedFlag(AtomicU8);

impl CachedFlag {
    /// A flag in the unknown state
    pub fn unknown() -> Self {
        CachedFlag(AtomicU8::new(UNKNOWN))
    }

    /// A flag with a known value
    pub fn known(value: bool) -> Self {
        CachedFlag(AtomicU8::new(if value { TRUE } else { FALSE }))
    }

    /// The cached value, if one has been computed
    pub fn get(&self) -> Option<bool> {
        match self.0.load(Ordering::Acquire) {
            FALSE => Some(false),
            TRUE => Some(true),
            _ => None,
        }
    }

    /// Records a computed value
    pub fn set(&self, value: bool) {
        self.0
            .store(if value { TRUE } else { FALSE }, Ordering::Release);
    }

    /// Resets the flag to unknown after a structural mutation
    pub fn invalidate(&self) {
        self.0.store(UNKNOWN, Ordering::Release);
    }
}

impl Clone for CachedFlag {
    fn clone(&self) -> Self {
        CachedFlag(AtomicU8::new(self.0.load(Ordering::Acquire)))
    }
}
