//! Pooled child-tally borrow/return, grounded on `KeffSimulation::getTallies`/
//! `setTallies`: a short critical section hands a worker a scratch accumulator,
//! allocating a fresh one only if the pool is empty, and the worker returns it
//! when its cycle slice is done. Avoids atomics on the tally hot path.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::ChildTally;

/// A deque of spare [`ChildTally`] values, reused across cycles and workers.
#[derive(Default)]
pub struct TallyPool {
    free: Mutex<VecDeque<ChildTally>>,
}

impl TallyPool {
    pub fn new() -> Self {
        TallyPool::default()
    }

    /// Borrows a child tally, allocating a fresh (zeroed) one if the pool is
    /// empty. The short lock is held only long enough to pop the deque.
    pub fn borrow(&self) -> Borrowed<'_> {
        let child = self
            .free
            .lock()
            .expect("tally pool mutex poisoned")
            .pop_back()
            .unwrap_or_default();
        Borrowed {
            pool: self,
            child: Some(child),
        }
    }

    fn give_back(&self, child: ChildTally) {
        self.free
            .lock()
            .expect("tally pool mutex poisoned")
            .push_back(child);
    }
}

/// An RAII handle for a borrowed [`ChildTally`]. Returns it to the pool on drop
/// so a worker can never forget to give it back, even on an early return from a
/// failed history.
pub struct Borrowed<'a> {
    pool: &'a TallyPool,
    child: Option<ChildTally>,
}

impl std::ops::Deref for Borrowed<'_> {
    type Target = ChildTally;
    fn deref(&self) -> &ChildTally {
        self.child.as_ref().expect("child taken before drop")
    }
}

impl std::ops::DerefMut for Borrowed<'_> {
    fn deref_mut(&mut self) -> &mut ChildTally {
        self.child.as_mut().expect("child taken before drop")
    }
}

impl Drop for Borrowed<'_> {
    fn drop(&mut self) {
        if let Some(child) = self.child.take() {
            self.pool.give_back(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::TallyKind;
    use super::*;

    #[test]
    fn borrowed_tally_returns_to_pool_on_drop() {
        let pool = TallyPool::new();
        {
            let mut child = pool.borrow();
            child.add(TallyKind::Leakage, 1.0);
        }
        let guard = pool.free.lock().unwrap();
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn empty_pool_allocates_a_fresh_default_child() {
        let pool = TallyPool::new();
        let child = pool.borrow();
        assert_eq!(child.values, [0.0; super::super::NUM_TALLIES]);
    }
}
