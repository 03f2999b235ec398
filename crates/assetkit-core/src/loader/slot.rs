//! Single-slot, single-flight cache for one loader.
//!
//! The slot holds at most one [`SharedLoad`]. While it is occupied every
//! caller gets a clone of the same flight; the slot is only emptied when the
//! policy is [`FailurePolicy::Clear`] and the flight resolves to an error.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::error::LoadError;

/// A cloneable handle to one in-flight (or settled) load.
pub type SharedLoad<T> = Shared<BoxFuture<'static, Result<T, LoadError>>>;

/// What happens to the slot when a flight fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The failed flight stays cached; later callers receive the same error.
    Keep,
    /// The slot is emptied so the next caller starts a fresh flight.
    Clear,
}

/// Observable loader state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unstarted,
    Loading,
    Loaded,
    Failed,
}

struct Slot<T> {
    /// Bumped on every new flight so a stale flight never clears its successor.
    generation: u64,
    flight: Option<SharedLoad<T>>,
}

pub struct SingleFlight<T> {
    slot: Arc<Mutex<Slot<T>>>,
    policy: FailurePolicy,
}

fn lock<T>(slot: &Mutex<Slot<T>>) -> MutexGuard<'_, Slot<T>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                flight: None,
            })),
            policy,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Returns the cached flight, or builds one from `start` and caches it.
    ///
    /// `start` runs synchronously under the slot lock and must only build the
    /// future; the work itself happens when a caller polls the flight.
    pub fn get_or_start<F, Fut>(&self, start: F) -> SharedLoad<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
    {
        let mut slot = lock(&self.slot);
        if let Some(flight) = &slot.flight {
            return flight.clone();
        }

        slot.generation += 1;
        let generation = slot.generation;
        let work = start();

        let boxed: BoxFuture<'static, Result<T, LoadError>> = match self.policy {
            FailurePolicy::Keep => work.boxed(),
            FailurePolicy::Clear => {
                let weak = Arc::downgrade(&self.slot);
                async move {
                    let result = work.await;
                    if result.is_err() {
                        clear_generation(&weak, generation);
                    }
                    result
                }
                .boxed()
            }
        };

        let flight = boxed.shared();
        slot.flight = Some(flight.clone());
        flight
    }

    /// The cached flight, if any, without starting one.
    pub fn current(&self) -> Option<SharedLoad<T>> {
        lock(&self.slot).flight.clone()
    }

    pub fn state(&self) -> LoadState {
        match &lock(&self.slot).flight {
            None => LoadState::Unstarted,
            Some(flight) => match flight.peek() {
                None => LoadState::Loading,
                Some(Ok(_)) => LoadState::Loaded,
                Some(Err(_)) => LoadState::Failed,
            },
        }
    }
}

fn clear_generation<T>(slot: &Weak<Mutex<Slot<T>>>, generation: u64) {
    if let Some(slot) = slot.upgrade() {
        let mut slot = lock(&slot);
        if slot.generation == generation {
            slot.flight = None;
            tracing::debug!("cleared failed load (generation {})", generation);
        }
    }
}
