use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::foundation::core::{Fragment, Orientation, TileData, TileId, WorldPos};

/// Upper bound between stop-flag re-checks while waiting for raw data.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Accumulated state for one capture cycle.
///
/// `xs`/`ys`/`zs` record placement-sourced positions only; direct-path
/// fragments append to `fragments` without touching them. The
/// completeness predicate depends on that asymmetry.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) tiles: HashMap<TileId, TileData>,
    pub(crate) fragments: Vec<Fragment>,
    pub(crate) xs: Vec<i32>,
    pub(crate) ys: Vec<i32>,
    pub(crate) zs: Vec<i32>,
    pub(crate) orientation: Option<Orientation>,
}

impl SessionState {
    /// Capture is complete when every raw tile buffer observed so far has
    /// been matched to exactly one fragment, and the placement stream has
    /// not produced more position records than fragments.
    pub(crate) fn is_complete(&self) -> bool {
        self.fragments.len() == self.tiles.len() && self.ys.len() <= self.fragments.len()
    }
}

/// Single-capture accumulator with a signalled wait for raw tile data.
///
/// Exactly one session is live at a time; the owning service replaces the
/// whole session on reset and cancels the old one, so a handler holding a
/// stale handle can never leak state into the next capture.
#[derive(Debug, Default)]
pub struct CaptureSession {
    state: Mutex<SessionState>,
    arrivals: Condvar,
    cancelled: AtomicBool,
}

impl CaptureSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert raw tile data, waking any handler waiting on its id.
    /// Last write wins for a repeated id.
    pub fn insert_tile(&self, tile: TileId, data: Vec<u8>) {
        let mut state = self.lock_state();
        state.tiles.insert(tile, TileData::from(data));
        drop(state);
        self.arrivals.notify_all();
    }

    /// Block until the buffer for `tile` is present, returning it, or
    /// `None` once the session is cancelled. The sentinel
    /// [`TileId::EMPTY`] resolves to `None` immediately.
    ///
    /// The wait is signalled by [`CaptureSession::insert_tile`] and
    /// [`CaptureSession::cancel`], with a [`POLL_INTERVAL`] timeout tick
    /// bounding how long a missed wakeup could stall cancellation.
    pub fn await_tile(&self, tile: TileId) -> Option<TileData> {
        if tile.is_empty() {
            return None;
        }
        let mut state = self.lock_state();
        loop {
            if let Some(data) = state.tiles.get(&tile) {
                return Some(data.clone());
            }
            if self.cancelled.load(Ordering::Acquire) {
                tracing::debug!(tile = tile.0, "wait cancelled before raw data arrived");
                return None;
            }
            let (guard, _) = self
                .arrivals
                .wait_timeout(state, POLL_INTERVAL)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }

    /// Record a placement-sourced position and (re)set the capture
    /// orientation. Every placement overwrites the orientation, including
    /// clearing it when the yaw was outside the known table.
    pub fn record_placement(&self, pos: WorldPos, orientation: Option<Orientation>) {
        let mut state = self.lock_state();
        state.xs.push(pos.x);
        state.ys.push(pos.y);
        state.zs.push(pos.z);
        state.orientation = orientation;
    }

    /// Append a resolved fragment and, if that append completes the
    /// capture, atomically claim the accumulated state for assembly.
    ///
    /// The append and the completeness check happen under one lock, so
    /// only the fragment that makes the counts match can claim, and a
    /// concurrent raw-data arrival cannot slip between check and claim.
    pub(crate) fn push_fragment_and_claim(&self, fragment: Fragment) -> Option<SessionState> {
        let mut state = self.lock_state();
        state.fragments.push(fragment);
        if self.cancelled.load(Ordering::Acquire) || !state.is_complete() {
            return None;
        }
        Some(std::mem::take(&mut *state))
    }

    /// Mark the session abandoned and wake every outstanding wait.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.arrivals.notify_all();
    }

    /// Whether this session has been abandoned by a reset.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.lock_state())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
