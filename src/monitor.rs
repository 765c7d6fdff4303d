//! Inactivity monitor state machine.
//!
//! Maps lifecycle transitions to navigation side effects:
//! - Entering `inactive` presents the overlay
//! - Leaving `inactive` pops one entry if there is one
//! - Entering `background` records the wall-clock time
//! - `background -> active` presents the lock screen if the app stayed
//!   backgrounded longer than the lock threshold

use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::clock::Clock;
use crate::lifecycle::LifecycleEvent;
use crate::lifecycle::LifecycleState;
use crate::navigation::Navigator;
use crate::navigation::Screen;
use crate::store::LAST_BACKGROUND_KEY;
use crate::store::TimestampStore;

/// Default time the app may stay backgrounded without locking.
pub const DEFAULT_LOCK_THRESHOLD: Duration = Duration::from_millis(3000);

/// Decision from the lock check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockDecision {
    /// Present the lock screen.
    Lock,
    /// Leave navigation alone.
    Stay,
}

/// Lifecycle-driven lock/overlay monitor.
#[derive(Debug)]
pub struct InactivityMonitor<N, S, C> {
    navigator: N,
    store: S,
    clock: C,
    lock_threshold: Duration,

    /// Last state handled; only written at the end of a transition.
    state: LifecycleState,
}

impl<N, S, C> InactivityMonitor<N, S, C>
where
    N: Navigator,
    S: TimestampStore,
    C: Clock,
{
    /// Create a monitor in the `active` state.
    pub fn new(navigator: N, store: S, clock: C, lock_threshold: Duration) -> Self {
        Self {
            navigator,
            store,
            clock,
            lock_threshold,
            state: LifecycleState::Active,
        }
    }

    /// State tracked from the last handled transition.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn lock_threshold(&self) -> Duration {
        self.lock_threshold
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle a host notification carrying only the new state.
    pub fn on_state(&mut self, next: LifecycleState) {
        self.on_lifecycle_change(self.state, next);
    }

    /// Handle an event, preferring its explicit previous state when present.
    pub fn handle_event(&mut self, event: LifecycleEvent) {
        let previous = event.previous.unwrap_or(self.state);
        self.on_lifecycle_change(previous, event.next);
    }

    /// Handle a `previous -> next` lifecycle transition.
    pub fn on_lifecycle_change(&mut self, previous: LifecycleState, next: LifecycleState) {
        debug!("Lifecycle transition: {} -> {}", previous, next);

        if next == LifecycleState::Inactive {
            self.navigator.push(Screen::Overlay);
        } else if previous == LifecycleState::Inactive {
            self.dismiss_overlay();
        }

        if next == LifecycleState::Background {
            self.record_background();
        } else if next == LifecycleState::Active
            && previous == LifecycleState::Background
            && self.lock_decision() == LockDecision::Lock
        {
            info!("Backgrounded past lock threshold, locking");
            self.navigator.push(Screen::Lock);
        }

        self.state = next;
    }

    /// Check whether returning to the foreground now should lock.
    ///
    /// Returns `Lock` only if a background timestamp exists and strictly more
    /// than the threshold has elapsed since it.
    pub fn lock_decision(&self) -> LockDecision {
        let Some(backgrounded_at) = self.store.get(LAST_BACKGROUND_KEY) else {
            debug!("No background timestamp recorded, not locking");
            return LockDecision::Stay;
        };

        let elapsed = self.clock.now_millis().saturating_sub(backgrounded_at);
        let threshold = i64::try_from(self.lock_threshold.as_millis()).unwrap_or(i64::MAX);

        if elapsed > threshold {
            debug!(
                "Elapsed {}ms > threshold {}ms, locking",
                elapsed, threshold
            );
            LockDecision::Lock
        } else {
            debug!(
                "Elapsed {}ms <= threshold {}ms, not locking",
                elapsed, threshold
            );
            LockDecision::Stay
        }
    }

    fn dismiss_overlay(&mut self) {
        if self.navigator.can_go_back() {
            self.navigator.back();
        } else {
            debug!("No overlay to dismiss");
        }
    }

    fn record_background(&mut self) {
        let now = self.clock.now_millis();
        if let Err(e) = self.store.set(LAST_BACKGROUND_KEY, now) {
            warn!("Failed to record background timestamp: {}", e);
        } else {
            debug!("Recorded background timestamp: {}", now);
        }
    }
}
