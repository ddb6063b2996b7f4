//! GPU completion markers.
//!
//! A [`GpuTimeline`] is a single monotonically increasing counter shared by
//! the CPU (producer) and the GPU (consumer). The CPU asks the queue to
//! [`signal`](GpuTimeline::signal) a value after the work it just submitted,
//! and later compares [`completed_value`](GpuTimeline::completed_value)
//! against that value to learn whether the work has retired.
//!
//! [`ManualTimeline`] is a host-side implementation whose progress is driven
//! explicitly. It backs the headless application (a simulator thread retires
//! submissions) and the tests (which can hold the GPU still forever).

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};

/// GPU-to-CPU completion counter.
///
/// Implementations must be shareable with the thread that observes GPU
/// progress, hence `Send + Sync`.
pub trait GpuTimeline: Send + Sync {
    /// Highest value the GPU has reached so far.
    fn completed_value(&self) -> SyncResult<u64>;

    /// Block until the GPU reaches `value`.
    ///
    /// There is no timeout. Device loss while waiting returns
    /// [`SyncError::DeviceLost`].
    fn wait_for(&self, value: u64) -> SyncResult<()>;

    /// Enqueue a signal of `value` after all previously submitted GPU work.
    fn signal(&self, value: u64) -> SyncResult<()>;
}

impl<T: GpuTimeline + ?Sized> GpuTimeline for Arc<T> {
    fn completed_value(&self) -> SyncResult<u64> {
        (**self).completed_value()
    }

    fn wait_for(&self, value: u64) -> SyncResult<()> {
        (**self).wait_for(value)
    }

    fn signal(&self, value: u64) -> SyncResult<()> {
        (**self).signal(value)
    }
}

#[derive(Debug, Default)]
struct TimelineState {
    completed: u64,
    signaled: u64,
    device_lost: bool,
    blocking_waits: u64,
}

/// Host-driven timeline.
///
/// Signals only record the requested value; nothing completes until
/// [`complete`](Self::complete) or [`complete_all`](Self::complete_all) is
/// called, mirroring a GPU that retires queued work on its own schedule.
#[derive(Debug, Default)]
pub struct ManualTimeline {
    state: Mutex<TimelineState>,
    progressed: Condvar,
}

impl ManualTimeline {
    /// Create a timeline with nothing signaled and nothing completed.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TimelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Retire queued work up to `value`.
    ///
    /// The GPU cannot complete a value that was never signaled, so progress is
    /// capped at the highest signaled value. Completion never moves backwards.
    pub fn complete(&self, value: u64) {
        let mut state = self.lock();
        let target = value.min(state.signaled);
        if target > state.completed {
            state.completed = target;
            self.progressed.notify_all();
        }
    }

    /// Retire everything signaled so far.
    pub fn complete_all(&self) {
        let mut state = self.lock();
        state.completed = state.signaled;
        self.progressed.notify_all();
    }

    /// Simulate device removal; every current and future wait fails.
    pub fn lose_device(&self) {
        let mut state = self.lock();
        state.device_lost = true;
        warn!("Timeline marked as device lost");
        self.progressed.notify_all();
    }

    /// Highest value requested through [`GpuTimeline::signal`].
    pub fn signaled_value(&self) -> u64 {
        self.lock().signaled
    }

    /// Number of waits that actually had to block.
    pub fn blocking_waits(&self) -> u64 {
        self.lock().blocking_waits
    }
}

impl GpuTimeline for ManualTimeline {
    fn completed_value(&self) -> SyncResult<u64> {
        let state = self.lock();
        if state.device_lost {
            return Err(SyncError::DeviceLost);
        }
        Ok(state.completed)
    }

    fn wait_for(&self, value: u64) -> SyncResult<()> {
        let mut state = self.lock();
        if !state.device_lost && state.completed < value {
            state.blocking_waits += 1;
            debug!(
                "Waiting for fence {} (completed {})",
                value, state.completed
            );
        }
        loop {
            if state.device_lost {
                return Err(SyncError::DeviceLost);
            }
            if state.completed >= value {
                return Ok(());
            }
            state = self
                .progressed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn signal(&self, value: u64) -> SyncResult<()> {
        let mut state = self.lock();
        if state.device_lost {
            return Err(SyncError::DeviceLost);
        }
        state.signaled = state.signaled.max(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_completion_capped_at_signaled() {
        let timeline = ManualTimeline::new();
        timeline.signal(2).unwrap();
        timeline.complete(5);
        assert_eq!(timeline.completed_value().unwrap(), 2);
    }

    #[test]
    fn test_completion_never_regresses() {
        let timeline = ManualTimeline::new();
        timeline.signal(4).unwrap();
        timeline.complete(3);
        timeline.complete(1);
        assert_eq!(timeline.completed_value().unwrap(), 3);
    }

    #[test]
    fn test_wait_on_completed_value_returns_immediately() {
        let timeline = ManualTimeline::new();
        timeline.signal(1).unwrap();
        timeline.complete_all();
        timeline.wait_for(1).unwrap();
        assert_eq!(timeline.blocking_waits(), 0);
    }

    #[test]
    fn test_wait_released_by_other_thread() {
        let timeline = Arc::new(ManualTimeline::new());
        timeline.signal(1).unwrap();

        let gpu = Arc::clone(&timeline);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            gpu.complete(1);
        });

        timeline.wait_for(1).unwrap();
        handle.join().unwrap();
        assert_eq!(timeline.blocking_waits(), 1);
    }

    #[test]
    fn test_device_lost_fails_waiters() {
        let timeline = Arc::new(ManualTimeline::new());
        timeline.signal(1).unwrap();

        let gpu = Arc::clone(&timeline);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            gpu.lose_device();
        });

        assert_eq!(timeline.wait_for(1), Err(SyncError::DeviceLost));
        handle.join().unwrap();
        assert_eq!(timeline.completed_value(), Err(SyncError::DeviceLost));
        assert_eq!(timeline.signal(2), Err(SyncError::DeviceLost));
    }

    #[test]
    fn test_timeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ManualTimeline>();
        assert_send_sync::<Arc<dyn GpuTimeline>>();
    }
}
