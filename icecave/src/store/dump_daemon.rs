use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use timer::{Guard, Timer};

/// Periodic dump scheduler owned by a single instance.
///
/// The daemon is a two-state machine: **Running** from construction until
/// [`stop`](DumpDaemon::stop), then **Stopped** forever. While Running, the
/// repeating timer fires the task every interval on the timer thread, so
/// consecutive periodic dumps never overlap each other. Stopping drops the
/// timer guard, which cancels the pending fire.
///
/// Dropping the daemon stops it as a backstop, so an instance that is
/// discarded without an explicit shutdown does not leave a timer running.
pub struct DumpDaemon {
    timer: Timer,
    guard: Mutex<Option<Guard>>,
    running: AtomicBool,
}

impl DumpDaemon {
    /// Starts the daemon, firing `task` every `interval` until stopped.
    ///
    /// The first fire happens one interval after construction; the caller
    /// is expected to perform the immediate initial dump itself.
    pub fn start<F>(interval: Duration, task: F) -> Self
    where
        F: 'static + FnMut() + Send,
    {
        let daemon = DumpDaemon {
            timer: Timer::new(),
            guard: Mutex::new(None),
            running: AtomicBool::new(true),
        };
        daemon.schedule(interval, task);
        daemon
    }

    fn schedule<F>(&self, interval: Duration, task: F)
    where
        F: 'static + FnMut() + Send,
    {
        match chrono::Duration::from_std(interval) {
            Ok(chrono_interval) => {
                let guard = self.timer.schedule_repeating(chrono_interval, task);
                *self.guard.lock() = Some(guard);
            }
            Err(e) => {
                log::error!(
                    "Dump interval {:?} is out of range ({}), periodic dumps disabled",
                    interval,
                    e
                );
            }
        }
    }

    /// Transitions to Stopped and cancels the pending fire.
    ///
    /// Returns true on the transition, false if the daemon was already
    /// stopped. Only the caller that observes the transition should run the
    /// final shutdown dump, which makes shutdown idempotent-safe.
    pub fn stop(&self) -> bool {
        let was_running = self.running.swap(false, Ordering::AcqRel);
        if was_running {
            self.guard.lock().take();
        }
        was_running
    }

    /// True while the periodic schedule is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for DumpDaemon {
    fn drop(&mut self) {
        self.stop();
    }
}
