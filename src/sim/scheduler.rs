//! Single-slot expiration timer
//!
//! One background worker sleeps until the armed deadline and then runs the
//! callback. Arming replaces whatever was pending. Whether a timer fires or is
//! cancelled is decided under the slot lock, so a `cancel` that returns `true`
//! guarantees the callback never runs.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

/// Identifies one `arm` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

type ExpireFn = Box<dyn FnOnce(TimerHandle) + Send>;

struct Pending {
    handle: TimerHandle,
    deadline: Instant,
    on_expire: ExpireFn,
}

#[derive(Default)]
struct Slot {
    pending: Option<Pending>,
    next_handle: u64,
}

enum Wake {
    Rearmed,
    Shutdown,
}

pub struct ExpirationScheduler {
    slot: Arc<Mutex<Slot>>,
    wake: Sender<Wake>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ExpirationScheduler {
    pub fn new() -> Self {
        let slot = Arc::new(Mutex::new(Slot::default()));
        let (wake, rx) = channel::unbounded();
        let worker_slot = Arc::clone(&slot);
        let worker = thread::Builder::new()
            .name("dot-expiration".into())
            .spawn(move || run_worker(worker_slot, rx))
            .map_err(|err| log::error!("failed to spawn expiration worker: {err}"))
            .ok();

        Self {
            slot,
            wake,
            worker: Mutex::new(worker),
        }
    }

    /// Schedule `on_expire` to run once after `delay`, replacing any pending timer
    pub fn arm<F>(&self, delay: Duration, on_expire: F) -> TimerHandle
    where
        F: FnOnce(TimerHandle) + Send + 'static,
    {
        let handle = {
            let mut slot = lock(&self.slot);
            slot.next_handle += 1;
            let handle = TimerHandle(slot.next_handle);
            if let Some(old) = slot.pending.take() {
                log::trace!("timer {:?} replaced by {:?}", old.handle, handle);
            }
            slot.pending = Some(Pending {
                handle,
                deadline: Instant::now() + delay,
                on_expire: Box::new(on_expire),
            });
            handle
        };
        let _ = self.wake.send(Wake::Rearmed);
        handle
    }

    /// Cancel a pending timer. Returns `false` if it already fired, was
    /// replaced, or was cancelled before.
    pub fn cancel(&self, handle: TimerHandle) -> bool {
        let mut slot = lock(&self.slot);
        match &slot.pending {
            Some(pending) if pending.handle == handle => {
                slot.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Whether `handle` is still waiting to fire
    #[cfg(test)]
    fn is_pending(&self, handle: TimerHandle) -> bool {
        lock(&self.slot)
            .pending
            .as_ref()
            .is_some_and(|p| p.handle == handle)
    }

    /// Drop any pending timer and join the worker. Idempotent.
    pub fn shutdown(&self) {
        lock(&self.slot).pending = None;
        let _ = self.wake.send(Wake::Shutdown);
        let worker = self.worker.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(worker) = worker {
            // A callback running on the worker may end up dropping us
            if worker.thread().id() == thread::current().id() {
                return;
            }
            if worker.join().is_err() {
                log::error!("expiration worker panicked");
            }
        }
    }
}

impl Default for ExpirationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ExpirationScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}

fn run_worker(slot: Arc<Mutex<Slot>>, rx: Receiver<Wake>) {
    loop {
        let deadline = lock(&slot).pending.as_ref().map(|p| p.deadline);

        let woke = match deadline {
            Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match woke {
            Ok(Wake::Rearmed) => continue,
            Ok(Wake::Shutdown) | Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => {}
        }

        // Take the timer only if it is still the one we slept on and it is due.
        // Whoever holds the slot lock first wins against `cancel`/`arm`.
        let due = {
            let mut slot = lock(&slot);
            match &slot.pending {
                Some(p) if p.deadline <= Instant::now() => slot.pending.take(),
                _ => None,
            }
        };

        if let Some(pending) = due {
            log::trace!("timer {:?} fired", pending.handle);
            (pending.on_expire)(pending.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counter() -> (Arc<AtomicU32>, impl FnOnce(TimerHandle) + Send + 'static) {
        let count = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&count);
        (count, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_fires_once() {
        let scheduler = ExpirationScheduler::new();
        let (count, cb) = counter();
        let handle = scheduler.arm(Duration::from_millis(30), cb);
        assert!(scheduler.is_pending(handle));
        thread::sleep(Duration::from_millis(200));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending(handle));
        assert!(!scheduler.cancel(handle));
    }

    #[test]
    fn test_cancel_before_fire() {
        let scheduler = ExpirationScheduler::new();
        let (count, cb) = counter();
        let handle = scheduler.arm(Duration::from_millis(100), cb);
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        thread::sleep(Duration::from_millis(250));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_arm_replaces_pending() {
        let scheduler = ExpirationScheduler::new();
        let (first, cb1) = counter();
        let (second, cb2) = counter();
        let h1 = scheduler.arm(Duration::from_millis(50), cb1);
        let h2 = scheduler.arm(Duration::from_millis(80), cb2);
        assert_ne!(h1, h2);
        assert!(!scheduler.is_pending(h1));
        thread::sleep(Duration::from_millis(300));
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rearm_with_shorter_delay_wakes_worker() {
        let scheduler = ExpirationScheduler::new();
        let (long, cb1) = counter();
        let (short, cb2) = counter();
        scheduler.arm(Duration::from_secs(30), cb1);
        scheduler.arm(Duration::from_millis(20), cb2);
        thread::sleep(Duration::from_millis(200));
        assert_eq!(long.load(Ordering::SeqCst), 0);
        assert_eq!(short.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_receives_its_handle() {
        let scheduler = ExpirationScheduler::new();
        let (tx, rx) = channel::bounded(1);
        let handle = scheduler.arm(Duration::from_millis(10), move |h| {
            let _ = tx.send(h);
        });
        let fired = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(fired, handle);
    }

    #[test]
    fn test_shutdown_drops_pending() {
        let scheduler = ExpirationScheduler::new();
        let (count, cb) = counter();
        scheduler.arm(Duration::from_millis(20), cb);
        scheduler.shutdown();
        scheduler.shutdown();
        thread::sleep(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
