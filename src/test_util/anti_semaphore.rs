use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// A synchronization util that blocks until sufficiently many threads are waiting concurrently.
///
/// This is used for testing that workers run concurrently
/// (in contrast to one blocking the other).
#[derive(Debug)]
pub struct AntiSemaphore {
    saturation: usize,
    lock:       Mutex<AntiSemaphoreInner>,
    condvar:    Condvar,
}

#[derive(Debug)]
struct AntiSemaphoreInner {
    current:    usize,
    generation: usize,
}

impl AntiSemaphore {
    /// Creates a new semaphore.
    /// `saturation` is the number of threads that must wait together before any is released.
    pub fn new(saturation: usize) -> Self {
        Self {
            saturation,
            lock: Mutex::new(AntiSemaphoreInner { current: 0, generation: 0 }),
            condvar: Condvar::new(),
        }
    }

    /// Blocks until the semaphore is saturated.
    ///
    /// # Panics
    /// Panics if the semaphore is not saturated within 5 seconds.
    pub fn wait(&self) {
        let mut lock = self.lock.lock();
        log::trace!(
            "AntiSemaphore(current: {}, saturation: {}).wait()",
            lock.current,
            self.saturation
        );
        lock.current += 1;

        if lock.current == self.saturation {
            lock.current = 0;
            lock.generation += 1;
            self.condvar.notify_all();
            return;
        }

        let generation = lock.generation;
        while lock.generation == generation {
            let result = self.condvar.wait_for(&mut lock, Duration::from_secs(5));
            if result.timed_out() {
                panic!("Deadlock: AntiSemaphore not saturated for more than 5 seconds");
            }
        }
    }
}
