#![allow(missing_docs)]

use std::env;

use parking_lot::Once;

mod anti_semaphore;
pub use anti_semaphore::AntiSemaphore;

mod event_tracer;
pub use event_tracer::{Event, EventTracer};

mod tracers;
pub use tracers::{LiveThreadTracer, MaxConcurrencyTracer};

// Repeat concurrent tests to increase the chance of catching random bugs.
// However, do not rely on test repetitions to assert for behavior;
// use more synchronization where practical.
lazy_static::lazy_static! {
    pub static ref CONCURRENT_TEST_REPETITIONS: usize = (|| {
        if let Ok(count) = env::var("CONCURRENT_TEST_REPETITIONS") {
            if let Ok(count) = count.parse::<usize>() {
                return count;
            }
        }

        if env::var("RUST_LOG").is_ok() { 1 } else { 50 }
    })();
}

pub(crate) fn init() {
    static SET_LOGGER_ONCE: Once = Once::new();
    SET_LOGGER_ONCE.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
