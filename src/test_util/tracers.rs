use std::sync::atomic::{self, AtomicUsize};

use crate::tracer::{Thread, Tracer, Worker};

/// Collects the maximum number of elements processed concurrently.
#[derive(Debug, Default)]
pub struct MaxConcurrencyTracer {
    current: AtomicUsize,
    max:     AtomicUsize,
}

impl MaxConcurrencyTracer {
    pub fn max(&self) -> usize { self.max.load(atomic::Ordering::SeqCst) }
}

impl Tracer for MaxConcurrencyTracer {
    fn start_element(&self, _worker: Worker, _index: usize) {
        let value = self.current.fetch_add(1, atomic::Ordering::SeqCst);
        self.max.fetch_max(value + 1, atomic::Ordering::SeqCst);
    }

    fn end_element(&self, _worker: Worker, _index: usize, _faulted: bool) {
        self.current.fetch_sub(1, atomic::Ordering::SeqCst);
    }
}

/// Counts the threads started and still alive for a call.
#[derive(Debug, Default)]
pub struct LiveThreadTracer {
    started: AtomicUsize,
    live:    AtomicUsize,
}

impl LiveThreadTracer {
    pub fn started(&self) -> usize { self.started.load(atomic::Ordering::SeqCst) }

    pub fn live(&self) -> usize { self.live.load(atomic::Ordering::SeqCst) }
}

impl Tracer for LiveThreadTracer {
    fn start_thread(&self, _thread: Thread) {
        self.started.fetch_add(1, atomic::Ordering::SeqCst);
        self.live.fetch_add(1, atomic::Ordering::SeqCst);
    }

    fn end_thread(&self, _thread: Thread) { self.live.fetch_sub(1, atomic::Ordering::SeqCst); }
}
