use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;
use parking_lot::Mutex;

use crate::tracer::{ExitReason, Tracer, Worker};

/// Records events and ensures that they are in the correct order.
pub struct EventTracer<T: fmt::Debug + Eq + Hash> {
    dependencies: HashMap<T, Vec<T>>,
    seen:         Mutex<IndexSet<T>>,
}

impl<T: fmt::Debug + Eq + Hash> EventTracer<T> {
    /// Creates a new event tracer that ensures `b` happens after `a` for each `(a, b)` input.
    pub fn new(orders: impl IntoIterator<Item = (T, T)>) -> Self {
        let mut dependencies: HashMap<T, Vec<T>> = HashMap::new();
        for (before, after) in orders {
            dependencies.entry(after).or_default().push(before);
        }
        let seen = Mutex::new(IndexSet::new());

        Self { dependencies, seen }
    }

    /// Records that `event` has happened.
    ///
    /// # Panics
    /// Panics if the same `event` was sent twice or a dependency is not satisfied.
    pub fn trace(&self, event: T) {
        let mut seen = self.seen.lock();

        if let Some(deps) = self.dependencies.get(&event) {
            for dep in deps {
                assert!(seen.contains(dep), "{:?} should happen after {:?}", event, dep);
            }
        }

        let (index, new) = seen.insert_full(event);
        assert!(
            new,
            "{:?} is inserted twice",
            seen.get_index(index).expect("insert_full should return valid index")
        );
    }

    /// Returns the events observed so far, in order of occurrence.
    pub fn events(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.seen.lock().iter().cloned().collect()
    }
}

/// An engine event keyed by what must happen at most once per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Dispatch(usize),
    StopDispatch { dispatched: usize, cancelled: bool },
    Start(usize),
    End(usize),
    Abandon(usize),
    FailFast(usize),
    Exit(Worker, ExitReason),
}

impl EventTracer<Event> {
    /// Creates a tracer that checks the per-element lifecycle of an input of `len` elements:
    /// indices are dispatched in order,
    /// and each index is dispatched before it is started or abandoned,
    /// and started before it ends.
    pub fn for_elements(len: usize) -> Self {
        let orders = (0..len).flat_map(|index| {
            let in_order =
                index.checked_sub(1).map(|prev| (Event::Dispatch(prev), Event::Dispatch(index)));
            [
                (Event::Dispatch(index), Event::Start(index)),
                (Event::Dispatch(index), Event::Abandon(index)),
                (Event::Start(index), Event::End(index)),
            ]
            .into_iter()
            .chain(in_order)
        });
        Self::new(orders)
    }

    /// Counts the recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.seen.lock().iter().filter(|event| pred(event)).count()
    }
}

impl Tracer for EventTracer<Event> {
    fn dispatch(&self, index: usize) { self.trace(Event::Dispatch(index)); }

    fn stop_dispatch(&self, dispatched: usize, cancelled: bool) {
        self.trace(Event::StopDispatch { dispatched, cancelled });
    }

    fn start_element(&self, _worker: Worker, index: usize) { self.trace(Event::Start(index)); }

    fn end_element(&self, _worker: Worker, index: usize, _faulted: bool) {
        self.trace(Event::End(index));
    }

    fn abandon_element(&self, _worker: Worker, index: usize) { self.trace(Event::Abandon(index)); }

    fn trigger_fail_fast(&self, _worker: Worker, index: usize) {
        self.trace(Event::FailFast(index));
    }

    fn exit_worker(&self, worker: Worker, reason: ExitReason) {
        self.trace(Event::Exit(worker, reason));
    }
}
