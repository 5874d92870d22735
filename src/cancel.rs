//! Cooperative cancellation shared between the caller, the dispatcher and the workers.

use std::sync::atomic::{self, AtomicBool};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// A cloneable, monotonic cancellation signal.
///
/// Tokens form a tree through [`child`](Self::child).
/// Cancelling a token cancels all of its live descendants,
/// while cancelling a child never affects its parent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<Inner>);

#[derive(Debug, Default)]
struct Inner {
    /// Fast path for [`CancelToken::is_cancelled`]; only set while holding `state`.
    flag:     AtomicBool,
    state:    Mutex<State>,
    condvar:  Condvar,
    parent:   Option<CancelToken>,
    deadline: Option<Instant>,
}

#[derive(Debug, Default)]
struct State {
    cancelled: bool,
    children:  Vec<Weak<Inner>>,
}

impl CancelToken {
    /// Creates a root token that is only cancelled by [`cancel`](Self::cancel).
    pub fn new() -> Self { Self::default() }

    /// Derives a token that is cancelled together with `self`.
    pub fn child(&self) -> Self { self.derive(None) }

    /// Derives a token that is cancelled together with `self` or once `deadline` passes.
    pub fn with_deadline(&self, deadline: Instant) -> Self { self.derive(Some(deadline)) }

    /// Derives a token that is cancelled together with `self` or after `timeout` elapses.
    ///
    /// A `timeout` too large to be represented as an [`Instant`] sets no deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.child(),
        }
    }

    fn derive(&self, deadline: Option<Instant>) -> Self {
        let deadline = match (self.0.deadline, deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        let mut state = self.0.state.lock();
        let child = Arc::new(Inner {
            flag: AtomicBool::new(state.cancelled),
            state: Mutex::new(State { cancelled: state.cancelled, children: Vec::new() }),
            condvar: Condvar::new(),
            parent: Some(self.clone()),
            deadline,
        });
        if !state.cancelled {
            state.children.retain(|weak| weak.strong_count() > 0);
            state.children.push(Arc::downgrade(&child));
        }
        Self(child)
    }

    /// Cancels this token and all of its live descendants.
    ///
    /// Cancelling an already cancelled token has no effect.
    pub fn cancel(&self) { self.0.cancel(); }

    /// Whether this token, one of its ancestors, or a deadline has triggered cancellation.
    pub fn is_cancelled(&self) -> bool {
        if self.0.flag.load(atomic::Ordering::Acquire) {
            return true;
        }

        let expired = self.0.deadline.map_or(false, |deadline| Instant::now() >= deadline);
        let parent_cancelled = self.0.parent.as_ref().map_or(false, |parent| parent.is_cancelled());
        if expired || parent_cancelled {
            self.0.cancel();
            return true;
        }

        false
    }

    /// Blocks until this token is cancelled or `timeout` elapses.
    ///
    /// Returns whether the token is cancelled.
    ///
    /// A `timeout` too large to be represented as an [`Instant`] waits without a time limit.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let until = match (Instant::now().checked_add(timeout), self.0.deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        let mut state = self.0.state.lock();
        while !state.cancelled {
            match until {
                Some(until) => {
                    if self.0.condvar.wait_until(&mut state, until).timed_out() {
                        break;
                    }
                }
                None => self.0.condvar.wait(&mut state),
            }
        }
        drop(state);

        self.is_cancelled()
    }
}

impl Inner {
    fn cancel(&self) {
        let children = {
            let mut state = self.state.lock();
            if state.cancelled {
                return;
            }
            state.cancelled = true;
            self.flag.store(true, atomic::Ordering::Release);
            self.condvar.notify_all();
            std::mem::take(&mut state.children)
        };

        for child in children.iter().filter_map(Weak::upgrade) {
            child.cancel();
        }
    }
}

static_assertions::assert_impl_all!(CancelToken: Send, Sync);
