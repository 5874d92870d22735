//! Order-preserving parallel combinators over slices.
//!
//! parcol applies a user function to every element of a slice
//! on a bounded pool of worker threads
//! and returns the results in the same positions as their inputs.
//!
//! # Combinators
//! - [`map`] returns one output per input element, plus the faults of failed elements.
//! - [`filter`] returns the elements accepted by a predicate, in input order.
//! - [`for_each`] only returns the faults.
//!
//! The user function returns an [`Outcome`], usually a `Result`.
//! Faults are collected instead of aborting the call:
//! a returned error is recorded as [`Fault::User`],
//! and a panic is caught and recorded as [`Fault::Panic`],
//! which displays as `panic: <message>`.
//! A panic only affects the element that raised it.
//! (This requires unwinding; with `panic = "abort"`, a panicking element aborts the process.)
//! A caught panic still runs the global panic hook,
//! so the default hook prints its message to stderr.
//! Install a custom hook with [`std::panic::set_hook`] to silence it.
//!
//! # Options
//! Each call accepts a list of [`Opt`]s:
//! - [`with_workers`] bounds the number of worker threads.
//!   Without it, one worker is started per element, up to [`config::MAX_DEFAULT_WORKERS`].
//! - [`with_cancel`] observes a [`CancelToken`].
//!   Once it is cancelled, no further elements are started
//!   and the unprocessed output slots keep their default value.
//!   Cancellation is not a fault.
//! - [`with_fail_fast`] cancels the remaining work after the first fault.
//! - [`with_tracer`] receives the internal events of the call, see [`tracer`].
//!
//! ```
//! use std::time::Duration;
//!
//! let deadline = parcol::CancelToken::new().with_timeout(Duration::from_secs(10));
//! let (lengths, faults) = parcol::map(
//!     &["a", "bb", "ccc"],
//!     |s| Ok::<_, String>(s.len()),
//!     [parcol::with_workers(2), parcol::with_cancel(deadline)],
//! );
//! assert_eq!(lengths, [1, 2, 3]);
//! assert!(faults.is_empty());
//! ```
//!
//! Every thread started by a call is joined before the call returns.

#![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(doc, warn(missing_docs))]

mod cancel;
pub use cancel::CancelToken;

mod combinator;
pub use combinator::{filter, for_each, map};

pub mod config;
pub use config::{with_cancel, with_fail_fast, with_tracer, with_workers, Config, Opt};

mod engine;

mod fault;
pub use fault::{Fault, Outcome};

pub mod tracer;
pub use tracer::Tracer;

#[cfg(test)]
pub(crate) mod test_util;
