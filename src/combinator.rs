//! The public combinators.
//!
//! [`map`] drives the engine directly;
//! [`filter`] and [`for_each`] are expressed in terms of [`map`].

use crate::config::{Config, Opt};
use crate::engine;
use crate::fault::{Fault, Outcome};


/// Applies `f` to every element of `input` in parallel.
///
/// Returns a vector position-aligned with `input` and the faults of all processed elements.
/// The fault list is in no particular order.
///
/// A slot holds the default value if its element was never processed
/// (due to cancellation or fail-fast) or if `f` panicked on it.
/// If `f` returns a value together with a fault (see [`Outcome`]),
/// the value is still placed in the output.
///
/// Cancellation is not a fault and adds nothing to the fault list.
///
/// # Example
/// ```
/// let input = [1, 2, 3];
/// let (doubled, faults) =
///     parcol::map(&input, |&x| Ok::<_, String>(x * 2), [parcol::with_workers(2)]);
/// assert_eq!(doubled, [2, 4, 6]);
/// assert!(faults.is_empty());
/// ```
pub fn map<T, F, O>(
    input: &[T],
    f: F,
    opts: impl IntoIterator<Item = Opt>,
) -> (Vec<O::Value>, Vec<Fault<O::Error>>)
where
    T: Sync,
    F: Fn(&T) -> O + Sync,
    O: Outcome,
    O::Value: Default + Send,
    O::Error: Send,
{
    let config = Config::from_opts(opts);
    engine::run(input, &f, &config)
}

/// Returns the elements of `input` for which `pred` returns `true`, in input order.
///
/// The predicate runs in parallel through [`map`].
/// An element is kept exactly when the predicate returned `true`,
/// regardless of whether its value equals the default of `T`.
/// A panicking predicate keeps nothing and records a fault.
///
/// # Example
/// ```
/// let input = [0, 1, 2, 3, 4];
/// let (even, faults) = parcol::filter(&input, |&x| Ok::<_, String>(x % 2 == 0), []);
/// assert_eq!(even, [0, 2, 4]);
/// assert!(faults.is_empty());
/// ```
pub fn filter<T, F, O>(
    input: &[T],
    pred: F,
    opts: impl IntoIterator<Item = Opt>,
) -> (Vec<T>, Vec<Fault<O::Error>>)
where
    T: Clone + Sync,
    F: Fn(&T) -> O + Sync,
    O: Outcome<Value = bool>,
    O::Error: Send,
{
    let (keep, faults) = map(input, pred, opts);

    let kept =
        input.iter().zip(keep).filter(|&(_, keep)| keep).map(|(item, _)| item.clone()).collect();
    (kept, faults)
}

/// Runs `f` on every element of `input` in parallel and returns the faults.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let sum = AtomicUsize::new(0);
/// let faults = parcol::for_each(&[1, 2, 3], |&x| {
///     sum.fetch_add(x, Ordering::SeqCst);
///     Ok::<_, String>(())
/// }, []);
/// assert!(faults.is_empty());
/// assert_eq!(sum.into_inner(), 6);
/// ```
pub fn for_each<T, F, O>(
    input: &[T],
    f: F,
    opts: impl IntoIterator<Item = Opt>,
) -> Vec<Fault<O::Error>>
where
    T: Sync,
    F: Fn(&T) -> O + Sync,
    O: Outcome<Value = ()>,
    O::Error: Send,
{
    let (_, faults) = map(input, f, opts);
    faults
}
