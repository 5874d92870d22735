use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::{Receiver, Sender};

use super::{Context, Envelope};
use crate::fault::{Fault, Outcome};
use crate::tracer::{ExitReason, Worker};

/// The worker loop.
///
/// Receives indices until the index queue is closed and drained,
/// cancellation is observed, or a fault is recorded in fail-fast mode.
/// Exactly one envelope is sent for every index processed.
pub(super) fn run<T, F, O>(
    worker: Worker,
    context: Context<'_, T, F>,
    indices: Receiver<usize>,
    results: Sender<Envelope<O::Value, O::Error>>,
) -> ExitReason
where
    F: Fn(&T) -> O,
    O: Outcome,
    O::Value: Default,
{
    let tracer = context.tracer;

    let reason = loop {
        let Ok(index) = indices.recv() else { break ExitReason::Drained };

        if context.cancel.is_cancelled() {
            tracer.abandon_element(worker, index);
            break ExitReason::Cancelled;
        }

        tracer.start_element(worker, index);
        let envelope = apply(context, index);
        let faulted = envelope.fault.is_some();
        results.send(envelope).expect("result queue is only closed after all workers exit");
        tracer.end_element(worker, index, faulted);

        if faulted && context.fail_fast {
            context.cancel.cancel();
            tracer.trigger_fail_fast(worker, index);
            break ExitReason::FailFast;
        }
    };

    tracer.exit_worker(worker, reason);
    reason
}

/// Applies the user function to the element at `index` behind a panic barrier.
fn apply<T, F, O>(context: Context<'_, T, F>, index: usize) -> Envelope<O::Value, O::Error>
where
    F: Fn(&T) -> O,
    O: Outcome,
    O::Value: Default,
{
    let item = context.input.get(index).expect("dispatched index out of bounds");

    match panic::catch_unwind(AssertUnwindSafe(|| (context.f)(item).into_parts())) {
        Ok((value, fault)) => Envelope { index, value, fault: fault.map(Fault::User) },
        Err(payload) => {
            Envelope { index, value: Default::default(), fault: Some(Fault::from_panic(payload)) }
        }
    }
}
