use crossbeam_channel::Sender;

use crate::tracer::Tracer;
use crate::CancelToken;

/// Summary of a dispatcher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Dispatched {
    /// The number of indices enqueued. They are exactly `0..count`.
    pub(super) count:     usize,
    /// Whether dispatching stopped early because of cancellation.
    pub(super) cancelled: bool,
}

/// Enqueues `0..len` in order until cancellation is observed,
/// then closes the index queue by dropping `indices`.
pub(super) fn run(
    len: usize,
    cancel: &CancelToken,
    tracer: &dyn Tracer,
    indices: Sender<usize>,
) -> Dispatched {
    let mut dispatched = Dispatched { count: 0, cancelled: false };

    for index in 0..len {
        if cancel.is_cancelled() {
            dispatched.cancelled = true;
            break;
        }

        tracer.dispatch(index);
        if indices.send(index).is_err() {
            // every receiver is gone, nobody would process further indices
            break;
        }
        dispatched.count += 1;
    }

    drop(indices);
    tracer.stop_dispatch(dispatched.count, dispatched.cancelled);

    dispatched
}
