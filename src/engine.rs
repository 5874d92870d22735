//! The engine runs a user function over every element of a slice on a bounded worker pool.
//!
//! A call proceeds in three phases:
//! the dispatcher enqueues indices in input order on the calling thread,
//! workers apply the user function to each received index and enqueue an [`Envelope`],
//! and after all workers have terminated the collector places each envelope at its index.
//!
//! Both queues have a capacity equal to the input length,
//! so enqueueing never blocks.

use crossbeam_channel::Receiver;

use crate::config::Config;
use crate::fault::{Fault, Outcome};
use crate::tracer::{Thread, Tracer, Worker};
use crate::CancelToken;

mod collector;

mod dispatcher;
use dispatcher::Dispatched;

mod worker;


/// The outcome of one element, tagged with its input index.
pub(crate) struct Envelope<R, E> {
    pub(crate) index: usize,
    pub(crate) value: R,
    pub(crate) fault: Option<Fault<E>>,
}

/// The state shared by the dispatcher and all workers of one call.
struct Context<'t, T, F> {
    input:     &'t [T],
    f:         &'t F,
    cancel:    &'t CancelToken,
    fail_fast: bool,
    tracer:    &'t dyn Tracer,
}

impl<'t, T, F> Clone for Context<'t, T, F> {
    fn clone(&self) -> Self { *self }
}

impl<'t, T, F> Copy for Context<'t, T, F> {}

type Results<O> = Receiver<Envelope<<O as Outcome>::Value, <O as Outcome>::Error>>;

/// Applies `f` to every element of `input` and returns the outputs in input order,
/// together with the faults of all processed elements in no particular order.
pub(crate) fn run<T, F, O>(
    input: &[T],
    f: &F,
    config: &Config,
) -> (Vec<O::Value>, Vec<Fault<O::Error>>)
where
    T: Sync,
    F: Fn(&T) -> O + Sync,
    O: Outcome,
    O::Value: Default + Send,
    O::Error: Send,
{
    let len = input.len();
    let workers = config.workers_for(len);
    let tracer = &*config.tracer;

    tracer.start_map(len, workers);
    if len == 0 {
        tracer.end_map(0, 0);
        return (Vec::new(), Vec::new());
    }

    let cancel = match &config.cancel {
        Some(parent) => parent.child(),
        None => CancelToken::new(),
    };

    log::debug!("Mapping {len} elements with {workers} workers (fail_fast: {})", config.fail_fast);

    let context = Context { input, f, cancel: &cancel, fail_fast: config.fail_fast, tracer };

    let (results, dispatched) = match run_threaded::<T, F, O>(context, workers) {
        Ok(ret) => ret,
        Err(err) => {
            log::error!("Cannot create worker pool ({err}), running on the calling thread");
            run_on_caller::<T, F, O>(context)
        }
    };

    let (output, faults) = collector::collect(len, &results);

    log::debug!(
        "Mapped {len} elements: {} dispatched, {} faults, cancelled: {}",
        dispatched.count,
        faults.len(),
        dispatched.cancelled || cancel.is_cancelled(),
    );
    tracer.end_map(len, faults.len());

    (output, faults)
}

/// Runs the dispatcher on the calling thread and `workers` workers on a scoped pool.
///
/// All pool threads have been joined when this function returns.
fn run_threaded<T, F, O>(
    context: Context<'_, T, F>,
    workers: usize,
) -> Result<(Results<O>, Dispatched), rayon::ThreadPoolBuildError>
where
    T: Sync,
    F: Fn(&T) -> O + Sync,
    O: Outcome,
    O::Value: Default + Send,
    O::Error: Send,
{
    let len = context.input.len();
    let (index_tx, index_rx) = crossbeam_channel::bounded(len);
    let (result_tx, result_rx) = crossbeam_channel::bounded(len);
    let tracer = context.tracer;

    let dispatched = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("parcol worker #{}", i))
        .build_scoped(
            |thread| {
                let id = Thread::Pool(thread.index());
                tracer.start_thread(id);
                thread.run();
                tracer.end_thread(id);
            },
            |pool| {
                pool.in_place_scope(|scope| {
                    for id in 0..workers {
                        let index_rx = index_rx.clone();
                        let result_tx = result_tx.clone();
                        scope.spawn(move |_| {
                            worker::run::<T, F, O>(Worker(id), context, index_rx, result_tx);
                        });
                    }

                    dispatcher::run(len, context.cancel, tracer, index_tx)
                })
            },
        )?;

    // close the result queue; every worker clone has been dropped with its job
    drop(result_tx);

    Ok((result_rx, dispatched))
}

/// Runs the dispatcher and then a single worker on the calling thread.
fn run_on_caller<T, F, O>(context: Context<'_, T, F>) -> (Results<O>, Dispatched)
where
    F: Fn(&T) -> O,
    O: Outcome,
    O::Value: Default,
{
    let len = context.input.len();
    let (index_tx, index_rx) = crossbeam_channel::bounded(len);
    let (result_tx, result_rx) = crossbeam_channel::bounded(len);

    let dispatched = dispatcher::run(len, context.cancel, context.tracer, index_tx);

    context.tracer.start_thread(Thread::Caller);
    worker::run::<T, F, O>(Worker(0), context, index_rx, result_tx);
    context.tracer.end_thread(Thread::Caller);

    (result_rx, dispatched)
}
