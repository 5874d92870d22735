//! Exposes testing, profiling and tracing capabilities.

use std::sync::Arc;

/// Defines the [`Tracer`] trait and implements the [`Log`] and [`Aggregate`] types.
///
/// All tracer method parameters must be [`Copy`].
macro_rules! define_tracer {
    (
        $(
            $(#[$meta:meta])*
            fn $name:ident(&self $(, $ident:ident: $ty:ty)* $(,)?);
        )*
    ) => {
        /// A handler that receives the events of a parallel combinator call.
        ///
        /// Every method has an empty default implementation.
        /// Methods are called concurrently from the calling thread and the worker threads.
        pub trait Tracer: Send + Sync {
            $(
                $(#[$meta])*
                #[allow(unused_variables)]
                fn $name(&self, $($ident: $ty,)*) {}
            )*
        }

        impl Tracer for Log {
            $(
                fn $name(&self, $($ident: $ty,)*) {
                    log::log!(self.0, concat!(stringify!($name), "(", $(
                        stringify!($ident),
                        " = {",
                        stringify!($ident),
                        ":?}, ",
                    )* ")"), $($ident = $ident,)*);
                }
            )*
        }

        impl<T: Tracer + ?Sized> Tracer for Arc<T> {
            $(
                fn $name(&self, $($ident: $ty,)*) { (**self).$name($($ident,)*) }
            )*
        }

        impl_tuple_accumulate! {
            @TYPES (T1, T2, T3, T4, T5, T6, T7, T8);
            $(
                @VARS (t1, t2, t3, t4, t5, t6, t7, t8);
                @METHOD {fn $name(&self, $($ident: $ty,)*);}
            )*
        }
    };
}

macro_rules! impl_tuple {
    (
        @TYPES ($($ty:ident),* $(,)?);
        $(
            @VARS ($($vars:ident),* $(,)?);
            @METHOD {fn $name:ident(&self, $($arg_ident:ident: $arg_ty:ty,)*);}
        )*
    ) => {
        impl<$($ty: Tracer),*> Tracer for Aggregate<($($ty,)*)> {
            $(
                fn $name(&self, $($arg_ident: $arg_ty),*) {
                    #[allow(unused_variables)]
                    let args = ($($arg_ident,)*);

                    #[allow(dead_code)]
                    fn call_with_args(tracer: &impl Tracer, ($($arg_ident,)*): ($($arg_ty,)*)) {
                        tracer.$name($($arg_ident,)*);
                    }

                    let Aggregate(($($vars,)*)) = self;
                    $(
                        call_with_args($vars, args);
                    )*
                }
            )*
        }
    };
}

macro_rules! impl_tuple_accumulate {
    (@TYPES (); $(@VARS (); @METHOD {$($body:tt)*})*) => {
        impl_tuple! {
            @TYPES ();
            $(
                @VARS ();
                @METHOD {$($body)*}
            )*
        }
    };
    (
        @TYPES ($first_ty:ident $(, $rest_ty:ident)* $(,)?);
        $(
            @VARS ($first_var:ident $(, $rest_var:ident)* $(,)?);
            @METHOD {$($body:tt)*}
        )*
    ) => {
        impl_tuple! {
            @TYPES ($first_ty $(, $rest_ty)* );
            $(
                @VARS ($first_var $(, $rest_var)*);
                @METHOD {$($body)*}
            )*
        }

        impl_tuple_accumulate! {
            @TYPES ($($rest_ty),*);
            $(
                @VARS ($($rest_var),*);
                @METHOD {$($body)*}
            )*
        }
    };
}

define_tracer! {
    /// A combinator call starts with `workers` worker threads over `len` elements.
    fn start_map(&self, len: usize, workers: usize);

    /// A combinator call returns with `faults` recorded faults.
    fn end_map(&self, len: usize, faults: usize);

    /// A pool thread starts.
    fn start_thread(&self, thread: Thread);

    /// A pool thread is about to terminate.
    fn end_thread(&self, thread: Thread);

    /// The dispatcher is about to enqueue `index`.
    fn dispatch(&self, index: usize);

    /// The dispatcher closed the index queue after enqueueing `dispatched` indices.
    fn stop_dispatch(&self, dispatched: usize, cancelled: bool);

    /// A worker starts applying the user function to the element at `index`.
    fn start_element(&self, worker: Worker, index: usize);

    /// A worker has enqueued the envelope for `index`.
    fn end_element(&self, worker: Worker, index: usize, faulted: bool);

    /// A worker received `index` after cancellation and dropped it without an envelope.
    fn abandon_element(&self, worker: Worker, index: usize);

    /// A fault on `index` triggered fail-fast cancellation.
    fn trigger_fail_fast(&self, worker: Worker, index: usize);

    /// A worker loop returned.
    fn exit_worker(&self, worker: Worker, reason: ExitReason);
}

/// An empty tracer.
pub struct Noop;

impl Tracer for Noop {}

/// Groups multiple tracers into a tuple and dispatches each call to them in serial.
pub struct Aggregate<T>(
    /// A tuple of child tracers to execute in serial.
    pub T,
);

/// A tracer that logs all events.
pub struct Log(
    /// The log level to log events with.
    pub log::Level,
);

/// Identifies a pool thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Thread {
    /// The calling thread, which only runs a worker if the pool could not be created.
    Caller,
    /// A pool thread. The index is in the range `0..workers`.
    Pool(usize),
}

/// Identifies a worker loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Worker(
    /// The index of the worker, in the range `0..workers`.
    pub usize,
);

/// Why a worker loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitReason {
    /// The index queue was closed and drained.
    Drained,
    /// Cancellation was observed after receiving an index.
    Cancelled,
    /// The worker recorded a fault and triggered fail-fast cancellation.
    FailFast,
}
