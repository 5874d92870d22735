//! Per-call configuration, built from a list of [`Opt`]s.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::tracer::{self, Tracer};
use crate::CancelToken;

/// The worker count ceiling applied when [`with_workers`] is not given.
///
/// Without an explicit worker count, one worker is requested per element,
/// which is unreasonable for large inputs.
pub const MAX_DEFAULT_WORKERS: usize = 256;

/// The configuration of a single combinator call.
pub struct Config {
    pub(crate) workers:   Option<NonZeroUsize>,
    pub(crate) cancel:    Option<CancelToken>,
    pub(crate) fail_fast: bool,
    pub(crate) tracer:    Arc<dyn Tracer>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers:   None,
            cancel:    None,
            fail_fast: false,
            tracer:    Arc::new(tracer::Log(log::Level::Trace)),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("workers", &self.workers)
            .field("cancel", &self.cancel)
            .field("fail_fast", &self.fail_fast)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Applies `opts` in order over the default configuration.
    pub fn from_opts(opts: impl IntoIterator<Item = Opt>) -> Self {
        let mut config = Self::default();
        for opt in opts {
            (opt.0)(&mut config);
        }
        config
    }

    /// The number of workers to launch for an input of `len` elements.
    ///
    /// Never exceeds `len`, since surplus workers would exit without doing any work.
    pub fn workers_for(&self, len: usize) -> usize {
        match self.workers {
            Some(workers) => workers.get().min(len),
            None => len.min(MAX_DEFAULT_WORKERS),
        }
    }

    /// Whether the first fault cancels the remaining work.
    pub fn fail_fast(&self) -> bool { self.fail_fast }
}

/// An option transformer applied to the default [`Config`].
///
/// Options are only created by the `with_*` functions of this module.
///
/// ```compile_fail
/// let opt = parcol::Opt::new(|_| {});
/// ```
pub struct Opt(Box<dyn FnOnce(&mut Config) + Send>);

impl Opt {
    /// Creates an option from an arbitrary transformer.
    pub(crate) fn new(f: impl FnOnce(&mut Config) + Send + 'static) -> Self { Self(Box::new(f)) }
}

/// Limits the number of concurrent workers to `n`.
///
/// `n == 0` is ignored.
pub fn with_workers(n: usize) -> Opt {
    Opt::new(move |config| {
        if let Some(n) = NonZeroUsize::new(n) {
            config.workers = Some(n);
        }
    })
}

/// Observes `token` for cancellation.
///
/// The call derives a child token from `token`,
/// so fail-fast cancellation never cancels `token` itself.
pub fn with_cancel(token: CancelToken) -> Opt {
    Opt::new(move |config| config.cancel = Some(token))
}

/// Cancels the remaining work as soon as one element faults.
pub fn with_fail_fast() -> Opt { Opt::new(|config| config.fail_fast = true) }

/// Sends the events of the call to `tracer` instead of the default [`tracer::Log`].
pub fn with_tracer(tracer: impl Tracer + 'static) -> Opt {
    let tracer: Arc<dyn Tracer> = Arc::new(tracer);
    Opt::new(move |config| config.tracer = tracer)
}

static_assertions::assert_impl_all!(Config: Send, Sync);
static_assertions::assert_impl_all!(Opt: Send);
