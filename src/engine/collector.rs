use std::iter;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;

use super::Envelope;
use crate::fault::Fault;

/// Drains the closed result queue into an output of `len` slots and a fault list.
///
/// Slots without an envelope keep the default value.
pub(super) fn collect<R: Default, E>(
    len: usize,
    results: &Receiver<Envelope<R, E>>,
) -> (Vec<R>, Vec<Fault<E>>) {
    let mut output: Vec<R> = iter::repeat_with(R::default).take(len).collect();
    // uncontended while draining after the workers have joined
    let faults = Mutex::new(Vec::new());

    #[cfg(debug_assertions)]
    let mut seen = vec![false; len];

    for envelope in results.iter() {
        #[cfg(debug_assertions)]
        {
            let seen = seen.get_mut(envelope.index).expect("envelope index out of bounds");
            assert!(!*seen, "index {} has multiple envelopes", envelope.index);
            *seen = true;
        }

        let slot = output.get_mut(envelope.index).expect("envelope index out of bounds");
        *slot = envelope.value;

        if let Some(fault) = envelope.fault {
            faults.lock().push(fault);
        }
    }

    (output, faults.into_inner())
}
