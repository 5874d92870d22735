//! Per-element faults and the value/fault pair returned by user functions.

use std::any::Any;

/// A fault recorded for one input element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault<E> {
    /// The user function returned a fault for the element.
    #[error("{0}")]
    User(E),
    /// The user function panicked while processing the element.
    ///
    /// The string is the panic payload if it was a `&str` or `String`.
    #[error("panic: {0}")]
    Panic(String),
}

impl<E> Fault<E> {
    /// Converts a payload caught by [`std::panic::catch_unwind`].
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => message.to_string(),
                Err(_) => String::from("<non-string panic payload>"),
            },
        };
        Self::Panic(message)
    }

    /// Whether this fault was caused by a panic.
    pub fn is_panic(&self) -> bool { matches!(self, Self::Panic(_)) }

    /// Returns the user fault, if any.
    pub fn as_user(&self) -> Option<&E> {
        match self {
            Self::User(err) => Some(err),
            Self::Panic(_) => None,
        }
    }

    /// Consumes the fault and returns the user fault, if any.
    pub fn into_user(self) -> Option<E> {
        match self {
            Self::User(err) => Some(err),
            Self::Panic(_) => None,
        }
    }
}

/// The return type of a user function: a value and an optional fault.
///
/// Both parts are recorded.
/// A faulted element still has its value placed in the output.
pub trait Outcome {
    /// The value placed in the output slot.
    type Value;
    /// The fault type reported by the function.
    type Error;

    /// Splits the outcome into its value and its fault.
    fn into_parts(self) -> (Self::Value, Option<Self::Error>);
}

/// An `Err` yields the default value, since there is nothing else to place in the output.
impl<R: Default, E> Outcome for Result<R, E> {
    type Value = R;
    type Error = E;

    fn into_parts(self) -> (R, Option<E>) {
        match self {
            Ok(value) => (value, None),
            Err(err) => (R::default(), Some(err)),
        }
    }
}

impl<R, E> Outcome for (R, Option<E>) {
    type Value = R;
    type Error = E;

    fn into_parts(self) -> (R, Option<E>) { self }
}
