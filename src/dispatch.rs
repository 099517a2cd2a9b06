//! Ordered, stop-on-first-claim event delegation.
//!
//! Each input event is offered to a fixed list of named handlers. The first
//! handler to return [`Claim::Claimed`] consumes the event and later handlers
//! never see it. A handler error also stops the chain; the caller decides how
//! to recover.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use crate::error::EditorError;

/// Whether a handler consumed the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Claimed,
    Pass,
}

/// A handler over state `S` and event `E`, emitting outputs `A`.
pub type Handler<S, E, A> = fn(&mut S, &E, &mut Vec<A>) -> Result<Claim, EditorError>;

/// A handler with the name reported back by [`try_handlers`].
pub type Route<S, E, A> = (&'static str, Handler<S, E, A>);

/// Outcome of offering one event to a handler chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The named handler claimed the event.
    Claimed(&'static str),
    /// Every handler passed.
    Unclaimed,
    /// The named handler failed; the event is considered consumed.
    Failed { by: &'static str, error: EditorError },
}

impl Dispatch {
    #[must_use]
    pub fn claimed_by(&self) -> Option<&'static str> {
        match self {
            Self::Claimed(name) => Some(name),
            _ => None,
        }
    }
}

/// Offer `event` to `routes` in order, stopping at the first claim or error.
pub fn try_handlers<S, E, A>(state: &mut S, event: &E, out: &mut Vec<A>, routes: &[Route<S, E, A>]) -> Dispatch {
    for (name, handler) in routes {
        match handler(state, event, out) {
            Ok(Claim::Claimed) => return Dispatch::Claimed(name),
            Ok(Claim::Pass) => {}
            Err(error) => return Dispatch::Failed { by: name, error },
        }
    }
    Dispatch::Unclaimed
}
