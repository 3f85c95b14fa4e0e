//! The event-delivery boundary. A `Handler` is called synchronously from
//! the driver for every event; returning `ControlFlow::Break` aborts the
//! parse immediately without delivering any further events.
//!
//! `ControlFlow`'s `?`-chaining (`Try`/`FromResidual`) is unstable outside
//! nightly, so the driver uses the `propagate!` macro below instead of `?`
//! to bail out of `run` the moment a handler breaks.

use std::ops::ControlFlow;

use crate::events::{Attribute, EndTag, StartTag, TagPrefix};
use crate::position::Range;
use crate::policy::Policy;

/// Bails out of the enclosing function with the break value the instant a
/// `ControlFlow` is `Break`. Stands in for `?` on `ControlFlow`, which
/// requires the unstable `Try` trait to use directly.
macro_rules! propagate {
    ($expr:expr) => {
        match $expr {
            ::std::ops::ControlFlow::Continue(v) => v,
            ::std::ops::ControlFlow::Break(b) => return ::std::ops::ControlFlow::Break(b),
        }
    };
}

pub(crate) use propagate;

/// Consumes the event stream. `Break` stops the parse; `Continue` lets it
/// proceed. Every method defaults to `Continue(())`, so a handler only
/// needs to implement the events it cares about.
pub trait Handler<P: Policy> {
    /// The value carried out on early exit.
    type Break;

    fn text(&mut self, _doc: &[u8], _range: Range) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn comment(&mut self, _doc: &[u8], _range: Range) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn cdata(&mut self, _doc: &[u8], _range: Range) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn processing(&mut self, _doc: &[u8], _range: Range) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn declaration(&mut self, _doc: &[u8], _range: Range) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn start_tag_prefix(
        &mut self,
        _doc: &[u8],
        _prefix: &TagPrefix<P::TagId>,
    ) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn start_tag_attribute(
        &mut self,
        _doc: &[u8],
        _attribute: &Attribute,
    ) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn start_tag(&mut self, _doc: &[u8], _tag: &StartTag<P::TagId>) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn end_tag_prefix(
        &mut self,
        _doc: &[u8],
        _prefix: &TagPrefix<P::TagId>,
    ) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn end_tag_attribute(
        &mut self,
        _doc: &[u8],
        _attribute: &Attribute,
    ) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn end_tag(&mut self, _doc: &[u8], _tag: &EndTag<P::TagId>) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn end_of_input(&mut self, _doc: &[u8], _open: &[P::TagId]) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }
}

/// A no-op `Handler` that never breaks, useful as a base to override
/// selectively or to measure driver overhead in isolation.
pub struct BaseHandler<B = std::convert::Infallible> {
    _break: std::marker::PhantomData<B>,
}

impl<B> Default for BaseHandler<B> {
    fn default() -> Self {
        BaseHandler {
            _break: std::marker::PhantomData,
        }
    }
}

impl<P: Policy, B> Handler<P> for BaseHandler<B> {
    type Break = B;
}
