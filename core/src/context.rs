//! Seams between the builder and the code that actually performs I/O.
//!
//! # Design
//! The core never opens a socket. A `Context` is whatever the application
//! already owns (an agent, a runtime handle, a test stub) and exposes the
//! `Transport` that knows how to put a `Request` on the wire. The builder
//! borrows the context for the length of one configuration session and only
//! reaches through it in `execute`.

use crate::builder::RequestBuilder;
use crate::error::Error;
use crate::request::Request;

/// Carries a frozen request to the network and returns the reply.
pub trait Transport {
    /// Whatever the transport hands back. The core never looks inside.
    type Reply;

    /// Perform the exchange. Responsible for URL and query composition,
    /// header emission, credentials and body transmission.
    fn dispatch(&self, request: Request) -> Result<Self::Reply, Error>;
}

/// Supplies the transport a request is dispatched through.
pub trait Context {
    type Transport: Transport;

    fn transport(&self) -> &Self::Transport;

    /// Start a builder session bound to this context.
    fn request(&self) -> RequestBuilder<'_, Self>
    where
        Self: Sized,
    {
        RequestBuilder::new(self)
    }
}

/// The reply type produced by a context's transport.
pub type Reply<C> = <<C as Context>::Transport as Transport>::Reply;
