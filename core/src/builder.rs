//! Fluent, single-use request builder.
//!
//! # Design
//! A `RequestBuilder` accumulates one request's configuration and freezes it
//! with `build` (or `build` + dispatch with `execute`). Misuse is a bug in the
//! calling code, not a condition to recover from, so every precondition is an
//! `assert!` that panics at the offending call:
//!
//! - the method and URL are set exactly once, by `get`/`post`/`put`/`delete`;
//! - at most one body is attached, by `data`, `file` or `json`;
//! - `disable_compression` and `basic_authentication` come before the body;
//! - credentials are set at most once;
//! - after `build` or `execute` the builder accepts no further calls.
//!
//! Headers and arguments are stored in `Option`s that are only allocated by
//! the first insert. Unless compression is disabled, `build` appends
//! `Accept-Encoding: gzip` when the caller has not supplied an
//! `Accept-Encoding` header of their own (name compared case-insensitively).

use std::path::PathBuf;

use log::{debug, trace};
use serde::Serialize;

use crate::body::Body;
use crate::context::{Context, Reply};
use crate::error::Error;
use crate::http::{Args, Argument, Credentials, Headers, Method, ACCEPT_ENCODING};
use crate::json::{self, SerializeOptions};
use crate::request::Request;

const DEFAULT_ACCEPT_ENCODING: &str = "gzip";

/// Accumulates the configuration of a single request.
///
/// Borrows the execution context for the whole session; the context is only
/// consulted by `execute`.
pub struct RequestBuilder<'c, C: ?Sized> {
    ctx: &'c C,
    target: Option<(Method, String)>,
    headers: Option<Headers>,
    args: Option<Args>,
    auth: Option<Credentials>,
    body: Option<Body>,
    compression: bool,
    built: bool,
}

impl<'c, C: ?Sized> RequestBuilder<'c, C> {
    pub fn new(ctx: &'c C) -> Self {
        Self {
            ctx,
            target: None,
            headers: None,
            args: None,
            auth: None,
            body: None,
            compression: true,
            built: false,
        }
    }

    pub fn get(&mut self, url: impl Into<String>) -> &mut Self {
        self.target(Method::Get, url.into())
    }

    pub fn post(&mut self, url: impl Into<String>) -> &mut Self {
        self.target(Method::Post, url.into())
    }

    pub fn put(&mut self, url: impl Into<String>) -> &mut Self {
        self.target(Method::Put, url.into())
    }

    pub fn delete(&mut self, url: impl Into<String>) -> &mut Self {
        self.target(Method::Delete, url.into())
    }

    fn target(&mut self, method: Method, url: String) -> &mut Self {
        self.assert_configuring();
        assert!(self.target.is_none(), "request method and URL already set");
        self.target = Some((method, url));
        self
    }

    /// Add a header. Repeating a name adds another entry.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.assert_configuring();
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name, value);
        self
    }

    /// Append a query argument. Integers are stored as decimal text.
    pub fn argument(&mut self, name: impl Into<String>, value: impl Into<Argument>) -> &mut Self {
        self.assert_configuring();
        self.args
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into().into_string()));
        self
    }

    /// Use `data` as the body.
    pub fn data(&mut self, data: impl Into<Vec<u8>>) -> &mut Self {
        self.set_body(Body::Bytes(data.into()))
    }

    /// Stream the body from `path` when the request is dispatched.
    pub fn file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.set_body(Body::File(path.into()))
    }

    /// Use the JSON encoding of `value` as the body, leaving out empty
    /// members.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self, Error> {
        self.json_with(value, SerializeOptions::default())
    }

    /// Use the JSON encoding of `value` as the body.
    pub fn json_with<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
        options: SerializeOptions,
    ) -> Result<&mut Self, Error> {
        self.assert_no_body();
        let bytes = json::to_vec(value, options)?;
        Ok(self.set_body(Body::Bytes(bytes)))
    }

    /// Do not advertise gzip support on this request.
    pub fn disable_compression(&mut self) -> &mut Self {
        self.assert_configuring();
        assert!(
            self.body.is_none(),
            "compression must be disabled before the body is set"
        );
        self.compression = false;
        self
    }

    pub fn basic_authentication(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> &mut Self {
        self.assert_configuring();
        assert!(
            self.body.is_none(),
            "basic authentication must be set before the body is set"
        );
        assert!(self.auth.is_none(), "basic authentication already set");
        self.auth = Some(Credentials::new(username, password));
        self
    }

    /// Freeze the configuration into a `Request`.
    ///
    /// Ends the session: any later call on this builder panics.
    pub fn build(&mut self) -> Request {
        self.assert_configuring();
        self.built = true;

        let Some((method, url)) = self.target.take() else {
            panic!("request method and URL not set");
        };

        if self.compression && !self.headers.as_ref().is_some_and(|h| h.contains(ACCEPT_ENCODING)) {
            trace!("adding default {ACCEPT_ENCODING}: {DEFAULT_ACCEPT_ENCODING}");
            self.headers
                .get_or_insert_with(Headers::new)
                .insert(ACCEPT_ENCODING, DEFAULT_ACCEPT_ENCODING);
        }

        let body = self.body.take();
        debug!(
            "built {method} {url}: {} headers, {} args, body: {}",
            self.headers.as_ref().map_or(0, Headers::len),
            self.args.as_ref().map_or(0, Vec::len),
            body.as_ref().map_or("none", Body::kind),
        );

        Request::new(
            method,
            url,
            self.headers.take(),
            self.args.take(),
            self.auth.take(),
            body,
        )
    }

    fn set_body(&mut self, body: Body) -> &mut Self {
        self.assert_no_body();
        self.body = Some(body);
        self
    }

    fn assert_no_body(&self) {
        self.assert_configuring();
        assert!(self.body.is_none(), "request body already set");
    }

    fn assert_configuring(&self) {
        assert!(!self.built, "request builder already built");
    }
}

impl<'c, C: Context + ?Sized> RequestBuilder<'c, C> {
    /// Build the request and dispatch it through the context's transport.
    ///
    /// Transport and body errors are returned unchanged; nothing is retried.
    pub fn execute(&mut self) -> Result<Reply<C>, Error> {
        let request = self.build();
        request.execute(self.ctx)
    }
}
