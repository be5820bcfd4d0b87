//! The frozen request value produced by `RequestBuilder::build`.
//!
//! # Design
//! `Request` has private fields and read-only accessors, so nothing can
//! change it between `build` and dispatch. The header set and argument list
//! stay `Option`s: "never configured" and "configured but empty" are kept
//! apart exactly as the builder saw them. The body is owned outright; the
//! transport takes it back out with `into_body` when it is ready to send.

use log::debug;
use url::Url;

use crate::body::Body;
use crate::context::{Context, Reply, Transport};
use crate::error::Error;
use crate::http::{Args, Credentials, Headers, Method};

/// An immutable, fully specified HTTP exchange.
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: String,
    headers: Option<Headers>,
    args: Option<Args>,
    auth: Option<Credentials>,
    body: Option<Body>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        url: String,
        headers: Option<Headers>,
        args: Option<Args>,
        auth: Option<Credentials>,
        body: Option<Body>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            args,
            auth,
            body,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The URL as configured, without query arguments applied.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }

    pub fn args(&self) -> Option<&[(String, String)]> {
        self.args.as_deref()
    }

    pub fn auth(&self) -> Option<&Credentials> {
        self.auth.as_ref()
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Give up the request, keeping only its body.
    pub fn into_body(self) -> Option<Body> {
        self.body
    }

    /// The URL with query arguments appended in insertion order.
    ///
    /// Arguments are form-urlencoded and follow any query string already
    /// present in the configured URL.
    pub fn target_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&self.url)?;
        if let Some(args) = self.args.as_ref().filter(|a| !a.is_empty()) {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in args {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Hand this request to the context's transport.
    pub fn execute<C: Context + ?Sized>(self, ctx: &C) -> Result<Reply<C>, Error> {
        debug!("dispatching {} {}", self.method, self.url);
        ctx.transport().dispatch(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, args: Option<Args>) -> Request {
        Request::new(Method::Get, url.to_string(), None, args, None, None)
    }

    #[test]
    fn target_url_appends_args_in_order() {
        let args = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ];
        let url = request("http://example.com/search", Some(args)).target_url().unwrap();
        assert_eq!(url.as_str(), "http://example.com/search?b=2&a=1");
    }

    #[test]
    fn target_url_encodes_and_extends_existing_query() {
        let args = vec![("q".to_string(), "a b&c".to_string())];
        let url = request("http://example.com/?page=1", Some(args)).target_url().unwrap();
        assert_eq!(url.as_str(), "http://example.com/?page=1&q=a+b%26c");
    }

    #[test]
    fn target_url_without_args_is_unchanged() {
        let url = request("http://example.com/path", None).target_url().unwrap();
        assert_eq!(url.as_str(), "http://example.com/path");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn target_url_rejects_garbage() {
        let err = request("not a url", None).target_url().unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn into_body_moves_content_out() {
        let req = Request::new(
            Method::Post,
            "http://example.com".to_string(),
            None,
            None,
            None,
            Some(Body::from("payload")),
        );
        assert_eq!(req.body().and_then(Body::as_bytes), Some(&b"payload"[..]));
        assert_eq!(req.into_body(), Some(Body::Bytes(b"payload".to_vec())));
    }
}
