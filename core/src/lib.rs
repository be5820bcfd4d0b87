//! Fluent construction and dispatch of HTTP requests.
//!
//! # Overview
//! A `RequestBuilder` collects the method, URL, headers, query arguments,
//! credentials and body of one request, freezes them into an immutable
//! `Request`, and optionally hands it to the `Transport` of an execution
//! `Context`. The core never touches the network itself (host-does-IO), so
//! building is deterministic and trivially testable.
//!
//! # Design
//! - The builder is single-use. Misuse (two methods, two bodies, building
//!   twice, options after the body) panics at the offending call; runtime
//!   failures from collaborators come back as `Error`.
//! - Bodies are bytes or a file path. Structured values are JSON-encoded with
//!   empty members left out before they are stored as bytes.
//! - Unless disabled, `build` advertises `Accept-Encoding: gzip`.
//!
//! ```no_run
//! use rest_core::{Context, Error, Request, Transport};
//!
//! struct Printer;
//!
//! impl Transport for Printer {
//!     type Reply = String;
//!
//!     fn dispatch(&self, request: Request) -> Result<String, Error> {
//!         Ok(request.target_url()?.to_string())
//!     }
//! }
//!
//! impl Context for Printer {
//!     type Transport = Printer;
//!
//!     fn transport(&self) -> &Printer {
//!         self
//!     }
//! }
//!
//! let url = Printer
//!     .request()
//!     .get("http://localhost:3000/search")
//!     .argument("q", "rust")
//!     .argument("page", 2)
//!     .execute()?;
//! assert_eq!(url, "http://localhost:3000/search?q=rust&page=2");
//! # Ok::<(), Error>(())
//! ```

pub mod body;
pub mod builder;
pub mod context;
pub mod error;
pub mod http;
pub mod json;
pub mod request;

pub use body::Body;
pub use builder::RequestBuilder;
pub use context::{Context, Reply, Transport};
pub use error::Error;
pub use http::{Args, Argument, Credentials, Headers, Method};
pub use json::SerializeOptions;
pub use request::Request;
