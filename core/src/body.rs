//! Request body sources.
//!
//! A body is either an owned byte buffer or a path to a file. Structured
//! values are encoded to bytes by `crate::json` before they get here, so they
//! never appear as a variant of their own. "No body" is `Option::None` at the
//! use sites.
//!
//! File bodies are not touched until a transport asks for a reader, which
//! lets the transport stream the upload instead of buffering it.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Content of a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// In-memory content, sent as-is.
    Bytes(Vec<u8>),
    /// Content streamed from this path at dispatch time.
    File(PathBuf),
}

impl Body {
    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Body::Bytes(_) => "bytes",
            Body::File(_) => "file",
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Bytes(b) => Some(b),
            Body::File(_) => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Body::Bytes(_) => None,
            Body::File(p) => Some(p),
        }
    }

    /// Length in bytes. For a file this reads its metadata.
    pub fn len(&self) -> Result<u64, Error> {
        match self {
            Body::Bytes(b) => Ok(b.len() as u64),
            Body::File(p) => Ok(std::fs::metadata(p)?.len()),
        }
    }

    /// Open the content for streaming.
    pub fn reader(self) -> Result<Box<dyn Read + Send>, Error> {
        match self {
            Body::Bytes(b) => Ok(Box::new(Cursor::new(b))),
            Body::File(p) => Ok(Box::new(File::open(p)?)),
        }
    }

    /// Collect the whole content into memory.
    pub fn read_to_vec(self) -> Result<Vec<u8>, Error> {
        match self {
            Body::Bytes(b) => Ok(b),
            Body::File(p) => Ok(std::fs::read(p)?),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::Bytes(v)
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Bytes(s.into_bytes())
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Bytes(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Body {
    fn from(b: &[u8]) -> Self {
        Body::Bytes(b.to_vec())
    }
}

impl From<PathBuf> for Body {
    fn from(p: PathBuf) -> Self {
        Body::File(p)
    }
}
