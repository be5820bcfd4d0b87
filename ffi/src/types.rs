//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointer + length instead of `Vec`,
//! and tagged enums with explicit discriminants. Conversion and release
//! helpers live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use rest_core::{Body, Method, Request, RequestBuilder};

/// Opaque handle to a builder session.
///
/// The C host performs the I/O itself, so the builder is bound to the unit
/// context and never executed from this side.
pub struct FfiRequestBuilder {
    pub(crate) inner: RequestBuilder<'static, ()>,
    /// Set once a call violated the builder contract. The session state is
    /// unspecified after that, so every later call is refused.
    pub(crate) poisoned: bool,
    /// Set by a successful build. The session is over.
    pub(crate) built: bool,
}

impl FfiRequestBuilder {
    pub(crate) fn new() -> Self {
        Self {
            inner: RequestBuilder::new(&()),
            poisoned: false,
            built: false,
        }
    }
}

/// Status code returned by every fallible FFI function.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NullArg = 1,
    /// A string argument was not UTF-8, or a value contained a NUL byte.
    InvalidString = 2,
    Serialization = 3,
    InvalidUrl = 4,
    /// The call broke the builder contract (second method, second body,
    /// option after body, build twice). The builder is now unusable.
    ContractViolation = 5,
}

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<FfiMethod> for Method {
    fn from(m: FfiMethod) -> Self {
        match m {
            FfiMethod::Get => Method::Get,
            FfiMethod::Post => Method::Post,
            FfiMethod::Put => Method::Put,
            FfiMethod::Delete => Method::Delete,
        }
    }
}

impl From<Method> for FfiMethod {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => FfiMethod::Get,
            Method::Post => FfiMethod::Post,
            Method::Put => FfiMethod::Put,
            Method::Delete => FfiMethod::Delete,
        }
    }
}

/// A name/value pair of C strings, used for headers and query arguments.
#[repr(C)]
pub struct FfiPair {
    pub name: *mut c_char,
    pub value: *mut c_char,
}

/// Which body fields of `FfiRequest` are meaningful.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiBodyKind {
    None = 0,
    Bytes = 1,
    File = 2,
}

/// A built request described as C-compatible plain data.
///
/// `headers` / `args` are null with a zero length when none were configured.
/// `authorization` is the ready-made `Authorization` header value, or null.
/// `target_url` is `url` with the query arguments applied. For `Bytes`
/// bodies `body` / `body_len` hold the content; for `File` bodies
/// `body_path` names the file the host should stream.
#[repr(C)]
pub struct FfiRequest {
    pub method: FfiMethod,
    pub url: *mut c_char,
    pub target_url: *mut c_char,
    pub headers: *mut FfiPair,
    pub headers_len: usize,
    pub args: *mut FfiPair,
    pub args_len: usize,
    pub authorization: *mut c_char,
    pub body_kind: FfiBodyKind,
    pub body: *mut u8,
    pub body_len: usize,
    pub body_path: *mut c_char,
}

fn c_string(s: impl Into<Vec<u8>>) -> Result<*mut c_char, FfiErrorCode> {
    CString::new(s)
        .map(CString::into_raw)
        .map_err(|_| FfiErrorCode::InvalidString)
}

fn c_pairs<'a>(
    pairs: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<(*mut FfiPair, usize), FfiErrorCode> {
    let mut out = Vec::new();
    for (name, value) in pairs {
        let name = c_string(name)?;
        let value = match c_string(value) {
            Ok(v) => v,
            Err(code) => {
                unsafe { free_c_string(name) };
                free_pairs_vec(out);
                return Err(code);
            }
        };
        out.push(FfiPair { name, value });
    }
    if out.is_empty() {
        return Ok((std::ptr::null_mut(), 0));
    }
    let len = out.len();
    Ok((Box::into_raw(out.into_boxed_slice()) as *mut FfiPair, len))
}

impl FfiRequest {
    /// Convert a core `Request` into a heap-allocated `FfiRequest`.
    pub(crate) fn from_core(req: Request) -> Result<*mut Self, FfiErrorCode> {
        let target_url = req
            .target_url()
            .map_err(|_| FfiErrorCode::InvalidUrl)?
            .to_string();

        let mut ffi = FfiRequest {
            method: req.method().into(),
            url: std::ptr::null_mut(),
            target_url: std::ptr::null_mut(),
            headers: std::ptr::null_mut(),
            headers_len: 0,
            args: std::ptr::null_mut(),
            args_len: 0,
            authorization: std::ptr::null_mut(),
            body_kind: FfiBodyKind::None,
            body: std::ptr::null_mut(),
            body_len: 0,
            body_path: std::ptr::null_mut(),
        };

        // Fill field by field; on failure release what was already handed
        // out by dropping the partially filled request.
        let filled = (|| {
            ffi.url = c_string(req.url())?;
            ffi.target_url = c_string(target_url)?;
            if let Some(headers) = req.headers() {
                (ffi.headers, ffi.headers_len) = c_pairs(headers.iter())?;
            }
            if let Some(args) = req.args() {
                (ffi.args, ffi.args_len) =
                    c_pairs(args.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
            }
            if let Some(auth) = req.auth() {
                ffi.authorization = c_string(auth.header_value())?;
            }
            Ok::<(), FfiErrorCode>(())
        })();
        if let Err(code) = filled {
            unsafe { free_request_fields(&ffi) };
            return Err(code);
        }

        match req.into_body() {
            None => {}
            Some(Body::Bytes(bytes)) => {
                ffi.body_kind = FfiBodyKind::Bytes;
                ffi.body_len = bytes.len();
                ffi.body = Box::into_raw(bytes.into_boxed_slice()) as *mut u8;
            }
            Some(Body::File(path)) => {
                ffi.body_kind = FfiBodyKind::File;
                match c_string(path.to_string_lossy().into_owned()) {
                    Ok(p) => ffi.body_path = p,
                    Err(code) => {
                        unsafe { free_request_fields(&ffi) };
                        return Err(code);
                    }
                }
            }
        }

        Ok(Box::into_raw(Box::new(ffi)))
    }
}

/// Release a string produced by `c_string`. Null is ignored.
///
/// # Safety
/// `s` must be null or a pointer returned by `CString::into_raw` that has
/// not been freed yet.
pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

fn free_pairs_vec(pairs: Vec<FfiPair>) {
    for pair in pairs {
        unsafe {
            free_c_string(pair.name);
            free_c_string(pair.value);
        }
    }
}

/// # Safety
/// `ptr` / `len` must come from `c_pairs` and not have been freed.
unsafe fn free_pairs(ptr: *mut FfiPair, len: usize) {
    if ptr.is_null() {
        return;
    }
    let slice = Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len));
    free_pairs_vec(slice.into_vec());
}

/// Release everything an `FfiRequest` points to, but not the struct itself.
///
/// # Safety
/// Every pointer field must be null or owned by this request.
pub(crate) unsafe fn free_request_fields(req: &FfiRequest) {
    free_c_string(req.url);
    free_c_string(req.target_url);
    free_pairs(req.headers, req.headers_len);
    free_pairs(req.args, req.args_len);
    free_c_string(req.authorization);
    if !req.body.is_null() {
        drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
            req.body,
            req.body_len,
        )));
    }
    free_c_string(req.body_path);
}
