//! C-ABI wrapper around `rest-core`'s request builder.
//!
//! # Overview
//! Lets any language with a C FFI configure and freeze HTTP requests with the
//! same rules as the Rust builder, then perform the exchange itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary. A panic from the builder is a contract
//!   violation: it is reported as `FfiErrorCode::ContractViolation` and the
//!   handle is poisoned.
//! - Configuration calls mirror the Rust builder 1:1 and return an
//!   `FfiErrorCode` instead of chaining.
//! - Checks run in a fixed order, and the first failure wins:
//!   1. a null handle is `NullArg`;
//!   2. a poisoned or already built handle is `ContractViolation`;
//!   3. a null or non-UTF-8 argument is `NullArg` / `InvalidString`;
//!   4. the builder's own rules (second method, second body, option after
//!      body) are `ContractViolation`;
//!   5. runtime failures such as unparsable JSON text come last.
//! - The C caller owns every returned pointer and must release it with the
//!   matching `rest_*_free` function.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::warn;
use rest_core::{Method, RequestBuilder};
use serde::ser::{Error as _, Serialize, Serializer};

use types::*;

/// Read a borrowed C string argument.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives the
/// returned reference.
unsafe fn arg<'a>(ptr: *const c_char) -> Result<&'a str, FfiErrorCode> {
    if ptr.is_null() {
        return Err(FfiErrorCode::NullArg);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| FfiErrorCode::InvalidString)
}

/// JSON text handed in by the host, parsed when the builder serializes it.
///
/// Parsing inside `Serialize` lets the builder check its body rules before
/// the text is looked at, exactly as for a Rust value.
struct JsonText<'a>(&'a str);

impl Serialize for JsonText<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::from_str::<serde_json::Value>(self.0)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

/// Run `f` against the builder behind `handle`, turning a panic into
/// `ContractViolation` and poisoning the handle.
fn with_builder<F>(handle: *mut FfiRequestBuilder, f: F) -> FfiErrorCode
where
    F: FnOnce(&mut RequestBuilder<'static, ()>) -> Result<(), FfiErrorCode>,
{
    if handle.is_null() {
        return FfiErrorCode::NullArg;
    }
    let handle = unsafe { &mut *handle };
    if handle.poisoned {
        return FfiErrorCode::ContractViolation;
    }
    if handle.built {
        warn!("request builder contract violation: request builder already built");
        return FfiErrorCode::ContractViolation;
    }
    match catch_unwind(AssertUnwindSafe(|| f(&mut handle.inner))) {
        Ok(Ok(())) => FfiErrorCode::Ok,
        Ok(Err(code)) => code,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            warn!("request builder contract violation: {msg}");
            handle.poisoned = true;
            FfiErrorCode::ContractViolation
        }
    }
}

// ---------------------------------------------------------------------------
// Builder lifecycle
// ---------------------------------------------------------------------------

/// Start a new builder session.
///
/// The caller must free the returned pointer with `rest_builder_free`,
/// whether or not it was built.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_new() -> *mut FfiRequestBuilder {
    catch_unwind(|| Box::into_raw(Box::new(FfiRequestBuilder::new())))
        .unwrap_or(std::ptr::null_mut())
}

/// Free a builder created by `rest_builder_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_free(builder: *mut FfiRequestBuilder) {
    if !builder.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| unsafe {
            drop(Box::from_raw(builder));
        }));
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Set the method and URL. Allowed once per builder.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_set_method(
    builder: *mut FfiRequestBuilder,
    method: FfiMethod,
    url: *const c_char,
) -> FfiErrorCode {
    with_builder(builder, |b| {
        let url = unsafe { arg(url) }?;
        match Method::from(method) {
            Method::Get => b.get(url),
            Method::Post => b.post(url),
            Method::Put => b.put(url),
            Method::Delete => b.delete(url),
        };
        Ok(())
    })
}

/// Add a header. Repeated names accumulate.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_header(
    builder: *mut FfiRequestBuilder,
    name: *const c_char,
    value: *const c_char,
) -> FfiErrorCode {
    with_builder(builder, |b| {
        let (name, value) = unsafe { (arg(name)?, arg(value)?) };
        b.header(name, value);
        Ok(())
    })
}

/// Append a text query argument.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_argument(
    builder: *mut FfiRequestBuilder,
    name: *const c_char,
    value: *const c_char,
) -> FfiErrorCode {
    with_builder(builder, |b| {
        let (name, value) = unsafe { (arg(name)?, arg(value)?) };
        b.argument(name, value);
        Ok(())
    })
}

/// Append an integer query argument, stored as decimal text.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_argument_int(
    builder: *mut FfiRequestBuilder,
    name: *const c_char,
    value: i64,
) -> FfiErrorCode {
    with_builder(builder, |b| {
        let name = unsafe { arg(name) }?;
        b.argument(name, value);
        Ok(())
    })
}

/// Copy `len` bytes from `data` into the body. `data` may be null only when
/// `len` is zero.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_data(
    builder: *mut FfiRequestBuilder,
    data: *const u8,
    len: usize,
) -> FfiErrorCode {
    with_builder(builder, |b| {
        let bytes = if len == 0 {
            Vec::new()
        } else if data.is_null() {
            return Err(FfiErrorCode::NullArg);
        } else {
            unsafe { std::slice::from_raw_parts(data, len) }.to_vec()
        };
        b.data(bytes);
        Ok(())
    })
}

/// Use the file at `path` as the body. The host streams it when sending.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_file(
    builder: *mut FfiRequestBuilder,
    path: *const c_char,
) -> FfiErrorCode {
    with_builder(builder, |b| {
        let path = unsafe { arg(path) }?;
        b.file(path);
        Ok(())
    })
}

/// Use a JSON document as the body, re-encoded with empty members left out.
///
/// Returns `Serialization` if `json` is not valid JSON and the builder would
/// otherwise accept a body.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_json(
    builder: *mut FfiRequestBuilder,
    json: *const c_char,
) -> FfiErrorCode {
    with_builder(builder, |b| {
        let json = unsafe { arg(json) }?;
        b.json(&JsonText(json))
            .map_err(|_| FfiErrorCode::Serialization)?;
        Ok(())
    })
}

/// Do not add the default `Accept-Encoding: gzip` header.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_disable_compression(builder: *mut FfiRequestBuilder) -> FfiErrorCode {
    with_builder(builder, |b| {
        b.disable_compression();
        Ok(())
    })
}

/// Set basic-authentication credentials. Allowed once, before the body.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_basic_auth(
    builder: *mut FfiRequestBuilder,
    username: *const c_char,
    password: *const c_char,
) -> FfiErrorCode {
    with_builder(builder, |b| {
        let (username, password) = unsafe { (arg(username)?, arg(password)?) };
        b.basic_authentication(username, password);
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Freeze the builder into `*out`.
///
/// Ends the session: later calls on `builder` report `ContractViolation`.
/// On success the caller must free `*out` with `rest_request_free`.
#[unsafe(no_mangle)]
pub extern "C" fn rest_builder_build(
    builder: *mut FfiRequestBuilder,
    out: *mut *mut FfiRequest,
) -> FfiErrorCode {
    let mut built = None;
    let code = with_builder(builder, |b| {
        if out.is_null() {
            return Err(FfiErrorCode::NullArg);
        }
        built = Some(b.build());
        Ok(())
    });
    let Some(request) = built else {
        return code;
    };
    unsafe { (*builder).built = true };
    match catch_unwind(AssertUnwindSafe(|| FfiRequest::from_core(request))) {
        Ok(Ok(ptr)) => {
            unsafe { *out = ptr };
            FfiErrorCode::Ok
        }
        Ok(Err(code)) => code,
        Err(_) => FfiErrorCode::ContractViolation,
    }
}

/// Free a request returned by `rest_builder_build`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rest_request_free(req: *mut FfiRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| unsafe {
        let req = Box::from_raw(req);
        free_request_fields(&req);
    }));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
