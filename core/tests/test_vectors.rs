//! Verify the builder against JSON test vectors stored in `test-vectors/`.
//!
//! Each case is a sequence of builder calls and the request it must freeze
//! into; each violation is a sequence whose last step must panic with the
//! given message. Bodies are compared as bytes, so member order inside JSON
//! bodies matters.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;

use rest_core::{Body, Method, RequestBuilder};
use serde_json::Value;

/// Parse the method string from test vectors into `Method`.
fn parse_method(s: &str) -> Method {
    match s {
        "GET" => Method::Get,
        "POST" => Method::Post,
        "PUT" => Method::Put,
        "DELETE" => Method::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Option<Vec<(String, String)>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|pair| {
                let pair = pair.as_array().unwrap();
                (
                    pair[0].as_str().unwrap().to_string(),
                    pair[1].as_str().unwrap().to_string(),
                )
            })
            .collect(),
    )
}

fn text(step: &Value, key: &str) -> String {
    step[key].as_str().unwrap().to_string()
}

/// Apply one step. `build` steps discard the request they produce.
fn apply(builder: &mut RequestBuilder<'_, ()>, step: &Value) {
    match step["op"].as_str().unwrap() {
        "get" => {
            builder.get(text(step, "url"));
        }
        "post" => {
            builder.post(text(step, "url"));
        }
        "put" => {
            builder.put(text(step, "url"));
        }
        "delete" => {
            builder.delete(text(step, "url"));
        }
        "header" => {
            builder.header(text(step, "name"), text(step, "value"));
        }
        "argument" => match &step["value"] {
            Value::Number(n) => {
                builder.argument(text(step, "name"), n.as_i64().unwrap());
            }
            other => {
                builder.argument(text(step, "name"), other.as_str().unwrap());
            }
        },
        "data" => {
            builder.data(text(step, "text"));
        }
        "file" => {
            builder.file(text(step, "path"));
        }
        "json" => {
            builder.json(&step["value"]).unwrap();
        }
        "disable_compression" => {
            builder.disable_compression();
        }
        "basic_authentication" => {
            builder.basic_authentication(text(step, "username"), text(step, "password"));
        }
        "build" => {
            builder.build();
        }
        other => panic!("unknown op: {other}"),
    }
}

fn expected_body(value: &Value) -> Option<Body> {
    if value.is_null() {
        return None;
    }
    if let Some(bytes) = value.get("bytes") {
        return Some(Body::from(bytes.as_str().unwrap()));
    }
    let path = value["file"].as_str().unwrap();
    Some(Body::File(PathBuf::from(path)))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic>".to_string()
    }
}

#[test]
fn build_test_vectors() {
    let raw = include_str!("../../test-vectors/build.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];

        let mut builder = RequestBuilder::new(&());
        for step in case["steps"].as_array().unwrap() {
            apply(&mut builder, step);
        }
        let req = builder.build();

        assert_eq!(req.method(), parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url(), expected["url"].as_str().unwrap(), "{name}: url");

        let headers: Option<Vec<(String, String)>> = req
            .headers()
            .map(|h| h.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect());
        assert_eq!(headers, pairs(&expected["headers"]), "{name}: headers");

        assert_eq!(req.args().map(<[_]>::to_vec), pairs(&expected["args"]), "{name}: args");

        let auth = req.auth().map(|c| (c.username().to_string(), c.password().to_string()));
        let expected_auth = expected["auth"].as_array().map(|a| {
            (a[0].as_str().unwrap().to_string(), a[1].as_str().unwrap().to_string())
        });
        assert_eq!(auth, expected_auth, "{name}: auth");

        assert_eq!(req.body().cloned(), expected_body(&expected["body"]), "{name}: body");

        assert_eq!(
            req.target_url().unwrap().as_str(),
            expected["target_url"].as_str().unwrap(),
            "{name}: target_url"
        );
    }
}

#[test]
fn violation_test_vectors() {
    let raw = include_str!("../../test-vectors/build.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["violations"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = case["expected_panic"].as_str().unwrap();
        let steps = case["steps"].as_array().unwrap();
        let (last, setup) = steps.split_last().unwrap();

        // The same sequence must fail the same way every time.
        for _ in 0..2 {
            let mut builder = RequestBuilder::new(&());
            for step in setup {
                apply(&mut builder, step);
            }
            let result = catch_unwind(AssertUnwindSafe(|| apply(&mut builder, last)));
            let payload = result.expect_err(name);
            assert_eq!(panic_message(payload.as_ref()), expected, "{name}");
        }
    }
}
