//! Header and body plumbing between the inbound request, the upstream
//! client, and the recorded trace.

use axum::http::{HeaderMap, header};
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::io::Read;

/// Prefix of proxy-internal headers that must never reach the upstream
pub const INTERNAL_HEADER_PREFIX: &str = "x-regtrace-";

/// Headers to forward upstream: everything except proxy-internal headers,
/// `host` (the client set it to the proxy address), and `content-length`
/// (set by the upstream client from the actual body).
pub fn upstream_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in inbound {
        if name.as_str().starts_with(INTERNAL_HEADER_PREFIX) {
            continue;
        }
        if name == header::HOST || name == header::CONTENT_LENGTH {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Headers to return to the caller: the upstream's headers minus
/// `content-encoding` and `content-length`, which no longer describe the
/// (decompressed, re-buffered) body we send back.
pub fn caller_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in upstream {
        if name == header::CONTENT_ENCODING || name == header::CONTENT_LENGTH {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

pub fn is_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|encoding| encoding.eq_ignore_ascii_case("gzip"))
}

/// Decompress a gzip body. A body that fails to decode is returned as-is;
/// the trace keeps whatever bytes the upstream actually sent.
pub fn gunzip(body: &[u8]) -> Vec<u8> {
    let mut decoder = GzDecoder::new(body);
    let mut decoded = Vec::new();
    match decoder.read_to_end(&mut decoded) {
        Ok(_) => decoded,
        Err(_) => body.to_vec(),
    }
}

/// Flatten an http HeaderMap into the redacted single-value map stored in
/// traces.
pub fn trace_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        grouped.push((name.as_str(), values));
    }
    regtrace_types::flatten_headers(grouped)
}
