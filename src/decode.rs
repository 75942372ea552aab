//! Pod decoding
//!
//! The admission request carries the object under review as raw serialized
//! bytes. Decoding is a pure function of those bytes; absent optional fields
//! (labels, env, ports, even the whole spec) decode as empty rather than
//! failing.

use k8s_openapi::api::core::v1::Pod;

use crate::error::{Error, Result};

/// Decode raw admission object bytes into a typed Pod.
///
/// Fails with [`Error::Decode`] when the bytes do not parse as a Pod.
pub fn decode_pod(raw: &[u8]) -> Result<Pod> {
    serde_json::from_slice(raw).map_err(|e| Error::decode(e.to_string()))
}
