//! Mutating admission webhook for notebook pods
//!
//! Injects an HTTP readiness probe into the notebook container of pods
//! carrying the `notebook-name` label. The target container is the first one
//! whose environment declares `NB_PREFIX`; the value of that variable becomes
//! the probe's path prefix. The change is returned to the API server as an
//! RFC 6902 JSON Patch.

#![deny(missing_docs)]

pub mod decode;
pub mod error;
pub mod mutate;
pub mod patch;
pub mod probe;
pub mod server;

pub use error::{Error, Result};
pub use mutate::mutate_pods;
pub use server::{start_server, ServerConfig};
