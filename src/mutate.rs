//! Mutation pipeline
//!
//! Composes decoding, probe synthesis and patch generation into the
//! per-request pipeline. Everything here works on per-call data with no
//! shared state, so concurrent admission requests need no coordination.

use json_patch::PatchOperation;
use kube::core::GroupVersionResource;
use tracing::{debug, info};

use crate::decode::decode_pod;
use crate::error::Result;
use crate::patch;
use crate::probe;

/// Whether the admission request targets pods/v1, the only resource this
/// webhook mutates.
pub fn is_pod_resource(resource: &GroupVersionResource) -> bool {
    resource.group.is_empty() && resource.version == "v1" && resource.resource == "pods"
}

/// Run the mutation pipeline for one admission request.
///
/// Returns `None` when the request targets a resource other than pods/v1:
/// such requests pass through with no patch and no error, without the body
/// ever being decoded. For pod requests, returns the patch operations
/// transforming the submitted pod into its mutated form, empty when no
/// mutation applies. Decode and synthesis failures propagate to the caller,
/// which must deny the request.
pub fn mutate_pods(
    resource: &GroupVersionResource,
    raw: &[u8],
) -> Result<Option<Vec<PatchOperation>>> {
    if !is_pod_resource(resource) {
        debug!(
            group = %resource.group,
            version = %resource.version,
            resource = %resource.resource,
            "resource is not pods/v1, passing through"
        );
        return Ok(None);
    }

    let pod = decode_pod(raw)?;
    info!(pod = ?pod.metadata.name, "examining pod");

    let mutated = probe::inject_readiness_probe(&pod)?;
    let ops = patch::diff(&pod, &mutated)?;
    Ok(Some(ops))
}
