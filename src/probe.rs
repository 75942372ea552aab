//! Readiness probe synthesis
//!
//! Incoming pods are filtered on two levels: the pod must carry the
//! `notebook-name` label, and the target container is the first one whose
//! environment declares `NB_PREFIX`. The value of that variable becomes the
//! probe's path prefix; the probe hits the container's first declared port.

use k8s_openapi::api::core::v1::{EnvVar, HTTPGetAction, Pod, Probe};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Label key that marks a pod as eligible for mutation
pub const NOTEBOOK_NAME_LABEL: &str = "notebook-name";

/// Env var naming the notebook's URL prefix; marks the target container
pub const NOTEBOOK_PREFIX_ENV: &str = "NB_PREFIX";

/// Suffix appended to the URL prefix to form the probe path
const PROBE_PATH_SUFFIX: &str = "/tree?";

const PROBE_INITIAL_DELAY_SECONDS: i32 = 15;
const PROBE_SUCCESS_THRESHOLD: i32 = 1;
const PROBE_FAILURE_THRESHOLD: i32 = 5;

/// Return the value of the first env entry with the given name.
///
/// Names are not guaranteed unique; the first entry in declaration order
/// wins. An entry with a matching name but no value reads as the empty
/// string. Absence is `None`, not an error.
pub fn env_value<'a>(env: &'a [EnvVar], name: &str) -> Option<&'a str> {
    env.iter()
        .find(|var| var.name == name)
        .map(|var| var.value.as_deref().unwrap_or_default())
}

/// Attach a readiness probe to the notebook container of a notebook pod.
///
/// Pods without the `notebook-name` label, and labeled pods without a
/// container declaring `NB_PREFIX`, come back unchanged. The first matching
/// container in declaration order is the mutation target; later matches are
/// ignored, and a readiness probe already present on the target is replaced.
/// A target with no declared ports is a configuration fault and fails with
/// [`Error::Synthesis`].
pub fn inject_readiness_probe(pod: &Pod) -> Result<Pod> {
    let has_marker = pod
        .metadata
        .labels
        .as_ref()
        .is_some_and(|labels| labels.contains_key(NOTEBOOK_NAME_LABEL));
    if !has_marker {
        debug!(pod = ?pod.metadata.name, "no notebook-name label, leaving pod unchanged");
        return Ok(pod.clone());
    }

    let mut mutated = pod.clone();
    let Some(spec) = mutated.spec.as_mut() else {
        return Ok(mutated);
    };

    // First container declaring NB_PREFIX wins; later matches are ignored.
    let target = spec.containers.iter().enumerate().find_map(|(i, container)| {
        env_value(
            container.env.as_deref().unwrap_or_default(),
            NOTEBOOK_PREFIX_ENV,
        )
        .map(|prefix| (i, format!("{prefix}{PROBE_PATH_SUFFIX}")))
    });
    let Some((index, path)) = target else {
        debug!(pod = ?pod.metadata.name, "no container declares NB_PREFIX, leaving pod unchanged");
        return Ok(mutated);
    };

    // The probe targets the container's first declared port.
    let container = &mut spec.containers[index];
    let port = container
        .ports
        .as_ref()
        .and_then(|ports| ports.first())
        .map(|p| p.container_port)
        .ok_or_else(|| Error::synthesis_for(&container.name, "no declared ports to probe"))?;

    info!(
        pod = ?pod.metadata.name,
        container = %container.name,
        path = %path,
        port,
        "attaching readiness probe"
    );
    container.readiness_probe = Some(readiness_probe(path, port));

    Ok(mutated)
}

/// Build the HTTP GET readiness probe for the given path and container port.
fn readiness_probe(path: String, port: i32) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some(path),
            port: IntOrString::Int(port),
            scheme: Some("HTTP".to_string()),
            ..Default::default()
        }),
        initial_delay_seconds: Some(PROBE_INITIAL_DELAY_SECONDS),
        success_threshold: Some(PROBE_SUCCESS_THRESHOLD),
        failure_threshold: Some(PROBE_FAILURE_THRESHOLD),
        ..Default::default()
    }
}
