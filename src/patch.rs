//! JSON patch generation
//!
//! The API server applies the returned patch verbatim, so the diff is
//! computed over the canonical serialization of both pods.

use json_patch::PatchOperation;
use k8s_openapi::api::core::v1::Pod;

use crate::error::{Error, Result};

/// Compute the RFC 6902 patch transforming `original` into `mutated`.
///
/// Identical pods diff to an empty vec, never to an absent patch; callers
/// rely on "empty" meaning "no change requested". Operation order is
/// deterministic for a given input pair.
pub fn diff(original: &Pod, mutated: &Pod) -> Result<Vec<PatchOperation>> {
    let original =
        serde_json::to_value(original).map_err(|e| Error::patch_computation(e.to_string()))?;
    let mutated =
        serde_json::to_value(mutated).map_err(|e| Error::patch_computation(e.to_string()))?;
    Ok(json_patch::diff(&original, &mutated).0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{self, NOTEBOOK_NAME_LABEL};
    use jsonptr::PointerBuf;
    use k8s_openapi::api::core::v1::{Container, ContainerPort, EnvVar, PodSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn notebook_pod() -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some("notebook-0".to_string()),
                labels: Some(BTreeMap::from([(
                    NOTEBOOK_NAME_LABEL.to_string(),
                    "my-notebook".to_string(),
                )])),
                ..Default::default()
            },
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: "notebook".to_string(),
                    env: Some(vec![EnvVar {
                        name: "NB_PREFIX".to_string(),
                        value: Some("/foo".to_string()),
                        ..Default::default()
                    }]),
                    ports: Some(vec![ContainerPort {
                        container_port: 8888,
                        ..Default::default()
                    }]),
                    ..Default::default()
                }],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn identical_pods_diff_to_empty_patch() {
        let pod = notebook_pod();
        let ops = diff(&pod, &pod.clone()).unwrap();
        assert!(ops.is_empty());

        let empty = Pod::default();
        assert!(diff(&empty, &empty.clone()).unwrap().is_empty());
    }

    #[test]
    fn probe_injection_diffs_to_a_single_add() {
        let original = notebook_pod();
        let mutated = probe::inject_readiness_probe(&original).unwrap();

        let ops = diff(&original, &mutated).unwrap();
        assert_eq!(ops.len(), 1);

        let expected_path =
            PointerBuf::from_tokens(["spec", "containers", "0", "readinessProbe"]);
        match &ops[0] {
            PatchOperation::Add(add) => {
                assert_eq!(add.path, expected_path);
                assert_eq!(add.value["httpGet"]["path"], "/foo/tree?");
                assert_eq!(add.value["httpGet"]["port"], 8888);
                assert_eq!(add.value["httpGet"]["scheme"], "HTTP");
                assert_eq!(add.value["initialDelaySeconds"], 15);
                assert_eq!(add.value["successThreshold"], 1);
                assert_eq!(add.value["failureThreshold"], 5);
            }
            other => panic!("expected add operation, got {other:?}"),
        }
    }

    /// Applying the diff to the original reproduces the mutated pod exactly.
    #[test]
    fn diff_round_trips_through_patch_application() {
        let original = notebook_pod();
        let mutated = probe::inject_readiness_probe(&original).unwrap();
        let ops = diff(&original, &mutated).unwrap();

        let mut doc = serde_json::to_value(&original).unwrap();
        json_patch::patch(&mut doc, &ops).unwrap();
        assert_eq!(doc, serde_json::to_value(&mutated).unwrap());
    }

    #[test]
    fn diff_is_deterministic() {
        let original = notebook_pod();
        let mutated = probe::inject_readiness_probe(&original).unwrap();
        let first = diff(&original, &mutated).unwrap();
        let second = diff(&original, &mutated).unwrap();
        assert_eq!(
            serde_json::to_value(json_patch::Patch(first)).unwrap(),
            serde_json::to_value(json_patch::Patch(second)).unwrap()
        );
    }
}
