//! Webhook HTTP surface
//!
//! Wraps the mutation pipeline in the admission envelope: decodes incoming
//! `AdmissionReview`s, runs the pipeline, and answers with an
//! `AdmissionResponse` that allows, patches, or denies. Pipeline errors deny
//! the request; the webhook fails closed.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::routing::{get, post};
use axum::{Json, Router};
use axum_server::tls_rustls::RustlsConfig;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview};
use kube::core::DynamicObject;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::mutate;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server
    pub addr: SocketAddr,
    /// Path to the TLS certificate PEM file
    pub cert_path: PathBuf,
    /// Path to the TLS private key PEM file
    pub key_path: PathBuf,
}

/// Build the webhook router with the mutation endpoint and a health route
pub fn webhook_routes() -> Router {
    Router::new()
        .route("/mutate", post(mutate_handler))
        .route("/healthz", get(|| async { "ok" }))
}

/// Start the webhook HTTPS server
///
/// Serves [`webhook_routes`] over TLS using the certificate/key pair named
/// in the config. Runs until the listener fails.
pub async fn start_server(config: ServerConfig) -> Result<(), Error> {
    let app = webhook_routes();

    let tls_config = RustlsConfig::from_pem_file(&config.cert_path, &config.key_path)
        .await
        .map_err(|e| Error::config(format!("TLS config error: {e}")))?;

    info!(addr = %config.addr, "Starting mutating webhook server");

    axum_server::bind_rustls(config.addr, tls_config)
        .serve(app.into_make_service())
        .await
        .map_err(|e| Error::server(e.to_string()))
}

/// Handle mutating admission reviews for pods
pub async fn mutate_handler(
    Json(body): Json<AdmissionReview<DynamicObject>>,
) -> Json<AdmissionReview<DynamicObject>> {
    let req: AdmissionRequest<DynamicObject> = match body.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to parse admission request");
            return Json(AdmissionResponse::invalid(e.to_string()).into_review());
        }
    };

    Json(admit(&req).into_review())
}

/// Wrap the mutation pipeline's outcome into an admission response.
///
/// Pass-through and empty patches allow the request unchanged. A non-empty
/// patch is attached as a JSON Patch for the API server to apply. Pipeline
/// errors deny the request with the error message (fail closed).
fn admit(req: &AdmissionRequest<DynamicObject>) -> AdmissionResponse {
    let uid = &req.uid;

    let Some(obj) = &req.object else {
        debug!(uid = %uid, "No object in request, allowing unchanged");
        return AdmissionResponse::from(req);
    };

    let raw = match serde_json::to_vec(obj) {
        Ok(raw) => raw,
        Err(e) => {
            error!(uid = %uid, error = %e, "Failed to serialize admission object");
            return AdmissionResponse::from(req).deny(e.to_string());
        }
    };

    match mutate::mutate_pods(&req.resource, &raw) {
        Ok(None) => {
            debug!(uid = %uid, resource = %req.resource.resource, "Not a pod request, allowing unchanged");
            AdmissionResponse::from(req)
        }
        Ok(Some(ops)) if ops.is_empty() => {
            debug!(uid = %uid, "No mutation for pod, allowing unchanged");
            AdmissionResponse::from(req)
        }
        Ok(Some(ops)) => {
            info!(uid = %uid, patch_ops = ops.len(), "Applying readiness probe patch");
            match AdmissionResponse::from(req).with_patch(json_patch::Patch(ops)) {
                Ok(response) => response,
                Err(e) => {
                    error!(uid = %uid, error = %e, "Failed to serialize patch");
                    AdmissionResponse::from(req).deny(format!("patch serialization error: {e}"))
                }
            }
        }
        Err(e) => {
            warn!(uid = %uid, error = %e, "Mutation failed, denying admission");
            AdmissionResponse::from(req).deny(e.to_string())
        }
    }
}
