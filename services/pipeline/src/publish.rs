//! Artifact publishing to the GeoServer catalog.
//!
//! Registers a local artifact with a GeoServer workspace via the REST
//! `external` upload: the server is handed a `file://` reference rather
//! than the file body. One attempt per artifact, no retry.

use std::path::Path;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::info;

use rain_common::{RainError, RainResult};

use crate::config::GeoServerConfig;

/// Store type and payload format for an artifact, dispatched on extension.
fn store_route(path: &Path) -> Option<(&'static str, &'static str)> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tif") | Some("tiff") => Some(("coveragestores", "geotiff")),
        Some("geojson") | Some("json") => Some(("datastores", "geojson")),
        _ => None,
    }
}

/// REST endpoint for an external-file store upload.
fn publish_url(
    config: &GeoServerConfig,
    store_type: &str,
    store_name: &str,
    file_type: &str,
) -> String {
    format!(
        "{}/rest/workspaces/{}/{}/{}/external.{}",
        config.endpoint.trim_end_matches('/'),
        config.workspace,
        store_type,
        store_name,
        file_type
    )
}

/// Register a raster or vector artifact under the given store name.
///
/// Non-success HTTP statuses surface as [`RainError::UpstreamUnavailable`].
pub async fn publish_artifact(
    client: &Client,
    config: &GeoServerConfig,
    path: &Path,
    store_name: &str,
) -> RainResult<()> {
    let (store_type, file_type) = store_route(path).ok_or_else(|| {
        RainError::UpstreamUnavailable(format!(
            "unsupported artifact type for publishing: {}",
            path.display()
        ))
    })?;

    let absolute = std::fs::canonicalize(path)?;
    let url = publish_url(config, store_type, store_name, file_type);

    let response = client
        .put(&url)
        .header(CONTENT_TYPE, "text/plain")
        .body(format!("file://{}", absolute.display()))
        .send()
        .await
        .map_err(|e| RainError::UpstreamUnavailable(format!("PUT {}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RainError::UpstreamUnavailable(format!(
            "publishing {} returned {}",
            store_name, status
        )));
    }

    info!(store = store_name, status = %status, "Published artifact");
    Ok(())
}
