// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check and API information endpoints.

use crate::AppState;
use axum::{extract::State, Json};
use ifc_lite_materials::ModelSummary;
use serde::Serialize;

const SERVICE: &str = "ifc-lite-material-server";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub model: ModelSummary,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: SERVICE,
        model: state.model.summary(),
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: SERVICE,
        version: env!("CARGO_PKG_VERSION"),
        description: "Material usage and volume queries over a loaded IFC model",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check with loaded model summary",
            },
            EndpointInfo {
                method: "GET",
                path: "/material?material_name=<name>",
                description: "Elements using a material and its total volume",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/material?material_name=<name>",
                description: "Versioned alias of /material",
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::get_json;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_reports_model() {
        let (status, body) = get_json("/api/v1/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "ifc-lite-material-server");
        assert_eq!(body["model"]["schema_version"], "IFC4");
        assert_eq!(body["model"]["element_count"], 2);
        assert_eq!(body["model"]["material_relation_count"], 2);
    }

    #[tokio::test]
    async fn test_info_lists_material_endpoint() {
        let (status, body) = get_json("/").await;

        assert_eq!(status, StatusCode::OK);
        let paths: Vec<&str> = body["endpoints"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["path"].as_str())
            .collect();
        assert!(paths.contains(&"/material?material_name=<name>"));
    }
}
