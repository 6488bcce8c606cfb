// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material query endpoint.

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use ifc_lite_materials::{MaterialAggregator, MaterialReport, QuantityCalculator};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

/// Query string of a material request.
#[derive(Debug, Deserialize)]
pub struct MaterialQuery {
    pub material_name: Option<String>,
}

/// GET /material - Elements using a material, with counts and total volume.
pub async fn query_material(
    State(state): State<AppState>,
    Query(params): Query<MaterialQuery>,
) -> Result<Json<MaterialReport>, ApiError> {
    let material_name = params
        .material_name
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::MissingParameter)?;

    tracing::info!(material = %material_name, "Material query");
    let started = Instant::now();

    let model = Arc::clone(&state.model);
    let settings = state.config.geometry_settings();
    let name = material_name.clone();
    let report = tokio::task::spawn_blocking(move || {
        let calculator = QuantityCalculator::with_settings(&model, settings);
        MaterialAggregator::with_shapes(&model, calculator).run(&name)
    })
    .await??;

    tracing::info!(
        material = %material_name,
        total_elements = report.total_elements,
        volume = report.total_material_volume,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Material query complete"
    );

    Ok(Json(report))
}
