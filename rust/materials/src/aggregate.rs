// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material aggregation - which elements use a material, and how much of it
//!
//! Every element is visited in file order. An element can match through its
//! layers (case-insensitive substring on a layer's material name) and through
//! its directly assigned material (case-insensitive equality). Both matches
//! count, so such an element is tallied twice and contributes both volumes.

use crate::error::Result;
use crate::layers::{extract_layers, LayerEntry};
use crate::model::IfcModel;
use crate::quantities::{area_or_zero, volume_or_zero, QuantityCalculator, ShapeProperties};
use crate::resolver::{MaterialAssociation, MaterialResolver};
use serde::Serialize;

/// Outcome of one material query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaterialReport {
    pub total_elements: usize,
    pub elements_entirely_made_of_material: usize,
    pub elements_using_material_in_layers: usize,
    /// Cubic metres for whole-element matches; area times layer thickness otherwise
    pub total_material_volume: f64,
    pub elements: Vec<ElementRecord>,
}

/// Per-element breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ElementRecord {
    pub name: Option<String>,
    pub global_id: Option<String>,
    /// Matching layers only
    pub material_layers: Vec<LayerEntry>,
    pub entirely_made_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_thickness: Option<f64>,
}

/// Runs material queries against one model
pub struct MaterialAggregator<'m, S> {
    model: &'m IfcModel,
    shapes: S,
}

impl<'m> MaterialAggregator<'m, QuantityCalculator<'m>> {
    /// Aggregator measuring geometry with precise tessellation
    pub fn new(model: &'m IfcModel) -> Self {
        Self::with_shapes(model, QuantityCalculator::for_model(model))
    }
}

impl<'m, S: ShapeProperties> MaterialAggregator<'m, S> {
    pub fn with_shapes(model: &'m IfcModel, shapes: S) -> Self {
        Self { model, shapes }
    }

    /// Aggregate counts and volume for `material_name`
    pub fn run(&self, material_name: &str) -> Result<MaterialReport> {
        let target = material_name.to_lowercase();
        let resolver = MaterialResolver::new(self.model);
        let mut decoder = self.model.decoder();
        let mut report = MaterialReport::default();

        for element_ref in self.model.elements() {
            let Some(association) = resolver.resolve(element_ref.id, &mut decoder)? else {
                continue;
            };
            if association.is_empty() {
                continue;
            }
            let direct = resolver.direct_material(element_ref.id, &mut decoder)?;
            let element = decoder.decode_at(element_ref.start, element_ref.end)?;

            let mut record = ElementRecord {
                name: element.get_string(2).map(str::to_owned),
                global_id: element.get_string(0).map(str::to_owned),
                material_layers: Vec::new(),
                entirely_made_of: None,
                total_thickness: None,
            };

            if let MaterialAssociation::LayeredUsage(_) = association {
                let summary = extract_layers(&resolver, element_ref.id, &mut decoder)?;
                let matching = summary.matching(&target);
                if !matching.is_empty() {
                    let area = area_or_zero(&self.shapes, &element, &mut decoder);
                    report.total_material_volume += area * summary.total_thickness;
                    report.total_elements += 1;
                    report.elements_using_material_in_layers += 1;

                    record.material_layers = matching;
                    record.total_thickness = Some(summary.total_thickness);
                }
            }

            if let Some(name) = direct.and_then(|m| m.name) {
                if name.to_lowercase() == target {
                    let volume = volume_or_zero(&self.shapes, &element, &mut decoder);
                    report.total_material_volume += volume;
                    report.total_elements += 1;
                    report.elements_entirely_made_of_material += 1;

                    record.entirely_made_of = Some(name);
                }
            }

            if !record.material_layers.is_empty() || record.entirely_made_of.is_some() {
                report.elements.push(record);
            }
        }

        tracing::debug!(
            material = material_name,
            total_elements = report.total_elements,
            entirely = report.elements_entirely_made_of_material,
            layered = report.elements_using_material_in_layers,
            volume = report.total_material_volume,
            "Material query complete"
        );

        Ok(report)
    }
}

/// Query `model` for `material_name` with a fresh decoder and geometry router
pub fn retrieve_elements_by_material(model: &IfcModel, material_name: &str) -> Result<MaterialReport> {
    MaterialAggregator::new(model).run(material_name)
}
