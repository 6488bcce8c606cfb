// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Router - Dynamic dispatch to geometry processors
//!
//! Routes IFC representation entities to appropriate processors based on type.
//! A router holds per-model state (unit scale, mapped item cache) and is meant
//! to be built once per query on the thread that runs it.

mod processing;
mod transforms;
mod voids;

#[cfg(test)]
mod tests;

use crate::processors::{
    BooleanClippingProcessor, ExtrudedAreaSolidProcessor, FacetedBrepProcessor,
    PolygonalFaceSetProcessor, TriangulatedFaceSetProcessor,
};
use crate::settings::GeometrySettings;
use crate::{Mesh, Result};
use ifc_lite_core::{DecodedEntity, EntityDecoder, IfcSchema, IfcType};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Geometry processor trait
/// Each processor handles one type of IFC representation
pub trait GeometryProcessor {
    /// Process entity into mesh
    fn process(
        &self,
        entity: &DecodedEntity,
        decoder: &mut EntityDecoder,
        schema: &IfcSchema,
    ) -> Result<Mesh>;

    /// Get supported IFC types
    fn supported_types(&self) -> Vec<IfcType>;
}

/// Geometry router - routes entities to processors
pub struct GeometryRouter {
    schema: IfcSchema,
    settings: GeometrySettings,
    processors: HashMap<IfcType, Arc<dyn GeometryProcessor>>,
    /// Cache for IfcRepresentationMap source geometry (MappedItem instancing)
    /// Key: RepresentationMap entity ID, Value: mesh in map coordinates, file units
    mapped_item_cache: RefCell<FxHashMap<u32, Arc<Mesh>>>,
    /// Unit scale factor (e.g., 0.001 for millimeters -> meters)
    /// Applied once to the placed element mesh
    unit_scale: f64,
}

impl GeometryRouter {
    /// Create new router with default processors and settings
    pub fn new() -> Self {
        Self::with_settings(GeometrySettings::default(), 1.0)
    }

    /// Create router with pre-calculated unit scale
    pub fn with_scale(unit_scale: f64) -> Self {
        Self::with_settings(GeometrySettings::default(), unit_scale)
    }

    /// Create router with explicit tessellation settings and unit scale
    pub fn with_settings(settings: GeometrySettings, unit_scale: f64) -> Self {
        let schema = IfcSchema::new();
        let mut router = Self {
            schema: schema.clone(),
            settings,
            processors: HashMap::new(),
            mapped_item_cache: RefCell::new(FxHashMap::default()),
            unit_scale,
        };

        router.register(Box::new(ExtrudedAreaSolidProcessor::with_settings(
            schema, settings,
        )));
        router.register(Box::new(TriangulatedFaceSetProcessor::new()));
        router.register(Box::new(PolygonalFaceSetProcessor::new()));
        router.register(Box::new(FacetedBrepProcessor::new()));
        router.register(Box::new(BooleanClippingProcessor::with_settings(settings)));

        router
    }

    /// Get the current unit scale factor
    pub fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    /// Tessellation settings used by this router's processors
    pub fn settings(&self) -> GeometrySettings {
        self.settings
    }

    /// Register a geometry processor
    pub fn register(&mut self, processor: Box<dyn GeometryProcessor>) {
        let processor_arc: Arc<dyn GeometryProcessor> = Arc::from(processor);
        for ifc_type in processor_arc.supported_types() {
            self.processors.insert(ifc_type, Arc::clone(&processor_arc));
        }
    }

    /// Get schema reference
    pub fn schema(&self) -> &IfcSchema {
        &self.schema
    }
}

impl Default for GeometryRouter {
    fn default() -> Self {
        Self::new()
    }
}
