// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core element processing: resolving representations, processing items, and caching.

use super::GeometryRouter;
use crate::processors::helpers::parse_axis2_placement_3d;
use crate::{Error, Mesh, Result};
use ifc_lite_core::{DecodedEntity, EntityDecoder, IfcType};
use nalgebra::Matrix4;
use std::sync::Arc;

/// Maximum nesting of MappedItem -> RepresentationMap -> MappedItem chains
const MAX_MAPPING_DEPTH: usize = 8;

/// Representation types that describe body geometry (excluding mapped)
fn is_direct_body(rep_type: &str) -> bool {
    matches!(
        rep_type,
        "Body"
            | "SweptSolid"
            | "SolidModel"
            | "Brep"
            | "CSG"
            | "Clipping"
            | "SurfaceModel"
            | "Tessellation"
            | "AdvancedSweptSolid"
            | "AdvancedBrep"
    )
}

impl GeometryRouter {
    /// Process building element (IfcWall, IfcBeam, etc.) into mesh
    /// Follows the representation chain:
    /// Element → Representation → ShapeRepresentation → Items
    ///
    /// The returned mesh is placed in world coordinates and scaled to metres.
    /// Elements without body geometry, or whose geometry comes out empty,
    /// are reported as errors.
    pub fn process_element(
        &self,
        element: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Mesh> {
        // IfcProduct: GlobalId, OwnerHistory, Name, Description, ObjectType, ObjectPlacement, Representation, Tag
        let representation_id = element.get_ref(6).ok_or_else(|| {
            Error::geometry(format!("Element #{} has no representation", element.id))
        })?;
        let representation = decoder.decode_by_id(representation_id)?;

        if representation.ifc_type != IfcType::IfcProductDefinitionShape {
            return Err(Error::geometry(format!(
                "Expected IfcProductDefinitionShape, got {}",
                representation.ifc_type
            )));
        }

        // IfcProductDefinitionShape: Name, Description, Representations
        let mut representations = Vec::new();
        for rep_id in representation.get_ref_list(2) {
            representations.push(decoder.decode_by_id(rep_id)?);
        }

        // Skip MappedRepresentation when direct body geometry exists to avoid duplicates
        let has_direct_geometry = representations.iter().any(|rep| {
            rep.ifc_type == IfcType::IfcShapeRepresentation
                && rep.get_string(2).map(is_direct_body).unwrap_or(false)
        });

        let mut combined_mesh = Mesh::new();
        for shape_rep in &representations {
            if shape_rep.ifc_type != IfcType::IfcShapeRepresentation {
                continue;
            }

            // RepresentationType (attribute 2); 'Axis', 'FootPrint', 'Curve2D' etc. are skipped
            match shape_rep.get_string(2) {
                Some("MappedRepresentation") if has_direct_geometry => continue,
                Some("MappedRepresentation") => {}
                Some(rep_type) if is_direct_body(rep_type) => {}
                Some(_) => continue,
                None => {}
            }

            for item_id in shape_rep.get_ref_list(3) {
                let item = decoder.decode_by_id(item_id)?;
                let mesh = self.process_representation_item(&item, decoder)?;
                combined_mesh.merge(&mesh);
            }
        }

        if combined_mesh.is_empty() {
            return Err(Error::EmptyMesh(format!(
                "Element #{} produced no body geometry",
                element.id
            )));
        }

        self.apply_placement(element, decoder, &mut combined_mesh)?;
        if self.unit_scale != 1.0 {
            combined_mesh.scale(self.unit_scale);
        }

        Ok(combined_mesh)
    }

    /// Process a single representation item in its local coordinates and file units
    pub fn process_representation_item(
        &self,
        item: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Mesh> {
        self.process_item_with_depth(item, decoder, 0)
    }

    fn process_item_with_depth(
        &self,
        item: &DecodedEntity,
        decoder: &mut EntityDecoder,
        depth: usize,
    ) -> Result<Mesh> {
        if item.ifc_type == IfcType::IfcMappedItem {
            return self.process_mapped_item_cached(item, decoder, depth);
        }

        match self.processors.get(&item.ifc_type) {
            Some(processor) => processor.process(item, decoder, &self.schema),
            None => Err(Error::Unsupported(format!(
                "representation item {} (#{})",
                item.ifc_type, item.id
            ))),
        }
    }

    /// Process MappedItem, caching the source geometry per RepresentationMap
    fn process_mapped_item_cached(
        &self,
        item: &DecodedEntity,
        decoder: &mut EntityDecoder,
        depth: usize,
    ) -> Result<Mesh> {
        if depth >= MAX_MAPPING_DEPTH {
            return Err(Error::geometry(format!(
                "MappedItem #{} nests deeper than {}",
                item.id, MAX_MAPPING_DEPTH
            )));
        }

        // IfcMappedItem attributes:
        // 0: MappingSource (IfcRepresentationMap)
        // 1: MappingTarget (IfcCartesianTransformationOperator)
        let source_id = item
            .get_ref(0)
            .ok_or_else(|| Error::geometry("MappedItem missing MappingSource"))?;

        let mapping_transform = match item.get_ref(1) {
            Some(target_id) => {
                let target = decoder.decode_by_id(target_id)?;
                self.parse_cartesian_transformation_operator(&target, decoder)?
            }
            None => Matrix4::identity(),
        };

        let cached = self.mapped_item_cache.borrow().get(&source_id).cloned();
        let source_mesh = match cached {
            Some(mesh) => mesh,
            None => {
                let mesh = Arc::new(self.process_representation_map(source_id, decoder, depth)?);
                self.mapped_item_cache
                    .borrow_mut()
                    .insert(source_id, Arc::clone(&mesh));
                mesh
            }
        };

        let mut mesh = source_mesh.as_ref().clone();
        if mapping_transform != Matrix4::identity() {
            mesh.transform(&mapping_transform);
        }
        Ok(mesh)
    }

    /// Geometry of an IfcRepresentationMap, placed by its MappingOrigin
    fn process_representation_map(
        &self,
        source_id: u32,
        decoder: &mut EntityDecoder,
        depth: usize,
    ) -> Result<Mesh> {
        // IfcRepresentationMap: MappingOrigin, MappedRepresentation
        let source = decoder.decode_by_id(source_id)?;
        let rep_id = source
            .get_ref(1)
            .ok_or_else(|| Error::geometry("RepresentationMap missing MappedRepresentation"))?;
        let mapped_rep = decoder.decode_by_id(rep_id)?;

        let mut mesh = Mesh::new();
        for sub_item_id in mapped_rep.get_ref_list(3) {
            let sub_item = decoder.decode_by_id(sub_item_id)?;
            let sub_mesh = self.process_item_with_depth(&sub_item, decoder, depth + 1)?;
            mesh.merge(&sub_mesh);
        }

        if let Some(origin_id) = source.get_ref(0) {
            let origin = decoder.decode_by_id(origin_id)?;
            if origin.ifc_type == IfcType::IfcAxis2Placement3D {
                let origin_transform = parse_axis2_placement_3d(&origin, decoder)?;
                if origin_transform != Matrix4::identity() {
                    mesh.transform(&origin_transform);
                }
            }
        }

        Ok(mesh)
    }
}
