// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BooleanClipping processor - CSG operations.
//!
//! Handles IfcBooleanResult and IfcBooleanClippingResult for boolean operations
//! (DIFFERENCE, UNION, INTERSECTION).

use crate::{
    clipping::{ClippingProcessor, Plane},
    settings::GeometrySettings,
    Error, Mesh, Point3, Result, Vector3,
};
use ifc_lite_core::{DecodedEntity, EntityDecoder, IfcSchema, IfcType};

use super::brep::FacetedBrepProcessor;
use super::extrusion::ExtrudedAreaSolidProcessor;
use super::helpers::parse_axis2_placement_3d;
use super::tessellated::{PolygonalFaceSetProcessor, TriangulatedFaceSetProcessor};
use crate::router::GeometryProcessor;

/// Maximum recursion depth for nested boolean operations.
const MAX_BOOLEAN_DEPTH: u32 = 20;

/// BooleanResult processor
/// Handles IfcBooleanResult and IfcBooleanClippingResult - CSG operations
///
/// - DIFFERENCE with an IfcHalfSpaceSolid (or IfcPolygonalBoundedHalfSpace,
///   treated as its base plane) clips the first operand and caps the cut,
///   so the result stays a closed solid.
/// - DIFFERENCE with any other solid keeps the first operand unchanged.
/// - UNION merges both operands without removing the overlap.
/// - INTERSECTION yields an empty mesh.
pub struct BooleanClippingProcessor {
    schema: IfcSchema,
    settings: GeometrySettings,
}

impl BooleanClippingProcessor {
    pub fn new() -> Self {
        Self::with_settings(GeometrySettings::default())
    }

    pub fn with_settings(settings: GeometrySettings) -> Self {
        Self {
            schema: IfcSchema::new(),
            settings,
        }
    }

    /// Process a solid operand with depth tracking
    fn process_operand_with_depth(
        &self,
        operand: &DecodedEntity,
        decoder: &mut EntityDecoder,
        depth: u32,
    ) -> Result<Mesh> {
        match operand.ifc_type {
            IfcType::IfcExtrudedAreaSolid => {
                let processor =
                    ExtrudedAreaSolidProcessor::with_settings(self.schema.clone(), self.settings);
                processor.process(operand, decoder, &self.schema)
            }
            IfcType::IfcFacetedBrep => FacetedBrepProcessor::new().process(operand, decoder, &self.schema),
            IfcType::IfcTriangulatedFaceSet => {
                TriangulatedFaceSetProcessor::new().process(operand, decoder, &self.schema)
            }
            IfcType::IfcPolygonalFaceSet => {
                PolygonalFaceSetProcessor::new().process(operand, decoder, &self.schema)
            }
            IfcType::IfcBooleanResult | IfcType::IfcBooleanClippingResult => {
                self.process_with_depth(operand, decoder, depth + 1)
            }
            _ => Err(Error::Unsupported(format!(
                "boolean operand {}",
                operand.ifc_type
            ))),
        }
    }

    /// Parse a half-space solid into the plane bounding the kept side
    ///
    /// With AgreementFlag `.T.` the BaseSurface normal points away from the
    /// half-space material, so subtracting it keeps the side the normal
    /// points to. With `.F.` the kept side is the opposite one.
    fn parse_half_space_solid(
        &self,
        half_space: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Plane> {
        // IfcHalfSpaceSolid / IfcPolygonalBoundedHalfSpace:
        // 0: BaseSurface (IfcPlane)
        // 1: AgreementFlag
        let surface_id = half_space
            .get_ref(0)
            .ok_or_else(|| Error::geometry("HalfSpaceSolid missing BaseSurface"))?;
        let surface = decoder.decode_by_id(surface_id)?;

        let agreement = half_space.get(1).and_then(|v| v.as_bool()).unwrap_or(true);

        if surface.ifc_type != IfcType::IfcPlane {
            return Err(Error::Unsupported(format!(
                "half-space base surface {}",
                surface.ifc_type
            )));
        }

        // IfcPlane: Position (IfcAxis2Placement3D)
        let position_id = surface
            .get_ref(0)
            .ok_or_else(|| Error::geometry("IfcPlane missing Position"))?;
        let position = decoder.decode_by_id(position_id)?;
        let frame = parse_axis2_placement_3d(&position, decoder)?;

        let location = Point3::new(frame[(0, 3)], frame[(1, 3)], frame[(2, 3)]);
        let normal = Vector3::new(frame[(0, 2)], frame[(1, 2)], frame[(2, 2)]);

        Ok(if agreement {
            Plane::new(location, normal)
        } else {
            Plane::new(location, -normal)
        })
    }

    /// Internal processing with depth tracking
    fn process_with_depth(
        &self,
        entity: &DecodedEntity,
        decoder: &mut EntityDecoder,
        depth: u32,
    ) -> Result<Mesh> {
        if depth > MAX_BOOLEAN_DEPTH {
            return Err(Error::geometry(format!(
                "Boolean nesting depth {} exceeds limit {}",
                depth, MAX_BOOLEAN_DEPTH
            )));
        }

        // IfcBooleanResult attributes:
        // 0: Operator (.DIFFERENCE., .UNION., .INTERSECTION.)
        // 1: FirstOperand (base geometry)
        // 2: SecondOperand (clipping geometry)
        let operator = entity.get_enum(0).unwrap_or("DIFFERENCE");

        let first_id = entity
            .get_ref(1)
            .ok_or_else(|| Error::geometry("BooleanResult missing FirstOperand"))?;
        let first_operand = decoder.decode_by_id(first_id)?;
        let mesh = self.process_operand_with_depth(&first_operand, decoder, depth)?;

        if mesh.is_empty() {
            return Ok(mesh);
        }

        let second_id = entity
            .get_ref(2)
            .ok_or_else(|| Error::geometry("BooleanResult missing SecondOperand"))?;
        let second_operand = decoder.decode_by_id(second_id)?;

        match operator {
            "DIFFERENCE" => match second_operand.ifc_type {
                IfcType::IfcHalfSpaceSolid | IfcType::IfcPolygonalBoundedHalfSpace => {
                    let plane = self.parse_half_space_solid(&second_operand, decoder)?;
                    ClippingProcessor::new().clip_mesh(&mesh, &plane)
                }
                // Solid-solid difference keeps the first operand
                _ => Ok(mesh),
            },
            "UNION" => {
                let second_mesh = self.process_operand_with_depth(&second_operand, decoder, depth)?;
                let mut merged = mesh;
                merged.merge(&second_mesh);
                Ok(merged)
            }
            "INTERSECTION" => Ok(Mesh::new()),
            other => Err(Error::Unsupported(format!("boolean operator {}", other))),
        }
    }
}

impl GeometryProcessor for BooleanClippingProcessor {
    fn process(
        &self,
        entity: &DecodedEntity,
        decoder: &mut EntityDecoder,
        _schema: &IfcSchema,
    ) -> Result<Mesh> {
        self.process_with_depth(entity, decoder, 0)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcBooleanResult, IfcType::IfcBooleanClippingResult]
    }
}

impl Default for BooleanClippingProcessor {
    fn default() -> Self {
        Self::new()
    }
}
