// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BRep processor.
//!
//! Handles IfcFacetedBrep: a closed shell of planar faces, each bounded by
//! poly loops with optional inner bounds (holes).

use crate::{triangulation, Error, Mesh, Point3, Result};
use ifc_lite_core::{DecodedEntity, EntityDecoder, IfcSchema, IfcType};

use super::helpers::cartesian_point;
use crate::router::GeometryProcessor;

/// Outer loop plus holes of one face, already oriented
struct FaceData {
    outer_points: Vec<Point3<f64>>,
    hole_points: Vec<Vec<Point3<f64>>>,
}

/// FacetedBrep processor
/// Handles IfcFacetedBrep - explicit mesh with faces
/// Supports faces with inner bounds (holes)
pub struct FacetedBrepProcessor;

impl FacetedBrepProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extract polygon points from an IfcPolyLoop
    fn extract_loop_points(
        loop_entity: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Option<Vec<Point3<f64>>>> {
        if loop_entity.ifc_type != IfcType::IfcPolyLoop {
            return Ok(None);
        }

        let mut points = Vec::new();
        for point_id in loop_entity.get_ref_list(0) {
            let point = decoder.decode_by_id(point_id)?;
            points.push(cartesian_point(&point)?);
        }

        // Drop an explicit closing point
        if points.len() > 3 && points.first() == points.last() {
            points.pop();
        }

        Ok((points.len() >= 3).then_some(points))
    }

    /// Collect the bounds of an IfcFace into outer and hole loops
    fn extract_face(face: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Option<FaceData>> {
        let mut outer_points: Option<Vec<Point3<f64>>> = None;
        let mut hole_points = Vec::new();

        // IfcFace: Bounds
        for bound_id in face.get_ref_list(0) {
            // IfcFaceBound / IfcFaceOuterBound: Bound, Orientation
            let bound = decoder.decode_by_id(bound_id)?;
            let Some(loop_id) = bound.get_ref(0) else {
                continue;
            };
            let loop_entity = decoder.decode_by_id(loop_id)?;
            let Some(mut points) = Self::extract_loop_points(&loop_entity, decoder)? else {
                continue;
            };

            if bound.get(1).and_then(|a| a.as_bool()) == Some(false) {
                points.reverse();
            }

            let is_outer = bound.ifc_type == IfcType::IfcFaceOuterBound;
            if is_outer || outer_points.is_none() {
                if let Some(previous) = outer_points.replace(points) {
                    hole_points.push(previous);
                }
            } else {
                hole_points.push(points);
            }
        }

        Ok(outer_points.map(|outer_points| FaceData {
            outer_points,
            hole_points,
        }))
    }

    fn triangulate(face: &FaceData, mesh: &mut Mesh) -> Result<()> {
        let Some(normal) = triangulation::calculate_polygon_normal(&face.outer_points) else {
            return Ok(());
        };
        for [a, b, c] in triangulation::triangulate_face(&face.outer_points, &face.hole_points, &normal)? {
            mesh.push_triangle(a, b, c);
        }
        Ok(())
    }
}

impl GeometryProcessor for FacetedBrepProcessor {
    fn process(
        &self,
        entity: &DecodedEntity,
        decoder: &mut EntityDecoder,
        _schema: &IfcSchema,
    ) -> Result<Mesh> {
        // IfcFacetedBrep: Outer (IfcClosedShell)
        let shell_id = entity
            .get_ref(0)
            .ok_or_else(|| Error::geometry("FacetedBrep missing Outer shell"))?;
        let shell = decoder.decode_by_id(shell_id)?;

        // IfcClosedShell: CfsFaces
        let mut mesh = Mesh::new();
        for face_id in shell.get_ref_list(0) {
            let face = decoder.decode_by_id(face_id)?;
            if let Some(face_data) = Self::extract_face(&face, decoder)? {
                Self::triangulate(&face_data, &mut mesh)?;
            }
        }

        mesh.orient_outward();
        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcFacetedBrep]
    }
}

impl Default for FacetedBrepProcessor {
    fn default() -> Self {
        Self::new()
    }
}
