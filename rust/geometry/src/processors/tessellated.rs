// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellated geometry processors - pre-tessellated/polygon meshes.
//!
//! Handles IfcTriangulatedFaceSet (explicit triangle meshes) and
//! IfcPolygonalFaceSet (polygon meshes requiring triangulation).

use crate::{triangulation, Error, Mesh, Point3, Result};
use ifc_lite_core::{AttributeValue, DecodedEntity, EntityDecoder, IfcSchema, IfcType};

use crate::router::GeometryProcessor;

/// Coordinates of the IfcCartesianPointList3D referenced by attribute 0
fn coordinate_list(entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<Vec<Point3<f64>>> {
    let coords_id = entity
        .get_ref(0)
        .ok_or_else(|| Error::geometry(format!("{} missing Coordinates", entity.ifc_type)))?;
    let coords_entity = decoder.decode_by_id(coords_id)?;

    // IfcCartesianPointList3D: CoordList
    let coord_list = coords_entity
        .get_list(0)
        .ok_or_else(|| Error::geometry("CartesianPointList3D missing CoordList"))?;

    Ok(AttributeValue::parse_coordinate_list_3d(coord_list)
        .into_iter()
        .map(|[x, y, z]| Point3::new(x, y, z))
        .collect())
}

/// Optional PnIndex remapping (1-based in the file, 0-based here)
fn pn_index(entity: &DecodedEntity, index: usize) -> Option<Vec<u32>> {
    let list = entity.get_list(index)?;
    Some(
        list.iter()
            .filter_map(|v| v.as_int())
            .map(|v| if v > 0 { (v - 1) as u32 } else { u32::MAX })
            .collect(),
    )
}

/// Resolve a 0-based CoordIndex through PnIndex when present
#[inline]
fn remap(index: u32, pn_index: Option<&[u32]>) -> Option<u32> {
    match pn_index {
        Some(map) => map.get(index as usize).copied().filter(|i| *i != u32::MAX),
        None => Some(index),
    }
}

/// Whether the face set declares itself closed (`.T.`); unknown counts as closed
fn is_closed(entity: &DecodedEntity, index: usize) -> bool {
    entity.get(index).and_then(|a| a.as_bool()).unwrap_or(true)
}

/// TriangulatedFaceSet processor
/// Handles IfcTriangulatedFaceSet - explicit triangle meshes
pub struct TriangulatedFaceSetProcessor;

impl TriangulatedFaceSetProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryProcessor for TriangulatedFaceSetProcessor {
    fn process(
        &self,
        entity: &DecodedEntity,
        decoder: &mut EntityDecoder,
        _schema: &IfcSchema,
    ) -> Result<Mesh> {
        // IfcTriangulatedFaceSet attributes:
        // 0: Coordinates (IfcCartesianPointList3D)
        // 1: Normals (optional)
        // 2: Closed (optional)
        // 3: CoordIndex (list of triangles, 1-based)
        // 4: PnIndex (optional)
        let points = coordinate_list(entity, decoder)?;

        let faces = entity
            .get_list(3)
            .ok_or_else(|| Error::geometry("TriangulatedFaceSet missing CoordIndex"))?;
        let triangles = AttributeValue::parse_index_tuples(faces);
        let pn = pn_index(entity, 4);

        let mut mesh = Mesh::with_capacity(points.len(), triangles.len() * 3);
        for p in &points {
            mesh.add_vertex(*p);
        }

        let vertex_count = points.len() as u32;
        for tri in triangles.iter().filter(|t| t.len() == 3) {
            let mapped: Option<Vec<u32>> = tri.iter().map(|&i| remap(i, pn.as_deref())).collect();
            match mapped {
                Some(v) if v.iter().all(|&i| i < vertex_count) => mesh.add_triangle(v[0], v[1], v[2]),
                _ => {
                    return Err(Error::geometry(format!(
                        "TriangulatedFaceSet #{} has out-of-range index",
                        entity.id
                    )))
                }
            }
        }

        if is_closed(entity, 2) {
            mesh.orient_outward();
        }

        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcTriangulatedFaceSet]
    }
}

impl Default for TriangulatedFaceSetProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles IfcPolygonalFaceSet - explicit polygon meshes that need triangulation
/// Unlike IfcTriangulatedFaceSet, faces can be arbitrary polygons (not just triangles)
pub struct PolygonalFaceSetProcessor;

impl PolygonalFaceSetProcessor {
    pub fn new() -> Self {
        Self
    }

    fn parse_index_loop(indices: &[AttributeValue], points: &[Point3<f64>], pn_index: Option<&[u32]>) -> Vec<Point3<f64>> {
        indices
            .iter()
            .filter_map(|value| {
                let idx = value.as_int().filter(|i| *i > 0)?;
                let mapped = remap((idx - 1) as u32, pn_index)?;
                points.get(mapped as usize).copied()
            })
            .collect()
    }
}

impl GeometryProcessor for PolygonalFaceSetProcessor {
    fn process(
        &self,
        entity: &DecodedEntity,
        decoder: &mut EntityDecoder,
        _schema: &IfcSchema,
    ) -> Result<Mesh> {
        // IfcPolygonalFaceSet attributes:
        // 0: Coordinates (IfcCartesianPointList3D)
        // 1: Closed (optional)
        // 2: Faces (list of IfcIndexedPolygonalFace)
        // 3: PnIndex (optional)
        let points = coordinate_list(entity, decoder)?;
        let pn = pn_index(entity, 3);

        let mut mesh = Mesh::new();
        for face_id in entity.get_ref_list(2) {
            let face = decoder.decode_by_id(face_id)?;

            // IfcIndexedPolygonalFace: CoordIndex
            // IfcIndexedPolygonalFaceWithVoids: CoordIndex, InnerCoordIndices
            let Some(coord_index) = face.get_list(0) else {
                continue;
            };
            let outer = Self::parse_index_loop(coord_index, &points, pn.as_deref());
            if outer.len() < 3 {
                continue;
            }

            let holes: Vec<Vec<Point3<f64>>> = if face.ifc_type == IfcType::IfcIndexedPolygonalFaceWithVoids {
                face.get_list(1)
                    .unwrap_or(&[])
                    .iter()
                    .filter_map(|inner| inner.as_list())
                    .map(|inner| Self::parse_index_loop(inner, &points, pn.as_deref()))
                    .filter(|h| h.len() >= 3)
                    .collect()
            } else {
                Vec::new()
            };

            let Some(normal) = triangulation::calculate_polygon_normal(&outer) else {
                continue;
            };
            for [a, b, c] in triangulation::triangulate_face(&outer, &holes, &normal)? {
                mesh.push_triangle(a, b, c);
            }
        }

        if is_closed(entity, 1) {
            mesh.orient_outward();
        }

        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcPolygonalFaceSet]
    }
}

impl Default for PolygonalFaceSetProcessor {
    fn default() -> Self {
        Self::new()
    }
}
