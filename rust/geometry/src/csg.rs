// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh booleans through csgrs BSP trees
//!
//! Used to cut opening solids out of host elements. The BSP result stays a
//! closed surface, so area and divergence volume remain valid after the cut.

use crate::{Error, Mesh, Point3, Result};
use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CsgMesh};
use csgrs::traits::CSG;

/// Normals shorter than this mark a degenerate triangle
const DEGENERATE_EPSILON: f64 = 1e-12;

/// `host` minus `tool`, both closed and outward wound
pub fn subtract_mesh(host: &Mesh, tool: &Mesh) -> Result<Mesh> {
    if host.is_empty() {
        return Err(Error::EmptyMesh("boolean host".to_string()));
    }
    if tool.is_empty() || !bounds_overlap(host, tool) {
        return Ok(host.clone());
    }

    let result = to_csg(host).difference(&to_csg(tool));
    Ok(from_csg(&result))
}

fn bounds_overlap(a: &Mesh, b: &Mesh) -> bool {
    let (a_min, a_max) = a.bounds();
    let (b_min, b_max) = b.bounds();
    (0..3).all(|axis| a_min[axis] < b_max[axis] && b_min[axis] < a_max[axis])
}

fn to_csg(mesh: &Mesh) -> CsgMesh<()> {
    let polygons: Vec<Polygon<()>> = mesh
        .triangles()
        .filter_map(|[a, b, c]| {
            let normal = (b - a).cross(&(c - a)).try_normalize(DEGENERATE_EPSILON)?;
            Some(Polygon::new(
                vec![
                    Vertex::new(a, normal),
                    Vertex::new(b, normal),
                    Vertex::new(c, normal),
                ],
                None,
            ))
        })
        .collect();

    CsgMesh::from_polygons(&polygons, None)
}

/// BSP splits of triangles stay convex, so each polygon is fanned in order
fn from_csg(csg: &CsgMesh<()>) -> Mesh {
    let mut mesh = Mesh::new();

    for polygon in &csg.polygons {
        let points: Vec<Point3<f64>> = polygon
            .vertices
            .iter()
            .map(|v| Point3::new(v.pos.x, v.pos.y, v.pos.z))
            .collect();
        if points.len() < 3 {
            continue;
        }

        for i in 1..points.len() - 1 {
            let (a, b, c) = (points[0], points[i], points[i + 1]);
            if (b - a).cross(&(c - a)).norm() > DEGENERATE_EPSILON {
                mesh.push_triangle(a, b, c);
            }
        }
    }

    mesh
}
