// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting 2D profiles to closed 3D meshes

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::profile::{Profile2D, Triangulation};
use nalgebra::{Matrix4, Point2, Point3};

/// Extrude a 2D profile along the Z axis
///
/// The result is closed and wound outward: bottom cap at z = 0, top cap at
/// z = depth, one quad per boundary edge.
#[inline]
pub fn extrude_profile(
    profile: &Profile2D,
    depth: f64,
    transform: Option<Matrix4<f64>>,
) -> Result<Mesh> {
    if depth <= 0.0 || !depth.is_finite() {
        return Err(Error::InvalidExtrusion(format!(
            "Depth must be positive, got {}",
            depth
        )));
    }

    let mut profile = profile.clone();
    profile.normalize();
    let triangulation = profile.triangulate()?;

    let boundary_len = profile.outer.len() + profile.holes.iter().map(|h| h.len()).sum::<usize>();
    let mut mesh = Mesh::with_capacity(
        triangulation.points.len() * 2 + boundary_len * 4,
        triangulation.triangles.len() * 6 + boundary_len * 6,
    );

    create_cap_mesh(&triangulation, 0.0, true, &mut mesh);
    create_cap_mesh(&triangulation, depth, false, &mut mesh);

    create_side_walls(&profile.outer, depth, &mut mesh);
    for hole in &profile.holes {
        create_side_walls(hole, depth, &mut mesh);
    }

    if let Some(mat) = transform {
        apply_transform(&mut mesh, &mat);
    }

    Ok(mesh)
}

/// Cap at height `z`; the bottom cap is reversed so it faces -Z
fn create_cap_mesh(triangulation: &Triangulation, z: f64, reverse: bool, mesh: &mut Mesh) {
    let base = mesh.vertex_count() as u32;

    for p in &triangulation.points {
        mesh.add_vertex(Point3::new(p.x, p.y, z));
    }

    for &[a, b, c] in &triangulation.triangles {
        let (a, b, c) = (base + a as u32, base + b as u32, base + c as u32);
        if reverse {
            mesh.add_triangle(a, c, b);
        } else {
            mesh.add_triangle(a, b, c);
        }
    }
}

/// Side quads for one ring; outward for CCW outer rings and CW holes
fn create_side_walls(boundary: &[Point2<f64>], depth: f64, mesh: &mut Mesh) {
    let n = boundary.len();
    if n < 2 {
        return;
    }

    for i in 0..n {
        let p0 = boundary[i];
        let p1 = boundary[(i + 1) % n];

        let b0 = mesh.add_vertex(Point3::new(p0.x, p0.y, 0.0));
        let b1 = mesh.add_vertex(Point3::new(p1.x, p1.y, 0.0));
        let t1 = mesh.add_vertex(Point3::new(p1.x, p1.y, depth));
        let t0 = mesh.add_vertex(Point3::new(p0.x, p0.y, depth));

        mesh.add_triangle(b0, b1, t1);
        mesh.add_triangle(b0, t1, t0);
    }
}

/// Apply transformation matrix to mesh
#[inline]
pub fn apply_transform(mesh: &mut Mesh, transform: &Matrix4<f64>) {
    mesh.transform(transform);
}
