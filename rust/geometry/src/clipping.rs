// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Half-space clipping
//!
//! Cuts a closed mesh with a plane, keeps the front side and closes the cut
//! with planar caps so the result still encloses a volume.

use crate::error::Result;
use crate::mesh::Mesh;
use crate::triangulation::{plane_basis, project_to_2d_with_basis, signed_area_2d, triangulate_face};
use nalgebra::{Point2, Point3, Vector3};
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};

/// Plane definition for clipping
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Normal vector (normalized)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Calculate signed distance from point to plane
    /// Positive = in front, Negative = behind
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }

    /// Same plane, opposite side
    pub fn flipped(&self) -> Self {
        Self {
            point: self.point,
            normal: -self.normal,
        }
    }
}

/// Triangle clipping result
#[derive(Debug, Clone)]
pub enum ClipResult {
    /// Triangle is completely in front (keep it)
    AllFront(Triangle),
    /// Triangle is completely behind (discard it)
    AllBehind,
    /// Triangle intersects plane - returns the front part
    Split(SmallVec<[Triangle; 2]>),
}

/// Triangle definition
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit normal; zero for degenerate triangles
    pub fn normal(&self) -> Vector3<f64> {
        let n = (self.v1 - self.v0).cross(&(self.v2 - self.v0));
        let len = n.norm();
        if len > 0.0 {
            n / len
        } else {
            Vector3::zeros()
        }
    }

    /// Calculate triangle area
    pub fn area(&self) -> f64 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0)).norm() * 0.5
    }
}

/// Plane clipper
pub struct ClippingProcessor {
    /// Distance tolerance for "on the plane"
    pub epsilon: f64,
}

impl ClippingProcessor {
    /// Create a new clipping processor
    pub fn new() -> Self {
        Self { epsilon: 1e-6 }
    }

    /// Clip a triangle against a plane
    /// Returns the part in front of the plane, winding preserved
    pub fn clip_triangle(&self, triangle: &Triangle, plane: &Plane) -> ClipResult {
        let v = [triangle.v0, triangle.v1, triangle.v2];
        let d = v.map(|p| plane.signed_distance(&p));
        let front = d.map(|dist| dist >= -self.epsilon);

        match front.iter().filter(|f| **f).count() {
            0 => ClipResult::AllBehind,

            3 => ClipResult::AllFront(*triangle),

            // One vertex in front: rotate so it comes first
            1 => {
                let i = front.iter().position(|f| *f).unwrap_or(0);
                let (a, b, c) = (i, (i + 1) % 3, (i + 2) % 3);

                let p_ab = intersect(v[a], d[a], v[b], d[b]);
                let p_ac = intersect(v[a], d[a], v[c], d[c]);

                ClipResult::Split(smallvec![Triangle::new(v[a], p_ab, p_ac)])
            }

            // Two vertices in front: rotate so the back vertex comes last
            _ => {
                let i = front.iter().position(|f| !*f).unwrap_or(0);
                let (c, a, b) = (i, (i + 1) % 3, (i + 2) % 3);

                let p_bc = intersect(v[b], d[b], v[c], d[c]);
                let p_ac = intersect(v[a], d[a], v[c], d[c]);

                ClipResult::Split(smallvec![
                    Triangle::new(v[a], v[b], p_bc),
                    Triangle::new(v[a], p_bc, p_ac),
                ])
            }
        }
    }

    /// Clip a closed mesh against a plane, keeping the front side
    ///
    /// Openings left on the plane are closed with caps facing away from the
    /// kept side. A mesh fully behind the plane yields an empty mesh.
    pub fn clip_mesh(&self, mesh: &Mesh, plane: &Plane) -> Result<Mesh> {
        let mut result = Mesh::with_capacity(mesh.vertex_count(), mesh.indices.len());

        for [v0, v1, v2] in mesh.triangles() {
            match self.clip_triangle(&Triangle::new(v0, v1, v2), plane) {
                ClipResult::AllFront(tri) => add_triangle_to_mesh(&mut result, &tri),
                ClipResult::AllBehind => {}
                ClipResult::Split(triangles) => {
                    for tri in &triangles {
                        add_triangle_to_mesh(&mut result, tri);
                    }
                }
            }
        }

        if result.is_empty() {
            return Ok(result);
        }

        for tri in self.cap_triangles(&result, plane)? {
            add_triangle_to_mesh(&mut result, &tri);
        }

        Ok(result)
    }

    /// Triangles closing the open boundary of `clipped` that lies on `plane`
    fn cap_triangles(&self, clipped: &Mesh, plane: &Plane) -> Result<Vec<Triangle>> {
        let loops = boundary_loops_on_plane(clipped, plane, self.epsilon * 10.0);
        if loops.is_empty() {
            return Ok(Vec::new());
        }

        let cap_normal = -plane.normal;
        let (u_axis, v_axis) = plane_basis(&cap_normal);

        let mut outers: Vec<(Vec<Point3<f64>>, Vec<Point2<f64>>, f64)> = Vec::new();
        let mut holes: Vec<(Vec<Point3<f64>>, Point2<f64>)> = Vec::new();
        for ring in loops {
            let ring_2d = project_to_2d_with_basis(&ring, &u_axis, &v_axis, &plane.point);
            let area = signed_area_2d(&ring_2d);
            if area > 0.0 {
                outers.push((ring, ring_2d, area));
            } else if area < 0.0 {
                let probe = ring_2d[0];
                holes.push((ring, probe));
            }
        }

        let mut outer_holes: Vec<Vec<Vec<Point3<f64>>>> = vec![Vec::new(); outers.len()];
        for (hole, probe) in holes {
            let container = outers
                .iter()
                .enumerate()
                .filter(|(_, (_, ring_2d, _))| point_in_polygon(&probe, ring_2d))
                .min_by(|(_, (_, _, a)), (_, (_, _, b))| a.total_cmp(b))
                .map(|(i, _)| i);
            if let Some(i) = container {
                outer_holes[i].push(hole);
            }
        }

        let mut caps = Vec::new();
        for ((outer, _, _), holes) in outers.iter().zip(&outer_holes) {
            for [a, b, c] in triangulate_face(outer, holes, &cap_normal)? {
                caps.push(Triangle::new(a, b, c));
            }
        }
        Ok(caps)
    }
}

impl Default for ClippingProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Point where the segment from a front vertex to a back vertex crosses the plane
#[inline]
fn intersect(front: Point3<f64>, d_front: f64, back: Point3<f64>, d_back: f64) -> Point3<f64> {
    let denom = d_front - d_back;
    if denom.abs() < f64::EPSILON {
        return front;
    }
    let t = (d_front / denom).clamp(0.0, 1.0);
    front + (back - front) * t
}

/// Add a triangle to a mesh
fn add_triangle_to_mesh(mesh: &mut Mesh, triangle: &Triangle) {
    mesh.push_triangle(triangle.v0, triangle.v1, triangle.v2);
}

type VertexKey = (i64, i64, i64);

#[inline]
fn vertex_key(p: &Point3<f64>) -> VertexKey {
    const QUANTUM: f64 = 1e9;
    (
        (p.x * QUANTUM).round() as i64,
        (p.y * QUANTUM).round() as i64,
        (p.z * QUANTUM).round() as i64,
    )
}

/// Closed loops of unmatched directed edges lying on the plane, reversed so
/// they wind around the cap's outward normal
fn boundary_loops_on_plane(mesh: &Mesh, plane: &Plane, tolerance: f64) -> Vec<Vec<Point3<f64>>> {
    // Directed edges whose twin is missing
    let mut open: FxHashMap<(VertexKey, VertexKey), (Point3<f64>, Point3<f64>, usize)> =
        FxHashMap::default();

    for tri in mesh.triangles() {
        for k in 0..3 {
            let (from, to) = (tri[k], tri[(k + 1) % 3]);
            let (kf, kt) = (vertex_key(&from), vertex_key(&to));
            if kf == kt {
                continue;
            }
            if let Some(entry) = open.get_mut(&(kt, kf)) {
                entry.2 -= 1;
                if entry.2 == 0 {
                    open.remove(&(kt, kf));
                }
            } else {
                open.entry((kf, kt)).or_insert((from, to, 0)).2 += 1;
            }
        }
    }

    // Reversed cap edges, keyed by their start vertex
    let mut by_start: FxHashMap<VertexKey, Vec<(VertexKey, Point3<f64>)>> = FxHashMap::default();
    let mut edge_count = 0usize;
    for ((kf, kt), (from, to, count)) in open {
        if plane.signed_distance(&from).abs() > tolerance
            || plane.signed_distance(&to).abs() > tolerance
        {
            continue;
        }
        for _ in 0..count {
            by_start.entry(kt).or_default().push((kf, from));
            edge_count += 1;
        }
    }

    let mut loops = Vec::new();
    let starts: Vec<VertexKey> = by_start.keys().copied().collect();
    for start in starts {
        while let Some((mut next, point)) = by_start.get_mut(&start).and_then(|edges| edges.pop()) {
            let mut ring = vec![point];
            let mut closed = false;
            for _ in 0..edge_count {
                if next == start {
                    closed = true;
                    break;
                }
                let Some((after, p)) = by_start.get_mut(&next).and_then(|edges| edges.pop()) else {
                    break;
                };
                ring.push(p);
                next = after;
            }
            if closed && ring.len() >= 3 {
                loops.push(ring);
            }
        }
    }

    loops
}

/// Even-odd point in polygon test
fn point_in_polygon(point: &Point2<f64>, ring: &[Point2<f64>]) -> bool {
    let mut inside = false;
    let n = ring.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (pi, pj) = (ring[i], ring[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
