// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures and measurement
//!
//! Positions stay in f64 end to end: meshes here feed area and volume
//! integration, not a GPU buffer.

use nalgebra::{Matrix4, Point3};

/// Triangle mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f64>,
    /// Triangle indices (i0, i1, i2), counter-clockwise seen from outside
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex, returning its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.push(position.x);
        self.positions.push(position.y);
        self.positions.push(position.z);
        index
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a triangle with its own three vertices
    #[inline]
    pub fn push_triangle(&mut self, a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) {
        let i0 = self.add_vertex(a);
        let i1 = self.add_vertex(b);
        let i2 = self.add_vertex(c);
        self.add_triangle(i0, i1, i2);
    }

    /// Merge another mesh into this one
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = self.vertex_count() as u32;

        self.positions.reserve(other.positions.len());
        self.indices.reserve(other.indices.len());

        self.positions.extend_from_slice(&other.positions);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Position of vertex `index`
    #[inline]
    pub fn vertex(&self, index: u32) -> Point3<f64> {
        let base = index as usize * 3;
        Point3::new(
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        )
    }

    /// Iterate triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(move |tri| [self.vertex(tri[0]), self.vertex(tri[1]), self.vertex(tri[2])])
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        if self.positions.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            min.x = min.x.min(chunk[0]);
            min.y = min.y.min(chunk[1]);
            min.z = min.z.min(chunk[2]);
            max.x = max.x.max(chunk[0]);
            max.y = max.y.max(chunk[1]);
            max.z = max.z.max(chunk[2]);
        });

        (min, max)
    }

    /// Total area of all triangles
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }

    /// Signed enclosed volume (divergence theorem over the triangle soup)
    ///
    /// Positive for closed meshes with outward-facing triangles.
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum()
    }

    /// Enclosed volume; zero for degenerate or open-and-flat meshes
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Transform all positions by a homogeneous matrix
    ///
    /// Mirroring transforms reverse triangle winding so outward faces stay outward.
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for chunk in self.positions.chunks_exact_mut(3) {
            let p = matrix.transform_point(&Point3::new(chunk[0], chunk[1], chunk[2]));
            chunk[0] = p.x;
            chunk[1] = p.y;
            chunk[2] = p.z;
        }

        if matrix.fixed_view::<3, 3>(0, 0).clone_owned().determinant() < 0.0 {
            self.flip_winding();
        }
    }

    /// Uniformly scale all positions
    pub fn scale(&mut self, factor: f64) {
        if factor == 1.0 {
            return;
        }
        self.positions.iter_mut().for_each(|v| *v *= factor);
    }

    /// Flip a closed but inward-wound mesh so its signed volume is positive
    pub fn orient_outward(&mut self) {
        if self.signed_volume() < 0.0 {
            self.flip_winding();
        }
    }

    /// Reverse the winding of every triangle
    pub fn flip_winding(&mut self) {
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
    }

    /// Clear the mesh
    #[inline]
    pub fn clear(&mut self) {
        self.positions.clear();
        self.indices.clear();
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned box with outward winding, used by tests across the crate
#[cfg(test)]
pub(crate) fn test_box(min: Point3<f64>, max: Point3<f64>) -> Mesh {
    let corners = [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];
    let mut mesh = Mesh::new();
    for corner in corners {
        mesh.add_vertex(corner);
    }
    for [a, b, c] in [
        [0, 2, 1], [0, 3, 2], // bottom
        [4, 5, 6], [4, 6, 7], // top
        [0, 1, 5], [0, 5, 4], // front
        [1, 2, 6], [1, 6, 5], // right
        [2, 3, 7], [2, 7, 6], // back
        [3, 0, 4], [3, 4, 7], // left
    ] {
        mesh.add_triangle(a, b, c);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = Mesh::new();
        assert_eq!(mesh.add_vertex(Point3::new(1.0, 2.0, 3.0)), 0);
        assert_eq!(mesh.add_vertex(Point3::new(4.0, 5.0, 6.0)), 1);
        assert_eq!(mesh.positions, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(mesh.vertex(1), Point3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_merge() {
        let mut mesh1 = test_box(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let mesh2 = test_box(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0));

        mesh1.merge(&mesh2);
        assert_eq!(mesh1.vertex_count(), 16);
        assert_eq!(mesh1.triangle_count(), 24);
        assert_eq!(*mesh1.indices.iter().max().unwrap(), 15);
        assert_relative_eq!(mesh1.volume(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_box_measurements() {
        let mesh = test_box(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(mesh.surface_area(), 22.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.signed_volume(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_volume_is_translation_invariant() {
        let mut mesh = test_box(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        mesh.transform(&Matrix4::new_translation(&Vector3::new(100.0, -50.0, 7.0)));
        assert_relative_eq!(mesh.signed_volume(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mirror_keeps_outward_winding() {
        let mut mesh = test_box(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        mesh.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0)));
        assert_relative_eq!(mesh.signed_volume(), 6.0, epsilon = 1e-12);
        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.x, -1.0);
        assert_relative_eq!(max.x, 0.0);
    }

    #[test]
    fn test_orient_outward() {
        let mut mesh = test_box(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        mesh.flip_winding();
        assert_relative_eq!(mesh.signed_volume(), -6.0, epsilon = 1e-12);
        mesh.orient_outward();
        assert_relative_eq!(mesh.signed_volume(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_is_cubic_in_volume() {
        let mut mesh = test_box(Point3::origin(), Point3::new(1000.0, 1000.0, 1000.0));
        mesh.scale(0.001);
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.surface_area(), 6.0, epsilon = 1e-12);
    }
}
