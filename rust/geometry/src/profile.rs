// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Profile definitions and triangulation

use crate::error::{Error, Result};
use crate::triangulation::{counter_clockwise_triangles, signed_area_2d, triangulate_polygon_with_holes};
use nalgebra::Point2;

/// 2D Profile with optional holes
#[derive(Debug, Clone)]
pub struct Profile2D {
    /// Outer boundary (counter-clockwise once normalized)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise once normalized)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile2D {
    /// Create a new profile
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Add a hole to the profile
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(hole);
    }

    /// Drop closing duplicates and force outer CCW, holes CW
    pub fn normalize(&mut self) {
        dedup_ring(&mut self.outer);
        if signed_area_2d(&self.outer) < 0.0 {
            self.outer.reverse();
        }
        self.holes.retain_mut(|hole| {
            dedup_ring(hole);
            if signed_area_2d(hole) > 0.0 {
                hole.reverse();
            }
            hole.len() >= 3
        });
    }

    /// Net enclosed area (outer minus holes)
    pub fn area(&self) -> f64 {
        signed_area_2d(&self.outer).abs()
            - self
                .holes
                .iter()
                .map(|h| signed_area_2d(h).abs())
                .sum::<f64>()
    }

    /// Triangulate the profile using earcutr
    /// Triangles are counter-clockwise regardless of ring orientation.
    pub fn triangulate(&self) -> Result<Triangulation> {
        if self.outer.len() < 3 {
            return Err(Error::InvalidProfile(
                "Profile must have at least 3 vertices".to_string(),
            ));
        }

        let indices = triangulate_polygon_with_holes(&self.outer, &self.holes)?;

        let mut points = Vec::with_capacity(
            self.outer.len() + self.holes.iter().map(|h| h.len()).sum::<usize>(),
        );
        points.extend_from_slice(&self.outer);
        for hole in self.holes.iter().filter(|h| h.len() >= 3) {
            points.extend_from_slice(hole);
        }

        let triangles = counter_clockwise_triangles(&points, &indices);
        Ok(Triangulation { points, triangles })
    }
}

/// Triangulated profile result
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// All vertices (outer + holes)
    pub points: Vec<Point2<f64>>,
    /// Counter-clockwise triangles
    pub triangles: Vec<[usize; 3]>,
}

/// Remove repeated points, including a closing point equal to the first
fn dedup_ring(ring: &mut Vec<Point2<f64>>) {
    const EPS: f64 = 1e-12;
    ring.dedup_by(|a, b| (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS);
    while ring.len() > 1 {
        let (first, last) = (ring[0], ring[ring.len() - 1]);
        if (first.x - last.x).abs() < EPS && (first.y - last.y).abs() < EPS {
            ring.pop();
        } else {
            break;
        }
    }
}

/// Create a rectangular profile centered on the origin
#[inline]
pub fn create_rectangle(width: f64, height: f64) -> Profile2D {
    let half_w = width / 2.0;
    let half_h = height / 2.0;

    Profile2D::new(vec![
        Point2::new(-half_w, -half_h),
        Point2::new(half_w, -half_h),
        Point2::new(half_w, half_h),
        Point2::new(-half_w, half_h),
    ])
}

/// Points on a full circle, counter-clockwise
pub fn circle_points(radius: f64, segments: usize) -> Vec<Point2<f64>> {
    (0..segments)
        .map(|i| {
            let angle = std::f64::consts::TAU * (i as f64) / (segments as f64);
            Point2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Create a circular profile (with optional hole)
pub fn create_circle(radius: f64, hole_radius: Option<f64>, segments: usize) -> Profile2D {
    let mut profile = Profile2D::new(circle_points(radius, segments));

    if let Some(hole_r) = hole_radius.filter(|r| *r > 0.0) {
        let mut hole = circle_points(hole_r, segments);
        hole.reverse();
        profile.add_hole(hole);
    }

    profile
}
