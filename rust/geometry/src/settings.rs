// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellation settings shared by the profile and curve processors

/// Segment count used for full circles when nothing else is configured
pub const DEFAULT_CIRCLE_SEGMENTS: usize = 24;

/// Controls how finely curved geometry is tessellated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometrySettings {
    /// Segments for a full circle; arcs get a proportional share
    pub circle_segments: usize,
}

impl GeometrySettings {
    /// Finer tessellation for measurement-sensitive callers
    pub fn precise() -> Self {
        Self { circle_segments: 72 }
    }

    /// Settings with a custom circle segment count (clamped to at least 8)
    pub fn with_circle_segments(segments: usize) -> Self {
        Self {
            circle_segments: segments.max(8),
        }
    }

    /// Segments to use for an arc spanning `sweep` radians
    #[inline]
    pub fn arc_segments(&self, sweep: f64) -> usize {
        let fraction = (sweep.abs() / std::f64::consts::TAU).min(1.0);
        ((self.circle_segments as f64 * fraction).ceil() as usize).max(2)
    }
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
        }
    }
}
