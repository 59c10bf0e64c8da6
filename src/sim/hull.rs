//! Convex hull geometry and separating-axis overlap test
//!
//! A hull stores its vertices together with one unit edge direction and one
//! unit normal per vertex. Edge `i` runs from vertex `i` to vertex `i + 1`
//! (wrapping), and normal `i` is edge `i` rotated by a quarter turn. The three
//! arrays are built together and only ever transformed together.

use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

use super::body::Pose;
use crate::error::SimError;

/// Closed convex polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexHull {
    vertices: Vec<Vec2>,
    edges: Vec<Vec2>,
    normals: Vec<Vec2>,
}

impl ConvexHull {
    /// Build a hull from vertices in consistent winding order
    ///
    /// Fails with `InvalidConstruction` for fewer than three vertices, a
    /// repeated consecutive vertex, or a polygon that is not convex.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, SimError> {
        let n = vertices.len();
        if n < 3 {
            return Err(SimError::InvalidConstruction(format!(
                "hull needs at least 3 vertices, got {n}"
            )));
        }

        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let side = vertices[(i + 1) % n] - vertices[i];
            let len = side.length();
            if len <= f32::EPSILON {
                return Err(SimError::InvalidConstruction(format!(
                    "zero-length edge at vertex {i}"
                )));
            }
            edges.push(side / len);
        }

        if !is_convex(&edges) {
            return Err(SimError::InvalidConstruction("hull is not convex".into()));
        }

        let normals = edges.iter().map(|e| e.perp()).collect();

        Ok(Self {
            vertices,
            edges,
            normals,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[Vec2] {
        &self.edges
    }

    #[inline]
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false: construction rejects hulls with fewer than 3 vertices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Dot product of every vertex with `axis`, in vertex order
    pub fn projection(&self, axis: Vec2) -> Vec<f32> {
        self.vertices.iter().map(|v| v.dot(axis)).collect()
    }

    /// `(min, max)` of the projection onto `axis`
    pub fn interval(&self, axis: Vec2) -> (f32, f32) {
        self.vertices
            .iter()
            .map(|v| v.dot(axis))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            })
    }

    /// Separating-axis overlap test
    ///
    /// Only the normals of the hull with fewer vertices are tried (the other
    /// hull's on a tie), so this can report a hit for some near-miss pairs.
    /// Touching intervals do not count as overlap.
    pub fn collides(&self, other: &ConvexHull) -> bool {
        let axes = if self.len() < other.len() {
            &self.normals
        } else {
            &other.normals
        };

        axes.iter().all(|&axis| {
            let (min_a, max_a) = self.interval(axis);
            let (min_b, max_b) = other.interval(axis);
            min_a < max_b && min_b < max_a
        })
    }

    /// Point test against this hull's normals, strict on every axis
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.normals.iter().all(|&axis| {
            let (min, max) = self.interval(axis);
            let p = point.dot(axis);
            min < p && p < max
        })
    }

    /// Rotate vertices, edges and normals in place about the local origin
    pub fn rotate(&mut self, angle: f32) {
        let rotation = Mat2::from_angle(angle);
        for v in self
            .vertices
            .iter_mut()
            .chain(self.edges.iter_mut())
            .chain(self.normals.iter_mut())
        {
            *v = rotation * *v;
        }
    }

    /// Copy placed in world space: rotated by `rotation`, then moved to the pose position
    pub fn placed(&self, pose: Pose, rotation: f32) -> ConvexHull {
        let mut world = self.clone();
        world.rotate(rotation);
        let offset = pose.position();
        for v in &mut world.vertices {
            *v += offset;
        }
        world
    }
}

/// Consecutive edge turns never change sign
fn is_convex(edges: &[Vec2]) -> bool {
    let n = edges.len();
    let mut sign = 0.0f32;
    for i in 0..n {
        let cross = edges[i].perp_dot(edges[(i + 1) % n]);
        if cross.abs() <= 1e-6 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-5;

    fn hull(points: &[(f32, f32)]) -> ConvexHull {
        ConvexHull::new(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect()).unwrap()
    }

    fn unit_square(x: f32, y: f32) -> ConvexHull {
        hull(&[(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y + 1.0)])
    }

    #[test]
    fn test_edges_follow_vertex_order() {
        let h = hull(&[(0.0, 0.0), (1.0, 2.0), (-2.0, 1.0)]);
        let expected = [
            Vec2::new(1.0, 2.0).normalize(),
            Vec2::new(-3.0, -1.0).normalize(),
            Vec2::new(2.0, -1.0).normalize(),
        ];
        for (edge, want) in h.edges().iter().zip(expected) {
            assert!((*edge - want).length() < EPS);
        }
        assert_eq!(h.normals().len(), h.vertices().len());
    }

    #[test]
    fn test_normals_are_unit_and_perpendicular() {
        let h = hull(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        for (edge, normal) in h.edges().iter().zip(h.normals()) {
            assert!((normal.length() - 1.0).abs() < EPS);
            assert!(edge.dot(*normal).abs() < EPS);
        }
        // Edge 0 runs (0,0) -> (0,1), so its normal is (-1, 0)
        assert!((h.normals()[0] - Vec2::new(-1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_projection() {
        let h = hull(&[(0.0, 0.0), (1.0, 1.0), (-1.0, 1.0)]);
        let axis = Vec2::new(1.0, 1.0).normalize();
        let proj = h.projection(axis);
        assert_eq!(proj.len(), 3);
        assert!((proj.iter().sum::<f32>() - 2.0f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_overlapping_triangles_collide() {
        let a = hull(&[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let b = hull(&[(1.0, 0.0), (0.8, 1.0), (2.0, 1.0)]);
        assert!(a.collides(&b));
        assert!(b.collides(&a));
    }

    #[test]
    fn test_touching_triangles_do_not_collide() {
        let a = hull(&[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let b = hull(&[(1.0, 0.0), (1.0, 1.0), (2.0, 1.0)]);
        assert!(!a.collides(&b));
    }

    #[test]
    fn test_disjoint_squares_do_not_collide() {
        let a = unit_square(0.0, 0.0);
        let b = unit_square(5.0, 5.0);
        assert!(!a.collides(&b));
        assert!(!b.collides(&a));
    }

    #[test]
    fn test_fewer_vertices_supplies_axes() {
        // Triangle vs square: only the triangle's normals are tried
        let tri = hull(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)]);
        let square = unit_square(0.5, 0.5);
        assert!(tri.collides(&square));
        assert!(square.collides(&tri));
    }

    #[test]
    fn test_contains_point() {
        let square = unit_square(0.0, 0.0);
        assert!(square.contains_point(Vec2::new(0.5, 0.5)));
        assert!(!square.contains_point(Vec2::new(1.0, 0.5)));
        assert!(!square.contains_point(Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut h = hull(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)]);
        h.rotate(PI / 2.0);
        assert!((h.vertices()[1] - Vec2::new(-1.0, 0.0)).length() < EPS);
        assert!((h.vertices()[2] - Vec2::new(0.0, 1.0)).length() < EPS);
        for (edge, normal) in h.edges().iter().zip(h.normals()) {
            assert!(edge.dot(*normal).abs() < EPS);
        }
    }

    #[test]
    fn test_placed_translates_vertices_only() {
        let h = unit_square(0.0, 0.0);
        let world = h.placed(Pose::new(10.0, 20.0, 0.0), 0.0);
        assert_eq!(world.vertices()[0], Vec2::new(10.0, 20.0));
        assert_eq!(world.normals(), h.normals());
    }

    #[test]
    fn test_rejects_degenerate_hulls() {
        let two = ConvexHull::new(vec![Vec2::ZERO, Vec2::X]);
        assert!(matches!(two, Err(SimError::InvalidConstruction(_))));

        let repeated = ConvexHull::new(vec![Vec2::ZERO, Vec2::ZERO, Vec2::X]);
        assert!(matches!(repeated, Err(SimError::InvalidConstruction(_))));

        let concave = ConvexHull::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 0.5),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]);
        assert!(matches!(concave, Err(SimError::InvalidConstruction(_))));
    }
}
