// src/math/geometry/mesh.rs

use crate::math::{
    error::{MathError, MathResult},
    types::*,
    utils::angles,
};
use std::collections::HashMap;

/// Dreiecksnetz: Vertices plus Index-Tripel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point2D>,
    pub triangles: Vec<[usize; 3]>,
}

/// Kennzahlen eines Netzes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStatistics {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub min_angle_deg: f64,
    pub max_angle_deg: f64,
    pub min_area: f64,
    pub max_area: f64,
    pub total_area: f64,
}

/// Ungerichtete Kante, kleinerer Index zuerst.
pub fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

impl Mesh {
    pub fn new(vertices: Vec<Point2D>, triangles: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_points(&self, index: usize) -> [Point2D; 3] {
        let [a, b, c] = self.triangles[index];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Vorzeichenbehaftete Fläche (positiv für CCW).
    pub fn signed_area(&self, index: usize) -> f64 {
        let [a, b, c] = self.triangle_points(index);
        0.5 * signed_area_doubled(a, b, c)
    }

    pub fn triangle_area(&self, index: usize) -> f64 {
        self.signed_area(index).abs()
    }

    pub fn total_area(&self) -> f64 {
        (0..self.triangles.len()).map(|i| self.triangle_area(i)).sum()
    }

    /// Prüft Indizes und Nicht-Degeneriertheit aller Dreiecke.
    pub fn validate(&self) -> MathResult<()> {
        let n = self.vertices.len();
        for (i, &[a, b, c]) in self.triangles.iter().enumerate() {
            if a >= n || b >= n || c >= n {
                return Err(MathError::triangulation(format!(
                    "triangle {} ({}, {}, {}) references a vertex outside 0..{}",
                    i, a, b, c, n
                )));
            }
            if a == b || b == c || a == c {
                return Err(MathError::triangulation(format!(
                    "triangle {} ({}, {}, {}) repeats a vertex",
                    i, a, b, c
                )));
            }
            if self.signed_area(i) == 0.0 {
                return Err(MathError::triangulation(format!(
                    "triangle {} ({}, {}, {}) is degenerate",
                    i, a, b, c
                )));
            }
        }
        Ok(())
    }

    /// Anzahl der Dreiecke je ungerichteter Kante.
    pub fn edge_use_counts(&self) -> HashMap<(usize, usize), usize> {
        let mut counts = HashMap::with_capacity(self.triangles.len() * 3 / 2 + 1);
        for &[a, b, c] in &self.triangles {
            for (p, q) in [(a, b), (b, c), (c, a)] {
                *counts.entry(edge_key(p, q)).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Randkanten: gehören zu genau einem Dreieck. Sortiert.
    pub fn boundary_edges(&self) -> Vec<[usize; 2]> {
        let mut edges: Vec<[usize; 2]> = self
            .edge_use_counts()
            .into_iter()
            .filter(|&(_, count)| count == 1)
            .map(|((a, b), _)| [a, b])
            .collect();
        edges.sort_unstable();
        edges
    }

    /// `true` für Vertices an einer Randkante oder ohne jede Kante.
    pub fn boundary_vertex_mask(&self) -> Vec<bool> {
        let mut has_edge = vec![false; self.vertices.len()];
        let mut boundary = vec![false; self.vertices.len()];
        for ((a, b), count) in self.edge_use_counts() {
            has_edge[a] = true;
            has_edge[b] = true;
            if count == 1 {
                boundary[a] = true;
                boundary[b] = true;
            }
        }
        boundary
            .into_iter()
            .zip(has_edge)
            .map(|(on_boundary, connected)| on_boundary || !connected)
            .collect()
    }

    /// Dreiecke als geschlossene Linienzüge (a, b, c, a) für Renderer.
    pub fn elements(&self) -> Vec<[Point2D; 4]> {
        (0..self.triangles.len())
            .map(|i| {
                let [a, b, c] = self.triangle_points(i);
                [a, b, c, a]
            })
            .collect()
    }

    /// Innenwinkel eines Dreiecks in Grad.
    pub fn triangle_angles_deg(&self, index: usize) -> [f64; 3] {
        let [a, b, c] = self.triangle_points(index);
        let angle_at = |p: Point2D, q: Point2D, r: Point2D| {
            let u = q - p;
            let v = r - p;
            angles::rad_to_deg(u.perp_dot(v).abs().atan2(u.x * v.x + u.y * v.y))
        };
        [angle_at(a, b, c), angle_at(b, c, a), angle_at(c, a, b)]
    }

    pub fn statistics(&self) -> MeshStatistics {
        let mut stats = MeshStatistics {
            vertex_count: self.vertices.len(),
            triangle_count: self.triangles.len(),
            min_angle_deg: if self.is_empty() { 0.0 } else { f64::INFINITY },
            max_angle_deg: 0.0,
            min_area: if self.is_empty() { 0.0 } else { f64::INFINITY },
            max_area: 0.0,
            total_area: 0.0,
        };
        for i in 0..self.triangles.len() {
            let area = self.triangle_area(i);
            stats.min_area = stats.min_area.min(area);
            stats.max_area = stats.max_area.max(area);
            stats.total_area += area;
            for angle in self.triangle_angles_deg(i) {
                stats.min_angle_deg = stats.min_angle_deg.min(angle);
                stats.max_angle_deg = stats.max_angle_deg.max(angle);
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::coord;

    /// Einheitsquadrat aus zwei Dreiecken plus Mittelpunkt-Fächer.
    fn fan_square() -> Mesh {
        Mesh::new(
            vec![
                coord! { x: 0.0, y: 0.0 },
                coord! { x: 1.0, y: 0.0 },
                coord! { x: 1.0, y: 1.0 },
                coord! { x: 0.0, y: 1.0 },
                coord! { x: 0.5, y: 0.5 },
            ],
            vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]],
        )
    }

    #[test]
    fn test_areas_and_validation() {
        let mesh = fan_square();
        assert!(mesh.validate().is_ok());
        assert_relative_eq!(mesh.total_area(), 1.0);
        assert_relative_eq!(mesh.signed_area(0), 0.25);
    }

    #[test]
    fn test_validate_reports_malformed_triangles() {
        let mut mesh = fan_square();
        mesh.triangles.push([0, 0, 1]);
        assert!(matches!(
            mesh.validate(),
            Err(MathError::TriangulationFailed { .. })
        ));

        let mut mesh = fan_square();
        mesh.triangles.push([0, 1, 9]);
        assert!(mesh.validate().is_err());

        let mut mesh = fan_square();
        mesh.vertices.push(coord! { x: 2.0, y: 0.0 });
        mesh.triangles.push([0, 1, 5]);
        assert!(mesh.validate().is_err(), "collinear triangle is degenerate");
    }

    #[test]
    fn test_boundary_classification() {
        let mesh = fan_square();
        assert_eq!(mesh.boundary_edges(), vec![[0, 1], [0, 3], [1, 2], [2, 3]]);
        assert_eq!(mesh.boundary_vertex_mask(), vec![true, true, true, true, false]);
    }

    #[test]
    fn test_statistics() {
        let stats = fan_square().statistics();
        assert_eq!(stats.triangle_count, 4);
        assert_relative_eq!(stats.min_angle_deg, 45.0, epsilon = 1e-9);
        assert_relative_eq!(stats.max_angle_deg, 90.0, epsilon = 1e-9);
        assert_relative_eq!(stats.max_area, 0.25);
        assert_relative_eq!(stats.total_area, 1.0);
    }

    #[test]
    fn test_elements_are_closed() {
        let elements = fan_square().elements();
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0][0], elements[0][3]);
    }
}
