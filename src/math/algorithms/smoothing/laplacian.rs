// src/math/algorithms/smoothing/laplacian.rs

use super::traits::{MeshSmoothing, SmoothingReport};
use crate::math::{geometry::Mesh, types::*};
use geo::coord;
use tracing::{debug, warn};

/// Laplace-Glättung: jeder innere Vertex wandert zum Mittel seiner Nachbarn.
///
/// Jacobi-Schema: alle neuen Positionen einer Iteration werden aus den alten
/// berechnet. Randvertices (und Vertices ohne Kante) bleiben fest.
#[derive(Debug, Clone, Copy)]
pub struct LaplacianSmoother {
    iterations: usize,
    /// Abbruch, sobald die größte Verschiebung darunter liegt. 0 = nie.
    tolerance: f64,
}

impl LaplacianSmoother {
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            tolerance: 0.0,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }
}

impl Default for LaplacianSmoother {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Nachbarlisten je Vertex, sortiert und ohne Duplikate.
fn vertex_neighbors(mesh: &Mesh) -> Vec<Vec<usize>> {
    let mut neighbors = vec![Vec::new(); mesh.vertices.len()];
    for &[a, b, c] in &mesh.triangles {
        for (p, q) in [(a, b), (b, c), (c, a)] {
            neighbors[p].push(q);
            neighbors[q].push(p);
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
        list.dedup();
    }
    neighbors
}

impl MeshSmoothing for LaplacianSmoother {
    fn smooth_with_report(&self, mesh: &Mesh) -> (Mesh, SmoothingReport) {
        let mut report = SmoothingReport::default();
        if self.iterations == 0 || mesh.is_empty() {
            return (mesh.clone(), report);
        }
        let n = mesh.vertices.len();
        if let Some(bad) = mesh
            .triangles
            .iter()
            .position(|triangle| triangle.iter().any(|&index| index >= n))
        {
            warn!(
                "Dreieck {} verweist auf einen Vertex außerhalb 0..{}, Netz bleibt ungeglättet",
                bad, n
            );
            return (mesh.clone(), report);
        }

        let fixed = mesh.boundary_vertex_mask();
        let neighbors = vertex_neighbors(mesh);
        let mut current = mesh.vertices.clone();

        for _ in 0..self.iterations {
            let mut next = current.clone();
            let mut max_displacement: f64 = 0.0;

            for (index, adjacent) in neighbors.iter().enumerate() {
                if fixed[index] || adjacent.is_empty() {
                    continue;
                }
                let sum = adjacent
                    .iter()
                    .fold(coord! { x: 0.0, y: 0.0 }, |acc: Point2D, &n| acc + current[n]);
                let average = sum / adjacent.len() as f64;
                max_displacement = max_displacement.max(average.distance(current[index]));
                next[index] = average;
            }

            current = next;
            report.iterations_performed += 1;
            report.max_displacement = max_displacement;
            if max_displacement <= self.tolerance {
                break;
            }
        }

        let smoothed = Mesh::new(current, mesh.triangles.clone());
        report.moved_vertices = mesh
            .vertices
            .iter()
            .zip(&smoothed.vertices)
            .filter(|(before, after)| before != after)
            .count();
        report.inverted_triangles = (0..mesh.triangles.len())
            .filter(|&i| {
                let before = mesh.signed_area(i);
                let after = smoothed.signed_area(i);
                after == 0.0 || before.signum() != after.signum()
            })
            .count();

        if report.inverted_triangles > 0 {
            warn!(
                "Glättung hat {} Dreiecke invertiert",
                report.inverted_triangles
            );
        }
        debug!(
            "Laplace-Glättung: {} Iterationen, {} Vertices verschoben, max. Schritt {:.3e}",
            report.iterations_performed, report.moved_vertices, report.max_displacement
        );
        (smoothed, report)
    }

    fn iterations(&self) -> usize {
        self.iterations
    }
}
