// src/math/algorithms/smoothing/traits.rs

use crate::math::geometry::Mesh;

/// Haupt-Trait für Verfahren, die die Vertex-Positionen eines Dreiecksnetzes glätten.
///
/// Die Konnektivität bleibt unangetastet: das Ergebnis hat dieselben Dreiecke
/// in derselben Reihenfolge, nur Positionen ändern sich.
pub trait MeshSmoothing {
    /// Glättet das Netz und gibt eine neue Instanz zurück.
    fn smooth(&self, mesh: &Mesh) -> Mesh {
        self.smooth_with_report(mesh).0
    }

    /// Wie `smooth`, zusätzlich mit Kennzahlen des Durchlaufs.
    fn smooth_with_report(&self, mesh: &Mesh) -> (Mesh, SmoothingReport);

    /// Anzahl der Iterationen, die höchstens ausgeführt werden.
    fn iterations(&self) -> usize;
}

/// Statistiken eines Glättungsdurchlaufs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothingReport {
    pub iterations_performed: usize,
    /// Vertices, deren Position sich insgesamt geändert hat.
    pub moved_vertices: usize,
    /// Größte Verschiebung eines Vertex in der letzten Iteration.
    pub max_displacement: f64,
    /// Dreiecke, deren Orientierung gekippt oder degeneriert ist.
    pub inverted_triangles: usize,
}

impl SmoothingReport {
    pub fn is_valid(&self) -> bool {
        self.inverted_triangles == 0
    }
}
