// src/math/algorithms/boolean.rs

use crate::math::{types::*, utils::constants};
use geo::{Area, BooleanOps};

/// Definiert die Art der durchzuführenden Boolean-Operation auf Regionen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOpType {
    Union,        // Vereinigung (A ∪ B)
    Intersection, // Schnittmenge (A ∩ B)
    Difference,   // Differenz (A - B)
}

/// Boolean-Operationen auf Multi-Polygonen (mit Löchern und mehreren Komponenten).
///
/// Die eigentliche Mengenarithmetik übernimmt `geo::BooleanOps`; hier wird nur
/// das Ergebnis von Splittern unterhalb der Flächentoleranz befreit.
#[derive(Debug, Clone, Copy)]
pub struct RegionBooleanOps {
    area_tolerance: f64,
}

impl Default for RegionBooleanOps {
    fn default() -> Self {
        Self {
            area_tolerance: constants::AREA_EPSILON,
        }
    }
}

impl RegionBooleanOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_area_tolerance(mut self, tolerance: f64) -> Self {
        self.area_tolerance = tolerance.max(0.0);
        self
    }

    pub fn execute(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
        operation: BooleanOpType,
    ) -> MultiPolygon<f64> {
        let result = match operation {
            BooleanOpType::Union => a.union(b),
            BooleanOpType::Intersection => a.intersection(b),
            BooleanOpType::Difference => a.difference(b),
        };
        self.drop_slivers(result)
    }

    /// Komplement relativ zum Universum: `universe - a`.
    pub fn complement(&self, universe: &Bounds2D, a: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        self.execute(&universe.to_multi_polygon(), a, BooleanOpType::Difference)
    }

    fn drop_slivers(&self, geometry: MultiPolygon<f64>) -> MultiPolygon<f64> {
        MultiPolygon::new(
            geometry
                .0
                .into_iter()
                .filter(|polygon| polygon.unsigned_area() > self.area_tolerance)
                .collect(),
        )
    }
}

/// `universe - a` mit Standardtoleranz.
pub fn complement(universe: &Bounds2D, a: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    RegionBooleanOps::default().complement(universe, a)
}

/// Fläche der symmetrischen Differenz (A ⊕ B).
pub fn symmetric_difference_area(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> f64 {
    a.xor(b).unsigned_area()
}

/// Gleichheit zweier Regionen bis auf `tolerance` (Fläche der symmetrischen Differenz).
pub fn nearly_equal(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>, tolerance: f64) -> bool {
    symmetric_difference_area(a, b) <= tolerance
}
