// src/math/geometry/pslg.rs

use crate::math::{
    error::{MathError, MathResult},
    types::*,
    utils::{constants, rounding},
};
use geo::{Area, BooleanOps, InteriorPoint, Orient, orient::Direction};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Planar Straight-Line Graph: exakt die Eingabe einer Constrained Triangulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pslg {
    pub vertices: Vec<Point2D>,
    /// Randsegmente als Indexpaare in `vertices`.
    pub segments: Vec<[usize; 2]>,
    /// Ein Punkt im Inneren jedes Lochs.
    pub holes: Vec<Point2D>,
}

impl Pslg {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.segments.is_empty()
    }

    /// Prüft die Index-Invarianten.
    pub fn validate(&self) -> MathResult<()> {
        let n = self.vertices.len();
        for (i, &[a, b]) in self.segments.iter().enumerate() {
            if a >= n || b >= n {
                return Err(MathError::triangulation(format!(
                    "segment {} ({}, {}) references a vertex outside 0..{}",
                    i, a, b, n
                )));
            }
            if a == b {
                return Err(MathError::triangulation(format!(
                    "segment {} is degenerate ({}, {})",
                    i, a, b
                )));
            }
        }
        Ok(())
    }
}

/// Baut aus (Multi-)Polygonen mit Löchern einen PSLG.
///
/// Ringe werden einheitlich orientiert (außen CCW, Löcher CW), doppelte
/// Schlusspunkte verworfen und Punkte über Rundung auf signifikante Stellen
/// zusammengeführt, damit gemeinsame Ränder benachbarter Formen nur einen
/// Vertex erzeugen.
#[derive(Debug, Clone)]
pub struct PslgBuilder {
    round_digits: usize,
    pslg: Pslg,
    index: HashMap<(u64, u64), usize>,
}

impl Default for PslgBuilder {
    fn default() -> Self {
        Self {
            round_digits: constants::DEFAULT_ROUND_DIGITS,
            pslg: Pslg::default(),
            index: HashMap::new(),
        }
    }
}

impl PslgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_round_digits(mut self, digits: usize) -> Self {
        self.round_digits = digits.clamp(1, constants::MAX_ROUND_DIGITS);
        self
    }

    /// PSLG eines einzelnen Polygons.
    pub fn build_polygon(self, polygon: &Polygon<f64>) -> MathResult<Pslg> {
        self.build_all(std::slice::from_ref(polygon))
    }

    /// PSLG einer Multi-Polygon-Geometrie, Komponenten in Reihenfolge.
    pub fn build(self, geometry: &MultiPolygon<f64>) -> MathResult<Pslg> {
        self.build_all(&geometry.0)
    }

    pub fn build_all(mut self, polygons: &[Polygon<f64>]) -> MathResult<Pslg> {
        for (index, polygon) in polygons.iter().enumerate() {
            let others: Vec<&Polygon<f64>> = polygons
                .iter()
                .enumerate()
                .filter(|&(other, _)| other != index)
                .map(|(_, other)| other)
                .collect();
            self.add_polygon(polygon, &others);
        }

        let pslg = self.pslg;
        if pslg.is_empty() {
            return Err(MathError::EmptyDomain {
                reason: format!(
                    "PSLG has {} vertices and {} segments, nothing to mesh",
                    pslg.vertices.len(),
                    pslg.segments.len()
                ),
            });
        }
        debug!(
            "PSLG: {} vertices, {} segments, {} holes",
            pslg.vertices.len(),
            pslg.segments.len(),
            pslg.holes.len()
        );
        Ok(pslg)
    }

    fn add_polygon(&mut self, polygon: &Polygon<f64>, others: &[&Polygon<f64>]) {
        let oriented = polygon.orient(Direction::Default);

        if !self.add_ring(oriented.exterior()) {
            warn!("Degenerierter Außenring übersprungen");
            return;
        }

        for interior in oriented.interiors() {
            if !self.add_ring(interior) {
                warn!("Degeneriertes Loch übersprungen");
                continue;
            }
            match hole_seed(interior, others) {
                Some(seed) => self.pslg.holes.push(seed),
                None => debug!("Loch vollständig von anderen Komponenten belegt, kein Seed"),
            }
        }
    }

    /// Fügt einen Ring hinzu. `false` wenn weniger als 3 verschiedene Vertices übrig bleiben.
    fn add_ring(&mut self, ring: &LineString<f64>) -> bool {
        let mut points: &[Point2D] = &ring.0;
        if points.len() > 1 && points.first() == points.last() {
            points = &points[..points.len() - 1];
        }

        let mut ids: Vec<usize> = Vec::with_capacity(points.len());
        for &point in points {
            let id = self.add_vertex(point);
            if ids.last() != Some(&id) {
                ids.push(id);
            }
        }
        while ids.len() > 1 && ids.first() == ids.last() {
            ids.pop();
        }
        if ids.len() < 3 {
            return false;
        }

        let n = ids.len();
        self.pslg
            .segments
            .extend((0..n).map(|i| [ids[i], ids[(i + 1) % n]]));
        true
    }

    fn add_vertex(&mut self, point: Point2D) -> usize {
        let key = rounding::point_key(point.x, point.y, self.round_digits);
        *self.index.entry(key).or_insert_with(|| {
            self.pslg.vertices.push(point);
            self.pslg.vertices.len() - 1
        })
    }
}

/// Innerer Punkt des Lochs, der in keiner anderen Komponente liegt.
///
/// Inseln im Loch werden vorher abgezogen, sonst könnte der Seed in der Insel
/// landen. Bei nicht-konvexen Löchern kann der Schwerpunkt außerhalb liegen,
/// daher `InteriorPoint`.
fn hole_seed(interior: &LineString<f64>, others: &[&Polygon<f64>]) -> Option<Point2D> {
    let mut free = MultiPolygon::new(vec![Polygon::new(interior.clone(), vec![])]);
    for other in others {
        let footprint = MultiPolygon::new(vec![Polygon::new(other.exterior().clone(), vec![])]);
        free = free.difference(&footprint);
    }
    free.0
        .retain(|polygon| polygon.unsigned_area() > constants::AREA_EPSILON);
    free.interior_point().map(|point| point.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::shapes::{Shape, ShapeBuilder};
    use geo::{Contains, Point, coord};

    fn unit_square_with_hole(segments: usize) -> Polygon<f64> {
        ShapeBuilder::new()
            .rectangle(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 })
            .circular_hole(coord! { x: 0.5, y: 0.5 }, 0.25, segments)
            .build()
            .unwrap()
    }

    #[test]
    fn test_square_with_circular_hole_counts() {
        let pslg = PslgBuilder::new()
            .build_polygon(&unit_square_with_hole(64))
            .unwrap();
        assert_eq!(pslg.vertices.len(), 68);
        assert_eq!(pslg.segments.len(), 68);
        assert_eq!(pslg.holes.len(), 1);
        assert!(pslg.validate().is_ok());

        let seed = pslg.holes[0];
        let dx = seed.x - 0.5;
        let dy = seed.y - 0.5;
        assert!(dx.hypot(dy) < 0.25);
    }

    #[test]
    fn test_ring_wraps_around() {
        let square = Shape::rectangle(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 })
            .to_polygon()
            .unwrap();
        let pslg = PslgBuilder::new().build_polygon(&square).unwrap();
        assert_eq!(pslg.segments.len(), 4);
        assert_eq!(pslg.segments.last().unwrap()[1], pslg.segments[0][0]);
        assert!(pslg.holes.is_empty());
    }

    #[test]
    fn test_shared_boundary_points_are_merged() {
        let left = Shape::rectangle(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 })
            .to_polygon()
            .unwrap();
        let right = Shape::rectangle(coord! { x: 1.0 + 1e-15, y: 0.0 }, coord! { x: 2.0, y: 1.0 })
            .to_polygon()
            .unwrap();
        let pslg = PslgBuilder::new().build_all(&[left, right]).unwrap();
        // 8 Ecken, davon 2 gemeinsam
        assert_eq!(pslg.vertices.len(), 6);
        assert_eq!(pslg.segments.len(), 8);
    }

    #[test]
    fn test_non_convex_hole_seed_is_inside() {
        // U-förmiges Loch: der Schwerpunkt liegt außerhalb
        let hole = vec![
            coord! { x: 1.0, y: 1.0 },
            coord! { x: 5.0, y: 1.0 },
            coord! { x: 5.0, y: 5.0 },
            coord! { x: 4.0, y: 5.0 },
            coord! { x: 4.0, y: 2.0 },
            coord! { x: 2.0, y: 2.0 },
            coord! { x: 2.0, y: 5.0 },
            coord! { x: 1.0, y: 5.0 },
        ];
        let polygon = ShapeBuilder::new()
            .rectangle(coord! { x: 0.0, y: 0.0 }, coord! { x: 6.0, y: 6.0 })
            .hole(hole.clone())
            .build()
            .unwrap();
        let pslg = PslgBuilder::new().build_polygon(&polygon).unwrap();
        assert_eq!(pslg.holes.len(), 1);

        let hole_polygon = Polygon::new(LineString::from(hole), vec![]);
        assert!(hole_polygon.contains(&Point::from(pslg.holes[0])));
    }

    #[test]
    fn test_hole_seed_avoids_island() {
        // Rahmen [0,10]² mit Loch [2,8]², Insel [4,6]² mitten im Loch
        let frame = ShapeBuilder::new()
            .rectangle(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 })
            .hole(vec![
                coord! { x: 2.0, y: 2.0 },
                coord! { x: 8.0, y: 2.0 },
                coord! { x: 8.0, y: 8.0 },
                coord! { x: 2.0, y: 8.0 },
            ])
            .build()
            .unwrap();
        let island = Shape::rectangle(coord! { x: 4.0, y: 4.0 }, coord! { x: 6.0, y: 6.0 })
            .to_polygon()
            .unwrap();
        let pslg = PslgBuilder::new().build_all(&[frame, island.clone()]).unwrap();

        assert_eq!(pslg.holes.len(), 1);
        let seed = Point::from(pslg.holes[0]);
        let hole = Shape::rectangle(coord! { x: 2.0, y: 2.0 }, coord! { x: 8.0, y: 8.0 })
            .to_polygon()
            .unwrap();
        assert!(hole.contains(&seed));
        assert!(!island.contains(&seed));
        assert!(!island.exterior().contains(&seed));
    }

    #[test]
    fn test_hole_filled_by_island_has_no_seed() {
        let frame = ShapeBuilder::new()
            .rectangle(coord! { x: 0.0, y: 0.0 }, coord! { x: 4.0, y: 4.0 })
            .hole(vec![
                coord! { x: 1.0, y: 1.0 },
                coord! { x: 3.0, y: 1.0 },
                coord! { x: 3.0, y: 3.0 },
                coord! { x: 1.0, y: 3.0 },
            ])
            .build()
            .unwrap();
        let plug = Shape::rectangle(coord! { x: 1.0, y: 1.0 }, coord! { x: 3.0, y: 3.0 })
            .to_polygon()
            .unwrap();
        let pslg = PslgBuilder::new().build_all(&[frame, plug]).unwrap();
        assert!(pslg.holes.is_empty());
        assert_eq!(pslg.vertices.len(), 8);
    }

    #[test]
    fn test_orientation_is_normalized() {
        // Außenring CW angegeben
        let cw = Shape::polygon([
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 0.0, y: 1.0 },
            coord! { x: 1.0, y: 1.0 },
            coord! { x: 1.0, y: 0.0 },
        ])
        .to_polygon()
        .unwrap();
        let pslg = PslgBuilder::new().build_polygon(&cw).unwrap();
        let signed: f64 = pslg
            .segments
            .iter()
            .map(|&[a, b]| {
                let (p, q) = (pslg.vertices[a], pslg.vertices[b]);
                p.x * q.y - q.x * p.y
            })
            .sum();
        assert!(signed > 0.0);
    }

    #[test]
    fn test_empty_geometry_is_empty_domain() {
        let result = PslgBuilder::new().build(&MultiPolygon::new(vec![]));
        assert!(matches!(result, Err(MathError::EmptyDomain { .. })));
    }

    #[test]
    fn test_validate_catches_bad_indices() {
        let pslg = Pslg {
            vertices: vec![coord! { x: 0.0, y: 0.0 }],
            segments: vec![[0, 3]],
            holes: vec![],
        };
        assert!(pslg.validate().is_err());
    }
}
