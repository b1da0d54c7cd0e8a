// src/math/geometry/shapes.rs

use crate::math::{
    error::{MathError, MathResult},
    types::*,
    utils::constants,
};
use serde::{Deserialize, Serialize};

/// Fertig gezeichnete Grundform, wie sie vom Zeichen-/Editier-Frontend kommt.
///
/// Die Interaktion selbst (Maus, Dialoge) liegt außerhalb dieser Crate; hier
/// wird nur die finale Form in einen Polygonring übersetzt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Freies Polygon, optional mit wiederholtem Schlusspunkt.
    Polygon { points: Vec<Point2D> },
    /// Ellipse (Kreis bei gleichen Radien), diskretisiert in `segments` Punkte.
    Ellipse {
        center: Point2D,
        radius_x: f64,
        radius_y: f64,
        #[serde(default = "default_segments")]
        segments: usize,
    },
    /// Achsenparalleles Rechteck aus zwei gegenüberliegenden Ecken.
    Rectangle { corner_a: Point2D, corner_b: Point2D },
}

fn default_segments() -> usize {
    constants::DEFAULT_CIRCLE_SEGMENTS
}

impl Shape {
    pub fn polygon(points: impl IntoIterator<Item = Point2D>) -> Self {
        Shape::Polygon {
            points: points.into_iter().collect(),
        }
    }

    pub fn circle(center: Point2D, radius: f64, segments: usize) -> Self {
        Shape::Ellipse {
            center,
            radius_x: radius,
            radius_y: radius,
            segments,
        }
    }

    pub fn ellipse(center: Point2D, radius_x: f64, radius_y: f64, segments: usize) -> Self {
        Shape::Ellipse {
            center,
            radius_x,
            radius_y,
            segments,
        }
    }

    pub fn rectangle(corner_a: Point2D, corner_b: Point2D) -> Self {
        Shape::Rectangle { corner_a, corner_b }
    }

    /// Präfix für automatisch vergebene Tags (P1, C1, R1, ...).
    pub fn tag_prefix(&self) -> &'static str {
        match self {
            Shape::Polygon { .. } => "P",
            Shape::Ellipse { .. } => "C",
            Shape::Rectangle { .. } => "R",
        }
    }

    /// Übersetzt die Form in ein geo-Polygon ohne Löcher.
    pub fn to_polygon(&self) -> MathResult<Polygon<f64>> {
        let ring = match self {
            Shape::Polygon { points } => open_ring(points),
            Shape::Ellipse {
                center,
                radius_x,
                radius_y,
                segments,
            } => {
                if !(*radius_x > 0.0 && *radius_y > 0.0)
                    || !radius_x.is_finite()
                    || !radius_y.is_finite()
                {
                    return Err(MathError::InvalidConfiguration {
                        message: format!(
                            "Ellipse radii must be positive and finite, got ({}, {})",
                            radius_x, radius_y
                        ),
                    });
                }
                create_ellipse_vertices(*center, *radius_x, *radius_y, *segments)
            }
            Shape::Rectangle { corner_a, corner_b } => {
                let bounds = Bounds2D::from_points(*corner_a, *corner_b);
                if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
                    return Err(MathError::InvalidConfiguration {
                        message: format!(
                            "Rectangle corners {:?} and {:?} span no area",
                            corner_a, corner_b
                        ),
                    });
                }
                create_rectangle_vertices(bounds.min, bounds.max)
            }
        };

        polygon_from_ring(ring)
    }
}

/// Entfernt einen wiederholten Schlusspunkt.
fn open_ring(points: &[Point2D]) -> Vec<Point2D> {
    let mut ring = points.to_vec();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Validiert einen offenen Ring und baut daraus ein Polygon.
pub fn polygon_from_ring(ring: Vec<Point2D>) -> MathResult<Polygon<f64>> {
    if ring.len() < 3 {
        return Err(MathError::InsufficientPoints {
            expected: 3,
            actual: ring.len(),
        });
    }
    if let Some(bad) = ring.iter().find(|p| !p.is_finite()) {
        return Err(MathError::InvalidConfiguration {
            message: format!("Non-finite vertex {:?}", bad),
        });
    }
    // geo schließt den Ring selbst
    Ok(Polygon::new(LineString::from(ring), vec![]))
}

/// Punkte einer Ellipse, CCW, ohne Wiederholung des Startpunkts.
pub fn create_ellipse_vertices(
    center: Point2D,
    radius_x: f64,
    radius_y: f64,
    segments: usize,
) -> Vec<Point2D> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let angle = constants::TAU * i as f64 / segments as f64;
            Point2D {
                x: center.x + radius_x * angle.cos(),
                y: center.y + radius_y * angle.sin(),
            }
        })
        .collect()
}

/// Erstellt Kreis-Vertices
pub fn create_circle_vertices(center: Point2D, radius: f64, segments: usize) -> Vec<Point2D> {
    create_ellipse_vertices(center, radius, radius, segments)
}

/// Rechteck-Vertices, CCW ab der linken unteren Ecke.
pub fn create_rectangle_vertices(min: Point2D, max: Point2D) -> Vec<Point2D> {
    vec![
        Point2D { x: min.x, y: min.y },
        Point2D { x: max.x, y: min.y },
        Point2D { x: max.x, y: max.y },
        Point2D { x: min.x, y: max.y },
    ]
}

/// Builder für Polygone, optional mit Löchern.
#[derive(Debug, Clone, Default)]
pub struct ShapeBuilder {
    exterior: Vec<Point2D>,
    holes: Vec<Vec<Point2D>>,
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(mut self, x: f64, y: f64) -> Self {
        self.exterior.push(Point2D { x, y });
        self
    }

    pub fn add_vertices(mut self, vertices: impl IntoIterator<Item = Point2D>) -> Self {
        self.exterior.extend(vertices);
        self
    }

    /// Fügt einen Kreis hinzu
    pub fn circle(self, center: Point2D, radius: f64, segments: usize) -> Self {
        self.add_vertices(create_circle_vertices(center, radius, segments))
    }

    pub fn ellipse(self, center: Point2D, radius_x: f64, radius_y: f64, segments: usize) -> Self {
        self.add_vertices(create_ellipse_vertices(center, radius_x, radius_y, segments))
    }

    /// Fügt ein Rechteck hinzu
    pub fn rectangle(self, min: Point2D, max: Point2D) -> Self {
        self.add_vertices(create_rectangle_vertices(min, max))
    }

    /// Fügt ein Loch hinzu (Orientierung egal, wird im PSLG vereinheitlicht).
    pub fn hole(mut self, ring: impl IntoIterator<Item = Point2D>) -> Self {
        self.holes.push(ring.into_iter().collect());
        self
    }

    pub fn circular_hole(self, center: Point2D, radius: f64, segments: usize) -> Self {
        self.hole(create_circle_vertices(center, radius, segments))
    }

    pub fn build(self) -> MathResult<Polygon<f64>> {
        let exterior = polygon_from_ring(open_ring(&self.exterior))?;
        let mut interiors = Vec::with_capacity(self.holes.len());
        for hole in &self.holes {
            let hole_polygon = polygon_from_ring(open_ring(hole))?;
            interiors.push(hole_polygon.exterior().clone());
        }
        Ok(Polygon::new(exterior.exterior().clone(), interiors))
    }
}
