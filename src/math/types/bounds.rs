// src/math/types/bounds.rs

use crate::math::{error::*, types::*};
use geo::{BoundingRect, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D Bounding Box (Axis-Aligned Bounding Box)
///
/// Dient als "Universum" für den Komplement-Operator: der aktuell sichtbare
/// Ausschnitt der Zeichenfläche. Wird bei jeder Auswertung neu übergeben.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds2D {
    /// Erstellt eine neue Bounding Box
    pub fn new(min: Point2D, max: Point2D) -> MathResult<Self> {
        if min.x > max.x || min.y > max.y {
            return Err(MathError::InvalidConfiguration {
                message: format!("Invalid bounds: min {:?} > max {:?}", min, max),
            });
        }
        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return Err(MathError::InvalidConfiguration {
                message: format!("Invalid bounds: non-finite corner {:?} / {:?}", min, max),
            });
        }

        Ok(Self { min, max })
    }

    /// Erstellt eine Bounding Box aus zwei beliebigen Punkten
    pub fn from_points(p1: Point2D, p2: Point2D) -> Self {
        Self {
            min: Point2D {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
            },
            max: Point2D {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
            },
        }
    }

    /// Erstellt eine Bounding Box die alle Punkte umschließt
    pub fn from_points_iter<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2D>,
    {
        let mut points_iter = points.into_iter();
        let first_point = points_iter.next()?;

        let mut min = first_point;
        let mut max = first_point;

        for point in points_iter {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        Some(Self { min, max })
    }

    /// Bounding Box einer (Multi-)Polygon-Geometrie, `None` wenn leer.
    pub fn from_geometry(geometry: &MultiPolygon<f64>) -> Option<Self> {
        geometry
            .bounding_rect()
            .map(|rect| Self::from_points(rect.min(), rect.max()))
    }

    /// Breite der Bounding Box
    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    /// Höhe der Bounding Box
    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    /// Vereinigt zwei Bounding Boxes
    pub fn union(&self, other: &Bounds2D) -> Self {
        Self {
            min: Point2D {
                x: self.min.x.min(other.min.x),
                y: self.min.y.min(other.min.y),
            },
            max: Point2D {
                x: self.max.x.max(other.max.x),
                y: self.max.y.max(other.max.y),
            },
        }
    }

    /// Erweitert die Bounding Box um einen Margin
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min: Point2D {
                x: self.min.x - margin,
                y: self.min.y - margin,
            },
            max: Point2D {
                x: self.max.x + margin,
                y: self.max.y + margin,
            },
        }
    }

    /// Rechteck als geo-Polygon (CCW)
    pub fn to_polygon(&self) -> Polygon<f64> {
        Rect::new(self.min, self.max).to_polygon()
    }

    /// Rechteck als MultiPolygon, der Operand des Komplements.
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![self.to_polygon()])
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}] x [{:.3}, {:.3}]",
            self.min.x, self.max.x, self.min.y, self.max.y
        )
    }
}
