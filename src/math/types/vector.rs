// src/math/types/vector.rs

use super::{Point2D, SpadePoint};

// --- Konvertierungsfunktionen ---

/// Konvertiert einen geo-Punkt in einen Spade-Punkt.
pub fn to_spade_point(point: Point2D) -> SpadePoint {
    SpadePoint::new(point.x, point.y)
}

/// Konvertiert einen Spade-Punkt zurück in einen geo-Punkt.
pub fn from_spade_point(point: SpadePoint) -> Point2D {
    Point2D { x: point.x, y: point.y }
}

// --- Vektor Erweiterungen ---

/// Kleine Vektor-Operationen auf `Coord<f64>`, die geo nicht mitbringt.
pub trait Vector2DExt {
    fn length(&self) -> f64;
    fn distance(&self, other: Self) -> f64;
    /// z-Komponente des Kreuzprodukts
    fn perp_dot(&self, other: Self) -> f64;
    fn is_finite(&self) -> bool;
}

impl Vector2DExt for Point2D {
    fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    fn distance(&self, other: Self) -> f64 {
        (*self - other).length()
    }

    fn perp_dot(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Doppelte vorzeichenbehaftete Dreiecksfläche (positiv für CCW).
pub fn signed_area_doubled(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    (b - a).perp_dot(c - a)
}
