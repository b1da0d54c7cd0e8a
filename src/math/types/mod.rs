// src/math/types/mod.rs
pub mod bounds;
pub mod vector;

pub use bounds::*;
pub use vector::*;

// Re-export häufig verwendete externe Typen
pub use geo::{Coord, LineString, MultiPolygon, Polygon};
pub use spade::Point2;

// Einheitliche Typen für das gesamte Modul
pub type Point2D = Coord<f64>;
pub type SpadePoint = Point2<f64>;
