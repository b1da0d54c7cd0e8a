// src/math/algorithms/mod.rs

// Deklaration der verschiedenen Algorithmus-Kategorien
pub mod boolean; // Mengenoperationen auf Regionen
pub mod smoothing;
pub mod triangulation; // Constrained Delaunay mit Verfeinerung

// Boolean-Operationen
pub use self::boolean::{
    BooleanOpType, RegionBooleanOps, complement, nearly_equal, symmetric_difference_area,
};

// Glättung
pub use self::smoothing::{LaplacianSmoother, MeshSmoothing, SmoothingReport};

// Triangulation
pub use self::triangulation::{MeshOptions, TriangulationDriver, TriangulationFlags, generate_mesh};
