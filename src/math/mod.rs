pub mod algorithms;
pub mod error;
pub mod expression;
pub mod geometry;
pub mod types;
pub mod utils;

// Re-exports für einfache Verwendung
pub use error::{MathError, MathResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        algorithms::{
            LaplacianSmoother, MeshOptions, MeshSmoothing, TriangulationDriver, generate_mesh,
        },
        error::{MathError, MathResult},
        expression::{DomainCalculator, DomainResult, Expression, evaluate},
        geometry::{
            CommitMode, Mesh, Pslg, PslgBuilder, RegionId, RegionRegistry, Shape, ShapeBuilder,
        },
        types::*,
    };
}
