// src/math/algorithms/smoothing/mod.rs

pub mod laplacian; // Laplace-Glättung mit festem Rand
pub mod traits; // Enthält den MeshSmoothing-Trait und den Report

pub use self::laplacian::LaplacianSmoother;
pub use self::traits::{MeshSmoothing, SmoothingReport};
