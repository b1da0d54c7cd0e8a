// src/math/geometry/mod.rs

// Deklaration der Haupt-Geometriemodule
pub mod mesh;
pub mod pslg;
pub mod region;
pub mod shapes;

// Re-Exporte für einen schnellen Zugriff auf die Kern-Geometrietypen
pub use self::mesh::{Mesh, MeshStatistics};
pub use self::pslg::{Pslg, PslgBuilder};
pub use self::region::{CommitMode, Region, RegionId, RegionRegistry, is_valid_tag};
pub use self::shapes::{Shape, ShapeBuilder};
