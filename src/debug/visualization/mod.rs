// src/debug/visualization/mod.rs

pub mod svg;

pub use self::svg::{mesh_svg, regions_svg, save_svg};
