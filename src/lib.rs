// src/lib.rs

pub mod debug;
pub mod math;

pub use math::prelude;
