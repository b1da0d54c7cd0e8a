// src/debug/mod.rs

// Debug-Ausgaben (SVG) für Regionen und Netze
pub mod visualization;
