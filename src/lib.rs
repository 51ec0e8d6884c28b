// ===== chromaforge/src/lib.rs =====
pub mod adjuster;
pub mod color;
pub mod config;
pub mod consts;
pub mod domain;
pub mod error;
pub mod palette;
pub mod palettes;
pub mod partition;
pub mod relation;
pub mod solver;
