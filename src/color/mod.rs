// ===== chromaforge/src/color/mod.rs =====
pub mod space;
pub mod vision;

pub use self::space::{Lab, Rgb, ToneCoord};
pub use self::vision::Vision;
