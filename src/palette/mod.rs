// ===== chromaforge/src/palette/mod.rs =====
pub mod candidates;
pub mod scheme;
pub mod value;

pub use self::candidates::Candidates;
pub use self::scheme::{Combination, Scheme};
pub use self::value::Value;
