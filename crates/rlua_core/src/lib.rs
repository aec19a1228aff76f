//! rlua_core: Source text positions shared by the rlua crates.
//!
//! Provides byte spans over source text and the line map used to turn byte
//! offsets into the 1-based line/column pairs the scanner reports.

pub mod text;

// Re-export commonly used types
pub use text::{LineAndColumn, LineMap, TextPos, TextSpan};
