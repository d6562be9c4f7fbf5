//! Combat systems

pub mod commands;
pub mod resolution;


// Re-export all systems
pub use commands::*;
pub use resolution::*;
