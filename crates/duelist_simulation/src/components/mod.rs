//! ECS Components для бойцов
//!
//! - archetype: типы телосложения (статы + геометрия)
//! - fighter: состояние бойца, команды, коллизионные боксы

pub mod archetype;
pub mod fighter;

// Re-exports для удобного импорта
pub use archetype::*;
pub use fighter::*;
