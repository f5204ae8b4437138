// Gametree - Generic two-player adversarial game-tree search engine library

pub mod core;
pub mod search;

pub use self::core::*;
pub use self::search::*;
