pub mod alpha_beta;
pub mod context;
pub mod engine;
pub mod error;
pub mod minmax;
pub mod setting;
pub mod trans_table;

pub use context::*;
pub use engine::*;
pub use error::*;
pub use setting::*;
pub use trans_table::*;
