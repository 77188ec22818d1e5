pub mod error;
pub mod export;
pub mod model;
pub mod tsh;
pub mod xlsx;

pub use error::{Result, TshError};
pub use model::*;
