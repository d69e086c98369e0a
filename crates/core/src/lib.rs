//! Wire and domain types shared by the action worker crates.

pub mod domain;
mod error;

pub use domain::*;
pub use error::*;
