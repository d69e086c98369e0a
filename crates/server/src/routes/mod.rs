mod about;
mod execute;
mod health;

pub use about::*;
pub use execute::*;
pub use health::*;
