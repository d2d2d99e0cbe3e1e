pub mod check_in;
pub mod health;

pub use check_in::*;
pub use health::*;
