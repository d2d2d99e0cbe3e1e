pub mod check_in;
pub mod identity;
