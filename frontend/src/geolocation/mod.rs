//! Best-effort GPS acquisition: a bounded series of one-shot readings, the most
//! accurate one kept, then reverse geocoded to an address.

mod acquirer;
#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod session;
pub mod types;

pub use acquirer::acquire_best_fix;
pub use session::AcquisitionSession;
pub use types::*;
