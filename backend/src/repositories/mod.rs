pub mod check_in;
pub mod memory;

pub use check_in::{CheckInRepositoryTrait, PgCheckInRepository, StoreError};
pub use memory::InMemoryCheckInRepository;
