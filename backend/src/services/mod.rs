pub mod ledger;

pub use ledger::{CheckInLedger, DateRange, LedgerError, TodayStatus};
