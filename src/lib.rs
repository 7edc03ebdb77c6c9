//! Fairness-weighted name raffle.
//!
//! A [`ledger::Ledger`] keeps every contestant's win count and the order of
//! past wins. Each draw picks uniformly among the eligible contestants with the
//! fewest wins, so everyone wins once before anyone wins twice.

pub mod cli;
pub mod config;
pub mod contestant;
pub mod error;
pub mod ledger;
pub mod store;
pub mod suspense;
pub mod table;

pub use contestant::ContestantRecord;
pub use error::{Error, RaffleError, Result};
pub use ledger::Ledger;
