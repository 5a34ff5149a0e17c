//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod clock;
mod exchange;
mod parser;
mod store;

pub use clock::{Clock, SystemClock};
pub use exchange::ExchangeRateProvider;
pub use parser::CurrencyParser;
pub use store::KeyValueStore;
