//! Business logic services module.

pub mod balance;
pub mod debounce;
pub mod liquidity;
pub mod market;
pub mod quote;
pub mod swap;
pub mod transactions;

pub use balance::BalanceService;
pub use debounce::{DebounceTrigger, Debouncer};
pub use liquidity::LiquidityService;
pub use market::{MarketState, MarketWatcher};
pub use quote::QuoteService;
pub use swap::SwapService;
pub use transactions::TransactionTracker;
