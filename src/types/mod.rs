//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod amount;
pub mod pool;
pub mod swap;
pub mod transaction;

pub use amount::*;
pub use pool::*;
pub use swap::*;
pub use transaction::*;
