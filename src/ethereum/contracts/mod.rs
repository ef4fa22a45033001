//! Smart contract bindings.

pub mod fluffy_swap;
pub mod my_token;

pub use fluffy_swap::IFluffySwap;
pub use my_token::IMyToken;
