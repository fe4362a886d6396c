pub mod batch;
pub mod contract;
pub mod error;
pub mod state;

pub use crate::error::ContractError;

#[cfg(test)]
mod testing;
