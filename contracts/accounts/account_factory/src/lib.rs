// Purpose: Deterministic sub-account factory
pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use error::ContractError;
