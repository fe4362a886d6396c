use cosmwasm_std::{Addr, StdError};
use cw_utils::PaymentError;
use thiserror::Error;
use valence_account_utils::error::PayloadError;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    Payload(#[from] PayloadError),

    #[error("Unauthorized: only the registry admin can do this")]
    NotAdmin {},

    #[error("Unauthorized: account {account_id} belongs to someone else")]
    NotOwner { account_id: u64 },

    #[error("Account not found")]
    AccountNotFound {},

    #[error("Adapter {adapter} is not whitelisted")]
    AdapterNotAllowed { adapter: String },

    #[error("Sub-account {account_id} is not deployed")]
    SubAccountNotDeployed { account_id: u64 },

    #[error("Adapters, payloads and account ids must have the same length")]
    LengthMismatch {},

    // Reentrant batches are rejected without a message
    #[error("")]
    Reentrancy {},

    #[error("Step {index} on adapter {adapter} failed: {reason}")]
    StepFailed {
        index: u64,
        adapter: Addr,
        reason: String,
    },

    #[error("No step is running")]
    NoActiveContext {},

    #[error("Unauthorized: only the adapter of the running step can forward calls")]
    NotActiveAdapter {},

    #[error("Unknown reply id: {0}")]
    UnknownReplyId(u64),
}
