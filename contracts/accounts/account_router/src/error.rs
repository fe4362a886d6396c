use cosmwasm_std::StdError;
use thiserror::Error;
use valence_account_utils::error::PayloadError;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payload(#[from] PayloadError),

    #[error("No sub-account at index {index}")]
    AccountNotFound { index: u64 },

    #[error("Indices and calls must have the same length")]
    LengthMismatch {},

    #[error("Unknown reply id: {0}")]
    UnknownReplyId(u64),
}
