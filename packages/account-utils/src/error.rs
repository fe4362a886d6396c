use cosmwasm_std::{StdError, Uint256};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // The callee error is dropped on purpose, callers only learn that the forward failed
    #[error("Forwarded call failed")]
    ForwardFailed {},

    #[error("Unknown reply id: {0}")]
    UnknownReplyId(u64),
}

#[derive(Error, Debug, PartialEq)]
pub enum PayloadError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Target address does not fit in a 32 byte word")]
    TargetTooLong {},

    #[error("Target word does not decode to a valid address")]
    InvalidTarget {},

    #[error("Value {value} exceeds the native amount range")]
    ValueOverflow { value: Uint256 },
}
