use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Sub-account deployment failed, address already taken")]
    Create2Failed {},

    #[error("Sequence numbers start at 1")]
    InvalidSequence {},

    #[error("Unknown reply id: {0}")]
    UnknownReplyId(u64),
}
