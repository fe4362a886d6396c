use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin};

#[cw_serde]
pub struct InstantiateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    /// Records the call and returns `tag` as response data
    Record { tag: String },
    /// Always errors with `reason`
    Fail { reason: String },
    /// Sends `msg` to `contract`, used to call back into whoever invoked us
    Reenter { contract: String, msg: Binary },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Vec<RecordedCall>)]
    Calls {},
}

#[cw_serde]
pub struct RecordedCall {
    pub sender: Addr,
    pub tag: String,
    pub funds: Vec<Coin>,
}
