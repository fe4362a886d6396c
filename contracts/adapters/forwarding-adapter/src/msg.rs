use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;
use valence_account_utils::msg::ProxyCall;

#[cw_serde]
pub struct InstantiateMsg {
    pub registry: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Forward `calls` in order through the active sub-account.
    /// Returns the outputs of every call as a JSON list.
    Forward { calls: Vec<ProxyCall> },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Addr)]
    Registry {},
}
