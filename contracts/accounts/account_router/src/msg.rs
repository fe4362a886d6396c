use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;
use valence_account_utils::msg::ProxyCall;

#[cw_serde]
pub struct InstantiateMsg {
    pub factory: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Deploy a sub-account mastered by the router and append it to the sender's list
    Create {},
    /// Forward `call` through the sub-account at `index` (0-based) of the sender's list
    Execute { index: u64, call: ProxyCall },
    /// Forward `calls[i]` through the sub-account at `indices[i]`, all or nothing
    BatchExecute {
        indices: Vec<u64>,
        calls: Vec<ProxyCall>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(Vec<Addr>)]
    List { owner: String },
    #[returns(u64)]
    Count { owner: String },
}

#[cw_serde]
pub struct Config {
    pub factory: Addr,
}
