// Purpose: Message types for the account factory contract
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;

#[cw_serde]
pub struct InstantiateMsg {
    pub sub_account_code_id: u64,
    pub denom: String, // Denom every deployed sub-account forwards value in
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Deploy the next sub-account of the sender, which becomes its master.
    /// Attached funds are sent to the new sub-account.
    Deploy {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    /// Address the sub-account of `deployer` with sequence number `seq` has or will have
    #[returns(Addr)]
    Predict { deployer: String, seq: u64 },
    /// Number of sub-accounts deployed by `deployer`
    #[returns(u64)]
    Count { deployer: String },
    #[returns(bool)]
    IsDeployed { deployer: String, seq: u64 },
}

#[cw_serde]
pub struct Config {
    pub sub_account_code_id: u64,
    pub denom: String,
}

/// Data set on every successful `Deploy`
#[cw_serde]
pub struct DeployResponse {
    pub account: Addr,
    pub seq: u64,
}
