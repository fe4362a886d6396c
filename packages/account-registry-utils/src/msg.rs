use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary};
use cw_ownable::cw_ownable_query;
use valence_account_utils::msg::ProxyCall;

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String, // Only admin can change the adapter whitelist, fixed forever
    pub factory: String,
    /// Adapters whitelisted from the start
    pub adapters: Vec<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Deploy a new sub-account owned by the sender, attached funds go to the sub-account
    RegisterAccount {},
    /// Admin only
    SetAdapterWhitelisted { adapter: String, allowed: bool },
    /// Run every step in order, any failing step reverts the whole batch
    ExecuteAtomic {
        adapters: Vec<String>,
        payloads: Vec<Binary>,
        account_ids: Vec<u64>,
    },
    /// Run every step in order, failing steps are reverted and reported without stopping the batch
    ExecuteNonAtomic {
        adapters: Vec<String>,
        payloads: Vec<Binary>,
        account_ids: Vec<u64>,
    },
    /// Forward calls through the sub-account of the running step.
    /// Only callable by the adapter of that step.
    Forward { calls: Vec<ProxyCall> },
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    /// Sub-account of `owner` at its 1-based `local_index`
    #[returns(Addr)]
    Resolve { owner: String, local_index: u64 },
    #[returns(bool)]
    HasAccount { owner: String, local_index: u64 },
    #[returns(Option<Addr>)]
    AccountOwner { account_id: u64 },
    /// Number of sub-accounts registered by `owner`
    #[returns(u64)]
    AccountCount { owner: String },
    #[returns(bool)]
    IsAdapterWhitelisted { adapter: String },
    /// Execution context accessors, all `None` outside of a running step
    #[returns(Option<Addr>)]
    ActiveOwner {},
    #[returns(Option<u64>)]
    ActiveAccountId {},
    #[returns(Option<Addr>)]
    ActiveProxy {},
    #[returns(Vec<AccountEntry>)]
    ListAccounts {
        owner: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct Config {
    pub factory: Addr,
}

/// Context of the step currently running, readable by its adapter
#[cw_serde]
pub struct ExecutionContext {
    pub owner: Addr,
    pub account_id: u64,
    pub proxy: Addr,
}

#[cw_serde]
pub struct RegisterAccountResponse {
    pub account_id: u64,
    pub local_index: u64,
    pub proxy: Addr,
}

#[cw_serde]
pub struct AccountEntry {
    pub local_index: u64,
    pub account_id: u64,
    pub proxy: Addr,
}

/// Data set once a batch completes
#[cw_serde]
pub struct BatchOutcome {
    pub steps: Vec<StepOutcome>,
}

#[cw_serde]
pub enum StepOutcome {
    /// Data returned by the adapter, if any
    Succeeded { data: Option<Binary> },
    /// Only possible in non-atomic batches
    Failed { reason: String },
}
