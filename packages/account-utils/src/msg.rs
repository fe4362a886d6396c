use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_json_binary, Addr, Binary, CosmosMsg, StdResult, Uint128, WasmMsg};
use cw_utils::parse_execute_response_data;

#[cw_serde]
pub struct InstantiateMsg {
    pub master: String, // Only identity allowed to forward calls, never changes
    pub denom: String,  // Native denom used for forwarded value
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Forwards `payload[64..]` to the target encoded in the header when sent by the master,
    /// otherwise just accepts the attached funds
    Invoke { payload: Binary },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Addr)]
    Master {},
    #[returns(String)]
    Denom {},
}

/// A single call to be forwarded through a sub-account
#[cw_serde]
pub struct ProxyCall {
    pub target: String,
    pub value: Uint128,
    pub payload: Binary,
}

pub fn invoke_msg(sub_account: impl Into<String>, payload: Binary) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: sub_account.into(),
        msg: to_json_binary(&ExecuteMsg::Invoke { payload })?,
        funds: vec![],
    }))
}

/// Unwraps the data a contract returned from a `MsgExecuteContractResponse` reply payload.
/// Data that is not wrapped (bank sends, raw responses) is returned as is.
pub fn execute_data(data: Option<Binary>) -> Option<Binary> {
    let data = data?;
    match parse_execute_response_data(data.as_slice()) {
        Ok(response) => response.data,
        Err(_) => Some(data),
    }
}
