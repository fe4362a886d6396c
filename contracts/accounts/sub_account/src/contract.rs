// Purpose: Sub-account contract, the minimal proxy every registry account runs
//
// Every invocation is routed by who sends it and how long the payload is:
// - the master with a payload of at least 64 bytes gets the call in the payload forwarded,
//   paid from the sub-account balance
// - everything else is a deposit, the attached funds are kept and nothing is executed
//
// Forwarding failures abort the invocation with an opaque error, the callee error is not
// propagated.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    coins, to_json_binary, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdResult, SubMsg, SubMsgResult, WasmMsg,
};
use cw2::set_contract_version;
use valence_account_utils::{
    error::ContractError,
    msg::{execute_data, ExecuteMsg, InstantiateMsg, QueryMsg},
    payload::{decode_payload, DecodedCall},
};

use crate::state::{DENOM, MASTER};

const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const FORWARD_REPLY_ID: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let master = deps.api.addr_validate(&msg.master)?;
    MASTER.save(deps.storage, &master)?;
    DENOM.save(deps.storage, &msg.denom)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("master", master)
        .add_attribute("denom", msg.denom))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Invoke { payload } => execute::invoke(deps, info, payload),
    }
}

mod execute {
    use super::*;

    pub fn invoke(
        deps: DepsMut,
        info: MessageInfo,
        payload: Binary,
    ) -> Result<Response, ContractError> {
        let master = MASTER.load(deps.storage)?;
        if info.sender != master {
            return Ok(deposit(&info));
        }

        // A malformed header from the master fails like any other forward
        let call = match decode_payload(deps.api, &payload) {
            Ok(Some(call)) => call,
            Ok(None) => return Ok(deposit(&info)),
            Err(_) => return Err(ContractError::ForwardFailed {}),
        };

        let denom = DENOM.load(deps.storage)?;
        let response = Response::new()
            .add_attribute("method", "forward")
            .add_attribute("target", call.target.as_str())
            .add_attribute("value", call.value);

        match forward_msg(call, &denom)? {
            Some(msg) => Ok(response.add_submessage(SubMsg::reply_always(msg, FORWARD_REPLY_ID))),
            // Nothing to execute and nothing to move
            None => Ok(response),
        }
    }

    fn deposit(info: &MessageInfo) -> Response {
        Response::new()
            .add_attribute("method", "deposit")
            .add_attribute("sender", info.sender.as_str())
    }

    fn forward_msg(call: DecodedCall, denom: &str) -> StdResult<Option<CosmosMsg>> {
        let funds = if call.value.is_zero() {
            vec![]
        } else {
            coins(call.value.u128(), denom)
        };

        if !call.payload.is_empty() {
            return Ok(Some(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: call.target.to_string(),
                msg: call.payload,
                funds,
            })));
        }

        if funds.is_empty() {
            return Ok(None);
        }

        Ok(Some(CosmosMsg::Bank(cosmwasm_std::BankMsg::Send {
            to_address: call.target.to_string(),
            amount: funds,
        })))
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        FORWARD_REPLY_ID => match msg.result {
            SubMsgResult::Ok(response) => {
                #[allow(deprecated)]
                let output = execute_data(response.data);
                let mut res = Response::new().add_attribute("method", "forward_reply");
                if let Some(output) = output {
                    res = res.set_data(output);
                }
                Ok(res)
            }
            SubMsgResult::Err(_) => Err(ContractError::ForwardFailed {}),
        },
        id => Err(ContractError::UnknownReplyId(id)),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Master {} => to_json_binary(&MASTER.load(deps.storage)?),
        QueryMsg::Denom {} => to_json_binary(&DENOM.load(deps.storage)?),
    }
}
