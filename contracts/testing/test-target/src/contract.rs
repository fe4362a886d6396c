#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdError, StdResult,
    WasmMsg,
};
use thiserror::Error;

use crate::{
    msg::{ExecuteMsg, InstantiateMsg, QueryMsg, RecordedCall},
    state::CALLS,
};

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Target failure: {reason}")]
    Failed { reason: String },
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: InstantiateMsg,
) -> StdResult<Response> {
    CALLS.save(deps.storage, &vec![])?;
    Ok(Response::new().add_attribute("method", "instantiate"))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Record { tag } => {
            CALLS.update(deps.storage, |mut calls| -> StdResult<_> {
                calls.push(RecordedCall {
                    sender: info.sender,
                    tag: tag.clone(),
                    funds: info.funds,
                });
                Ok(calls)
            })?;

            Ok(Response::new()
                .add_attribute("method", "record")
                .add_attribute("tag", tag.clone())
                .set_data(to_json_binary(&tag)?))
        }
        ExecuteMsg::Fail { reason } => Err(ContractError::Failed { reason }),
        ExecuteMsg::Reenter { contract, msg } => Ok(Response::new()
            .add_attribute("method", "reenter")
            .add_message(WasmMsg::Execute {
                contract_addr: contract,
                msg,
                funds: vec![],
            })),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Calls {} => to_json_binary(&CALLS.load(deps.storage)?),
    }
}
