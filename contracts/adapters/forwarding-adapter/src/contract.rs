#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdError,
    StdResult, SubMsg,
};
use cw2::set_contract_version;
use valence_account_registry_utils::adapter::{
    assert_registry, forward_msg, query_active_proxy, AdapterError, REGISTRY,
};
use valence_account_utils::msg::execute_data;

use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};

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

    let registry = deps.api.addr_validate(&msg.registry)?;
    REGISTRY.save(deps.storage, &registry)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("registry", registry))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, AdapterError> {
    match msg {
        ExecuteMsg::Forward { calls } => {
            assert_registry(deps.storage, &info.sender)?;

            let registry = REGISTRY.load(deps.storage)?;
            let proxy = query_active_proxy(deps.querier, &registry)?;

            let calls_len = calls.len();
            let msg = forward_msg(&registry, calls)?;

            Ok(Response::new()
                .add_submessage(SubMsg::reply_on_success(msg, FORWARD_REPLY_ID))
                .add_attribute("method", "forward")
                .add_attribute("proxy", proxy)
                .add_attribute("calls", calls_len.to_string()))
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, AdapterError> {
    match msg.id {
        FORWARD_REPLY_ID => {
            let res = msg.result.into_result().map_err(StdError::generic_err)?;
            // Outputs collected by the registry, handed back as they are
            #[allow(deprecated)]
            let outputs = execute_data(res.data);

            let response = Response::new().add_attribute("method", "forward_reply");
            Ok(match outputs {
                Some(outputs) => response.set_data(outputs),
                None => response,
            })
        }
        _ => Err(AdapterError::Std(StdError::generic_err("unknown reply id"))),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Registry {} => to_json_binary(&REGISTRY.load(deps.storage)?),
    }
}
