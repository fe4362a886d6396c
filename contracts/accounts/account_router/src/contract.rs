// Purpose: Router wrapper around the account factory
//
// The router is the master of every sub-account it creates. Each caller gets an ordered list
// of sub-accounts and addresses them by position in that list.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdError, StdResult, SubMsg, WasmMsg,
};
use cw2::set_contract_version;
use itertools::izip;
use valence_account_factory::msg::{ExecuteMsg as FactoryExecuteMsg, QueryMsg as FactoryQueryMsg};
use valence_account_utils::{
    msg::{execute_data, invoke_msg, ProxyCall},
    payload::encode_payload,
};

use crate::error::ContractError;
use crate::msg::{Config, ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::state::{ACCOUNTS, FACTORY};

const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const EXECUTE_REPLY_ID: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let factory = deps.api.addr_validate(&msg.factory)?;
    FACTORY.save(deps.storage, &factory)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("factory", factory))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Create {} => execute::create(deps, env, info),
        ExecuteMsg::Execute { index, call } => execute::execute(deps, info, index, call),
        ExecuteMsg::BatchExecute { indices, calls } => {
            execute::batch_execute(deps, info, indices, calls)
        }
    }
}

mod execute {
    use super::*;

    pub fn create(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
        let factory = FACTORY.load(deps.storage)?;
        let router = env.contract.address.to_string();

        // The factory deploys with the next sequence number of the router
        let count: u64 = deps.querier.query_wasm_smart(
            &factory,
            &FactoryQueryMsg::Count {
                deployer: router.clone(),
            },
        )?;
        let account: Addr = deps.querier.query_wasm_smart(
            &factory,
            &FactoryQueryMsg::Predict {
                deployer: router,
                seq: count + 1,
            },
        )?;

        let mut accounts = ACCOUNTS
            .may_load(deps.storage, &info.sender)?
            .unwrap_or_default();
        accounts.push(account.clone());
        let index = accounts.len() as u64 - 1;
        ACCOUNTS.save(deps.storage, &info.sender, &accounts)?;

        let deploy = WasmMsg::Execute {
            contract_addr: factory.to_string(),
            msg: to_json_binary(&FactoryExecuteMsg::Deploy {})?,
            funds: info.funds,
        };

        Ok(Response::new()
            .add_message(deploy)
            .set_data(to_json_binary(&account)?)
            .add_attribute("method", "create")
            .add_attribute("owner", info.sender)
            .add_attribute("account", account)
            .add_attribute("index", index.to_string()))
    }

    pub fn execute(
        deps: DepsMut,
        info: MessageInfo,
        index: u64,
        call: ProxyCall,
    ) -> Result<Response, ContractError> {
        let accounts = ACCOUNTS
            .may_load(deps.storage, &info.sender)?
            .unwrap_or_default();
        let account = lookup(&accounts, index)?;

        let payload = encode_payload(deps.api, &call)?;
        let msg = invoke_msg(account, payload)?;

        Ok(Response::new()
            .add_submessage(SubMsg::reply_on_success(msg, EXECUTE_REPLY_ID))
            .add_attribute("method", "execute")
            .add_attribute("account", account)
            .add_attribute("target", call.target)
            .add_attribute("value", call.value))
    }

    pub fn batch_execute(
        deps: DepsMut,
        info: MessageInfo,
        indices: Vec<u64>,
        calls: Vec<ProxyCall>,
    ) -> Result<Response, ContractError> {
        if indices.len() != calls.len() {
            return Err(ContractError::LengthMismatch {});
        }

        let accounts = ACCOUNTS
            .may_load(deps.storage, &info.sender)?
            .unwrap_or_default();

        let msgs = izip!(indices.iter(), calls.iter())
            .map(|(index, call)| -> Result<CosmosMsg, ContractError> {
                let account = lookup(&accounts, *index)?;
                let payload = encode_payload(deps.api, call)?;
                Ok(invoke_msg(account, payload)?)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Response::new()
            .add_messages(msgs)
            .add_attribute("method", "batch_execute")
            .add_attribute("calls", calls.len().to_string()))
    }

    fn lookup(accounts: &[Addr], index: u64) -> Result<&Addr, ContractError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| accounts.get(i))
            .ok_or(ContractError::AccountNotFound { index })
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        EXECUTE_REPLY_ID => {
            let res = msg.result.into_result().map_err(StdError::generic_err)?;
            #[allow(deprecated)]
            let output = execute_data(res.data);

            let response = Response::new().add_attribute("method", "execute_reply");
            Ok(match output {
                Some(output) => response.set_data(output),
                None => response,
            })
        }
        id => Err(ContractError::UnknownReplyId(id)),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&Config {
            factory: FACTORY.load(deps.storage)?,
        }),
        QueryMsg::List { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            let accounts = ACCOUNTS.may_load(deps.storage, &owner)?.unwrap_or_default();
            to_json_binary(&accounts)
        }
        QueryMsg::Count { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            let accounts = ACCOUNTS.may_load(deps.storage, &owner)?.unwrap_or_default();
            to_json_binary(&(accounts.len() as u64))
        }
    }
}
