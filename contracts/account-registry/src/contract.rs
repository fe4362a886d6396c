#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, Event, MessageInfo, Order, Reply, Response,
    StdError, StdResult, SubMsg, WasmMsg,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;
use valence_account_factory::msg::{ExecuteMsg as FactoryExecuteMsg, QueryMsg as FactoryQueryMsg};
use valence_account_registry_utils::{
    AccountEntry, Config, ExecuteMsg, InstantiateMsg, QueryMsg, RegisterAccountResponse,
};
use valence_account_utils::{
    msg::{execute_data, invoke_msg, ProxyCall},
    payload::encode_payload,
};

use crate::{
    batch::{self, STEP_REPLY_ID},
    error::ContractError,
    state::{
        ACCOUNT_OWNER, ACTIVE_BATCH, ADAPTER_WHITELIST, CONTEXT, FACTORY, FORWARD_OUTPUTS,
        OWNER_ACCOUNT_COUNT, OWNER_INDEX,
    },
};

// version info for migration info
const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const FORWARD_REPLY_ID: u64 = 2;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    cw_ownable::initialize_owner(deps.storage, deps.api, Some(&msg.admin))?;

    let factory = deps.api.addr_validate(&msg.factory)?;
    FACTORY.save(deps.storage, &factory)?;

    for adapter in &msg.adapters {
        let adapter = deps.api.addr_validate(adapter)?;
        ADAPTER_WHITELIST.save(deps.storage, &adapter, &true)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", msg.admin)
        .add_attribute("factory", factory)
        .add_attribute("adapters", msg.adapters.len().to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::RegisterAccount {} => execute::register_account(deps, env, info),
        ExecuteMsg::SetAdapterWhitelisted { adapter, allowed } => {
            execute::set_adapter_whitelisted(deps, info, adapter, allowed)
        }
        ExecuteMsg::ExecuteAtomic {
            adapters,
            payloads,
            account_ids,
        } => execute::execute_batch(deps, env, info, true, adapters, payloads, account_ids),
        ExecuteMsg::ExecuteNonAtomic {
            adapters,
            payloads,
            account_ids,
        } => execute::execute_batch(deps, env, info, false, adapters, payloads, account_ids),
        ExecuteMsg::Forward { calls } => execute::forward(deps, info, calls),
    }
}

mod execute {
    use cw_ownable::assert_owner;
    use cw_utils::nonpayable;

    use super::*;

    pub fn register_account(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
    ) -> Result<Response, ContractError> {
        let factory = FACTORY.load(deps.storage)?;
        let owner = info.sender;

        // The factory hands out sequence numbers to the registry in order, the next one
        // is the global id of the new account
        let deployed: u64 = deps.querier.query_wasm_smart(
            &factory,
            &FactoryQueryMsg::Count {
                deployer: env.contract.address.to_string(),
            },
        )?;
        let account_id = deployed + 1;
        let proxy = batch::proxy_address(deps.as_ref(), &env, account_id)?;

        ACCOUNT_OWNER.save(deps.storage, account_id, &owner)?;
        let local_index = OWNER_ACCOUNT_COUNT
            .may_load(deps.storage, &owner)?
            .unwrap_or_default()
            + 1;
        OWNER_ACCOUNT_COUNT.save(deps.storage, &owner, &local_index)?;
        OWNER_INDEX.save(deps.storage, (&owner, local_index), &account_id)?;

        let deploy = WasmMsg::Execute {
            contract_addr: factory.to_string(),
            msg: to_json_binary(&FactoryExecuteMsg::Deploy {})?,
            funds: info.funds,
        };

        let event = Event::new("sub_account_deployed")
            .add_attribute("owner", owner.as_str())
            .add_attribute("account_id", account_id.to_string())
            .add_attribute("local_index", local_index.to_string())
            .add_attribute("proxy", proxy.as_str());

        Ok(Response::new()
            .add_message(deploy)
            .add_event(event)
            .set_data(to_json_binary(&RegisterAccountResponse {
                account_id,
                local_index,
                proxy,
            })?)
            .add_attribute("method", "register_account")
            .add_attribute("owner", owner)
            .add_attribute("account_id", account_id.to_string()))
    }

    pub fn set_adapter_whitelisted(
        deps: DepsMut,
        info: MessageInfo,
        adapter: String,
        allowed: bool,
    ) -> Result<Response, ContractError> {
        nonpayable(&info)?;
        assert_owner(deps.storage, &info.sender).map_err(|_| ContractError::NotAdmin {})?;

        let adapter = deps.api.addr_validate(&adapter)?;
        ADAPTER_WHITELIST.save(deps.storage, &adapter, &allowed)?;

        Ok(Response::new()
            .add_event(
                Event::new("adapter_whitelisted")
                    .add_attribute("adapter", adapter.as_str())
                    .add_attribute("allowed", allowed.to_string()),
            )
            .add_attribute("method", "set_adapter_whitelisted")
            .add_attribute("adapter", adapter))
    }

    pub fn execute_batch(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        atomic: bool,
        adapters: Vec<String>,
        payloads: Vec<Binary>,
        account_ids: Vec<u64>,
    ) -> Result<Response, ContractError> {
        batch::assert_not_running(deps.storage)?;
        nonpayable(&info)?;

        let steps = batch::validate_steps(
            deps.as_ref(),
            &env,
            &info.sender,
            adapters,
            payloads,
            account_ids,
        )?;
        let steps_len = steps.len();

        Ok(batch::start(deps, atomic, steps)?
            .add_attribute("method", "execute_batch")
            .add_attribute("atomic", atomic.to_string())
            .add_attribute("steps", steps_len.to_string()))
    }

    pub fn forward(
        deps: DepsMut,
        info: MessageInfo,
        calls: Vec<ProxyCall>,
    ) -> Result<Response, ContractError> {
        nonpayable(&info)?;

        let context = CONTEXT
            .may_load(deps.storage)?
            .ok_or(ContractError::NoActiveContext {})?;
        let active = ACTIVE_BATCH.load(deps.storage)?;
        let step = active
            .current_step()
            .ok_or(ContractError::NoActiveContext {})?;
        if info.sender != step.adapter {
            return Err(ContractError::NotActiveAdapter {});
        }

        let msgs = calls
            .iter()
            .map(|call| -> Result<SubMsg, ContractError> {
                let payload = encode_payload(deps.api, call)?;
                let msg = invoke_msg(context.proxy.as_str(), payload)?;
                Ok(SubMsg::reply_on_success(msg, FORWARD_REPLY_ID))
            })
            .collect::<Result<Vec<_>, _>>()?;

        FORWARD_OUTPUTS.save(deps.storage, &vec![])?;

        Ok(Response::new()
            .add_submessages(msgs)
            // Replaced by the outputs collected in the replies
            .set_data(to_json_binary(&Vec::<Binary>::new())?)
            .add_attribute("method", "forward")
            .add_attribute("proxy", context.proxy)
            .add_attribute("calls", calls.len().to_string()))
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        STEP_REPLY_ID => batch::on_step_reply(deps, msg.result),
        FORWARD_REPLY_ID => {
            let res = msg.result.into_result().map_err(StdError::generic_err)?;
            #[allow(deprecated)]
            let output = execute_data(res.data).unwrap_or_default();

            let outputs = FORWARD_OUTPUTS.update(deps.storage, |mut outputs| -> StdResult<_> {
                outputs.push(output);
                Ok(outputs)
            })?;

            Ok(Response::new().set_data(to_json_binary(&outputs)?))
        }
        id => Err(ContractError::UnknownReplyId(id)),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(deps.storage)?)?),
        QueryMsg::Config {} => Ok(to_json_binary(&Config {
            factory: FACTORY.load(deps.storage)?,
        })?),
        QueryMsg::Resolve { owner, local_index } => {
            let owner = deps.api.addr_validate(&owner)?;
            let account_id = OWNER_INDEX
                .may_load(deps.storage, (&owner, local_index))?
                .ok_or(ContractError::AccountNotFound {})?;
            if ACCOUNT_OWNER.load(deps.storage, account_id)? != owner {
                return Err(ContractError::NotOwner { account_id });
            }
            Ok(to_json_binary(&batch::proxy_address(
                deps, &env, account_id,
            )?)?)
        }
        QueryMsg::HasAccount { owner, local_index } => {
            let owner = deps.api.addr_validate(&owner)?;
            Ok(to_json_binary(
                &OWNER_INDEX.has(deps.storage, (&owner, local_index)),
            )?)
        }
        QueryMsg::AccountOwner { account_id } => Ok(to_json_binary(
            &ACCOUNT_OWNER.may_load(deps.storage, account_id)?,
        )?),
        QueryMsg::AccountCount { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            Ok(to_json_binary(
                &OWNER_ACCOUNT_COUNT
                    .may_load(deps.storage, &owner)?
                    .unwrap_or_default(),
            )?)
        }
        QueryMsg::IsAdapterWhitelisted { adapter } => {
            let adapter = deps.api.addr_validate(&adapter)?;
            Ok(to_json_binary(&batch::is_whitelisted(
                deps.storage,
                &adapter,
            )?)?)
        }
        QueryMsg::ActiveOwner {} => Ok(to_json_binary(
            &CONTEXT.may_load(deps.storage)?.map(|ctx| ctx.owner),
        )?),
        QueryMsg::ActiveAccountId {} => Ok(to_json_binary(
            &CONTEXT.may_load(deps.storage)?.map(|ctx| ctx.account_id),
        )?),
        QueryMsg::ActiveProxy {} => Ok(to_json_binary(
            &CONTEXT.may_load(deps.storage)?.map(|ctx| ctx.proxy),
        )?),
        QueryMsg::ListAccounts {
            owner,
            start_after,
            limit,
        } => {
            let owner = deps.api.addr_validate(&owner)?;
            Ok(to_json_binary(&list_accounts(
                deps,
                &env,
                &owner,
                start_after,
                limit,
            )?)?)
        }
    }
}

fn list_accounts(
    deps: Deps,
    env: &Env,
    owner: &Addr,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<AccountEntry>> {
    let start = start_after.map(Bound::exclusive);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;

    OWNER_INDEX
        .prefix(owner)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (local_index, account_id) = item?;
            Ok(AccountEntry {
                local_index,
                account_id,
                proxy: batch::proxy_address(deps, env, account_id)?,
            })
        })
        .collect()
}
