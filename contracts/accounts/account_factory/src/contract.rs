// Purpose: Account factory contract with Instantiate2-based deterministic deployment
//
// Every deployer gets its own sequence of sub-accounts. The N-th deployment of a deployer
// uses sequence number N, and its address only depends on the factory, the sub-account code
// and (deployer, N), so it can be predicted before the sub-account exists.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    instantiate2_address, to_json_binary, Addr, Binary, Deps, DepsMut, Env, Event, MessageInfo,
    Reply, Response, StdError, StdResult, SubMsg, SubMsgResult, WasmMsg,
};
use cw2::set_contract_version;
use sha2::{Digest, Sha256};

use crate::error::ContractError;
use crate::msg::{Config, DeployResponse, ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::state::{CONFIG, NONCES};

const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEPLOY_REPLY_ID: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    CONFIG.save(
        deps.storage,
        &Config {
            sub_account_code_id: msg.sub_account_code_id,
            denom: msg.denom.clone(),
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("sub_account_code_id", msg.sub_account_code_id.to_string())
        .add_attribute("denom", msg.denom))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Deploy {} => execute::deploy(deps, env, info),
    }
}

mod execute {
    use super::*;

    pub fn deploy(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
        let deployer = info.sender;
        let seq = NONCES.may_load(deps.storage, &deployer)?.unwrap_or_default() + 1;
        NONCES.save(deps.storage, &deployer, &seq)?;

        let config = CONFIG.load(deps.storage)?;
        let salt = compute_salt(deps.as_ref(), &deployer, seq)?;
        let account = predict_address(deps.as_ref(), &env.contract.address, &deployer, seq)?;

        let init_msg = valence_account_utils::msg::InstantiateMsg {
            master: deployer.to_string(),
            denom: config.denom,
        };
        let instantiate = WasmMsg::Instantiate2 {
            admin: None,
            code_id: config.sub_account_code_id,
            label: format!("sub-account-{deployer}-{seq}"),
            msg: to_json_binary(&init_msg)?,
            funds: info.funds,
            salt: Binary::from(salt.to_vec()),
        };

        let event = Event::new("sub_account_deployed")
            .add_attribute("deployer", deployer.as_str())
            .add_attribute("account", account.as_str())
            .add_attribute("seq", seq.to_string());

        Ok(Response::new()
            .add_submessage(SubMsg::reply_on_error(instantiate, DEPLOY_REPLY_ID))
            .add_event(event)
            .set_data(to_json_binary(&DeployResponse {
                account: account.clone(),
                seq,
            })?)
            .add_attribute("method", "deploy")
            .add_attribute("deployer", deployer)
            .add_attribute("account", account)
            .add_attribute("seq", seq.to_string()))
    }
}

/// Salt of the sub-account with sequence number `seq` of `deployer`:
/// `sha256(canonical(deployer) || seq as big-endian u64)`
pub fn compute_salt(deps: Deps, deployer: &Addr, seq: u64) -> StdResult<[u8; 32]> {
    let canonical_deployer = deps.api.addr_canonicalize(deployer.as_str())?;

    let mut hasher = Sha256::new();
    hasher.update(canonical_deployer.as_slice());
    hasher.update(seq.to_be_bytes());

    Ok(hasher.finalize().into())
}

/// Address `Instantiate2` gives the sub-account of `deployer` with sequence number `seq`
/// when deployed by `factory`. Both `Deploy` and `Predict` go through here.
pub fn predict_address(deps: Deps, factory: &Addr, deployer: &Addr, seq: u64) -> StdResult<Addr> {
    let config = CONFIG.load(deps.storage)?;
    let checksum = deps
        .querier
        .query_wasm_code_info(config.sub_account_code_id)?
        .checksum;

    let salt = compute_salt(deps, deployer, seq)?;
    let canonical_factory = deps.api.addr_canonicalize(factory.as_str())?;

    let canonical_addr = instantiate2_address(checksum.as_slice(), &canonical_factory, &salt)
        .map_err(|e| StdError::generic_err(e.to_string()))?;

    deps.api.addr_humanize(&canonical_addr)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        DEPLOY_REPLY_ID => match msg.result {
            // Only reached on failure, the instantiate address is already taken
            SubMsgResult::Err(_) => Err(ContractError::Create2Failed {}),
            SubMsgResult::Ok(_) => Ok(Response::new()),
        },
        id => Err(ContractError::UnknownReplyId(id)),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => Ok(to_json_binary(&CONFIG.load(deps.storage)?)?),
        QueryMsg::Predict { deployer, seq } => {
            if seq == 0 {
                return Err(ContractError::InvalidSequence {});
            }
            let deployer = deps.api.addr_validate(&deployer)?;
            let account = predict_address(deps, &env.contract.address, &deployer, seq)?;
            Ok(to_json_binary(&account)?)
        }
        QueryMsg::Count { deployer } => {
            let deployer = deps.api.addr_validate(&deployer)?;
            Ok(to_json_binary(&count(deps, &deployer)?)?)
        }
        QueryMsg::IsDeployed { deployer, seq } => {
            let deployer = deps.api.addr_validate(&deployer)?;
            let deployed = seq >= 1 && seq <= count(deps, &deployer)?;
            Ok(to_json_binary(&deployed)?)
        }
    }
}

fn count(deps: Deps, deployer: &Addr) -> StdResult<u64> {
    Ok(NONCES.may_load(deps.storage, deployer)?.unwrap_or_default())
}
