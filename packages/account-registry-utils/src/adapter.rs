// Helpers for adapters, the whitelisted contracts the registry runs batch steps on.
// An adapter is only ever invoked by the registry and acts on the active sub-account
// through the registry `Forward` capability.
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, QuerierWrapper, StdError, Storage, WasmMsg};
use cw_storage_plus::Item;
use thiserror::Error;
use valence_account_utils::msg::ProxyCall;

use crate::msg::{ExecuteMsg, QueryMsg};

pub const REGISTRY: Item<Addr> = Item::new("registry");

#[derive(Error, Debug, PartialEq)]
pub enum AdapterError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Not in a registry execution context")]
    NotManagerContext {},
}

/// Fails unless `sender` is the registry the adapter was set up with
pub fn assert_registry(store: &dyn Storage, sender: &Addr) -> Result<(), AdapterError> {
    let registry = REGISTRY.load(store)?;
    if *sender != registry {
        return Err(AdapterError::NotManagerContext {});
    }
    Ok(())
}

/// Sub-account of the step the registry is currently running
pub fn query_active_proxy(querier: QuerierWrapper, registry: &Addr) -> Result<Addr, AdapterError> {
    let proxy: Option<Addr> = querier.query_wasm_smart(registry, &QueryMsg::ActiveProxy {})?;
    proxy.ok_or(AdapterError::NotManagerContext {})
}

pub fn forward_msg(registry: &Addr, calls: Vec<ProxyCall>) -> Result<CosmosMsg, AdapterError> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: registry.to_string(),
        msg: to_json_binary(&ExecuteMsg::Forward { calls })?,
        funds: vec![],
    }))
}
