// Batch execution. Steps run one at a time, each one as a sub-message whose reply clears the
// execution context and either dispatches the next step or completes the batch.
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, Event, Response, StdResult, Storage,
    SubMsg, SubMsgResult, WasmMsg,
};
use itertools::izip;
use valence_account_factory::msg::QueryMsg as FactoryQueryMsg;
use valence_account_registry_utils::{BatchOutcome, ExecutionContext, StepOutcome};
use valence_account_utils::msg::execute_data;

use crate::{
    error::ContractError,
    state::{ACCOUNT_OWNER, ACTIVE_BATCH, ADAPTER_WHITELIST, CONTEXT, FACTORY, FORWARD_OUTPUTS},
};

pub const STEP_REPLY_ID: u64 = 1;

#[cw_serde]
pub struct BatchStep {
    pub adapter: Addr,
    pub payload: Binary,
    pub context: ExecutionContext,
}

#[cw_serde]
pub struct ActiveBatch {
    pub atomic: bool,
    pub steps: Vec<BatchStep>,
    // Index of the step currently running
    pub current: usize,
    pub outcomes: Vec<StepOutcome>,
}

impl ActiveBatch {
    pub fn current_step(&self) -> Option<&BatchStep> {
        self.steps.get(self.current)
    }
}

/// Fails if a batch is already running, which can only happen through a reentrant call
pub fn assert_not_running(storage: &dyn Storage) -> Result<(), ContractError> {
    if ACTIVE_BATCH.exists(storage) || CONTEXT.exists(storage) {
        return Err(ContractError::Reentrancy {});
    }
    Ok(())
}

/// Checks every step for `caller` before anything runs, resolving the sub-account of each one
pub fn validate_steps(
    deps: Deps,
    env: &Env,
    caller: &Addr,
    adapters: Vec<String>,
    payloads: Vec<Binary>,
    account_ids: Vec<u64>,
) -> Result<Vec<BatchStep>, ContractError> {
    if adapters.len() != payloads.len() || adapters.len() != account_ids.len() {
        return Err(ContractError::LengthMismatch {});
    }

    let factory = FACTORY.load(deps.storage)?;

    izip!(adapters, payloads, account_ids)
        .map(|(adapter, payload, account_id)| -> Result<BatchStep, ContractError> {
            let owner = ACCOUNT_OWNER
                .may_load(deps.storage, account_id)?
                .ok_or(ContractError::AccountNotFound {})?;
            if &owner != caller {
                return Err(ContractError::NotOwner { account_id });
            }

            let adapter = match deps.api.addr_validate(&adapter) {
                Ok(addr) if is_whitelisted(deps.storage, &addr)? => addr,
                _ => return Err(ContractError::AdapterNotAllowed { adapter }),
            };

            let deployed: bool = deps.querier.query_wasm_smart(
                &factory,
                &FactoryQueryMsg::IsDeployed {
                    deployer: env.contract.address.to_string(),
                    seq: account_id,
                },
            )?;
            if !deployed {
                return Err(ContractError::SubAccountNotDeployed { account_id });
            }

            let proxy = proxy_address(deps, env, account_id)?;

            Ok(BatchStep {
                adapter,
                payload,
                context: ExecutionContext {
                    owner,
                    account_id,
                    proxy,
                },
            })
        })
        .collect()
}

pub fn is_whitelisted(storage: &dyn Storage, adapter: &Addr) -> StdResult<bool> {
    Ok(ADAPTER_WHITELIST
        .may_load(storage, adapter)?
        .unwrap_or_default())
}

/// Sub-account address of a global account id, as derived by the factory
pub fn proxy_address(deps: Deps, env: &Env, account_id: u64) -> StdResult<Addr> {
    let factory = FACTORY.load(deps.storage)?;
    deps.querier.query_wasm_smart(
        factory,
        &FactoryQueryMsg::Predict {
            deployer: env.contract.address.to_string(),
            seq: account_id,
        },
    )
}

/// Starts running `steps`, an empty batch completes right away
pub fn start(
    deps: DepsMut,
    atomic: bool,
    steps: Vec<BatchStep>,
) -> Result<Response, ContractError> {
    let batch = ActiveBatch {
        atomic,
        steps,
        current: 0,
        outcomes: vec![],
    };

    if let Some(step) = batch.current_step() {
        let msg = enter_step(deps.storage, step)?;
        ACTIVE_BATCH.save(deps.storage, &batch)?;
        return Ok(Response::new().add_submessage(msg));
    }

    complete(batch)
}

fn enter_step(storage: &mut dyn Storage, step: &BatchStep) -> StdResult<SubMsg> {
    CONTEXT.save(storage, &step.context)?;
    FORWARD_OUTPUTS.remove(storage);

    Ok(SubMsg::reply_always(
        WasmMsg::Execute {
            contract_addr: step.adapter.to_string(),
            msg: step.payload.clone(),
            funds: vec![],
        },
        STEP_REPLY_ID,
    ))
}

/// Handles the outcome of the running step and moves the batch forward
pub fn on_step_reply(deps: DepsMut, result: SubMsgResult) -> Result<Response, ContractError> {
    // Cleared whatever the outcome
    CONTEXT.remove(deps.storage);
    FORWARD_OUTPUTS.remove(deps.storage);

    let mut batch = ACTIVE_BATCH.load(deps.storage)?;
    let step = batch
        .current_step()
        .cloned()
        .ok_or(ContractError::NoActiveContext {})?;
    let index = batch.current;

    let mut response = Response::new();
    match result {
        SubMsgResult::Ok(res) => {
            #[allow(deprecated)]
            let data = execute_data(res.data);
            batch.outcomes.push(StepOutcome::Succeeded { data });
        }
        SubMsgResult::Err(reason) => {
            // Atomic batches revert everything done so far
            if batch.atomic {
                return Err(ContractError::StepFailed {
                    index: index as u64,
                    adapter: step.adapter,
                    reason,
                });
            }

            response = response.add_event(
                Event::new("non_atomic_failure")
                    .add_attribute("account_id", step.context.account_id.to_string())
                    .add_attribute("adapter", step.adapter.as_str())
                    .add_attribute("index", index.to_string())
                    .add_attribute("reason", reason.clone()),
            );
            batch.outcomes.push(StepOutcome::Failed { reason });
        }
    }

    batch.current += 1;
    if let Some(next) = batch.current_step() {
        let msg = enter_step(deps.storage, next)?;
        ACTIVE_BATCH.save(deps.storage, &batch)?;
        return Ok(response.add_submessage(msg));
    }

    ACTIVE_BATCH.remove(deps.storage);
    let completed = complete(batch)?;
    Ok(completed.add_events(response.events))
}

fn complete(batch: ActiveBatch) -> Result<Response, ContractError> {
    let failures = batch
        .outcomes
        .iter()
        .filter(|outcome| matches!(outcome, StepOutcome::Failed { .. }))
        .count();

    let event = Event::new("batch_executed")
        .add_attribute("atomic", batch.atomic.to_string())
        .add_attribute("steps", batch.outcomes.len().to_string())
        .add_attribute("failures", failures.to_string());

    Ok(Response::new()
        .add_event(event)
        .set_data(to_json_binary(&BatchOutcome {
            steps: batch.outcomes,
        })?))
}
