use cosmwasm_std::{
    from_json,
    testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier, MockStorage},
    to_json_binary, Addr, Binary, ContractResult, OwnedDeps, ReplyOn, SystemError, SystemResult,
    Uint128, WasmQuery,
};
use valence_account_factory::msg::QueryMsg as FactoryQueryMsg;
use valence_account_registry_utils::{ExecuteMsg, ExecutionContext, InstantiateMsg};
use valence_account_utils::msg::ProxyCall;

use crate::{
    batch::{ActiveBatch, BatchStep},
    contract::{execute, instantiate},
    state::{ACCOUNT_OWNER, ACTIVE_BATCH, CONTEXT},
    ContractError,
};

type MockDeps = OwnedDeps<MockStorage, MockApi, MockQuerier>;

fn setup(deployed: bool) -> MockDeps {
    let mut deps = mock_dependencies();
    let factory = deps.api.addr_make("factory");
    let admin = deps.api.addr_make("admin");
    let adapter = deps.api.addr_make("adapter");

    let factory_addr = factory.to_string();
    let proxy = deps.api.addr_make("proxy");
    deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { contract_addr, msg } if *contract_addr == factory_addr => {
            let res = match from_json(msg) {
                Ok(FactoryQueryMsg::IsDeployed { .. }) => to_json_binary(&deployed),
                Ok(FactoryQueryMsg::Predict { .. }) => to_json_binary(&proxy),
                _ => {
                    return SystemResult::Err(SystemError::UnsupportedRequest {
                        kind: "factory query".to_string(),
                    })
                }
            };
            SystemResult::Ok(ContractResult::Ok(res.unwrap()))
        }
        _ => SystemResult::Err(SystemError::UnsupportedRequest {
            kind: "wasm".to_string(),
        }),
    });

    instantiate(
        deps.as_mut(),
        mock_env(),
        message_info(&admin, &[]),
        InstantiateMsg {
            admin: admin.to_string(),
            factory: factory.to_string(),
            adapters: vec![adapter.to_string()],
        },
    )
    .unwrap();

    deps
}

fn running_batch(deps: &mut MockDeps, adapter: &Addr) -> ExecutionContext {
    let context = ExecutionContext {
        owner: deps.api.addr_make("alice"),
        account_id: 1,
        proxy: deps.api.addr_make("proxy"),
    };
    ACTIVE_BATCH
        .save(
            deps.as_mut().storage,
            &ActiveBatch {
                atomic: true,
                steps: vec![BatchStep {
                    adapter: adapter.clone(),
                    payload: Binary::default(),
                    context: context.clone(),
                }],
                current: 0,
                outcomes: vec![],
            },
        )
        .unwrap();
    CONTEXT.save(deps.as_mut().storage, &context).unwrap();
    context
}

fn empty_batch(atomic: bool) -> ExecuteMsg {
    if atomic {
        ExecuteMsg::ExecuteAtomic {
            adapters: vec![],
            payloads: vec![],
            account_ids: vec![],
        }
    } else {
        ExecuteMsg::ExecuteNonAtomic {
            adapters: vec![],
            payloads: vec![],
            account_ids: vec![],
        }
    }
}

#[test]
fn batch_entry_is_locked_while_running() {
    let mut deps = setup(true);
    let adapter = deps.api.addr_make("adapter");
    let alice = deps.api.addr_make("alice");
    running_batch(&mut deps, &adapter);

    for atomic in [true, false] {
        let err = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&alice, &[]),
            empty_batch(atomic),
        )
        .unwrap_err();
        assert_eq!(err, ContractError::Reentrancy {});
        assert_eq!(err.to_string(), "");
    }

    // A leftover context alone is enough to lock the entry point
    ACTIVE_BATCH.remove(deps.as_mut().storage);
    let err = execute(
        deps.as_mut(),
        mock_env(),
        message_info(&alice, &[]),
        empty_batch(true),
    )
    .unwrap_err();
    assert_eq!(err, ContractError::Reentrancy {});

    CONTEXT.remove(deps.as_mut().storage);
    execute(
        deps.as_mut(),
        mock_env(),
        message_info(&alice, &[]),
        empty_batch(true),
    )
    .unwrap();
}

#[test]
fn only_active_adapter_can_forward() {
    let mut deps = setup(true);
    let adapter = deps.api.addr_make("adapter");
    let other = deps.api.addr_make("other_adapter");
    running_batch(&mut deps, &adapter);

    let calls = vec![
        ProxyCall {
            target: deps.api.addr_make("target").to_string(),
            value: Uint128::new(5),
            payload: Binary::from(b"{}".as_slice()),
        },
        ProxyCall {
            target: deps.api.addr_make("target").to_string(),
            value: Uint128::zero(),
            payload: Binary::from(b"{}".as_slice()),
        },
    ];

    let err = execute(
        deps.as_mut(),
        mock_env(),
        message_info(&other, &[]),
        ExecuteMsg::Forward {
            calls: calls.clone(),
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::NotActiveAdapter {});

    let res = execute(
        deps.as_mut(),
        mock_env(),
        message_info(&adapter, &[]),
        ExecuteMsg::Forward { calls },
    )
    .unwrap();
    assert_eq!(res.messages.len(), 2);
    assert!(res
        .messages
        .iter()
        .all(|msg| msg.reply_on == ReplyOn::Success));
}

#[test]
fn undeployed_sub_account_is_rejected() {
    let mut deps = setup(false);
    let adapter = deps.api.addr_make("adapter");
    let alice = deps.api.addr_make("alice");
    ACCOUNT_OWNER.save(deps.as_mut().storage, 1, &alice).unwrap();

    let err = execute(
        deps.as_mut(),
        mock_env(),
        message_info(&alice, &[]),
        ExecuteMsg::ExecuteAtomic {
            adapters: vec![adapter.to_string()],
            payloads: vec![Binary::default()],
            account_ids: vec![1],
        },
    )
    .unwrap_err();

    assert_eq!(err, ContractError::SubAccountNotDeployed { account_id: 1 });
}

#[test]
fn batch_rejects_funds() {
    let mut deps = setup(true);
    let alice = deps.api.addr_make("alice");

    let err = execute(
        deps.as_mut(),
        mock_env(),
        message_info(&alice, &[cosmwasm_std::coin(1, "untrn")]),
        empty_batch(false),
    )
    .unwrap_err();

    assert!(matches!(err, ContractError::Payment(_)));
}
