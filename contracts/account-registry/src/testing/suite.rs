use cosmwasm_std::{coin, to_json_binary, Addr, Binary, Coin, Uint128};
use cw_multi_test::{error::AnyResult, App, AppResponse, ContractWrapper};
use getset::{Getters, Setters};
use valence_account_registry_utils::{ExecuteMsg, InstantiateMsg, QueryMsg};
use valence_account_utils::{
    msg::ProxyCall,
    testing::{AccountTestSuite, AccountTestSuiteBase},
};
use valence_forwarding_adapter::msg::{
    ExecuteMsg as AdapterExecuteMsg, InstantiateMsg as AdapterInstantiateMsg,
};
use valence_test_target::msg::{
    ExecuteMsg as TargetExecuteMsg, InstantiateMsg as TargetInstantiateMsg,
    QueryMsg as TargetQueryMsg, RecordedCall,
};

pub const NTRN: &str = "untrn";

#[derive(Getters, Setters)]
pub struct RegistryTestSuite {
    #[getset(get = "pub")]
    inner: AccountTestSuiteBase,
    #[getset(get = "pub")]
    factory: Addr,
    #[getset(get = "pub")]
    registry: Addr,
    #[getset(get = "pub")]
    adapter: Addr,
    #[getset(get = "pub")]
    target: Addr,
}

impl Default for RegistryTestSuite {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl RegistryTestSuite {
    pub fn new() -> Self {
        let sub_account_code = ContractWrapper::new(
            valence_sub_account::contract::execute,
            valence_sub_account::contract::instantiate,
            valence_sub_account::contract::query,
        )
        .with_reply(valence_sub_account::contract::reply);

        let mut inner = AccountTestSuiteBase::new(Box::new(sub_account_code));

        let factory_code = ContractWrapper::new(
            valence_account_factory::contract::execute,
            valence_account_factory::contract::instantiate,
            valence_account_factory::contract::query,
        )
        .with_reply(valence_account_factory::contract::reply);
        let factory_code_id = inner.app_mut().store_code(Box::new(factory_code));

        let registry_code = ContractWrapper::new(
            crate::contract::execute,
            crate::contract::instantiate,
            crate::contract::query,
        )
        .with_reply(crate::contract::reply);
        let registry_code_id = inner.app_mut().store_code(Box::new(registry_code));

        let adapter_code = ContractWrapper::new(
            valence_forwarding_adapter::contract::execute,
            valence_forwarding_adapter::contract::instantiate,
            valence_forwarding_adapter::contract::query,
        )
        .with_reply(valence_forwarding_adapter::contract::reply);
        let adapter_code_id = inner.app_mut().store_code(Box::new(adapter_code));

        let target_code = ContractWrapper::new(
            valence_test_target::contract::execute,
            valence_test_target::contract::instantiate,
            valence_test_target::contract::query,
        );
        let target_code_id = inner.app_mut().store_code(Box::new(target_code));

        let factory = inner.contract_init(
            factory_code_id,
            "factory",
            &valence_account_factory::msg::InstantiateMsg {
                sub_account_code_id: inner.sub_account_code_id(),
                denom: NTRN.to_string(),
            },
            &[],
        );

        // The adapter needs the registry address and the registry whitelists the adapter
        // after the fact
        let registry = inner.contract_init(
            registry_code_id,
            "registry",
            &InstantiateMsg {
                admin: inner.owner().to_string(),
                factory: factory.to_string(),
                adapters: vec![],
            },
            &[],
        );

        let adapter = inner.contract_init(
            adapter_code_id,
            "forwarding_adapter",
            &AdapterInstantiateMsg {
                registry: registry.to_string(),
            },
            &[],
        );

        let target = inner.contract_init(target_code_id, "target", &TargetInstantiateMsg {}, &[]);

        let mut suite = Self {
            inner,
            factory,
            registry,
            adapter,
            target,
        };

        let adapter = suite.adapter.clone();
        suite.whitelist(&adapter, true).unwrap();

        suite
    }

    pub fn whitelist(&mut self, adapter: &Addr, allowed: bool) -> AnyResult<AppResponse> {
        let admin = self.owner().clone();
        self.whitelist_as(&admin, adapter, allowed)
    }

    pub fn whitelist_as(
        &mut self,
        sender: &Addr,
        adapter: &Addr,
        allowed: bool,
    ) -> AnyResult<AppResponse> {
        let registry = self.registry.clone();
        self.contract_execute_as(
            sender,
            &registry,
            &ExecuteMsg::SetAdapterWhitelisted {
                adapter: adapter.to_string(),
                allowed,
            },
            &[],
        )
    }

    pub fn register(&mut self, owner: &Addr) -> AnyResult<AppResponse> {
        self.register_with_funds(owner, &[])
    }

    pub fn register_with_funds(&mut self, owner: &Addr, funds: &[Coin]) -> AnyResult<AppResponse> {
        let registry = self.registry.clone();
        self.contract_execute_as(owner, &registry, &ExecuteMsg::RegisterAccount {}, funds)
    }

    pub fn execute_batch(
        &mut self,
        sender: &Addr,
        atomic: bool,
        steps: Vec<(Addr, Binary, u64)>,
    ) -> AnyResult<AppResponse> {
        let mut adapters = vec![];
        let mut payloads = vec![];
        let mut account_ids = vec![];
        for (adapter, payload, account_id) in steps {
            adapters.push(adapter.to_string());
            payloads.push(payload);
            account_ids.push(account_id);
        }

        let msg = if atomic {
            ExecuteMsg::ExecuteAtomic {
                adapters,
                payloads,
                account_ids,
            }
        } else {
            ExecuteMsg::ExecuteNonAtomic {
                adapters,
                payloads,
                account_ids,
            }
        };

        let registry = self.registry.clone();
        self.contract_execute_as(sender, &registry, &msg, &[])
    }

    /// Step running the forwarding adapter with `calls` on `account_id`
    pub fn forward_step(&self, account_id: u64, calls: Vec<ProxyCall>) -> (Addr, Binary, u64) {
        let payload = to_json_binary(&AdapterExecuteMsg::Forward { calls }).unwrap();
        (self.adapter.clone(), payload, account_id)
    }

    pub fn record_call(&self, value: u128, tag: &str) -> ProxyCall {
        ProxyCall {
            target: self.target.to_string(),
            value: Uint128::new(value),
            payload: to_json_binary(&TargetExecuteMsg::Record {
                tag: tag.to_string(),
            })
            .unwrap(),
        }
    }

    pub fn fail_call(&self, reason: &str) -> ProxyCall {
        ProxyCall {
            target: self.target.to_string(),
            value: Uint128::zero(),
            payload: to_json_binary(&TargetExecuteMsg::Fail {
                reason: reason.to_string(),
            })
            .unwrap(),
        }
    }

    pub fn resolve(&self, owner: &Addr, local_index: u64) -> Addr {
        self.query_wasm(
            &self.registry,
            &QueryMsg::Resolve {
                owner: owner.to_string(),
                local_index,
            },
        )
    }

    pub fn account_count(&self, owner: &Addr) -> u64 {
        self.query_wasm(
            &self.registry,
            &QueryMsg::AccountCount {
                owner: owner.to_string(),
            },
        )
    }

    pub fn account_owner(&self, account_id: u64) -> Option<Addr> {
        self.query_wasm(&self.registry, &QueryMsg::AccountOwner { account_id })
    }

    pub fn target_calls(&self) -> Vec<RecordedCall> {
        self.query_wasm(&self.target, &TargetQueryMsg::Calls {})
    }

    pub fn fund(&mut self, addr: &Addr, amount: u128) {
        self.init_balance(addr, vec![coin(amount, NTRN)]);
    }

    /// Values of attribute `key` across all custom events of type `ty`
    pub fn event_attrs(&self, res: &AppResponse, ty: &str, key: &str) -> Vec<String> {
        let ty = format!("wasm-{ty}");
        res.events
            .iter()
            .filter(|ev| ev.ty == ty)
            .flat_map(|ev| ev.attributes.iter())
            .filter(|attr| attr.key == key)
            .map(|attr| attr.value.clone())
            .collect()
    }
}

impl AccountTestSuite for RegistryTestSuite {
    fn app(&self) -> &App {
        self.inner.app()
    }

    fn app_mut(&mut self) -> &mut App {
        self.inner.app_mut()
    }

    fn owner(&self) -> &Addr {
        self.inner.owner()
    }

    fn sub_account_code_id(&self) -> u64 {
        self.inner.sub_account_code_id()
    }
}
