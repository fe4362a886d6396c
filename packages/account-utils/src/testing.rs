use cosmwasm_std::{
    instantiate2_address, testing::MockApi, Addr, Api, CodeInfoResponse, Coin, Empty,
};
use cw_multi_test::{error::AnyResult, next_block, App, AppResponse, Contract, Executor};
use serde::Serialize;
use std::fmt::Debug;

pub struct AccountTestSuiteBase {
    app: App,
    owner: Addr,
    sub_account_code_id: u64,
}

#[allow(dead_code)]
impl AccountTestSuiteBase {
    pub fn new(sub_account_contract: Box<dyn Contract<Empty>>) -> Self {
        let mut app = App::default();

        let owner = app.api().addr_make("owner");

        let sub_account_code_id = app.store_code(sub_account_contract);

        Self {
            app,
            owner,
            sub_account_code_id,
        }
    }
}

pub trait AccountTestSuite {
    fn app(&self) -> &App;
    fn app_mut(&mut self) -> &mut App;
    fn owner(&self) -> &Addr;
    fn sub_account_code_id(&self) -> u64;

    fn api(&self) -> &MockApi {
        self.app().api()
    }

    /// Address an `Instantiate2` of `code_id` by `creator` with `salt` lands on
    fn instantiate2_addr(&self, code_id: u64, creator: &Addr, salt: &[u8]) -> Addr {
        let canonical_creator = self.api().addr_canonicalize(creator.as_str()).unwrap();

        let CodeInfoResponse { checksum, .. } =
            self.app().wrap().query_wasm_code_info(code_id).unwrap();

        let canonical_addr =
            instantiate2_address(checksum.as_slice(), &canonical_creator, salt).unwrap();

        self.api().addr_humanize(&canonical_addr).unwrap()
    }

    fn contract_init<T: Serialize>(
        &mut self,
        code_id: u64,
        label: &str,
        init_msg: &T,
        funds: &[Coin],
    ) -> Addr {
        let owner = self.owner().clone();
        self.app_mut()
            .instantiate_contract(code_id, owner, &init_msg, funds, label, None)
            .unwrap()
    }

    fn contract_execute<T: Serialize + Debug>(
        &mut self,
        addr: Addr,
        msg: &T,
    ) -> AnyResult<AppResponse> {
        let sender = self.owner().clone();
        self.app_mut().execute_contract(sender, addr, &msg, &[])
    }

    fn contract_execute_as<T: Serialize + Debug>(
        &mut self,
        sender: &Addr,
        addr: &Addr,
        msg: &T,
        funds: &[Coin],
    ) -> AnyResult<AppResponse> {
        self.app_mut()
            .execute_contract(sender.clone(), addr.clone(), &msg, funds)
    }

    fn next_block(&mut self) {
        self.app_mut().update_block(next_block);
    }

    fn query_balance(&self, addr: &Addr, denom: &str) -> Coin {
        self.app().wrap().query_balance(addr, denom).unwrap()
    }

    fn assert_balance(&self, addr: &Addr, coin: Coin) {
        let bal = self.query_balance(addr, &coin.denom);
        assert_eq!(bal, coin);
    }

    fn init_balance(&mut self, addr: &Addr, amounts: Vec<Coin>) {
        self.app_mut().init_modules(|router, _, store| {
            router.bank.init_balance(store, addr, amounts).unwrap();
        });
    }

    fn query_wasm<T, U>(&self, addr: &Addr, query: &T) -> U
    where
        T: Serialize,
        U: serde::de::DeserializeOwned,
    {
        self.app()
            .wrap()
            .query_wasm_smart::<U>(addr, &query)
            .unwrap()
    }

    fn send_tokens(&mut self, sender: &Addr, recipient: &Addr, amount: &[Coin]) -> AppResponse {
        self.app_mut()
            .send_tokens(sender.clone(), recipient.clone(), amount)
            .unwrap()
    }

    /// Number of custom events of type `ty` (without the `wasm-` prefix) in a response
    fn count_events(&self, res: &AppResponse, ty: &str) -> usize {
        let ty = format!("wasm-{ty}");
        res.events.iter().filter(|ev| ev.ty == ty).count()
    }
}

#[allow(dead_code)]
impl AccountTestSuite for AccountTestSuiteBase {
    fn app(&self) -> &App {
        &self.app
    }

    fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    fn owner(&self) -> &Addr {
        &self.owner
    }

    fn sub_account_code_id(&self) -> u64 {
        self.sub_account_code_id
    }
}
