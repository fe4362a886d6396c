use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

pub const FACTORY: Item<Addr> = Item::new("factory");

/// Sub-accounts created through the router, in creation order
pub const ACCOUNTS: Map<&Addr, Vec<Addr>> = Map::new("accounts");
