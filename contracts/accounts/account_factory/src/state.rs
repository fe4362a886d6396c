// Purpose: State definitions for the account factory contract
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

use crate::msg::Config;

pub const CONFIG: Item<Config> = Item::new("config");

/// Sub-accounts deployed so far per deployer, which is also the last used sequence number
pub const NONCES: Map<&Addr, u64> = Map::new("nonces");
