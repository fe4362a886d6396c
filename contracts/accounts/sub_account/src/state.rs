use cosmwasm_std::Addr;
use cw_storage_plus::Item;

/// Master identity, written once at instantiation
pub const MASTER: Item<Addr> = Item::new("master");

/// Native denom forwarded value is paid in
pub const DENOM: Item<String> = Item::new("denom");
