use cosmwasm_std::{Addr, Binary};
use cw_storage_plus::{Item, Map};
use valence_account_registry_utils::ExecutionContext;

use crate::batch::ActiveBatch;

pub const FACTORY: Item<Addr> = Item::new("factory");

/// Global account id -> owner, written once on registration
pub const ACCOUNT_OWNER: Map<u64, Addr> = Map::new("account_owner");
pub const OWNER_ACCOUNT_COUNT: Map<&Addr, u64> = Map::new("owner_account_count");
/// (owner, local index) -> global account id, local indexes start at 1
pub const OWNER_INDEX: Map<(&Addr, u64), u64> = Map::new("owner_index");

pub const ADAPTER_WHITELIST: Map<&Addr, bool> = Map::new("adapter_whitelist");

/// Present for the whole lifetime of a batch
pub const ACTIVE_BATCH: Item<ActiveBatch> = Item::new("active_batch");
/// Present only while a step runs
pub const CONTEXT: Item<ExecutionContext> = Item::new("context");
/// Outputs of the calls forwarded by the adapter of the running step
pub const FORWARD_OUTPUTS: Item<Vec<Binary>> = Item::new("forward_outputs");
