use cw_storage_plus::Item;

use crate::msg::RecordedCall;

pub const CALLS: Item<Vec<RecordedCall>> = Item::new("calls");
