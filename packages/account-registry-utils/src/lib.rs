pub mod adapter;
pub mod msg;

pub use msg::*;
