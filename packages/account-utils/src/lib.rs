pub mod error;
pub mod msg;
pub mod payload;

#[cfg(feature = "testing")]
pub mod testing;
