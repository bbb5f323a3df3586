pub mod config;
pub mod time;

#[cfg(feature = "firmware")]
pub mod bluetooth;
