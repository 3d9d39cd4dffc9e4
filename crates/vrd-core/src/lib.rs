pub mod call;
pub mod client;
pub mod config;
pub mod download;
pub mod export;
pub mod logging;
