pub mod config;
pub mod logging;

pub mod assets;
pub mod checksum;
pub mod fetch;
pub mod http;
pub mod loader;
pub mod release;
pub mod storage;
