pub mod analyzer;
pub mod config;
pub mod model;
pub mod seed;
pub mod server;
pub mod source;
pub mod storage;
pub mod utils;
