pub mod blink;
pub mod config;
pub mod cors;
pub mod error;
pub mod logging;
pub mod routes;
pub mod startup;
pub mod state;
pub mod storage;
