pub mod config;
pub mod export;
pub mod init;
pub mod log;
pub mod schedule;
pub mod supporters;
