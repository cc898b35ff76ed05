pub mod compactor;
pub mod config;
pub mod log;
pub mod pipeline;
pub mod schedule;
pub mod sheet;
pub mod supporters;
