//! Side-effecting helpers: durable storage, import/export files, config.

pub mod clock;
pub mod config;
pub mod init;
pub mod storage;
pub mod transfer;
