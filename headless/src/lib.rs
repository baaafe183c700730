pub mod config;
pub mod init;
pub mod wake;
pub mod weather;
