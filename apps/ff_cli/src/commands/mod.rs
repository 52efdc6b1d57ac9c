// apps/ff_cli/src/commands/mod.rs

//! 子命令

pub mod bench;
pub mod info;
pub mod validate;
