// crates/ff_foundation/src/numerics/mod.rs

//! 场层共用的数值辅助工具

pub mod kahan_sum;

pub use kahan_sum::KahanSum;
