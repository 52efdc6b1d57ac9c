// crates/ff_config/src/lib.rs

//! foamfield 配置层
//!
//! 读取算例文件：命名有量纲常量与基准测试设置。
//!
//! # 模块概览
//!
//! - [`case_config`]: `CaseConfig` JSON 结构、加载与验证
//! - [`constants`]: 已解析有量纲常量的 `ConstantTable`
//! - [`error`]: 配置错误类型
//!
//! # 设计原则
//!
//! 1. **加载即验证**: `from_file` 返回的 `CaseConfig` 已经过检查
//! 2. **灵活的量纲写法**: 接受指数数组、方括号文本与 `dimXxx` 名称

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod case_config;
pub mod constants;
pub mod error;

pub use case_config::{BenchConfig, CaseConfig, ConstantEntry, ConstantValue, DimensionSpec};
pub use constants::ConstantTable;
pub use error::{ConfigError, ConfigResult};
