// crates/ff_foundation/src/lib.rs

//! foamfield 基础层
//!
//! 工作区内所有其他 crate 共享的轻依赖基础层。
//!
//! # 模块概览
//!
//! - [`error`]: 统一的 `FieldError` / `FieldResult`
//! - [`dimension`]: 七指数 `DimensionSet` 代数与命名常量
//! - [`numerics`]: 补偿求和
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 serde 与 thiserror
//! 2. **值而非类型**: 量纲是运行时值，可从配置读取
//!
//! # 示例
//!
//! ```
//! use ff_foundation::prelude::*;
//!
//! let force = dims::PRESSURE * dims::AREA;
//! assert_eq!(force, dims::FORCE);
//! assert!(dims::PRESSURE.matching(&dims::VELOCITY, "+").is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dimension;
pub mod error;
pub mod numerics;

pub use dimension::{dims, BaseDimension, DimensionSet};
pub use error::{FieldError, FieldResult};
pub use numerics::KahanSum;

/// 常用导出
pub mod prelude {
    pub use crate::dimension::{dims, BaseDimension, DimensionSet};
    pub use crate::ensure;
    pub use crate::error::{FieldError, FieldResult};
    pub use crate::numerics::KahanSum;
}
