// crates/ff_foundation/src/error.rs

//! 场算术的统一错误类型
//!
//! 提供基础层之上各层共用的 `FieldError` 枚举与 `FieldResult` 别名。
//!
//! # 设计原则
//!
//! 1. **写入前报错**: 所有检查都在触碰输出存储之前完成，
//!    失败的运算不会改动其操作数
//! 2. **便捷构造函数**: 每个变体一个构造函数
//! 3. **检查辅助函数**: `check_length` / `check_index` 返回 `FieldResult<()>`
//!
//! # 示例
//!
//! ```
//! use ff_foundation::error::{FieldError, FieldResult};
//!
//! fn combine(a: &[f64], b: &[f64]) -> FieldResult<()> {
//!     FieldError::check_length("+", a.len(), b.len())?;
//!     Ok(())
//! }
//!
//! assert!(combine(&[1.0], &[1.0, 2.0]).is_err());
//! ```

use crate::dimension::DimensionSet;
use thiserror::Error;

/// 工作区通用的结果别名
pub type FieldResult<T> = Result<T, FieldError>;

/// 场构造、算术与寻址产生的错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    // ========================================================================
    // 算术
    // ========================================================================
    /// 逐元素运算的操作数长度不一致
    #[error("length mismatch in '{operation}': {lhs} vs {rhs}")]
    LengthMismatch {
        /// 检测到不一致的运算符或方法
        operation: &'static str,
        /// 左操作数长度
        lhs: usize,
        /// 右操作数长度
        rhs: usize,
    },

    /// `+`、`-` 或赋值的有量纲操作数量纲集不同
    #[error("dimension mismatch in '{operation}': {lhs} vs {rhs}")]
    DimensionMismatch {
        /// 检测到不一致的运算符或方法
        operation: &'static str,
        /// 左操作数量纲
        lhs: DimensionSet,
        /// 右操作数量纲
        rhs: DimensionSet,
    },

    /// 需要至少一个场的位置组合了两个均匀值
    #[error("invalid operation '{operation}': {message}")]
    InvalidOperation {
        /// 运算符或方法名
        operation: &'static str,
        /// 说明
        message: String,
    },

    // ========================================================================
    // 构造与寻址
    // ========================================================================
    /// 导入数据的维数或内层维度错误
    #[error("shape mismatch for {target}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// 正在构造的场类型
        target: &'static str,
        /// 期望形状
        expected: String,
        /// 实际形状
        actual: String,
    },

    /// 带检查的元素访问越界
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// 请求的索引
        index: usize,
        /// 容器长度
        len: usize,
    },

    /// 几何场上按名称查找子场失败
    #[error("patch '{patch}' not found in field '{field}'")]
    PatchNotFound {
        /// 几何场名称
        field: String,
        /// 请求的面片名称
        patch: String,
    },

    /// 两个几何场的边界布局不同
    #[error("boundary layout mismatch in '{operation}': {message}")]
    PatchMismatch {
        /// 运算符或方法名
        operation: &'static str,
        /// 哪个面片不同及差异
        message: String,
    },

    /// 量纲或数值的文本输入格式错误
    #[error("cannot parse {what} from '{input}': {reason}")]
    Parse {
        /// 被解析值的种类
        what: &'static str,
        /// 出错的输入
        input: String,
        /// 原因
        reason: String,
    },
}

// ========================================================================
// 便捷构造函数
// ========================================================================

impl FieldError {
    /// 两个操作数长度不一致
    pub fn length_mismatch(operation: &'static str, lhs: usize, rhs: usize) -> Self {
        Self::LengthMismatch {
            operation,
            lhs,
            rhs,
        }
    }

    /// 两个操作数量纲不一致
    pub fn dimension_mismatch(operation: &'static str, lhs: DimensionSet, rhs: DimensionSet) -> Self {
        Self::DimensionMismatch {
            operation,
            lhs,
            rhs,
        }
    }

    /// 对给定操作数种类未定义的运算
    pub fn invalid_operation(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            operation,
            message: message.into(),
        }
    }

    /// 导入时形状不匹配
    pub fn shape_mismatch(
        target: &'static str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ShapeMismatch {
            target,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// 未知面片名称
    pub fn patch_not_found(field: impl Into<String>, patch: impl Into<String>) -> Self {
        Self::PatchNotFound {
            field: field.into(),
            patch: patch.into(),
        }
    }

    /// 边界布局不同
    pub fn patch_mismatch(operation: &'static str, message: impl Into<String>) -> Self {
        Self::PatchMismatch {
            operation,
            message: message.into(),
        }
    }

    /// 解析失败
    pub fn parse(what: &'static str, input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            what,
            input: input.into(),
            reason: reason.into(),
        }
    }
}

// ========================================================================
// 检查辅助函数
// ========================================================================

impl FieldError {
    /// 长度不一致时返回 `LengthMismatch`
    #[inline]
    pub fn check_length(operation: &'static str, lhs: usize, rhs: usize) -> FieldResult<()> {
        if lhs != rhs {
            Err(Self::length_mismatch(operation, lhs, rhs))
        } else {
            Ok(())
        }
    }

    /// 量纲集不同时返回 `DimensionMismatch`
    #[inline]
    pub fn check_dimensions(
        operation: &'static str,
        lhs: &DimensionSet,
        rhs: &DimensionSet,
    ) -> FieldResult<()> {
        if lhs != rhs {
            Err(Self::dimension_mismatch(operation, *lhs, *rhs))
        } else {
            Ok(())
        }
    }

    /// `index >= len` 时返回 `IndexOutOfBounds`
    #[inline]
    pub fn check_index(index: usize, len: usize) -> FieldResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index, len))
        } else {
            Ok(())
        }
    }

    /// 是否为算术产生的两种不一致变体
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. } | Self::DimensionMismatch { .. }
        )
    }
}

/// 条件不成立时以给定错误提前返回
///
/// ```
/// use ff_foundation::{ensure, error::{FieldError, FieldResult}};
///
/// fn positive(n: usize) -> FieldResult<usize> {
///     ensure!(n > 0, FieldError::invalid_operation("positive", "zero length"));
///     Ok(n)
/// }
/// assert!(positive(0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

// ========================================================================
// 测试
// ========================================================================
