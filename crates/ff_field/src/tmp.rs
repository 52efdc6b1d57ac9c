// crates/ff_field/src/tmp.rs

//! Tmp - 只可移动的临时结果
//!
//! 接收有所有权操作数的算术运算符均以 `Tmp` 包装结果返回。
//! 该包装告知下一个运算符：此存储没有其他所有者，可原地覆盖。
//!
//! # 所有权
//!
//! - `Tmp` 只由本 crate 的运算符创建
//! - 既非 `Clone` 也非 `Copy`：传入运算符或调用 [`Tmp::into_inner`] 会移动它，
//!   因此无法使用两次
//! - 只读访问通过 `Deref`
//!
//! ```
//! use ff_field::prelude::*;
//!
//! let a = Field::uniform(3, 1.0);
//! let b = Field::uniform(3, 2.0);
//! let t: Tmp<ScalarField> = &a * 2.0 + &b; // `&a * 2.0` is fresh, `+` reuses the left side as a Tmp
//! assert_eq!(t.len(), 3);
//! let f: ScalarField = t.into_inner();
//! assert_eq!(f[0], 4.0);
//! ```
//!
//! `Tmp` 被消费后再次使用会被编译器拒绝：
//!
//! ```compile_fail
//! use ff_field::prelude::*;
//!
//! let a = Field::uniform(3, 1.0);
//! let t = Field::uniform(3, 1.0) + &a;
//! let first = t.into_inner();
//! let second = t.into_inner();
//! ```

use std::fmt;
use std::ops::Deref;

use crate::field::Field;
use crate::value::FieldValue;

/// 持有新计算容器的临时结果
#[must_use = "a Tmp holds the result of an operation"]
pub struct Tmp<C> {
    inner: C,
}

impl<C> Tmp<C> {
    #[inline]
    pub(crate) fn new(inner: C) -> Self {
        Self { inner }
    }

    /// 取出结果并消费临时量
    #[inline]
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C> Deref for Tmp<C> {
    type Target = C;

    #[inline]
    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: fmt::Debug> fmt::Debug for Tmp<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tmp").field(&self.inner).finish()
    }
}

impl<C: fmt::Display> fmt::Display for Tmp<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T: FieldValue> Tmp<Field<T>> {
    #[inline]
    pub(crate) fn from_vec(data: Vec<T>) -> Self {
        Self::new(Field::from_vec(data))
    }

    /// 释放存储
    #[inline]
    pub(crate) fn into_vec(self) -> Vec<T> {
        self.inner.into_vec()
    }
}

impl<T: FieldValue> From<Tmp<Field<T>>> for Field<T> {
    #[inline]
    fn from(tmp: Tmp<Field<T>>) -> Self {
        tmp.into_inner()
    }
}

impl<C: PartialEq> PartialEq<C> for Tmp<C> {
    fn eq(&self, other: &C) -> bool {
        self.inner == *other
    }
}

/// 临时标量场
pub type TmpField<T> = Tmp<Field<T>>;
