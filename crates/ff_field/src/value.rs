// crates/ff_field/src/value.rs

//! FieldValue - 密封的元素类型抽象
//!
//! 只有 `f64`、[`Vector`]、[`Tensor`] 与 [`SymmTensor`] 可存入 [`crate::Field`]。
//!
//! # 设计原则
//!
//! 1. **密封 trait**: 仅在本 crate 内实现（`private::Sealed`）
//! 2. **纯数据**: 每个元素均为 `Pod` 且由 `f64` 分量构成，
//!    存储可零拷贝地视为 `&[f64]`
//! 3. **线性空间**: 要求支持 `+`、`-`、取负与 `f64` 缩放

use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bytemuck::Pod;

use crate::primitives::{SymmTensor, Tensor, Vector};

/// 标量元素类型
pub type Scalar = f64;

mod private {
    pub trait Sealed {}
    impl Sealed for f64 {}
    impl Sealed for super::Vector {}
    impl Sealed for super::Tensor {}
    impl Sealed for super::SymmTensor {}
}

/// 场的元素类型（密封）
pub trait FieldValue:
    private::Sealed
    + Pod
    + Default
    + Debug
    + Display
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign<f64>
    + DivAssign<f64>
{
    /// `f64` 分量个数
    const N_COMPONENTS: usize;

    /// 惯用类型名（`scalar`、`vector`、`tensor`、`symmTensor`）
    const TYPE_NAME: &'static str;

    /// 加法单位元
    const ZERO: Self;

    /// 模长的平方
    fn mag_sqr(&self) -> f64;

    /// 模长
    #[inline]
    fn mag(&self) -> f64 {
        self.mag_sqr().sqrt()
    }

    /// 长度为 `N_COMPONENTS` 的分量切片
    #[inline]
    fn components(&self) -> &[f64] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }

    /// 可变分量
    #[inline]
    fn components_mut(&mut self) -> &mut [f64] {
        bytemuck::cast_slice_mut(std::slice::from_mut(self))
    }

    /// 第 `d` 分量；`d >= N_COMPONENTS` 时 panic
    #[inline]
    fn component(&self, d: usize) -> f64 {
        self.components()[d]
    }

    /// 逐分量构造值
    #[inline]
    fn from_fn<F: FnMut(usize) -> f64>(mut f: F) -> Self {
        let mut value = Self::ZERO;
        for (d, c) in value.components_mut().iter_mut().enumerate() {
            *c = f(d);
        }
        value
    }
}

impl FieldValue for f64 {
    const N_COMPONENTS: usize = 1;
    const TYPE_NAME: &'static str = "scalar";
    const ZERO: Self = 0.0;

    #[inline]
    fn mag_sqr(&self) -> f64 {
        self * self
    }

    #[inline]
    fn mag(&self) -> f64 {
        self.abs()
    }
}

impl FieldValue for Vector {
    const N_COMPONENTS: usize = 3;
    const TYPE_NAME: &'static str = "vector";
    const ZERO: Self = Vector::ZERO;

    #[inline]
    fn mag_sqr(&self) -> f64 {
        Vector::mag_sqr(self)
    }
}

impl FieldValue for Tensor {
    const N_COMPONENTS: usize = 9;
    const TYPE_NAME: &'static str = "tensor";
    const ZERO: Self = Tensor::ZERO;

    #[inline]
    fn mag_sqr(&self) -> f64 {
        Tensor::mag_sqr(self)
    }
}

impl FieldValue for SymmTensor {
    const N_COMPONENTS: usize = 6;
    const TYPE_NAME: &'static str = "symmTensor";
    const ZERO: Self = SymmTensor::ZERO;

    #[inline]
    fn mag_sqr(&self) -> f64 {
        SymmTensor::mag_sqr(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component_count<T: FieldValue>() -> usize {
        T::ZERO.components().len()
    }

    #[test]
    fn test_component_counts_match_layout() {
        assert_eq!(component_count::<f64>(), f64::N_COMPONENTS);
        assert_eq!(component_count::<Vector>(), Vector::N_COMPONENTS);
        assert_eq!(component_count::<Tensor>(), Tensor::N_COMPONENTS);
        assert_eq!(component_count::<SymmTensor>(), SymmTensor::N_COMPONENTS);
    }

    #[test]
    fn test_from_fn() {
        let v = Vector::from_fn(|d| d as f64 + 1.0);
        assert_eq!(v, Vector::new(1.0, 2.0, 3.0));
        assert_eq!(v.component(2), 3.0);
        let s = f64::from_fn(|_| 7.0);
        assert_eq!(s, 7.0);
    }

    #[test]
    fn test_mag() {
        assert_eq!(FieldValue::mag(&-2.5_f64), 2.5);
        assert_eq!(FieldValue::mag(&Vector::new(0.0, 3.0, 4.0)), 5.0);
        assert_eq!(FieldValue::mag(&Tensor([1.0; 9])), 3.0);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(f64::TYPE_NAME, "scalar");
        assert_eq!(SymmTensor::TYPE_NAME, "symmTensor");
    }
}
