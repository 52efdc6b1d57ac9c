// crates/ff_field/src/field.rs

//! Field - 单一元素类型的独占稠密存储
//!
//! `Field<T>` 独占一个 `Vec<T>`。长度在构造时确定，
//! 仅能通过 [`Field::assign`] 改变。
//!
//! 算术运算见 [`crate::ops`]；数组视图见 [`crate::interop`]。
//!
//! # 示例
//!
//! ```
//! use ff_field::prelude::*;
//!
//! let mut f = Field::uniform(4, 1.0);
//! f[0] = 2.0;
//! f.set_slice(1..3, &[5.0, 6.0]).unwrap();
//! assert_eq!(f.as_slice(), &[2.0, 5.0, 6.0, 1.0]);
//! ```

use std::fmt;
use std::ops::{Index, IndexMut, Range};
use std::slice::SliceIndex;

use ff_foundation::error::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// `T` 的稠密场
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field<T> {
    data: Vec<T>,
}

impl<T: FieldValue> Field<T> {
    /// 空场
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// `len` 个 `value` 的副本
    pub fn uniform(len: usize, value: T) -> Self {
        Self {
            data: vec![value; len],
        }
    }

    /// `len` 个零
    pub fn zeros(len: usize) -> Self {
        Self::uniform(len, T::ZERO)
    }

    /// 接管已有存储
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// 复制切片
    pub fn from_slice(values: &[T]) -> Self {
        Self {
            data: values.to_vec(),
        }
    }

    /// 元素数量
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 场是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 只读存储
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// 可变存储；无法借此改变长度
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// 元素迭代器
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// 元素可变迭代器
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// 第 `index` 个元素，越界时为 `None`
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        self.data.get(index).copied()
    }

    /// 第 `index` 个元素，越界时为 `IndexOutOfBounds`
    pub fn try_get(&self, index: usize) -> FieldResult<T> {
        self.get(index)
            .ok_or_else(|| FieldError::index_out_of_bounds(index, self.len()))
    }

    /// 写入第 `index` 个元素
    pub fn set(&mut self, index: usize, value: T) -> FieldResult<()> {
        FieldError::check_index(index, self.len())?;
        self.data[index] = value;
        Ok(())
    }

    /// 带检查的可变子区间
    pub fn slice_mut(&mut self, range: Range<usize>) -> FieldResult<&mut [T]> {
        let len = self.len();
        if range.start > range.end {
            return Err(FieldError::index_out_of_bounds(range.start, range.end));
        }
        if range.end > len {
            return Err(FieldError::index_out_of_bounds(range.end, len));
        }
        Ok(&mut self.data[range])
    }

    /// 以 `values` 覆盖 `range`；两者长度必须一致
    pub fn set_slice(&mut self, range: Range<usize>, values: &[T]) -> FieldResult<()> {
        let target = self.slice_mut(range)?;
        FieldError::check_length("set_slice", target.len(), values.len())?;
        target.copy_from_slice(values);
        Ok(())
    }

    /// 将所有元素设为 `value`
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// 将 `other` 复制到 `self`，并采用其长度
    pub fn assign(&mut self, other: &Field<T>) {
        self.data.clone_from(&other.data);
    }

    /// 释放存储
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// 各元素的第 `d` 分量组成的标量场
    pub fn component(&self, d: usize) -> FieldResult<Field<f64>> {
        FieldError::check_index(d, T::N_COMPONENTS)?;
        Ok(self.data.iter().map(|v| v.component(d)).collect())
    }

    /// 覆盖各元素的第 `d` 分量
    pub fn replace_component(&mut self, d: usize, values: &Field<f64>) -> FieldResult<()> {
        FieldError::check_index(d, T::N_COMPONENTS)?;
        FieldError::check_length("replace_component", self.len(), values.len())?;
        for (v, c) in self.data.iter_mut().zip(values.iter()) {
            v.components_mut()[d] = *c;
        }
        Ok(())
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for Field<T> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        &self.data[index]
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for Field<T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<T: FieldValue> From<Vec<T>> for Field<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: FieldValue> From<&[T]> for Field<T> {
    fn from(values: &[T]) -> Self {
        Self::from_slice(values)
    }
}

impl<T: FieldValue, const N: usize> From<[T; N]> for Field<T> {
    fn from(values: [T; N]) -> Self {
        Self::from_vec(values.to_vec())
    }
}

impl<T: FieldValue> FromIterator<T> for Field<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Field<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Field<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T> AsRef<[T]> for Field<T> {
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

/// `N(v0 v1 ...)`，算例文件的列表记法
impl<T: FieldValue> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.len())?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}

/// 标量场
pub type ScalarField = Field<f64>;
/// 矢量场
pub type VectorField = Field<crate::primitives::Vector>;
/// 张量场
pub type TensorField = Field<crate::primitives::Tensor>;
/// 对称张量场
pub type SymmTensorField = Field<crate::primitives::SymmTensor>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Vector;

    #[test]
    fn test_construction() {
        let f = Field::uniform(5, 1.5);
        assert_eq!(f.len(), 5);
        assert!(f.iter().all(|&v| v == 1.5));

        let z: VectorField = Field::zeros(3);
        assert_eq!(z[2], Vector::ZERO);

        let from_vec = Field::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(from_vec.as_slice(), &[1.0, 2.0, 3.0]);

        let collected: ScalarField = (0..4).map(f64::from).collect();
        assert_eq!(collected.as_slice(), &[0.0, 1.0, 2.0, 3.0]);

        assert!(ScalarField::new().is_empty());
    }

    #[test]
    fn test_indexing_and_set() {
        let mut f = Field::from([1.0, 2.0, 3.0]);
        f[1] = 20.0;
        assert_eq!(f[1], 20.0);
        assert_eq!(&f[0..2], &[1.0, 20.0]);

        f.set(2, 30.0).unwrap();
        assert_eq!(f.get(2), Some(30.0));
        assert_eq!(f.get(3), None);
        assert!(matches!(
            f.set(3, 0.0),
            Err(FieldError::IndexOutOfBounds { index: 3, len: 3 })
        ));
        assert!(f.try_get(9).is_err());
    }

    #[test]
    fn test_slicing() {
        let mut f = Field::zeros(5);
        f.set_slice(1..4, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(f.as_slice(), &[0.0, 1.0, 2.0, 3.0, 0.0]);

        f[3..5].copy_from_slice(&[7.0, 8.0]);
        assert_eq!(f.as_slice(), &[0.0, 1.0, 2.0, 7.0, 8.0]);

        assert!(matches!(
            f.set_slice(0..2, &[1.0]),
            Err(FieldError::LengthMismatch { .. })
        ));
        assert!(f.slice_mut(3..6).is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = f.slice_mut(3..1);
        assert!(reversed.is_err());
    }

    #[test]
    fn test_assign_adopts_length() {
        let mut f = Field::zeros(2);
        let g = Field::uniform(4, 9.0);
        f.assign(&g);
        assert_eq!(f, g);
        assert_eq!(f.len(), 4);
    }

    #[test]
    fn test_components() {
        let mut f = Field::from(vec![Vector::new(1.0, 2.0, 3.0), Vector::new(4.0, 5.0, 6.0)]);
        let y = f.component(1).unwrap();
        assert_eq!(y.as_slice(), &[2.0, 5.0]);
        assert!(f.component(3).is_err());

        f.replace_component(2, &Field::from(vec![0.0, -1.0])).unwrap();
        assert_eq!(f[1], Vector::new(4.0, 5.0, -1.0));
        assert!(f.replace_component(0, &Field::zeros(3)).is_err());
    }

    #[test]
    fn test_display() {
        let f = Field::from(vec![1.0, 2.5]);
        assert_eq!(f.to_string(), "2(1 2.5)");
        let v = Field::from(vec![Vector::new(0.0, 0.0, 1.0)]);
        assert_eq!(v.to_string(), "1((0 0 1))");
    }
}
