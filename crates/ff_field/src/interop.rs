// crates/ff_field/src/interop.rs

//! ndarray 互操作
//!
//! 场以 ndarray 视图零拷贝暴露存储：
//!
//! - `Field<f64>` 为长度 `N` 的一维视图
//! - `Field<Vector>` 为 `N x 3`，`Field<Tensor>` 为 `N x 9`（分量按行主序），
//!   `Field<SymmTensor>` 为 `N x 6`（`xx xy xz yy yz zz`）
//!
//! 可变视图直接写入场。从数组导入总是复制，并先检查形状。
//!
//! ```
//! use ff_field::prelude::*;
//! use ndarray::array;
//!
//! let mut u = VectorField::from_array2(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].view())?;
//! assert_eq!(u.view().shape(), &[2, 3]);
//! u.view_mut()[[1, 2]] = 0.0;
//! assert_eq!(u[1], Vector::new(4.0, 5.0, 0.0));
//!
//! let wrong = VectorField::from_array2(array![[1.0, 2.0]].view());
//! assert!(matches!(wrong, Err(FieldError::ShapeMismatch { .. })));
//! # Ok::<(), FieldError>(())
//! ```

use ff_foundation::error::{FieldError, FieldResult};
use ndarray::{aview1, aview2, aview_mut1, aview_mut2, Array2, ArrayView1, ArrayView2};
use ndarray::{ArrayViewMut1, ArrayViewMut2};

use crate::field::Field;
use crate::primitives::{SymmTensor, Tensor, Vector};
use crate::value::FieldValue;

impl Field<f64> {
    /// 数值的一维视图
    pub fn view(&self) -> ArrayView1<'_, f64> {
        aview1(self.as_slice())
    }

    /// 可变一维视图；写入直达场
    pub fn view_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        aview_mut1(self.as_mut_slice())
    }

    /// 复制一维数组
    pub fn from_array(array: ArrayView1<'_, f64>) -> Self {
        array.iter().copied().collect()
    }
}

macro_rules! impl_component_views {
    ($($T:ty => $n:literal),* $(,)?) => {$(
        impl Field<$T> {
            /// 二维视图，每个元素一行
            pub fn view(&self) -> ArrayView2<'_, f64> {
                aview2(bytemuck::cast_slice::<$T, [f64; $n]>(self.as_slice()))
            }

            /// 可变二维视图；写入直达场
            pub fn view_mut(&mut self) -> ArrayViewMut2<'_, f64> {
                aview_mut2(bytemuck::cast_slice_mut::<$T, [f64; $n]>(self.as_mut_slice()))
            }
        }
    )*};
}

impl_component_views!(Vector => 3, Tensor => 9, SymmTensor => 6);

impl<T: FieldValue> Field<T> {
    /// 全部分量，逐元素排列
    pub fn as_components(&self) -> &[f64] {
        bytemuck::cast_slice(self.as_slice())
    }

    /// 可变的扁平分量
    pub fn as_components_mut(&mut self) -> &mut [f64] {
        bytemuck::cast_slice_mut(self.as_mut_slice())
    }

    /// 复制 `N x N_COMPONENTS` 数组
    pub fn from_array2(array: ArrayView2<'_, f64>) -> FieldResult<Self> {
        let (rows, cols) = array.dim();
        if cols != T::N_COMPONENTS {
            return Err(FieldError::shape_mismatch(
                T::TYPE_NAME,
                format!("(N, {})", T::N_COMPONENTS),
                format!("({rows}, {cols})"),
            ));
        }
        Ok(array
            .rows()
            .into_iter()
            .map(|row| T::from_fn(|d| row[d]))
            .collect())
    }

    /// 复制长度为 `N_COMPONENTS` 整数倍的扁平分量列表
    pub fn from_components(components: &[f64]) -> FieldResult<Self> {
        if components.len() % T::N_COMPONENTS != 0 {
            return Err(FieldError::shape_mismatch(
                T::TYPE_NAME,
                format!("a multiple of {} components", T::N_COMPONENTS),
                format!("{} components", components.len()),
            ));
        }
        Ok(components
            .chunks_exact(T::N_COMPONENTS)
            .map(|chunk| T::from_fn(|d| chunk[d]))
            .collect())
    }

    /// 复制嵌套行，每行 `N_COMPONENTS` 个值
    pub fn from_rows(rows: &[Vec<f64>]) -> FieldResult<Self> {
        rows.iter()
            .map(|row| {
                if row.len() != T::N_COMPONENTS {
                    return Err(FieldError::shape_mismatch(
                        T::TYPE_NAME,
                        format!("rows of {}", T::N_COMPONENTS),
                        format!("a row of {}", row.len()),
                    ));
                }
                Ok(T::from_fn(|d| row[d]))
            })
            .collect()
    }

    /// 有所有权的 `N x N_COMPONENTS` 副本
    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.len(), T::N_COMPONENTS), |(i, d)| {
            self[i].component(d)
        })
    }
}

macro_rules! impl_try_from_rows {
    ($($T:ty),*) => {$(
        impl TryFrom<Vec<Vec<f64>>> for Field<$T> {
            type Error = FieldError;

            fn try_from(rows: Vec<Vec<f64>>) -> FieldResult<Self> {
                Self::from_rows(&rows)
            }
        }
    )*};
}

impl_try_from_rows!(f64, Vector, Tensor, SymmTensor);

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_scalar_view_shares_storage() {
        let mut f = Field::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(f.view().as_ptr(), f.as_slice().as_ptr());
        f.view_mut()[1] = 20.0;
        assert_eq!(f[1], 20.0);
        assert_eq!(f.view().sum(), 24.0);
    }

    #[test]
    fn test_from_array_copies() {
        let a = array![1.0, 2.0];
        let f = Field::from_array(a.view());
        assert_eq!(f.as_slice(), &[1.0, 2.0]);
        assert_ne!(f.as_slice().as_ptr(), a.as_ptr());
    }

    #[test]
    fn test_component_views() {
        let t = Field::from(vec![Tensor::I, Tensor::I * 2.0]);
        let v = t.view();
        assert_eq!(v.shape(), &[2, 9]);
        assert_eq!(v[[1, 4]], 2.0);
        assert_eq!(v[[1, 1]], 0.0);

        let mut s = Field::uniform(1, SymmTensor::I);
        s.view_mut()[[0, 1]] = 0.5;
        assert_eq!(s[0], SymmTensor::new(1.0, 0.5, 0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_view_round_trip() {
        let u = Field::from(vec![Vector::new(1.0, 2.0, 3.0), Vector::new(4.0, 5.0, 6.0)]);
        let back = Field::<Vector>::from_array2(u.view()).unwrap();
        assert_eq!(back, u);
        assert_eq!(u.to_array2(), array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_shape_checks() {
        let err = Field::<Tensor>::from_array2(array![[1.0, 2.0, 3.0]].view()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "shape mismatch for tensor: expected (N, 9), got (1, 3)"
        );
        assert!(Field::<Vector>::from_components(&[1.0, 2.0, 3.0, 4.0]).is_err());
        let ok = Field::<Vector>::from_components(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(ok.as_components().len(), 6);

        let rows = Field::<Vector>::from_rows(&[vec![1.0, 2.0, 3.0], vec![1.0]]);
        assert!(matches!(rows, Err(FieldError::ShapeMismatch { .. })));
        let nested: Field<Vector> = vec![vec![0.0, 0.0, 1.0]].try_into().unwrap();
        assert_eq!(nested[0], Vector::Z);
    }
}
