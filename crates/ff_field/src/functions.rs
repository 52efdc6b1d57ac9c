// crates/ff_field/src/functions.rs

//! 归约与逐元素场函数
//!
//! - [`sum`] 使用补偿求和，长场中相近数值的低位不会丢失
//! - 空场的 [`average`] 为零并记录警告
//! - [`mag`] / [`mag_sqr`] 通过 [`Magnitude`] trait 作用于场、临时量、几何场与有量纲值

use ff_foundation::numerics::KahanSum;

use crate::dimensioned::Dimensioned;
use crate::field::Field;
use crate::geometric::{map_geometric, GeometricField, IntoGeometricOperand};
use crate::kernel::{self, IntoOperand};
use crate::ops::expect_ok;
use crate::tmp::Tmp;
use crate::value::FieldValue;

/// 全部元素的补偿求和
pub fn sum<T: FieldValue>(field: &Field<T>) -> T {
    KahanSum::sum_iter(field.iter().copied())
}

/// 算术平均；空场为零
pub fn average<T: FieldValue>(field: &Field<T>) -> T {
    if field.is_empty() {
        log::warn!("average of an empty {} field, returning zero", T::TYPE_NAME);
        return T::ZERO;
    }
    sum(field) / field.len() as f64
}

/// 最大值，空场为 `None`
pub fn max(field: &Field<f64>) -> Option<f64> {
    field.iter().copied().reduce(f64::max)
}

/// 最小值，空场为 `None`
pub fn min(field: &Field<f64>) -> Option<f64> {
    field.iter().copied().reduce(f64::min)
}

/// 逐元素模长
pub trait Magnitude {
    /// 结果类型，标量值
    type Output;

    /// 各元素的欧几里得 / Frobenius 范数
    fn mag(self) -> Self::Output;

    /// 各元素范数的平方
    fn mag_sqr(self) -> Self::Output;
}

/// `mag(x)`
pub fn mag<M: Magnitude>(value: M) -> M::Output {
    value.mag()
}

/// `magSqr(x)`
pub fn mag_sqr<M: Magnitude>(value: M) -> M::Output {
    value.mag_sqr()
}

fn mag_values<'a, T: FieldValue>(arg: impl IntoOperand<'a, T>, squared: bool) -> Vec<f64> {
    let arg = arg.into_operand();
    if squared {
        expect_ok(kernel::map("magSqr", arg, |v: T| v.mag_sqr()))
    } else {
        expect_ok(kernel::map("mag", arg, |v: T| v.mag()))
    }
}

impl<T: FieldValue> Magnitude for &Field<T> {
    type Output = Field<f64>;

    fn mag(self) -> Field<f64> {
        Field::from_vec(mag_values(self, false))
    }

    fn mag_sqr(self) -> Field<f64> {
        Field::from_vec(mag_values(self, true))
    }
}

impl<T: FieldValue> Magnitude for Field<T> {
    type Output = Tmp<Field<f64>>;

    fn mag(self) -> Tmp<Field<f64>> {
        Tmp::from_vec(mag_values(self, false))
    }

    fn mag_sqr(self) -> Tmp<Field<f64>> {
        Tmp::from_vec(mag_values(self, true))
    }
}

impl<T: FieldValue> Magnitude for Tmp<Field<T>> {
    type Output = Tmp<Field<f64>>;

    fn mag(self) -> Tmp<Field<f64>> {
        Tmp::from_vec(mag_values(self, false))
    }

    fn mag_sqr(self) -> Tmp<Field<f64>> {
        Tmp::from_vec(mag_values(self, true))
    }
}

fn mag_geometric<'a, T: FieldValue>(arg: impl IntoGeometricOperand<'a, T>, squared: bool) -> GeometricField<f64> {
    let arg = arg.into_geometric_operand();
    let dimensions = arg.dimensions();
    if squared {
        let name = format!("magSqr({})", arg.name());
        expect_ok(map_geometric("magSqr", arg, name, dimensions.pow(2.0), |p| {
            kernel::map("magSqr", p, |v: T| v.mag_sqr())
        }))
    } else {
        let name = format!("mag({})", arg.name());
        expect_ok(map_geometric("mag", arg, name, dimensions, |p| {
            kernel::map("mag", p, |v: T| v.mag())
        }))
    }
}

impl<T: FieldValue> Magnitude for &GeometricField<T> {
    type Output = GeometricField<f64>;

    fn mag(self) -> GeometricField<f64> {
        mag_geometric(self, false)
    }

    fn mag_sqr(self) -> GeometricField<f64> {
        mag_geometric(self, true)
    }
}

impl<T: FieldValue> Magnitude for GeometricField<T> {
    type Output = Tmp<GeometricField<f64>>;

    fn mag(self) -> Tmp<GeometricField<f64>> {
        Tmp::new(mag_geometric(self, false))
    }

    fn mag_sqr(self) -> Tmp<GeometricField<f64>> {
        Tmp::new(mag_geometric(self, true))
    }
}

impl<T: FieldValue> Magnitude for Tmp<GeometricField<T>> {
    type Output = Tmp<GeometricField<f64>>;

    fn mag(self) -> Tmp<GeometricField<f64>> {
        Tmp::new(mag_geometric(self, false))
    }

    fn mag_sqr(self) -> Tmp<GeometricField<f64>> {
        Tmp::new(mag_geometric(self, true))
    }
}

impl<T: FieldValue> Magnitude for &Dimensioned<T> {
    type Output = Dimensioned<f64>;

    fn mag(self) -> Dimensioned<f64> {
        Dimensioned::mag(self)
    }

    fn mag_sqr(self) -> Dimensioned<f64> {
        Dimensioned::new(
            format!("magSqr({})", self.name()),
            self.dimensions().pow(2.0),
            self.value().mag_sqr(),
        )
    }
}
