// crates/ff_field/src/expr.rs

//! 带检查的表达式求值
//!
//! [`crate::ops`] 中的运算符在操作数长度不一致时 panic。
//! 本模块的函数执行相同运算，但以 `FieldError` 返回失败，
//! 适用于由运行时输入构造表达式的代码。
//!
//! ```
//! use ff_field::prelude::*;
//! use ff_field::expr;
//!
//! let a = Field::from(vec![1.0, 2.0]);
//! let b = Field::from(vec![1.0, 2.0, 3.0]);
//! assert!(matches!(expr::add(&a, &b), Err(FieldError::LengthMismatch { .. })));
//!
//! let c = expr::mul(&a, 2.0)?;
//! assert!(!c.is_tmp());
//! let d = expr::add(c.into_field(), &a)?;
//! assert!(d.is_tmp());
//! # Ok::<(), FieldError>(())
//! ```

use std::ops::BitAnd;

use ff_foundation::error::FieldResult;

use crate::field::Field;
use crate::kernel::{self, IntoOperand, Operand};
use crate::tmp::Tmp;
use crate::value::FieldValue;

/// 带检查求值的结果
///
/// 有所有权操作数参与时为 `Tmp`，否则为 `Field`，与运算符规则一致。
#[derive(Debug)]
pub enum Evaluated<T> {
    /// 由借用操作数新分配
    Field(Field<T>),
    /// 写入有所有权操作数释放的存储
    Tmp(Tmp<Field<T>>),
}

impl<T: FieldValue> Evaluated<T> {
    fn from_parts(owned: bool, data: Vec<T>) -> Self {
        if owned {
            Evaluated::Tmp(Tmp::from_vec(data))
        } else {
            Evaluated::Field(Field::from_vec(data))
        }
    }

    /// 结果是否为临时量
    pub fn is_tmp(&self) -> bool {
        matches!(self, Evaluated::Tmp(_))
    }

    /// 求值得到的场，无论以何种方式产生
    pub fn into_field(self) -> Field<T> {
        match self {
            Evaluated::Field(f) => f,
            Evaluated::Tmp(t) => t.into_inner(),
        }
    }

    /// 只读访问数值
    pub fn as_slice(&self) -> &[T] {
        match self {
            Evaluated::Field(f) => f.as_slice(),
            Evaluated::Tmp(t) => t.as_slice(),
        }
    }
}

impl<T: FieldValue> From<Evaluated<T>> for Field<T> {
    fn from(value: Evaluated<T>) -> Self {
        value.into_field()
    }
}

fn owned_any<A, B>(lhs: &Operand<'_, A>, rhs: &Operand<'_, B>) -> bool {
    lhs.is_owned() || rhs.is_owned()
}

/// `lhs + rhs`
pub fn add<'a, T: FieldValue>(
    lhs: impl IntoOperand<'a, T>,
    rhs: impl IntoOperand<'a, T>,
) -> FieldResult<Evaluated<T>> {
    let (lhs, rhs) = (lhs.into_operand(), rhs.into_operand());
    let owned = owned_any(&lhs, &rhs);
    let data = kernel::zip_same("+", lhs, rhs, |a, b| a + b)?;
    Ok(Evaluated::from_parts(owned, data))
}

/// `lhs - rhs`
pub fn sub<'a, T: FieldValue>(
    lhs: impl IntoOperand<'a, T>,
    rhs: impl IntoOperand<'a, T>,
) -> FieldResult<Evaluated<T>> {
    let (lhs, rhs) = (lhs.into_operand(), rhs.into_operand());
    let owned = owned_any(&lhs, &rhs);
    let data = kernel::zip_same("-", lhs, rhs, |a, b| a - b)?;
    Ok(Evaluated::from_parts(owned, data))
}

/// `lhs * factor`，因子为标量类型
pub fn mul<'a, T: FieldValue>(
    lhs: impl IntoOperand<'a, T>,
    factor: impl IntoOperand<'a, f64>,
) -> FieldResult<Evaluated<T>> {
    let (lhs, rhs) = (lhs.into_operand(), factor.into_operand());
    let owned = owned_any(&lhs, &rhs);
    let data = kernel::zip_scale("*", lhs, rhs, |v, s| v * s)?;
    Ok(Evaluated::from_parts(owned, data))
}

/// `lhs / divisor`，除数为标量类型
pub fn div<'a, T: FieldValue>(
    lhs: impl IntoOperand<'a, T>,
    divisor: impl IntoOperand<'a, f64>,
) -> FieldResult<Evaluated<T>> {
    let (lhs, rhs) = (lhs.into_operand(), divisor.into_operand());
    let owned = owned_any(&lhs, &rhs);
    let data = kernel::zip_scale("/", lhs, rhs, |v, s| v / s)?;
    Ok(Evaluated::from_parts(owned, data))
}

/// 标量操作数的 `dividend / divisor`，任一方可为均匀值
pub fn div_scalar<'a>(
    dividend: impl IntoOperand<'a, f64>,
    divisor: impl IntoOperand<'a, f64>,
) -> FieldResult<Evaluated<f64>> {
    let (lhs, rhs) = (dividend.into_operand(), divisor.into_operand());
    let owned = owned_any(&lhs, &rhs);
    let data = kernel::zip_same("/", lhs, rhs, |a, b| a / b)?;
    Ok(Evaluated::from_parts(owned, data))
}

/// `lhs & rhs`；结果类型通常不同，总是新分配
pub fn inner<'a, A, B>(
    lhs: impl IntoOperand<'a, A>,
    rhs: impl IntoOperand<'a, B>,
) -> FieldResult<Field<<A as BitAnd<B>>::Output>>
where
    A: FieldValue + BitAnd<B>,
    B: FieldValue,
    <A as BitAnd<B>>::Output: FieldValue,
{
    kernel::zip_map("&", lhs.into_operand(), rhs.into_operand(), |a, b| a & b).map(Field::from_vec)
}

/// `-arg`
pub fn neg<'a, T: FieldValue>(arg: impl IntoOperand<'a, T>) -> FieldResult<Evaluated<T>> {
    let arg = arg.into_operand();
    let owned = arg.is_owned();
    let data = kernel::map("neg", arg, |v: T| -v)?;
    Ok(Evaluated::from_parts(owned, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Vector;
    use ff_foundation::error::FieldError;

    #[test]
    fn test_checked_length_mismatch() {
        let a = Field::from(vec![1.0, 2.0, 3.0]);
        let b = Field::from(vec![1.0, 2.0]);
        assert_eq!(
            add(&a, &b).unwrap_err(),
            FieldError::length_mismatch("+", 3, 2)
        );
        assert!(mul(&a, &b).is_err());
        assert!(inner(&Field::uniform(2, Vector::X), &Field::uniform(3, Vector::Y)).is_err());
    }

    #[test]
    fn test_two_uniforms_rejected() {
        let err = add(1.0_f64, 2.0_f64).unwrap_err();
        assert!(matches!(err, FieldError::InvalidOperation { .. }));
        assert!(neg(3.0_f64).is_err());
    }

    #[test]
    fn test_ownership_of_result() {
        let a = Field::from(vec![1.0, 2.0]);
        let fresh = sub(&a, 1.0).unwrap();
        assert!(!fresh.is_tmp());
        assert_eq!(fresh.as_slice(), &[0.0, 1.0]);

        let reused = div(fresh.into_field(), 2.0).unwrap();
        assert!(reused.is_tmp());
        assert_eq!(reused.as_slice(), &[0.0, 0.5]);

        let recip = div_scalar(1.0, &a).unwrap();
        assert_eq!(recip.as_slice(), &[1.0, 0.5]);
    }

    #[test]
    fn test_inner_and_neg() {
        let u = Field::from(vec![Vector::new(3.0, 4.0, 0.0)]);
        let d = inner(&u, &u).unwrap();
        assert_eq!(d.as_slice(), &[25.0]);
        let n = neg(&u).unwrap().into_field();
        assert_eq!(n[0], Vector::new(-3.0, -4.0, 0.0));
    }
}
