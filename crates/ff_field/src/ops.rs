// crates/ff_field/src/ops.rs

//! 场的算术运算符
//!
//! # 结果所有权
//!
//! - 两个操作数均为借用（`&Field`、数值、`&Dimensioned`）-> `Field`
//! - 任一操作数有所有权（按值 `Field`、`Tmp<Field>`）-> `Tmp<Field>`，
//!   元素类型允许时写入该自有存储
//!
//! ```
//! use ff_field::prelude::*;
//!
//! let a = Field::uniform(3, 1.0);
//! let b = Field::uniform(3, 2.0);
//! let fresh: ScalarField = &a + &b;
//! let tmp: Tmp<ScalarField> = (&a * 2.0) + (&b * 3.0);
//! assert_eq!(fresh[0], 3.0);
//! assert_eq!(tmp[0], 8.0);
//! ```
//!
//! # 支持的组合
//!
//! | 运算符   | lhs                | rhs                                  |
//! |----------|--------------------|--------------------------------------|
//! | `+ -`    | `T` 的场           | `T` 的场、`T`                        |
//! | `+ -`    | `T`                | `T` 的场                             |
//! | `* /`    | `T` 的场           | 标量场、`f64`、`&DimensionedScalar`  |
//! | `*`      | `f64`、`&DimensionedScalar` | `T` 的场                    |
//! | `*`      | 标量场             | 矢量 / 张量 / 对称张量场             |
//! | `/`      | `f64`              | 标量场                               |
//! | `&`      | `A` 的场           | `B` 的场、`B`（需 `A & B`）          |
//! | `&`      | `A`                | `B` 的场                             |
//! | 一元 `-` | `T` 的场           |                                      |
//!
//! “场”指 `&Field<T>`、`Field<T>` 或 `Tmp<Field<T>>`。
//!
//! 长度不一致时运算符 panic，与切片越界一致。
//! [`crate::expr`] 中的函数对相同组合求值并返回 `FieldResult`。

use std::ops::{
    Add, AddAssign, BitAnd, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
};

use ff_foundation::error::{FieldError, FieldResult};

use crate::dimensioned::Dimensioned;
use crate::field::Field;
use crate::kernel::{self, IntoOperand};
use crate::primitives::{SymmTensor, Tensor, Vector};
use crate::tmp::Tmp;
use crate::value::FieldValue;

/// 在无法返回 Result 的运算符内解包带检查的结果
#[track_caller]
pub(crate) fn expect_ok<V>(result: FieldResult<V>) -> V {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}

/// 单个运算符实现：将两个参数转为操作数并执行 `$body`
macro_rules! binary_op {
    (
        [$($g:tt)*] $Trait:ident::$method:ident for $Lhs:ty, $Rhs:ty => $Out:ty
        $(where [$($w:tt)*])?,
        |$l:ident, $r:ident| $body:expr
    ) => {
        impl<$($g)*> $Trait<$Rhs> for $Lhs $(where $($w)*)? {
            type Output = $Out;

            #[track_caller]
            fn $method(self, rhs: $Rhs) -> $Out {
                let $l = IntoOperand::into_operand(self);
                let $r = IntoOperand::into_operand(rhs);
                <$Out>::from_vec(expect_ok($body))
            }
        }
    };
}

// ============================================================================
// 同一元素类型操作数之间的 + 与 -
// ============================================================================

macro_rules! additive {
    ($Trait:ident::$method:ident, $sym:literal, $op:tt) => {
        additive!(@ $Trait::$method, $sym, $op;
            (&Field<T>, &Field<T>) => Field<T>,
            (&Field<T>, Field<T>) => Tmp<Field<T>>,
            (&Field<T>, Tmp<Field<T>>) => Tmp<Field<T>>,
            (Field<T>, &Field<T>) => Tmp<Field<T>>,
            (Field<T>, Field<T>) => Tmp<Field<T>>,
            (Field<T>, Tmp<Field<T>>) => Tmp<Field<T>>,
            (Tmp<Field<T>>, &Field<T>) => Tmp<Field<T>>,
            (Tmp<Field<T>>, Field<T>) => Tmp<Field<T>>,
            (Tmp<Field<T>>, Tmp<Field<T>>) => Tmp<Field<T>>,
            (&Field<T>, T) => Field<T>,
            (Field<T>, T) => Tmp<Field<T>>,
            (Tmp<Field<T>>, T) => Tmp<Field<T>>,
        );
    };
    (@ $Trait:ident::$method:ident, $sym:literal, $op:tt; $(($Lhs:ty, $Rhs:ty) => $Out:ty,)*) => {
        $(
            binary_op!([T: FieldValue] $Trait::$method for $Lhs, $Rhs => $Out,
                |l, r| kernel::zip_same($sym, l, r, |a: T, b: T| a $op b));
        )*
    };
}

additive!(Add::add, "+", +);
additive!(Sub::sub, "-", -);

/// 具体元素类型的 `value + field` 与 `value - field`
macro_rules! additive_value_left {
    ($($V:ty),*) => {$(
        binary_op!([] Add::add for $V, &Field<$V> => Field<$V>,
            |l, r| kernel::zip_same("+", l, r, |a: $V, b: $V| a + b));
        binary_op!([] Add::add for $V, Field<$V> => Tmp<Field<$V>>,
            |l, r| kernel::zip_same("+", l, r, |a: $V, b: $V| a + b));
        binary_op!([] Add::add for $V, Tmp<Field<$V>> => Tmp<Field<$V>>,
            |l, r| kernel::zip_same("+", l, r, |a: $V, b: $V| a + b));
        binary_op!([] Sub::sub for $V, &Field<$V> => Field<$V>,
            |l, r| kernel::zip_same("-", l, r, |a: $V, b: $V| a - b));
        binary_op!([] Sub::sub for $V, Field<$V> => Tmp<Field<$V>>,
            |l, r| kernel::zip_same("-", l, r, |a: $V, b: $V| a - b));
        binary_op!([] Sub::sub for $V, Tmp<Field<$V>> => Tmp<Field<$V>>,
            |l, r| kernel::zip_same("-", l, r, |a: $V, b: $V| a - b));
    )*};
}

additive_value_left!(f64, Vector, Tensor, SymmTensor);

// ============================================================================
// 与标量类型操作数的 * 与 /
// ============================================================================

macro_rules! scaling {
    ($Trait:ident::$method:ident, $sym:literal, $op:tt) => {
        scaling!(@ $Trait::$method, $sym, $op;
            (&Field<T>, &Field<f64>) => Field<T>,
            (&Field<T>, Field<f64>) => Tmp<Field<T>>,
            (&Field<T>, Tmp<Field<f64>>) => Tmp<Field<T>>,
            (&Field<T>, f64) => Field<T>,
            (&Field<T>, &Dimensioned<f64>) => Field<T>,
            (Field<T>, &Field<f64>) => Tmp<Field<T>>,
            (Field<T>, Field<f64>) => Tmp<Field<T>>,
            (Field<T>, Tmp<Field<f64>>) => Tmp<Field<T>>,
            (Field<T>, f64) => Tmp<Field<T>>,
            (Field<T>, &Dimensioned<f64>) => Tmp<Field<T>>,
            (Tmp<Field<T>>, &Field<f64>) => Tmp<Field<T>>,
            (Tmp<Field<T>>, Field<f64>) => Tmp<Field<T>>,
            (Tmp<Field<T>>, Tmp<Field<f64>>) => Tmp<Field<T>>,
            (Tmp<Field<T>>, f64) => Tmp<Field<T>>,
            (Tmp<Field<T>>, &Dimensioned<f64>) => Tmp<Field<T>>,
        );
    };
    (@ $Trait:ident::$method:ident, $sym:literal, $op:tt; $(($Lhs:ty, $Rhs:ty) => $Out:ty,)*) => {
        $(
            binary_op!([T: FieldValue] $Trait::$method for $Lhs, $Rhs => $Out,
                |l, r| kernel::zip_scale($sym, l, r, |v: T, s: f64| v $op s));
        )*
    };
}

scaling!(Mul::mul, "*", *);
scaling!(Div::div, "/", /);

// `s * field`
binary_op!([T: FieldValue] Mul::mul for f64, &Field<T> => Field<T>,
    |l, r| kernel::zip_scale("*", r, l, |v: T, s: f64| v * s));
binary_op!([T: FieldValue] Mul::mul for f64, Field<T> => Tmp<Field<T>>,
    |l, r| kernel::zip_scale("*", r, l, |v: T, s: f64| v * s));
binary_op!([T: FieldValue] Mul::mul for f64, Tmp<Field<T>> => Tmp<Field<T>>,
    |l, r| kernel::zip_scale("*", r, l, |v: T, s: f64| v * s));
binary_op!([T: FieldValue] Mul::mul for &Dimensioned<f64>, &Field<T> => Field<T>,
    |l, r| kernel::zip_scale("*", r, l, |v: T, s: f64| v * s));
binary_op!([T: FieldValue] Mul::mul for &Dimensioned<f64>, Field<T> => Tmp<Field<T>>,
    |l, r| kernel::zip_scale("*", r, l, |v: T, s: f64| v * s));
binary_op!([T: FieldValue] Mul::mul for &Dimensioned<f64>, Tmp<Field<T>> => Tmp<Field<T>>,
    |l, r| kernel::zip_scale("*", r, l, |v: T, s: f64| v * s));

// `s / field`
binary_op!([] Div::div for f64, &Field<f64> => Field<f64>,
    |l, r| kernel::zip_scale("/", l, r, |a: f64, b: f64| a / b));
binary_op!([] Div::div for f64, Field<f64> => Tmp<Field<f64>>,
    |l, r| kernel::zip_scale("/", l, r, |a: f64, b: f64| a / b));
binary_op!([] Div::div for f64, Tmp<Field<f64>> => Tmp<Field<f64>>,
    |l, r| kernel::zip_scale("/", l, r, |a: f64, b: f64| a / b));

/// `标量场 * V 的场`
macro_rules! scalar_field_left {
    ($($V:ty),*) => {$(
        scalar_field_left!(@ $V;
            (&Field<f64>, &Field<$V>) => Field<$V>,
            (&Field<f64>, Field<$V>) => Tmp<Field<$V>>,
            (&Field<f64>, Tmp<Field<$V>>) => Tmp<Field<$V>>,
            (Field<f64>, &Field<$V>) => Tmp<Field<$V>>,
            (Field<f64>, Field<$V>) => Tmp<Field<$V>>,
            (Field<f64>, Tmp<Field<$V>>) => Tmp<Field<$V>>,
            (Tmp<Field<f64>>, &Field<$V>) => Tmp<Field<$V>>,
            (Tmp<Field<f64>>, Field<$V>) => Tmp<Field<$V>>,
            (Tmp<Field<f64>>, Tmp<Field<$V>>) => Tmp<Field<$V>>,
        );
    )*};
    (@ $V:ty; $(($Lhs:ty, $Rhs:ty) => $Out:ty,)*) => {
        $(
            binary_op!([] Mul::mul for $Lhs, $Rhs => $Out,
                |l, r| kernel::zip_scale("*", r, l, |v: $V, s: f64| v * s));
        )*
    };
}

scalar_field_left!(Vector, Tensor, SymmTensor);

// ============================================================================
// 内积 &
// ============================================================================

macro_rules! inner {
    ($(($Lhs:ty, $Rhs:ty) => $Out:ty,)*) => {
        $(
            binary_op!([A, B] BitAnd::bitand for $Lhs, $Rhs => $Out
                where [A: FieldValue + BitAnd<B>, B: FieldValue, <A as BitAnd<B>>::Output: FieldValue],
                |l, r| kernel::zip_map("&", l, r, |a: A, b: B| a & b));
        )*
    };
}

inner!(
    (&Field<A>, &Field<B>) => Field<<A as BitAnd<B>>::Output>,
    (&Field<A>, Field<B>) => Tmp<Field<<A as BitAnd<B>>::Output>>,
    (&Field<A>, Tmp<Field<B>>) => Tmp<Field<<A as BitAnd<B>>::Output>>,
    (Field<A>, &Field<B>) => Tmp<Field<<A as BitAnd<B>>::Output>>,
    (Field<A>, Field<B>) => Tmp<Field<<A as BitAnd<B>>::Output>>,
    (Field<A>, Tmp<Field<B>>) => Tmp<Field<<A as BitAnd<B>>::Output>>,
    (Tmp<Field<A>>, &Field<B>) => Tmp<Field<<A as BitAnd<B>>::Output>>,
    (Tmp<Field<A>>, Field<B>) => Tmp<Field<<A as BitAnd<B>>::Output>>,
    (Tmp<Field<A>>, Tmp<Field<B>>) => Tmp<Field<<A as BitAnd<B>>::Output>>,
    (&Field<A>, B) => Field<<A as BitAnd<B>>::Output>,
    (Field<A>, B) => Tmp<Field<<A as BitAnd<B>>::Output>>,
    (Tmp<Field<A>>, B) => Tmp<Field<<A as BitAnd<B>>::Output>>,
);

/// 具有内积的具体类型组合的 `value & field`
macro_rules! inner_value_left {
    ($(($A:ty, $B:ty) => $R:ty),* $(,)?) => {$(
        binary_op!([] BitAnd::bitand for $A, &Field<$B> => Field<$R>,
            |l, r| kernel::zip_map("&", l, r, |a: $A, b: $B| a & b));
        binary_op!([] BitAnd::bitand for $A, Field<$B> => Tmp<Field<$R>>,
            |l, r| kernel::zip_map("&", l, r, |a: $A, b: $B| a & b));
        binary_op!([] BitAnd::bitand for $A, Tmp<Field<$B>> => Tmp<Field<$R>>,
            |l, r| kernel::zip_map("&", l, r, |a: $A, b: $B| a & b));
    )*};
}

inner_value_left!(
    (Vector, Vector) => f64,
    (Vector, Tensor) => Vector,
    (Vector, SymmTensor) => Vector,
    (Tensor, Vector) => Vector,
    (Tensor, Tensor) => Tensor,
    (SymmTensor, Vector) => Vector,
);

// ============================================================================
// 取负
// ============================================================================

impl<T: FieldValue> Neg for &Field<T> {
    type Output = Field<T>;

    #[track_caller]
    fn neg(self) -> Field<T> {
        Field::from_vec(expect_ok(kernel::map("neg", self.into_operand(), |v: T| -v)))
    }
}

impl<T: FieldValue> Neg for Field<T> {
    type Output = Tmp<Field<T>>;

    #[track_caller]
    fn neg(self) -> Tmp<Field<T>> {
        Tmp::from_vec(expect_ok(kernel::map("neg", self.into_operand(), |v: T| -v)))
    }
}

impl<T: FieldValue> Neg for Tmp<Field<T>> {
    type Output = Tmp<Field<T>>;

    #[track_caller]
    fn neg(self) -> Tmp<Field<T>> {
        Tmp::from_vec(expect_ok(kernel::map("neg", self.into_operand(), |v: T| -v)))
    }
}

// ============================================================================
// 复合赋值
// ============================================================================

macro_rules! assign_elementwise {
    ($Trait:ident::$method:ident, $sym:literal, $Elem:ty, $op:tt, [$($g:tt)*] $T:ty) => {
        impl<$($g)*> $Trait<&Field<$Elem>> for Field<$T> {
            #[track_caller]
            fn $method(&mut self, rhs: &Field<$Elem>) {
                expect_ok(FieldError::check_length($sym, self.len(), rhs.len()));
                kernel::update_with(self.as_mut_slice(), rhs.as_slice(), |o, x| *o $op x);
            }
        }

        impl<$($g)*> $Trait<Tmp<Field<$Elem>>> for Field<$T> {
            #[track_caller]
            fn $method(&mut self, rhs: Tmp<Field<$Elem>>) {
                $Trait::$method(self, &*rhs);
            }
        }

        impl<$($g)*> $Trait<$Elem> for Field<$T> {
            fn $method(&mut self, rhs: $Elem) {
                kernel::update(self.as_mut_slice(), |o| *o $op rhs);
            }
        }
    };
}

assign_elementwise!(AddAssign::add_assign, "+=", T, +=, [T: FieldValue] T);
assign_elementwise!(SubAssign::sub_assign, "-=", T, -=, [T: FieldValue] T);
assign_elementwise!(MulAssign::mul_assign, "*=", f64, *=, [T: FieldValue] T);
assign_elementwise!(DivAssign::div_assign, "/=", f64, /=, [T: FieldValue] T);

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(values: &[f64]) -> Field<f64> {
        Field::from_slice(values)
    }

    #[test]
    fn test_borrowed_operands_give_fresh_field() {
        let a = scalar(&[1.0, 2.0, 3.0]);
        let b = scalar(&[4.0, 5.0, 6.0]);
        let sum: Field<f64> = &a + &b;
        assert_eq!(sum.as_slice(), &[5.0, 7.0, 9.0]);
        let diff: Field<f64> = &a - &b;
        assert_eq!(diff.as_slice(), &[-3.0, -3.0, -3.0]);
        let prod: Field<f64> = &a * &b;
        assert_eq!(prod.as_slice(), &[4.0, 10.0, 18.0]);
        let quot: Field<f64> = &b / &a;
        assert_eq!(quot.as_slice(), &[4.0, 2.5, 2.0]);
        // 输入未被修改
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_broadcast_both_sides() {
        let a = scalar(&[1.0, 2.0]);
        assert_eq!((&a + 10.0).as_slice(), &[11.0, 12.0]);
        assert_eq!((10.0 + &a).as_slice(), &[11.0, 12.0]);
        assert_eq!((&a - 10.0).as_slice(), &[-9.0, -8.0]);
        assert_eq!((10.0 - &a).as_slice(), &[9.0, 8.0]);
        assert_eq!((2.0 * &a).as_slice(), &[2.0, 4.0]);
        assert_eq!((&a / 2.0).as_slice(), &[0.5, 1.0]);
        assert_eq!((1.0 / &a).as_slice(), &[1.0, 0.5]);
    }

    #[test]
    fn test_owned_operand_storage_is_reused() {
        let a = scalar(&[1.0, 2.0, 3.0]);
        let t = &a * 2.0 + &a; // Field + &Field -> Tmp in the left buffer
        let ptr = t.as_slice().as_ptr();
        let u = &a + t; // rhs Tmp reused
        assert_eq!(u.as_slice().as_ptr(), ptr);
        assert_eq!(u.as_slice(), &[4.0, 8.0, 12.0]);

        let v = u * 0.5;
        assert_eq!(v.as_slice().as_ptr(), ptr);
        let w = -v;
        assert_eq!(w.as_slice().as_ptr(), ptr);
        assert_eq!(w.as_slice(), &[-2.0, -4.0, -6.0]);
    }

    #[test]
    fn test_tmp_tmp_reuses_left() {
        let a = scalar(&[1.0, 2.0]);
        let b = scalar(&[3.0, 4.0]);
        let left = &a + b.clone();
        let right = &b + a.clone();
        let ptr = left.as_slice().as_ptr();
        let out = left + right;
        assert_eq!(out.as_slice().as_ptr(), ptr);
        assert_eq!(out.as_slice(), &[8.0, 12.0]);
    }

    #[test]
    #[should_panic(expected = "length mismatch in '+'")]
    fn test_length_mismatch_panics() {
        let _ = &scalar(&[1.0, 2.0]) + &scalar(&[1.0]);
    }

    #[test]
    fn test_vector_field_arithmetic() {
        let u = Field::from(vec![Vector::new(1.0, 0.0, 0.0), Vector::new(0.0, 2.0, 0.0)]);
        let s = scalar(&[2.0, 3.0]);

        let scaled = &u * &s;
        assert_eq!(scaled[1], Vector::new(0.0, 6.0, 0.0));
        let left = &s * &u;
        assert_eq!(left, scaled);
        let halved = &u / 2.0;
        assert_eq!(halved[0], Vector::new(0.5, 0.0, 0.0));

        let shifted = &u + Vector::new(1.0, 1.0, 1.0);
        assert_eq!(shifted[0], Vector::new(2.0, 1.0, 1.0));
        let flipped = Vector::new(1.0, 1.0, 1.0) - &u;
        assert_eq!(flipped[1], Vector::new(1.0, -1.0, 1.0));
    }

    #[test]
    fn test_inner_products() {
        let u = Field::from(vec![Vector::new(1.0, 2.0, 3.0), Vector::new(0.0, 3.0, 4.0)]);
        let v = Field::from(vec![Vector::new(1.0, 1.0, 1.0), Vector::new(0.0, 1.0, 0.0)]);

        let dots: Field<f64> = &u & &v;
        assert_eq!(dots.as_slice(), &[6.0, 3.0]);

        let g = Vector::new(0.0, -2.0, 0.0);
        let gu = g & &u;
        assert_eq!(gu.as_slice(), &[-4.0, -6.0]);
        let ug = &u & g;
        assert_eq!(ug, gu);

        let t = Field::uniform(2, Tensor::I * 2.0);
        let tu: Field<Vector> = &t & &u;
        assert_eq!(tu[1], Vector::new(0.0, 6.0, 8.0));
        let ut = &u & Tensor::I;
        assert_eq!(ut, u);
    }

    #[test]
    #[should_panic(expected = "length mismatch in '&'")]
    fn test_inner_length_mismatch_panics() {
        let u = Field::uniform(2, Vector::X);
        let v = Field::uniform(3, Vector::X);
        let _ = &u & &v;
    }

    #[test]
    fn test_dimensioned_value_scales_field() {
        let p = scalar(&[2.0, 4.0]);
        let p0 = Dimensioned::new("p0", ff_foundation::dims::PRESSURE, 2.0);
        assert_eq!((&p / &p0).as_slice(), &[1.0, 2.0]);
        assert_eq!((&p0 * &p).as_slice(), &[4.0, 8.0]);
    }

    #[test]
    fn test_compound_assignment() {
        let mut c = scalar(&[1.0, 2.0]);
        let a = scalar(&[10.0, 20.0]);
        c += &a;
        assert_eq!(c.as_slice(), &[11.0, 22.0]);
        c -= 1.0;
        assert_eq!(c.as_slice(), &[10.0, 21.0]);
        c *= 2.0;
        c /= &scalar(&[4.0, 2.0]);
        assert_eq!(c.as_slice(), &[5.0, 21.0]);
        c += &a * 0.1 + 5.0;
        assert_eq!(c.as_slice(), &[11.0, 28.0]);

        let mut u = Field::uniform(2, Vector::X);
        u *= &scalar(&[2.0, 3.0]);
        assert_eq!(u[1], Vector::new(3.0, 0.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "length mismatch in '+='")]
    fn test_compound_assignment_length_mismatch_panics() {
        let mut c = scalar(&[1.0, 2.0, 3.0]);
        c += &scalar(&[1.0, 2.0]);
    }

    #[test]
    fn test_failed_operation_writes_nothing() {
        let mut c = scalar(&[1.0, 2.0, 3.0]);
        let short = scalar(&[5.0, 5.0]);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            c *= &short;
        }));
        assert!(result.is_err());
        assert_eq!(c.as_slice(), &[1.0, 2.0, 3.0]);

        let err = crate::expr::add(&c, &short).unwrap_err();
        assert_eq!(err, FieldError::length_mismatch("+", 3, 2));
        assert_eq!(c.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(short.as_slice(), &[5.0, 5.0]);
    }
}
