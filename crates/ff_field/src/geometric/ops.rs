// crates/ff_field/src/geometric/ops.rs

//! 几何场算术
//!
//! 每个运算先检查量纲与面片布局，再对每个部分各调用一次场内核
//! （先内部值，后各面片）。带检查的函数返回 `FieldResult`；
//! 运算符以相同消息 panic。
//!
//! 量纲规则:
//!
//! - `+ -`: 量纲集必须相同，裸数值视为无量纲
//! - `* / &`: 量纲集相乘 / 相除

use std::ops::{Add, BitAnd, Div, Mul, Neg, Sub};

use ff_foundation::dimension::{dims, DimensionSet};
use ff_foundation::error::{FieldError, FieldResult};

use super::{check_layout, GeometricField};
use crate::dimensioned::Dimensioned;
use crate::field::Field;
use crate::kernel::{self, Operand};
use crate::ops::expect_ok;
use crate::primitives::{SymmTensor, Tensor, Vector};
use crate::tmp::Tmp;
use crate::value::FieldValue;

// ============================================================================
// 操作数
// ============================================================================

/// 几何运算的一侧
#[derive(Debug)]
pub enum GeometricOperand<'a, T> {
    /// 借用的场；不会被写入
    Borrowed(&'a GeometricField<T>),
    /// 有所有权的场，其存储可被复用
    Owned(GeometricField<T>),
    /// 作用于每个部分的值
    Uniform {
        /// 用于结果命名的名称
        name: String,
        /// 物理量纲
        dimensions: DimensionSet,
        /// 值
        value: T,
    },
}

/// 将运算符参数转换为 [`GeometricOperand`]
pub trait IntoGeometricOperand<'a, T> {
    /// 执行转换
    fn into_geometric_operand(self) -> GeometricOperand<'a, T>;
}

impl<'a, T: FieldValue> IntoGeometricOperand<'a, T> for &'a GeometricField<T> {
    fn into_geometric_operand(self) -> GeometricOperand<'a, T> {
        GeometricOperand::Borrowed(self)
    }
}

impl<'a, T: FieldValue> IntoGeometricOperand<'a, T> for GeometricField<T> {
    fn into_geometric_operand(self) -> GeometricOperand<'a, T> {
        GeometricOperand::Owned(self)
    }
}

impl<'a, T: FieldValue> IntoGeometricOperand<'a, T> for Tmp<GeometricField<T>> {
    fn into_geometric_operand(self) -> GeometricOperand<'a, T> {
        GeometricOperand::Owned(self.into_inner())
    }
}

impl<'a, 'b, T: FieldValue> IntoGeometricOperand<'a, T> for &'b Dimensioned<T> {
    fn into_geometric_operand(self) -> GeometricOperand<'a, T> {
        GeometricOperand::Uniform {
            name: self.name().to_string(),
            dimensions: *self.dimensions(),
            value: *self.value(),
        }
    }
}

/// 裸数值为无量纲
impl<'a, T: FieldValue> IntoGeometricOperand<'a, T> for T {
    fn into_geometric_operand(self) -> GeometricOperand<'a, T> {
        GeometricOperand::Uniform {
            name: self.to_string(),
            dimensions: dims::DIMLESS,
            value: self,
        }
    }
}

impl<'a, T: FieldValue> GeometricOperand<'a, T> {
    pub(crate) fn name(&self) -> &str {
        match self {
            GeometricOperand::Borrowed(g) => g.name(),
            GeometricOperand::Owned(g) => g.name(),
            GeometricOperand::Uniform { name, .. } => name,
        }
    }

    pub(crate) fn dimensions(&self) -> DimensionSet {
        match self {
            GeometricOperand::Borrowed(g) => *g.dimensions(),
            GeometricOperand::Owned(g) => *g.dimensions(),
            GeometricOperand::Uniform { dimensions, .. } => *dimensions,
        }
    }

    fn geometry(&self) -> Option<&GeometricField<T>> {
        match self {
            GeometricOperand::Borrowed(g) => Some(*g),
            GeometricOperand::Owned(g) => Some(g),
            GeometricOperand::Uniform { .. } => None,
        }
    }

    /// 场内核操作数，内部部分在前
    fn into_operands(self, n_parts: usize) -> Vec<Operand<'a, T>> {
        match self {
            GeometricOperand::Borrowed(g) => g.parts().map(|f| Operand::Field(f.as_slice())).collect(),
            GeometricOperand::Owned(g) => g.into_parts().map(|f| Operand::Tmp(f.into_vec())).collect(),
            GeometricOperand::Uniform { value, .. } => {
                std::iter::repeat_with(|| Operand::Uniform(value)).take(n_parts).collect()
            }
        }
    }
}

fn patch_names<T: FieldValue>(field: &GeometricField<T>) -> Vec<String> {
    field.patch_names().map(String::from).collect()
}

/// 对每对部分执行 `kernel`
fn combine<'a, A, B, R, K>(
    operation: &'static str,
    lhs: GeometricOperand<'a, A>,
    rhs: GeometricOperand<'a, B>,
    dimensions: DimensionSet,
    kernel: K,
) -> FieldResult<GeometricField<R>>
where
    A: FieldValue,
    B: FieldValue,
    R: FieldValue,
    K: Fn(Operand<'a, A>, Operand<'a, B>) -> FieldResult<Vec<R>>,
{
    let names = match (lhs.geometry(), rhs.geometry()) {
        (Some(l), Some(r)) => {
            check_layout(operation, l, r)?;
            patch_names(l)
        }
        (Some(g), None) => patch_names(g),
        (None, Some(g)) => patch_names(g),
        (None, None) => {
            return Err(FieldError::invalid_operation(
                operation,
                "two uniform operands, at least one geometric field is required",
            ))
        }
    };
    let name = format!("({}{operation}{})", lhs.name(), rhs.name());
    let n_parts = names.len() + 1;
    let parts = lhs
        .into_operands(n_parts)
        .into_iter()
        .zip(rhs.into_operands(n_parts))
        .map(|(l, r)| kernel(l, r).map(Field::from_vec))
        .collect::<FieldResult<Vec<_>>>()?;
    Ok(GeometricField::from_parts(name, dimensions, names, parts))
}

/// 对单个操作数的每个部分执行 `f`
pub(crate) fn map_geometric<'a, T, R, F>(
    operation: &'static str,
    arg: GeometricOperand<'a, T>,
    name: String,
    dimensions: DimensionSet,
    f: F,
) -> FieldResult<GeometricField<R>>
where
    T: FieldValue,
    R: FieldValue,
    F: Fn(Operand<'a, T>) -> FieldResult<Vec<R>>,
{
    let names = match arg.geometry() {
        Some(g) => patch_names(g),
        None => {
            return Err(FieldError::invalid_operation(
                operation,
                "a uniform operand has no storage to map over",
            ))
        }
    };
    let parts = arg
        .into_operands(names.len() + 1)
        .into_iter()
        .map(|p| f(p).map(Field::from_vec))
        .collect::<FieldResult<Vec<_>>>()?;
    Ok(GeometricField::from_parts(name, dimensions, names, parts))
}

// ============================================================================
// 带检查的运算
// ============================================================================

/// `lhs + rhs`；量纲必须一致
pub fn add<'a, T: FieldValue>(
    lhs: impl IntoGeometricOperand<'a, T>,
    rhs: impl IntoGeometricOperand<'a, T>,
) -> FieldResult<GeometricField<T>> {
    let (lhs, rhs) = (lhs.into_geometric_operand(), rhs.into_geometric_operand());
    let dimensions = lhs.dimensions().matching(&rhs.dimensions(), "+")?;
    combine("+", lhs, rhs, dimensions, |l, r| kernel::zip_same("+", l, r, |a, b| a + b))
}

/// `lhs - rhs`；量纲必须一致
pub fn sub<'a, T: FieldValue>(
    lhs: impl IntoGeometricOperand<'a, T>,
    rhs: impl IntoGeometricOperand<'a, T>,
) -> FieldResult<GeometricField<T>> {
    let (lhs, rhs) = (lhs.into_geometric_operand(), rhs.into_geometric_operand());
    let dimensions = lhs.dimensions().matching(&rhs.dimensions(), "-")?;
    combine("-", lhs, rhs, dimensions, |l, r| kernel::zip_same("-", l, r, |a, b| a - b))
}

/// `lhs * factor`，因子为标量类型
pub fn mul<'a, T: FieldValue>(
    lhs: impl IntoGeometricOperand<'a, T>,
    factor: impl IntoGeometricOperand<'a, f64>,
) -> FieldResult<GeometricField<T>> {
    let (lhs, rhs) = (lhs.into_geometric_operand(), factor.into_geometric_operand());
    let dimensions = lhs.dimensions() * rhs.dimensions();
    combine("*", lhs, rhs, dimensions, |l, r| kernel::zip_scale("*", l, r, |v, s| v * s))
}

/// `factor * rhs`，左侧因子为标量类型
pub fn mul_left<'a, T: FieldValue>(
    factor: impl IntoGeometricOperand<'a, f64>,
    rhs: impl IntoGeometricOperand<'a, T>,
) -> FieldResult<GeometricField<T>> {
    let (lhs, rhs) = (factor.into_geometric_operand(), rhs.into_geometric_operand());
    let dimensions = lhs.dimensions() * rhs.dimensions();
    combine("*", lhs, rhs, dimensions, |l, r| kernel::zip_scale("*", r, l, |v, s| v * s))
}

/// `lhs / divisor`，除数为标量类型
pub fn div<'a, T: FieldValue>(
    lhs: impl IntoGeometricOperand<'a, T>,
    divisor: impl IntoGeometricOperand<'a, f64>,
) -> FieldResult<GeometricField<T>> {
    let (lhs, rhs) = (lhs.into_geometric_operand(), divisor.into_geometric_operand());
    let dimensions = lhs.dimensions() / rhs.dimensions();
    combine("/", lhs, rhs, dimensions, |l, r| kernel::zip_scale("/", l, r, |v, s| v / s))
}

/// `lhs & rhs`
pub fn inner<'a, A, B>(
    lhs: impl IntoGeometricOperand<'a, A>,
    rhs: impl IntoGeometricOperand<'a, B>,
) -> FieldResult<GeometricField<<A as BitAnd<B>>::Output>>
where
    A: FieldValue + BitAnd<B>,
    B: FieldValue,
    <A as BitAnd<B>>::Output: FieldValue,
{
    let (lhs, rhs) = (lhs.into_geometric_operand(), rhs.into_geometric_operand());
    let dimensions = lhs.dimensions() * rhs.dimensions();
    combine("&", lhs, rhs, dimensions, |l, r| kernel::zip_map("&", l, r, |a, b| a & b))
}

/// `-arg`
pub fn neg<'a, T: FieldValue>(arg: impl IntoGeometricOperand<'a, T>) -> FieldResult<GeometricField<T>> {
    let arg = arg.into_geometric_operand();
    let name = format!("-{}", arg.name());
    let dimensions = arg.dimensions();
    map_geometric("neg", arg, name, dimensions, |p| kernel::map("neg", p, |v: T| -v))
}

// ============================================================================
// 运算符
// ============================================================================

/// 将带检查的结果包装为运算符的输出类型
trait FromGeometric<T> {
    fn from_geometric(field: GeometricField<T>) -> Self;
}

impl<T> FromGeometric<T> for GeometricField<T> {
    fn from_geometric(field: GeometricField<T>) -> Self {
        field
    }
}

impl<T> FromGeometric<T> for Tmp<GeometricField<T>> {
    fn from_geometric(field: GeometricField<T>) -> Self {
        Tmp::new(field)
    }
}

macro_rules! geometric_op {
    (
        [$($g:tt)*] $Trait:ident::$method:ident for $Lhs:ty, $Rhs:ty => $Out:ty,
        [$($w:tt)*], $func:ident
    ) => {
        impl<$($g)*> $Trait<$Rhs> for $Lhs where $($w)* {
            type Output = $Out;

            #[track_caller]
            fn $method(self, rhs: $Rhs) -> $Out {
                FromGeometric::from_geometric(expect_ok($func(self, rhs)))
            }
        }
    };
}

/// 所有几何左操作数与所有几何、数值及有量纲右操作数的组合
macro_rules! geometric_matrix {
    (
        $Trait:ident::$method:ident, $func:ident, $g:tt, $w:tt,
        $Elem:ty, $OutElem:ty, $RElem:ty, $value:ty
    ) => {
        geometric_matrix!(@ $Trait::$method, $func, $g, $w;
            (&GeometricField<$Elem>, &GeometricField<$RElem>) => GeometricField<$OutElem>,
            (&GeometricField<$Elem>, GeometricField<$RElem>) => Tmp<GeometricField<$OutElem>>,
            (&GeometricField<$Elem>, Tmp<GeometricField<$RElem>>) => Tmp<GeometricField<$OutElem>>,
            (&GeometricField<$Elem>, $value) => GeometricField<$OutElem>,
            (&GeometricField<$Elem>, &Dimensioned<$RElem>) => GeometricField<$OutElem>,
            (GeometricField<$Elem>, &GeometricField<$RElem>) => Tmp<GeometricField<$OutElem>>,
            (GeometricField<$Elem>, GeometricField<$RElem>) => Tmp<GeometricField<$OutElem>>,
            (GeometricField<$Elem>, Tmp<GeometricField<$RElem>>) => Tmp<GeometricField<$OutElem>>,
            (GeometricField<$Elem>, $value) => Tmp<GeometricField<$OutElem>>,
            (GeometricField<$Elem>, &Dimensioned<$RElem>) => Tmp<GeometricField<$OutElem>>,
            (Tmp<GeometricField<$Elem>>, &GeometricField<$RElem>) => Tmp<GeometricField<$OutElem>>,
            (Tmp<GeometricField<$Elem>>, GeometricField<$RElem>) => Tmp<GeometricField<$OutElem>>,
            (Tmp<GeometricField<$Elem>>, Tmp<GeometricField<$RElem>>) => Tmp<GeometricField<$OutElem>>,
            (Tmp<GeometricField<$Elem>>, $value) => Tmp<GeometricField<$OutElem>>,
            (Tmp<GeometricField<$Elem>>, &Dimensioned<$RElem>) => Tmp<GeometricField<$OutElem>>,
        );
    };
    (@ $Trait:ident::$method:ident, $func:ident, $g:tt, $w:tt; $(($Lhs:ty, $Rhs:ty) => $Out:ty,)*) => {
        $(
            geometric_op!($g $Trait::$method for $Lhs, $Rhs => $Out, $w, $func);
        )*
    };
}

geometric_matrix!(Add::add, add, [T: FieldValue], [], T, T, T, T);
geometric_matrix!(Sub::sub, sub, [T: FieldValue], [], T, T, T, T);
geometric_matrix!(Mul::mul, mul, [T: FieldValue], [], T, T, f64, f64);
geometric_matrix!(Div::div, div, [T: FieldValue], [], T, T, f64, f64);
geometric_matrix!(
    BitAnd::bitand, inner, [A, B],
    [A: FieldValue + BitAnd<B>, B: FieldValue, <A as BitAnd<B>>::Output: FieldValue],
    A, <A as BitAnd<B>>::Output, B, B
);

/// 几何场左侧的数值或有量纲值
macro_rules! geometric_rhs {
    ($g:tt $Trait:ident::$method:ident for $Lhs:ty, $Elem:ty => $OutElem:ty, $w:tt, $func:ident) => {
        geometric_op!($g $Trait::$method for $Lhs, &GeometricField<$Elem>
            => GeometricField<$OutElem>, $w, $func);
        geometric_op!($g $Trait::$method for $Lhs, GeometricField<$Elem>
            => Tmp<GeometricField<$OutElem>>, $w, $func);
        geometric_op!($g $Trait::$method for $Lhs, Tmp<GeometricField<$Elem>>
            => Tmp<GeometricField<$OutElem>>, $w, $func);
    };
}

geometric_rhs!([T: FieldValue] Add::add for &Dimensioned<T>, T => T, [], add);
geometric_rhs!([T: FieldValue] Sub::sub for &Dimensioned<T>, T => T, [], sub);
geometric_rhs!([T: FieldValue] Mul::mul for f64, T => T, [], mul_left);
geometric_rhs!([T: FieldValue] Mul::mul for &Dimensioned<f64>, T => T, [], mul_left);
geometric_rhs!([] Add::add for f64, f64 => f64, [], add);
geometric_rhs!([] Sub::sub for f64, f64 => f64, [], sub);
geometric_rhs!([] Div::div for f64, f64 => f64, [], div);
geometric_rhs!([] Div::div for &Dimensioned<f64>, f64 => f64, [], div);
geometric_rhs!(
    [A, B] BitAnd::bitand for &Dimensioned<A>, B => <A as BitAnd<B>>::Output,
    [A: FieldValue + BitAnd<B>, B: FieldValue, <A as BitAnd<B>>::Output: FieldValue],
    inner
);

/// `标量几何场 * V 的几何场`
macro_rules! scalar_geometric_left {
    ($($V:ty),*) => {$(
        geometric_rhs!([] Mul::mul for &GeometricField<f64>, $V => $V, [], mul_left);
        geometric_rhs!([] Mul::mul for GeometricField<f64>, $V => $V, [], mul_left);
        geometric_rhs!([] Mul::mul for Tmp<GeometricField<f64>>, $V => $V, [], mul_left);
    )*};
}

scalar_geometric_left!(Vector, Tensor, SymmTensor);

impl<T: FieldValue> Neg for &GeometricField<T> {
    type Output = GeometricField<T>;

    #[track_caller]
    fn neg(self) -> GeometricField<T> {
        expect_ok(neg(self))
    }
}

impl<T: FieldValue> Neg for GeometricField<T> {
    type Output = Tmp<GeometricField<T>>;

    #[track_caller]
    fn neg(self) -> Tmp<GeometricField<T>> {
        Tmp::new(expect_ok(neg(self)))
    }
}

impl<T: FieldValue> Neg for Tmp<GeometricField<T>> {
    type Output = Tmp<GeometricField<T>>;

    #[track_caller]
    fn neg(self) -> Tmp<GeometricField<T>> {
        Tmp::new(expect_ok(neg(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometric::{VolScalarField, VolVectorField, INTERNAL_FIELD};

    fn scalar(name: &str, dimensions: DimensionSet, internal: f64, inlet: f64) -> VolScalarField {
        VolScalarField::uniform(name, dimensions, 3, internal)
            .with_patch("inlet", Field::uniform(2, inlet))
            .unwrap()
    }

    #[test]
    fn test_parts_are_combined() {
        let p = scalar("p", dims::PRESSURE, 2.0, 4.0);
        let q = scalar("q", dims::PRESSURE, 1.0, 1.0);
        let sum = &p + &q;
        assert_eq!(sum.name(), "(p+q)");
        assert_eq!(*sum.dimensions(), dims::PRESSURE);
        assert_eq!(sum.internal_field().as_slice(), &[3.0, 3.0, 3.0]);
        assert_eq!(sum.field("inlet").unwrap().as_slice(), &[5.0, 5.0]);
    }

    #[test]
    fn test_dimension_mismatch_is_reported() {
        let p = scalar("p", dims::PRESSURE, 1.0, 1.0);
        let u = scalar("U", dims::VELOCITY, 1.0, 1.0);
        let err = sub(&p, &u).unwrap_err();
        assert_eq!(
            err,
            FieldError::dimension_mismatch("-", dims::PRESSURE, dims::VELOCITY)
        );
        // 裸数值为无量纲
        assert!(add(&p, 1.0).is_err());
        let ratio = scalar("r", dims::DIMLESS, 0.5, 0.5);
        assert_eq!(add(&ratio, 1.0).unwrap().internal_field()[0], 1.5);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch in '+'")]
    fn test_operator_panics_on_dimension_mismatch() {
        let p = scalar("p", dims::PRESSURE, 1.0, 1.0);
        let u = scalar("U", dims::VELOCITY, 1.0, 1.0);
        let _ = &p + &u;
    }

    #[test]
    fn test_layout_mismatch() {
        let p = scalar("p", dims::PRESSURE, 1.0, 1.0);
        let bare = VolScalarField::uniform("q", dims::PRESSURE, 3, 1.0);
        assert!(matches!(add(&p, &bare), Err(FieldError::PatchMismatch { .. })));
        let short = VolScalarField::uniform("q", dims::PRESSURE, 2, 1.0)
            .with_patch("inlet", Field::zeros(2))
            .unwrap();
        assert!(matches!(add(&p, &short), Err(FieldError::LengthMismatch { .. })));
    }

    #[test]
    fn test_dimensioned_scaling() {
        let p_rgh = scalar("p_rgh", dims::PRESSURE, 3.0, 3.0);
        let scale = Dimensioned::new("scale", dims::DIMLESS, 2.0);
        let scaled = &p_rgh * &scale;
        assert_eq!(scaled.name(), "(p_rgh*scale)");
        assert!(scaled.internal_field().iter().all(|&v| (v - 6.0).abs() < 1e-12));

        let p0 = Dimensioned::new("p0", dims::PRESSURE, 101325.0);
        let ratio = &p_rgh / &p0;
        assert!(ratio.dimensions().is_dimensionless());
        let offset = &p0 - &p_rgh;
        assert_eq!(offset.name(), "(p0-p_rgh)");
        assert_eq!(offset.field("inlet").unwrap()[0], 101322.0);
    }

    #[test]
    fn test_owned_operands_reuse_storage() {
        let p = scalar("p", dims::PRESSURE, 1.0, 1.0);
        let twice = &p * 2.0;
        let ptr = twice.internal_field().as_slice().as_ptr();
        let out = twice + &p;
        assert_eq!(out.internal_field().as_slice().as_ptr(), ptr);
        let out = -out;
        assert_eq!(out.field(INTERNAL_FIELD).unwrap()[0], -3.0);
        assert_eq!(out.name(), "-((p*2)+p)");
    }

    #[test]
    fn test_buoyancy_inner_product() {
        let u = VolVectorField::uniform("U", dims::VELOCITY, 2, Vector::new(1.0, 2.0, 0.0));
        let g = Dimensioned::new("g", dims::ACCELERATION, Vector::new(0.0, -9.81, 0.0));
        let gu = &g & &u;
        assert_eq!(gu.name(), "(g&U)");
        assert_eq!(*gu.dimensions(), dims::ACCELERATION * dims::VELOCITY);
        assert!((gu.internal_field()[0] + 19.62).abs() < 1e-12);

        let rho = VolScalarField::uniform("rho", dims::DENSITY, 2, 2.0);
        let momentum = &rho * &u;
        assert_eq!(*momentum.dimensions(), dims::DENSITY * dims::VELOCITY);
        assert_eq!(momentum.internal_field()[1], Vector::new(2.0, 4.0, 0.0));
    }

    #[test]
    fn test_left_scalars() {
        let p = scalar("p", dims::DIMLESS, 2.0, 4.0);
        assert_eq!((1.0 - &p).internal_field()[0], -1.0);
        assert_eq!((8.0 / &p).field("inlet").unwrap()[0], 2.0);
        let half = (0.5 * &p).renamed("half");
        assert_eq!(half.internal_field()[0], 1.0);
    }
}
