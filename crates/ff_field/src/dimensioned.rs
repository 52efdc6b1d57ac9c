// crates/ff_field/src/dimensioned.rs

//! Dimensioned - 命名物理量
//!
//! 将值与 [`DimensionSet`] 及说明性名称绑定。名称不参与相等比较，
//! 算术运算按 `(a*b)`、`(a+b)` 等形式组合名称。
//!
//! ```
//! use ff_field::prelude::*;
//!
//! let p = DimensionedScalar::new("p", dims::PRESSURE, 3.0);
//! let area = DimensionedScalar::new("A", dims::AREA, 2.0);
//! let force = &p * &area;
//! assert_eq!(force.name(), "(p*A)");
//! assert_eq!(*force.dimensions(), dims::FORCE);
//! assert_eq!(*force.value(), 6.0);
//! ```

use std::fmt;
use std::ops::{Add, BitAnd, Div, Mul, Neg, Sub};
use std::str::FromStr;

use ff_foundation::dimension::{dims, DimensionSet};
use ff_foundation::error::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};

use crate::ops::expect_ok;
use crate::primitives::{SymmTensor, Tensor, Vector};
use crate::value::FieldValue;

/// 带物理量纲的命名值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimensioned<T> {
    name: String,
    dimensions: DimensionSet,
    value: T,
}

/// 有量纲标量
pub type DimensionedScalar = Dimensioned<f64>;
/// 有量纲矢量
pub type DimensionedVector = Dimensioned<Vector>;
/// 有量纲张量
pub type DimensionedTensor = Dimensioned<Tensor>;
/// 有量纲对称张量
pub type DimensionedSymmTensor = Dimensioned<SymmTensor>;

impl<T: FieldValue> Dimensioned<T> {
    /// 创建物理量
    pub fn new(name: impl Into<String>, dimensions: DimensionSet, value: T) -> Self {
        Self {
            name: name.into(),
            dimensions,
            value,
        }
    }

    /// 创建无量纲物理量
    pub fn dimless(name: impl Into<String>, value: T) -> Self {
        Self::new(name, dims::DIMLESS, value)
    }

    /// 名称
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 量纲
    #[inline]
    pub fn dimensions(&self) -> &DimensionSet {
        &self.dimensions
    }

    /// 值
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// 以新名称返回同一物理量
    pub fn renamed(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// `self + other`；量纲不一致时失败
    pub fn try_add(&self, other: &Self) -> FieldResult<Self> {
        Ok(Self {
            name: format!("({}+{})", self.name, other.name),
            dimensions: self.dimensions.matching(&other.dimensions, "+")?,
            value: self.value + other.value,
        })
    }

    /// `self - other`；量纲不一致时失败
    pub fn try_sub(&self, other: &Self) -> FieldResult<Self> {
        Ok(Self {
            name: format!("({}-{})", self.name, other.name),
            dimensions: self.dimensions.matching(&other.dimensions, "-")?,
            value: self.value - other.value,
        })
    }

    /// 模长，量纲不变
    pub fn mag(&self) -> Dimensioned<f64> {
        Dimensioned::new(format!("mag({})", self.name), self.dimensions, self.value.mag())
    }

    fn scaled(&self, op: char, factor: &Dimensioned<f64>) -> Self {
        let (dimensions, value) = match op {
            '*' => (self.dimensions * factor.dimensions, self.value * factor.value),
            _ => (self.dimensions / factor.dimensions, self.value / factor.value),
        };
        Self {
            name: format!("({}{op}{})", self.name, factor.name),
            dimensions,
            value,
        }
    }
}

impl Dimensioned<f64> {
    /// `self^n`
    pub fn pow(&self, n: f64) -> Self {
        Self {
            name: format!("pow({},{n})", self.name),
            dimensions: self.dimensions.pow(n),
            value: self.value.powf(n),
        }
    }

    /// 平方根
    pub fn sqrt(&self) -> Self {
        Self {
            name: format!("sqrt({})", self.name),
            dimensions: self.dimensions.sqrt(),
            value: self.value.sqrt(),
        }
    }

    /// 裸数值视为无量纲物理量，以数值命名
    pub(crate) fn from_number(value: f64) -> Self {
        Self::dimless(value.to_string(), value)
    }
}

impl<T: PartialEq> PartialEq for Dimensioned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions && self.value == other.value
    }
}

// ============================================================================
// 运算符
// ============================================================================

impl<T: FieldValue> Add for &Dimensioned<T> {
    type Output = Dimensioned<T>;

    #[track_caller]
    fn add(self, rhs: Self) -> Dimensioned<T> {
        expect_ok(self.try_add(rhs))
    }
}

impl<T: FieldValue> Sub for &Dimensioned<T> {
    type Output = Dimensioned<T>;

    #[track_caller]
    fn sub(self, rhs: Self) -> Dimensioned<T> {
        expect_ok(self.try_sub(rhs))
    }
}

impl<T: FieldValue> Add for Dimensioned<T> {
    type Output = Dimensioned<T>;

    #[track_caller]
    fn add(self, rhs: Self) -> Dimensioned<T> {
        &self + &rhs
    }
}

impl<T: FieldValue> Sub for Dimensioned<T> {
    type Output = Dimensioned<T>;

    #[track_caller]
    fn sub(self, rhs: Self) -> Dimensioned<T> {
        &self - &rhs
    }
}

impl<T: FieldValue> Neg for &Dimensioned<T> {
    type Output = Dimensioned<T>;

    fn neg(self) -> Dimensioned<T> {
        Dimensioned {
            name: format!("-{}", self.name),
            dimensions: self.dimensions,
            value: -self.value,
        }
    }
}

impl<T: FieldValue> Neg for Dimensioned<T> {
    type Output = Dimensioned<T>;

    fn neg(self) -> Dimensioned<T> {
        -&self
    }
}

macro_rules! impl_scaling {
    ($Trait:ident, $method:ident, $op:literal) => {
        impl<T: FieldValue> $Trait<&Dimensioned<f64>> for &Dimensioned<T> {
            type Output = Dimensioned<T>;
            fn $method(self, rhs: &Dimensioned<f64>) -> Dimensioned<T> {
                self.scaled($op, rhs)
            }
        }

        impl<T: FieldValue> $Trait<Dimensioned<f64>> for Dimensioned<T> {
            type Output = Dimensioned<T>;
            fn $method(self, rhs: Dimensioned<f64>) -> Dimensioned<T> {
                self.scaled($op, &rhs)
            }
        }

        impl<T: FieldValue> $Trait<f64> for &Dimensioned<T> {
            type Output = Dimensioned<T>;
            fn $method(self, rhs: f64) -> Dimensioned<T> {
                self.scaled($op, &Dimensioned::from_number(rhs))
            }
        }

        impl<T: FieldValue> $Trait<f64> for Dimensioned<T> {
            type Output = Dimensioned<T>;
            fn $method(self, rhs: f64) -> Dimensioned<T> {
                self.scaled($op, &Dimensioned::from_number(rhs))
            }
        }
    };
}

impl_scaling!(Mul, mul, '*');
impl_scaling!(Div, div, '/');

impl<T: FieldValue> Mul<&Dimensioned<T>> for f64 {
    type Output = Dimensioned<T>;

    fn mul(self, rhs: &Dimensioned<T>) -> Dimensioned<T> {
        Dimensioned {
            name: format!("({self}*{})", rhs.name),
            dimensions: rhs.dimensions,
            value: rhs.value * self,
        }
    }
}

impl Div<&Dimensioned<f64>> for f64 {
    type Output = Dimensioned<f64>;

    fn div(self, rhs: &Dimensioned<f64>) -> Dimensioned<f64> {
        Dimensioned {
            name: format!("({self}/{})", rhs.name),
            dimensions: rhs.dimensions.reciprocal(),
            value: self / rhs.value,
        }
    }
}

macro_rules! impl_scalar_left {
    ($($T:ty),*) => {$(
        impl Mul<&Dimensioned<$T>> for &Dimensioned<f64> {
            type Output = Dimensioned<$T>;
            fn mul(self, rhs: &Dimensioned<$T>) -> Dimensioned<$T> {
                Dimensioned {
                    name: format!("({}*{})", self.name, rhs.name),
                    dimensions: self.dimensions * rhs.dimensions,
                    value: rhs.value * self.value,
                }
            }
        }
    )*};
}

impl_scalar_left!(Vector, Tensor, SymmTensor);

impl<A, B> BitAnd<&Dimensioned<B>> for &Dimensioned<A>
where
    A: FieldValue + BitAnd<B>,
    B: FieldValue,
    <A as BitAnd<B>>::Output: FieldValue,
{
    type Output = Dimensioned<<A as BitAnd<B>>::Output>;

    fn bitand(self, rhs: &Dimensioned<B>) -> Self::Output {
        Dimensioned {
            name: format!("({}&{})", self.name, rhs.name),
            dimensions: self.dimensions * rhs.dimensions,
            value: self.value & rhs.value,
        }
    }
}

// ============================================================================
// 文本形式: `name [dims] value`
// ============================================================================

impl<T: FieldValue> fmt::Display for Dimensioned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.dimensions, self.value)
    }
}

impl<T> FromStr for Dimensioned<T>
where
    T: FieldValue + FromStr,
    T::Err: fmt::Display,
{
    type Err = FieldError;

    /// 解析 `name [dims] value`；名称可省略
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let open = s
            .find('[')
            .ok_or_else(|| FieldError::parse("dimensioned value", s, "missing '['"))?;
        let close = s[open..]
            .find(']')
            .map(|i| open + i)
            .ok_or_else(|| FieldError::parse("dimensioned value", s, "missing ']'"))?;

        let name = s[..open].trim();
        let dimensions: DimensionSet = s[open..=close].parse()?;
        let value_text = s[close + 1..].trim().trim_end_matches(';').trim();
        let value = value_text
            .parse::<T>()
            .map_err(|e| FieldError::parse("dimensioned value", s, e.to_string()))?;

        Ok(Self::new(name, dimensions, value))
    }
}
