// crates/ff_field/src/primitives.rs

//! 矢量、张量与对称张量元素类型
//!
//! 三者均为 `[f64; N]` 的 `#[repr(transparent)]` 包装，
//! 其切片可零拷贝地重解释为扁平 `f64` 切片（见 [`crate::interop`]）。
//! 乘积通过 `glam::DVec3` / `glam::DMat3` 计算。
//!
//! 分量顺序遵循行主序约定：
//!
//! | 类型         | 分量                                    |
//! |--------------|-----------------------------------------|
//! | `Vector`     | x y z                                   |
//! | `Tensor`     | xx xy xz yx yy yz zx zy zz              |
//! | `SymmTensor` | xx xy xz yy yz zz                       |

use bytemuck::{Pod, Zeroable};
use ff_foundation::error::{FieldError, FieldResult};
use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitXor, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub,
    SubAssign,
};
use std::str::FromStr;

/// 三分量矢量
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector(pub [f64; 3]);

/// 完整 3x3 张量，行主序
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Tensor(pub [f64; 9]);

/// 以 6 个独立分量存储的对称 3x3 张量
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct SymmTensor(pub [f64; 6]);

/// 解析 `(c0 c1 ... cN-1)`
fn parse_components<const N: usize>(what: &'static str, s: &str) -> FieldResult<[f64; N]> {
    let inner = s
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| FieldError::parse(what, s, "expected '(...)'"))?;

    let mut out = [0.0; N];
    let mut count = 0;
    for token in inner.split_whitespace() {
        if count == N {
            return Err(FieldError::parse(what, s, format!("more than {N} components")));
        }
        out[count] = token
            .parse::<f64>()
            .map_err(|e| FieldError::parse(what, s, format!("'{token}': {e}")))?;
        count += 1;
    }
    if count != N {
        return Err(FieldError::parse(
            what,
            s,
            format!("expected {N} components, got {count}"),
        ));
    }
    Ok(out)
}

/// 线性空间运算符、索引、文本形式与数组转换
macro_rules! impl_linear {
    ($T:ident, $N:literal, $what:literal) => {
        impl $T {
            /// 全零
            pub const ZERO: Self = Self([0.0; $N]);

            /// 以数组形式返回分量
            #[inline]
            pub fn to_array(self) -> [f64; $N] {
                self.0
            }
        }

        impl Add for $T {
            type Output = Self;
            #[inline]
            fn add(mut self, rhs: Self) -> Self {
                self += rhs;
                self
            }
        }

        impl Sub for $T {
            type Output = Self;
            #[inline]
            fn sub(mut self, rhs: Self) -> Self {
                self -= rhs;
                self
            }
        }

        impl Neg for $T {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self(self.0.map(|c| -c))
            }
        }

        impl Mul<f64> for $T {
            type Output = Self;
            #[inline]
            fn mul(mut self, rhs: f64) -> Self {
                self *= rhs;
                self
            }
        }

        impl Mul<$T> for f64 {
            type Output = $T;
            #[inline]
            fn mul(self, rhs: $T) -> $T {
                rhs * self
            }
        }

        impl Div<f64> for $T {
            type Output = Self;
            #[inline]
            fn div(mut self, rhs: f64) -> Self {
                self /= rhs;
                self
            }
        }

        impl AddAssign for $T {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                for (a, b) in self.0.iter_mut().zip(rhs.0) {
                    *a += b;
                }
            }
        }

        impl SubAssign for $T {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                for (a, b) in self.0.iter_mut().zip(rhs.0) {
                    *a -= b;
                }
            }
        }

        impl MulAssign<f64> for $T {
            #[inline]
            fn mul_assign(&mut self, rhs: f64) {
                for a in self.0.iter_mut() {
                    *a *= rhs;
                }
            }
        }

        impl DivAssign<f64> for $T {
            #[inline]
            fn div_assign(&mut self, rhs: f64) {
                for a in self.0.iter_mut() {
                    *a /= rhs;
                }
            }
        }

        impl Index<usize> for $T {
            type Output = f64;
            #[inline]
            fn index(&self, d: usize) -> &f64 {
                &self.0[d]
            }
        }

        impl IndexMut<usize> for $T {
            #[inline]
            fn index_mut(&mut self, d: usize) -> &mut f64 {
                &mut self.0[d]
            }
        }

        impl From<[f64; $N]> for $T {
            #[inline]
            fn from(c: [f64; $N]) -> Self {
                Self(c)
            }
        }

        impl From<$T> for [f64; $N] {
            #[inline]
            fn from(v: $T) -> Self {
                v.0
            }
        }

        impl PartialEq<[f64; $N]> for $T {
            fn eq(&self, other: &[f64; $N]) -> bool {
                &self.0 == other
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "(")?;
                for (d, c) in self.0.iter().enumerate() {
                    if d > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{c}")?;
                }
                write!(f, ")")
            }
        }

        impl FromStr for $T {
            type Err = FieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_components::<$N>($what, s).map(Self)
            }
        }
    };
}

impl_linear!(Vector, 3, "vector");
impl_linear!(Tensor, 9, "tensor");
impl_linear!(SymmTensor, 6, "symmTensor");

// ============================================================================
// 矢量
// ============================================================================

impl Vector {
    /// x 方向单位矢量
    pub const X: Self = Self([1.0, 0.0, 0.0]);
    /// y 方向单位矢量
    pub const Y: Self = Self([0.0, 1.0, 0.0]);
    /// z 方向单位矢量
    pub const Z: Self = Self([0.0, 0.0, 1.0]);

    /// 由分量构造矢量
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    /// x 分量
    #[inline]
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    /// y 分量
    #[inline]
    pub fn y(&self) -> f64 {
        self.0[1]
    }

    /// z 分量
    #[inline]
    pub fn z(&self) -> f64 {
        self.0[2]
    }

    /// 欧几里得长度
    #[inline]
    pub fn mag(&self) -> f64 {
        self.to_dvec3().length()
    }

    /// 长度的平方
    #[inline]
    pub fn mag_sqr(&self) -> f64 {
        self.to_dvec3().length_squared()
    }

    /// 内积（点积）
    #[inline]
    pub fn dot(&self, other: &Vector) -> f64 {
        self.to_dvec3().dot(other.to_dvec3())
    }

    /// 叉积
    #[inline]
    pub fn cross(&self, other: &Vector) -> Vector {
        Self::from_dvec3(self.to_dvec3().cross(other.to_dvec3()))
    }

    #[inline]
    pub(crate) fn to_dvec3(self) -> DVec3 {
        DVec3::from_array(self.0)
    }

    #[inline]
    pub(crate) fn from_dvec3(v: DVec3) -> Self {
        Self(v.to_array())
    }
}

impl From<(f64, f64, f64)> for Vector {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<DVec3> for Vector {
    fn from(v: DVec3) -> Self {
        Self::from_dvec3(v)
    }
}

impl From<Vector> for DVec3 {
    fn from(v: Vector) -> Self {
        v.to_dvec3()
    }
}

impl BitAnd for Vector {
    type Output = f64;
    #[inline]
    fn bitand(self, rhs: Vector) -> f64 {
        self.dot(&rhs)
    }
}

impl BitAnd<Tensor> for Vector {
    type Output = Vector;
    #[inline]
    fn bitand(self, rhs: Tensor) -> Vector {
        Vector::from_dvec3(rhs.to_dmat3().transpose() * self.to_dvec3())
    }
}

impl BitAnd<SymmTensor> for Vector {
    type Output = Vector;
    #[inline]
    fn bitand(self, rhs: SymmTensor) -> Vector {
        // 对称: v & S == S & v
        rhs & self
    }
}

impl BitXor for Vector {
    type Output = Vector;
    #[inline]
    fn bitxor(self, rhs: Vector) -> Vector {
        self.cross(&rhs)
    }
}

// ============================================================================
// 张量
// ============================================================================

impl Tensor {
    /// 单位张量
    pub const I: Self = Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// 由行主序分量构造张量
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        xx: f64,
        xy: f64,
        xz: f64,
        yx: f64,
        yy: f64,
        yz: f64,
        zx: f64,
        zy: f64,
        zz: f64,
    ) -> Self {
        Self([xx, xy, xz, yx, yy, yz, zx, zy, zz])
    }

    /// 由三个行矢量构造张量
    pub fn from_rows(x: Vector, y: Vector, z: Vector) -> Self {
        Self([
            x.0[0], x.0[1], x.0[2], y.0[0], y.0[1], y.0[2], z.0[0], z.0[1], z.0[2],
        ])
    }

    /// `(row, col)` 处的分量
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[3 * row + col]
    }

    /// 转置
    pub fn transpose(&self) -> Tensor {
        Self::from_dmat3(self.to_dmat3().transpose())
    }

    /// 对角线之和
    pub fn trace(&self) -> f64 {
        self.0[0] + self.0[4] + self.0[8]
    }

    /// 行列式
    pub fn det(&self) -> f64 {
        self.to_dmat3().determinant()
    }

    /// 对称部分 `(T + T^T) / 2`
    pub fn symm(&self) -> SymmTensor {
        let t = &self.0;
        SymmTensor([
            t[0],
            0.5 * (t[1] + t[3]),
            0.5 * (t[2] + t[6]),
            t[4],
            0.5 * (t[5] + t[7]),
            t[8],
        ])
    }

    /// Frobenius 范数
    #[inline]
    pub fn mag(&self) -> f64 {
        self.mag_sqr().sqrt()
    }

    /// Frobenius 范数的平方
    #[inline]
    pub fn mag_sqr(&self) -> f64 {
        self.0.iter().map(|c| c * c).sum()
    }

    /// `DMat3` 为列主序，此处存储为行主序
    #[inline]
    pub(crate) fn to_dmat3(self) -> DMat3 {
        DMat3::from_cols_array(&self.0).transpose()
    }

    #[inline]
    pub(crate) fn from_dmat3(m: DMat3) -> Self {
        Self(m.transpose().to_cols_array())
    }
}

impl BitAnd<Vector> for Tensor {
    type Output = Vector;
    #[inline]
    fn bitand(self, rhs: Vector) -> Vector {
        Vector::from_dvec3(self.to_dmat3() * rhs.to_dvec3())
    }
}

impl BitAnd for Tensor {
    type Output = Tensor;
    #[inline]
    fn bitand(self, rhs: Tensor) -> Tensor {
        Tensor::from_dmat3(self.to_dmat3() * rhs.to_dmat3())
    }
}

// ============================================================================
// 对称张量
// ============================================================================

impl SymmTensor {
    /// 单位张量
    pub const I: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);

    /// 由独立分量构造对称张量
    #[inline]
    pub const fn new(xx: f64, xy: f64, xz: f64, yy: f64, yz: f64, zz: f64) -> Self {
        Self([xx, xy, xz, yy, yz, zz])
    }

    /// 展开为完整张量
    pub fn to_tensor(&self) -> Tensor {
        let [xx, xy, xz, yy, yz, zz] = self.0;
        Tensor::new(xx, xy, xz, xy, yy, yz, xz, yz, zz)
    }

    /// 对角线之和
    pub fn trace(&self) -> f64 {
        self.0[0] + self.0[3] + self.0[5]
    }

    /// 行列式
    pub fn det(&self) -> f64 {
        self.to_tensor().det()
    }

    /// 完整张量 Frobenius 范数的平方
    #[inline]
    pub fn mag_sqr(&self) -> f64 {
        let [xx, xy, xz, yy, yz, zz] = self.0;
        xx * xx + yy * yy + zz * zz + 2.0 * (xy * xy + xz * xz + yz * yz)
    }

    /// 完整张量的 Frobenius 范数
    #[inline]
    pub fn mag(&self) -> f64 {
        self.mag_sqr().sqrt()
    }
}

impl From<SymmTensor> for Tensor {
    fn from(s: SymmTensor) -> Self {
        s.to_tensor()
    }
}

impl BitAnd<Vector> for SymmTensor {
    type Output = Vector;
    #[inline]
    fn bitand(self, rhs: Vector) -> Vector {
        self.to_tensor() & rhs
    }
}
