// crates/ff_foundation/src/dimension.rs

//! 物理量纲集
//!
//! [`DimensionSet`] 保存 SI 基本量纲的七个指数
//! （质量、长度、时间、温度、物质的量、电流、发光强度）。
//! 单位是符号性的：不含量值，也不做单位换算。
//!
//! # 用法
//!
//! ```
//! use ff_foundation::dimension::{dims, DimensionSet};
//!
//! assert_eq!(dims::FORCE / dims::AREA, dims::PRESSURE);
//! assert_eq!(dims::LENGTH.pow(3.0), dims::VOLUME);
//!
//! let p: DimensionSet = "[1 -1 -2 0 0 0 0]".parse().unwrap();
//! assert_eq!(p, dims::PRESSURE);
//! ```
//!
//! # 设计说明
//!
//! - 指数为 `f64`，使 `sqrt` 保持封闭；相等比较容许 [`SMALL_EXPONENT`] 的舍入误差
//! - 有量纲操作数之间的 `+`/`-` 经由 [`DimensionSet::matching`]，
//!   在运算处报告 `DimensionMismatch`

use crate::error::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Div, Mul};
use std::str::FromStr;

/// 指数差低于此值时两量纲集视为相等
pub const SMALL_EXPONENT: f64 = 1e-12;

/// 基本量纲个数
pub const N_BASE_DIMENSIONS: usize = 7;

/// 按存储顺序的 SI 基本量纲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseDimension {
    /// 质量
    Mass = 0,
    /// 长度
    Length = 1,
    /// 时间
    Time = 2,
    /// 温度
    Temperature = 3,
    /// 物质的量
    Moles = 4,
    /// 电流
    Current = 5,
    /// 发光强度
    LuminousIntensity = 6,
}

impl BaseDimension {
    /// 按存储顺序的全部基本量纲
    pub const ALL: [BaseDimension; N_BASE_DIMENSIONS] = [
        Self::Mass,
        Self::Length,
        Self::Time,
        Self::Temperature,
        Self::Moles,
        Self::Current,
        Self::LuminousIntensity,
    ];

    /// 小写名称
    pub fn name(self) -> &'static str {
        match self {
            Self::Mass => "mass",
            Self::Length => "length",
            Self::Time => "time",
            Self::Temperature => "temperature",
            Self::Moles => "moles",
            Self::Current => "current",
            Self::LuminousIntensity => "luminousIntensity",
        }
    }

    /// SI 单位符号
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Mass => "kg",
            Self::Length => "m",
            Self::Time => "s",
            Self::Temperature => "K",
            Self::Moles => "mol",
            Self::Current => "A",
            Self::LuminousIntensity => "cd",
        }
    }
}

/// 七个基本量纲的指数
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSet {
    exponents: [f64; N_BASE_DIMENSIONS],
}

impl DimensionSet {
    /// 按存储顺序由七个指数构造量纲集
    pub const fn new(
        mass: f64,
        length: f64,
        time: f64,
        temperature: f64,
        moles: f64,
        current: f64,
        luminous_intensity: f64,
    ) -> Self {
        Self {
            exponents: [
                mass,
                length,
                time,
                temperature,
                moles,
                current,
                luminous_intensity,
            ],
        }
    }

    /// 由指数数组构造量纲集
    pub const fn from_exponents(exponents: [f64; N_BASE_DIMENSIONS]) -> Self {
        Self { exponents }
    }

    /// 由 5 个或 7 个指数构造量纲集；缺失的末尾项为零
    pub fn from_slice(exponents: &[f64]) -> FieldResult<Self> {
        match exponents.len() {
            5 | N_BASE_DIMENSIONS => {
                let mut out = [0.0; N_BASE_DIMENSIONS];
                out[..exponents.len()].copy_from_slice(exponents);
                Ok(Self { exponents: out })
            }
            n => Err(FieldError::parse(
                "dimension set",
                format!("{exponents:?}"),
                format!("expected 5 or 7 exponents, got {n}"),
            )),
        }
    }

    /// 无量纲集
    pub const fn dimless() -> Self {
        Self {
            exponents: [0.0; N_BASE_DIMENSIONS],
        }
    }

    /// 按存储顺序的全部指数
    #[inline]
    pub fn exponents(&self) -> [f64; N_BASE_DIMENSIONS] {
        self.exponents
    }

    /// 单个基本量纲的指数
    #[inline]
    pub fn exponent(&self, base: BaseDimension) -> f64 {
        self.exponents[base as usize]
    }

    /// 所有指数是否为零
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|e| e.abs() < SMALL_EXPONENT)
    }

    /// 所有指数乘以 `n`
    pub fn pow(self, n: f64) -> Self {
        Self {
            exponents: self.exponents.map(|e| e * n),
        }
    }

    /// 平方根：所有指数减半
    pub fn sqrt(self) -> Self {
        self.pow(0.5)
    }

    /// 倒数：所有指数取负
    pub fn reciprocal(self) -> Self {
        self.pow(-1.0)
    }

    /// 两量纲集一致时返回 `self`，供 `+` 与 `-` 使用
    pub fn matching(&self, other: &Self, operation: &'static str) -> FieldResult<Self> {
        FieldError::check_dimensions(operation, self, other)?;
        Ok(*self)
    }

    /// SI 单位字符串，如 `kg m^-1 s^-2`；无量纲集为空
    pub fn si_units(&self) -> String {
        BaseDimension::ALL
            .iter()
            .filter(|&&base| self.exponent(base).abs() >= SMALL_EXPONENT)
            .map(|&base| {
                let e = self.exponent(base);
                if (e - 1.0).abs() < SMALL_EXPONENT {
                    base.symbol().to_string()
                } else {
                    format!("{}^{}", base.symbol(), Exponent(e))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PartialEq for DimensionSet {
    fn eq(&self, other: &Self) -> bool {
        self.exponents
            .iter()
            .zip(other.exponents.iter())
            .all(|(a, b)| (a - b).abs() < SMALL_EXPONENT)
    }
}

impl Mul for DimensionSet {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut exponents = self.exponents;
        for (e, r) in exponents.iter_mut().zip(rhs.exponents) {
            *e += r;
        }
        Self { exponents }
    }
}

impl Div for DimensionSet {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let mut exponents = self.exponents;
        for (e, r) in exponents.iter_mut().zip(rhs.exponents) {
            *e -= r;
        }
        Self { exponents }
    }
}

/// 格式化指数，不输出末尾 `.0` 与负零
struct Exponent(f64);

impl fmt::Display for Exponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.abs() < SMALL_EXPONENT {
            write!(f, "0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for DimensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.exponents.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", Exponent(*e))?;
        }
        write!(f, "]")
    }
}

impl FromStr for DimensionSet {
    type Err = FieldError;

    /// 解析 `[m l t T n I J]` 或简写形式 `[m l t T n]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| FieldError::parse("dimension set", s, "expected '[...]'"))?;

        let exponents = inner
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|e| {
                    FieldError::parse("dimension set", s, format!("'{token}': {e}"))
                })
            })
            .collect::<FieldResult<Vec<f64>>>()?;

        Self::from_slice(&exponents).map_err(|_| {
            FieldError::parse(
                "dimension set",
                s,
                format!("expected 5 or 7 exponents, got {}", exponents.len()),
            )
        })
    }
}

/// 采用标准 SI 导出指数的命名量纲集
pub mod dims {
    use super::DimensionSet;

    /// `[0 0 0 0 0 0 0]`
    pub const DIMLESS: DimensionSet = DimensionSet::dimless();
    /// `[1 0 0 0 0 0 0]`
    pub const MASS: DimensionSet = DimensionSet::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// `[0 1 0 0 0 0 0]`
    pub const LENGTH: DimensionSet = DimensionSet::new(0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// `[0 0 1 0 0 0 0]`
    pub const TIME: DimensionSet = DimensionSet::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
    /// `[0 0 0 1 0 0 0]`
    pub const TEMPERATURE: DimensionSet = DimensionSet::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0);
    /// `[0 0 0 0 1 0 0]`
    pub const MOLES: DimensionSet = DimensionSet::new(0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    /// `[0 0 0 0 0 1 0]`
    pub const CURRENT: DimensionSet = DimensionSet::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
    /// `[0 0 0 0 0 0 1]`
    pub const LUMINOUS_INTENSITY: DimensionSet =
        DimensionSet::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0);

    /// `[0 2 0 0 0 0 0]`
    pub const AREA: DimensionSet = DimensionSet::new(0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// `[0 3 0 0 0 0 0]`
    pub const VOLUME: DimensionSet = DimensionSet::new(0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// `[0 0 -1 0 0 0 0]`
    pub const RATE: DimensionSet = DimensionSet::new(0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0);
    /// `[0 1 -1 0 0 0 0]`
    pub const VELOCITY: DimensionSet = DimensionSet::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0, 0.0);
    /// `[0 1 -2 0 0 0 0]`
    pub const ACCELERATION: DimensionSet = DimensionSet::new(0.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0);
    /// `[1 -3 0 0 0 0 0]`
    pub const DENSITY: DimensionSet = DimensionSet::new(1.0, -3.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// `[1 1 -2 0 0 0 0]`
    pub const FORCE: DimensionSet = DimensionSet::new(1.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0);
    /// `[1 2 -2 0 0 0 0]`
    pub const ENERGY: DimensionSet = DimensionSet::new(1.0, 2.0, -2.0, 0.0, 0.0, 0.0, 0.0);
    /// `[1 2 -3 0 0 0 0]`
    pub const POWER: DimensionSet = DimensionSet::new(1.0, 2.0, -3.0, 0.0, 0.0, 0.0, 0.0);
    /// `[1 -1 -2 0 0 0 0]`
    pub const PRESSURE: DimensionSet = DimensionSet::new(1.0, -1.0, -2.0, 0.0, 0.0, 0.0, 0.0);
    /// 密度除以压力，`[0 -2 2 0 0 0 0]`
    pub const COMPRESSIBILITY: DimensionSet =
        DimensionSet::new(0.0, -2.0, 2.0, 0.0, 0.0, 0.0, 0.0);
    /// 单位质量单位温度的能量，`[0 2 -2 -1 0 0 0]`
    pub const GAS_CONSTANT: DimensionSet = DimensionSet::new(0.0, 2.0, -2.0, -1.0, 0.0, 0.0, 0.0);
    /// 指数同 [`GAS_CONSTANT`]
    pub const SPECIFIC_HEAT_CAPACITY: DimensionSet = GAS_CONSTANT;
    /// 运动粘度，`[0 2 -1 0 0 0 0]`
    pub const VISCOSITY: DimensionSet = DimensionSet::new(0.0, 2.0, -1.0, 0.0, 0.0, 0.0, 0.0);
    /// `[1 -1 -1 0 0 0 0]`
    pub const DYNAMIC_VISCOSITY: DimensionSet =
        DimensionSet::new(1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 0.0);

    /// 全部命名量纲集，以惯用的 `dimXxx` 名称为键
    pub const NAMED: &[(&str, DimensionSet)] = &[
        ("dimless", DIMLESS),
        ("dimMass", MASS),
        ("dimLength", LENGTH),
        ("dimTime", TIME),
        ("dimTemperature", TEMPERATURE),
        ("dimMoles", MOLES),
        ("dimCurrent", CURRENT),
        ("dimLuminousIntensity", LUMINOUS_INTENSITY),
        ("dimArea", AREA),
        ("dimVolume", VOLUME),
        ("dimRate", RATE),
        ("dimVelocity", VELOCITY),
        ("dimAcceleration", ACCELERATION),
        ("dimDensity", DENSITY),
        ("dimForce", FORCE),
        ("dimEnergy", ENERGY),
        ("dimPower", POWER),
        ("dimPressure", PRESSURE),
        ("dimCompressibility", COMPRESSIBILITY),
        ("dimGasConstant", GAS_CONSTANT),
        ("dimSpecificHeatCapacity", SPECIFIC_HEAT_CAPACITY),
        ("dimViscosity", VISCOSITY),
        ("dimDynamicViscosity", DYNAMIC_VISCOSITY),
    ];

    /// 查找命名量纲集，如 `lookup("dimPressure")`
    pub fn lookup(name: &str) -> Option<DimensionSet> {
        NAMED
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, dims)| *dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_sums_exponents() {
        let pa = dims::PRESSURE * dims::AREA;
        assert_eq!(pa.exponents(), [1.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(pa, dims::FORCE);
    }

    #[test]
    fn test_divide_subtracts_exponents() {
        assert_eq!(dims::FORCE / dims::AREA, dims::PRESSURE);
        assert_eq!(dims::LENGTH / dims::TIME, dims::VELOCITY);
        assert_eq!(dims::VELOCITY / dims::TIME, dims::ACCELERATION);
        assert_eq!(dims::DYNAMIC_VISCOSITY / dims::DENSITY, dims::VISCOSITY);
    }

    #[test]
    fn test_power() {
        assert_eq!(dims::LENGTH.pow(2.0), dims::AREA);
        assert_eq!(dims::LENGTH.pow(3.0), dims::VOLUME);
        assert_eq!(dims::AREA.sqrt(), dims::LENGTH);
        assert_eq!(dims::TIME.reciprocal(), dims::RATE);
    }

    #[test]
    fn test_derived_constants() {
        assert_eq!(dims::MASS * dims::ACCELERATION, dims::FORCE);
        assert_eq!(dims::FORCE * dims::LENGTH, dims::ENERGY);
        assert_eq!(dims::ENERGY / dims::TIME, dims::POWER);
        assert_eq!(dims::MASS / dims::VOLUME, dims::DENSITY);
        assert_eq!(dims::DENSITY / dims::PRESSURE, dims::COMPRESSIBILITY);
        assert_eq!(
            dims::ENERGY / dims::MASS / dims::TEMPERATURE,
            dims::GAS_CONSTANT
        );
    }

    #[test]
    fn test_equality_is_exponent_wise() {
        assert_ne!(dims::PRESSURE, dims::VELOCITY);
        assert_ne!(dims::MASS, dims::DIMLESS);
        assert!(dims::DIMLESS.is_dimensionless());
        assert!((dims::PRESSURE / dims::PRESSURE).is_dimensionless());
    }

    #[test]
    fn test_matching() {
        assert_eq!(
            dims::PRESSURE.matching(&dims::PRESSURE, "+").unwrap(),
            dims::PRESSURE
        );
        let err = dims::PRESSURE.matching(&dims::VELOCITY, "-").unwrap_err();
        assert!(matches!(err, FieldError::DimensionMismatch { operation: "-", .. }));
    }

    #[test]
    fn test_display() {
        assert_eq!(dims::PRESSURE.to_string(), "[1 -1 -2 0 0 0 0]");
        assert_eq!(dims::DIMLESS.to_string(), "[0 0 0 0 0 0 0]");
        assert_eq!(dims::LENGTH.sqrt().to_string(), "[0 0.5 0 0 0 0 0]");
        // 负零输出为零
        assert_eq!(dims::DIMLESS.reciprocal().to_string(), "[0 0 0 0 0 0 0]");
    }

    #[test]
    fn test_parse_seven_and_five() {
        let seven: DimensionSet = "[0 2 -1 0 0 0 0]".parse().unwrap();
        assert_eq!(seven, dims::VISCOSITY);

        let five: DimensionSet = " [1 -1 -2 0 0] ".parse().unwrap();
        assert_eq!(five, dims::PRESSURE);
    }

    #[test]
    fn test_parse_errors() {
        assert!("1 -1 -2 0 0 0 0".parse::<DimensionSet>().is_err());
        assert!("[1 -1 -2]".parse::<DimensionSet>().is_err());
        assert!("[1 x -2 0 0 0 0]".parse::<DimensionSet>().is_err());
    }

    #[test]
    fn test_si_units() {
        assert_eq!(dims::PRESSURE.si_units(), "kg m^-1 s^-2");
        assert_eq!(dims::MASS.si_units(), "kg");
        assert_eq!(dims::DIMLESS.si_units(), "");
    }

    #[test]
    fn test_lookup() {
        assert_eq!(dims::lookup("dimPressure"), Some(dims::PRESSURE));
        assert_eq!(dims::lookup("dimViscosity"), Some(dims::VISCOSITY));
        assert_eq!(dims::lookup("dimBogus"), None);
    }

    #[test]
    fn test_serde_as_array() {
        let json = serde_json::to_string(&dims::VELOCITY).unwrap();
        assert_eq!(json, "[0.0,1.0,-1.0,0.0,0.0,0.0,0.0]");
        let back: DimensionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dims::VELOCITY);
    }
}
