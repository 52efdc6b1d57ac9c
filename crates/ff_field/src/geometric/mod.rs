// crates/ff_field/src/geometric/mod.rs

//! GeometricField - 带边界面片的命名有量纲场
//!
//! 几何场由内部 [`Field`]、有序的命名边界面片列表与 [`DimensionSet`] 组成。
//! 各部分按名称寻址：[`INTERNAL_FIELD`] 选择内部值，其他名称选择面片。
//!
//! # 布局
//!
//! 面片名称与长度在构造后固定，之后只有数值可变。
//! 两个几何场之间的算术要求布局相同，并逐部分调用逐元素内核。
//!
//! ```
//! use ff_field::prelude::*;
//!
//! let p = VolScalarField::uniform("p", dims::PRESSURE, 4, 1.0e5)
//!     .with_patch("inlet", Field::uniform(2, 1.2e5))?;
//! let rho = VolScalarField::uniform("rho", dims::DENSITY, 4, 1.0)
//!     .with_patch("inlet", Field::uniform(2, 1.0))?;
//!
//! let head = &p / &rho;
//! assert_eq!(head.name(), "(p/rho)");
//! assert_eq!(*head.dimensions(), dims::PRESSURE / dims::DENSITY);
//! assert_eq!(head.field("inlet")?[0], 1.2e5);
//! # Ok::<(), FieldError>(())
//! ```

mod ops;

pub use ops::{add, div, inner, mul, mul_left, neg, sub, GeometricOperand, IntoGeometricOperand};
pub(crate) use ops::map_geometric;

use ff_foundation::dimension::DimensionSet;
use ff_foundation::error::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::primitives::{SymmTensor, Tensor, Vector};
use crate::value::FieldValue;

/// [`GeometricField::field`] 中选择内部值的名称
pub const INTERNAL_FIELD: &str = "internalField";

/// 单个命名边界面片上的值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchField<T> {
    name: String,
    values: Field<T>,
}

impl<T: FieldValue> PatchField<T> {
    /// 创建面片
    pub fn new(name: impl Into<String>, values: Field<T>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// 面片名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 面片数值
    pub fn values(&self) -> &Field<T> {
        &self.values
    }

    /// 面数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 面片是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 带边界面片的命名有量纲场
///
/// 反序列化执行与 [`GeometricField::with_patch`] 相同的面片名称检查。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "GeometricFieldData<T>",
    bound(deserialize = "T: FieldValue + Deserialize<'de>")
)]
pub struct GeometricField<T> {
    name: String,
    dimensions: DimensionSet,
    internal: Field<T>,
    boundary: Vec<PatchField<T>>,
}

/// [`GeometricField`] 未经检查的序列化形式
#[derive(Deserialize)]
struct GeometricFieldData<T> {
    name: String,
    dimensions: DimensionSet,
    internal: Field<T>,
    #[serde(default)]
    boundary: Vec<PatchField<T>>,
}

impl<T: FieldValue> TryFrom<GeometricFieldData<T>> for GeometricField<T> {
    type Error = FieldError;

    fn try_from(data: GeometricFieldData<T>) -> FieldResult<Self> {
        data.boundary.into_iter().try_fold(
            Self::new(data.name, data.dimensions, data.internal),
            |field, patch| field.with_patch(patch.name, patch.values),
        )
    }
}

/// 单元中心标量场
pub type VolScalarField = GeometricField<f64>;
/// 单元中心矢量场
pub type VolVectorField = GeometricField<Vector>;
/// 单元中心张量场
pub type VolTensorField = GeometricField<Tensor>;
/// 单元中心对称张量场
pub type VolSymmTensorField = GeometricField<SymmTensor>;

impl<T: FieldValue> GeometricField<T> {
    /// 无边界面片的场
    pub fn new(name: impl Into<String>, dimensions: DimensionSet, internal: Field<T>) -> Self {
        Self {
            name: name.into(),
            dimensions,
            internal,
            boundary: Vec::new(),
        }
    }

    /// `n_cells` 个 `value`，无面片
    pub fn uniform(name: impl Into<String>, dimensions: DimensionSet, n_cells: usize, value: T) -> Self {
        Self::new(name, dimensions, Field::uniform(n_cells, value))
    }

    /// 追加边界面片
    pub fn with_patch(mut self, name: impl Into<String>, values: Field<T>) -> FieldResult<Self> {
        let name = name.into();
        if name == INTERNAL_FIELD || self.patch(&name).is_some() {
            return Err(FieldError::invalid_operation(
                "with_patch",
                format!("patch name '{name}' is already used in '{}'", self.name),
            ));
        }
        self.boundary.push(PatchField { name, values });
        Ok(self)
    }

    /// 场名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 以新名称返回同一场
    pub fn renamed(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// 物理量纲
    pub fn dimensions(&self) -> &DimensionSet {
        &self.dimensions
    }

    /// 内部值
    pub fn internal_field(&self) -> &Field<T> {
        &self.internal
    }

    /// 可变内部值；长度固定
    pub fn internal_field_mut(&mut self) -> &mut [T] {
        self.internal.as_mut_slice()
    }

    /// 按声明顺序的边界面片
    pub fn boundary(&self) -> &[PatchField<T>] {
        &self.boundary
    }

    /// 按声明顺序的面片名称
    pub fn patch_names(&self) -> impl Iterator<Item = &str> {
        self.boundary.iter().map(|p| p.name.as_str())
    }

    fn patch(&self, name: &str) -> Option<&PatchField<T>> {
        self.boundary.iter().find(|p| p.name == name)
    }

    /// 按名称获取内部值或面片
    pub fn field(&self, name: &str) -> FieldResult<&Field<T>> {
        if name == INTERNAL_FIELD {
            return Ok(&self.internal);
        }
        self.patch(name)
            .map(|p| &p.values)
            .ok_or_else(|| FieldError::patch_not_found(self.name.clone(), name))
    }

    /// 按名称获取可变内部值或面片；长度固定
    pub fn field_mut(&mut self, name: &str) -> FieldResult<&mut [T]> {
        self.part_mut(name).map(Field::as_mut_slice)
    }

    fn part_mut(&mut self, name: &str) -> FieldResult<&mut Field<T>> {
        if name == INTERNAL_FIELD {
            return Ok(&mut self.internal);
        }
        let field_name = &self.name;
        self.boundary
            .iter_mut()
            .find(|p| p.name == name)
            .map(|p| &mut p.values)
            .ok_or_else(|| FieldError::patch_not_found(field_name.clone(), name))
    }

    /// 替换某部分的值；长度不得改变
    pub fn set_field(&mut self, name: &str, values: Field<T>) -> FieldResult<()> {
        let target = self.part_mut(name)?;
        FieldError::check_length("set_field", target.len(), values.len())?;
        *target = values;
        Ok(())
    }

    /// 复制 `other` 的全部值，量纲与面片布局必须一致
    pub fn assign(&mut self, other: &GeometricField<T>) -> FieldResult<()> {
        FieldError::check_dimensions("assign", &self.dimensions, &other.dimensions)?;
        check_layout("assign", self, other)?;
        self.internal.assign(&other.internal);
        for (patch, source) in self.boundary.iter_mut().zip(&other.boundary) {
            patch.values.assign(&source.values);
        }
        Ok(())
    }

    /// 依次为内部值与各面片值
    pub(crate) fn parts(&self) -> impl Iterator<Item = &Field<T>> {
        std::iter::once(&self.internal).chain(self.boundary.iter().map(|p| &p.values))
    }

    pub(crate) fn into_parts(self) -> impl Iterator<Item = Field<T>> {
        std::iter::once(self.internal).chain(self.boundary.into_iter().map(|p| p.values))
    }

    /// 按 [`Self::parts`] 的顺序由各部分重组场
    pub(crate) fn from_parts(
        name: String,
        dimensions: DimensionSet,
        patch_names: Vec<String>,
        parts: Vec<Field<T>>,
    ) -> Self {
        let mut parts = parts.into_iter();
        let internal = parts.next().unwrap_or_default();
        let boundary = patch_names
            .into_iter()
            .zip(parts)
            .map(|(name, values)| PatchField { name, values })
            .collect();
        Self {
            name,
            dimensions,
            internal,
            boundary,
        }
    }
}

/// 两场内部长度与面片不一致时失败
pub(crate) fn check_layout<A: FieldValue, B: FieldValue>(
    operation: &'static str,
    lhs: &GeometricField<A>,
    rhs: &GeometricField<B>,
) -> FieldResult<()> {
    FieldError::check_length(operation, lhs.internal.len(), rhs.internal.len())?;
    let same_names = lhs.boundary.len() == rhs.boundary.len()
        && lhs.patch_names().zip(rhs.patch_names()).all(|(a, b)| a == b);
    if !same_names {
        return Err(FieldError::patch_mismatch(
            operation,
            format!(
                "'{}' has [{}], '{}' has [{}]",
                lhs.name,
                lhs.patch_names().collect::<Vec<_>>().join(" "),
                rhs.name,
                rhs.patch_names().collect::<Vec<_>>().join(" "),
            ),
        ));
    }
    for (a, b) in lhs.boundary.iter().zip(&rhs.boundary) {
        FieldError::check_length(operation, a.len(), b.len())?;
    }
    Ok(())
}
