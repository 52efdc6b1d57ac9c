// crates/ff_config/src/constants.rs

//! 从算例文件加载的命名有量纲常量

use std::collections::BTreeMap;

use ff_field::dimensioned::{DimensionedScalar, DimensionedVector};
use ff_field::primitives::Vector;

use crate::case_config::{ConstantEntry, ConstantValue};
use crate::error::{ConfigError, ConfigResult};

/// 标量与矢量常量查找表
///
/// 名称在两类之间唯一。
#[derive(Debug, Clone, Default)]
pub struct ConstantTable {
    scalars: BTreeMap<String, DimensionedScalar>,
    vectors: BTreeMap<String, DimensionedVector>,
}

impl ConstantTable {
    /// 空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析全部条目
    pub fn from_entries(entries: &[ConstantEntry]) -> ConfigResult<Self> {
        let mut table = Self::new();
        for entry in entries {
            let dimensions = entry.dimensions.resolve()?;
            let name = entry.name.as_str();
            match entry.value {
                ConstantValue::Scalar(v) => {
                    table.insert_scalar(DimensionedScalar::new(name, dimensions, v))?;
                }
                ConstantValue::Vector([x, y, z]) => {
                    let value = Vector::new(x, y, z);
                    table.insert_vector(DimensionedVector::new(name, dimensions, value))?;
                }
            }
        }
        log::debug!(
            "constant table: {} scalars, {} vectors",
            table.scalars.len(),
            table.vectors.len()
        );
        Ok(table)
    }

    fn check_free(&self, name: &str) -> ConfigResult<()> {
        if self.contains(name) {
            return Err(ConfigError::Duplicate(name.to_string()));
        }
        Ok(())
    }

    /// 添加标量常量
    pub fn insert_scalar(&mut self, value: DimensionedScalar) -> ConfigResult<()> {
        self.check_free(value.name())?;
        self.scalars.insert(value.name().to_string(), value);
        Ok(())
    }

    /// 添加矢量常量
    pub fn insert_vector(&mut self, value: DimensionedVector) -> ConfigResult<()> {
        self.check_free(value.name())?;
        self.vectors.insert(value.name().to_string(), value);
        Ok(())
    }

    /// 是否存在同名常量（任一类）
    pub fn contains(&self, name: &str) -> bool {
        self.scalars.contains_key(name) || self.vectors.contains_key(name)
    }

    /// 按名称获取标量常量
    pub fn scalar(&self, name: &str) -> Option<&DimensionedScalar> {
        self.scalars.get(name)
    }

    /// 按名称获取矢量常量
    pub fn vector(&self, name: &str) -> Option<&DimensionedVector> {
        self.vectors.get(name)
    }

    /// 同 [`scalar`](Self::scalar)，但名称缺失时返回错误
    pub fn lookup_scalar(&self, name: &str) -> ConfigResult<&DimensionedScalar> {
        self.scalar(name)
            .ok_or_else(|| ConfigError::Missing(format!("scalar constant '{name}'")))
    }

    /// 同 [`vector`](Self::vector)，但名称缺失时返回错误
    pub fn lookup_vector(&self, name: &str) -> ConfigResult<&DimensionedVector> {
        self.vector(name)
            .ok_or_else(|| ConfigError::Missing(format!("vector constant '{name}'")))
    }

    /// 常量数量
    pub fn len(&self) -> usize {
        self.scalars.len() + self.vectors.len()
    }

    /// 表是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 全部名称，标量在前，各组内有序
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scalars.keys().chain(self.vectors.keys()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_foundation::dimension::dims;

    fn entries() -> Vec<ConstantEntry> {
        vec![
            ConstantEntry::scalar("p0", dims::PRESSURE, 101325.0),
            ConstantEntry::vector("g", dims::ACCELERATION, [0.0, -9.81, 0.0]),
        ]
    }

    #[test]
    fn test_lookup() {
        let table = ConstantTable::from_entries(&entries()).unwrap();
        assert_eq!(table.len(), 2);

        let p0 = table.lookup_scalar("p0").unwrap();
        assert_eq!(*p0.dimensions(), dims::PRESSURE);
        assert_eq!(*p0.value(), 101325.0);

        let g = table.lookup_vector("g").unwrap();
        assert_eq!(*g.value(), Vector::new(0.0, -9.81, 0.0));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["p0", "g"]);
    }

    #[test]
    fn test_missing_and_wrong_kind() {
        let table = ConstantTable::from_entries(&entries()).unwrap();
        assert!(matches!(table.lookup_scalar("rho"), Err(ConfigError::Missing(_))));
        assert!(table.lookup_scalar("g").is_err());
        assert!(table.vector("p0").is_none());
    }

    #[test]
    fn test_names_unique_across_kinds() {
        let mut table = ConstantTable::new();
        table
            .insert_scalar(DimensionedScalar::new("g", dims::ACCELERATION, 9.81))
            .unwrap();
        let err = table
            .insert_vector(DimensionedVector::new("g", dims::ACCELERATION, Vector::Y))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Duplicate(_)));
    }
}
