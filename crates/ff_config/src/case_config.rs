// crates/ff_config/src/case_config.rs

//! 算例配置
//!
//! 算例文件为 JSON，包含两个段：
//!
//! ```json
//! {
//!   "constants": [
//!     { "name": "nu", "dimensions": "dimViscosity", "value": 1e-5 },
//!     { "name": "p0", "dimensions": [1, -1, -2, 0, 0, 0, 0], "value": 101325.0 },
//!     { "name": "g", "dimensions": "[0 1 -2 0 0 0 0]", "value": [0.0, -9.81, 0.0] }
//!   ],
//!   "bench": { "n_elements": 1000000, "repeats": 5 }
//! }
//! ```
//!
//! 两个段均可省略；缺失的基准测试键取默认值。

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ff_field::primitives::Vector;
use ff_foundation::dimension::{dims, DimensionSet};
use ff_foundation::error::{FieldError, FieldResult};

use crate::constants::ConstantTable;
use crate::error::{ConfigError, ConfigResult};

// ============================================================
// 常量条目
// ============================================================

/// 算例文件中书写的常量量纲
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionSpec {
    /// 5 个或 7 个指数
    Exponents(Vec<f64>),
    /// `"[0 2 -1 0 0 0 0]"` 或命名量纲集，如 `"dimPressure"`
    Text(String),
}

impl DimensionSpec {
    /// 将书写形式解析为量纲集
    pub fn resolve(&self) -> FieldResult<DimensionSet> {
        match self {
            Self::Exponents(exponents) => DimensionSet::from_slice(exponents),
            Self::Text(text) if text.trim_start().starts_with('[') => text.parse(),
            Self::Text(text) => dims::lookup(text.trim()).ok_or_else(|| {
                FieldError::parse("dimension set", text.as_str(), "unknown named dimension set")
            }),
        }
    }
}

impl From<DimensionSet> for DimensionSpec {
    fn from(dimensions: DimensionSet) -> Self {
        Self::Exponents(dimensions.exponents().to_vec())
    }
}

/// 常量值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    /// 标量
    Scalar(f64),
    /// 三分量
    Vector([f64; 3]),
}

impl ConstantValue {
    fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(v) => v.is_finite(),
            Self::Vector(v) => v.iter().all(|c| c.is_finite()),
        }
    }

    /// 若为矢量则返回矢量形式
    pub fn as_vector(&self) -> Option<Vector> {
        match *self {
            Self::Vector([x, y, z]) => Some(Vector::new(x, y, z)),
            Self::Scalar(_) => None,
        }
    }
}

/// 单个命名常量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantEntry {
    /// 常量名，在算例内唯一
    pub name: String,
    /// 量纲
    pub dimensions: DimensionSpec,
    /// 值
    pub value: ConstantValue,
    /// 说明文字
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ConstantEntry {
    /// 标量条目
    pub fn scalar(name: impl Into<String>, dimensions: DimensionSet, value: f64) -> Self {
        Self {
            name: name.into(),
            dimensions: dimensions.into(),
            value: ConstantValue::Scalar(value),
            description: String::new(),
        }
    }

    /// 矢量条目
    pub fn vector(name: impl Into<String>, dimensions: DimensionSet, value: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            dimensions: dimensions.into(),
            value: ConstantValue::Vector(value),
            description: String::new(),
        }
    }
}

// ============================================================
// 基准测试设置
// ============================================================

/// 表达式基准测试设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// 场长度
    #[serde(default = "default_n_elements")]
    pub n_elements: usize,
    /// 计时次数
    #[serde(default = "default_repeats")]
    pub repeats: usize,
    /// `a`、`b`、`c`、`d` 的均匀值
    #[serde(default = "default_inputs")]
    pub inputs: [f64; 4],
}

fn default_n_elements() -> usize { 1_000_000 }
fn default_repeats() -> usize { 5 }
fn default_inputs() -> [f64; 4] { [1.1, 2.2, 3.3, 4.4] }

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            n_elements: default_n_elements(),
            repeats: default_repeats(),
            inputs: default_inputs(),
        }
    }
}

impl BenchConfig {
    /// 检查取值范围
    pub fn validate(&self) -> ConfigResult<()> {
        if self.n_elements == 0 {
            return Err(ConfigError::invalid("bench.n_elements", self.n_elements, "must be positive"));
        }
        if self.repeats == 0 {
            return Err(ConfigError::invalid("bench.repeats", self.repeats, "must be positive"));
        }
        if let Some(v) = self.inputs.iter().find(|v| !v.is_finite()) {
            return Err(ConfigError::invalid("bench.inputs", v, "must be finite"));
        }
        if self.inputs[0] == -1.0 {
            return Err(ConfigError::invalid("bench.inputs", self.inputs[0], "a + 1 must be non-zero"));
        }
        Ok(())
    }
}

// ============================================================
// 算例文件
// ============================================================

/// 完整算例配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseConfig {
    /// 命名常量
    #[serde(default)]
    pub constants: Vec<ConstantEntry>,
    /// 基准测试设置
    #[serde(default)]
    pub bench: BenchConfig,
}

impl CaseConfig {
    /// 加载并验证算例文件
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        log::debug!(
            "loaded case file {} with {} constants",
            path.display(),
            config.constants.len()
        );
        Ok(config)
    }

    /// 解析并验证 JSON 文本
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 检查名称、量纲、数值与基准测试范围
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for entry in &self.constants {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::invalid("constants.name", &entry.name, "must not be empty"));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::Duplicate(entry.name.clone()));
            }
            entry.dimensions.resolve()?;
            if !entry.value.is_finite() {
                return Err(ConfigError::invalid(
                    format!("constants.{}.value", entry.name),
                    format!("{:?}", entry.value),
                    "must be finite",
                ));
            }
        }
        self.bench.validate()
    }

    /// 写出格式化的 JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 构建有量纲常量查找表
    pub fn constant_table(&self) -> ConfigResult<ConstantTable> {
        ConstantTable::from_entries(&self.constants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CaseConfig::default();
        assert!(config.constants.is_empty());
        assert_eq!(config.bench.n_elements, 1_000_000);
        assert_eq!(config.bench.inputs, [1.1, 2.2, 3.3, 4.4]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dimension_spec_forms() {
        let exponents = DimensionSpec::Exponents(vec![1.0, -1.0, -2.0, 0.0, 0.0]);
        assert_eq!(exponents.resolve().unwrap(), dims::PRESSURE);

        let text = DimensionSpec::Text("[0 2 -1 0 0 0 0]".into());
        assert_eq!(text.resolve().unwrap(), dims::VISCOSITY);

        let named = DimensionSpec::Text("dimAcceleration".into());
        assert_eq!(named.resolve().unwrap(), dims::ACCELERATION);

        assert!(DimensionSpec::Text("dimNothing".into()).resolve().is_err());
        assert!(DimensionSpec::Exponents(vec![1.0]).resolve().is_err());
    }

    #[test]
    fn test_untagged_parsing() {
        let json = r#"{
            "constants": [
                { "name": "p0", "dimensions": "dimPressure", "value": 101325.0 },
                { "name": "g", "dimensions": [0, 1, -2, 0, 0], "value": [0.0, -9.81, 0.0] }
            ],
            "bench": { "repeats": 2 }
        }"#;
        let config = CaseConfig::from_json_str(json).unwrap();
        assert_eq!(config.constants[0].value, ConstantValue::Scalar(101325.0));
        assert_eq!(config.constants[1].value.as_vector(), Some(Vector::new(0.0, -9.81, 0.0)));
        assert_eq!(config.bench.repeats, 2);
        assert_eq!(config.bench.n_elements, 1_000_000);
    }

    #[test]
    fn test_invalid_bench() {
        let mut config = CaseConfig::default();
        config.bench.n_elements = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));

        let mut config = CaseConfig::default();
        config.bench.inputs[0] = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_names() {
        let config = CaseConfig {
            constants: vec![
                ConstantEntry::scalar("rho", dims::DENSITY, 1000.0),
                ConstantEntry::scalar("rho", dims::DENSITY, 998.0),
            ],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Duplicate(name)) if name == "rho"));
    }

    #[test]
    fn test_bad_dimension_text() {
        let json = r#"{ "constants": [ { "name": "x", "dimensions": "[1 2", "value": 1.0 } ] }"#;
        assert!(matches!(CaseConfig::from_json_str(json), Err(ConfigError::Field(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = CaseConfig {
            constants: vec![ConstantEntry::vector("g", dims::ACCELERATION, [0.0, -9.81, 0.0])],
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CaseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
