// crates/ff_config/src/error.rs

//! 配置层错误类型

use ff_foundation::error::FieldError;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 读写算例文件时的 IO 错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 格式错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 无效值
    #[error("invalid value for '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },

    /// 缺失条目
    #[error("missing entry: {0}")]
    Missing(String),

    /// 常量重名
    #[error("duplicate constant '{0}'")]
    Duplicate(String),

    /// 量纲文本或场构造失败
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl ConfigError {
    /// [`ConfigError::InvalidValue`] 的简写
    pub fn invalid(key: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// 配置结果
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("bench.n_elements", 0, "must be positive");
        let msg = err.to_string();
        assert!(msg.contains("bench.n_elements"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_field_error_is_transparent() {
        let err: ConfigError = FieldError::parse("dimension set", "[1 2]", "too short").into();
        assert!(matches!(err, ConfigError::Field(_)));
        assert!(err.to_string().contains("[1 2]"));
    }
}
