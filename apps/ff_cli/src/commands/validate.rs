// apps/ff_cli/src/commands/validate.rs

//! 算例文件验证
//!
//! 错误来自 `CaseConfig::validate`；警告标记可以加载但看起来可疑的值。

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use ff_config::{CaseConfig, ConstantValue};
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 算例文件
    pub config: PathBuf,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== case file validation ===");

    let mut result = ValidationResult::default();
    validate_case(&args.config, &mut result)?;
    print_validation_result(&result, args.strict)
}

fn validate_case(path: &Path, result: &mut ValidationResult) -> Result<()> {
    println!("checking {}", path.display());

    if !path.exists() {
        result.add_error(format!("file not found: {}", path.display()));
        return Ok(());
    }

    let content = std::fs::read_to_string(path).context("cannot read case file")?;
    let config = match CaseConfig::from_json_str(&content) {
        Ok(config) => config,
        Err(e) => {
            result.add_error(e.to_string());
            return Ok(());
        }
    };

    check_warnings(&config, result);
    match config.constant_table() {
        Ok(table) => println!("  {} constants resolved", table.len()),
        Err(e) => result.add_error(e.to_string()),
    }
    Ok(())
}

fn check_warnings(config: &CaseConfig, result: &mut ValidationResult) {
    if config.constants.is_empty() {
        result.add_warning("no constants defined");
    }
    for entry in &config.constants {
        if let ConstantValue::Scalar(v) = entry.value {
            if v == 0.0 {
                result.add_warning(format!("constant '{}' is zero", entry.name));
            }
        }
    }
    if config.bench.n_elements < 1000 {
        result.add_warning(format!(
            "bench.n_elements = {} is too small for stable timings",
            config.bench.n_elements
        ));
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    for err in &result.errors {
        error!("{}", err);
        println!("  error: {}", err);
    }
    for warning in &result.warnings {
        warn!("{}", warning);
        println!("  warning: {}", warning);
    }

    if result.is_ok(strict) {
        println!("validation passed");
        Ok(())
    } else {
        bail!(
            "validation failed: {} errors, {} warnings",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
