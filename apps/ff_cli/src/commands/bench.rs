// apps/ff_cli/src/commands/bench.rs

//! 表达式基准测试
//!
//! 在均匀场上计算 `(x*y + b) / (a + 1)`（`x = a*b + c`，`y = d - a*c`），
//! 然后逐元素与纯 `f64` 上的同一公式比对。

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Args;
use ff_config::{BenchConfig, CaseConfig};
use ff_field::prelude::*;
use tracing::{debug, info};

/// 基准测试参数
#[derive(Args)]
pub struct BenchArgs {
    /// 提供 `bench` 段的算例文件
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 场长度（覆盖算例文件）
    #[arg(short, long)]
    pub n: Option<usize>,

    /// 计时次数（覆盖算例文件）
    #[arg(short, long)]
    pub repeats: Option<usize>,
}

/// 执行基准测试
pub fn execute(args: BenchArgs) -> Result<()> {
    let mut settings = match &args.config {
        Some(path) => {
            CaseConfig::from_file(path)
                .with_context(|| format!("cannot load case file {}", path.display()))?
                .bench
        }
        None => BenchConfig::default(),
    };
    if let Some(n) = args.n {
        settings.n_elements = n;
    }
    if let Some(repeats) = args.repeats {
        settings.repeats = repeats;
    }
    settings.validate()?;

    let [a0, b0, c0, d0] = settings.inputs;
    info!(
        "=== expression benchmark: {} elements, {} repeats ===",
        settings.n_elements, settings.repeats
    );

    let n = settings.n_elements;
    let a = Field::uniform(n, a0);
    let b = Field::uniform(n, b0);
    let c = Field::uniform(n, c0);
    let d = Field::uniform(n, d0);

    let mut result = ScalarField::new();
    let mut timings = Vec::with_capacity(settings.repeats);
    for i in 0..settings.repeats {
        let start = Instant::now();
        result = evaluate(&a, &b, &c, &d);
        let elapsed = start.elapsed();
        debug!("repeat {}: {:?}", i, elapsed);
        timings.push(elapsed);
    }

    let expected = reference(a0, b0, c0, d0);
    let worst = result
        .iter()
        .map(|&v| (v - expected).abs())
        .fold(0.0_f64, f64::max);
    if result.len() != n || worst > 1e-12 * expected.abs().max(1.0) {
        bail!("result deviates from scalar evaluation: expected {expected}, worst error {worst:e}");
    }

    let best = timings.iter().min().copied().unwrap_or_default();
    println!("elements      : {n}");
    println!("result        : {expected:.15}");
    println!("mean / repeat : {:?}", mean_duration(&timings));
    println!("best          : {best:?}");
    println!(
        "throughput    : {:.1} Melem/s",
        n as f64 / best.as_secs_f64().max(f64::EPSILON) / 1e6
    );
    Ok(())
}

fn mean_duration(timings: &[Duration]) -> Duration {
    if timings.is_empty() {
        return Duration::ZERO;
    }
    let total: Duration = timings.iter().sum();
    total.div_f64(timings.len() as f64)
}

fn evaluate(a: &ScalarField, b: &ScalarField, c: &ScalarField, d: &ScalarField) -> ScalarField {
    let x = a * b + c;
    let y = d - a * c;
    ((x * y + b) / (a + 1.0)).into_inner()
}

fn reference(a: f64, b: f64, c: f64, d: f64) -> f64 {
    let x = a * b + c;
    let y = d - a * c;
    (x * y + b) / (a + 1.0)
}
