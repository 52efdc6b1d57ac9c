// apps/ff_cli/src/main.rs

//! foamfield 命令行界面
//!
//! 场表达式基准测试与算例文件检查。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// foamfield 场表达式工具
#[derive(Parser)]
#[command(name = "foamfield")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deferred-evaluation field expressions with dimension checking", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 对参考表达式计时
    Bench(commands::bench::BenchArgs),
    /// 显示版本与命名量纲集
    Info(commands::info::InfoArgs),
    /// 验证算例文件
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // try_init 同时转发库 crate 的 `log` 记录
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::Bench(args) => commands::bench::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
