// apps/ff_cli/src/commands/info.rs

//! 信息显示命令

use anyhow::Result;
use clap::Args;
use ff_foundation::dimension::dims;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 仅显示命名量纲集
    #[arg(long)]
    pub dims: bool,
}

/// 打印版本与构建信息，随后打印命名量纲集
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== foamfield info ===");

    if !args.dims {
        print_system_info();
        println!();
    }
    print_dimension_table();
    Ok(())
}

fn print_system_info() {
    println!("foamfield version : {}", env!("CARGO_PKG_VERSION"));
    println!("target            : {}-{}", std::env::consts::ARCH, std::env::consts::OS);
    println!("worker threads    : {}", rayon::current_num_threads());
    println!("element types     : scalar, vector, tensor, symmTensor");
}

fn print_dimension_table() {
    println!("{:<26} {:<22} SI units", "name", "exponents");
    for (name, set) in dims::NAMED {
        let units = set.si_units();
        let units = if units.is_empty() { "-".to_string() } else { units };
        println!("{:<26} {:<22} {}", name, set.to_string(), units);
    }
}
