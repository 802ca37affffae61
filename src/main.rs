use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use nodeconv::BatchProcessor;

/// 把混合 scheme 的订阅链接列表转换成统一的节点描述 JSON
#[derive(Parser)]
#[command(name = "nodeconv", version)]
struct Cli {
    /// 输入文件，每行一条订阅链接
    input: PathBuf,
    /// 输出 JSON 文件
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let raw = fs::read(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    // 输入编码不保证合法，按 lossy UTF-8 读，行内坏字节不致命
    let content = String::from_utf8_lossy(&raw);

    let mut processor = BatchProcessor::new();
    let (descriptors, summary) = processor.process(content.lines());

    let json = serde_json::to_string_pretty(&descriptors)?;
    fs::write(&cli.output, json)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(
        total = summary.total,
        converted = summary.converted,
        failed = summary.failed,
        "conversion finished"
    );
    println!(
        "processed {} lines, converted {} nodes ({} failed), saved to {}",
        summary.total,
        summary.converted,
        summary.failed,
        cli.output.display()
    );
    Ok(())
}
