//! rsbritta 命令行入口：读取规则文件，输出 Gmail 过滤器 XML

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use rsbritta::{ConfigManager, GlobalConfig, RuleLoader, generate_xml};

/// 将 YAML / JSON / TOML 规则文件编译为 Gmail 过滤器导入 XML
#[derive(Parser, Debug)]
#[command(name = "rsbritta", version)]
#[command(about = "Compile mail filter rules into a Gmail filter feed")]
struct Args {
    /// 规则文件路径（*.yaml / *.json / *.toml）
    #[arg(short, long)]
    config: PathBuf,

    /// 输出 XML 路径，缺省写到标准输出
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let config = ConfigManager::custom(args.config)
        .output_path(args.out)
        .verbose(args.verbose)
        .build();

    init_logging(config.verbose);

    if let Err(e) = run(&config) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// 日志写到 stderr，RUST_LOG 优先
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(config: &GlobalConfig) -> Result<()> {
    // 1. 加载并校验规则
    let rules = RuleLoader::load_from_file(&config.rules_path)
        .with_context(|| format!("error loading config {}", config.rules_path.display()))?;
    debug!("规则加载完成：{}条", rules.filters.len());

    // 2. 编译 + 序列化（完整文档生成后才落盘）
    let xml = generate_xml(&rules).context("error generating XML")?;

    // 3. 输出
    match &config.output_path {
        Some(path) => {
            write_output(path, &xml)
                .with_context(|| format!("error writing output {}", path.display()))?;
            info!("已写出 {}（{}字节）", path.display(), xml.len());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&xml)?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// 一次性写出文件，Unix 下权限 0600
fn write_output(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.flush()
}
