use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use confstore::{ConfigFormat, PropertyStore, ScratchConfig, WritePolicy};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "confstore")]
#[command(about = "读取和修改 Hadoop XML 属性文件及纯文本键值配置文件")]
#[command(version)]
struct Cli {
    /// 文件格式（默认按扩展名判断：.xml 为 XML，其余为纯文本）
    #[arg(long, value_enum, global = true)]
    format: Option<FormatArg>,

    /// 暂存文件目录（默认为系统临时目录）
    #[arg(long, env = "CONFSTORE_SCRATCH_DIR", global = true)]
    scratch_dir: Option<PathBuf>,

    /// 静默模式(仅输出错误)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// 输出调试日志
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Xml,
    Props,
}

#[derive(Subcommand)]
enum Command {
    /// 创建空配置文件（已存在时覆盖）
    Init { file: PathBuf },

    /// 读取单个配置项
    Get {
        file: PathBuf,
        name: String,
        /// 配置项不存在时输出的默认值
        #[arg(long)]
        default: Option<String>,
    },

    /// 批量读取配置项（不指定名称时读取全部）
    GetMany {
        file: PathBuf,
        names: Vec<String>,
        /// 以JSON格式输出
        #[arg(long)]
        json: bool,
    },

    /// 写入单个配置项
    Set {
        file: PathBuf,
        name: String,
        value: String,
        /// 配置项不存在时新建
        #[arg(long)]
        create: bool,
        /// 配置项已存在时保留原值
        #[arg(long)]
        keep_existing: bool,
        /// 以JSON格式输出结果
        #[arg(long)]
        json: bool,
    },
}

/// `set --json` 的输出
#[derive(serde::Serialize)]
struct SetReport<'a> {
    file: &'a Path,
    name: &'a str,
    value: &'a str,
    changed: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        Command::Init { file } => {
            let store = open_store(&cli, file);
            store
                .initialize(file)
                .with_context(|| format!("创建配置文件失败: {:?}", file))?;
            if !cli.quiet {
                println!("已创建: {:?}", file);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Get { file, name, default } => handle_get(&cli, file, name, default.as_deref()),
        Command::GetMany { file, names, json } => handle_get_many(&cli, file, names, *json),
        Command::Set {
            file,
            name,
            value,
            create,
            keep_existing,
            json,
        } => {
            let policy = WritePolicy::default()
                .create_if_absent(*create)
                .replace_if_present(!*keep_existing);
            handle_set(&cli, file, name, value, policy, *json)
        }
    }
}

/// 初始化日志，RUST_LOG 优先于命令行选项
fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 根据命令行选项或文件扩展名选择存储
fn open_store(cli: &Cli, file: &Path) -> Box<dyn PropertyStore> {
    let format = match cli.format {
        Some(FormatArg::Xml) => ConfigFormat::Xml,
        Some(FormatArg::Props) => ConfigFormat::Properties,
        None => ConfigFormat::from_path(file),
    };
    tracing::debug!(file = ?file, format = format.name(), "选择存储格式");

    let scratch = match &cli.scratch_dir {
        Some(dir) => ScratchConfig::in_dir(dir),
        None => ScratchConfig::default(),
    };
    format.store(scratch)
}

/// 处理单项读取；配置项不存在且没有默认值时返回非零退出码
fn handle_get(cli: &Cli, file: &Path, name: &str, default: Option<&str>) -> Result<ExitCode> {
    let store = open_store(cli, file);
    let value = store
        .read_one(file, name)
        .with_context(|| format!("读取配置文件失败: {:?}", file))?;

    match value.or_else(|| default.map(str::to_string)) {
        Some(value) => {
            println!("{}", value);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            if !cli.quiet {
                eprintln!("配置项不存在: {}", name);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// 处理批量读取
fn handle_get_many(cli: &Cli, file: &Path, names: &[String], json: bool) -> Result<ExitCode> {
    let store = open_store(cli, file);
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let filter = (!names.is_empty()).then_some(names.as_slice());

    let params = store
        .read_many(file, filter)
        .with_context(|| format!("读取配置文件失败: {:?}", file))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&params)?);
    } else {
        for (name, value) in &params {
            println!("{}\t{}", name, value);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// 处理单项写入
fn handle_set(
    cli: &Cli,
    file: &Path,
    name: &str,
    value: &str,
    policy: WritePolicy,
    json: bool,
) -> Result<ExitCode> {
    let store = open_store(cli, file);
    let changed = store
        .write_one(file, name, value, policy)
        .with_context(|| format!("写入配置文件失败: {:?}", file))?;

    if json {
        let report = SetReport {
            file,
            name,
            value,
            changed,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        println!("{}", if changed { "updated" } else { "unchanged" });
    }

    Ok(ExitCode::SUCCESS)
}
