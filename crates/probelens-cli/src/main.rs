use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use probelens_core::CollectorOptions;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

mod replay;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "probelens", version, about = "Problem collector session replayer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 回放脚本化的会话，并把通知流写成 JSON lines
    Replay {
        /// 会话脚本（TOML，[[steps]] 数组）
        #[arg(long)]
        script: PathBuf,

        /// 输出文件；缺省写到标准输出
        #[arg(long)]
        output: Option<PathBuf>,

        /// 收集器选项文件（TOML），例如 debounce_ms = 10
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { script, output, config } => {
            info!(?script, ?output, "starting replay");

            let options = match &config {
                Some(path) => CollectorOptions::load(path).context("load collector options")?,
                None => CollectorOptions::default(),
            };
            let script = replay::Script::load(&script).context("load replay script")?;

            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path).context("create output file")?)),
                None => Box::new(BufWriter::new(std::io::stdout().lock())),
            };

            let summary = replay::run(&script, options, &mut out).context("replay failed")?;
            out.flush().ok();

            info!(problems = summary.problems, events = summary.events, "replay finished");
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到 stderr，标准输出留给事件流
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
