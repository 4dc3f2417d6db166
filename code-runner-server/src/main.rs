use clap::Parser;
use code_runner::ExecutorConfig;
use code_runner_server::{create_app, run_server};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to listen on
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// TOML file with executor settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wall-clock budget per execution in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum characters kept per output stream
    #[arg(long)]
    max_output: Option<usize>,

    /// Maximum number of concurrent executions
    #[arg(short, long)]
    max_concurrent: Option<usize>,

    /// Directory holding per-execution work areas
    #[arg(long)]
    work_root: Option<PathBuf>,
}

impl Args {
    fn executor_config(&self) -> anyhow::Result<ExecutorConfig> {
        let mut config = match &self.config {
            Some(path) => ExecutorConfig::from_file(path)?,
            None => ExecutorConfig::default(),
        };

        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(chars) = self.max_output {
            config = config.with_max_output_chars(chars);
        }
        if let Some(max) = self.max_concurrent {
            config = config.with_max_concurrent_executions(max);
        }
        if let Some(root) = &self.work_root {
            config = config.with_work_root(root);
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = args.executor_config()?;

    let app = create_app(config).await?;
    run_server(app, args.addr).await?;

    Ok(())
}
